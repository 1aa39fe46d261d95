use super::ServiceError;
use crate::models::users::{SignupData, User};
use crate::repositories::{pending::PendingAuthRepository, session::SessionStore};
use crate::settings::Defaults;

pub const MOBILE_LENGTH: usize = 10;
pub const OTP_LENGTH: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    OtpRequested {
        mobile: String,
        signup: Option<SignupData>,
    },
    Authenticated(User),
}

/// An outstanding OTP request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpRequest {
    pub mobile: String,
    pub signup: bool,
}

/// Only the character count is checked.
pub fn validate_mobile(mobile: &str) -> Result<(), ServiceError> {
    if mobile.chars().count() != MOBILE_LENGTH {
        return Err(ServiceError::Validation(
            "Please enter a valid 10-digit mobile number".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_otp(code: &str) -> Result<(), ServiceError> {
    if code.chars().count() != OTP_LENGTH {
        return Err(ServiceError::Validation(
            "Please enter complete OTP".to_string(),
        ));
    }
    Ok(())
}

/// A second identity can only be requested after logging out.
fn ensure_logged_out(session: &SessionStore) -> Result<(), ServiceError> {
    if session
        .is_authenticated()
        .map_err(ServiceError::repository("Session"))?
    {
        return Err(ServiceError::AlreadyLoggedIn);
    }
    Ok(())
}

/// Login and signup by OTP. The code itself is never checked against anything.
pub struct AuthFlow {
    pending: PendingAuthRepository,
    defaults: Defaults,
}

impl AuthFlow {
    pub fn new(pending: PendingAuthRepository, defaults: Defaults) -> Self {
        AuthFlow { pending, defaults }
    }

    pub fn state(&self, session: &SessionStore) -> Result<AuthState, ServiceError> {
        if let Some(user) = session.current().map_err(ServiceError::repository("Session"))? {
            return Ok(AuthState::Authenticated(user));
        }

        match self.pending_mobile()? {
            Some(mobile) => {
                let signup = self
                    .pending
                    .get_signup_data()
                    .map_err(ServiceError::repository("Auth"))?;
                Ok(AuthState::OtpRequested { mobile, signup })
            }
            None => Ok(AuthState::Anonymous),
        }
    }

    pub fn pending_mobile(&self) -> Result<Option<String>, ServiceError> {
        self.pending
            .get_login_mobile()
            .map_err(ServiceError::repository("Auth"))
    }

    pub fn pending_request(&self) -> Result<Option<OtpRequest>, ServiceError> {
        let Some(mobile) = self.pending_mobile()? else {
            return Ok(None);
        };
        let signup = self
            .pending
            .get_signup_data()
            .map_err(ServiceError::repository("Auth"))?
            .is_some();

        Ok(Some(OtpRequest { mobile, signup }))
    }

    pub fn request_login(&self, mobile: &str, session: &SessionStore) -> Result<(), ServiceError> {
        validate_mobile(mobile)?;
        ensure_logged_out(session)?;

        self.pending
            .remove_signup_data()
            .map_err(ServiceError::repository("Auth"))?;
        self.pending
            .set_login_mobile(mobile)
            .map_err(ServiceError::repository("Auth"))?;

        log::info!("OTP requested for {}.", mobile);
        Ok(())
    }

    pub fn request_signup(
        &self,
        signup: &SignupData,
        session: &SessionStore,
    ) -> Result<(), ServiceError> {
        validate_mobile(&signup.mobile)?;
        ensure_logged_out(session)?;

        self.pending
            .set_signup_data(signup)
            .map_err(ServiceError::repository("Auth"))?;
        self.pending
            .set_login_mobile(&signup.mobile)
            .map_err(ServiceError::repository("Auth"))?;

        log::info!("Signup OTP requested for {}.", signup.mobile);
        Ok(())
    }

    /// Accepts any code of the right length and turns the pending request into a session.
    pub fn confirm_otp(&self, code: &str, session: &SessionStore) -> Result<User, ServiceError> {
        validate_otp(code)?;

        let mobile = self.pending_mobile()?.ok_or(ServiceError::NoPendingOtp)?;
        let signup = self
            .pending
            .get_signup_data()
            .map_err(ServiceError::repository("Auth"))?;

        let user = match signup {
            Some(data) => User::from(data),
            None => User {
                name: self.defaults.user_name.clone(),
                mobile,
                email: self.defaults.user_email.clone(),
            },
        };

        session
            .set_current(&user)
            .map_err(ServiceError::repository("Session"))?;
        self.pending.clear().map_err(ServiceError::repository("Auth"))?;

        log::info!("User {} logged in.", user.mobile);
        Ok(user)
    }

    pub fn park_recharge_mobile(&self, mobile: &str) -> Result<(), ServiceError> {
        self.pending
            .set_recharge_mobile(mobile)
            .map_err(ServiceError::repository("Auth"))
    }

    pub fn logout(&self, session: &SessionStore) -> Result<(), ServiceError> {
        session.clear().map_err(ServiceError::repository("Session"))?;
        self.pending.clear().map_err(ServiceError::repository("Auth"))?;

        log::info!("User logged out.");
        Ok(())
    }

    pub fn has_pending_state(&self) -> Result<bool, ServiceError> {
        Ok(!self
            .pending
            .is_empty()
            .map_err(ServiceError::repository("Auth"))?)
    }
}
