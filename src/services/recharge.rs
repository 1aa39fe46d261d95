use super::{auth, ServiceError};
use crate::models::recharges::{
    rupees, PendingPayment, RechargeRecord, RechargeStatus, RechargeTarget,
};
use crate::models::users::User;
use crate::repositories::session::SessionStore;

fn login_required(message: &str) -> ServiceError {
    ServiceError::AuthRequired(message.to_string())
}

fn require_user(session: &SessionStore, message: &str) -> Result<User, ServiceError> {
    session
        .current()
        .map_err(ServiceError::repository("Session"))?
        .ok_or_else(|| login_required(message))
}

/// Plan selection and the simulated payment. The selected plan lives in memory only.
#[derive(Debug, Default)]
pub struct RechargeFlow {
    selected_plan: Option<String>,
}

impl RechargeFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_plan(&self) -> Option<&str> {
        self.selected_plan.as_deref()
    }

    /// Checks the number typed into the recharge form. Anonymous visitors get asked to log in.
    pub fn submit_recharge_number(
        &self,
        mobile: &str,
        session: &SessionStore,
    ) -> Result<RechargeTarget, ServiceError> {
        auth::validate_mobile(mobile)?;

        let authenticated = session
            .is_authenticated()
            .map_err(ServiceError::repository("Session"))?;
        if authenticated {
            Ok(RechargeTarget::Ready {
                mobile: mobile.to_string(),
            })
        } else {
            Ok(RechargeTarget::LoginRequired {
                mobile: mobile.to_string(),
            })
        }
    }

    pub fn select_plan(&mut self, amount: &str, session: &SessionStore) -> Result<User, ServiceError> {
        let user = require_user(session, "Please login to recharge")?;
        self.selected_plan = Some(amount.to_string());

        log::debug!("Plan {} selected by {}.", amount, user.mobile);
        Ok(user)
    }

    /// Consumes the selected plan. The payment is completed by `complete_payment` once the
    /// processing delay has passed.
    pub fn confirm_payment(
        &mut self,
        method: &str,
        session: &SessionStore,
    ) -> Result<PendingPayment, ServiceError> {
        require_user(session, "Please login to recharge")?;
        let plan = self
            .selected_plan
            .take()
            .ok_or(ServiceError::NoPlanSelected)?;

        log::info!("Processing ₹{} payment via {}.", plan, method);
        Ok(PendingPayment {
            plan,
            method: method.to_string(),
        })
    }

    /// Records the recharge, provided the user is still logged in.
    pub fn complete_payment(
        &self,
        payment: PendingPayment,
        session: &SessionStore,
    ) -> Result<RechargeRecord, ServiceError> {
        require_user(session, "Session ended before the payment completed")?;

        let record = RechargeRecord {
            date: chrono::Local::now().format("%-d/%-m/%Y").to_string(),
            plan_label: rupees(&payment.plan),
            amount: rupees(&payment.plan),
            status: RechargeStatus::Success,
            method: payment.method,
        };
        session
            .append_history(record.clone())
            .map_err(ServiceError::repository("Session"))?;

        log::info!("Recharge of {} recorded.", record.amount);
        Ok(record)
    }

    pub fn reset(&mut self) {
        self.selected_plan = None;
    }
}
