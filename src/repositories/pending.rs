use crate::models::users;

use super::{
    get_json, set_json, SharedStore, LOGIN_MOBILE_KEY, RECHARGE_MOBILE_KEY, SIGNUP_DATA_KEY,
};

/// Auth and recharge data parked in tab storage between "request OTP" and "confirm OTP".
#[derive(Clone)]
pub struct PendingAuthRepository {
    store: SharedStore,
}

impl PendingAuthRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn get_login_mobile(&self) -> Result<Option<String>, anyhow::Error> {
        self.store.get(LOGIN_MOBILE_KEY)
    }

    pub fn set_login_mobile(&self, mobile: &str) -> Result<(), anyhow::Error> {
        self.store.set(LOGIN_MOBILE_KEY, mobile)
    }

    pub fn get_signup_data(&self) -> Result<Option<users::SignupData>, anyhow::Error> {
        get_json(self.store.as_ref(), SIGNUP_DATA_KEY)
    }

    pub fn set_signup_data(&self, data: &users::SignupData) -> Result<(), anyhow::Error> {
        set_json(self.store.as_ref(), SIGNUP_DATA_KEY, data)
    }

    pub fn remove_signup_data(&self) -> Result<(), anyhow::Error> {
        self.store.remove(SIGNUP_DATA_KEY)
    }

    pub fn get_recharge_mobile(&self) -> Result<Option<String>, anyhow::Error> {
        self.store.get(RECHARGE_MOBILE_KEY)
    }

    pub fn set_recharge_mobile(&self, mobile: &str) -> Result<(), anyhow::Error> {
        self.store.set(RECHARGE_MOBILE_KEY, mobile)
    }

    pub fn clear(&self) -> Result<(), anyhow::Error> {
        self.store.remove(LOGIN_MOBILE_KEY)?;
        self.store.remove(SIGNUP_DATA_KEY)?;
        self.store.remove(RECHARGE_MOBILE_KEY)
    }

    pub fn is_empty(&self) -> Result<bool, anyhow::Error> {
        Ok(self.get_login_mobile()?.is_none()
            && self.store.get(SIGNUP_DATA_KEY)?.is_none()
            && self.get_recharge_mobile()?.is_none())
    }
}
