use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

pub mod pending;
pub mod plans;
pub mod recharges;
pub mod session;
pub mod storage;
pub mod users;

pub const CURRENT_USER_KEY: &str = "currentUser";
pub const RECHARGE_HISTORY_KEY: &str = "rechargeHistory";
pub const SAVED_PLANS_KEY: &str = "savedPlans";

pub const LOGIN_MOBILE_KEY: &str = "loginMobile";
pub const SIGNUP_DATA_KEY: &str = "signupData";
pub const RECHARGE_MOBILE_KEY: &str = "rechargeMobile";

/// String-valued key-value storage. Writes are synchronous and the last write wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, anyhow::Error>;
    fn set(&self, key: &str, value: &str) -> Result<(), anyhow::Error>;
    fn remove(&self, key: &str) -> Result<(), anyhow::Error>;
}

pub type SharedStore = Arc<dyn KeyValueStore>;

pub(crate) fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, anyhow::Error> {
    match store.get(key)? {
        Some(raw) => {
            let value = serde_json::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("Malformed value under {}: {}", key, e))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

pub(crate) fn set_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), anyhow::Error> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
