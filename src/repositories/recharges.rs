use crate::models::recharges;

use super::{get_json, set_json, SharedStore, RECHARGE_HISTORY_KEY};

#[derive(Clone)]
pub struct RechargeRepository {
    store: SharedStore,
}

impl RechargeRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Newest record first.
    pub fn get_history(&self) -> Result<Vec<recharges::RechargeRecord>, anyhow::Error> {
        Ok(get_json(self.store.as_ref(), RECHARGE_HISTORY_KEY)?.unwrap_or_default())
    }

    pub fn prepend_record(&self, record: recharges::RechargeRecord) -> Result<(), anyhow::Error> {
        let mut history = self.get_history()?;
        history.insert(0, record);

        set_json(self.store.as_ref(), RECHARGE_HISTORY_KEY, &history)
    }
}
