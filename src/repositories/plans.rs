use super::{get_json, set_json, SharedStore, SAVED_PLANS_KEY};

#[derive(Clone)]
pub struct PlanRepository {
    store: SharedStore,
}

impl PlanRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn get_saved_plans(&self) -> Result<Vec<String>, anyhow::Error> {
        Ok(get_json(self.store.as_ref(), SAVED_PLANS_KEY)?.unwrap_or_default())
    }

    /// Returns false when the plan was already saved.
    pub fn save_plan(&self, plan_id: &str) -> Result<bool, anyhow::Error> {
        let mut plans = self.get_saved_plans()?;
        if plans.iter().any(|plan| plan == plan_id) {
            return Ok(false);
        }

        plans.push(plan_id.to_string());
        set_json(self.store.as_ref(), SAVED_PLANS_KEY, &plans)?;

        Ok(true)
    }

    /// Returns false when the plan was not saved.
    pub fn remove_plan(&self, plan_id: &str) -> Result<bool, anyhow::Error> {
        let mut plans = self.get_saved_plans()?;
        let before = plans.len();
        plans.retain(|plan| plan != plan_id);

        if plans.len() == before {
            return Ok(false);
        }

        set_json(self.store.as_ref(), SAVED_PLANS_KEY, &plans)?;
        Ok(true)
    }
}
