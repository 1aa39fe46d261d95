use crate::models::{recharges, users};

use super::{plans::PlanRepository, recharges::RechargeRepository, users::UserRepository};
use super::SharedStore;

/// Owner of the persisted identity and everything hanging off it.
///
/// A session exists exactly when a user is stored under `currentUser`. Clearing the session
/// leaves recharge history and saved plans on disk.
#[derive(Clone)]
pub struct SessionStore {
    users: UserRepository,
    recharges: RechargeRepository,
    plans: PlanRepository,
}

impl SessionStore {
    pub fn new(store: SharedStore) -> Self {
        SessionStore {
            users: UserRepository::new(store.clone()),
            recharges: RechargeRepository::new(store.clone()),
            plans: PlanRepository::new(store),
        }
    }

    pub fn current(&self) -> Result<Option<users::User>, anyhow::Error> {
        self.users.get_current_user()
    }

    pub fn is_authenticated(&self) -> Result<bool, anyhow::Error> {
        Ok(self.current()?.is_some())
    }

    pub fn set_current(&self, user: &users::User) -> Result<(), anyhow::Error> {
        self.users.set_current_user(user)
    }

    pub fn clear(&self) -> Result<(), anyhow::Error> {
        self.users.remove_current_user()
    }

    /// Rewrites name and email of the current user. The mobile number never changes.
    pub fn update_profile(
        &self,
        update: &users::ProfileUpdate,
    ) -> Result<Option<users::User>, anyhow::Error> {
        let Some(mut user) = self.current()? else {
            return Ok(None);
        };

        user.name = update.name.clone();
        user.email = update.email.clone();
        self.users.set_current_user(&user)?;

        Ok(Some(user))
    }

    pub fn append_history(&self, record: recharges::RechargeRecord) -> Result<(), anyhow::Error> {
        self.recharges.prepend_record(record)
    }

    pub fn history(&self) -> Result<Vec<recharges::RechargeRecord>, anyhow::Error> {
        self.recharges.get_history()
    }

    pub fn saved_plans(&self) -> Result<Vec<String>, anyhow::Error> {
        self.plans.get_saved_plans()
    }

    pub fn save_plan(&self, plan_id: &str) -> Result<bool, anyhow::Error> {
        self.plans.save_plan(plan_id)
    }

    pub fn remove_plan(&self, plan_id: &str) -> Result<bool, anyhow::Error> {
        self.plans.remove_plan(plan_id)
    }
}
