use crate::models::users;

use super::{get_json, set_json, SharedStore, CURRENT_USER_KEY};

#[derive(Clone)]
pub struct UserRepository {
    store: SharedStore,
}

impl UserRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn get_current_user(&self) -> Result<Option<users::User>, anyhow::Error> {
        get_json(self.store.as_ref(), CURRENT_USER_KEY)
    }

    pub fn set_current_user(&self, user: &users::User) -> Result<(), anyhow::Error> {
        set_json(self.store.as_ref(), CURRENT_USER_KEY, user)
    }

    pub fn remove_current_user(&self) -> Result<(), anyhow::Error> {
        self.store.remove(CURRENT_USER_KEY)
    }
}
