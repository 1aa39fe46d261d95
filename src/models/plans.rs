use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Plan {
    pub amount: String,
    pub validity: String,
    pub data: String,
    pub category: String,
}
