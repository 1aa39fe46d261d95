use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub name: String,
    pub mobile: String,
    pub email: String,
}

/// Fields captured by the signup form, held in tab storage until the OTP is confirmed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignupData {
    pub name: String,
    pub mobile: String,
    pub email: String,
}

impl From<SignupData> for User {
    fn from(data: SignupData) -> Self {
        User {
            name: data.name,
            mobile: data.mobile,
            email: data.email,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
}
