use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Signup,
    VerifyOtp,
    Recharge,
    Plans,
    User,
    Payment,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Login => "/auth/login",
            Endpoint::Signup => "/auth/signup",
            Endpoint::VerifyOtp => "/auth/verify-otp",
            Endpoint::Recharge => "/recharge",
            Endpoint::Plans => "/plans",
            Endpoint::User => "/user",
            Endpoint::Payment => "/payment",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
            Method::Put => f.write_str("PUT"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<Value>,
    pub message: String,
}

/// Stand-in for the backend. Nothing leaves the process; every call waits out the configured
/// latency and succeeds, echoing the request body.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    latency: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, latency: Duration) -> Self {
        ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            latency,
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub async fn call(&self, endpoint: Endpoint, method: Method, data: Option<Value>) -> ApiResponse {
        log::debug!("{} {} (simulated)", method, self.url(endpoint));
        tokio::time::sleep(self.latency).await;

        ApiResponse {
            success: true,
            data,
            message: "Operation successful".to_string(),
        }
    }
}
