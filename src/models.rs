pub mod chat;
pub mod notifications;
pub mod plans;
pub mod recharges;
pub mod users;
pub mod views;
