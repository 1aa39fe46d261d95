use std::sync::Arc;

use crate::models::{
    chat::{ChatAuthor, ChatMessage},
    notifications::Notification,
    plans::Plan,
    recharges::RechargeRecord,
    users::User,
    views::{Modal, Page, View},
};

/// Everything the portal can put on screen. Calls are synchronous and fire-and-forget.
pub trait Renderer: Send + Sync {
    fn render_view(&self, view: &View);
    fn render_profile(&self, user: &User);
    fn render_history(&self, history: &[RechargeRecord]);
    fn render_saved_plans(&self, plans: &[String]);
    fn render_plans(&self, plans: &[Plan]);
    fn focus_plans(&self);
    fn show_notification(&self, notification: &Notification);
    fn begin_dismiss(&self, id: &str);
    fn remove_notification(&self, id: &str);
    fn render_chat(&self, message: &ChatMessage);
}

pub type SharedRenderer = Arc<dyn Renderer>;

/// Prints the portal to stdout.
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        TerminalRenderer {}
    }
}

impl Renderer for TerminalRenderer {
    fn render_view(&self, view: &View) {
        match view.page {
            Page::Marketing => println!("[page] home: {}", view.visible_regions().join(", ")),
            Page::Dashboard(section) => println!("[page] dashboard > {}", section),
        }

        match &view.modal {
            None => (),
            Some(Modal::Login) => println!("[modal] login: enter your mobile number"),
            Some(Modal::Signup) => println!("[modal] signup: enter name, mobile and email"),
            Some(Modal::Otp { mobile }) => println!("[modal] enter the OTP sent to {}", mobile),
            Some(Modal::Payment { mobile, amount }) => {
                println!("[modal] pay {} for {}: upi, card or netbanking", amount, mobile)
            }
        }
    }

    fn render_profile(&self, user: &User) {
        println!("[profile] {} | {} | {}", user.name, user.mobile, user.email);
    }

    fn render_history(&self, history: &[RechargeRecord]) {
        if history.is_empty() {
            println!("[history] No recharge history");
            return;
        }

        for record in history {
            println!(
                "[history] {} {} {} {}",
                record.date,
                record.plan_label,
                record.amount,
                record.status.as_str()
            );
        }
    }

    fn render_saved_plans(&self, plans: &[String]) {
        if plans.is_empty() {
            println!("[saved] No saved plans");
        } else {
            println!("[saved] {}", plans.join(", "));
        }
    }

    fn render_plans(&self, plans: &[Plan]) {
        for plan in plans {
            println!(
                "[plan] ₹{} {} {} ({})",
                plan.amount, plan.data, plan.validity, plan.category
            );
        }
    }

    fn focus_plans(&self) {
        println!("[page] pick a plan with `select <amount>`");
    }

    fn show_notification(&self, notification: &Notification) {
        println!("({}) {}", notification.kind, notification.message);
    }

    fn begin_dismiss(&self, id: &str) {
        log::trace!("Notification {} leaving.", id);
    }

    fn remove_notification(&self, id: &str) {
        log::trace!("Notification {} removed.", id);
    }

    fn render_chat(&self, message: &ChatMessage) {
        match message.author {
            ChatAuthor::User => println!("[chat] you: {}", message.text),
            ChatAuthor::Bot => println!("[chat] bot: {}", message.text),
        }
    }
}
