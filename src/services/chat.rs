use std::time::Duration;

use async_trait::async_trait;

use super::renderer::SharedRenderer;
use super::{RequestHandler, Service};
use crate::models::chat::{ChatAuthor, ChatMessage};

pub enum ChatRequest {
    Send { message: String },
}

/// Canned support answer for a free-text message. First keyword match wins.
pub fn canned_reply(message: &str) -> &'static str {
    let message = message.to_lowercase();

    if message.contains("recharge") || message.contains("plan") {
        "You can recharge your number by selecting a plan from our Plans section. Would you like me to show you our best plans?"
    } else if message.contains("5g") {
        "Jio 5G is available in 1000+ cities with speeds up to 1 Gbps! Check if 5G is available in your area."
    } else if message.contains("help") || message.contains("support") {
        "I'm here to help! You can ask about recharge plans, 5G services, account issues, or anything else."
    } else if message.contains("sim") {
        "You can get a new Jio SIM or port your number to Jio. Visit our SIM section for more details."
    } else {
        "Thank you for contacting Jio support. Our team will assist you shortly. You can also call 1800-XXX-XXXX for immediate assistance."
    }
}

pub struct ChatRequestHandler {
    renderer: SharedRenderer,
    reply_delay: Duration,
}

impl ChatRequestHandler {
    pub fn new(renderer: SharedRenderer, reply_delay: Duration) -> Self {
        ChatRequestHandler {
            renderer,
            reply_delay,
        }
    }

    fn send(&self, message: &str) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }

        self.renderer.render_chat(&ChatMessage {
            author: ChatAuthor::User,
            text: message.to_string(),
        });

        let reply = ChatMessage {
            author: ChatAuthor::Bot,
            text: canned_reply(message).to_string(),
        };
        let renderer = self.renderer.clone();
        let delay = self.reply_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            renderer.render_chat(&reply);
        });
    }
}

#[async_trait]
impl RequestHandler<ChatRequest> for ChatRequestHandler {
    async fn handle_request(&mut self, request: ChatRequest) {
        match request {
            ChatRequest::Send { message } => self.send(&message),
        }
    }
}

pub struct ChatService;

impl ChatService {
    pub fn new() -> Self {
        ChatService {}
    }
}

#[async_trait]
impl Service<ChatRequest, ChatRequestHandler> for ChatService {}
