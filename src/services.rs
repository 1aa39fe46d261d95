use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::repositories::SharedStore;
use crate::settings::Settings;

pub mod api;
pub mod auth;
pub mod chat;
pub mod console;
pub mod notifier;
pub mod portal;
pub mod recharge;
pub mod renderer;
pub mod view;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Authentication required: {0}")]
    AuthRequired(String),
    #[error("No plan selected.")]
    NoPlanSelected,
    #[error("No OTP has been requested.")]
    NoPendingOtp,
    #[error("A user is already logged in.")]
    AlreadyLoggedIn,
    #[error("Repository error: {0} - {1}")]
    Repository(String, String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
}

impl ServiceError {
    pub fn repository(component: &'static str) -> impl Fn(anyhow::Error) -> ServiceError {
        move |e| ServiceError::Repository(component.to_string(), e.to_string())
    }

    /// Text shown to the user when the error is surfaced as a notification.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Validation(message) | ServiceError::AuthRequired(message) => {
                message.clone()
            }
            ServiceError::NoPlanSelected => "Please select a plan first".to_string(),
            ServiceError::NoPendingOtp => "Please request an OTP first".to_string(),
            ServiceError::AlreadyLoggedIn => "You are already logged in".to_string(),
            ServiceError::Repository(..) | ServiceError::Communication(..) => {
                "Something went wrong, please try again".to_string()
            }
        }
    }
}

#[async_trait]
pub trait RequestHandler<T>: Send + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&mut self, request: T);
}

/// Drains a request channel, handing requests to the handler one at a time in arrival order.
#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T>,
{
    async fn run(&mut self, mut handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            handler.handle_request(request).await;
        }
    }
}

#[derive(Clone)]
pub struct Channels {
    pub portal: mpsc::Sender<portal::PortalRequest>,
    pub chat: mpsc::Sender<chat::ChatRequest>,
}

pub async fn start_services(
    settings: Settings,
    local_store: SharedStore,
    tab_store: SharedStore,
    renderer: renderer::SharedRenderer,
) -> Result<Channels, anyhow::Error> {
    let (portal_tx, mut portal_rx) = mpsc::channel(512);
    let (chat_tx, mut chat_rx) = mpsc::channel(512);

    let mut portal_service = portal::PortalService::new();
    let mut chat_service = chat::ChatService::new();

    let mut portal = portal::Portal::new(local_store, tab_store, renderer.clone(), &settings);
    portal.start()?;

    log::info!("Starting portal service.");
    let handler = portal::PortalRequestHandler::new(
        portal,
        api::ApiClient::new(&settings.api.base_url, settings.timings.api_latency()),
        settings.timings.payment(),
        portal_tx.downgrade(),
    );
    tokio::spawn(async move {
        portal_service.run(handler, &mut portal_rx).await;
        log::info!("Portal service stopped.");
    });

    log::info!("Starting chat service.");
    let chat_handler = chat::ChatRequestHandler::new(renderer, settings.timings.chat_reply());
    tokio::spawn(async move {
        chat_service.run(chat_handler, &mut chat_rx).await;
    });

    log::info!("Started services.");
    Ok(Channels {
        portal: portal_tx,
        chat: chat_tx,
    })
}
