use std::time::Duration;

use uuid::Uuid;

use super::renderer::SharedRenderer;
use crate::models::notifications::{Notification, NotificationKind};
use crate::settings::Timings;

/// Transient toasts. Each one is shown immediately, starts leaving after `visible` and is
/// removed once `exit` has elapsed on top of that.
#[derive(Clone)]
pub struct Notifier {
    renderer: SharedRenderer,
    visible: Duration,
    exit: Duration,
}

impl Notifier {
    pub fn new(renderer: SharedRenderer, timings: &Timings) -> Self {
        Notifier {
            renderer,
            visible: timings.notification_visible(),
            exit: timings.notification_exit(),
        }
    }

    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> String {
        let notification = Notification {
            id: Uuid::new_v4().hyphenated().to_string(),
            message: message.into(),
            kind,
        };
        log::debug!("Notify ({}): {}", kind, notification.message);
        self.renderer.show_notification(&notification);

        let renderer = self.renderer.clone();
        let id = notification.id.clone();
        let (visible, exit) = (self.visible, self.exit);
        tokio::spawn(async move {
            tokio::time::sleep(visible).await;
            renderer.begin_dismiss(&id);
            tokio::time::sleep(exit).await;
            renderer.remove_notification(&id);
        });

        notification.id
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.notify(message, NotificationKind::Info)
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.notify(message, NotificationKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.notify(message, NotificationKind::Error)
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.notify(message, NotificationKind::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::renderer::testing::{RecordingRenderer, RenderCall};

    #[tokio::test]
    async fn notification_dismisses_itself() {
        let renderer = RecordingRenderer::new();
        let timings = Timings {
            notification_visible_ms: 5,
            notification_exit_ms: 5,
            ..Timings::default()
        };
        let notifier = Notifier::new(renderer.clone(), &timings);

        let id = notifier.success("Login successful!");
        tokio::time::sleep(Duration::from_millis(100)).await;

        let calls = renderer.calls();
        assert!(matches!(&calls[0], RenderCall::Notification(n) if n.id == id));
        assert_eq!(calls[1], RenderCall::BeginDismiss(id.clone()));
        assert_eq!(calls[2], RenderCall::RemoveNotification(id));
    }

    #[tokio::test]
    async fn overlapping_notifications_stack_in_order() {
        let renderer = RecordingRenderer::new();
        let notifier = Notifier::new(renderer.clone(), &Timings::default());

        notifier.info("first");
        notifier.warning("second");

        assert_eq!(
            renderer.notifications(),
            vec![
                (NotificationKind::Info, "first".to_string()),
                (NotificationKind::Warning, "second".to_string()),
            ]
        );
    }
}
