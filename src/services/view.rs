use crate::models::views::{DashboardSection, Modal, Page, View};

/// Page for a given session and navigation state.
pub fn resolve_page(authenticated: bool, section: DashboardSection) -> Page {
    if authenticated {
        Page::Dashboard(section)
    } else {
        Page::Marketing
    }
}

/// Navigation state: the dashboard section last picked and the open modal, if any.
#[derive(Debug, Default)]
pub struct ViewController {
    section: DashboardSection,
    modal: Option<Modal>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self, authenticated: bool) -> View {
        View {
            page: resolve_page(authenticated, self.section),
            modal: self.modal.clone(),
        }
    }

    pub fn on_authenticated(&mut self) {
        self.section = DashboardSection::Overview;
        self.modal = None;
    }

    pub fn on_logout(&mut self) {
        self.section = DashboardSection::Overview;
        self.modal = None;
    }

    pub fn select_section(&mut self, section: DashboardSection) {
        self.section = section;
    }

    /// Only one modal is ever open; opening another replaces it.
    pub fn open_modal(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_always_sees_marketing() {
        for section in [
            DashboardSection::Overview,
            DashboardSection::History,
            DashboardSection::SavedPlans,
            DashboardSection::Profile,
        ] {
            assert_eq!(resolve_page(false, section), Page::Marketing);
            assert_eq!(resolve_page(true, section), Page::Dashboard(section));
        }
    }

    #[test]
    fn login_resets_to_overview() {
        let mut controller = ViewController::new();
        controller.select_section(DashboardSection::Profile);
        controller.open_modal(Modal::Otp {
            mobile: "9876543210".to_string(),
        });

        controller.on_authenticated();

        assert_eq!(
            controller.view(true),
            View {
                page: Page::Dashboard(DashboardSection::Overview),
                modal: None,
            }
        );
    }

    #[test]
    fn logout_returns_to_marketing() {
        let mut controller = ViewController::new();
        controller.select_section(DashboardSection::History);

        controller.on_logout();

        assert_eq!(controller.view(false).page, Page::Marketing);
        assert_eq!(
            controller.view(true).page,
            Page::Dashboard(DashboardSection::Overview)
        );
    }

    #[test]
    fn opening_a_modal_replaces_the_previous_one() {
        let mut controller = ViewController::new();
        controller.open_modal(Modal::Login);
        controller.open_modal(Modal::Signup);

        assert_eq!(controller.view(false).modal, Some(Modal::Signup));

        controller.close_modal();
        assert_eq!(controller.view(false).modal, None);
    }
}
