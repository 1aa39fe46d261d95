use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{mpsc, oneshot};

use super::api::{ApiClient, Endpoint, Method};
use super::auth::{AuthFlow, AuthState, OtpRequest};
use super::notifier::Notifier;
use super::recharge::RechargeFlow;
use super::renderer::SharedRenderer;
use super::view::ViewController;
use super::{RequestHandler, Service, ServiceError};
use crate::models::{
    plans::Plan,
    recharges::{rupees, PendingPayment, RechargeRecord, RechargeTarget},
    users::{ProfileUpdate, SignupData, User},
    views::{DashboardSection, Modal, View},
};
use crate::repositories::{pending::PendingAuthRepository, session::SessionStore, SharedStore};
use crate::settings::Settings;

type Responder<T> = oneshot::Sender<Result<T, ServiceError>>;

/// Snapshot of the portal, for status queries.
#[derive(Clone, Debug, PartialEq)]
pub struct PortalStatus {
    pub auth: AuthState,
    pub view: View,
    pub selected_plan: Option<String>,
    pub pending_auth: bool,
    pub history: Vec<RechargeRecord>,
    pub saved_plans: Vec<String>,
}

/// The single owner of session, navigation and transaction state.
///
/// Every command returns its outcome. Failures are also surfaced to the user: an error
/// notification, plus the login modal when the command needs a session. A failed command never
/// changes state.
pub struct Portal {
    session: SessionStore,
    auth: AuthFlow,
    recharge: RechargeFlow,
    view: ViewController,
    notifier: Notifier,
    renderer: SharedRenderer,
    catalog: Vec<Plan>,
}

impl Portal {
    pub fn new(
        local_store: SharedStore,
        tab_store: SharedStore,
        renderer: SharedRenderer,
        settings: &Settings,
    ) -> Self {
        Portal {
            session: SessionStore::new(local_store),
            auth: AuthFlow::new(
                PendingAuthRepository::new(tab_store),
                settings.defaults.clone(),
            ),
            recharge: RechargeFlow::new(),
            view: ViewController::new(),
            notifier: Notifier::new(renderer.clone(), &settings.timings),
            renderer,
            catalog: settings.plans.clone(),
        }
    }

    /// First paint. A user persisted by an earlier run resumes straight into the dashboard.
    pub fn start(&mut self) -> Result<(), ServiceError> {
        match self.current_user()? {
            Some(user) => {
                log::info!("Resuming session for {}.", user.mobile);
                self.view.on_authenticated();
                self.render_view()?;
                self.render_dashboard(&user)
            }
            None => self.render_view(),
        }
    }

    pub fn current_user(&self) -> Result<Option<User>, ServiceError> {
        self.session
            .current()
            .map_err(ServiceError::repository("Session"))
    }

    pub fn current_view(&self) -> Result<View, ServiceError> {
        Ok(self.view.view(self.is_authenticated()?))
    }

    pub fn status(&self) -> Result<PortalStatus, ServiceError> {
        Ok(PortalStatus {
            auth: self.auth.state(&self.session)?,
            view: self.current_view()?,
            selected_plan: self.recharge.selected_plan().map(str::to_string),
            pending_auth: self.auth.has_pending_state()?,
            history: self.history()?,
            saved_plans: self.saved_plans()?,
        })
    }

    pub fn request_login(&mut self, mobile: &str) -> Result<(), ServiceError> {
        self.auth
            .request_login(mobile, &self.session)
            .map_err(|e| self.report(e))?;

        self.view.open_modal(Modal::Otp {
            mobile: mobile.to_string(),
        });
        self.render_view()
    }

    pub fn request_signup(&mut self, signup: SignupData) -> Result<(), ServiceError> {
        self.auth
            .request_signup(&signup, &self.session)
            .map_err(|e| self.report(e))?;

        self.view.open_modal(Modal::Otp {
            mobile: signup.mobile,
        });
        self.render_view()
    }

    /// The outstanding OTP request, to be sent again.
    pub fn resend_otp(&mut self) -> Result<OtpRequest, ServiceError> {
        self.auth
            .pending_request()
            .and_then(|request| request.ok_or(ServiceError::NoPendingOtp))
            .map_err(|e| self.report(e))
    }

    pub fn otp_dispatched(&self, mobile: &str, resent: bool) {
        if resent {
            self.notifier.success("OTP sent successfully!");
        } else {
            self.notifier.success(format!("OTP sent to {}", mobile));
        }
    }

    pub fn confirm_otp(&mut self, code: &str) -> Result<User, ServiceError> {
        let user = self
            .auth
            .confirm_otp(code, &self.session)
            .map_err(|e| self.report(e))?;

        self.view.on_authenticated();
        self.render_view()?;
        self.render_dashboard(&user)?;
        self.notifier.success("Login successful!");

        Ok(user)
    }

    pub fn logout(&mut self) -> Result<(), ServiceError> {
        self.auth.logout(&self.session).map_err(|e| self.report(e))?;

        self.recharge.reset();
        self.view.on_logout();
        self.render_view()?;
        self.notifier.success("Logged out successfully");

        Ok(())
    }

    pub fn submit_recharge_number(&mut self, mobile: &str) -> Result<RechargeTarget, ServiceError> {
        let target = self
            .recharge
            .submit_recharge_number(mobile, &self.session)
            .map_err(|e| self.report(e))?;

        match &target {
            RechargeTarget::Ready { .. } => self.renderer.focus_plans(),
            RechargeTarget::LoginRequired { mobile } => {
                self.auth
                    .park_recharge_mobile(mobile)
                    .map_err(|e| self.report(e))?;
                self.notifier.info("Please login to continue");
                self.view.open_modal(Modal::Login);
                self.render_view()?;
            }
        }

        Ok(target)
    }

    /// Catalog entries, optionally narrowed to one category.
    pub fn browse_plans(&self, category: Option<&str>) -> Vec<Plan> {
        let plans: Vec<Plan> = self
            .catalog
            .iter()
            .filter(|plan| category.map_or(true, |c| plan.category.eq_ignore_ascii_case(c)))
            .cloned()
            .collect();

        self.renderer.render_plans(&plans);
        plans
    }

    pub fn select_plan(&mut self, amount: &str) -> Result<(), ServiceError> {
        let user = self
            .recharge
            .select_plan(amount, &self.session)
            .map_err(|e| self.report(e))?;

        self.view.open_modal(Modal::Payment {
            mobile: user.mobile,
            amount: rupees(amount),
        });
        self.render_view()
    }

    pub fn confirm_payment(&mut self, method: &str) -> Result<PendingPayment, ServiceError> {
        let payment = self
            .recharge
            .confirm_payment(method, &self.session)
            .map_err(|e| self.report(e))?;

        self.notifier.info(format!(
            "Processing payment via {}...",
            method.to_uppercase()
        ));
        Ok(payment)
    }

    pub fn complete_payment(&mut self, payment: PendingPayment) -> Result<RechargeRecord, ServiceError> {
        let record = self
            .recharge
            .complete_payment(payment, &self.session)
            .map_err(|e| self.report(e))?;

        self.view.close_modal();
        self.render_view()?;
        self.renderer.render_history(&self.history()?);
        self.notifier
            .success("Recharge successful! Your plan is now active.");

        Ok(record)
    }

    pub fn show_section(&mut self, section: DashboardSection) -> Result<(), ServiceError> {
        let user = self
            .require_user("Please login to view your dashboard")
            .map_err(|e| self.report(e))?;

        self.view.select_section(section);
        self.render_view()?;
        match section {
            DashboardSection::Overview | DashboardSection::Profile => {
                self.renderer.render_profile(&user)
            }
            DashboardSection::History => self.renderer.render_history(&self.history()?),
            DashboardSection::SavedPlans => {
                self.renderer.render_saved_plans(&self.saved_plans()?)
            }
        }

        Ok(())
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<User, ServiceError> {
        let user = self
            .session
            .update_profile(&update)
            .map_err(ServiceError::repository("Session"))
            .and_then(|user| {
                user.ok_or_else(|| {
                    ServiceError::AuthRequired("Please login to update your profile".to_string())
                })
            })
            .map_err(|e| self.report(e))?;

        self.renderer.render_profile(&user);
        self.notifier.success("Profile updated successfully");

        Ok(user)
    }

    pub fn save_plan(&mut self, plan_id: &str) -> Result<bool, ServiceError> {
        self.require_user("Please login to save plans")
            .map_err(|e| self.report(e))?;
        let saved = self
            .session
            .save_plan(plan_id)
            .map_err(ServiceError::repository("Session"))
            .map_err(|e| self.report(e))?;

        if saved {
            self.notifier.success(format!("Plan {} saved", rupees(plan_id)));
        } else {
            self.notifier
                .warning(format!("Plan {} is already saved", rupees(plan_id)));
        }
        self.renderer.render_saved_plans(&self.saved_plans()?);

        Ok(saved)
    }

    pub fn remove_plan(&mut self, plan_id: &str) -> Result<bool, ServiceError> {
        self.require_user("Please login to manage saved plans")
            .map_err(|e| self.report(e))?;
        let removed = self
            .session
            .remove_plan(plan_id)
            .map_err(ServiceError::repository("Session"))
            .map_err(|e| self.report(e))?;

        if removed {
            self.notifier
                .success(format!("Plan {} removed", rupees(plan_id)));
        }
        self.renderer.render_saved_plans(&self.saved_plans()?);

        Ok(removed)
    }

    pub fn open_modal(&mut self, modal: Modal) -> Result<(), ServiceError> {
        self.view.open_modal(modal);
        self.render_view()
    }

    pub fn close_modal(&mut self) -> Result<(), ServiceError> {
        self.view.close_modal();
        self.render_view()
    }

    fn is_authenticated(&self) -> Result<bool, ServiceError> {
        self.session
            .is_authenticated()
            .map_err(ServiceError::repository("Session"))
    }

    fn require_user(&self, message: &str) -> Result<User, ServiceError> {
        self.current_user()?
            .ok_or_else(|| ServiceError::AuthRequired(message.to_string()))
    }

    fn history(&self) -> Result<Vec<RechargeRecord>, ServiceError> {
        self.session
            .history()
            .map_err(ServiceError::repository("Session"))
    }

    fn saved_plans(&self) -> Result<Vec<String>, ServiceError> {
        self.session
            .saved_plans()
            .map_err(ServiceError::repository("Session"))
    }

    fn render_view(&self) -> Result<(), ServiceError> {
        self.renderer.render_view(&self.current_view()?);
        Ok(())
    }

    fn render_dashboard(&self, user: &User) -> Result<(), ServiceError> {
        self.renderer.render_profile(user);
        self.renderer.render_history(&self.history()?);
        self.renderer.render_saved_plans(&self.saved_plans()?);
        Ok(())
    }

    /// Surfaces a failed command and hands the error back to the caller.
    fn report(&mut self, error: ServiceError) -> ServiceError {
        log::warn!("Command rejected: {}", error);
        self.notifier.error(error.user_message());

        if let ServiceError::AuthRequired(_) = error {
            self.view.open_modal(Modal::Login);
            if let Err(e) = self.render_view() {
                log::error!("Could not render login redirect: {}", e);
            }
        }

        error
    }
}

pub enum PortalRequest {
    RequestLogin {
        mobile: String,
        response: Responder<()>,
    },
    RequestSignup {
        signup: SignupData,
        response: Responder<()>,
    },
    ResendOtp {
        response: Responder<()>,
    },
    ConfirmOtp {
        code: String,
        response: Responder<User>,
    },
    Logout {
        response: Responder<()>,
    },
    SubmitRechargeNumber {
        mobile: String,
        response: Responder<RechargeTarget>,
    },
    BrowsePlans {
        category: Option<String>,
        response: Responder<Vec<Plan>>,
    },
    SelectPlan {
        amount: String,
        response: Responder<()>,
    },
    ConfirmPayment {
        method: String,
        response: Responder<()>,
    },
    ShowSection {
        section: DashboardSection,
        response: Responder<()>,
    },
    UpdateProfile {
        update: ProfileUpdate,
        response: Responder<User>,
    },
    SavePlan {
        plan: String,
        response: Responder<bool>,
    },
    RemovePlan {
        plan: String,
        response: Responder<bool>,
    },
    OpenModal {
        modal: Modal,
        response: Responder<()>,
    },
    CloseModal {
        response: Responder<()>,
    },
    GetStatus {
        response: Responder<PortalStatus>,
    },
    OtpDispatched {
        mobile: String,
        resent: bool,
    },
    PaymentProcessed {
        payment: PendingPayment,
    },
}

pub struct PortalRequestHandler {
    portal: Portal,
    api: ApiClient,
    payment_delay: Duration,
    channel: mpsc::WeakSender<PortalRequest>,
}

impl PortalRequestHandler {
    pub fn new(
        portal: Portal,
        api: ApiClient,
        payment_delay: Duration,
        channel: mpsc::WeakSender<PortalRequest>,
    ) -> Self {
        PortalRequestHandler {
            portal,
            api,
            payment_delay,
            channel,
        }
    }

    /// Sends the simulated OTP and posts the confirmation back once the call returns.
    fn dispatch_otp(&self, endpoint: Endpoint, mobile: String, resent: bool) {
        let Some(channel) = self.channel.upgrade() else {
            log::warn!("Portal channel closed, OTP dispatch dropped.");
            return;
        };
        let api = self.api.clone();

        tokio::spawn(async move {
            let response = api
                .call(endpoint, Method::Post, Some(json!({ "mobile": mobile })))
                .await;
            if response.success {
                let _ = channel
                    .send(PortalRequest::OtpDispatched { mobile, resent })
                    .await;
            }
        });
    }

    /// Fire-and-forget copy of a command to the simulated backend.
    fn mirror(&self, endpoint: Endpoint, method: Method, data: Option<serde_json::Value>) {
        let api = self.api.clone();

        tokio::spawn(async move {
            let response = api.call(endpoint, method, data).await;
            log::debug!("{}: {}", endpoint.path(), response.message);
        });
    }

    fn schedule_payment(&self, payment: PendingPayment) {
        let Some(channel) = self.channel.upgrade() else {
            log::warn!("Portal channel closed, payment for ₹{} dropped.", payment.plan);
            return;
        };
        let api = self.api.clone();
        let delay = self.payment_delay;

        tokio::spawn(async move {
            let data = json!({ "amount": payment.plan, "method": payment.method });
            api.call(Endpoint::Payment, Method::Post, Some(data)).await;
            tokio::time::sleep(delay).await;
            let _ = channel
                .send(PortalRequest::PaymentProcessed { payment })
                .await;
        });
    }
}

#[async_trait]
impl RequestHandler<PortalRequest> for PortalRequestHandler {
    async fn handle_request(&mut self, request: PortalRequest) {
        match request {
            PortalRequest::RequestLogin { mobile, response } => {
                let result = self.portal.request_login(&mobile);
                if result.is_ok() {
                    self.dispatch_otp(Endpoint::Login, mobile, false);
                }
                let _ = response.send(result);
            }
            PortalRequest::RequestSignup { signup, response } => {
                let mobile = signup.mobile.clone();
                let result = self.portal.request_signup(signup);
                if result.is_ok() {
                    self.dispatch_otp(Endpoint::Signup, mobile, false);
                }
                let _ = response.send(result);
            }
            PortalRequest::ResendOtp { response } => {
                let result = self.portal.resend_otp().map(|request| {
                    let endpoint = if request.signup {
                        Endpoint::Signup
                    } else {
                        Endpoint::Login
                    };
                    self.dispatch_otp(endpoint, request.mobile, true);
                });
                let _ = response.send(result);
            }
            PortalRequest::ConfirmOtp { code, response } => {
                let result = self.portal.confirm_otp(&code);
                if let Ok(user) = &result {
                    self.mirror(
                        Endpoint::VerifyOtp,
                        Method::Post,
                        Some(json!({ "mobile": user.mobile })),
                    );
                }
                let _ = response.send(result);
            }
            PortalRequest::Logout { response } => {
                let _ = response.send(self.portal.logout());
            }
            PortalRequest::SubmitRechargeNumber { mobile, response } => {
                let result = self.portal.submit_recharge_number(&mobile);
                if let Ok(RechargeTarget::Ready { mobile }) = &result {
                    self.mirror(
                        Endpoint::Recharge,
                        Method::Post,
                        Some(json!({ "mobile": mobile })),
                    );
                }
                let _ = response.send(result);
            }
            PortalRequest::BrowsePlans { category, response } => {
                self.mirror(Endpoint::Plans, Method::Get, None);
                let _ = response.send(Ok(self.portal.browse_plans(category.as_deref())));
            }
            PortalRequest::SelectPlan { amount, response } => {
                let _ = response.send(self.portal.select_plan(&amount));
            }
            PortalRequest::ConfirmPayment { method, response } => {
                let result = self.portal.confirm_payment(&method).map(|payment| {
                    self.schedule_payment(payment);
                });
                let _ = response.send(result);
            }
            PortalRequest::ShowSection { section, response } => {
                let _ = response.send(self.portal.show_section(section));
            }
            PortalRequest::UpdateProfile { update, response } => {
                let result = self.portal.update_profile(update);
                if let Ok(user) = &result {
                    self.mirror(Endpoint::User, Method::Put, serde_json::to_value(user).ok());
                }
                let _ = response.send(result);
            }
            PortalRequest::SavePlan { plan, response } => {
                let _ = response.send(self.portal.save_plan(&plan));
            }
            PortalRequest::RemovePlan { plan, response } => {
                let _ = response.send(self.portal.remove_plan(&plan));
            }
            PortalRequest::OpenModal { modal, response } => {
                let _ = response.send(self.portal.open_modal(modal));
            }
            PortalRequest::CloseModal { response } => {
                let _ = response.send(self.portal.close_modal());
            }
            PortalRequest::GetStatus { response } => {
                let _ = response.send(self.portal.status());
            }
            PortalRequest::OtpDispatched { mobile, resent } => {
                self.portal.otp_dispatched(&mobile, resent);
            }
            PortalRequest::PaymentProcessed { payment } => {
                if let Err(e) = self.portal.complete_payment(payment) {
                    log::warn!("Payment completion failed: {}", e);
                }
            }
        }
    }
}

pub struct PortalService;

impl PortalService {
    pub fn new() -> Self {
        PortalService {}
    }
}

#[async_trait]
impl Service<PortalRequest, PortalRequestHandler> for PortalService {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::notifications::NotificationKind;
    use crate::models::recharges::RechargeStatus;
    use crate::models::views::Page;
    use crate::repositories::storage::MemoryStore;
    use crate::services::renderer::testing::{RecordingRenderer, RenderCall};

    fn portal_with(renderer: Arc<RecordingRenderer>, local: SharedStore) -> Portal {
        let settings = Settings {
            plans: vec![
                Plan {
                    amount: "299".to_string(),
                    validity: "28 days".to_string(),
                    data: "2GB/day".to_string(),
                    category: "popular".to_string(),
                },
                Plan {
                    amount: "2999".to_string(),
                    validity: "365 days".to_string(),
                    data: "2.5GB/day".to_string(),
                    category: "annual".to_string(),
                },
            ],
            ..Settings::default()
        };
        Portal::new(local, Arc::new(MemoryStore::new()), renderer, &settings)
    }

    fn portal() -> (Portal, Arc<RecordingRenderer>) {
        let renderer = RecordingRenderer::new();
        let portal = portal_with(renderer.clone(), Arc::new(MemoryStore::new()));
        (portal, renderer)
    }

    fn signup(name: &str, mobile: &str, email: &str) -> SignupData {
        SignupData {
            name: name.to_string(),
            mobile: mobile.to_string(),
            email: email.to_string(),
        }
    }

    fn logged_in() -> (Portal, Arc<RecordingRenderer>) {
        let (mut portal, renderer) = portal();
        portal.request_login("9876543210").unwrap();
        portal.confirm_otp("123456").unwrap();
        (portal, renderer)
    }

    #[tokio::test]
    async fn invalid_mobile_is_reported_and_changes_nothing() {
        let (mut portal, renderer) = portal();

        assert!(matches!(
            portal.request_login("12345"),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            portal.request_signup(signup("Asha", "98765432101", "a@x.com")),
            Err(ServiceError::Validation(_))
        ));

        assert_eq!(
            renderer.last_notification(),
            Some((
                NotificationKind::Error,
                "Please enter a valid 10-digit mobile number".to_string()
            ))
        );
        let status = portal.status().unwrap();
        assert_eq!(status.auth, AuthState::Anonymous);
        assert_eq!(status.view.modal, None);
    }

    #[tokio::test]
    async fn signup_and_otp_open_the_dashboard() {
        let (mut portal, renderer) = portal();

        portal
            .request_signup(signup("Asha", "9876543210", "a@x.com"))
            .unwrap();
        assert_eq!(
            portal.current_view().unwrap().modal,
            Some(Modal::Otp {
                mobile: "9876543210".to_string()
            })
        );

        let user = portal.confirm_otp("123456").unwrap();

        assert_eq!(
            portal.current_user().unwrap(),
            Some(User {
                name: "Asha".to_string(),
                mobile: "9876543210".to_string(),
                email: "a@x.com".to_string(),
            })
        );
        assert_eq!(Some(user), portal.current_user().unwrap());
        assert_eq!(
            renderer.last_view(),
            Some(View {
                page: Page::Dashboard(DashboardSection::Overview),
                modal: None,
            })
        );
        assert_eq!(
            renderer.last_notification(),
            Some((NotificationKind::Success, "Login successful!".to_string()))
        );
    }

    #[tokio::test]
    async fn incomplete_otp_keeps_the_otp_modal() {
        let (mut portal, _renderer) = portal();
        portal.request_login("9876543210").unwrap();

        assert!(portal.confirm_otp("12345").is_err());

        let status = portal.status().unwrap();
        assert!(matches!(status.auth, AuthState::OtpRequested { .. }));
        assert!(matches!(status.view.modal, Some(Modal::Otp { .. })));
    }

    #[tokio::test]
    async fn anonymous_plan_selection_redirects_to_login() {
        let (mut portal, renderer) = portal();

        assert!(matches!(
            portal.select_plan("299"),
            Err(ServiceError::AuthRequired(_))
        ));

        let status = portal.status().unwrap();
        assert_eq!(status.selected_plan, None);
        assert_eq!(status.view.modal, Some(Modal::Login));
        assert_eq!(status.view.page, Page::Marketing);
        assert_eq!(
            renderer.last_notification(),
            Some((NotificationKind::Error, "Please login to recharge".to_string()))
        );
    }

    #[tokio::test]
    async fn recharge_is_recorded_and_plan_consumed() {
        let (mut portal, renderer) = logged_in();

        portal.select_plan("599").unwrap();
        assert_eq!(
            portal.current_view().unwrap().modal,
            Some(Modal::Payment {
                mobile: "9876543210".to_string(),
                amount: "₹599".to_string(),
            })
        );

        let payment = portal.confirm_payment("upi").unwrap();
        assert_eq!(
            renderer.last_notification(),
            Some((
                NotificationKind::Info,
                "Processing payment via UPI...".to_string()
            ))
        );
        portal.complete_payment(payment).unwrap();

        let status = portal.status().unwrap();
        assert_eq!(status.history.len(), 1);
        assert_eq!(status.history[0].plan_label, "₹599");
        assert_eq!(status.history[0].amount, "₹599");
        assert_eq!(status.history[0].status, RechargeStatus::Success);
        assert_eq!(status.history[0].method, "upi");
        assert_eq!(status.selected_plan, None);
        assert_eq!(status.view.modal, None);

        assert!(matches!(
            portal.confirm_payment("upi"),
            Err(ServiceError::NoPlanSelected)
        ));
        assert_eq!(portal.status().unwrap().history.len(), 1);
    }

    #[tokio::test]
    async fn logout_during_processing_drops_the_payment() {
        let (mut portal, renderer) = logged_in();
        portal.select_plan("299").unwrap();
        let payment = portal.confirm_payment("card").unwrap();

        portal.logout().unwrap();

        assert!(matches!(
            portal.complete_payment(payment),
            Err(ServiceError::AuthRequired(_))
        ));
        assert!(portal.status().unwrap().history.is_empty());
        assert_eq!(portal.current_view().unwrap().modal, Some(Modal::Login));
        assert_eq!(
            renderer.last_notification().map(|(kind, _)| kind),
            Some(NotificationKind::Error)
        );
    }

    #[tokio::test]
    async fn history_survives_logout_and_relogin() {
        let (mut portal, _renderer) = logged_in();
        portal.select_plan("299").unwrap();
        let payment = portal.confirm_payment("upi").unwrap();
        portal.complete_payment(payment).unwrap();

        portal.logout().unwrap();
        let status = portal.status().unwrap();
        assert_eq!(status.auth, AuthState::Anonymous);
        assert_eq!(status.view.page, Page::Marketing);

        portal.request_login("9876543210").unwrap();
        portal.confirm_otp("654321").unwrap();
        assert_eq!(portal.status().unwrap().history.len(), 1);
    }

    #[tokio::test]
    async fn dashboard_shows_one_section_at_a_time() {
        let (mut portal, renderer) = logged_in();

        portal.show_section(DashboardSection::History).unwrap();
        assert_eq!(
            portal.current_view().unwrap().visible_regions(),
            vec!["dashboard", "history"]
        );
        assert!(matches!(
            renderer.calls().last(),
            Some(RenderCall::History(history)) if history.is_empty()
        ));

        portal.show_section(DashboardSection::Profile).unwrap();
        assert_eq!(
            portal.current_view().unwrap().page,
            Page::Dashboard(DashboardSection::Profile)
        );
    }

    #[tokio::test]
    async fn sections_need_a_session() {
        let (mut portal, _renderer) = portal();

        assert!(matches!(
            portal.show_section(DashboardSection::History),
            Err(ServiceError::AuthRequired(_))
        ));
        assert_eq!(portal.current_view().unwrap().page, Page::Marketing);
    }

    #[tokio::test]
    async fn profile_edit_keeps_the_mobile_number() {
        let (mut portal, _renderer) = logged_in();

        let user = portal
            .update_profile(ProfileUpdate {
                name: "Asha K".to_string(),
                email: "asha@x.com".to_string(),
            })
            .unwrap();

        assert_eq!(user.mobile, "9876543210");
        assert_eq!(portal.current_user().unwrap(), Some(user));
    }

    #[tokio::test]
    async fn recharge_number_parks_until_login() {
        let (mut portal, renderer) = portal();

        let target = portal.submit_recharge_number("9000000000").unwrap();

        assert_eq!(
            target,
            RechargeTarget::LoginRequired {
                mobile: "9000000000".to_string()
            }
        );
        assert_eq!(portal.current_view().unwrap().modal, Some(Modal::Login));
        assert_eq!(
            renderer.last_notification(),
            Some((NotificationKind::Info, "Please login to continue".to_string()))
        );

        portal.request_login("9876543210").unwrap();
        portal.confirm_otp("123456").unwrap();
        assert!(matches!(
            portal.submit_recharge_number("9000000000").unwrap(),
            RechargeTarget::Ready { .. }
        ));
        assert!(matches!(renderer.calls().last(), Some(RenderCall::FocusPlans)));
    }

    #[tokio::test]
    async fn saved_plans_need_a_session() {
        let (mut portal, _renderer) = portal();
        assert!(portal.save_plan("299").is_err());

        let (mut portal, renderer) = logged_in();
        assert!(portal.save_plan("299").unwrap());
        assert!(!portal.save_plan("299").unwrap());
        assert_eq!(
            renderer.last_notification().map(|(kind, _)| kind),
            Some(NotificationKind::Warning)
        );
        assert!(portal.remove_plan("299").unwrap());
        assert!(portal.status().unwrap().saved_plans.is_empty());
    }

    #[tokio::test]
    async fn plans_can_be_browsed_by_category() {
        let (portal, _renderer) = portal();

        assert_eq!(portal.browse_plans(None).len(), 2);
        let annual = portal.browse_plans(Some("Annual"));
        assert_eq!(annual.len(), 1);
        assert_eq!(annual[0].amount, "2999");
    }

    #[tokio::test]
    async fn persisted_user_resumes_on_start() {
        let local: SharedStore = Arc::new(MemoryStore::new());
        let renderer = RecordingRenderer::new();
        {
            let mut first = portal_with(renderer.clone(), local.clone());
            first.request_login("9876543210").unwrap();
            first.confirm_otp("123456").unwrap();
        }

        let renderer = RecordingRenderer::new();
        let mut second = portal_with(renderer.clone(), local);
        second.start().unwrap();

        assert_eq!(
            renderer.last_view().map(|view| view.page),
            Some(Page::Dashboard(DashboardSection::Overview))
        );
        assert!(renderer
            .calls()
            .iter()
            .any(|call| matches!(call, RenderCall::Profile(user) if user.mobile == "9876543210")));
    }

    #[tokio::test]
    async fn service_completes_payment_after_the_delay() {
        let renderer = RecordingRenderer::new();
        let portal = portal_with(renderer.clone(), Arc::new(MemoryStore::new()));
        let (tx, mut rx) = mpsc::channel(16);
        let handler = PortalRequestHandler::new(
            portal,
            ApiClient::new("https://api.jio.com/v1", Duration::from_millis(1)),
            Duration::from_millis(5),
            tx.downgrade(),
        );
        tokio::spawn(async move {
            PortalService::new().run(handler, &mut rx).await;
        });

        let (response, rx_login) = oneshot::channel();
        tx.send(PortalRequest::RequestLogin {
            mobile: "9876543210".to_string(),
            response,
        })
        .await
        .unwrap();
        rx_login.await.unwrap().unwrap();

        let (response, rx_otp) = oneshot::channel();
        tx.send(PortalRequest::ConfirmOtp {
            code: "123456".to_string(),
            response,
        })
        .await
        .unwrap();
        rx_otp.await.unwrap().unwrap();

        let (response, rx_select) = oneshot::channel();
        tx.send(PortalRequest::SelectPlan {
            amount: "599".to_string(),
            response,
        })
        .await
        .unwrap();
        rx_select.await.unwrap().unwrap();

        let (response, rx_pay) = oneshot::channel();
        tx.send(PortalRequest::ConfirmPayment {
            method: "upi".to_string(),
            response,
        })
        .await
        .unwrap();
        rx_pay.await.unwrap().unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        let (response, rx_status) = oneshot::channel();
        tx.send(PortalRequest::GetStatus { response }).await.unwrap();
        let status = rx_status.await.unwrap().unwrap();

        assert_eq!(status.history.len(), 1);
        assert_eq!(status.history[0].amount, "₹599");
        assert!(renderer
            .notifications()
            .contains(&(NotificationKind::Success, "OTP sent to 9876543210".to_string())));
        assert_eq!(
            renderer.last_notification(),
            Some((
                NotificationKind::Success,
                "Recharge successful! Your plan is now active.".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn resend_without_a_request_changes_nothing() {
        let (mut portal, renderer) = portal();
        let before = portal.status().unwrap();

        assert!(matches!(
            portal.resend_otp(),
            Err(ServiceError::NoPendingOtp)
        ));

        assert_eq!(
            renderer.last_notification(),
            Some((NotificationKind::Error, "Please request an OTP first".to_string()))
        );
        assert_eq!(portal.status().unwrap(), before);
    }

    #[tokio::test]
    async fn resend_keeps_the_pending_signup() {
        let (mut portal, _renderer) = portal();
        portal
            .request_signup(signup("Asha", "9876543210", "a@x.com"))
            .unwrap();
        let before = portal.status().unwrap();

        assert_eq!(
            portal.resend_otp().unwrap(),
            OtpRequest {
                mobile: "9876543210".to_string(),
                signup: true,
            }
        );
        assert_eq!(portal.status().unwrap(), before);
    }

    #[tokio::test]
    async fn service_resend_notifies_again() {
        let renderer = RecordingRenderer::new();
        let portal = portal_with(renderer.clone(), Arc::new(MemoryStore::new()));
        let (tx, mut rx) = mpsc::channel(16);
        let handler = PortalRequestHandler::new(
            portal,
            ApiClient::new("https://api.jio.com/v1", Duration::from_millis(1)),
            Duration::from_millis(5),
            tx.downgrade(),
        );
        tokio::spawn(async move {
            PortalService::new().run(handler, &mut rx).await;
        });

        let (response, rx_signup) = oneshot::channel();
        tx.send(PortalRequest::RequestSignup {
            signup: signup("Asha", "9876543210", "a@x.com"),
            response,
        })
        .await
        .unwrap();
        rx_signup.await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (response, rx_resend) = oneshot::channel();
        tx.send(PortalRequest::ResendOtp { response }).await.unwrap();
        rx_resend.await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(
            renderer.notifications(),
            vec![
                (NotificationKind::Success, "OTP sent to 9876543210".to_string()),
                (NotificationKind::Success, "OTP sent successfully!".to_string()),
            ]
        );

        let (response, rx_status) = oneshot::channel();
        tx.send(PortalRequest::GetStatus { response }).await.unwrap();
        let status = rx_status.await.unwrap().unwrap();
        assert!(matches!(
            status.auth,
            AuthState::OtpRequested { signup: Some(_), .. }
        ));
    }

    #[tokio::test]
    async fn logout_drops_the_selected_plan() {
        let (mut portal, _renderer) = logged_in();
        portal.select_plan("299").unwrap();
        assert_eq!(portal.status().unwrap().selected_plan.as_deref(), Some("299"));

        portal.logout().unwrap();

        assert_eq!(portal.status().unwrap().selected_plan, None);
    }

    #[tokio::test]
    async fn login_while_logged_in_is_rejected() {
        let (mut portal, renderer) = logged_in();
        let user = portal.current_user().unwrap();

        assert!(matches!(
            portal.request_login("2222222222"),
            Err(ServiceError::AlreadyLoggedIn)
        ));
        assert!(matches!(
            portal.request_signup(signup("Ravi", "2222222222", "r@x.com")),
            Err(ServiceError::AlreadyLoggedIn)
        ));

        let status = portal.status().unwrap();
        assert_eq!(portal.current_user().unwrap(), user);
        assert!(!status.pending_auth);
        assert_eq!(status.view.modal, None);
        assert_eq!(
            renderer.last_notification(),
            Some((NotificationKind::Error, "You are already logged in".to_string()))
        );
    }

    #[tokio::test]
    async fn parked_recharge_number_shows_in_status() {
        let (mut portal, _renderer) = portal();
        assert!(!portal.status().unwrap().pending_auth);

        portal.submit_recharge_number("9000000000").unwrap();
        assert!(portal.status().unwrap().pending_auth);

        portal.request_login("9876543210").unwrap();
        portal.confirm_otp("123456").unwrap();
        assert!(!portal.status().unwrap().pending_auth);
    }
}
