use super::{
    form::{Control, FormEvent, FormView},
    submission::Phase,
    toast::Toast,
    Call, Effect, MountId, Reaction, Route,
};
use accounts_core::{api::ApiResponse, FieldKey, FieldValue, FormData, FormMode, Session};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};
use reqwest::StatusCode;
use std::time::Duration;

/// How long to leave "Account created" on screen before going to login.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(500);

/// The fields a details response fills in. The password never comes back.
const DETAIL_FIELDS: [FieldKey; 4] = [
    FieldKey::FirstName,
    FieldKey::LastName,
    FieldKey::Phone,
    FieldKey::Email,
];

/// The home page: creates an account when logged out, edits it when
/// logged in.
#[derive(Debug)]
pub struct RegisterPage {
    mount: MountId,

    /// Read once when the page is shown. Decides the mode for the whole visit.
    token: Option<String>,

    form: FormData,
    view: FormView,
    phase: Phase,
}

impl RegisterPage {
    /// Show the page, along with the details fetch to kick off. An empty
    /// stored token counts as logged out.
    pub fn mount(mount: MountId, token: Option<String>) -> (Self, Effect) {
        let token = token.filter(|token| !token.is_empty());
        let form = FormData::blank(FormMode::Registration);
        let extra = if token.is_some() {
            Control::Logout
        } else {
            Control::LoginLink
        };

        let fetch = Effect::FetchDetails {
            mount,
            token: token.clone().unwrap_or_default(),
        };

        let page = Self {
            mount,
            token,
            view: FormView::new(FormMode::Registration, &[extra], &form),
            form,
            phase: Phase::Loading,
        };

        (page, fetch)
    }

    fn is_update(&self) -> bool {
        self.token.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent, session: &dyn Session) -> Reaction {
        if self.phase.is_busy() {
            return Reaction::default();
        }

        match self.view.handle_key(key) {
            Some(FormEvent::Changed(field, value)) => {
                self.form.set(field, value);
                Reaction::default()
            }
            Some(FormEvent::Pressed(Control::Submit)) => self.submit(),
            Some(FormEvent::Pressed(Control::Logout)) => match session.clear() {
                Ok(()) => {
                    tracing::info!("logged out");
                    Reaction::navigate(Route::Login)
                }
                Err(err) => {
                    tracing::error!(?err, "could not clear session");
                    Reaction::toast(Toast::error(format!("Could not log out: {err}")))
                }
            },
            Some(FormEvent::Pressed(Control::LoginLink)) => Reaction::navigate(Route::Login),
            Some(FormEvent::Pressed(other)) => {
                tracing::debug!(?other, "control has no meaning on the account page");
                Reaction::default()
            }
            None => Reaction::default(),
        }
    }

    fn submit(&mut self) -> Reaction {
        if let Err(invalid) = self.form.validate(FormMode::Registration) {
            tracing::debug!(field = ?invalid.field, problem = ?invalid.problem, "account form not ready");
            self.view.focus_field(invalid.field);
            return Reaction::toast(Toast::error(invalid.to_string()));
        }

        if !self.phase.begin_submit() {
            tracing::warn!(phase = ?self.phase, "ignoring account submit while busy");
            return Reaction::default();
        }

        let form = self.form.clone();
        Reaction::effect(match &self.token {
            Some(token) => Effect::Update {
                mount: self.mount,
                form,
                token: token.clone(),
            },
            None => Effect::Register {
                mount: self.mount,
                form,
            },
        })
    }

    pub fn handle_response(&mut self, call: Call, response: &ApiResponse) -> Reaction {
        self.phase.finish();

        match call {
            Call::Details => {
                match response {
                    ApiResponse::Success { status, data } if *status == StatusCode::OK => {
                        self.form.fill_from_json(&DETAIL_FIELDS, data);
                        self.view.load(&self.form);
                    }
                    _ => tracing::info!(status = ?response.status(), "no account details to show"),
                }

                Reaction::default()
            }

            Call::Register | Call::Update => match response {
                ApiResponse::Success { status, .. } if *status == StatusCode::OK => {
                    self.form.set(FieldKey::Password, FieldValue::empty());
                    self.view.load(&self.form);

                    Reaction::toast(Toast::success("Account updated successfully!"))
                }
                ApiResponse::Success { status, .. } if *status == StatusCode::CREATED => {
                    Reaction::toast(Toast::success("Account created successfully!")).and_effect(
                        Effect::NavigateAfter {
                            mount: self.mount,
                            route: Route::Login,
                            delay: REDIRECT_DELAY,
                        },
                    )
                }
                _ => Reaction::from_failure(response),
            },

            Call::Login => {
                tracing::debug!(?call, "account page ignoring unexpected response");
                Reaction::default()
            }
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let [heading_area, hint_area, body_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .areas(area);

        let heading = if self.is_update() {
            "Update Account"
        } else {
            "Create Account"
        };
        frame.render_widget(
            Paragraph::new(heading).style(Style::default().add_modifier(Modifier::BOLD)),
            heading_area,
        );

        if !self.is_update() {
            frame.render_widget(
                Paragraph::new("Already have an account? Press Login below.")
                    .style(Style::default().fg(Color::DarkGray)),
                hint_area,
            );
        }

        match self.phase {
            Phase::Loading => frame.render_widget(Paragraph::new("Loading…"), body_area),
            Phase::Submitting => frame.render_widget(Paragraph::new("Saving…"), body_area),
            Phase::Idle => self.view.render(frame, body_area),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use accounts_core::session::MemorySession;
    use crossterm::event::{KeyCode, KeyModifiers};
    use serde_json::json;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn respond(status: StatusCode, body: &serde_json::Value) -> ApiResponse {
        ApiResponse::classify(status, body.to_string().as_bytes())
    }

    fn loaded(token: Option<&str>) -> RegisterPage {
        let (mut page, _) = RegisterPage::mount(MountId::first(), token.map(str::to_string));
        page.handle_response(Call::Details, &respond(StatusCode::UNAUTHORIZED, &json!({})));
        page
    }

    fn fill(page: &mut RegisterPage) {
        page.form.set(FieldKey::FirstName, FieldValue::Text("Ann".to_string()));
        page.form.set(FieldKey::LastName, FieldValue::Text("Lee".to_string()));
        page.form.set(FieldKey::Phone, FieldValue::Number(5_551_234.0));
        page.form
            .set(FieldKey::Email, FieldValue::Text("ann@example.com".to_string()));
        page.form
            .set(FieldKey::Password, FieldValue::Text("hunter2".to_string()));
        page.view.load(&page.form);
    }

    #[test]
    fn mount_fetches_with_stored_token() {
        let (page, effect) = RegisterPage::mount(MountId::first(), Some("abc".to_string()));

        assert!(matches!(effect, Effect::FetchDetails { token, .. } if token == "abc"));
        assert_eq!(page.phase, Phase::Loading);
        assert!(page.is_update());
    }

    #[test]
    fn mount_fetches_with_empty_token_when_logged_out() {
        let (page, effect) = RegisterPage::mount(MountId::first(), None);

        assert!(matches!(effect, Effect::FetchDetails { token, .. } if token.is_empty()));
        assert!(!page.is_update());
    }

    #[test]
    fn empty_stored_token_means_create_mode() {
        let (mut page, effect) = RegisterPage::mount(MountId::first(), Some(String::new()));

        assert!(matches!(effect, Effect::FetchDetails { token, .. } if token.is_empty()));
        assert!(!page.is_update());

        page.handle_response(Call::Details, &respond(StatusCode::UNAUTHORIZED, &json!({})));
        fill(&mut page);
        let reaction = page.handle_key(press(KeyCode::Enter), &MemorySession::new());

        assert!(matches!(reaction.effects.as_slice(), [Effect::Register { .. }]));
    }

    #[test]
    fn keys_are_ignored_while_loading() {
        let (mut page, _) = RegisterPage::mount(MountId::first(), None);

        let reaction = page.handle_key(press(KeyCode::Enter), &MemorySession::new());

        assert!(reaction.effects.is_empty());
        assert_eq!(page.phase, Phase::Loading);
    }

    #[test]
    fn details_fill_everything_but_password() {
        let (mut page, _) = RegisterPage::mount(MountId::first(), Some("abc".to_string()));

        page.handle_response(
            Call::Details,
            &respond(
                StatusCode::OK,
                &json!({
                    "first_name": "Ann",
                    "last_name": "Lee",
                    "phone": 5_551_234,
                    "email": "ann@example.com",
                    "password": "hash",
                }),
            ),
        );

        assert_eq!(page.phase, Phase::Idle);
        assert_eq!(
            page.form.get(FieldKey::FirstName),
            Some(&FieldValue::Text("Ann".to_string()))
        );
        assert_eq!(
            page.form.get(FieldKey::Phone),
            Some(&FieldValue::Number(5_551_234.0))
        );
        assert_eq!(page.form.get(FieldKey::Password), Some(&FieldValue::empty()));
    }

    #[test]
    fn failed_fetch_leaves_empty_form() {
        let page = loaded(None);

        assert_eq!(page.phase, Phase::Idle);
        assert_eq!(page.form, FormData::blank(FormMode::Registration));
    }

    #[test]
    fn submit_registers_when_logged_out() {
        let mut page = loaded(None);
        fill(&mut page);

        let reaction = page.handle_key(press(KeyCode::Enter), &MemorySession::new());

        assert!(matches!(reaction.effects.as_slice(), [Effect::Register { .. }]));
        assert_eq!(page.phase, Phase::Submitting);
    }

    #[test]
    fn submit_updates_when_logged_in() {
        let mut page = loaded(Some("abc"));
        fill(&mut page);

        let reaction = page.handle_key(press(KeyCode::Enter), &MemorySession::new());

        assert!(matches!(
            reaction.effects.as_slice(),
            [Effect::Update { token, .. }] if token == "abc"
        ));
    }

    #[test]
    fn created_toasts_then_redirects_later() {
        let mut page = loaded(None);
        fill(&mut page);
        page.handle_key(press(KeyCode::Enter), &MemorySession::new());

        let reaction = page.handle_response(Call::Register, &respond(StatusCode::CREATED, &json!({})));

        assert_eq!(
            reaction.toast.map(|toast| toast.text),
            Some("Account created successfully!".to_string())
        );
        assert_eq!(reaction.navigate, None);
        assert!(matches!(
            reaction.effects.as_slice(),
            [Effect::NavigateAfter { route: Route::Login, delay, .. }] if *delay == REDIRECT_DELAY
        ));
    }

    #[test]
    fn updated_clears_only_password() {
        let mut page = loaded(Some("abc"));
        let session = MemorySession::new();
        fill(&mut page);
        page.handle_key(press(KeyCode::Enter), &session);

        let reaction = page.handle_response(Call::Update, &respond(StatusCode::OK, &json!({})));

        assert_eq!(
            reaction.toast.map(|toast| toast.text),
            Some("Account updated successfully!".to_string())
        );
        assert_eq!(page.form.get(FieldKey::Password), Some(&FieldValue::empty()));
        assert_eq!(
            page.form.get(FieldKey::FirstName),
            Some(&FieldValue::Text("Ann".to_string()))
        );
        assert!(reaction.effects.is_empty());
        assert_eq!(reaction.navigate, None);
    }

    #[test]
    fn failed_submit_shows_first_error_and_keeps_form() {
        let mut page = loaded(None);
        let session = MemorySession::new();
        fill(&mut page);
        page.handle_key(press(KeyCode::Enter), &session);

        let reaction = page.handle_response(
            Call::Register,
            &respond(StatusCode::BAD_REQUEST, &json!({"email": ["This field is required."]})),
        );

        assert_eq!(
            reaction.toast.map(|toast| toast.text),
            Some("This field is required.".to_string())
        );
        assert_eq!(page.phase, Phase::Idle);
        assert_eq!(
            page.form.get(FieldKey::FirstName),
            Some(&FieldValue::Text("Ann".to_string()))
        );
    }

    #[test]
    fn unparseable_phone_is_refused_before_sending() {
        let mut page = loaded(None);
        fill(&mut page);
        page.form.set(FieldKey::Phone, FieldValue::Number(f64::NAN));

        let reaction = page.handle_key(press(KeyCode::Enter), &MemorySession::new());

        assert!(reaction.effects.is_empty());
        assert_eq!(
            reaction.toast.map(|toast| toast.text),
            Some("Phone: Please enter a number.".to_string())
        );
        assert_eq!(page.view.focused(), Control::Field(FieldKey::Phone));
        assert_eq!(page.phase, Phase::Idle);
    }

    #[test]
    fn blank_form_focuses_first_name() {
        let mut page = loaded(None);
        page.handle_key(press(KeyCode::Down), &MemorySession::new());
        page.handle_key(press(KeyCode::Down), &MemorySession::new());

        let reaction = page.submit();

        assert!(reaction.effects.is_empty());
        assert_eq!(page.view.focused(), Control::Field(FieldKey::FirstName));
        assert_eq!(
            reaction.toast.map(|toast| toast.text),
            Some("First Name: Please fill out this field.".to_string())
        );
    }

    #[test]
    fn logout_clears_session_and_goes_to_login() {
        let mut page = loaded(Some("abc"));
        let session = MemorySession::with_token("abc");
        session.insert("other", "entry");

        page.handle_key(press(KeyCode::Up), &session);
        let reaction = page.handle_key(press(KeyCode::Enter), &session);

        assert!(session.is_empty());
        assert_eq!(reaction.navigate, Some(Route::Login));
    }

    #[test]
    fn login_link_goes_to_login() {
        let mut page = loaded(None);
        let session = MemorySession::new();

        page.handle_key(press(KeyCode::Up), &session);
        let reaction = page.handle_key(press(KeyCode::Enter), &session);

        assert_eq!(reaction.navigate, Some(Route::Login));
    }
}
