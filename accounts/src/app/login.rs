use super::{
    form::{Control, FormEvent, FormView},
    submission::Phase,
    toast::Toast,
    Call, Effect, MountId, Reaction, Route,
};
use accounts_core::{
    api::{login, ApiResponse},
    FormData, FormMode, Session,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};
use reqwest::StatusCode;

/// Exchange an email and password for a token.
#[derive(Debug)]
pub struct LoginPage {
    mount: MountId,
    form: FormData,
    view: FormView,
    phase: Phase,
}

impl LoginPage {
    pub fn new(mount: MountId) -> Self {
        let form = FormData::blank(FormMode::Login);

        Self {
            mount,
            view: FormView::new(FormMode::Login, &[Control::Back], &form),
            form,
            phase: Phase::Idle,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Reaction {
        if key.code == KeyCode::Esc {
            return Reaction::navigate(Route::Home);
        }

        if self.phase.is_busy() {
            return Reaction::default();
        }

        match self.view.handle_key(key) {
            Some(FormEvent::Changed(field, value)) => {
                self.form.set(field, value);
                Reaction::default()
            }
            Some(FormEvent::Pressed(Control::Submit)) => self.submit(),
            Some(FormEvent::Pressed(Control::Back)) => Reaction::navigate(Route::Home),
            Some(FormEvent::Pressed(other)) => {
                tracing::debug!(?other, "control has no meaning on the login page");
                Reaction::default()
            }
            None => Reaction::default(),
        }
    }

    fn submit(&mut self) -> Reaction {
        if let Err(invalid) = self.form.validate(FormMode::Login) {
            tracing::debug!(field = ?invalid.field, problem = ?invalid.problem, "login form not ready");
            self.view.focus_field(invalid.field);
            return Reaction::toast(Toast::error(invalid.to_string()));
        }

        if !self.phase.begin_submit() {
            tracing::warn!(phase = ?self.phase, "ignoring login submit while busy");
            return Reaction::default();
        }

        Reaction::effect(Effect::Login {
            mount: self.mount,
            form: self.form.clone(),
        })
    }

    pub fn handle_response(
        &mut self,
        call: Call,
        response: &ApiResponse,
        session: &dyn Session,
    ) -> Reaction {
        if call != Call::Login {
            tracing::debug!(?call, "login page ignoring unexpected response");
            return Reaction::default();
        }

        self.phase.finish();

        match response {
            ApiResponse::Success { status, data } if *status == StatusCode::OK => {
                let token = data
                    .get(login::TOKEN_FIELD)
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default();

                match session.set_token(token) {
                    Ok(()) => Reaction::toast(Toast::success("Login successful!"))
                        .and_navigate(Route::Home),
                    Err(err) => {
                        tracing::error!(?err, "could not store token");
                        Reaction::toast(Toast::error(format!("Could not save session: {err}")))
                    }
                }
            }
            _ => Reaction::from_failure(response),
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let [heading_area, hint_area, body_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new("Login").style(Style::default().add_modifier(Modifier::BOLD)),
            heading_area,
        );
        frame.render_widget(
            Paragraph::new("Esc to go back").style(Style::default().fg(Color::DarkGray)),
            hint_area,
        );

        if self.phase.is_busy() {
            frame.render_widget(Paragraph::new("Logging in…"), body_area);
        } else {
            self.view.render(frame, body_area);
        }
    }
}
