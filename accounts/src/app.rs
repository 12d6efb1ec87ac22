mod action;
mod effect;
mod field_input;
mod form;
mod login;
mod register;
mod submission;
mod toast;

pub use action::{Action, Call};
pub use effect::{Effect, EffectContext};

use accounts_core::{api::ApiResponse, Session};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use login::LoginPage;
use ratatui::{
    layout::{Constraint, Layout, Margin},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use register::RegisterPage;
use std::{process::ExitCode, sync::Arc, time::Instant};
use toast::Toast;

/// Identifies one visit to a page. Every navigation gets a fresh one, so
/// anything still in flight for an old visit can be recognized and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

impl MountId {
    pub fn first() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// The places the app can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Create an account, or update it if we're logged in
    Home,

    /// Log in
    Login,
}

/// What a page wants done after handling something.
#[derive(Debug, Default)]
pub struct Reaction {
    pub effects: Vec<Effect>,
    pub toast: Option<Toast>,
    pub navigate: Option<Route>,
}

impl Reaction {
    fn effect(effect: Effect) -> Self {
        Self::default().and_effect(effect)
    }

    fn toast(toast: Toast) -> Self {
        Self {
            toast: Some(toast),
            ..Self::default()
        }
    }

    fn navigate(route: Route) -> Self {
        Self::default().and_navigate(route)
    }

    fn and_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    fn and_navigate(mut self, route: Route) -> Self {
        self.navigate = Some(route);
        self
    }

    /// Show the first thing the server complained about. If it didn't say
    /// anything we can show, the user gets no feedback and we only log it.
    fn from_failure(response: &ApiResponse) -> Self {
        match response.first_error() {
            Some(message) => Self::toast(Toast::error(message)),
            None => {
                match response {
                    ApiResponse::Transport(err) => tracing::warn!(?err, "request failed"),
                    _ => tracing::warn!(status = ?response.status(), "request failed without a message"),
                }

                Self::default()
            }
        }
    }
}

/// The "functional core" of the app.
pub struct App {
    /// Where the token lives
    session: Arc<dyn Session>,

    /// The current page visit
    mount: MountId,

    /// Where the app is in its lifecycle
    state: AppState,

    /// Feedback to display (visible at the bottom of the screen)
    toast: Option<Toast>,
}

impl App {
    /// Create a new instance of the app
    pub fn new(session: Arc<dyn Session>) -> Self {
        Self {
            session,
            mount: MountId::first(),
            state: AppState::Starting,
            toast: None,
        }
    }

    /// Produce any side effects as needed to initialize the app.
    pub fn init(&mut self) -> Vec<Effect> {
        self.navigate(Route::Home)
    }

    /// Render the app's UI to the screen
    pub fn render(&self, frame: &mut Frame<'_>) {
        let vertical = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]);
        let [body_area, status_area] = vertical.areas(frame.area());
        let body_area = body_area.inner(Margin::new(2, 1));

        match &self.state {
            AppState::Starting => frame.render_widget(Paragraph::new("Loading…"), body_area),
            AppState::Showing(Page::Login(page)) => page.render(frame, body_area),
            AppState::Showing(Page::Register(page)) => page.render(frame, body_area),
            AppState::Exiting(_) => frame.render_widget(Paragraph::new("Exiting…"), body_area),
        }

        match &self.toast {
            Some(toast) => frame.render_widget(toast.widget(), status_area),
            None => frame.render_widget(
                Paragraph::new("Tab/Shift-Tab: move  Enter: press  Ctrl-C: quit")
                    .style(Style::default().fg(Color::DarkGray)),
                status_area,
            ),
        }
    }

    /// Handle an `Action`, updating the app's state and producing some side effect(s)
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return vec![];
                }

                if is_quit(key) {
                    self.state = AppState::Exiting(ExitCode::SUCCESS);
                    return vec![];
                }

                let reaction = match &mut self.state {
                    AppState::Showing(Page::Login(page)) => page.handle_key(key),
                    AppState::Showing(Page::Register(page)) => {
                        page.handle_key(key, self.session.as_ref())
                    }
                    AppState::Starting | AppState::Exiting(_) => return vec![],
                };

                self.apply(reaction)
            }

            Action::Problem(problem) => {
                tracing::error!(%problem, "problem reported to the user");
                self.toast = Some(Toast::error(problem));

                vec![]
            }

            Action::TimePassed => {
                let now = Instant::now();
                if self.toast.as_ref().is_some_and(|toast| toast.is_expired(now)) {
                    self.toast = None;
                }

                vec![]
            }

            Action::Responded {
                mount,
                call,
                response,
            } => {
                if mount != self.mount {
                    tracing::debug!(?mount, current = ?self.mount, ?call, "dropping response for a page that is gone");
                    return vec![];
                }

                let reaction = match &mut self.state {
                    AppState::Showing(Page::Login(page)) => {
                        page.handle_response(call, &response, self.session.as_ref())
                    }
                    AppState::Showing(Page::Register(page)) => page.handle_response(call, &response),
                    AppState::Starting | AppState::Exiting(_) => return vec![],
                };

                self.apply(reaction)
            }

            Action::Navigate { mount, route } => {
                if mount != self.mount {
                    tracing::debug!(?mount, current = ?self.mount, ?route, "dropping navigation for a page that is gone");
                    return vec![];
                }

                self.navigate(route)
            }
        }
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        if let AppState::Exiting(code) = &self.state {
            Some(*code)
        } else {
            None
        }
    }

    fn apply(&mut self, reaction: Reaction) -> Vec<Effect> {
        if let Some(toast) = reaction.toast {
            self.toast = Some(toast);
        }

        let mut effects = reaction.effects;
        if let Some(route) = reaction.navigate {
            effects.extend(self.navigate(route));
        }

        effects
    }

    /// Leave the current page (cancelling whatever it still has running)
    /// and show a fresh one.
    fn navigate(&mut self, route: Route) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        if let AppState::Showing(_) = self.state {
            effects.push(Effect::Cancel(self.mount));
        }

        self.mount = self.mount.next();
        tracing::info!(?route, mount = ?self.mount, "navigating");

        let page = match route {
            Route::Home => {
                let (page, fetch) = RegisterPage::mount(self.mount, self.session.token());
                effects.push(fetch);
                Page::Register(page)
            }
            Route::Login => Page::Login(LoginPage::new(self.mount)),
        };
        self.state = AppState::Showing(page);

        effects
    }
}

fn is_quit(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// App lifecycle
#[derive(Debug)]
enum AppState {
    /// We haven't shown a page yet
    Starting,

    /// A page is on screen
    Showing(Page),

    /// We're done and want the following exit code
    Exiting(ExitCode),
}

#[derive(Debug)]
enum Page {
    Login(LoginPage),
    Register(RegisterPage),
}
