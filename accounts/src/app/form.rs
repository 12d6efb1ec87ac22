use super::field_input::FieldInput;
use accounts_core::{FieldKey, FieldValue, FormData, FormMode};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Something on the form that can take focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// An editable field
    Field(FieldKey),

    /// Send the form
    Submit,

    /// Leave the login page without logging in
    Back,

    /// Forget the session
    Logout,

    /// Go log in instead of creating an account
    LoginLink,
}

impl Control {
    fn label(self) -> &'static str {
        match self {
            Self::Field(key) => key.label(),
            Self::Submit => "Submit",
            Self::Back => "Back",
            Self::Logout => "Logout",
            Self::LoginLink => "Login",
        }
    }
}

/// What the form tells the page about a keystroke.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// A field took an edit; store this value under this key.
    Changed(FieldKey, FieldValue),

    /// A control was activated. Enter inside a field counts as `Submit`.
    Pressed(Control),
}

/// Renders the fields for a `FormMode` followed by a row of buttons, and
/// routes keystrokes to whichever of them has focus.
#[derive(Debug)]
pub struct FormView {
    inputs: Vec<FieldInput>,

    /// Always starts with `Submit`.
    buttons: Vec<Control>,

    /// Index into fields-then-buttons.
    focus: usize,
}

impl FormView {
    /// Build a form for `mode` showing `data`. `extra` buttons go after
    /// Submit, in order.
    pub fn new(mode: FormMode, extra: &[Control], data: &FormData) -> Self {
        let mut view = Self {
            inputs: mode
                .fields()
                .iter()
                .map(|key| FieldInput::new(*key, data.get(*key)))
                .collect(),
            buttons: Vec::new(),
            focus: 0,
        };
        view.set_buttons(extra);
        view
    }

    /// Re-sync every field buffer with form state the page wrote itself.
    pub fn load(&mut self, data: &FormData) {
        for input in &mut self.inputs {
            input.load(data.get(input.key()));
        }
    }

    /// Replace the buttons after Submit.
    fn set_buttons(&mut self, extra: &[Control]) {
        self.buttons = std::iter::once(Control::Submit)
            .chain(extra.iter().copied())
            .collect();
        self.focus = self.focus.min(self.len() - 1);
    }

    /// The control with focus.
    pub fn focused(&self) -> Control {
        match self.inputs.get(self.focus) {
            Some(input) => Control::Field(input.key()),
            None => self.buttons[self.focus - self.inputs.len()],
        }
    }

    /// Move focus to a field, e.g. one that still needs filling in. Does
    /// nothing if the form doesn't show that field.
    pub fn focus_field(&mut self, field: FieldKey) {
        if let Some(idx) = self.inputs.iter().position(|input| input.key() == field) {
            self.focus = idx;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormEvent> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.len();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.len() - 1) % self.len();
                None
            }
            KeyCode::Enter => match self.focused() {
                Control::Field(_) => Some(FormEvent::Pressed(Control::Submit)),
                button => Some(FormEvent::Pressed(button)),
            },
            _ => {
                let input = self.inputs.get_mut(self.focus)?;
                let value = input.handle_key(key)?;
                Some(FormEvent::Changed(input.key(), value))
            }
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut rows: Vec<Constraint> = self.inputs.iter().map(|_| Constraint::Length(3)).collect();
        rows.push(Constraint::Length(1));
        rows.push(Constraint::Min(0));

        let areas = Layout::vertical(rows).split(area);

        for (idx, input) in self.inputs.iter().enumerate() {
            input.render(frame, areas[idx], idx == self.focus);
        }

        let mut spans = Vec::with_capacity(self.buttons.len() * 2);
        for (idx, button) in self.buttons.iter().enumerate() {
            let style = if self.inputs.len() + idx == self.focus {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Blue)
            };
            spans.push(Span::styled(format!("[ {} ]", button.label()), style));
            spans.push(Span::raw(" "));
        }

        let buttons_area = areas[self.inputs.len()];
        frame.render_widget(Paragraph::new(Line::from(spans)), buttons_area);
    }

    fn len(&self) -> usize {
        self.inputs.len() + self.buttons.len()
    }
}
