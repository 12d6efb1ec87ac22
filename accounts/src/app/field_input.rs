use accounts_core::{FieldKey, FieldValue};
use crossterm::event::{Event, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input, StateChanged};

/// A labeled text box for one form field. Keystrokes are tried against a
/// copy of the buffer and only kept if the field's type accepts the result.
#[derive(Debug)]
pub struct FieldInput {
    /// Which field this is; decides the label and the filter
    key: FieldKey,

    /// What's typed so far, and where the cursor is
    input: Input,
}

impl FieldInput {
    pub fn new(key: FieldKey, value: Option<&FieldValue>) -> Self {
        Self {
            key,
            input: Input::new(display(value)),
        }
    }

    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Replace the buffer with a value the page set itself.
    pub fn load(&mut self, value: Option<&FieldValue>) {
        let text = display(value);
        if text != self.input.value() {
            self.input = Input::new(text);
        }
    }

    /// Apply a keystroke. Returns the parsed value if the edit went through
    /// and changed the text; a rejected edit leaves the buffer untouched.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FieldValue> {
        let mut candidate = self.input.clone();

        match candidate.handle_event(&Event::Key(key)) {
            Some(StateChanged { value: true, .. }) => {
                let parsed = self.key.field_type().accept(candidate.value())?;
                self.input = candidate;
                Some(parsed)
            }
            Some(StateChanged { value: false, .. }) => {
                // only the cursor moved
                self.input = candidate;
                None
            }
            None => None,
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, focused: bool) {
        let width = area.width.saturating_sub(3); // -2 for the border, -1 for the cursor
        let scroll = self.input.visual_scroll(width as usize);

        let shown = if self.key.field_type().is_masked() {
            "*".repeat(self.value().chars().count())
        } else {
            self.value().to_string()
        };

        let border_style = if focused {
            Style::default().fg(Color::Blue)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let field = Paragraph::new(shown).scroll((0, scroll as u16)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(self.key.label())
                .border_style(border_style),
        );

        frame.render_widget(field, area);

        if focused {
            frame.set_cursor_position((
                area.x
                    + (self.input.visual_cursor().max(scroll) - scroll) as u16 // current end of text
                    + 1, // just past the border
                area.y + 1, // +1 row for the border/title
            ));
        }
    }
}

fn display(value: Option<&FieldValue>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}
