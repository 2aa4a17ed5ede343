use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInputEvent {
    Changed(String),
    Submitted(String),
}

/// Single-line inline text field.
///
/// The cursor is tracked in characters, so multi-byte input edits cleanly.
pub struct TextInput {
    value: String,
    cursor: usize,
    placeholder: Option<String>,
}

impl TextInput {
    pub const fn new() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    fn delete_char_before_cursor(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    fn delete_char_at_cursor(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    fn delete_word_before_cursor(&mut self) {
        let chars: Vec<char> = self.value.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1] == ' ' {
            pos -= 1;
        }
        while pos > 0 && chars[pos - 1] != ' ' {
            pos -= 1;
        }
        let (start, end) = (self.byte_index(pos), self.byte_index(self.cursor));
        self.value.drain(start..end);
        self.cursor = pos;
    }

    fn clear_line(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn changed(&self) -> EventResult<TextInputEvent> {
        TextInputEvent::Changed(self.value.clone()).into()
    }

    /// The field as a single line, with a block cursor when focused.
    pub fn line(&self, focused: bool, theme: &Theme) -> Line<'static> {
        let input_style = Style::default().fg(theme.text());
        let placeholder_style = Style::default().fg(theme.overlay0());
        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.text())
            .add_modifier(Modifier::BOLD);

        if self.value.is_empty() {
            let placeholder = self.placeholder.clone().unwrap_or_default();
            return if focused {
                Line::from(vec![
                    Span::styled(" ", cursor_style),
                    Span::styled(placeholder, placeholder_style),
                ])
            } else {
                Line::from(Span::styled(placeholder, placeholder_style))
            };
        }

        if !focused {
            return Line::from(Span::styled(self.value.clone(), input_style));
        }

        let before: String = self.value.chars().take(self.cursor).collect();
        let at = self.value.chars().nth(self.cursor).unwrap_or(' ');
        let after: String = self.value.chars().skip(self.cursor + 1).collect();
        Line::from(vec![
            Span::styled(before, input_style),
            Span::styled(at.to_string(), cursor_style),
            Span::styled(after, input_style),
        ])
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for TextInput {
    type Output = TextInputEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => TextInputEvent::Submitted(self.value.clone()).into(),

            (KeyCode::Backspace, KeyModifiers::ALT) => {
                self.delete_word_before_cursor();
                self.changed()
            }
            (KeyCode::Backspace, _) => {
                self.delete_char_before_cursor();
                self.changed()
            }
            (KeyCode::Delete, _) => {
                self.delete_char_at_cursor();
                self.changed()
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.clear_line();
                self.changed()
            }

            (KeyCode::Left, _) => {
                self.cursor = self.cursor.saturating_sub(1);
                EventResult::Consumed
            }
            (KeyCode::Right, _) => {
                self.cursor = (self.cursor + 1).min(self.len());
                EventResult::Consumed
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                EventResult::Consumed
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.len();
                EventResult::Consumed
            }

            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                self.changed()
            }

            _ => EventResult::Ignored,
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Paragraph::new(self.line(true, theme)), area);
    }
}
