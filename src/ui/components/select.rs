use std::fmt::Display;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::config::{KeyResolver, NavAction};
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEvent<T> {
    Changed(Option<T>),
}

/// Inline option cycler with an empty "nothing chosen yet" position.
pub struct Select<T: Display + Clone> {
    options: Vec<T>,
    selected: Option<usize>,
    placeholder: String,
    resolver: Arc<KeyResolver>,
}

impl<T: Display + Clone> Select<T> {
    pub fn new(options: Vec<T>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            options,
            selected: None,
            placeholder: "Select...".to_string(),
            resolver,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn value(&self) -> Option<&T> {
        self.selected.and_then(|i| self.options.get(i))
    }

    /// Step through `[none, first, .., last]`, wrapping at both ends.
    fn step(&mut self, forward: bool) {
        let count = self.options.len();
        if count == 0 {
            return;
        }
        self.selected = match (self.selected, forward) {
            (None, true) => Some(0),
            (None, false) => Some(count - 1),
            (Some(i), true) if i + 1 == count => None,
            (Some(i), true) => Some(i + 1),
            (Some(0), false) => None,
            (Some(i), false) => Some(i - 1),
        };
    }

    pub fn line(&self, focused: bool, theme: &Theme) -> Line<'static> {
        let (text, color) = self.value().map_or_else(
            || (self.placeholder.clone(), theme.overlay0()),
            |value| (value.to_string(), theme.text()),
        );
        let arrow_style = Style::default().fg(if focused {
            theme.peach()
        } else {
            theme.overlay1()
        });
        let mut value_style = Style::default().fg(color);
        if focused {
            value_style = value_style.add_modifier(Modifier::BOLD);
        }

        Line::from(vec![
            Span::styled("‹ ", arrow_style),
            Span::styled(text, value_style),
            Span::styled(" ›", arrow_style),
        ])
    }
}

impl<T: Display + Clone> Component for Select<T> {
    type Output = SelectEvent<T>;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let forward = if key.code == KeyCode::Right || self.resolver.matches_nav(&key, NavAction::Down) {
            true
        } else if key.code == KeyCode::Left || self.resolver.matches_nav(&key, NavAction::Up) {
            false
        } else {
            return Ok(EventResult::Ignored);
        };

        self.step(forward);
        Ok(SelectEvent::Changed(self.value().cloned()).into())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Paragraph::new(self.line(true, theme)), area);
    }
}
