use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Theme;
use crate::config::{DialogAction, KeyResolver};
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackEvent {
    Dismissed,
}

/// Stand-in for a modal whose content failed to render.
///
/// Offers nothing but a way out; dismissing it unmounts the broken instance.
pub struct FallbackView {
    message: String,
    resolver: Arc<KeyResolver>,
}

impl FallbackView {
    pub fn new(message: impl Into<String>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            message: message.into(),
            resolver,
        }
    }
}

impl Component for FallbackView {
    type Output = FallbackEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_dialog(&key, DialogAction::Dismiss) {
            return Ok(FallbackEvent::Dismissed.into());
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = area.centered(Constraint::Percentage(60), Constraint::Length(8));

        frame.render_widget(Clear, popup_area);

        let title_style = Style::default()
            .fg(theme.error())
            .add_modifier(Modifier::BOLD);
        let message_style = Style::default().fg(theme.text());
        let hint_style = Style::default().fg(theme.overlay1());
        let hint = format!(
            "Press {} to close",
            self.resolver.display_dialog(DialogAction::Dismiss)
        );

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("This dialog could not be displayed.", message_style)),
            Line::from(Span::styled(self.message.clone(), hint_style)),
            Line::from(""),
            Line::from(Span::styled(hint, hint_style)),
        ];

        let block = Block::default()
            .title(" Error ")
            .title_style(title_style)
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.error()))
            .style(Style::default().bg(theme.base()));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::a11y::test_resolver;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_dismiss_keys() {
        let mut view = FallbackView::new("boom", test_resolver());
        for code in [KeyCode::Enter, KeyCode::Esc] {
            let result = view.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
            assert_eq!(result, EventResult::Event(FallbackEvent::Dismissed));
        }
        let result = view
            .handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(result, EventResult::Consumed);
        assert_eq!(view.message, "boom");
    }
}
