use std::sync::Arc;

use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use tracing::trace;

use crate::Theme;
use crate::a11y::BackgroundHost;
use crate::config::{DialogAction, GlobalAction, KeyResolver, NavAction};
use crate::form::Application;
use crate::ui::{Component, EventResult, Result};

const OPEN_BUTTON: &str = "open-button";
const HISTORY: &str = "history";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherEvent {
    Open,
}

/// One finished modal, submitted or cancelled.
#[derive(Debug, Clone)]
pub struct Submission {
    pub at: DateTime<Local>,
    pub application: Option<Application>,
}

/// The page behind the modal.
///
/// Owns the outside focus (the open button or the history list) and the history
/// scroll position, which stays frozen while any modal holds a scroll lock.
pub struct Launcher {
    resolver: Arc<KeyResolver>,
    history: Vec<Submission>,
    focused: &'static str,
    scroll: u16,
    scroll_locks: u32,
}

impl Launcher {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            resolver,
            history: Vec::new(),
            focused: OPEN_BUTTON,
            scroll: 0,
            scroll_locks: 0,
        }
    }

    /// Append a finished modal to the history.
    pub fn record(&mut self, application: Option<Application>) {
        self.history.push(Submission {
            at: Local::now(),
            application,
        });
    }

    pub const fn is_scroll_locked(&self) -> bool {
        self.scroll_locks > 0
    }

    /// Elements that can hold focus right now; the history only exists once filled.
    fn elements(&self) -> &'static [&'static str] {
        if self.history.is_empty() {
            &[OPEN_BUTTON]
        } else {
            &[OPEN_BUTTON, HISTORY]
        }
    }

    fn toggle_focus(&mut self) {
        let elements = self.elements();
        let index = elements.iter().position(|e| *e == self.focused).unwrap_or(0);
        self.focused = elements[(index + 1) % elements.len()];
    }

    fn scroll_history(&mut self, delta: i32) {
        if self.is_scroll_locked() {
            return;
        }
        let max = i32::try_from(self.history.len().saturating_sub(1)).unwrap_or(i32::MAX);
        let next = (i32::from(self.scroll) + delta).clamp(0, max);
        self.scroll = u16::try_from(next).unwrap_or(u16::MAX);
    }

    fn history_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        if self.history.is_empty() {
            return vec![Line::from(Span::styled(
                "No applications yet.",
                Style::default().fg(theme.overlay0()),
            ))];
        }

        self.history
            .iter()
            .rev()
            .map(|entry| {
                let time = Span::styled(
                    entry.at.format("%H:%M:%S ").to_string(),
                    Style::default().fg(theme.yellow()),
                );
                let detail = entry.application.as_ref().map_or_else(
                    || Span::styled("cancelled", Style::default().fg(theme.overlay1())),
                    |application| {
                        Span::styled(
                            format!(
                                "{} <{}> · {}",
                                application.name, application.email, application.experience
                            ),
                            Style::default().fg(theme.text()),
                        )
                    },
                );
                Line::from(vec![time, detail])
            })
            .collect()
    }
}

impl BackgroundHost for Launcher {
    fn active_element(&self) -> Option<String> {
        Some(self.focused.to_string())
    }

    fn contains(&self, element: &str) -> bool {
        self.elements().iter().any(|e| *e == element)
    }

    fn restore_focus(&mut self, element: &str) {
        if let Some(found) = self.elements().iter().find(|e| **e == element) {
            trace!(element, "Focus restored");
            self.focused = *found;
        }
    }

    fn lock_scroll(&mut self) {
        self.scroll_locks += 1;
    }

    fn unlock_scroll(&mut self) {
        self.scroll_locks = self.scroll_locks.saturating_sub(1);
    }
}

impl Component for Launcher {
    type Output = LauncherEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if self.resolver.matches_dialog(&key, DialogAction::FocusNext)
            || self.resolver.matches_dialog(&key, DialogAction::FocusPrev)
        {
            self.toggle_focus();
            return Ok(EventResult::Consumed);
        }

        if self.focused == OPEN_BUTTON {
            if self.resolver.matches_nav(&key, NavAction::Select) {
                return Ok(LauncherEvent::Open.into());
            }
            return Ok(EventResult::Ignored);
        }

        let delta = if self.resolver.matches_nav(&key, NavAction::Down) {
            1
        } else if self.resolver.matches_nav(&key, NavAction::Up) {
            -1
        } else if self.resolver.matches_nav(&key, NavAction::PageDown) {
            10
        } else if self.resolver.matches_nav(&key, NavAction::PageUp) {
            -10
        } else {
            return Ok(EventResult::Ignored);
        };
        self.scroll_history(delta);
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(
            Block::default().style(Style::default().bg(theme.base())),
            area,
        );

        let [header, button, history, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(
                " lazyform",
                Style::default()
                    .fg(theme.primary())
                    .add_modifier(Modifier::BOLD),
            )),
            header,
        );

        let button_style = if self.focused == OPEN_BUTTON {
            Style::default()
                .fg(theme.base())
                .bg(theme.primary())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text()).bg(theme.surface0())
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw(" "),
                Span::styled(" Open application form ", button_style),
            ])),
            button,
        );

        let border = if self.focused == HISTORY {
            theme.border_focused()
        } else {
            theme.border()
        };
        let block = Block::default()
            .title(format!(" History ({}) ", self.history.len()))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(border));
        frame.render_widget(
            Paragraph::new(self.history_lines(theme))
                .block(block)
                .scroll((self.scroll, 0)),
            history,
        );

        let hint = format!(
            " {} open · {} switch · {} quit",
            self.resolver.display_global(GlobalAction::Open),
            self.resolver.display_dialog(DialogAction::FocusNext),
            self.resolver.display_global(GlobalAction::Quit),
        );
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(theme.overlay1()))),
            footer,
        );
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::a11y::test_resolver;
    use crate::form::validation::Experience;

    fn press(launcher: &mut Launcher, code: KeyCode) -> EventResult<LauncherEvent> {
        launcher
            .handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn application(name: &str) -> Application {
        Application {
            name: name.to_string(),
            email: "a@b.com".to_string(),
            experience: Experience::FourToSeven,
            github: None,
        }
    }

    #[test]
    fn test_enter_on_button_opens() {
        let mut launcher = Launcher::new(test_resolver());
        assert_eq!(press(&mut launcher, KeyCode::Enter), EventResult::Event(LauncherEvent::Open));
    }

    #[test]
    fn test_history_is_focusable_once_filled() {
        let mut launcher = Launcher::new(test_resolver());
        press(&mut launcher, KeyCode::Tab);
        assert_eq!(launcher.active_element().as_deref(), Some(OPEN_BUTTON));
        assert!(!launcher.contains(HISTORY));

        launcher.record(Some(application("A")));
        launcher.record(None);
        press(&mut launcher, KeyCode::Tab);
        assert_eq!(launcher.active_element().as_deref(), Some(HISTORY));
        assert_eq!(press(&mut launcher, KeyCode::Enter), EventResult::Ignored);
    }

    #[test]
    fn test_scroll_lock_nests() {
        let mut launcher = Launcher::new(test_resolver());
        for name in ["A", "B", "C"] {
            launcher.record(Some(application(name)));
        }
        launcher.restore_focus(HISTORY);

        launcher.lock_scroll();
        launcher.lock_scroll();
        press(&mut launcher, KeyCode::Down);
        assert_eq!(launcher.scroll, 0);

        launcher.unlock_scroll();
        assert!(launcher.is_scroll_locked());
        launcher.unlock_scroll();
        press(&mut launcher, KeyCode::Down);
        press(&mut launcher, KeyCode::PageDown);
        assert_eq!(launcher.scroll, 2);
    }

    #[test]
    fn test_restore_ignores_unknown_elements() {
        let mut launcher = Launcher::new(test_resolver());
        launcher.restore_focus(HISTORY);
        assert_eq!(launcher.active_element().as_deref(), Some(OPEN_BUTTON));
        assert!(launcher.history.is_empty());
    }
}
