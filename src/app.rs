use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use ratatui::layout::Rect;
use tracing::{debug, error, info, trace};

use crate::Theme;
use crate::a11y::MemoryStore;
use crate::cli::Args;
use crate::config::{AppConfig, GlobalAction, KeyResolver};
use crate::form::{Application, ModalForm};
use crate::modal::{HostContext, ModalHandle, ModalHost};
use crate::theme::theme_from_name;
use crate::tui::{Event, Tui};
use crate::ui::{Component, EventResult, Launcher, LauncherEvent, Toast, ToastManager};

pub struct App {
    resolver: Arc<KeyResolver>,
    theme: Theme,
    storage_key: Option<String>,
    open_on_start: bool,
    launcher: Launcher,
    modals: ModalHost<Application>,
    store: MemoryStore,
    /// Results of every modal that has not settled yet.
    pending: FuturesUnordered<ModalHandle<Application>>,
    toasts: ToastManager,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    pub fn new(config: &AppConfig, resolver: Arc<KeyResolver>, theme: Theme) -> Self {
        Self {
            launcher: Launcher::new(Arc::clone(&resolver)),
            modals: ModalHost::new(Arc::clone(&resolver), config.modal.exit_transition_ticks),
            resolver,
            theme,
            storage_key: config.modal.effective_storage_key(),
            open_on_start: false,
            store: MemoryStore::new(),
            pending: FuturesUnordered::new(),
            toasts: ToastManager::new(),
            should_quit: false,
            should_suspend: false,
        }
    }

    /// Apply command line overrides on top of the loaded config.
    pub fn apply_cli_args(&mut self, args: &Args) {
        if let Some(key) = &args.storage_key {
            self.storage_key = Some(key.clone());
        }
        if args.no_restore {
            self.storage_key = None;
        }
        if let Some(name) = &args.theme {
            self.theme = theme_from_name(name);
        }
        self.open_on_start = args.open;
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(60.0, 8.0)?;
        tui.enter()?;

        if self.open_on_start {
            self.open_form();
        }

        loop {
            tokio::select! {
                event = tui.next_event() => match event {
                    Some(event) => self.handle_event(&mut tui, event)?,
                    None => break,
                },
                Some(result) = self.pending.next(), if !self.pending.is_empty() => {
                    self.on_result(result)?;
                }
            }

            if self.should_suspend {
                tui.suspend()?;
                self.should_suspend = false;
                tui.resume()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) -> Result<()> {
        match event {
            Event::Quit => self.should_quit = true,
            Event::Tick => self.on_tick(),
            Event::Render => self.render(tui)?,
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            Event::Key(key) => self.handle_key(key)?,
            Event::Error(message) => error!(%message, "Terminal event error"),
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let mut cx = HostContext {
            store: &mut self.store,
            background: &mut self.launcher,
        };
        if self.modals.handle_key(key, &mut cx) {
            return Ok(());
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if self.resolver.matches_global(&key, GlobalAction::Suspend) {
            self.should_suspend = true;
        } else if self.resolver.matches_global(&key, GlobalAction::Open) {
            self.open_form();
        } else {
            let result = self.launcher.handle_key(key)?;
            if let EventResult::Event(LauncherEvent::Open) = result {
                self.open_form();
            } else if !result.is_consumed() {
                trace!(?key, "Unhandled key");
            }
        }
        Ok(())
    }

    fn open_form(&mut self) {
        let form = ModalForm::new(Arc::clone(&self.resolver));
        let nested = self.modals.is_active();
        let mut cx = HostContext {
            store: &mut self.store,
            background: &mut self.launcher,
        };
        let handle = self
            .modals
            .open(Box::new(form), self.storage_key.clone(), &mut cx);
        debug!(
            id = %handle.id(),
            tracked = self.modals.len(),
            nested,
            "Application form opened"
        );
        self.pending.push(handle);
    }

    fn on_result(&mut self, result: Option<Application>) -> Result<()> {
        match &result {
            Some(application) => {
                let json = serde_json::to_string(application)?;
                info!(application = %json, "Application submitted");
                self.toasts.show(Toast::success(format!(
                    "Thanks {}, we will be in touch",
                    application.name
                )));
            }
            None => {
                info!("Application form dismissed");
                self.toasts.show(Toast::info("Form closed without submitting"));
            }
        }
        self.launcher.record(result);
        Ok(())
    }

    fn on_tick(&mut self) {
        let mut cx = HostContext {
            store: &mut self.store,
            background: &mut self.launcher,
        };
        self.modals.on_tick(&mut cx);
        self.toasts.handle_tick();
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| {
            let area = frame.area();
            self.launcher.render(frame, area, &self.theme);
            self.modals.render(frame, area, &self.theme);
            self.toasts.render(frame, area, &self.theme);
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use futures::FutureExt;

    use super::*;
    use crate::a11y::{AccessibilityStore, BackgroundHost, test_resolver};
    use crate::form::validation::Experience;

    fn app() -> App {
        App::new(&AppConfig::default(), test_resolver(), Theme::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_submitted_form_reaches_history() {
        let mut app = app();
        press(&mut app, KeyCode::Char('o'));
        assert!(app.modals.is_active());
        assert!(app.launcher.is_scroll_locked());

        // Title first, then into the fields
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Ada");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "ada@example.com");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert!(!app.modals.is_active());
        assert!(!app.launcher.is_scroll_locked());
        assert_eq!(app.launcher.active_element().as_deref(), Some("open-button"));

        let result = app.pending.next().await.unwrap();
        let application = result.clone().unwrap();
        assert_eq!(application.name, "Ada");
        assert_eq!(application.experience, Experience::FourToSeven);
        app.on_result(result).unwrap();
        assert!(app.launcher.contains("history"));

        // Modal is still fading out; ticks finish it
        assert_eq!(app.modals.len(), 1);
        app.on_tick();
        app.on_tick();
        assert_eq!(app.modals.len(), 0);
    }

    #[tokio::test]
    async fn test_escape_cancels_after_transition() {
        let mut app = app();
        app.open_form();
        press(&mut app, KeyCode::Esc);
        assert!(app.pending.next().now_or_never().is_none());

        app.on_tick();
        app.on_tick();
        assert_eq!(app.pending.next().await, Some(None));
    }

    #[tokio::test]
    async fn test_reopen_restores_focused_field() {
        let mut app = app();
        app.open_form();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::PageDown);
        press(&mut app, KeyCode::Esc);

        let state = app.store.get("application-form").unwrap();
        assert_eq!(state.last_focused_field.as_deref(), Some("email"));
        assert_eq!(state.scroll_offset, 6);
        app.on_tick();
        app.on_tick();
        assert_eq!(app.pending.next().await, Some(None));

        // Typing right away lands in the email field
        app.open_form();
        type_str(&mut app, "ada@example.com");
        press(&mut app, KeyCode::BackTab);
        type_str(&mut app, "Ada");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        let application = app.pending.next().await.unwrap().unwrap();
        assert_eq!(application.name, "Ada");
        assert_eq!(application.email, "ada@example.com");

        // The restored offset was written back unchanged on close
        let state = app.store.get("application-form").unwrap();
        assert_eq!(state.scroll_offset, 6);
    }

    #[test]
    fn test_cli_overrides() {
        let mut app = app();
        app.apply_cli_args(&Args {
            storage_key: Some("custom".into()),
            open: true,
            ..Args::default()
        });
        assert_eq!(app.storage_key.as_deref(), Some("custom"));
        assert!(app.open_on_start);

        app.apply_cli_args(&Args {
            no_restore: true,
            ..Args::default()
        });
        assert_eq!(app.storage_key, None);
    }

    #[test]
    fn test_keys_reach_modal_before_globals() {
        let mut app = app();
        app.open_form();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
