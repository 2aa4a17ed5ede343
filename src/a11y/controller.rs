//! Keyboard trap and focus/scroll continuity for a single modal.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use tracing::{debug, trace};

use crate::a11y::focus::{self, FocusScope, FocusTarget, TabDirection};
use crate::a11y::store::{AccessibilityState, AccessibilityStore};
use crate::config::{DialogAction, KeyResolver};
use crate::ui::EventResult;

/// Everything outside the modal: the element that had focus before it opened
/// and the scrollable content behind it.
pub trait BackgroundHost {
    /// Identifier of the element currently holding focus.
    fn active_element(&self) -> Option<String>;

    /// Whether `element` still exists.
    fn contains(&self, element: &str) -> bool;

    fn restore_focus(&mut self, element: &str);

    /// Suspend background scrolling. Calls nest.
    fn lock_scroll(&mut self);

    fn unlock_scroll(&mut self);
}

/// Produced by the trap when a key asks the modal to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapEvent {
    CloseRequested,
}

/// What a logical modal remembers for the rest of the session, stored or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMemory {
    last_focused: Option<FocusTarget>,
    last_scroll: u16,
}

/// Accessibility wiring for one modal.
///
/// While active, the controller owns the keyboard trap. The optional storage key
/// groups repeated opens of the same logical modal so that scroll position and the
/// last focused field survive across instances.
pub struct AccessibilityController {
    storage_key: Option<String>,
    resolver: Arc<KeyResolver>,
    previous_focus: Option<String>,
    session: SessionMemory,
    active: bool,
}

impl AccessibilityController {
    pub fn new(storage_key: Option<String>, resolver: Arc<KeyResolver>) -> Self {
        Self {
            storage_key,
            resolver,
            previous_focus: None,
            session: SessionMemory::default(),
            active: false,
        }
    }

    /// Start from what an earlier instance of the same modal left behind.
    pub fn with_session(mut self, session: SessionMemory) -> Self {
        self.session = session;
        self
    }

    pub const fn session(&self) -> &SessionMemory {
        &self.session
    }

    pub fn storage_key(&self) -> Option<&str> {
        self.storage_key.as_deref()
    }

    /// Install the trap, lock the background and place initial focus and scroll.
    pub fn on_open(
        &mut self,
        scope: &mut (impl FocusScope + ?Sized),
        background: &mut dyn BackgroundHost,
        store: &dyn AccessibilityStore,
    ) {
        if self.active {
            return;
        }
        self.active = true;
        self.previous_focus = background.active_element();
        background.lock_scroll();

        let saved = self.storage_key.as_deref().and_then(|key| store.get(key));
        let focusables = scope.focusables();

        let session = self
            .session
            .last_focused
            .clone()
            .filter(|target| focusables.contains(target) || scope.title().as_ref() == Some(target));
        let remembered = saved
            .as_ref()
            .and_then(|s| s.last_focused_field.clone())
            .map(FocusTarget::Field)
            .filter(|target| focusables.contains(target));
        let initial = session
            .or(remembered)
            .or_else(|| scope.title())
            .or_else(|| focusables.first().cloned());

        let scroll = saved.map_or(self.session.last_scroll, |s| s.scroll_offset);
        scope.set_scroll_offset(scroll);

        if let Some(target) = &initial {
            scope.focus(target);
        }
        debug!(
            key = ?self.storage_key,
            previous = ?self.previous_focus,
            initial = ?initial.as_ref().map(ToString::to_string),
            scroll,
            "Accessibility trap installed"
        );
    }

    /// Handle a key while the trap is installed.
    ///
    /// Close and tab keys are consumed here; everything else is passed on as
    /// `Ignored` for the modal content to handle.
    pub fn handle_key(
        &self,
        key: &KeyEvent,
        scope: &mut (impl FocusScope + ?Sized),
    ) -> EventResult<TrapEvent> {
        if !self.active {
            return EventResult::Ignored;
        }
        if self.resolver.matches_dialog(key, DialogAction::Close) {
            return TrapEvent::CloseRequested.into();
        }

        let direction = if self.resolver.matches_dialog(key, DialogAction::FocusNext) {
            TabDirection::Forward
        } else if self.resolver.matches_dialog(key, DialogAction::FocusPrev) {
            TabDirection::Backward
        } else {
            return EventResult::Ignored;
        };

        let focusables = scope.focusables();
        let current = scope.focused();
        if let Some(next) = focus::cycle(&focusables, current.as_ref(), direction) {
            trace!(to = %next, ?direction, "Focus trap step");
            scope.focus(next);
        }
        EventResult::Consumed
    }

    /// Record where focus currently is inside the modal.
    ///
    /// Named fields are written through to the store right away so a modal that
    /// never closes cleanly still remembers them.
    pub fn track_focus(
        &mut self,
        scope: &(impl FocusScope + ?Sized),
        store: &mut dyn AccessibilityStore,
    ) {
        let Some(focused) = scope.focused() else {
            return;
        };
        if self.session.last_focused.as_ref() == Some(&focused) {
            return;
        }

        if let (Some(key), Some(name)) = (self.storage_key.as_deref(), focused.field_name()) {
            let mut state = store.get(key).unwrap_or_default();
            state.last_focused_field = Some(name.to_string());
            store.put(key, state);
        }
        self.session.last_focused = Some(focused);
    }

    /// Persist state, release the background and remove the trap.
    pub fn on_close(
        &mut self,
        scope: &(impl FocusScope + ?Sized),
        background: &mut dyn BackgroundHost,
        store: &mut dyn AccessibilityStore,
    ) {
        if !self.active {
            return;
        }

        self.session.last_scroll = scope.scroll_offset();
        if let Some(key) = self.storage_key.as_deref() {
            let current = store.get(key).unwrap_or_default();
            let last_focused_field = self
                .session
                .last_focused
                .as_ref()
                .and_then(FocusTarget::field_name)
                .map(ToString::to_string)
                .or(current.last_focused_field);
            store.put(
                key,
                AccessibilityState {
                    scroll_offset: self.session.last_scroll,
                    last_focused_field,
                },
            );
        }

        self.teardown(background);
    }

    /// Release the background without persisting anything.
    pub fn teardown(&mut self, background: &mut dyn BackgroundHost) {
        if !self.active {
            return;
        }
        self.active = false;
        background.unlock_scroll();

        if let Some(element) = self.previous_focus.take() {
            if background.contains(&element) {
                background.restore_focus(&element);
            } else {
                debug!(%element, "Previously focused element is gone, skipping restore");
            }
        }
        debug!(key = ?self.storage_key, "Accessibility trap removed");
    }
}
