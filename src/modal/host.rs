//! Host renderer for modal instances.
//!
//! [`ModalHost`] sits between the app and a [`ModalStack`]. It draws every tracked
//! instance each frame, routes keys to the topmost open one, wires each instance to
//! its own [`AccessibilityController`], counts down exit transitions and calls
//! `unmount` when they end. A renderer error replaces that one instance with a
//! [`FallbackView`]; every other instance carries on.

use std::collections::HashMap;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use tracing::{debug, error};

use crate::Theme;
use crate::a11y::{
    AccessibilityController, AccessibilityStore, BackgroundHost, SessionMemory, TrapEvent,
};
use crate::config::KeyResolver;
use crate::modal::lifecycle::ModalStack;
use crate::modal::result::{ModalHandle, ModalId};
use crate::modal::{LifecycleProps, ModalAction, ModalRenderer};
use crate::ui::{Component, EventResult, FallbackEvent, FallbackView};

/// The app-owned collaborators every lifecycle transition needs.
pub struct HostContext<'a> {
    pub store: &'a mut dyn AccessibilityStore,
    pub background: &'a mut dyn BackgroundHost,
}

/// Per-instance state the host keeps next to the caller's renderer.
struct Mounted<T> {
    content: Box<dyn ModalRenderer<T>>,
    a11y: AccessibilityController,
    fault: Option<FallbackView>,
    /// Ticks left before unmount, set once the instance starts closing.
    exit_ticks: Option<u8>,
}

pub struct ModalHost<T> {
    stack: ModalStack<T, Mounted<T>>,
    resolver: Arc<KeyResolver>,
    exit_transition_ticks: u8,
    /// In-session focus and scroll per storage key; unkeyed opens share one slot.
    sessions: HashMap<Option<String>, SessionMemory>,
}

impl<T> ModalHost<T> {
    pub fn new(resolver: Arc<KeyResolver>, exit_transition_ticks: u8) -> Self {
        Self {
            stack: ModalStack::new(),
            resolver,
            exit_transition_ticks,
            sessions: HashMap::new(),
        }
    }

    /// Open `content` as a new modal and install its accessibility trap.
    ///
    /// `storage_key` names the logical modal whose scroll and focus state should
    /// carry over between opens.
    pub fn open(
        &mut self,
        content: Box<dyn ModalRenderer<T>>,
        storage_key: Option<String>,
        cx: &mut HostContext<'_>,
    ) -> ModalHandle<T> {
        let session = self.sessions.get(&storage_key).cloned().unwrap_or_default();
        let a11y = AccessibilityController::new(storage_key, Arc::clone(&self.resolver))
            .with_session(session);
        let handle = self.stack.open(Mounted {
            content,
            a11y,
            fault: None,
            exit_ticks: None,
        });

        if let Some(instance) = self.stack.get_mut(handle.id()) {
            let Mounted { content, a11y, .. } = instance.renderer_mut();
            a11y.on_open(content.as_mut(), cx.background, cx.store);
        }
        handle
    }

    /// Start closing an instance; its result stays pending until unmount.
    pub fn close(&mut self, id: Option<ModalId>, cx: &mut HostContext<'_>) -> Option<ModalId> {
        let id = self.stack.close(id)?;
        self.begin_exit(id, cx);
        Some(id)
    }

    /// Deliver `data` to the instance's caller and start closing it.
    pub fn submit(
        &mut self,
        id: Option<ModalId>,
        data: T,
        cx: &mut HostContext<'_>,
    ) -> Option<ModalId> {
        let id = self.stack.submit(id, data)?;
        self.begin_exit(id, cx);
        Some(id)
    }

    /// Drop an instance, cancelling its result if still pending.
    pub fn unmount(&mut self, id: ModalId, cx: &mut HostContext<'_>) -> bool {
        if let Some(instance) = self.stack.get_mut(id) {
            // Forced unmounts never went through close
            instance.renderer_mut().a11y.teardown(cx.background);
        }
        self.stack.unmount(id)
    }

    fn begin_exit(&mut self, id: ModalId, cx: &mut HostContext<'_>) {
        let ticks = self.exit_transition_ticks;
        let pending = self.stack.is_pending(id);
        let Some(instance) = self.stack.get_mut(id) else {
            return;
        };
        let Mounted {
            content,
            a11y,
            fault,
            exit_ticks,
        } = instance.renderer_mut();

        if fault.is_some() {
            a11y.teardown(cx.background);
        } else {
            a11y.on_close(content.as_ref(), cx.background, cx.store);
        }
        self.sessions
            .insert(a11y.storage_key().map(ToString::to_string), a11y.session().clone());
        *exit_ticks = Some(ticks);
        debug!(%id, ticks, pending, "Exit transition started");
    }

    /// Route a key to the topmost open instance.
    ///
    /// Returns `true` whenever an open modal exists: modals capture all input.
    pub fn handle_key(&mut self, key: KeyEvent, cx: &mut HostContext<'_>) -> bool {
        let Some(id) = self.stack.top_open() else {
            return false;
        };
        let Some(instance) = self.stack.get_mut(id) else {
            return false;
        };
        let props = LifecycleProps { id, is_open: true };
        let mounted = instance.renderer_mut();

        if let Some(fallback) = mounted.fault.as_mut() {
            if let Ok(EventResult::Event(FallbackEvent::Dismissed)) = fallback.handle_key(key) {
                debug!(%id, state = ?self.stack.state(id), "Fallback dismissed");
                self.unmount(id, cx);
            }
            return true;
        }

        let action = match mounted.a11y.handle_key(&key, mounted.content.as_mut()) {
            EventResult::Event(TrapEvent::CloseRequested) => Some(ModalAction::Close),
            EventResult::Consumed => None,
            EventResult::Ignored => match mounted.content.handle_key(props, key) {
                Ok(EventResult::Event(action)) => Some(action),
                Ok(EventResult::Consumed | EventResult::Ignored) => None,
                Err(err) => {
                    self.fault(id, &err);
                    return true;
                }
            },
        };

        if let Some(instance) = self.stack.get_mut(id) {
            let mounted = instance.renderer_mut();
            mounted.a11y.track_focus(mounted.content.as_ref(), cx.store);
        }

        if let Some(action) = action {
            self.apply(id, action, cx);
        }
        true
    }

    fn apply(&mut self, id: ModalId, action: ModalAction<T>, cx: &mut HostContext<'_>) {
        match action {
            ModalAction::Close => {
                self.close(Some(id), cx);
            }
            ModalAction::Submit(data) => {
                self.submit(Some(id), data, cx);
            }
            ModalAction::Unmount => {
                self.unmount(id, cx);
            }
        }
    }

    /// Advance content animations and exit transitions.
    pub fn on_tick(&mut self, cx: &mut HostContext<'_>) {
        let mut requested = Vec::new();
        let mut finished = Vec::new();
        for instance in self.stack.iter_mut() {
            let props = LifecycleProps {
                id: instance.id(),
                is_open: instance.is_open(),
            };
            let mounted = instance.renderer_mut();
            let action = if mounted.fault.is_some() {
                None
            } else {
                mounted.content.on_tick(props)
            };
            if let Some(action) = action {
                requested.push((props.id, action));
                continue;
            }
            if let Some(ticks) = mounted.exit_ticks.as_mut() {
                *ticks = ticks.saturating_sub(1);
                if *ticks == 0 {
                    finished.push(props.id);
                }
            }
        }

        for (id, action) in requested {
            self.apply(id, action, cx);
        }
        for id in finished {
            debug!(%id, "Exit transition finished");
            self.unmount(id, cx);
        }
    }

    /// Draw every tracked instance, bottom of the stack first.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut faulted = Vec::new();
        for instance in self.stack.iter_mut() {
            let props = LifecycleProps {
                id: instance.id(),
                is_open: instance.is_open(),
            };
            let mounted = instance.renderer_mut();

            if let Some(fallback) = mounted.fault.as_mut() {
                fallback.render(frame, area, theme);
                continue;
            }
            if let Err(err) = mounted.content.render(props, frame, area, theme) {
                error!(id = %props.id, error = %err, "Modal failed to render");
                let mut fallback = FallbackView::new(err.to_string(), Arc::clone(&self.resolver));
                fallback.render(frame, area, theme);
                mounted.fault = Some(fallback);
                faulted.push(props.id);
            }
        }
        if !faulted.is_empty() {
            debug!(?faulted, "Instances switched to fallback view");
        }
    }

    fn fault(&mut self, id: ModalId, err: &color_eyre::Report) {
        error!(%id, error = %err, "Modal failed to handle input");
        if let Some(instance) = self.stack.get_mut(id) {
            instance.renderer_mut().fault =
                Some(FallbackView::new(err.to_string(), Arc::clone(&self.resolver)));
        }
    }

    /// Whether any instance is open and capturing input.
    pub fn is_active(&self) -> bool {
        self.stack.is_open()
    }

    pub const fn len(&self) -> usize {
        self.stack.len()
    }
}
