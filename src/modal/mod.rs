//! Modal lifecycle.
//!
//! - `ModalStack` - tracks instances and their `Open -> Closing -> Unmounted` state
//! - [`ModalHandle`] - the future a caller awaits for an instance's result
//! - [`ModalHost`] - draws instances, isolates render faults, runs exit transitions
//! - [`ModalRenderer`] - the content a caller supplies when opening a modal

mod host;
mod lifecycle;
mod result;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::Theme;
use crate::a11y::FocusScope;
use crate::ui::{EventResult, Result};

pub use host::{HostContext, ModalHost};
pub use result::{ModalHandle, ModalId};

/// Lifecycle view handed to the renderer on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleProps {
    pub id: ModalId,
    /// `false` once the instance is closing.
    pub is_open: bool,
}

/// What a renderer asks the lifecycle to do in response to input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction<T> {
    /// Dismiss without a result.
    Close,
    /// Deliver `T` to the caller and dismiss.
    Submit(T),
    /// The exit transition is over; drop the instance.
    Unmount,
}

/// Content of a modal.
///
/// The host calls `render` for every tracked instance on every frame, and
/// `handle_key` only for the topmost open instance after the accessibility
/// trap has had its turn. Errors from either are contained to this instance.
pub trait ModalRenderer<T>: FocusScope {
    /// Render the modal content into `area`.
    fn render(
        &mut self,
        props: LifecycleProps,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
    ) -> Result<()>;

    /// Handle a key the accessibility trap did not consume.
    fn handle_key(
        &mut self,
        props: LifecycleProps,
        key: KeyEvent,
    ) -> Result<EventResult<ModalAction<T>>>;

    /// Called on each tick for animations and time-based updates.
    ///
    /// A closing renderer returns [`ModalAction::Unmount`] once its own exit
    /// transition is over; otherwise the host unmounts it after the configured
    /// number of ticks.
    fn on_tick(&mut self, props: LifecycleProps) -> Option<ModalAction<T>> {
        _ = props;
        None
    }
}
