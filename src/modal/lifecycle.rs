//! Modal lifecycle state machine.
//!
//! [`ModalStack`] tracks every live modal instance in open order. Each instance
//! moves strictly forward through `Open -> Closing -> Unmounted` and settles its
//! pending result exactly once, no matter which sequence of `close`, `submit` and
//! `unmount` calls reaches it.

use tracing::debug;

use crate::modal::result::{self, ModalHandle, ModalId, Resolver};

/// Lifecycle state of a modal instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModalState {
    /// Visible and accepting input.
    Open,
    /// Dismissed; the host is running its exit transition.
    Closing,
    /// Removed from tracking. Terminal.
    Unmounted,
}

/// One open/close occurrence of a modal.
pub struct ModalInstance<T, R> {
    id: ModalId,
    state: ModalState,
    pending: Resolver<T>,
    renderer: R,
}

impl<T, R> ModalInstance<T, R> {
    pub const fn id(&self) -> ModalId {
        self.id
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open)
    }

    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn advance(&mut self, next: ModalState) {
        debug_assert!(next > self.state, "modal state must only move forward");
        debug!(id = %self.id, from = ?self.state, to = ?next, "Modal state transition");
        self.state = next;
    }
}

/// Stack of tracked modal instances.
///
/// `T` is the result type delivered to callers, `R` the renderer the host draws
/// each instance with. The stack itself never calls the renderer.
pub struct ModalStack<T, R> {
    instances: Vec<ModalInstance<T, R>>,
    next_id: u64,
}

impl<T, R> Default for ModalStack<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> ModalStack<T, R> {
    pub const fn new() -> Self {
        Self {
            instances: Vec::new(),
            next_id: 1,
        }
    }

    /// Open a new instance and return the handle its caller awaits.
    pub fn open(&mut self, renderer: R) -> ModalHandle<T> {
        let id = ModalId::new(self.next_id);
        self.next_id += 1;

        let (pending, handle) = result::channel(id);
        self.instances.push(ModalInstance {
            id,
            state: ModalState::Open,
            pending,
            renderer,
        });
        debug!(%id, tracked = self.instances.len(), "Opened modal");
        handle
    }

    /// Start closing the target instance without settling its result.
    ///
    /// Without an id, the most recently opened `Open` instance is targeted.
    /// Returns the id that transitioned, or `None` if nothing did.
    pub fn close(&mut self, id: Option<ModalId>) -> Option<ModalId> {
        let instance = self.target_open(id)?;
        instance.advance(ModalState::Closing);
        Some(instance.id)
    }

    /// Settle the target instance with `data`, then start closing it.
    ///
    /// Ignored when the target is already closing or gone.
    pub fn submit(&mut self, id: Option<ModalId>, data: T) -> Option<ModalId> {
        let instance = self.target_open(id)?;
        instance.pending.settle(Some(data));
        instance.advance(ModalState::Closing);
        Some(instance.id)
    }

    /// Finalize an instance once the host has finished its exit transition.
    ///
    /// A result that is still pending is settled with the cancellation marker
    /// before the instance is removed. Returns `false` if `id` is not tracked.
    pub fn unmount(&mut self, id: ModalId) -> bool {
        let Some(index) = self.instances.iter().position(|m| m.id == id) else {
            debug!(%id, "Ignoring unmount of untracked modal");
            return false;
        };

        let mut instance = self.instances.remove(index);
        if instance.is_open() {
            debug!(%id, "Force unmounting open modal");
        }
        if instance.pending.settle(None) {
            debug!(%id, "Modal dismissed without submit");
        }
        instance.advance(ModalState::Unmounted);
        true
    }

    /// Current state of `id`. Ids that were allocated but are no longer tracked
    /// report `Unmounted`; ids never allocated report `None`.
    pub fn state(&self, id: ModalId) -> Option<ModalState> {
        if let Some(instance) = self.get(id) {
            return Some(instance.state);
        }
        (id.get() > 0 && id.get() < self.next_id).then_some(ModalState::Unmounted)
    }

    /// Whether `id` still has an unsettled result.
    pub fn is_pending(&self, id: ModalId) -> bool {
        self.get(id).is_some_and(|m| !m.pending.is_settled())
    }

    /// Whether any tracked instance is open.
    pub fn is_open(&self) -> bool {
        self.instances.iter().any(ModalInstance::is_open)
    }

    /// Most recently opened instance that is still open.
    pub fn top_open(&self) -> Option<ModalId> {
        self.instances.iter().rev().find(|m| m.is_open()).map(|m| m.id)
    }

    pub fn get(&self, id: ModalId) -> Option<&ModalInstance<T, R>> {
        self.instances.iter().find(|m| m.id == id)
    }

    pub fn get_mut(&mut self, id: ModalId) -> Option<&mut ModalInstance<T, R>> {
        self.instances.iter_mut().find(|m| m.id == id)
    }

    /// Instances in open order, bottom of the stack first.
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut ModalInstance<T, R>> {
        self.instances.iter_mut()
    }

    pub const fn len(&self) -> usize {
        self.instances.len()
    }

    fn target_open(&mut self, id: Option<ModalId>) -> Option<&mut ModalInstance<T, R>> {
        let target = match id {
            Some(id) => self.instances.iter_mut().find(|m| m.id == id),
            None => self.instances.iter_mut().rev().find(|m| m.is_open()),
        };
        match target {
            Some(instance) if instance.is_open() => Some(instance),
            Some(instance) => {
                debug!(id = %instance.id, state = ?instance.state, "Ignoring transition of non-open modal");
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::{Value, json};

    type Stack = ModalStack<Value, ()>;

    #[test]
    fn test_open_is_pending() {
        let mut stack = Stack::new();
        let mut handle = stack.open(());
        let id = handle.id();

        assert_eq!(stack.state(id), Some(ModalState::Open));
        assert!(stack.is_pending(id));
        assert!(stack.is_open());
        assert!((&mut handle).now_or_never().is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut stack = Stack::new();
        let a = stack.open(()).id();
        let b = stack.open(()).id();
        assert_ne!(a, b);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_submit_then_unmount() {
        let mut stack = Stack::new();
        let mut handle = stack.open(());
        let id = handle.id();
        let data = json!({"name": "A", "email": "a@b.com", "experience": "0~3년"});

        assert_eq!(stack.submit(Some(id), data.clone()), Some(id));
        assert_eq!(stack.state(id), Some(ModalState::Closing));
        assert!(!stack.is_pending(id));

        assert!(stack.unmount(id));
        assert_eq!(stack.state(id), Some(ModalState::Unmounted));
        assert_eq!((&mut handle).now_or_never(), Some(Some(data)));
    }

    #[test]
    fn test_close_then_unmount_cancels() {
        let mut stack = Stack::new();
        let mut handle = stack.open(());
        let id = handle.id();

        assert_eq!(stack.close(Some(id)), Some(id));
        assert!(stack.is_pending(id));
        assert!((&mut handle).now_or_never().is_none());

        assert!(stack.unmount(id));
        assert_eq!((&mut handle).now_or_never(), Some(None));
        assert!(stack.instances.is_empty());
    }

    #[test]
    fn test_submit_after_close_is_ignored() {
        let mut stack = Stack::new();
        let handle = stack.open(());
        let id = handle.id();

        stack.close(Some(id));
        assert_eq!(stack.submit(Some(id), json!("late")), None);
        stack.unmount(id);

        assert_eq!(handle.now_or_never(), Some(None));
    }

    #[test]
    fn test_second_submit_is_ignored() {
        let mut stack = Stack::new();
        let handle = stack.open(());
        let id = handle.id();

        stack.submit(Some(id), json!(1));
        assert_eq!(stack.submit(Some(id), json!(2)), None);
        stack.unmount(id);

        assert_eq!(handle.now_or_never(), Some(Some(json!(1))));
    }

    #[test]
    fn test_double_unmount_is_noop() {
        let mut stack = Stack::new();
        let handle = stack.open(());
        let id = handle.id();

        stack.close(Some(id));
        assert!(stack.unmount(id));
        assert!(!stack.unmount(id));
        assert_eq!(stack.state(id), Some(ModalState::Unmounted));
        assert_eq!(handle.now_or_never(), Some(None));
    }

    #[test]
    fn test_forced_unmount_from_open_cancels() {
        let mut stack = Stack::new();
        let handle = stack.open(());
        let id = handle.id();

        assert!(stack.unmount(id));
        assert_eq!(stack.close(Some(id)), None);
        assert_eq!(handle.now_or_never(), Some(None));
    }

    #[test]
    fn test_close_without_id_targets_most_recent_open() {
        let mut stack = Stack::new();
        let first = stack.open(()).id();
        let second = stack.open(()).id();

        assert_eq!(stack.close(None), Some(second));
        assert_eq!(stack.top_open(), Some(first));
        assert_eq!(stack.close(None), Some(first));
        assert_eq!(stack.close(None), None);
        assert!(!stack.is_open());
    }

    #[test]
    fn test_submit_without_id_skips_closing_instances() {
        let mut stack = Stack::new();
        let first = stack.open(());
        let second = stack.open(());

        stack.close(Some(second.id()));
        assert_eq!(stack.submit(None, json!("data")), Some(first.id()));
        stack.unmount(first.id());

        assert_eq!(first.now_or_never(), Some(Some(json!("data"))));
        assert!(stack.is_pending(second.id()));
    }

    #[test]
    fn test_unknown_id_state() {
        let mut stack = Stack::new();
        stack.open(());
        assert_eq!(stack.state(ModalId::new(0)), None);
        assert_eq!(stack.state(ModalId::new(42)), None);
        assert!(!stack.unmount(ModalId::new(42)));
        assert_eq!(stack.close(Some(ModalId::new(42))), None);
    }

    #[test]
    fn test_drop_stack_cancels_pending() {
        let mut stack = Stack::new();
        let handle = stack.open(());
        drop(stack);
        assert_eq!(handle.now_or_never(), Some(None));
    }

    #[test]
    fn test_every_call_sequence_settles_exactly_once() {
        #[derive(Clone, Copy, Debug)]
        enum Call {
            Close,
            Submit,
            Unmount,
        }

        let calls = [Call::Close, Call::Submit, Call::Unmount];
        for a in calls {
            for b in calls {
                for c in calls {
                    let mut stack = Stack::new();
                    let mut handle = stack.open(());
                    let id = handle.id();
                    let mut states = vec![stack.state(id)];
                    let mut submitted = false;

                    for call in [a, b, c] {
                        match call {
                            Call::Close => {
                                stack.close(Some(id));
                            }
                            Call::Submit => {
                                if stack.submit(Some(id), json!("ok")).is_some() {
                                    submitted = true;
                                }
                            }
                            Call::Unmount => {
                                stack.unmount(id);
                            }
                        }
                        states.push(stack.state(id));
                    }

                    for pair in states.windows(2) {
                        assert!(pair[0] <= pair[1], "{a:?} {b:?} {c:?}: {states:?}");
                    }

                    // Finish the lifecycle if the sequence left it open.
                    stack.close(Some(id));
                    stack.unmount(id);
                    let outcome = (&mut handle).now_or_never();
                    let expected = submitted.then(|| json!("ok"));
                    assert_eq!(outcome, Some(expected), "{a:?} {b:?} {c:?}");
                }
            }
        }
    }
}
