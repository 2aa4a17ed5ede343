//! Single-resolution result delivery for modal instances.
//!
//! Each opened modal is paired with a [`Resolver`] (kept by the instance) and a
//! [`ModalHandle`] (given to the caller). The resolver settles at most once; the
//! handle resolves exactly once, yielding `None` as the cancellation marker when the
//! resolver is settled without data or dropped without being settled at all.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::FusedFuture;
use tokio::sync::oneshot;

/// Unique identifier of one modal instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(u64);

impl ModalId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modal-{}", self.0)
    }
}

/// Creates a connected resolver/handle pair for the given instance.
pub fn channel<T>(id: ModalId) -> (Resolver<T>, ModalHandle<T>) {
    let (tx, rx) = oneshot::channel();
    (
        Resolver { tx: Some(tx) },
        ModalHandle { id, rx: Some(rx) },
    )
}

/// Sending half, owned by the modal instance.
#[derive(Debug)]
pub struct Resolver<T> {
    tx: Option<oneshot::Sender<Option<T>>>,
}

impl<T> Resolver<T> {
    /// Settle with the given outcome. Returns `false` if already settled.
    ///
    /// A caller that dropped its handle still counts as settled.
    pub fn settle(&mut self, outcome: Option<T>) -> bool {
        let Some(tx) = self.tx.take() else {
            return false;
        };
        // Receiver gone means nobody is waiting anymore.
        let _ = tx.send(outcome);
        true
    }

    pub const fn is_settled(&self) -> bool {
        self.tx.is_none()
    }
}

/// Caller side of an opened modal.
///
/// Resolves to `Some(data)` on submit and `None` on cancellation.
#[derive(Debug)]
pub struct ModalHandle<T> {
    id: ModalId,
    rx: Option<oneshot::Receiver<Option<T>>>,
}

impl<T> ModalHandle<T> {
    pub const fn id(&self) -> ModalId {
        self.id
    }
}

impl<T> Future for ModalHandle<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Pending;
        };
        let outcome = match Pin::new(rx).poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Ok(outcome)) => outcome,
            // Resolver dropped without settling: the instance was torn down.
            Poll::Ready(Err(_)) => None,
        };
        self.rx = None;
        Poll::Ready(outcome)
    }
}

impl<T> FusedFuture for ModalHandle<T> {
    fn is_terminated(&self) -> bool {
        self.rx.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_settle_once() {
        let (mut resolver, mut handle) = channel::<u32>(ModalId::new(1));
        assert!(!resolver.is_settled());
        assert!((&mut handle).now_or_never().is_none());

        assert!(resolver.settle(Some(7)));
        assert!(!resolver.settle(Some(8)));
        assert!(!resolver.settle(None));
        assert!(resolver.is_settled());

        assert_eq!((&mut handle).now_or_never(), Some(Some(7)));
        assert!(handle.is_terminated());
    }

    #[test]
    fn test_dropped_resolver_cancels() {
        let (resolver, handle) = channel::<u32>(ModalId::new(2));
        drop(resolver);
        assert_eq!(handle.now_or_never(), Some(None));
    }

    #[test]
    fn test_settle_after_handle_dropped() {
        let (mut resolver, handle) = channel::<u32>(ModalId::new(3));
        drop(handle);
        assert!(resolver.settle(Some(1)));
        assert!(resolver.is_settled());
    }

    #[test]
    fn test_modal_id_display() {
        assert_eq!(ModalId::new(4).to_string(), "modal-4");
        assert_eq!(ModalId::new(4).get(), 4);
    }
}
