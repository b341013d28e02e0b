//! Host collaborator seams
//!
//! The store never talks to a windowing system directly. A host provides a
//! [`ManagedWindow`] for the live window and a [`Host`] for display lookup and
//! the per-user data directory.

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::trace;

use crate::geometry::Rect;

/// Window events the store listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    Resize,
    Move,
    /// Window is about to close; it can still be queried
    Close,
    /// Window has been destroyed
    Closed,
}

impl WindowEvent {
    pub const ALL: [WindowEvent; 4] = [
        WindowEvent::Resize,
        WindowEvent::Move,
        WindowEvent::Close,
        WindowEvent::Closed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WindowEvent::Resize => "resize",
            WindowEvent::Move => "move",
            WindowEvent::Close => "close",
            WindowEvent::Closed => "closed",
        }
    }
}

/// Callback registered for a window event
pub type Listener = Rc<dyn Fn(WindowEvent)>;

/// Handle returned by [`ManagedWindow::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A live window whose geometry is persisted
pub trait ManagedWindow {
    fn bounds(&self) -> Rect;
    fn is_maximized(&self) -> bool;
    fn is_minimized(&self) -> bool;
    fn is_full_screen(&self) -> bool;
    fn maximize(&self);
    fn set_full_screen(&self, full_screen: bool);
    fn subscribe(&self, event: WindowEvent, listener: Listener) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);

    /// Neither maximized, minimized nor full-screen
    fn is_normal(&self) -> bool {
        !self.is_maximized() && !self.is_minimized() && !self.is_full_screen()
    }
}

/// Display and filesystem services of the host
pub trait Host {
    /// Bounds of the display that best matches `rect`
    fn display_matching(&self, rect: &Rect) -> Rect;

    /// Per-user application data directory
    fn user_data_dir(&self) -> PathBuf;
}

/// Listener registry a host window can embed to implement subscriptions
#[derive(Default)]
pub struct EventListeners {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(SubscriptionId, WindowEvent, Listener)>>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, event: WindowEvent, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, event, listener));
        trace!(event = event.name(), id = id.0, "Listener added");
        id
    }

    pub fn remove(&self, id: SubscriptionId) {
        self.entries.borrow_mut().retain(|(entry_id, _, _)| *entry_id != id);
    }

    /// Invoke every listener registered for `event`
    ///
    /// Listeners may add or remove subscriptions while running.
    pub fn emit(&self, event: WindowEvent) {
        let listeners: Vec<Listener> = self
            .entries
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(_, _, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn count(&self, event: WindowEvent) -> usize {
        self.entries.borrow().iter().filter(|(_, e, _)| *e == event).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
