//! Test doubles for the host seams

use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use crate::geometry::{self, Rect};
use crate::host::{EventListeners, Host, Listener, ManagedWindow, SubscriptionId, WindowEvent};

/// Host with a fixed set of displays and data directory
pub struct FakeHost {
    pub displays: Vec<Rect>,
    pub data_dir: PathBuf,
}

impl FakeHost {
    pub fn single(display: Rect) -> Self {
        Self {
            displays: vec![display],
            data_dir: PathBuf::from("."),
        }
    }

    pub fn with_data_dir(display: Rect, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            displays: vec![display],
            data_dir: data_dir.into(),
        }
    }
}

impl Host for FakeHost {
    fn display_matching(&self, rect: &Rect) -> Rect {
        geometry::display_matching(&self.displays, rect).unwrap_or_default()
    }

    fn user_data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }
}

/// Scriptable window that counts geometry queries
#[derive(Default)]
pub struct FakeWindow {
    bounds: Cell<Rect>,
    maximized: Cell<bool>,
    minimized: Cell<bool>,
    full_screen: Cell<bool>,
    pub bounds_queries: Cell<usize>,
    pub maximize_calls: Cell<usize>,
    pub full_screen_calls: RefCell<Vec<bool>>,
    pub listeners: EventListeners,
}

impl FakeWindow {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds: Cell::new(bounds),
            ..Default::default()
        }
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    pub fn set_maximized(&self, maximized: bool) {
        self.maximized.set(maximized);
    }

    pub fn set_minimized(&self, minimized: bool) {
        self.minimized.set(minimized);
    }

    pub fn emit(&self, event: WindowEvent) {
        self.listeners.emit(event);
    }
}

impl ManagedWindow for FakeWindow {
    fn bounds(&self) -> Rect {
        self.bounds_queries.set(self.bounds_queries.get() + 1);
        self.bounds.get()
    }

    fn is_maximized(&self) -> bool {
        self.maximized.get()
    }

    fn is_minimized(&self) -> bool {
        self.minimized.get()
    }

    fn is_full_screen(&self) -> bool {
        self.full_screen.get()
    }

    fn maximize(&self) {
        self.maximize_calls.set(self.maximize_calls.get() + 1);
        self.maximized.set(true);
    }

    fn set_full_screen(&self, full_screen: bool) {
        self.full_screen_calls.borrow_mut().push(full_screen);
        self.full_screen.set(full_screen);
    }

    fn subscribe(&self, event: WindowEvent, listener: Listener) -> SubscriptionId {
        self.listeners.add(event, listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.remove(id);
    }
}
