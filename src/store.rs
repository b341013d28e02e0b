//! Window state store
//!
//! Loads the last saved geometry at construction, follows a live window while
//! it is managed and writes the geometry back when the window closes.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::constants::timing;
use crate::debounce::Debouncer;
use crate::host::{Host, Listener, ManagedWindow, SubscriptionId, WindowEvent};
use crate::persistence;
use crate::state::{self, WindowState};

/// Window being tracked plus the subscriptions to release on unmanage
struct Tracked {
    window: Rc<dyn ManagedWindow>,
    subscriptions: Vec<SubscriptionId>,
}

struct StoreInner {
    config: StoreConfig,
    file_path: PathBuf,
    host: Rc<dyn Host>,
    state: WindowState,
    tracked: Option<Tracked>,
    debouncer: Debouncer,
}

/// Persists and restores the geometry of one window
///
/// Event-driven capture uses local tokio tasks, so a managed window's events
/// must be delivered inside a `tokio::task::LocalSet`.
pub struct WindowStateStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl WindowStateStore {
    /// Load, validate and default the persisted state
    ///
    /// Never fails: an unreadable or invalid file means starting from defaults.
    pub fn new(config: StoreConfig, host: Rc<dyn Host>) -> Self {
        let file_path = config.file_path(|| host.user_data_dir());

        let loaded = match persistence::load_state(&file_path) {
            Ok(state) => Some(state),
            Err(e) => {
                debug!(error = %format!("{e:#}"), "No usable window state, starting from defaults");
                None
            }
        };

        let (default_width, default_height) = config.effective_default_size();
        let state = loaded
            .and_then(|state| state::validate(state, host.as_ref()))
            .unwrap_or_default()
            .with_default_size(default_width, default_height);

        info!(path = %file_path.display(), state = ?state, "Resolved window state");

        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                config,
                file_path,
                host,
                state,
                tracked: None,
                debouncer: Debouncer::new(timing::EVENT_DEBOUNCE),
            })),
        }
    }

    pub fn x(&self) -> Option<i32> {
        self.inner.borrow().state.x()
    }

    pub fn y(&self) -> Option<i32> {
        self.inner.borrow().state.y()
    }

    pub fn width(&self) -> u32 {
        let inner = self.inner.borrow();
        inner.state.width.unwrap_or(inner.config.effective_default_size().0)
    }

    pub fn height(&self) -> u32 {
        let inner = self.inner.borrow();
        inner.state.height.unwrap_or(inner.config.effective_default_size().1)
    }

    pub fn is_maximized(&self) -> bool {
        self.inner.borrow().state.is_maximized
    }

    pub fn is_full_screen(&self) -> bool {
        self.inner.borrow().state.is_full_screen
    }

    /// Snapshot of the in-memory record
    pub fn state(&self) -> WindowState {
        self.inner.borrow().state.clone()
    }

    pub fn file_path(&self) -> PathBuf {
        self.inner.borrow().file_path.clone()
    }

    pub fn is_managing(&self) -> bool {
        self.inner.borrow().tracked.is_some()
    }

    /// Restore flags onto `window` and follow its changes
    ///
    /// A store follows one window at a time; a window that is already managed
    /// gets unmanaged first. Resize and move events should be emitted from
    /// inside a `tokio::task::LocalSet`; without a runtime they are captured
    /// immediately instead of debounced.
    pub fn manage(&self, window: Rc<dyn ManagedWindow>) {
        if self.is_managing() {
            warn!("Store already manages a window, detaching it before managing the new one");
            self.unmanage();
        }

        let (restore_maximized, restore_full_screen) = {
            let inner = self.inner.borrow();
            (
                inner.config.maximize && inner.state.is_maximized,
                inner.config.full_screen && inner.state.is_full_screen,
            )
        };

        if restore_maximized {
            debug!("Restoring maximized state");
            window.maximize();
        }
        if restore_full_screen {
            debug!("Restoring full-screen state");
            window.set_full_screen(true);
        }

        let subscriptions = WindowEvent::ALL
            .iter()
            .map(|&event| window.subscribe(event, self.listener()))
            .collect();

        self.inner.borrow_mut().tracked = Some(Tracked { window, subscriptions });
        info!("Managing window");
    }

    /// Stop following the current window; no-op when nothing is managed
    pub fn unmanage(&self) {
        unmanage(&self.inner);
    }

    /// Capture `window` if given, then write the state file
    ///
    /// Write failures are logged and otherwise ignored.
    pub fn save_state(&self, window: Option<&dyn ManagedWindow>) {
        if let Some(window) = window {
            capture(&self.inner, window);
        }
        save(&self.inner);
    }

    fn listener(&self) -> Listener {
        let weak = Rc::downgrade(&self.inner);
        Rc::new(move |event: WindowEvent| {
            if let Some(inner) = weak.upgrade() {
                handle_event(&inner, event);
            }
        })
    }
}

impl Drop for WindowStateStore {
    fn drop(&mut self) {
        unmanage(&self.inner);
    }
}

fn handle_event(inner: &Rc<RefCell<StoreInner>>, event: WindowEvent) {
    match event {
        WindowEvent::Resize | WindowEvent::Move => schedule_capture(inner),
        WindowEvent::Close => capture_tracked(inner),
        WindowEvent::Closed => {
            debug!("Managed window closed");
            unmanage(inner);
            save(inner);
        }
    }
}

fn schedule_capture(inner: &Rc<RefCell<StoreInner>>) {
    if !Debouncer::can_defer() {
        warn!("No tokio runtime, capturing window state without debounce");
        capture_tracked(inner);
        return;
    }
    let weak: Weak<RefCell<StoreInner>> = Rc::downgrade(inner);
    inner.borrow_mut().debouncer.schedule(move || {
        if let Some(inner) = weak.upgrade() {
            capture_tracked(&inner);
        }
    });
}

fn capture_tracked(inner: &Rc<RefCell<StoreInner>>) {
    let window = inner.borrow().tracked.as_ref().map(|t| t.window.clone());
    if let Some(window) = window {
        capture(inner, window.as_ref());
    }
}

fn capture(inner: &Rc<RefCell<StoreInner>>, window: &dyn ManagedWindow) {
    let mut inner = inner.borrow_mut();
    let host = inner.host.clone();
    inner.state.capture(window, host.as_ref());
}

fn unmanage(inner: &Rc<RefCell<StoreInner>>) {
    let tracked = {
        let mut inner = inner.borrow_mut();
        inner.debouncer.cancel();
        inner.tracked.take()
    };

    if let Some(Tracked { window, subscriptions }) = tracked {
        for id in subscriptions {
            window.unsubscribe(id);
        }
        info!("Stopped managing window");
    }
}

fn save(inner: &Rc<RefCell<StoreInner>>) {
    let inner = inner.borrow();
    write_state(&inner.file_path, &inner.state);
}

fn write_state(path: &Path, state: &WindowState) {
    if let Err(e) = persistence::save_state(path, state) {
        warn!(error = %format!("{e:#}"), "Failed to persist window state");
    }
}
