use anyhow::{Context, Result};
use std::cell::Cell;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use super::atoms::{CachedAtoms, WmStateFlags};
use crate::constants::x11;
use crate::geometry::Rect;
use crate::host::{EventListeners, Listener, ManagedWindow, SubscriptionId, WindowEvent};

/// An existing top-level X11 window adapted to [`ManagedWindow`]
pub struct X11Window {
    conn: Arc<RustConnection>,
    root: Window,
    window: Window,
    atoms: CachedAtoms,
    listeners: EventListeners,
    last_bounds: Cell<Rect>,
    last_size: Cell<Option<(u16, u16)>>,
    destroyed: Cell<bool>,
}

impl X11Window {
    /// Start watching `window` for structure and property changes
    pub fn attach(conn: Arc<RustConnection>, root: Window, window: Window) -> Result<Self> {
        let atoms = CachedAtoms::new(&conn)?;

        conn.change_window_attributes(
            window,
            &ChangeWindowAttributesAux::new()
                .event_mask(EventMask::STRUCTURE_NOTIFY | EventMask::PROPERTY_CHANGE),
        )
        .context(format!("Failed to select events on window {}", window))?;
        conn.flush()
            .context("Failed to flush X11 connection after selecting window events")?;

        let this = Self {
            conn,
            root,
            window,
            atoms,
            listeners: EventListeners::new(),
            last_bounds: Cell::new(Rect::default()),
            last_size: Cell::new(None),
            destroyed: Cell::new(false),
        };

        let bounds = this.query_bounds()
            .context(format!("Window {} is not queryable", window))?;
        this.last_bounds.set(bounds);
        this.last_size.set(Some((bounds.width as u16, bounds.height as u16)));
        info!(window = window, bounds = ?bounds, "Attached to X11 window");
        Ok(this)
    }

    pub fn id(&self) -> Window {
        self.window
    }

    /// `DestroyNotify` has been seen
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    fn query_bounds(&self) -> Result<Rect> {
        let geometry = self.conn
            .get_geometry(self.window)
            .context(format!("Failed to query geometry for window {}", self.window))?
            .reply()
            .context(format!("Failed to get geometry reply for window {}", self.window))?;
        // Geometry is parent-relative; translate the origin to root coordinates
        let origin = self.conn
            .translate_coordinates(self.window, self.root, 0, 0)
            .context(format!("Failed to translate coordinates for window {}", self.window))?
            .reply()
            .context(format!("Failed to get translate reply for window {}", self.window))?;

        Ok(Rect::new(
            i32::from(origin.dst_x),
            i32::from(origin.dst_y),
            u32::from(geometry.width),
            u32::from(geometry.height),
        ))
    }

    fn wm_state(&self) -> Result<WmStateFlags> {
        let reply = self.conn
            .get_property(
                false,
                self.window,
                self.atoms.net_wm_state,
                AtomEnum::ATOM,
                0,
                x11::WM_STATE_MAX_ITEMS,
            )
            .context(format!("Failed to query _NET_WM_STATE for window {}", self.window))?
            .reply()
            .context(format!("Failed to get _NET_WM_STATE reply for window {}", self.window))?;
        let states: Vec<Atom> = reply.value32().map(|v| v.collect()).unwrap_or_default();
        Ok(WmStateFlags::from_atoms(&states, &self.atoms))
    }

    fn flags(&self) -> WmStateFlags {
        self.wm_state().unwrap_or_else(|e| {
            warn!(window = self.window, error = %format!("{e:#}"), "Assuming normal window state");
            WmStateFlags::default()
        })
    }

    /// Ask the window manager to add or remove `_NET_WM_STATE` properties
    fn send_wm_state(&self, action: u32, first: Atom, second: Atom) -> Result<()> {
        let event = ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window: self.window,
            type_: self.atoms.net_wm_state,
            data: ClientMessageData::from([action, first, second, x11::SOURCE_PAGER, 0]),
        };

        self.conn.send_event(
            false,
            self.root,
            EventMask::SUBSTRUCTURE_NOTIFY | EventMask::SUBSTRUCTURE_REDIRECT,
            &event,
        )
        .context(format!("Failed to send _NET_WM_STATE event for window {}", self.window))?;

        self.conn.flush()
            .context("Failed to flush X11 connection after _NET_WM_STATE change")?;
        Ok(())
    }

    /// Apply restored geometry; position is left to the window manager unless both coordinates are known
    pub fn restore(&self, x: Option<i32>, y: Option<i32>, width: u32, height: u32) -> Result<()> {
        let mut aux = ConfigureWindowAux::new().width(width).height(height);
        if let (Some(x), Some(y)) = (x, y) {
            aux = aux.x(x).y(y);
        }
        self.conn.configure_window(self.window, &aux)
            .context(format!("Failed to configure window {}", self.window))?;
        self.conn.flush()
            .context("Failed to flush X11 connection after restoring geometry")?;
        info!(window = self.window, x = ?x, y = ?y, width = width, height = height, "Restored window geometry");
        Ok(())
    }

    /// Translate an X11 event for this window into listener calls
    pub fn dispatch(&self, event: &Event) {
        let kind = match event {
            Event::ConfigureNotify(e) if e.window == self.window => {
                let size = (e.width, e.height);
                let previous = self.last_size.replace(Some(size));
                if previous.is_some_and(|p| p != size) {
                    WindowEvent::Resize
                } else {
                    WindowEvent::Move
                }
            }
            // Maximize/fullscreen toggles may not change the client size
            Event::PropertyNotify(e) if e.window == self.window && e.atom == self.atoms.net_wm_state => {
                WindowEvent::Resize
            }
            Event::UnmapNotify(e) if e.window == self.window => WindowEvent::Close,
            Event::DestroyNotify(e) if e.window == self.window => {
                self.destroyed.set(true);
                WindowEvent::Closed
            }
            _ => return,
        };
        debug!(window = self.window, event = kind.name(), "Window event");
        self.listeners.emit(kind);
    }
}

impl ManagedWindow for X11Window {
    fn bounds(&self) -> Rect {
        match self.query_bounds() {
            Ok(bounds) => {
                self.last_bounds.set(bounds);
                bounds
            }
            Err(e) => {
                warn!(window = self.window, error = %format!("{e:#}"), "Using last known bounds");
                self.last_bounds.get()
            }
        }
    }

    fn is_maximized(&self) -> bool {
        self.flags().maximized
    }

    fn is_minimized(&self) -> bool {
        self.flags().minimized
    }

    fn is_full_screen(&self) -> bool {
        self.flags().full_screen
    }

    fn maximize(&self) {
        if let Err(e) = self.send_wm_state(
            x11::NET_WM_STATE_ADD,
            self.atoms.net_wm_state_maximized_vert,
            self.atoms.net_wm_state_maximized_horz,
        ) {
            error!(window = self.window, error = %format!("{e:#}"), "Failed to maximize window");
        }
    }

    fn set_full_screen(&self, full_screen: bool) {
        let action = if full_screen {
            x11::NET_WM_STATE_ADD
        } else {
            x11::NET_WM_STATE_REMOVE
        };
        if let Err(e) = self.send_wm_state(action, self.atoms.net_wm_state_fullscreen, 0) {
            error!(window = self.window, error = %format!("{e:#}"), "Failed to change full-screen state");
        }
    }

    fn subscribe(&self, event: WindowEvent, listener: Listener) -> SubscriptionId {
        self.listeners.add(event, listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.remove(id);
    }
}
