use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as RandrExt;
use x11rb::protocol::xproto::Window;
use x11rb::rust_connection::RustConnection;

use crate::config::default_user_data_dir;
use crate::geometry::{self, Rect};
use crate::host::Host;

/// Display lookup backed by RandR monitors
pub struct X11Host {
    conn: Arc<RustConnection>,
    root: Window,
    /// Whole root screen, used when RandR reports nothing
    screen: Rect,
    data_dir: PathBuf,
}

impl X11Host {
    pub fn new(conn: Arc<RustConnection>, screen_num: usize) -> Self {
        let (root, screen) = {
            let screen = &conn.setup().roots[screen_num];
            (
                screen.root,
                Rect::new(0, 0, u32::from(screen.width_in_pixels), u32::from(screen.height_in_pixels)),
            )
        };
        Self {
            conn,
            root,
            screen,
            data_dir: default_user_data_dir(),
        }
    }

    pub fn root(&self) -> Window {
        self.root
    }

    /// Active monitors as reported by RandR
    pub fn monitors(&self) -> Result<Vec<Rect>> {
        let reply = self.conn
            .randr_get_monitors(self.root, true)
            .context("Failed to query RandR monitors")?
            .reply()
            .context("Failed to get reply for RandR monitors query")?;

        Ok(reply
            .monitors
            .iter()
            .map(|m| Rect::new(i32::from(m.x), i32::from(m.y), u32::from(m.width), u32::from(m.height)))
            .collect())
    }
}

impl Host for X11Host {
    fn display_matching(&self, rect: &Rect) -> Rect {
        let monitors = self.monitors().unwrap_or_else(|e| {
            warn!(error = %format!("{e:#}"), "Falling back to root screen bounds");
            Vec::new()
        });
        let matched = geometry::display_matching(&monitors, rect).unwrap_or(self.screen);
        debug!(rect = ?rect, display = ?matched, "Matched display");
        matched
    }

    fn user_data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }
}
