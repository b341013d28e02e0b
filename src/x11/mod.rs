//! X11 host backend
//!
//! Adapts an existing top-level window and the RandR monitor layout to the
//! host traits so the store can follow real windows.

mod atoms;
mod display;
mod window;

pub use atoms::{CachedAtoms, WmStateFlags};
pub use display::X11Host;
pub use window::X11Window;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;

/// Connect to the X server named by `$DISPLAY`
pub fn connect() -> Result<(Arc<RustConnection>, usize)> {
    let (conn, screen_num) = x11rb::connect(None).context("Failed to connect to X11 server")?;
    info!(screen = screen_num, "Connected to X11");
    Ok((Arc::new(conn), screen_num))
}

/// Forward X11 events from a blocking reader thread into the local event loop
///
/// The thread exits when the connection fails or the receiver is dropped.
pub fn spawn_event_reader(
    conn: Arc<RustConnection>,
    sender: UnboundedSender<Event>,
) -> Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("x11-events".to_string())
        .spawn(move || {
            info!("X11 event reader started");
            loop {
                match conn.wait_for_event() {
                    Ok(event) => {
                        if sender.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(error = %e, "X11 event reader stopped");
                        break;
                    }
                }
            }
        })
        .context("Failed to spawn X11 event reader thread")
}
