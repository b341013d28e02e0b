//! Persist and restore a desktop window's geometry across restarts
//!
//! [`WindowStateStore`] loads the last saved position, size and
//! maximized/full-screen flags, checks them against the current displays and
//! keeps them in sync with a live window through the [`host`] traits.

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod debounce;
pub mod geometry;
pub mod host;
pub mod persistence;
pub mod state;
pub mod store;
pub mod x11;

#[cfg(test)]
mod testing;

pub use config::StoreConfig;
pub use geometry::Rect;
pub use host::{EventListeners, Host, Listener, ManagedWindow, SubscriptionId, WindowEvent};
pub use state::WindowState;
pub use store::WindowStateStore;
