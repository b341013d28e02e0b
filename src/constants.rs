//! Application-wide constants
//!
//! Default option values, timing and protocol numbers used across the crate.

/// Store defaults used when no option is supplied
pub mod defaults {
    /// Persisted state filename inside the data directory
    pub const FILE_NAME: &str = "window-state.json";

    /// Fallback window width
    pub const WIDTH: u32 = 800;

    /// Fallback window height
    pub const HEIGHT: u32 = 600;
}

/// Timing constants
pub mod timing {
    use std::time::Duration;

    /// Quiet period after the last resize/move before bounds are captured
    pub const EVENT_DEBOUNCE: Duration = Duration::from_millis(100);

    /// How often the tracking loop checks for a pending shutdown signal
    pub const SHUTDOWN_POLL: Duration = Duration::from_millis(200);
}

/// Filesystem layout
pub mod paths {
    /// Directory under the user's config dir holding persisted state
    pub const APP_DIR: &str = "window-state-keeper";
}

/// EWMH protocol constants
pub mod x11 {
    /// `_NET_WM_STATE` client message action: remove the property
    pub const NET_WM_STATE_REMOVE: u32 = 0;

    /// `_NET_WM_STATE` client message action: add the property
    pub const NET_WM_STATE_ADD: u32 = 1;

    /// Source indication (2 = pager/direct user action)
    pub const SOURCE_PAGER: u32 = 2;

    /// Max number of 32-bit items read from `_NET_WM_STATE`
    pub const WM_STATE_MAX_ITEMS: u32 = 1024;
}

/// Environment variables
pub mod env {
    /// Log level override (trace, debug, info, warn, error)
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}
