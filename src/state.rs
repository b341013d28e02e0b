//! Persisted window state record
//!
//! Serialized as a flat camelCase JSON object:
//! `{"x":12,"y":34,"width":1024,"height":768,"isMaximized":false,"isFullScreen":false,"displayBounds":{...}}`
//!
//! `x`/`y` distinguish a missing key from an explicit `null`: a coordinate
//! cleared after a display change is written as `null` and still counts as
//! present, so the rest of the clamped geometry survives a reload.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::geometry::Rect;
use crate::host::{Host, ManagedWindow};

/// Last known geometry of a managed window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    /// `Some(None)` is a coordinate left for the host to choose
    #[serde(default, deserialize_with = "deserialize_present", skip_serializing_if = "Option::is_none")]
    pub x: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_present", skip_serializing_if = "Option::is_none")]
    pub y: Option<Option<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub is_maximized: bool,
    #[serde(default)]
    pub is_full_screen: bool,
    /// Display the window last occupied, used to detect monitor changes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_bounds: Option<Rect>,
}

/// A key present in the file, even as `null`, deserializes to `Some`
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i32>::deserialize(deserializer).map(Some)
}

impl WindowState {
    pub fn x(&self) -> Option<i32> {
        self.x.flatten()
    }

    pub fn y(&self) -> Option<i32> {
        self.y.flatten()
    }

    /// All four bounds fields present; an unset coordinate reads as 0
    pub fn bounds(&self) -> Option<Rect> {
        match (self.x, self.y, self.width, self.height) {
            (Some(x), Some(y), Some(width), Some(height)) => Some(Rect {
                x: x.unwrap_or(0),
                y: y.unwrap_or(0),
                width,
                height,
            }),
            _ => None,
        }
    }

    pub fn has_bounds(&self) -> bool {
        self.bounds().is_some()
    }

    /// Worth restoring: complete bounds or a maximize/full-screen flag
    pub fn is_restorable(&self) -> bool {
        self.has_bounds() || self.is_maximized || self.is_full_screen
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.x = Some(Some(bounds.x));
        self.y = Some(Some(bounds.y));
        self.width = Some(bounds.width);
        self.height = Some(bounds.height);
    }

    /// Shrink or unplace the window if its display got smaller
    ///
    /// Only acts on an axis where `current` is narrower (or shorter) than
    /// `recorded`; a window that still fits is left alone.
    pub fn fit_to_display(&mut self, recorded: Rect, current: Rect) {
        if recorded == current {
            return;
        }
        info!(recorded = ?recorded, current = ?current, "Display configuration changed since last save");

        if current.width < recorded.width {
            if self.x().is_some_and(|x| i64::from(x) > i64::from(current.width)) {
                self.x = Some(None);
            }
            if self.width.is_some_and(|w| w > current.width) {
                self.width = Some(current.width);
            }
        }

        if current.height < recorded.height {
            if self.y().is_some_and(|y| i64::from(y) > i64::from(current.height)) {
                self.y = Some(None);
            }
            if self.height.is_some_and(|h| h > current.height) {
                self.height = Some(current.height);
            }
        }
    }

    /// Fill width/height when absent
    pub fn with_default_size(mut self, width: u32, height: u32) -> Self {
        self.width.get_or_insert(width);
        self.height.get_or_insert(height);
        self
    }

    /// Record the window's current geometry
    ///
    /// Bounds are only taken while the window is in its normal state, so a
    /// maximized window keeps the geometry it will restore to.
    pub fn capture(&mut self, window: &dyn ManagedWindow, host: &dyn Host) {
        let bounds = window.bounds();
        if window.is_normal() {
            self.set_bounds(bounds);
        }
        self.is_maximized = window.is_maximized();
        self.is_full_screen = window.is_full_screen();
        self.display_bounds = Some(host.display_matching(&bounds));
        debug!(bounds = ?bounds, maximized = self.is_maximized, full_screen = self.is_full_screen, "Captured window state");
    }
}

/// Check a loaded state against the current displays
///
/// Returns `None` when the state isn't worth restoring.
pub fn validate(state: WindowState, host: &dyn Host) -> Option<WindowState> {
    if !state.is_restorable() {
        debug!(state = ?state, "Discarding incomplete window state");
        return None;
    }

    let mut state = state;
    if let (Some(bounds), Some(recorded)) = (state.bounds(), state.display_bounds) {
        let current = host.display_matching(&bounds);
        state.fit_to_display(recorded, current);
    }
    Some(state)
}
