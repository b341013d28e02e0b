//! JSON persistence of [`WindowState`]
//!
//! Both helpers report failures; the store decides to ignore them.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::state::WindowState;

/// Read and parse the state file
pub fn load_state(path: &Path) -> Result<WindowState> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read window state from {:?}", path))?;
    let state = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse window state from {:?}", path))?;
    debug!(path = %path.display(), "Loaded window state");
    Ok(state)
}

/// Write the state file, creating parent directories as needed
pub fn save_state(path: &Path, state: &WindowState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create state directory {:?}", parent))?;
    }

    let json = serde_json::to_string(state).context("Failed to serialize window state")?;

    fs::write(path, json)
        .with_context(|| format!("Failed to write window state to {:?}", path))?;

    debug!(path = %path.display(), "Saved window state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use tempfile::TempDir;

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("window-state.json");
        let state = WindowState {
            x: Some(Some(1)),
            y: Some(Some(2)),
            width: Some(3),
            height: Some(4),
            display_bounds: Some(Rect::new(0, 0, 1920, 1080)),
            ..Default::default()
        };

        save_state(&path, &state).unwrap();
        assert_eq!(load_state(&path).unwrap(), state);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_state(&dir.path().join("absent.json")).is_err());
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("window-state.json");
        fs::write(&path, "{\"x\": 10, \"width\": ").unwrap();

        let err = load_state(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse window state"));
    }

    #[test]
    fn test_save_into_file_parent_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        assert!(save_state(&blocker.join("window-state.json"), &WindowState::default()).is_err());
    }
}
