use anyhow::{Context, Result};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

/// Pre-cached EWMH atoms to avoid repeated roundtrips
#[derive(Debug, Clone, Copy)]
pub struct CachedAtoms {
    pub net_wm_state: Atom,
    pub net_wm_state_hidden: Atom,
    pub net_wm_state_maximized_vert: Atom,
    pub net_wm_state_maximized_horz: Atom,
    pub net_wm_state_fullscreen: Atom,
}

impl CachedAtoms {
    pub fn new(conn: &RustConnection) -> Result<Self> {
        // Do all intern_atom roundtrips once
        Ok(Self {
            net_wm_state: intern(conn, "_NET_WM_STATE")?,
            net_wm_state_hidden: intern(conn, "_NET_WM_STATE_HIDDEN")?,
            net_wm_state_maximized_vert: intern(conn, "_NET_WM_STATE_MAXIMIZED_VERT")?,
            net_wm_state_maximized_horz: intern(conn, "_NET_WM_STATE_MAXIMIZED_HORZ")?,
            net_wm_state_fullscreen: intern(conn, "_NET_WM_STATE_FULLSCREEN")?,
        })
    }
}

fn intern(conn: &RustConnection, name: &str) -> Result<Atom> {
    Ok(conn
        .intern_atom(false, name.as_bytes())
        .with_context(|| format!("Failed to intern {} atom", name))?
        .reply()
        .with_context(|| format!("Failed to get reply for {} atom", name))?
        .atom)
}

/// Window flags decoded from a `_NET_WM_STATE` value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WmStateFlags {
    pub maximized: bool,
    pub minimized: bool,
    pub full_screen: bool,
}

impl WmStateFlags {
    /// Maximized means both axes; a half-maximized window counts as normal
    pub fn from_atoms(states: &[Atom], atoms: &CachedAtoms) -> Self {
        let has = |atom: Atom| states.contains(&atom);
        Self {
            maximized: has(atoms.net_wm_state_maximized_vert) && has(atoms.net_wm_state_maximized_horz),
            minimized: has(atoms.net_wm_state_hidden),
            full_screen: has(atoms.net_wm_state_fullscreen),
        }
    }
}
