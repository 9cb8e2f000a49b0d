use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// File name of the persisted window-bounds record inside the profile directory.
pub const BOUNDS_FILE_NAME: &str = "windowBounds.json";

pub const MIN_WINDOW_WIDTH: i32 = 320;
pub const MIN_WINDOW_HEIGHT: i32 = 350;

/// Position and size of a top-level window, persisted as
/// `{"x":…,"y":…,"width":…,"height":…}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Usable size of a display (excluding docks, task bars and menu bars).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkArea {
    pub width: i32,
    pub height: i32,
}

impl WindowBounds {
    /// Bounds covering the whole work area, anchored at the origin.
    pub fn covering(work_area: WorkArea) -> Self {
        WindowBounds {
            x: 0,
            y: 0,
            width: work_area.width,
            height: work_area.height,
        }
    }

    pub fn meets_minimum_size(&self) -> bool {
        self.width >= MIN_WINDOW_WIDTH && self.height >= MIN_WINDOW_HEIGHT
    }

    /// The same bounds with width and height raised to the minimum window size.
    pub fn with_minimum_size(self) -> Self {
        WindowBounds {
            width: self.width.max(MIN_WINDOW_WIDTH),
            height: self.height.max(MIN_WINDOW_HEIGHT),
            ..self
        }
    }
}

/// Judge whether bounds restored from the previous session describe a
/// maximized window.
///
/// Only applies on platforms whose window manager pads windows with an
/// invisible resize border: a maximized window there is reported at the
/// origin (or at minus the border width) with a size equal to the work area,
/// or larger by twice the border. Bounds from another display are left alone.
pub fn should_maximize(platform: Platform, bounds: &WindowBounds, work_area: WorkArea) -> bool {
    let Some(border) = platform.policy().resize_border else {
        return false;
    };
    let at_origin = bounds.x == 0 || bounds.y == 0 || bounds.x == -border || bounds.y == -border;
    if !at_origin {
        return false;
    }
    let fits = |reported: i32, usable: i32| {
        reported == usable || reported.checked_sub(usable) == Some(2 * border)
    };
    fits(bounds.width, work_area.width) && fits(bounds.height, work_area.height)
}

#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("failed to access window bounds file: {0}")]
    Io(#[from] std::io::Error),
    #[error("window bounds file is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("window bounds file is empty")]
    Empty,
}

/// Runs blocking work off the event-loop thread without waiting for it.
///
/// Frontends route this through the executor they already use for blocking
/// reads, so every geometry access shares one mechanism.
pub trait Spawner {
    fn spawn(&self, task: Box<dyn FnOnce() + Send + 'static>);
}

/// Runs each task on its own OS thread. Used when no frontend executor is
/// installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSpawner;

impl Spawner for ThreadSpawner {
    fn spawn(&self, task: Box<dyn FnOnce() + Send + 'static>) {
        let spawned = std::thread::Builder::new()
            .name("geometry-save".to_string())
            .spawn(task);
        if let Err(e) = spawned {
            log::warn!("Failed to start window bounds writer: {}", e);
        }
    }
}

/// Single-record store for the last window bounds.
///
/// Last write wins; there is no locking because the shell is the only writer.
#[derive(Debug, Clone)]
pub struct GeometryStore {
    path: PathBuf,
}

impl GeometryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        GeometryStore { path: path.into() }
    }

    /// The store for the given user profile directory.
    pub fn in_profile(profile_dir: &Path) -> Self {
        GeometryStore::new(profile_dir.join(BOUNDS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<WindowBounds, GeometryError> {
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Err(GeometryError::Empty);
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Read the persisted bounds, falling back to the full work area at the
    /// origin if the record is missing or unreadable.
    pub fn load(&self, work_area: WorkArea) -> WindowBounds {
        match self.read() {
            Ok(bounds) => bounds,
            Err(e) => {
                log::debug!(
                    "Using default window bounds ({}): {}",
                    self.path.display(),
                    e
                );
                WindowBounds::covering(work_area)
            }
        }
    }

    pub fn write(&self, bounds: &WindowBounds) -> Result<(), GeometryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(bounds)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Write `bounds` on `spawner` without waiting for it. Failures are logged
    /// and dropped; the write may still be running when the process exits.
    pub fn persist_in_background(&self, bounds: WindowBounds, spawner: &dyn Spawner) {
        let store = self.clone();
        spawner.spawn(Box::new(move || {
            if let Err(e) = store.write(&bounds) {
                log::warn!(
                    "Failed to save window bounds to {}: {}",
                    store.path.display(),
                    e
                );
            }
        }));
    }
}
