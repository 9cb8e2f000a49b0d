//! Platform-neutral application shell for the Min browser.
//!
//! Owns the lifecycle of the single top-level window, persists its geometry,
//! builds the platform menus and translates OS events into the one-way
//! messages understood by the content surface (see `min_content::protocol`).
//! Toolkit frontends implement [`window::NativeWindow`] and
//! [`lifecycle::ChromeHost`] and feed events into [`lifecycle::AppController`].

pub mod accelerator;
pub mod config;
pub mod dispatch;
pub mod download;
pub mod geometry;
pub mod launch;
pub mod lifecycle;
pub mod menu;
pub mod navigation;
pub mod platform;
pub mod protocol;
pub mod window;

pub use config::{ConfigOverrides, ShellConfig};
pub use geometry::{GeometryStore, WindowBounds, WorkArea};
pub use lifecycle::{AppController, AppLifecycleState, ChromeHost, WindowOrigin};
pub use platform::Platform;
pub use window::{EventResponse, NativeWindow, WindowEvent, WindowSpec};
