use std::path::PathBuf;

use min_content::{Action, ContentTarget, Payload};

use crate::dispatch::{self, ContentSurface};
use crate::download::{self, DownloadDecision, DownloadInfo};
use crate::geometry::{
    self, GeometryStore, Spawner, ThreadSpawner, WindowBounds, WorkArea, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
};
use crate::navigation::NavigationPolicy;
use crate::platform::{Platform, TitleBarStyle};

pub const APP_COMMAND_BACK: &str = "browser-backward";
pub const APP_COMMAND_FORWARD: &str = "browser-forward";

/// The live top-level window as seen by the shell.
pub trait NativeWindow: ContentSurface {
    /// Current position and size.
    fn bounds(&self) -> WindowBounds;
}

/// Everything the frontend needs to create the native window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub title: String,
    pub bounds: WindowBounds,
    pub min_width: i32,
    pub min_height: i32,
    /// Maximize right after creation.
    pub maximize: bool,
    pub title_bar_style: TitleBarStyle,
    pub icon: PathBuf,
    /// The content document loaded at creation; the only allowed top-level
    /// navigation target.
    pub load_url: String,
}

/// Events a window or its webview session reports to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// The window is about to close.
    Close,
    /// The window has been destroyed.
    Closed,
    WillDownload(DownloadInfo),
    EnterFullScreen,
    LeaveFullScreen,
    /// A platform app-command such as a mouse back button.
    AppCommand(String),
    /// The content surface is about to navigate to a new top-level URL.
    WillNavigate(String),
}

/// Whether the default handling of an event must be suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Proceed,
    PreventDefault,
}

/// Owns the single window handle and translates its events.
pub struct WindowLifecycle<W> {
    platform: Platform,
    title: String,
    content: ContentTarget,
    navigation: NavigationPolicy,
    store: GeometryStore,
    spawner: Box<dyn Spawner>,
    window: Option<W>,
}

impl<W: NativeWindow> WindowLifecycle<W> {
    pub fn new(platform: Platform, title: &str, content: ContentTarget, store: GeometryStore) -> Self {
        let navigation = NavigationPolicy::new(&content.load_url());
        WindowLifecycle {
            platform,
            title: title.to_string(),
            content,
            navigation,
            store,
            spawner: Box::new(ThreadSpawner),
            window: None,
        }
    }

    /// Run background geometry writes on `spawner` instead of a fresh thread.
    pub fn set_spawner(&mut self, spawner: impl Spawner + 'static) {
        self.spawner = Box::new(spawner);
    }

    pub fn store(&self) -> &GeometryStore {
        &self.store
    }

    pub fn window(&self) -> Option<&W> {
        self.window.as_ref()
    }

    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    /// Describe the window to create for `bounds` on a display whose usable
    /// area is `work_area`.
    pub fn window_spec(&self, bounds: WindowBounds, work_area: WorkArea) -> WindowSpec {
        let policy = self.platform.policy();
        if !bounds.meets_minimum_size() {
            log::debug!(
                "Raising stored window size {}x{} to the minimum",
                bounds.width,
                bounds.height
            );
        }
        WindowSpec {
            title: self.title.clone(),
            bounds: bounds.with_minimum_size(),
            min_width: MIN_WINDOW_WIDTH,
            min_height: MIN_WINDOW_HEIGHT,
            maximize: geometry::should_maximize(self.platform, &bounds, work_area),
            title_bar_style: policy.title_bar_style,
            icon: self.content.icon_path(),
            load_url: self.content.load_url(),
        }
    }

    /// Take ownership of a newly created window.
    pub fn attach(&mut self, window: W) {
        if self.window.is_some() {
            log::warn!("Replacing a live window handle");
        }
        self.window = Some(window);
    }

    pub fn handle_event(&mut self, event: WindowEvent) -> EventResponse {
        match event {
            WindowEvent::Close => {
                if let Some(window) = &self.window {
                    self.store.persist_in_background(window.bounds(), self.spawner.as_ref());
                }
                EventResponse::Proceed
            }
            WindowEvent::Closed => {
                self.window = None;
                EventResponse::Proceed
            }
            WindowEvent::WillDownload(info) => {
                let decision = download::classify(&info);
                let response = if decision.prevents_default() {
                    EventResponse::PreventDefault
                } else {
                    EventResponse::Proceed
                };
                if let DownloadDecision::OpenInViewer(pdf) = decision {
                    log::info!("Opening PDF download in viewer: {}", pdf.url);
                    dispatch::dispatch(self.window.as_ref(), Action::OpenPdf, Some(&Payload::OpenPdf(pdf)));
                }
                response
            }
            WindowEvent::EnterFullScreen => {
                dispatch::dispatch(self.window.as_ref(), Action::EnterFullScreen, None);
                EventResponse::Proceed
            }
            WindowEvent::LeaveFullScreen => {
                dispatch::dispatch(self.window.as_ref(), Action::LeaveFullScreen, None);
                EventResponse::Proceed
            }
            WindowEvent::AppCommand(command) => {
                match command.as_str() {
                    APP_COMMAND_BACK => dispatch::dispatch(self.window.as_ref(), Action::GoBack, None),
                    APP_COMMAND_FORWARD => {
                        dispatch::dispatch(self.window.as_ref(), Action::GoForward, None)
                    }
                    _ => {}
                }
                EventResponse::Proceed
            }
            WindowEvent::WillNavigate(url) => {
                if self.navigation.allows(&url) {
                    EventResponse::Proceed
                } else {
                    log::info!("Prevented top-level navigation to {}", url);
                    EventResponse::PreventDefault
                }
            }
        }
    }
}
