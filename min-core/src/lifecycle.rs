use crate::config::ShellConfig;
use crate::dispatch;
use crate::geometry::{Spawner, WindowBounds, WorkArea};
use crate::menu::{self, MenuBuilder, MenuCommand, MenuOutcome, MenuTemplate};
use crate::protocol::{self, SchemeRegistry, MAIL_SCHEME};
use crate::window::{EventResponse, NativeWindow, WindowEvent, WindowLifecycle, WindowSpec};

/// Process-wide shell state. Constructed once at startup and owned by the
/// [`AppController`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppLifecycleState {
    /// Flips to `true` once, when the toolkit reports the process ready.
    pub ready: bool,
    /// URL from an open-url request that arrived before a window could take it.
    pub pending_url: Option<String>,
    /// Display-only Focus Mode flag mirrored by the menu checkbox.
    pub focus_mode_enabled: bool,
}

/// Why a window is being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOrigin {
    /// The first window, created when the process became ready.
    Startup,
    /// Re-created after the user activated the app with no window open.
    Activation,
}

/// Application-level surfaces installed once after the startup window exists.
pub trait ChromeHost: SchemeRegistry {
    /// Install `template` as the process's single application menu.
    fn set_application_menu(&mut self, template: &MenuTemplate);
    fn set_dock_menu(&mut self, template: &MenuTemplate);
}

/// Top-level shell state machine.
///
/// The controller never calls into the toolkit while handling an event; it
/// returns what the frontend must do, so the frontend can act after releasing
/// any borrow of the controller.
pub struct AppController<W> {
    state: AppLifecycleState,
    menu: MenuBuilder,
    windows: WindowLifecycle<W>,
    launch_url: Option<String>,
    /// Open-url requests that arrived after ready but before the startup
    /// window could take them, in arrival order.
    queued_urls: Vec<String>,
    awaiting_initial_load: bool,
    creating_window: bool,
}

impl<W: NativeWindow> AppController<W> {
    pub fn new(menu: MenuBuilder, windows: WindowLifecycle<W>, launch_url: Option<String>) -> Self {
        AppController {
            state: AppLifecycleState::default(),
            menu,
            windows,
            launch_url,
            queued_urls: Vec::new(),
            awaiting_initial_load: false,
            creating_window: false,
        }
    }

    pub fn from_config(config: &ShellConfig, launch_url: Option<String>) -> Self {
        let windows = WindowLifecycle::new(
            config.platform,
            &config.app_name,
            config.content.clone(),
            config.geometry_store(),
        );
        AppController::new(config.menu_builder(), windows, launch_url)
    }

    /// Route background geometry writes through the frontend's executor.
    pub fn with_spawner(mut self, spawner: impl Spawner + 'static) -> Self {
        self.windows.set_spawner(spawner);
        self
    }

    pub fn state(&self) -> &AppLifecycleState {
        &self.state
    }

    pub fn windows(&self) -> &WindowLifecycle<W> {
        &self.windows
    }

    pub fn window(&self) -> Option<&W> {
        self.windows.window()
    }

    /// `true` between a request to create a window and its adoption. The
    /// frontend keeps the process alive for this span.
    pub fn window_creation_pending(&self) -> bool {
        self.creating_window
    }

    /// The process is ready. Returns `true` on the first call only; the
    /// caller then loads the stored geometry and creates the startup window.
    pub fn on_ready(&mut self) -> bool {
        if self.state.ready {
            return false;
        }
        self.state.ready = true;
        self.creating_window = true;
        true
    }

    /// Read the stored bounds, falling back to `work_area`.
    pub fn load_bounds(&self, work_area: WorkArea) -> WindowBounds {
        self.windows.store().load(work_area)
    }

    pub fn window_spec(&self, bounds: WindowBounds, work_area: WorkArea) -> WindowSpec {
        self.windows.window_spec(bounds, work_area)
    }

    /// Adopt a window the frontend created from a [`WindowSpec`].
    ///
    /// Requests queued while an activation window was being created go to it
    /// straight away; the startup window takes them after its first load.
    pub fn on_window_created(&mut self, window: W, origin: WindowOrigin) {
        self.creating_window = false;
        self.windows.attach(window);
        match origin {
            WindowOrigin::Startup => self.awaiting_initial_load = true,
            WindowOrigin::Activation => {
                for url in std::mem::take(&mut self.queued_urls) {
                    dispatch::open_tab(self.windows.window(), &url);
                }
            }
        }
    }

    /// Realize the application menu, the dock menu and the mail-link scheme,
    /// in that order.
    pub fn install_chrome<H>(&self, host: &mut H)
    where
        H: ChromeHost + ?Sized,
    {
        host.set_application_menu(&self.menu.build(self.state.focus_mode_enabled));
        if let Some(dock) = self.menu.build_dock() {
            host.set_dock_menu(&dock);
        }
        protocol::register(host, MAIL_SCHEME);
    }

    /// The startup window finished loading its content for the first time.
    ///
    /// A URL passed on the command line wins over one buffered before the
    /// process was ready. Requests queued after ready follow in arrival order,
    /// except for repeats of the command-line URL forwarded by the toolkit.
    pub fn on_initial_load_finished(&mut self) {
        if !self.awaiting_initial_load {
            return;
        }
        self.awaiting_initial_load = false;
        let pending = self.state.pending_url.take();
        if let (Some(_), Some(url)) = (&self.launch_url, &pending) {
            log::debug!("Command-line URL supersedes open-url request: {}", url);
        }
        let first = self.launch_url.take().or(pending);
        let queued = std::mem::take(&mut self.queued_urls);

        let window = self.windows.window();
        if let Some(url) = &first {
            dispatch::open_tab(window, url);
        }
        for url in queued.iter().filter(|url| Some(*url) != first.as_ref()) {
            dispatch::open_tab(window, url);
        }
    }

    /// The OS asked the app to open `url`.
    pub fn on_open_url(&mut self, url: &str) {
        if !self.state.ready {
            log::debug!("Buffering open-url request until the app is ready: {}", url);
            self.state.pending_url = Some(url.to_string());
            return;
        }
        if self.creating_window || self.awaiting_initial_load {
            log::debug!("Queueing open-url request until the window is loaded: {}", url);
            self.queued_urls.push(url.to_string());
            return;
        }
        dispatch::open_tab(self.windows.window(), url);
    }

    /// Returns `true` if the process must quit now that no window is left.
    pub fn on_all_windows_closed(&self) -> bool {
        self.menu.platform().policy().quit_on_last_window_closed
    }

    /// Returns `true` if activation must create a new window; the caller
    /// then reloads the stored geometry and creates it.
    ///
    /// Activation before the process is ready is dropped, not queued, as is
    /// activation while a window is still being created.
    pub fn on_activate(&mut self) -> bool {
        if !self.state.ready {
            log::debug!("Ignoring activation before the app is ready");
            return false;
        }
        if self.windows.has_window() || self.creating_window {
            return false;
        }
        self.creating_window = true;
        true
    }

    pub fn on_window_event(&mut self, event: WindowEvent) -> EventResponse {
        if event == WindowEvent::Closed && self.awaiting_initial_load {
            self.awaiting_initial_load = false;
            self.drop_startup_urls();
        }
        self.windows.handle_event(event)
    }

    /// The startup window is gone before its content loaded; nothing is left
    /// to open the buffered URLs in.
    fn drop_startup_urls(&mut self) {
        let dropped = self
            .launch_url
            .take()
            .into_iter()
            .chain(self.state.pending_url.take())
            .chain(self.queued_urls.drain(..));
        for url in dropped {
            log::info!("Window closed before loading, dropping open-url request: {}", url);
        }
    }

    pub fn on_menu_command(&mut self, command: &MenuCommand) -> MenuOutcome {
        menu::activate(command, &mut self.state.focus_mode_enabled, self.windows.window())
    }
}

#[cfg(test)]
mod tests {
    use min_content::{Action, ContentTarget};

    use super::*;
    use crate::dispatch::testing::FakeWindow;
    use crate::geometry::testing::InlineSpawner;
    use crate::geometry::GeometryStore;
    use crate::platform::Platform;

    const SCREEN: WorkArea = WorkArea {
        width: 1440,
        height: 900,
    };

    struct Harness {
        _dir: tempfile::TempDir,
        controller: AppController<FakeWindow>,
        next_id: u32,
    }

    impl Harness {
        fn new(platform: Platform, launch_url: Option<&str>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let content = ContentTarget::packaged("/opt/min");
            let menu = MenuBuilder::new(platform, "Min", &content.settings_page_url());
            let windows = WindowLifecycle::new(platform, "Min", content, GeometryStore::in_profile(dir.path()));
            Harness {
                _dir: dir,
                controller: AppController::new(menu, windows, launch_url.map(str::to_string))
                    .with_spawner(InlineSpawner::default()),
                next_id: 1,
            }
        }

        /// Drive the frontend's part of window creation.
        fn create_window(&mut self, origin: WindowOrigin) -> FakeWindow {
            let bounds = self.controller.load_bounds(SCREEN);
            let spec = self.controller.window_spec(bounds, SCREEN);
            let window = FakeWindow::new(self.next_id, spec.bounds);
            self.next_id += 1;
            self.controller.on_window_created(window.clone(), origin);
            window
        }

        fn start(&mut self) -> FakeWindow {
            assert!(self.controller.on_ready());
            self.create_window(WindowOrigin::Startup)
        }
    }

    #[derive(Default)]
    struct RecordingChrome {
        calls: Vec<String>,
        fail_scheme: bool,
    }

    impl SchemeRegistry for RecordingChrome {
        fn register_external(&mut self, scheme: &str) -> Result<(), String> {
            self.calls.push(format!("scheme:{}", scheme));
            if self.fail_scheme {
                Err("unsupported".to_string())
            } else {
                Ok(())
            }
        }
    }

    impl ChromeHost for RecordingChrome {
        fn set_application_menu(&mut self, template: &MenuTemplate) {
            self.calls.push(format!("menu:{}", template.entries.len()));
        }

        fn set_dock_menu(&mut self, template: &MenuTemplate) {
            self.calls.push(format!("dock:{}", template.entries.len()));
        }
    }

    #[test]
    fn ready_fires_once() {
        let mut h = Harness::new(Platform::Linux, None);
        assert!(!h.controller.state().ready);
        assert!(h.controller.on_ready());
        assert!(!h.controller.on_ready());
        assert!(h.controller.state().ready);
    }

    #[test]
    fn first_window_covers_work_area_without_stored_bounds() {
        let mut h = Harness::new(Platform::Linux, None);
        let w = h.start();
        assert_eq!(w.bounds(), WindowBounds::covering(SCREEN));
    }

    #[test]
    fn command_line_url_opens_after_initial_load() {
        let mut h = Harness::new(Platform::Linux, Some("https://example.com"));
        let w = h.start();
        assert!(w.actions().is_empty());

        h.controller.on_initial_load_finished();
        assert_eq!(w.urls_for(Action::AddTab), vec!["https://example.com".to_string()]);

        // One-shot: later loads do not reopen it.
        h.controller.on_initial_load_finished();
        assert_eq!(w.actions(), vec![Action::AddTab]);
    }

    #[test]
    fn open_url_before_ready_is_buffered_then_consumed() {
        let mut h = Harness::new(Platform::MacOs, None);
        h.controller.on_open_url("https://min.example/first");
        h.controller.on_open_url("https://min.example/page");
        assert_eq!(
            h.controller.state().pending_url.as_deref(),
            Some("https://min.example/page")
        );

        let w = h.start();
        h.controller.on_initial_load_finished();

        assert_eq!(w.urls_for(Action::AddTab), vec!["https://min.example/page".to_string()]);
        assert_eq!(w.actions().len(), 1);
        assert_eq!(h.controller.state().pending_url, None);
    }

    #[test]
    fn command_line_url_beats_buffered_url() {
        let mut h = Harness::new(Platform::Linux, Some("https://cli.example/"));
        h.controller.on_open_url("https://buffered.example/");
        let w = h.start();
        h.controller.on_initial_load_finished();
        assert_eq!(w.urls_for(Action::AddTab), vec!["https://cli.example/".to_string()]);
        assert_eq!(h.controller.state().pending_url, None);
    }

    #[test]
    fn open_url_while_ready_dispatches_immediately() {
        let mut h = Harness::new(Platform::Linux, None);
        let w = h.start();
        h.controller.on_initial_load_finished();
        h.controller.on_open_url("https://example.org/");
        assert_eq!(w.urls_for(Action::AddTab), vec!["https://example.org/".to_string()]);
        assert_eq!(h.controller.state().pending_url, None);
    }

    #[test]
    fn open_url_while_startup_window_loads_is_buffered() {
        let mut h = Harness::new(Platform::Linux, None);
        let w = h.start();
        h.controller.on_open_url("https://early.example/");
        assert!(w.actions().is_empty());
        h.controller.on_initial_load_finished();
        assert_eq!(w.urls_for(Action::AddTab), vec!["https://early.example/".to_string()]);
    }

    #[test]
    fn forwarded_launch_url_during_window_creation_opens_once() {
        let mut h = Harness::new(Platform::Linux, Some("https://cli.example/"));
        assert!(h.controller.on_ready());
        // The toolkit forwards the launch URL while the geometry is loading.
        h.controller.on_open_url("https://cli.example/");
        assert_eq!(h.controller.state().pending_url, None);
        let w = h.create_window(WindowOrigin::Startup);
        h.controller.on_initial_load_finished();
        assert_eq!(w.urls_for(Action::AddTab), vec!["https://cli.example/".to_string()]);
    }

    #[test]
    fn distinct_url_during_startup_opens_after_launch_url() {
        let mut h = Harness::new(Platform::Linux, Some("https://cli.example/"));
        let w = h.start();
        h.controller.on_open_url("https://other.example/");
        assert!(w.actions().is_empty());
        h.controller.on_initial_load_finished();
        assert_eq!(
            w.urls_for(Action::AddTab),
            vec!["https://cli.example/".to_string(), "https://other.example/".to_string()]
        );
    }

    #[test]
    fn urls_queued_during_startup_keep_their_order() {
        let mut h = Harness::new(Platform::Linux, None);
        assert!(h.controller.on_ready());
        h.controller.on_open_url("https://a.example/");
        let w = h.create_window(WindowOrigin::Startup);
        h.controller.on_open_url("https://b.example/");
        h.controller.on_open_url("https://a.example/");
        h.controller.on_initial_load_finished();
        assert_eq!(
            w.urls_for(Action::AddTab),
            vec![
                "https://a.example/".to_string(),
                "https://b.example/".to_string(),
                "https://a.example/".to_string()
            ]
        );

        // Drained: a later load opens nothing more.
        h.controller.on_initial_load_finished();
        assert_eq!(w.actions().len(), 3);
    }

    #[test]
    fn window_closed_before_load_drops_buffered_urls() {
        let mut h = Harness::new(Platform::MacOs, Some("https://cli.example/"));
        h.controller.on_open_url("https://before-ready.example/");
        let first = h.start();
        h.controller.on_open_url("https://queued.example/");
        h.controller.on_window_event(WindowEvent::Closed);
        assert_eq!(h.controller.state().pending_url, None);

        assert!(h.controller.on_activate());
        let second = h.create_window(WindowOrigin::Activation);
        h.controller.on_initial_load_finished();
        assert!(first.actions().is_empty());
        assert!(second.actions().is_empty());

        // Requests after the new window exists go straight through.
        h.controller.on_open_url("https://later.example/");
        assert_eq!(second.urls_for(Action::AddTab), vec!["https://later.example/".to_string()]);
    }

    #[test]
    fn url_during_activation_window_creation_opens_in_new_window() {
        let mut h = Harness::new(Platform::MacOs, None);
        h.start();
        h.controller.on_initial_load_finished();
        h.controller.on_window_event(WindowEvent::Closed);

        assert!(h.controller.on_activate());
        h.controller.on_open_url("https://dock.example/");
        let w = h.create_window(WindowOrigin::Activation);
        assert_eq!(w.urls_for(Action::AddTab), vec!["https://dock.example/".to_string()]);
    }

    #[test]
    fn window_creation_pending_spans_request_to_adoption() {
        let mut h = Harness::new(Platform::Linux, None);
        assert!(!h.controller.window_creation_pending());
        assert!(h.controller.on_ready());
        assert!(h.controller.window_creation_pending());
        h.create_window(WindowOrigin::Startup);
        assert!(!h.controller.window_creation_pending());

        h.controller.on_window_event(WindowEvent::Closed);
        assert!(h.controller.on_activate());
        assert!(h.controller.window_creation_pending());
        h.create_window(WindowOrigin::Activation);
        assert!(!h.controller.window_creation_pending());
    }

    #[test]
    fn last_window_closed_quits_except_on_macos() {
        for platform in Platform::ALL {
            let mut h = Harness::new(platform, None);
            h.start();
            h.controller.on_window_event(WindowEvent::Close);
            h.controller.on_window_event(WindowEvent::Closed);
            assert!(h.controller.window().is_none());
            assert_eq!(h.controller.on_all_windows_closed(), platform != Platform::MacOs);
        }
    }

    #[test]
    fn activation_recreates_window_only_when_ready_and_windowless() {
        let mut h = Harness::new(Platform::MacOs, None);
        // Dropped before ready; this is intentional and nothing is queued.
        assert!(!h.controller.on_activate());

        assert!(h.controller.on_ready());
        // The startup window is still being created.
        assert!(!h.controller.on_activate());
        let first = h.create_window(WindowOrigin::Startup);
        assert!(!h.controller.on_activate());

        h.controller.on_window_event(WindowEvent::Closed);
        assert!(h.controller.on_activate());
        assert!(!h.controller.on_activate());
        let second = h.create_window(WindowOrigin::Activation);
        assert_ne!(first.id, second.id);
        assert!(!h.controller.on_activate());
    }

    #[test]
    fn activation_window_does_not_replay_launch_url() {
        let mut h = Harness::new(Platform::MacOs, Some("https://example.com"));
        let first = h.start();
        h.controller.on_window_event(WindowEvent::Closed);
        let second = h.create_window(WindowOrigin::Activation);
        h.controller.on_initial_load_finished();
        assert!(first.actions().is_empty());
        assert!(second.actions().is_empty());
    }

    #[test]
    fn activation_reloads_saved_geometry() {
        let mut h = Harness::new(Platform::MacOs, None);
        h.start();
        h.controller.on_window_event(WindowEvent::Closed);
        let saved = WindowBounds {
            x: 10,
            y: 20,
            width: 900,
            height: 600,
        };
        h.controller.windows().store().write(&saved).unwrap();
        let w = h.create_window(WindowOrigin::Activation);
        assert_eq!(w.bounds(), saved);
    }

    #[test]
    fn dispatch_after_close_is_a_no_op() {
        let mut h = Harness::new(Platform::MacOs, None);
        let w = h.start();
        h.controller.on_initial_load_finished();
        h.controller.on_window_event(WindowEvent::Closed);
        h.controller.on_open_url("https://late.example/");
        h.controller.on_menu_command(&MenuCommand::Dispatch {
            action: Action::ZoomIn,
            payload: None,
        });
        assert!(w.actions().is_empty());
    }

    #[test]
    fn chrome_installs_in_order() {
        let mut h = Harness::new(Platform::MacOs, None);
        h.start();
        let mut chrome = RecordingChrome::default();
        h.controller.install_chrome(&mut chrome);
        assert_eq!(chrome.calls, vec!["menu:7", "dock:3", "scheme:mailto"]);

        let mut linux = Harness::new(Platform::Linux, None);
        linux.start();
        let mut chrome = RecordingChrome {
            fail_scheme: true,
            ..RecordingChrome::default()
        };
        linux.controller.install_chrome(&mut chrome);
        assert_eq!(chrome.calls, vec!["menu:6", "scheme:mailto"]);
    }

    #[test]
    fn focus_mode_menu_toggles_state() {
        let mut h = Harness::new(Platform::Linux, None);
        let w = h.start();
        let cmd = MenuCommand::ToggleFocusMode;
        assert_eq!(h.controller.on_menu_command(&cmd), MenuOutcome::FocusMode(true));
        assert!(h.controller.state().focus_mode_enabled);
        assert_eq!(h.controller.on_menu_command(&cmd), MenuOutcome::FocusMode(false));
        assert!(!h.controller.state().focus_mode_enabled);
        assert_eq!(w.actions(), vec![Action::EnterFocusMode, Action::ExitFocusMode]);
    }
}
