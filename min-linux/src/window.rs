use std::cell::RefCell;
use std::path::Path;

use gtk4::prelude::*;
use gtk4::{gdk, gio, glib};
use libadwaita as adw;
use min_content::{bridge, ContentMessage};
use min_core::dispatch::ContentSurface;
use min_core::geometry::Spawner;
use min_core::download::DownloadInfo;
use min_core::platform::TitleBarStyle;
use min_core::window::{APP_COMMAND_BACK, APP_COMMAND_FORWARD};
use min_core::{EventResponse, NativeWindow, WindowBounds, WindowEvent, WindowOrigin, WindowSpec, WorkArea};
use webkit6::prelude::*;

use crate::context::Shell;
use crate::menu;

const FALLBACK_WORK_AREA: WorkArea = WorkArea {
    width: 1280,
    height: 800,
};

/// Mouse buttons GDK reports for the side "back" and "forward" keys.
const MOUSE_BACK_BUTTON: u32 = 8;
const MOUSE_FORWARD_BUTTON: u32 = 9;

/// The shell's top-level window and the webview hosting the browser UI.
#[derive(Clone)]
pub(crate) struct BrowserWindow {
    pub window: gtk4::ApplicationWindow,
    pub webview: webkit6::WebView,
    /// GTK cannot query or set a toplevel's position, so the stored origin is
    /// carried through unchanged.
    origin: (i32, i32),
}

impl ContentSurface for BrowserWindow {
    fn deliver(&self, message: ContentMessage) {
        let Some(script) = bridge::delivery_script(&message) else {
            return;
        };
        self.webview.evaluate_javascript(
            &script,
            None,
            None,
            None::<&gio::Cancellable>,
            |result| {
                if let Err(e) = result {
                    log::debug!("Content script failed: {}", e);
                }
            },
        );
    }
}

impl NativeWindow for BrowserWindow {
    fn bounds(&self) -> WindowBounds {
        WindowBounds {
            x: self.origin.0,
            y: self.origin.1,
            width: self.window.width(),
            height: self.window.height(),
        }
    }
}

/// Runs background geometry writes on GIO's blocking pool, next to the reads.
pub(crate) struct GioSpawner;

impl Spawner for GioSpawner {
    fn spawn(&self, task: Box<dyn FnOnce() + Send + 'static>) {
        // Not awaited; the task runs to completion without it.
        drop(gio::spawn_blocking(task));
    }
}

/// Load the stored geometry off the main thread, then create the window and
/// hand it to the controller. The startup window also installs the
/// application chrome.
///
/// The application is held until the window exists, otherwise the main loop
/// returns before the load completes.
pub(crate) fn open(shell: &Shell, origin: WindowOrigin) {
    let work_area = primary_work_area();
    let store = shell.controller.borrow().windows().store().clone();
    let hold = shell.app.hold();
    let shell = shell.clone();
    glib::spawn_future_local(async move {
        let bounds = match gio::spawn_blocking(move || store.load(work_area)).await {
            Ok(bounds) => bounds,
            Err(_) => {
                log::warn!("Window geometry load panicked, using the full work area");
                WindowBounds::covering(work_area)
            }
        };

        let spec = shell.controller.borrow().window_spec(bounds, work_area);
        let window = build(&shell, &spec);
        shell.controller.borrow_mut().on_window_created(window, origin);
        drop(hold);

        if origin == WindowOrigin::Startup {
            let mut chrome = menu::GtkChrome::new(&shell);
            shell.controller.borrow().install_chrome(&mut chrome);
        }
    });
}

/// Size of the first monitor.
///
/// GDK 4 only offers a work-area query on X11, and Wayland does not expose
/// panel or dock struts to clients. The full monitor rectangle therefore
/// stands in for the work area; it only sizes the first window when no
/// bounds are stored.
fn primary_work_area() -> WorkArea {
    gdk::Display::default()
        .and_then(|display| display.monitors().item(0))
        .and_downcast::<gdk::Monitor>()
        .map(|monitor| {
            let geometry = monitor.geometry();
            WorkArea {
                width: geometry.width(),
                height: geometry.height(),
            }
        })
        .unwrap_or(FALLBACK_WORK_AREA)
}

fn report(shell: &Shell, event: WindowEvent) -> EventResponse {
    shell.controller.borrow_mut().on_window_event(event)
}

fn build(shell: &Shell, spec: &WindowSpec) -> BrowserWindow {
    let window = gtk4::ApplicationWindow::builder()
        .application(&shell.app)
        .title(spec.title.as_str())
        .default_width(spec.bounds.width)
        .default_height(spec.bounds.height)
        .show_menubar(true)
        .build();
    window.set_size_request(spec.min_width, spec.min_height);
    apply_icon(&window, &spec.icon);

    if spec.title_bar_style == TitleBarStyle::HiddenInset {
        let header = adw::HeaderBar::new();
        header.set_title_widget(Some(&gtk4::Box::new(gtk4::Orientation::Horizontal, 0)));
        header.add_css_class("flat");
        window.set_titlebar(Some(&header));
    }

    let webview = webkit6::WebView::builder().hexpand(true).vexpand(true).build();
    if let Some(settings) = webkit6::prelude::WebViewExt::settings(&webview) {
        settings.set_enable_developer_extras(true);
    }
    window.set_child(Some(&webview));

    let browser = BrowserWindow {
        window: window.clone(),
        webview: webview.clone(),
        origin: (spec.bounds.x, spec.bounds.y),
    };

    connect_window_signals(shell, &browser);
    connect_webview_signals(shell, &webview);

    webview.load_uri(&spec.load_url);
    if spec.maximize {
        window.maximize();
    }
    window.present();
    log::info!(
        "Created window {}x{} (maximized: {}) loading {}",
        spec.bounds.width,
        spec.bounds.height,
        spec.maximize,
        spec.load_url
    );
    browser
}

fn apply_icon(window: &gtk4::ApplicationWindow, icon: &Path) {
    let (Some(dir), Some(name)) = (icon.parent(), icon.file_stem().and_then(|s| s.to_str())) else {
        return;
    };
    if let Some(display) = gdk::Display::default() {
        gtk4::IconTheme::for_display(&display).add_search_path(dir);
    }
    window.set_icon_name(Some(name));
}

fn connect_window_signals(shell: &Shell, browser: &BrowserWindow) {
    let window = &browser.window;

    // Downloads are reported by the session, which outlives the window.
    let session = browser.webview.network_session();
    let download_handler = session.as_ref().map(|session| {
        let shell = shell.clone();
        session.connect_download_started(move |_session, download| {
            let shell = shell.clone();
            download.connect_decide_destination(move |download, _suggested| {
                let Some(info) = download_info(download) else {
                    return false;
                };
                match report(&shell, WindowEvent::WillDownload(info)) {
                    EventResponse::PreventDefault => {
                        download.cancel();
                        true
                    }
                    EventResponse::Proceed => false,
                }
            });
        })
    });

    {
        let shell = shell.clone();
        window.connect_close_request(move |_window| {
            report(&shell, WindowEvent::Close);
            glib::Propagation::Proceed
        });
    }

    {
        let shell = shell.clone();
        let download_handler = RefCell::new(session.zip(download_handler));
        window.connect_destroy(move |_window| {
            if let Some((session, handler)) = download_handler.borrow_mut().take() {
                session.disconnect(handler);
            }
            report(&shell, WindowEvent::Closed);
            let quit = {
                let controller = shell.controller.borrow();
                controller.window().is_none()
                    && !controller.window_creation_pending()
                    && controller.on_all_windows_closed()
            };
            if quit {
                log::info!("Last window closed, quitting");
                shell.quit_later();
            }
        });
    }

    {
        let shell = shell.clone();
        window.connect_fullscreened_notify(move |window| {
            let event = if window.is_fullscreen() {
                WindowEvent::EnterFullScreen
            } else {
                WindowEvent::LeaveFullScreen
            };
            report(&shell, event);
        });
    }

    {
        let shell = shell.clone();
        let buttons = gtk4::GestureClick::new();
        buttons.set_button(0);
        buttons.set_propagation_phase(gtk4::PropagationPhase::Capture);
        buttons.connect_pressed(move |gesture, _n_press, _x, _y| {
            let command = match gesture.current_button() {
                MOUSE_BACK_BUTTON => APP_COMMAND_BACK,
                MOUSE_FORWARD_BUTTON => APP_COMMAND_FORWARD,
                _ => return,
            };
            report(&shell, WindowEvent::AppCommand(command.to_string()));
        });
        window.add_controller(buttons);
    }
}

fn connect_webview_signals(shell: &Shell, webview: &webkit6::WebView) {
    {
        let shell = shell.clone();
        webview.connect_decide_policy(move |_view, decision, decision_type| {
            if decision_type != webkit6::PolicyDecisionType::NavigationAction {
                return false;
            }
            let Some(uri) = decision
                .downcast_ref::<webkit6::NavigationPolicyDecision>()
                .and_then(|d| d.navigation_action())
                .and_then(|mut action| action.request())
                .and_then(|request| request.uri())
            else {
                return false;
            };
            match report(&shell, WindowEvent::WillNavigate(uri.to_string())) {
                EventResponse::PreventDefault => {
                    decision.ignore();
                    true
                }
                EventResponse::Proceed => false,
            }
        });
    }

    {
        let shell = shell.clone();
        webview.connect_load_changed(move |_view, event| {
            if event == webkit6::LoadEvent::Finished {
                shell.controller.borrow_mut().on_initial_load_finished();
            }
        });
    }
}

fn download_info(download: &webkit6::Download) -> Option<DownloadInfo> {
    let url = download.request()?.uri()?.to_string();
    let mime_type = download
        .response()
        .and_then(|response| response.mime_type())
        .map(|m| m.to_string())
        .unwrap_or_default();
    let content_process_id = download.web_view().map(|view| view.page_id()).unwrap_or_default();
    Some(DownloadInfo {
        url,
        mime_type,
        content_process_id,
    })
}
