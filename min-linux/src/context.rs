use std::cell::RefCell;
use std::rc::Rc;

use gtk4::gio;
use libadwaita as adw;
use min_core::{AppController, Platform};

use crate::window::BrowserWindow;

pub(crate) type Controller = AppController<BrowserWindow>;

/// Shared application state passed between the shell's signal handlers.
///
/// All fields are cheaply cloneable. Handlers borrow `controller` only for the
/// duration of a single call and perform toolkit work after the borrow ends.
#[derive(Clone)]
pub(crate) struct Shell {
    pub app: adw::Application,
    pub controller: Rc<RefCell<Controller>>,
    pub platform: Platform,
    pub app_name: String,
    /// Keeps the process alive with no window open on platforms that do not
    /// quit when the last window closes.
    pub hold: Rc<RefCell<Option<gio::ApplicationHoldGuard>>>,
}

impl Shell {
    /// The live window, cloned out so no borrow outlives this call.
    pub fn current_window(&self) -> Option<BrowserWindow> {
        self.controller.borrow().window().cloned()
    }

    pub fn quit_later(&self) {
        self.hold.borrow_mut().take();
        let app = self.app.clone();
        gtk4::glib::idle_add_local_once(move || app.quit());
    }
}
