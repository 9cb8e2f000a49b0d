use gtk4::prelude::*;
use gtk4::{gio, glib};
use libadwaita as adw;
use libadwaita::prelude::*;
use min_core::accelerator;
use min_core::menu::{MenuEntry, MenuItem, MenuOutcome, MenuRole, MenuTemplate, NativeAction};
use min_core::protocol::{self, ExternalOpener, SchemeRegistry};
use min_core::ChromeHost;
use webkit6::prelude::*;

use crate::context::Shell;
use crate::window::BrowserWindow;

/// Realizes menu templates as application actions and a `gio::Menu` menubar,
/// and binds delegated URI schemes on the default web context.
pub(crate) struct GtkChrome {
    shell: Shell,
}

impl GtkChrome {
    pub fn new(shell: &Shell) -> Self {
        GtkChrome {
            shell: shell.clone(),
        }
    }

    /// Build a menu whose separators become section breaks.
    fn realize(&self, entries: &[MenuEntry]) -> gio::Menu {
        let menu = gio::Menu::new();
        let mut section = gio::Menu::new();
        for entry in entries {
            match entry {
                MenuEntry::Separator => {
                    if section.n_items() > 0 {
                        menu.append_section(None, &section);
                        section = gio::Menu::new();
                    }
                }
                MenuEntry::Item(item) => {
                    self.install_action(item);
                    section.append_item(&gio::MenuItem::new(
                        Some(&item.label),
                        Some(&format!("app.{}", item.id)),
                    ));
                }
                MenuEntry::Submenu(submenu) => {
                    section.append_submenu(Some(&submenu.label), &self.realize(&submenu.entries));
                }
            }
        }
        if section.n_items() > 0 {
            menu.append_section(None, &section);
        }
        menu
    }

    fn install_action(&self, item: &MenuItem) {
        let action = match item.checked {
            Some(checked) => gio::SimpleAction::new_stateful(item.id, None, &checked.to_variant()),
            None => gio::SimpleAction::new(item.id, None),
        };

        let shell = self.shell.clone();
        let command = item.command.clone();
        action.connect_activate(move |action, _| {
            let outcome = shell.controller.borrow_mut().on_menu_command(&command);
            match outcome {
                MenuOutcome::Dispatched => {}
                MenuOutcome::FocusMode(enabled) => action.set_state(&enabled.to_variant()),
                MenuOutcome::Native(native) => perform(&shell, native),
            }
        });
        self.shell.app.add_action(&action);

        if let Some(accel) = item
            .accelerator
            .and_then(|a| accelerator::to_gtk_accel(a, self.shell.platform))
        {
            self.shell
                .app
                .set_accels_for_action(&format!("app.{}", item.id), &[accel.as_str()]);
        }
    }
}

impl SchemeRegistry for GtkChrome {
    fn register_external(&mut self, scheme: &str) -> Result<(), String> {
        let context =
            webkit6::WebContext::default().ok_or_else(|| "No default web context".to_string())?;
        context.register_uri_scheme(scheme, |request| {
            if let Some(uri) = request.uri() {
                protocol::delegate(&SystemOpener, &uri);
            }
            let mut error = glib::Error::new(gio::IOErrorEnum::Cancelled, "Opened externally");
            request.finish_error(&mut error);
        });
        Ok(())
    }
}

impl ChromeHost for GtkChrome {
    fn set_application_menu(&mut self, template: &MenuTemplate) {
        let menubar = gio::Menu::new();
        for entry in &template.entries {
            match entry {
                MenuEntry::Submenu(submenu) => {
                    menubar.append_submenu(Some(&submenu.label), &self.realize(&submenu.entries));
                }
                MenuEntry::Item(item) => {
                    self.install_action(item);
                    menubar.append_item(&gio::MenuItem::new(
                        Some(&item.label),
                        Some(&format!("app.{}", item.id)),
                    ));
                }
                MenuEntry::Separator => {}
            }
        }
        self.shell.app.set_menubar(Some(&menubar));
    }

    fn set_dock_menu(&mut self, template: &MenuTemplate) {
        log::debug!("No dock on this desktop, skipping {} dock entries", template.entries.len());
    }
}

struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open_external(&self, url: &str) -> Result<(), String> {
        gio::AppInfo::launch_default_for_uri(url, None::<&gio::AppLaunchContext>)
            .map_err(|e| e.to_string())
    }
}

fn perform(shell: &Shell, native: NativeAction) {
    if native == NativeAction::Role(MenuRole::Quit) {
        // Closing first lets the window persist its geometry.
        if let Some(browser) = shell.current_window() {
            browser.window.close();
        }
        shell.quit_later();
        return;
    }

    let Some(browser) = shell.current_window() else {
        log::debug!("No window for {:?}", native);
        return;
    };
    match native {
        NativeAction::Role(role) => perform_role(shell, &browser, role),
        NativeAction::ReloadBrowser => browser.webview.reload(),
        NativeAction::InspectBrowser => {
            if let Some(inspector) = browser.webview.inspector() {
                if inspector.is_attached() {
                    inspector.close();
                } else {
                    inspector.show();
                }
            }
        }
    }
}

fn perform_role(shell: &Shell, browser: &BrowserWindow, role: MenuRole) {
    let window = &browser.window;
    match role {
        MenuRole::Undo => browser.webview.execute_editing_command("Undo"),
        MenuRole::Redo => browser.webview.execute_editing_command("Redo"),
        MenuRole::Cut => browser.webview.execute_editing_command("Cut"),
        MenuRole::Copy => browser.webview.execute_editing_command("Copy"),
        MenuRole::Paste => browser.webview.execute_editing_command("Paste"),
        MenuRole::SelectAll => browser.webview.execute_editing_command("SelectAll"),
        MenuRole::ToggleFullScreen => {
            if window.is_fullscreen() {
                window.unfullscreen();
            } else {
                window.fullscreen();
            }
        }
        MenuRole::Minimize => window.minimize(),
        MenuRole::Close => window.close(),
        MenuRole::Front => window.present(),
        MenuRole::About => {
            let about = adw::AboutDialog::builder()
                .application_name(shell.app_name.as_str())
                .application_icon("icon256")
                .version(env!("CARGO_PKG_VERSION"))
                .website("https://minbrowser.org")
                .build();
            about.present(Some(window));
        }
        MenuRole::Services
        | MenuRole::Hide
        | MenuRole::HideOthers
        | MenuRole::Unhide
        | MenuRole::Window
        | MenuRole::Help
        | MenuRole::Quit => {
            log::debug!("{:?} has no GTK counterpart", role);
        }
    }
}
