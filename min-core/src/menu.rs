use min_content::{Action, Payload};

use crate::dispatch::{self, ContentSurface};
use crate::platform::Platform;

pub const KEYBOARD_SHORTCUTS_URL: &str = "https://github.com/minbrowser/min/wiki#keyboard-shortcuts";
pub const REPORT_BUG_URL: &str = "https://github.com/minbrowser/min/issues/new";
pub const TOUR_URL: &str = "https://minbrowser.github.io/min/tour/";
pub const GITHUB_URL: &str = "https://github.com/minbrowser/min";

// ---------------------------------------------------------------------------
// Template model
// ---------------------------------------------------------------------------

/// Behaviour the toolkit provides natively for a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuRole {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    ToggleFullScreen,
    Minimize,
    Close,
    About,
    Services,
    Hide,
    HideOthers,
    Unhide,
    Front,
    Window,
    Help,
    Quit,
}

/// Work the frontend performs itself instead of notifying the content surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeAction {
    Role(MenuRole),
    /// Reload the shell's own content document.
    ReloadBrowser,
    /// Toggle developer tools for the shell's own content document.
    InspectBrowser,
}

/// What activating a menu item does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    Dispatch {
        action: Action,
        payload: Option<Payload>,
    },
    ToggleFocusMode,
    Native(NativeAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Stable identifier, unique within one template.
    pub id: &'static str,
    pub label: String,
    pub accelerator: Option<&'static str>,
    pub command: MenuCommand,
    /// `Some(checked)` for checkbox items.
    pub checked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submenu {
    pub label: String,
    pub role: Option<MenuRole>,
    pub entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
    Submenu(Submenu),
}

/// An ordered menu tree, built fresh for every realization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuTemplate {
    pub entries: Vec<MenuEntry>,
}

impl MenuTemplate {
    /// All action items in the template, depth first.
    pub fn items(&self) -> Vec<&MenuItem> {
        fn collect<'a>(entries: &'a [MenuEntry], out: &mut Vec<&'a MenuItem>) {
            for entry in entries {
                match entry {
                    MenuEntry::Item(item) => out.push(item),
                    MenuEntry::Submenu(sub) => collect(&sub.entries, out),
                    MenuEntry::Separator => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.entries, &mut out);
        out
    }

    pub fn find(&self, id: &str) -> Option<&MenuItem> {
        self.items().into_iter().find(|item| item.id == id)
    }

    /// The top-level submenu with the given label.
    pub fn submenu(&self, label: &str) -> Option<&Submenu> {
        self.entries.iter().find_map(|entry| match entry {
            MenuEntry::Submenu(sub) if sub.label == label => Some(sub),
            _ => None,
        })
    }
}

fn dispatch_item(
    id: &'static str,
    label: &str,
    accelerator: Option<&'static str>,
    action: Action,
) -> MenuEntry {
    MenuEntry::Item(MenuItem {
        id,
        label: label.to_string(),
        accelerator,
        command: MenuCommand::Dispatch {
            action,
            payload: None,
        },
        checked: None,
    })
}

fn open_tab_item(id: &'static str, label: &str, accelerator: Option<&'static str>, url: &str) -> MenuEntry {
    MenuEntry::Item(MenuItem {
        id,
        label: label.to_string(),
        accelerator,
        command: MenuCommand::Dispatch {
            action: Action::AddTab,
            payload: Some(Payload::open_tab(url)),
        },
        checked: None,
    })
}

fn native_item(
    id: &'static str,
    label: &str,
    accelerator: Option<&'static str>,
    action: NativeAction,
) -> MenuEntry {
    MenuEntry::Item(MenuItem {
        id,
        label: label.to_string(),
        accelerator,
        command: MenuCommand::Native(action),
        checked: None,
    })
}

fn role_item(id: &'static str, label: &str, accelerator: Option<&'static str>, role: MenuRole) -> MenuEntry {
    native_item(id, label, accelerator, NativeAction::Role(role))
}

fn submenu(label: &str, role: Option<MenuRole>, entries: Vec<MenuEntry>) -> Submenu {
    Submenu {
        label: label.to_string(),
        role,
        entries,
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds the application menu and dock menu for one platform.
#[derive(Debug, Clone)]
pub struct MenuBuilder {
    platform: Platform,
    app_name: String,
    settings_url: String,
}

impl MenuBuilder {
    pub fn new(platform: Platform, app_name: &str, settings_url: &str) -> Self {
        MenuBuilder {
            platform,
            app_name: app_name.to_string(),
            settings_url: settings_url.to_string(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Build the application menu. `focus_mode` seeds the Focus Mode checkbox.
    pub fn build(&self, focus_mode: bool) -> MenuTemplate {
        let policy = self.platform.policy();

        let mut edit = self.edit_menu();
        if policy.preferences_in_edit_menu {
            edit.entries.push(MenuEntry::Separator);
            edit.entries.push(self.preferences_item());
        }

        let mut window = submenu(
            "Window",
            Some(MenuRole::Window),
            vec![
                role_item("minimize", "Minimize", Some("CmdOrCtrl+M"), MenuRole::Minimize),
                role_item("close", "Close", Some("CmdOrCtrl+W"), MenuRole::Close),
            ],
        );
        if policy.bring_all_to_front {
            window.entries.push(MenuEntry::Separator);
            window
                .entries
                .push(role_item("bring-all-to-front", "Bring All to Front", None, MenuRole::Front));
        }

        let mut entries = Vec::new();
        if policy.app_submenu {
            entries.push(MenuEntry::Submenu(self.app_menu()));
        }
        entries.push(MenuEntry::Submenu(file_menu()));
        entries.push(MenuEntry::Submenu(edit));
        entries.push(MenuEntry::Submenu(self.view_menu(focus_mode)));
        entries.push(MenuEntry::Submenu(self.developer_menu()));
        entries.push(MenuEntry::Submenu(window));
        entries.push(MenuEntry::Submenu(help_menu()));
        MenuTemplate { entries }
    }

    /// Build the dock menu, or `None` on platforms without a dock.
    pub fn build_dock(&self) -> Option<MenuTemplate> {
        if !self.platform.policy().has_dock {
            return None;
        }
        Some(MenuTemplate {
            entries: vec![
                dispatch_item("dock-new-tab", "New Tab", None, Action::AddTab),
                dispatch_item("dock-new-private-tab", "New Private Tab", None, Action::AddPrivateTab),
                dispatch_item("dock-new-task", "New Task", None, Action::AddTask),
            ],
        })
    }

    fn preferences_item(&self) -> MenuEntry {
        open_tab_item("preferences", "Preferences", Some("CmdOrCtrl+,"), &self.settings_url)
    }

    fn app_menu(&self) -> Submenu {
        let name = &self.app_name;
        submenu(
            name,
            None,
            vec![
                role_item("about", &format!("About {}", name), None, MenuRole::About),
                MenuEntry::Separator,
                self.preferences_item(),
                MenuEntry::Submenu(submenu("Services", Some(MenuRole::Services), Vec::new())),
                MenuEntry::Separator,
                role_item("hide", &format!("Hide {}", name), Some("CmdOrCtrl+H"), MenuRole::Hide),
                role_item("hide-others", "Hide Others", Some("CmdOrCtrl+Shift+H"), MenuRole::HideOthers),
                role_item("show-all", "Show All", None, MenuRole::Unhide),
                MenuEntry::Separator,
                role_item("quit", &format!("Quit {}", name), Some("CmdOrCtrl+Q"), MenuRole::Quit),
            ],
        )
    }

    fn edit_menu(&self) -> Submenu {
        submenu(
            "Edit",
            None,
            vec![
                role_item("undo", "Undo", Some("CmdOrCtrl+Z"), MenuRole::Undo),
                role_item("redo", "Redo", Some("Shift+CmdOrCtrl+Z"), MenuRole::Redo),
                MenuEntry::Separator,
                role_item("cut", "Cut", Some("CmdOrCtrl+X"), MenuRole::Cut),
                role_item("copy", "Copy", Some("CmdOrCtrl+C"), MenuRole::Copy),
                role_item("paste", "Paste", Some("CmdOrCtrl+V"), MenuRole::Paste),
                role_item("select-all", "Select All", Some("CmdOrCtrl+A"), MenuRole::SelectAll),
                MenuEntry::Separator,
                dispatch_item("find", "Find", Some("CmdOrCtrl+F"), Action::FindInPage),
            ],
        )
    }

    fn view_menu(&self, focus_mode: bool) -> Submenu {
        let policy = self.platform.policy();
        submenu(
            "View",
            None,
            vec![
                dispatch_item("zoom-in", "Zoom In", Some("CmdOrCtrl+="), Action::ZoomIn),
                dispatch_item("zoom-out", "Zoom Out", Some("CmdOrCtrl+-"), Action::ZoomOut),
                dispatch_item("actual-size", "Actual Size", Some("CmdOrCtrl+0"), Action::ZoomReset),
                MenuEntry::Separator,
                role_item(
                    "full-screen",
                    "Full Screen",
                    Some(policy.full_screen_accelerator),
                    MenuRole::ToggleFullScreen,
                ),
                MenuEntry::Item(MenuItem {
                    id: "focus-mode",
                    label: "Focus Mode".to_string(),
                    accelerator: None,
                    command: MenuCommand::ToggleFocusMode,
                    checked: Some(focus_mode),
                }),
                dispatch_item("reading-list", "Reading List", None, Action::ShowReadingList),
            ],
        )
    }

    fn developer_menu(&self) -> Submenu {
        submenu(
            "Developer",
            None,
            vec![
                native_item("reload-browser", "Reload Browser", None, NativeAction::ReloadBrowser),
                native_item("inspect-browser", "Inspect Browser", None, NativeAction::InspectBrowser),
                MenuEntry::Separator,
                dispatch_item(
                    "inspect-page",
                    "Inspect Page",
                    Some(self.platform.policy().inspect_page_accelerator),
                    Action::InspectPage,
                ),
            ],
        )
    }
}

fn file_menu() -> Submenu {
    submenu(
        "File",
        None,
        vec![
            dispatch_item("new-tab", "New Tab", Some("CmdOrCtrl+t"), Action::AddTab),
            dispatch_item("new-private-tab", "New Private Tab", Some("shift+CmdOrCtrl+p"), Action::AddPrivateTab),
            dispatch_item("new-task", "New Task", Some("CmdOrCtrl+n"), Action::AddTask),
            MenuEntry::Separator,
            dispatch_item("save-page", "Save Page As", Some("CmdOrCtrl+s"), Action::SaveCurrentPage),
            MenuEntry::Separator,
            dispatch_item("print", "Print", Some("CmdOrCtrl+p"), Action::Print),
        ],
    )
}

fn help_menu() -> Submenu {
    submenu(
        "Help",
        Some(MenuRole::Help),
        vec![
            open_tab_item("keyboard-shortcuts", "Keyboard Shortcuts", None, KEYBOARD_SHORTCUTS_URL),
            open_tab_item("report-bug", "Report a Bug", None, REPORT_BUG_URL),
            open_tab_item("take-tour", "Take a Tour", None, TOUR_URL),
            open_tab_item("view-on-github", "View on GitHub", None, GITHUB_URL),
        ],
    )
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

/// Result of activating a menu command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// A message went to the content surface (or was dropped for lack of a window).
    Dispatched,
    /// Focus Mode flipped; the checkbox must show the new state.
    FocusMode(bool),
    /// The frontend must perform this itself.
    Native(NativeAction),
}

/// Translate a menu command into at most one dispatch.
///
/// `focus_mode` is the shell's Focus Mode flag; it is the only state a menu
/// command may change.
pub fn activate<S>(command: &MenuCommand, focus_mode: &mut bool, target: Option<&S>) -> MenuOutcome
where
    S: ContentSurface + ?Sized,
{
    match command {
        MenuCommand::Dispatch { action, payload } => {
            dispatch::dispatch(target, *action, payload.as_ref());
            MenuOutcome::Dispatched
        }
        MenuCommand::ToggleFocusMode => {
            *focus_mode = !*focus_mode;
            let action = if *focus_mode {
                Action::EnterFocusMode
            } else {
                Action::ExitFocusMode
            };
            dispatch::dispatch(target, action, None);
            MenuOutcome::FocusMode(*focus_mode)
        }
        MenuCommand::Native(native) => MenuOutcome::Native(*native),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::dispatch::testing::FakeWindow;
    use crate::geometry::WindowBounds;

    const SETTINGS: &str = "file:///opt/min/pages/settings/index.html";

    fn builder(platform: Platform) -> MenuBuilder {
        MenuBuilder::new(platform, "Min", SETTINGS)
    }

    fn labels(template: &MenuTemplate) -> Vec<String> {
        template
            .entries
            .iter()
            .filter_map(|e| match e {
                MenuEntry::Submenu(s) => Some(s.label.clone()),
                _ => None,
            })
            .collect()
    }

    fn item_ids(sub: &Submenu) -> Vec<&'static str> {
        sub.entries
            .iter()
            .filter_map(|e| match e {
                MenuEntry::Item(i) => Some(i.id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn macos_prepends_app_menu() {
        let template = builder(Platform::MacOs).build(false);
        assert_eq!(
            labels(&template),
            vec!["Min", "File", "Edit", "View", "Developer", "Window", "Help"]
        );
        let app = template.submenu("Min").unwrap();
        assert_eq!(
            item_ids(app),
            vec!["about", "preferences", "hide", "hide-others", "show-all", "quit"]
        );
        assert_eq!(template.find("about").unwrap().label, "About Min");
        assert_eq!(template.find("quit").unwrap().accelerator, Some("CmdOrCtrl+Q"));
    }

    #[test]
    fn other_platforms_put_preferences_in_edit() {
        for platform in [Platform::Windows, Platform::Linux] {
            let template = builder(platform).build(false);
            assert_eq!(
                labels(&template),
                vec!["File", "Edit", "View", "Developer", "Window", "Help"]
            );
            let edit = template.submenu("Edit").unwrap();
            let n = edit.entries.len();
            assert_eq!(edit.entries[n - 2], MenuEntry::Separator);
            match &edit.entries[n - 1] {
                MenuEntry::Item(item) => assert_eq!(item.id, "preferences"),
                other => panic!("unexpected entry {:?}", other),
            }
        }
    }

    #[test]
    fn macos_edit_menu_has_no_preferences() {
        let template = builder(Platform::MacOs).build(false);
        let edit = template.submenu("Edit").unwrap();
        assert!(!item_ids(edit).contains(&"preferences"));
        assert_eq!(item_ids(edit).last(), Some(&"find"));
    }

    #[test]
    fn bring_all_to_front_only_on_macos() {
        for platform in Platform::ALL {
            let template = builder(platform).build(false);
            let window = template.submenu("Window").unwrap();
            assert_eq!(
                item_ids(window).contains(&"bring-all-to-front"),
                platform == Platform::MacOs
            );
        }
    }

    #[test]
    fn platform_accelerators() {
        let mac = builder(Platform::MacOs).build(false);
        assert_eq!(mac.find("full-screen").unwrap().accelerator, Some("Ctrl+Command+F"));
        assert_eq!(mac.find("inspect-page").unwrap().accelerator, Some("Cmd+Alt+I"));
        for platform in [Platform::Windows, Platform::Linux] {
            let t = builder(platform).build(false);
            assert_eq!(t.find("full-screen").unwrap().accelerator, Some("F11"));
            assert_eq!(t.find("inspect-page").unwrap().accelerator, Some("Ctrl+Shift+I"));
        }
    }

    #[test]
    fn file_menu_accelerators() {
        let t = builder(Platform::Linux).build(false);
        let expect = [
            ("new-tab", "CmdOrCtrl+t"),
            ("new-private-tab", "shift+CmdOrCtrl+p"),
            ("new-task", "CmdOrCtrl+n"),
            ("save-page", "CmdOrCtrl+s"),
            ("print", "CmdOrCtrl+p"),
            ("find", "CmdOrCtrl+F"),
            ("zoom-in", "CmdOrCtrl+="),
            ("zoom-out", "CmdOrCtrl+-"),
            ("actual-size", "CmdOrCtrl+0"),
            ("preferences", "CmdOrCtrl+,"),
        ];
        for (id, accel) in expect {
            assert_eq!(t.find(id).unwrap().accelerator, Some(accel), "{}", id);
        }
    }

    #[test]
    fn item_ids_are_unique() {
        for platform in Platform::ALL {
            let t = builder(platform).build(false);
            let mut seen = HashSet::new();
            for item in t.items() {
                assert!(seen.insert(item.id), "duplicate id {}", item.id);
            }
        }
    }

    #[test]
    fn preferences_and_help_open_tabs() {
        let t = builder(Platform::Windows).build(false);
        let expect = [
            ("preferences", SETTINGS),
            ("keyboard-shortcuts", KEYBOARD_SHORTCUTS_URL),
            ("report-bug", REPORT_BUG_URL),
            ("take-tour", TOUR_URL),
            ("view-on-github", GITHUB_URL),
        ];
        for (id, url) in expect {
            assert_eq!(
                t.find(id).unwrap().command,
                MenuCommand::Dispatch {
                    action: Action::AddTab,
                    payload: Some(Payload::open_tab(url)),
                }
            );
        }
    }

    #[test]
    fn focus_mode_checkbox_mirrors_state() {
        let b = builder(Platform::Linux);
        assert_eq!(b.build(false).find("focus-mode").unwrap().checked, Some(false));
        assert_eq!(b.build(true).find("focus-mode").unwrap().checked, Some(true));
    }

    #[test]
    fn dock_menu_only_on_macos() {
        let dock = builder(Platform::MacOs).build_dock().unwrap();
        let actions: Vec<_> = dock
            .items()
            .iter()
            .map(|i| i.command.clone())
            .collect();
        assert_eq!(
            actions,
            vec![
                MenuCommand::Dispatch { action: Action::AddTab, payload: None },
                MenuCommand::Dispatch { action: Action::AddPrivateTab, payload: None },
                MenuCommand::Dispatch { action: Action::AddTask, payload: None },
            ]
        );
        assert!(builder(Platform::Windows).build_dock().is_none());
        assert!(builder(Platform::Linux).build_dock().is_none());
    }

    #[test]
    fn focus_mode_toggled_twice_round_trips() {
        let window = FakeWindow::new(1, WindowBounds { x: 0, y: 0, width: 800, height: 600 });
        let mut focus_mode = false;
        let cmd = MenuCommand::ToggleFocusMode;
        assert_eq!(activate(&cmd, &mut focus_mode, Some(&window)), MenuOutcome::FocusMode(true));
        assert_eq!(activate(&cmd, &mut focus_mode, Some(&window)), MenuOutcome::FocusMode(false));
        assert!(!focus_mode);
        assert_eq!(window.actions(), vec![Action::EnterFocusMode, Action::ExitFocusMode]);
    }

    #[test]
    fn native_commands_do_not_dispatch() {
        let window = FakeWindow::new(1, WindowBounds { x: 0, y: 0, width: 800, height: 600 });
        let mut focus_mode = false;
        let cmd = MenuCommand::Native(NativeAction::Role(MenuRole::Copy));
        assert_eq!(
            activate(&cmd, &mut focus_mode, Some(&window)),
            MenuOutcome::Native(NativeAction::Role(MenuRole::Copy))
        );
        assert!(window.actions().is_empty());
    }

    #[test]
    fn dispatch_without_window_is_dropped() {
        let mut focus_mode = false;
        let cmd = MenuCommand::Dispatch { action: Action::ZoomIn, payload: None };
        assert_eq!(activate::<FakeWindow>(&cmd, &mut focus_mode, None), MenuOutcome::Dispatched);
    }
}
