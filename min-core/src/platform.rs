/// The closed set of platforms the shell distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

/// Window decoration requested at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleBarStyle {
    Default,
    /// Content extends under a transparent title bar with inset traffic lights.
    HiddenInset,
}

/// Every platform-specific decision the shell makes, in one table.
#[derive(Debug)]
pub struct PlatformPolicy {
    /// Terminate the process when the last window closes.
    pub quit_on_last_window_closed: bool,
    /// The application has a persistent dock icon with its own menu.
    pub has_dock: bool,
    /// The menu bar starts with an application-identity submenu.
    pub app_submenu: bool,
    /// Preferences lives at the end of the Edit submenu.
    pub preferences_in_edit_menu: bool,
    /// The Window submenu ends with "Bring All to Front".
    pub bring_all_to_front: bool,
    /// Width of the invisible resize border the window manager adds around
    /// each window, if any.
    pub resize_border: Option<i32>,
    pub full_screen_accelerator: &'static str,
    pub inspect_page_accelerator: &'static str,
    pub title_bar_style: TitleBarStyle,
}

static MACOS: PlatformPolicy = PlatformPolicy {
    quit_on_last_window_closed: false,
    has_dock: true,
    app_submenu: true,
    preferences_in_edit_menu: false,
    bring_all_to_front: true,
    resize_border: None,
    full_screen_accelerator: "Ctrl+Command+F",
    inspect_page_accelerator: "Cmd+Alt+I",
    title_bar_style: TitleBarStyle::HiddenInset,
};

static WINDOWS: PlatformPolicy = PlatformPolicy {
    quit_on_last_window_closed: true,
    has_dock: false,
    app_submenu: false,
    preferences_in_edit_menu: true,
    bring_all_to_front: false,
    resize_border: Some(8),
    full_screen_accelerator: "F11",
    inspect_page_accelerator: "Ctrl+Shift+I",
    title_bar_style: TitleBarStyle::Default,
};

static LINUX: PlatformPolicy = PlatformPolicy {
    quit_on_last_window_closed: true,
    has_dock: false,
    app_submenu: false,
    preferences_in_edit_menu: true,
    bring_all_to_front: false,
    resize_border: None,
    full_screen_accelerator: "F11",
    inspect_page_accelerator: "Ctrl+Shift+I",
    title_bar_style: TitleBarStyle::Default,
};

impl Platform {
    #[cfg(test)]
    pub const ALL: [Platform; 3] = [Platform::MacOs, Platform::Windows, Platform::Linux];

    /// The platform this binary was compiled for. BSDs and other unixes use
    /// the Linux policy.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    pub fn policy(self) -> &'static PlatformPolicy {
        match self {
            Platform::MacOs => &MACOS,
            Platform::Windows => &WINDOWS,
            Platform::Linux => &LINUX,
        }
    }
}
