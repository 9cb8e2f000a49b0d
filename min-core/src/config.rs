use std::path::PathBuf;

use min_content::target::{ContentTarget, DEFAULT_DEV_SERVER_URL};

use crate::geometry::GeometryStore;
use crate::menu::MenuBuilder;
use crate::platform::Platform;

pub const APP_NAME: &str = "Min";

pub const ENV_PROFILE_DIR: &str = "MIN_PROFILE_DIR";
pub const ENV_MODE: &str = "MIN_ENV";
pub const ENV_DEV_SERVER_URL: &str = "MIN_DEV_SERVER_URL";
pub const ENV_RESOURCE_DIR: &str = "MIN_RESOURCE_DIR";

/// Values given on the command line; they take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub profile_dir: Option<PathBuf>,
    pub resource_dir: Option<PathBuf>,
    pub development: bool,
}

/// Resolved shell configuration.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub app_name: String,
    pub platform: Platform,
    /// Per-user directory holding the window-bounds record.
    pub profile_dir: PathBuf,
    pub content: ContentTarget,
}

impl ShellConfig {
    /// Resolve against the process environment.
    pub fn from_environment(overrides: &ConfigOverrides) -> Result<Self, String> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    pub fn resolve<F>(overrides: &ConfigOverrides, env: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let profile_dir = match overrides
            .profile_dir
            .clone()
            .or_else(|| non_empty(ENV_PROFILE_DIR).map(PathBuf::from))
        {
            Some(dir) => dir,
            None => default_profile_dir()?,
        };

        let resource_dir = overrides
            .resource_dir
            .clone()
            .or_else(|| non_empty(ENV_RESOURCE_DIR).map(PathBuf::from))
            .unwrap_or_else(default_resource_dir);

        let development = overrides.development
            || non_empty(ENV_MODE).is_some_and(|mode| mode.eq_ignore_ascii_case("development"));

        let content = if development {
            let server = non_empty(ENV_DEV_SERVER_URL).unwrap_or_else(|| DEFAULT_DEV_SERVER_URL.to_string());
            ContentTarget::development(resource_dir, &server)?
        } else {
            ContentTarget::packaged(resource_dir)
        };

        Ok(ShellConfig {
            app_name: APP_NAME.to_string(),
            platform: Platform::current(),
            profile_dir,
            content,
        })
    }

    pub fn geometry_store(&self) -> GeometryStore {
        GeometryStore::in_profile(&self.profile_dir)
    }

    pub fn menu_builder(&self) -> MenuBuilder {
        MenuBuilder::new(
            self.platform,
            &self.app_name,
            &self.content.settings_page_url(),
        )
    }
}

fn default_profile_dir() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .ok_or_else(|| "Cannot determine config directory".to_string())
}

fn default_resource_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
