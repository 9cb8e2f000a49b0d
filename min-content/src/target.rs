use std::path::{Path, PathBuf};

use url::Url;

/// Default endpoint of the development content server.
pub const DEFAULT_DEV_SERVER_URL: &str = "http://localhost:9080";

/// Where the shell loads its content surface from.
///
/// In development the surface is served over the network; a packaged build
/// loads `index.html` from the resource directory. Internal pages such as
/// settings are always served from the resource directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTarget {
    resource_dir: PathBuf,
    dev_server: Option<Url>,
}

impl ContentTarget {
    pub fn packaged(resource_dir: impl Into<PathBuf>) -> Self {
        ContentTarget {
            resource_dir: absolutize(resource_dir.into()),
            dev_server: None,
        }
    }

    pub fn development(resource_dir: impl Into<PathBuf>, server: &str) -> Result<Self, String> {
        let url = Url::parse(server)
            .map_err(|e| format!("Invalid development server URL '{}': {}", server, e))?;
        Ok(ContentTarget {
            resource_dir: absolutize(resource_dir.into()),
            dev_server: Some(url),
        })
    }

    pub fn is_development(&self) -> bool {
        self.dev_server.is_some()
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }

    /// The URL the main window loads at creation.
    pub fn load_url(&self) -> String {
        match &self.dev_server {
            Some(url) => url.to_string(),
            None => file_url(&self.resource_dir.join("index.html")),
        }
    }

    /// The internal settings page, opened by the Preferences menu item.
    pub fn settings_page_url(&self) -> String {
        file_url(
            &self
                .resource_dir
                .join("pages")
                .join("settings")
                .join("index.html"),
        )
    }

    /// The window icon shipped with the packaged resources.
    pub fn icon_path(&self) -> PathBuf {
        self.resource_dir.join("static").join("icon256.png")
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

/// Convert a local path to a `file://` URL string.
pub fn file_url(path: &Path) -> String {
    Url::from_file_path(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("file://{}", path.display()))
}
