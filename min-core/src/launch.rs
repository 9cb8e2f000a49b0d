use std::path::Path;

/// Extract the URL to open at startup from the first command-line argument.
///
/// The argument counts only if it looks like a URL (contains `://`) and is
/// not the application's own path, which some launchers pass first.
/// The path comparison ignores case.
pub fn launch_url(first_arg: Option<&str>, own_path: &Path) -> Option<String> {
    let arg = first_arg?.trim();
    if arg.is_empty() || !arg.contains("://") {
        return None;
    }
    let own = own_path.to_string_lossy();
    if arg.to_lowercase() == own.to_lowercase() {
        return None;
    }
    Some(arg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_argument_is_returned() {
        assert_eq!(
            launch_url(Some("https://example.com"), Path::new("/usr/lib/min")),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn missing_or_plain_arguments_are_ignored() {
        assert_eq!(launch_url(None, Path::new("/usr/lib/min")), None);
        assert_eq!(launch_url(Some(""), Path::new("/usr/lib/min")), None);
        assert_eq!(launch_url(Some("example.com"), Path::new("/usr/lib/min")), None);
        assert_eq!(launch_url(Some("--flag"), Path::new("/usr/lib/min")), None);
    }

    #[test]
    fn own_path_is_ignored_case_insensitively() {
        let own = Path::new("file:///Applications/Min.app");
        assert_eq!(launch_url(Some("FILE:///applications/min.app"), own), None);
    }

    #[test]
    fn non_http_schemes_count() {
        assert_eq!(
            launch_url(Some("mailto://someone"), Path::new("/opt/min")),
            Some("mailto://someone".to_string())
        );
    }
}
