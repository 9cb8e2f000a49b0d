use url::Url;

/// Top-level navigation policy for the shell's own content surface.
///
/// The surface runs with elevated privileges, so it may only ever show the
/// document it was created with. Anything else (a page dropped onto the
/// window, a link that escaped a tab) is silently refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPolicy {
    target: Option<Url>,
    raw_target: String,
}

impl NavigationPolicy {
    pub fn new(load_target: &str) -> Self {
        NavigationPolicy {
            target: Url::parse(load_target).ok(),
            raw_target: load_target.to_string(),
        }
    }

    pub fn allows(&self, destination: &str) -> bool {
        if destination == self.raw_target {
            return true;
        }
        match (&self.target, Url::parse(destination)) {
            (Some(target), Ok(dest)) => *target == dest,
            _ => false,
        }
    }
}
