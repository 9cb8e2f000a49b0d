/// Scheme whose URLs are always handed to the operating system.
pub const MAIL_SCHEME: &str = "mailto";

/// Registers URI schemes with the webview layer so that requests for them are
/// answered by the shell instead of loaded.
pub trait SchemeRegistry {
    fn register_external(&mut self, scheme: &str) -> Result<(), String>;
}

/// Opens URLs with the operating system's default handler.
pub trait ExternalOpener {
    fn open_external(&self, url: &str) -> Result<(), String>;
}

/// Bind `scheme` to external delegation. Failure is logged; the scheme then
/// simply gets no special treatment.
pub fn register<R>(registry: &mut R, scheme: &str) -> bool
where
    R: SchemeRegistry + ?Sized,
{
    match registry.register_external(scheme) {
        Ok(()) => {
            log::debug!("Registered {} protocol", scheme);
            true
        }
        Err(e) => {
            log::warn!("Could not register {} protocol: {}", scheme, e);
            false
        }
    }
}

/// Handle a request for a delegated scheme: hand the whole URL to the OS.
pub fn delegate<O>(opener: &O, url: &str)
where
    O: ExternalOpener + ?Sized,
{
    if let Err(e) = opener.open_external(url) {
        log::warn!("Failed to open {} externally: {}", url, e);
    }
}
