use crate::protocol::ContentMessage;

/// Name of the function the content surface exposes on `window` to receive
/// dispatched messages.
pub const RECEIVER_FUNCTION: &str = "minReceiveCommand";

/// Build the script that hands `message` to the content surface.
///
/// Returns `None` if the message cannot be serialized.
pub fn delivery_script(message: &ContentMessage) -> Option<String> {
    let json = match serde_json::to_string(message) {
        Ok(j) => j,
        Err(e) => {
            log::error!("Failed to serialize ContentMessage: {}", e);
            return None;
        }
    };
    // Escape for embedding in a single-quoted JS string literal
    let escaped = json
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029");
    Some(format!(
        "window.{f} && window.{f}('{}')",
        escaped,
        f = RECEIVER_FUNCTION
    ))
}
