use crate::platform::Platform;

/// Converts a menu accelerator like `"shift+CmdOrCtrl+p"` into a GTK
/// accelerator string like `"<Shift><Control>p"`.
///
/// Returns `None` if the accelerator names an unknown modifier or no key.
pub fn to_gtk_accel(accelerator: &str, platform: Platform) -> Option<String> {
    let (modifiers, key) = split(accelerator)?;
    let mut accel = String::new();
    for part in modifiers {
        let modifier = match part.trim().to_lowercase().as_str() {
            "cmdorctrl" | "commandorcontrol" => {
                if platform == Platform::MacOs {
                    "<Meta>"
                } else {
                    "<Control>"
                }
            }
            "cmd" | "command" => "<Meta>",
            "ctrl" | "control" => "<Control>",
            "alt" | "option" => "<Alt>",
            "shift" => "<Shift>",
            "super" => "<Super>",
            _ => return None,
        };
        accel.push_str(modifier);
    }
    accel.push_str(&key_name(key));
    Some(accel)
}

fn split(accelerator: &str) -> Option<(Vec<&str>, &str)> {
    let trimmed = accelerator.trim();
    if trimmed.is_empty() {
        return None;
    }
    // "CmdOrCtrl++" binds the plus key itself
    if let Some(prefix) = trimmed.strip_suffix("++") {
        let modifiers = prefix.split('+').filter(|p| !p.is_empty()).collect();
        return Some((modifiers, "+"));
    }
    let mut parts: Vec<&str> = trimmed.split('+').collect();
    let key = parts.pop()?.trim();
    if key.is_empty() {
        return None;
    }
    Some((parts, key))
}

fn key_name(key: &str) -> String {
    match key {
        "=" => "equal".to_string(),
        "-" => "minus".to_string(),
        "+" => "plus".to_string(),
        "," => "comma".to_string(),
        "." => "period".to_string(),
        "/" => "slash".to_string(),
        other if other.chars().count() == 1 => other.to_lowercase(),
        other => other.to_string(),
    }
}
