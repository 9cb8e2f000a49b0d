use min_content::{Action, ContentMessage, Payload};

/// Anything that can receive messages on behalf of the content surface.
///
/// Delivery is one-way: no acknowledgment, no return value, no retry.
/// Implementations must deliver messages in call order.
pub trait ContentSurface {
    fn deliver(&self, message: ContentMessage);
}

/// Notify the content surface of an intent.
///
/// Sending to an absent window is not an error; the message is dropped.
pub fn dispatch<S>(target: Option<&S>, action: Action, payload: Option<&Payload>)
where
    S: ContentSurface + ?Sized,
{
    let message = ContentMessage::new(action, payload);
    let Some(surface) = target else {
        match message.url() {
            Some(url) => log::debug!("No window, dropping {} for {}", action, url),
            None => log::debug!("No window, dropping {}", action),
        }
        return;
    };
    surface.deliver(message);
}

/// Open `url` in a new tab of the content surface.
pub fn open_tab<S>(target: Option<&S>, url: &str)
where
    S: ContentSurface + ?Sized,
{
    dispatch(target, Action::AddTab, Some(&Payload::open_tab(url)));
}
