use serde::Serialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Actions: shell → content surface (one-way, unacknowledged)
// ---------------------------------------------------------------------------

/// The fixed vocabulary of actions the content surface understands.
///
/// The wire name of each variant is the string the content surface
/// subscribes to; it must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    #[serde(rename = "addTab")]
    AddTab,
    #[serde(rename = "addPrivateTab")]
    AddPrivateTab,
    #[serde(rename = "addTask")]
    AddTask,
    #[serde(rename = "saveCurrentPage")]
    SaveCurrentPage,
    #[serde(rename = "print")]
    Print,
    #[serde(rename = "findInPage")]
    FindInPage,
    #[serde(rename = "zoomIn")]
    ZoomIn,
    #[serde(rename = "zoomOut")]
    ZoomOut,
    #[serde(rename = "zoomReset")]
    ZoomReset,
    #[serde(rename = "showReadingList")]
    ShowReadingList,
    #[serde(rename = "inspectPage")]
    InspectPage,
    #[serde(rename = "openPDF")]
    OpenPdf,
    #[serde(rename = "goBack")]
    GoBack,
    #[serde(rename = "goForward")]
    GoForward,
    #[serde(rename = "enter-full-screen")]
    EnterFullScreen,
    #[serde(rename = "leave-full-screen")]
    LeaveFullScreen,
    #[serde(rename = "exitFocusMode")]
    ExitFocusMode,
    #[serde(rename = "enterFocusMode")]
    EnterFocusMode,
}

impl Action {
    #[cfg(test)]
    pub const ALL: [Action; 18] = [
        Action::AddTab,
        Action::AddPrivateTab,
        Action::AddTask,
        Action::SaveCurrentPage,
        Action::Print,
        Action::FindInPage,
        Action::ZoomIn,
        Action::ZoomOut,
        Action::ZoomReset,
        Action::ShowReadingList,
        Action::InspectPage,
        Action::OpenPdf,
        Action::GoBack,
        Action::GoForward,
        Action::EnterFullScreen,
        Action::LeaveFullScreen,
        Action::ExitFocusMode,
        Action::EnterFocusMode,
    ];

    /// The wire name of the action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::AddTab => "addTab",
            Action::AddPrivateTab => "addPrivateTab",
            Action::AddTask => "addTask",
            Action::SaveCurrentPage => "saveCurrentPage",
            Action::Print => "print",
            Action::FindInPage => "findInPage",
            Action::ZoomIn => "zoomIn",
            Action::ZoomOut => "zoomOut",
            Action::ZoomReset => "zoomReset",
            Action::ShowReadingList => "showReadingList",
            Action::InspectPage => "inspectPage",
            Action::OpenPdf => "openPDF",
            Action::GoBack => "goBack",
            Action::GoForward => "goForward",
            Action::EnterFullScreen => "enter-full-screen",
            Action::LeaveFullScreen => "leave-full-screen",
            Action::ExitFocusMode => "exitFocusMode",
            Action::EnterFocusMode => "enterFocusMode",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Payload for `addTab`: open `url` in a new tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenTab {
    pub url: String,
}

/// Payload for `openPDF`: show an intercepted PDF download in the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPdf {
    pub url: String,
    /// Identifier of the web content that started the download.
    pub content_process_id: u64,
}

/// A JSON-serializable payload attached to a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    OpenTab(OpenTab),
    OpenPdf(OpenPdf),
}

impl Payload {
    pub fn open_tab(url: impl Into<String>) -> Self {
        Payload::OpenTab(OpenTab { url: url.into() })
    }

    pub fn to_value(&self) -> Value {
        let result = match self {
            Payload::OpenTab(p) => serde_json::to_value(p),
            Payload::OpenPdf(p) => serde_json::to_value(p),
        };
        match result {
            Ok(v) => v,
            Err(e) => {
                log::error!("Failed to serialize payload: {}", e);
                Value::Object(Map::new())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// One message delivered to the content surface.
///
/// `data` is always an object; actions dispatched without a payload carry
/// `{}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentMessage {
    pub action: Action,
    pub data: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl ContentMessage {
    pub fn new(action: Action, payload: Option<&Payload>) -> Self {
        ContentMessage {
            action,
            data: payload.map(Payload::to_value).unwrap_or_else(empty_object),
        }
    }

    /// The `url` field of the payload, if it has one.
    pub fn url(&self) -> Option<&str> {
        self.data.get("url").and_then(Value::as_str)
    }
}
