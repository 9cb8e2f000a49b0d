pub mod bridge;
pub mod protocol;
pub mod target;

pub use protocol::{Action, ContentMessage, Payload};
pub use target::ContentTarget;
