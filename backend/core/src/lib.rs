pub mod error;
pub mod message;
pub mod traits;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::RemoconError;
pub use message::{
    Attachment, IncomingMessage, Keyboard, OutgoingReply, SentMessage, TextFormat,
};
pub use traits::{Action, Replier, StopHandle};
