//! Message-level assembly on top of the `swiftmsg` block parser.
//!
//! The block reader only knows `{id:content}`; this crate decides which
//! blocks make a message, in what order they may appear, and which are
//! mandatory.

pub mod config;
pub mod error;
pub mod message;
pub mod reader;

pub use config::{ConfigError, ReaderConfig, UnknownBlockPolicy};
pub use error::MessageError;
pub use message::SwiftMessage;
pub use reader::MessageReader;

/// Parse text holding exactly one message, with the default rules.
pub fn parse_message(source: &str) -> Result<SwiftMessage, MessageError> {
    let mut reader = MessageReader::new(source, ReaderConfig::default());
    let message = reader
        .read_message()?
        .ok_or(MessageError::MissingBlock {
            id: "1",
            span: 0..source.len(),
        })?;
    if let Some(next) = reader.read_message()? {
        return Err(MessageError::UnexpectedMessage { span: next.span });
    }
    Ok(message)
}

/// Parse every message in `source`.
pub fn parse_messages(
    source: &str,
    config: &ReaderConfig,
) -> Result<Vec<SwiftMessage>, MessageError> {
    MessageReader::new(source, config.clone()).collect()
}
