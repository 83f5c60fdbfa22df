//! Typed parsers for the known top-level block kinds.
//!
//! Two shapes recur. Fixed-width blocks (basic header, application header)
//! match their whole content against one anchored pattern. Nesting blocks
//! (user header, trailers) feed their content back through a
//! [`BlockReader`](crate::parser::BlockReader) and sort the sub-blocks into
//! named fields. Which shape applies is chosen here by block id; the reader
//! itself never knows.

pub mod application_header;
pub mod basic_header;
pub mod codes;
mod subblocks;
pub mod system_trailer;
pub mod text;
pub mod user_header;
pub mod user_trailer;

pub use application_header::{
    ApplicationHeader, ApplicationHeaderInputBlock, ApplicationHeaderOutputBlock,
};
pub use basic_header::BasicHeaderBlock;
pub use codes::{ApplicationId, MessagePriority};
pub use subblocks::AdditionalSubblocks;
pub use system_trailer::SystemTrailerBlock;
pub use text::{LineBreak, TextBlock};
pub use user_header::UserHeaderBlock;
pub use user_trailer::UserTrailerBlock;

use crate::block::{BlockRecord, render};
use crate::parser::FieldError;

/// Capabilities shared by every typed block kind.
pub trait TypedBlock: Sized {
    /// The block id this kind is parsed from.
    const ID: &'static str;

    /// Parse a record. Fails without partial results.
    fn parse(record: &BlockRecord) -> Result<Self, FieldError>;

    /// Reconstruct the block content from the typed fields.
    fn content(&self) -> String;

    fn id(&self) -> &'static str {
        Self::ID
    }

    fn to_text(&self) -> String {
        render(self.id(), &self.content())
    }
}

pub(crate) fn expect_id(record: &BlockRecord, expected: &'static str) -> Result<(), FieldError> {
    if record.id() == expected {
        Ok(())
    } else {
        Err(FieldError::UnexpectedId {
            expected,
            found: record.id().to_string(),
        })
    }
}

/// Any top-level block, typed where the kind is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwiftBlock {
    BasicHeader(BasicHeaderBlock),
    ApplicationHeaderInput(ApplicationHeaderInputBlock),
    ApplicationHeaderOutput(ApplicationHeaderOutputBlock),
    UserHeader(UserHeaderBlock),
    Text(TextBlock),
    UserTrailer(UserTrailerBlock),
    SystemTrailer(SystemTrailerBlock),
    /// A block id with no typed parser, kept as read.
    General(BlockRecord),
}

impl SwiftBlock {
    pub fn id(&self) -> &str {
        match self {
            SwiftBlock::BasicHeader(block) => block.id(),
            SwiftBlock::ApplicationHeaderInput(block) => block.id(),
            SwiftBlock::ApplicationHeaderOutput(block) => block.id(),
            SwiftBlock::UserHeader(block) => block.id(),
            SwiftBlock::Text(block) => block.id(),
            SwiftBlock::UserTrailer(block) => block.id(),
            SwiftBlock::SystemTrailer(block) => block.id(),
            SwiftBlock::General(record) => record.id(),
        }
    }

    pub fn content(&self) -> String {
        match self {
            SwiftBlock::BasicHeader(block) => block.content(),
            SwiftBlock::ApplicationHeaderInput(block) => block.content(),
            SwiftBlock::ApplicationHeaderOutput(block) => block.content(),
            SwiftBlock::UserHeader(block) => block.content(),
            SwiftBlock::Text(block) => block.content(),
            SwiftBlock::UserTrailer(block) => block.content(),
            SwiftBlock::SystemTrailer(block) => block.content(),
            SwiftBlock::General(record) => record.content().to_string(),
        }
    }

    pub fn to_text(&self) -> String {
        render(self.id(), &self.content())
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SwiftBlock::General(_))
    }
}

impl From<ApplicationHeader> for SwiftBlock {
    fn from(header: ApplicationHeader) -> Self {
        match header {
            ApplicationHeader::Input(block) => SwiftBlock::ApplicationHeaderInput(block),
            ApplicationHeader::Output(block) => SwiftBlock::ApplicationHeaderOutput(block),
        }
    }
}

/// Parse a top-level record with the typed parser its id selects.
pub fn parse_block(record: &BlockRecord) -> Result<SwiftBlock, FieldError> {
    let block = match record.id() {
        "1" => SwiftBlock::BasicHeader(BasicHeaderBlock::parse(record)?),
        "2" => ApplicationHeader::parse(record)?.into(),
        "3" => SwiftBlock::UserHeader(UserHeaderBlock::parse(record)?),
        "4" => SwiftBlock::Text(TextBlock::parse(record)?),
        "5" => SwiftBlock::UserTrailer(UserTrailerBlock::parse(record)?),
        "S" => SwiftBlock::SystemTrailer(SystemTrailerBlock::parse(record)?),
        _ => SwiftBlock::General(record.clone()),
    };
    Ok(block)
}
