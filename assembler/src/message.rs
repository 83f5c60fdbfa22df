use std::ops::Range;

use swiftmsg::BlockRecord;
use swiftmsg::typed::{
    ApplicationHeader, BasicHeaderBlock, SwiftBlock, SystemTrailerBlock, TextBlock,
    UserHeaderBlock, UserTrailerBlock,
};

/// One complete FIN message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwiftMessage {
    pub basic_header: BasicHeaderBlock,
    pub application_header: ApplicationHeader,
    pub user_header: Option<UserHeaderBlock>,
    pub text: Option<TextBlock>,
    pub user_trailer: Option<UserTrailerBlock>,
    pub system_trailer: Option<SystemTrailerBlock>,
    /// Top-level blocks with no typed parser, in the order read.
    pub additional_blocks: Vec<BlockRecord>,
    /// Byte span of the message in the source it was read from.
    pub span: Range<usize>,
}

impl SwiftMessage {
    /// Message type from the application header, e.g. `940`.
    pub fn message_type(&self) -> &str {
        self.application_header.message_type()
    }

    /// All blocks in canonical order; unknown blocks come last.
    pub fn blocks(&self) -> Vec<SwiftBlock> {
        let mut blocks = vec![
            SwiftBlock::BasicHeader(self.basic_header.clone()),
            self.application_header.clone().into(),
        ];
        blocks.extend(self.user_header.clone().map(SwiftBlock::UserHeader));
        blocks.extend(self.text.clone().map(SwiftBlock::Text));
        blocks.extend(self.user_trailer.clone().map(SwiftBlock::UserTrailer));
        blocks.extend(self.system_trailer.clone().map(SwiftBlock::SystemTrailer));
        blocks.extend(self.additional_blocks.iter().cloned().map(SwiftBlock::General));
        blocks
    }

    pub fn to_text(&self) -> String {
        self.blocks().iter().map(SwiftBlock::to_text).collect()
    }
}
