use std::ops::Range;

use log::debug;

use swiftmsg::typed::{
    ApplicationHeader, BasicHeaderBlock, SwiftBlock, SystemTrailerBlock, TextBlock,
    UserHeaderBlock, UserTrailerBlock,
};
use swiftmsg::{BlockReader, BlockRecord, TypedBlock, parse_block};

use crate::config::{ReaderConfig, UnknownBlockPolicy};
use crate::error::MessageError;
use crate::message::SwiftMessage;

/// Known top-level block ids, in the order they must appear.
const BLOCK_ORDER: [&str; 6] = ["1", "2", "3", "4", "5", "S"];

fn block_rank(id: &str) -> Option<usize> {
    BLOCK_ORDER.iter().position(|known| *known == id)
}

/// Reads consecutive messages from FIN text.
///
/// A basic header block `1` that is not the first block read starts the next
/// message, so files holding several concatenated messages are read one
/// message at a time.
pub struct MessageReader<'a> {
    blocks: BlockReader<'a>,
    /// The `1` block that ended the previous message.
    pending: Option<BlockRecord>,
    config: ReaderConfig,
    failed: bool,
}

impl<'a> MessageReader<'a> {
    pub fn new(source: &'a str, config: ReaderConfig) -> Self {
        MessageReader {
            blocks: BlockReader::new(source),
            pending: None,
            config,
            failed: false,
        }
    }

    /// Read the next message, or `None` at the end of the input.
    pub fn read_message(&mut self) -> Result<Option<SwiftMessage>, MessageError> {
        if self.failed {
            return Ok(None);
        }
        let result = self.read_message_inner();
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn read_message_inner(&mut self) -> Result<Option<SwiftMessage>, MessageError> {
        let Some(first) = self.next_record()? else {
            return Ok(None);
        };

        let mut builder = MessageBuilder::new(first.span());
        builder.accept(first, &self.config)?;
        while let Some(record) = self.next_record()? {
            if record.id() == BasicHeaderBlock::ID {
                self.pending = Some(record);
                break;
            }
            builder.accept(record, &self.config)?;
        }

        let message = builder.finish(&self.config)?;
        debug!(
            "read MT{} message at {:?}",
            message.message_type(),
            message.span
        );
        Ok(Some(message))
    }

    fn next_record(&mut self) -> Result<Option<BlockRecord>, MessageError> {
        if let Some(record) = self.pending.take() {
            return Ok(Some(record));
        }
        Ok(self.blocks.read_block()?)
    }
}

impl Iterator for MessageReader<'_> {
    type Item = Result<SwiftMessage, MessageError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_message().transpose()
    }
}

/// Collects the blocks of one message and checks message-level rules.
struct MessageBuilder {
    span: Range<usize>,
    /// Rank and id of the last known block accepted.
    last_known: Option<(usize, String)>,
    basic_header: Option<BasicHeaderBlock>,
    application_header: Option<ApplicationHeader>,
    user_header: Option<UserHeaderBlock>,
    text: Option<TextBlock>,
    user_trailer: Option<UserTrailerBlock>,
    system_trailer: Option<SystemTrailerBlock>,
    additional_blocks: Vec<BlockRecord>,
}

impl MessageBuilder {
    fn new(span: Range<usize>) -> Self {
        MessageBuilder {
            span,
            last_known: None,
            basic_header: None,
            application_header: None,
            user_header: None,
            text: None,
            user_trailer: None,
            system_trailer: None,
            additional_blocks: Vec::new(),
        }
    }

    fn accept(&mut self, record: BlockRecord, config: &ReaderConfig) -> Result<(), MessageError> {
        self.span.end = record.span().end;

        let Some(rank) = block_rank(record.id()) else {
            return match config.unknown_blocks {
                UnknownBlockPolicy::Keep => {
                    debug!("keeping unknown block '{}'", record.id());
                    self.additional_blocks.push(record);
                    Ok(())
                }
                UnknownBlockPolicy::Reject => Err(MessageError::UnknownBlock {
                    id: record.id().to_string(),
                    span: record.span(),
                }),
            };
        };

        if let Some((last_rank, previous)) = &self.last_known {
            if rank == *last_rank {
                return Err(MessageError::DuplicateBlock {
                    id: record.id().to_string(),
                    span: record.span(),
                });
            }
            if rank < *last_rank {
                return Err(MessageError::OutOfOrder {
                    id: record.id().to_string(),
                    previous: previous.clone(),
                    span: record.span(),
                });
            }
        }
        self.last_known = Some((rank, record.id().to_string()));

        let block = parse_block(&record).map_err(|source| MessageError::Field {
            id: record.id().to_string(),
            span: record.span(),
            source,
        })?;
        match block {
            SwiftBlock::BasicHeader(block) => self.basic_header = Some(block),
            SwiftBlock::ApplicationHeaderInput(block) => {
                self.application_header = Some(ApplicationHeader::Input(block))
            }
            SwiftBlock::ApplicationHeaderOutput(block) => {
                self.application_header = Some(ApplicationHeader::Output(block))
            }
            SwiftBlock::UserHeader(block) => self.user_header = Some(block),
            SwiftBlock::Text(block) => self.text = Some(block),
            SwiftBlock::UserTrailer(block) => self.user_trailer = Some(block),
            SwiftBlock::SystemTrailer(block) => self.system_trailer = Some(block),
            SwiftBlock::General(record) => self.additional_blocks.push(record),
        }
        Ok(())
    }

    fn finish(self, config: &ReaderConfig) -> Result<SwiftMessage, MessageError> {
        let missing = |id| MessageError::MissingBlock {
            id,
            span: self.span.clone(),
        };
        let basic_header = self.basic_header.ok_or_else(|| missing("1"))?;
        let application_header = self.application_header.ok_or_else(|| missing("2"))?;
        if config.require_text_block && self.text.is_none() {
            return Err(missing("4"));
        }

        Ok(SwiftMessage {
            basic_header,
            application_header,
            user_header: self.user_header,
            text: self.text,
            user_trailer: self.user_trailer,
            system_trailer: self.system_trailer,
            additional_blocks: self.additional_blocks,
            span: self.span,
        })
    }
}
