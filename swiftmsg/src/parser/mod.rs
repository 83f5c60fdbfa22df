pub mod error;

pub use error::{BlockError, FieldError};

use log::trace;

use crate::block::BlockRecord;

/// Reads `{id:content}` blocks one at a time from a text source.
///
/// The reader knows nothing about block kinds. Content is returned verbatim,
/// including any nested blocks; callers that know a block nests feed its
/// content to a fresh reader (see [`BlockReader::for_content`]).
///
/// The only state is the cursor. After an error the reader is exhausted.
#[derive(Debug)]
pub struct BlockReader<'a> {
    source: &'a str,
    pos: usize,
    /// Absolute offset of `source` within the outermost text, added to every span.
    base: usize,
    failed: bool,
}

impl<'a> BlockReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_offset(source, 0)
    }

    /// A reader whose reported spans are shifted by `base`.
    pub fn with_offset(source: &'a str, base: usize) -> Self {
        BlockReader {
            source,
            pos: 0,
            base,
            failed: false,
        }
    }

    /// A reader over a record's content, reporting positions in the record's source.
    pub fn for_content(record: &'a BlockRecord) -> Self {
        Self::with_offset(record.content(), record.content_offset())
    }

    /// Current absolute position.
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    /// True once only whitespace (or nothing) is left.
    pub fn is_exhausted(&mut self) -> bool {
        self.skip_whitespace();
        self.failed || self.pos >= self.source.len()
    }

    /// Read the next top-level block, or `None` when the source is exhausted.
    pub fn read_block(&mut self) -> Result<Option<BlockRecord>, BlockError> {
        if self.failed {
            return Ok(None);
        }
        let result = self.read_block_inner();
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn read_block_inner(&mut self) -> Result<Option<BlockRecord>, BlockError> {
        self.skip_whitespace();
        let bytes = self.source.as_bytes();
        if self.pos >= bytes.len() {
            return Ok(None);
        }

        let start = self.pos;
        if bytes[start] != b'{' {
            let found = self.source[start..].chars().next().unwrap_or('\0');
            return Err(BlockError::ExpectedBlockStart {
                found,
                span: self.abs(start..start + found.len_utf8()),
            });
        }

        // Delimiters are ASCII, so byte scanning never splits a UTF-8 sequence.
        let id_start = start + 1;
        let mut i = id_start;
        loop {
            match bytes.get(i).copied() {
                None => {
                    return Err(BlockError::UnterminatedId {
                        span: self.abs(start..bytes.len()),
                    });
                }
                Some(b':') => break,
                Some(b) if b == b'{' || b == b'}' => {
                    return Err(BlockError::InvalidId {
                        found: b as char,
                        span: self.abs(i..i + 1),
                    });
                }
                Some(_) => i += 1,
            }
        }
        if i == id_start {
            return Err(BlockError::EmptyId {
                span: self.abs(start..i + 1),
            });
        }
        let id = &self.source[id_start..i];

        let content_start = i + 1;
        let mut depth = 0usize;
        let mut j = content_start;
        let content_end = loop {
            match bytes.get(j).copied() {
                None => {
                    return Err(BlockError::UnterminatedContent {
                        span: self.abs(start..bytes.len()),
                    });
                }
                Some(b'{') => depth += 1,
                Some(b'}') if depth == 0 => break j,
                Some(b'}') => depth -= 1,
                Some(_) => {}
            }
            j += 1;
        };

        self.pos = content_end + 1;
        let span = self.abs(start..self.pos);
        trace!("read block '{}' at {:?}", id, span);
        Ok(Some(BlockRecord::with_span(
            id,
            &self.source[content_start..content_end],
            span,
        )))
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.source[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn abs(&self, range: std::ops::Range<usize>) -> std::ops::Range<usize> {
        self.base + range.start..self.base + range.end
    }
}

impl Iterator for BlockReader<'_> {
    type Item = Result<BlockRecord, BlockError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_block().transpose()
    }
}

impl std::iter::FusedIterator for BlockReader<'_> {}

/// Read every block in `source`.
pub fn read_blocks(source: &str) -> Result<Vec<BlockRecord>, BlockError> {
    BlockReader::new(source).collect()
}
