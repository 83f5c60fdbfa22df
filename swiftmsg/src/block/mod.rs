use std::fmt;
use std::ops::Range;

use crate::parser::BlockError;

/// Render a block as `{id:content}`.
///
/// This is the exact inverse of the delimiters the reader strips, so for any
/// record the reader produced, `render(record.id(), record.content())` is the
/// substring it was read from.
pub fn render(id: &str, content: &str) -> String {
    let mut text = String::with_capacity(id.len() + content.len() + 3);
    text.push('{');
    text.push_str(id);
    text.push(':');
    text.push_str(content);
    text.push('}');
    text
}

/// A raw `{id:content}` block as produced by the block reader.
///
/// The content is kept verbatim. Whether it is opaque text or a sequence of
/// nested blocks is decided by whoever consumes the record.
#[derive(Debug, Clone)]
pub struct BlockRecord {
    id: String,
    content: String,
    /// Byte span of the whole block in the text it was read from.
    span: Range<usize>,
}

impl BlockRecord {
    /// Build a record directly. Its span covers the rendered text, starting at 0.
    ///
    /// Fails with the error the reader would report on the rendered text when
    /// `id` is empty or contains `{`, `}` or `:`.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Result<Self, BlockError> {
        let id = id.into();
        let content = content.into();
        if id.is_empty() {
            return Err(BlockError::EmptyId { span: 0..2 });
        }
        if let Some((i, found)) = id.char_indices().find(|(_, c)| matches!(c, '{' | '}' | ':')) {
            return Err(BlockError::InvalidId {
                found,
                span: i + 1..i + 2,
            });
        }
        let len = id.len() + content.len() + 3;
        Ok(BlockRecord {
            id,
            content,
            span: 0..len,
        })
    }

    pub(crate) fn with_span(id: &str, content: &str, span: Range<usize>) -> Self {
        BlockRecord {
            id: id.to_string(),
            content: content.to_string(),
            span,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Byte offset of the first content character in the source text.
    pub fn content_offset(&self) -> usize {
        self.span.start + self.id.len() + 2
    }

    /// Byte span of the content alone.
    pub fn content_span(&self) -> Range<usize> {
        let start = self.content_offset();
        start..start + self.content.len()
    }

    pub fn to_text(&self) -> String {
        render(&self.id, &self.content)
    }
}

// Equality ignores the source span.
impl PartialEq for BlockRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.content == other.content
    }
}

impl Eq for BlockRecord {}

impl fmt::Display for BlockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}:{}}}", self.id, self.content)
    }
}
