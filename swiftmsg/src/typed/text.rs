use crate::block::BlockRecord;
use crate::parser::FieldError;
use crate::typed::{TypedBlock, expect_id};

const PATTERN: &str = "[info line]<line break><text>-";

/// Line break separating the info line from the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineBreak {
    #[default]
    Lf,
    CrLf,
}

impl LineBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            LineBreak::Lf => "\n",
            LineBreak::CrLf => "\r\n",
        }
    }
}

/// Text block `{4:...}`.
///
/// The body is kept as opaque text; it must end with the `-` end-of-text marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// Text between the opening `:` and the first line break, if any.
    pub info_line: Option<String>,
    pub line_break: LineBreak,
    /// Everything after the first line break, including the final `-`.
    pub text: String,
}

impl TypedBlock for TextBlock {
    const ID: &'static str = "4";

    fn parse(record: &BlockRecord) -> Result<Self, FieldError> {
        expect_id(record, Self::ID)?;

        let shape = FieldError::Shape {
            id: Self::ID,
            pattern: PATTERN,
        };
        let content = record.content();
        let Some((head, text)) = content.split_once('\n') else {
            return Err(shape);
        };
        if !text.ends_with('-') {
            return Err(shape);
        }

        let (head, line_break) = match head.strip_suffix('\r') {
            Some(head) => (head, LineBreak::CrLf),
            None => (head, LineBreak::Lf),
        };

        Ok(TextBlock {
            info_line: (!head.is_empty()).then(|| head.to_string()),
            line_break,
            text: text.to_string(),
        })
    }

    fn content(&self) -> String {
        let mut content = self.info_line.clone().unwrap_or_default();
        content.push_str(self.line_break.as_str());
        content.push_str(&self.text);
        content
    }
}
