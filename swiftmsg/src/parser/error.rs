use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// Structural errors raised by the block reader.
///
/// Spans are absolute byte ranges in the text handed to the outermost reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("expected block start '{{', found {found:?}")]
    ExpectedBlockStart { found: char, span: Range<usize> },

    #[error("invalid character {found:?} in block id")]
    InvalidId { found: char, span: Range<usize> },

    #[error("empty block id")]
    EmptyId { span: Range<usize> },

    #[error("unterminated block id, missing ':'")]
    UnterminatedId { span: Range<usize> },

    #[error("unterminated block content, missing closing '}}'")]
    UnterminatedContent { span: Range<usize> },
}

impl BlockError {
    pub fn span(&self) -> Range<usize> {
        match self {
            BlockError::ExpectedBlockStart { span, .. }
            | BlockError::InvalidId { span, .. }
            | BlockError::EmptyId { span }
            | BlockError::UnterminatedId { span }
            | BlockError::UnterminatedContent { span } => span.clone(),
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(self.to_string())
            .with_labels(vec![Label::primary(file_id, self.span())])
    }
}

/// Shape and value errors raised by typed block parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unexpected block id '{found}', expected '{expected}'")]
    UnexpectedId { expected: &'static str, found: String },

    #[error("block '{id}' content did not match format {pattern}")]
    Shape { id: &'static str, pattern: &'static str },

    #[error("block '{id}' expected mode '{expected}', but was '{found}'")]
    Mode {
        id: &'static str,
        expected: char,
        found: String,
    },

    #[error("block '{id}' has unknown {field} code '{code}'")]
    UnknownCode {
        id: &'static str,
        field: &'static str,
        code: String,
    },

    #[error("block '{id}' has invalid {field} '{value}'")]
    DateTime {
        id: &'static str,
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("block '{id}' content error")]
    Content {
        id: &'static str,
        #[source]
        source: BlockError,
    },
}

impl FieldError {
    /// The structural error underneath, if nested content failed to tokenize.
    pub fn block_error(&self) -> Option<&BlockError> {
        match self {
            FieldError::Content { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Convert to a Diagnostic, labelling `span` (the offending block) as primary.
    pub fn to_diagnostic(&self, file_id: usize, span: Range<usize>) -> Diagnostic<usize> {
        let mut labels = vec![Label::primary(file_id, span)];
        let mut notes = Vec::new();
        match self {
            FieldError::Content { source, .. } => {
                labels.push(Label::secondary(file_id, source.span()).with_message(source.to_string()));
            }
            FieldError::DateTime { source, .. } => {
                notes.push(format!("expected format YYMMDDHHMM: {}", source));
            }
            _ => {}
        }
        Diagnostic::error()
            .with_message(self.to_string())
            .with_labels(labels)
            .with_notes(notes)
    }
}
