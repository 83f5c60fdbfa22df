use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

use swiftmsg::{BlockError, FieldError};

/// A message-level failure, carrying the source span it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error(transparent)]
    Block(#[from] BlockError),

    #[error("invalid block '{id}': {source}")]
    Field {
        id: String,
        span: Range<usize>,
        #[source]
        source: FieldError,
    },

    #[error("message is missing mandatory block '{id}'")]
    MissingBlock { id: &'static str, span: Range<usize> },

    #[error("block '{id}' may not follow block '{previous}'")]
    OutOfOrder {
        id: String,
        previous: String,
        span: Range<usize>,
    },

    #[error("duplicate block '{id}'")]
    DuplicateBlock { id: String, span: Range<usize> },

    #[error("unknown block '{id}'")]
    UnknownBlock { id: String, span: Range<usize> },

    #[error("expected a single message, found another one")]
    UnexpectedMessage { span: Range<usize> },
}

impl MessageError {
    pub fn span(&self) -> Range<usize> {
        match self {
            MessageError::Block(error) => error.span(),
            MessageError::Field { span, .. }
            | MessageError::MissingBlock { span, .. }
            | MessageError::OutOfOrder { span, .. }
            | MessageError::DuplicateBlock { span, .. }
            | MessageError::UnknownBlock { span, .. }
            | MessageError::UnexpectedMessage { span } => span.clone(),
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        match self {
            MessageError::Block(error) => error.to_diagnostic(file_id),
            MessageError::Field { span, source, .. } => source.to_diagnostic(file_id, span.clone()),
            MessageError::MissingBlock { .. } => Diagnostic::error()
                .with_message(self.to_string())
                .with_labels(vec![Label::primary(file_id, self.span())])
                .with_notes(vec![
                    "blocks '1' and '2' are always required, '4' unless require-text-block = false"
                        .to_string(),
                ]),
            _ => Diagnostic::error()
                .with_message(self.to_string())
                .with_labels(vec![Label::primary(file_id, self.span())]),
        }
    }
}
