//! Structural parsing of SWIFT FIN message text.
//!
//! Raw text is split into `{id:content}` records by [`parser::BlockReader`],
//! records are turned into typed blocks by [`typed::parse_block`], and typed
//! blocks render back to text through [`block::render`].

pub mod block;
pub mod parser;
pub mod typed;

pub use block::{BlockRecord, render};
pub use parser::{BlockError, BlockReader, FieldError, read_blocks};
pub use typed::{SwiftBlock, TypedBlock, parse_block};
