use indexmap::IndexMap;
use log::debug;

use crate::block::{BlockRecord, render};
use crate::parser::{BlockReader, FieldError};

/// Unrecognized sub-blocks, keyed by id, in first-seen order.
pub type AdditionalSubblocks = IndexMap<String, BlockRecord>;

/// Re-tokenize `record`'s content as a sequence of sub-blocks.
///
/// Each sub-block is offered to `assign`, which returns `false` for ids it
/// does not know. Those are kept in the returned map; a repeated unknown id
/// keeps its first position and its last content.
pub(crate) fn read_subblocks(
    id: &'static str,
    record: &BlockRecord,
    mut assign: impl FnMut(&BlockRecord) -> bool,
) -> Result<AdditionalSubblocks, FieldError> {
    let mut additional = AdditionalSubblocks::new();
    for subblock in BlockReader::for_content(record) {
        let subblock = subblock.map_err(|source| FieldError::Content { id, source })?;
        if !assign(&subblock) {
            debug!("block '{}' keeps unrecognized sub-block '{}'", id, subblock.id());
            additional.insert(subblock.id().to_string(), subblock);
        }
    }
    Ok(additional)
}

/// Render known fields in table order, then the unrecognized sub-blocks.
pub(crate) fn render_subblocks(
    known: &[(&str, Option<&String>)],
    additional: &AdditionalSubblocks,
) -> String {
    let mut content = String::new();
    for (code, value) in known {
        if let Some(value) = value {
            content.push_str(&render(code, value));
        }
    }
    for subblock in additional.values() {
        content.push_str(&subblock.to_text());
    }
    content
}
