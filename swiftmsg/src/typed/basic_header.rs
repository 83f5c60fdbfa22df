use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::BlockRecord;
use crate::parser::FieldError;
use crate::typed::codes::ApplicationId;
use crate::typed::{TypedBlock, expect_id};

const PATTERN: &str = "(.)(.{2})(.{12})(.{4})(.{6})";

static CONTENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("^{}$", PATTERN)).unwrap());

/// Basic header block `{1:...}`, 25 fixed-width characters.
///
/// Example: `F01BANKBEBBAXXX2222123456`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicHeaderBlock {
    pub application_id: ApplicationId,
    /// `01` FIN/GPA, `21` ACK/NAK.
    pub service_id: String,
    pub logical_terminal_address: String,
    pub session_number: String,
    pub sequence_number: String,
}

impl TypedBlock for BasicHeaderBlock {
    const ID: &'static str = "1";

    fn parse(record: &BlockRecord) -> Result<Self, FieldError> {
        expect_id(record, Self::ID)?;

        let caps = CONTENT_RE
            .captures(record.content())
            .ok_or(FieldError::Shape {
                id: Self::ID,
                pattern: PATTERN,
            })?;

        let application_id =
            ApplicationId::from_code(&caps[1]).ok_or_else(|| FieldError::UnknownCode {
                id: Self::ID,
                field: "application id",
                code: caps[1].to_string(),
            })?;

        Ok(BasicHeaderBlock {
            application_id,
            service_id: caps[2].to_string(),
            logical_terminal_address: caps[3].to_string(),
            session_number: caps[4].to_string(),
            sequence_number: caps[5].to_string(),
        })
    }

    fn content(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.application_id.code(),
            self.service_id,
            self.logical_terminal_address,
            self.session_number,
            self.sequence_number
        )
    }
}
