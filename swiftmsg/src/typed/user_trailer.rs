use crate::block::BlockRecord;
use crate::parser::FieldError;
use crate::typed::subblocks::{AdditionalSubblocks, read_subblocks, render_subblocks};
use crate::typed::{TypedBlock, expect_id};

/// User trailer block `{5:...}`.
///
/// Content is a sequence of sub-blocks:
///
/// ```text
/// MAC  message authentication code
/// PAC  proprietary authentication code
/// CHK  checksum
/// TNG  training
/// PDE  possible duplicate emission
/// DLM  delayed message
/// ```
///
/// Example: `{MAC:12345678}{CHK:123456789ABC}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTrailerBlock {
    pub message_authentication_code: Option<String>,
    pub proprietary_authentication_code: Option<String>,
    pub checksum: Option<String>,
    pub training: Option<String>,
    pub possible_duplicate_emission: Option<String>,
    pub delivery_delay: Option<String>,
    pub additional_subblocks: AdditionalSubblocks,
}

impl UserTrailerBlock {
    pub fn additional_subblock(&self, id: &str) -> Option<&BlockRecord> {
        self.additional_subblocks.get(id)
    }
}

impl TypedBlock for UserTrailerBlock {
    const ID: &'static str = "5";

    fn parse(record: &BlockRecord) -> Result<Self, FieldError> {
        expect_id(record, Self::ID)?;

        let mut block = UserTrailerBlock::default();
        block.additional_subblocks = read_subblocks(Self::ID, record, |subblock| {
            let slot = match subblock.id() {
                "MAC" => &mut block.message_authentication_code,
                "PAC" => &mut block.proprietary_authentication_code,
                "CHK" => &mut block.checksum,
                "TNG" => &mut block.training,
                "PDE" => &mut block.possible_duplicate_emission,
                "DLM" => &mut block.delivery_delay,
                _ => return false,
            };
            *slot = Some(subblock.content().to_string());
            true
        })?;
        Ok(block)
    }

    fn content(&self) -> String {
        render_subblocks(
            &[
                ("MAC", self.message_authentication_code.as_ref()),
                ("PAC", self.proprietary_authentication_code.as_ref()),
                ("CHK", self.checksum.as_ref()),
                ("TNG", self.training.as_ref()),
                ("PDE", self.possible_duplicate_emission.as_ref()),
                ("DLM", self.delivery_delay.as_ref()),
            ],
            &self.additional_subblocks,
        )
    }
}
