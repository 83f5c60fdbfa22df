use crate::block::BlockRecord;
use crate::parser::FieldError;
use crate::typed::subblocks::{AdditionalSubblocks, read_subblocks, render_subblocks};
use crate::typed::{TypedBlock, expect_id};

/// System trailer block `{S:...}`, added by the network.
///
/// ```text
/// CHK  checksum
/// TNG  training
/// PDE  possible duplicate emission
/// DLM  delayed message
/// MRF  message reference
/// PDM  possible duplicate message
/// SYS  system originated message
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemTrailerBlock {
    pub checksum: Option<String>,
    pub training: Option<String>,
    pub possible_duplicate_emission: Option<String>,
    pub delayed_message: Option<String>,
    pub message_reference: Option<String>,
    pub possible_duplicate_message: Option<String>,
    pub system_originated_message: Option<String>,
    pub additional_subblocks: AdditionalSubblocks,
}

impl TypedBlock for SystemTrailerBlock {
    const ID: &'static str = "S";

    fn parse(record: &BlockRecord) -> Result<Self, FieldError> {
        expect_id(record, Self::ID)?;

        let mut block = SystemTrailerBlock::default();
        block.additional_subblocks = read_subblocks(Self::ID, record, |subblock| {
            let slot = match subblock.id() {
                "CHK" => &mut block.checksum,
                "TNG" => &mut block.training,
                "PDE" => &mut block.possible_duplicate_emission,
                "DLM" => &mut block.delayed_message,
                "MRF" => &mut block.message_reference,
                "PDM" => &mut block.possible_duplicate_message,
                "SYS" => &mut block.system_originated_message,
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
                ("CHK", self.checksum.as_ref()),
                ("TNG", self.training.as_ref()),
                ("PDE", self.possible_duplicate_emission.as_ref()),
                ("DLM", self.delayed_message.as_ref()),
                ("MRF", self.message_reference.as_ref()),
                ("PDM", self.possible_duplicate_message.as_ref()),
                ("SYS", self.system_originated_message.as_ref()),
            ],
            &self.additional_subblocks,
        )
    }
}
