use crate::block::BlockRecord;
use crate::parser::FieldError;
use crate::typed::subblocks::{AdditionalSubblocks, read_subblocks, render_subblocks};
use crate::typed::{TypedBlock, expect_id};

/// User header block `{3:...}`, a sequence of numbered sub-blocks.
///
/// Example: `{113:SEPA}{108:MT103 003 OF}{121:98cb2d46-2b8e-4a8e-9ad8-30d4bbb4a5ed}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserHeaderBlock {
    /// 103
    pub service_identifier: Option<String>,
    /// 113
    pub banking_priority: Option<String>,
    /// 108
    pub message_user_reference: Option<String>,
    /// 119
    pub validation_flag: Option<String>,
    /// 423
    pub balance_checkpoint: Option<String>,
    /// 106
    pub message_input_reference: Option<String>,
    /// 424
    pub related_reference: Option<String>,
    /// 111
    pub service_type_identifier: Option<String>,
    /// 121, the UETR.
    pub unique_end_to_end_transaction_reference: Option<String>,
    /// 115
    pub addressee_information: Option<String>,
    /// 165
    pub payment_release_information: Option<String>,
    /// 433
    pub sanctions_screening_information: Option<String>,
    /// 434
    pub payment_controls_information: Option<String>,
    pub additional_subblocks: AdditionalSubblocks,
}

impl TypedBlock for UserHeaderBlock {
    const ID: &'static str = "3";

    fn parse(record: &BlockRecord) -> Result<Self, FieldError> {
        expect_id(record, Self::ID)?;

        let mut block = UserHeaderBlock::default();
        block.additional_subblocks = read_subblocks(Self::ID, record, |subblock| {
            let slot = match subblock.id() {
                "103" => &mut block.service_identifier,
                "113" => &mut block.banking_priority,
                "108" => &mut block.message_user_reference,
                "119" => &mut block.validation_flag,
                "423" => &mut block.balance_checkpoint,
                "106" => &mut block.message_input_reference,
                "424" => &mut block.related_reference,
                "111" => &mut block.service_type_identifier,
                "121" => &mut block.unique_end_to_end_transaction_reference,
                "115" => &mut block.addressee_information,
                "165" => &mut block.payment_release_information,
                "433" => &mut block.sanctions_screening_information,
                "434" => &mut block.payment_controls_information,
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
                ("103", self.service_identifier.as_ref()),
                ("113", self.banking_priority.as_ref()),
                ("108", self.message_user_reference.as_ref()),
                ("119", self.validation_flag.as_ref()),
                ("423", self.balance_checkpoint.as_ref()),
                ("106", self.message_input_reference.as_ref()),
                ("424", self.related_reference.as_ref()),
                ("111", self.service_type_identifier.as_ref()),
                ("121", self.unique_end_to_end_transaction_reference.as_ref()),
                ("115", self.addressee_information.as_ref()),
                ("165", self.payment_release_information.as_ref()),
                ("433", self.sanctions_screening_information.as_ref()),
                ("434", self.payment_controls_information.as_ref()),
            ],
            &self.additional_subblocks,
        )
    }
}
