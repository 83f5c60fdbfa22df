use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use rstest::rstest;

use swiftmsg::typed::{
    ApplicationHeader, ApplicationHeaderInputBlock, ApplicationHeaderOutputBlock, ApplicationId,
    BasicHeaderBlock, LineBreak, MessagePriority, SystemTrailerBlock, TextBlock, UserHeaderBlock,
    UserTrailerBlock,
};
use swiftmsg::{BlockError, BlockRecord, FieldError, SwiftBlock, TypedBlock, parse_block, read_blocks};

const OUTPUT_HEADER: &str = "O1001200970103BANKBEBBAXXX22221234569701031201N";

fn date_time(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn first_record(source: &str) -> BlockRecord {
    read_blocks(source).expect("read failed").remove(0)
}

fn block_record(id: &str, content: impl Into<String>) -> BlockRecord {
    BlockRecord::new(id, content).expect("valid block id")
}

// ---------------------------------------------------------------------------
// Fixed-width blocks
// ---------------------------------------------------------------------------

#[test]
fn output_header_parses() {
    let block = ApplicationHeaderOutputBlock::parse(&block_record("2", OUTPUT_HEADER)).unwrap();
    assert_eq!(
        block,
        ApplicationHeaderOutputBlock {
            message_type: "100".into(),
            input_date_time: date_time(1997, 1, 3, 12, 0),
            input_reference: "BANKBEBBAXXX".into(),
            session_number: "2222".into(),
            sequence_number: "123456".into(),
            output_date_time: date_time(1997, 1, 3, 12, 1),
            message_priority: MessagePriority::Normal,
        }
    );
    assert_eq!(block.content(), OUTPUT_HEADER);
    assert_eq!(block.to_text(), format!("{{2:{}}}", OUTPUT_HEADER));
}

#[test]
fn output_header_rejects_input_mode() {
    let content = format!("I{}", &OUTPUT_HEADER[1..]);
    let err = ApplicationHeaderOutputBlock::parse(&block_record("2", content)).unwrap_err();
    assert_eq!(
        err,
        FieldError::Mode {
            id: "2",
            expected: 'O',
            found: "I".into()
        }
    );
}

#[rstest]
#[case::one_short(&OUTPUT_HEADER[..46])]
#[case::one_long("O1001200970103BANKBEBBAXXX22221234569701031201NX")]
#[case::empty("")]
fn output_header_rejects_wrong_length(#[case] content: &str) {
    let err = ApplicationHeaderOutputBlock::parse(&block_record("2", content)).unwrap_err();
    assert!(matches!(err, FieldError::Shape { id: "2", .. }), "{err:?}");
}

#[test]
fn output_header_rejects_wrong_id() {
    let err = ApplicationHeaderOutputBlock::parse(&block_record("1", OUTPUT_HEADER)).unwrap_err();
    assert_eq!(
        err,
        FieldError::UnexpectedId {
            expected: "2",
            found: "1".into()
        }
    );
}

#[test]
fn output_header_rejects_out_of_range_date() {
    // Month 13 in the input date.
    let content = "O1001200971303BANKBEBBAXXX22221234569701031201N";
    let err = ApplicationHeaderOutputBlock::parse(&block_record("2", content)).unwrap_err();
    match err {
        FieldError::DateTime { field, value, .. } => {
            assert_eq!(field, "input date/time");
            assert_eq!(value, "9713031200");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
#[case::input_time_space("O1001 00970103BANKBEBBAXXX22221234569701031201N")]
#[case::input_date_space("O100120097 103BANKBEBBAXXX22221234569701031201N")]
#[case::output_date_space("O1001200970103BANKBEBBAXXX2222123456970 031201N")]
#[case::output_time_space("O1001200970103BANKBEBBAXXX222212345697010312 1N")]
#[case::output_time_letter("O1001200970103BANKBEBBAXXX22221234569701031X01N")]
fn output_header_rejects_non_digit_date_time(#[case] content: &str) {
    assert_eq!(content.len(), OUTPUT_HEADER.len());
    let err = ApplicationHeaderOutputBlock::parse(&block_record("2", content)).unwrap_err();
    assert!(matches!(err, FieldError::Shape { id: "2", .. }), "{err:?}");
}

#[test]
fn output_header_date_time_error_keeps_chrono_cause() {
    // Digits in every slice, but 25:00 is not a time.
    let content = "O1002500970103BANKBEBBAXXX22221234569701031201N";
    let err = ApplicationHeaderOutputBlock::parse(&block_record("2", content)).unwrap_err();
    assert!(matches!(
        err,
        FieldError::DateTime {
            field: "input date/time",
            ..
        }
    ));
    assert!(std::error::Error::source(&err).is_some());
}

#[rstest]
#[case("U", MessagePriority::Urgent)]
#[case("N", MessagePriority::Normal)]
#[case("S", MessagePriority::System)]
fn output_header_priorities(#[case] code: &str, #[case] expected: MessagePriority) {
    let content = format!("{}{}", &OUTPUT_HEADER[..46], code);
    let block = ApplicationHeaderOutputBlock::parse(&block_record("2", content)).unwrap();
    assert_eq!(block.message_priority, expected);
}

#[test]
fn output_header_rejects_unknown_priority() {
    let content = format!("{}X", &OUTPUT_HEADER[..46]);
    let err = ApplicationHeaderOutputBlock::parse(&block_record("2", content)).unwrap_err();
    assert_eq!(
        err,
        FieldError::UnknownCode {
            id: "2",
            field: "priority",
            code: "X".into()
        }
    );
}

#[rstest]
#[case("I940BANKDEFFXXXX", None, None, None)]
#[case("I940BANKDEFFXXXXU", Some(MessagePriority::Urgent), None, None)]
#[case("I940BANKDEFFXXXXN3", Some(MessagePriority::Normal), Some("3"), None)]
#[case("I940BANKDEFFXXXXU3003", Some(MessagePriority::Urgent), Some("3"), Some("003"))]
fn input_header_optional_fields(
    #[case] content: &str,
    #[case] priority: Option<MessagePriority>,
    #[case] monitoring: Option<&str>,
    #[case] period: Option<&str>,
) {
    let block = ApplicationHeaderInputBlock::parse(&block_record("2", content)).unwrap();
    assert_eq!(block.message_type, "940");
    assert_eq!(block.receiver_address, "BANKDEFFXXXX");
    assert_eq!(block.message_priority, priority);
    assert_eq!(block.delivery_monitoring.as_deref(), monitoring);
    assert_eq!(block.obsolescence_period.as_deref(), period);
    assert_eq!(block.content(), content);
}

#[rstest]
#[case::too_short("I940BANKDEFFXXX")]
#[case::nineteen("I940BANKDEFFXXXXU30")]
#[case::twenty("I940BANKDEFFXXXXU300")]
#[case::too_long("I940BANKDEFFXXXXU30030")]
fn input_header_rejects_bad_lengths(#[case] content: &str) {
    let err = ApplicationHeaderInputBlock::parse(&block_record("2", content)).unwrap_err();
    assert!(matches!(err, FieldError::Shape { .. }), "{err:?}");
}

#[test]
fn application_header_dispatches_on_mode() {
    let input = ApplicationHeader::parse(&block_record("2", "I940BANKDEFFXXXXN")).unwrap();
    assert!(matches!(input, ApplicationHeader::Input(_)));
    assert_eq!(input.message_type(), "940");

    let output = ApplicationHeader::parse(&block_record("2", OUTPUT_HEADER)).unwrap();
    assert!(matches!(output, ApplicationHeader::Output(_)));
    assert_eq!(output.message_priority(), Some(MessagePriority::Normal));

    let err = ApplicationHeader::parse(&block_record("2", "X940")).unwrap_err();
    assert!(matches!(err, FieldError::UnknownCode { field: "mode", .. }));
}

#[test]
fn basic_header_parses() {
    let block = BasicHeaderBlock::parse(&block_record("1", "F01BANKBEBBAXXX2222123456")).unwrap();
    assert_eq!(
        block,
        BasicHeaderBlock {
            application_id: ApplicationId::Financial,
            service_id: "01".into(),
            logical_terminal_address: "BANKBEBBAXXX".into(),
            session_number: "2222".into(),
            sequence_number: "123456".into(),
        }
    );
    assert_eq!(block.content(), "F01BANKBEBBAXXX2222123456");
}

#[test]
fn basic_header_rejects_unknown_application_id() {
    let err = BasicHeaderBlock::parse(&block_record("1", "X01BANKBEBBAXXX2222123456")).unwrap_err();
    assert!(matches!(
        err,
        FieldError::UnknownCode {
            field: "application id",
            ..
        }
    ));
}

#[test]
fn basic_header_rejects_short_content() {
    let err = BasicHeaderBlock::parse(&block_record("1", "F01BANKBEBBAXXX222212345")).unwrap_err();
    assert!(matches!(err, FieldError::Shape { id: "1", .. }));
}

#[test]
fn text_block_round_trips() {
    for content in ["\r\n:20:REF\r\n:25:ACC\r\n-", "\n:20:REF\n-", "INFO\n:20:REF\n-"] {
        let block = TextBlock::parse(&block_record("4", content)).unwrap();
        assert_eq!(block.content(), content);
    }

    let block = TextBlock::parse(&block_record("4", "\r\n:20:REF\r\n-")).unwrap();
    assert_eq!(block.info_line, None);
    assert_eq!(block.line_break, LineBreak::CrLf);
    assert_eq!(block.text, ":20:REF\r\n-");
}

#[rstest]
#[case::no_line_break(":20:REF-")]
#[case::no_end_marker("\n:20:REF\n")]
fn text_block_rejects_bad_shape(#[case] content: &str) {
    let err = TextBlock::parse(&block_record("4", content)).unwrap_err();
    assert!(matches!(err, FieldError::Shape { id: "4", .. }));
}

// ---------------------------------------------------------------------------
// Nesting blocks
// ---------------------------------------------------------------------------

#[test]
fn user_trailer_parses_known_subblocks() {
    let record = first_record("{5:{MAC:12345678}{CHK:123456789ABC}}");
    let block = UserTrailerBlock::parse(&record).unwrap();
    assert_eq!(block.message_authentication_code.as_deref(), Some("12345678"));
    assert_eq!(block.checksum.as_deref(), Some("123456789ABC"));
    assert_eq!(block.training, None);
    assert!(block.additional_subblocks.is_empty());
    assert_eq!(block.content(), record.content());
}

#[test]
fn user_trailer_keeps_unknown_subblocks() {
    let block = UserTrailerBlock::parse(&block_record("5", "{MAC:X}{ZZZ:Y}")).unwrap();
    assert_eq!(block.message_authentication_code.as_deref(), Some("X"));
    assert_eq!(
        block.additional_subblock("ZZZ"),
        Some(&block_record("ZZZ", "Y"))
    );

    let rendered = read_blocks(&block.content()).unwrap();
    assert_eq!(
        rendered,
        vec![block_record("MAC", "X"), block_record("ZZZ", "Y")]
    );
}

#[test]
fn unknown_subblocks_keep_insertion_order() {
    let content = "{ZZZ:1}{AAA:2}{MMM:3}";
    let block = UserTrailerBlock::parse(&block_record("5", content)).unwrap();
    let ids: Vec<&str> = block.additional_subblocks.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["ZZZ", "AAA", "MMM"]);
    assert_eq!(block.content(), content);
}

#[test]
fn repeated_known_code_keeps_last() {
    let block = UserTrailerBlock::parse(&block_record("5", "{MAC:first}{MAC:second}")).unwrap();
    assert_eq!(block.message_authentication_code.as_deref(), Some("second"));
    assert_eq!(block.content(), "{MAC:second}");
}

#[test]
fn empty_trailer_has_no_fields() {
    let block = UserTrailerBlock::parse(&block_record("5", "")).unwrap();
    assert_eq!(block, UserTrailerBlock::default());
    assert_eq!(block.to_text(), "{5:}");
}

#[test]
fn present_but_empty_subblock_is_not_absent() {
    let block = UserTrailerBlock::parse(&block_record("5", "{PDE:}")).unwrap();
    assert_eq!(block.possible_duplicate_emission.as_deref(), Some(""));
}

#[test]
fn trailer_content_error_wraps_block_error() {
    let source = "{5:{MAC:1}{CHK:2}x}";
    let record = first_record(source);
    let err = UserTrailerBlock::parse(&record).unwrap_err();
    let inner = err.block_error().expect("expected a nested block error");
    assert!(matches!(inner, BlockError::ExpectedBlockStart { found: 'x', .. }));
    assert_eq!(&source[inner.span()], "x");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn trailer_rejects_wrong_id() {
    let err = UserTrailerBlock::parse(&block_record("S", "{CHK:1}")).unwrap_err();
    assert!(matches!(err, FieldError::UnexpectedId { expected: "5", .. }));
}

#[test]
fn system_trailer_parses() {
    let block = SystemTrailerBlock::parse(&block_record(
        "S",
        "{SAC:}{COP:P}{MRF:1806271539180626BANKFRPPAXXX2222123456}",
    ))
    .unwrap();
    assert_eq!(
        block.message_reference.as_deref(),
        Some("1806271539180626BANKFRPPAXXX2222123456")
    );
    let ids: Vec<&str> = block.additional_subblocks.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["SAC", "COP"]);
}

#[test]
fn user_header_parses() {
    let content = "{113:SEPA}{108:ILOVESEPA}{121:98cb2d46-2b8e-4a8e-9ad8-30d4bbb4a5ed}";
    let block = UserHeaderBlock::parse(&block_record("3", content)).unwrap();
    assert_eq!(block.banking_priority.as_deref(), Some("SEPA"));
    assert_eq!(block.message_user_reference.as_deref(), Some("ILOVESEPA"));
    assert_eq!(
        block.unique_end_to_end_transaction_reference.as_deref(),
        Some("98cb2d46-2b8e-4a8e-9ad8-30d4bbb4a5ed")
    );
    // Canonical order puts 113 before 108.
    assert_eq!(block.content(), content);
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn parse_block_selects_parser_by_id() {
    let source = concat!(
        "{1:F01BANKBEBBAXXX2222123456}",
        "{2:I940BANKDEFFXXXXN}",
        "{3:{108:REF}}",
        "{4:\n:20:X\n-}",
        "{5:{CHK:1}}",
        "{S:{SAC:}}",
        "{Z:anything}",
    );
    let blocks: Vec<SwiftBlock> = read_blocks(source)
        .unwrap()
        .iter()
        .map(|r| parse_block(r).unwrap())
        .collect();

    assert!(matches!(blocks[0], SwiftBlock::BasicHeader(_)));
    assert!(matches!(blocks[1], SwiftBlock::ApplicationHeaderInput(_)));
    assert!(matches!(blocks[2], SwiftBlock::UserHeader(_)));
    assert!(matches!(blocks[3], SwiftBlock::Text(_)));
    assert!(matches!(blocks[4], SwiftBlock::UserTrailer(_)));
    assert!(matches!(blocks[5], SwiftBlock::SystemTrailer(_)));
    assert_eq!(blocks[6], SwiftBlock::General(block_record("Z", "anything")));
    assert!(!blocks[6].is_known());

    let rendered: String = blocks.iter().map(SwiftBlock::to_text).collect();
    assert_eq!(rendered, source);
}

#[test]
fn parse_block_reports_field_errors() {
    let err = parse_block(&block_record("1", "short")).unwrap_err();
    assert!(matches!(err, FieldError::Shape { id: "1", .. }));
}
