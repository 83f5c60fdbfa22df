use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::block::BlockRecord;
use crate::parser::FieldError;
use crate::typed::codes::MessagePriority;
use crate::typed::{TypedBlock, expect_id};

const ID: &str = "2";

const OUTPUT_PATTERN: &str =
    "(O)(.{3})([0-9]{4})([0-9]{6})(.{12})(.{4})(.{6})([0-9]{6})([0-9]{4})(.)";
const INPUT_PATTERN: &str = "(I)(.{3})(.{12})(?:(.)(?:(.)(.{3})?)?)?";

// The mode is matched as any character so a wrong mode is reported as such
// rather than as a shape mismatch. Date and time slices are ASCII digits only;
// chrono alone would accept `1 00` as 01:00.
static OUTPUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.)(.{3})([0-9]{4})([0-9]{6})(.{12})(.{4})(.{6})([0-9]{6})([0-9]{4})(.)$")
        .unwrap()
});
static INPUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.)(.{3})(.{12})(?:(.)(?:(.)(.{3})?)?)?$").unwrap());

const DATE_TIME_FORMAT: &str = "%y%m%d%H%M";

/// Application header, either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationHeader {
    Input(ApplicationHeaderInputBlock),
    Output(ApplicationHeaderOutputBlock),
}

impl ApplicationHeader {
    /// Parse block `2`, choosing the direction from the leading mode character.
    pub fn parse(record: &BlockRecord) -> Result<Self, FieldError> {
        expect_id(record, ID)?;
        match record.content().chars().next() {
            Some('I') => ApplicationHeaderInputBlock::parse(record).map(ApplicationHeader::Input),
            Some('O') => ApplicationHeaderOutputBlock::parse(record).map(ApplicationHeader::Output),
            other => Err(FieldError::UnknownCode {
                id: ID,
                field: "mode",
                code: other.map(String::from).unwrap_or_default(),
            }),
        }
    }

    pub fn message_type(&self) -> &str {
        match self {
            ApplicationHeader::Input(block) => &block.message_type,
            ApplicationHeader::Output(block) => &block.message_type,
        }
    }

    pub fn message_priority(&self) -> Option<MessagePriority> {
        match self {
            ApplicationHeader::Input(block) => block.message_priority,
            ApplicationHeader::Output(block) => Some(block.message_priority),
        }
    }

    pub fn content(&self) -> String {
        match self {
            ApplicationHeader::Input(block) => block.content(),
            ApplicationHeader::Output(block) => block.content(),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            ApplicationHeader::Input(block) => block.to_text(),
            ApplicationHeader::Output(block) => block.to_text(),
        }
    }
}

/// Output application header `{2:O...}`, 47 fixed-width characters.
///
/// ```text
///  1: 1  mode, always O
///  2: 3  message type
///  3: 4  input time (HHMM)
///  4: 6  input date (YYMMDD)
///  5: 12 message input reference, sender's address
///  6: 4  session number
///  7: 6  sequence number
///  8: 6  output date (YYMMDD)
///  9: 4  output time (HHMM)
/// 10: 1  priority
/// ```
///
/// Example: `O1001200970103BANKBEBBAXXX22221234569701031201N`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationHeaderOutputBlock {
    pub message_type: String,
    /// Two-digit years follow chrono's `%y`: `70..=99` is 19xx, `00..=69` is 20xx.
    pub input_date_time: NaiveDateTime,
    pub input_reference: String,
    pub session_number: String,
    pub sequence_number: String,
    /// Same two-digit year rule as `input_date_time`.
    pub output_date_time: NaiveDateTime,
    pub message_priority: MessagePriority,
}

impl ApplicationHeaderOutputBlock {
    pub const MODE: char = 'O';
}

impl TypedBlock for ApplicationHeaderOutputBlock {
    const ID: &'static str = ID;

    fn parse(record: &BlockRecord) -> Result<Self, FieldError> {
        expect_id(record, Self::ID)?;

        let caps = OUTPUT_RE.captures(record.content()).ok_or(FieldError::Shape {
            id: Self::ID,
            pattern: OUTPUT_PATTERN,
        })?;
        check_mode(&caps, Self::MODE)?;

        // Input is stored time-then-date, output date-then-time.
        let input_date_time = parse_date_time("input date/time", &caps[4], &caps[3])?;
        let output_date_time = parse_date_time("output date/time", &caps[8], &caps[9])?;
        let message_priority = parse_priority(&caps[10])?;

        Ok(ApplicationHeaderOutputBlock {
            message_type: caps[2].to_string(),
            input_date_time,
            input_reference: caps[5].to_string(),
            session_number: caps[6].to_string(),
            sequence_number: caps[7].to_string(),
            output_date_time,
            message_priority,
        })
    }

    fn content(&self) -> String {
        format!(
            "{}{}{}{}{}{}{}{}{}{}",
            Self::MODE,
            self.message_type,
            self.input_date_time.format("%H%M"),
            self.input_date_time.format("%y%m%d"),
            self.input_reference,
            self.session_number,
            self.sequence_number,
            self.output_date_time.format("%y%m%d"),
            self.output_date_time.format("%H%M"),
            self.message_priority.code()
        )
    }
}

/// Input application header `{2:I...}`.
///
/// ```text
/// 1: 1  mode, always I
/// 2: 3  message type
/// 3: 12 receiver's address
/// 4: 1  priority (optional)
/// 5: 1  delivery monitoring (optional)
/// 6: 3  obsolescence period (optional)
/// ```
///
/// Example: `I940BANKDEFFXXXXU3003`
///
/// Optional trailing fields only render if every field before them is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationHeaderInputBlock {
    pub message_type: String,
    pub receiver_address: String,
    pub message_priority: Option<MessagePriority>,
    pub delivery_monitoring: Option<String>,
    pub obsolescence_period: Option<String>,
}

impl ApplicationHeaderInputBlock {
    pub const MODE: char = 'I';
}

impl TypedBlock for ApplicationHeaderInputBlock {
    const ID: &'static str = ID;

    fn parse(record: &BlockRecord) -> Result<Self, FieldError> {
        expect_id(record, Self::ID)?;

        let caps = INPUT_RE.captures(record.content()).ok_or(FieldError::Shape {
            id: Self::ID,
            pattern: INPUT_PATTERN,
        })?;
        check_mode(&caps, Self::MODE)?;

        let message_priority = caps.get(4).map(|m| parse_priority(m.as_str())).transpose()?;

        Ok(ApplicationHeaderInputBlock {
            message_type: caps[2].to_string(),
            receiver_address: caps[3].to_string(),
            message_priority,
            delivery_monitoring: caps.get(5).map(|m| m.as_str().to_string()),
            obsolescence_period: caps.get(6).map(|m| m.as_str().to_string()),
        })
    }

    fn content(&self) -> String {
        let mut content = format!("{}{}{}", Self::MODE, self.message_type, self.receiver_address);
        if let Some(priority) = self.message_priority {
            content.push_str(priority.code());
            if let Some(monitoring) = &self.delivery_monitoring {
                content.push_str(monitoring);
                if let Some(period) = &self.obsolescence_period {
                    content.push_str(period);
                }
            }
        }
        content
    }
}

fn check_mode(caps: &Captures<'_>, expected: char) -> Result<(), FieldError> {
    let mode = &caps[1];
    if mode.chars().eq(std::iter::once(expected)) {
        Ok(())
    } else {
        Err(FieldError::Mode {
            id: ID,
            expected,
            found: mode.to_string(),
        })
    }
}

fn parse_priority(code: &str) -> Result<MessagePriority, FieldError> {
    MessagePriority::from_code(code).ok_or_else(|| FieldError::UnknownCode {
        id: ID,
        field: "priority",
        code: code.to_string(),
    })
}

fn parse_date_time(
    field: &'static str,
    date: &str,
    time: &str,
) -> Result<NaiveDateTime, FieldError> {
    let value = format!("{}{}", date, time);
    NaiveDateTime::parse_from_str(&value, DATE_TIME_FORMAT).map_err(|source| {
        FieldError::DateTime {
            id: ID,
            field,
            value,
            source,
        }
    })
}
