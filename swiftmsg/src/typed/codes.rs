//! Closed lookup tables for single-character codes in fixed-width headers.

use std::fmt;

/// Message priority, the trailing flag of an application header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessagePriority {
    Urgent,
    Normal,
    System,
}

impl MessagePriority {
    const TABLE: [(&'static str, MessagePriority); 3] = [
        ("U", MessagePriority::Urgent),
        ("N", MessagePriority::Normal),
        ("S", MessagePriority::System),
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, priority)| *priority)
    }

    pub fn code(self) -> &'static str {
        match self {
            MessagePriority::Urgent => "U",
            MessagePriority::Normal => "N",
            MessagePriority::System => "S",
        }
    }
}

impl fmt::Display for MessagePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Application identifier, the first character of a basic header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationId {
    /// `F`: FIN, all user-to-user and system messages.
    Financial,
    /// `A`: general purpose application.
    GeneralPurpose,
    /// `L`: login and session control.
    Logins,
}

impl ApplicationId {
    const TABLE: [(&'static str, ApplicationId); 3] = [
        ("F", ApplicationId::Financial),
        ("A", ApplicationId::GeneralPurpose),
        ("L", ApplicationId::Logins),
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::TABLE.iter().find(|(c, _)| *c == code).map(|(_, id)| *id)
    }

    pub fn code(self) -> &'static str {
        match self {
            ApplicationId::Financial => "F",
            ApplicationId::GeneralPurpose => "A",
            ApplicationId::Logins => "L",
        }
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
