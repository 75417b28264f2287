//! Transfer itinerary events.

use std::fmt;

use serde::Serialize;

/// Kind of an itinerary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferKind {
    Start,
    Transfer,
    End,
}

impl TransferKind {
    pub fn label(self) -> &'static str {
        match self {
            TransferKind::Start => "Start",
            TransferKind::Transfer => "Umstieg",
            TransferKind::End => "Ziel",
        }
    }
}

/// One line of the human-readable transit itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferEvent {
    pub kind: TransferKind,
    pub stop_name: String,
    pub time_text: String,
}

impl TransferEvent {
    pub fn new(kind: TransferKind, stop_name: impl Into<String>, time_text: impl Into<String>) -> Self {
        Self {
            kind,
            stop_name: stop_name.into(),
            time_text: time_text.into(),
        }
    }
}

impl fmt::Display for TransferEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} - {}",
            self.kind.label(),
            self.stop_name,
            self.time_text
        )
    }
}
