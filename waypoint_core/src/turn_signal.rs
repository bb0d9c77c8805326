//! Turn-signal labels stored in the `turn_signal` column.

use serde::{Deserialize, Serialize};

/// Turn-signal annotation of a frame.
///
/// An unlabelled frame has no `TurnLabel` at all (`Option::None`, an empty
/// cell in the table). `Skip` marks a frame range as unusable for training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnLabel {
    Skip,
    Right,
    Straight,
    Left,
}

impl TurnLabel {
    /// Integer code written to the table.
    pub fn code(&self) -> i32 {
        match self {
            TurnLabel::Skip => -1,
            TurnLabel::Right => 0,
            TurnLabel::Straight => 1,
            TurnLabel::Left => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TurnLabel::Skip => "skip",
            TurnLabel::Right => "right",
            TurnLabel::Straight => "straight",
            TurnLabel::Left => "left",
        }
    }
}

impl std::fmt::Display for TurnLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
