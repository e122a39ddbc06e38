use serde::{Deserialize, Serialize};
use std::fmt;

/// Authored meaning for one orientation of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    pub core: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub love: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_advice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    pub upright: Meaning,
    pub reversed: Meaning,
}

impl Card {
    pub fn meaning(&self, orientation: Orientation) -> &Meaning {
        match orientation {
            Orientation::Upright => &self.upright,
            Orientation::Reversed => &self.reversed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Upright,
    Reversed,
}

impl Orientation {
    pub fn label(self) -> &'static str {
        match self {
            Orientation::Upright => "正位",
            Orientation::Reversed => "逆位",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Slot in the past / present / future spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Past,
    Present,
    Future,
}

impl Position {
    pub const SPREAD: [Position; 3] = [Position::Past, Position::Present, Position::Future];

    pub fn label(self) -> &'static str {
        match self {
            Position::Past => "過去",
            Position::Present => "現在",
            Position::Future => "未來",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One card placed in the spread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawnCard {
    pub position: Position,
    pub card: Card,
    pub orientation: Orientation,
}

impl DrawnCard {
    pub fn meaning(&self) -> &Meaning {
        self.card.meaning(self.orientation)
    }
}

impl fmt::Display for DrawnCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.position, self.card.name, self.orientation)
    }
}
