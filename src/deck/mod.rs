//! 牌组模块：载入塔罗牌资料并抽出圣三角牌阵。
//!
//! # Deck Module
//!
//! Loads the card dataset and draws spreads from it.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Deck`] | Validated list of cards |
//! | [`Card`] | Card name plus upright and reversed [`Meaning`] |
//! | [`DrawnCard`] | Card placed at a [`Position`] with an [`Orientation`] |

pub mod card;
mod draw;

pub use card::{Card, DrawnCard, Meaning, Orientation, Position};

use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Number of cards in the past / present / future spread.
pub const SPREAD_SIZE: usize = 3;

const BUNDLED_MAJOR_ARCANA: &str = include_str!("../../data/major_arcana.json");

#[derive(Debug, Deserialize)]
struct DeckFile {
    major_arcana: Option<Vec<Card>>,
}

/// A validated card dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The 22 major arcana shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_MAJOR_ARCANA)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read card dataset: {}", e),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("deck_loader"),
            )
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: DeckFile = serde_json::from_str(raw).map_err(|e| {
            Error::configuration_with_context(
                format!("card dataset is not valid JSON: {}", e),
                ErrorContext::new().with_source("deck_loader"),
            )
        })?;
        let cards = file.major_arcana.ok_or_else(|| {
            Error::configuration_with_context(
                "card dataset has no major_arcana array",
                ErrorContext::new()
                    .with_field_path("major_arcana")
                    .with_source("deck_loader"),
            )
        })?;
        Self::new(cards)
    }

    /// Validate and wrap a list of cards.
    pub fn new(cards: Vec<Card>) -> Result<Self> {
        if cards.len() < SPREAD_SIZE {
            return Err(Error::configuration_with_context(
                format!(
                    "card dataset needs at least {} cards, found {}",
                    SPREAD_SIZE,
                    cards.len()
                ),
                ErrorContext::new()
                    .with_field_path("major_arcana")
                    .with_source("deck_loader"),
            ));
        }

        let mut seen = HashSet::new();
        for (idx, card) in cards.iter().enumerate() {
            if !seen.insert(card.id) {
                return Err(Error::configuration_with_context(
                    format!("duplicate card id {}", card.id),
                    ErrorContext::new()
                        .with_field_path(format!("major_arcana[{}].id", idx))
                        .with_source("deck_loader"),
                ));
            }
            if card.name.trim().is_empty() {
                return Err(Error::configuration_with_context(
                    "card name is blank",
                    ErrorContext::new()
                        .with_field_path(format!("major_arcana[{}].name", idx))
                        .with_source("deck_loader"),
                ));
            }
            for (key, meaning) in [("upright", &card.upright), ("reversed", &card.reversed)] {
                if meaning.core.trim().is_empty() {
                    return Err(Error::configuration_with_context(
                        format!("meaning missing for {} ({})", card.name, key),
                        ErrorContext::new()
                            .with_field_path(format!("major_arcana[{}].{}.core", idx, key))
                            .with_source("deck_loader"),
                    ));
                }
            }
        }

        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }
}
