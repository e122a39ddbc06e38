use rand::seq::SliceRandom;
use rand::Rng;

use super::{Deck, DrawnCard, Orientation, Position, SPREAD_SIZE};
use crate::{Error, ErrorContext, Result};

impl Deck {
    /// Draw `n` distinct cards without replacement.
    ///
    /// Positions follow [`Position::SPREAD`] order and each orientation is a fair coin flip.
    pub fn draw<R>(&self, n: usize, rng: &mut R) -> Result<Vec<DrawnCard>>
    where
        R: Rng + ?Sized,
    {
        let max = SPREAD_SIZE.min(self.len());
        if n == 0 || n > max {
            return Err(Error::invalid_input_with_context(
                format!("can draw between 1 and {} cards, requested {}", max, n),
                ErrorContext::new()
                    .with_field_path("n")
                    .with_source("deck_draw"),
            ));
        }

        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);

        let drawn = indices
            .into_iter()
            .take(n)
            .zip(Position::SPREAD)
            .map(|(idx, position)| {
                let orientation = if rng.gen_bool(0.5) {
                    Orientation::Upright
                } else {
                    Orientation::Reversed
                };
                DrawnCard {
                    position,
                    card: self.cards[idx].clone(),
                    orientation,
                }
            })
            .collect();
        Ok(drawn)
    }

    /// Draw the full past / present / future spread.
    pub fn draw_spread<R>(&self, rng: &mut R) -> Result<Vec<DrawnCard>>
    where
        R: Rng + ?Sized,
    {
        self.draw(SPREAD_SIZE, rng)
    }
}
