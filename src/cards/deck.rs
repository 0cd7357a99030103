//! Draw pile and discard pile.
//!
//! Cards are drawn from the top of the draw pile and go straight onto the
//! discard pile. An empty draw pile is refilled from the discard pile and
//! reshuffled before the draw; only when both piles are empty does a draw
//! fail.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::definition::Card;
use super::registry::CardRegistry;
use crate::core::rng::{shuffle, DiceSource};
use crate::error::{EngineError, EngineResult};

/// Result of a successful draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draw {
    pub card: Card,
    /// The discard pile was shuffled back in to make this draw.
    pub reshuffled: bool,
}

/// The Fast Action Card deck.
///
/// ## Example
///
/// ```
/// use fttm_engine::cards::{Card, CardCategory, CardId, Deck};
/// use fttm_engine::core::ScriptedDice;
///
/// let mut dice = ScriptedDice::new([]);
/// let mut deck = Deck::new((1..=3).map(|i| Card::new(CardId::new(i), CardCategory::Trailing)));
///
/// let draw = deck.draw(&mut dice).unwrap();
/// assert_eq!(draw.card.id, CardId::new(1));
/// assert_eq!((deck.len(), deck.discard_len()), (2, 1));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    draw_pile: VecDeque<Card>,
    discard: Vec<Card>,
}

impl Deck {
    /// Deck with `cards` on the draw pile, top first. Not shuffled.
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            draw_pile: cards.into_iter().collect(),
            discard: Vec::new(),
        }
    }

    /// Deck holding a copy of every registered card, in load order.
    #[must_use]
    pub fn from_registry(registry: &CardRegistry) -> Self {
        Self::new(registry.iter().cloned())
    }

    /// Shuffle the draw pile in place.
    pub fn shuffle(&mut self, dice: &mut dyn DiceSource) {
        shuffle(dice, self.draw_pile.make_contiguous());
        debug!(cards = self.draw_pile.len(), "Deck shuffled");
    }

    /// Draw the top card, reshuffling the discard pile in if needed.
    pub fn draw(&mut self, dice: &mut dyn DiceSource) -> EngineResult<Draw> {
        let mut reshuffled = false;
        if self.draw_pile.is_empty() {
            if self.discard.is_empty() {
                return Err(EngineError::DeckExhausted);
            }
            info!(cards = self.discard.len(), "Deck is empty. Reshuffling discard pile");
            self.draw_pile.extend(self.discard.drain(..));
            self.shuffle(dice);
            reshuffled = true;
        }

        let card = self.draw_pile.pop_front().ok_or(EngineError::DeckExhausted)?;
        self.discard.push(card.clone());
        debug!(card = %card.summary(), "Drew card");
        Ok(Draw { card, reshuffled })
    }

    /// Fold the discard pile back in and shuffle everything.
    pub fn reset(&mut self, dice: &mut dyn DiceSource) {
        self.draw_pile.extend(self.discard.drain(..));
        self.shuffle(dice);
        info!(cards = self.draw_pile.len(), "Card deck reset and reshuffled");
    }

    /// Cards left on the draw pile.
    #[must_use]
    pub fn len(&self) -> usize {
        self.draw_pile.len()
    }

    /// Check if the draw pile is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draw_pile.is_empty()
    }

    /// Cards on the discard pile.
    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard.len()
    }

    /// Draw pile plus discard pile.
    #[must_use]
    pub fn total(&self) -> usize {
        self.draw_pile.len() + self.discard.len()
    }

    /// Draw pile, top first.
    pub fn draw_pile(&self) -> impl Iterator<Item = &Card> {
        self.draw_pile.iter()
    }

    /// Discard pile, oldest first.
    #[must_use]
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    /// Put a card on the discard pile without drawing it.
    pub fn discard(&mut self, card: Card) {
        self.discard.push(card);
    }
}
