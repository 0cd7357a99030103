//! Dice for match resolution.
//!
//! Every random decision in a match (single die, d66, deck shuffles) goes
//! through one [`DiceSource`] owned by the engine, so a whole match can be
//! replayed from a seed or driven roll-by-roll from a script.
//!
//! ## Implementations
//!
//! - [`GameRng`]: seeded ChaCha8 stream that can be checkpointed mid-match
//! - [`ScriptedDice`]: fixed sequence of die faces, for tests and replays
//!
//! ```
//! use fttm_engine::core::{DiceSource, ScriptedDice};
//!
//! // A d66 is two dice read as tens and ones.
//! let mut dice = ScriptedDice::new([3, 5, 6]);
//! assert_eq!(dice.roll_d66(), 35);
//! assert_eq!(dice.roll_d6(), 6);
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of every die roll and shuffle decision in a match.
pub trait DiceSource {
    /// Roll one six-sided die (1..=6).
    fn roll_d6(&mut self) -> u8;

    /// Pick an index in `0..upper` for shuffling. `upper` is never zero.
    fn pick_index(&mut self, upper: usize) -> usize;

    /// Roll two dice read as tens and ones (11..=66).
    fn roll_d66(&mut self) -> u8 {
        let tens = self.roll_d6();
        let ones = self.roll_d6();
        tens * 10 + ones
    }

    /// Position in the stream, if this source can be resumed from one.
    ///
    /// Scripted and host-supplied dice return `None`.
    fn checkpoint(&self) -> Option<GameRngState> {
        None
    }
}

/// Fisher-Yates shuffle driven by a dice source.
pub fn shuffle<T>(dice: &mut dyn DiceSource, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = dice.pick_index(i + 1);
        items.swap(i, j);
    }
}

/// Seeded dice backed by ChaCha8.
///
/// Same seed, same match. Use [`GameRng::state`] to checkpoint mid-match.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for checkpointing.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl DiceSource for GameRng {
    fn roll_d6(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }

    fn pick_index(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..upper)
    }

    fn checkpoint(&self) -> Option<GameRngState> {
        Some(self.state())
    }
}

/// Serializable RNG state.
///
/// Uses the ChaCha8 word position, so capture is O(1) regardless of how many
/// dice have been rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Dice that replay a fixed list of faces.
///
/// Shuffles never consume the script: `pick_index` always keeps the current
/// element in place, so a scripted deck is drawn in the order it was built.
/// Once the script runs out every roll returns the fallback face.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
    fallback: u8,
    rolled: usize,
}

impl ScriptedDice {
    /// Script the given faces. Faces outside 1..=6 are clamped into range.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().map(|f| f.clamp(1, 6)).collect(),
            fallback: 3,
            rolled: 0,
        }
    }

    /// Face returned after the script is exhausted (default 3).
    #[must_use]
    pub fn with_fallback(mut self, face: u8) -> Self {
        self.fallback = face.clamp(1, 6);
        self
    }

    /// Append faces to the end of the script.
    pub fn push(&mut self, faces: impl IntoIterator<Item = u8>) {
        self.faces.extend(faces.into_iter().map(|f| f.clamp(1, 6)));
    }

    /// Append a d66 result as its two faces. `value` must be a valid d66.
    pub fn push_d66(&mut self, value: u8) {
        self.push([value / 10, value % 10]);
    }

    /// Faces still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    /// Number of dice rolled so far.
    #[must_use]
    pub fn rolled(&self) -> usize {
        self.rolled
    }
}

impl DiceSource for ScriptedDice {
    fn roll_d6(&mut self) -> u8 {
        self.rolled += 1;
        self.faces.pop_front().unwrap_or(self.fallback)
    }

    fn pick_index(&mut self, upper: usize) -> usize {
        upper - 1
    }
}
