//! Answer accumulation.
//!
//! A round's progress is just two integers: how many questions have been
//! answered and the partial sum of the weights answered "yes".

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// A player's reply to one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Answer {
    /// The secret number is on the card.
    #[display("yes")]
    Yes,
    /// The secret number is not on the card.
    #[display("no")]
    No,
}

impl Answer {
    /// The truthful answer for `secret` on the card asking about `bit`.
    pub fn for_secret(secret: u32, bit: u32) -> Self {
        match secret.checked_shr(bit) {
            Some(shifted) if shifted & 1 == 1 => Answer::Yes,
            _ => Answer::No,
        }
    }

    /// All truthful answers for `secret`, one per bit, in question order.
    pub fn sequence_for(secret: u32, max_bits: u32) -> Vec<Self> {
        (0..max_bits).map(|bit| Self::for_secret(secret, bit)).collect()
    }

    /// Returns true for [`Answer::Yes`].
    pub fn is_yes(self) -> bool {
        matches!(self, Answer::Yes)
    }

    /// Parses a single-character answer: `y`/`n` (case-insensitive) or `1`/`0`.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'y' | '1' => Some(Answer::Yes),
            'n' | '0' => Some(Answer::No),
            _ => None,
        }
    }
}

impl From<bool> for Answer {
    fn from(is_yes: bool) -> Self {
        if is_yes { Answer::Yes } else { Answer::No }
    }
}

impl From<Answer> for bool {
    fn from(answer: Answer) -> Self {
        answer.is_yes()
    }
}

/// Progress through one round of questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuessState {
    step: u32,
    accumulator: u32,
}

impl GuessState {
    /// State at the start of a round: no questions answered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of questions answered so far (also the next card's bit index).
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Sum of the weights of every card answered "yes" so far.
    pub fn accumulator(&self) -> u32 {
        self.accumulator
    }

    /// Returns true once `max_bits` answers have been recorded.
    pub fn is_complete(&self, max_bits: u32) -> bool {
        self.step >= max_bits
    }

    /// Records the answer to the card for bit `step`.
    ///
    /// Pure: returns the next state. Recording a 33rd answer is a bug in the
    /// driving code; rounds stop asking once `max_bits` answers are in.
    #[instrument(level = "trace")]
    pub fn record(self, is_yes: bool) -> Self {
        debug_assert!(
            self.step < u32::BITS,
            "answer recorded past the last possible question"
        );
        let weight = 1u32.checked_shl(self.step).unwrap_or(0);
        let accumulator = if is_yes {
            self.accumulator + weight
        } else {
            self.accumulator
        };
        let next = Self {
            step: self.step + 1,
            accumulator,
        };
        trace!(step = next.step, accumulator = next.accumulator, "Answer recorded");
        next
    }
}

/// Records one answer; see [`GuessState::record`].
pub fn record_answer(state: GuessState, is_yes: bool) -> GuessState {
    state.record(is_yes)
}
