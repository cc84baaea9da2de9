//! Phase-specific typestate structs for one round of questions.
//!
//! Each phase is its own type. A `RoundRevealed` always has a guess; a
//! `RoundAsking` always has a card left to show. Transitions consume the
//! old phase, so answering past the last card does not compile.

use super::cards::{Card, cards_for};
use super::invariants::{RevealInvariants, RoundInvariants, assert_invariants};
use super::mode::GameMode;
use super::state::{Answer, GuessState};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

// ─────────────────────────────────────────────────────────────
//  Guess
// ─────────────────────────────────────────────────────────────

/// What the answers add up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Guess {
    /// A number in the mode's range.
    #[display("{}", _0)]
    Number(u32),
    /// Every answer was "no": the total is 0, which nobody may pick.
    #[display("Wait...")]
    NoValidGuess,
    /// The answers add up past the top of the range, so at least one was wrong.
    #[display("{} (out of range)", _0)]
    OutOfRange(u32),
}

impl Guess {
    /// Classifies a final accumulator for `mode`.
    pub fn from_total(total: u32, mode: &GameMode) -> Self {
        if total == 0 {
            Guess::NoValidGuess
        } else if mode.contains(total) {
            Guess::Number(total)
        } else {
            Guess::OutOfRange(total)
        }
    }

    /// The guessed number, if it lies in range.
    pub fn number(&self) -> Option<u32> {
        match self {
            Guess::Number(n) => Some(*n),
            Guess::NoValidGuess | Guess::OutOfRange(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  NotStarted
// ─────────────────────────────────────────────────────────────

/// A round that has a mode and cards but has not asked anything yet.
#[derive(Debug, Clone)]
pub struct RoundSetup {
    pub(crate) mode: GameMode,
    pub(crate) cards: Arc<[Card]>,
}

impl RoundSetup {
    /// Prepares a round for `mode`, fetching its cards from the shared cache.
    #[instrument(skip(mode), fields(label = %mode.label()))]
    pub fn new(mode: GameMode) -> Self {
        let cards = cards_for(&mode);
        Self { mode, cards }
    }

    /// The selected mode.
    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    /// The cards that will be shown, in question order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Switches to another mode before play begins.
    ///
    /// Cards are only refetched when the range differs.
    #[instrument(skip(self, mode), fields(from = %self.mode.label(), to = %mode.label()))]
    pub fn select_mode(self, mode: GameMode) -> Self {
        if self.mode.same_range(&mode) {
            Self {
                mode,
                cards: self.cards,
            }
        } else {
            Self::new(mode)
        }
    }

    /// Starts asking (consumes setup, returns the first question).
    #[instrument(skip(self), fields(label = %self.mode.label()))]
    pub fn start(self) -> RoundAsking {
        info!(
            max_num = *self.mode.max_num(),
            max_bits = *self.mode.max_bits(),
            "Round started"
        );
        RoundAsking {
            mode: self.mode,
            cards: self.cards,
            state: GuessState::new(),
            answers: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Asking
// ─────────────────────────────────────────────────────────────

/// A round waiting for the answer to its current card.
#[derive(Debug, Clone)]
pub struct RoundAsking {
    pub(crate) mode: GameMode,
    pub(crate) cards: Arc<[Card]>,
    pub(crate) state: GuessState,
    pub(crate) answers: Vec<Answer>,
}

impl RoundAsking {
    /// Records an answer, consuming self.
    ///
    /// Returns the next question, or the finished round once every card
    /// has been answered. The guess is computed here but stays hidden
    /// until [`RoundAwaitingReveal::reveal`].
    #[instrument(skip(self), fields(step = self.state.step()))]
    pub fn answer(self, answer: Answer) -> RoundProgress {
        let mut round = self;
        round.state = round.state.record(answer.is_yes());
        round.answers.push(answer);

        if round.state.is_complete(*round.mode.max_bits()) {
            debug!(total = round.state.accumulator(), "All questions answered");
            let done = RoundAwaitingReveal {
                mode: round.mode,
                cards: round.cards,
                total: round.state.accumulator(),
                answers: round.answers,
            };
            assert_invariants::<_, RevealInvariants>(&done);
            return RoundProgress::AwaitingReveal(done);
        }

        assert_invariants::<_, RoundInvariants>(&round);
        RoundProgress::Asking(round)
    }

    /// Zero-based index of the current question.
    pub fn step(&self) -> u32 {
        self.state.step()
    }

    /// The card the player is looking at.
    pub fn current_card(&self) -> &Card {
        // step < max_bits == cards.len() while asking
        &self.cards[self.state.step() as usize]
    }

    /// Accumulated progress.
    pub fn state(&self) -> &GuessState {
        &self.state
    }

    /// The mode being played.
    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    /// All cards of the round, in question order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Answers given so far, in question order.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Replays an answer log from a fresh start.
    ///
    /// Answers beyond the last card are ignored.
    #[instrument(skip(mode, answers), fields(label = %mode.label(), count = answers.len()))]
    pub fn replay(mode: GameMode, answers: &[Answer]) -> RoundProgress {
        let mut round = RoundSetup::new(mode).start();
        for answer in answers {
            match round.answer(*answer) {
                RoundProgress::Asking(r) => round = r,
                done @ RoundProgress::AwaitingReveal(_) => return done,
            }
        }
        RoundProgress::Asking(round)
    }
}

// ─────────────────────────────────────────────────────────────
//  AwaitingReveal
// ─────────────────────────────────────────────────────────────

/// Every card answered; the guess is known but not yet shown.
#[derive(Debug, Clone)]
pub struct RoundAwaitingReveal {
    pub(crate) mode: GameMode,
    pub(crate) cards: Arc<[Card]>,
    pub(crate) total: u32,
    pub(crate) answers: Vec<Answer>,
}

impl RoundAwaitingReveal {
    /// Reveals the guess (consumes self).
    #[instrument(skip(self), fields(label = %self.mode.label()))]
    pub fn reveal(self) -> RoundRevealed {
        let guess = Guess::from_total(self.total, &self.mode);
        info!(total = self.total, %guess, "Guess revealed");
        RoundRevealed {
            mode: self.mode,
            cards: self.cards,
            total: self.total,
            guess,
            answers: self.answers,
        }
    }

    /// The mode that was played.
    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    /// The answers that were given.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }
}

// ─────────────────────────────────────────────────────────────
//  Revealed
// ─────────────────────────────────────────────────────────────

/// A finished round with its guess on display.
#[derive(Debug, Clone)]
pub struct RoundRevealed {
    pub(crate) mode: GameMode,
    pub(crate) cards: Arc<[Card]>,
    total: u32,
    guess: Guess,
    answers: Vec<Answer>,
}

impl RoundRevealed {
    /// The guess. Always present in this phase.
    pub fn guess(&self) -> Guess {
        self.guess
    }

    /// Raw accumulator value, including 0 and out-of-range totals.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// The mode that was played.
    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    /// The answers that were given.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Plays again with `mode`, reusing the cards when the range is unchanged.
    #[instrument(skip(self, mode), fields(label = %mode.label()))]
    pub fn restart(self, mode: GameMode) -> RoundAsking {
        let setup = RoundSetup {
            mode: self.mode,
            cards: self.cards,
        };
        setup.select_mode(mode).start()
    }
}

// ─────────────────────────────────────────────────────────────
//  Result Type
// ─────────────────────────────────────────────────────────────

/// Result of answering a question.
#[derive(Debug, Clone)]
pub enum RoundProgress {
    /// More questions remain.
    Asking(RoundAsking),
    /// All questions answered.
    AwaitingReveal(RoundAwaitingReveal),
}
