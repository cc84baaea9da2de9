//! A single slot that can hold a round in any phase.
//!
//! Typestate phases are separate types; a UI that keeps "the current
//! round" in one field stores this enum instead and drives it with
//! the phase-checked transitions below.

use super::mode::GameMode;
use super::round::{
    Guess, RoundAsking, RoundAwaitingReveal, RoundProgress, RoundRevealed, RoundSetup,
};
use super::state::Answer;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Name of a round's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Mode chosen, nothing asked.
    #[display("not started")]
    NotStarted,
    /// Showing the card for `step`.
    #[display("asking question {}", step + 1)]
    Asking {
        /// Zero-based question index.
        step: u32,
    },
    /// Every card answered, guess hidden.
    #[display("awaiting reveal")]
    AwaitingReveal,
    /// Guess on display.
    #[display("revealed")]
    Revealed,
}

/// A transition requested in a phase that does not support it.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RoundError {
    /// The transition needs a different phase.
    #[display("Cannot {} while {}", action, phase)]
    WrongPhase {
        /// What the caller tried to do.
        action: &'static str,
        /// The phase the round was in.
        phase: RoundPhase,
    },
}

impl std::error::Error for RoundError {}

/// A round in any phase.
#[derive(Debug, Clone)]
pub enum AnyRound {
    /// See [`RoundSetup`].
    NotStarted(RoundSetup),
    /// See [`RoundAsking`].
    Asking(RoundAsking),
    /// See [`RoundAwaitingReveal`].
    AwaitingReveal(RoundAwaitingReveal),
    /// See [`RoundRevealed`].
    Revealed(RoundRevealed),
}

impl From<RoundSetup> for AnyRound {
    fn from(round: RoundSetup) -> Self {
        AnyRound::NotStarted(round)
    }
}

impl From<RoundAsking> for AnyRound {
    fn from(round: RoundAsking) -> Self {
        AnyRound::Asking(round)
    }
}

impl From<RoundAwaitingReveal> for AnyRound {
    fn from(round: RoundAwaitingReveal) -> Self {
        AnyRound::AwaitingReveal(round)
    }
}

impl From<RoundRevealed> for AnyRound {
    fn from(round: RoundRevealed) -> Self {
        AnyRound::Revealed(round)
    }
}

impl From<RoundProgress> for AnyRound {
    fn from(progress: RoundProgress) -> Self {
        match progress {
            RoundProgress::Asking(r) => r.into(),
            RoundProgress::AwaitingReveal(r) => r.into(),
        }
    }
}

impl AnyRound {
    /// A not-yet-started round for `mode`.
    pub fn new(mode: GameMode) -> Self {
        RoundSetup::new(mode).into()
    }

    /// The current phase.
    pub fn phase(&self) -> RoundPhase {
        match self {
            AnyRound::NotStarted(_) => RoundPhase::NotStarted,
            AnyRound::Asking(r) => RoundPhase::Asking { step: r.step() },
            AnyRound::AwaitingReveal(_) => RoundPhase::AwaitingReveal,
            AnyRound::Revealed(_) => RoundPhase::Revealed,
        }
    }

    /// The mode of the round in any phase.
    pub fn mode(&self) -> &GameMode {
        match self {
            AnyRound::NotStarted(r) => r.mode(),
            AnyRound::Asking(r) => r.mode(),
            AnyRound::AwaitingReveal(r) => r.mode(),
            AnyRound::Revealed(r) => r.mode(),
        }
    }

    /// The guess, once revealed.
    pub fn guess(&self) -> Option<Guess> {
        match self {
            AnyRound::Revealed(r) => Some(r.guess()),
            _ => None,
        }
    }

    /// Returns true between the first question and the reveal.
    ///
    /// The mode must not change while a round is active.
    pub fn is_active(&self) -> bool {
        matches!(self, AnyRound::Asking(_) | AnyRound::AwaitingReveal(_))
    }

    /// Moves the round out, leaving a not-started round of the same mode.
    ///
    /// The replacement shares the deck, so nothing is regenerated.
    pub fn take(&mut self) -> Self {
        let (mode, cards) = match self {
            AnyRound::NotStarted(r) => (&r.mode, &r.cards),
            AnyRound::Asking(r) => (&r.mode, &r.cards),
            AnyRound::AwaitingReveal(r) => (&r.mode, &r.cards),
            AnyRound::Revealed(r) => (&r.mode, &r.cards),
        };
        let placeholder = RoundSetup {
            mode: mode.clone(),
            cards: Arc::clone(cards),
        };
        std::mem::replace(self, placeholder.into())
    }

    fn wrong_phase(self, action: &'static str) -> RoundError {
        let phase = self.phase();
        warn!(action, %phase, "Rejected round transition");
        RoundError::WrongPhase { action, phase }
    }

    /// Selects a new mode before the round starts.
    ///
    /// A revealed round picks its next mode through [`AnyRound::restart`].
    #[instrument(skip(self, mode), fields(phase = %self.phase(), label = %mode.label()))]
    pub fn select_mode(self, mode: GameMode) -> Result<Self, RoundError> {
        match self {
            AnyRound::NotStarted(r) => Ok(r.select_mode(mode).into()),
            other => Err(other.wrong_phase("change mode")),
        }
    }

    /// `NotStarted → Asking(0)`.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn start(self) -> Result<Self, RoundError> {
        match self {
            AnyRound::NotStarted(r) => Ok(r.start().into()),
            other => Err(other.wrong_phase("start")),
        }
    }

    /// `Asking(k) → Asking(k+1)` or `AwaitingReveal`.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn answer(self, answer: Answer) -> Result<Self, RoundError> {
        match self {
            AnyRound::Asking(r) => Ok(r.answer(answer).into()),
            other => Err(other.wrong_phase("answer")),
        }
    }

    /// `AwaitingReveal → Revealed`.
    #[instrument(skip(self), fields(phase = %self.phase()))]
    pub fn reveal(self) -> Result<Self, RoundError> {
        match self {
            AnyRound::AwaitingReveal(r) => Ok(r.reveal().into()),
            other => Err(other.wrong_phase("reveal")),
        }
    }

    /// `Revealed → Asking(0)` with `mode`.
    #[instrument(skip(self, mode), fields(phase = %self.phase(), label = %mode.label()))]
    pub fn restart(self, mode: GameMode) -> Result<Self, RoundError> {
        match self {
            AnyRound::Revealed(r) => Ok(r.restart(mode).into()),
            other => Err(other.wrong_phase("restart")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Preset;

    #[test]
    fn test_full_cycle_through_wrapper() {
        let mut round = AnyRound::new(Preset::Fifty.mode()).start().unwrap();
        for answer in Answer::sequence_for(37, 6) {
            round = round.answer(answer).unwrap();
        }
        assert_eq!(round.phase(), RoundPhase::AwaitingReveal);
        assert_eq!(round.guess(), None);

        let round = round.reveal().unwrap();
        assert_eq!(round.guess(), Some(Guess::Number(37)));

        let round = round.restart(Preset::Fifty.mode()).unwrap();
        assert_eq!(round.phase(), RoundPhase::Asking { step: 0 });
    }

    #[test]
    fn test_wrong_phase_is_rejected() {
        let round = AnyRound::new(Preset::Fifty.mode());
        assert_eq!(
            round.clone().answer(Answer::Yes).unwrap_err(),
            RoundError::WrongPhase {
                action: "answer",
                phase: RoundPhase::NotStarted
            }
        );
        assert!(round.clone().reveal().is_err());

        let asking = round.start().unwrap();
        assert!(asking.clone().start().is_err());
        assert!(asking.is_active());
        assert!(asking.select_mode(Preset::Hundred.mode()).is_err());
    }

    #[test]
    fn test_restart_after_reveal_takes_new_mode() {
        let mut round = AnyRound::new(Preset::Fifty.mode()).start().unwrap();
        for _ in 0..6 {
            round = round.answer(Answer::No).unwrap();
        }
        let round = round.reveal().unwrap();
        assert!(!round.is_active());
        assert_eq!(round.guess(), Some(Guess::NoValidGuess));

        let round = round.restart(Preset::Hundred.mode()).unwrap();
        assert_eq!(round.phase(), RoundPhase::Asking { step: 0 });
        assert_eq!(*round.mode().max_bits(), 7);
    }

    #[test]
    fn test_select_mode_before_start() {
        let round = AnyRound::new(Preset::Fifty.mode())
            .select_mode(Preset::FiveEleven.mode())
            .unwrap();
        assert_eq!(round.phase(), RoundPhase::NotStarted);
        assert_eq!(round.mode().label(), "1 to 511");
    }

    #[test]
    fn test_take_leaves_fresh_round_of_same_mode() {
        let mut slot = AnyRound::new(Preset::Hundred.mode()).start().unwrap();
        slot = slot.answer(Answer::Yes).unwrap();

        let taken = slot.take();
        assert_eq!(taken.phase(), RoundPhase::Asking { step: 1 });
        assert_eq!(slot.phase(), RoundPhase::NotStarted);
        assert_eq!(slot.mode(), &Preset::Hundred.mode());

        let (AnyRound::Asking(before), AnyRound::NotStarted(after)) = (&taken, &slot) else {
            panic!("Unexpected phases after take");
        };
        assert!(Arc::ptr_eq(&before.cards, &after.cards));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(RoundPhase::Asking { step: 0 }.to_string(), "asking question 1");
        let err = RoundError::WrongPhase {
            action: "reveal",
            phase: RoundPhase::NotStarted,
        };
        assert_eq!(err.to_string(), "Cannot reveal while not started");
    }
}
