//! Bit-partition guessing: read a number from yes/no answers.
//!
//! The player thinks of a number in `[1, max_num]`. Card `i` lists every
//! number in range with bit `i` set, so each answer reveals one bit and
//! `max_bits` answers spell the number out.
//!
//! ```
//! use strictly_bitguess::{Answer, Guess, Preset, RoundAsking, RoundProgress};
//!
//! let answers = Answer::sequence_for(37, 6);
//! let RoundProgress::AwaitingReveal(done) = RoundAsking::replay(Preset::Fifty.mode(), &answers) else {
//!     unreachable!("six answers finish a 1 to 50 round");
//! };
//! assert_eq!(done.reveal().guess(), Guess::Number(37));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cards;
mod invariants;
mod mode;
mod round;
mod state;
mod wrapper;

pub use cards::{Card, cards_for, generate_cards, membership};
pub use invariants::{
    AccumulatorMatchesAnswers, AnswerLogMatchesStep, EveryCardAnswered, Invariant, InvariantSet,
    InvariantViolation, RevealInvariants, RoundInvariants, StepInRange, TotalMatchesAnswers,
};
pub use mode::{GameMode, MAX_PLAYABLE_NUM, MAX_SUPPORTED_BITS, ModeError, Preset, bits_for};
pub use round::{
    Guess, RoundAsking, RoundAwaitingReveal, RoundProgress, RoundRevealed, RoundSetup,
};
pub use state::{Answer, GuessState, record_answer};
pub use wrapper::{AnyRound, RoundError, RoundPhase};
