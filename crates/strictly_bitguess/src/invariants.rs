//! Invariants of a round in progress.
//!
//! Checked after every answer in debug builds, and testable on their own.
//! The last answer is checked against the finished round instead.

use super::round::{RoundAsking, RoundAwaitingReveal};
use super::state::Answer;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{}", description)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: the round still has a question to ask.
pub struct StepInRange;

impl Invariant<RoundAsking> for StepInRange {
    fn holds(round: &RoundAsking) -> bool {
        round.state().step() < *round.mode().max_bits()
    }

    fn description() -> &'static str {
        "Asking step is below the mode's question count"
    }
}

/// Invariant: the answer log and the state agree on how far the round got.
pub struct AnswerLogMatchesStep;

impl Invariant<RoundAsking> for AnswerLogMatchesStep {
    fn holds(round: &RoundAsking) -> bool {
        round.answers().len() == round.state().step() as usize
    }

    fn description() -> &'static str {
        "One logged answer per completed step"
    }
}

/// Invariant: the accumulator is the sum of the weights answered "yes".
///
/// Implies `accumulator < 2^step`.
pub struct AccumulatorMatchesAnswers;

fn yes_weights(answers: &[Answer]) -> u64 {
    answers
        .iter()
        .enumerate()
        .filter(|(_, answer)| **answer == Answer::Yes)
        .map(|(bit, _)| 1u64 << bit)
        .sum()
}

impl Invariant<RoundAsking> for AccumulatorMatchesAnswers {
    fn holds(round: &RoundAsking) -> bool {
        yes_weights(round.answers()) == round.state().accumulator() as u64
    }

    fn description() -> &'static str {
        "Accumulator equals the weights of all yes answers"
    }
}

/// Every invariant of an asking round.
pub type RoundInvariants = (StepInRange, AnswerLogMatchesStep, AccumulatorMatchesAnswers);

/// Invariant: every card of the mode has been answered.
pub struct EveryCardAnswered;

impl Invariant<RoundAwaitingReveal> for EveryCardAnswered {
    fn holds(round: &RoundAwaitingReveal) -> bool {
        round.answers().len() == *round.mode().max_bits() as usize
    }

    fn description() -> &'static str {
        "One answer per card before the reveal"
    }
}

/// Invariant: the hidden total is the sum of the weights answered "yes".
pub struct TotalMatchesAnswers;

impl Invariant<RoundAwaitingReveal> for TotalMatchesAnswers {
    fn holds(round: &RoundAwaitingReveal) -> bool {
        yes_weights(round.answers()) == round.total as u64
    }

    fn description() -> &'static str {
        "Total equals the weights of all yes answers"
    }
}

/// Every invariant of a round awaiting its reveal.
pub type RevealInvariants = (EveryCardAnswered, TotalMatchesAnswers);

/// Panics in debug builds if `state` violates any invariant of `I`.
pub fn assert_invariants<S, I: InvariantSet<S>>(state: &S) {
    if cfg!(debug_assertions)
        && let Err(violations) = I::check_all(state)
    {
        tracing::error!(?violations, "Round invariants violated");
        panic!("Round invariants violated: {:?}", violations);
    }
}
