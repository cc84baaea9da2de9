//! Tests for the round typestate lifecycle.

use strictly_mindread::{Answer, AnyRound, Guess, Preset, RoundError, RoundPhase};

fn answer_all(mut round: AnyRound, answers: &[Answer]) -> AnyRound {
    for answer in answers {
        round = round.answer(*answer).expect("Round should accept answers");
    }
    round
}

#[test]
fn test_round_lifecycle() {
    let round = AnyRound::new(Preset::Hundred.mode());
    assert_eq!(round.phase(), RoundPhase::NotStarted);

    let round = round.start().expect("Start from NotStarted");
    assert_eq!(round.phase(), RoundPhase::Asking { step: 0 });

    let round = answer_all(round, &Answer::sequence_for(99, 7)[..6]);
    assert_eq!(round.phase(), RoundPhase::Asking { step: 6 });

    let round = round.answer(Answer::Yes).expect("Final answer");
    assert_eq!(round.phase(), RoundPhase::AwaitingReveal);
    assert_eq!(round.guess(), None);

    let round = round.reveal().expect("Reveal");
    assert_eq!(round.phase(), RoundPhase::Revealed);
    assert_eq!(round.guess(), Some(Guess::Number(99)));
}

#[test]
fn test_all_no_reports_no_valid_guess() {
    let round = AnyRound::new(Preset::Fifty.mode()).start().unwrap();
    let round = answer_all(round, &[Answer::No; 6]).reveal().unwrap();
    assert_eq!(round.guess(), Some(Guess::NoValidGuess));
    assert_eq!(Guess::NoValidGuess.to_string(), "Wait...");
}

#[test]
fn test_inconsistent_answers_out_of_range() {
    let round = AnyRound::new(Preset::Hundred.mode()).start().unwrap();
    let round = answer_all(round, &[Answer::Yes; 7]).reveal().unwrap();
    assert_eq!(round.guess(), Some(Guess::OutOfRange(127)));
}

#[test]
fn test_reveal_before_last_answer_rejected() {
    let round = AnyRound::new(Preset::Fifty.mode()).start().unwrap();
    let round = answer_all(round, &[Answer::Yes; 3]);
    let err = round.reveal().unwrap_err();
    assert_eq!(
        err,
        RoundError::WrongPhase {
            action: "reveal",
            phase: RoundPhase::Asking { step: 3 }
        }
    );
}

#[test]
fn test_restart_resets_progress() {
    let round = AnyRound::new(Preset::Fifty.mode()).start().unwrap();
    let round = answer_all(round, &Answer::sequence_for(12, 6)).reveal().unwrap();
    assert_eq!(round.guess(), Some(Guess::Number(12)));

    let round = round.restart(Preset::Fifty.mode()).unwrap();
    assert_eq!(round.phase(), RoundPhase::Asking { step: 0 });
    let round = answer_all(round, &Answer::sequence_for(44, 6)).reveal().unwrap();
    assert_eq!(round.guess(), Some(Guess::Number(44)));
}
