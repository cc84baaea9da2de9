//! Non-interactive subcommands.

use crate::tui::{GridLayout, grid_lines};
use derive_more::Display;
use strictly_bitguess::{Answer, GameMode, RoundAsking, RoundProgress, RoundRevealed, cards_for};
use tracing::{debug, instrument};

/// Text width of a printed card.
const CARD_WIDTH: usize = 50;

/// Problem with an answer string passed to `decode`.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DecodeError {
    /// A character other than y, n, 1 or 0.
    #[display("Answer {} is '{}'; use y/n or 1/0", position, found)]
    InvalidAnswer {
        /// 1-based position in the string.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// Not one answer per card.
    #[display("Expected {} answers, got {}", expected, got)]
    WrongCount {
        /// Cards in the mode.
        expected: u32,
        /// Answers supplied.
        got: usize,
    },
}

impl std::error::Error for DecodeError {}

/// Parses `y`/`n` answers, ignoring whitespace, commas and dashes.
#[instrument]
pub fn parse_answers(input: &str) -> Result<Vec<Answer>, DecodeError> {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '-')
        .enumerate()
        .map(|(i, c)| {
            Answer::from_char(c).ok_or(DecodeError::InvalidAnswer {
                position: i + 1,
                found: c,
            })
        })
        .collect()
}

/// Replays a complete answer string and reveals the guess.
#[instrument(skip(mode), fields(label = %mode.label()))]
pub fn decode(mode: GameMode, input: &str) -> Result<RoundRevealed, DecodeError> {
    let answers = parse_answers(input)?;
    let expected = *mode.max_bits();
    if answers.len() != expected as usize {
        return Err(DecodeError::WrongCount {
            expected,
            got: answers.len(),
        });
    }
    match RoundAsking::replay(mode, &answers) {
        RoundProgress::AwaitingReveal(done) => Ok(done.reveal()),
        RoundProgress::Asking(round) => Err(DecodeError::WrongCount {
            expected,
            got: round.answers().len(),
        }),
    }
}

/// Formats every card of `mode` as text, one block per card.
#[instrument(skip(mode), fields(label = %mode.label()))]
pub fn render_cards(mode: &GameMode) -> String {
    let cards = cards_for(mode);
    debug!(card_count = cards.len(), "Rendering cards");
    let mut out = format!("{}\n", mode);
    for (i, card) in cards.iter().enumerate() {
        out.push_str(&format!(
            "\nCard {} (worth {}, {} numbers)\n",
            i + 1,
            card.weight(),
            card.len()
        ));
        let layout = GridLayout::fit(card.len(), *mode.max_num(), CARD_WIDTH, usize::MAX);
        for row in grid_lines(card, layout) {
            out.push_str(&row);
            out.push('\n');
        }
    }
    out
}
