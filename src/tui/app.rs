//! Application state and logic.

use super::input::Action;
use crate::telemetry::{EventSink, TrackedEvent};
use std::sync::Arc;
use std::time::{Duration, Instant};
use strictly_bitguess::{Answer, AnyRound, GameMode, RoundPhase};
use tracing::{debug, info, instrument};

/// Colour cue shown briefly after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    /// Answered "yes".
    Yes,
    /// Answered "no".
    No,
}

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep going.
    Continue,
    /// Leave the game.
    Quit,
}

/// Main application state.
pub struct App {
    modes: Vec<GameMode>,
    selected: usize,
    round: AnyRound,
    flash: Option<(Flash, Instant)>,
    flash_duration: Duration,
    scroll: usize,
    sink: Arc<dyn EventSink>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("selected", &self.selected)
            .field("phase", &self.round.phase())
            .field("flash", &self.flash)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Creates the app on the start screen with `modes[selected]` chosen.
    ///
    /// `modes` must not be empty; an out-of-range `selected` falls back to 0.
    #[instrument(skip(modes, sink), fields(mode_count = modes.len()))]
    pub fn new(
        modes: Vec<GameMode>,
        selected: usize,
        flash_duration: Duration,
        sink: Arc<dyn EventSink>,
    ) -> anyhow::Result<Self> {
        let Some(first) = modes.get(selected).or_else(|| modes.first()).cloned() else {
            anyhow::bail!("No game modes to play");
        };
        let selected = if selected < modes.len() { selected } else { 0 };
        sink.emit(TrackedEvent::VisitorLanded);
        Ok(Self {
            modes,
            selected,
            round: AnyRound::new(first),
            flash: None,
            flash_duration,
            scroll: 0,
            sink,
        })
    }

    /// The round being played.
    pub fn round(&self) -> &AnyRound {
        &self.round
    }

    /// The ranges on offer.
    pub fn modes(&self) -> &[GameMode] {
        &self.modes
    }

    /// Index of the range that the next round will use.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The range that the next round will use.
    pub fn selected_mode(&self) -> &GameMode {
        &self.modes[self.selected]
    }

    /// Rows the current card is scrolled down by. The grid clamps it to what
    /// the terminal can show.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// The flash colour to show at `now`, if one is still running.
    pub fn flash_at(&self, now: Instant) -> Option<Flash> {
        self.flash
            .filter(|(_, since)| now.duration_since(*since) < self.flash_duration)
            .map(|(flash, _)| flash)
    }

    /// Applies one player action.
    #[instrument(skip(self), fields(phase = %self.round.phase()))]
    pub fn handle(&mut self, action: Action) -> Control {
        match action {
            Action::Quit => {
                info!("Player quit");
                return Control::Quit;
            }
            Action::PrevMode => {
                let prev = (self.selected + self.modes.len() - 1) % self.modes.len();
                self.select(prev);
            }
            Action::NextMode => self.select((self.selected + 1) % self.modes.len()),
            Action::SelectMode(index) => self.select(index),
            Action::Yes => self.answer(Answer::Yes),
            Action::No => self.answer(Answer::No),
            Action::Confirm => self.confirm(),
            Action::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            Action::ScrollDown => {
                if let AnyRound::Asking(round) = &self.round {
                    self.scroll = (self.scroll + 1).min(round.current_card().len());
                }
            }
        }
        Control::Continue
    }

    fn select(&mut self, index: usize) {
        if self.round.is_active() || index >= self.modes.len() {
            debug!(index, "Mode change ignored");
            return;
        }
        self.selected = index;
        if let AnyRound::NotStarted(_) = self.round {
            let mode = self.modes[index].clone();
            self.round = match self.round.take() {
                AnyRound::NotStarted(round) => round.select_mode(mode).into(),
                other => other,
            };
        }
        debug!(label = %self.selected_mode().label(), "Mode selected");
    }

    fn answer(&mut self, answer: Answer) {
        if !matches!(self.round, AnyRound::Asking(_)) {
            return;
        }
        self.flash = Some((
            if answer.is_yes() { Flash::Yes } else { Flash::No },
            Instant::now(),
        ));
        self.scroll = 0;
        self.round = match self.round.take() {
            AnyRound::Asking(round) => round.answer(answer).into(),
            other => other,
        };
        debug!(to = %self.round.phase(), "Answer recorded");
    }

    fn confirm(&mut self) {
        let from = self.round.phase();
        self.round = match self.round.take() {
            AnyRound::NotStarted(round) => round.start().into(),
            AnyRound::AwaitingReveal(round) => {
                let revealed = round.reveal();
                self.sink.emit(TrackedEvent::GuessRevealed {
                    number: revealed.total(),
                });
                revealed.into()
            }
            AnyRound::Revealed(round) => round.restart(self.selected_mode().clone()).into(),
            asking @ AnyRound::Asking(_) => asking,
        };
        if matches!(from, RoundPhase::NotStarted | RoundPhase::Revealed) {
            self.report_start();
        }
        debug!(%from, to = %self.round.phase(), "Round transition");
        self.scroll = 0;
        self.flash = None;
    }

    fn report_start(&self) {
        self.sink.emit(TrackedEvent::RoundStarted {
            label: self.round.mode().label().clone(),
        });
    }
}
