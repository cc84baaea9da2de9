//! UI rendering using ratatui.

use super::app::{App, Flash};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};
use std::time::Instant;
use strictly_bitguess::{AnyRound, Card, Guess, RoundAsking, RoundRevealed, RoundSetup};

/// Columns used when the whole card fits without widening.
const PREFERRED_COLUMNS: usize = 10;

/// Draws the screen for the current round phase.
pub fn draw(f: &mut Frame, app: &App) {
    let background = match app.flash_at(Instant::now()) {
        Some(Flash::Yes) => Color::Rgb(2, 44, 34),
        Some(Flash::No) => Color::Rgb(76, 5, 25),
        None => Color::Reset,
    };
    f.render_widget(
        Block::default().style(Style::default().bg(background)),
        f.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("✨ Strictly Mind Reader ✨")
        .style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let help = match app.round() {
        AnyRound::NotStarted(round) => {
            render_start(f, chunks[1], app, round);
            "←/→ or 1-9: choose range | Enter: start | Q: quit"
        }
        AnyRound::Asking(round) => {
            render_question(f, chunks[1], app, round);
            "Y: yes, it is | N: no, it isn't | ↑/↓: scroll | Q: quit"
        }
        AnyRound::AwaitingReveal(_) => {
            render_awaiting(f, chunks[1]);
            "Enter: reveal | Q: quit"
        }
        AnyRound::Revealed(round) => {
            render_revealed(f, chunks[1], app, round);
            "←/→ or 1-9: choose range | Enter: play again | Q: quit"
        }
    };

    let help = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn mode_tabs(app: &App) -> Tabs<'static> {
    let titles: Vec<Line<'static>> = app
        .modes()
        .iter()
        .map(|m| Line::from(m.label().clone()))
        .collect();
    Tabs::new(titles)
        .select(app.selected())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .block(Block::default().borders(Borders::ALL).title("Select Number Range"))
}

fn render_start(f: &mut Frame, area: Rect, app: &App, round: &RoundSetup) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let mode = round.mode();
    let text = vec![
        Line::from(Span::styled(
            "I can read your mind.",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Think of any whole number between 1 and {}.",
            mode.max_num()
        )),
        Line::from(format!(
            "Keep it a secret! I will ask you {} simple questions to find out exactly what number you are thinking of.",
            mode.max_bits()
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to start the game",
            Style::default().fg(Color::LightMagenta),
        )),
    ];
    let blurb = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(blurb, chunks[0]);
    f.render_widget(mode_tabs(app), chunks[1]);
}

fn render_question(f: &mut Frame, area: Rect, app: &App, round: &RoundAsking) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let max_bits = *round.mode().max_bits();
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("QUESTION {} OF {}  ", round.step() + 1, max_bits),
                Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                progress_line(round.step(), max_bits),
                Style::default().fg(Color::Magenta),
            ),
        ]),
        Line::from("Is your secret number in this table?"),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    // Top and bottom borders only; the grid gets the full width.
    let height = chunks[1].height.saturating_sub(2) as usize;
    let card = round.current_card();
    let layout = GridLayout::fit(
        card.len(),
        *round.mode().max_num(),
        chunks[1].width as usize,
        height,
    );
    let max_scroll = layout.max_scroll(height);
    let offset = app.scroll().min(max_scroll);

    let mut block = Block::default().borders(Borders::TOP | Borders::BOTTOM);
    if offset > 0 {
        block = block.title_top(Line::from(" ▲ more (↑) ").right_aligned());
    }
    if offset < max_scroll {
        block = block.title_bottom(Line::from(" ▼ more (↓) ").right_aligned());
    }

    let grid: Vec<Line> = grid_lines(card, layout)
        .into_iter()
        .skip(offset)
        .take(height)
        .map(Line::from)
        .collect();
    let grid = Paragraph::new(grid)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(grid, chunks[1]);
}

fn render_awaiting(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            "MIND READING COMPLETE",
            Style::default().fg(Color::LightBlue),
        )),
        Line::from(""),
        Line::from("I know the number you are thinking of..."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to reveal the answer!",
            Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        )),
    ];
    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, area);
}

fn render_revealed(f: &mut Frame, area: Rect, app: &App, round: &RoundRevealed) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let (headline, note) = reveal_text(round.guess(), *round.mode().max_num());
    let mut text = vec![
        Line::from(Span::styled(
            "MIND READING COMPLETE",
            Style::default().fg(Color::LightBlue),
        )),
        Line::from(""),
        Line::from("The number you are thinking of is..."),
        Line::from(""),
        Line::from(Span::styled(
            headline,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(note) = note {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(note, Style::default().fg(Color::LightRed))));
    }
    let body = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, chunks[0]);
    f.render_widget(mode_tabs(app), chunks[1]);
}

/// Dots marking answered, current and pending questions.
pub fn progress_line(step: u32, max_bits: u32) -> String {
    (0..max_bits)
        .map(|i| match i.cmp(&step) {
            std::cmp::Ordering::Less => '•',
            std::cmp::Ordering::Equal => '●',
            std::cmp::Ordering::Greater => '·',
        })
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

/// How a card's numbers are arranged in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Width of one right-aligned cell, leading space included.
    pub cell_width: usize,
    /// Numbers per row.
    pub columns: usize,
    /// Rows for the whole card.
    pub rows: usize,
}

impl GridLayout {
    /// Fits `count` numbers no larger than `max_num` into `width` x `height` cells.
    ///
    /// Uses ten columns when that fits, and widens the grid up to `width`
    /// before anything has to scroll.
    pub fn fit(count: usize, max_num: u32, width: usize, height: usize) -> Self {
        let cell_width = max_num.to_string().len() + 1;
        let max_columns = (width / cell_width).max(1);
        let columns = count
            .div_ceil(height.max(1))
            .max(PREFERRED_COLUMNS)
            .min(max_columns);
        Self {
            cell_width,
            columns,
            rows: count.div_ceil(columns),
        }
    }

    /// Largest scroll offset that leaves no empty rows in `height`.
    pub fn max_scroll(&self, height: usize) -> usize {
        self.rows.saturating_sub(height)
    }
}

/// Renders a card's numbers as rows of right-aligned cells.
pub fn grid_lines(card: &Card, layout: GridLayout) -> Vec<String> {
    card.numbers()
        .chunks(layout.columns)
        .map(|row| {
            row.iter()
                .map(|n| format!("{:>width$}", n, width = layout.cell_width))
                .collect::<String>()
        })
        .collect()
}

/// Headline and optional explanation for a revealed guess.
pub fn reveal_text(guess: Guess, max_num: u32) -> (String, Option<String>) {
    match guess {
        Guess::Number(n) => (n.to_string(), None),
        Guess::NoValidGuess => (
            guess.to_string(),
            Some(format!(
                "You didn't say \"yes\" to any table! Were you thinking of 0? (The game is for 1 to {}!)",
                max_num
            )),
        ),
        Guess::OutOfRange(n) => (
            n.to_string(),
            Some(format!(
                "That's bigger than {}, so one of the answers must have slipped. Try again?",
                max_num
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::NoopSink;
    use crate::tui::input::Action;
    use ratatui::{Terminal, backend::TestBackend};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;
    use strictly_bitguess::{Preset, generate_cards};

    #[test]
    fn test_progress_line() {
        assert_eq!(progress_line(0, 3), "● · ·");
        assert_eq!(progress_line(2, 4), "• • ● ·");
    }

    #[test]
    fn test_grid_wraps_to_width() {
        let cards = generate_cards(50, 6);
        let layout = GridLayout::fit(cards[0].len(), 50, 20, 100);
        assert_eq!(layout.columns, 6);
        let lines = grid_lines(&cards[0], layout);
        assert_eq!(lines[0], "  1  3  5  7  9 11");
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.len() <= 20));
    }

    #[test]
    fn test_grid_widens_for_short_areas() {
        let layout = GridLayout::fit(256, 511, 80, 14);
        assert_eq!(layout.cell_width, 4);
        assert_eq!(layout.columns, 19);
        assert_eq!(layout.rows, 14);
        assert_eq!(layout.max_scroll(14), 0);

        let narrow = GridLayout::fit(256, 511, 40, 14);
        assert_eq!(narrow.columns, 10);
        assert_eq!(narrow.max_scroll(14), 12);
    }

    #[test]
    fn test_grid_never_zero_columns() {
        let cards = generate_cards(4, 3);
        let layout = GridLayout::fit(cards[2].len(), 4, 0, 0);
        assert_eq!(grid_lines(&cards[2], layout), vec![" 4".to_string()]);
    }

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    /// Numbers shown below the question prompt.
    fn grid_numbers(rows: &[String]) -> HashSet<u32> {
        rows.iter()
            .skip_while(|row| !row.contains("Is your secret number"))
            .skip(1)
            .flat_map(|row| row.split_whitespace())
            .filter_map(|token| token.parse().ok())
            .collect()
    }

    fn asking_app(selected: usize) -> App {
        let mut app = App::new(
            Preset::modes(),
            selected,
            Duration::from_millis(400),
            Arc::new(NoopSink),
        )
        .unwrap();
        app.handle(Action::Confirm);
        app
    }

    fn current_numbers(app: &App) -> Vec<u32> {
        match app.round() {
            AnyRound::Asking(round) => round.current_card().numbers().clone(),
            other => panic!("Expected a question, got {}", other.phase()),
        }
    }

    #[test]
    fn test_every_card_fits_standard_terminal() {
        for selected in 0..Preset::modes().len() {
            let mut app = asking_app(selected);
            let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
            let max_bits = *app.round().mode().max_bits();
            for _ in 0..max_bits {
                terminal.draw(|f| draw(f, &app)).unwrap();
                let shown = grid_numbers(&screen(&terminal));
                for n in current_numbers(&app) {
                    assert!(shown.contains(&n), "{} not visible in mode {}", n, selected);
                }
                app.handle(Action::No);
            }
        }
    }

    #[test]
    fn test_small_terminal_scrolls_through_card() {
        let mut app = asking_app(2);
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        let expected = current_numbers(&app);

        terminal.draw(|f| draw(f, &app)).unwrap();
        let first = screen(&terminal);
        assert!(first.iter().any(|row| row.contains("▼ more")));
        assert!(!grid_numbers(&first).contains(&511));

        let mut seen = HashSet::new();
        for _ in 0..expected.len() {
            terminal.draw(|f| draw(f, &app)).unwrap();
            seen.extend(grid_numbers(&screen(&terminal)));
            app.handle(Action::ScrollDown);
        }
        assert!(expected.iter().all(|n| seen.contains(n)));

        let last = screen(&terminal);
        assert!(last.iter().any(|row| row.contains("▲ more")));
        assert!(!last.iter().any(|row| row.contains("▼ more")));
    }

    #[test]
    fn test_reveal_text_for_zero() {
        let (headline, note) = reveal_text(Guess::NoValidGuess, 50);
        assert_eq!(headline, "Wait...");
        assert!(note.unwrap().contains("1 to 50"));
        assert_eq!(reveal_text(Guess::Number(37), 50), ("37".to_string(), None));
    }
}
