//! End-to-end key handling without a terminal.

use std::sync::Arc;
use std::time::Duration;
use strictly_mindread::{
    Action, App, AppConfig, Control, Guess, RecordingSink, RoundPhase, TrackedEvent, decode,
};

fn app_with(config: &AppConfig) -> (App, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let app = App::new(
        config.game_modes().unwrap(),
        *config.default_mode(),
        Duration::from_millis(*config.flash_millis()),
        sink.clone(),
    )
    .unwrap();
    (app, sink)
}

#[test]
fn test_two_rounds_report_events() {
    let (mut app, sink) = app_with(&AppConfig::default());

    app.handle(Action::SelectMode(2));
    app.handle(Action::Confirm);
    for bit in 0..9 {
        let action = if 300u32 & (1 << bit) != 0 { Action::Yes } else { Action::No };
        app.handle(action);
    }
    app.handle(Action::Confirm);
    assert_eq!(app.round().guess(), Some(Guess::Number(300)));

    app.handle(Action::Confirm);
    assert_eq!(app.round().phase(), RoundPhase::Asking { step: 0 });
    assert_eq!(app.handle(Action::Quit), Control::Quit);

    assert_eq!(
        sink.events(),
        vec![
            TrackedEvent::VisitorLanded,
            TrackedEvent::RoundStarted {
                label: "1 to 511".to_string()
            },
            TrackedEvent::GuessRevealed { number: 300 },
            TrackedEvent::RoundStarted {
                label: "1 to 511".to_string()
            },
        ]
    );
}

#[test]
fn test_decode_matches_interactive_play() {
    let config = AppConfig::default();
    let mode = config.find_mode("1 to 100").unwrap();
    let revealed = decode(mode, "nnyyynn").unwrap();
    assert_eq!(revealed.guess(), Guess::Number(28));
}
