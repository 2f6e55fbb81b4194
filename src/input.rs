use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEvent};
use std::time::Duration;

/// What the player asked for, independent of which key said it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    ToggleRun,
    StepOnce,
    ShrinkCells,
    GrowCells,
    SlowDown,
    SpeedUp,
    Randomize,
    Clear,
    Quit,
}

#[derive(Clone, Debug)]
pub(crate) enum InputEvent {
    Key(KeyCode, KeyModifiers),
    /// Raw mouse event; hit-testing against the board needs the layout,
    /// which lives with the caller.
    Mouse(MouseEvent),
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) => {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    out.push(InputEvent::Key(k.code, k.modifiers));
                    if out.len() >= 32 {
                        break;
                    }
                }
            }
            // Drags arrive as a burst of moves; the cap keeps one frame
            // from chewing through all of them.
            Event::Mouse(m) => {
                out.push(InputEvent::Mouse(m));
                if out.len() >= 32 {
                    break;
                }
            }
            _ => {}
        }
    }
    Ok(out)
}

pub(crate) fn map_key_to_action(key: KeyCode, mods: KeyModifiers) -> Option<Action> {
    // Raw mode eats the usual SIGINT, so ctrl-c has to mean quit here.
    if matches!(key, KeyCode::Char('c') | KeyCode::Char('C'))
        && mods.contains(KeyModifiers::CONTROL)
    {
        return Some(Action::Quit);
    }
    match key {
        KeyCode::Char(' ') => Some(Action::ToggleRun),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::StepOnce),
        KeyCode::Char('[') => Some(Action::ShrinkCells),
        KeyCode::Char(']') => Some(Action::GrowCells),
        KeyCode::Char('-') => Some(Action::SlowDown),
        KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::SpeedUp),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Randomize),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Clear),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}
