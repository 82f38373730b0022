use cardtable_core::{PointerButton, RankSelector, SortMode, SpreadFilter, Suit};
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceAction {
    None,
    Quit,
    ToggleHelp,
    SpawnCard,
    ResetBox,
    Spread {
        filter: SpreadFilter,
        mode: SortMode,
        reclaim: bool,
    },
    ListRank(RankSelector),
    FlipFocused,
    DeleteFocused,
    FlipAll,
    DeleteAll,
}

fn spread(filter: SpreadFilter, mode: SortMode) -> SurfaceAction {
    SurfaceAction::Spread {
        filter,
        mode,
        reclaim: false,
    }
}

pub fn map_key(key: KeyEvent) -> SurfaceAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => SurfaceAction::Quit,
        KeyCode::Char('c') if ctrl => SurfaceAction::Quit,
        KeyCode::Char('?') => SurfaceAction::ToggleHelp,
        KeyCode::Char('t') => SurfaceAction::SpawnCard,
        KeyCode::Char('g') => SurfaceAction::ResetBox,
        KeyCode::Char('d') if ctrl => SurfaceAction::DeleteAll,
        KeyCode::Char('d') => SurfaceAction::DeleteFocused,
        KeyCode::Char('f') if ctrl => SurfaceAction::FlipAll,
        KeyCode::Char('f') => SurfaceAction::FlipFocused,
        KeyCode::Char('r') => SurfaceAction::DeleteAll,
        KeyCode::Char('w') if ctrl => SurfaceAction::Spread {
            filter: SpreadFilter::All,
            mode: SortMode::Standard,
            reclaim: true,
        },
        KeyCode::Char('s') => spread(SpreadFilter::NoJokers, SortMode::Random),
        KeyCode::Char('w') => spread(SpreadFilter::All, SortMode::Standard),
        KeyCode::Char('e') => spread(SpreadFilter::NoJokers, SortMode::EightKings),
        KeyCode::Char('u') => spread(SpreadFilter::NoJokers, SortMode::SiStebbins),
        KeyCode::Char('m') => spread(SpreadFilter::NoJokers, SortMode::MirrorColor),
        KeyCode::Char('n') => spread(SpreadFilter::NoJokers, SortMode::MirrorNumber),
        KeyCode::Char('b') => spread(SpreadFilter::NoJokers, SortMode::MirrorBoth),
        KeyCode::Char('z') => spread(SpreadFilter::Suit(Suit::Spade), SortMode::Standard),
        KeyCode::Char('x') => spread(SpreadFilter::Suit(Suit::Diamond), SortMode::Standard),
        KeyCode::Char('c') => spread(SpreadFilter::Suit(Suit::Club), SortMode::Standard),
        KeyCode::Char('v') => spread(SpreadFilter::Suit(Suit::Heart), SortMode::Standard),
        KeyCode::Char('h') => spread(SpreadFilter::Red, SortMode::Standard),
        KeyCode::Char('l') => spread(SpreadFilter::Black, SortMode::Standard),
        KeyCode::Char('o') => SurfaceAction::ListRank(RankSelector::Jokers),
        KeyCode::Char('a') => SurfaceAction::ListRank(RankSelector::Number(1)),
        KeyCode::Char('j') => SurfaceAction::ListRank(RankSelector::Number(11)),
        KeyCode::Char('q') => SurfaceAction::ListRank(RankSelector::Number(12)),
        KeyCode::Char('k') => SurfaceAction::ListRank(RankSelector::Number(13)),
        KeyCode::Char('0') => SurfaceAction::ListRank(RankSelector::Number(10)),
        KeyCode::Char(digit @ '1'..='9') => {
            SurfaceAction::ListRank(RankSelector::Number(digit as u8 - b'0'))
        }
        _ => SurfaceAction::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Press {
        column: u16,
        row: u16,
        button: PointerButton,
    },
    Move {
        column: u16,
        row: u16,
    },
    Release {
        column: u16,
        row: u16,
    },
}

pub fn map_mouse(event: MouseEvent) -> Option<PointerInput> {
    match event.kind {
        MouseEventKind::Down(button) => map_button(button).map(|button| PointerInput::Press {
            column: event.column,
            row: event.row,
            button,
        }),
        MouseEventKind::Drag(_) | MouseEventKind::Moved => Some(PointerInput::Move {
            column: event.column,
            row: event.row,
        }),
        MouseEventKind::Up(_) => Some(PointerInput::Release {
            column: event.column,
            row: event.row,
        }),
        _ => None,
    }
}

fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Right => Some(PointerButton::Secondary),
    }
}
