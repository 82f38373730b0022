use crate::input::{PointerInput, SurfaceAction};
use cardtable_core::{
    MarkerReason, RankSelector, SortMode, SpreadFilter, SurfaceEvent, Table, TableConfig,
    TableError,
};
use ratatui::layout::Rect;
use std::collections::VecDeque;

pub const DEFAULT_SEED: u64 = 0x5EED;
/// The surface runs in a fixed virtual coordinate space; the renderer maps
/// it onto whatever terminal area is available.
pub const VIRTUAL_W: f32 = 1280.0;
pub const VIRTUAL_H: f32 = 720.0;
const MAX_EVENT_LOG: usize = 100;

pub struct App {
    pub table: Table,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
    /// Terminal area the surface was last drawn into; used to translate
    /// mouse cells back into surface coordinates.
    pub surface_area: Rect,
}

impl App {
    pub fn new(config: TableConfig, seed: u64) -> Self {
        let mut table = Table::with_config(config, seed);
        table.set_viewport(VIRTUAL_W, VIRTUAL_H);
        Self {
            table,
            event_log: VecDeque::new(),
            status_line: format!("seed {seed} — press ? for help"),
            show_help: false,
            should_quit: false,
            surface_area: Rect::new(0, 0, 1, 1),
        }
    }

    pub fn apply(&mut self, action: SurfaceAction) {
        match action {
            SurfaceAction::None => {}
            SurfaceAction::Quit => self.should_quit = true,
            SurfaceAction::ToggleHelp => self.show_help = !self.show_help,
            SurfaceAction::SpawnCard => {
                let result = self.table.spawn_card();
                self.note(result);
            }
            SurfaceAction::ResetBox => self.table.reset_box_position(),
            SurfaceAction::Spread {
                filter,
                mode,
                reclaim,
            } => {
                let face_up = mode != SortMode::Random;
                let result = self.table.spawn_spread(filter, mode, reclaim, face_up);
                self.note(result);
            }
            SurfaceAction::ListRank(selector) => {
                let result = self.table.list_cards_by_rank(selector);
                self.note(result);
            }
            SurfaceAction::FlipFocused => self.flip_focused(),
            SurfaceAction::DeleteFocused => self.delete_focused(),
            SurfaceAction::FlipAll => self.table.flip_all_cards(),
            SurfaceAction::DeleteAll => self.table.delete_all(),
        }
    }

    /// Deals an opening spread from a `--spread` token. An unknown token is
    /// reported and leaves the inventory untouched.
    pub fn open_with_spread(&mut self, token: &str) {
        match SortMode::parse(token) {
            Ok(mode) => {
                let face_up = mode != SortMode::Random;
                let result = self.table.spawn_spread(SpreadFilter::All, mode, false, face_up);
                self.note(result);
            }
            Err(error) => self.status_line = error.to_string(),
        }
    }

    /// Spawns an opening rank row from a `--row` token.
    pub fn open_with_row(&mut self, token: &str) {
        match RankSelector::parse(token) {
            Some(selector) => {
                let result = self.table.list_cards_by_rank(selector);
                self.note(result);
            }
            None => self.status_line = format!("unknown rank token `{token}`"),
        }
    }

    fn flip_focused(&mut self) {
        if let Some(card) = self.table.focus().current_card() {
            let result = self.table.flip_card(card);
            self.note(result);
        } else if let Some(group) = self.table.focus().current_group() {
            let result = self.table.flip_group(group);
            self.note(result);
        } else {
            self.status_line = "nothing focused to flip".to_string();
        }
    }

    fn delete_focused(&mut self) {
        if let Some(card) = self.table.focus().current_card() {
            let result = self.table.delete_card(card);
            self.note(result);
        } else if let Some(group) = self.table.focus().current_group() {
            let result = self.table.delete_group(group);
            self.note(result);
        } else {
            self.status_line = "nothing focused to delete".to_string();
        }
    }

    pub fn pointer(&mut self, input: PointerInput) {
        match input {
            PointerInput::Press {
                column,
                row,
                button,
            } => {
                let (x, y) = self.to_surface(column, row);
                self.table.pointer_press(x, y, button);
            }
            PointerInput::Move { column, row } => {
                let (x, y) = self.to_surface(column, row);
                self.table.pointer_move(x, y);
            }
            PointerInput::Release { column, row } => {
                let (x, y) = self.to_surface(column, row);
                self.table.pointer_release(x, y);
            }
        }
    }

    /// The pointer left the surface (terminal lost focus); wave lifts ease
    /// back to rest.
    pub fn pointer_left(&mut self) {
        self.table.pointer_leave();
    }

    pub fn on_tick(&mut self) {
        self.table.tick();
        let drained: Vec<SurfaceEvent> = self.table.events.drain().collect();
        for event in drained {
            let line = format_event(&event);
            self.push_event_line(line);
        }
    }

    fn to_surface(&self, column: u16, row: u16) -> (f32, f32) {
        let area = self.surface_area;
        let width = f32::from(area.width.max(1));
        let height = f32::from(area.height.max(1));
        let x = f32::from(column.saturating_sub(area.x)) + 0.5;
        let y = f32::from(row.saturating_sub(area.y)) + 0.5;
        (x / width * VIRTUAL_W, y / height * VIRTUAL_H)
    }

    fn note<T>(&mut self, result: Result<T, TableError>) {
        if let Err(error) = result {
            self.status_line = error.to_string();
        }
    }

    fn push_event_line(&mut self, line: String) {
        if self.event_log.len() >= MAX_EVENT_LOG {
            let _ = self.event_log.pop_front();
        }
        self.event_log.push_back(line);
    }
}

fn format_event(event: &SurfaceEvent) -> String {
    match event {
        SurfaceEvent::CardSpawned { identity, .. } => format!("spawned {identity}"),
        SurfaceEvent::CardFlipped {
            identity, face_up, ..
        } => {
            if *face_up {
                format!("{identity} shows its face")
            } else {
                format!("{identity} turns face down")
            }
        }
        SurfaceEvent::CardDetached { .. } => "card pulled out of its spread".to_string(),
        SurfaceEvent::CardDeleted { identity } => format!("deleted {identity}"),
        SurfaceEvent::GroupCreated { members, mode, .. } => {
            format!("dealing {members} cards ({})", mode.label())
        }
        SurfaceEvent::GroupDeleted { .. } => "spread dismissed".to_string(),
        SurfaceEvent::GroupStacked { stacked, .. } => {
            if *stacked {
                "spread stacked".to_string()
            } else {
                "spread fanned back out".to_string()
            }
        }
        SurfaceEvent::GroupFlipped { .. } => "spread finished flipping".to_string(),
        SurfaceEvent::BoxReset => "box returned home".to_string(),
        SurfaceEvent::Marker { reason } => match reason {
            MarkerReason::NoCardsLeft => "no cards left in the box".to_string(),
            MarkerReason::NoMatchingCards => "nothing matches that request".to_string(),
            MarkerReason::SpreadInProgress => "a spread is still dealing".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(TableConfig::default(), 9)
    }

    #[test]
    fn spawn_action_takes_a_card() {
        let mut app = app();
        app.apply(SurfaceAction::SpawnCard);
        assert_eq!(app.table.inventory().in_use_count(), 1);
    }

    #[test]
    fn delete_all_action_sweeps_the_surface() {
        let mut app = app();
        app.apply(SurfaceAction::ListRank(RankSelector::Number(4)));
        for _ in 0..60 {
            app.on_tick();
        }
        assert_eq!(app.table.inventory().in_use_count(), 4);
        app.apply(SurfaceAction::DeleteAll);
        for _ in 0..60 {
            app.on_tick();
        }
        assert_eq!(app.table.inventory().in_use_count(), 0);
        assert!(!app.event_log.is_empty());
    }

    #[test]
    fn unknown_opening_tokens_are_reported_not_applied() {
        let mut app = app();
        app.open_with_spread("bogosort");
        assert!(app.status_line.contains("unknown sort mode"));
        assert_eq!(app.table.inventory().in_use_count(), 0);
        app.open_with_row("Z");
        assert!(app.status_line.contains("unknown rank token"));
        assert_eq!(app.table.inventory().in_use_count(), 0);
    }

    #[test]
    fn opening_spread_deals_the_requested_stack() {
        let mut app = app();
        app.open_with_spread("eight_kings");
        for _ in 0..300 {
            app.on_tick();
        }
        assert_eq!(app.table.inventory().in_use_count(), 54);
    }

    #[test]
    fn spread_failure_lands_in_the_status_line() {
        let mut app = app();
        app.apply(SurfaceAction::Spread {
            filter: SpreadFilter::All,
            mode: SortMode::Standard,
            reclaim: false,
            // keep dealing in progress, then ask again
        });
        app.apply(SurfaceAction::Spread {
            filter: SpreadFilter::All,
            mode: SortMode::Random,
            reclaim: false,
        });
        assert_eq!(app.status_line, TableError::SpreadInProgress.to_string());
    }
}
