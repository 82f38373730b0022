use crate::anim::StepRule;
use crate::arrange::{arrange, SortMode};
use crate::burst::{spawn_burst, Particle};
use crate::card::{Card, CardAnimEvent, CardId, CardPhase};
use crate::config::TableConfig;
use crate::deck_box::DeckBox;
use crate::events::{EventBus, MarkerReason, SurfaceEvent};
use crate::focus::InteractionContext;
use crate::group::{Group, GroupId, GroupPhase};
use crate::identity::{CardIdentity, IdentityKind, Suit};
use crate::inventory::{Inventory, InventoryError};
use crate::layout;
use crate::pointer::{Gesture, GestureEvent, PointerButton};
use crate::rng::RngState;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Box,
    Group(GroupId),
    Card(CardId),
}

/// Narrows the candidate set of a spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadFilter {
    All,
    NoJokers,
    Suit(Suit),
    Red,
    Black,
}

impl SpreadFilter {
    pub fn matches(self, kind: IdentityKind) -> bool {
        match (self, kind) {
            (Self::All, _) => true,
            (Self::NoJokers, kind) => !matches!(kind, IdentityKind::Joker { .. }),
            (Self::Suit(want), IdentityKind::Standard { suit, .. }) => suit == want,
            (Self::Red, IdentityKind::Standard { suit, .. }) => {
                suit == Suit::Heart || suit == Suit::Diamond
            }
            (Self::Black, IdentityKind::Standard { suit, .. }) => {
                suit == Suit::Spade || suit == Suit::Club
            }
            _ => false,
        }
    }
}

/// Selects the members of a list-by-rank row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankSelector {
    Number(u8),
    Jokers,
}

impl RankSelector {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "A" | "a" | "1" => Some(Self::Number(1)),
            "J" | "j" => Some(Self::Number(11)),
            "Q" | "q" => Some(Self::Number(12)),
            "K" | "k" => Some(Self::Number(13)),
            "joker" => Some(Self::Jokers),
            other => match other.parse::<u8>() {
                Ok(rank) if (2..=10).contains(&rank) => Some(Self::Number(rank)),
                _ => None,
            },
        }
    }

    pub fn matches(self, kind: IdentityKind) -> bool {
        match (self, kind) {
            (Self::Number(want), IdentityKind::Standard { rank, .. }) => rank == want,
            (Self::Jokers, IdentityKind::Joker { .. }) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("no unused cards left")]
    NoCardsLeft,
    #[error("no cards match the requested filter")]
    NoMatchingCards,
    #[error("a spread is already in progress")]
    SpreadInProgress,
    #[error("entity is busy")]
    Busy,
    #[error("unknown card {0:?}")]
    UnknownCard(CardId),
    #[error("unknown group {0:?}")]
    UnknownGroup(GroupId),
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Work scheduled for a later tick. Replaces the timer-callback chains of a
/// canvas toolkit: each entry is run at most once, and stale owners make it
/// a no-op rather than an error.
#[derive(Debug, Clone)]
enum DeferredOp {
    DealMember {
        group: GroupId,
        identity: CardIdentity,
        slot: usize,
    },
    SpawnRow {
        identity: CardIdentity,
        x: f32,
        y: f32,
    },
    DeleteCard {
        card: CardId,
    },
    FlipCard {
        card: CardId,
        steps: u32,
        cascade: Option<GroupId>,
    },
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: u64,
    op: DeferredOp,
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    target: HitTarget,
    gesture: Gesture,
}

/// The whole surface: one box, its live cards and groups, the deferred-op
/// queue and every animation, advanced by `tick`.
#[derive(Debug)]
pub struct Table {
    pub config: TableConfig,
    pub events: EventBus,
    rng: RngState,
    clock: u64,
    viewport_w: f32,
    viewport_h: f32,
    deck_box: DeckBox,
    cards: BTreeMap<CardId, Card>,
    groups: BTreeMap<GroupId, Group>,
    z_order: Vec<HitTarget>,
    next_card: u64,
    next_group: u64,
    focus: InteractionContext,
    gesture: Option<ActiveGesture>,
    pending: Vec<Scheduled>,
    particles: Vec<Particle>,
    marker: Option<(MarkerReason, u64)>,
}

impl Table {
    pub fn new(seed: u64) -> Self {
        Self::with_config(TableConfig::default(), seed)
    }

    pub fn with_config(config: TableConfig, seed: u64) -> Self {
        let viewport_w = 1280.0;
        let viewport_h = 720.0;
        let deck_box = DeckBox::new(viewport_w / 2.0, viewport_h - config.box_h);
        Self {
            config,
            events: EventBus::default(),
            rng: RngState::from_seed(seed),
            clock: 0,
            viewport_w,
            viewport_h,
            deck_box,
            cards: BTreeMap::new(),
            groups: BTreeMap::new(),
            z_order: vec![HitTarget::Box],
            next_card: 0,
            next_group: 0,
            focus: InteractionContext::default(),
            gesture: None,
            pending: Vec::new(),
            particles: Vec::new(),
            marker: None,
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_w = width;
        self.viewport_h = height;
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.viewport_w, self.viewport_h)
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn inventory(&self) -> &Inventory {
        &self.deck_box.inventory
    }

    pub fn deck_box(&self) -> &DeckBox {
        &self.deck_box
    }

    pub fn focus(&self) -> &InteractionContext {
        &self.focus
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn marker(&self) -> Option<MarkerReason> {
        self.marker.map(|(reason, _)| reason)
    }

    /// Draw order, bottom to top.
    pub fn z_order(&self) -> &[HitTarget] {
        &self.z_order
    }

    pub fn spread_in_progress(&self) -> bool {
        self.groups
            .values()
            .any(|group| group.phase == GroupPhase::Dealing)
            || self.pending.iter().any(|scheduled| {
                matches!(
                    scheduled.op,
                    DeferredOp::DealMember { .. } | DeferredOp::SpawnRow { .. }
                )
            })
    }

    // ----- box operations -------------------------------------------------

    /// Spawns one uniformly-random unused card at the box, rising into view.
    pub fn spawn_card(&mut self) -> Result<CardId, TableError> {
        if self.spread_in_progress() {
            self.show_marker(MarkerReason::SpreadInProgress);
            return Err(TableError::SpreadInProgress);
        }
        let unused = self.deck_box.inventory.unused_identities();
        let Some(identity) = self.rng.pick(&unused).cloned() else {
            self.show_marker(MarkerReason::NoCardsLeft);
            return Err(TableError::NoCardsLeft);
        };
        self.spawn_rising(identity)
    }

    /// Spawns a specific identity (used by tests and scripted demos).
    pub fn spawn_specific(&mut self, key: &str) -> Result<CardId, TableError> {
        let Some(identity) = self.deck_box.inventory.identity(key).cloned() else {
            return Err(TableError::Inventory(InventoryError::UnknownIdentity(
                key.to_string(),
            )));
        };
        self.spawn_rising(identity)
    }

    fn spawn_rising(&mut self, identity: CardIdentity) -> Result<CardId, TableError> {
        self.deck_box.inventory.take(identity.key())?;
        let id = self.alloc_card_id();
        let rise_to = self.deck_box.y - self.config.rise_height;
        let card = Card::rising(
            id,
            identity.clone(),
            self.deck_box.x,
            self.deck_box.y,
            rise_to,
            self.config.rise_steps,
        );
        self.cards.insert(id, card);
        self.z_order.push(HitTarget::Card(id));
        self.events.push(SurfaceEvent::CardSpawned {
            card: id,
            identity: identity.key().to_string(),
        });
        Ok(id)
    }

    pub fn reset_box_position(&mut self) {
        self.deck_box.reset_position();
        self.events.push(SurfaceEvent::BoxReset);
    }

    /// Builds a new spread from the filtered candidate set, arranged by
    /// `mode`, dealing members in progressively. With `reclaim_used`, live
    /// cards matching the filter are deleted first so their identities can
    /// join the spread.
    pub fn spawn_spread(
        &mut self,
        filter: SpreadFilter,
        mode: SortMode,
        reclaim_used: bool,
        face_up: bool,
    ) -> Result<GroupId, TableError> {
        if self.spread_in_progress() {
            self.show_marker(MarkerReason::SpreadInProgress);
            return Err(TableError::SpreadInProgress);
        }
        let mut candidates: Vec<CardIdentity> = if reclaim_used {
            self.deck_box
                .inventory
                .universe()
                .iter()
                .filter(|identity| filter.matches(identity.kind()))
                .cloned()
                .collect()
        } else {
            self.deck_box
                .inventory
                .unused_identities()
                .into_iter()
                .filter(|identity| filter.matches(identity.kind()))
                .collect()
        };
        if candidates.is_empty() {
            self.show_marker(MarkerReason::NoMatchingCards);
            return Err(TableError::NoMatchingCards);
        }
        arrange(mode, &mut candidates, &mut self.rng);
        if reclaim_used {
            self.reclaim(&candidates);
        }
        let origin = layout::centered_origin(
            candidates.len(),
            self.config.ribbon_spacing,
            self.viewport_w,
            self.config.card_w,
        );
        let baseline = layout::baseline_y(self.viewport_h, &self.config);
        let id = self.alloc_group_id();
        let group = Group::new(
            id,
            (origin, baseline),
            self.config.ribbon_spacing,
            face_up,
            &self.config,
        );
        self.groups.insert(id, group);
        self.z_order.push(HitTarget::Group(id));
        let members = candidates.len();
        for (slot, identity) in candidates.into_iter().enumerate() {
            self.schedule(
                1 + slot as u64 * self.config.deal_stagger,
                DeferredOp::DealMember {
                    group: id,
                    identity,
                    slot,
                },
            );
        }
        self.events.push(SurfaceEvent::GroupCreated {
            group: id,
            members,
            mode,
        });
        Ok(id)
    }

    /// Spawns every card of one rank face up in a centered row, reclaiming
    /// live copies first. Suit order: spade, diamond, club, heart.
    pub fn list_cards_by_rank(&mut self, selector: RankSelector) -> Result<usize, TableError> {
        if self.spread_in_progress() {
            self.show_marker(MarkerReason::SpreadInProgress);
            return Err(TableError::SpreadInProgress);
        }
        let mut matches: Vec<CardIdentity> = self
            .deck_box
            .inventory
            .universe()
            .iter()
            .filter(|identity| selector.matches(identity.kind()))
            .cloned()
            .collect();
        if matches.is_empty() {
            self.show_marker(MarkerReason::NoMatchingCards);
            return Err(TableError::NoMatchingCards);
        }
        matches.sort_by_key(|identity| crate::arrange::standard_key(identity.kind()));
        self.reclaim(&matches);
        let origin = layout::centered_origin(
            matches.len(),
            self.config.row_spacing,
            self.viewport_w,
            self.config.card_w,
        );
        let baseline = layout::baseline_y(self.viewport_h, &self.config);
        let count = matches.len();
        for (index, identity) in matches.into_iter().enumerate() {
            let (x, y) = layout::slot_at(origin, baseline, index, self.config.row_spacing);
            self.schedule(
                1 + index as u64 * self.config.row_stagger,
                DeferredOp::SpawnRow { identity, x, y },
            );
        }
        Ok(count)
    }

    /// Deletes every live card matching any of the identities, freeing them
    /// for a respawn.
    fn reclaim(&mut self, identities: &[CardIdentity]) {
        let live: Vec<CardId> = self
            .cards
            .values()
            .filter(|card| {
                identities
                    .iter()
                    .any(|identity| identity.key() == card.identity.key())
            })
            .map(|card| card.id)
            .collect();
        for id in live {
            self.delete_card_now(id);
        }
    }

    // ----- card operations ------------------------------------------------

    pub fn flip_card(&mut self, id: CardId) -> Result<(), TableError> {
        let steps = self.config.flip_steps;
        self.flip_card_inner(id, steps)
    }

    fn flip_card_inner(&mut self, id: CardId, steps: u32) -> Result<(), TableError> {
        let (phase, member) = match self.cards.get(&id) {
            Some(card) => (card.phase, card.member_of),
            None => return Err(TableError::UnknownCard(id)),
        };
        if phase != CardPhase::Ready {
            return Err(TableError::Busy);
        }
        if member.is_some() {
            // Lift the card out of the spread first; the flip follows once
            // the detachment is visible.
            self.detach_card(id);
            let rise = self.config.detach_rise;
            let rise_steps = self.config.rise_steps;
            if let Some(card) = self.cards.get_mut(&id) {
                let target = card.y - rise;
                card.begin_rise(target, rise_steps);
            }
            self.schedule(
                self.config.detach_flip_delay,
                DeferredOp::FlipCard {
                    card: id,
                    steps,
                    cascade: None,
                },
            );
            return Ok(());
        }
        if let Some(card) = self.cards.get_mut(&id) {
            card.begin_flip(steps);
        }
        Ok(())
    }

    pub fn delete_card(&mut self, id: CardId) -> Result<(), TableError> {
        if !self.cards.contains_key(&id) {
            return Err(TableError::UnknownCard(id));
        }
        self.delete_card_now(id);
        Ok(())
    }

    /// Staggered destruction so each burst stays visually distinct.
    pub fn delete_cards(&mut self, targets: &[CardId]) {
        for (index, id) in targets.iter().enumerate() {
            self.schedule(
                1 + index as u64 * self.config.delete_stagger,
                DeferredOp::DeleteCard { card: *id },
            );
        }
    }

    pub fn delete_all(&mut self) {
        // Queued spawns would undo the sweep; drop them.
        self.pending.retain(|scheduled| {
            !matches!(
                scheduled.op,
                DeferredOp::DealMember { .. } | DeferredOp::SpawnRow { .. }
            )
        });
        let ids: Vec<CardId> = self.cards.keys().copied().collect();
        self.delete_cards(&ids);
    }

    /// Flips every settled card toward the majority-opposite orientation,
    /// in place — spread members stay members.
    pub fn flip_all_cards(&mut self) {
        let steps = self.config.flip_steps;
        let ids: Vec<CardId> = self
            .cards
            .values()
            .filter(|card| card.phase == CardPhase::Ready && card.anim.is_none())
            .map(|card| card.id)
            .collect();
        if ids.is_empty() {
            return;
        }
        let all_up = ids
            .iter()
            .all(|id| self.cards.get(id).map(|card| card.face_up).unwrap_or(true));
        let target = !all_up;
        for id in ids {
            if let Some(card) = self.cards.get_mut(&id) {
                if card.face_up != target {
                    card.begin_flip(steps);
                }
            }
        }
    }

    // ----- group operations -----------------------------------------------

    /// Sequential flip of every member, tinting the handle while busy.
    pub fn flip_group(&mut self, id: GroupId) -> Result<(), TableError> {
        let steps = self.config.flip_steps_group;
        let stagger = self.config.flip_stagger;
        let members = {
            let Some(group) = self.groups.get_mut(&id) else {
                return Err(TableError::UnknownGroup(id));
            };
            if group.is_busy() {
                return Err(TableError::Busy);
            }
            group.phase = GroupPhase::FlippingAll;
            group.tint = true;
            group.members.clone()
        };
        for (index, member) in members.iter().enumerate() {
            self.schedule(
                1 + index as u64 * stagger,
                DeferredOp::FlipCard {
                    card: *member,
                    steps,
                    cascade: Some(id),
                },
            );
        }
        Ok(())
    }

    pub fn delete_group(&mut self, id: GroupId) -> Result<(), TableError> {
        let members = {
            let Some(group) = self.groups.get(&id) else {
                return Err(TableError::UnknownGroup(id));
            };
            if group.is_busy() {
                return Err(TableError::Busy);
            }
            group.members.clone()
        };
        self.delete_cards(&members);
        Ok(())
    }

    /// Collapses the spread to one shared point behind the handle, or glides
    /// every member back to its slot.
    pub fn toggle_stack(&mut self, id: GroupId) -> Result<bool, TableError> {
        let steps = self.config.stack_steps;
        let (stacked, stack_point, members) = {
            let Some(group) = self.groups.get_mut(&id) else {
                return Err(TableError::UnknownGroup(id));
            };
            if group.is_busy() {
                return Err(TableError::Busy);
            }
            let stacked = !group.stacked;
            group.stacked = stacked;
            group.phase = if stacked {
                GroupPhase::Stacking
            } else {
                GroupPhase::Unstacking
            };
            (stacked, group.stack_point(&self.config), group.members.clone())
        };
        for member in members {
            let Some(card) = self.cards.get_mut(&member) else {
                continue;
            };
            if card.phase != CardPhase::Ready {
                continue;
            }
            let target = if stacked {
                stack_point
            } else {
                card.slot.unwrap_or((card.x, card.y))
            };
            card.lift_target = 0.0;
            card.begin_glide(target, steps);
        }
        self.events.push(SurfaceEvent::GroupStacked {
            group: id,
            stacked,
        });
        Ok(stacked)
    }

    // ----- pointer routing ------------------------------------------------

    pub fn hit_test(&self, x: f32, y: f32) -> Option<HitTarget> {
        for target in self.z_order.iter().rev() {
            let hit = match *target {
                HitTarget::Box => {
                    (x - self.deck_box.x).abs() <= self.config.box_w / 2.0
                        && (y - self.deck_box.y).abs() <= self.config.box_h / 2.0
                }
                HitTarget::Group(id) => self.groups.get(&id).map(|group| {
                    let dx = x - group.anchor_x;
                    let dy = y - group.anchor_y;
                    dx * dx + dy * dy <= self.config.handle_radius * self.config.handle_radius
                }) == Some(true),
                HitTarget::Card(id) => self.cards.get(&id).map(|card| {
                    (x - card.x).abs() <= self.config.card_w / 2.0
                        && (y - card.visual_y()).abs() <= self.config.card_h / 2.0
                }) == Some(true),
            };
            if hit {
                return Some(*target);
            }
        }
        None
    }

    pub fn pointer_press(&mut self, x: f32, y: f32, button: PointerButton) {
        self.gesture = None;
        let Some(target) = self.hit_test(x, y) else {
            return;
        };
        self.raise(target);
        let origin = match target {
            HitTarget::Box => {
                self.focus.press_box();
                (self.deck_box.x, self.deck_box.y)
            }
            HitTarget::Group(id) => {
                self.focus.press_group(id);
                match self.groups.get(&id) {
                    Some(group) => (group.anchor_x, group.anchor_y),
                    None => return,
                }
            }
            HitTarget::Card(id) => {
                let Some(card) = self.cards.get_mut(&id) else {
                    return;
                };
                card.touched = true;
                card.lift_target = 0.0;
                let member = card.member_of;
                let origin = (card.x, card.y);
                self.focus.press_card(id, member);
                origin
            }
        };
        self.gesture = Some(ActiveGesture {
            target,
            gesture: Gesture::press(x, y, origin.0, origin.1, button),
        });
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some(mut active) = self.gesture.take() {
            match active.gesture.motion(x, y, self.config.drag_threshold) {
                GestureEvent::DragStart { x: ax, y: ay } => {
                    if self.drag_started(active.target, ax, ay) {
                        self.gesture = Some(active);
                    }
                }
                GestureEvent::DragMove { x: ax, y: ay } => {
                    self.drag_moved(active.target, ax, ay);
                    self.gesture = Some(active);
                }
                _ => {
                    self.gesture = Some(active);
                }
            }
        }
        self.update_wave_targets(Some((x, y)));
    }

    pub fn pointer_release(&mut self, x: f32, y: f32) {
        let Some(active) = self.gesture.take() else {
            return;
        };
        match active.gesture.release(x, y, self.config.drag_threshold) {
            GestureEvent::Click { button } => self.clicked(active.target, button),
            GestureEvent::DragEnd { x: ax, y: ay } => self.drag_ended(active.target, ax, ay),
            _ => {}
        }
    }

    pub fn pointer_leave(&mut self) {
        self.update_wave_targets(None);
    }

    /// First threshold crossing. Returns false when the target cannot be
    /// dragged right now, which also cancels the gesture.
    fn drag_started(&mut self, target: HitTarget, x: f32, y: f32) -> bool {
        match target {
            HitTarget::Box => {
                self.deck_box.x = x;
                self.deck_box.y = y;
                true
            }
            HitTarget::Group(id) => {
                let idle = self
                    .groups
                    .get(&id)
                    .map(|group| !group.is_busy())
                    .unwrap_or(false);
                if idle {
                    self.drag_moved(target, x, y);
                }
                idle
            }
            HitTarget::Card(id) => {
                let ready = self
                    .cards
                    .get(&id)
                    .map(|card| card.phase == CardPhase::Ready)
                    .unwrap_or(false);
                if !ready {
                    return false;
                }
                // Dragging a spread member pulls it out of the group at
                // drag start, not at release.
                self.detach_card(id);
                if let Some(card) = self.cards.get_mut(&id) {
                    card.phase = CardPhase::Dragging;
                    card.anim = None;
                    card.lift = 0.0;
                    card.x = x;
                    card.y = y;
                }
                true
            }
        }
    }

    fn drag_moved(&mut self, target: HitTarget, x: f32, y: f32) {
        match target {
            HitTarget::Box => {
                self.deck_box.x = x;
                self.deck_box.y = y;
            }
            HitTarget::Group(id) => {
                let (dx, dy, members) = {
                    let Some(group) = self.groups.get_mut(&id) else {
                        return;
                    };
                    let dx = x - group.anchor_x;
                    let dy = y - group.anchor_y;
                    group.shift(dx, dy);
                    (dx, dy, group.members.clone())
                };
                for member in members {
                    if let Some(card) = self.cards.get_mut(&member) {
                        card.x += dx;
                        card.y += dy;
                        card.slot = card.slot.map(|(sx, sy)| (sx + dx, sy + dy));
                    }
                }
            }
            HitTarget::Card(id) => {
                if let Some(card) = self.cards.get_mut(&id) {
                    if card.phase == CardPhase::Dragging {
                        card.x = x;
                        card.y = y;
                    }
                }
            }
        }
    }

    fn drag_ended(&mut self, target: HitTarget, x: f32, y: f32) {
        match target {
            HitTarget::Box => {
                self.deck_box.x = x;
                self.deck_box.y = y;
            }
            HitTarget::Group(_) => {
                self.drag_moved(target, x, y);
            }
            HitTarget::Card(id) => {
                let phase = match self.cards.get(&id) {
                    Some(card) => card.phase,
                    None => return,
                };
                match phase {
                    CardPhase::Dragging => {
                        if let Some(card) = self.cards.get_mut(&id) {
                            card.x = x;
                            card.y = y;
                            card.phase = CardPhase::Ready;
                        }
                    }
                    CardPhase::Ready => {
                        // Release crossed the threshold without any motion
                        // event in between; commit the position anyway.
                        self.detach_card(id);
                        if let Some(card) = self.cards.get_mut(&id) {
                            card.x = x;
                            card.y = y;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn clicked(&mut self, target: HitTarget, button: PointerButton) {
        match (target, button) {
            (HitTarget::Box, PointerButton::Primary) => {
                let _ = self.spawn_card();
            }
            (HitTarget::Box, PointerButton::Middle) => self.reset_box_position(),
            (HitTarget::Box, PointerButton::Secondary) => {
                let _ =
                    self.spawn_spread(SpreadFilter::NoJokers, SortMode::Random, false, false);
            }
            (HitTarget::Card(id), PointerButton::Primary) => {
                let _ = self.flip_card(id);
            }
            (HitTarget::Card(id), PointerButton::Middle) => {
                let _ = self.delete_card(id);
            }
            (HitTarget::Card(_), PointerButton::Secondary) => {}
            (HitTarget::Group(id), PointerButton::Primary) => {
                let _ = self.flip_group(id);
            }
            (HitTarget::Group(id), PointerButton::Middle) => {
                let _ = self.delete_group(id);
            }
            (HitTarget::Group(id), PointerButton::Secondary) => {
                let _ = self.toggle_stack(id);
            }
        }
    }

    // ----- tick -----------------------------------------------------------

    /// Advances the surface one step: due deferred ops first, then card
    /// animations, particles, group settling and the marker timeout.
    pub fn tick(&mut self) {
        self.clock += 1;
        self.run_due_ops();
        self.step_cards();
        self.particles.retain_mut(|particle| particle.step());
        self.settle_groups();
        if let Some((_, until)) = self.marker {
            if self.clock >= until {
                self.marker = None;
            }
        }
    }

    fn schedule(&mut self, delay: u64, op: DeferredOp) {
        self.pending.push(Scheduled {
            due: self.clock + delay.max(1),
            op,
        });
    }

    fn run_due_ops(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut due = Vec::new();
        let mut rest = Vec::new();
        for scheduled in std::mem::take(&mut self.pending) {
            if scheduled.due <= self.clock {
                due.push(scheduled);
            } else {
                rest.push(scheduled);
            }
        }
        self.pending = rest;
        for scheduled in due {
            self.run_op(scheduled.op);
        }
    }

    fn run_op(&mut self, op: DeferredOp) {
        match op {
            DeferredOp::DealMember {
                group,
                identity,
                slot,
            } => self.deal_member(group, identity, slot),
            DeferredOp::SpawnRow { identity, x, y } => self.spawn_row_card(identity, x, y),
            DeferredOp::DeleteCard { card } => {
                if self.cards.contains_key(&card) {
                    self.delete_card_now(card);
                }
            }
            DeferredOp::FlipCard {
                card,
                steps,
                cascade,
            } => {
                let phase = self.cards.get(&card).map(|c| c.phase);
                match phase {
                    Some(CardPhase::Ready) => {
                        if let Some(card) = self.cards.get_mut(&card) {
                            card.begin_flip(steps);
                        }
                    }
                    // Still lifting out of a spread; try again shortly.
                    Some(CardPhase::Rising) => self.schedule(
                        2,
                        DeferredOp::FlipCard {
                            card,
                            steps,
                            cascade,
                        },
                    ),
                    _ => {}
                }
            }
        }
    }

    fn deal_member(&mut self, group_id: GroupId, identity: CardIdentity, slot: usize) {
        let (slot_pos, face_up) = match self.groups.get(&group_id) {
            Some(group) => (group.slot_for(slot), group.face_up),
            None => return,
        };
        if self.deck_box.inventory.take(identity.key()).is_err() {
            return;
        }
        let id = self.alloc_card_id();
        let card = Card::in_slot(id, identity.clone(), slot_pos, face_up, Some(group_id));
        self.cards.insert(id, card);
        if let Some(group) = self.groups.get_mut(&group_id) {
            group.members.push(id);
        }
        self.z_order.push(HitTarget::Card(id));
        self.events.push(SurfaceEvent::CardSpawned {
            card: id,
            identity: identity.key().to_string(),
        });
    }

    fn spawn_row_card(&mut self, identity: CardIdentity, x: f32, y: f32) {
        if self.deck_box.inventory.take(identity.key()).is_err() {
            return;
        }
        let id = self.alloc_card_id();
        let card = Card::in_slot(id, identity.clone(), (x, y), true, None);
        self.cards.insert(id, card);
        self.z_order.push(HitTarget::Card(id));
        self.events.push(SurfaceEvent::CardSpawned {
            card: id,
            identity: identity.key().to_string(),
        });
    }

    fn step_cards(&mut self) {
        let wave_rule = StepRule::decay(self.config.wave_decay, self.config.wave_epsilon);
        let ids: Vec<CardId> = self.cards.keys().copied().collect();
        let mut flips: Vec<(CardId, String, bool)> = Vec::new();
        for id in ids {
            let Some(card) = self.cards.get_mut(&id) else {
                continue;
            };
            let mut rule = wave_rule;
            let target = card.lift_target;
            let _ = rule.advance(&mut card.lift, target);
            if card.step_anim() == Some(CardAnimEvent::FlipMidpoint) {
                flips.push((id, card.identity.key().to_string(), card.face_up));
            }
        }
        for (card, identity, face_up) in flips {
            self.events.push(SurfaceEvent::CardFlipped {
                card,
                identity,
                face_up,
            });
        }
    }

    fn settle_groups(&mut self) {
        let ids: Vec<GroupId> = self.groups.keys().copied().collect();
        for id in ids {
            let phase = match self.groups.get(&id) {
                Some(group) => group.phase,
                None => continue,
            };
            let done = match phase {
                GroupPhase::Idle => false,
                GroupPhase::Dealing => !self.pending.iter().any(|scheduled| {
                    matches!(scheduled.op, DeferredOp::DealMember { group, .. } if group == id)
                }),
                GroupPhase::FlippingAll => {
                    let queued = self.pending.iter().any(|scheduled| {
                        matches!(
                            scheduled.op,
                            DeferredOp::FlipCard {
                                cascade: Some(group),
                                ..
                            } if group == id
                        )
                    });
                    !queued && self.members_settled(id, |card| card.phase != CardPhase::Flipping)
                }
                GroupPhase::Stacking | GroupPhase::Unstacking => {
                    self.members_settled(id, |card| !card.is_gliding())
                }
            };
            if !done {
                continue;
            }
            let (was_flipping, empty) = match self.groups.get_mut(&id) {
                Some(group) => {
                    let was_flipping = group.phase == GroupPhase::FlippingAll;
                    group.phase = GroupPhase::Idle;
                    group.tint = false;
                    (was_flipping, group.members.is_empty())
                }
                None => continue,
            };
            if empty {
                self.remove_group(id);
                continue;
            }
            if was_flipping {
                self.events.push(SurfaceEvent::GroupFlipped { group: id });
            }
        }
    }

    fn members_settled(&self, id: GroupId, settled: impl Fn(&Card) -> bool) -> bool {
        let Some(group) = self.groups.get(&id) else {
            return true;
        };
        group
            .members
            .iter()
            .all(|member| self.cards.get(member).map(&settled).unwrap_or(true))
    }

    // ----- internals ------------------------------------------------------

    fn alloc_card_id(&mut self) -> CardId {
        self.next_card += 1;
        CardId(self.next_card)
    }

    fn alloc_group_id(&mut self) -> GroupId {
        self.next_group += 1;
        GroupId(self.next_group)
    }

    fn raise(&mut self, target: HitTarget) {
        self.z_order.retain(|existing| *existing != target);
        self.z_order.push(target);
    }

    fn show_marker(&mut self, reason: MarkerReason) {
        self.marker = Some((reason, self.clock + self.config.marker_ticks));
        self.events.push(SurfaceEvent::Marker { reason });
    }

    fn detach_card(&mut self, id: CardId) {
        let group = match self.cards.get_mut(&id) {
            Some(card) => match card.member_of.take() {
                Some(group) => {
                    card.slot = None;
                    card.touched = true;
                    card.lift = 0.0;
                    card.lift_target = 0.0;
                    group
                }
                None => return,
            },
            None => return,
        };
        self.remove_member(group, id);
        self.events.push(SurfaceEvent::CardDetached { card: id, group });
    }

    fn remove_member(&mut self, group_id: GroupId, card: CardId) {
        let empty = {
            let Some(group) = self.groups.get_mut(&group_id) else {
                return;
            };
            group.members.retain(|member| *member != card);
            group.members.is_empty()
        };
        if empty {
            let deals_pending = self.pending.iter().any(|scheduled| {
                matches!(scheduled.op, DeferredOp::DealMember { group, .. } if group == group_id)
            });
            if !deals_pending {
                self.remove_group(group_id);
            }
            return;
        }
        // The handle re-centers beside the first remaining member.
        let first = match self.groups.get(&group_id) {
            Some(group) => group.members[0],
            None => return,
        };
        let first_slot = self
            .cards
            .get(&first)
            .map(|card| card.slot.unwrap_or((card.x, card.y)));
        if let Some(slot) = first_slot {
            if let Some(group) = self.groups.get_mut(&group_id) {
                group.reanchor(slot, &self.config);
            }
        }
    }

    fn remove_group(&mut self, id: GroupId) {
        if self.groups.remove(&id).is_none() {
            return;
        }
        self.z_order.retain(|target| *target != HitTarget::Group(id));
        self.focus.group_deleted(id);
        if let Some(active) = &self.gesture {
            if active.target == HitTarget::Group(id) {
                self.gesture = None;
            }
        }
        self.events.push(SurfaceEvent::GroupDeleted { group: id });
    }

    fn delete_card_now(&mut self, id: CardId) {
        let Some(card) = self.cards.remove(&id) else {
            return;
        };
        let burst = spawn_burst(&mut self.rng, card.x, card.visual_y(), &self.config);
        self.particles.extend(burst);
        // A live card always holds its identity, so this cannot fail.
        let _ = self.deck_box.inventory.put_back(card.identity.key());
        if let Some(group) = card.member_of {
            self.remove_member(group, id);
        }
        self.z_order.retain(|target| *target != HitTarget::Card(id));
        self.focus.card_deleted(id);
        if let Some(active) = &self.gesture {
            if active.target == HitTarget::Card(id) {
                self.gesture = None;
            }
        }
        self.events.push(SurfaceEvent::CardDeleted {
            identity: card.identity.key().to_string(),
        });
    }

    fn update_wave_targets(&mut self, pointer: Option<(f32, f32)>) {
        let mut lifted: Vec<(CardId, f32)> = Vec::new();
        if let Some((px, py)) = pointer {
            for group in self.groups.values().filter(|group| group.wave_eligible()) {
                for member in &group.members {
                    let Some(card) = self.cards.get(member) else {
                        continue;
                    };
                    if card.touched || card.phase != CardPhase::Ready {
                        continue;
                    }
                    let Some((sx, sy)) = card.slot else {
                        continue;
                    };
                    if (py - sy).abs() > self.config.wave_band {
                        continue;
                    }
                    let lift =
                        layout::wave_lift(px - sx, self.config.wave_radius, self.config.wave_height);
                    if lift > 0.0 {
                        lifted.push((*member, lift));
                    }
                }
            }
        }
        for card in self.cards.values_mut() {
            card.lift_target = 0.0;
        }
        for (id, lift) in lifted {
            if let Some(card) = self.cards.get_mut(&id) {
                card.lift_target = lift;
            }
        }
    }
}
