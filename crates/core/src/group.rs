use crate::config::TableConfig;
use crate::layout;
use crate::CardId;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GroupId(pub u64);

/// Group-level busy state. Conflicting operations are rejected while any
/// non-idle phase is active, never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupPhase {
    /// Members are still cascading in.
    Dealing,
    Idle,
    FlippingAll,
    Stacking,
    Unstacking,
}

#[derive(Debug, Clone)]
pub struct Group {
    pub id: GroupId,
    pub anchor_x: f32,
    pub anchor_y: f32,
    /// Live members in spread order.
    pub members: Vec<CardId>,
    pub phase: GroupPhase,
    pub stacked: bool,
    /// Face policy applied when members were dealt.
    pub face_up: bool,
    /// First slot of the spread; slot i sits `i × spacing` to the right.
    pub origin_x: f32,
    pub baseline_y: f32,
    pub spacing: f32,
    /// Handle tint while a flip-all cascade runs.
    pub tint: bool,
}

impl Group {
    pub fn new(
        id: GroupId,
        first_slot: (f32, f32),
        spacing: f32,
        face_up: bool,
        config: &TableConfig,
    ) -> Self {
        let (anchor_x, anchor_y) = layout::handle_anchor(first_slot, config);
        Self {
            id,
            anchor_x,
            anchor_y,
            members: Vec::new(),
            phase: GroupPhase::Dealing,
            stacked: false,
            face_up,
            origin_x: first_slot.0,
            baseline_y: first_slot.1,
            spacing,
            tint: false,
        }
    }

    pub fn slot_for(&self, index: usize) -> (f32, f32) {
        layout::slot_at(self.origin_x, self.baseline_y, index, self.spacing)
    }

    pub fn stack_point(&self, config: &TableConfig) -> (f32, f32) {
        layout::stack_point((self.anchor_x, self.anchor_y), config)
    }

    pub fn is_busy(&self) -> bool {
        self.phase != GroupPhase::Idle
    }

    /// Rigid translation of the whole arrangement (handle drag).
    pub fn shift(&mut self, dx: f32, dy: f32) {
        self.anchor_x += dx;
        self.anchor_y += dy;
        self.origin_x += dx;
        self.baseline_y += dy;
    }

    /// Re-anchors the handle beside the given member slot after a removal.
    pub fn reanchor(&mut self, first_slot: (f32, f32), config: &TableConfig) {
        let (x, y) = layout::handle_anchor(first_slot, config);
        self.anchor_x = x;
        self.anchor_y = y;
    }

    /// Whether hover motion should wave this group's members.
    pub fn wave_eligible(&self) -> bool {
        self.phase == GroupPhase::Idle && !self.stacked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_march_right_from_the_origin() {
        let config = TableConfig::default();
        let group = Group::new(GroupId(1), (100.0, 400.0), 20.0, false, &config);
        assert_eq!(group.slot_for(0), (100.0, 400.0));
        assert_eq!(group.slot_for(3), (160.0, 400.0));
    }

    #[test]
    fn shift_moves_anchor_and_slots_together() {
        let config = TableConfig::default();
        let mut group = Group::new(GroupId(1), (100.0, 400.0), 20.0, false, &config);
        let handle_before = (group.anchor_x, group.anchor_y);
        group.shift(30.0, -10.0);
        assert_eq!(group.slot_for(0), (130.0, 390.0));
        assert_eq!(group.anchor_x, handle_before.0 + 30.0);
        assert_eq!(group.anchor_y, handle_before.1 - 10.0);
    }

    #[test]
    fn wave_requires_an_idle_unstacked_group() {
        let config = TableConfig::default();
        let mut group = Group::new(GroupId(1), (100.0, 400.0), 20.0, false, &config);
        assert!(!group.wave_eligible());
        group.phase = GroupPhase::Idle;
        assert!(group.wave_eligible());
        group.stacked = true;
        assert!(!group.wave_eligible());
    }
}
