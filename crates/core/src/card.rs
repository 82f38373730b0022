use crate::anim::{flip_scale, Anim, Progress, StepRule};
use crate::identity::CardIdentity;
use crate::GroupId;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CardId(pub u64);

/// Card lifecycle. `Rising → Ready`; from `Ready` a card may flip or be
/// dragged, both returning to `Ready`. Deletion is terminal and allowed
/// from any non-terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardPhase {
    Rising,
    Ready,
    Flipping,
    Dragging,
}

/// What a tick of the card's animation produced, for the table to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAnimEvent {
    Rose,
    FlipMidpoint,
    FlipDone,
    GlideDone,
}

#[derive(Debug, Clone)]
pub struct Card {
    pub id: CardId,
    pub identity: CardIdentity,
    pub x: f32,
    pub y: f32,
    pub face_up: bool,
    pub member_of: Option<GroupId>,
    pub phase: CardPhase,
    pub anim: Option<Anim>,
    /// Resting slot while a spread member.
    pub slot: Option<(f32, f32)>,
    /// Set once the card has been pressed; touched members no longer wave.
    pub touched: bool,
    pub lift: f32,
    pub lift_target: f32,
}

impl Card {
    pub fn rising(id: CardId, identity: CardIdentity, x: f32, y: f32, rise_to: f32, steps: u32) -> Self {
        Self {
            id,
            identity,
            x,
            y,
            face_up: false,
            member_of: None,
            phase: CardPhase::Rising,
            anim: Some(Anim::Rise {
                target_y: rise_to,
                rule: StepRule::fixed(steps),
            }),
            slot: None,
            touched: false,
            lift: 0.0,
            lift_target: 0.0,
        }
    }

    /// A member dealt straight into its slot, already interactive.
    pub fn in_slot(
        id: CardId,
        identity: CardIdentity,
        slot: (f32, f32),
        face_up: bool,
        member_of: Option<GroupId>,
    ) -> Self {
        Self {
            id,
            identity,
            x: slot.0,
            y: slot.1,
            face_up,
            member_of,
            phase: CardPhase::Ready,
            anim: None,
            slot: Some(slot),
            touched: false,
            lift: 0.0,
            lift_target: 0.0,
        }
    }

    /// Drawn y, including the wave lift.
    pub fn visual_y(&self) -> f32 {
        self.y - self.lift
    }

    /// Width scale while flipping, 1 otherwise.
    pub fn flip_scale(&self) -> f32 {
        match self.anim {
            Some(Anim::Flip { step, total }) => flip_scale(step, total),
            _ => 1.0,
        }
    }

    pub fn begin_flip(&mut self, total: u32) {
        self.phase = CardPhase::Flipping;
        self.anim = Some(Anim::Flip {
            step: 0,
            total: total.max(2),
        });
    }

    pub fn begin_rise(&mut self, target_y: f32, steps: u32) {
        self.phase = CardPhase::Rising;
        self.anim = Some(Anim::Rise {
            target_y,
            rule: StepRule::fixed(steps),
        });
    }

    pub fn begin_glide(&mut self, target: (f32, f32), steps: u32) {
        self.anim = Some(Anim::Glide {
            target_x: target.0,
            target_y: target.1,
            rule: StepRule::fixed(steps),
        });
    }

    pub fn is_gliding(&self) -> bool {
        matches!(self.anim, Some(Anim::Glide { .. }))
    }

    /// One tick of the current animation. A card that started being dragged
    /// abandons positional animations silently.
    pub fn step_anim(&mut self) -> Option<CardAnimEvent> {
        let mut anim = self.anim.take()?;
        let (event, keep) = match &mut anim {
            Anim::Rise { target_y, rule } => {
                if self.phase == CardPhase::Dragging {
                    (None, false)
                } else {
                    let target = *target_y;
                    if rule.advance(&mut self.y, target) == Progress::Done {
                        if self.phase == CardPhase::Rising {
                            self.phase = CardPhase::Ready;
                        }
                        (Some(CardAnimEvent::Rose), false)
                    } else {
                        (None, true)
                    }
                }
            }
            Anim::Glide {
                target_x,
                target_y,
                rule,
            } => {
                if self.phase == CardPhase::Dragging {
                    (None, false)
                } else {
                    let (tx, ty) = (*target_x, *target_y);
                    if rule.advance2(&mut self.x, &mut self.y, tx, ty) == Progress::Done {
                        (Some(CardAnimEvent::GlideDone), false)
                    } else {
                        (None, true)
                    }
                }
            }
            Anim::Flip { step, total } => {
                *step += 1;
                let midpoint = *total / 2;
                if *step == midpoint {
                    self.face_up = !self.face_up;
                    (Some(CardAnimEvent::FlipMidpoint), true)
                } else if *step >= *total {
                    if self.phase == CardPhase::Flipping {
                        self.phase = CardPhase::Ready;
                    }
                    (Some(CardAnimEvent::FlipDone), false)
                } else {
                    (None, true)
                }
            }
        };
        if keep {
            self.anim = Some(anim);
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        Card::rising(CardId(1), CardIdentity::parse("spade-(7)"), 0.0, 100.0, 50.0, 4)
    }

    #[test]
    fn rise_finishes_in_ready_at_the_target() {
        let mut card = card();
        let mut event = None;
        for _ in 0..4 {
            event = card.step_anim();
        }
        assert_eq!(event, Some(CardAnimEvent::Rose));
        assert_eq!(card.phase, CardPhase::Ready);
        assert_eq!(card.y, 50.0);
        assert!(card.anim.is_none());
    }

    #[test]
    fn flip_toggles_orientation_exactly_at_the_midpoint() {
        let mut card = card();
        while card.step_anim() != Some(CardAnimEvent::Rose) {}
        card.begin_flip(10);
        for step in 1..=10 {
            let event = card.step_anim();
            match step {
                5 => {
                    assert_eq!(event, Some(CardAnimEvent::FlipMidpoint));
                    assert!(card.face_up);
                    assert_eq!(card.flip_scale(), 0.0);
                }
                10 => assert_eq!(event, Some(CardAnimEvent::FlipDone)),
                _ => assert_eq!(event, None),
            }
        }
        assert_eq!(card.phase, CardPhase::Ready);
        assert!(card.face_up);
    }

    #[test]
    fn dragging_aborts_positional_animation() {
        let mut card = card();
        card.phase = CardPhase::Dragging;
        assert_eq!(card.step_anim(), None);
        assert!(card.anim.is_none());
    }
}
