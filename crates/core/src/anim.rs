//! Stepped interpolation rules. Every visible motion on the surface is one
//! of these two update rules, advanced once per `Table::tick`. Liveness
//! (owner deleted, owner started dragging) is checked by the caller before
//! each step; the rules themselves only move numbers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepRule {
    /// `value += (target − value) / divisor` for a bounded number of ticks,
    /// then the value snaps exactly to the target.
    FixedStep { divisor: f32, remaining: u32 },
    /// `value += (target − value) × factor` until the error drops below
    /// epsilon, then snap and stop.
    Decay { factor: f32, epsilon: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    Done,
}

impl StepRule {
    pub fn fixed(steps: u32) -> Self {
        let steps = steps.max(1);
        Self::FixedStep {
            divisor: steps as f32,
            remaining: steps,
        }
    }

    pub fn decay(factor: f32, epsilon: f32) -> Self {
        Self::Decay { factor, epsilon }
    }

    pub fn advance(&mut self, current: &mut f32, target: f32) -> Progress {
        match self {
            Self::FixedStep { divisor, remaining } => {
                if *remaining <= 1 {
                    *current = target;
                    Progress::Done
                } else {
                    *current += (target - *current) / *divisor;
                    *remaining -= 1;
                    Progress::Running
                }
            }
            Self::Decay { factor, epsilon } => {
                if (target - *current).abs() < *epsilon {
                    *current = target;
                    Progress::Done
                } else {
                    *current += (target - *current) * *factor;
                    Progress::Running
                }
            }
        }
    }

    /// Advances both coordinates under one shared step budget.
    pub fn advance2(&mut self, x: &mut f32, y: &mut f32, tx: f32, ty: f32) -> Progress {
        match self {
            Self::FixedStep { divisor, remaining } => {
                if *remaining <= 1 {
                    *x = tx;
                    *y = ty;
                    Progress::Done
                } else {
                    *x += (tx - *x) / *divisor;
                    *y += (ty - *y) / *divisor;
                    *remaining -= 1;
                    Progress::Running
                }
            }
            Self::Decay { factor, epsilon } => {
                if (tx - *x).abs() < *epsilon && (ty - *y).abs() < *epsilon {
                    *x = tx;
                    *y = ty;
                    Progress::Done
                } else {
                    *x += (tx - *x) * *factor;
                    *y += (ty - *y) * *factor;
                    Progress::Running
                }
            }
        }
    }
}

/// A card's current animation. At most one per card; conflicting requests
/// are rejected by the card's phase, not queued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anim {
    /// Vertical rise to a target y (spawn entry, detach lift).
    Rise { target_y: f32, rule: StepRule },
    /// Two-axis glide to a fixed point (stack, unstack, row re-centering).
    Glide {
        target_x: f32,
        target_y: f32,
        rule: StepRule,
    },
    /// Horizontal squeeze-and-regrow; orientation toggles at the midpoint.
    Flip { step: u32, total: u32 },
}

/// Width scale of a flipping card: 1 at rest, 0 exactly at the midpoint.
pub fn flip_scale(step: u32, total: u32) -> f32 {
    let half = (total / 2).max(1) as f32;
    let step = step as f32;
    if step <= half {
        1.0 - step / half
    } else {
        ((step - half) / half).min(1.0)
    }
}
