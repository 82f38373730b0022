//! Slot math for spreads, rows, stacks and the hover wave. Pure functions
//! of the config and viewport.

use crate::config::TableConfig;

/// Leftmost slot x for `count` cards spaced `spacing` apart, centered on a
/// viewport of width `viewport_w`.
pub fn centered_origin(count: usize, spacing: f32, viewport_w: f32, card_w: f32) -> f32 {
    let total = card_w + count.saturating_sub(1) as f32 * spacing;
    (viewport_w - total) / 2.0 + card_w / 2.0
}

/// Baseline y for spreads and rows, biased below the viewport center.
pub fn baseline_y(viewport_h: f32, config: &TableConfig) -> f32 {
    viewport_h / 2.0 + config.card_h / 2.0 + config.spread_y_bias
}

pub fn slot_at(origin_x: f32, baseline: f32, index: usize, spacing: f32) -> (f32, f32) {
    (origin_x + index as f32 * spacing, baseline)
}

/// The group handle sits to the left of the first slot.
pub fn handle_anchor(first_slot: (f32, f32), config: &TableConfig) -> (f32, f32) {
    (
        first_slot.0 - config.card_w / 2.0 - config.handle_radius - 10.0,
        first_slot.1,
    )
}

/// The single shared position members collapse to when stacked, tucked
/// just behind the handle.
pub fn stack_point(anchor: (f32, f32), config: &TableConfig) -> (f32, f32) {
    (
        anchor.0 + config.handle_radius + config.card_w / 2.0 + 10.0,
        anchor.1,
    )
}

/// Cosine-falloff lift: maximum directly under the pointer, exactly zero at
/// the radius edge and beyond.
pub fn wave_lift(dx: f32, radius: f32, height: f32) -> f32 {
    let dx = dx.abs();
    if dx >= radius || radius <= 0.0 {
        return 0.0;
    }
    height * 0.5 * (1.0 + (std::f32::consts::PI * dx / radius).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_card_centers_on_the_viewport() {
        let x = centered_origin(1, 20.0, 1000.0, 74.0);
        assert!((x - 500.0).abs() < 1e-3);
    }

    #[test]
    fn spread_is_symmetric_about_the_center() {
        let config = TableConfig::default();
        let origin = centered_origin(5, config.ribbon_spacing, 1280.0, config.card_w);
        let first = slot_at(origin, 0.0, 0, config.ribbon_spacing).0;
        let last = slot_at(origin, 0.0, 4, config.ribbon_spacing).0;
        assert!(((first + last) / 2.0 - 640.0).abs() < 1e-3);
    }

    #[test]
    fn wave_lift_peaks_under_the_pointer_and_dies_at_the_edge() {
        assert_eq!(wave_lift(0.0, 60.0, 15.0), 15.0);
        assert_eq!(wave_lift(60.0, 60.0, 15.0), 0.0);
        assert_eq!(wave_lift(-80.0, 60.0, 15.0), 0.0);
        let near = wave_lift(10.0, 60.0, 15.0);
        let far = wave_lift(50.0, 60.0, 15.0);
        assert!(near > far && far > 0.0);
    }
}
