use serde::{Deserialize, Serialize};

/// Every tunable of the surface. Step counts and intervals are measured in
/// ticks of `Table::tick`; distances are in surface units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub card_w: f32,
    pub card_h: f32,
    pub box_w: f32,
    pub box_h: f32,
    pub handle_radius: f32,

    /// Euclidean press-to-pointer distance at which a gesture becomes a
    /// drag. The boundary is inclusive on the drag side.
    pub drag_threshold: f32,

    /// Horizontal offset between adjacent spread members.
    pub ribbon_spacing: f32,
    /// Horizontal offset between adjacent cards in a list-by-rank row.
    pub row_spacing: f32,
    /// Vertical bias of spread rows below the viewport center.
    pub spread_y_bias: f32,

    /// Rise-on-spawn travel and step count.
    pub rise_height: f32,
    pub rise_steps: u32,
    /// Rise applied when a member detaches from its spread.
    pub detach_rise: f32,
    /// Ticks between a detach and the re-issued flip.
    pub detach_flip_delay: u64,

    pub flip_steps: u32,
    /// Flip-all cascades use a calmer, longer flip.
    pub flip_steps_group: u32,

    pub stack_steps: u32,

    pub deal_stagger: u64,
    pub delete_stagger: u64,
    pub flip_stagger: u64,
    pub row_stagger: u64,

    pub wave_radius: f32,
    pub wave_height: f32,
    /// Vertical band around a spread's baseline inside which the wave reacts.
    pub wave_band: f32,
    pub wave_decay: f32,
    pub wave_epsilon: f32,

    pub burst_count: u32,
    pub burst_speed_min: f32,
    pub burst_speed_max: f32,
    pub burst_life_min: u32,
    pub burst_life_max: u32,

    /// How long the "unavailable" marker stays visible.
    pub marker_ticks: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            card_w: 74.0,
            card_h: 111.0,
            box_w: 80.0,
            box_h: 120.0,
            handle_radius: 20.0,
            drag_threshold: 5.0,
            ribbon_spacing: 20.0,
            row_spacing: 100.0,
            spread_y_bias: 81.0,
            rise_height: 130.0,
            rise_steps: 12,
            detach_rise: 150.0,
            detach_flip_delay: 12,
            flip_steps: 10,
            flip_steps_group: 16,
            stack_steps: 10,
            deal_stagger: 2,
            delete_stagger: 2,
            flip_stagger: 2,
            row_stagger: 3,
            wave_radius: 60.0,
            wave_height: 15.0,
            wave_band: 100.0,
            wave_decay: 0.3,
            wave_epsilon: 0.5,
            burst_count: 15,
            burst_speed_min: 10.0,
            burst_speed_max: 70.0,
            burst_life_min: 17,
            burst_life_max: 33,
            marker_ticks: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = TableConfig::default();
        assert!(config.drag_threshold > 0.0);
        assert!(config.flip_steps >= 2 && config.flip_steps % 2 == 0);
        assert!(config.flip_steps_group >= config.flip_steps);
        assert!(config.burst_life_min < config.burst_life_max);
    }
}
