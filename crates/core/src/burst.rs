//! The radial glyph burst a card leaves behind when deleted. Particles are
//! pure state; the renderer decides what a glyph looks like.

use crate::config::TableConfig;
use crate::rng::RngState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    dx: f32,
    dy: f32,
    age: u32,
    life: u32,
    /// Small random value the renderer maps to a glyph/tint variant.
    pub variant: u8,
}

impl Particle {
    /// Advances one tick; returns false once the particle has expired.
    pub fn step(&mut self) -> bool {
        let damp = 10.0 + 2.0 * self.age as f32;
        self.x += self.dx / damp;
        self.y += self.dy / damp;
        self.age += 1;
        self.age < self.life
    }

    /// Remaining fraction of the particle's lifetime, 1 at birth.
    pub fn vitality(&self) -> f32 {
        1.0 - self.age as f32 / self.life.max(1) as f32
    }
}

pub fn spawn_burst(rng: &mut RngState, x: f32, y: f32, config: &TableConfig) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(config.burst_count as usize);
    for _ in 0..config.burst_count {
        let angle = rng.range_f32(0.0, std::f32::consts::TAU);
        let speed = rng.range_f32(config.burst_speed_min, config.burst_speed_max);
        particles.push(Particle {
            x,
            y,
            dx: angle.cos() * speed,
            dy: angle.sin() * speed,
            age: 0,
            life: rng.range_u32(config.burst_life_min, config.burst_life_max).max(1),
            variant: (rng.next_u64() % 3) as u8,
        });
    }
    particles
}
