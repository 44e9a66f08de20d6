use eframe::egui::{Painter, Pos2, Stroke, Vec2, vec2};
use rand::Rng;

use crate::theme::Palette;

use super::render_utils::{fade, mix};

const AREA_PER_PARTICLE: f32 = 12_000.0;
const MIN_PARTICLES: usize = 20;
const MAX_PARTICLES: usize = 50;
const LINK_DISTANCE: f32 = 150.0;

struct Particle {
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    phase: f32,
}

/// Decorative, data-free particle field behind the topology graph. Same
/// integrator family as the main simulation, much simpler rules: drift,
/// bounce off the edges, link nearby pairs. Shares only the motion flag and
/// the palette with the rest of the view.
pub(in crate::app) struct AmbientField {
    particles: Vec<Particle>,
    size: Vec2,
}

impl AmbientField {
    pub(in crate::app) fn new() -> Self {
        Self {
            particles: Vec::new(),
            size: Vec2::ZERO,
        }
    }

    /// Reseeds when the view size actually changes, which coalesces resize
    /// bursts into a single reflow.
    pub(in crate::app) fn ensure_size(&mut self, size: Vec2) {
        if (size - self.size).length() <= 1.0 && !self.particles.is_empty() {
            return;
        }
        self.size = size;
        self.reseed();
    }

    fn reseed(&mut self) {
        let mut rng = rand::thread_rng();
        let count = ((self.size.x * self.size.y / AREA_PER_PARTICLE) as usize)
            .clamp(MIN_PARTICLES, MAX_PARTICLES);
        self.particles = (0..count)
            .map(|_| Particle {
                pos: vec2(
                    rng.gen_range(0.0..=self.size.x.max(1.0)),
                    rng.gen_range(0.0..=self.size.y.max(1.0)),
                ),
                vel: vec2(
                    (rng.gen_range(0.0..1.0) - 0.5) * 0.3,
                    (rng.gen_range(0.0..1.0) - 0.5) * 0.3,
                ),
                radius: 1.0 + rng.gen_range(0.0..2.0),
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
            })
            .collect();
    }

    pub(in crate::app) fn step(&mut self) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            if particle.pos.x < 0.0 || particle.pos.x > self.size.x {
                particle.vel.x = -particle.vel.x;
            }
            if particle.pos.y < 0.0 || particle.pos.y > self.size.y {
                particle.vel.y = -particle.vel.y;
            }
        }
    }

    pub(in crate::app) fn draw(&self, painter: &Painter, origin: Pos2, palette: &Palette, time: f32) {
        let link_color = mix(palette.mesh_line_a, palette.mesh_line_b, 0.5);

        for (i, particle) in self.particles.iter().enumerate() {
            for other in &self.particles[i + 1..] {
                let distance = (particle.pos - other.pos).length();
                if distance >= LINK_DISTANCE {
                    continue;
                }
                let strength = 1.0 - distance / LINK_DISTANCE;
                painter.line_segment(
                    [origin + particle.pos, origin + other.pos],
                    Stroke::new(1.0, fade(link_color, strength)),
                );
            }
        }

        for particle in &self.particles {
            let pulse = 1.0 + (time * 2.0 + particle.phase).sin() * 0.3;
            let radius = particle.radius * pulse;
            let center = origin + particle.pos;

            painter.circle_filled(center, radius * 4.0, fade(palette.mesh_glow, 0.25));
            painter.circle_filled(center, radius * 2.0, fade(palette.mesh_glow, 0.5));
            painter.circle_filled(center, radius, palette.mesh_node);
        }
    }

    #[cfg(test)]
    fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_count_tracks_area_within_the_band() {
        let mut field = AmbientField::new();

        field.ensure_size(vec2(100.0, 100.0));
        assert_eq!(field.particle_count(), MIN_PARTICLES);

        field.ensure_size(vec2(600.0, 600.0));
        assert_eq!(field.particle_count(), 30);

        field.ensure_size(vec2(4000.0, 4000.0));
        assert_eq!(field.particle_count(), MAX_PARTICLES);
    }

    #[test]
    fn unchanged_size_does_not_reseed() {
        let mut field = AmbientField::new();
        field.ensure_size(vec2(600.0, 600.0));
        let positions = field.particles.iter().map(|p| p.pos).collect::<Vec<_>>();

        field.ensure_size(vec2(600.4, 600.0));
        let after = field.particles.iter().map(|p| p.pos).collect::<Vec<_>>();
        assert_eq!(positions, after);
    }

    #[test]
    fn boundary_contact_inverts_velocity() {
        let mut field = AmbientField::new();
        field.ensure_size(vec2(200.0, 200.0));
        field.particles[0].pos = vec2(199.9, 100.0);
        field.particles[0].vel = vec2(0.2, 0.0);

        field.step();
        assert_eq!(field.particles[0].vel, vec2(-0.2, 0.0));

        field.particles[1].pos = vec2(100.0, 0.05);
        field.particles[1].vel = vec2(0.0, -0.1);
        field.step();
        assert_eq!(field.particles[1].vel, vec2(0.0, 0.1));
    }
}
