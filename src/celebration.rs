use rand::seq::SliceRandom;
use rand::Rng;

use crate::bingo::Tier;
use crate::grid::{GridPosition, CELL_COUNT};

/// Screen coordinates of the gesture that caused an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub x: u16,
    pub y: u16,
}

/// Side-effect requests raised by cells and by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// A field cell was marked.
    Mark {
        position: GridPosition,
        origin: Option<Origin>,
    },
    /// A timer cell ran down to zero.
    TimerComplete { position: GridPosition },
    Tier(Tier),
    Firework,
}

/// Fire-and-forget receiver of celebration requests.
pub trait EffectSink {
    fn fire(&mut self, effect: Effect);
}

/// Keeps every effect it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub effects: Vec<Effect>,
}

impl RecordingSink {
    pub fn tiers(&self) -> Vec<Tier> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Tier(tier) => Some(*tier),
                _ => None,
            })
            .collect()
    }
}

impl EffectSink for RecordingSink {
    fn fire(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}

/// Particle for celebration animation
#[derive(Debug, Clone)]
pub struct CelebrationParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    pub is_text: bool, // Whether this particle is part of a banner
    pub target_x: f64,
    pub target_y: f64,
}

impl CelebrationParticle {
    fn new(x: f64, y: f64, speed: f64) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: rng.gen_range(-speed..speed),
            vel_y: rng.gen_range(-(speed * 1.3)..-(speed * 0.3)),
            symbol: *['*', '+', '✦', '•', '✧', '❖', '◆']
                .choose(&mut rng)
                .unwrap_or(&'*'),
            color_index: rng.gen_range(0..5),
            age: 0.0,
            max_age: rng.gen_range(1.0..2.5),
            is_text: false,
            target_x: x,
            target_y: y,
        }
    }

    fn new_text_particle(
        x: f64,
        y: f64,
        target_x: f64,
        target_y: f64,
        symbol: char,
        color: usize,
    ) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: (target_x - x) * 1.0,
            vel_y: (target_y - y) * 1.0,
            symbol,
            color_index: color,
            age: 0.0,
            max_age: rng.gen_range(3.0..4.5),
            is_text: true,
            target_x,
            target_y,
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        if self.is_text {
            let dist_to_target =
                ((self.target_x - self.x).powi(2) + (self.target_y - self.y).powi(2)).sqrt();
            if dist_to_target > 1.0 {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_x *= 0.95;
                self.vel_y *= 0.95;
            } else {
                self.x = self.target_x;
                self.y = self.target_y;
                self.vel_x = 0.0;
                self.vel_y = 0.0;
            }
        } else {
            self.x += self.vel_x * dt;
            self.y += self.vel_y * dt;
            self.vel_y += 15.0 * dt;
        }

        self.age += dt;
        self.age < self.max_age
    }
}

/// Where effects land on screen: terminal size and the center of each cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub width: u16,
    pub height: u16,
    pub cell_centers: [(u16, u16); CELL_COUNT],
}

impl Stage {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cell_centers: [(width / 2, height / 2); CELL_COUNT],
        }
    }

    fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    fn cell_center(&self, position: GridPosition) -> (f64, f64) {
        let (x, y) = self.cell_centers[position.index()];
        (x as f64, y as f64)
    }
}

/// Terminal confetti: small bursts for marks, banners for tiers.
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<CelebrationParticle>,
    pub enabled: bool,
    pub stage: Stage,
}

impl CelebrationAnimation {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            enabled: true,
            stage: Stage::new(80, 24),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn set_stage(&mut self, stage: Stage) {
        self.stage = stage;
    }

    pub fn burst(&mut self, x: f64, y: f64, count: usize, speed: f64) {
        for _ in 0..count {
            self.particles.push(CelebrationParticle::new(x, y, speed));
        }
    }

    pub fn banner(&mut self, text: &str, decorations: usize) {
        let mut rng = rand::thread_rng();
        let (center_x, center_y) = self.stage.center();

        self.create_text_particles(text, center_x, center_y, &mut rng);

        for _ in 0..decorations {
            let offset_x = rng.gen_range(-15.0..15.0);
            let offset_y = rng.gen_range(-8.0..8.0);
            self.particles.push(CelebrationParticle::new(
                center_x + offset_x,
                center_y + offset_y,
                3.0,
            ));
        }
    }

    fn firework(&mut self) {
        let mut rng = rand::thread_rng();
        let width = self.stage.width.max(1) as f64;
        let height = self.stage.height.max(1) as f64;
        for _ in 0..8 {
            let x = if rng.gen_bool(0.5) {
                rng.gen_range(0.1..0.3) * width
            } else {
                rng.gen_range(0.7..0.9) * width
            };
            let y = rng.gen_range(0.1..0.6) * height;
            self.burst(x, y, 20, 5.0);
        }
    }

    fn create_text_particles(
        &mut self,
        text: &str,
        center_x: f64,
        center_y: f64,
        rng: &mut rand::rngs::ThreadRng,
    ) {
        let char_width = 2.0;
        let text_width = (text.chars().count() as f64 - 1.0) * char_width;
        let start_x = center_x - text_width / 2.0;

        for (i, ch) in text.chars().enumerate() {
            if ch != ' ' {
                let target_x = start_x + (i as f64 * char_width);
                let target_y = center_y - 2.0;

                let start_x = center_x + rng.gen_range(-10.0..10.0);
                let start_y = center_y + rng.gen_range(-5.0..5.0);

                let color = rng.gen_range(0..5);

                self.particles.push(CelebrationParticle::new_text_particle(
                    start_x, start_y, target_x, target_y, ch, color,
                ));
            }
        }
    }

    /// Advances every particle by one 100ms frame.
    pub fn update(&mut self) {
        if self.particles.is_empty() {
            return;
        }

        let dt = 0.1;
        let width = self.stage.width as f64;
        let height = self.stage.height as f64;
        self.particles.retain_mut(|particle| {
            let still_alive = particle.update(dt);

            if !particle.is_text {
                let buffer = 5.0;
                let off_screen = particle.y > height + buffer
                    || particle.x < -buffer
                    || particle.x > width + buffer;
                still_alive && !off_screen
            } else {
                still_alive
            }
        });
    }
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectSink for CelebrationAnimation {
    fn fire(&mut self, effect: Effect) {
        if !self.enabled {
            return;
        }
        match effect {
            Effect::Mark { position, origin } => {
                let (x, y) = origin
                    .map(|o| (o.x as f64, o.y as f64))
                    .unwrap_or_else(|| self.stage.cell_center(position));
                self.burst(x, y, 10, 2.0);
            }
            Effect::TimerComplete { position } => {
                let (x, y) = self.stage.cell_center(position);
                self.burst(x, y, 15, 2.5);
            }
            Effect::Tier(tier) => {
                let decorations = match tier {
                    Tier::OneLine => 25,
                    Tier::TwoLines => 40,
                    Tier::FullHouse => 80,
                };
                self.banner(tier.banner(), decorations);
            }
            Effect::Firework => self.firework(),
        }
    }
}
