//! Bubbles - the main game objects, and their lifecycle.
//!
//! A bubble rests in a grid cell until it is matched or blasted (it explodes
//! after an optional delay) or cut off from the ceiling (it falls). Both
//! paths end with the bubble being removed from the simulation.

use bevy::prelude::*;
use rand::Rng;

use super::{error::SimError, hex::HexCoord};
use crate::config::GameConfig;

/// Particles spawned when a plain bubble pops.
pub const POP_BURST: u32 = 20;
/// Particles spawned when a bomb pops.
pub const BOMB_BURST: u32 = 40;
/// Particles spawned when a falling bubble hits the bottom.
pub const LANDING_BURST: u32 = 20;
/// Ticks the pop animation lasts once the delay has run out.
pub const EXPLOSION_FRAMES: u32 = 15;

/// The different bubble colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Default)]
pub enum BubbleColor {
    #[default]
    Green,
    Red,
    Blue,
    Yellow,
    Purple,
    Cyan,
}

impl BubbleColor {
    /// Get all possible bubble colors, in palette order.
    pub const ALL: [BubbleColor; 6] = [
        BubbleColor::Green,
        BubbleColor::Red,
        BubbleColor::Blue,
        BubbleColor::Yellow,
        BubbleColor::Purple,
        BubbleColor::Cyan,
    ];

    /// Get the actual color for rendering.
    pub fn to_color(self) -> Color {
        match self {
            BubbleColor::Green => Color::srgb(0.0, 1.0, 0.0),
            BubbleColor::Red => Color::srgb(1.0, 0.0, 0.0),
            BubbleColor::Blue => Color::srgb(0.0, 0.0, 1.0),
            BubbleColor::Yellow => Color::srgb(1.0, 1.0, 0.0),
            BubbleColor::Purple => Color::srgb(0.5, 0.0, 0.5),
            BubbleColor::Cyan => Color::srgb(0.0, 1.0, 1.0),
        }
    }

    /// Get a random bubble color.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Stone bubbles render grey.
pub const STONE_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);

/// What a bubble is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum BubbleKind {
    Plain(BubbleColor),
    /// Matches its color like a plain bubble; blasts every neighbor when it pops.
    Bomb(BubbleColor),
    /// Never matches. Only blasts and floating detection remove it.
    Stone,
}

impl BubbleKind {
    /// The palette color, if the bubble has one.
    pub fn color(self) -> Option<BubbleColor> {
        match self {
            BubbleKind::Plain(color) | BubbleKind::Bomb(color) => Some(color),
            BubbleKind::Stone => None,
        }
    }

    pub fn is_bomb(self) -> bool {
        matches!(self, BubbleKind::Bomb(_))
    }

    pub fn is_stone(self) -> bool {
        matches!(self, BubbleKind::Stone)
    }

    /// Whether two bubbles join the same color group.
    pub fn matches(self, other: BubbleKind) -> bool {
        match (self.color(), other.color()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Render tint.
    pub fn tint(self) -> Color {
        self.color().map_or(STONE_COLOR, BubbleColor::to_color)
    }

    /// Generate a random bubble for the starting layout.
    ///
    /// The ceiling row never holds stones so the structure always has anchors.
    pub fn random(rng: &mut impl Rng, row: i32, config: &GameConfig) -> Self {
        if row != 0 && rng.random_bool(config.stone_probability) {
            return BubbleKind::Stone;
        }

        let color = BubbleColor::random(rng);
        if rng.random_bool(config.bomb_probability) {
            BubbleKind::Bomb(color)
        } else {
            BubbleKind::Plain(color)
        }
    }
}

/// Stable per-grid bubble identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct BubbleId(pub u32);

impl std::fmt::Display for BubbleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a bubble is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BubbleState {
    Resting,
    Exploding {
        /// Ticks left before the pop animation starts.
        delay: u32,
        /// Ticks of pop animation played so far.
        frame: u32,
        /// Whether the particle burst was already announced.
        burst_emitted: bool,
    },
    Falling {
        velocity: f32,
    },
}

impl BubbleState {
    pub fn name(&self) -> &'static str {
        match self {
            BubbleState::Resting => "resting",
            BubbleState::Exploding { .. } => "exploding",
            BubbleState::Falling { .. } => "falling",
        }
    }
}

/// Something a bubble reports while ticking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleEvent {
    /// The pop animation started: spawn particles.
    Burst {
        position: Vec2,
        color: Color,
        count: u32,
    },
    /// The pop animation finished: remove the bubble.
    Popped,
    /// A falling bubble passed the bottom: score it and remove it.
    Landed { x: f32, color: Color },
}

/// A bubble in the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: BubbleId,
    pub kind: BubbleKind,
    /// The cell this bubble was placed in.
    pub coord: HexCoord,
    /// Pixel center; follows `coord` while resting.
    pub position: Vec2,
    pub state: BubbleState,
}

impl Bubble {
    pub fn new(id: BubbleId, kind: BubbleKind, coord: HexCoord, radius: f32) -> Self {
        Self {
            id,
            kind,
            coord,
            position: coord.to_pixel(radius),
            state: BubbleState::Resting,
        }
    }

    pub fn is_resting(&self) -> bool {
        matches!(self.state, BubbleState::Resting)
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.state, BubbleState::Exploding { .. })
    }

    pub fn is_falling(&self) -> bool {
        matches!(self.state, BubbleState::Falling { .. })
    }

    /// Pop animation progress in `[0, 1]`, if exploding.
    pub fn explosion_progress(&self) -> Option<f32> {
        match self.state {
            BubbleState::Exploding { frame, .. } => {
                Some((frame as f32 / EXPLOSION_FRAMES as f32).min(1.0))
            }
            _ => None,
        }
    }

    /// Resting -> Exploding.
    pub fn start_explosion(&mut self, delay: u32) -> Result<(), SimError> {
        self.transition("exploding")?;
        self.state = BubbleState::Exploding {
            delay,
            frame: 0,
            burst_emitted: false,
        };
        Ok(())
    }

    /// Resting -> Falling.
    pub fn start_falling(&mut self) -> Result<(), SimError> {
        self.transition("falling")?;
        self.state = BubbleState::Falling { velocity: 0.0 };
        Ok(())
    }

    fn transition(&self, to: &'static str) -> Result<(), SimError> {
        if self.is_resting() {
            Ok(())
        } else {
            Err(SimError::InvalidTransition {
                id: self.id,
                from: self.state.name(),
                to,
            })
        }
    }

    /// Advance this bubble by one tick.
    pub fn tick(&mut self, config: &GameConfig) -> Option<LifecycleEvent> {
        match &mut self.state {
            BubbleState::Resting => None,
            BubbleState::Exploding {
                delay,
                frame,
                burst_emitted,
            } => {
                if *delay > 0 {
                    *delay -= 1;
                    return None;
                }

                if !*burst_emitted {
                    *burst_emitted = true;
                    let (color, count) = if self.kind.is_bomb() {
                        (Color::WHITE, BOMB_BURST)
                    } else {
                        (self.kind.tint(), POP_BURST)
                    };
                    return Some(LifecycleEvent::Burst {
                        position: self.position,
                        color,
                        count,
                    });
                }

                *frame += 1;
                (*frame >= EXPLOSION_FRAMES).then_some(LifecycleEvent::Popped)
            }
            BubbleState::Falling { velocity } => {
                *velocity += config.fall_gravity;
                self.position.y += *velocity;

                (self.position.y > config.height + config.bubble_radius).then(|| {
                    LifecycleEvent::Landed {
                        x: self.position.x,
                        color: self.kind.tint(),
                    }
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bubble(kind: BubbleKind) -> Bubble {
        Bubble::new(BubbleId(1), kind, HexCoord::new(2, 3), 20.0)
    }

    #[test]
    fn resting_position_follows_coord() {
        let b = bubble(BubbleKind::Plain(BubbleColor::Red));
        assert_eq!(b.position, HexCoord::new(2, 3).to_pixel(20.0));
        assert!(b.is_resting());
    }

    #[test]
    fn stone_never_matches() {
        assert!(!BubbleKind::Stone.matches(BubbleKind::Stone));
        assert!(!BubbleKind::Stone.matches(BubbleKind::Plain(BubbleColor::Red)));
        assert!(BubbleKind::Bomb(BubbleColor::Red).matches(BubbleKind::Plain(BubbleColor::Red)));
        assert!(!BubbleKind::Plain(BubbleColor::Blue).matches(BubbleKind::Plain(BubbleColor::Red)));
    }

    #[test]
    fn explosion_waits_for_delay_then_bursts_then_pops() {
        let config = GameConfig::default();
        let mut b = bubble(BubbleKind::Plain(BubbleColor::Blue));
        b.start_explosion(2).unwrap();

        assert_eq!(b.tick(&config), None);
        assert_eq!(b.tick(&config), None);
        assert_eq!(
            b.tick(&config),
            Some(LifecycleEvent::Burst {
                position: b.position,
                color: BubbleColor::Blue.to_color(),
                count: POP_BURST,
            })
        );

        for _ in 1..EXPLOSION_FRAMES {
            assert_eq!(b.tick(&config), None);
        }
        assert_eq!(b.tick(&config), Some(LifecycleEvent::Popped));
    }

    #[test]
    fn bomb_burst_is_white_and_bigger() {
        let config = GameConfig::default();
        let mut b = bubble(BubbleKind::Bomb(BubbleColor::Green));
        b.start_explosion(0).unwrap();

        match b.tick(&config) {
            Some(LifecycleEvent::Burst { color, count, .. }) => {
                assert_eq!(color, Color::WHITE);
                assert_eq!(count, BOMB_BURST);
            }
            other => panic!("expected a burst, got {other:?}"),
        }
    }

    #[test]
    fn falling_accelerates_until_it_lands() {
        let config = GameConfig::default();
        let mut b = bubble(BubbleKind::Stone);
        b.start_falling().unwrap();

        let start = b.position.y;
        assert_eq!(b.tick(&config), None);
        let first_step = b.position.y - start;
        assert_eq!(b.tick(&config), None);
        let second_step = b.position.y - start - first_step;
        assert!(second_step > first_step);

        let mut landed = None;
        for _ in 0..500 {
            if let Some(event) = b.tick(&config) {
                landed = Some(event);
                break;
            }
        }
        assert!(matches!(landed, Some(LifecycleEvent::Landed { color, .. }) if color == STONE_COLOR));
        assert!(b.position.y > config.height + config.bubble_radius);
    }

    #[test]
    fn transitions_only_leave_resting() {
        let mut b = bubble(BubbleKind::Plain(BubbleColor::Red));
        b.start_falling().unwrap();
        assert_eq!(
            b.start_explosion(0),
            Err(SimError::InvalidTransition {
                id: BubbleId(1),
                from: "falling",
                to: "exploding",
            })
        );
        assert!(b.start_falling().is_err());
    }

    #[test]
    fn ceiling_row_never_rolls_stone() {
        let config = GameConfig {
            stone_probability: 1.0,
            ..default()
        };
        let mut rng = rand::rng();
        for _ in 0..50 {
            assert!(!BubbleKind::random(&mut rng, 0, &config).is_stone());
            assert!(BubbleKind::random(&mut rng, 1, &config).is_stone());
        }
    }
}
