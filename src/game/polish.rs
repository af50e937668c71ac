//! Game polish/juice effects - particles, screen shake, playfield drawing and HUD.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use super::{
    SimulationSystems,
    bubble::BOMB_BURST,
    session::GameSession,
    state::{FrameEvent, GameStatus},
    to_world,
};
use crate::{config::GameConfig, theme::palette};

pub(super) fn plugin(app: &mut App) {
    // Particles
    app.init_resource::<Particles>();
    app.add_systems(
        FixedUpdate,
        (spawn_particles, update_particles)
            .chain()
            .after(SimulationSystems),
    );

    // Screen shake
    app.init_resource::<ScreenShake>();
    app.add_systems(Update, (trigger_shake_on_bombs, apply_screen_shake).chain());

    // Playfield
    app.add_systems(Update, (draw_playfield, draw_particles));

    // HUD
    app.add_systems(Startup, spawn_hud);
    app.add_systems(Update, update_hud);
}

// =============================================================================
// PARTICLES
// =============================================================================

/// Downward acceleration per tick.
const PARTICLE_GRAVITY: f32 = 0.1;
/// Velocity kept (and reversed) when bouncing off a border.
const BOUNCE_DAMPING: f32 = 0.8;

/// A cosmetic spark, simulated in playfield pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Color,
    pub radius: f32,
    initial_radius: f32,
    life: u32,
    max_life: u32,
}

impl Particle {
    /// A particle flying off in a random direction.
    pub fn random(position: Vec2, color: Color, rng: &mut impl Rng) -> Self {
        let initial_radius = rng.random_range(2..=5) as f32;
        let speed = rng.random_range(1.0..3.0);
        let angle = rng.random_range(0.0..TAU);
        let life = rng.random_range(45..=105);

        Self {
            position,
            velocity: Vec2::from_angle(angle) * speed,
            color,
            radius: initial_radius,
            initial_radius,
            life,
            max_life: life,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Advance one tick. The radius shrinks with the remaining life.
    pub fn update(&mut self, width: f32, height: f32) {
        self.position += self.velocity;
        self.velocity.y += PARTICLE_GRAVITY;
        self.life = self.life.saturating_sub(1);
        self.radius = self.initial_radius * self.life as f32 / self.max_life as f32;

        if self.position.x <= self.radius || self.position.x >= width - self.radius {
            self.velocity.x *= -BOUNCE_DAMPING;
        }
        if self.position.y <= self.radius || self.position.y >= height - self.radius {
            self.velocity.y *= -BOUNCE_DAMPING;
            self.position.y = self.position.y.max(self.radius).min(height - self.radius);
        }
    }
}

/// All live particles.
#[derive(Resource, Debug, Default)]
pub struct Particles(pub Vec<Particle>);

/// Spawn particle bursts announced by the last tick.
fn spawn_particles(mut frame_events: MessageReader<FrameEvent>, mut particles: ResMut<Particles>) {
    let mut rng = rand::rng();

    for event in frame_events.read() {
        match *event {
            FrameEvent::ParticleBurst {
                position,
                color,
                count,
            } => {
                particles
                    .0
                    .extend((0..count).map(|_| Particle::random(position, color, &mut rng)));
            }
            // A fresh game starts without leftover sparks.
            FrameEvent::StatusChanged(GameStatus::Playing) => particles.0.clear(),
            _ => {}
        }
    }
}

fn update_particles(config: Res<GameConfig>, mut particles: ResMut<Particles>) {
    for particle in &mut particles.0 {
        particle.update(config.width, config.height);
    }
    particles.0.retain(Particle::is_alive);
}

fn draw_particles(mut gizmos: Gizmos, config: Res<GameConfig>, particles: Res<Particles>) {
    for particle in &particles.0 {
        gizmos.circle_2d(
            Isometry2d::from_translation(to_world(particle.position, &config)),
            particle.radius.max(1.0),
            particle.color,
        );
    }
}

// =============================================================================
// SCREEN SHAKE
// =============================================================================

/// Resource tracking screen shake state.
#[derive(Resource, Default)]
pub struct ScreenShake {
    /// Current trauma level (0.0 to 1.0).
    pub trauma: f32,
    /// Base position to return to.
    pub base_position: Vec3,
}

/// Maximum shake offset in pixels.
const MAX_SHAKE_OFFSET: f32 = 6.0;
/// How fast trauma decays per second.
const TRAUMA_DECAY: f32 = 2.5;
/// Trauma added per bomb detonation.
const BOMB_TRAUMA: f32 = 0.35;

/// Every bomb going off rattles the camera.
fn trigger_shake_on_bombs(mut shake: ResMut<ScreenShake>, mut frame_events: MessageReader<FrameEvent>) {
    for event in frame_events.read() {
        if matches!(event, FrameEvent::ParticleBurst { count, .. } if *count >= BOMB_BURST) {
            shake.trauma = (shake.trauma + BOMB_TRAUMA).min(1.0);
        }
    }
}

/// Apply screen shake to camera.
fn apply_screen_shake(
    time: Res<Time>,
    mut shake: ResMut<ScreenShake>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    if shake.trauma > 0.0 {
        let mut rng = rand::rng();

        // Shake amount = trauma^2
        let shake_amount = shake.trauma * shake.trauma;

        let offset_x = rng.random_range(-1.0..1.0) * MAX_SHAKE_OFFSET * shake_amount;
        let offset_y = rng.random_range(-1.0..1.0) * MAX_SHAKE_OFFSET * shake_amount;

        camera_transform.translation.x = shake.base_position.x + offset_x;
        camera_transform.translation.y = shake.base_position.y + offset_y;

        shake.trauma = (shake.trauma - TRAUMA_DECAY * time.delta_secs()).max(0.0);
    } else {
        camera_transform.translation.x = shake.base_position.x;
        camera_transform.translation.y = shake.base_position.y;
    }
}

// =============================================================================
// PLAYFIELD
// =============================================================================

/// Extra scale an exploding bubble reaches at the end of its animation.
const POP_GROWTH: f32 = 0.5;
/// Radius of the aim preview dot.
const AIM_DOT_RADIUS: f32 = 4.0;

/// Draw bubbles, the projectile, the shooter and the aim preview.
fn draw_playfield(mut gizmos: Gizmos, session: Res<GameSession>) {
    let config = session.config();
    let radius = config.bubble_radius;

    for bubble in session.bubbles() {
        let center = to_world(bubble.position, config);
        // Exploding bubbles grow and fade out
        let (scale, alpha) = match bubble.explosion_progress() {
            Some(progress) => (1.0 + POP_GROWTH * progress, 1.0 - progress),
            None => (1.0, 1.0),
        };
        draw_bubble(
            &mut gizmos,
            center,
            radius * scale,
            bubble.kind.tint().with_alpha(alpha),
            bubble.kind.is_bomb(),
        );
    }

    if let Some(projectile) = session.projectile() {
        draw_bubble(
            &mut gizmos,
            to_world(projectile.position, config),
            radius,
            projectile.color.to_color(),
            false,
        );
    }

    let shooter = session.shooter();
    let origin = to_world(shooter.position, config);
    let muzzle = to_world(shooter.position + shooter.aim_direction() * radius * 2.0, config);
    gizmos.line_2d(origin, muzzle, palette::SHOOTER_BARREL);
    if session.projectile().is_none() {
        draw_bubble(&mut gizmos, origin, radius, shooter.loaded().to_color(), false);
    }

    if session.aim_assist() && session.projectile().is_none() && session.status() == GameStatus::Playing {
        let target = to_world(session.aim_preview(), config);
        gizmos.line_2d(muzzle, target, palette::AIM_PREVIEW);
        gizmos.circle_2d(
            Isometry2d::from_translation(target),
            AIM_DOT_RADIUS,
            palette::AIM_PREVIEW,
        );
    }
}

/// Gizmos only draw outlines; nested rings give a filled look.
fn draw_bubble(gizmos: &mut Gizmos, center: Vec2, radius: f32, color: Color, bomb: bool) {
    let isometry = Isometry2d::from_translation(center);
    let mut ring = radius;
    while ring > 1.0 {
        gizmos.circle_2d(isometry, ring, color);
        ring -= 2.0;
    }

    let outline = palette::BUBBLE_OUTLINE.with_alpha(color.alpha());
    gizmos.circle_2d(isometry, radius, outline);

    if bomb {
        // Fuse cross
        let arm = radius * 0.5;
        gizmos.line_2d(center - Vec2::splat(arm), center + Vec2::splat(arm), outline);
        gizmos.line_2d(
            center + Vec2::new(-arm, arm),
            center + Vec2::new(arm, -arm),
            outline,
        );
    }
}

// =============================================================================
// HUD
// =============================================================================

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct StatusBanner;

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("Score"),
        ScoreText,
        Text::new(score_label(0)),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(palette::SCORE_TEXT),
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(10.0),
            bottom: Val::Px(10.0),
            ..default()
        },
    ));

    commands.spawn((
        Name::new("Status Banner Root"),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        children![(
            Name::new("Status Banner"),
            StatusBanner,
            Text::default(),
            TextFont {
                font_size: 36.0,
                ..default()
            },
            TextColor(palette::LOST_TEXT),
            Visibility::Hidden,
        )],
    ));
}

fn score_label(total: u32) -> String {
    format!("Score: {total}")
}

/// Banner text and color for a finished game.
fn banner_for(status: GameStatus) -> Option<(&'static str, Color)> {
    match status {
        GameStatus::Playing => None,
        GameStatus::Won => Some(("YOU WIN!\nPress R to restart", palette::WON_TEXT)),
        GameStatus::Lost => Some(("Game Over!\nPress R to restart", palette::LOST_TEXT)),
    }
}

fn update_hud(
    mut frame_events: MessageReader<FrameEvent>,
    mut score_text: Single<&mut Text, (With<ScoreText>, Without<StatusBanner>)>,
    mut banner: Single<(&mut Text, &mut TextColor, &mut Visibility), With<StatusBanner>>,
) {
    for event in frame_events.read() {
        match *event {
            FrameEvent::ScoreChanged { total } => score_text.0 = score_label(total),
            FrameEvent::StatusChanged(status) => {
                let (text, color, visibility) = &mut *banner;
                match banner_for(status) {
                    Some((label, tint)) => {
                        text.0 = label.to_string();
                        color.0 = tint;
                        **visibility = Visibility::Inherited;
                    }
                    None => **visibility = Visibility::Hidden,
                }
            }
            FrameEvent::ParticleBurst { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn particle() -> Particle {
        Particle {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(2.0, -1.0),
            color: Color::WHITE,
            radius: 4.0,
            initial_radius: 4.0,
            life: 50,
            max_life: 50,
        }
    }

    #[test]
    fn random_particles_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let p = Particle::random(Vec2::ZERO, Color::WHITE, &mut rng);
            assert!((2.0..=5.0).contains(&p.radius));
            assert!((45..=105).contains(&p.life));
            let speed = p.velocity.length();
            assert!((1.0 - 1e-4..3.0 + 1e-4).contains(&speed));
        }
    }

    #[test]
    fn gravity_pulls_and_radius_shrinks() {
        let mut p = particle();
        p.update(640.0, 600.0);
        assert_eq!(p.position, Vec2::new(102.0, 99.0));
        assert!((p.velocity.y - (-0.9)).abs() < 1e-6);
        assert!((p.radius - 4.0 * 49.0 / 50.0).abs() < 1e-6);
    }

    #[test]
    fn bounces_off_the_floor_with_damping() {
        let mut p = particle();
        p.position = Vec2::new(100.0, 598.0);
        p.velocity = Vec2::new(0.0, 5.0);
        p.update(640.0, 600.0);
        assert!(p.velocity.y < 0.0);
        assert!((p.velocity.y + 5.1 * BOUNCE_DAMPING).abs() < 1e-5);
        assert!(p.position.y <= 600.0 - p.radius);
    }

    #[test]
    fn dies_after_its_lifetime() {
        let mut p = particle();
        for _ in 0..50 {
            assert!(p.is_alive());
            p.update(640.0, 600.0);
        }
        assert!(!p.is_alive());
        assert_eq!(p.radius, 0.0);
    }

    #[test]
    fn banners_only_for_finished_games() {
        assert!(banner_for(GameStatus::Playing).is_none());
        assert!(banner_for(GameStatus::Won).unwrap().0.starts_with("YOU WIN!"));
        assert!(banner_for(GameStatus::Lost).unwrap().0.starts_with("Game Over!"));
    }
}
