//! The game session: one owner for all mutable simulation state.
//!
//! [`GameSession::tick`] advances the whole game by one frame in a fixed
//! order: input, projectile flight and landing, bubble lifecycles, removal,
//! floating check, then loss and win checks.

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::{
    bubble::{Bubble, BubbleColor, BubbleKind, LANDING_BURST, LifecycleEvent},
    cluster,
    error::SimError,
    floating,
    grid::{GridBounds, HexGrid},
    hex::HexCoord,
    projectile::{Projectile, simulate_path},
    shooter::Shooter,
    state::{FrameEvent, FrameEvents, GameStatus, InputState},
};
use crate::config::GameConfig;

/// Points for each bubble that drops off the bottom.
pub const FALLING_POINTS: u32 = 20;

/// A starting layout: which cell holds which bubble.
pub type Layout = Vec<(HexCoord, BubbleKind)>;

#[derive(Resource, Debug)]
pub struct GameSession {
    config: GameConfig,
    grid: HexGrid,
    shooter: Shooter,
    projectile: Option<Projectile>,
    score: u32,
    status: GameStatus,
    /// Colors still on the grid, refreshed after every grid change.
    available_colors: Vec<BubbleColor>,
    aim_assist: bool,
    /// Fixed layout to restart from; `None` rolls a new random one.
    layout: Option<Layout>,
    rng: StdRng,
}

impl GameSession {
    /// Start a game on a randomly generated grid.
    pub fn new(config: GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let layout = random_layout(&config, &mut rng);
        let grid = match build_grid(&config, &layout) {
            Ok(grid) => grid,
            Err(e) => {
                error!("Generated layout is invalid: {}", e);
                empty_grid(&config)
            }
        };

        Self::start(config, grid, None, rng)
    }

    /// Start a game on a fixed layout. Reset returns to the same layout.
    pub fn with_layout(config: GameConfig, layout: Layout) -> Result<Self, SimError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let grid = build_grid(&config, &layout)?;

        Ok(Self::start(config, grid, Some(layout), rng))
    }

    fn start(config: GameConfig, grid: HexGrid, layout: Option<Layout>, mut rng: StdRng) -> Self {
        let available_colors = grid.colors_in_play();
        let loaded = available_colors
            .choose(&mut rng)
            .copied()
            .unwrap_or_default();
        let shooter = Shooter::new(shooter_origin(&config), loaded);

        info!(
            "New game: {} bubbles, {:?} loaded",
            grid.len(),
            shooter.loaded()
        );

        Self {
            config,
            grid,
            shooter,
            projectile: None,
            score: 0,
            status: GameStatus::Playing,
            available_colors,
            aim_assist: false,
            layout,
            rng,
        }
    }

    /// Throw away the current game and start over.
    pub fn reset(&mut self) {
        let layout = match &self.layout {
            Some(layout) => layout.clone(),
            None => random_layout(&self.config, &mut self.rng),
        };
        let grid = match build_grid(&self.config, &layout) {
            Ok(grid) => grid,
            Err(e) => {
                error!("Cannot rebuild layout: {}", e);
                empty_grid(&self.config)
            }
        };

        let available_colors = grid.colors_in_play();
        let loaded = available_colors
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default();

        self.grid = grid;
        self.available_colors = available_colors;
        self.shooter = Shooter::new(shooter_origin(&self.config), loaded);
        self.projectile = None;
        self.score = 0;
        self.status = GameStatus::Playing;
        self.aim_assist = false;

        info!("Game reset: {} bubbles", self.grid.len());
    }

    /// Advance the game by one frame.
    pub fn tick(&mut self, input: &InputState) -> FrameEvents {
        let mut events = FrameEvents::new();

        if input.reset {
            self.reset();
            events.push(FrameEvent::ScoreChanged { total: 0 });
            events.push(FrameEvent::StatusChanged(GameStatus::Playing));
            return events;
        }

        if input.toggle_aid {
            self.aim_assist = !self.aim_assist;
            debug!("Aim assist: {}", self.aim_assist);
        }

        if self.status == GameStatus::Playing {
            self.shooter
                .rotate(input.rotation(), self.config.turn_speed);

            if input.fire && self.projectile.is_none() {
                self.projectile = Some(self.shooter.fire(self.config.shoot_speed));
                debug!(
                    "Fired {:?} at angle {:.3}",
                    self.shooter.loaded(),
                    self.shooter.angle()
                );
            }
        }

        self.update_projectile(&mut events);
        self.update_bubbles(&mut events);
        self.drop_floating();
        self.available_colors = self.grid.colors_in_play();
        if self
            .shooter
            .ensure_available(&self.available_colors, &mut self.rng)
        {
            debug!("Loaded color left the grid, reloaded {:?}", self.shooter.loaded());
        }
        self.check_game_over(&mut events);

        events
    }

    /// Put a bubble into `coord` as if a projectile had snapped there, and
    /// resolve everything the landing sets off.
    pub fn place_bubble(&mut self, coord: HexCoord, kind: BubbleKind) -> Result<FrameEvents, SimError> {
        let mut events = FrameEvents::new();
        self.land(coord, kind, &mut events)?;
        Ok(events)
    }

    fn update_projectile(&mut self, events: &mut FrameEvents) {
        let radius = self.config.bubble_radius;
        let Some(projectile) = self.projectile.as_mut() else {
            return;
        };

        projectile.advance(self.config.width, radius);
        if !projectile.touches(&self.grid, radius, self.config.contact_distance()) {
            return;
        }

        let Some(projectile) = self.projectile.take() else {
            return;
        };
        let Some(coord) = self
            .grid
            .resolve_snap_position(projectile.position, self.config.contact_distance())
        else {
            warn!("No free cell near {:?}, dropping projectile", projectile.position);
            return;
        };

        if let Err(e) = self.land(coord, BubbleKind::Plain(projectile.color), events) {
            error!("Projectile could not land at {}: {}", coord, e);
        }
    }

    /// Insert a resting bubble, pop what it matches and drop what it cut loose.
    fn land(&mut self, coord: HexCoord, kind: BubbleKind, events: &mut FrameEvents) -> Result<(), SimError> {
        self.grid.insert(coord, kind)?;
        debug!("Bubble landed at {} as {:?}", coord, kind);

        let plan = cluster::resolve(&self.grid, coord);
        if !plan.is_empty() {
            for detonation in &plan.detonations {
                let started = self
                    .grid
                    .bubble_mut(detonation.id)
                    .ok_or(SimError::UnknownBubble(detonation.id))
                    .and_then(|bubble| bubble.start_explosion(detonation.delay));
                if let Err(e) = started {
                    error!("Cannot explode bubble at {}: {}", detonation.coord, e);
                }
            }

            self.score += plan.points();
            events.push(FrameEvent::ScoreChanged { total: self.score });
            info!(
                "Popped {} bubbles ({} matched), +{} points (total: {})",
                plan.detonations.len(),
                plan.matched,
                plan.points(),
                self.score
            );
        }

        self.drop_floating();
        self.available_colors = self.grid.colors_in_play();
        self.shooter.reload(&self.available_colors, &mut self.rng);
        self.check_game_over(events);

        Ok(())
    }

    fn update_bubbles(&mut self, events: &mut FrameEvents) {
        let mut finished = Vec::new();

        for bubble in self.grid.iter_mut() {
            match bubble.tick(&self.config) {
                Some(LifecycleEvent::Burst {
                    position,
                    color,
                    count,
                }) => events.push(FrameEvent::ParticleBurst {
                    position,
                    color,
                    count,
                }),
                Some(LifecycleEvent::Popped) => finished.push(bubble.id),
                Some(LifecycleEvent::Landed { x, color }) => {
                    self.score += FALLING_POINTS;
                    events.push(FrameEvent::ScoreChanged { total: self.score });
                    events.push(FrameEvent::ParticleBurst {
                        position: Vec2::new(x, self.config.height - self.config.bubble_radius),
                        color,
                        count: LANDING_BURST,
                    });
                    finished.push(bubble.id);
                }
                None => {}
            }
        }

        for id in finished {
            self.grid.remove(id);
        }
    }

    /// Turn resting bubbles that lost their path to the ceiling into falling ones.
    fn drop_floating(&mut self) {
        let mut dropped = 0;

        for id in floating::find_floating(&self.grid) {
            let Some(bubble) = self.grid.bubble_mut(id) else {
                continue;
            };
            // Exploding bubbles finish their animation where they are.
            if !bubble.is_resting() {
                continue;
            }
            let detached = bubble
                .start_falling()
                .and_then(|()| self.grid.detach(id));
            match detached {
                Ok(()) => dropped += 1,
                Err(e) => error!("Cannot drop bubble {}: {}", id, e),
            }
        }

        if dropped > 0 {
            info!("{} bubbles lost their anchor", dropped);
        }
    }

    /// Lost once a resting bubble's bottom edge (`y + radius`) crosses the
    /// shooter line; won once no bubble is left in any state.
    fn check_game_over(&mut self, events: &mut FrameEvents) {
        if self.status.is_over() {
            return;
        }

        let line = self.config.shooter_y();
        let radius = self.config.bubble_radius;
        let reached_line = self
            .grid
            .indexed()
            .any(|b| b.is_resting() && b.position.y + radius > line);

        if reached_line {
            self.set_status(GameStatus::Lost, events);
        } else if self.grid.is_empty() {
            self.set_status(GameStatus::Won, events);
        }
    }

    fn set_status(&mut self, status: GameStatus, events: &mut FrameEvents) {
        self.status = status;
        events.push(FrameEvent::StatusChanged(status));
        match status {
            GameStatus::Won => info!("WIN! All bubbles cleared! Final score: {}", self.score),
            GameStatus::Lost => info!("GAME OVER! Bubbles reached the shooter. Final score: {}", self.score),
            GameStatus::Playing => {}
        }
    }

    /// Where the current aim would first touch the grid or the ceiling.
    pub fn aim_preview(&self) -> Vec2 {
        simulate_path(
            self.shooter.position,
            self.shooter.aim_direction() * self.config.shoot_speed,
            &self.grid,
            self.config.width,
            self.config.bubble_radius,
            self.config.contact_distance(),
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// All active bubbles: resting, exploding and falling.
    pub fn bubbles(&self) -> impl Iterator<Item = &Bubble> {
        self.grid.iter()
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    pub fn shooter(&self) -> &Shooter {
        &self.shooter
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn available_colors(&self) -> &[BubbleColor] {
        &self.available_colors
    }

    pub fn aim_assist(&self) -> bool {
        self.aim_assist
    }
}

fn shooter_origin(config: &GameConfig) -> Vec2 {
    Vec2::new(config.width / 2.0, config.shooter_y())
}

fn empty_grid(config: &GameConfig) -> HexGrid {
    HexGrid::new(config.bubble_radius, GridBounds::with_cols(config.cols))
}

fn build_grid(config: &GameConfig, layout: &Layout) -> Result<HexGrid, SimError> {
    let mut grid = empty_grid(config);
    for &(coord, kind) in layout {
        grid.insert(coord, kind)?;
    }
    Ok(grid)
}

/// Fill the top `rows` rows with random bubbles.
fn random_layout(config: &GameConfig, rng: &mut StdRng) -> Layout {
    let mut layout = Vec::new();
    for row in 0..config.rows {
        for col in 0..config.cols {
            layout.push((HexCoord::new(row, col), BubbleKind::random(rng, row, config)));
        }
    }
    layout
}
