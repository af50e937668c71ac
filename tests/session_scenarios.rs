//! End-to-end game scenarios driven through the public session API.

use bevy::math::Vec2;
use hexpop::config::GameConfig;
use hexpop::game::bubble::{BubbleColor, BubbleKind, BubbleState};
use hexpop::game::cluster::CHAIN_DELAY;
use hexpop::game::hex::HexCoord;
use hexpop::game::session::GameSession;
use hexpop::game::state::{FrameEvent, GameStatus, InputState};

const RED: BubbleKind = BubbleKind::Plain(BubbleColor::Red);
const BLUE: BubbleKind = BubbleKind::Plain(BubbleColor::Blue);
const GREEN: BubbleKind = BubbleKind::Plain(BubbleColor::Green);

fn layout(cells: &[(i32, i32, BubbleKind)]) -> Vec<(HexCoord, BubbleKind)> {
    cells
        .iter()
        .map(|&(row, col, kind)| (HexCoord::new(row, col), kind))
        .collect()
}

fn session_with_seed(cells: &[(i32, i32, BubbleKind)], seed: u64) -> GameSession {
    let config = GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    };
    GameSession::with_layout(config, layout(cells)).unwrap()
}

/// A session on `cells` whose first loaded color is `color`.
fn session_loaded_with(cells: &[(i32, i32, BubbleKind)], color: BubbleColor) -> GameSession {
    (0..200)
        .map(|seed| session_with_seed(cells, seed))
        .find(|s| s.shooter().loaded() == color)
        .expect("some seed loads the wanted color")
}

fn fire() -> InputState {
    InputState {
        fire: true,
        ..InputState::default()
    }
}

/// Tick until the projectile in flight has landed, collecting events.
fn fly(session: &mut GameSession) -> Vec<FrameEvent> {
    let mut events = session.tick(&fire());
    for _ in 0..500 {
        if session.projectile().is_none() {
            break;
        }
        events.extend(session.tick(&InputState::default()));
    }
    assert!(session.projectile().is_none(), "projectile never landed");
    events
}

#[test]
fn fired_match_of_four_pops_at_once() {
    let mut cells = Vec::new();
    for col in 5..=9 {
        cells.push((0, col, BLUE));
        cells.push((1, col, GREEN));
    }
    cells.extend([(2, 6, RED), (2, 7, RED), (2, 8, RED)]);
    let mut session = session_loaded_with(&cells, BubbleColor::Red);

    // Straight up from x = 320 meets (2, 7) and settles below it at (3, 7).
    let events = fly(&mut session);

    assert_eq!(session.score(), 40);
    assert!(events.contains(&FrameEvent::ScoreChanged { total: 40 }));

    let popping: Vec<_> = session.bubbles().filter(|b| b.is_exploding()).collect();
    assert_eq!(popping.len(), 4);
    assert!(popping.iter().all(|b| b.kind == RED));
    assert!(popping.iter().any(|b| b.coord == HexCoord::new(3, 7)));
}

#[test]
fn lone_bomb_blasts_its_neighbors() {
    let cells = [
        (0, 3, BLUE),
        (0, 4, BLUE),
        (0, 5, BLUE),
        (1, 3, GREEN),
        (1, 5, GREEN),
    ];
    let mut session = session_with_seed(&cells, 1);

    session
        .place_bubble(HexCoord::new(1, 4), BubbleKind::Bomb(BubbleColor::Red))
        .unwrap();

    let delay_at = |row, col| match session.grid().get(HexCoord::new(row, col)).map(|b| b.state) {
        Some(BubbleState::Exploding { delay, .. }) => Some(delay),
        _ => None,
    };
    assert_eq!(delay_at(1, 4), Some(0));
    for (row, col) in [(0, 4), (0, 5), (1, 3), (1, 5)] {
        assert_eq!(delay_at(row, col), Some(CHAIN_DELAY), "({row}, {col})");
    }
    // Not adjacent to the bomb.
    assert_eq!(delay_at(0, 3), None);
    assert_eq!(session.score(), 10);
}

#[test]
fn losing_the_only_connector_drops_everything_below() {
    // (1, 3) is the only link between the ceiling and rows 2-3.
    let cells = [
        (0, 2, RED),
        (0, 3, RED),
        (1, 3, RED),
        (2, 3, BLUE),
        (2, 4, GREEN),
        (3, 3, BLUE),
        (3, 4, GREEN),
    ];
    let mut session = session_with_seed(&cells, 2);

    // Completes the red group (0, 2), (0, 3), (1, 3).
    session.place_bubble(HexCoord::new(0, 1), RED).unwrap();
    assert!(session.grid().get(HexCoord::new(2, 3)).unwrap().is_resting());

    let mut ticks = 0;
    while session.bubbles().any(|b| b.is_exploding()) {
        session.tick(&InputState::default());
        ticks += 1;
        assert!(ticks < 100);
    }

    let falling = session.bubbles().filter(|b| b.is_falling()).count();
    assert_eq!(falling, 4);
    assert!(session.grid().indexed().next().is_none());
}

#[test]
fn cleared_color_is_never_loaded_again() {
    let mut cells: Vec<_> = (0..15).map(|col| (0, col, BLUE)).collect();
    cells.extend([(1, 0, GREEN), (1, 14, GREEN), (1, 1, RED), (1, 2, RED)]);
    let mut session = session_with_seed(&cells, 3);

    session.place_bubble(HexCoord::new(1, 3), RED).unwrap();
    assert!(!session.available_colors().contains(&BubbleColor::Red));

    for _ in 0..6 {
        assert_ne!(session.shooter().loaded(), BubbleColor::Red);
        fly(&mut session);
        if session.status() != GameStatus::Playing {
            break;
        }
    }
}

#[test]
fn loaded_color_follows_bubbles_that_fall_away() {
    // Blue only hangs from the reds that are about to pop.
    let cells = [(0, 3, RED), (0, 4, RED), (1, 3, BLUE), (0, 10, GREEN)];
    let mut session = (0..200)
        .map(|seed| {
            let mut s = session_with_seed(&cells, seed);
            s.place_bubble(HexCoord::new(0, 5), RED).unwrap();
            s
        })
        .find(|s| s.shooter().loaded() == BubbleColor::Blue)
        .expect("some seed loads blue");
    assert_eq!(
        session.available_colors(),
        &[BubbleColor::Green, BubbleColor::Blue]
    );

    let mut ticks = 0;
    while session.bubbles().any(|b| b.is_exploding()) {
        session.tick(&InputState::default());
        assert!(session.available_colors().contains(&session.shooter().loaded()));
        ticks += 1;
        assert!(ticks < 100);
    }

    assert!(session.bubbles().any(|b| b.kind == BLUE && b.is_falling()));
    assert_eq!(session.available_colors(), &[BubbleColor::Green]);
    assert_eq!(session.shooter().loaded(), BubbleColor::Green);

    session.tick(&fire());
    assert_eq!(
        session.projectile().map(|p| p.color),
        Some(BubbleColor::Green)
    );
}

#[test]
fn clearing_the_board_wins_on_the_last_removal() {
    let mut session = session_with_seed(&[(0, 6, GREEN), (0, 7, GREEN)], 4);
    assert_eq!(session.shooter().loaded(), BubbleColor::Green);

    let mut events = fly(&mut session);
    assert_eq!(session.score(), 30);

    let mut ticks = 0;
    while session.bubbles().next().is_some() {
        assert_eq!(session.status(), GameStatus::Playing);
        events = session.tick(&InputState::default());
        ticks += 1;
        assert!(ticks < 100);
    }

    assert_eq!(session.status(), GameStatus::Won);
    assert!(events.contains(&FrameEvent::StatusChanged(GameStatus::Won)));
    assert!(session.tick(&InputState::default()).is_empty());
}

#[test]
fn aim_preview_stops_at_the_ceiling_over_an_empty_column() {
    let session = session_with_seed(&[(0, 0, RED)], 5);
    assert_eq!(session.aim_preview(), Vec2::new(320.0, 20.0));
}

#[test]
fn reset_restores_the_layout() {
    let cells = [(0, 0, RED), (0, 1, RED)];
    let mut session = session_with_seed(&cells, 6);
    session.place_bubble(HexCoord::new(0, 2), RED).unwrap();
    assert_eq!(session.score(), 30);

    session.tick(&InputState {
        reset: true,
        ..InputState::default()
    });

    assert_eq!(session.score(), 0);
    assert_eq!(session.status(), GameStatus::Playing);
    let mut coords: Vec<_> = session.grid().coords().collect();
    coords.sort();
    assert_eq!(coords, vec![HexCoord::new(0, 0), HexCoord::new(0, 1)]);
}
