//! Scenario config (RON)
//!
//! Описывает стартовое состояние headless прогона: seed, частоту tick'ов,
//! viewport, игрока, врагов и walkers.
//!
//! ```ron
//! (
//!     seed: 42,
//!     tick_hz: 60.0,
//!     ticks: 600,
//!     player: Some((0.0, -6.0, 0.0)),
//!     enemies: [
//!         (mode: VerticalPause, position: (0.0, 7.0, 0.0), params: (speed: 3.0, stop_thresholds: [0.7, 0.4])),
//!     ],
//! )
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::motion::{spawn_enemy, MotionParameters, MovementMode, Player};
use crate::shared::{ActiveViewport, OrthographicViewport};
use crate::waypoint::{spawn_walker, WaypointWalker};
use crate::DeterministicRng;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

pub type ScenarioResult<T> = std::result::Result<T, ScenarioError>;

/// Один враг сценария
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    #[serde(default)]
    pub mode: MovementMode,
    pub position: Vec3,
    #[serde(default)]
    pub params: MotionParameters,
    /// false — враг без target provider'а
    #[serde(default = "default_true")]
    pub targets_player: bool,
}

/// Один walker сценария
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkerSpawn {
    pub position: Vec3,
    #[serde(default)]
    pub walker: WaypointWalker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub seed: u64,
    pub tick_hz: f64,
    pub ticks: usize,
    pub viewport: OrthographicViewport,
    pub player: Option<Vec3>,
    pub enemies: Vec<EnemySpawn>,
    pub walkers: Vec<WalkerSpawn>,
}

fn default_true() -> bool {
    true
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            ticks: 600,
            viewport: OrthographicViewport::default(),
            player: None,
            enemies: Vec::new(),
            walkers: Vec::new(),
        }
    }
}

impl Scenario {
    pub fn from_ron_str(source: &str) -> ScenarioResult<Self> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> ScenarioResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron_str(&source)
    }

    /// Demo: по одному врагу каждого режима, игрок внизу, один walker
    pub fn demo() -> Self {
        let params = MotionParameters {
            speed: 3.0,
            ..Default::default()
        };
        let modes = [
            MovementMode::Vertical,
            MovementMode::Horizontal,
            MovementMode::Sinusoidal,
            MovementMode::HorizontalArc,
            MovementMode::VerticalPause,
            MovementMode::FollowPlayer,
            MovementMode::RandomAfterPause,
            MovementMode::DiagonalToPlayer,
        ];

        let enemies = modes
            .iter()
            .enumerate()
            .map(|(i, mode)| EnemySpawn {
                mode: *mode,
                position: match mode {
                    // Диагональ съезжает влево: стартуем правее и ниже, чтобы дойти до линии броска
                    MovementMode::DiagonalToPlayer => Vec3::new(3.5, 0.5, 0.0),
                    _ => Vec3::new(-3.5 + i as f32, 7.5, 0.0),
                },
                params: MotionParameters {
                    stop_thresholds: vec![0.7, 0.4],
                    ..params.clone()
                },
                targets_player: true,
            })
            .collect();

        Self {
            player: Some(Vec3::new(0.0, -6.0, 0.0)),
            enemies,
            walkers: vec![WalkerSpawn {
                position: Vec3::new(-4.0, 0.0, 0.0),
                walker: WaypointWalker::new(
                    2.0,
                    vec![Vec3::new(4.0, 0.0, 0.0), Vec3::new(4.0, 4.0, 0.0)],
                ),
            }],
            ..Default::default()
        }
    }

    /// Применяет сценарий к app: resources (seed, tick rate, viewport) + spawns
    pub fn spawn_into(&self, app: &mut App) {
        app.insert_resource(DeterministicRng::new(self.seed))
            .insert_resource(Time::<Fixed>::from_hz(self.tick_hz))
            .insert_resource(ActiveViewport(self.viewport));

        let world = app.world_mut();
        let player = self
            .player
            .map(|position| world.spawn((Player, Transform::from_translation(position))).id());

        {
            let mut commands = world.commands();
            for enemy in &self.enemies {
                let target = if enemy.targets_player { player } else { None };
                spawn_enemy(
                    &mut commands,
                    enemy.mode,
                    enemy.position,
                    enemy.params.clone(),
                    target,
                );
            }
            for walker in &self.walkers {
                spawn_walker(&mut commands, walker.position, walker.walker.clone());
            }
        }
        world.flush();

        crate::logger::log_info(&format!(
            "Scenario spawned: seed {}, {} enemies, {} walkers, player: {}",
            self.seed,
            self.enemies.len(),
            self.walkers.len(),
            self.player.is_some()
        ));
    }
}
