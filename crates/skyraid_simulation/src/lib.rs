//! SKYRAID Simulation Core
//!
//! Headless ECS-симуляция движения врагов вертикального shmup'а (Bevy 0.16).
//!
//! Разделение ответственности:
//! - Simulation = motion patterns, pause/resume таймеры, off-screen despawn
//! - Host (игровой клиент) = рендер, input, реальная камера
//!
//! Host инжектит только capabilities: viewport mapping (`ActiveViewport`),
//! позицию игрока (`Player` + `Transform`), частоту tick'ов (`Time<Fixed>`).

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod logger;
pub mod motion;
pub mod scenario;
pub mod shared;
pub mod waypoint;

// Re-export базовых типов для удобства
pub use logger::{
    init_logger, log, log_error, log_info, log_level, log_warning, set_log_level, LogLevel,
};
pub use motion::{
    spawn_enemy, DespawnScheduled, Enemy, EnemyDespawned, MotionController, MotionParameters,
    MotionPaused, MotionPhase, MotionPlugin, MotionResumed, MotionState, MotionTarget,
    MovementMode, Player, StepReport,
};
pub use scenario::{Scenario, ScenarioError, ScenarioResult};
pub use shared::{ActiveViewport, OrthographicViewport, Viewport};
pub use waypoint::{spawn_walker, WaypointPlugin, WaypointWalker};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию, если host не задал свой)
            .init_resource::<DeterministicRng>()
            .add_plugins((MotionPlugin, WaypointPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Подсистемы не подключены — добавь `SimulationPlugin` (или отдельные
/// plugins) сам.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Один детерминированный simulation tick длиной `dt` секунд
///
/// Не зависит от wall clock: двигает `Time<Fixed>` вручную и прогоняет
/// FixedUpdate schedule ровно один раз.
pub fn run_fixed_tick(app: &mut App, dt: f32) {
    let world = app.world_mut();
    world
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(dt));
    world.run_schedule(FixedUpdate);
}

/// Забирает все накопленные events типа T
///
/// `run_fixed_tick` не вызывает `Events::update`, поэтому host должен
/// вычитывать каждый тип events сам, иначе буфер растёт весь прогон.
pub fn drain_events<T: Event>(world: &mut World) -> Vec<T> {
    world.resource_mut::<Events<T>>().drain().collect()
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
