//! Motion domain — паттерны движения врагов
//!
//! Содержит:
//! - MotionController (чистая per-tick логика, 8 режимов + off-screen despawn)
//! - MotionState / MotionParameters / MotionTarget (компоненты)
//! - Events (MotionPaused, MotionResumed, DespawnScheduled, EnemyDespawned)
//! - Systems (drive → sync transform → remove despawned)

use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod events;
pub mod systems;

#[cfg(test)]
mod controller_tests;

pub use components::*;
pub use controller::*;
pub use events::*;
pub use systems::*;

use crate::shared::ActiveViewport;

/// Motion Plugin
///
/// Регистрирует motion системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. drive_enemy_motion — tick контроллера, events
/// 2. sync_enemy_transforms — MotionState → Transform
/// 3. remove_despawned_enemies — despawn по истёкшему таймеру
pub struct MotionPlugin;

impl Plugin for MotionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveViewport>()
            .add_event::<MotionPaused>()
            .add_event::<MotionResumed>()
            .add_event::<DespawnScheduled>()
            .add_event::<EnemyDespawned>();

        app.add_systems(
            FixedUpdate,
            (
                drive_enemy_motion,
                sync_enemy_transforms,
                remove_despawned_enemies,
            )
                .chain(), // Последовательное выполнение для детерминизма
        );
    }
}

/// Helper: spawn врага с режимом и параметрами
///
/// `target` — entity игрока (или `None`, если target'а нет).
pub fn spawn_enemy(
    commands: &mut Commands,
    mode: MovementMode,
    position: Vec3,
    params: MotionParameters,
    target: Option<Entity>,
) -> Entity {
    let state = MotionState::new(mode, position);
    commands
        .spawn((
            Enemy,
            state.to_transform(),
            state,
            params,
            MotionTarget { entity: target },
        ))
        .id()
}
