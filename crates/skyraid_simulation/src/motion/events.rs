//! Motion events
//!
//! Генерируются `drive_enemy_motion` по `StepReport`. Host использует их
//! для звуков / анимаций, тесты — для проверки one-shot переходов.

use bevy::prelude::*;

/// Event: враг остановился (начало паузы)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MotionPaused {
    pub entity: Entity,
    pub duration: f32,
}

/// Event: пауза закончилась
///
/// `direction` — направление броска (RandomAfterPause / DiagonalToPlayer),
/// `None` для VerticalPause.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MotionResumed {
    pub entity: Entity,
    pub direction: Option<Vec3>,
}

/// Event: враг впервые ушёл за экран, запущен таймер удаления
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DespawnScheduled {
    pub entity: Entity,
    pub delay: f32,
}

/// Event: враг удалён из симуляции (ровно один раз на entity)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EnemyDespawned {
    pub entity: Entity,
}
