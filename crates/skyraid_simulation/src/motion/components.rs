//! Motion компоненты: режимы движения, параметры, per-entity состояние

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Viewport x для всех stop thresholds (центр экрана по горизонтали)
pub const STOP_VIEWPORT_X: f32 = 0.5;

/// RandomAfterPause останавливается на середине экрана
pub const RANDOM_PAUSE_VIEWPORT_Y: f32 = 0.5;

/// DiagonalToPlayer ныряет на игрока ниже этой высоты (viewport y)
pub const DIAGONAL_DIVE_VIEWPORT_Y: f32 = 0.33;

/// Пауза DiagonalToPlayer перед броском (секунды), не настраивается
pub const DIAGONAL_DIVE_DELAY: f32 = 1.0;

/// Скорость доворота FollowPlayer (interpolation factor = rate × dt)
pub const FOLLOW_TURN_RATE: f32 = 10.0;

/// Marker: враг, управляемый MotionController
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Marker: игрок (источник target позиции для FollowPlayer / DiagonalToPlayer)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Паттерн движения врага (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementMode {
    /// Прямо вниз со скоростью speed
    #[default]
    Vertical,
    /// Прямо вправо со скоростью speed
    Horizontal,
    /// Волна: x = sin(t), y линейно вниз (continuous-time формула)
    Sinusoidal,
    /// Дуга вправо: y = startY + amplitude × sin(progress × π)
    HorizontalArc,
    /// Вниз с остановками на stop thresholds, после последней — вверх
    VerticalPause,
    /// Преследование игрока с доворотом
    FollowPlayer,
    /// Вниз до середины экрана, пауза, случайное направление
    RandomAfterPause,
    /// По диагонали вниз, пауза 1 сек, бросок в последнюю позицию игрока
    DiagonalToPlayer,
}

/// Per-instance параметры движения (назначаются до старта симуляции)
///
/// Значения по умолчанию совпадают с настройками врага в редакторе уровня.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParameters {
    /// world units/sec
    pub speed: f32,
    /// Задержка удаления после выхода за экран (секунды)
    pub despawn_delay: f32,
    /// Sinusoidal / HorizontalArc
    pub amplitude: f32,
    /// Sinusoidal (rad/sec)
    pub frequency: f32,
    /// VerticalPause / RandomAfterPause (секунды)
    pub pause_duration: f32,
    /// VerticalPause: normalized viewport y, используются по порядку
    pub stop_thresholds: Vec<f32>,
}

impl Default for MotionParameters {
    fn default() -> Self {
        Self {
            speed: 5.0,
            despawn_delay: 2.0,
            amplitude: 2.0,
            frequency: 2.0,
            pause_duration: 2.0,
            stop_thresholds: vec![0.5],
        }
    }
}

/// Target provider: entity, чья позиция читается каждый tick
///
/// `entity: None` или despawned entity → target отсутствует, режимы
/// FollowPlayer / DiagonalToPlayer просто не получают seek-движения.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionTarget {
    pub entity: Option<Entity>,
}

impl MotionTarget {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity: Some(entity),
        }
    }
}

/// Фаза pause-and-resume последовательности
///
/// Заменяет coroutine: всё "ожидание" — это таймер, который уменьшается
/// каждый tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MotionPhase {
    /// Обычное движение режима
    #[default]
    Cruising,
    /// Остановка, скорость = 0
    Paused {
        /// Сколько ещё стоять (секунды)
        remaining: f32,
    },
    /// После паузы: движение по фиксированному направлению до выхода из viewport
    Seeking { direction: Vec3 },
    /// DiagonalToPlayer вылетел за экран — стоим до деспавна
    Drifted,
}

/// Per-entity состояние MotionController
///
/// Источник правды для позиции врага; `Transform` синхронизируется из него
/// после каждого tick.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct MotionState {
    pub mode: MovementMode,
    pub position: Vec3,
    pub rotation: Quat,
    /// Позиция спавна (Sinusoidal / HorizontalArc)
    pub start_position: Vec3,
    /// Время с момента спавна (секунды)
    pub elapsed: f32,
    pub phase: MotionPhase,
    /// Индекс следующего stop threshold (только растёт)
    pub stop_index: usize,
    /// Позиция target, захваченная в конце паузы DiagonalToPlayer
    pub last_target_position: Option<Vec3>,
    /// Выставляется один раз при первом выходе за экран
    pub despawn_scheduled: bool,
    /// Оставшееся время до удаления (None — таймер не запущен)
    pub despawn_timer: Option<f32>,
    /// Таймер деспавна истёк, entity должна быть удалена
    pub despawned: bool,
}

impl MotionState {
    pub fn new(mode: MovementMode, position: Vec3) -> Self {
        Self {
            mode,
            position,
            rotation: Quat::IDENTITY,
            start_position: position,
            elapsed: 0.0,
            phase: MotionPhase::Cruising,
            stop_index: 0,
            last_target_position: None,
            despawn_scheduled: false,
            despawn_timer: None,
            despawned: false,
        }
    }

    /// true пока идёт pause-and-resume последовательность
    ///
    /// RandomAfterPause сбрасывает флаг после выхода из viewport,
    /// DiagonalToPlayer — никогда.
    pub fn is_paused(&self) -> bool {
        !matches!(self.phase, MotionPhase::Cruising)
    }

    /// Скорость с учётом паузы (во время Paused — ноль)
    pub fn effective_speed(&self, params: &MotionParameters) -> f32 {
        match self.phase {
            MotionPhase::Paused { .. } => 0.0,
            _ => params.speed,
        }
    }

    pub fn to_transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.rotation)
    }
}
