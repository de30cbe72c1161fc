//! Waypoint domain — линейное движение по фиксированному списку точек
//!
//! Переход к следующей точке по прибытии не реализован: walker доходит до
//! первой точки и стоит. Поведение сохраняется намеренно, пока не решено,
//! нужен ли patrol loop (см. DESIGN.md).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};


/// Waypoint walker (component)
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointWalker {
    /// world units/sec
    pub speed: f32,
    pub waypoints: Vec<Vec3>,
    /// Индекс текущей целевой точки
    pub current: usize,
}

impl Default for WaypointWalker {
    fn default() -> Self {
        Self {
            speed: 2.0,
            waypoints: Vec::new(),
            current: 0,
        }
    }
}

impl WaypointWalker {
    pub fn new(speed: f32, waypoints: Vec<Vec3>) -> Self {
        Self {
            speed,
            waypoints,
            current: 0,
        }
    }

    pub fn current_target(&self) -> Option<Vec3> {
        self.waypoints.get(self.current).copied()
    }

    /// Один tick: сдвиг к текущей точке на `speed × dt` без перелёта
    ///
    /// Возвращает true, если позиция совпадает с целью (прибыли).
    pub fn step(&mut self, position: &mut Vec3, dt: f32) -> bool {
        let Some(target) = self.current_target() else {
            return false;
        };

        if *position == target {
            // TODO: patrol loop (current = (current + 1) % len) — ждёт решения по level design
            return true;
        }

        let offset = target - *position;
        let max_step = self.speed * dt;
        if offset.length() <= max_step {
            *position = target;
        } else {
            *position += offset.normalize() * max_step;
        }

        *position == target
    }
}

/// Система: двигаем всех walkers к их текущей точке
pub fn advance_waypoint_walkers(
    mut walkers: Query<(Entity, &mut WaypointWalker, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (entity, mut walker, mut transform) in walkers.iter_mut() {
        let was_at_target = walker.current_target() == Some(transform.translation);
        let arrived = walker.step(&mut transform.translation, delta);

        if arrived && !was_at_target {
            crate::logger::log(&format!(
                "Walker {:?} reached waypoint {} at {:?}",
                entity, walker.current, transform.translation
            ));
        }
    }
}

/// Waypoint Plugin
pub struct WaypointPlugin;

impl Plugin for WaypointPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, advance_waypoint_walkers);
    }
}

/// Helper: spawn walker в `position`
pub fn spawn_walker(commands: &mut Commands, position: Vec3, walker: WaypointWalker) -> Entity {
    commands
        .spawn((walker, Transform::from_translation(position)))
        .id()
}
