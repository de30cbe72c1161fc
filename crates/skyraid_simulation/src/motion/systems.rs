//! Motion systems (FixedUpdate)

use bevy::prelude::*;

use super::components::{Enemy, MotionParameters, MotionState, MotionTarget};
use super::controller::MotionController;
use super::events::{DespawnScheduled, EnemyDespawned, MotionPaused, MotionResumed};
use crate::shared::ActiveViewport;
use crate::DeterministicRng;

/// Система: один tick MotionController для всех врагов
///
/// Target позиция резолвится из `MotionTarget` каждый tick. Удалённый или
/// не назначенный target → `None`, без паники.
pub fn drive_enemy_motion(
    mut enemies: Query<
        (
            Entity,
            &mut MotionState,
            &MotionParameters,
            Option<&MotionTarget>,
        ),
        With<Enemy>,
    >,
    targets: Query<&Transform>,
    viewport: Res<ActiveViewport>,
    mut sim_rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut paused_events: EventWriter<MotionPaused>,
    mut resumed_events: EventWriter<MotionResumed>,
    mut scheduled_events: EventWriter<DespawnScheduled>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    let controller = MotionController::new(&viewport.0);
    let rng = &mut sim_rng.rng;

    for (entity, mut state, params, target) in enemies.iter_mut() {
        if state.despawned {
            continue;
        }

        let target_position = target
            .and_then(|target| target.entity)
            .and_then(|target| targets.get(target).ok())
            .map(|transform| transform.translation);

        let report = controller.step(&mut state, params, delta, target_position, rng);

        if let Some(duration) = report.pause_started {
            crate::logger::log(&format!(
                "⏸ {:?} ({:?}) paused for {:.2}s at {:?}",
                entity, state.mode, duration, state.position
            ));
            paused_events.write(MotionPaused { entity, duration });
        }

        if report.pause_finished {
            crate::logger::log(&format!(
                "▶ {:?} ({:?}) resumed, direction {:?}",
                entity, state.mode, report.direction_chosen
            ));
            resumed_events.write(MotionResumed {
                entity,
                direction: report.direction_chosen,
            });
        }

        if report.despawn_scheduled {
            crate::logger::log(&format!(
                "{:?} left the screen at {:?}, despawn in {:.2}s",
                entity, state.position, params.despawn_delay
            ));
            scheduled_events.write(DespawnScheduled {
                entity,
                delay: params.despawn_delay,
            });
        }
    }
}

/// Система: MotionState → Transform (позиция + поворот, scale не трогаем)
pub fn sync_enemy_transforms(
    mut enemies: Query<(&MotionState, &mut Transform), (With<Enemy>, Changed<MotionState>)>,
) {
    for (state, mut transform) in enemies.iter_mut() {
        transform.translation = state.position;
        transform.rotation = state.rotation;
    }
}

/// Система: удаление врагов с истёкшим despawn таймером
///
/// Host'овый removal primitive — это despawn entity. Вызывается ровно
/// один раз: после despawn entity больше не попадает в query.
pub fn remove_despawned_enemies(
    mut commands: Commands,
    enemies: Query<(Entity, &MotionState), With<Enemy>>,
    mut despawned_events: EventWriter<EnemyDespawned>,
) {
    for (entity, state) in enemies.iter() {
        if !state.despawned {
            continue;
        }

        crate::logger::log_info(&format!("Despawning enemy {:?} (off-screen timeout)", entity));
        commands.entity(entity).despawn();
        despawned_events.write(EnemyDespawned { entity });
    }
}
