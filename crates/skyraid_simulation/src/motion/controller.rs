//! MotionController — per-tick шаг движения врага
//!
//! Чистая логика без ECS: `step` принимает состояние, параметры, dt,
//! live target позицию и RNG, мутирует состояние и возвращает
//! `StepReport` с one-shot переходами этого tick'а.
//!
//! Порядок внутри tick:
//! 1. elapsed += dt
//! 2. Paused → уменьшаем таймер, по истечении follow-up переход (без движения)
//! 3. Иначе движение по режиму
//! 4. Off-screen despawn tracking (независимо от режима)

use std::f32::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI, TAU};

use bevy::prelude::*;
use rand::Rng;

use super::components::{
    MotionParameters, MotionPhase, MotionState, MovementMode, DIAGONAL_DIVE_DELAY,
    DIAGONAL_DIVE_VIEWPORT_Y, FOLLOW_TURN_RATE, RANDOM_PAUSE_VIEWPORT_Y, STOP_VIEWPORT_X,
};
use crate::shared::Viewport;

/// Направление диагонального спуска DiagonalToPlayer: (-1, -1) normalized
const DIAGONAL_DIRECTION: Vec3 = Vec3::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2, 0.0);

/// Доля tick'а, на которую таймер может недосчитать из-за накопленной
/// ошибки f32 (1/60 не представимо точно)
const TIMER_TICK_TOLERANCE: f32 = 0.05;

/// Что произошло за один tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Началась пауза (длительность в секундах)
    pub pause_started: Option<f32>,
    /// Пауза закончилась в этом tick
    pub pause_finished: bool,
    /// Направление броска, выбранное по окончании паузы
    pub direction_chosen: Option<Vec3>,
    /// Впервые ушли за экран — запущен таймер удаления
    pub despawn_scheduled: bool,
    /// Таймер удаления истёк — host должен удалить entity
    pub despawn_due: bool,
}

/// Контроллер движения с инжектированным viewport mapping
#[derive(Debug, Clone)]
pub struct MotionController<V: Viewport> {
    viewport: V,
}

impl<V: Viewport> MotionController<V> {
    pub fn new(viewport: V) -> Self {
        Self { viewport }
    }

    /// Один simulation tick
    ///
    /// `target` — live позиция target'а в этом tick'е (`None` если provider
    /// отсутствует). После `despawn_due` состояние замораживается.
    pub fn step<R: Rng + ?Sized>(
        &self,
        state: &mut MotionState,
        params: &MotionParameters,
        dt: f32,
        target: Option<Vec3>,
        rng: &mut R,
    ) -> StepReport {
        let mut report = StepReport::default();
        if state.despawned {
            return report;
        }

        state.elapsed += dt;

        if let MotionPhase::Paused { remaining } = &mut state.phase {
            if countdown(remaining, dt) {
                self.finish_pause(state, target, rng, &mut report);
            }
        } else {
            match state.mode {
                MovementMode::Vertical => {
                    state.position += Vec3::NEG_Y * state.effective_speed(params) * dt;
                }
                MovementMode::Horizontal => {
                    state.position += Vec3::X * state.effective_speed(params) * dt;
                }
                MovementMode::Sinusoidal => move_sinusoidal(state, params),
                MovementMode::HorizontalArc => move_horizontal_arc(state, params, dt),
                MovementMode::VerticalPause => self.move_with_stops(state, params, dt, &mut report),
                MovementMode::FollowPlayer => follow_target(state, params, dt, target),
                MovementMode::RandomAfterPause => {
                    self.move_random_after_pause(state, params, dt, &mut report)
                }
                MovementMode::DiagonalToPlayer => {
                    self.move_diagonal_to_target(state, params, dt, &mut report)
                }
            }
        }

        self.track_despawn(state, params, dt, &mut report);

        report
    }

    /// World y для viewport точки (STOP_VIEWPORT_X, viewport_y)
    fn stop_line(&self, viewport_y: f32) -> f32 {
        self.viewport
            .viewport_to_world(Vec2::new(STOP_VIEWPORT_X, viewport_y))
            .y
    }

    fn move_with_stops(
        &self,
        state: &mut MotionState,
        params: &MotionParameters,
        dt: f32,
        report: &mut StepReport,
    ) {
        let Some(&threshold) = params.stop_thresholds.get(state.stop_index) else {
            // Все остановки пройдены — уходим вверх
            state.position += Vec3::Y * state.effective_speed(params) * dt;
            return;
        };

        if state.position.y <= self.stop_line(threshold) {
            start_pause(state, params.pause_duration, report);
        } else {
            state.position += Vec3::NEG_Y * state.effective_speed(params) * dt;
        }
    }

    fn move_random_after_pause(
        &self,
        state: &mut MotionState,
        params: &MotionParameters,
        dt: f32,
        report: &mut StepReport,
    ) {
        match state.phase {
            MotionPhase::Cruising => {
                if state.position.y <= self.stop_line(RANDOM_PAUSE_VIEWPORT_Y) {
                    start_pause(state, params.pause_duration, report);
                } else {
                    state.position += Vec3::NEG_Y * state.effective_speed(params) * dt;
                }
            }
            MotionPhase::Seeking { direction } => {
                if self.viewport.is_on_screen(state.position) {
                    state.position += direction * state.effective_speed(params) * dt;
                } else {
                    // Ушли с экрана — paused флаг сброшен, режим оценивается заново
                    state.phase = MotionPhase::Cruising;
                }
            }
            MotionPhase::Paused { .. } | MotionPhase::Drifted => {}
        }
    }

    fn move_diagonal_to_target(
        &self,
        state: &mut MotionState,
        params: &MotionParameters,
        dt: f32,
        report: &mut StepReport,
    ) {
        match state.phase {
            MotionPhase::Cruising => {
                if state.position.y <= self.stop_line(DIAGONAL_DIVE_VIEWPORT_Y) {
                    start_pause(state, DIAGONAL_DIVE_DELAY, report);
                } else {
                    state.position += DIAGONAL_DIRECTION * state.effective_speed(params) * dt;
                }
            }
            MotionPhase::Seeking { direction } => {
                if self.viewport.is_on_screen(state.position) {
                    state.position += direction * state.effective_speed(params) * dt;
                } else {
                    state.phase = MotionPhase::Drifted;
                }
            }
            MotionPhase::Paused { .. } | MotionPhase::Drifted => {}
        }
    }

    /// Follow-up переход по окончании паузы (зависит от режима)
    fn finish_pause<R: Rng + ?Sized>(
        &self,
        state: &mut MotionState,
        target: Option<Vec3>,
        rng: &mut R,
        report: &mut StepReport,
    ) {
        report.pause_finished = true;

        match state.mode {
            MovementMode::RandomAfterPause => {
                let direction = random_unit_direction(rng);
                state.phase = MotionPhase::Seeking { direction };
                report.direction_chosen = Some(direction);
            }
            MovementMode::DiagonalToPlayer => {
                // Target читается ровно один раз — здесь
                if let Some(position) = target {
                    state.last_target_position = Some(position);
                }
                let direction = state
                    .last_target_position
                    .map(|position| planar_direction(state.position, position))
                    .unwrap_or(Vec3::ZERO);
                state.phase = MotionPhase::Seeking { direction };
                report.direction_chosen = Some(direction);
            }
            _ => {
                state.stop_index += 1;
                state.phase = MotionPhase::Cruising;
            }
        }
    }

    /// Off-screen despawn: таймер запускается один раз за жизнь entity
    fn track_despawn(
        &self,
        state: &mut MotionState,
        params: &MotionParameters,
        dt: f32,
        report: &mut StepReport,
    ) {
        if let Some(remaining) = &mut state.despawn_timer {
            if countdown(remaining, dt) {
                state.despawn_timer = None;
                state.despawned = true;
                report.despawn_due = true;
            }
            return;
        }

        if !state.despawn_scheduled && !self.viewport.is_on_screen(state.position) {
            state.despawn_scheduled = true;
            state.despawn_timer = Some(params.despawn_delay);
            report.despawn_scheduled = true;
        }
    }
}

/// Уменьшает таймер на dt, true когда он истёк
fn countdown(remaining: &mut f32, dt: f32) -> bool {
    *remaining -= dt;
    *remaining <= dt * TIMER_TICK_TOLERANCE
}

/// Пауза не re-entrant: повторный старт во время паузы — no-op
fn start_pause(state: &mut MotionState, duration: f32, report: &mut StepReport) {
    if state.is_paused() {
        return;
    }
    state.phase = MotionPhase::Paused {
        remaining: duration,
    };
    report.pause_started = Some(duration);
}

fn move_sinusoidal(state: &mut MotionState, params: &MotionParameters) {
    let t = state.elapsed;
    let start = state.start_position;
    state.position = Vec3::new(
        start.x + (t * params.frequency).sin() * params.amplitude,
        start.y - params.speed * t,
        state.position.z,
    );
}

fn move_horizontal_arc(state: &mut MotionState, params: &MotionParameters, dt: f32) {
    let start = state.start_position;
    let y_offset = if params.amplitude == 0.0 {
        0.0
    } else {
        let progress = (state.position.x - start.x) / (params.amplitude * 2.0);
        (progress * PI).sin() * params.amplitude
    };

    state.position.x += state.effective_speed(params) * dt;
    state.position.y = start.y + y_offset;
}

fn follow_target(
    state: &mut MotionState,
    params: &MotionParameters,
    dt: f32,
    target: Option<Vec3>,
) {
    let Some(target) = target else {
        return;
    };

    let direction = planar_direction(state.position, target);
    if direction == Vec3::ZERO {
        return;
    }

    // Спрайт смотрит вдоль +Y, поэтому -90°
    let angle = direction.y.atan2(direction.x);
    let goal = Quat::from_rotation_z(angle - FRAC_PI_2);
    state.rotation = state.rotation.lerp(goal, (FOLLOW_TURN_RATE * dt).min(1.0));
    state.position += direction * state.effective_speed(params) * dt;
}

/// Unit direction в плоскости XY (z = 0); ноль если точки совпадают
fn planar_direction(from: Vec3, to: Vec3) -> Vec3 {
    (to - from).truncate().normalize_or_zero().extend(0.0)
}

/// Равномерно распределённое направление на единичной окружности
pub fn random_unit_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let angle = rng.gen_range(0.0..TAU);
    Vec3::new(angle.cos(), angle.sin(), 0.0)
}
