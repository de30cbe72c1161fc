//! Tests for MotionController.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::motion::{
        MotionController, MotionParameters, MotionPhase, MotionState, MovementMode, StepReport,
    };
    use crate::shared::OrthographicViewport;

    const EPS: f32 = 1e-4;

    /// Экран 10 × 10, центр в (0,0): viewport y 0.5 → world y 0
    fn controller() -> MotionController<OrthographicViewport> {
        MotionController::new(OrthographicViewport::from_size(10.0, 10.0))
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn params(speed: f32) -> MotionParameters {
        MotionParameters {
            speed,
            ..Default::default()
        }
    }

    /// Прогоняет `ticks` шагов, возвращает все reports
    fn run(
        controller: &MotionController<OrthographicViewport>,
        state: &mut MotionState,
        params: &MotionParameters,
        dt: f32,
        ticks: usize,
        target: Option<Vec3>,
    ) -> Vec<StepReport> {
        let mut rng = rng();
        (0..ticks)
            .map(|_| controller.step(state, params, dt, target, &mut rng))
            .collect()
    }

    #[test]
    fn test_vertical_example_half_unit_per_tick() {
        let controller = controller();
        let params = params(5.0);
        let mut state = MotionState::new(MovementMode::Vertical, Vec3::new(0.0, 4.0, 0.0));
        let mut rng = rng();

        let mut previous = state.position.y;
        for _ in 0..5 {
            controller.step(&mut state, &params, 0.1, None, &mut rng);
            assert!((previous - state.position.y - 0.5).abs() < EPS);
            assert_eq!(state.position.x, 0.0);
            previous = state.position.y;
        }
    }

    #[test]
    fn test_vertical_and_horizontal_displacement() {
        let controller = controller();
        let params = params(2.0);

        let mut vertical = MotionState::new(MovementMode::Vertical, Vec3::ZERO);
        run(&controller, &mut vertical, &params, 0.25, 8, None);
        // 2.0 × 8 × 0.25 = 4.0 (точно в f32)
        assert_eq!(vertical.position, Vec3::new(0.0, -4.0, 0.0));

        let mut horizontal = MotionState::new(MovementMode::Horizontal, Vec3::ZERO);
        run(&controller, &mut horizontal, &params, 0.25, 8, None);
        assert_eq!(horizontal.position, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_sinusoidal_uses_absolute_elapsed_time() {
        let controller = controller();
        let params = MotionParameters {
            speed: 1.0,
            amplitude: 2.0,
            frequency: 3.0,
            ..Default::default()
        };
        let start = Vec3::new(1.0, 4.0, 0.5);
        let mut state = MotionState::new(MovementMode::Sinusoidal, start);

        run(&controller, &mut state, &params, 0.5, 3, None);

        let t = 1.5;
        assert!((state.position.x - (1.0 + (t * 3.0f32).sin() * 2.0)).abs() < EPS);
        assert!((state.position.y - (4.0 - t)).abs() < EPS);
        assert_eq!(state.position.z, 0.5);
    }

    #[test]
    fn test_horizontal_arc_peaks_at_half_width() {
        let controller = controller();
        let params = MotionParameters {
            speed: 1.0,
            amplitude: 1.0,
            ..Default::default()
        };
        let mut state = MotionState::new(MovementMode::HorizontalArc, Vec3::new(-2.0, 1.0, 0.0));

        // Первый tick: progress = 0 → y остаётся на startY
        run(&controller, &mut state, &params, 0.25, 1, None);
        assert!((state.position.y - 1.0).abs() < EPS);
        assert!((state.position.x + 1.75).abs() < EPS);

        // Ещё 4 tick: progress считается от x ДО шага → последний offset при x = -1.0
        run(&controller, &mut state, &params, 0.25, 4, None);
        // x = -1.0 → progress = 0.5 → y = startY + amplitude
        assert!((state.position.x + 0.75).abs() < EPS);
        assert!((state.position.y - 2.0).abs() < EPS);
    }

    #[test]
    fn test_vertical_pause_single_stop_then_ascends() {
        let controller = controller();
        let params = MotionParameters {
            speed: 1.0,
            pause_duration: 1.0,
            stop_thresholds: vec![0.5],
            ..Default::default()
        };
        let mut state = MotionState::new(MovementMode::VerticalPause, Vec3::new(0.0, 1.0, 0.0));
        let mut rng = rng();

        // 4 tick спуска до линии y = 0
        for _ in 0..4 {
            let report = controller.step(&mut state, &params, 0.25, None, &mut rng);
            assert_eq!(report.pause_started, None);
        }
        assert!(state.position.y.abs() < EPS);

        // Tick 5: пересекли линию → пауза
        let report = controller.step(&mut state, &params, 0.25, None, &mut rng);
        assert_eq!(report.pause_started, Some(1.0));
        assert!(state.is_paused());

        // 4 tick × 0.25 = pause_duration — без движения
        let frozen = state.position;
        let mut finished = 0;
        for _ in 0..4 {
            let report = controller.step(&mut state, &params, 0.25, None, &mut rng);
            assert_eq!(state.position, frozen);
            assert_eq!(report.pause_started, None, "пауза не должна стартовать повторно");
            if report.pause_finished {
                finished += 1;
            }
        }
        assert_eq!(finished, 1);
        assert_eq!(state.stop_index, 1);
        assert!(!state.is_paused());

        // Дальше только вверх, больше никаких пауз
        let reports = run(&controller, &mut state, &params, 0.25, 8, None);
        assert!(reports.iter().all(|r| r.pause_started.is_none()));
        assert!((state.position.y - 2.0).abs() < EPS);
    }

    #[test]
    fn test_vertical_pause_consumes_thresholds_in_order() {
        let controller = controller();
        let params = MotionParameters {
            speed: 2.0,
            pause_duration: 0.5,
            stop_thresholds: vec![0.7, 0.3],
            ..Default::default()
        };
        let mut state = MotionState::new(MovementMode::VerticalPause, Vec3::new(0.0, 4.0, 0.0));

        let reports = run(&controller, &mut state, &params, 0.125, 200, None);
        let pauses = reports.iter().filter(|r| r.pause_started.is_some()).count();

        assert_eq!(pauses, 2);
        assert_eq!(state.stop_index, 2);
    }

    #[test]
    fn test_vertical_pause_below_next_threshold_pauses_immediately() {
        let controller = controller();
        let params = MotionParameters {
            speed: 1.0,
            pause_duration: 0.5,
            stop_thresholds: vec![0.5, 0.8],
            ..Default::default()
        };
        // Уже ниже обеих линий
        let mut state = MotionState::new(MovementMode::VerticalPause, Vec3::new(0.0, -1.0, 0.0));

        let reports = run(&controller, &mut state, &params, 0.25, 6, None);
        let pauses: Vec<usize> = reports
            .iter()
            .enumerate()
            .filter(|(_, r)| r.pause_started.is_some())
            .map(|(i, _)| i)
            .collect();

        // Пауза 0: tick 0, заканчивается на tick 2; следующая — сразу на tick 3
        assert_eq!(pauses, vec![0, 3]);
        assert_eq!(state.position.y, -1.0);
    }

    #[test]
    fn test_random_after_pause_direction_is_unit() {
        let controller = controller();
        let params = MotionParameters {
            speed: 4.0,
            pause_duration: 0.5,
            ..Default::default()
        };
        let mut state = MotionState::new(MovementMode::RandomAfterPause, Vec3::new(0.0, 0.0, 0.0));

        let reports = run(&controller, &mut state, &params, 0.25, 3, None);
        assert_eq!(reports[0].pause_started, Some(0.5));

        let direction = reports
            .iter()
            .find_map(|r| r.direction_chosen)
            .expect("direction must be chosen after pause");
        assert!((direction.length() - 1.0).abs() < EPS);
        assert_eq!(direction.z, 0.0);
        assert!(matches!(state.phase, MotionPhase::Seeking { .. }));

        // Следующий tick: движение вдоль direction
        let before = state.position;
        run(&controller, &mut state, &params, 0.25, 1, None);
        assert!((state.position - (before + direction)).length() < EPS);
    }

    #[test]
    fn test_random_after_pause_clears_paused_after_leaving_screen() {
        let controller = controller();
        let params = MotionParameters {
            speed: 10.0,
            pause_duration: 0.25,
            despawn_delay: 100.0,
            ..Default::default()
        };
        let mut state = MotionState::new(MovementMode::RandomAfterPause, Vec3::ZERO);
        let mut rng = rng();

        let mut left_screen = false;
        for _ in 0..20 {
            controller.step(&mut state, &params, 0.25, None, &mut rng);
            if state.despawn_scheduled && !state.is_paused() {
                left_screen = true;
                break;
            }
        }
        assert!(left_screen, "враг должен уйти с экрана и сбросить paused");
        assert!(!state.despawned);
    }

    #[test]
    fn test_random_directions_are_independent_per_pause() {
        let controller = controller();
        let params = MotionParameters {
            speed: 10.0,
            pause_duration: 0.25,
            despawn_delay: 1000.0,
            ..Default::default()
        };
        let mut state = MotionState::new(MovementMode::RandomAfterPause, Vec3::ZERO);

        let reports = run(&controller, &mut state, &params, 0.25, 400, None);
        let directions: Vec<Vec3> = reports.iter().filter_map(|r| r.direction_chosen).collect();

        // Уходя за экран вниз, враг снова встаёт на паузу и тянет новое направление
        assert!(directions.len() >= 2, "ожидали несколько пауз, получили {}", directions.len());
        assert_ne!(directions[0], directions[1]);
        for direction in directions {
            assert!((direction.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_diagonal_captures_target_once() {
        let controller = controller();
        let params = MotionParameters {
            speed: 1.0,
            despawn_delay: 100.0,
            ..Default::default()
        };
        // Линия броска: viewport y 0.33 → world y -1.7; стартуем сразу под ней
        let mut state =
            MotionState::new(MovementMode::DiagonalToPlayer, Vec3::new(0.0, -2.0, 0.0));
        let mut rng = rng();

        let report = controller.step(&mut state, &params, 0.25, None, &mut rng);
        assert_eq!(report.pause_started, Some(1.0));

        // Во время паузы target двигается — это не важно
        for _ in 0..3 {
            let report =
                controller.step(&mut state, &params, 0.25, Some(Vec3::new(0.0, 4.0, 0.0)), &mut rng);
            assert!(!report.pause_finished);
            assert_eq!(state.last_target_position, None);
        }

        // Конец паузы: target читается здесь
        let target = Vec3::new(3.0, -2.0, 0.0);
        let report = controller.step(&mut state, &params, 0.25, Some(target), &mut rng);
        assert!(report.pause_finished);
        assert_eq!(state.last_target_position, Some(target));
        assert_eq!(report.direction_chosen, Some(Vec3::X));

        // Target уходит — направление не меняется
        let before = state.position;
        controller.step(&mut state, &params, 0.5, Some(Vec3::new(-5.0, 5.0, 0.0)), &mut rng);
        assert!((state.position - (before + Vec3::new(0.5, 0.0, 0.0))).length() < EPS);
        assert_eq!(state.last_target_position, Some(target));
    }

    #[test]
    fn test_diagonal_descends_along_minus_one_minus_one() {
        let controller = controller();
        let params = params(1.0);
        let mut state = MotionState::new(MovementMode::DiagonalToPlayer, Vec3::new(2.0, 4.0, 0.0));

        run(&controller, &mut state, &params, 0.5, 2, None);

        let expected = Vec3::new(2.0, 4.0, 0.0) + Vec3::new(-1.0, -1.0, 0.0).normalize();
        assert!((state.position - expected).length() < EPS);
    }

    #[test]
    fn test_diagonal_without_target_holds_still() {
        let controller = controller();
        let params = params(3.0);
        let mut state =
            MotionState::new(MovementMode::DiagonalToPlayer, Vec3::new(0.0, -2.0, 0.0));

        // пауза 1 сек + 4 tick после
        run(&controller, &mut state, &params, 0.25, 9, None);

        assert_eq!(state.position, Vec3::new(0.0, -2.0, 0.0));
        assert!(state.is_paused());
    }

    #[test]
    fn test_diagonal_stays_paused_after_leaving_screen() {
        let controller = controller();
        let params = MotionParameters {
            speed: 20.0,
            despawn_delay: 100.0,
            ..Default::default()
        };
        let mut state =
            MotionState::new(MovementMode::DiagonalToPlayer, Vec3::new(0.0, -2.0, 0.0));
        let target = Some(Vec3::new(0.0, -20.0, 0.0));

        run(&controller, &mut state, &params, 0.25, 12, target);

        assert_eq!(state.phase, MotionPhase::Drifted);
        let parked = state.position;
        run(&controller, &mut state, &params, 0.25, 4, target);
        assert_eq!(state.position, parked);
    }

    #[test]
    fn test_follow_player_moves_and_turns() {
        let controller = controller();
        let params = params(2.0);
        let mut state = MotionState::new(MovementMode::FollowPlayer, Vec3::ZERO);
        let target = Some(Vec3::new(4.0, 0.0, 0.0));

        run(&controller, &mut state, &params, 0.05, 1, target);

        // Позиция — без сглаживания
        assert!((state.position - Vec3::new(0.1, 0.0, 0.0)).length() < EPS);
        // Поворот — частично (factor 0.5), в сторону -90°
        let (_, _, angle) = state.rotation.to_euler(EulerRot::XYZ);
        assert!(angle < 0.0 && angle > -std::f32::consts::FRAC_PI_2);

        // Большой dt → factor clamp до 1 → сразу целевой угол
        run(&controller, &mut state, &params, 0.5, 1, target);
        let (_, _, angle) = state.rotation.to_euler(EulerRot::XYZ);
        assert!((angle + std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn test_follow_player_without_target_is_noop() {
        let controller = controller();
        let params = params(2.0);
        let mut state = MotionState::new(MovementMode::FollowPlayer, Vec3::new(1.0, 1.0, 0.0));

        run(&controller, &mut state, &params, 0.1, 10, None);

        assert_eq!(state.position, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(state.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_despawn_scheduled_once_and_fires_once() {
        let controller = controller();
        let params = MotionParameters {
            speed: 4.0,
            despawn_delay: 12.0,
            ..Default::default()
        };
        // Horizontal из-за левого края: off → on (tick 1) → off (tick 10)
        let mut state = MotionState::new(MovementMode::Horizontal, Vec3::new(-6.0, 0.0, 0.0));

        let reports = run(&controller, &mut state, &params, 0.25, 60, None);

        let scheduled = reports.iter().filter(|r| r.despawn_scheduled).count();
        let due: Vec<usize> = reports
            .iter()
            .enumerate()
            .filter(|(_, r)| r.despawn_due)
            .map(|(i, _)| i)
            .collect();

        assert_eq!(scheduled, 1);
        assert!(reports[0].despawn_scheduled);
        // Таймер 12 сек = 48 tick после планирования, повторный выход не считается
        assert_eq!(due, vec![48]);
        assert!(state.despawned);
    }

    /// Сколько tick'ов после старта паузы до `pause_finished`
    fn ticks_until_pause_finished(dt: f32, duration: f32) -> usize {
        let controller = controller();
        let params = MotionParameters {
            speed: 1.0,
            pause_duration: duration,
            stop_thresholds: vec![0.5],
            ..Default::default()
        };
        // Уже под линией остановки: пауза стартует на первом tick'е
        let mut state = MotionState::new(MovementMode::VerticalPause, Vec3::new(0.0, -1.0, 0.0));
        let mut rng = rng();

        let report = controller.step(&mut state, &params, dt, None, &mut rng);
        assert_eq!(report.pause_started, Some(duration));

        (1..=10_000)
            .find(|_| controller.step(&mut state, &params, dt, None, &mut rng).pause_finished)
            .expect("пауза должна закончиться")
    }

    #[test]
    fn test_pause_lasts_exact_tick_count_at_60hz() {
        let dt = 1.0 / 60.0;

        assert_eq!(ticks_until_pause_finished(dt, 2.0), 120);
        assert_eq!(ticks_until_pause_finished(dt, 1.0), 60);
        assert_eq!(ticks_until_pause_finished(0.1, 0.3), 3);
        // Не кратно tick'у: заканчивается на первом tick'е после duration
        assert_eq!(ticks_until_pause_finished(0.25, 0.6), 3);
    }

    #[test]
    fn test_despawn_delay_exact_tick_count_at_60hz() {
        let controller = controller();
        let params = MotionParameters {
            speed: 1.0,
            despawn_delay: 2.0,
            ..Default::default()
        };
        let mut state = MotionState::new(MovementMode::Vertical, Vec3::new(0.0, -6.0, 0.0));

        let reports = run(&controller, &mut state, &params, 1.0 / 60.0, 200, None);
        let due: Vec<usize> = reports
            .iter()
            .enumerate()
            .filter(|(_, r)| r.despawn_due)
            .map(|(i, _)| i)
            .collect();

        assert!(reports[0].despawn_scheduled);
        // 2 сек × 60 Hz = 120 tick после планирования
        assert_eq!(due, vec![120]);
    }

    #[test]
    fn test_despawned_state_is_frozen() {
        let controller = controller();
        let params = MotionParameters {
            speed: 1.0,
            despawn_delay: 0.0,
            ..Default::default()
        };
        let mut state = MotionState::new(MovementMode::Vertical, Vec3::new(0.0, -6.0, 0.0));

        run(&controller, &mut state, &params, 0.25, 2, None);
        assert!(state.despawned);

        let frozen = state.clone();
        let reports = run(&controller, &mut state, &params, 0.25, 5, None);
        assert_eq!(state, frozen);
        assert!(reports.iter().all(|r| *r == StepReport::default()));
    }
}
