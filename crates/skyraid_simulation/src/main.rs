//! Headless симуляция SKYRAID
//!
//! Usage: `skyraid_simulation [scenario.ron] [ticks]`
//!
//! Без аргументов — demo сценарий (по врагу каждого режима + walker).

use bevy::prelude::*;
use skyraid_simulation::{
    create_headless_app, drain_events, init_logger, log_error, log_info, log_warning, run_fixed_tick,
    set_log_level, DespawnScheduled, Enemy, EnemyDespawned, LogLevel, MotionPaused, MotionResumed,
    Scenario, SimulationPlugin,
};

fn main() {
    init_logger();
    // Per-tick debug сообщения систем в headless прогоне не нужны
    set_log_level(LogLevel::Info);
    let mut args = std::env::args().skip(1);

    let mut scenario = match args.next() {
        Some(path) => match Scenario::load(&path) {
            Ok(scenario) => scenario,
            Err(err) => {
                log_error(&format!("Failed to load scenario {}: {}", path, err));
                std::process::exit(1);
            }
        },
        None => Scenario::demo(),
    };

    if let Some(ticks) = args.next() {
        match ticks.parse() {
            Ok(ticks) => scenario.ticks = ticks,
            Err(_) => log_warning(&format!("Ignoring invalid tick count {:?}", ticks)),
        }
    }

    let mut app = create_headless_app(scenario.seed);
    app.add_plugins(SimulationPlugin);
    scenario.spawn_into(&mut app);

    log_info(&format!(
        "Starting SKYRAID headless simulation (seed: {}, {} ticks @ {}Hz)",
        scenario.seed, scenario.ticks, scenario.tick_hz
    ));

    let dt = (1.0 / scenario.tick_hz) as f32;
    let mut despawned = 0;
    let mut pauses = 0;
    for tick in 0..scenario.ticks {
        run_fixed_tick(&mut app, dt);

        let world = app.world_mut();
        despawned += drain_events::<EnemyDespawned>(world).len();
        pauses += drain_events::<MotionPaused>(world).len();
        drain_events::<MotionResumed>(world);
        drain_events::<DespawnScheduled>(world);

        if tick % 60 == 0 {
            let alive = world.query_filtered::<(), With<Enemy>>().iter(world).count();
            log_info(&format!(
                "Tick {}: {} enemies alive, {} despawned, {} pauses",
                tick, alive, despawned, pauses
            ));
        }
    }

    log_info("Simulation complete!");
}
