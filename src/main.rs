//! Headless demo driver
//!
//! Builds a seeded level and runs a scripted session at the fixed timestep,
//! logging a summary once per simulated second. Rendering, input polling and
//! scene management belong to the embedding game, not this binary.
//!
//! Usage: `rubble-raid [seed] [tuning.json]`

use glam::Vec2;

use rubble_raid::consts::SIM_DT;
use rubble_raid::sim::{GameState, TickInput, tick};
use rubble_raid::tuning::Tuning;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

    // Optional tuning override from a JSON blob
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::warn!("bad tuning file {path}: {e}; using defaults");
                    Tuning::default()
                }
            },
            Err(e) => {
                log::warn!("cannot read {path}: {e}; using defaults");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    log::info!("starting demo run with seed {seed}");
    let mut state = match GameState::new(seed, tuning) {
        Ok(state) => state,
        Err(e) => {
            log::error!("level generation failed: {e}");
            std::process::exit(1);
        }
    };

    // Scripted session: wander a square patrol while firing ahead on the
    // horizontal legs
    let legs = [Vec2::X, Vec2::Y, Vec2::NEG_X, Vec2::NEG_Y];
    let total_ticks = 3840; // 32 simulated seconds
    for n in 0..total_ticks {
        let leg = (n / 240) % legs.len();
        let input = TickInput {
            move_dir: legs[leg],
            look_dir: Vec2::ZERO,
            fire: leg % 2 == 0,
        };
        tick(&mut state, &input, SIM_DT);

        if n % 120 == 119 {
            let center = state.player.center();
            log::info!(
                "t={:>4} pos=({:6.1},{:6.1}) speed={:5.1} heading={:+.2} shots={} pickups_left={}",
                n + 1,
                center.x,
                center.y,
                state.player.vel.length(),
                state.player.heading,
                state.projectiles.len(),
                state.pickups.len()
            );
        }
    }

    log::info!("demo complete after {} ticks", state.time_ticks);
}
