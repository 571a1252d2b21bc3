//! Dungeon Horde headless runner
//!
//! Plays a scripted session against the simulation core and prints the final
//! snapshot as JSON.
//!
//! Usage: `dungeon-horde [settings.json] [seed] [character]`

#[cfg(not(target_arch = "wasm32"))]
use dungeon_horde::consts::SIM_DT;
#[cfg(not(target_arch = "wasm32"))]
use dungeon_horde::{CharacterId, Settings, Simulation, TickInput};

/// Seconds of gameplay the scripted run lasts
#[cfg(not(target_arch = "wasm32"))]
const RUN_SECONDS: u32 = 300;

/// Strafe in a square, switching direction every 1.5 s, and always take the
/// first level-up option
#[cfg(not(target_arch = "wasm32"))]
fn scripted_input(tick: u32) -> TickInput {
    let leg = (tick / 90) % 4;
    TickInput {
        up: leg == 0,
        right: leg == 1,
        down: leg == 2,
        left: leg == 3,
        choice: Some(1),
        pause: false,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: Option<&str>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    match std::fs::read_to_string(path) {
        Ok(json) => match Settings::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Failed to parse settings {}: {}, using defaults", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            log::warn!("Failed to read settings {}: {}, using defaults", path, e);
            Settings::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dungeon Horde (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    let settings = load_settings(args.get(1).map(String::as_str));
    let seed = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(42);
    let character = args.get(3).map_or(CharacterId::default(), |s| CharacterId::parse(s));

    let mut sim = Simulation::new(settings);
    sim.set_kill_hook(|kill| {
        if kill.total_kills % 100 == 0 {
            log::info!("{} kills", kill.total_kills);
        }
    });
    sim.start(seed, character);

    let total_ticks = (RUN_SECONDS as f32 / SIM_DT).round() as u32;
    let mut last = sim.snapshot();
    for tick in 0..total_ticks {
        last = sim.tick(&scripted_input(tick), SIM_DT);

        // Stand-in for a renderer caching chunk images
        if let Some(state) = sim.state_mut() {
            for coord in state.world.chunks_needing_render() {
                state.world.mark_rendered(coord);
            }
        }

        if last.as_ref().is_some_and(|s| s.is_dead) {
            log::info!("Died after {} ticks", tick + 1);
            break;
        }
    }
    sim.stop();

    match last.map(|snapshot| serde_json::to_string_pretty(&snapshot)) {
        Some(Ok(json)) => println!("{}", json),
        Some(Err(e)) => log::error!("Failed to serialize snapshot: {}", e),
        None => log::error!("No run to report"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation core is a library on the web; hosts drive `Simulation` directly
}
