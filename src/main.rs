//! Skate Runner entry point
//!
//! The browser build is driven by the host engine through the `wasm` module.
//! Natively this runs a scripted headless session, which is handy for
//! checking a tuning file or a seed.
//!
//! Usage: `skate-runner [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use skate_runner::Tuning;
    use skate_runner::headless::HeadlessPhysics;
    use skate_runner::sim::{ColliderRegistry, GameEvent, TickInput, World, tick};

    env_logger::init();
    log::info!("Skate Runner (native, headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => match s.parse::<u64>() {
            Ok(seed) => seed,
            Err(e) => {
                log::error!("Invalid seed {s:?}: {e}");
                std::process::exit(2);
            }
        },
        None => 12345,
    };
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(2);
            }
        },
        None => Tuning::default(),
    };

    let mut host = ColliderRegistry::new();
    let mut world = World::generate(tuning, seed, &mut host);
    let mut physics = HeadlessPhysics::new();
    log::info!("{} colliders registered", host.len());

    // Skate right, jump on a fixed rhythm and throw a spin at the top
    let (mut jumps, mut spins, mut respawns) = (0u32, 0u32, 0u32);
    let mut max_x = world.player.pos.x;
    for t in 0..3600u32 {
        for event in physics.step(&mut world) {
            world.handle_collision(&event);
        }
        let input = TickInput {
            right: true,
            jump: t % 75 == 0,
            trick_a: t % 75 == 15,
            trick_b: t % 75 == 15,
            ..Default::default()
        };
        for event in tick(&mut world, &input) {
            match event {
                GameEvent::Jumped => jumps += 1,
                GameEvent::SpinCompleted => spins += 1,
                GameEvent::Respawned => {
                    respawns += 1;
                    physics.reset();
                }
                _ => {}
            }
        }
        max_x = max_x.max(world.player.pos.x);
    }

    log::info!(
        "Session done after {} ticks: furthest x={:.0} of {:.0}, {} jumps, {} spins, {} respawns",
        world.time_ticks,
        max_x,
        world.terrain.width(),
        jumps,
        spins,
        respawns
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry is `skate_runner::wasm::start`
}
