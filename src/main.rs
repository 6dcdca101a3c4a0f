//! Sweep2D entry point
//!
//! Runs the demo scene headless and logs what the player does.
//!
//! Usage: `sweep2d [SETTINGS.json] [--seed N] [--frames N] [--snapshot]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sweep2D (native) starting...");

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            log::error!("{message}");
            eprintln!("usage: sweep2d [SETTINGS.json] [--seed N] [--frames N] [--snapshot]");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&options) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless demo is native only
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
struct Options {
    settings: Option<String>,
    seed: u64,
    frames: u32,
    snapshot: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut options = Options {
            settings: None,
            seed: 12345,
            frames: 600,
            snapshot: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => options.seed = parse_value(&arg, args.next())?,
                "--frames" => options.frames = parse_value(&arg, args.next())?,
                "--snapshot" => options.snapshot = true,
                flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
                path => options.settings = Some(path.to_owned()),
            }
        }
        Ok(options)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|_| format!("invalid value for {flag}: {value}"))
}

#[cfg(not(target_arch = "wasm32"))]
fn run(options: &Options) -> Result<(), sweep2d::PhysicsError> {
    use sweep2d::Settings;
    use sweep2d::consts::SIM_DT;
    use sweep2d::sim::build_demo_scene;

    let settings = match &options.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    log::debug!("Settings: {settings:?}");

    let mut scene = build_demo_scene(settings, options.seed);
    let mut was_grounded = false;
    for frame in 1..=options.frames {
        scene.step(SIM_DT);

        let Some(player) = scene.sim.world.get(scene.player) else {
            break;
        };
        if player.on_ground != was_grounded {
            was_grounded = player.on_ground;
            log::info!(
                "Frame {frame}: player {} at {:.2}",
                if was_grounded { "landed" } else { "left the ground" },
                player.position
            );
        }
        if frame % 60 == 0 {
            log::info!(
                "t = {:.1}s: player at {:.2}, velocity {:.2}, support {:?}",
                frame as f32 * SIM_DT,
                player.position,
                player.velocity,
                player.support
            );
        }
    }

    log::info!(
        "Finished {} frames, scratch high-water mark {} points",
        scene.sim.frame,
        scene.sim.scratch.high_water()
    );

    if options.snapshot {
        println!("{}", serde_json::to_string_pretty(&scene.sim.world)?);
    }
    Ok(())
}
