//! Retro Arcade entry point
//!
//! In the browser the library's `WebGame` is the entry point and this binary
//! does nothing. Natively it runs games headlessly and logs how they ended:
//!
//! ```text
//! RUST_LOG=info retro-arcade [game ...] [--frames N] [--seed N]
//! ```

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "retro-arcade")]
#[command(about = "Run arcade games headlessly and log how each round ended")]
struct Args {
    /// Games to run (breakout, pong, snake, asteroids, maze-chase); all when omitted
    games: Vec<retro_arcade::GameKind>,

    /// Frames to run each game for
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// RNG seed shared by every game
    #[arg(long)]
    seed: Option<u64>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> retro_arcade::Result<()> {
    use retro_arcade::platform::HeadlessHost;
    use retro_arcade::{EngineConfig, GameKind, GameLoopEngine, create_game};

    env_logger::init();

    let args = Args::parse();
    let config = EngineConfig {
        seed: args.seed,
        ..EngineConfig::default()
    };
    let kinds = if args.games.is_empty() {
        GameKind::ALL.to_vec()
    } else {
        args.games
    };

    log::info!("Retro Arcade (native, headless) running {} game(s)", kinds.len());

    for kind in kinds {
        let game = create_game(kind, &config);
        let mut engine = GameLoopEngine::new(HeadlessHost::default(), game, config.clone());
        engine.start();
        let ran = engine.run_for(args.frames);
        let hud = engine.host().recording().texts().join(" | ");
        log::info!(
            "{kind}: {ran} frames, {} ticks, {} fps, phase {:?} [{hud}]",
            engine.ticks(),
            engine.fps(),
            engine.game().phase()
        );
        engine.destroy();
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start hook; this is just to satisfy the compiler
}
