//! Rink Hockey headless driver
//!
//! Plays a match against the AI with a scripted player paddle that shadows
//! the puck, printing every event as a JSON line and the final snapshot.
//!
//! Usage: `rink-hockey [CONFIG.json] [--seed N] [--ticks N]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    native::run(native::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly; nothing to drive here
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use glam::Vec2;
    use rink_hockey::GameConfig;
    use rink_hockey::sim::{GameEvent, GameState, TickInput, tick};

    const DEFAULT_TICKS: u64 = 60 * 60 * 3;
    const DEFAULT_SEED: u64 = 0x5eed;

    /// How far the scripted player sits in front of its goal
    const PLAYER_LINE: f32 = 90.0;
    /// Fraction of the remaining gap the scripted player closes per tick
    const PLAYER_LAG: f32 = 0.12;

    #[derive(Debug, Parser)]
    #[command(name = "rink-hockey")]
    #[command(about = "Play a headless air hockey match against the AI")]
    pub struct Args {
        /// JSON file overriding any subset of the game config
        pub config: Option<PathBuf>,
        /// Seed for the match RNG
        #[arg(long, default_value_t = DEFAULT_SEED)]
        pub seed: u64,
        /// Stop after this many ticks if nobody has won
        #[arg(long, default_value_t = DEFAULT_TICKS)]
        pub ticks: u64,
    }

    pub fn run(args: Args) -> Result<()> {
        let config = match &args.config {
            Some(path) => GameConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GameConfig::default(),
        };
        let frame_ms = config.frame_ms;

        log::info!(
            "Rink Hockey (headless) seed={} ticks={}",
            args.seed,
            args.ticks
        );
        let mut state = GameState::try_new(config, args.seed)?;
        let mut hand = state.player.pos;

        for _ in 0..args.ticks {
            // Shadow the puck's height from a fixed line, with some lag
            let aim = Vec2::new(PLAYER_LINE, state.puck.pos.y);
            hand += (aim - hand) * PLAYER_LAG;

            let events = tick(&mut state, &TickInput::pointer(hand), frame_ms);
            for event in &events {
                print_event(state.time_ms, event)?;
            }
            if state.score.game_over {
                break;
            }
        }

        let snapshot = serde_json::to_string_pretty(&state.snapshot())?;
        println!("{snapshot}");
        log::info!(
            "Finished after {} ticks: Player {} - AI {}",
            state.time_ticks,
            state.score.player,
            state.score.ai
        );
        Ok(())
    }

    fn print_event(time_ms: f64, event: &GameEvent) -> Result<()> {
        let mut line = serde_json::to_value(event)?;
        if let Some(fields) = line.as_object_mut() {
            fields.insert("time_ms".into(), serde_json::json!(time_ms.round()));
        }
        println!("{line}");
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_defaults() {
            let args = Args::try_parse_from(["rink-hockey"]).unwrap();
            assert!(args.config.is_none());
            assert_eq!(args.seed, DEFAULT_SEED);
            assert_eq!(args.ticks, DEFAULT_TICKS);
        }

        #[test]
        fn test_parse_flags_and_path() {
            let args = Args::try_parse_from([
                "rink-hockey",
                "rink.json",
                "--seed",
                "9",
                "--ticks",
                "120",
            ])
            .unwrap();
            assert_eq!(args.config, Some(PathBuf::from("rink.json")));
            assert_eq!(args.seed, 9);
            assert_eq!(args.ticks, 120);
        }

        #[test]
        fn test_parse_rejects_bad_input() {
            assert!(Args::try_parse_from(["rink-hockey", "--seed"]).is_err());
            assert!(Args::try_parse_from(["rink-hockey", "--ticks", "many"]).is_err());
            assert!(Args::try_parse_from(["rink-hockey", "--turbo"]).is_err());
        }

        #[test]
        fn test_missing_config_file_is_reported() {
            let args = Args::try_parse_from(["rink-hockey", "/definitely/not/here.json"]).unwrap();
            let err = run(args).unwrap_err();
            assert!(format!("{err:#}").contains("/definitely/not/here.json"));
        }
    }
}
