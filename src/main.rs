//! Star Swarm entry point
//!
//! Native builds run a headless autopilot session on simulated time and log
//! the HUD; rendering and input belong to the embedding front-end.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, anyhow};

    use star_swarm::consts::SIM_DT;
    use star_swarm::persistence::JsonFileStore;
    use star_swarm::sim::{Phase, Session};
    use star_swarm::{GameRunner, ManualClock, Tuning};

    #[derive(Debug, Clone, PartialEq)]
    pub struct RunConfig {
        pub seconds: u32,
        pub seed: Option<u64>,
        pub tuning: Option<PathBuf>,
        pub scores: PathBuf,
    }

    impl Default for RunConfig {
        fn default() -> Self {
            Self {
                seconds: 60,
                seed: None,
                tuning: None,
                scores: PathBuf::from("star_swarm_scores.json"),
            }
        }
    }

    pub fn parse_args(args: &[String]) -> Result<RunConfig> {
        let mut config = RunConfig::default();
        let mut i = 0usize;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = || {
                args.get(i + 1)
                    .ok_or_else(|| anyhow!("missing value for {}", flag))
            };
            match flag {
                "--seconds" => {
                    let v = value()?;
                    config.seconds = v
                        .parse()
                        .map_err(|_| anyhow!("invalid --seconds value: {}", v))?;
                }
                "--seed" => {
                    let v = value()?;
                    config.seed = Some(
                        v.parse()
                            .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                    );
                }
                "--tuning" => config.tuning = Some(PathBuf::from(value()?)),
                "--scores" => config.scores = PathBuf::from(value()?),
                other => return Err(anyhow!("unknown argument: {}", other)),
            }
            i += 2;
        }
        Ok(config)
    }

    fn time_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run(config: RunConfig) -> Result<()> {
        let tuning = match &config.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seed = config.seed.unwrap_or_else(time_seed);

        // Simulated time: one frame per tick, no sleeping
        let clock = ManualClock::new(0);
        let store = JsonFileStore::new(&config.scores);
        let session = Session::new(tuning, seed, Box::new(clock.clone()), Box::new(store));
        let mut runner = GameRunner::new(session);
        runner.set_autopilot(true);
        runner.start().context("failed to start run")?;

        let frame_ms = (SIM_DT * 1000.0).round() as u64;
        let total_frames = config.seconds as u64 * star_swarm::consts::TICK_RATE_HZ as u64;
        for frame in 1..=total_frames {
            clock.advance(frame_ms);
            let report = runner.frame(SIM_DT);

            for t in &report.transitions {
                log::info!("[{:>6}ms] {:?} -> {:?}", t.timestamp_ms, t.from, t.to);
            }
            if let Some(high) = report.new_high_score {
                log::debug!("New high score {}", high);
            }
            if frame % star_swarm::consts::TICK_RATE_HZ as u64 == 0 {
                let hud = runner.hud();
                log::info!(
                    "score {:>8.1} | lives {} | level {:>2} | high {:>8.1} | enemies {:>2}",
                    hud.score,
                    hud.lives,
                    hud.level,
                    hud.high_score,
                    runner.snapshot().enemies.len()
                );
            }
            if runner.phase() == Phase::GameOver {
                break;
            }
        }

        let hud = runner.hud();
        println!(
            "Final score {:.1} on level {} (high score {:.1})",
            hud.score, hud.level, hud.high_score
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    star_swarm::platform::init_logging();
    log::info!("Star Swarm (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = headless::parse_args(&args)?;
    headless::run(config)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser front-end drives `GameRunner` directly
}
