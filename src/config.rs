use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::scores::DEFAULT_SCORE_FILE;

/// Asteroids in the terminal.
#[derive(Debug, Parser)]
#[command(name = "rustroids", version, about)]
pub struct Args {
    /// Seed for the game's random number generator (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// File holding the all-time high score
    #[arg(long, default_value = DEFAULT_SCORE_FILE)]
    pub high_score_file: PathBuf,

    /// Where log output goes; the terminal is taken by the game
    #[arg(long, default_value = "rustroids.log")]
    pub log_file: PathBuf,

    /// Disable sound
    #[arg(long)]
    pub mute: bool,

    /// Milliseconds between frames
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,
}

impl Args {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
