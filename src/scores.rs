use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub const DEFAULT_SCORE_FILE: &str = "highscore.txt";

/// Where the all-time best score lives between sessions.
pub trait ScoreStore {
    /// Stored high score, 0 when nothing usable is stored.
    fn load(&self) -> u32;
    /// Best effort; a failed write is not reported to the caller.
    fn save(&mut self, score: u32);
}

/// High score kept as decimal text in a single file.
#[derive(Debug, Clone)]
pub struct HighScoreFile {
    path: PathBuf,
}

impl HighScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for HighScoreFile {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_FILE)
    }
}

impl ScoreStore for HighScoreFile {
    fn load(&self) -> u32 {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                debug!(path = %self.path.display(), "no high score on disk: {}", e);
                return 0;
            }
        };
        match text.trim().parse() {
            Ok(score) => score,
            Err(e) => {
                debug!(path = %self.path.display(), "ignoring unreadable high score: {}", e);
                0
            }
        }
    }

    fn save(&mut self, score: u32) {
        match fs::write(&self.path, score.to_string()) {
            Ok(()) => debug!(path = %self.path.display(), score, "high score saved"),
            Err(e) => warn!(path = %self.path.display(), "could not save high score: {}", e),
        }
    }
}
