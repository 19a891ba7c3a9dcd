//! Run score, best score and its persistence.

use swing_engine::KeyValueStore;

/// Storage key of the best score. The value is the score as a decimal string.
pub const BEST_SCORE_KEY: &str = "bestScore";

/// What a finished run amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u32,
    pub best_score: u32,
    pub new_best: bool,
}

pub struct Scoreboard {
    score: u32,
    best: u32,
    store: Box<dyn KeyValueStore>,
}

impl Scoreboard {
    /// Read the best score once. Anything unreadable counts as 0.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let best = match store.load(BEST_SCORE_KEY) {
            Ok(Some(value)) => parse_score(&value).unwrap_or_else(|| {
                log::warn!("ignoring unreadable best score {:?}", value);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::warn!("could not load best score: {}", e);
                0
            }
        };
        log::info!("best score: {}", best);
        Self { score: 0, best, store }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Score is the highest level reached this run. Returns whether it changed.
    pub fn update_score(&mut self, level: u32) -> bool {
        if level > self.score {
            self.score = level;
            true
        } else {
            false
        }
    }

    /// Close the run: fold the score into the best, persist it and start over at 0.
    pub fn commit_run(&mut self) -> RunSummary {
        let score = std::mem::take(&mut self.score);
        let new_best = score > self.best;
        if new_best {
            self.best = score;
            if let Err(e) = self.store.save(BEST_SCORE_KEY, &score.to_string()) {
                log::warn!("could not save best score: {}", e);
            }
        }
        RunSummary { score, best_score: self.best, new_best }
    }
}

/// Lenient integer parse: `"12"`, `" 12 "` and `"12.7"` all read as 12.
fn parse_score(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(n) = value.parse::<u32>() {
        return Some(n);
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Some(n.floor().min(u32::MAX as f64) as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use swing_engine::storage::{Result, StoreError};
    use swing_engine::MemoryStore;

    /// A store whose reads and writes always fail.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Err(StoreError::Unavailable("broken".into()))
        }

        fn save(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(StoreError::Unavailable("broken".into()))
        }
    }

    #[test]
    fn loads_stored_best() {
        let board = Scoreboard::load(Box::new(MemoryStore::new().with_value(BEST_SCORE_KEY, "7")));
        assert_eq!(board.best(), 7);
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn unreadable_best_is_zero() {
        let board = Scoreboard::load(Box::new(MemoryStore::new().with_value(BEST_SCORE_KEY, "abc")));
        assert_eq!(board.best(), 0);
        let board = Scoreboard::load(Box::new(BrokenStore));
        assert_eq!(board.best(), 0);
    }

    #[test]
    fn parse_is_lenient() {
        assert_eq!(parse_score("12"), Some(12));
        assert_eq!(parse_score(" 3 "), Some(3));
        assert_eq!(parse_score("12.7"), Some(12));
        assert_eq!(parse_score("-4"), None);
        assert_eq!(parse_score("NaN"), None);
    }

    #[test]
    fn score_is_highest_level() {
        let mut board = Scoreboard::load(Box::new(MemoryStore::new()));
        assert!(board.update_score(1));
        assert!(board.update_score(3));
        assert!(!board.update_score(2));
        assert_eq!(board.score(), 3);
    }

    #[test]
    fn commit_updates_best_and_resets() {
        let mut board = Scoreboard::load(Box::new(MemoryStore::new().with_value(BEST_SCORE_KEY, "4")));
        board.update_score(6);
        let summary = board.commit_run();
        assert_eq!(summary, RunSummary { score: 6, best_score: 6, new_best: true });
        assert_eq!(board.score(), 0);

        board.update_score(2);
        let summary = board.commit_run();
        assert_eq!(summary, RunSummary { score: 2, best_score: 6, new_best: false });
    }

    #[test]
    fn save_failure_keeps_best_in_memory() {
        let mut board = Scoreboard::load(Box::new(BrokenStore));
        board.update_score(5);
        assert_eq!(board.commit_run().best_score, 5);
        assert_eq!(board.best(), 5);
    }

    proptest! {
        #[test]
        fn best_is_max_of_runs(runs in prop::collection::vec(prop::collection::vec(0u32..50, 0..8), 1..6)) {
            let mut board = Scoreboard::load(Box::new(MemoryStore::new()));
            let mut expected_best = 0;
            for levels in runs {
                let mut last = 0;
                for level in levels {
                    board.update_score(level);
                    prop_assert!(board.score() >= last, "score went down");
                    last = board.score();
                }
                expected_best = expected_best.max(board.score());
                let summary = board.commit_run();
                prop_assert_eq!(summary.best_score, expected_best);
                prop_assert_eq!(board.score(), 0);
            }
        }
    }
}
