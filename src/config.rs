//! Page configuration.
//!
//! Defaults describe the shipped page (a five-cell practice row with three coins).
//! With the `serde_json` feature a page may pass a partial JSON object; missing
//! keys keep their defaults.

use crate::error::TutorialError;
use crate::sim::PORTAL_THRESHOLD;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TutorialConfig {
    /// Number of cells in the practice row.
    pub cells: usize,
    /// Cells that start with a coin.
    pub coin_cells: Vec<usize>,
    pub portal_threshold: usize,
    /// Pause between two executed tokens, in milliseconds.
    pub step_delay_ms: i32,
    /// Repeat count used when a `for(` block has no readable bound.
    pub repeat_fallback: usize,
    /// Coins drawn on the land map.
    pub map_coins: usize,
    /// `tracing` filter directive, e.g. `info` or `coin_quest=debug`.
    pub log_level: String,
}

impl Default for TutorialConfig {
    fn default() -> Self {
        Self {
            cells: 5,
            coin_cells: vec![1, 2, 3],
            portal_threshold: PORTAL_THRESHOLD,
            step_delay_ms: 600,
            repeat_fallback: 2,
            map_coins: 3,
            log_level: "info".to_string(),
        }
    }
}

impl TutorialConfig {
    pub fn validate(&self) -> Result<(), TutorialError> {
        if self.cells == 0 {
            return Err(TutorialError::InvalidConfig("cells must be at least 1".into()));
        }
        if let Some(bad) = self.coin_cells.iter().find(|&&i| i >= self.cells) {
            return Err(TutorialError::InvalidConfig(format!(
                "coin cell {bad} is outside 0..{}",
                self.cells
            )));
        }
        if self.portal_threshold == 0 {
            return Err(TutorialError::InvalidConfig("portal_threshold must be at least 1".into()));
        }
        if self.step_delay_ms < 0 {
            return Err(TutorialError::InvalidConfig("step_delay_ms must not be negative".into()));
        }
        Ok(())
    }

    /// Size the map from the coins the page actually draws. Returns whether the
    /// configured count had to change.
    pub fn adopt_map_coins(&mut self, found: usize) -> bool {
        let changed = self.map_coins != found;
        self.map_coins = found;
        changed
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, TutorialError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TutorialError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = TutorialConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.cells, 5);
        assert_eq!(c.portal_threshold, 3);
        assert_eq!(c.step_delay_ms, 600);
    }

    #[test]
    fn rejects_bad_values() {
        let zero = TutorialConfig { cells: 0, coin_cells: vec![], ..TutorialConfig::default() };
        assert!(matches!(zero.validate(), Err(TutorialError::InvalidConfig(_))));
        let stray = TutorialConfig { coin_cells: vec![5], ..TutorialConfig::default() };
        assert!(stray.validate().is_err());
        let threshold = TutorialConfig { portal_threshold: 0, ..TutorialConfig::default() };
        assert!(threshold.validate().is_err());
    }

    #[test]
    fn map_coins_follow_the_page() {
        let mut c = TutorialConfig::default();
        assert!(!c.adopt_map_coins(3));
        assert!(c.adopt_map_coins(5));
        assert_eq!(c.map_coins, 5);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let c = TutorialConfig::from_json(r#"{ "cells": 8, "coin_cells": [2, 4, 7] }"#).unwrap();
        assert_eq!(c.cells, 8);
        assert_eq!(c.coin_cells, vec![2, 4, 7]);
        assert_eq!(c.step_delay_ms, 600);
        assert_eq!(c.log_level, "info");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_errors_surface() {
        assert!(matches!(TutorialConfig::from_json("{ nope"), Err(TutorialError::Config(_))));
        assert!(matches!(
            TutorialConfig::from_json(r#"{ "cells": 2, "coin_cells": [3] }"#),
            Err(TutorialError::InvalidConfig(_))
        ));
    }
}
