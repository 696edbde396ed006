//! Search configuration.

use std::time::Duration;

/// Deepest main-search depth a configuration may ask for.
pub const MAX_DEPTH: u32 = 32;

/// Deepest quiescence ply a configuration may ask for.
pub const MAX_QSEARCH_PLY: usize = 64;

/// Default main-search depth.
pub const DEFAULT_DEPTH: u32 = 4;

/// Default quiescence ply cap. Even, so the opponent always gets the last capture.
pub const DEFAULT_QSEARCH_PLY: usize = 24;

/// Errors for configuration values outside their supported range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Depth must be at least one and at most [`MAX_DEPTH`].
    #[error("search depth must be between 1 and {MAX_DEPTH}, got {value}")]
    Depth {
        /// The rejected depth.
        value: u32,
    },

    /// Quiescence ply cap above [`MAX_QSEARCH_PLY`].
    #[error("quiescence ply cap must be at most {MAX_QSEARCH_PLY}, got {value}")]
    QsearchPly {
        /// The rejected ply cap.
        value: usize,
    },
}

/// Immutable knobs for one engine instance.
///
/// Built once and handed to [`Engine::new`](crate::Engine::new). Changing a
/// setting means building a new config and calling
/// [`Engine::set_config`](crate::Engine::set_config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Iterative deepening stops after this depth.
    pub max_depth: u32,
    /// Quiescence recursion stops at this ply below the main-search leaf.
    pub max_qsearch_ply: usize,
    /// Order main-search moves (PV, TT hint, capture tiers).
    pub sort_moves: bool,
    /// Order quiescence moves by victim and attacker.
    pub sort_qsearch_moves: bool,
    /// Cache quiescence bounds between visits.
    pub use_quiescence_table: bool,
    /// Stop deepening once a completed depth has used this much time.
    /// [`Duration::ZERO`] disables the cutoff.
    pub time_budget: Duration,
}

impl SearchConfig {
    /// Check every field against its supported range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH {
            return Err(ConfigError::Depth {
                value: self.max_depth,
            });
        }
        if self.max_qsearch_ply > MAX_QSEARCH_PLY {
            return Err(ConfigError::QsearchPly {
                value: self.max_qsearch_ply,
            });
        }
        Ok(())
    }

    /// Copy of this config with a different depth.
    pub fn with_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Copy of this config with a different quiescence ply cap.
    pub fn with_qsearch_ply(mut self, max_qsearch_ply: usize) -> Self {
        self.max_qsearch_ply = max_qsearch_ply;
        self
    }

    /// Copy of this config with a different time budget.
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    /// The time budget, or `None` when the cutoff is disabled.
    pub fn budget(&self) -> Option<Duration> {
        (!self.time_budget.is_zero()).then_some(self.time_budget)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            max_qsearch_ply: DEFAULT_QSEARCH_PLY,
            sort_moves: true,
            sort_qsearch_moves: true,
            use_quiescence_table: true,
            time_budget: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.max_qsearch_ply, 24);
        assert!(config.budget().is_none());
    }

    #[test]
    fn zero_depth_rejected() {
        let config = SearchConfig::default().with_depth(0);
        assert_eq!(config.validate(), Err(ConfigError::Depth { value: 0 }));
    }

    #[test]
    fn oversized_qsearch_rejected() {
        let config = SearchConfig::default().with_qsearch_ply(MAX_QSEARCH_PLY + 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::QsearchPly { .. })
        ));
    }

    #[test]
    fn zero_qsearch_ply_allowed() {
        let config = SearchConfig::default().with_qsearch_ply(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn budget_set() {
        let config = SearchConfig::default().with_time_budget(Duration::from_millis(250));
        assert_eq!(config.budget(), Some(Duration::from_millis(250)));
    }
}
