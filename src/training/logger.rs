//! Verbosity-gated training progress logging.
//!
//! Messages go through the [`log`] facade, so the application decides
//! where they end up. [`Verbosity`] gates them before they reach `log`.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::OptimizerState;

/// How much training progress to report.
///
/// Levels are ordered, so `verbosity >= Verbosity::Info` reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Nothing at all.
    Silent,
    /// Only warnings, e.g. hitting the sweep limit.
    #[default]
    Warning,
    /// Start/finish summaries with initial and final cost.
    Info,
    /// Per-sweep statistics. Computing the cost is a full pass over the data.
    Debug,
}

/// Training progress logger.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    start: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            start: None,
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Whether messages at `level` are emitted.
    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn start_training(&mut self, max_sweeps: usize, num_coefficients: usize) {
        self.start = Some(Instant::now());
        if self.enabled(Verbosity::Info) {
            log::info!(
                "coordinate descent: {num_coefficients} coefficients, up to {max_sweeps} sweeps"
            );
        }
    }

    pub fn log_initial(&self, cost: f64, gradient_norm_sq: f64) {
        if self.enabled(Verbosity::Info) {
            log::info!("initial cost {cost:.6}, squared gradient norm {gradient_norm_sq:.6e}");
        }
    }

    /// Log named values for one sweep.
    pub fn log_round(&self, round: usize, values: &[(&str, f64)]) {
        if !self.enabled(Verbosity::Debug) {
            return;
        }
        let formatted: Vec<String> = values
            .iter()
            .map(|(name, value)| format!("{name}={value:.6}"))
            .collect();
        log::debug!("[{round}] {}", formatted.join(" "));
    }

    pub fn warn(&self, message: &str) {
        if self.enabled(Verbosity::Warning) {
            log::warn!("{message}");
        }
    }

    pub fn finish_training(&self, sweeps: usize, state: OptimizerState, final_cost: Option<f64>) {
        if !self.enabled(Verbosity::Info) {
            return;
        }
        let elapsed = self.start.map(|s| s.elapsed().as_secs_f64()).unwrap_or(0.0);
        match final_cost {
            Some(cost) => log::info!(
                "finished after {sweeps} sweeps ({state:?}) in {elapsed:.3}s, final cost {cost:.6}"
            ),
            None => log::info!("finished after {sweeps} sweeps ({state:?}) in {elapsed:.3}s"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_ordering() {
        assert!(Verbosity::Debug > Verbosity::Info);
        assert!(Verbosity::Info > Verbosity::Warning);
        assert!(Verbosity::Warning > Verbosity::Silent);
        assert_eq!(Verbosity::default(), Verbosity::Warning);
    }

    #[test]
    fn gating() {
        let silent = TrainingLogger::new(Verbosity::Silent);
        assert!(!silent.enabled(Verbosity::Warning));
        assert!(!silent.enabled(Verbosity::Silent));

        let info = TrainingLogger::new(Verbosity::Info);
        assert!(info.enabled(Verbosity::Warning));
        assert!(info.enabled(Verbosity::Info));
        assert!(!info.enabled(Verbosity::Debug));
    }

    #[test]
    fn verbosity_serde() {
        let json = serde_json::to_string(&Verbosity::Debug).unwrap();
        assert_eq!(json, "\"debug\"");
        let back: Verbosity = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(back, Verbosity::Info);
    }
}
