//! Operation progress reporting.
//!
//! Operations count units of work (files, ranges, pages) through a
//! [`Progress`] counter; each completed unit reports
//! `(done / total) * 100` through an optional callback. Reported values are
//! monotonically non-decreasing and the final tick lands on exactly 100.

use serde::{Deserialize, Serialize};

/// Snapshot of a running operation, shaped for status displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStatus {
    pub is_loading: bool,
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressStatus {
    pub fn idle() -> Self {
        ProgressStatus {
            is_loading: false,
            progress: 0.0,
            message: None,
            error: None,
        }
    }

    pub fn running(progress: f64, message: impl Into<String>) -> Self {
        ProgressStatus {
            is_loading: true,
            progress,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn finished() -> Self {
        ProgressStatus {
            is_loading: false,
            progress: 100.0,
            message: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        ProgressStatus {
            is_loading: false,
            progress: 0.0,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Unit-of-work counter for one operation.
pub struct Progress<'a> {
    total: usize,
    done: usize,
    callback: Option<Box<dyn FnMut(f64) + 'a>>,
}

impl<'a> Progress<'a> {
    /// Counter that reports through `callback`.
    pub fn new(callback: impl FnMut(f64) + 'a) -> Self {
        Progress {
            total: 0,
            done: 0,
            callback: Some(Box::new(callback)),
        }
    }

    /// Counter that reports to nobody.
    pub fn silent() -> Self {
        Progress {
            total: 0,
            done: 0,
            callback: None,
        }
    }

    /// Set the number of units of work and reset the count.
    pub fn start(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    /// Record one completed unit and report the new percentage.
    pub fn tick(&mut self) {
        if self.done < self.total {
            self.done += 1;
        }
        let percent = self.percent();
        if let Some(callback) = self.callback.as_mut() {
            callback(percent);
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.done as f64 / self.total as f64) * 100.0
        }
    }
}

impl Default for Progress<'_> {
    fn default() -> Self {
        Progress::silent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tick_reports_quarters() {
        let mut seen = Vec::new();
        {
            let mut progress = Progress::new(|p| seen.push(p));
            progress.start(4);
            for _ in 0..4 {
                progress.tick();
            }
        }
        assert_eq!(seen, vec![25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn test_final_tick_is_exactly_one_hundred() {
        let mut last = 0.0;
        {
            let mut progress = Progress::new(|p| last = p);
            progress.start(3);
            for _ in 0..3 {
                progress.tick();
            }
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn test_reports_are_monotonic() {
        let mut seen = Vec::new();
        {
            let mut progress = Progress::new(|p| seen.push(p));
            progress.start(7);
            for _ in 0..7 {
                progress.tick();
            }
        }
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_extra_ticks_stay_clamped() {
        let mut progress = Progress::silent();
        progress.start(2);
        for _ in 0..5 {
            progress.tick();
        }
        assert_eq!(progress.percent(), 100.0);
    }

    #[test]
    fn test_zero_total_reports_zero() {
        let progress = Progress::silent();
        assert_eq!(progress.percent(), 0.0);
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let status = ProgressStatus::running(50.0, "Splitting range 1 of 2");
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"isLoading\":true"));
        assert!(json.contains("\"progress\":50.0"));
        assert!(!json.contains("\"error\""));
    }
}
