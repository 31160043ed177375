use serde::{Deserialize, Serialize};

/// Counts from one pipeline pass.
///
/// - `total`: message records decoded from the document
/// - `retained`: records left after the filter
/// - `rendered`: lines produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total: usize,
    pub retained: usize,
    pub rendered: usize,
}

impl ProcessingStats {
    pub fn new(total: usize, retained: usize, rendered: usize) -> Self {
        Self {
            total,
            retained,
            rendered,
        }
    }

    /// Messages that did not make it into the output, for any reason.
    pub fn dropped(&self) -> usize {
        self.total.saturating_sub(self.rendered)
    }

    /// Messages removed by the filter alone.
    pub fn filtered_out(&self) -> usize {
        self.total.saturating_sub(self.retained)
    }

    /// Percentage of decoded messages that were rendered.
    #[allow(clippy::cast_precision_loss)]
    pub fn retention_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.rendered as f64 / self.total as f64) * 100.0
    }
}
