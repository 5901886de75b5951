#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerMetrics {
    pub starts: usize,
    pub ticks: usize,
    pub failed_ticks: usize,
    pub overruns: usize,
}

impl TickerMetrics {
    pub fn success_rate(&self) -> f64 {
        if self.ticks == 0 {
            return 1.0;
        }
        self.ticks.saturating_sub(self.failed_ticks) as f64 / self.ticks as f64
    }

    pub fn overrun_rate(&self) -> f64 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.overruns as f64 / self.ticks as f64
    }
}
