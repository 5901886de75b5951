use std::time::{Duration, Instant};


/// Секундомер на монотонных часах.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.started = Instant::now();
    }

    /// Время с момента создания или последнего `reset`.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Возвращает прошедшее время и сразу перезапускает отсчёт.
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.started);
        self.started = now;
        elapsed
    }
}
