use super::{
    errors::SpawnError,
    model::TickerMetrics,
    result::SpawnResult,
    stopwatch::Stopwatch,
};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread,
    time::{Duration, Instant},
};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};


pub type TickFn = dyn Fn(Duration) + Send + Sync + 'static;

#[derive(Default)]
struct Counters {
    starts: AtomicUsize,
    ticks: AtomicUsize,
    failed_ticks: AtomicUsize,
    overruns: AtomicUsize,
}

/// Поток ticker'а и его сигнал остановки. Закрытие `stop` будит
/// ожидание немедленно.
struct TickerWorker {
    stop: Sender<()>,
    handle: thread::JoinHandle<()>,
}


pub struct TickerBuilder {
    name: Option<String>,
}

impl TickerBuilder {
    #[inline]
    pub fn name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn build<F>(self, callback: F, interval: Duration) -> Ticker
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        Ticker {
            interval,
            callback: Arc::new(callback),
            name: self.name.unwrap_or_else(|| "threadwork-ticker".to_string()),
            worker: Mutex::new(None),
            running: AtomicBool::new(false),
            counters: Arc::new(Counters::default()),
        }
    }
}


/// Периодический вызов callback'а в фоновом потоке с коррекцией дрейфа.
///
/// Следующее пробуждение считается от предыдущего *запланированного*
/// момента, а не от текущего времени, поэтому медленный callback не
/// растягивает средний период. Callback получает фактическое время,
/// прошедшее с предыдущего вызова.
///
/// Паники callback'а перехватываются и считаются в
/// [`TickerMetrics::failed_ticks`], ticker продолжает работу.
///
/// `stop()` (и `Drop`) не возвращается, пока поток не завершился:
/// после него callback больше не вызывается. Вызывать `stop()` из
/// самого callback'а нельзя; `is_running()` из callback'а безопасен.
pub struct Ticker {
    interval: Duration,
    callback: Arc<TickFn>,
    name: String,
    /// Сериализует `start`/`stop`; `is_running` её не трогает.
    worker: Mutex<Option<TickerWorker>>,
    running: AtomicBool,
    counters: Arc<Counters>,
}

impl Ticker {
    pub fn new<F>(callback: F, interval: Duration) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        Self::builder().build(callback, interval)
    }

    pub fn from_micros<F>(callback: F, interval_us: u64) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        Self::new(callback, Duration::from_micros(interval_us))
    }

    #[inline]
    pub fn builder() -> TickerBuilder {
        TickerBuilder { name: None }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn lock_worker(&self) -> MutexGuard<'_, Option<TickerWorker>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Запускает ticker. `false`, если он уже работает.
    pub fn start(&self) -> bool {
        self.try_start().is_ok()
    }

    pub fn try_start(&self) -> SpawnResult<()> {
        let mut worker = self.lock_worker();
        if worker.is_some() {
            return Err(SpawnError::AlreadyRunning);
        }

        let (stop_tx, stop_rx) = channel::bounded::<()>(0);
        let interval = self.interval;
        let callback = Arc::clone(&self.callback);
        let counters = Arc::clone(&self.counters);

        let handle = thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || tick_loop(interval, callback.as_ref(), &stop_rx, &counters))?;

        self.counters.starts.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(ticker = %self.name, ?interval, "ticker started");

        *worker = Some(TickerWorker {
            stop: stop_tx,
            handle,
        });
        self.running.store(true, Ordering::Release);
        Ok(())
    }

    /// Останавливает ticker и дожидается завершения потока.
    /// `false`, если он не был запущен.
    pub fn stop(&self) -> bool {
        self.try_stop().is_ok()
    }

    pub fn try_stop(&self) -> SpawnResult<()> {
        // Блокировка держится до join: второй поток не стартует, пока жив первый
        let mut guard = self.lock_worker();
        let TickerWorker { stop, handle } = guard.take().ok_or(SpawnError::NotRunning)?;

        drop(stop);
        if handle.join().is_err() {
            tracing::warn!(ticker = %self.name, "ticker thread exited abnormally");
        }
        self.running.store(false, Ordering::Release);
        tracing::debug!(ticker = %self.name, "ticker stopped");
        Ok(())
    }

    pub fn metrics(&self) -> TickerMetrics {
        // failed_ticks раньше ticks: снимок не даст failed_ticks > ticks
        let failed_ticks = self.counters.failed_ticks.load(Ordering::Acquire);
        let ticks = self.counters.ticks.load(Ordering::Acquire);
        TickerMetrics {
            starts: self.counters.starts.load(Ordering::Relaxed),
            ticks,
            failed_ticks,
            overruns: self.counters.overruns.load(Ordering::Relaxed),
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        let _ = self.try_stop();
    }
}


fn tick_loop(interval: Duration, callback: &TickFn, stop: &Receiver<()>, counters: &Counters) {
    let mut since_last = Stopwatch::new();
    let mut scheduled = Instant::now();

    loop {
        scheduled = match scheduled.checked_add(interval) {
            Some(next) => next,
            None => {
                // Интервал не представим как момент времени: ждём только stop
                let _ = stop.recv();
                break;
            }
        };
        let now = Instant::now();
        if scheduled < now {
            // Callback не уложился в интервал: следующий тик сразу, без догоняющей серии
            counters.overruns.fetch_add(1, Ordering::Relaxed);
            scheduled = now;
        }

        match stop.recv_deadline(scheduled) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let elapsed = since_last.lap();
        counters.ticks.fetch_add(1, Ordering::Release);
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(elapsed))) {
            counters.failed_ticks.fetch_add(1, Ordering::Release);
            let err = SpawnError::from_panic(payload);
            tracing::warn!(error = %err, "ticker callback panicked, continuing");
        }
    }
}
