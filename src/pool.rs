use super::{
    errors::SpawnError,
    result::SpawnResult,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, PoisonError,
};


/// Конфигурация пула потоков
#[derive(Debug, Clone)]
pub struct Config {
    pub num_threads: usize,
    pub thread_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            thread_name: "threadwork-worker".to_string(),
        }
    }
}

impl Config {
    pub fn cpu_bound() -> Self {
        Self {
            num_threads: num_cpus::get(),
            ..Default::default()
        }
    }

    pub fn io_bound() -> Self {
        Self {
            num_threads: num_cpus::get() * 2, // Для I/O-bound задач
            ..Default::default()
        }
    }

    pub fn with_threads(self, num_threads: usize) -> Self {
        Self { num_threads, ..self }
    }

    pub fn with_name(self, thread_name: impl Into<String>) -> Self {
        Self {
            thread_name: thread_name.into(),
            ..self
        }
    }
}


/// Индекс следующего невыданного элемента. Растёт монотонно и не
/// превышает длину входа, каждый индекс выдаётся ровно одному воркеру.
struct Cursor {
    next: AtomicUsize,
    len: usize,
}

impl Cursor {
    fn new(len: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            len,
        }
    }

    #[inline]
    fn claim(&self) -> Option<usize> {
        self.next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |idx| {
                (idx < self.len).then_some(idx + 1)
            })
            .ok()
    }
}


/// Таблица результатов: слот на каждый индекс, пишется не более одного раза.
struct ResultTable<U> {
    slots: Vec<Mutex<Option<U>>>,
}

impl<U> ResultTable<U> {
    fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| Mutex::new(None)).collect(),
        }
    }

    #[inline]
    fn publish(&self, idx: usize, value: U) {
        let mut slot = self.slots[idx].lock().unwrap_or_else(PoisonError::into_inner);
        debug_assert!(slot.is_none(), "index {idx} published twice");
        *slot = Some(value);
    }

    fn into_ordered(self) -> SpawnResult<Vec<U>> {
        let expected = self.slots.len();
        let values: Vec<U> = self
            .slots
            .into_iter()
            .filter_map(|slot| slot.into_inner().unwrap_or_else(PoisonError::into_inner))
            .collect();

        if values.len() == expected {
            Ok(values)
        } else {
            Err(SpawnError::Incomplete {
                expected,
                produced: values.len(),
            })
        }
    }
}


fn worker_loop<T, U, F>(cursor: &Cursor, table: &ResultTable<U>, xs: &[T], f: &F) -> usize
where
    F: Fn(&T) -> U,
{
    let mut processed = 0;
    while let Some(idx) = cursor.claim() {
        // Вычисление идёт вне всяких блокировок
        let value = f(&xs[idx]);
        table.publish(idx, value);
        processed += 1;
    }
    processed
}


/// Параллельный map на `n` долгоживущих потоках.
///
/// Порядок выхода совпадает с порядком входа. `n == 0` возвращает
/// [`SpawnError::NoWorkers`]. Паника в `f` завершает только воркер,
/// в котором она случилась; остальные дорабатывают вход, но весь вызов
/// возвращает ошибку.
pub fn map_parallel_n<T, U, F>(n: usize, f: F, xs: &[T]) -> SpawnResult<Vec<U>>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync,
{
    map_parallel_with(&Config::default().with_threads(n), f, xs)
}

pub fn map_parallel_with<T, U, F>(config: &Config, f: F, xs: &[T]) -> SpawnResult<Vec<U>>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync,
{
    if config.num_threads == 0 {
        return Err(SpawnError::NoWorkers);
    }

    let cursor = Cursor::new(xs.len());
    let table = ResultTable::new(xs.len());

    let outcome = crossbeam::thread::scope(|s| -> SpawnResult<()> {
        let (cursor, table, f) = (&cursor, &table, &f);
        let mut workers = Vec::with_capacity(config.num_threads);
        let mut spawn_err = None;

        for id in 0..config.num_threads {
            let spawned = s
                .builder()
                .name(format!("{}-{}", config.thread_name, id))
                .spawn(move |_| worker_loop(cursor, table, xs, f));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    spawn_err = Some(SpawnError::from(err));
                    break;
                }
            }
        }

        if let Some(err) = &spawn_err {
            // Запущенные воркеры всё равно выберут весь курсор
            tracing::warn!(spawned = workers.len(), error = %err, "worker pool started partially");
        }
        if workers.is_empty() {
            return Err(spawn_err.unwrap_or(SpawnError::NoWorkers));
        }

        let mut first_panic = None;
        for (id, worker) in workers.into_iter().enumerate() {
            match worker.join() {
                Ok(processed) => tracing::trace!(worker = id, processed, "worker finished"),
                Err(payload) => {
                    let err = SpawnError::from_panic(payload);
                    tracing::debug!(worker = id, error = %err, "worker died");
                    first_panic.get_or_insert(err);
                }
            }
        }

        match first_panic {
            Some(err) => Err(err),
            None => Ok(()),
        }
    });

    outcome.map_err(SpawnError::from_panic)??;
    table.into_ordered()
}
