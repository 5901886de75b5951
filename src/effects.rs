use super::{
    map::map_parallel,
    result::SpawnResult,
};
use std::{thread, time::Duration};


/// Выполняет эффект и возвращает его результат.
#[inline]
pub fn run_effect<T, E>(effect: E) -> T
where
    E: FnOnce() -> T,
{
    effect()
}

/// Выполняет эффект и возвращает фиксированное значение.
#[inline]
pub fn run_and_return<V, T, E>(value: V, effect: E) -> V
where
    E: FnOnce() -> T,
{
    effect();
    value
}

/// Выполняет все эффекты по порядку и собирает результаты.
pub fn run_serial<T, E, I>(effects: I) -> Vec<T>
where
    E: FnOnce() -> T,
    I: IntoIterator<Item = E>,
{
    effects.into_iter().map(|e| e()).collect()
}

/// Выполняет эффекты по порядку до первого `true`.
/// `false`, если успехов не было или список пуст.
pub fn run_serial_until_success<E, I>(effects: I) -> bool
where
    E: FnOnce() -> bool,
    I: IntoIterator<Item = E>,
{
    effects.into_iter().any(|e| e())
}

/// Выполняет эффекты по порядку до первого `false`.
/// `true`, если все успешны или список пуст.
pub fn run_serial_until_failure<E, I>(effects: I) -> bool
where
    E: FnOnce() -> bool,
    I: IntoIterator<Item = E>,
{
    effects.into_iter().all(|e| e())
}

/// Повторяет `effect` до первого успеха, не более `n` раз.
/// Между попытками (но не после последней) ждёт `pause`.
pub fn run_max_n_times_until_success<E>(n: usize, mut effect: E, pause: Duration) -> bool
where
    E: FnMut() -> bool,
{
    for attempt in 0..n {
        if attempt > 0 && !pause.is_zero() {
            thread::sleep(pause);
        }
        if effect() {
            return true;
        }
        tracing::trace!(attempt, "effect attempt failed");
    }
    false
}

/// Запускает все эффекты одновременно через [`map_parallel`];
/// результаты в порядке входа.
pub fn run_parallel<T, E, I>(effects: I) -> SpawnResult<Vec<T>>
where
    T: Send + 'static,
    E: FnOnce() -> T + Send + 'static,
    I: IntoIterator<Item = E>,
{
    map_parallel(|e: E| e(), effects)
}

/// Запускает эффект в отсоединённом потоке и сразу возвращается.
/// Результат и паника эффекта вызывающему недоступны.
pub fn run_fire_and_forget<T, E>(effect: E) -> SpawnResult<()>
where
    T: 'static,
    E: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new().spawn(move || {
        let _ = effect();
    })?;
    Ok(())
}
