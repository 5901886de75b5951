use super::{
    errors::SpawnError,
    map::map_parallel,
    result::SpawnResult,
};
use std::sync::Arc;


/// Разбивает раунд на соседние пары; непарный последний элемент
/// переносится в следующий раунд как есть.
fn pair_up<T>(xs: Vec<T>) -> (Vec<(T, T)>, Option<T>) {
    let mut pairs = Vec::with_capacity(xs.len() / 2);
    let mut iter = xs.into_iter();
    loop {
        match (iter.next(), iter.next()) {
            (Some(a), Some(b)) => pairs.push((a, b)),
            (carry, _) => return (pairs, carry),
        }
    }
}

/// Параллельная свёртка непустой последовательности попарным деревом.
///
/// `f` обязана быть ассоциативной и коммутативной: группировка
/// отличается от последовательного fold. Каждый раунд объединяет
/// соседние пары через [`map_parallel`], так что глубина `O(log n)`,
/// а общее число вызовов `f` равно `n - 1`.
pub fn reduce1_parallel<T, F>(f: F, xs: Vec<T>) -> SpawnResult<T>
where
    T: Send + 'static,
    F: Fn(T, T) -> T + Send + Sync + 'static,
{
    if xs.is_empty() {
        return Err(SpawnError::EmptyInput);
    }

    let f = Arc::new(f);
    let mut round = xs;
    while round.len() > 1 {
        let (pairs, carry) = pair_up(round);
        let combine = Arc::clone(&f);
        let mut next = map_parallel(move |(a, b): (T, T)| combine(a, b), pairs)?;
        next.extend(carry);
        round = next;
    }

    round.pop().ok_or(SpawnError::EmptyInput)
}

/// То же, что [`reduce1_parallel`], но `init` участвует как нулевой элемент.
pub fn reduce_parallel<T, F>(f: F, init: T, xs: Vec<T>) -> SpawnResult<T>
where
    T: Send + 'static,
    F: Fn(T, T) -> T + Send + Sync + 'static,
{
    let mut all = Vec::with_capacity(xs.len() + 1);
    all.push(init);
    all.extend(xs);
    reduce1_parallel(f, all)
}

pub fn map_reduce_parallel<T, U, M, F>(map: M, combine: F, init: U, xs: Vec<T>) -> SpawnResult<U>
where
    T: Send + 'static,
    U: Send + 'static,
    M: Fn(T) -> U + Send + Sync + 'static,
    F: Fn(U, U) -> U + Send + Sync + 'static,
{
    let mapped = map_parallel(map, xs)?;
    reduce_parallel(combine, init, mapped)
}

pub fn map_reduce1_parallel<T, U, M, F>(map: M, combine: F, xs: Vec<T>) -> SpawnResult<U>
where
    T: Send + 'static,
    U: Send + 'static,
    M: Fn(T) -> U + Send + Sync + 'static,
    F: Fn(U, U) -> U + Send + Sync + 'static,
{
    if xs.is_empty() {
        return Err(SpawnError::EmptyInput);
    }
    let mapped = map_parallel(map, xs)?;
    reduce1_parallel(combine, mapped)
}
