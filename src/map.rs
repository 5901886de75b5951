use super::{
    handle::{join_in_order, spawn_task},
    result::SpawnResult,
};
use std::sync::Arc;


/// Параллельный map: один поток на каждый элемент, без ограничений.
///
/// Все задачи стартуют сразу, результаты забираются строго по индексу,
/// поэтому порядок выхода совпадает с порядком входа. Паника в `f`
/// для элемента `i` возвращается как ошибка при получении результата `i`.
///
/// Число потоков не ограничено: подходит только для коротких входов
/// или для `f`, которые работают достаточно долго. Для больших входов
/// используйте [`crate::pool::map_parallel_n`].
pub fn map_parallel<T, U, F, I>(f: F, xs: I) -> SpawnResult<Vec<U>>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
{
    let f = Arc::new(f);
    let iter = xs.into_iter();
    let mut handles = Vec::with_capacity(iter.size_hint().0);

    for x in iter {
        let f = Arc::clone(&f);
        match spawn_task(move || f(x)) {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                // Уже запущенные задачи доводим до конца
                let _ = join_in_order(handles);
                return Err(err);
            }
        }
    }

    join_in_order(handles)
}

/// Оставляет элементы, для которых `pred` вернул `true`.
/// Предикат считается через [`map_parallel`], порядок сохраняется.
pub fn keep_if_parallel<T, P, I>(pred: P, xs: I) -> SpawnResult<Vec<T>>
where
    T: Send + 'static,
    P: Fn(&T) -> bool + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
{
    let checked = map_parallel(
        move |x: T| {
            let keep = pred(&x);
            (x, keep)
        },
        xs,
    )?;

    Ok(checked
        .into_iter()
        .filter_map(|(x, keep)| keep.then_some(x))
        .collect())
}
