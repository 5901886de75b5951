use super::{
    errors::SpawnError,
    result::SpawnResult,
};
use std::{
    future::Future,
    panic::{self, AssertUnwindSafe},
    pin::Pin,
    task::{Context, Poll},
    thread,
};
use tokio::sync::oneshot;


/// Handle на задачу, выполняемую в отдельном потоке.
///
/// Результат забирается один раз: блокирующим [`TaskHandle::join`]
/// или через `.await` из async-кода.
pub struct TaskHandle<T> {
    receiver: oneshot::Receiver<SpawnResult<T>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl<T> TaskHandle<T> {

    pub fn new
    (
        receiver: oneshot::Receiver<SpawnResult<T>>,
        thread: thread::JoinHandle<()>,
    ) -> Self {
        Self {
            receiver,
            thread: Some(thread),
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Блокирует текущий поток до получения результата.
    ///
    /// Работает и внутри async-рантайма, но блокирует его поток;
    /// из async-кода лучше `.await`.
    pub fn join(self) -> SpawnResult<T> {
        let TaskHandle { receiver, thread } = self;
        let result = futures::executor::block_on(receiver)
            .unwrap_or(Err(SpawnError::ChannelClosed));
        if let Some(thread) = thread {
            // Значение уже отправлено, поток завершается сам
            let _ = thread.join();
        }
        result
    }
}

impl<T> Future for TaskHandle<T> {
    type Output = SpawnResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(res) => Poll::Ready(res.unwrap_or(Err(SpawnError::ChannelClosed))),
            Poll::Pending => Poll::Pending,
        }
    }
}


/// Запускает `f` в новом потоке и возвращает handle на результат.
/// Паника внутри `f` превращается в [`SpawnError::Panic`].
pub fn spawn_task<T, F>(f: F) -> SpawnResult<TaskHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    spawn_task_with(thread::Builder::new(), f)
}

pub fn spawn_task_with<T, F>(builder: thread::Builder, f: F) -> SpawnResult<TaskHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = oneshot::channel::<SpawnResult<T>>();
    let thread = builder.spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(f))
            .map_err(SpawnError::from_panic);
        let _ = tx.send(result);
    })?;

    Ok(TaskHandle::new(rx, thread))
}

/// Забирает результаты строго в порядке handles.
///
/// При ошибке дожидается оставшихся задач и возвращает первую ошибку.
pub(crate) fn join_in_order<T>(handles: Vec<TaskHandle<T>>) -> SpawnResult<Vec<T>> {
    let mut results = Vec::with_capacity(handles.len());
    let mut first_err = None;

    for (idx, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(value) => {
                if first_err.is_none() {
                    results.push(value);
                }
            }
            Err(err) => {
                if first_err.is_none() {
                    tracing::debug!(index = idx, error = %err, "task failed");
                    first_err = Some(err);
                }
            }
        }
    }

    match first_err {
        Some(err) => Err(err),
        None => Ok(results),
    }
}

