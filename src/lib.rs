//! Параллельные примитивы на обычных потоках
//! 
//! # Features
//! - Параллельный map с сохранением порядка: поток на элемент или пул из N воркеров
//! - Параллельная свёртка попарным деревом
//! - Ticker с коррекцией дрейфа и кооперативной остановкой
//! - Последовательные и параллельные запуски пакетов эффектов
//! - Паники задач возвращаются как `SpawnError`, а не теряются

pub mod effects;
pub mod errors;
pub mod handle;
pub mod map;
pub mod model;
pub mod pool;
pub mod reduce;
pub mod result;
pub mod stopwatch;
pub mod ticker;

pub use effects::{
    run_fire_and_forget,
    run_parallel,
    run_serial,
    run_serial_until_failure,
    run_serial_until_success,
};
pub use errors::SpawnError;
pub use handle::{spawn_task, TaskHandle};
pub use map::{keep_if_parallel, map_parallel};
pub use pool::{map_parallel_n, map_parallel_with, Config};
pub use reduce::{map_reduce1_parallel, map_reduce_parallel, reduce1_parallel, reduce_parallel};
pub use result::SpawnResult;
pub use stopwatch::Stopwatch;
pub use ticker::Ticker;
