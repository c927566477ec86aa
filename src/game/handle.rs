use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use super::{config::RunnerConfig, engine::RunnerEngine};

/// Shared handle to a running engine
///
/// The ticker task and the bridge both go through this handle. The lock is
/// only ever held for a single engine call, never across an await.
#[derive(Clone)]
pub struct RunnerHandle {
    engine: Arc<Mutex<RunnerEngine>>,
}

impl RunnerHandle {
    pub fn new(config: RunnerConfig) -> Self {
        Self::from_engine(RunnerEngine::new(config))
    }

    pub fn from_engine(engine: RunnerEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RunnerEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a closure against the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut RunnerEngine) -> R) -> R {
        f(&mut self.lock())
    }

    /// Tick the engine at its configured frame rate until the task is aborted
    pub fn spawn_ticker(&self) -> JoinHandle<()> {
        let handle = self.clone();
        let frame = Duration::from_secs_f64(self.with_engine(|e| e.config().frame_millis()) / 1000.0);

        tokio::spawn(async move {
            let mut ticker = interval(frame);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                handle.with_engine(|engine| engine.tick());
            }
        })
    }
}
