use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Why a pooled job produced no output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskFailure {
    #[error("task panicked: {0}")]
    Panicked(String),
    #[error("task was cancelled")]
    Cancelled,
}

/// Runs jobs on the tokio runtime with at most `n_tasks` in flight.
///
/// Outstanding jobs are cancelled when the pool is dropped.
pub struct TaskPool {
    semaphore: Arc<Semaphore>,
    cancel_token: CancellationToken,
}

impl TaskPool {
    pub fn new(n_tasks: usize) -> TaskPool {
        let semaphore = Arc::new(Semaphore::new(n_tasks.max(1)));
        let cancel_token = CancellationToken::new();

        TaskPool {
            semaphore,
            cancel_token,
        }
    }

    /// Spawn a single job gated by the pool's permits.
    pub fn execute<F, T>(&self, func: F) -> JoinHandle<Option<T>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let semaphore = self.semaphore.clone();
        let token = self.cancel_token.clone();
        tokio::spawn(async move {
            let main = async {
                let Ok(_permit) = semaphore.acquire().await else {
                    return None;
                };
                Some(func.await)
            };

            tokio::select! {
                biased;
                () = token.cancelled() => None,
                output = main => output,
            }
        })
    }

    /// Run every keyed job and collect the outcomes on the calling task.
    ///
    /// Jobs start in input order and may finish in any order. The returned
    /// vector follows input order; each entry carries the job's key.
    pub async fn run_keyed<K, F, T, I>(&self, jobs: I) -> Vec<(K, Result<T, TaskFailure>)>
    where
        I: IntoIterator<Item = (K, F)>,
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handles: Vec<(K, JoinHandle<Option<T>>)> = jobs
            .into_iter()
            .map(|(key, job)| (key, self.execute(job)))
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (key, handle) in handles {
            let outcome = match handle.await {
                Ok(Some(output)) => Ok(output),
                Ok(None) => Err(TaskFailure::Cancelled),
                Err(e) if e.is_panic() => Err(TaskFailure::Panicked(e.to_string())),
                Err(_) => Err(TaskFailure::Cancelled),
            };
            outcomes.push((key, outcome));
        }
        outcomes
    }

    /// Cancel all jobs that have not finished yet.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.semaphore.close();
        self.cancel_token.cancel();
    }
}
