use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle of a running [`RefreshScheduler`](super::RefreshScheduler).
///
/// [`shutdown`](Self::shutdown) stops the loop between cycles. Dropping the
/// handle without calling it aborts the task.
pub struct SchedulerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub(crate) fn new(shutdown: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    /// Stops the scheduler and waits for its task to end
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            debug!("Scheduler task ended abnormally: {}", e);
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
