use tokio::task::JoinError;

/// Runs blocking storage work on the blocking pool so the UI keeps polling.
pub async fn run_blocking<F, T>(f: F) -> Result<T, JoinError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await
}
