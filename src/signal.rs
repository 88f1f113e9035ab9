use log::error;
use std::future::Future;
use std::io;

/// Resolves once `signal` reports an interrupt. If the handler could not be
/// installed the error is logged and this never resolves, so the agent keeps
/// running instead of treating the failure as a shutdown request.
pub async fn wait_for_interrupt<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Unable to listen for interrupt signal: {}", e);
        std::future::pending::<()>().await;
    }
}
