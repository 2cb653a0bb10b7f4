use std::future::Future;
use std::time::Duration;

use crate::error::{BoardError, Result};

/// Await a backend call for at most `limit`, mapping expiry to
/// `BoardError::Timeout`. The pending call is dropped on expiry.
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(BoardError::Timeout(limit)),
    }
}
