//! Concurrent detail collection: one fetch task per identifier, tagged outcomes fanned back in.
//!
//! Every identifier gets its own tokio task. Each task sends exactly one
//! [`FetchOutcome`] into a shared unbounded channel and then drops its sender.
//! The collector drops its own sender right after launching, so the channel
//! closes only when the last task has finished; draining it to `None` is the
//! join barrier. A failing task reports its error and never affects siblings.

use crate::error::Result;
use crate::types::{Collection, DetailRecord, FetchOutcome, Identifier, Token};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info, warn};

/// Abstraction over a single detail request, enabling testability.
#[async_trait::async_trait]
pub trait DetailFetcher: Send + Sync {
    /// Fetch and decode the detail record for `identifier`
    async fn fetch_detail(&self, identifier: &Identifier, token: &Token) -> Result<DetailRecord>;
}

/// Cap on simultaneous in-flight detail fetches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConcurrencyLimit {
    /// Every fetch starts immediately
    Unbounded,
    /// At most this many fetches run at once (always at least 1)
    Bounded(usize),
}

impl From<Option<usize>> for ConcurrencyLimit {
    fn from(limit: Option<usize>) -> Self {
        match limit {
            Some(n) => ConcurrencyLimit::Bounded(n.max(1)),
            None => ConcurrencyLimit::Unbounded,
        }
    }
}

impl fmt::Display for ConcurrencyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyLimit::Unbounded => f.write_str("unbounded"),
            ConcurrencyLimit::Bounded(n) => write!(f, "{}", n),
        }
    }
}

/// Fetch every identifier's detail concurrently and gather the results
///
/// Launches exactly `identifiers.len()` fetch units. The returned
/// [`Collection`] holds one record per successful unit (in completion order)
/// and one failure entry per failed unit. This never fails as a whole: if
/// every unit fails, the record set is simply empty.
///
/// Must be called from within a tokio runtime; on the multi-thread runtime
/// units run in parallel across worker threads.
pub async fn collect(
    fetcher: Arc<dyn DetailFetcher>,
    identifiers: Vec<Identifier>,
    token: Arc<Token>,
    limit: ConcurrencyLimit,
) -> Collection {
    let launched = identifiers.len();
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<FetchOutcome>();
    let permits = match limit {
        ConcurrencyLimit::Bounded(n) => Some(Arc::new(Semaphore::new(n.max(1)))),
        ConcurrencyLimit::Unbounded => None,
    };

    info!(count = launched, limit = %limit, "launching detail fetches");

    for identifier in identifiers {
        let fetcher = Arc::clone(&fetcher);
        let token = Arc::clone(&token);
        let permits = permits.clone();
        let outcome_tx = outcome_tx.clone();

        tokio::spawn(async move {
            let outcome = fetch_one(fetcher.as_ref(), identifier, &token, permits.as_deref()).await;
            // Receiver is only gone if the collecting future itself was dropped
            outcome_tx.send(outcome).ok();
        });
    }

    // Closes the channel once every unit has dropped its sender
    drop(outcome_tx);

    let mut collection = Collection {
        launched,
        ..Default::default()
    };
    while let Some(outcome) = outcome_rx.recv().await {
        debug!(
            identifier = %outcome.identifier(),
            received = collection.records.len() + collection.failures.len() + 1,
            "fetch outcome received"
        );
        collection.push(outcome);
    }

    let unreported = collection.unreported();
    if unreported > 0 {
        error!(unreported, "detail fetch units terminated without reporting");
    }
    info!(
        launched,
        fetched = collection.records.len(),
        failed = collection.failures.len(),
        "detail collection finished"
    );

    collection
}

/// Run one fetch unit, waiting for a permit first when the collector is bounded
async fn fetch_one(
    fetcher: &dyn DetailFetcher,
    identifier: Identifier,
    token: &Token,
    permits: Option<&Semaphore>,
) -> FetchOutcome {
    let _permit = match permits {
        Some(semaphore) => match semaphore.acquire().await {
            Ok(permit) => Some(permit),
            Err(e) => {
                return FetchOutcome::Failed {
                    identifier,
                    error: format!("concurrency limiter closed: {}", e),
                };
            }
        },
        None => None,
    };

    match fetcher.fetch_detail(&identifier, token).await {
        Ok(record) => {
            debug!(identifier = %identifier, fields = record.len(), "detail fetched");
            FetchOutcome::Fetched { identifier, record }
        }
        Err(e) => {
            warn!(
                identifier = %identifier,
                transport = e.is_transport(),
                error = %e,
                "detail fetch failed"
            );
            FetchOutcome::Failed {
                identifier,
                error: e.to_string(),
            }
        }
    }
}
