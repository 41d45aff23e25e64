//! Concurrent aggregation of the paginated channel list
//!
//! `channelList.do` has no "give me everything" form. Page 1 tells us how
//! many pages exist; the rest are fetched concurrently, one task per page.
//!
//! Two properties callers must live with:
//!
//! - Pages after the first are appended in the order their fetches
//!   *complete*, not in page order. Consumers re-sort (see
//!   [`crate::ranking::sort_ranked`]) and must not rely on raw order.
//! - The first failing page fails the whole listing immediately. The other
//!   page tasks are not cancelled: each is a single bounded HTTP call, they
//!   run to completion in the background and their results are dropped.
//! - A page task that dies without reporting (a panic) fails the listing
//!   with [`Error::PageLost`]; a partial list is never returned as success.

use crate::error::{Error, Result};
use crate::models::{CatalogPage, Channel};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::mpsc;
use tracing::debug;

/// Something that can fetch one page of the channel catalog
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch page `page` (1-based), with non-channel entries already removed
    async fn fetch_page(&self, page: u32) -> Result<CatalogPage>;
}

/// Fetch every page of the catalog and concatenate their channels
///
/// Page 1's channels come first; the other pages follow in completion order.
/// Returns the first error reported by any page.
pub async fn aggregate_channels<S>(source: &S) -> Result<Vec<Channel>>
where
    S: PageSource + Clone + 'static,
{
    let first = source.fetch_page(1).await?;
    let page_size = first.page_size;
    let mut channels = first.channels;
    debug!(page_size, first_page = channels.len(), "channel list page 1 fetched");

    if page_size <= 1 {
        return Ok(channels);
    }

    let mut pending: BTreeSet<u32> = (2..=page_size).collect();
    let (tx, mut rx) = mpsc::unbounded_channel();
    for page in 2..=page_size {
        let source = source.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_page(page).await;
            // The receiver is gone once another page has failed
            let _ = tx.send((page, result));
        });
    }
    drop(tx);

    // Ends once every page task has reported and dropped its sender
    while let Some((page, result)) = rx.recv().await {
        pending.remove(&page);
        let fetched = result?;
        debug!(page, channels = fetched.channels.len(), "channel list page fetched");
        channels.extend(fetched.channels);
    }

    if let Some(&page) = pending.first() {
        return Err(Error::PageLost(page));
    }
    Ok(channels)
}
