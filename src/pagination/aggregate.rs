//! Page aggregation
//!
//! Pages are fetched one after another, never concurrently, so the merged
//! result keeps server order and a failure leaves later pages untouched.

use super::types::{PageRequest, PageSource, ProfilePage, MAX_PAGE_SIZE};
use crate::error::{Error, Result};
use tracing::{debug, warn};

/// Fetch what `request` asks for from `source`
pub async fn fetch<S: PageSource + ?Sized>(source: &S, request: PageRequest) -> Result<ProfilePage> {
    match request {
        PageRequest::Page { number, size } => source.fetch_page(number, size).await,
        PageRequest::All => aggregate(source, MAX_PAGE_SIZE).await,
    }
}

/// Fetch every page and merge them into one.
///
/// Page 1 tells us how many pages exist. Pages 2..=N follow in order. If a
/// later page fails the loop stops and the error carries what was gathered
/// so far.
pub async fn aggregate<S: PageSource + ?Sized>(source: &S, page_size: u32) -> Result<ProfilePage> {
    let mut merged = source.fetch_page(1, page_size).await?;
    let total_pages = merged.page_total();
    debug!(
        page = 1,
        total_pages,
        count = merged.profiles.len(),
        "Fetched first page"
    );

    for page in 2..=total_pages {
        match source.fetch_page(page, page_size).await {
            Ok(next) => {
                debug!(page, count = next.profiles.len(), "Fetched page");
                merged.absorb(next);
            }
            Err(err) => {
                warn!(
                    page,
                    total_pages,
                    collected = merged.profiles.len(),
                    error = %err,
                    "Aggregation stopped early"
                );
                return Err(Error::PartialAggregation {
                    partial: Box::new(merged),
                    source: Box::new(err),
                });
            }
        }
    }

    merged.seal();
    Ok(merged)
}
