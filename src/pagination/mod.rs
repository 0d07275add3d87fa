//! Pagination module
//!
//! Supports: single pages, full aggregation, saved-search pages
//!
//! # Overview
//!
//! A page number below 1 switches a list call into aggregation mode: every
//! page is fetched at the maximum page size and merged into one result whose
//! metadata describes the union. Page sizes are clamped silently.

mod aggregate;
mod types;

pub use aggregate::{aggregate, fetch};
pub use types::{
    clamp_page_size, PageRequest, PageSource, ProfilePage, SearchHandle, MAX_PAGE_SIZE,
    MIN_PAGE_SIZE, SEARCH_TTL_MINUTES,
};
