//! Client for the crawler-task resource family.
//!
//! Covers the backend's `/api/crawler/tasks` surface: listing with
//! pagination and filters, create/draft/delete, run/pause, spreadsheet
//! export, the long-running analysis pipeline, and the crawled price-rank
//! and review data belonging to a task.

mod client;
mod types;

pub use client::TaskClient;
pub use types::{
    AnalyzeStatus, CrawlerTask, ExportKind, Page, PriceRank, Review, TaskQuery, TaskStatus,
};
