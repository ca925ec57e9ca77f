//! Task resource client.

use crate::types::{
    AnalyzeStatus, CrawlerTask, ExportKind, Page, PriceRank, Review, TaskQuery,
};
use hub_http::{ApiClient, ApiResult};
use std::sync::Arc;

const TASKS_PATH: &str = "/api/crawler/tasks";

/// Client for the crawler-task resource family. All calls go through the
/// shared request pipeline, so authentication and failure handling behave
/// the same as everywhere else.
pub struct TaskClient {
    api: Arc<ApiClient>,
}

impl TaskClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn task_path(id: i64, suffix: &str) -> String {
        format!("{}/{}{}", TASKS_PATH, id, suffix)
    }

    /// List tasks, newest first, with pagination and optional filters.
    pub async fn list(&self, query: &TaskQuery) -> ApiResult<Page<CrawlerTask>> {
        self.api
            .get_json::<Page<CrawlerTask>>(TASKS_PATH, &query.to_params())
            .await?
            .into_data()
    }

    /// Create a task and start it.
    pub async fn create(&self, task: &CrawlerTask) -> ApiResult<CrawlerTask> {
        self.api
            .post_json::<CrawlerTask, _>(TASKS_PATH, task)
            .await?
            .into_data()
    }

    /// Save a task as a draft without scheduling it.
    pub async fn save_draft(&self, task: &CrawlerTask) -> ApiResult<CrawlerTask> {
        self.api
            .post_json::<CrawlerTask, _>(&format!("{}/draft", TASKS_PATH), task)
            .await?
            .into_data()
    }

    /// Fetch a single task.
    pub async fn get(&self, id: i64) -> ApiResult<CrawlerTask> {
        self.api
            .get_json::<CrawlerTask>(&Self::task_path(id, ""), &[])
            .await?
            .into_data()
    }

    /// Delete a task.
    pub async fn delete(&self, id: i64) -> ApiResult<String> {
        let envelope = self
            .api
            .delete_json::<String>(&Self::task_path(id, ""))
            .await?;
        Ok(envelope.message)
    }

    /// Start (or resume) a task.
    pub async fn run(&self, id: i64) -> ApiResult<String> {
        let envelope = self
            .api
            .post_empty::<String>(&Self::task_path(id, "/run"))
            .await?;
        Ok(envelope.message)
    }

    /// Pause a running task.
    pub async fn pause(&self, id: i64) -> ApiResult<String> {
        let envelope = self
            .api
            .post_empty::<String>(&Self::task_path(id, "/pause"))
            .await?;
        Ok(envelope.message)
    }

    /// Crawled price and rank rows for a task.
    pub async fn price_ranks(&self, id: i64) -> ApiResult<Vec<PriceRank>> {
        self.api
            .get_json::<Vec<PriceRank>>(&Self::task_path(id, "/price-ranks"), &[])
            .await?
            .into_data()
    }

    /// Crawled review rows for a task.
    pub async fn reviews(&self, id: i64) -> ApiResult<Vec<Review>> {
        self.api
            .get_json::<Vec<Review>>(&Self::task_path(id, "/reviews"), &[])
            .await?
            .into_data()
    }

    /// Export a task's data as a spreadsheet; returns the raw file bytes.
    pub async fn export(&self, id: i64, kind: ExportKind) -> ApiResult<Vec<u8>> {
        tracing::debug!(task_id = id, kind = kind.as_param(), "exporting task data");
        self.api
            .get_blob(
                &Self::task_path(id, "/export"),
                &[("type", kind.as_param().to_string())],
            )
            .await
    }

    /// Trigger the analysis pipeline for a task. Runs with the extended
    /// timeout; the backend may take tens of minutes.
    pub async fn analyze(&self, id: i64) -> ApiResult<String> {
        let envelope = self
            .api
            .post_empty_long::<String>(&Self::task_path(id, "/analyze"))
            .await?;
        Ok(envelope.message)
    }

    /// Poll the analysis pipeline state.
    pub async fn analyze_status(&self, id: i64) -> ApiResult<AnalyzeStatus> {
        let raw = self
            .api
            .get_json::<String>(&Self::task_path(id, "/analyze/status"), &[])
            .await?
            .into_data()?;
        Ok(AnalyzeStatus::parse(&raw))
    }

    /// Download the analysis result deck; returns the raw file bytes.
    /// Runs with the extended timeout.
    pub async fn download_ppt(&self, id: i64) -> ApiResult<Vec<u8>> {
        self.api
            .get_blob_long(&Self::task_path(id, "/analyze/ppt"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_paths() {
        assert_eq!(TaskClient::task_path(7, ""), "/api/crawler/tasks/7");
        assert_eq!(TaskClient::task_path(7, "/run"), "/api/crawler/tasks/7/run");
        assert_eq!(
            TaskClient::task_path(42, "/analyze/status"),
            "/api/crawler/tasks/42/analyze/status"
        );
    }
}
