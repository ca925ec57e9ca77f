//! Wire types for the crawler-task resource family.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a crawler task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Active,
    Draft,
    Paused,
    Completed,
}

/// A crawler task as the backend serializes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerTask {
    /// Absent when creating a new task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name of the crawl process
    pub process_name: String,
    /// Comma-separated ASIN list
    pub asin_list: String,
    /// Which data points to collect
    pub required_info: Vec<String>,
    pub platform: String,
    pub time_cycle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Owner, filled in by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub records: Vec<T>,
    pub current_page: u32,
    pub page_size: u32,
    pub total: u64,
    pub pages: u32,
}

/// Listing parameters. `page` is 1-based, matching the backend.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    pub page: u32,
    pub size: u32,
    pub status: Option<TaskStatus>,
    pub time_cycle: Option<String>,
    pub platform: Option<String>,
    pub keyword: Option<String>,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            status: None,
            time_cycle: None,
            platform: None,
            keyword: None,
        }
    }
}

impl TaskQuery {
    /// Render as query-string pairs; absent filters are omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(ref time_cycle) = self.time_cycle {
            params.push(("timeCycle", time_cycle.clone()));
        }
        if let Some(ref platform) = self.platform {
            params.push(("platform", platform.clone()));
        }
        if let Some(ref keyword) = self.keyword {
            params.push(("keyword", keyword.clone()));
        }
        params
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "ACTIVE",
            TaskStatus::Draft => "DRAFT",
            TaskStatus::Paused => "PAUSED",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

/// Which data set a spreadsheet export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    PriceRank,
    Review,
}

impl ExportKind {
    /// Value of the `type` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            ExportKind::PriceRank => "price-rank",
            ExportKind::Review => "review",
        }
    }
}

/// State of the long-running analysis pipeline for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeStatus {
    Processing,
    Completed,
    Failed,
}

impl AnalyzeStatus {
    /// Parse the backend's status string. Unknown values read as still
    /// processing rather than failing the poll.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "COMPLETED" => AnalyzeStatus::Completed,
            "FAILED" => AnalyzeStatus::Failed,
            _ => AnalyzeStatus::Processing,
        }
    }
}

/// Crawled price and category-rank snapshot for one ASIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRank {
    #[serde(default)]
    pub id: Option<i64>,
    pub asin: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub ld_discount: Option<f64>,
    #[serde(default)]
    pub bd_discount: Option<f64>,
    #[serde(default)]
    pub member_price: Option<f64>,
    #[serde(default)]
    pub member_final_price: Option<f64>,
    #[serde(default)]
    pub non_member_final_price: Option<f64>,
    #[serde(default)]
    pub coupon: Option<f64>,
    #[serde(default)]
    pub direct_discount: Option<f64>,
    #[serde(default)]
    pub main_category: Option<String>,
    #[serde(default)]
    pub main_category_rank: Option<i32>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub sub_category_rank: Option<i32>,
    #[serde(default)]
    pub crawl_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub task_id: Option<i64>,
}

/// Crawled customer review for one ASIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: Option<i64>,
    pub asin: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub review_id: Option<String>,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub review_title: Option<String>,
    #[serde(default)]
    pub review_content: Option<String>,
    #[serde(default)]
    pub review_rating: Option<f64>,
    #[serde(default)]
    pub review_date: Option<String>,
    #[serde(default)]
    pub helpful_votes: Option<i32>,
    #[serde(default)]
    pub images: Option<String>,
    #[serde(default)]
    pub crawl_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub task_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserializes_backend_shape() {
        let json = r#"{
            "id": 7,
            "processName": "weekly watch",
            "asinList": "B000000001,B000000002",
            "requiredInfo": ["price", "rank"],
            "platform": "amazon-us",
            "timeCycle": "weekly",
            "createTime": "2025-06-01T09:30:00",
            "status": "ACTIVE",
            "userId": 3,
            "username": "crawler_admin"
        }"#;

        let task: CrawlerTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, Some(7));
        assert_eq!(task.status, Some(TaskStatus::Active));
        assert_eq!(task.required_info, vec!["price", "rank"]);
        assert!(task.update_time.is_none());
    }

    #[test]
    fn test_new_task_serializes_without_server_fields() {
        let task = CrawlerTask {
            id: None,
            process_name: "one-off".to_string(),
            asin_list: "B000000001".to_string(),
            required_info: vec!["price".to_string()],
            platform: "amazon-us".to_string(),
            time_cycle: "daily".to_string(),
            create_time: None,
            update_time: None,
            status: None,
            user_id: None,
            username: None,
        };

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("processName"));
        assert!(!json.contains("\"id\""));
        assert!(!json.contains("userId"));
    }

    #[test]
    fn test_page_deserializes() {
        let json = r#"{
            "records": [],
            "currentPage": 2,
            "pageSize": 10,
            "total": 31,
            "pages": 4
        }"#;

        let page: Page<CrawlerTask> = serde_json::from_str(json).unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total, 31);
        assert!(page.records.is_empty());
    }

    #[test]
    fn test_query_params_omit_absent_filters() {
        let query = TaskQuery::default();
        let params = query.to_params();
        assert_eq!(
            params,
            vec![("page", "1".to_string()), ("size", "10".to_string())]
        );
    }

    #[test]
    fn test_query_params_include_filters() {
        let query = TaskQuery {
            page: 2,
            size: 20,
            status: Some(TaskStatus::Paused),
            keyword: Some("headphones".to_string()),
            ..TaskQuery::default()
        };

        let params = query.to_params();
        assert!(params.contains(&("status", "PAUSED".to_string())));
        assert!(params.contains(&("keyword", "headphones".to_string())));
    }

    #[test]
    fn test_analyze_status_parse() {
        assert_eq!(AnalyzeStatus::parse("COMPLETED"), AnalyzeStatus::Completed);
        assert_eq!(AnalyzeStatus::parse("FAILED"), AnalyzeStatus::Failed);
        assert_eq!(AnalyzeStatus::parse("PROCESSING"), AnalyzeStatus::Processing);
        assert_eq!(AnalyzeStatus::parse("whatever"), AnalyzeStatus::Processing);
    }

    #[test]
    fn test_price_rank_deserializes_sparse_row() {
        let json = r#"{"asin":"B000000001","originalPrice":29.99,"mainCategoryRank":1200}"#;
        let row: PriceRank = serde_json::from_str(json).unwrap();
        assert_eq!(row.asin, "B000000001");
        assert_eq!(row.original_price, Some(29.99));
        assert!(row.brand.is_none());
    }
}
