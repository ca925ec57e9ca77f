//! Crawler task commands.

use super::AppContext;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use crawler_api::{AnalyzeStatus, CrawlerTask, ExportKind, TaskQuery, TaskStatus};
use std::path::PathBuf;

fn new_task(
    name: String,
    asins: String,
    required_info: Vec<String>,
    platform: String,
    time_cycle: String,
) -> CrawlerTask {
    CrawlerTask {
        id: None,
        process_name: name,
        asin_list: asins,
        required_info,
        platform,
        time_cycle,
        create_time: None,
        update_time: None,
        status: None,
        user_id: None,
        username: None,
    }
}

fn print_task(task: &CrawlerTask) {
    output::print_row(
        "Id",
        &task.id.map(|id| id.to_string()).unwrap_or_default(),
    );
    output::print_row("Name", &task.process_name);
    output::print_row(
        "Status",
        task.status.map(|s| s.as_str()).unwrap_or("-"),
    );
    output::print_row("Platform", &task.platform);
    output::print_row("Cycle", &task.time_cycle);
    output::print_row("Asins", &task.asin_list);
    output::print_row("Collects", &task.required_info.join(", "));
    if let Some(created) = task.create_time {
        output::print_row("Created", &created.to_string());
    }
}

/// List tasks with optional filters.
pub async fn tasks_list(
    ctx: &AppContext,
    page: u32,
    size: u32,
    status: Option<TaskStatus>,
    platform: Option<String>,
    keyword: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let query = TaskQuery {
        page,
        size,
        status,
        platform,
        keyword,
        ..TaskQuery::default()
    };
    let listing = ctx.tasks.list(&query).await?;

    match format {
        OutputFormat::Json => output::print_json(&listing),
        OutputFormat::Text => {
            if listing.records.is_empty() {
                println!("No tasks found");
                return Ok(());
            }
            for task in &listing.records {
                print_task(task);
                output::print_divider();
            }
            println!(
                "Page {}/{} ({} tasks total)",
                listing.current_page, listing.pages, listing.total
            );
        }
    }
    Ok(())
}

/// Show one task.
pub async fn tasks_show(ctx: &AppContext, id: i64, format: &OutputFormat) -> Result<()> {
    let task = ctx.tasks.get(id).await?;
    match format {
        OutputFormat::Json => output::print_json(&task),
        OutputFormat::Text => print_task(&task),
    }
    Ok(())
}

/// Create a task, or save it as a draft with `--draft`.
#[allow(clippy::too_many_arguments)]
pub async fn tasks_create(
    ctx: &AppContext,
    name: String,
    asins: String,
    required_info: Vec<String>,
    platform: String,
    time_cycle: String,
    draft: bool,
    format: &OutputFormat,
) -> Result<()> {
    let task = new_task(name, asins, required_info, platform, time_cycle);
    let created = if draft {
        ctx.tasks.save_draft(&task).await?
    } else {
        ctx.tasks.create(&task).await?
    };

    let id = created.id.map(|id| id.to_string()).unwrap_or_default();
    if draft {
        output::print_success(&format!("Draft saved with id {}", id), format);
    } else {
        output::print_success(&format!("Task created with id {}", id), format);
    }
    Ok(())
}

/// Delete a task.
pub async fn tasks_delete(ctx: &AppContext, id: i64, format: &OutputFormat) -> Result<()> {
    ctx.tasks.delete(id).await?;
    output::print_success(&format!("Task {} deleted", id), format);
    Ok(())
}

/// Start or resume a task.
pub async fn tasks_run(ctx: &AppContext, id: i64, format: &OutputFormat) -> Result<()> {
    ctx.tasks.run(id).await?;
    output::print_success(&format!("Task {} started", id), format);
    Ok(())
}

/// Pause a running task.
pub async fn tasks_pause(ctx: &AppContext, id: i64, format: &OutputFormat) -> Result<()> {
    ctx.tasks.pause(id).await?;
    output::print_success(&format!("Task {} paused", id), format);
    Ok(())
}

/// Show crawled price and rank rows for a task.
pub async fn tasks_price_ranks(ctx: &AppContext, id: i64, format: &OutputFormat) -> Result<()> {
    let rows = ctx.tasks.price_ranks(id).await?;
    match format {
        OutputFormat::Json => output::print_json(&rows),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No price data for task {}", id);
                return Ok(());
            }
            for row in &rows {
                output::print_row("Asin", &row.asin);
                output::print_row("Brand", row.brand.as_deref().unwrap_or("-"));
                output::print_row(
                    "Price",
                    &row.original_price
                        .map(|p| format!("{:.2}", p))
                        .unwrap_or_else(|| "-".to_string()),
                );
                output::print_row(
                    "Rank",
                    &row.main_category_rank
                        .map(|r| r.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
                output::print_divider();
            }
            println!("{} rows", rows.len());
        }
    }
    Ok(())
}

/// Show crawled reviews for a task.
pub async fn tasks_reviews(ctx: &AppContext, id: i64, format: &OutputFormat) -> Result<()> {
    let rows = ctx.tasks.reviews(id).await?;
    match format {
        OutputFormat::Json => output::print_json(&rows),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No reviews for task {}", id);
                return Ok(());
            }
            for row in &rows {
                output::print_row("Asin", &row.asin);
                output::print_row(
                    "Rating",
                    &row.review_rating
                        .map(|r| format!("{:.1}", r))
                        .unwrap_or_else(|| "-".to_string()),
                );
                output::print_row("Title", row.review_title.as_deref().unwrap_or("-"));
                output::print_row("By", row.reviewer_name.as_deref().unwrap_or("-"));
                output::print_divider();
            }
            println!("{} reviews", rows.len());
        }
    }
    Ok(())
}

/// Export task data as a spreadsheet and write it to disk.
pub async fn tasks_export(
    ctx: &AppContext,
    id: i64,
    kind: ExportKind,
    output: Option<PathBuf>,
    format: &OutputFormat,
) -> Result<()> {
    let bytes = ctx.tasks.export(id, kind).await?;
    let path = output
        .unwrap_or_else(|| PathBuf::from(format!("task-{}-{}.xlsx", id, kind.as_param())));
    std::fs::write(&path, &bytes)?;
    output::print_success(
        &format!("Wrote {} bytes to {}", bytes.len(), path.display()),
        format,
    );
    Ok(())
}

/// Kick off the analysis pipeline for a task.
pub async fn tasks_analyze(ctx: &AppContext, id: i64, format: &OutputFormat) -> Result<()> {
    println!("Analyzing task {} (this can take a while)...", id);
    ctx.tasks.analyze(id).await?;
    output::print_success(&format!("Analysis finished for task {}", id), format);
    Ok(())
}

/// Poll the analysis pipeline state.
pub async fn tasks_analyze_status(
    ctx: &AppContext,
    id: i64,
    format: &OutputFormat,
) -> Result<()> {
    let state = ctx.tasks.analyze_status(id).await?;
    let label = match state {
        AnalyzeStatus::Processing => "processing",
        AnalyzeStatus::Completed => "completed",
        AnalyzeStatus::Failed => "failed",
    };
    match format {
        OutputFormat::Text => println!("Analysis for task {}: {}", id, label),
        OutputFormat::Json => println!(r#"{{"taskId":{},"status":"{}"}}"#, id, label),
    }
    Ok(())
}

/// Download the analysis result deck.
pub async fn tasks_ppt(
    ctx: &AppContext,
    id: i64,
    output: Option<PathBuf>,
    format: &OutputFormat,
) -> Result<()> {
    let bytes = ctx.tasks.download_ppt(id).await?;
    let path = output.unwrap_or_else(|| PathBuf::from(format!("task-{}-analysis.pptx", id)));
    std::fs::write(&path, &bytes)?;
    output::print_success(
        &format!("Wrote {} bytes to {}", bytes.len(), path.display()),
        format,
    );
    Ok(())
}
