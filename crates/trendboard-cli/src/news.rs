//! Read-only news queries printed as tables.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use trendboard_core::{format_date, truncate_text, NewsItem};

const TITLE_CHARS: usize = 50;

/// Sub-commands available under `news`.
#[derive(Debug, Subcommand)]
pub enum NewsCommands {
    /// Most recently crawled items across all platforms
    Latest {
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// One platform's hot list, rank 1 first
    Platform {
        /// Platform id (e.g., weibo)
        platform_id: String,
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Items last crawled inside a time window
    Range {
        /// RFC 3339 start (e.g., 2025-01-27T00:00:00Z)
        #[arg(long)]
        start: DateTime<Utc>,
        /// RFC 3339 end, inclusive
        #[arg(long)]
        end: DateTime<Utc>,
    },
    /// Rank history of one item
    History { news_item_id: i64 },
}

/// # Errors
///
/// Returns an error if the query is rejected or the database fails.
pub(crate) async fn run(pool: &sqlx::PgPool, command: NewsCommands) -> anyhow::Result<()> {
    match command {
        NewsCommands::Latest { limit } => {
            let rows = trendboard_db::list_latest_news(pool, limit).await?;
            print_news(rows.into_iter().map(NewsItem::from).collect());
        }
        NewsCommands::Platform { platform_id, limit } => {
            let rows = trendboard_db::list_news_by_platform(pool, &platform_id, limit).await?;
            if rows.is_empty() {
                println!("no news items for platform {platform_id}");
                return Ok(());
            }
            print_news(rows.into_iter().map(NewsItem::from).collect());
        }
        NewsCommands::Range { start, end } => {
            let rows = trendboard_db::list_news_by_date_range(pool, start, end).await?;
            print_news(rows.into_iter().map(NewsItem::from).collect());
        }
        NewsCommands::History { news_item_id } => {
            let points = trendboard_db::list_rank_history(pool, news_item_id).await?;
            if points.is_empty() {
                println!("news item {news_item_id} has no rank history yet");
                return Ok(());
            }
            println!("{:<21}RANK", "CRAWLED");
            for point in &points {
                println!("{:<21}#{}", format_date(point.crawl_time), point.rank);
            }
        }
    }
    Ok(())
}

fn print_news(items: Vec<NewsItem>) {
    if items.is_empty() {
        println!("no news items found; run `db seed` for sample data");
        return;
    }
    println!("{}", news_header());
    for item in &items {
        println!("{}", news_line(item));
    }
}

fn news_header() -> String {
    format!(
        "{:<8}{:<22}{:<6}{:<21}TITLE",
        "ID", "PLATFORM", "RANK", "LAST CRAWLED"
    )
}

fn news_line(item: &NewsItem) -> String {
    format!(
        "{:<8}{:<22}{:<6}{:<21}{}",
        item.id,
        truncate_text(item.platform_label(), 20),
        format!("#{}", item.rank),
        format_date(item.last_crawl_time),
        truncate_text(&item.title, TITLE_CHARS)
    )
}
