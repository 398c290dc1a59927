//! Aggregation-service queries printed as tables.

use chrono::NaiveDate;
use clap::Subcommand;
use trendboard_core::KeywordStat;
use trendboard_stats::StatsClient;

/// Sub-commands available under `stats`.
#[derive(Debug, Subcommand)]
pub enum StatsCommands {
    /// Items per platform
    Platforms {
        /// Single day (YYYY-MM-DD); all data when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Most frequent keywords
    Keywords {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Daily item counts
    Trends {
        #[arg(long, default_value = "7")]
        days: u32,
    },
}

/// # Errors
///
/// Returns an error if the aggregation service is unreachable or answers
/// with an unexpected status or body.
pub(crate) async fn run(client: &StatsClient, command: StatsCommands) -> anyhow::Result<()> {
    match command {
        StatsCommands::Platforms { date } => {
            let rows = client.platform_stats(date).await?;
            println!("{:<24}{:>8}{:>10}", "PLATFORM", "ITEMS", "AVG RANK");
            for row in &rows {
                println!(
                    "{:<24}{:>8}{:>10.1}",
                    row.platform_name, row.total_items, row.avg_rank
                );
            }
        }
        StatsCommands::Keywords { date, limit } => {
            let rows = client.keyword_stats(date).await?;
            println!("{:<6}{:<20}{:>7}  PLATFORMS", "RANK", "KEYWORD", "COUNT");
            for line in keyword_lines(&rows, limit) {
                println!("{line}");
            }
        }
        StatsCommands::Trends { days } => {
            let points = client.trend_data(days).await?;
            println!("{:<12}{:>7}", "DATE", "COUNT");
            for point in &points {
                println!("{:<12}{:>7}", point.date, point.count);
            }
        }
    }
    Ok(())
}

fn keyword_lines(rows: &[KeywordStat], limit: usize) -> Vec<String> {
    rows.iter()
        .take(limit)
        .enumerate()
        .map(|(i, row)| {
            format!(
                "{:<6}{:<20}{:>7}  {}",
                i + 1,
                row.keyword,
                row.count,
                row.platforms.join(", ")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(keyword: &str, count: u64) -> KeywordStat {
        KeywordStat {
            keyword: keyword.to_string(),
            count,
            platforms: vec!["weibo".to_string(), "zhihu".to_string()],
            news_items: Vec::new(),
        }
    }

    #[test]
    fn keyword_lines_are_ranked_and_limited() {
        let rows = vec![stat("AI", 30), stat("chips", 20), stat("rates", 10)];
        let lines = keyword_lines(&rows, 2);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1     AI"), "{}", lines[0]);
        assert!(lines[1].ends_with("weibo, zhihu"), "{}", lines[1]);
    }
}
