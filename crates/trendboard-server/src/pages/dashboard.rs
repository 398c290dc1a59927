use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use trendboard_core::{platform_color, NewsItem, PlatformStat, TrendData};

use super::{news_rows, NewsRow, ViewState};
use crate::hooks::{Hooks, QueryState};

pub const LATEST_LIMIT: i64 = 30;
pub const TREND_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub cards: Vec<StatCard>,
    pub platform_share: ViewState<Vec<PieSlice>>,
    pub trend: ViewState<TrendSeries>,
    pub latest: ViewState<Vec<NewsRow>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: ViewState<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: u64,
    pub color: &'static str,
}

/// Line chart series: `dates[i]` pairs with `counts[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendSeries {
    pub dates: Vec<NaiveDate>,
    pub counts: Vec<u64>,
}

pub async fn load(hooks: &Hooks, now: DateTime<Utc>) -> DashboardView {
    let (latest, stats, trends) = tokio::join!(
        hooks.latest_news(LATEST_LIMIT),
        hooks.platform_stats(None),
        hooks.trend_data(TREND_DAYS),
    );
    render(latest, stats, trends, now)
}

#[must_use]
pub fn render(
    latest: QueryState<Vec<NewsItem>>,
    stats: QueryState<Vec<PlatformStat>>,
    trends: QueryState<Vec<TrendData>>,
    now: DateTime<Utc>,
) -> DashboardView {
    let cards = vec![
        StatCard {
            label: "Trending items",
            value: ViewState::from_query(latest.clone(), |items| len_u64(&items)),
        },
        StatCard {
            label: "Active platforms",
            value: ViewState::from_query(stats.clone(), |rows| len_u64(&rows)),
        },
        StatCard {
            label: "Updated today",
            // The service may return fewer days than asked for; the newest
            // point is always last.
            value: ViewState::from_query(trends.clone(), |points| {
                points.last().map_or(0, |p| p.count)
            }),
        },
    ];

    DashboardView {
        cards,
        platform_share: ViewState::from_list(stats, |rows| {
            rows.into_iter()
                .map(|stat| PieSlice {
                    color: platform_color(&stat.platform_id),
                    name: stat.platform_name,
                    value: stat.total_items,
                })
                .collect()
        }),
        trend: ViewState::from_list(trends, |points| TrendSeries {
            dates: points.iter().map(|p| p.date).collect(),
            counts: points.iter().map(|p| p.count).collect(),
        }),
        latest: ViewState::from_list(latest, |items| news_rows(items, now)),
    }
}

fn len_u64<T>(rows: &[T]) -> u64 {
    u64::try_from(rows.len()).unwrap_or(u64::MAX)
}
