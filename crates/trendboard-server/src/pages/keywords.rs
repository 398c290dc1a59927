use serde::Serialize;
use trendboard_core::{color_by_index, KeywordStat};

use super::ViewState;
use crate::hooks::{Hooks, QueryState};

pub const CLOUD_SIZE: usize = 50;
pub const BAR_SIZE: usize = 20;
pub const TABLE_SIZE: usize = 50;
pub const PLATFORMS_SHOWN: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordsView {
    pub word_cloud: ViewState<Vec<WordWeight>>,
    pub bar_chart: ViewState<BarChart>,
    pub table: ViewState<Vec<KeywordRow>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordWeight {
    pub name: String,
    pub value: u64,
}

/// Horizontal bars, smallest first so the largest sits at the top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChart {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordRow {
    pub rank: usize,
    pub keyword: String,
    pub count: u64,
    pub platforms: Vec<String>,
    /// Platforms beyond the first few, shown as `+N`.
    pub more_platforms: usize,
}

pub async fn load(hooks: &Hooks) -> KeywordsView {
    render(hooks.keyword_stats(None).await)
}

#[must_use]
pub fn render(stats: QueryState<Vec<KeywordStat>>) -> KeywordsView {
    KeywordsView {
        word_cloud: ViewState::from_list(stats.clone(), |rows| {
            rows.into_iter()
                .take(CLOUD_SIZE)
                .map(|s| WordWeight {
                    name: s.keyword,
                    value: s.count,
                })
                .collect()
        }),
        bar_chart: ViewState::from_list(stats.clone(), |rows| {
            let top: Vec<KeywordStat> = rows.into_iter().take(BAR_SIZE).rev().collect();
            BarChart {
                labels: top.iter().map(|s| s.keyword.clone()).collect(),
                values: top.iter().map(|s| s.count).collect(),
                color: color_by_index(0),
            }
        }),
        table: ViewState::from_list(stats, |rows| {
            rows.into_iter()
                .take(TABLE_SIZE)
                .enumerate()
                .map(|(i, s)| KeywordRow {
                    rank: i + 1,
                    more_platforms: s.platforms.len().saturating_sub(PLATFORMS_SHOWN),
                    platforms: s.platforms.into_iter().take(PLATFORMS_SHOWN).collect(),
                    keyword: s.keyword,
                    count: s.count,
                })
                .collect()
        }),
    }
}
