use chrono::{DateTime, Utc};
use serde::Serialize;
use trendboard_core::{format_date, NewsItem, RankHistory};

use super::{news_rows, NewsRow, Section, ViewState};
use crate::hooks::{Hooks, QueryState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryView {
    pub rank_chart: Section<RankSeries>,
    pub range: Section<Vec<NewsRow>>,
}

/// Rank over time for one item. Lower is better, so charts invert the axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankSeries {
    pub news_item_id: i64,
    pub times: Vec<String>,
    pub ranks: Vec<i32>,
}

/// Both range bounds are needed before the range list is fetched.
pub async fn load(
    hooks: &Hooks,
    news_item_id: Option<i64>,
    range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    now: DateTime<Utc>,
) -> HistoryView {
    let history = async {
        match news_item_id {
            Some(id) => Some(hooks.rank_history(id).await),
            None => None,
        }
    };
    let items = async {
        match range {
            Some((start, end)) => Some(hooks.news_by_date_range(start, end).await),
            None => None,
        }
    };
    let (history, items) = tokio::join!(history, items);
    render(news_item_id, history, items, now)
}

#[must_use]
pub fn render(
    news_item_id: Option<i64>,
    history: Option<QueryState<Vec<RankHistory>>>,
    items: Option<QueryState<Vec<NewsItem>>>,
    now: DateTime<Utc>,
) -> HistoryView {
    let rank_chart = match (news_item_id, history) {
        (Some(id), Some(state)) => Section::View {
            state: ViewState::from_list(state, |points| RankSeries {
                news_item_id: id,
                times: points.iter().map(|p| format_date(p.crawl_time)).collect(),
                ranks: points.iter().map(|p| p.rank).collect(),
            }),
        },
        _ => Section::Prompt {
            message: "Pick a news item to chart its rank",
        },
    };

    let range = match items {
        Some(state) => Section::View {
            state: ViewState::from_list(state, |rows| news_rows(rows, now)),
        },
        None => Section::Prompt {
            message: "Choose a start and end time",
        },
    };

    HistoryView { rank_chart, range }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::source::{check_range, fake};

    fn point(rank: i32, hour: u32) -> RankHistory {
        RankHistory {
            id: i64::from(hour),
            news_item_id: 7,
            rank,
            crawl_time: fake::at(hour),
            created_at: fake::at(hour),
        }
    }

    #[test]
    fn nothing_chosen_prompts_for_both_blocks() {
        let view = render(None, None, None, fake::at(12));
        assert!(matches!(view.rank_chart, Section::Prompt { .. }));
        assert!(matches!(view.range, Section::Prompt { .. }));
    }

    #[test]
    fn rank_series_keeps_crawl_order() {
        let history = vec![point(9, 8), point(4, 9), point(1, 10)];
        let view = render(Some(7), Some(QueryState::Ready(history)), None, fake::at(12));

        match view.rank_chart {
            Section::View {
                state: ViewState::Ready(series),
            } => {
                assert_eq!(series.news_item_id, 7);
                assert_eq!(series.ranks, vec![9, 4, 1]);
                assert_eq!(series.times[0], "2025-01-27 08:00:00");
            }
            other => panic!("expected rank series, got {other:?}"),
        }
    }

    #[test]
    fn unknown_item_fails_while_known_item_without_history_is_empty() {
        let missing = render(
            Some(404),
            Some(QueryState::Failed(Arc::new(crate::source::DataError::NotFound(
                "news item 404".to_string(),
            )))),
            None,
            fake::at(12),
        );
        assert_eq!(
            missing.rank_chart,
            Section::View {
                state: ViewState::Failed {
                    reason: "news item 404 not found".to_string()
                }
            }
        );

        let quiet = render(Some(7), Some(QueryState::Ready(Vec::new())), None, fake::at(12));
        assert_eq!(
            quiet.rank_chart,
            Section::View {
                state: ViewState::Empty
            }
        );
    }

    #[test]
    fn inverted_range_renders_as_a_failed_block() {
        let err = check_range(fake::at(12), fake::at(8)).expect_err("inverted range");
        let view = render(None, None, Some(QueryState::Failed(Arc::new(err))), fake::at(12));

        match view.range {
            Section::View {
                state: ViewState::Failed { reason },
            } => assert!(reason.contains("after"), "{reason}"),
            other => panic!("expected failed range, got {other:?}"),
        }
    }
}
