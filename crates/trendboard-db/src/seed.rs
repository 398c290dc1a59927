//! Sample data for local dashboards and demos.
//!
//! Mirrors a single crawl of five platforms' hot lists, five items each.

use sqlx::PgPool;

use crate::DbError;

/// One sample hot-list entry.
#[derive(Debug, Clone, Copy)]
pub struct SampleNews {
    pub platform_id: &'static str,
    pub title: &'static str,
    pub url: &'static str,
    pub rank: i32,
    pub hot_value: &'static str,
}

/// `(id, display name)` for every platform referenced by [`SAMPLE_NEWS`].
pub const SAMPLE_PLATFORMS: &[(&str, &str)] = &[
    ("weibo", "微博"),
    ("zhihu", "知乎"),
    ("douyin", "抖音"),
    ("bilibili", "哔哩哔哩"),
    ("baidu", "百度"),
];

const fn sample(
    platform_id: &'static str,
    title: &'static str,
    url: &'static str,
    rank: i32,
    hot_value: &'static str,
) -> SampleNews {
    SampleNews {
        platform_id,
        title,
        url,
        rank,
        hot_value,
    }
}

pub const SAMPLE_NEWS: &[SampleNews] = &[
    sample("weibo", "春节档电影票房破纪录", "https://weibo.com/1", 1, "4521万"),
    sample("weibo", "AI技术新突破引发热议", "https://weibo.com/2", 2, "3892万"),
    sample("weibo", "某明星官宣恋情", "https://weibo.com/3", 3, "3654万"),
    sample("weibo", "新能源汽车降价潮来袭", "https://weibo.com/4", 4, "2987万"),
    sample("weibo", "全国多地迎来降雪", "https://weibo.com/5", 5, "2765万"),
    sample("zhihu", "如何看待ChatGPT最新更新？", "https://zhihu.com/1", 1, "1254万热度"),
    sample("zhihu", "2026年程序员就业形势分析", "https://zhihu.com/2", 2, "987万热度"),
    sample("zhihu", "为什么越来越多人选择远程工作？", "https://zhihu.com/3", 3, "876万热度"),
    sample("zhihu", "如何评价最新的iPhone？", "https://zhihu.com/4", 4, "765万热度"),
    sample("zhihu", "年轻人该不该买房？", "https://zhihu.com/5", 5, "654万热度"),
    sample("douyin", "春节特效妆容教程", "https://douyin.com/1", 1, "5432万播放"),
    sample("douyin", "东北雪景vlog", "https://douyin.com/2", 2, "4321万播放"),
    sample("douyin", "年夜饭硬菜教学", "https://douyin.com/3", 3, "3987万播放"),
    sample("douyin", "春节回家搞笑段子", "https://douyin.com/4", 4, "3654万播放"),
    sample("douyin", "新年穿搭分享", "https://douyin.com/5", 5, "3210万播放"),
    sample("bilibili", "【技术分享】从零搭建个人博客", "https://bilibili.com/1", 1, "234万播放"),
    sample("bilibili", "春节档电影深度解析", "https://bilibili.com/2", 2, "198万播放"),
    sample("bilibili", "游戏《黑神话：悟空》全流程攻略", "https://bilibili.com/3", 3, "176万播放"),
    sample("bilibili", "AI绘画教程合集", "https://bilibili.com/4", 4, "154万播放"),
    sample("bilibili", "年度科技产品盘点", "https://bilibili.com/5", 5, "132万播放"),
    sample("baidu", "春运火车票抢票攻略", "https://baidu.com/1", 1, "4987654"),
    sample("baidu", "全国天气预报", "https://baidu.com/2", 2, "4321098"),
    sample("baidu", "春节放假安排", "https://baidu.com/3", 3, "3876543"),
    sample("baidu", "新冠疫情最新消息", "https://baidu.com/4", 4, "3456789"),
    sample("baidu", "股市行情分析", "https://baidu.com/5", 5, "3012345"),
];

/// Counts written by [`seed_sample_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub platforms: usize,
    pub news_items: usize,
}

/// Replace all news items with the sample crawl.
///
/// Upserts the sample platforms, deletes every existing news item (and, by
/// cascade, its rank history), then inserts [`SAMPLE_NEWS`] with a crawl time
/// of `NOW()` and one matching `rank_history` row each. Runs in a single
/// transaction; any failure rolls the whole batch back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_sample_data(pool: &PgPool) -> Result<SeedSummary, DbError> {
    let mut tx = pool.begin().await?;

    for (id, name) in SAMPLE_PLATFORMS {
        sqlx::query(
            "INSERT INTO platforms (id, name, is_active) \
             VALUES ($1, $2, TRUE) \
             ON CONFLICT (id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 is_active = TRUE, \
                 updated_at = NOW()",
        )
        .bind(*id)
        .bind(*name)
        .execute(&mut *tx)
        .await?;
    }

    let deleted = sqlx::query("DELETE FROM news_items")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    tracing::info!(deleted, "cleared existing news items");

    for news in SAMPLE_NEWS {
        let news_item_id: i64 = sqlx::query_scalar(
            "INSERT INTO news_items (platform_id, title, url, rank, hot_value, last_crawl_time) \
             VALUES ($1, $2, $3, $4, $5, NOW()) \
             RETURNING id",
        )
        .bind(news.platform_id)
        .bind(news.title)
        .bind(news.url)
        .bind(news.rank)
        .bind(news.hot_value)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO rank_history (news_item_id, rank, crawl_time) \
             VALUES ($1, $2, NOW())",
        )
        .bind(news_item_id)
        .bind(news.rank)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(SeedSummary {
        platforms: SAMPLE_PLATFORMS.len(),
        news_items: SAMPLE_NEWS.len(),
    })
}
