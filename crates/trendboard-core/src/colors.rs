//! Stable colour assignment for platforms and chart series.
//!
//! Known platforms use a fixed brand colour. Any other id falls back to
//! `PALETTE[c % PALETTE.len()]` where `c` is the first UTF-16 code unit of the
//! id, so the same id maps to the same colour in every process without any
//! stored state. An empty id maps to `PALETTE[0]`.

/// Brand colours for the platforms the collector knows about.
pub const PLATFORM_COLORS: &[(&str, &str)] = &[
    ("weibo", "#e6162d"),
    ("zhihu", "#0084ff"),
    ("douyin", "#000000"),
    ("bilibili-hot-search", "#00a1d6"),
    ("baidu", "#2932e1"),
    ("toutiao", "#d32f2f"),
    ("wallstreetcn-hot", "#1976d2"),
    ("cls-hot", "#c62828"),
];

/// Chart palette. The last entry repeats the first.
pub const PALETTE: [&str; 10] = [
    "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452", "#9a60b4",
    "#ea7ccc", "#5470c6",
];

/// Palette colour for a series position, wrapping around.
#[must_use]
pub fn color_by_index(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[must_use]
pub fn platform_color(platform_id: &str) -> &'static str {
    PLATFORM_COLORS
        .iter()
        .find(|(id, _)| *id == platform_id)
        .map_or_else(
            || {
                let first_unit = platform_id.encode_utf16().next().unwrap_or(0);
                color_by_index(usize::from(first_unit))
            },
            |(_, color)| color,
        )
}
