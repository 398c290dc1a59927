//! Navigation shell: the route table and the layout chrome around every page.

use serde::Serialize;

pub const APP_TITLE: &str = "TrendRadar Dashboard";
pub const APP_SUBTITLE: &str = "Real-time trending topic monitor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Platforms,
    Keywords,
    History,
    Rss,
    Settings,
}

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub route: Route,
    pub name: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
}

pub const NAVIGATION: [NavItem; 6] = [
    NavItem {
        route: Route::Dashboard,
        name: "Overview",
        href: "/",
        icon: "📊",
    },
    NavItem {
        route: Route::Platforms,
        name: "Platforms",
        href: "/platforms",
        icon: "🌐",
    },
    NavItem {
        route: Route::Keywords,
        name: "Keywords",
        href: "/keywords",
        icon: "🔑",
    },
    NavItem {
        route: Route::History,
        name: "History",
        href: "/history",
        icon: "📈",
    },
    NavItem {
        route: Route::Rss,
        name: "RSS",
        href: "/rss",
        icon: "📡",
    },
    NavItem {
        route: Route::Settings,
        name: "Settings",
        href: "/settings",
        icon: "⚙️",
    },
];

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        NAVIGATION
            .iter()
            .find(|item| item.route == self)
            .map_or("/", |item| item.href)
    }

    fn heading(self) -> (&'static str, &'static str) {
        match self {
            Route::Dashboard => ("Overview", "Trending topics across all platforms"),
            Route::Platforms => ("Platforms", "Hot lists per platform"),
            Route::Keywords => ("Keyword analysis", "Most frequent keywords and where they appear"),
            Route::History => ("History", "Rank history and past crawls"),
            Route::Rss => ("RSS", "Subscribed feeds and their latest items"),
            Route::Settings => ("Settings", "Effective dashboard configuration"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub name: &'static str,
    pub href: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub nav: Vec<NavLink>,
}

impl Layout {
    #[must_use]
    pub fn for_route(active: Route) -> Self {
        Self {
            title: APP_TITLE,
            subtitle: APP_SUBTITLE,
            nav: NAVIGATION
                .iter()
                .map(|item| NavLink {
                    name: item.name,
                    href: item.href,
                    icon: item.icon,
                    active: item.route == active,
                })
                .collect(),
        }
    }
}

/// A page view-model wrapped in its layout.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub layout: Layout,
    pub heading: &'static str,
    pub description: &'static str,
    pub content: T,
}

impl<T> Page<T> {
    pub fn new(route: Route, content: T) -> Self {
        let (heading, description) = route.heading();
        Self {
            layout: Layout::for_route(route),
            heading,
            description,
            content,
        }
    }
}
