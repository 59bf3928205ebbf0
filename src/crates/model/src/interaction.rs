use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaBrief {
    pub id: i64,
    pub title: String,
    pub year: Option<String>,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBrief {
    pub username: String,
    pub location: Option<String>,
}

/// 交互记录视图，附带媒体与用户摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionView {
    pub id: i64,
    pub media: MediaBrief,
    pub watched: String,
    pub rating: Option<i32>,
    pub watchlist: String,
    pub user: UserBrief,
}

/// 某个媒体的交互统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSummary {
    pub title: String,
    pub category: String,
    pub watched_count: i64,
    pub rating_count: i64,
    pub average_rating: Option<f64>,
    pub watchlist_count: i64,
}

/// 单个媒体的交互聚合计数，total 为 0 表示没有任何交互
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InteractionStats {
    pub total: i64,
    pub watched_count: i64,
    pub rating_count: i64,
    pub average_rating: Option<f64>,
    pub watchlist_count: i64,
}

/// 列表过滤：为 true 的条件同时生效
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionFilter {
    pub watched: bool,
    pub rated: bool,
    pub watchlist: bool,
}

impl InteractionFilter {
    /// 只有取值恰为小写 "yes" 的参数才启用对应过滤
    pub fn from_params(
        watched: Option<&str>,
        rating: Option<&str>,
        watchlist: Option<&str>,
    ) -> Self {
        let on = |v: Option<&str>| v == Some("yes");
        InteractionFilter {
            watched: on(watched),
            rated: on(rating),
            watchlist: on(watchlist),
        }
    }

    pub fn accepts(&self, view: &InteractionView) -> bool {
        (!self.watched || view.watched == "yes")
            && (!self.rated || view.rating.is_some())
            && (!self.watchlist || view.watchlist == "yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(watched: &str, rating: Option<i32>, watchlist: &str) -> InteractionView {
        InteractionView {
            id: 1,
            media: MediaBrief {
                id: 1,
                title: "Dark".to_string(),
                year: Some("2017–2020".to_string()),
                category: "series".to_string(),
            },
            watched: watched.to_string(),
            rating,
            watchlist: watchlist.to_string(),
            user: UserBrief {
                username: "alice".to_string(),
                location: None,
            },
        }
    }

    #[test]
    fn params_other_than_yes_are_ignored() {
        let filter = InteractionFilter::from_params(Some("yes"), Some("no"), None);
        assert!(filter.watched);
        assert!(!filter.rated);
        assert!(!filter.watchlist);

        let filter = InteractionFilter::from_params(Some("YES"), Some("Yes"), Some("yes "));
        assert_eq!(filter, InteractionFilter::default());
    }

    #[test]
    fn filters_combine() {
        let filter = InteractionFilter::from_params(Some("yes"), Some("yes"), None);
        assert!(filter.accepts(&view("yes", Some(8), "no")));
        assert!(!filter.accepts(&view("yes", None, "no")));
        assert!(!filter.accepts(&view("no", Some(8), "yes")));
        assert!(InteractionFilter::default().accepts(&view("no", None, "no")));
    }
}
