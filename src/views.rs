use serde::Serialize;

use crate::types::{Analytics, SentimentLabel};

pub const POSITIVE_COLOR: &str = "#28a745";
pub const NEGATIVE_COLOR: &str = "#dc3545";
pub const NEUTRAL_COLOR: &str = "#ffc107";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSlice {
    pub label: SentimentLabel,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordTag {
    pub word: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsViews {
    pub sentiment_series: Vec<SentimentSlice>,
    pub keyword_tags: Vec<KeywordTag>,
}

impl AnalyticsViews {
    /// Plain sum of the plotted values. Shown as-is; a gap to 100 is left visible.
    pub fn sentiment_total(&self) -> f64 {
        self.sentiment_series.iter().map(|slice| slice.value).sum()
    }
}

pub fn sentiment_color(label: &SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => POSITIVE_COLOR,
        SentimentLabel::Negative => NEGATIVE_COLOR,
        SentimentLabel::Neutral | SentimentLabel::Other(_) => NEUTRAL_COLOR,
    }
}

/// Chart series and keyword tags for the analytics block. `None` when there is no analytics
/// block or it has neither sentiment nor keywords; either part alone still yields a view.
pub fn build_views(analytics: Option<&Analytics>) -> Option<AnalyticsViews> {
    let analytics = analytics?;
    if analytics.sentiment.is_empty() && analytics.top_keywords.is_empty() {
        return None;
    }

    let sentiment_series = analytics
        .sentiment
        .iter()
        .map(|(label, value)| SentimentSlice {
            label: label.clone(),
            value: *value,
            color: sentiment_color(label),
        })
        .collect();

    let keyword_tags = analytics
        .top_keywords
        .iter()
        .map(|keyword| KeywordTag {
            word: keyword.word.clone(),
            count: keyword.count,
        })
        .collect();

    Some(AnalyticsViews {
        sentiment_series,
        keyword_tags,
    })
}
