use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

pub const INVALID_DATE: &str = "Invalid Date";
const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    #[default]
    Ok,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CategoryName {
    Regular,
    Questions,
    Requests,
    Concerning,
}

impl CategoryName {
    pub const ALL: [CategoryName; 4] = [
        CategoryName::Regular,
        CategoryName::Questions,
        CategoryName::Requests,
        CategoryName::Concerning,
    ];

    /// Matches the payload key exactly; the backend never varies category casing.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Regular" => Some(Self::Regular),
            "Questions" => Some(Self::Questions),
            "Requests" => Some(Self::Requests),
            "Concerning" => Some(Self::Concerning),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Questions => "Questions",
            Self::Requests => "Requests",
            Self::Concerning => "Concerning",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Regular => "General Engagement",
            Self::Questions => "Audience Questions",
            Self::Requests => "Requests & Suggestions",
            Self::Concerning => "Concerning Feedback",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Regular => "#28a745",
            Self::Questions => "#007bff",
            Self::Requests => "#ffc107",
            Self::Concerning => "#dc3545",
        }
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const OTHER_CATEGORY_LABEL: &str = "Other";
pub const OTHER_CATEGORY_COLOR: &str = "#6c757d";

/// Publication time of a comment. Unparsable input is kept verbatim so nothing is lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    Timestamp(DateTime<FixedOffset>),
    /// Timestamp without a zone, e.g. `2024-01-01T12:00:00`.
    Local(NaiveDateTime),
    Date(NaiveDate),
    Opaque(String),
}

impl Published {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::Timestamp(ts);
        }
        if let Ok(local) = NaiveDateTime::parse_from_str(trimmed, LOCAL_TIMESTAMP_FORMAT) {
            return Self::Local(local);
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Self::Date(date);
        }
        Self::Opaque(raw.to_string())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Timestamp(ts) => Some(ts.date_naive()),
            Self::Local(local) => Some(local.date()),
            Self::Date(date) => Some(*date),
            Self::Opaque(_) => None,
        }
    }

    pub fn display(&self) -> String {
        self.date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| INVALID_DATE.to_string())
    }
}

impl Default for Published {
    fn default() -> Self {
        Self::Opaque(String::new())
    }
}

impl Serialize for Published {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            Self::Local(local) => {
                serializer.serialize_str(&local.format(LOCAL_TIMESTAMP_FORMAT).to_string())
            }
            Self::Date(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            Self::Opaque(raw) => serializer.serialize_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Comment {
    pub author: String,
    pub text: String,
    pub likes: u64,
    pub published: Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommentsByCategory {
    pub regular: Vec<Comment>,
    pub questions: Vec<Comment>,
    pub requests: Vec<Comment>,
    pub concerning: Vec<Comment>,
    /// Keys outside the four known categories, in payload order.
    pub unrecognized: Vec<(String, Vec<Comment>)>,
}

impl CommentsByCategory {
    pub fn get(&self, category: CategoryName) -> &[Comment] {
        match category {
            CategoryName::Regular => &self.regular,
            CategoryName::Questions => &self.questions,
            CategoryName::Requests => &self.requests,
            CategoryName::Concerning => &self.concerning,
        }
    }

    pub(crate) fn slot_mut(&mut self, category: CategoryName) -> &mut Vec<Comment> {
        match category {
            CategoryName::Regular => &mut self.regular,
            CategoryName::Questions => &mut self.questions,
            CategoryName::Requests => &mut self.requests,
            CategoryName::Concerning => &mut self.concerning,
        }
    }

    pub fn unrecognized_total(&self) -> usize {
        self.unrecognized.iter().map(|(_, comments)| comments.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Other(String),
}

impl SentimentLabel {
    /// Canonicalises label casing: `Positive`, `POSITIVE` and `positive` are the same label.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "neutral" => Self::Neutral,
            _ => Self::Other(key.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SentimentLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub word: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_length: Option<f64>,
    /// Percentages in payload order, never rescaled.
    pub sentiment: Vec<(SentimentLabel, f64)>,
    pub top_keywords: Vec<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    pub comments_by_category: CommentsByCategory,
    pub raw_comments: Vec<Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analytics>,
}

/// Body of the outbound analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    #[serde(rename = "video_url")]
    pub video_url_or_id: String,
    pub max_comments: u32,
}
