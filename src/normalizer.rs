use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{
    AnalysisResult, Analytics, CategoryName, Comment, CommentsByCategory, Keyword, Published,
    ResponseStatus, SentimentLabel,
};

/// Turns any JSON value into an `AnalysisResult`. Missing or mistyped fields fall back to
/// defaults; this never fails.
pub fn normalize(raw: &Value) -> AnalysisResult {
    let Some(obj) = raw.as_object() else {
        debug!(kind = json_kind(raw), "Payload is not a JSON object; using empty result");
        return AnalysisResult::default();
    };

    let status = match obj.get("status").and_then(Value::as_str) {
        Some("error") => ResponseStatus::Error,
        _ => ResponseStatus::Ok,
    };

    AnalysisResult {
        status,
        error: non_blank(obj.get("error")),
        ai_summary: non_blank(obj.get("ai_summary")),
        comments_by_category: normalize_categories(obj.get("comments_by_category")),
        raw_comments: normalize_raw_comments(obj),
        analysis: obj
            .get("analysis")
            .and_then(Value::as_object)
            .map(normalize_analytics),
    }
}

fn normalize_categories(value: Option<&Value>) -> CommentsByCategory {
    let mut categories = CommentsByCategory::default();
    let Some(map) = value.and_then(Value::as_object) else {
        return categories;
    };

    for (key, comments) in map {
        let comments = normalize_comment_list(Some(comments));
        match CategoryName::from_key(key) {
            Some(category) => *categories.slot_mut(category) = comments,
            None => {
                debug!(category = %key, count = comments.len(), "Unrecognized comment category");
                categories.unrecognized.push((key.clone(), comments));
            }
        }
    }

    categories
}

fn normalize_raw_comments(obj: &Map<String, Value>) -> Vec<Comment> {
    // Older backends only sent a flat `comments` array of strings.
    let source = obj.get("raw_comments").or_else(|| obj.get("comments"));
    normalize_comment_list(source)
}

fn normalize_comment_list(value: Option<&Value>) -> Vec<Comment> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(normalize_comment).collect())
        .unwrap_or_default()
}

fn normalize_comment(value: &Value) -> Comment {
    match value {
        Value::Object(obj) => Comment {
            author: text_field(obj.get("author")),
            text: text_field(obj.get("text")),
            likes: obj.get("likes").and_then(count_value).unwrap_or(0),
            published: Published::parse(&text_field(obj.get("published"))),
        },
        Value::String(text) => Comment {
            text: text.clone(),
            ..Comment::default()
        },
        _ => Comment::default(),
    }
}

fn normalize_analytics(obj: &Map<String, Value>) -> Analytics {
    Analytics {
        average_length: obj.get("average_length").and_then(Value::as_f64),
        sentiment: normalize_sentiment(obj.get("sentiment")),
        top_keywords: normalize_keywords(obj.get("top_keywords")),
    }
}

fn normalize_sentiment(value: Option<&Value>) -> Vec<(SentimentLabel, f64)> {
    let mut series: Vec<(SentimentLabel, f64)> = Vec::new();
    let Some(map) = value.and_then(Value::as_object) else {
        return series;
    };

    for (key, raw) in map {
        let Some(percentage) = raw.as_f64() else {
            debug!(label = %key, "Skipping non-numeric sentiment value");
            continue;
        };
        let label = SentimentLabel::from_key(key);
        if series.iter().any(|(existing, _)| *existing == label) {
            debug!(label = %key, "Duplicate sentiment label after case folding; keeping first");
            continue;
        }
        series.push((label, percentage));
    }

    series
}

fn normalize_keywords(value: Option<&Value>) -> Vec<Keyword> {
    value
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(keyword_entry).collect())
        .unwrap_or_default()
}

fn keyword_entry(entry: &Value) -> Option<Keyword> {
    let (word, count) = match entry {
        Value::Array(pair) if pair.len() == 2 => (pair[0].as_str()?, count_value(&pair[1])?),
        Value::Object(obj) => (
            obj.get("word").and_then(Value::as_str)?,
            obj.get("count").and_then(count_value)?,
        ),
        _ => return None,
    };
    if count < 1 {
        return None;
    }
    Some(Keyword {
        word: word.to_string(),
        count,
    })
}

/// Non-negative integer from a number or numeric string. Fractions truncate, negatives clamp to 0.
fn count_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_i64().map(|n| n.max(0) as u64))
            .or_else(|| number.as_f64().filter(|n| n.is_finite()).map(|n| n.max(0.0) as u64)),
        Value::String(raw) => raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.max(0.0) as u64),
        _ => None,
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_object_normalizes_to_defaults() {
        let result = normalize(&json!({}));
        assert_eq!(result.status, ResponseStatus::Ok);
        assert!(result.error.is_none());
        assert!(result.ai_summary.is_none());
        assert!(result.raw_comments.is_empty());
        assert!(result.analysis.is_none());
        for category in CategoryName::ALL {
            assert!(result.comments_by_category.get(category).is_empty());
        }
    }

    #[test]
    fn non_object_payloads_do_not_fail() {
        for raw in [json!(null), json!([1, 2]), json!("oops"), json!(42)] {
            assert_eq!(normalize(&raw), AnalysisResult::default());
        }
    }

    #[test]
    fn comment_fields_default_when_missing_or_mistyped() {
        let raw = json!({
            "raw_comments": [
                { "author": "ana", "text": "hello", "likes": 3, "published": "2024-01-01" },
                { "likes": "12" },
                { "author": null, "text": 7, "likes": -4, "published": "soon" },
                { "likes": 2.9 },
                "plain string comment",
                17
            ]
        });
        let comments = normalize(&raw).raw_comments;
        assert_eq!(comments.len(), 6);

        assert_eq!(comments[0].author, "ana");
        assert_eq!(comments[0].likes, 3);
        assert_eq!(comments[0].published.display(), "2024-01-01");

        assert_eq!(comments[1].author, "");
        assert_eq!(comments[1].text, "");
        assert_eq!(comments[1].likes, 12);

        assert_eq!(comments[2].author, "");
        assert_eq!(comments[2].text, "7");
        assert_eq!(comments[2].likes, 0);
        assert_eq!(comments[2].published, Published::Opaque("soon".to_string()));

        assert_eq!(comments[3].likes, 2);
        assert_eq!(comments[4].text, "plain string comment");
        assert_eq!(comments[5], Comment::default());
    }

    #[test]
    fn non_numeric_likes_default_to_zero() {
        let raw = json!({ "raw_comments": [{ "likes": "lots" }, { "likes": [1] }, { "likes": true }] });
        assert!(normalize(&raw).raw_comments.iter().all(|c| c.likes == 0));
    }

    #[test]
    fn categories_split_known_and_unrecognized_keys() {
        let raw = json!({
            "comments_by_category": {
                "Questions": [{ "text": "why?" }],
                "Spam": [{ "text": "buy now" }, { "text": "click" }],
                "Regular": "not a list",
                "Concerning": [{ "text": "hmm" }]
            }
        });
        let categories = normalize(&raw).comments_by_category;
        assert_eq!(categories.questions.len(), 1);
        assert!(categories.regular.is_empty());
        assert!(categories.requests.is_empty());
        assert_eq!(categories.concerning.len(), 1);
        assert_eq!(categories.unrecognized.len(), 1);
        assert_eq!(categories.unrecognized[0].0, "Spam");
        assert_eq!(categories.unrecognized_total(), 2);
    }

    #[test]
    fn legacy_comment_strings_become_raw_comments() {
        let raw = json!({ "comments": ["first", "second"] });
        let comments = normalize(&raw).raw_comments;
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].text, "second");

        let both = json!({ "comments": ["ignored"], "raw_comments": [] });
        assert!(normalize(&both).raw_comments.is_empty());
    }

    #[test]
    fn status_and_blank_strings() {
        let raw = json!({ "status": "error", "error": "  ", "ai_summary": "" });
        let result = normalize(&raw);
        assert_eq!(result.status, ResponseStatus::Error);
        assert!(result.error.is_none());
        assert!(result.ai_summary.is_none());

        let odd = json!({ "status": "partial", "ai_summary": "Fans love the intro." });
        let result = normalize(&odd);
        assert_eq!(result.status, ResponseStatus::Ok);
        assert_eq!(result.ai_summary.as_deref(), Some("Fans love the intro."));
    }

    #[test]
    fn sentiment_labels_are_case_folded_in_source_order() {
        let raw = json!({
            "analysis": {
                "average_length": 42.5,
                "sentiment": { "NEUTRAL": 20.0, "POSITIVE": 70, "negative": 5.5, "Positive": 99, "Mixed": 1, "Bad": "n/a" }
            }
        });
        let analysis = normalize(&raw).analysis.unwrap();
        assert_eq!(analysis.average_length, Some(42.5));
        assert_eq!(
            analysis.sentiment,
            vec![
                (SentimentLabel::Neutral, 20.0),
                (SentimentLabel::Positive, 70.0),
                (SentimentLabel::Negative, 5.5),
                (SentimentLabel::Other("Mixed".to_string()), 1.0),
            ]
        );
    }

    #[test]
    fn keywords_keep_order_and_skip_malformed_entries() {
        let raw = json!({
            "analysis": {
                "top_keywords": [["ai", 12], ["great", 5], [3, 4], ["zero", 0], ["solo"], { "word": "music", "count": 2 }, "bare"]
            }
        });
        let keywords = normalize(&raw).analysis.unwrap().top_keywords;
        let pairs: Vec<(&str, u64)> = keywords.iter().map(|k| (k.word.as_str(), k.count)).collect();
        assert_eq!(pairs, vec![("ai", 12), ("great", 5), ("music", 2)]);
    }

    #[test]
    fn normalizing_twice_is_structurally_equal() {
        let raw = json!({
            "status": "ok",
            "ai_summary": "Mostly positive.",
            "comments_by_category": { "Regular": [{ "author": "x", "text": "hi", "likes": 1, "published": "2024-01-01T00:00:00Z" }] },
            "analysis": { "sentiment": { "Positive": 60, "Negative": 40 }, "top_keywords": [["hi", 1]] }
        });
        assert_eq!(normalize(&raw), normalize(&raw));
    }
}
