use crate::aggregator::{comment_view, CategoryBucket, CommentView, FallbackView};
use crate::controller::{Phase, RequestState};
use crate::types::{AnalysisResult, Comment};
use crate::views::{build_views, AnalyticsViews};

pub fn render_state(state: &RequestState) -> String {
    match &state.phase {
        Phase::Idle => "Ready to analyze. Enter a YouTube URL or video ID.\n".to_string(),
        Phase::Loading => format!("Fetching and analyzing comments for {}...\n", state.input_value.trim()),
        Phase::Failure(message) => format!("Error: {message}\n"),
        Phase::Success(result) => render_report(result),
    }
}

pub fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();

    if let Some(summary) = &result.ai_summary {
        out.push_str("## AI Summary\n");
        out.push_str(&format!("{}\n\n", summary.trim()));
    }

    match comment_view(result) {
        CommentView::Categorized(buckets) => {
            for bucket in buckets.iter() {
                render_bucket(&mut out, bucket);
            }
        }
        CommentView::Fallback(view) => render_fallback(&mut out, &view),
    }

    if let Some(views) = build_views(result.analysis.as_ref()) {
        render_analytics(&mut out, &views);
    }

    out
}

fn render_bucket(out: &mut String, bucket: &CategoryBucket<'_>) {
    out.push_str(&format!("## {} ({})\n", bucket.category, bucket.category.label()));
    if bucket.items.is_empty() {
        out.push_str(&format!("{}\n", bucket.empty_message()));
    }
    for comment in bucket.items {
        render_comment(out, comment, &bucket.display_text(comment));
    }
    out.push_str(&format!("{}\n\n", bucket.count_label()));
}

fn render_fallback(out: &mut String, view: &FallbackView<'_>) {
    out.push_str("## All Comments (Uncategorized)\n");
    for comment in view.comments {
        render_comment(out, comment, &comment.text);
    }
    if view.unrecognized_total > 0 {
        out.push_str(&format!(
            "({} comments in unrecognized categories)\n",
            view.unrecognized_total
        ));
    }
    out.push('\n');
}

fn render_comment(out: &mut String, comment: &Comment, text: &str) {
    out.push_str(&format!(
        "- {} | {} likes | {}\n  {}\n",
        comment.author,
        comment.likes,
        comment.published.display(),
        text
    ));
}

fn render_analytics(out: &mut String, views: &AnalyticsViews) {
    if !views.keyword_tags.is_empty() {
        out.push_str("## Top Comment Topics & Keywords\n");
        let tags: Vec<String> = views
            .keyword_tags
            .iter()
            .map(|tag| format!("#{} ({})", tag.word, tag.count))
            .collect();
        out.push_str(&format!("{}\n\n", tags.join("  ")));
    }

    if !views.sentiment_series.is_empty() {
        out.push_str("## Audience Sentiment\n");
        for slice in &views.sentiment_series {
            out.push_str(&format!("- {}: {} [{}]\n", slice.label, slice.value, slice.color));
        }
        out.push('\n');
    }
}
