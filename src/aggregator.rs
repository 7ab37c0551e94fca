use std::borrow::Cow;

use crate::types::{AnalysisResult, CategoryName, Comment};

/// Display cap for every category except `Regular`.
pub const MINOR_CATEGORY_LIMIT: usize = 8;
/// Comment bodies longer than this are shortened in the minor category cards.
pub const TEXT_PREVIEW_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket<'a> {
    pub category: CategoryName,
    /// Comments surfaced to the view, in source order.
    pub items: &'a [Comment],
    /// Size of the whole bucket, independent of `items`.
    pub total: usize,
}

impl<'a> CategoryBucket<'a> {
    fn new(category: CategoryName, comments: &'a [Comment]) -> Self {
        let shown = match category {
            CategoryName::Regular => comments.len(),
            _ => comments.len().min(MINOR_CATEGORY_LIMIT),
        };
        Self {
            category,
            items: &comments[..shown],
            total: comments.len(),
        }
    }

    pub fn display_text(&self, comment: &'a Comment) -> Cow<'a, str> {
        display_text(self.category, &comment.text)
    }

    pub fn count_label(&self) -> String {
        match self.category {
            CategoryName::Regular => format!("{} total regular comments", self.total),
            _ if self.total == 1 => "1 comment".to_string(),
            _ => format!("{} comments", self.total),
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self.category {
            CategoryName::Regular => "No general engagement comments found.",
            _ => "None",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBuckets<'a> {
    buckets: [CategoryBucket<'a>; 4],
}

impl<'a> CategoryBuckets<'a> {
    pub fn get(&self, category: CategoryName) -> &CategoryBucket<'a> {
        &self.buckets[category as usize]
    }

    /// Buckets in display order: Regular, Questions, Requests, Concerning.
    pub fn iter(&self) -> impl Iterator<Item = &CategoryBucket<'a>> {
        self.buckets.iter()
    }

    pub fn all_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.total == 0)
    }
}

/// The uncategorized list shown instead of the category cards.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackView<'a> {
    pub comments: &'a [Comment],
    pub unrecognized_total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommentView<'a> {
    Categorized(CategoryBuckets<'a>),
    Fallback(FallbackView<'a>),
}

pub fn bucket(result: &AnalysisResult) -> CategoryBuckets<'_> {
    let categories = &result.comments_by_category;
    CategoryBuckets {
        buckets: CategoryName::ALL.map(|category| CategoryBucket::new(category, categories.get(category))),
    }
}

/// Picks between the category cards and the uncategorized fallback; never both.
pub fn comment_view(result: &AnalysisResult) -> CommentView<'_> {
    let buckets = bucket(result);
    // Unrecognized category keys do not count here, so they never hold off the fallback.
    if buckets.all_empty() && !result.raw_comments.is_empty() {
        CommentView::Fallback(FallbackView {
            comments: &result.raw_comments,
            unrecognized_total: result.comments_by_category.unrecognized_total(),
        })
    } else {
        CommentView::Categorized(buckets)
    }
}

pub fn display_text(category: CategoryName, text: &str) -> Cow<'_, str> {
    if category == CategoryName::Regular {
        return Cow::Borrowed(text);
    }
    truncate_chars(text, TEXT_PREVIEW_CHARS)
}

fn truncate_chars(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
