//! Derived operations the upstream API does not expose natively.
//!
//! Blogger has no endpoint for listing labels or searching posts. Both are
//! synthesized here from plain post listings: labels as the union over a
//! bounded window of recent posts, search as a client-side substring filter
//! over one page. Both are therefore approximations bounded by page size,
//! documented rather than hidden.

use std::collections::HashSet;

use tracing::debug;

use blogrelay_types::{Label, LabelList, Post, PostList, RelayError, RelayResult};

use crate::client::BloggerClient;

/// How many recent posts are scanned when aggregating labels.
///
/// Labels appearing only on posts older than this window will not be
/// discovered. A full-archive walk was rejected: unbounded pagination
/// against a remote, rate-limited API is a poor fit for a synchronous
/// tool call.
pub const LABEL_SCAN_WINDOW: u32 = 50;

impl BloggerClient {
    /// List the distinct labels of a blog.
    ///
    /// Scans the [`LABEL_SCAN_WINDOW`] most recent posts and returns the
    /// union of their labels in first-seen order.
    pub async fn list_labels(&self, blog_id: &str) -> RelayResult<LabelList> {
        let page = self.list_posts(blog_id, Some(LABEL_SCAN_WINDOW)).await?;
        let items = collect_labels(&page.items);
        debug!(
            blog_id = %blog_id,
            scanned = page.items.len(),
            labels = items.len(),
            "aggregated labels from recent posts"
        );
        Ok(LabelList {
            kind: Some("blogger#labelList".into()),
            items,
        })
    }

    /// Look up one label by exact name within the aggregated set.
    ///
    /// # Errors
    ///
    /// `RelayError::NotFound` when no post in the scan window carries the
    /// label.
    pub async fn get_label(&self, blog_id: &str, label_name: &str) -> RelayResult<Label> {
        let labels = self.list_labels(blog_id).await?;
        labels
            .items
            .into_iter()
            .find(|label| label.name == label_name)
            .ok_or_else(|| RelayError::not_found(format!("label '{label_name}' not found")))
    }

    /// Search posts by case-insensitive substring match on title or content.
    ///
    /// Fetches up to `max_results` posts (configured default when `None`)
    /// and filters client-side, so matches are a subset of the first page,
    /// not a full-blog search. Order of the underlying listing is preserved.
    pub async fn search_posts(
        &self,
        blog_id: &str,
        query: &str,
        max_results: Option<u32>,
    ) -> RelayResult<PostList> {
        let page = self.list_posts(blog_id, max_results).await?;
        let needle = query.to_lowercase();
        let items: Vec<Post> = page
            .items
            .into_iter()
            .filter(|post| matches_query(post, &needle))
            .collect();
        Ok(PostList {
            kind: page.kind,
            items,
        })
    }
}

/// Union of post labels, first-seen order, case-sensitive identity.
fn collect_labels(posts: &[Post]) -> Vec<Label> {
    let mut seen = HashSet::new();
    let mut labels = Vec::new();
    for post in posts {
        for name in &post.labels {
            if seen.insert(name.clone()) {
                labels.push(Label::named(name));
            }
        }
    }
    labels
}

/// `needle` must already be lowercased.
fn matches_query(post: &Post, needle: &str) -> bool {
    post.title.to_lowercase().contains(needle) || post.content.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post(title: &str, content: &str, labels: &[&str]) -> Post {
        Post {
            id: "p".into(),
            blog_id: "b".into(),
            title: title.into(),
            content: content.into(),
            labels: labels.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn labels_deduplicate_across_posts() {
        let posts = vec![post("1", "", &["a", "b"]), post("2", "", &["b", "c"])];
        let labels = collect_labels(&posts);
        let names: Vec<_> = labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn labels_preserve_first_seen_order_regardless_of_post_order() {
        let posts = vec![post("1", "", &["zebra"]), post("2", "", &["apple", "zebra"])];
        let names: Vec<_> = collect_labels(&posts)
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["zebra", "apple"]);
    }

    #[test]
    fn label_identity_is_case_sensitive() {
        let posts = vec![post("1", "", &["Rust", "rust"])];
        assert_eq!(collect_labels(&posts).len(), 2);
    }

    #[test]
    fn query_matches_title_or_content_case_insensitively() {
        let a = post("Hello World", "...", &[]);
        let b = post("Other", "says hello", &[]);
        let c = post("Nope", "nothing", &[]);
        assert!(matches_query(&a, "hello"));
        assert!(matches_query(&b, "hello"));
        assert!(!matches_query(&c, "hello"));
    }
}
