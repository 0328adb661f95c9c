//! Content types mirroring the upstream Blogger v3 API.
//!
//! These are read-through mirrors of upstream state: fetched on demand,
//! never cached beyond a single request's lifetime. Field names serialize
//! in camelCase so payloads pass through unchanged.

use serde::{Deserialize, Serialize};

/// A blog as reported by the upstream service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    /// Blog identifier
    pub id: String,
    /// Blog display name
    pub name: String,
    /// Blog description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Public URL of the blog
    pub url: String,
    /// Upstream status string (e.g. "LIVE")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A post within a blog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post identifier
    pub id: String,
    /// Identifier of the owning blog
    pub blog_id: String,
    /// Post title
    pub title: String,
    /// Post body (HTML)
    pub content: String,
    /// Public URL of the post
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Publication timestamp (RFC 3339, as reported upstream)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    /// Last-update timestamp (RFC 3339, as reported upstream)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Post author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<PostAuthor>,
    /// Labels attached to the post
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Author metadata attached to a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    /// Author identifier
    pub id: String,
    /// Author display name
    pub display_name: String,
    /// Author profile URL
    pub url: String,
    /// Author avatar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<AuthorImage>,
}

/// Author avatar reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthorImage {
    /// Image URL
    pub url: String,
}

/// A label. Not a first-class upstream entity - derived by scanning posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    /// Label name (the identity of a label)
    pub name: String,
    /// Optional identifier, absent for derived labels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Label {
    /// Create a derived label from its name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }
}

/// List envelope for blogs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BlogList {
    /// Upstream kind discriminator (e.g. "blogger#blogList")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Blogs in this page
    #[serde(default)]
    pub items: Vec<Blog>,
}

/// List envelope for posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostList {
    /// Upstream kind discriminator (e.g. "blogger#postList")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Posts in this page
    #[serde(default)]
    pub items: Vec<Post>,
}

/// List envelope for derived labels.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LabelList {
    /// Kind discriminator, always "blogger#labelList"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Distinct labels, first-seen order
    #[serde(default)]
    pub items: Vec<Label>,
}

/// Body for creating a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewPost {
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Labels to attach
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Body for updating a post. Absent fields are left untouched upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostPatch {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New label set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Structured explanatory payload for operations the upstream API does not
/// support. Surfaced as a normal, error-flagged response - not a failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnsupportedOperation {
    /// Always true; flags the payload for callers
    pub error: bool,
    /// What went wrong
    pub message: String,
    /// Why the limitation exists
    pub details: String,
    /// What the caller should do instead
    pub suggested_action: String,
}

impl UnsupportedOperation {
    /// The explanatory payload for blog creation, which the upstream API
    /// only permits through its web interface.
    #[must_use]
    pub fn create_blog() -> Self {
        Self {
            error: true,
            message: "The Blogger API does not support creating blogs \
                      programmatically. Please create the blog manually on \
                      blogger.com."
                .into(),
            details: "This limitation is documented by Google: blogs can only \
                      be created through the Blogger web interface."
                .into(),
            suggested_action: "Create a blog at https://www.blogger.com, then \
                               use its id with this server."
                .into(),
        }
    }
}
