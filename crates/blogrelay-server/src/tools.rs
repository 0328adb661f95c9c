//! The tool surface: eleven operations over the upstream content service.
//!
//! Each registration pairs a declared input schema with a handler that
//! deserializes the (already validated) parameters into a typed struct and
//! forwards to the client. Payload shapes mirror what callers expect from
//! the wire: `{"blogs": [...]}`, `{"post": {...}}` and so on.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use blogrelay_client::BloggerClient;
use blogrelay_types::{NewPost, PostPatch, RelayError, RelayResult, Tool, ToolInputSchema};

use crate::handler::FunctionToolHandler;
use crate::registry::ToolRegistry;

/// Register the full tool surface.
///
/// # Errors
///
/// Propagates registry failures (a non-compiling input schema).
pub fn register_all(registry: &mut ToolRegistry, client: Arc<BloggerClient>) -> RelayResult<()> {
    registry.register(list_blogs(client.clone()))?;
    registry.register(get_blog(client.clone()))?;
    registry.register(create_blog(client.clone()))?;
    registry.register(list_posts(client.clone()))?;
    registry.register(search_posts(client.clone()))?;
    registry.register(get_post(client.clone()))?;
    registry.register(create_post(client.clone()))?;
    registry.register(update_post(client.clone()))?;
    registry.register(delete_post(client.clone()))?;
    registry.register(list_labels(client.clone()))?;
    registry.register(get_label(client))?;
    Ok(())
}

// Arguments reach handlers only after schema validation, so a deserialize
// failure here is a schema/struct mismatch, not caller error.
fn parse_args<T: DeserializeOwned>(args: Value) -> RelayResult<T> {
    serde_json::from_value(args)
        .map_err(|e| RelayError::Internal(format!("validated arguments failed to decode: {e}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlogArgs {
    blog_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBlogArgs {
    name: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPostsArgs {
    blog_id: String,
    max_results: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPostsArgs {
    blog_id: String,
    query: String,
    max_results: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostArgs {
    blog_id: String,
    post_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostArgs {
    blog_id: String,
    title: String,
    content: String,
    #[serde(default)]
    labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePostArgs {
    blog_id: String,
    post_id: String,
    title: Option<String>,
    content: Option<String>,
    labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelArgs {
    blog_id: String,
    label_name: String,
}

fn blog_id_property() -> Value {
    json!({"type": "string", "description": "Blog id"})
}

fn max_results_property() -> Value {
    json!({"type": "integer", "minimum": 1, "description": "Maximum number of results to return"})
}

fn list_blogs(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new("list_blogs", "List all accessible blogs")
        .with_schema(ToolInputSchema::empty());
    FunctionToolHandler::new(tool, move |_args| {
        let client = client.clone();
        async move {
            let blogs = client.list_blogs().await?;
            Ok(json!({"blogs": blogs.items}))
        }
    })
}

fn get_blog(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new("get_blog", "Fetch the details of one blog").with_schema(
        ToolInputSchema::object(json!({"blogId": blog_id_property()}), &["blogId"]),
    );
    FunctionToolHandler::new(tool, move |args| {
        let client = client.clone();
        async move {
            let params: BlogArgs = parse_args(args)?;
            let blog = client.get_blog(&params.blog_id).await?;
            Ok(json!({"blog": blog}))
        }
    })
}

fn create_blog(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new(
        "create_blog",
        "Create a new blog (the upstream API does not support this; returns an explanatory payload)",
    )
    .with_schema(ToolInputSchema::object(
        json!({
            "name": {"type": "string", "description": "Blog name"},
            "description": {"type": "string", "description": "Blog description"},
        }),
        &["name"],
    ));
    FunctionToolHandler::new(tool, move |args| {
        let client = client.clone();
        async move {
            let params: CreateBlogArgs = parse_args(args)?;
            let payload = client
                .create_blog(&params.name, params.description.as_deref())
                .await;
            serde_json::to_value(payload)
                .map_err(|e| RelayError::Internal(format!("unserializable payload: {e}")))
        }
    })
}

fn list_posts(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new("list_posts", "List the posts of a blog").with_schema(
        ToolInputSchema::object(
            json!({
                "blogId": blog_id_property(),
                "maxResults": max_results_property(),
            }),
            &["blogId"],
        ),
    );
    FunctionToolHandler::new(tool, move |args| {
        let client = client.clone();
        async move {
            let params: ListPostsArgs = parse_args(args)?;
            let page = client
                .list_posts(&params.blog_id, params.max_results)
                .await?;
            Ok(json!({"posts": page.items}))
        }
    })
}

fn search_posts(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new(
        "search_posts",
        "Search posts by case-insensitive substring match on title or content (first page only)",
    )
    .with_schema(ToolInputSchema::object(
        json!({
            "blogId": blog_id_property(),
            "query": {"type": "string", "description": "Search term"},
            "maxResults": max_results_property(),
        }),
        &["blogId", "query"],
    ));
    FunctionToolHandler::new(tool, move |args| {
        let client = client.clone();
        async move {
            let params: SearchPostsArgs = parse_args(args)?;
            let matches = client
                .search_posts(&params.blog_id, &params.query, params.max_results)
                .await?;
            Ok(json!({"posts": matches.items}))
        }
    })
}

fn get_post(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new("get_post", "Fetch one post").with_schema(ToolInputSchema::object(
        json!({
            "blogId": blog_id_property(),
            "postId": {"type": "string", "description": "Post id"},
        }),
        &["blogId", "postId"],
    ));
    FunctionToolHandler::new(tool, move |args| {
        let client = client.clone();
        async move {
            let params: PostArgs = parse_args(args)?;
            let post = client.get_post(&params.blog_id, &params.post_id).await?;
            Ok(json!({"post": post}))
        }
    })
}

fn create_post(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new("create_post", "Create a new post in a blog").with_schema(
        ToolInputSchema::object(
            json!({
                "blogId": blog_id_property(),
                "title": {"type": "string", "description": "Post title"},
                "content": {"type": "string", "description": "Post content"},
                "labels": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Labels to attach to the post",
                },
            }),
            &["blogId", "title", "content"],
        ),
    );
    FunctionToolHandler::new(tool, move |args| {
        let client = client.clone();
        async move {
            let params: CreatePostArgs = parse_args(args)?;
            let body = NewPost {
                title: params.title,
                content: params.content,
                labels: params.labels,
            };
            let post = client.create_post(&params.blog_id, &body).await?;
            Ok(json!({"post": post}))
        }
    })
}

fn update_post(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new("update_post", "Update an existing post").with_schema(
        ToolInputSchema::object(
            json!({
                "blogId": blog_id_property(),
                "postId": {"type": "string", "description": "Post id"},
                "title": {"type": "string", "description": "New title"},
                "content": {"type": "string", "description": "New content"},
                "labels": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "New label set",
                },
            }),
            &["blogId", "postId"],
        ),
    );
    FunctionToolHandler::new(tool, move |args| {
        let client = client.clone();
        async move {
            let params: UpdatePostArgs = parse_args(args)?;
            let patch = PostPatch {
                title: params.title,
                content: params.content,
                labels: params.labels,
            };
            let post = client
                .update_post(&params.blog_id, &params.post_id, &patch)
                .await?;
            Ok(json!({"post": post}))
        }
    })
}

fn delete_post(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new("delete_post", "Delete a post").with_schema(ToolInputSchema::object(
        json!({
            "blogId": blog_id_property(),
            "postId": {"type": "string", "description": "Post id"},
        }),
        &["blogId", "postId"],
    ));
    FunctionToolHandler::new(tool, move |args| {
        let client = client.clone();
        async move {
            let params: PostArgs = parse_args(args)?;
            client.delete_post(&params.blog_id, &params.post_id).await?;
            Ok(json!({
                "success": true,
                "message": format!("post {} deleted", params.post_id),
            }))
        }
    })
}

fn list_labels(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new(
        "list_labels",
        "List the distinct labels of a blog, aggregated from its 50 most recent posts",
    )
    .with_schema(ToolInputSchema::object(
        json!({"blogId": blog_id_property()}),
        &["blogId"],
    ));
    FunctionToolHandler::new(tool, move |args| {
        let client = client.clone();
        async move {
            let params: BlogArgs = parse_args(args)?;
            let labels = client.list_labels(&params.blog_id).await?;
            Ok(json!({"labels": labels.items}))
        }
    })
}

fn get_label(client: Arc<BloggerClient>) -> FunctionToolHandler {
    let tool = Tool::new("get_label", "Fetch one label by exact name").with_schema(
        ToolInputSchema::object(
            json!({
                "blogId": blog_id_property(),
                "labelName": {"type": "string", "description": "Label name"},
            }),
            &["blogId", "labelName"],
        ),
    );
    FunctionToolHandler::new(tool, move |args| {
        let client = client.clone();
        async move {
            let params: LabelArgs = parse_args(args)?;
            let label = client
                .get_label(&params.blog_id, &params.label_name)
                .await?;
            Ok(json!({"label": label}))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogrelay_client::BloggerClientConfig;

    #[test]
    fn registers_exactly_the_declared_surface() {
        let client = Arc::new(
            BloggerClient::new(BloggerClientConfig::default()).expect("client construction"),
        );
        let mut registry = ToolRegistry::new();
        register_all(&mut registry, client).unwrap();

        assert_eq!(
            registry.tool_names(),
            [
                "list_blogs",
                "get_blog",
                "create_blog",
                "list_posts",
                "search_posts",
                "get_post",
                "create_post",
                "update_post",
                "delete_post",
                "list_labels",
                "get_label",
            ]
        );
    }
}
