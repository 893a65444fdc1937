//! JSON API server with optional feed reloading

use anyhow::Result;
use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::content::{html_escape, ContentBlock, ContentRenderer, Post};
use crate::error::BlogError;
use crate::helpers::{date_iso, post_path, related_posts};
use crate::newsletter::{Newsletter, NewsletterError, Subscription};
use crate::query::params::tag_link;
use crate::query::{FilterState, SortOrder};
use crate::Blog;

/// Related posts listed under an article
const RELATED_COUNT: usize = 3;

/// Server state
pub struct AppState {
    blog: RwLock<Blog>,
    renderer: ContentRenderer,
    newsletter: Newsletter,
}

impl AppState {
    pub fn new(blog: Blog) -> Self {
        let renderer = ContentRenderer::with_config(&blog.config.highlight);
        let newsletter = Newsletter::new(&blog.config.newsletter);
        Self {
            blog: RwLock::new(blog),
            renderer,
            newsletter,
        }
    }
}

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:id", get(get_post))
        .route("/api/tags", get(list_tags))
        .route("/api/categories", get(list_categories))
        .route("/api/featured", get(list_featured))
        .route("/api/recent", get(list_recent))
        .route("/api/newsletter", post(subscribe))
        .route("/posts/:id", get(post_html))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(blog: Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let data_path = blog.data_path();
    let state = Arc::new(AppState::new(blog));
    let app = router(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);

    if watch {
        match data_path {
            Some(path) => {
                println!("Watching {} for changes...", path.display());
                let state = state.clone();
                tokio::task::spawn_blocking(move || {
                    if let Err(e) = watch_and_reload(path, state) {
                        tracing::error!("File watcher error: {}", e);
                    }
                });
            }
            None => tracing::warn!("--watch needs data_file in _config.yml; serving the builtin feed"),
        }
    }

    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Reload posts whenever the feed file changes
///
/// Watches the feed's directory so saves that replace the file by rename
/// keep triggering reloads.
fn watch_and_reload(path: PathBuf, state: Arc<AppState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    // Debounce editor save bursts into one reload
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?} for {:?}", dir, path);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                if !touches_feed(&path, events.iter().map(|e| e.path.as_path())) {
                    continue;
                }
                let mut blog = state.blog.blocking_write();
                match blog.reload() {
                    Ok(()) => println!("Reloaded {} posts", blog.posts().len()),
                    Err(e) => println!("Reload failed, keeping previous posts: {:#}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// True when any changed path in the watched directory is the feed file
fn touches_feed<'a>(feed: &FsPath, changed: impl IntoIterator<Item = &'a FsPath>) -> bool {
    let name = feed.file_name();
    changed
        .into_iter()
        .any(|p| name.is_some() && p.file_name() == name)
}

/// API errors
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Newsletter(NewsletterError),
}

impl From<BlogError> for ApiError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::PostNotFound(id) => ApiError::NotFound(format!("Post '{}' not found", id)),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<NewsletterError> for ApiError {
    fn from(err: NewsletterError) -> Self {
        ApiError::Newsletter(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "NOT_FOUND", message),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", message),
            ApiError::Newsletter(err @ NewsletterError::InvalidEmail(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_EMAIL", err.to_string())
            }
            ApiError::Newsletter(err @ NewsletterError::Unavailable(_)) => {
                tracing::warn!("Newsletter backend failed: {}", err);
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", err.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub items: Vec<Post>,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub summary: String,
    /// False for the unfiltered landing view
    pub filtering: bool,
    /// Canonical query string for the returned page
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub post: Post,
    pub display_date: String,
    pub reading_time: String,
    pub tag_links: Vec<String>,
    pub blocks: Vec<ContentBlock>,
    pub related: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// GET /api/posts
async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ListingResponse>, ApiError> {
    let filter = FilterState::from_query_string(raw.as_deref().unwrap_or(""));
    let blog = state.blog.read().await;

    let order = match params.sort.as_deref() {
        Some(sort) => sort
            .parse::<SortOrder>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => blog.config.default_sort,
    };

    let listing = blog.list_sorted(&filter, order);
    tracing::debug!("GET /api/posts {:?} -> {} items", raw, listing.items.len());

    Ok(Json(ListingResponse {
        summary: listing.summary(&filter),
        filtering: filter.is_filtering(),
        items: listing.items.iter().map(|p| (*p).clone()).collect(),
        total_count: listing.total_count,
        total_pages: listing.total_pages,
        page: listing.page,
        query: filter.to_query_string(),
    }))
}

/// GET /api/posts/:id
async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let blog = state.blog.read().await;
    let post = blog.find(&id)?;

    Ok(Json(ArticleResponse {
        display_date: post.display_date(),
        reading_time: post.reading_time_label(),
        tag_links: post.tags.iter().map(|t| tag_link(t)).collect(),
        blocks: state.renderer.blocks(&post.content),
        related: related_posts(post, blog.posts(), RELATED_COUNT)
            .iter()
            .map(|p| p.id.clone())
            .collect(),
        post: post.clone(),
    }))
}

/// GET /posts/:id
async fn post_html(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let blog = state.blog.read().await;
    let post = blog.find(&id)?;

    let body = state
        .renderer
        .render(&post.content)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(Html(article_html(post, &body)))
}

/// GET /api/tags
async fn list_tags(State(state): State<Arc<AppState>>) -> Json<Vec<TagCount>> {
    let blog = state.blog.read().await;
    let tags = crate::helpers::tag_counts(blog.posts())
        .into_iter()
        .map(|(name, count)| TagCount { name, count })
        .collect();
    Json(tags)
}

/// GET /api/categories
async fn list_categories(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let blog = state.blog.read().await;
    Json(blog.categories().to_vec())
}

/// GET /api/featured
async fn list_featured(State(state): State<Arc<AppState>>) -> Json<Vec<Post>> {
    let blog = state.blog.read().await;
    Json(blog.featured().into_iter().cloned().collect())
}

/// GET /api/recent
async fn list_recent(State(state): State<Arc<AppState>>) -> Json<Vec<Post>> {
    let blog = state.blog.read().await;
    Json(blog.recent().into_iter().cloned().collect())
}

/// POST /api/newsletter
async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<Subscription>, ApiError> {
    let subscription = state.newsletter.subscribe(&request.email).await?;
    Ok(Json(subscription))
}

/// Article page around already rendered content
fn article_html(post: &Post, body: &str) -> String {
    let tags: String = post
        .tags
        .iter()
        .map(|t| format!(r#"<a class="tag" href="{}">{}</a>"#, tag_link(t), html_escape(t)))
        .collect();

    format!(
        r#"<article id="{id}" data-path="{path}">
<header>
<div class="tags">{tags}</div>
<h1>{title}</h1>
<p class="excerpt">{excerpt}</p>
<p class="meta"><span class="author">{author}</span> <time datetime="{date}">{display_date}</time> <span>{reading}</span></p>
</header>
<div class="content">
{body}</div>
</article>
"#,
        id = html_escape(&post.id),
        path = post_path(&post.id),
        tags = tags,
        title = html_escape(&post.title),
        excerpt = html_escape(&post.excerpt),
        author = html_escape(&post.author.name),
        date = post
            .published_date()
            .map(|d| date_iso(&d))
            .unwrap_or_else(|| html_escape(&post.published_at)),
        display_date = post.display_date(),
        reading = post.reading_time_label(),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn state() -> Arc<AppState> {
        let mut config = SiteConfig::default();
        config.per_page = 2;
        config.newsletter.delay_ms = 0;

        let mut a = Post::new("a", "Alpha", "2024-01-01");
        a.tags = vec!["Rust".to_string()];
        a.content = "Hello.\n\n```rust\nfn main() {}\n```".to_string();
        let mut b = Post::new("b", "Beta", "2024-02-01");
        b.tags = vec!["CSS".to_string(), "Rust".to_string()];
        b.featured = true;
        let c = Post::new("c", "Gamma", "2024-03-01");

        let blog = Blog::from_posts(config, vec![a, b, c]).unwrap();
        Arc::new(AppState::new(blog))
    }

    fn no_sort() -> Query<ListParams> {
        Query(ListParams { sort: None })
    }

    #[tokio::test]
    async fn test_list_posts_paginates() {
        let Json(res) = list_posts(State(state()), no_sort(), RawQuery(Some("page=2".into())))
            .await
            .unwrap();
        assert_eq!(res.total_count, 3);
        assert_eq!(res.total_pages, 2);
        assert_eq!(res.items.len(), 1);
        assert_eq!(res.items[0].id, "a");
        assert_eq!(res.query, "page=2");
        assert!(!res.filtering);
    }

    #[tokio::test]
    async fn test_list_posts_filters_by_tag() {
        let raw = RawQuery(Some("tag=Rust&search=alp".into()));
        let Json(res) = list_posts(State(state()), no_sort(), raw).await.unwrap();
        let ids: Vec<_> = res.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(res.summary, "Showing 1-1 of 1 article for \"alp\" with tags: Rust");
    }

    #[tokio::test]
    async fn test_list_posts_rejects_bad_sort() {
        let params = Query(ListParams {
            sort: Some("random".to_string()),
        });
        let err = list_posts(State(state()), params, RawQuery(None)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_post_with_blocks() {
        let Json(res) = get_post(State(state()), Path("a".to_string())).await.unwrap();
        assert_eq!(res.post.title, "Alpha");
        assert_eq!(res.display_date, "January 1, 2024");
        assert_eq!(res.tag_links, vec!["/?tag=Rust"]);
        assert_eq!(res.related, vec!["b"]);
        assert_eq!(
            res.blocks,
            vec![
                ContentBlock::paragraph("Hello."),
                ContentBlock::code("rust", "fn main() {}\n"),
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_post_is_not_found() {
        let err = get_post(State(state()), Path("zzz".to_string())).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = post_html(State(state()), Path("zzz".to_string())).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_html() {
        let Html(html) = post_html(State(state()), Path("a".to_string())).await.unwrap();
        assert!(html.contains("<h1>Alpha</h1>"));
        assert!(html.contains("<p>Hello.</p>"));
        assert!(html.contains("highlight rust"));
        assert!(html.contains(r#"href="/?tag=Rust""#));
    }

    #[tokio::test]
    async fn test_landing_endpoints() {
        let Json(featured) = list_featured(State(state())).await;
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id, "b");

        let Json(recent) = list_recent(State(state())).await;
        let ids: Vec<_> = recent.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);

        let Json(tags) = list_tags(State(state())).await;
        assert_eq!(tags[0].name, "Rust");
        assert_eq!(tags[0].count, 2);

        let Json(categories) = list_categories(State(state())).await;
        assert_eq!(categories.len(), 8);
    }

    #[test]
    fn test_touches_feed() {
        let feed = FsPath::new("site/posts.yml");
        let replaced = PathBuf::from("/abs/site/posts.yml");
        let other = PathBuf::from("/abs/site/posts.yml.swp");

        assert!(touches_feed(feed, [replaced.as_path()]));
        assert!(touches_feed(feed, [other.as_path(), replaced.as_path()]));
        assert!(!touches_feed(feed, [other.as_path()]));
        assert!(!touches_feed(feed, std::iter::empty()));
    }

    #[tokio::test]
    async fn test_subscribe() {
        let request = Json(SubscribeRequest {
            email: "dev@example.com".to_string(),
        });
        let Json(sub) = subscribe(State(state()), request).await.unwrap();
        assert_eq!(sub.email, "dev@example.com");

        let request = Json(SubscribeRequest {
            email: "bad".to_string(),
        });
        let err = subscribe(State(state()), request).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
