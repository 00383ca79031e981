//! HTTP server: routes for viewing, searching, creating and editing entries

mod form;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    handler::Handler,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use form::EntryForm;

use crate::content::{strip_title_heading, MarkdownRenderer};
use crate::helpers::entry_url;
use crate::templates::{EntryData, FormData, TemplateRenderer, STYLESHEET};
use crate::{SearchOutcome, Wiki, WikiError};

const NOT_FOUND: &str = "We couldn't find the page you were looking for.";
const ALREADY_EXISTS: &str = "Page already exists.";
const NO_ENTRIES: &str = "There are no entries yet.";
const FORM_INVALID: &str = "Form invalid.";

/// Server state shared by all handlers
pub struct AppState {
    wiki: Wiki,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
}

type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(wiki: Wiki) -> crate::Result<Self> {
        let templates = TemplateRenderer::new(&wiki.config.title)?;
        let markdown = MarkdownRenderer::from_config(&wiki.config.highlight);
        Ok(Self {
            wiki,
            templates,
            markdown,
        })
    }

    /// Run a handler body, turning its error into an error page
    fn respond<F>(&self, handler: F) -> Response
    where
        F: FnOnce() -> crate::Result<Response>,
    {
        handler().unwrap_or_else(|e| self.error_response(e))
    }

    fn error_response(&self, err: WikiError) -> Response {
        match err {
            WikiError::NotFound(title) => {
                self.error_page(StatusCode::NOT_FOUND, NOT_FOUND, Some(title.as_str()))
            }
            WikiError::AlreadyExists(_) => {
                self.error_page(StatusCode::CONFLICT, ALREADY_EXISTS, None)
            }
            WikiError::NoEntries => self.error_page(StatusCode::NOT_FOUND, NO_ENTRIES, None),
            WikiError::InvalidTitle { reason, .. } => self.error_page(
                StatusCode::UNPROCESSABLE_ENTITY,
                &format!("Invalid title: {}.", reason),
                None,
            ),
            e => {
                tracing::error!("Request failed: {}", e);
                self.error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong.",
                    None,
                )
            }
        }
    }

    fn error_page(&self, status: StatusCode, message: &str, missing: Option<&str>) -> Response {
        match self.templates.error(message, missing) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (status, message.to_string()).into_response()
            }
        }
    }

    fn form_page(&self, status: StatusCode, form: &FormData) -> crate::Result<Response> {
        Ok((status, Html(self.templates.form(form)?)).into_response())
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(index))
        .route("/wiki/:title", get(view_entry))
        .route("/search", get(search))
        .route("/new", get(new_form).post(create_entry))
        .route("/edit/:title", get(edit_form).post(update_entry))
        .route("/random", get(random_entry))
        .route("/styles.css", get(stylesheet));

    if state.wiki.static_dir.is_dir() {
        let missing = not_found.with_state(state.clone());
        app = app.nest_service(
            "/static",
            ServeDir::new(&state.wiki.static_dir).not_found_service(missing),
        );
    }

    app.fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the wiki server
pub async fn start(wiki: &Wiki, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(AppState::new(wiki.clone())?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Serving {} at {}", wiki.config.title, url);
    println!("Entries directory: {}", wiki.store().dir().display());
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewQuery {
    title: Option<String>,
}

async fn index(State(state): State<SharedState>) -> Response {
    state.respond(|| {
        let entries = state.wiki.list_entries()?;
        Ok(Html(state.templates.index(&entries)?).into_response())
    })
}

async fn view_entry(State(state): State<SharedState>, Path(title): Path<String>) -> Response {
    state.respond(|| {
        let entry = state.wiki.entry(&title)?;
        let data = EntryData {
            content: state.markdown.render(&entry.content),
            updated: state
                .wiki
                .store()
                .modified(&entry.title)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
            title: entry.title,
        };
        Ok(Html(state.templates.entry(&data)?).into_response())
    })
}

async fn search(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let term = query.q.unwrap_or_default();
    let term = term.trim();
    if term.is_empty() {
        return Redirect::to("/").into_response();
    }

    state.respond(|| match state.wiki.search(term)? {
        SearchOutcome::Exact(title) => Ok(Redirect::to(&entry_url(&title)).into_response()),
        SearchOutcome::Matches(results) => {
            tracing::debug!("Search {:?} matched {} entries", term, results.len());
            Ok(Html(state.templates.search(term, &results)?).into_response())
        }
    })
}

async fn new_form(State(state): State<SharedState>, Query(query): Query<NewQuery>) -> Response {
    state.respond(|| {
        let form = FormData::create(query.title.as_deref().unwrap_or_default());
        state.form_page(StatusCode::OK, &form)
    })
}

async fn create_entry(
    State(state): State<SharedState>,
    Form(input): Form<EntryForm>,
) -> Response {
    state.respond(|| {
        let errors = input.validate();
        if !errors.is_empty() {
            let mut form = FormData::create(&input.title);
            form.content = input.content.clone();
            form.message = Some(FORM_INVALID.to_string());
            form.errors = errors;
            return state.form_page(StatusCode::UNPROCESSABLE_ENTITY, &form);
        }

        let title = state.wiki.create_entry(input.title(), &input.body())?;
        Ok(Redirect::to(&entry_url(&title)).into_response())
    })
}

async fn edit_form(State(state): State<SharedState>, Path(title): Path<String>) -> Response {
    state.respond(|| {
        let entry = state.wiki.entry(&title)?;
        let body = strip_title_heading(&entry.title, &entry.content);
        let form = FormData::edit(&entry.title, &entry.title, body);
        state.form_page(StatusCode::OK, &form)
    })
}

async fn update_entry(
    State(state): State<SharedState>,
    Path(original): Path<String>,
    Form(input): Form<EntryForm>,
) -> Response {
    state.respond(|| {
        let errors = input.validate();
        if !errors.is_empty() {
            let mut form = FormData::edit(&original, &input.title, &input.content);
            form.message = Some(FORM_INVALID.to_string());
            form.errors = errors;
            return state.form_page(StatusCode::UNPROCESSABLE_ENTITY, &form);
        }

        let title = state
            .wiki
            .update_entry(&original, input.title(), &input.body())?;
        Ok(Redirect::to(&entry_url(&title)).into_response())
    })
}

async fn random_entry(State(state): State<SharedState>) -> Response {
    state.respond(|| {
        let title = state.wiki.random_title(&mut rand::rng())?;
        Ok(Redirect::to(&entry_url(&title)).into_response())
    })
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

async fn not_found(State(state): State<SharedState>) -> Response {
    state.error_page(StatusCode::NOT_FOUND, NOT_FOUND, None)
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn setup() -> (TempDir, Wiki, Router) {
        let dir = TempDir::new().unwrap();
        let wiki = Wiki::new(dir.path()).unwrap();
        let app = router(Arc::new(AppState::new(wiki.clone()).unwrap()));
        (dir, wiki, app)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_form(
        app: &Router,
        uri: &str,
        body: &str,
    ) -> (StatusCode, Option<String>, String) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, location, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_lists_entries() {
        let (_dir, wiki, app) = setup();
        wiki.create_entry("CSS", "styles").unwrap();
        wiki.create_entry("Python", "snakes").unwrap();

        let (status, _, body) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<a href="/wiki/CSS">CSS</a>"#));
        assert!(body.contains(r#"<a href="/wiki/Python">Python</a>"#));
    }

    #[tokio::test]
    async fn test_view_entry() {
        let (_dir, wiki, app) = setup();
        wiki.create_entry("Python 3", "A **language**.").unwrap();

        let (status, _, body) = get(&app, "/wiki/Python%203").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Python 3</h1>"));
        assert!(body.contains("<strong>language</strong>"));
        assert!(body.contains(r#"href="/edit/Python%203""#));
    }

    #[tokio::test]
    async fn test_view_missing_entry() {
        let (_dir, _wiki, app) = setup();
        let (status, _, body) = get(&app, "/wiki/Rust").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("find the page you were looking for"));
        assert!(body.contains(r#"href="/new?title=Rust""#));
    }

    #[tokio::test]
    async fn test_search_exact_redirects() {
        let (_dir, wiki, app) = setup();
        wiki.create_entry("Git", "vcs").unwrap();

        let (status, location, _) = get(&app, "/search?q=Git").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/wiki/Git"));
    }

    #[tokio::test]
    async fn test_search_substring() {
        let (_dir, wiki, app) = setup();
        for title in ["CSS", "Django", "Python"] {
            wiki.create_entry(title, "body").unwrap();
        }

        let (status, _, body) = get(&app, "/search?q=py").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<a href="/wiki/Python">Python</a>"#));
        assert!(!body.contains(r#"<a href="/wiki/CSS">"#));

        let (_, _, body) = get(&app, "/search?q=haskell").await;
        assert!(body.contains("No pages match"));
    }

    #[tokio::test]
    async fn test_blank_search_redirects_home() {
        let (_dir, _wiki, app) = setup();
        let (status, location, _) = get(&app, "/search?q=+").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/"));

        let (_, location, _) = get(&app, "/search").await;
        assert_eq!(location.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn test_new_form() {
        let (_dir, _wiki, app) = setup();
        let (status, _, body) = get(&app, "/new?title=Rust").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Create a new page."));
        assert!(body.contains(r#"value="Rust""#));
    }

    #[tokio::test]
    async fn test_create_entry() {
        let (_dir, wiki, app) = setup();

        let (status, location, _) =
            post_form(&app, "/new", "title=Rust+Lang&content=Fast+and+safe.").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/wiki/Rust%20Lang"));
        assert_eq!(
            wiki.get_entry("Rust Lang").unwrap().as_deref(),
            Some("# Rust Lang\n\nFast and safe.")
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_entry() {
        let (_dir, wiki, app) = setup();
        wiki.create_entry("HTML", "markup").unwrap();

        let (status, _, body) = post_form(&app, "/new", "title=HTML&content=again").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.contains("Page already exists."));
        assert_eq!(
            wiki.get_entry("HTML").unwrap().as_deref(),
            Some("# HTML\n\nmarkup")
        );
    }

    #[tokio::test]
    async fn test_create_invalid_form() {
        let (_dir, wiki, app) = setup();

        let (status, _, body) = post_form(&app, "/new", "title=Draft&content=").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Form invalid."));
        assert!(body.contains(r#"value="Draft""#));
        assert!(wiki.list_entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_unsafe_title() {
        let (_dir, wiki, app) = setup();

        let (status, _, body) = post_form(&app, "/new", "title=a%2Fb&content=x").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Title must not contain path separators."));
        assert!(wiki.list_entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_is_server_error() {
        let (dir, _wiki, app) = setup();
        // Entries directory cannot be created over a plain file
        std::fs::write(dir.path().join("entries"), "not a directory").unwrap();

        let (status, _, body) = post_form(&app, "/new", "title=Rust&content=x").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Something went wrong."));
    }

    #[tokio::test]
    async fn test_edit_form_prefilled_without_heading() {
        let (_dir, wiki, app) = setup();
        wiki.create_entry("Git", "A version control system.").unwrap();

        let (status, _, body) = get(&app, "/edit/Git").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(">A version control system.</textarea>"));
        assert!(!body.contains("# Git"));
    }

    #[tokio::test]
    async fn test_edit_missing_entry() {
        let (_dir, _wiki, app) = setup();
        let (status, _, _) = get(&app, "/edit/Nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = post_form(&app, "/edit/Nope", "title=Nope&content=x").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_entry_with_rename() {
        let (_dir, wiki, app) = setup();
        wiki.create_entry("Pyton", "typo").unwrap();

        let (status, location, _) =
            post_form(&app, "/edit/Pyton", "title=Python&content=fixed").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/wiki/Python"));
        assert_eq!(wiki.list_entries().unwrap(), vec!["Python"]);
        assert_eq!(
            wiki.get_entry("Python").unwrap().as_deref(),
            Some("# Python\n\nfixed")
        );
    }

    #[tokio::test]
    async fn test_update_invalid_form() {
        let (_dir, wiki, app) = setup();
        wiki.create_entry("Python 3", "snakes").unwrap();

        let (status, _, body) =
            post_form(&app, "/edit/Python%203", "title=Python+4&content=+").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Form invalid."));
        assert!(body.contains("This field is required."));
        assert!(body.contains(r#"action="/edit/Python%203""#));
        assert!(body.contains(r#"value="Python 4""#));
        assert_eq!(
            wiki.get_entry("Python 3").unwrap().as_deref(),
            Some("# Python 3\n\nsnakes")
        );
    }

    #[tokio::test]
    async fn test_update_rename_collision() {
        let (_dir, wiki, app) = setup();
        wiki.create_entry("CSS", "styles").unwrap();
        wiki.create_entry("HTML", "markup").unwrap();

        let (status, _, body) = post_form(&app, "/edit/CSS", "title=HTML&content=x").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.contains("Page already exists."));
    }

    #[tokio::test]
    async fn test_random_entry() {
        let (_dir, wiki, app) = setup();

        let (status, _, body) = get(&app, "/random").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("There are no entries yet."));

        wiki.create_entry("Django", "web").unwrap();
        let (status, location, _) = get(&app, "/random").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/wiki/Django"));
    }

    #[tokio::test]
    async fn test_stylesheet_and_fallback() {
        let (_dir, _wiki, app) = setup();

        let (status, _, body) = get(&app, "/styles.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(".sidebar"));

        let (status, _, _) = get(&app, "/no/such/route").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("static").join("logo.txt"), "wiki logo").unwrap();
        let wiki = Wiki::new(dir.path()).unwrap();
        let app = router(Arc::new(AppState::new(wiki).unwrap()));

        let (status, _, body) = get(&app, "/static/logo.txt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "wiki logo");

        let (status, _, body) = get(&app, "/static/missing.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("find the page you were looking for"));
    }
}
