//! The embedded single page app
//!
//! The whole frontend ships inside the binary, there is no separate asset
//! pipeline to deploy

use axum::http::header;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

/// Base path of the API as seen from the browser
///
/// Overridable at compile time for setups where the API lives on another
/// origin than the page
const API_URL: &str = match option_env!("GUESTBOOK_API_URL") {
    Some(url) => url,
    None => "/api/guestbook",
};

const INDEX_HTML: &str = include_str!("../static/index.html");
const APP_JS: &str = include_str!("../static/app.js");
const STYLE_CSS: &str = include_str!("../static/style.css");

/// Get the Axum router for the UI routes
pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/app.js", get(app_js))
        .route("/style.css", get(style_css))
}

async fn index() -> Html<String> {
    Html(INDEX_HTML.replace("__GUESTBOOK_API_URL__", API_URL))
}

async fn app_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript")], APP_JS)
}

async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], STYLE_CSS)
}
