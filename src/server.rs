// Pokedex - Web Server routes
// Static catalog resource + server-rendered detail pages

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Path as RoutePath, State},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::config::CATALOG_FILE_NAME;
use crate::record::Record;
use crate::source::CatalogSource;
use crate::ssr::{server_side_props, ServerSideProps};

/// Shared application state. Holds where to fetch from, never fetched data.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn CatalogSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        AppState { source }
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/ssr/:id - Server-side props as JSON
async fn get_props(State(state): State<AppState>, RoutePath(id): RoutePath<String>) -> Json<ServerSideProps> {
    Json(server_side_props(state.source.as_ref(), &id).await)
}

/// GET /ssr/:id - Server-rendered detail page
async fn serve_detail(State(state): State<AppState>, RoutePath(id): RoutePath<String>) -> Html<String> {
    let props = server_side_props(state.source.as_ref(), &id).await;
    Html(render_detail_page(props.record()))
}

// ============================================================================
// Rendering
// ============================================================================

/// Detail page for one record. An absent record renders an empty container.
pub fn render_detail_page(record: Option<&Record>) -> String {
    let mut body = String::new();

    if let Some(record) = record {
        body.push_str(&format!("<h1>SSR: {}</h1>\n", escape(record.english_name())));
        body.push_str(&format!(
            "<p><span class=\"type-header\">Type:</span> {}</p>\n",
            escape(&record.type_label())
        ));
        body.push_str("<table>\n<thead><tr><th>Attribute</th><th>Value</th></tr></thead>\n<tbody>\n");
        for (key, value) in &record.base {
            body.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>\n", escape(key), value));
        }
        body.push_str("</tbody>\n</table>\n");
    }

    let title = record.map(Record::english_name).unwrap_or("Pokemon");

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>.page {{ margin: auto; width: 800px; padding-top: 1em; }} .type-header {{ font-weight: bold; }}</style>\n\
         </head>\n<body>\n<div class=\"page\">\n<div>\n{}</div>\n</div>\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router. `data_dir` holds the static catalog document.
pub fn build_router(state: AppState, data_dir: &Path) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/ssr/:id", get(get_props))
        .with_state(state.clone());

    Router::new()
        .route("/ssr/:id", get(serve_detail))
        .with_state(state)
        .nest("/api", api_routes)
        .route_service(
            &format!("/{}", CATALOG_FILE_NAME),
            ServeFile::new(data_dir.join(CATALOG_FILE_NAME)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_found() {
        let record = Record::new(1, "Bulbasaur")
            .with_types(["Grass", "Poison"])
            .with_stat("HP", 45)
            .with_stat("Attack", 49);
        let html = render_detail_page(Some(&record));

        assert!(html.contains("<h1>SSR: Bulbasaur</h1>"));
        assert!(html.contains("Type:</span> Grass, Poison"));
        let hp = html.find("<td>HP</td><td>45</td>").unwrap();
        let attack = html.find("<td>Attack</td><td>49</td>").unwrap();
        assert!(hp < attack);
    }

    #[test]
    fn test_render_absent() {
        let html = render_detail_page(None);
        assert!(!html.contains("<h1>"));
        assert!(!html.contains("<table>"));
        assert!(html.contains("<div class=\"page\">"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("Mr. <Mime> & \"co\""), "Mr. &lt;Mime&gt; &amp; &quot;co&quot;");
        assert_eq!(escape("Farfetch'd"), "Farfetch&#39;d");
    }
}
