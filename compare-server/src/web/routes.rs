//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Local;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::compare::{
    Comparison, FareSource, InvalidDeparture, MapImages, compare, fetch_map_images,
};
use crate::config::API_KEY_VAR;
use crate::document::{PDF_FILE_NAME, PDF_MIME, render_pdf};
use crate::report::{Pagination, ReportInput, build_report};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/compare", get(compare_page))
        .route("/compare/report.pdf", get(report_pdf))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn render(template: &impl Template) -> Result<String, AppError> {
    template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Warning shown when routes can't be fetched at all.
fn configuration_warning(state: &AppState) -> Option<String> {
    (!state.directions.is_configured()).then(|| {
        format!("{API_KEY_VAR} ist nicht gesetzt. Es können keine Routen berechnet werden.")
    })
}

/// Index page with the comparison form.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let now = Local::now().naive_local();
    let defaults = &state.config.cost_defaults;

    let template = IndexTemplate {
        form: FormDefaults {
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M").to_string(),
            hourly_wage: format!("{:.2}", defaults.hourly_wage),
            per_km_rate: format!("{:.2}", defaults.per_km_rate),
            base_fare: format!("{:.2}", defaults.base_fare),
            per_km_fare: format!("{:.2}", defaults.per_km_fare),
            lookup_fares: state.config.fare_source == FareSource::Lookup,
        },
        warning: configuration_warning(&state),
    };

    Ok(Html(render(&template)?))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Validate the query and run one comparison.
async fn run_comparison(state: &AppState, query: CompareQuery) -> Result<Comparison, AppError> {
    let request = query.into_request(&state.config, Local::now().naive_local())?;
    let comparison = compare(state.directions.as_ref(), state.fares.as_ref(), request).await?;
    Ok(comparison)
}

/// Link to the PDF of the comparison described by `query`.
fn pdf_url(query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("/compare/report.pdf?{q}"),
        _ => "/compare/report.pdf".to_string(),
    }
}

/// Compare both modes; the live page for browsers, JSON otherwise.
async fn compare_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<CompareQuery>,
) -> Result<Response, AppError> {
    let html = accepts_html(&headers);

    if let Some(message) = configuration_warning(&state) {
        if html {
            let page = ErrorTemplate {
                title: "Konfiguration fehlt".to_string(),
                message,
                details: None,
            };
            return Ok((StatusCode::SERVICE_UNAVAILABLE, Html(render(&page)?)).into_response());
        }
        return Err(AppError::ConfigurationMissing { message });
    }

    let comparison = run_comparison(&state, query).await?;

    if html {
        let input = ReportInput::from_comparison(&comparison);
        let blocks = build_report(&input, Pagination::Unbounded);
        let template = CompareTemplate {
            blocks: BlockView::from_blocks(&blocks),
            pdf_url: pdf_url(raw_query.as_deref()),
        };
        Ok(Html(render(&template)?).into_response())
    } else {
        Ok(Json(CompareResponse::from_comparison(&comparison)).into_response())
    }
}

/// The comparison as a downloadable PDF.
async fn report_pdf(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<Response, AppError> {
    if let Some(message) = configuration_warning(&state) {
        return Err(AppError::ConfigurationMissing { message });
    }

    let comparison = run_comparison(&state, query).await?;

    let maps = match &state.maps {
        Some(client) => fetch_map_images(client.as_ref(), &comparison).await,
        None => MapImages::default(),
    };

    let bytes = render_pdf(&comparison, &maps);
    info!(bytes = bytes.len(), "document rendered");

    let headers = [
        (header::CONTENT_TYPE, PDF_MIME.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{PDF_FILE_NAME}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    ConfigurationMissing { message: String },
    Internal { message: String },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<InvalidDeparture> for AppError {
    fn from(e: InvalidDeparture) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::ConfigurationMissing { message } => {
                (StatusCode::SERVICE_UNAVAILABLE, message)
            }
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::{HeaderValue, Uri};

    use super::*;
    use crate::config::AppConfig;
    use crate::directions::{DirectionsSource, MockDirectionsClient};
    use crate::fares::{FareClient, FareClientConfig};

    const QUERY: &str = "origin=Z%C3%BCrich%2C+Stauffacher&destination=Bern&date=2024-03-15&time=07%3A45";

    fn state(configured: bool) -> AppState {
        let directions = if configured {
            let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/directions");
            DirectionsSource::Mock(MockDirectionsClient::new(dir).unwrap())
        } else {
            DirectionsSource::Unconfigured
        };
        let fares = FareClient::new(FareClientConfig::new(1)).unwrap();
        AppState::new(directions, fares, None, AppConfig::default())
    }

    fn query(raw: &str) -> Query<CompareQuery> {
        let uri: Uri = format!("/compare?{raw}").parse().unwrap();
        Query::try_from_uri(&uri).unwrap()
    }

    fn html_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        headers
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    async fn get_compare(state: AppState, headers: HeaderMap, raw: &str) -> Response {
        compare_page(
            State(state),
            headers,
            RawQuery(Some(raw.to_string())),
            query(raw),
        )
        .await
        .into_response()
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn index_warns_without_key() {
        let Html(body) = index_page(State(state(false))).await.unwrap();
        assert!(body.contains(API_KEY_VAR));

        let Html(body) = index_page(State(state(true))).await.unwrap();
        assert!(!body.contains(API_KEY_VAR));
    }

    #[tokio::test]
    async fn compare_returns_json() {
        let response = get_compare(state(true), HeaderMap::new(), QUERY).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["origin"], "Zürich, Stauffacher");
        assert_eq!(json["auto"]["available"], true);
        assert_eq!(json["auto"]["start"]["lat"], 47.3779);
        assert_eq!(json["auto"]["end"]["lng"], 7.4474);
        assert_eq!(json["transit"]["available"], true);
        assert_eq!(json["transit"]["costs"]["components"][0]["key"], "ticket");
        assert_eq!(json["transfers"].as_array().unwrap().len(), 3);
        assert_eq!(json["transfers"][1]["kind"], "TRANSFER");
    }

    #[tokio::test]
    async fn compare_renders_live_page() {
        let response = get_compare(state(true), html_headers(), QUERY).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("Reisevergleich: Auto vs Öffentlicher Verkehr"));
        assert!(body.contains("Wegbeschreibung – ÖV"));
        assert!(body.contains("map-1-driving"));
        assert!(body.contains("/compare/report.pdf?origin="));
    }

    #[tokio::test]
    async fn compare_without_key_is_unavailable() {
        let response = get_compare(state(false), HeaderMap::new(), QUERY).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = get_compare(state(false), html_headers(), QUERY).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(body_string(response).await.contains("Konfiguration fehlt"));
    }

    #[tokio::test]
    async fn invalid_query_is_bad_request() {
        let raw = "origin=Z%C3%BCrich&destination=Bern&date=morgen";
        let response = get_compare(state(true), HeaderMap::new(), raw).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(json["error"].as_str().unwrap().contains("morgen"));
    }

    #[tokio::test]
    async fn missing_destination_is_json_bad_request() {
        let raw = "origin=Z%C3%BCrich";
        let response = get_compare(state(true), HeaderMap::new(), raw).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["error"], "missing destination");

        // Configuration is checked before the query.
        let response = get_compare(state(false), HeaderMap::new(), raw).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn report_is_a_pdf_attachment() {
        let response = report_pdf(State(state(true)), query(QUERY))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Reisevergleich.pdf\""
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn pdf_url_keeps_query() {
        assert_eq!(pdf_url(Some("a=1&b=2")), "/compare/report.pdf?a=1&b=2");
        assert_eq!(pdf_url(None), "/compare/report.pdf");
    }
}
