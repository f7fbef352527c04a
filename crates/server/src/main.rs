use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    response::Html,
    routing::{delete, get, post},
    Json, Router,
};
use server_api::ApiContext;
use shared::{
    domain::HotelId,
    error::{ApiError, ErrorBody, ErrorCode},
    protocol::{save_hotel_route, HotelsResponse, SaveHotelRequest, SuccessResponse},
};
use storage::Storage;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod csrf;
mod page;

use app_state::AppState;
use config::{load_settings, prepare_database_url};
use csrf::{verify_csrf, CsrfToken};

type HttpError = (StatusCode, Json<ErrorBody>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let csrf = match settings.csrf_token {
        Some(token) => CsrfToken::new(token),
        None => CsrfToken::generate(),
    };
    let state = AppState {
        api: ApiContext { storage },
        csrf,
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route(
            save_hotel_route(),
            post(http_save_hotel).fallback(invalid_method),
        )
        .route(
            "/api/hotels/:city_name/",
            get(http_list_hotels).fallback(invalid_method),
        )
        .route(
            "/api/hotels/delete/:hotel_id/",
            delete(http_delete_hotel).fallback(invalid_method),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    state
        .api
        .storage
        .health_check()
        .await
        .map_err(|e| http_error(ApiError::new(ErrorCode::Internal, e.to_string())))?;
    Ok("ok")
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, HttpError> {
    let cities = server_api::list_cities(&state.api)
        .await
        .map_err(http_error)?;
    Ok(Html(page::render_index(&cities, state.csrf.as_str())))
}

async fn http_list_hotels(
    State(state): State<Arc<AppState>>,
    Path(city_name): Path<String>,
) -> Result<Json<HotelsResponse>, HttpError> {
    server_api::list_hotels(&state.api, &city_name)
        .await
        .map(Json)
        .map_err(http_error)
}

async fn http_save_hotel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<SaveHotelRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    verify_csrf(&state.csrf, &headers)?;
    let Json(req) = payload.map_err(|rejection| {
        http_error(ApiError::new(ErrorCode::Validation, rejection.body_text()))
    })?;
    server_api::save_hotel(&state.api, &req)
        .await
        .map_err(http_error)?;
    Ok(Json(SuccessResponse::ok()))
}

async fn http_delete_hotel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    hotel_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>, HttpError> {
    verify_csrf(&state.csrf, &headers)?;
    // Only integer ids name a hotel.
    let Path(hotel_id) = hotel_id.map_err(|_| http_error(ApiError::hotel_not_found()))?;
    server_api::delete_hotel(&state.api, HotelId(hotel_id))
        .await
        .map_err(http_error)?;
    Ok(Json(SuccessResponse::ok()))
}

async fn invalid_method() -> HttpError {
    http_error(ApiError::invalid_method())
}

fn http_error(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::Internal => {
            error!(message = %err.message, "internal error while handling request");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorBody::from(err)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
