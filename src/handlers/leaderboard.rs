use crate::error::AppError;
use crate::handlers::NO_STORE;
use crate::services::{artifact, csv, page, ranking};
use crate::state::AppState;
use ntex::http::header;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;
use tracing::error;

fn load_csv(state: &AppState) -> Result<Option<Vec<u8>>, AppError> {
    artifact::fetch(state.store.as_ref()).map_err(|e| {
        error!(error = %e, backend = state.store.backend(), "failed to fetch leaderboard");
        AppError::from(e)
    })
}

fn not_found() -> AppError {
    AppError::NotFound("Leaderboard not found".into())
}

pub async fn get_leaderboard_data(
    state: web::types::State<Arc<AppState>>,
) -> Result<HttpResponse, AppError> {
    let csv = load_csv(&state)?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .header(header::CACHE_CONTROL, NO_STORE)
        .header(header::ETAG, format!("\"{}\"", artifact::checksum(&csv)))
        .body(csv))
}

pub async fn get_leaderboard(
    state: web::types::State<Arc<AppState>>,
) -> Result<HttpResponse, AppError> {
    let csv = load_csv(&state)?.ok_or_else(not_found)?;
    let records = csv::parse(&String::from_utf8_lossy(&csv));
    let view = ranking::leaderboard_view(records, &state.columns, state.display_limit);
    Ok(HttpResponse::Ok()
        .header(header::CACHE_CONTROL, NO_STORE)
        .json(&view))
}

pub async fn leaderboard_page(
    state: web::types::State<Arc<AppState>>,
) -> Result<HttpResponse, AppError> {
    let view = load_csv(&state)?.map(|csv| {
        let records = csv::parse(&String::from_utf8_lossy(&csv));
        ranking::leaderboard_view(records, &state.columns, state.display_limit)
    });
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .header(header::CACHE_CONTROL, NO_STORE)
        .body(page::leaderboard_page(view.as_ref())))
}
