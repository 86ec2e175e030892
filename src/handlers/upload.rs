use crate::error::AppError;
use crate::services::page::{self, UploadNotice};
use crate::services::upload as service;
use crate::state::AppState;
use ntex::http::{header, StatusCode};
use ntex::util::Bytes;
use ntex::web::{self, HttpRequest, HttpResponse};
use std::sync::Arc;

// Browser form posts ask for HTML; scripts and curl get JSON.
fn wants_html(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

pub async fn upload(
    state: web::types::State<Arc<AppState>>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, AppError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let result = match service::read_form(content_type, body.to_vec()).await {
        Ok(upload) => service::accept_upload(state.store.as_ref(), &state.secret, upload),
        Err(e) => Err(e),
    };

    if !wants_html(&req) {
        return Ok(HttpResponse::Ok().json(&result?));
    }

    Ok(match result {
        Ok(done) => html(
            StatusCode::OK,
            page::admin_page(Some(UploadNotice::Success {
                rows: done.row_count,
            })),
        ),
        Err(e) => {
            let (status, message) = e.status_and_message();
            html(status, page::admin_page(Some(UploadNotice::Error(message))))
        }
    })
}

pub async fn admin_page() -> HttpResponse {
    html(StatusCode::OK, page::admin_page(None))
}
