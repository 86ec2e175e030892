use crate::error::AppError;
use crate::models::upload::{UploadRequest, UploadResult};
use crate::services::artifact;
use crate::store::BlobStore;
use crate::validation::{self, AdminSecret, Rejection};
use chrono::{SecondsFormat, Utc};
use tracing::{error, info, warn};

/// Where the raw artifact is served from.
pub const DATA_URL: &str = "/leaderboard-data";

fn malformed(e: multer::Error) -> AppError {
    AppError::BadRequest(format!("Malformed upload: {}", e))
}

/// Pulls the `file` and `password` fields out of a buffered multipart body.
/// Absent fields stay empty and are judged by the validator.
pub async fn read_form(content_type: Option<&str>, body: Vec<u8>) -> Result<UploadRequest, AppError> {
    let boundary = content_type
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| AppError::BadRequest("Expected a multipart/form-data upload".into()))?;

    let stream = futures::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut req = UploadRequest::default();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                req.file_name = field.file_name().unwrap_or_default().to_owned();
                req.file_bytes = field.bytes().await.map_err(malformed)?.to_vec();
            }
            Some("password") => {
                req.supplied_secret = field.text().await.map_err(malformed)?;
            }
            _ => {}
        }
    }
    Ok(req)
}

/// Validates an upload and, if it passes, makes it the current leaderboard.
pub fn accept_upload(
    store: &dyn BlobStore,
    secret: &AdminSecret,
    req: UploadRequest,
) -> Result<UploadResult, AppError> {
    let file_name = req.file_name.clone();

    let (bytes, row_count) = match validation::validate(secret, req).into_result() {
        Ok(accepted) => accepted,
        Err(Rejection::Unauthorized) => {
            warn!(reason = Rejection::Unauthorized.as_str(), "upload rejected");
            return Err(AppError::Unauthorized);
        }
        Err(reason) => {
            warn!(reason = reason.as_str(), file_name = %file_name, "upload rejected");
            return Err(reason.into());
        }
    };

    let published = artifact::publish(store, &bytes).map_err(|e| {
        error!(error = %e, backend = store.backend(), "failed to store leaderboard");
        AppError::from(e)
    })?;

    info!(
        file_name = %file_name,
        rows = row_count,
        bytes = bytes.len(),
        key = %published.key,
        replaced = ?published.replaced,
        "leaderboard replaced"
    );

    Ok(UploadResult {
        message: "File uploaded successfully".into(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        row_count,
        url: DATA_URL.into(),
        checksum: artifact::checksum(&bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    const BOUNDARY: &str = "X-BOUNDARY";

    fn multipart_body(file: Option<(&str, &str)>, password: Option<&str>) -> Vec<u8> {
        let mut body = String::new();
        if let Some(password) = password {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"password\"\r\n\r\n{password}\r\n"
            ));
        }
        if let Some((name, content)) = file {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body.into_bytes()
    }

    fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    #[ntex::test]
    async fn test_read_form() {
        let body = multipart_body(Some(("board.csv", "a,b\n1,2\n")), Some("hunter2"));
        let req = read_form(Some(content_type().as_str()), body).await.unwrap();
        assert_eq!(req.file_name, "board.csv");
        assert_eq!(req.file_bytes, b"a,b\n1,2\n");
        assert_eq!(req.supplied_secret, "hunter2");
    }

    #[ntex::test]
    async fn test_read_form_missing_fields() {
        let body = multipart_body(None, None);
        let req = read_form(Some(content_type().as_str()), body).await.unwrap();
        assert!(req.file_bytes.is_empty());
        assert!(req.file_name.is_empty());
        assert!(req.supplied_secret.is_empty());
    }

    #[ntex::test]
    async fn test_read_form_requires_multipart() {
        let err = read_form(Some("application/json"), b"{}".to_vec()).await;
        assert!(matches!(err, Err(AppError::BadRequest(_))));
        let err = read_form(None, Vec::new()).await;
        assert!(matches!(err, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_accept_upload_publishes() {
        let store = SqliteStore::open_in_memory().unwrap();
        let secret = AdminSecret::new("hunter2");
        let result = accept_upload(
            &store,
            &secret,
            UploadRequest {
                file_bytes: b"name,score\njohn,5\njane,3\n".to_vec(),
                file_name: "board.csv".into(),
                supplied_secret: "hunter2".into(),
            },
        )
        .unwrap();

        assert_eq!(result.row_count, 2);
        assert_eq!(result.url, DATA_URL);
        assert_eq!(result.checksum, artifact::checksum(b"name,score\njohn,5\njane,3\n"));
        assert_eq!(
            artifact::fetch(&store).unwrap().as_deref(),
            Some(&b"name,score\njohn,5\njane,3\n"[..])
        );
    }

    #[test]
    fn test_rejected_upload_keeps_current_leaderboard() {
        let store = SqliteStore::open_in_memory().unwrap();
        artifact::publish(&store, b"name\nkept\n").unwrap();
        let secret = AdminSecret::new("hunter2");

        let err = accept_upload(
            &store,
            &secret,
            UploadRequest {
                file_bytes: b"name\n".to_vec(),
                file_name: "board.csv".into(),
                supplied_secret: "hunter2".into(),
            },
        );
        assert!(matches!(err, Err(AppError::BadRequest(_))));

        let err = accept_upload(
            &store,
            &secret,
            UploadRequest {
                file_bytes: b"name\nnew\n".to_vec(),
                file_name: "board.txt".into(),
                supplied_secret: "nope".into(),
            },
        );
        assert!(matches!(err, Err(AppError::Unauthorized)));

        assert_eq!(artifact::fetch(&store).unwrap().as_deref(), Some(&b"name\nkept\n"[..]));
    }
}
