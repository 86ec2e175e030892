use serde::Serialize;

/// One upload attempt as received from the admin form.
#[derive(Debug, Default)]
pub struct UploadRequest {
    pub file_bytes: Vec<u8>,
    pub file_name: String,
    pub supplied_secret: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub message: String,
    pub timestamp: String,
    pub row_count: usize,
    pub url: String,
    pub checksum: String,
}
