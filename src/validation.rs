use crate::models::upload::UploadRequest;
use crate::services::csv;
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;
use thiserror::Error;

const CSV_EXTENSION: &str = ".csv";

/// Why an upload was refused. The display strings are sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Invalid password")]
    Unauthorized,

    #[error("No file uploaded")]
    MissingFile,

    #[error("Only CSV files are allowed")]
    WrongExtension,

    #[error("CSV file must have at least a header and one data row")]
    TooFewRows,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Unauthorized => "unauthorized",
            Rejection::MissingFile => "missing-file",
            Rejection::WrongExtension => "wrong-extension",
            Rejection::TooFewRows => "too-few-rows",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted {
        normalized_bytes: Vec<u8>,
        data_row_count: usize,
    },
    Rejected {
        reason: Rejection,
    },
}

impl ValidationOutcome {
    pub fn into_result(self) -> Result<(Vec<u8>, usize), Rejection> {
        match self {
            ValidationOutcome::Accepted {
                normalized_bytes,
                data_row_count,
            } => Ok((normalized_bytes, data_row_count)),
            ValidationOutcome::Rejected { reason } => Err(reason),
        }
    }
}

/// The shared admin password. Never printed.
#[derive(Clone)]
pub struct AdminSecret {
    digest: [u8; 32],
}

impl AdminSecret {
    pub fn new(secret: &str) -> Self {
        AdminSecret {
            digest: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    /// Compares digests in constant time, so neither the content nor the
    /// length of the configured secret leaks through timing.
    pub fn verify(&self, supplied: &str) -> bool {
        let supplied: [u8; 32] = Sha256::digest(supplied.as_bytes()).into();
        bool::from(self.digest[..].ct_eq(&supplied[..]))
    }
}

impl fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminSecret(<redacted>)")
    }
}

pub fn count_content_lines(text: &str) -> usize {
    csv::content_lines(text).count()
}

pub fn validate(secret: &AdminSecret, req: UploadRequest) -> ValidationOutcome {
    match check(secret, &req) {
        Ok(data_row_count) => ValidationOutcome::Accepted {
            normalized_bytes: req.file_bytes,
            data_row_count,
        },
        Err(reason) => ValidationOutcome::Rejected { reason },
    }
}

fn check(secret: &AdminSecret, req: &UploadRequest) -> Result<usize, Rejection> {
    // The password goes first so unauthenticated callers learn nothing about
    // how their file would have fared.
    if !secret.verify(&req.supplied_secret) {
        return Err(Rejection::Unauthorized);
    }
    if req.file_bytes.is_empty() {
        return Err(Rejection::MissingFile);
    }
    if !req.file_name.ends_with(CSV_EXTENSION) {
        return Err(Rejection::WrongExtension);
    }

    let text = String::from_utf8_lossy(&req.file_bytes);
    let lines = count_content_lines(&text);
    if lines < 2 {
        return Err(Rejection::TooFewRows);
    }
    Ok(lines - 1)
}
