//! The `/upload` relay handler.

use std::io::Write as _;
use std::path::PathBuf;
use std::time::Instant;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{RelayError, RelayResult};
use crate::generation::{detect_mime, GenerationRequest};
use crate::metrics;
use crate::AppState;

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "flowchart";

/// Multipart field carrying the target language.
pub const LANGUAGE_FIELD: &str = "language";

/// Message returned alongside generated code.
pub const SUCCESS_MESSAGE: &str = "Code generated successfully!";

/// Successful upload response.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Status message.
    pub message: String,
    /// Generated source code.
    pub code: String,
}

/// A parsed upload.
#[derive(Debug)]
struct Upload {
    data: Vec<u8>,
    file_name: Option<String>,
    content_type: Option<String>,
    language: Option<String>,
}

/// Accept a flowchart image and return generated code.
#[tracing::instrument(name = "upload", skip(state, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> RelayResult<Json<UploadResponse>> {
    let result = match multipart {
        Ok(multipart) => relay(&state, multipart).await,
        Err(rejection) => Err(rejection.into()),
    };
    metrics::record_upload(match &result {
        Ok(_) => "success",
        Err(err) if err.is_rejection() => "rejected",
        Err(_) => "failed",
    });
    result.map(|code| {
        Json(UploadResponse {
            message: SUCCESS_MESSAGE.to_string(),
            code,
        })
    })
}

async fn relay(state: &AppState, multipart: Multipart) -> RelayResult<String> {
    let upload = read_upload(multipart).await?;
    let language = upload
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(state.config.default_language.as_str())
        .to_string();
    let mime = detect_mime(&upload.data, upload.content_type.as_deref());

    tracing::info!(
        file_name = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = upload.data.len(),
        %mime,
        %language,
        "flowchart received"
    );
    metrics::record_upload_size(upload.data.len());

    let staged = stage(state.config.upload_dir.clone(), &mime, upload.data).await?;

    let started = Instant::now();
    let generated = state
        .generator
        .generate(GenerationRequest {
            image_path: staged.path(),
            mime_type: &mime,
            language: &language,
        })
        .await;
    metrics::record_generation(started.elapsed(), generated.is_ok());

    discard(staged);

    Ok(generated?)
}

async fn read_upload(mut multipart: Multipart) -> RelayResult<Upload> {
    let mut file: Option<(Vec<u8>, Option<String>, Option<String>)> = None;
    let mut language = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                file = Some((data.to_vec(), file_name, content_type));
            }
            Some(LANGUAGE_FIELD) => language = Some(field.text().await?),
            other => tracing::debug!(field = ?other, "ignoring multipart field"),
        }
    }

    let (data, file_name, content_type) = file
        .filter(|(data, _, _)| !data.is_empty())
        .ok_or(RelayError::MissingFile)?;

    Ok(Upload {
        data,
        file_name,
        content_type,
        language,
    })
}

/// Write the upload to a uniquely named file that is removed when dropped.
async fn stage(dir: PathBuf, mime: &str, data: Vec<u8>) -> RelayResult<NamedTempFile> {
    let suffix = format!(".{}", mime.rsplit('/').next().unwrap_or("png"));
    let staged = tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("flowchart-")
            .suffix(&suffix)
            .tempfile_in(&dir)?;
        file.write_all(&data)?;
        file.flush()?;
        Ok(file)
    })
    .await
    .map_err(std::io::Error::other)??;

    tracing::debug!(path = %staged.path().display(), "upload staged");
    Ok(staged)
}

/// Remove a staged upload. Failures are logged and otherwise ignored.
fn discard(staged: NamedTempFile) {
    let path = staged.path().to_path_buf();
    if let Err(err) = staged.close() {
        tracing::warn!(path = %path.display(), error = %err, "failed to remove staged upload");
    }
}
