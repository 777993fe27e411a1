//! Multipart submission to the Box upload endpoints.
//!
//! The form always carries `attributes` first and `file` second; Box rejects
//! forms where the content precedes the metadata.

use reqwest::header::{HeaderValue, IF_MATCH};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

use crate::config::UploaderConfig;
use crate::contract::UploadResult;
use crate::error::{RemoteFailure, UploadError};
use crate::wire::{Attributes, UploadResponse};

pub const CSV_MEDIA_TYPE: &str = "text/csv";
pub const CONTENT_MD5: &str = "Content-MD5";

/// Everything needed to send one upload form.
pub(crate) struct Submission<'a> {
    pub url: String,
    pub attributes: Attributes<'a>,
    pub path: &'a Path,
    pub sha1: &'a str,
    pub if_match: Option<&'a str>,
}

pub(crate) async fn build_form(
    attributes: &Attributes<'_>,
    path: &Path,
) -> Result<Form, UploadError> {
    let attributes_json = serde_json::to_string(attributes).map_err(|e| UploadError::RemoteOther {
        remote: RemoteFailure {
            message: Some(format!("failed to encode upload attributes: {e}")),
            ..Default::default()
        },
    })?;

    let content = tokio::fs::read(path).await.map_err(|source| UploadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file_part = Part::bytes(content)
        .file_name(attributes.name.to_string())
        .mime_str(CSV_MEDIA_TYPE)
        .map_err(UploadError::transport)?;

    Ok(Form::new()
        .part("attributes", Part::text(attributes_json))
        .part("file", file_part))
}

pub(crate) async fn submit(
    http: &Client,
    config: &UploaderConfig,
    submission: Submission<'_>,
) -> Result<UploadResult, UploadError> {
    let form = build_form(&submission.attributes, submission.path).await?;

    let mut request = http
        .post(&submission.url)
        .bearer_auth(&config.access_token)
        .header(CONTENT_MD5, submission.sha1)
        .multipart(form);

    if let Some(etag) = submission.if_match {
        let value = HeaderValue::from_str(etag).map_err(|e| UploadError::RemoteOther {
            remote: RemoteFailure {
                message: Some(format!("invalid If-Match value {etag:?}: {e}")),
                ..Default::default()
            },
        })?;
        request = request.header(IF_MATCH, value);
    }

    info!(
        url = %submission.url,
        name = submission.attributes.name,
        sha1 = submission.sha1,
        if_match = submission.if_match.unwrap_or(""),
        "Submitting upload"
    );

    let started = Instant::now();
    let resp = request.send().await.map_err(|e| {
        error!(error = %e, url = %submission.url, "Upload request failed");
        UploadError::transport(e)
    })?;

    let status = resp.status();
    let text = resp.text().await.map_err(UploadError::transport)?;
    let upload_time = started.elapsed();

    if !status.is_success() {
        let err = UploadError::from_status(status, text);
        error!(status = %status, error = %err, "Upload rejected");
        return Err(err);
    }

    let parsed: UploadResponse = serde_json::from_str(&text).map_err(|e| UploadError::RemoteOther {
        remote: RemoteFailure {
            status: Some(status.as_u16()),
            message: Some(format!("unexpected upload response: {e}")),
            body: text.clone(),
            ..Default::default()
        },
    })?;

    let file = parsed
        .entries
        .into_iter()
        .next()
        .ok_or_else(|| UploadError::RemoteOther {
            remote: RemoteFailure {
                status: Some(status.as_u16()),
                message: Some("upload response contained no file entries".to_string()),
                body: text.clone(),
                ..Default::default()
            },
        })?;

    info!(
        file_id = %file.id,
        name = %file.name,
        size = file.size,
        elapsed_ms = upload_time.as_millis() as u64,
        "Upload complete"
    );

    Ok(UploadResult {
        success: true,
        file: file.into(),
        upload_time,
    })
}
