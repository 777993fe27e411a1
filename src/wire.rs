//! JSON shapes exchanged with the Box content API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::contract::FileDescriptor;

#[derive(Debug, Serialize)]
pub(crate) struct ParentRef<'a> {
    pub id: &'a str,
}

/// Body of the pre-flight `OPTIONS /files/content` call.
#[derive(Debug, Serialize)]
pub(crate) struct PreflightBody<'a> {
    pub name: &'a str,
    pub parent: ParentRef<'a>,
    pub size: u64,
}

/// The `attributes` part of an upload form. `parent` is omitted for version uploads.
#[derive(Debug, Serialize)]
pub(crate) struct Attributes<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_modified_at: Option<String>,
}

pub(crate) fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[derive(Debug, Deserialize)]
pub(crate) struct BoxFileVersion {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BoxFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub file_version: Option<BoxFileVersion>,
}

impl From<BoxFile> for FileDescriptor {
    fn from(f: BoxFile) -> Self {
        FileDescriptor {
            id: f.id,
            name: f.name,
            size: f.size,
            modified_at: f.modified_at,
            version_id: f.file_version.map(|v| v.id),
            sha1: f.sha1,
        }
    }
}

/// Successful upload response; Box returns the file inside `entries`.
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub entries: Vec<BoxFile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreflightApproval {
    #[serde(default)]
    pub upload_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Conflicts {
    One(BoxFile),
    Many(Vec<BoxFile>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConflictContext {
    pub conflicts: Option<Conflicts>,
}

/// 409 body from the pre-flight endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ConflictBody {
    pub context_info: Option<ConflictContext>,
}

impl ConflictBody {
    /// The colliding file; the first one when Box lists several.
    pub fn existing(self) -> Option<FileDescriptor> {
        match self.context_info?.conflicts? {
            Conflicts::One(f) => Some(f.into()),
            Conflicts::Many(files) => files.into_iter().next().map(Into::into),
        }
    }
}
