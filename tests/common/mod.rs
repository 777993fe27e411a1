//! Local stand-in for the Box pre-flight and upload endpoints.
//!
//! Binds to `127.0.0.1:0` and records every request it receives so tests can
//! assert on call counts, headers and multipart part order.
#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::{options, post};
use axum::{Json, Router};
use box_csv_upload::UploaderConfig;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const TEST_TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct RecordedPreflight {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct RecordedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub path: String,
    pub headers: HeaderMap,
    pub parts: Vec<RecordedPart>,
}

impl RecordedUpload {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn attributes(&self) -> Value {
        let part = self
            .parts
            .iter()
            .find(|p| p.name == "attributes")
            .expect("attributes part present");
        serde_json::from_slice(&part.data).expect("attributes part is JSON")
    }

    pub fn file_part(&self) -> &RecordedPart {
        self.parts
            .iter()
            .find(|p| p.name == "file")
            .expect("file part present")
    }
}

/// How the fake upload endpoint answers.
#[derive(Debug, Clone)]
pub enum UploadBehaviour {
    /// Echo a file entry built from the submitted form.
    Succeed,
    /// Reply with a fixed status and body.
    Respond(StatusCode, Value),
    /// Succeed only when `If-Match` equals the given etag, else 412.
    RequireEtag(String),
}

#[derive(Debug, Clone)]
pub struct Behaviour {
    pub preflight: (StatusCode, Value),
    pub upload: UploadBehaviour,
}

impl Default for Behaviour {
    fn default() -> Self {
        Behaviour {
            preflight: (
                StatusCode::OK,
                json!({ "upload_url": "https://upload.box.com/api/2.0/files/content", "upload_token": null }),
            ),
            upload: UploadBehaviour::Succeed,
        }
    }
}

#[derive(Default)]
struct Recorder {
    preflights: Vec<RecordedPreflight>,
    uploads: Vec<RecordedUpload>,
}

#[derive(Clone)]
struct AppState {
    recorder: Arc<Mutex<Recorder>>,
    behaviour: Arc<Behaviour>,
}

pub struct FakeBox {
    pub addr: SocketAddr,
    recorder: Arc<Mutex<Recorder>>,
}

impl FakeBox {
    pub async fn start(behaviour: Behaviour) -> Self {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let state = AppState {
            recorder: recorder.clone(),
            behaviour: Arc::new(behaviour),
        };

        let app = Router::new()
            .route("/2.0/files/content", options(preflight_handler))
            .route("/api/2.0/files/content", post(upload_handler))
            .route("/api/2.0/files/:id/content", post(upload_handler))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake Box server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake Box server");
        });

        FakeBox { addr, recorder }
    }

    pub fn api_base_url(&self) -> String {
        format!("http://{}/2.0", self.addr)
    }

    pub fn upload_base_url(&self) -> String {
        format!("http://{}/api/2.0", self.addr)
    }

    pub fn config(&self) -> UploaderConfig {
        UploaderConfig::new(TEST_TOKEN)
            .with_api_base_url(self.api_base_url())
            .with_upload_base_url(self.upload_base_url())
    }

    pub fn preflights(&self) -> Vec<RecordedPreflight> {
        self.recorder.lock().unwrap().preflights.clone()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.recorder.lock().unwrap().uploads.clone()
    }
}

async fn preflight_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .recorder
        .lock()
        .unwrap()
        .preflights
        .push(RecordedPreflight { headers, body });
    let (status, body) = state.behaviour.preflight.clone();
    (status, Json(body))
}

async fn upload_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.expect("field bytes").to_vec();
        parts.push(RecordedPart {
            name,
            file_name,
            content_type,
            data,
        });
    }

    let recorded = RecordedUpload {
        path: uri.path().to_string(),
        headers,
        parts,
    };
    state.recorder.lock().unwrap().uploads.push(recorded.clone());

    match &state.behaviour.upload {
        UploadBehaviour::Succeed => (StatusCode::CREATED, Json(echo_entry(&recorded))),
        UploadBehaviour::Respond(status, body) => (*status, Json(body.clone())),
        UploadBehaviour::RequireEtag(etag) => {
            if recorded.header("if-match").as_deref() == Some(etag.as_str()) {
                (StatusCode::CREATED, Json(echo_entry(&recorded)))
            } else {
                (
                    StatusCode::PRECONDITION_FAILED,
                    Json(box_error(412, "precondition_failed", "The resource has been modified. Please retrieve the resource again and retry")),
                )
            }
        }
    }
}

fn echo_entry(upload: &RecordedUpload) -> Value {
    let attributes = upload.attributes();
    let id = upload
        .path
        .strip_prefix("/api/2.0/files/")
        .and_then(|rest| rest.strip_suffix("/content"))
        .filter(|id| *id != "content" && !id.is_empty())
        .unwrap_or("1001")
        .to_string();
    json!({
        "total_count": 1,
        "entries": [{
            "type": "file",
            "id": id,
            "name": attributes["name"],
            "size": upload.file_part().data.len(),
            "modified_at": "2024-03-01T12:30:05-08:00",
            "sha1": upload.header("content-md5"),
            "file_version": { "type": "file_version", "id": "v-2" }
        }]
    })
}

pub fn box_error(status: u16, code: &str, message: &str) -> Value {
    json!({
        "type": "error",
        "status": status,
        "code": code,
        "message": message,
        "request_id": "req-fake"
    })
}

/// Writes `content` to `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}
