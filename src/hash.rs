//! Streaming SHA-1 of a local file, sent to Box as the `Content-MD5` header.

use crate::error::UploadError;
use sha1::{Digest, Sha1};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Reads `path` to the end and returns its lowercase hex SHA-1.
pub async fn sha1_file(path: &Path) -> Result<String, UploadError> {
    let io_err = |source: std::io::Error| UploadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).await.map_err(io_err)?;
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = file.read(&mut buf).await.map_err(io_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }

    let digest = hex::encode(hasher.finalize());
    tracing::debug!(path = %path.display(), bytes = total, sha1 = %digest, "Computed file hash");
    Ok(digest)
}
