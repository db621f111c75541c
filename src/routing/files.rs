//! File-backed `/files/<name>` route.

use std::io;
use std::path::PathBuf;

use crate::http::request::Request;
use crate::http::response::{Response, Status, CONTENT_TYPE};

/// Reads and writes flat files under a single root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `name` under the root. Only plain file names are accepted.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        match name {
            "" | "." | ".." => None,
            _ if name.contains(['/', '\\']) => None,
            _ => Some(self.root.join(name)),
        }
    }

    /// Serve `GET` (read) and `POST`/`PUT` (write) for the file named by the
    /// request's trailing target segment.
    pub async fn handle(&self, request: &Request, response: Response) -> Response {
        let Some(path) = self.resolve(request.params()) else {
            return response.with_status(Status::NotFound);
        };

        match request.method() {
            "GET" => match tokio::fs::read(&path).await {
                Ok(contents) => response
                    .with_header(CONTENT_TYPE, "application/octet-stream")
                    .with_body(contents),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    response.with_status(Status::NotFound)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "File read failed");
                    response.with_status(Status::InternalServerError)
                }
            },
            "POST" | "PUT" => match tokio::fs::write(&path, request.body()).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), bytes = request.body().len(), "File written");
                    response.with_status(Status::Created)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "File write failed");
                    response.with_status(Status::InternalServerError)
                }
            },
            _ => response.with_status(Status::NotFound),
        }
    }
}
