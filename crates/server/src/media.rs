//! Local media storage: streaming uploads under the media root and turning
//! stored relative paths back into links clients can fetch.

use axum::extract::{FromRef, FromRequestParts, Multipart};
use axum::http::request::Parts;
use futures_util::{Stream, StreamExt};
use sha2::{Digest, Sha256};
use shared_types::{AppError, MediaConfig};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Subdirectory used when the requested one sanitizes to nothing.
pub const DEFAULT_SUBDIR: &str = "uploads";

const MAX_EXTENSION_LEN: usize = 16;

/// Multipart field that carries the upload.
pub const FILE_FIELD: &str = "file";

const MISSING_FILE: &str = "File object is required";

/// Widths of `evidence_documents.original_filename` and `content_type`.
pub const MAX_FILENAME_CHARS: usize = 255;
pub const MAX_CONTENT_TYPE_CHARS: usize = 100;

/// An incoming upload: the client-supplied filename and its byte chunks.
pub struct UploadedFile<S> {
    pub file_name: String,
    pub chunks: S,
}

/// A file written under the media root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// `<subdir>/<random name>`, always with `/` separators.
    pub relative_path: String,
    pub size_bytes: u64,
    /// Hex SHA-256 of the written bytes.
    pub sha256: String,
}

/// Reduce a caller-chosen subdirectory to path segments that cannot leave
/// the media root: separators are normalized, and empty, `.` and `..`
/// segments dropped.
pub fn sanitize_subdir(subdir: &str) -> String {
    let cleaned: Vec<&str> = subdir
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|seg| !seg.is_empty() && *seg != "." && *seg != "..")
        .map(|seg| seg.trim_matches('.'))
        .filter(|seg| !seg.is_empty() && !seg.contains(':'))
        .collect();

    if cleaned.is_empty() {
        DEFAULT_SUBDIR.to_string()
    } else {
        cleaned.join("/")
    }
}

/// Extension of the client filename, dot included and lowercased.
/// Empty unless it is a short run of ASCII alphanumerics.
pub fn file_extension(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}

/// Shorten a client filename to `max` characters, keeping its extension.
pub fn clip_filename(file_name: &str, max: usize) -> String {
    if file_name.chars().count() <= max {
        return file_name.to_string();
    }
    let ext_len = file_extension(file_name).len();
    if ext_len == 0 || ext_len >= max {
        return file_name.chars().take(max).collect();
    }
    // The extension is ASCII, so its byte length is its char count.
    let (stem, ext) = file_name.split_at(file_name.len() - ext_len);
    let mut clipped: String = stem.chars().take(max - ext_len).collect();
    clipped.push_str(ext);
    clipped
}

/// Persist an upload under `media_root/<subdir>` with a random filename and
/// return its path relative to the media root.
///
/// Fails with a validation error when no file was supplied and when the
/// upload exceeds `max_bytes`. A partially written file is removed on error.
pub async fn save_uploaded_file<S, B, E>(
    media_root: &Path,
    file: Option<UploadedFile<S>>,
    subdir: &str,
    max_bytes: Option<u64>,
) -> Result<StoredFile, AppError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let file = file.ok_or_else(|| AppError::field(FILE_FIELD, MISSING_FILE))?;

    let normalized_subdir = sanitize_subdir(subdir);
    let destination_dir = media_root.join(&normalized_subdir);
    tokio::fs::create_dir_all(&destination_dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create upload directory: {e}")))?;

    let filename = format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        file_extension(&file.file_name)
    );
    let destination_path = destination_dir.join(&filename);

    match write_chunks(&destination_path, file.chunks, max_bytes).await {
        Ok((size_bytes, sha256)) => {
            let relative_path = format!("{normalized_subdir}/{filename}");
            tracing::debug!(%relative_path, size_bytes, "Stored upload");
            Ok(StoredFile {
                relative_path,
                size_bytes,
                sha256,
            })
        }
        Err(err) => {
            if let Err(e) = tokio::fs::remove_file(&destination_path).await {
                tracing::warn!(path = %destination_path.display(), error = %e, "Failed to remove partial upload");
            }
            Err(err)
        }
    }
}

async fn write_chunks<S, B, E>(
    path: &Path,
    chunks: S,
    max_bytes: Option<u64>,
) -> Result<(u64, String), AppError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut destination = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| AppError::internal(format!("Failed to open upload destination: {e}")))?;

    let mut chunks = std::pin::pin!(chunks);
    let mut hasher = Sha256::new();
    let mut written: u64 = 0;

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(|e| AppError::bad_request(format!("Upload interrupted: {e}")))?;
        let bytes = chunk.as_ref();
        written += bytes.len() as u64;
        if max_bytes.is_some_and(|max| written > max) {
            return Err(AppError::payload_too_large(format!(
                "File exceeds the {} byte upload limit",
                max_bytes.unwrap_or_default()
            )));
        }
        hasher.update(bytes);
        destination
            .write_all(bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write upload: {e}")))?;
    }

    destination
        .flush()
        .await
        .map_err(|e| AppError::internal(format!("Failed to flush upload: {e}")))?;

    Ok((written, hex::encode(hasher.finalize())))
}

/// OpenAPI shape of an upload body.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct FileUpload {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// An upload received from a multipart request and written to disk.
#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub stored: StoredFile,
    pub original_filename: String,
    pub content_type: String,
}

/// Stream the `file` field of a multipart body into `<media root>/<subdir>`.
/// Other fields are skipped.
pub async fn save_multipart_file(
    multipart: &mut Multipart,
    media: &MediaConfig,
    subdir: &str,
) -> Result<ReceivedUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_filename =
            clip_filename(field.file_name().unwrap_or_default(), MAX_FILENAME_CHARS);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .chars()
            .take(MAX_CONTENT_TYPE_CHARS)
            .collect();

        let stored = save_uploaded_file(
            Path::new(&media.root),
            Some(UploadedFile {
                file_name: original_filename.clone(),
                chunks: field,
            }),
            subdir,
            Some(media.max_upload_bytes),
        )
        .await?;

        return Ok(ReceivedUpload {
            stored,
            original_filename,
            content_type,
        });
    }

    Err(AppError::field(FILE_FIELD, MISSING_FILE))
}

/// Resolve a stored relative path to its location on disk.
pub fn absolute_path(media_root: &Path, relative_path: &str) -> PathBuf {
    media_root.join(relative_path.trim_start_matches('/'))
}

/// Delete a stored file that no row points at any more. A file that is
/// already gone is fine; other failures are logged, not returned.
pub async fn discard_file(media_root: &Path, relative_path: &str) {
    let path = absolute_path(media_root, relative_path);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!(%relative_path, "Removed media file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove media file");
        }
    }
}

/// Pass `result` through, deleting the just-stored file when it is an error.
pub async fn discard_on_error<T>(
    media_root: &Path,
    relative_path: &str,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    if result.is_err() {
        discard_file(media_root, relative_path).await;
    }
    result
}

/// Turn a stored relative path into a link for clients.
///
/// The path is joined onto `media_url` (or left bare when `media_url` is
/// empty), then onto `origin` (`scheme://host`) unless it is already
/// absolute. Missing or empty paths yield `None`.
pub fn build_public_url(
    relative_path: Option<&str>,
    media_url: &str,
    origin: Option<&str>,
) -> Option<String> {
    let relative = relative_path?.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let public_path = if media_url.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", media_url.trim_end_matches('/'), relative)
    };

    match origin {
        Some(origin) if !is_absolute_url(&public_path) => Some(format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            public_path.trim_start_matches('/')
        )),
        _ => Some(public_path),
    }
}

fn is_absolute_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Builds public media links for the current request.
///
/// The origin comes from `public_base_url` when configured, otherwise from
/// the `X-Forwarded-Proto` / `X-Forwarded-Host` / `Host` headers.
#[derive(Debug, Clone)]
pub struct MediaLinks {
    media_url: String,
    origin: Option<String>,
}

impl MediaLinks {
    pub fn new(media_url: impl Into<String>, origin: Option<String>) -> Self {
        Self {
            media_url: media_url.into(),
            origin,
        }
    }

    pub fn url(&self, relative_path: Option<&str>) -> Option<String> {
        build_public_url(relative_path, &self.media_url, self.origin.as_deref())
    }
}

impl<S> FromRequestParts<S> for MediaLinks
where
    MediaConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let media = MediaConfig::from_ref(state);
        let origin = media
            .public_base_url
            .clone()
            .or_else(|| origin_from_headers(&parts.headers));
        Ok(MediaLinks::new(media.url, origin))
    }
}

fn origin_from_headers(headers: &axum::http::HeaderMap) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
    };

    let host = header("x-forwarded-host").or_else(|| header("host"))?;
    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
    {
        return None;
    }

    let scheme = match header("x-forwarded-proto").as_deref() {
        Some("https") => "https",
        _ => "http",
    };
    Some(format!("{scheme}://{host}"))
}
