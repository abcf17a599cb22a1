//! Shared fixtures for API tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request};
use serde_json::Value;
use std::io::{Cursor, Write};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use sitelift_convert::{build_router, AppState, ConvertSettings};

pub const BOUNDARY: &str = "----sitelift-test-boundary";

/// App rooted in a fresh temporary directory
pub fn setup_app() -> (axum::Router, ConvertSettings, TempDir) {
    let temp = tempfile::tempdir().unwrap();
    let settings = ConvertSettings::for_root(temp.path());
    settings.ensure_directories().unwrap();
    let app = build_router(AppState::new(settings.clone()));
    (app, settings, temp)
}

/// Same as [`setup_app`] with a custom upload ceiling
pub fn setup_app_with_limit(max_upload_bytes: u64) -> (axum::Router, ConvertSettings, TempDir) {
    let temp = tempfile::tempdir().unwrap();
    let settings = ConvertSettings::for_root(temp.path()).with_max_upload_bytes(max_upload_bytes);
    settings.ensure_directories().unwrap();
    let app = build_router(AppState::new(settings.clone()));
    (app, settings, temp)
}

/// In-memory ZIP archive of `(name, contents)` entries
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        writer.start_file(name.to_string(), options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// multipart/form-data body with one file field
pub fn multipart_body(field: &str, file_name: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/zip\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// multipart/form-data body with only a text field
pub fn multipart_text_only(field: &str, value: &str) -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"\r\n\r\n{v}\r\n--{b}--\r\n",
        b = BOUNDARY,
        f = field,
        v = value
    )
    .into_bytes()
}

pub fn convert_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/convert")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body")
        .to_vec()
}

pub async fn extract_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).expect("Should parse JSON")
}

/// Parse an NDJSON body into one value per line
pub async fn extract_ndjson(body: Body) -> Vec<Value> {
    let bytes = body_bytes(body).await;
    String::from_utf8(bytes)
        .expect("NDJSON is UTF-8")
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("Each line is JSON"))
        .collect()
}
