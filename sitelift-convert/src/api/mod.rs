//! HTTP API handlers for sitelift-convert

pub mod convert;
pub mod health;

pub use convert::convert_routes;
pub use health::health_routes;

use tower_http::services::ServeDir;

use crate::config::ConvertSettings;

/// Static file service for packaged projects (`GET /downloads/<file>`)
pub fn download_service(settings: &ConvertSettings) -> ServeDir {
    ServeDir::new(&settings.downloads_dir)
}
