// Static file handlers for Voice Gateway
//
// Serves the browser front end: the index page on `/` and assets under `/static/`.

use std::path::{Path, PathBuf};

use actix_files::NamedFile;
use actix_web::http::header::{HeaderValue, CONTENT_TYPE};
use actix_web::{web, HttpRequest, HttpResponse};
use log::warn;

use crate::config::GatewayConfig;
use crate::error::GatewayError;

const INDEX_FILE: &str = "index.html";

/// Handler for the index page
pub async fn index(
    req: HttpRequest,
    config: web::Data<GatewayConfig>,
) -> Result<HttpResponse, GatewayError> {
    serve_file(&req, &config.static_dir.join(INDEX_FILE)).await
}

/// Handler for `/static/{path}`
///
/// Paths containing `..` are rejected before the filesystem is touched.
pub async fn static_asset(
    req: HttpRequest,
    path: web::Path<String>,
    config: web::Data<GatewayConfig>,
) -> Result<HttpResponse, GatewayError> {
    let path = path.into_inner();
    let full_path = resolve_static_path(&config.static_dir, &path)?;
    serve_file(&req, &full_path).await
}

/// Map a request sub-path onto the static root
pub fn resolve_static_path(root: &Path, path: &str) -> Result<PathBuf, GatewayError> {
    if path.contains("..") {
        warn!("Rejected static path: {}", path);
        return Err(GatewayError::InvalidPath);
    }

    // A leading slash would make join() discard the root
    let relative = path.trim_start_matches('/');
    if relative.is_empty() {
        return Err(GatewayError::NotFound);
    }

    Ok(root.join(relative))
}

/// Content type forced for the front end's own file types
fn content_type_for(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => Some("text/html; charset=utf-8"),
        Some("css") => Some("text/css; charset=utf-8"),
        Some("js") => Some("application/javascript; charset=utf-8"),
        _ => None,
    }
}

async fn serve_file(req: &HttpRequest, path: &Path) -> Result<HttpResponse, GatewayError> {
    let is_file = tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(GatewayError::NotFound);
    }

    let file = NamedFile::open_async(path)
        .await
        .map_err(|_| GatewayError::NotFound)?;
    // NamedFile guesses the content type from the extension for everything else
    let mut response = file.into_response(req);

    if let Some(content_type) = content_type_for(path) {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_components_are_rejected() {
        let root = Path::new("static");
        for path in ["../../etc/passwd", "css/../../secret", "..", "a..b.js"] {
            assert!(matches!(
                resolve_static_path(root, path),
                Err(GatewayError::InvalidPath)
            ));
        }
    }

    #[test]
    fn test_paths_stay_under_root() {
        let root = Path::new("static");
        assert_eq!(
            resolve_static_path(root, "/etc/passwd").unwrap(),
            PathBuf::from("static/etc/passwd")
        );
        assert_eq!(
            resolve_static_path(root, "css/style.css").unwrap(),
            PathBuf::from("static/css/style.css")
        );
        assert!(matches!(
            resolve_static_path(root, ""),
            Err(GatewayError::NotFound)
        ));
    }

    #[test]
    fn test_front_end_content_types() {
        assert_eq!(
            content_type_for(Path::new("app.js")),
            Some("application/javascript; charset=utf-8")
        );
        assert_eq!(
            content_type_for(Path::new("style.css")),
            Some("text/css; charset=utf-8")
        );
        assert_eq!(
            content_type_for(Path::new("index.html")),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(content_type_for(Path::new("logo.png")), None);
    }
}
