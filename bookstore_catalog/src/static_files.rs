use std::path::PathBuf;

use actix_files::NamedFile;
use actix_web::web::{self, Data};
use actix_web::{HttpRequest, HttpResponse};

use crate::handlers::endpoint_not_found;

const INDEX_FILE: &str = "index.html";

/// Directory the web page is served from
#[derive(Debug, Clone)]
pub struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Only plain file names directly inside the root are served
    fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let escapes_root = filename.is_empty()
            || filename == "."
            || filename.contains("..")
            || filename.contains(['/', '\\']);
        (!escapes_root).then(|| self.root.join(filename))
    }
}

pub fn config_static(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/{filename}", web::get().to(static_file));
}

async fn index(assets: Data<StaticAssets>, req: HttpRequest) -> HttpResponse {
    serve_file(&assets, INDEX_FILE, &req).await
}

async fn static_file(
    assets: Data<StaticAssets>,
    filename: web::Path<String>,
    req: HttpRequest,
) -> HttpResponse {
    serve_file(&assets, &filename, &req).await
}

async fn serve_file(assets: &StaticAssets, filename: &str, req: &HttpRequest) -> HttpResponse {
    let Some(path) = assets.resolve(filename) else {
        return endpoint_not_found();
    };
    match NamedFile::open_async(&path).await {
        Ok(file) => file.into_response(req),
        Err(err) => {
            tracing::debug!("Static file {} not served: {}", path.display(), err);
            endpoint_not_found()
        }
    }
}
