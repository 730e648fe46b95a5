mod gallery;
mod process_image;
mod upload;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::filters::{self, FilterInfo};
use crate::http::AppStateRef;

pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

pub fn router(app_state: AppStateRef) -> Router {
    Router::new()
        .route("/gallery", get(gallery::gallery))
        .route("/upload", post(upload::upload_photo))
        .route("/process-image", post(process_image::process_image))
        .route("/filters", get(list_filters))
        .with_state(app_state)
}

#[derive(Serialize)]
struct FiltersResponse {
    data: Vec<FilterInfo>,
}

async fn list_filters() -> Json<FiltersResponse> {
    Json(FiltersResponse {
        data: filters::list(),
    })
}
