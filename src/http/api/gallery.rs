use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::info;

use crate::http::AppStateRef;
use crate::http::error::{HttpError, HttpResult};
use crate::http::utils::ClientIp;
use crate::model::photo::Photo;
use crate::repo::PhotosRepo;

const GALLERY_PAGE_SIZE: i64 = 50;

#[derive(Serialize)]
pub struct GalleryResponse {
    message: &'static str,
    data: Vec<Photo>,
}

pub async fn gallery(
    State(state): State<AppStateRef>,
    ClientIp(ip): ClientIp,
) -> HttpResult<Json<GalleryResponse>> {
    if !state.read_limiter.try_consume(ip, 1) {
        info!("Gallery rate limit exceeded for {ip}");
        return Err(HttpError::TooManyRequests);
    }

    let photos = state.pool.get_recent_photos(GALLERY_PAGE_SIZE).await?;

    Ok(Json(GalleryResponse {
        message: "Photos retrieved successfully!",
        data: photos,
    }))
}
