use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{error, info};

use super::{ALLOWED_MIME_TYPES, MAX_FILE_SIZE};
use crate::http::AppStateRef;
use crate::http::error::{HttpError, HttpResult};
use crate::http::utils::{ClientIp, write_field_to_file};
use crate::model::photo::Photo;
use crate::model::upload::UploadMetadata;
use crate::repo::PhotosRepo;
use crate::storage::PhotoStorage;

#[derive(Serialize)]
pub struct UploadResponse {
    message: &'static str,
    success: bool,
    data: UploadedPhoto,
}

#[derive(Serialize)]
struct UploadedPhoto {
    id: String,
    url: String,
}

pub async fn upload_photo(
    State(state): State<AppStateRef>,
    ClientIp(ip): ClientIp,
    mut payload: Multipart,
) -> HttpResult<Json<UploadResponse>> {
    if !state.upload_limiter.try_consume(ip, 1) {
        info!("Upload rate limit exceeded for {ip}");
        return Err(HttpError::TooManyRequests);
    }

    let mut file = None;
    let mut metadata_raw = None;

    while let Some(field) = payload.next_field().await? {
        // The name is copied out so the field can be consumed below
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().unwrap_or_default().to_string();

                // Size is checked while streaming and reported before the type
                let written = write_field_to_file(field, MAX_FILE_SIZE).await?;
                if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
                    return Err(HttpError::bad_request(
                        "Invalid file type. Only images allowed.",
                    ));
                }

                file = Some(written);
            }
            Some("photo") => metadata_raw = Some(field.text().await?),
            _ => continue,
        }
    }

    let file = file.ok_or_else(|| HttpError::bad_request("No file provided"))?;

    // A missing metadata part fails the same way unparseable JSON does
    let metadata = UploadMetadata::parse(metadata_raw.as_deref().unwrap_or(""))
        .map_err(|e| HttpError::BadRequest(e.to_string()))?;

    let key = PhotoStorage::object_key(&metadata.id);
    let target_path = state.storage.resolve(&key);

    let photo = Photo {
        id: metadata.id,
        image_url: state.storage.public_url(&key),
        message: metadata.message,
        position: metadata.position,
        rotation: metadata.rotation,
        created_at: OffsetDateTime::now_utc(),
    };

    // The row goes in first. Blob keys are derived from the id, so writing
    // the blob before the uniqueness check would clobber an already
    // published photo when a client retries the same id.
    if let Err(e) = state.pool.insert_photo(&photo).await {
        if let sqlx::Error::Database(db) = &e
            && db.is_unique_violation()
        {
            info!("Rejected duplicate photo id {}", photo.id);
            return Err(HttpError::bad_request("Photo ID already exists"));
        }

        error!("Photo insert failed for {}: {e}", photo.id);
        return Err(HttpError::Internal(
            "Upload failed. Please try again.".to_string(),
        ));
    }

    info!("Uploading {} bytes to {}", file.size, target_path.display());
    if let Err(e) = file.persist_to(&target_path).await {
        error!("Blob write failed for {}: {e}", photo.id);

        // Roll the row back so the gallery never references a missing blob;
        // a failed delete leaves a dangling row which is only logged
        if let Err(e) = state.pool.delete_photo(&photo.id).await {
            error!("Failed to delete row for {}: {e}", photo.id);
        }

        return Err(HttpError::Internal(
            "Upload failed. Please try again.".to_string(),
        ));
    }

    info!("Upload successful: {}", photo.id);

    Ok(Json(UploadResponse {
        message: "File uploaded successfully!",
        success: true,
        data: UploadedPhoto {
            id: photo.id,
            url: photo.image_url,
        },
    }))
}
