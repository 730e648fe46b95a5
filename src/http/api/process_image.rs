use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::IntoResponse;
use tracing::error;

use super::{ALLOWED_MIME_TYPES, MAX_FILE_SIZE};
use crate::filters;
use crate::http::AppStateRef;
use crate::http::error::{HttpError, HttpResult};

pub async fn process_image(
    State(state): State<AppStateRef>,
    mut payload: Multipart,
) -> HttpResult<impl IntoResponse> {
    let mut image: Option<(Vec<u8>, String)> = None;
    let mut filter_id = None;

    while let Some(field) = payload.next_field().await? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some("image") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                image = Some((bytes.to_vec(), content_type));
            }
            Some("prompt") => filter_id = Some(field.text().await?),
            _ => continue,
        }
    }

    // Presence is reported before any complaint about the image itself
    let (image, mime_type) = image.ok_or_else(|| HttpError::bad_request("Missing image file"))?;
    let filter_id = filter_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| HttpError::bad_request("Missing filter type"))?;

    if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(HttpError::bad_request(
            "Invalid file type. Only images allowed.",
        ));
    }
    if image.len() > MAX_FILE_SIZE {
        return Err(HttpError::bad_request("File too large. Max size is 10MB."));
    }

    let Some(gemini) = &state.gemini else {
        error!("Gemini API key not configured");
        return Err(HttpError::Internal(
            "Image processing service not configured".to_string(),
        ));
    };

    let prompt = filters::prompt_for(&filter_id);
    let edited = gemini.edit_image(&image, &mime_type, prompt).await?;

    let headers = [
        (header::CONTENT_TYPE, "image/jpeg".to_string()),
        (header::CONTENT_LENGTH, edited.len().to_string()),
        (
            header::CACHE_CONTROL,
            "no-cache, no-store, must-revalidate".to_string(),
        ),
    ];

    Ok((headers, edited))
}
