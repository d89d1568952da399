//! Photo upload and download
//!
//! Uploads are raw request bodies (`Content-Type: image/jpeg` and so on)
//! rather than multipart forms; GraphQL carries everything else.

use actix_web::{
    http::header::{self, CacheControl, CacheDirective},
    web, HttpRequest, HttpResponse,
};
use futures_util::StreamExt;
use uuid::Uuid;

use eh_core::services::PhotoUpload;
use eh_core::{DomainError, ValidationError};

use crate::dto::{PhotoResponse, UploadPhotoQuery};
use crate::handlers::{ApiError, ApiResult};
use crate::middleware::{AuthContext, OptionalAuth};
use crate::state::ListingState;

/// Handler for POST /api/v1/listings/{id}/photos?file_name=front.jpg
///
/// The body is read up to the configured photo size limit; larger uploads
/// are refused without buffering the rest.
///
/// ## Success (201 Created)
/// ```json
/// {
///     "id": "...",
///     "listing_id": "...",
///     "file_name": "front.jpg",
///     "content_type": "image/jpeg",
///     "size_bytes": 183245,
///     "position": 0,
///     "is_primary": true,
///     "url": "/api/v1/photos/...",
///     "created_at": "2024-05-01T10:00:00Z"
/// }
/// ```
///
/// ## Errors
/// - 403 Forbidden: caller is neither the owner nor an admin
/// - 409 Conflict: `PHOTO_LIMIT`
/// - 413 Payload Too Large: `PHOTO_TOO_LARGE`
/// - 415 Unsupported Media Type: not jpeg, png or webp
pub async fn upload_photo(
    req: HttpRequest,
    state: web::Data<ListingState>,
    auth: AuthContext,
    listing_id: web::Path<Uuid>,
    query: web::Query<UploadPhotoQuery>,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let content_type = content_type(&req);
    let max_bytes = state.photo_service.config().max_photo_bytes;
    let bytes = read_limited(payload, max_bytes).await?;

    let photo = state
        .photo_service
        .upload_photo(
            &auth.actor(),
            PhotoUpload {
                listing_id: listing_id.into_inner(),
                file_name: query.into_inner().file_name,
                content_type,
                bytes,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(PhotoResponse::from(photo)))
}

/// Handler for GET /api/v1/photos/{id}
///
/// Photos of published listings are public; the others only for the owner
/// and admins.
pub async fn get_photo(
    state: web::Data<ListingState>,
    auth: OptionalAuth,
    photo_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let viewer = auth.actor();
    let content = state
        .photo_service
        .photo_content(photo_id.into_inner(), viewer.as_ref())
        .await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content.photo.content_type.clone()))
        .insert_header(CacheControl(vec![
            CacheDirective::Private,
            CacheDirective::MaxAge(3600),
        ]))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", content.photo.file_name),
        ))
        .body(content.bytes))
}

/// Handler for DELETE /api/v1/photos/{id}
///
/// Removes bytes and metadata; the next photo becomes primary.
pub async fn delete_photo(
    state: web::Data<ListingState>,
    auth: AuthContext,
    photo_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .photo_service
        .delete_photo(&auth.actor(), photo_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Media type without parameters, lower-cased
fn content_type(req: &HttpRequest) -> String {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

async fn read_limited(mut payload: web::Payload, max_bytes: usize) -> ApiResult<Vec<u8>> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
        if body.len() + chunk.len() > max_bytes {
            return Err(DomainError::from(ValidationError::PayloadTooLarge { max_bytes }).into());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_content_type_drops_parameters() {
        let req = TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "Image/JPEG; charset=binary"))
            .to_http_request();
        assert_eq!(content_type(&req), "image/jpeg");
        assert_eq!(content_type(&TestRequest::default().to_http_request()), "");
    }
}
