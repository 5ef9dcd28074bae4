//! Upload receiver: turns a multipart request into an `UploadRequest`.

use axum::extract::Multipart;
use bytes::BytesMut;
use visage_core::constants::{FALLBACK_CONTENT_TYPE, PHOTO_FIELD};
use visage_core::models::{ensure_size_within, validate_object_key, UploadRequest};
use visage_core::AppError;

use crate::error::multipart_error;

/// Extract the single `photo` file field.
///
/// The file is read chunk by chunk and rejected as soon as it grows past
/// `max_upload_bytes`. Fields with other names are ignored; a second `photo`
/// field is rejected. File name and content type are taken as declared.
pub async fn receive_photo(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<UploadRequest, AppError> {
    let mut photo: Option<UploadRequest> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_bytes))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        if photo.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple '{}' fields are not allowed; send exactly one",
                PHOTO_FIELD
            )));
        }

        let file_name = field.file_name().map(str::to_string).ok_or_else(|| {
            AppError::InvalidInput(format!("The '{}' field has no file name", PHOTO_FIELD))
        })?;
        validate_object_key(&file_name)?;
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

        let mut data = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_upload_bytes))?
        {
            ensure_size_within(data.len() + chunk.len(), max_upload_bytes)?;
            data.extend_from_slice(&chunk);
        }

        tracing::debug!(
            file_name = %file_name,
            mime_type = %mime_type,
            size_bytes = data.len(),
            "Photo received"
        );
        photo = Some(UploadRequest::new(file_name, mime_type, data.freeze()));
    }

    photo.ok_or_else(|| AppError::InvalidInput(format!("No '{}' field provided", PHOTO_FIELD)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::{FromRequest, Request};
    use axum::http::header::CONTENT_TYPE;

    const BOUNDARY: &str = "visage-boundary";

    struct Part {
        name: &'static str,
        file_name: Option<&'static str>,
        content_type: Option<&'static str>,
        data: Vec<u8>,
    }

    async fn multipart(parts: Vec<Part>) -> Multipart {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            let disposition = match part.file_name {
                Some(file_name) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, file_name
                ),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
            };
            body.extend_from_slice(disposition.as_bytes());
            if let Some(content_type) = part.content_type {
                body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(&part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/upload_photo")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    fn photo(file_name: &'static str, content_type: Option<&'static str>, size: usize) -> Part {
        Part {
            name: "photo",
            file_name: Some(file_name),
            content_type,
            data: vec![0xAB; size],
        }
    }

    #[tokio::test]
    async fn test_receives_declared_metadata() {
        let form = multipart(vec![
            Part {
                name: "caption",
                file_name: None,
                content_type: None,
                data: b"ignored".to_vec(),
            },
            photo("photo.jpg", Some("image/jpeg"), 2048),
        ])
        .await;

        let upload = receive_photo(form, 5 * 1024 * 1024).await.unwrap();
        assert_eq!(upload.file_name, "photo.jpg");
        assert_eq!(upload.mime_type, "image/jpeg");
        assert_eq!(upload.size_bytes(), 2048);
    }

    #[tokio::test]
    async fn test_missing_content_type_defaults() {
        let form = multipart(vec![photo("raw.bin", None, 4)]).await;
        let upload = receive_photo(form, 1024).await.unwrap();
        assert_eq!(upload.mime_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_oversized_file_rejected() {
        let form = multipart(vec![photo("big.jpg", Some("image/jpeg"), 1025)]).await;
        let err = receive_photo(form, 1024).await.unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[tokio::test]
    async fn test_file_at_limit_accepted() {
        let form = multipart(vec![photo("exact.jpg", Some("image/jpeg"), 1024)]).await;
        assert!(receive_photo(form, 1024).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_photo_field_rejected() {
        let form = multipart(vec![
            photo("a.jpg", Some("image/jpeg"), 4),
            photo("b.jpg", Some("image/jpeg"), 4),
        ])
        .await;
        let err = receive_photo(form, 1024).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_photo_field_rejected() {
        let form = multipart(vec![Part {
            name: "file",
            file_name: Some("photo.jpg"),
            content_type: Some("image/jpeg"),
            data: vec![1, 2, 3],
        }])
        .await;
        let err = receive_photo(form, 1024).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(ref msg) if msg.contains("No 'photo'")));
    }

    #[tokio::test]
    async fn test_field_without_file_name_rejected() {
        let form = multipart(vec![Part {
            name: "photo",
            file_name: None,
            content_type: Some("image/jpeg"),
            data: vec![1, 2, 3],
        }])
        .await;
        let err = receive_photo(form, 1024).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_traversal_file_name_rejected() {
        let form = multipart(vec![photo("../escape.jpg", Some("image/jpeg"), 4)]).await;
        let err = receive_photo(form, 1024).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
