use actix_multipart::form::{MultipartForm, tempfile::TempFile};

use crate::forms::FormError;
use crate::specs::FieldErrors;

/// Largest accepted product image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(MultipartForm)]
pub struct UploadImageForm {
    #[multipart(limit = "5MB")]
    pub image: TempFile,
}

/// File extension for an uploaded image, derived from its declared content
/// type. Anything that is not `image/*` is rejected.
pub fn image_extension(file: &TempFile) -> Result<&'static str, FormError> {
    let mut errors = FieldErrors::new();

    if file.size > MAX_IMAGE_BYTES {
        errors.add("image", "The image may not be greater than 5 MB.");
        return Err(errors.into());
    }

    let Some(content_type) = &file.content_type else {
        errors.add("image", "The image must be an image file.");
        return Err(errors.into());
    };
    // SVG may carry script and is served from our own origin.
    if content_type.type_().as_str() != "image" || content_type.subtype().as_str() == "svg" {
        errors.add("image", "The image must be an image file.");
        return Err(errors.into());
    }

    Ok(match content_type.subtype().as_str() {
        "jpeg" | "jpg" | "pjpeg" => "jpg",
        "png" => "png",
        "gif" => "gif",
        "webp" => "webp",
        "avif" => "avif",
        _ => "img",
    })
}
