//! Turn a file dropped on the page into an inline image attachment.

use base64::Engine;
use tutor_types::{message::ImageAttachment, Result, TutorError};

/// Best guess at an image MIME type from the file name.
pub fn guess_image_mime(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Build an attachment from raw bytes. `mime` wins over the file extension when given.
pub fn image_attachment(file_name: &str, mime: Option<&str>, bytes: &[u8]) -> Result<ImageAttachment> {
    if bytes.is_empty() {
        return Err(TutorError::Other(format!("{} is empty", file_name)));
    }
    let mime_type = mime
        .filter(|m| m.starts_with("image/"))
        .or_else(|| guess_image_mime(file_name))
        .ok_or_else(|| TutorError::Other(format!("{} is not an image", file_name)))?;

    Ok(ImageAttachment {
        mime_type: mime_type.to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
        preview: file_name.to_string(),
    })
}
