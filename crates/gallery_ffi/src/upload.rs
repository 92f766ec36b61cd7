//! Drawing upload checks run before a drawing path is recorded.
//!
//! # Invariants
//! - Both the size check and the type check run; every failure is reported.

/// Largest accepted drawing file.
pub(crate) const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const ACCEPTED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

pub(crate) const TOO_LARGE_MESSAGE: &str = "File is too large. Maximum size is 5MB.";
pub(crate) const UNSUPPORTED_TYPE_MESSAGE: &str =
    "Unsupported file type. Please upload an image (JPEG, PNG, GIF, WebP).";

/// Returns the user-facing problems with an upload; empty when acceptable.
pub(crate) fn upload_problems(mime_type: &str, size_bytes: u64) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if size_bytes > MAX_UPLOAD_BYTES {
        problems.push(TOO_LARGE_MESSAGE);
    }
    let mime_type = mime_type.trim().to_ascii_lowercase();
    if !ACCEPTED_MIME_TYPES.contains(&mime_type.as_str()) {
        problems.push(UNSUPPORTED_TYPE_MESSAGE);
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::{upload_problems, MAX_UPLOAD_BYTES, TOO_LARGE_MESSAGE, UNSUPPORTED_TYPE_MESSAGE};

    #[test]
    fn accepts_images_up_to_the_limit() {
        assert!(upload_problems("image/png", MAX_UPLOAD_BYTES).is_empty());
        assert!(upload_problems(" IMAGE/WEBP ", 1).is_empty());
    }

    #[test]
    fn reports_size_and_type_independently() {
        assert_eq!(
            upload_problems("image/jpeg", MAX_UPLOAD_BYTES + 1),
            vec![TOO_LARGE_MESSAGE]
        );
        assert_eq!(
            upload_problems("application/pdf", 10),
            vec![UNSUPPORTED_TYPE_MESSAGE]
        );
        assert_eq!(upload_problems("image/bmp", u64::MAX).len(), 2);
    }
}
