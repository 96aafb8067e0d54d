use std::path::Path;

use tracing::warn;
use uuid::Uuid;

/// Largest accepted résumé file.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Request body limit for the upload route: the file plus multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;
/// Multipart field carrying the file.
pub const RESUME_FIELD: &str = "resume";
/// Public URL prefix uploaded files are served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Lowercased extension of `file_name` if it is an accepted résumé format.
pub fn allowed_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

/// Server-side name for a stored upload. Client file names are never used on disk.
pub fn stored_file_name(ext: &str) -> String {
    format!("{}.{ext}", Uuid::new_v4())
}

pub fn public_url(file_name: &str) -> String {
    format!("{UPLOADS_ROUTE}/{file_name}")
}

/// Best-effort text extraction for PDFs. Runs off the async workers; any
/// failure, including a panic inside the parser, yields `None`.
pub async fn extract_pdf_text(bytes: bytes::Bytes) -> Option<String> {
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;
    match result {
        Ok(Ok(text)) => {
            let text = text.trim().to_string();
            (!text.is_empty()).then_some(text)
        }
        Ok(Err(e)) => {
            warn!("PDF text extraction failed: {e}");
            None
        }
        Err(e) => {
            warn!("PDF text extraction aborted: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions_case_insensitive() {
        assert_eq!(allowed_extension("cv.pdf").as_deref(), Some("pdf"));
        assert_eq!(allowed_extension("CV.PDF").as_deref(), Some("pdf"));
        assert_eq!(allowed_extension("my.resume.Docx").as_deref(), Some("docx"));
        assert_eq!(allowed_extension("cv.doc").as_deref(), Some("doc"));
    }

    #[test]
    fn test_disallowed_extensions_rejected() {
        for name in ["cv.txt", "cv.exe", "cv", "pdf", "cv.pdf.sh", ""] {
            assert_eq!(allowed_extension(name), None, "{name}");
        }
    }

    #[test]
    fn test_stored_file_name_is_random_uuid() {
        let a = stored_file_name("pdf");
        let b = stored_file_name("pdf");
        assert_ne!(a, b);
        assert!(a.ends_with(".pdf"));
        assert!(Uuid::parse_str(a.trim_end_matches(".pdf")).is_ok());
    }

    #[test]
    fn test_public_url() {
        assert_eq!(public_url("x.pdf"), "/uploads/x.pdf");
    }

    #[tokio::test]
    async fn test_garbage_pdf_yields_none() {
        let text = extract_pdf_text(bytes::Bytes::from_static(b"not a pdf")).await;
        assert_eq!(text, None);
    }
}
