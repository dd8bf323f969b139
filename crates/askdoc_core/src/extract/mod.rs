use crate::error::AppError;

/// Extensions accepted by the upload endpoint.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "md", "log", "pdf"];

fn extension_of(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Extracts plain text from an uploaded file, dispatching on the file
/// extension. Container parsing beyond PDF is not carried here.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, AppError> {
    let ext = extension_of(filename)
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .ok_or_else(|| {
            AppError::new("UPLOAD_UNSUPPORTED_TYPE", "Unsupported file type")
                .with_details(format!("filename={filename}"))
        })?;

    match ext.as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            AppError::new("UPLOAD_EXTRACT_FAILED", "Failed to extract text from PDF")
                .with_details(e.to_string())
        }),
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}
