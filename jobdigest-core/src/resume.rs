use crate::error::CoreError;
use crate::storage::{Storage, StorageLocation};
use tracing::info;

/// Reads the candidate resume as plain text. PDF resumes go through text
/// extraction; anything else is read as UTF-8.
pub async fn read_resume(
    storage: &Storage,
    location: &StorageLocation,
) -> Result<String, CoreError> {
    let text = if is_pdf(location) {
        let bytes = storage.read_bytes(location).await?;
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| CoreError::InvalidInput {
            message: format!("Failed to extract text from resume {}: {}", location, e),
        })?
    } else {
        storage.read_to_string(location).await?
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(CoreError::InvalidInput {
            message: format!("Resume at {} is empty", location),
        });
    }
    info!("Read resume from {} ({} characters)", location, text.len());
    Ok(text)
}

fn is_pdf(location: &StorageLocation) -> bool {
    match location {
        StorageLocation::Local(path) => path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false),
        StorageLocation::Object { key, .. } => key.to_ascii_lowercase().ends_with(".pdf"),
    }
}
