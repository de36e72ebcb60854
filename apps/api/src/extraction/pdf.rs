//! PDF text extraction. A thin boundary wrapper around `pdf-extract`, run on
//! the blocking pool since extraction is CPU-bound.

use anyhow::anyhow;

use crate::errors::AppError;

pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow!("PDF extraction task panicked: {e}")))?
        .map_err(|e| AppError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(AppError::Pdf(
            "Document contains no extractable text".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_are_a_pdf_error() {
        let result = extract_pdf_text(b"definitely not a pdf".to_vec()).await;
        assert!(matches!(result, Err(AppError::Pdf(_))));
    }

    #[tokio::test]
    async fn test_empty_input_is_a_pdf_error() {
        let result = extract_pdf_text(Vec::new()).await;
        assert!(matches!(result, Err(AppError::Pdf(_))));
    }
}
