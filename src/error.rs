use axum::http::StatusCode;

/// Every way an analysis request can fail. Each variant maps to one status
/// code and one fixed message for the caller; the inner detail is only logged.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("no image file in upload")]
    NoImage,
    #[error("image field has an empty filename")]
    NoFileSelected,
    #[error("file type not allowed: {0:?}")]
    InvalidFileType(String),
    #[error("image could not be decoded: {0}")]
    UndecodableImage(#[source] image::ImageError),
    #[error("multipart body could not be read: {0}")]
    MalformedUpload(String),
    #[error("upload exceeds the {limit_bytes} byte limit")]
    PayloadTooLarge { limit_bytes: usize },
    #[error("vision model call failed: {0:#}")]
    Model(anyhow::Error),
    #[error("unexpected error: {0:#}")]
    Internal(anyhow::Error),
}

impl AnalyzeError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalyzeError::NoImage
            | AnalyzeError::NoFileSelected
            | AnalyzeError::InvalidFileType(_)
            | AnalyzeError::UndecodableImage(_)
            | AnalyzeError::MalformedUpload(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AnalyzeError::Model(_) | AnalyzeError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AnalyzeError::NoImage => "No image file provided".to_string(),
            AnalyzeError::NoFileSelected => "No file selected".to_string(),
            AnalyzeError::InvalidFileType(_) => {
                "Invalid file type. Please upload an image file (PNG, JPG, JPEG, GIF, BMP, WebP)"
                    .to_string()
            }
            AnalyzeError::UndecodableImage(_) => {
                "Error processing image. Please ensure the file is a valid image.".to_string()
            }
            AnalyzeError::MalformedUpload(_) => {
                "Could not read the uploaded form data. Please try again.".to_string()
            }
            AnalyzeError::PayloadTooLarge { limit_bytes } => format!(
                "File too large. Please upload an image smaller than {}MB.",
                limit_bytes / (1024 * 1024)
            ),
            AnalyzeError::Model(_) => "Error analyzing image. Please try again.".to_string(),
            AnalyzeError::Internal(_) => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }
}
