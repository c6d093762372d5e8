use serde::Serialize;
use thiserror::Error;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;

/// 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * MIB;

pub const ACCEPTED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("Please upload a PDF, DOC, or DOCX file.")]
    UnsupportedType,

    #[error("File size must be less than {}.", format_size(.max_bytes))]
    TooLarge { max_bytes: u64 },
}

/// Largest exact unit: `10MB`, `512KB`, otherwise plain bytes.
fn format_size(bytes: &u64) -> String {
    match *bytes {
        0 => "0 bytes".to_string(),
        b if b % MIB == 0 => format!("{}MB", b / MIB),
        b if b % KIB == 0 => format!("{}KB", b / KIB),
        b => format!("{b} bytes"),
    }
}

/// Type is checked before size. `content_type` may carry parameters
/// (`application/pdf; name=cv.pdf`); only the essence is compared.
pub fn validate_upload(
    content_type: Option<&str>,
    size: u64,
    max_bytes: u64,
) -> Result<(), UploadRejection> {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match essence.as_deref() {
        Some(mime) if ACCEPTED_MIME_TYPES.contains(&mime) => {}
        _ => return Err(UploadRejection::UnsupportedType),
    }

    if size > max_bytes {
        return Err(UploadRejection::TooLarge { max_bytes });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Accepted,
    Rejected,
}

/// Accept/reject report with the notification texts shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub status: UploadStatus,
    pub title: String,
    pub description: String,
    pub file_name: Option<String>,
    pub size_bytes: u64,
}

impl UploadReport {
    pub fn accepted(file_name: Option<String>, size_bytes: u64) -> Self {
        let shown = file_name.as_deref().unwrap_or("Your resume");
        Self {
            status: UploadStatus::Accepted,
            title: "Resume Uploaded Successfully!".to_string(),
            description: format!(
                "{shown} is ready for review. Our recruitment team will review your qualifications and get back to you soon."
            ),
            file_name,
            size_bytes,
        }
    }

    pub fn rejected(file_name: Option<String>, size_bytes: u64, reason: &UploadRejection) -> Self {
        Self {
            status: UploadStatus::Rejected,
            title: "Upload Failed".to_string(),
            description: reason.to_string(),
            file_name,
            size_bytes,
        }
    }
}
