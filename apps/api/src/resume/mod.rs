// Resume upload: accepts a single PDF/DOC/DOCX file up to the configured size.
// Independent of the questionnaire; the file is inspected and dropped, never stored.

pub mod handlers;
pub mod upload;
