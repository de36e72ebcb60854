// Résumé intake: PDF text extraction, AI-backed skill and role extraction,
// and the upload handler that feeds the matching pipeline.

pub mod extractor;
pub mod handlers;
pub mod pdf;
pub mod prompts;
