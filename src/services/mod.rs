pub mod classifier;
pub mod conversation;
pub mod extractor;
pub mod responder;
pub mod scheduling;
pub mod templates;
pub mod text;
