//! Content generator adapters.

pub mod gemini;
pub mod template;

pub use gemini::GeminiGenerator;
pub use template::TemplateGenerator;
