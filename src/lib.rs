pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::ai_service::AiService;
pub use domain::rotation::{CallOutcome, Degraded, Dispatcher, KeyPool};
pub use infra::gemini::{GeminiClient, GenerateRequest, Generation, InlineImage, LanguageModel};
pub use storage::catalog::CatalogStore;
