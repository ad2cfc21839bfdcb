mod provider;
mod serde_api;
mod transport;
mod types;

pub use provider::{GEMINI_DEFAULT_MODEL, GeminiProvider};
pub use transport::{GEMINI_DEFAULT_BASE_URL, GeminiHttpTransport, GeminiTransport};
pub use types::{GeminiContent, GeminiRequest, GeminiResponse, GeminiRole};
