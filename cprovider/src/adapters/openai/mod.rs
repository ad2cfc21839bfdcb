mod provider;
mod serde_api;
mod transport;
mod types;

pub use provider::{OPENAI_DEFAULT_MODEL, OpenAiProvider};
pub use transport::{OPENAI_DEFAULT_BASE_URL, OpenAiHttpTransport, OpenAiTransport};
pub use types::{OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiRole};
