pub mod hf;
pub mod traits;

pub use hf::HfInferenceClient;
pub use traits::{ChatMessage, ChatRequest, InferenceBackend, InferenceError};
