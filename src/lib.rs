pub mod clients;
pub mod config;
pub mod deserializers;
pub mod error;
pub mod interactive;
pub mod keyphrase;
pub mod processor;
pub mod prompts;
pub mod utils;

pub use keyphrase::{NO_KEYPHRASES, TaggedSpan, TaggingRecord, extract_keyphrases};
pub use processor::TextProcessor;
