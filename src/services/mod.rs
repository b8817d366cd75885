pub mod analysis;
pub mod csv;
pub mod llm_client;
pub mod prompt;
pub mod tokens;
