pub mod interpreter;
pub mod llm;
pub mod sse;
