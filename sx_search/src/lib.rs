//! # sx_search
//!
//! Rate-limited pagination over the search API with a bounded top-K ranking

pub mod error;
pub mod filter;
pub mod orchestrator;
pub mod topk;

pub use error::Result;
pub use error::SearchError;
pub use filter::Filter;
pub use filter::Unanswered;
pub use orchestrator::Orchestrator;
pub use orchestrator::RunSummary;
pub use topk::TopKSet;
pub use topk::TopQuestions;
pub use topk::TOP_K;
