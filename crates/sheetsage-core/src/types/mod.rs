//! Core data types.

pub mod completion;
pub mod relation;
pub mod value;

pub use completion::{
    ChatMessage, CompletionChoice, CompletionRequest, CompletionResponse, Role, Usage,
};
pub use relation::{Column, Relation};
pub use value::Value;
