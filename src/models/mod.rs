//! Data models for tasklist
//!
//! Core abstractions:
//! - Todo: one line of text that can be ticked off
//! - `TodoPatch`: a partial update to a todo

pub mod todo;

pub use todo::{Todo, TodoPatch, format_timestamp, serialize_timestamp};
