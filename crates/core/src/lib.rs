//! Core library for leanform
//!
//! This crate implements the **Functional Core** of the leanform application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`leanform_core`** (this crate): prompt construction and reply parsing, zero I/O
//! - **`leanform`**: the completion client, CLI commands and MCP server (the Imperative Shell)
//!
//! Every function here takes text in and gives values out. The shell sends the
//! [`message::CompletionRequest`] values built here to a model and feeds the
//! replies back into the extraction functions.
//!
//! # Module Organization
//!
//! - [`kind`]: the closed set of Lean 4 declaration kinds
//! - [`message`]: chat messages and completion requests
//! - [`classify`]: "can this description be a Lean type, and which kind?"
//! - [`generate`]: "write the Lean definition for these components"
//!
//! # Reply parsing
//!
//! Model replies are free text. Both steps treat the expected shapes (a JSON
//! object, a fenced code block) as hints, try extraction strategies in a fixed
//! order, and fall back to a fixed payload when none applies:
//!
//! ```rust
//! use leanform_core::classify::classification_from_reply;
//! use leanform_core::kind::DeclarationKind;
//!
//! let reply = "```json\n{\"is_expressible\": true, \"lean4_type\": \"inductive\", \"confidence\": 0.95, \"reasoning\": \"recursive\"}\n```";
//! let result = classification_from_reply(reply);
//! assert_eq!(result.kind, Some(DeclarationKind::Inductive));
//!
//! let result = classification_from_reply("I am not sure.");
//! assert!(!result.is_expressible);
//! ```

pub mod classify;
pub mod generate;
pub mod kind;
pub mod message;
