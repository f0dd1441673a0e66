//! # treerag — hierarchical context-tree RAG demo
//!
//! Retrieval-augmented generation over a small content-addressed corpus,
//! where each retrieval hit is expanded with its position in a hand-authored
//! topic hierarchy (taxonomy path plus sibling topics) before the prompt is
//! assembled and handed to a language model.
//!
//! ## Architecture
//!
//! - **[`config`]** — JSON configuration, env-sourced credentials
//! - **[`corpus`]** — content-hashed passages (`hash → text` mapping)
//! - **[`dataset`]** — built-in demo passages and their taxonomy
//! - **[`hierarchy`]** — the core: validated topic tree, `hash → path` index,
//!   broader-context aggregation
//! - **[`embedder`]** — embedding boundary + deterministic demo embedder
//! - **[`retriever`]** — retrieval boundary + SQLite/sqlite-vec store
//! - **[`generator`]** — generation boundary + Groq chat-completions client
//! - **[`expander`]** — retrieval hit → {passage, path, broader context}
//! - **[`prompt`]** — deterministic prompt rendering
//! - **[`pipeline`]** — retrieve → expand → assemble → generate → truncate

pub mod config;
pub mod corpus;
pub mod dataset;
pub mod embedder;
pub mod expander;
pub mod generator;
pub mod hierarchy;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
