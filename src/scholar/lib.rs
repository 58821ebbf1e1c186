//! # Scholar Architecture
//!
//! Scholar is a **personal bibliography library** with a command-line client. The
//! library keeps one directory per reference, holding the entry as YAML next to
//! any attached files, and speaks bibtex/biblatex on the way in and out.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Sets up logging; the only place that knows exit codes    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (name=value args, DOI lookups)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - add, import, export, attach, edit, remove …              │
//! │  - Returns CmdResult, never prints                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (catalog, model, key, validate, bibtex)               │
//! │  Storage (store/): Library trait, FileStore, InMemoryStore  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry Lifecycle
//!
//! An [`model::Entry`] is scaffolded from its [`catalog::EntryType`], filled from
//! raw fields (bibtex, Crossref, command line), then committed: the type is
//! checked, required fields are [`validate`]d, a citation key is
//! [`key::generate_key`]d if none was given, and the store picks the first free
//! variant of that key. Nothing invalid is ever written.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`catalog`]: Entry type schemas
//! - [`model`]: The `Entry` record
//! - [`key`]: Citation key generation
//! - [`validate`]: Required-field and type checks
//! - [`bibtex`]: Rendering and parsing bibtex text
//! - [`doi`]: Crossref lookups
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: Configuration management
//! - [`init`]: Builds the context the CLI runs in
//! - [`editor`]: External editor and file opener
//! - [`error`]: Error types

pub mod api;
pub mod bibtex;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod doi;
pub mod editor;
pub mod error;
pub mod init;
pub mod key;
pub mod model;
pub mod store;
pub mod validate;
