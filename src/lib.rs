//! Schema Compatibility Checker
//!
//! Checks whether an evolved Avro record schema remains compatible with its
//! previous version under a declared compatibility contract (BACKWARD,
//! FORWARD, FULL, or NONE), the way a schema registry gates producer and
//! consumer upgrades in an event-streaming pipeline.
//!
//! ## Features
//!
//! - **Recursive Diffing**: Walks arbitrarily nested record definitions,
//!   classifying every field change as added/removed/modified and
//!   mandatory/optional
//! - **Cycle Safe**: Self-referential named types are handled as a graph
//!   traversal with a visited set, never as unbounded tree recursion
//! - **Mode-Aware Rules**: Evolution rules differ per compatibility mode,
//!   with a conservative default for unrecognized modes
//! - **Registry Integration**: Resolves the subject's mode from a schema
//!   registry, with bounded timeouts and a configured fallback
//! - **Actionable Verdicts**: Errors enumerate offending field paths and
//!   come with suggestions for the mode that would permit the change
//!
//! ## Pipeline
//!
//! ```text
//! old.avsc ─┐
//!           ├─ loader ─► SchemaDocument ─┐
//! new.avsc ─┘                            ├─ FieldDiffer ─► ChangeSet ─┐
//!                                        │                            ├─ evaluate ─► Verdict
//!                    registry/config ─► CompatibilityMode ────────────┘
//! ```

pub mod compatibility;
pub mod config;
pub mod diff;
pub mod error;
pub mod loader;
pub mod registry;
pub mod report;
pub mod schema;
pub mod verdict;

pub use compatibility::{
    evaluate, CheckReport, CompatibilityChecker, CompatibilityMode, Evaluation, MetadataDelta,
};
pub use config::CheckerConfig;
pub use diff::{ChangeSet, FieldDiffer, Modification, ModificationKind};
pub use error::{CompatError, Result};
pub use loader::{load_schema, parse_document};
pub use registry::RegistryClient;
pub use schema::{Field, FieldOrder, Schema, SchemaDocument, SchemaKind, TypeTable};
pub use verdict::Verdict;
