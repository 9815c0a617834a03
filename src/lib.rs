//! Docwright — write-model translation for document mappers.
//!
//! Turns tracked entity entries (added / modified / deleted) into
//! store-agnostic insert, conditional-update, and conditional-delete
//! operations with optimistic-concurrency filters.

pub mod batch;
pub mod descriptor;
pub mod entry;
mod error;
pub mod filter;
pub mod metrics;
pub mod path;
pub mod selector;
pub mod tokens;
pub mod values;
pub mod write_model;

pub use entry::{EntityState, TrackedEntry};
pub use error::{Error, Result};
pub use write_model::{WriteModel, WriteOperation};

pub mod prelude {
    pub use crate::{
        batch::WriteBatch,
        descriptor::{EntityDescriptor, Model},
        selector::TranslatorSelector,
        values::ValueGeneratorRegistry,
        EntityState, Error, Result, TrackedEntry, WriteModel, WriteOperation,
    };
}
