//! Collaborator trait seams: persistence and content expansion.

pub mod expand;
pub mod store;

pub use expand::{Expander, NoopExpander};
pub use store::PostStore;
