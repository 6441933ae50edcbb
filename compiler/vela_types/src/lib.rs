//! Type system for the Vela compiler.
//!
//! Two pieces:
//! - [`Pool`]: hash-consed storage for type descriptors, referenced by
//!   [`Idx`] handles. Equal structure means equal index; nominal types key
//!   on their defining declaration.
//! - [`TypeTable`]: the per-AST-node type record filled in by the
//!   type-check pass.

mod display;
mod flags;
mod idx;
mod pool;
mod table;

pub use flags::TypeFlags;
pub use idx::Idx;
pub use pool::{Pool, Tag};
pub use table::TypeTable;
