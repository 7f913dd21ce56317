//! Typed block model: identifiers, state properties, protection policy

pub mod protected;
pub mod spec;

pub use protected::{is_protected, is_protected_spec};
pub use spec::{BlockId, BlockKind, BlockSpec, Property};
