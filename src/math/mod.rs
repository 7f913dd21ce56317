//! Integer block-space math

pub mod bounds;
pub mod rotation;

pub use bounds::BlockBounds;
