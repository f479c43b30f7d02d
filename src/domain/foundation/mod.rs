//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, geometry and error types
//! that form the vocabulary of the allocation domain.

mod errors;
mod geometry;
mod ids;
mod variable;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use geometry::{BoundingBox, Point, Polygon};
pub use ids::AreaId;
pub use variable::Variable;
