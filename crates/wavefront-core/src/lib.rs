#![warn(missing_docs)]

//! Shared foundations for the wavefront crates.
//!
//! Provides the plain value records (vectors, index triplets, curve ranges),
//! the common error type, and the line-continuation-aware tokenizer used by
//! both the `.obj` and `.mtl` statement interpreters.

mod error;
mod lexer;
mod types;

pub use error::WavefrontError;
pub use lexer::{LineReader, LogicalLine};
pub use types::{resolve_index, CurveIndex, Triplet, Vec3, Vec4, VertexColor};
