//! Wavefront OBJ geometry documents: in-memory model, reader, and writer.
//!
//! The reader interprets the statement stream of an `.obj` file into an
//! [`ObjDocument`]; the writer emits a document back out as a deterministic,
//! canonical statement sequence. Polygonal and free-form geometry, grouping
//! state, and render attributes are all preserved.

#![warn(missing_docs)]

mod document;
mod elements;
mod reader;
mod writer;

pub use document::{Group, ObjDocument, SurfaceConnection, Vertex};
pub use elements::{
    ApproximationTechnique, Curve, Curve2D, ElementAttributes, Face, FreeFormAttributes,
    FreeFormBody, FreeFormType, Line, Point, Surface,
};
pub use reader::{read_obj, read_obj_from_buffer};
pub use writer::{write_obj, write_obj_to_buffer};
