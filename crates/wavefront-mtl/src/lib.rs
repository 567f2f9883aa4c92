//! Wavefront MTL material documents: in-memory model, reader, and writer.
//!
//! The reader interprets the statement stream of a `.mtl` file into an
//! [`MtlDocument`]; the writer emits a document back out as one fixed-order
//! attribute block per material. Color forms, illumination scalars, the full
//! texture-map option grammar, and leading-comment headers are preserved.

#![warn(missing_docs)]

mod document;
mod reader;
mod writer;

pub use document::{
    MapChannel, Material, MaterialColor, MaterialMap, MtlDocument, ReflectionMaps, ReflectionType,
};
pub use reader::{read_mtl, read_mtl_from_buffer, read_mtl_with_settings, MtlReadSettings};
pub use writer::{write_mtl, write_mtl_to_buffer};
