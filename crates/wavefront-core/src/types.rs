//! Plain value records shared by the geometry and material crates.
//!
//! These are immutable data carriers with no behavior of their own; the
//! statement interpreters and writers give them meaning.

use serde::{Deserialize, Serialize};

/// 3-component vector with f32 components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// 4-component vector with f32 components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W component (weight), 1.0 when omitted in the file.
    pub w: f32,
}

impl Vec4 {
    /// Create a new Vec4.
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Vec4 {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

/// An RGB color with an optional alpha component, as carried by extended
/// `v x y z r g b [a]` statements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexColor {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha component, absent in the 6-numeric form.
    pub alpha: Option<f32>,
}

/// A (vertex, texture, normal) index reference used by point, line, face,
/// and surface elements.
///
/// Indices are 1-based into the corresponding vertex pools; negative indices
/// in the source file are resolved at parse time, so a stored triplet always
/// holds positive indices. Texture and normal parts are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triplet {
    /// 1-based index into the geometric vertex pool.
    pub vertex: usize,
    /// 1-based index into the texture vertex pool, if referenced.
    pub texture: Option<usize>,
    /// 1-based index into the vertex normal pool, if referenced.
    pub normal: Option<usize>,
}

impl Triplet {
    /// Create a triplet referencing only a geometric vertex.
    pub fn vertex_only(vertex: usize) -> Self {
        Self {
            vertex,
            texture: None,
            normal: None,
        }
    }
}

/// A parameter range on a 2D curve, used by trimming loops, holes, sequence
/// curves, and surface connections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveIndex {
    /// Starting parameter value.
    pub start: f32,
    /// Ending parameter value.
    pub end: f32,
    /// 1-based index into the document's 2D curve list.
    pub curve2d: usize,
}

/// Resolve a 1-based (positive) or end-relative (negative) file index against
/// a pool of `len` entries.
///
/// Returns the equivalent 1-based positive index, or `None` when the index is
/// zero or falls outside the pool.
pub fn resolve_index(index: i64, len: usize) -> Option<usize> {
    if index > 0 {
        let i = index as usize;
        (i <= len).then_some(i)
    } else if index < 0 {
        let back = index.unsigned_abs() as usize;
        (back <= len).then(|| len - back + 1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_forward() {
        assert_eq!(resolve_index(1, 3), Some(1));
        assert_eq!(resolve_index(3, 3), Some(3));
        assert_eq!(resolve_index(4, 3), None);
    }

    #[test]
    fn test_resolve_backward() {
        assert_eq!(resolve_index(-1, 3), Some(3));
        assert_eq!(resolve_index(-3, 3), Some(1));
        assert_eq!(resolve_index(-4, 3), None);
    }

    #[test]
    fn test_resolve_zero_and_empty() {
        assert_eq!(resolve_index(0, 3), None);
        assert_eq!(resolve_index(1, 0), None);
        assert_eq!(resolve_index(-1, 0), None);
    }

    #[test]
    fn test_triplet_serde_roundtrip() {
        let triplet = Triplet {
            vertex: 3,
            texture: Some(1),
            normal: None,
        };
        let json = serde_json::to_string(&triplet).unwrap();
        let back: Triplet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, triplet);
    }

    #[test]
    fn test_vertex_color_serde_roundtrip() {
        let color = VertexColor {
            r: 0.1,
            g: 0.2,
            b: 0.3,
            alpha: Some(0.5),
        };
        let json = serde_json::to_string(&color).unwrap();
        let back: VertexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }
}
