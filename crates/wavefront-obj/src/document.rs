//! In-memory model of a Wavefront OBJ geometry document.
//!
//! Elements live in six flat lists in creation order; groups hold per-kind
//! ordered lists of indices into those lists, so group/element membership is
//! many-to-many without ownership cycles.

use wavefront_core::{CurveIndex, Vec3, Vec4, VertexColor};

use crate::elements::{Curve, Curve2D, Face, Line, Point, Surface};

/// A geometric vertex (`v`), with its optional vertex color extension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position; `w` is 1.0 when omitted in the file.
    pub position: Vec4,
    /// Vertex color from the extended 6/7-numeric `v` form, if present.
    pub color: Option<VertexColor>,
}

impl Vertex {
    /// Create a colorless vertex with w = 1.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec4::new(x, y, z, 1.0),
            color: None,
        }
    }
}

/// A named group (`g`) holding ordered, per-kind element membership.
///
/// Indices are 0-based positions into the document's element lists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    /// Group name.
    pub name: String,
    /// Member points, in creation order.
    pub points: Vec<usize>,
    /// Member lines, in creation order.
    pub lines: Vec<usize>,
    /// Member faces, in creation order.
    pub faces: Vec<usize>,
    /// Member curves, in creation order.
    pub curves: Vec<usize>,
    /// Member 2D curves, in creation order.
    pub curves2d: Vec<usize>,
    /// Member surfaces, in creation order.
    pub surfaces: Vec<usize>,
}

impl Group {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A surface connection record (`con`): two surfaces joined along trimming
/// curves for continuity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConnection {
    /// 1-based index of the first surface.
    pub surface1: usize,
    /// Trimming curve range on the first surface.
    pub curve1: CurveIndex,
    /// 1-based index of the second surface.
    pub surface2: usize,
    /// Trimming curve range on the second surface.
    pub curve2: CurveIndex,
}

/// A complete OBJ geometry document.
///
/// Constructed empty, populated by the statement interpreter in a single
/// parse pass, and consumed immutably by the writer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjDocument {
    /// Geometric vertices (`v`), in file order.
    pub vertices: Vec<Vertex>,
    /// Parameter-space vertices (`vp`), in file order.
    pub parameter_vertices: Vec<Vec3>,
    /// Vertex normals (`vn`), in file order.
    pub normals: Vec<Vec3>,
    /// Texture vertices (`vt`), in file order.
    pub texture_vertices: Vec<Vec3>,

    /// Point elements, in creation order.
    pub points: Vec<Point>,
    /// Line elements, in creation order.
    pub lines: Vec<Line>,
    /// Face elements, in creation order.
    pub faces: Vec<Face>,
    /// Curve elements, in creation order.
    pub curves: Vec<Curve>,
    /// 2D curve elements, in creation order.
    pub curves2d: Vec<Curve2D>,
    /// Surface elements, in creation order.
    pub surfaces: Vec<Surface>,

    /// Named groups, in first-seen order. The reserved name `default` never
    /// appears here.
    pub groups: Vec<Group>,
    /// Membership of elements created in the default grouping context.
    pub default_group: Group,

    /// Merging-group resolutions keyed by group number, in first-recorded
    /// order. A number may be used by elements without an entry here.
    pub merging_resolutions: Vec<(i64, f32)>,

    /// Referenced material library names (`mtllib`), verbatim.
    pub material_libraries: Vec<String>,
    /// Referenced texture map library names (`maplib`), verbatim.
    pub map_libraries: Vec<String>,
    /// Shadow object file name (`shadow_obj`), verbatim.
    pub shadow_object: Option<String>,
    /// Ray-trace object file name (`trace_obj`), verbatim.
    pub trace_object: Option<String>,

    /// Surface connection records (`con`).
    pub connections: Vec<SurfaceConnection>,
}

impl ObjDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            default_group: Group::new("default"),
            ..Self::default()
        }
    }

    /// Look up a named group.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Membership of elements created while no named group was active.
    pub fn default_group(&self) -> &Group {
        &self.default_group
    }

    /// Look up a named group mutably, creating it at the end of the list if
    /// missing. The reserved name `default` resolves to the default group.
    pub(crate) fn group_mut(&mut self, name: &str) -> &mut Group {
        if name == "default" {
            return &mut self.default_group;
        }
        if let Some(i) = self.groups.iter().position(|g| g.name == name) {
            return &mut self.groups[i];
        }
        self.groups.push(Group::new(name));
        self.groups.last_mut().unwrap()
    }

    /// The recorded resolution for a merging group number, if any.
    pub fn merging_resolution(&self, number: i64) -> Option<f32> {
        self.merging_resolutions
            .iter()
            .find(|(n, _)| *n == number)
            .map(|&(_, r)| r)
    }

    /// Record or overwrite the resolution for a merging group number.
    pub(crate) fn set_merging_resolution(&mut self, number: i64, resolution: f32) {
        match self.merging_resolutions.iter_mut().find(|(n, _)| *n == number) {
            Some(entry) => entry.1 = resolution,
            None => self.merging_resolutions.push((number, resolution)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_lookup_creates_once() {
        let mut doc = ObjDocument::new();
        doc.group_mut("a").points.push(0);
        doc.group_mut("b");
        doc.group_mut("a").points.push(1);
        assert_eq!(doc.groups.len(), 2);
        assert_eq!(doc.group("a").unwrap().points, vec![0, 1]);
    }

    #[test]
    fn test_default_name_never_materializes() {
        let mut doc = ObjDocument::new();
        doc.group_mut("default").faces.push(0);
        assert!(doc.groups.is_empty());
        assert_eq!(doc.default_group().faces, vec![0]);
    }

    #[test]
    fn test_merging_resolution_overwrite() {
        let mut doc = ObjDocument::new();
        doc.set_merging_resolution(2, 0.5);
        doc.set_merging_resolution(3, 0.25);
        doc.set_merging_resolution(2, 0.75);
        assert_eq!(doc.merging_resolution(2), Some(0.75));
        assert_eq!(doc.merging_resolution(3), Some(0.25));
        assert_eq!(doc.merging_resolution(4), None);
        assert_eq!(doc.merging_resolutions.len(), 2);
    }
}
