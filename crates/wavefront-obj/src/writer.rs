//! OBJ writer: emits the canonical statement sequence for a document.
//!
//! The writer is total over well-formed documents. Statement order is fixed:
//! library references, shadow/trace objects, the four vertex pools, then the
//! six element lists (points, lines, faces, curves, 2D curves, surfaces),
//! then surface connections. Render-attribute statements are run-length
//! compressed across the whole document: one is emitted only when its value
//! differs from the value last emitted for any element. Free-form attribute
//! blocks are emitted in full before each defining statement.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use wavefront_core::{CurveIndex, Triplet, WavefrontError};

use crate::document::{ObjDocument, Vertex};
use crate::elements::{
    ApproximationTechnique, ElementAttributes, FreeFormAttributes, FreeFormBody,
};

/// Write an OBJ document to a file path.
pub fn write_obj(doc: &ObjDocument, path: impl AsRef<Path>) -> Result<(), WavefrontError> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    doc.write_to(&mut out)?;
    out.flush()?;
    Ok(())
}

/// Write an OBJ document to an in-memory buffer.
pub fn write_obj_to_buffer(doc: &ObjDocument) -> Result<Vec<u8>, WavefrontError> {
    let mut out = Vec::new();
    doc.write_to(&mut out)?;
    Ok(out)
}

impl ObjDocument {
    /// Write the canonical statement sequence to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(), WavefrontError> {
        ObjWriter {
            doc: self,
            out,
            state: ElementAttributes::default(),
        }
        .write_document()
    }
}

/// Fixed 6-decimal representation used for every real-valued field.
fn fixed(value: f32) -> String {
    format!("{value:.6}")
}

fn triplet(t: &Triplet) -> String {
    match (t.texture, t.normal) {
        (None, None) => format!("{}", t.vertex),
        (Some(tx), None) => format!("{}/{}", t.vertex, tx),
        (None, Some(n)) => format!("{}//{}", t.vertex, n),
        (Some(tx), Some(n)) => format!("{}/{}/{}", t.vertex, tx, n),
    }
}

struct ObjWriter<'a, W> {
    doc: &'a ObjDocument,
    out: &'a mut W,
    state: ElementAttributes,
}

impl<W: Write> ObjWriter<'_, W> {
    fn write_document(&mut self) -> Result<(), WavefrontError> {
        let doc = self.doc;
        for name in &doc.material_libraries {
            writeln!(self.out, "mtllib {name}")?;
        }
        for name in &doc.map_libraries {
            writeln!(self.out, "maplib {name}")?;
        }
        if let Some(name) = &doc.shadow_object {
            writeln!(self.out, "shadow_obj {name}")?;
        }
        if let Some(name) = &doc.trace_object {
            writeln!(self.out, "trace_obj {name}")?;
        }

        for vertex in &doc.vertices {
            self.write_vertex(vertex)?;
        }
        for v in &doc.parameter_vertices {
            writeln!(self.out, "vp {} {} {}", fixed(v.x), fixed(v.y), fixed(v.z))?;
        }
        for v in &doc.normals {
            writeln!(self.out, "vn {} {} {}", fixed(v.x), fixed(v.y), fixed(v.z))?;
        }
        for v in &doc.texture_vertices {
            writeln!(self.out, "vt {} {} {}", fixed(v.x), fixed(v.y), fixed(v.z))?;
        }

        for point in &doc.points {
            self.write_attributes(&point.attributes)?;
            writeln!(self.out, "p {}", join_triplets(&point.vertices))?;
        }
        for line in &doc.lines {
            self.write_attributes(&line.attributes)?;
            writeln!(self.out, "l {}", join_triplets(&line.vertices))?;
        }
        for face in &doc.faces {
            self.write_attributes(&face.attributes)?;
            writeln!(self.out, "f {}", join_triplets(&face.vertices))?;
        }
        for curve in &doc.curves {
            self.write_attributes(&curve.attributes)?;
            self.write_free_form(&curve.free_form, false)?;
            writeln!(
                self.out,
                "curv {} {} {}",
                fixed(curve.start),
                fixed(curve.end),
                join_indices(&curve.vertices)
            )?;
            self.write_body(&curve.body)?;
        }
        for curve in &doc.curves2d {
            self.write_attributes(&curve.attributes)?;
            self.write_free_form(&curve.free_form, false)?;
            writeln!(self.out, "curv2 {}", join_indices(&curve.vertices))?;
            self.write_body(&curve.body)?;
        }
        for surface in &doc.surfaces {
            self.write_attributes(&surface.attributes)?;
            self.write_free_form(&surface.free_form, true)?;
            writeln!(
                self.out,
                "surf {} {} {} {} {}",
                fixed(surface.start_u),
                fixed(surface.end_u),
                fixed(surface.start_v),
                fixed(surface.end_v),
                join_triplets(&surface.vertices)
            )?;
            self.write_body(&surface.body)?;
        }

        for con in &doc.connections {
            writeln!(
                self.out,
                "con {} {} {} {} {} {} {} {}",
                con.surface1,
                fixed(con.curve1.start),
                fixed(con.curve1.end),
                con.curve1.curve2d,
                con.surface2,
                fixed(con.curve2.start),
                fixed(con.curve2.end),
                con.curve2.curve2d,
            )?;
        }
        Ok(())
    }

    fn write_vertex(&mut self, vertex: &Vertex) -> Result<(), WavefrontError> {
        let p = vertex.position;
        match vertex.color {
            Some(color) => {
                write!(
                    self.out,
                    "v {} {} {} {} {} {}",
                    fixed(p.x),
                    fixed(p.y),
                    fixed(p.z),
                    fixed(color.r),
                    fixed(color.g),
                    fixed(color.b)
                )?;
                if let Some(alpha) = color.alpha {
                    write!(self.out, " {}", fixed(alpha))?;
                }
                writeln!(self.out)?;
            }
            None if p.w != 1.0 => {
                writeln!(
                    self.out,
                    "v {} {} {} {}",
                    fixed(p.x),
                    fixed(p.y),
                    fixed(p.z),
                    fixed(p.w)
                )?;
            }
            None => {
                writeln!(self.out, "v {} {} {}", fixed(p.x), fixed(p.y), fixed(p.z))?;
            }
        }
        Ok(())
    }

    /// Emit the render-attribute statements whose value differs from the
    /// value emitted for the previous element of any kind.
    fn write_attributes(&mut self, attrs: &ElementAttributes) -> Result<(), WavefrontError> {
        if attrs.groups != self.state.groups {
            if attrs.groups.is_empty() {
                writeln!(self.out, "g default")?;
            } else {
                writeln!(self.out, "g {}", attrs.groups.join(" "))?;
            }
        }
        if attrs.smoothing_group != self.state.smoothing_group {
            if attrs.smoothing_group == 0 {
                writeln!(self.out, "s off")?;
            } else {
                writeln!(self.out, "s {}", attrs.smoothing_group)?;
            }
        }
        if attrs.merging_group != self.state.merging_group {
            if attrs.merging_group == 0 {
                writeln!(self.out, "mg off")?;
            } else {
                match self.doc.merging_resolution(attrs.merging_group) {
                    Some(res) => {
                        writeln!(self.out, "mg {} {}", attrs.merging_group, fixed(res))?;
                    }
                    None => writeln!(self.out, "mg {}", attrs.merging_group)?,
                }
            }
        }
        if attrs.object_name != self.state.object_name {
            match &attrs.object_name {
                Some(name) => writeln!(self.out, "o {name}")?,
                None => writeln!(self.out, "o")?,
            }
        }
        if attrs.level_of_detail != self.state.level_of_detail {
            writeln!(self.out, "lod {}", attrs.level_of_detail)?;
        }
        if attrs.map_name != self.state.map_name {
            match &attrs.map_name {
                Some(name) => writeln!(self.out, "usemap {name}")?,
                None => writeln!(self.out, "usemap off")?,
            }
        }
        if attrs.material_name != self.state.material_name {
            match &attrs.material_name {
                Some(name) => writeln!(self.out, "usemtl {name}")?,
                None => writeln!(self.out, "usemtl off")?,
            }
        }
        if attrs.bevel_interpolation != self.state.bevel_interpolation {
            writeln!(self.out, "bevel {}", on_off(attrs.bevel_interpolation))?;
        }
        if attrs.color_interpolation != self.state.color_interpolation {
            writeln!(self.out, "c_interp {}", on_off(attrs.color_interpolation))?;
        }
        if attrs.dissolve_interpolation != self.state.dissolve_interpolation {
            writeln!(self.out, "d_interp {}", on_off(attrs.dissolve_interpolation))?;
        }
        self.state = attrs.clone();
        Ok(())
    }

    /// Emit the free-form attribute block, always in full, immediately
    /// before a defining `curv`/`curv2`/`surf` statement.
    fn write_free_form(
        &mut self,
        ff: &FreeFormAttributes,
        surface: bool,
    ) -> Result<(), WavefrontError> {
        if let Some(curve_type) = ff.curve_type {
            if ff.rational {
                writeln!(self.out, "cstype rat {}", curve_type.keyword())?;
            } else {
                writeln!(self.out, "cstype {}", curve_type.keyword())?;
            }
        }
        if let Some(u) = ff.degree_u {
            match ff.degree_v {
                Some(v) => writeln!(self.out, "deg {u} {v}")?,
                None => writeln!(self.out, "deg {u}")?,
            }
        }
        if !ff.basis_matrix_u.is_empty() {
            writeln!(self.out, "bmat u {}", join_fixed(&ff.basis_matrix_u))?;
        }
        if !ff.basis_matrix_v.is_empty() {
            writeln!(self.out, "bmat v {}", join_fixed(&ff.basis_matrix_v))?;
        }
        if let Some(u) = ff.step_u {
            match ff.step_v {
                Some(v) => writeln!(self.out, "step {} {}", fixed(u), fixed(v))?,
                None => writeln!(self.out, "step {}", fixed(u))?,
            }
        }
        if surface {
            if let Some(technique) = ff.surface_technique {
                match technique {
                    ApproximationTechnique::ConstantParametric { u, v } => {
                        writeln!(self.out, "stech cparma {} {}", fixed(u), fixed(v))?;
                    }
                    ApproximationTechnique::ConstantSpatial { length } => {
                        writeln!(self.out, "stech cspace {}", fixed(length))?;
                    }
                    ApproximationTechnique::CurvatureDependent { distance, angle } => {
                        writeln!(self.out, "stech curv {} {}", fixed(distance), fixed(angle))?;
                    }
                }
            }
        } else if let Some(technique) = ff.curve_technique {
            match technique {
                ApproximationTechnique::ConstantParametric { u, .. } => {
                    writeln!(self.out, "ctech cparm {}", fixed(u))?;
                }
                ApproximationTechnique::ConstantSpatial { length } => {
                    writeln!(self.out, "ctech cspace {}", fixed(length))?;
                }
                ApproximationTechnique::CurvatureDependent { distance, angle } => {
                    writeln!(self.out, "ctech curv {} {}", fixed(distance), fixed(angle))?;
                }
            }
        }
        Ok(())
    }

    /// Emit the body statements of a free-form element, closed by `end` when
    /// any were emitted.
    fn write_body(&mut self, body: &FreeFormBody) -> Result<(), WavefrontError> {
        if body.is_empty() {
            return Ok(());
        }
        if !body.parameters_u.is_empty() {
            writeln!(self.out, "parm u {}", join_fixed(&body.parameters_u))?;
        }
        if !body.parameters_v.is_empty() {
            writeln!(self.out, "parm v {}", join_fixed(&body.parameters_v))?;
        }
        if !body.outer_trims.is_empty() {
            writeln!(self.out, "trim {}", join_curve_indices(&body.outer_trims))?;
        }
        if !body.inner_trims.is_empty() {
            writeln!(self.out, "hole {}", join_curve_indices(&body.inner_trims))?;
        }
        if !body.sequence_curves.is_empty() {
            writeln!(self.out, "scrv {}", join_curve_indices(&body.sequence_curves))?;
        }
        if !body.special_points.is_empty() {
            writeln!(self.out, "sp {}", join_indices(&body.special_points))?;
        }
        writeln!(self.out, "end")?;
        Ok(())
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn join_triplets(triplets: &[Triplet]) -> String {
    triplets.iter().map(triplet).collect::<Vec<_>>().join(" ")
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_fixed(values: &[f32]) -> String {
    values.iter().map(|v| fixed(*v)).collect::<Vec<_>>().join(" ")
}

fn join_curve_indices(curves: &[CurveIndex]) -> String {
    curves
        .iter()
        .map(|c| format!("{} {} {}", fixed(c.start), fixed(c.end), c.curve2d))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_obj_from_buffer;

    fn roundtrip(input: &str) -> (ObjDocument, String) {
        let doc = read_obj_from_buffer(input.as_bytes()).unwrap();
        let bytes = write_obj_to_buffer(&doc).unwrap();
        (doc, String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_empty_document_writes_nothing() {
        let doc = ObjDocument::new();
        assert!(write_obj_to_buffer(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_fixed_decimal_formatting() {
        let (_, text) = roundtrip("v 1 2 3\n");
        assert_eq!(text, "v 1.000000 2.000000 3.000000\n");
    }

    #[test]
    fn test_vertex_weight_and_color() {
        let (_, text) = roundtrip("v 1 2 3 0.5\nv 0 0 0 0.1 0.2 0.3 0.4\n");
        assert!(text.contains("v 1.000000 2.000000 3.000000 0.500000\n"));
        assert!(text.contains(
            "v 0.000000 0.000000 0.000000 0.100000 0.200000 0.300000 0.400000\n"
        ));
    }

    #[test]
    fn test_attribute_run_length_compression() {
        let input = "v 0 0 0\nusemtl a\np 1\nusemtl b\np 1\n";
        let (_, text) = roundtrip(input);
        assert_eq!(text.matches("usemtl").count(), 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["v 0.000000 0.000000 0.000000", "usemtl a", "p 1", "usemtl b", "p 1"]
        );
    }

    #[test]
    fn test_attribute_not_reemitted_when_unchanged() {
        let input = "v 0 0 0\nusemtl a\ns 2\np 1\np 1\nf 1 1 1\n";
        let (_, text) = roundtrip(input);
        assert_eq!(text.matches("usemtl").count(), 1);
        assert_eq!(text.matches("s 2").count(), 1);
    }

    #[test]
    fn test_group_transitions() {
        let input = "v 0 0 0\ng a\np 1\ng\np 1\n";
        let (_, text) = roundtrip(input);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["v 0.000000 0.000000 0.000000", "g a", "p 1", "g default", "p 1"]
        );
    }

    #[test]
    fn test_roundtrip_polygonal() {
        let input = "\
mtllib scene.mtl\n\
v 0 0 0\nv 1 0 0\nv 1 1 0\nvt 0 0\nvn 0 0 1\n\
g walls\nusemtl brick\ns 4\nf 1/1/1 2/1/1 3/1/1\n\
bevel on\nl 1 2 3\np -1\n";
        let (doc, text) = roundtrip(input);
        let reparsed = read_obj_from_buffer(text.as_bytes()).unwrap();
        assert_eq!(doc, reparsed);
    }

    #[test]
    fn test_roundtrip_free_form() {
        let input = "\
v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
vp 0 0\nvp 1 0\nvp 1 1\n\
cstype rat bspline\ndeg 1 1\nstep 0.5 0.5\nstech cparma 2 2\nctech cspace 1.5\n\
curv2 1 2 3 1\n\
surf 0 1 0 1 1 2 3 4\nparm u 0 1\nparm v 0 1\ntrim 0 4 1\nhole 0 4 1\nsp 1\nend\n\
mg 2 0.5\ncurv 0 1 1 2 3 4\nparm u 0 0.5 1\nend\n\
con 1 0 4 1 1 0 4 1\n";
        let (doc, text) = roundtrip(input);
        let reparsed = read_obj_from_buffer(text.as_bytes()).unwrap();
        assert_eq!(doc, reparsed);
        assert_eq!(reparsed.merging_resolution(2), Some(0.5));
        assert_eq!(text.matches("end").count(), 2);
    }

    #[test]
    fn test_write_read_idempotent_on_canonical_form() {
        let input = "\
v 0 0 0\nv 2 0 0\nv 2 2 0\n\
o thing\nlod 2\ng a b\nusemap m\nc_interp on\nd_interp on\n\
f 1 2 3\no\nusemap off\nf 3 2 1\n";
        let (_, first) = roundtrip(input);
        let (_, second) = roundtrip(&first);
        assert_eq!(first, second);
    }

    #[test]
    fn test_shadow_and_trace_objects() {
        let (_, text) = roundtrip("shadow_obj s.obj\ntrace_obj t.obj\n");
        assert_eq!(text, "shadow_obj s.obj\ntrace_obj t.obj\n");
    }
}
