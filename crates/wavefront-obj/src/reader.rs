//! OBJ statement interpreter: builds an [`ObjDocument`] from logical lines.
//!
//! The first token of each line selects a handler through an enumerated
//! statement kind. Unknown keywords are skipped for forward compatibility;
//! the removed legacy statements (`bsp`, `bzp`, `cdc`, `cdp`, `res`) fail
//! with a distinct unimplemented-statement error.
//!
//! The interpreter owns the parse-time context: the active group set, the
//! current smoothing/merging groups, object/map/material names, the
//! interpolation flags, and the pending free-form attribute cursor that is
//! captured onto each created curve or surface.

use std::fs;
use std::path::Path;

use wavefront_core::{
    resolve_index, CurveIndex, LineReader, LogicalLine, Triplet, Vec3, Vec4, VertexColor,
    WavefrontError,
};

use crate::document::{ObjDocument, SurfaceConnection, Vertex};
use crate::elements::{
    ApproximationTechnique, Curve, Curve2D, ElementAttributes, Face, FreeFormAttributes,
    FreeFormBody, FreeFormType, Line, Point, Surface,
};

/// Read an OBJ document from a file path.
pub fn read_obj(path: impl AsRef<Path>) -> Result<ObjDocument, WavefrontError> {
    let data = fs::read(path)?;
    read_obj_from_buffer(&data)
}

/// Read an OBJ document from a byte buffer.
pub fn read_obj_from_buffer(data: &[u8]) -> Result<ObjDocument, WavefrontError> {
    let mut lines = LineReader::new(data);
    let mut interpreter = Interpreter::new();
    while let Some(line) = lines.next_line()? {
        interpreter.handle(&line)?;
    }
    Ok(interpreter.into_document())
}

/// Recognized statement kinds of the OBJ grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    GeometricVertex,
    ParameterVertex,
    NormalVertex,
    TextureVertex,
    Point,
    Line,
    Face,
    Curve,
    Curve2D,
    Surface,
    Parameter,
    OuterTrim,
    InnerTrim,
    SequenceCurve,
    SpecialPoint,
    EndBody,
    Connection,
    Group,
    SmoothingGroup,
    MergingGroup,
    ObjectName,
    LevelOfDetail,
    UseMap,
    UseMaterial,
    Bevel,
    ColorInterpolation,
    DissolveInterpolation,
    CurveType,
    Degree,
    BasisMatrix,
    Step,
    CurveTechnique,
    SurfaceTechnique,
    MapLibrary,
    MaterialLibrary,
    ShadowObject,
    TraceObject,
    Legacy,
}

impl Keyword {
    /// Map a statement keyword to its kind; `None` for unknown statements.
    fn lookup(keyword: &str) -> Option<Keyword> {
        Some(match keyword {
            "v" => Keyword::GeometricVertex,
            "vp" => Keyword::ParameterVertex,
            "vn" => Keyword::NormalVertex,
            "vt" => Keyword::TextureVertex,
            "p" => Keyword::Point,
            "l" => Keyword::Line,
            "f" | "fo" => Keyword::Face,
            "curv" => Keyword::Curve,
            "curv2" => Keyword::Curve2D,
            "surf" => Keyword::Surface,
            "parm" => Keyword::Parameter,
            "trim" => Keyword::OuterTrim,
            "hole" => Keyword::InnerTrim,
            "scrv" => Keyword::SequenceCurve,
            "sp" => Keyword::SpecialPoint,
            "end" => Keyword::EndBody,
            "con" => Keyword::Connection,
            "g" => Keyword::Group,
            "s" => Keyword::SmoothingGroup,
            "mg" => Keyword::MergingGroup,
            "o" => Keyword::ObjectName,
            "lod" => Keyword::LevelOfDetail,
            "usemap" => Keyword::UseMap,
            "usemtl" => Keyword::UseMaterial,
            "bevel" => Keyword::Bevel,
            "c_interp" => Keyword::ColorInterpolation,
            "d_interp" => Keyword::DissolveInterpolation,
            "cstype" => Keyword::CurveType,
            "deg" => Keyword::Degree,
            "bmat" => Keyword::BasisMatrix,
            "step" => Keyword::Step,
            "ctech" => Keyword::CurveTechnique,
            "stech" => Keyword::SurfaceTechnique,
            "maplib" => Keyword::MapLibrary,
            "mtllib" => Keyword::MaterialLibrary,
            "shadow_obj" => Keyword::ShadowObject,
            "trace_obj" => Keyword::TraceObject,
            "bsp" | "bzp" | "cdc" | "cdp" | "res" => Keyword::Legacy,
            _ => return None,
        })
    }
}

/// Reference to the most recently created free-form element, the target of
/// body statements until superseded.
#[derive(Debug, Clone, Copy)]
enum FreeFormRef {
    Curve(usize),
    Curve2D(usize),
    Surface(usize),
}

/// Parse-time context and document under construction.
struct Interpreter {
    doc: ObjDocument,
    attributes: ElementAttributes,
    cursor: FreeFormAttributes,
    last_free_form: Option<FreeFormRef>,
}

impl Interpreter {
    fn new() -> Self {
        Self {
            doc: ObjDocument::new(),
            attributes: ElementAttributes::default(),
            cursor: FreeFormAttributes::default(),
            last_free_form: None,
        }
    }

    fn into_document(self) -> ObjDocument {
        self.doc
    }

    fn handle(&mut self, line: &LogicalLine) -> Result<(), WavefrontError> {
        let kind = match Keyword::lookup(line.keyword()) {
            Some(kind) => kind,
            // Unknown statements are skipped, not errors.
            None => return Ok(()),
        };
        let no = line.number();
        let tokens = line.tokens();
        let args = &tokens[1..];
        match kind {
            Keyword::GeometricVertex => self.geometric_vertex(no, args),
            Keyword::ParameterVertex => {
                let v = vertex3(no, "vp", args, 0.0, 1.0)?;
                self.doc.parameter_vertices.push(v);
                Ok(())
            }
            Keyword::NormalVertex => {
                let v = vertex3(no, "vn", args, 0.0, 0.0)?;
                self.doc.normals.push(v);
                Ok(())
            }
            Keyword::TextureVertex => {
                let v = vertex3(no, "vt", args, 0.0, 0.0)?;
                self.doc.texture_vertices.push(v);
                Ok(())
            }
            Keyword::Point => self.point(no, args),
            Keyword::Line => self.line(no, args),
            Keyword::Face => self.face(no, args),
            Keyword::Curve => self.curve(no, args),
            Keyword::Curve2D => self.curve2d(no, args),
            Keyword::Surface => self.surface(no, args),
            Keyword::Parameter => self.parameter(no, args),
            Keyword::OuterTrim => self.trim_loop(no, "trim", args, false),
            Keyword::InnerTrim => self.trim_loop(no, "hole", args, true),
            Keyword::SequenceCurve => self.sequence_curve(no, args),
            Keyword::SpecialPoint => self.special_point(no, args),
            // `end` is advisory; every body statement attaches eagerly.
            Keyword::EndBody => Ok(()),
            Keyword::Connection => self.connection(no, args),
            Keyword::Group => self.group(args),
            Keyword::SmoothingGroup => self.smoothing_group(no, args),
            Keyword::MergingGroup => self.merging_group(no, args),
            Keyword::ObjectName => {
                self.attributes.object_name = join_name(args);
                Ok(())
            }
            Keyword::LevelOfDetail => {
                self.attributes.level_of_detail = single_int(no, "lod", args)?;
                Ok(())
            }
            Keyword::UseMap => {
                self.attributes.map_name = name_or_off(no, "usemap", args)?;
                Ok(())
            }
            Keyword::UseMaterial => {
                self.attributes.material_name = name_or_off(no, "usemtl", args)?;
                Ok(())
            }
            Keyword::Bevel => {
                self.attributes.bevel_interpolation = single_on_off(no, "bevel", args)?;
                Ok(())
            }
            Keyword::ColorInterpolation => {
                self.attributes.color_interpolation = single_on_off(no, "c_interp", args)?;
                Ok(())
            }
            Keyword::DissolveInterpolation => {
                self.attributes.dissolve_interpolation = single_on_off(no, "d_interp", args)?;
                Ok(())
            }
            Keyword::CurveType => self.curve_type(no, args),
            Keyword::Degree => self.degree(no, args),
            Keyword::BasisMatrix => self.basis_matrix(no, args),
            Keyword::Step => self.step(no, args),
            Keyword::CurveTechnique => {
                self.cursor.curve_technique = Some(curve_technique(no, args)?);
                Ok(())
            }
            Keyword::SurfaceTechnique => {
                self.cursor.surface_technique = Some(surface_technique(no, args)?);
                Ok(())
            }
            Keyword::MapLibrary => self.library(no, "maplib", args, |doc| &mut doc.map_libraries),
            Keyword::MaterialLibrary => {
                self.library(no, "mtllib", args, |doc| &mut doc.material_libraries)
            }
            Keyword::ShadowObject => {
                self.doc.shadow_object = Some(single_name(no, "shadow_obj", args)?);
                Ok(())
            }
            Keyword::TraceObject => {
                self.doc.trace_object = Some(single_name(no, "trace_obj", args)?);
                Ok(())
            }
            Keyword::Legacy => Err(WavefrontError::unimplemented(no, line.keyword())),
        }
    }

    // ------------------------------------------------------------------
    // Vertex statements
    // ------------------------------------------------------------------

    fn geometric_vertex(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        let values = parse_floats(no, args)?;
        let vertex = match values.len() {
            3 => Vertex {
                position: Vec4::new(values[0], values[1], values[2], 1.0),
                color: None,
            },
            4 => Vertex {
                position: Vec4::new(values[0], values[1], values[2], values[3]),
                color: None,
            },
            6 | 7 => Vertex {
                position: Vec4::new(values[0], values[1], values[2], 1.0),
                color: Some(VertexColor {
                    r: values[3],
                    g: values[4],
                    b: values[5],
                    alpha: values.get(6).copied(),
                }),
            },
            n => {
                return Err(WavefrontError::statement(
                    no,
                    format!("v requires 3, 4, 6, or 7 values, got {n}"),
                ));
            }
        };
        self.doc.vertices.push(vertex);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Polygonal elements
    // ------------------------------------------------------------------

    fn point(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        let vertices = self.parse_triplets(no, "p", args)?;
        let element = Point {
            attributes: self.attributes.clone(),
            vertices,
        };
        self.doc.points.push(element);
        let index = self.doc.points.len() - 1;
        self.enroll(index, |g| &mut g.points);
        Ok(())
    }

    fn line(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        let vertices = self.parse_triplets(no, "l", args)?;
        let element = Line {
            attributes: self.attributes.clone(),
            vertices,
        };
        self.doc.lines.push(element);
        let index = self.doc.lines.len() - 1;
        self.enroll(index, |g| &mut g.lines);
        Ok(())
    }

    fn face(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        let vertices = self.parse_triplets(no, "f", args)?;
        let element = Face {
            attributes: self.attributes.clone(),
            vertices,
        };
        self.doc.faces.push(element);
        let index = self.doc.faces.len() - 1;
        self.enroll(index, |g| &mut g.faces);
        Ok(())
    }

    fn parse_triplets(
        &self,
        no: usize,
        keyword: &str,
        args: &[&str],
    ) -> Result<Vec<Triplet>, WavefrontError> {
        if args.is_empty() {
            return Err(WavefrontError::statement(
                no,
                format!("{keyword} requires at least one vertex reference"),
            ));
        }
        args.iter().map(|t| self.parse_triplet(no, t)).collect()
    }

    /// Parse one `v`, `v/vt`, `v//vn`, or `v/vt/vn` reference, resolving
    /// each part against the current size of its pool.
    fn parse_triplet(&self, no: usize, token: &str) -> Result<Triplet, WavefrontError> {
        let parts: Vec<&str> = token.split('/').collect();
        if parts.len() > 3 || parts[0].is_empty() {
            return Err(WavefrontError::statement(
                no,
                format!("malformed vertex reference '{token}'"),
            ));
        }
        let vertex = self.resolve(no, parts[0], self.doc.vertices.len())?;
        let texture = match parts.get(1) {
            None | Some(&"") => None,
            Some(part) => Some(self.resolve(no, part, self.doc.texture_vertices.len())?),
        };
        let normal = match parts.get(2) {
            None | Some(&"") => None,
            Some(part) => Some(self.resolve(no, part, self.doc.normals.len())?),
        };
        Ok(Triplet {
            vertex,
            texture,
            normal,
        })
    }

    /// Parse a 1-based or negative index token and resolve it against a pool
    /// of `len` entries.
    fn resolve(&self, no: usize, token: &str, len: usize) -> Result<usize, WavefrontError> {
        let raw: i64 = token
            .parse()
            .map_err(|_| WavefrontError::statement(no, format!("expected an index, got '{token}'")))?;
        resolve_index(raw, len).ok_or(WavefrontError::index(no, raw, len))
    }

    /// Append the new element's index to every active group's per-kind list.
    fn enroll(&mut self, index: usize, select: fn(&mut crate::document::Group) -> &mut Vec<usize>) {
        if self.attributes.groups.is_empty() {
            select(&mut self.doc.default_group).push(index);
        } else {
            let names = self.attributes.groups.clone();
            for name in &names {
                select(self.doc.group_mut(name)).push(index);
            }
        }
    }

    // ------------------------------------------------------------------
    // Free-form elements
    // ------------------------------------------------------------------

    fn curve(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        if args.len() < 5 {
            return Err(WavefrontError::statement(
                no,
                "curv requires a parameter range and at least three control vertices",
            ));
        }
        let start = parse_float(no, args[0])?;
        let end = parse_float(no, args[1])?;
        let vertices = args[2..]
            .iter()
            .map(|t| self.resolve(no, t, self.doc.vertices.len()))
            .collect::<Result<Vec<_>, _>>()?;
        let element = Curve {
            attributes: self.attributes.clone(),
            free_form: self.cursor.captured_for_curve(),
            body: FreeFormBody::default(),
            start,
            end,
            vertices,
        };
        self.doc.curves.push(element);
        let index = self.doc.curves.len() - 1;
        self.enroll(index, |g| &mut g.curves);
        self.last_free_form = Some(FreeFormRef::Curve(index));
        Ok(())
    }

    fn curve2d(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        if args.len() < 2 {
            return Err(WavefrontError::statement(
                no,
                "curv2 requires at least two parameter-space vertices",
            ));
        }
        let vertices = args
            .iter()
            .map(|t| self.resolve(no, t, self.doc.parameter_vertices.len()))
            .collect::<Result<Vec<_>, _>>()?;
        let element = Curve2D {
            attributes: self.attributes.clone(),
            free_form: self.cursor.captured_for_curve(),
            body: FreeFormBody::default(),
            vertices,
        };
        self.doc.curves2d.push(element);
        let index = self.doc.curves2d.len() - 1;
        self.enroll(index, |g| &mut g.curves2d);
        self.last_free_form = Some(FreeFormRef::Curve2D(index));
        Ok(())
    }

    fn surface(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        if args.len() < 7 {
            return Err(WavefrontError::statement(
                no,
                "surf requires two parameter ranges and at least three control vertices",
            ));
        }
        let start_u = parse_float(no, args[0])?;
        let end_u = parse_float(no, args[1])?;
        let start_v = parse_float(no, args[2])?;
        let end_v = parse_float(no, args[3])?;
        let vertices = args[4..]
            .iter()
            .map(|t| self.parse_triplet(no, t))
            .collect::<Result<Vec<_>, _>>()?;
        let element = Surface {
            attributes: self.attributes.clone(),
            free_form: self.cursor.captured_for_surface(),
            body: FreeFormBody::default(),
            start_u,
            end_u,
            start_v,
            end_v,
            vertices,
        };
        self.doc.surfaces.push(element);
        let index = self.doc.surfaces.len() - 1;
        self.enroll(index, |g| &mut g.surfaces);
        self.last_free_form = Some(FreeFormRef::Surface(index));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Free-form body statements
    // ------------------------------------------------------------------

    /// The most recently created free-form element, the target of a body
    /// statement. `None` means the statement is tolerated as a no-op because
    /// the document is still empty; anything else without a target fails.
    fn body_target(
        &self,
        no: usize,
        keyword: &str,
    ) -> Result<Option<FreeFormRef>, WavefrontError> {
        match self.last_free_form {
            Some(target) => Ok(Some(target)),
            None if self.document_is_empty() => Ok(None),
            None => Err(WavefrontError::statement(
                no,
                format!("{keyword} requires a preceding free-form element"),
            )),
        }
    }

    fn body_of(&mut self, target: FreeFormRef) -> &mut FreeFormBody {
        match target {
            FreeFormRef::Curve(i) => &mut self.doc.curves[i].body,
            FreeFormRef::Curve2D(i) => &mut self.doc.curves2d[i].body,
            FreeFormRef::Surface(i) => &mut self.doc.surfaces[i].body,
        }
    }

    /// True while no vertices or elements of any kind have been declared.
    fn document_is_empty(&self) -> bool {
        self.doc.vertices.is_empty()
            && self.doc.parameter_vertices.is_empty()
            && self.doc.normals.is_empty()
            && self.doc.texture_vertices.is_empty()
            && self.doc.points.is_empty()
            && self.doc.lines.is_empty()
            && self.doc.faces.is_empty()
            && self.doc.curves.is_empty()
            && self.doc.curves2d.is_empty()
            && self.doc.surfaces.is_empty()
    }

    fn parameter(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        let Some(target) = self.body_target(no, "parm")? else {
            return Ok(());
        };
        if args.len() < 3 {
            return Err(WavefrontError::statement(
                no,
                "parm requires a direction and at least two parameter values",
            ));
        }
        let direction = args[0];
        if direction != "u" && direction != "v" {
            return Err(WavefrontError::statement(
                no,
                format!("parm direction must be 'u' or 'v', got '{direction}'"),
            ));
        }
        let values = parse_floats(no, &args[1..])?;
        let body = self.body_of(target);
        if direction == "u" {
            body.parameters_u.extend(values);
        } else {
            body.parameters_v.extend(values);
        }
        Ok(())
    }

    fn parse_curve_indices(
        &self,
        no: usize,
        keyword: &str,
        args: &[&str],
    ) -> Result<Vec<CurveIndex>, WavefrontError> {
        if args.is_empty() || args.len() % 3 != 0 {
            return Err(WavefrontError::statement(
                no,
                format!("{keyword} requires one or more (start, end, curve) triples"),
            ));
        }
        args.chunks(3)
            .map(|chunk| {
                Ok(CurveIndex {
                    start: parse_float(no, chunk[0])?,
                    end: parse_float(no, chunk[1])?,
                    curve2d: self.resolve(no, chunk[2], self.doc.curves2d.len())?,
                })
            })
            .collect()
    }

    fn trim_loop(
        &mut self,
        no: usize,
        keyword: &str,
        args: &[&str],
        inner: bool,
    ) -> Result<(), WavefrontError> {
        let Some(target) = self.body_target(no, keyword)? else {
            return Ok(());
        };
        let curves = self.parse_curve_indices(no, keyword, args)?;
        let body = self.body_of(target);
        if inner {
            body.inner_trims.extend(curves);
        } else {
            body.outer_trims.extend(curves);
        }
        Ok(())
    }

    fn sequence_curve(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        let Some(target) = self.body_target(no, "scrv")? else {
            return Ok(());
        };
        let curves = self.parse_curve_indices(no, "scrv", args)?;
        self.body_of(target).sequence_curves.extend(curves);
        Ok(())
    }

    fn special_point(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        let Some(target) = self.body_target(no, "sp")? else {
            return Ok(());
        };
        if args.is_empty() {
            return Err(WavefrontError::statement(
                no,
                "sp requires at least one parameter-space vertex",
            ));
        }
        let points = args
            .iter()
            .map(|t| self.resolve(no, t, self.doc.parameter_vertices.len()))
            .collect::<Result<Vec<_>, _>>()?;
        self.body_of(target).special_points.extend(points);
        Ok(())
    }

    fn connection(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        if args.len() != 8 {
            return Err(WavefrontError::statement(
                no,
                format!("con requires 8 values, got {}", args.len()),
            ));
        }
        let surface1 = self.resolve(no, args[0], self.doc.surfaces.len())?;
        let curve1 = CurveIndex {
            start: parse_float(no, args[1])?,
            end: parse_float(no, args[2])?,
            curve2d: self.resolve(no, args[3], self.doc.curves2d.len())?,
        };
        let surface2 = self.resolve(no, args[4], self.doc.surfaces.len())?;
        let curve2 = CurveIndex {
            start: parse_float(no, args[5])?,
            end: parse_float(no, args[6])?,
            curve2d: self.resolve(no, args[7], self.doc.curves2d.len())?,
        };
        for (surface, curve) in [(surface1, &curve1), (surface2, &curve2)] {
            if !self.doc.surfaces[surface - 1].body.trims_with_curve2d(curve.curve2d) {
                return Err(WavefrontError::statement(
                    no,
                    format!(
                        "con references curve {} which surface {} does not use as a trimming loop",
                        curve.curve2d, surface
                    ),
                ));
            }
        }
        self.doc.connections.push(SurfaceConnection {
            surface1,
            curve1,
            surface2,
            curve2,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Context statements
    // ------------------------------------------------------------------

    fn group(&mut self, args: &[&str]) -> Result<(), WavefrontError> {
        // The reserved name `default` is equivalent to an empty name list and
        // never materializes a group entry.
        let mut names: Vec<String> = Vec::new();
        for name in args {
            if *name != "default" && !names.iter().any(|n| n == name) {
                names.push((*name).to_string());
            }
        }
        for name in &names {
            // Created in first-seen order, at `g` time.
            self.doc.group_mut(name);
        }
        self.attributes.groups = names;
        Ok(())
    }

    fn smoothing_group(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        if args.len() != 1 {
            return Err(WavefrontError::statement(no, "s requires exactly one value"));
        }
        self.attributes.smoothing_group = group_number(no, "s", args[0])?;
        Ok(())
    }

    fn merging_group(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        if args.is_empty() || args.len() > 2 {
            return Err(WavefrontError::statement(
                no,
                "mg requires a group number and an optional resolution",
            ));
        }
        let number = group_number(no, "mg", args[0])?;
        self.attributes.merging_group = number;
        if number != 0 {
            if let Some(resolution) = args.get(1) {
                let resolution = parse_float(no, resolution)?;
                self.doc.set_merging_resolution(number, resolution);
            }
        }
        Ok(())
    }

    fn curve_type(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        let (rational, type_keyword) = match args {
            [t] => (false, *t),
            ["rat", t] => (true, *t),
            _ => {
                return Err(WavefrontError::statement(
                    no,
                    "cstype requires an optional 'rat' flag and a basis type",
                ));
            }
        };
        let curve_type = FreeFormType::from_keyword(type_keyword).ok_or_else(|| {
            WavefrontError::statement(no, format!("unknown cstype '{type_keyword}'"))
        })?;
        self.cursor.curve_type = Some(curve_type);
        self.cursor.rational = rational;
        Ok(())
    }

    fn degree(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        if args.is_empty() || args.len() > 2 {
            return Err(WavefrontError::statement(no, "deg requires one or two values"));
        }
        self.cursor.degree_u = Some(parse_count(no, args[0])?);
        if let Some(v) = args.get(1) {
            self.cursor.degree_v = Some(parse_count(no, v)?);
        }
        Ok(())
    }

    fn basis_matrix(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        let direction = args.first().copied().unwrap_or("");
        if direction != "u" && direction != "v" {
            return Err(WavefrontError::statement(
                no,
                "bmat direction must be 'u' or 'v'",
            ));
        }
        let degree = if direction == "u" {
            self.cursor.degree_u
        } else {
            self.cursor.degree_v
        };
        let degree = degree.ok_or_else(|| {
            WavefrontError::statement(no, "bmat requires a preceding deg statement")
        })?;
        let expected = degree + 1;
        if args.len() - 1 != expected {
            return Err(WavefrontError::statement(
                no,
                format!(
                    "bmat {direction} requires {expected} coefficients, got {}",
                    args.len() - 1
                ),
            ));
        }
        let coefficients = parse_floats(no, &args[1..])?;
        if direction == "u" {
            self.cursor.basis_matrix_u = coefficients;
        } else {
            self.cursor.basis_matrix_v = coefficients;
        }
        Ok(())
    }

    fn step(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        if args.is_empty() || args.len() > 2 {
            return Err(WavefrontError::statement(no, "step requires one or two values"));
        }
        self.cursor.step_u = Some(parse_float(no, args[0])?);
        if let Some(v) = args.get(1) {
            self.cursor.step_v = Some(parse_float(no, v)?);
        }
        Ok(())
    }

    fn library(
        &mut self,
        no: usize,
        keyword: &str,
        args: &[&str],
        select: fn(&mut ObjDocument) -> &mut Vec<String>,
    ) -> Result<(), WavefrontError> {
        if args.is_empty() {
            return Err(WavefrontError::statement(
                no,
                format!("{keyword} requires at least one file name"),
            ));
        }
        select(&mut self.doc).extend(args.iter().map(|s| s.to_string()));
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Token helpers
// ----------------------------------------------------------------------

fn parse_float(no: usize, token: &str) -> Result<f32, WavefrontError> {
    token
        .parse()
        .map_err(|_| WavefrontError::statement(no, format!("expected a number, got '{token}'")))
}

fn parse_floats(no: usize, tokens: &[&str]) -> Result<Vec<f32>, WavefrontError> {
    tokens.iter().map(|t| parse_float(no, t)).collect()
}

fn parse_count(no: usize, token: &str) -> Result<usize, WavefrontError> {
    token
        .parse()
        .map_err(|_| WavefrontError::statement(no, format!("expected an integer, got '{token}'")))
}

/// Parse a smoothing/merging group number: `off` and `0` both mean off.
fn group_number(no: usize, keyword: &str, token: &str) -> Result<i64, WavefrontError> {
    if token == "off" {
        return Ok(0);
    }
    token.parse().map_err(|_| {
        WavefrontError::statement(no, format!("{keyword} requires a number or 'off', got '{token}'"))
    })
}

/// A 1-to-3 component vertex statement with per-format defaults.
fn vertex3(
    no: usize,
    keyword: &str,
    args: &[&str],
    default_y: f32,
    default_z: f32,
) -> Result<Vec3, WavefrontError> {
    if args.is_empty() || args.len() > 3 {
        return Err(WavefrontError::statement(
            no,
            format!("{keyword} requires one to three values, got {}", args.len()),
        ));
    }
    let values = parse_floats(no, args)?;
    Ok(Vec3::new(
        values[0],
        values.get(1).copied().unwrap_or(default_y),
        values.get(2).copied().unwrap_or(default_z),
    ))
}

fn join_name(args: &[&str]) -> Option<String> {
    if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    }
}

fn name_or_off(no: usize, keyword: &str, args: &[&str]) -> Result<Option<String>, WavefrontError> {
    if args.is_empty() {
        return Err(WavefrontError::statement(
            no,
            format!("{keyword} requires a name or 'off'"),
        ));
    }
    let name = args.join(" ");
    Ok(if name == "off" { None } else { Some(name) })
}

fn single_name(no: usize, keyword: &str, args: &[&str]) -> Result<String, WavefrontError> {
    match args {
        [name] => Ok((*name).to_string()),
        _ => Err(WavefrontError::statement(
            no,
            format!("{keyword} requires exactly one file name"),
        )),
    }
}

fn single_int(no: usize, keyword: &str, args: &[&str]) -> Result<i64, WavefrontError> {
    match args {
        [token] => token.parse().map_err(|_| {
            WavefrontError::statement(no, format!("{keyword} requires an integer, got '{token}'"))
        }),
        _ => Err(WavefrontError::statement(
            no,
            format!("{keyword} requires exactly one value"),
        )),
    }
}

fn single_on_off(no: usize, keyword: &str, args: &[&str]) -> Result<bool, WavefrontError> {
    match args {
        ["on"] => Ok(true),
        ["off"] => Ok(false),
        _ => Err(WavefrontError::statement(
            no,
            format!("{keyword} requires 'on' or 'off'"),
        )),
    }
}

fn curve_technique(no: usize, args: &[&str]) -> Result<ApproximationTechnique, WavefrontError> {
    match args {
        ["cparm", res] => {
            let res = parse_float(no, res)?;
            Ok(ApproximationTechnique::ConstantParametric { u: res, v: res })
        }
        ["cspace", length] => Ok(ApproximationTechnique::ConstantSpatial {
            length: parse_float(no, length)?,
        }),
        ["curv", distance, angle] => Ok(ApproximationTechnique::CurvatureDependent {
            distance: parse_float(no, distance)?,
            angle: parse_float(no, angle)?,
        }),
        _ => Err(WavefrontError::statement(
            no,
            "ctech requires cparm, cspace, or curv arguments",
        )),
    }
}

fn surface_technique(no: usize, args: &[&str]) -> Result<ApproximationTechnique, WavefrontError> {
    match args {
        ["cparma", u, v] => Ok(ApproximationTechnique::ConstantParametric {
            u: parse_float(no, u)?,
            v: parse_float(no, v)?,
        }),
        ["cparmb", res] => {
            let res = parse_float(no, res)?;
            Ok(ApproximationTechnique::ConstantParametric { u: res, v: res })
        }
        ["cspace", length] => Ok(ApproximationTechnique::ConstantSpatial {
            length: parse_float(no, length)?,
        }),
        ["curv", distance, angle] => Ok(ApproximationTechnique::CurvatureDependent {
            distance: parse_float(no, distance)?,
            angle: parse_float(no, angle)?,
        }),
        _ => Err(WavefrontError::statement(
            no,
            "stech requires cparma, cparmb, cspace, or curv arguments",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ObjDocument {
        read_obj_from_buffer(input.as_bytes()).unwrap()
    }

    fn parse_err(input: &str) -> WavefrontError {
        read_obj_from_buffer(input.as_bytes()).unwrap_err()
    }

    #[test]
    fn test_vertex_forms() {
        let doc = parse("v 1 2 3\nv 1 2 3 0.5\nv 1 2 3 0.1 0.2 0.3\nv 1 2 3 0.1 0.2 0.3 0.4\n");
        assert_eq!(doc.vertices.len(), 4);
        assert_eq!(doc.vertices[0].position.w, 1.0);
        assert_eq!(doc.vertices[1].position.w, 0.5);
        let color = doc.vertices[2].color.unwrap();
        assert_eq!((color.r, color.g, color.b), (0.1, 0.2, 0.3));
        assert_eq!(color.alpha, None);
        assert_eq!(doc.vertices[3].color.unwrap().alpha, Some(0.4));
    }

    #[test]
    fn test_vertex_bad_arity() {
        assert!(matches!(
            parse_err("v 1 2 3 4 5"),
            WavefrontError::Statement { line: 1, .. }
        ));
    }

    #[test]
    fn test_vertex_defaults() {
        let doc = parse("vt 0.5\nvp 2\nvn 1 2\n");
        assert_eq!(doc.texture_vertices[0], Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(doc.parameter_vertices[0], Vec3::new(2.0, 0.0, 1.0));
        assert_eq!(doc.normals[0], Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_forward_index() {
        let doc = parse("v 0 0 0\nv 0 0 0\np 2\n");
        assert_eq!(doc.points[0].vertices, vec![Triplet::vertex_only(2)]);
    }

    #[test]
    fn test_backward_index_resolves_to_positive() {
        let doc = parse("v 0 0 0\nv 0 0 0\np -1\np 2\n");
        assert_eq!(doc.points[0].vertices, doc.points[1].vertices);
    }

    #[test]
    fn test_index_out_of_bounds() {
        assert!(matches!(
            parse_err("p 1"),
            WavefrontError::Index { line: 1, index: 1, len: 0 }
        ));
        assert!(matches!(
            parse_err("v 0 0 0\nf 1 2 1"),
            WavefrontError::Index { line: 2, index: 2, .. }
        ));
    }

    #[test]
    fn test_later_vertex_not_visible_to_earlier_face() {
        // The pool is bounds-checked at parse time, not after the fact.
        assert!(matches!(
            parse_err("v 0 0 0\np 2\nv 0 0 0"),
            WavefrontError::Index { line: 2, .. }
        ));
    }

    #[test]
    fn test_malformed_triplet() {
        assert!(matches!(parse_err("p ///"), WavefrontError::Statement { .. }));
        assert!(matches!(parse_err("v 0 0 0\nf 1/2/3/4"), WavefrontError::Statement { .. }));
    }

    #[test]
    fn test_triplet_parts() {
        let doc = parse("v 0 0 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 1//1 1/1 1\n");
        let f = &doc.faces[0];
        assert_eq!(f.vertices[0], Triplet { vertex: 1, texture: Some(1), normal: Some(1) });
        assert_eq!(f.vertices[1], Triplet { vertex: 1, texture: None, normal: Some(1) });
        assert_eq!(f.vertices[2], Triplet { vertex: 1, texture: Some(1), normal: None });
        assert_eq!(f.vertices[3], Triplet::vertex_only(1));
    }

    #[test]
    fn test_fo_synonym() {
        let doc = parse("v 0 0 0\nfo 1 1 1\n");
        assert_eq!(doc.faces.len(), 1);
    }

    #[test]
    fn test_group_membership() {
        let doc = parse("g a b\nv 0 0 0\np 1\ng b\np 1\n");
        assert_eq!(doc.groups.len(), 2);
        assert_eq!(doc.group("a").unwrap().points, vec![0]);
        assert_eq!(doc.group("b").unwrap().points, vec![0, 1]);
        assert_eq!(doc.points[0].attributes.groups, vec!["a", "b"]);
        assert_eq!(doc.points[1].attributes.groups, vec!["b"]);
    }

    #[test]
    fn test_group_default_never_materializes() {
        for input in ["g\nv 0 0 0\np 1\n", "g default\nv 0 0 0\np 1\n"] {
            let doc = parse(input);
            assert!(doc.groups.is_empty());
            assert_eq!(doc.default_group().points, vec![0]);
            assert!(doc.points[0].attributes.groups.is_empty());
        }
    }

    #[test]
    fn test_group_created_by_g_without_elements() {
        let doc = parse("g lonely\n");
        assert_eq!(doc.groups.len(), 1);
        assert!(doc.group("lonely").unwrap().points.is_empty());
    }

    #[test]
    fn test_smoothing_and_merging_groups() {
        let doc = parse("v 0 0 0\ns 3\nmg 2 0.5\np 1\ns off\nmg off\np 1\n");
        assert_eq!(doc.points[0].attributes.smoothing_group, 3);
        assert_eq!(doc.points[0].attributes.merging_group, 2);
        assert_eq!(doc.points[1].attributes.smoothing_group, 0);
        assert_eq!(doc.points[1].attributes.merging_group, 0);
        assert_eq!(doc.merging_resolution(2), Some(0.5));
    }

    #[test]
    fn test_merging_group_without_resolution() {
        let doc = parse("v 0 0 0\nmg 4\np 1\n");
        assert_eq!(doc.points[0].attributes.merging_group, 4);
        assert_eq!(doc.merging_resolution(4), None);
    }

    #[test]
    fn test_render_attributes() {
        let doc = parse(
            "v 0 0 0\no part\nlod 3\nusemap m\nusemtl steel\nbevel on\nc_interp on\nd_interp on\np 1\nusemtl off\np 1\n",
        );
        let a = &doc.points[0].attributes;
        assert_eq!(a.object_name.as_deref(), Some("part"));
        assert_eq!(a.level_of_detail, 3);
        assert_eq!(a.map_name.as_deref(), Some("m"));
        assert_eq!(a.material_name.as_deref(), Some("steel"));
        assert!(a.bevel_interpolation && a.color_interpolation && a.dissolve_interpolation);
        assert_eq!(doc.points[1].attributes.material_name, None);
    }

    #[test]
    fn test_cursor_persists_across_elements() {
        let doc = parse(
            "v 0 0 0\nv 1 0 0\nv 2 0 0\n\
             cstype rat bspline\ndeg 2\nstep 0.5\nctech cparm 2\n\
             curv 0 1 1 2 3\ncurv 0 1 3 2 1\n",
        );
        assert_eq!(doc.curves.len(), 2);
        assert_eq!(doc.curves[0].free_form, doc.curves[1].free_form);
        let ff = &doc.curves[0].free_form;
        assert_eq!(ff.curve_type, Some(FreeFormType::BSpline));
        assert!(ff.rational);
        assert_eq!(ff.degree_u, Some(2));
        assert_eq!(ff.step_u, Some(0.5));
        assert_eq!(
            ff.curve_technique,
            Some(ApproximationTechnique::ConstantParametric { u: 2.0, v: 2.0 })
        );
    }

    #[test]
    fn test_bmat_requires_deg() {
        assert!(matches!(
            parse_err("cstype bmatrix\nbmat u 1 0"),
            WavefrontError::Statement { line: 2, .. }
        ));
        let doc = parse("cstype bmatrix\ndeg 1\nbmat u 1 0\nv 0 0 0\nv 1 0 0\nv 2 0 0\ncurv 0 1 1 2 3\n");
        assert_eq!(doc.curves[0].free_form.basis_matrix_u, vec![1.0, 0.0]);
    }

    #[test]
    fn test_bmat_coefficient_count() {
        assert!(matches!(
            parse_err("deg 2\nbmat u 1 0"),
            WavefrontError::Statement { line: 2, .. }
        ));
    }

    #[test]
    fn test_surface_with_body() {
        let doc = parse(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vp 0 0\nvp 1 0\nvp 1 1\n\
             cstype bezier\ndeg 1 1\n\
             curv2 1 2 3 1\n\
             surf 0 1 0 1 1 2 3 4\n\
             parm u 0 1\nparm v 0 1\ntrim 0 4 1\nsp 1\nend\n",
        );
        let surf = &doc.surfaces[0];
        assert_eq!(surf.body.parameters_u, vec![0.0, 1.0]);
        assert_eq!(surf.body.parameters_v, vec![0.0, 1.0]);
        assert_eq!(surf.body.outer_trims.len(), 1);
        assert_eq!(surf.body.outer_trims[0].curve2d, 1);
        assert_eq!(surf.body.special_points, vec![1]);
        assert_eq!(surf.free_form.degree_v, Some(1));
    }

    #[test]
    fn test_body_attaches_to_most_recent_element() {
        let doc = parse(
            "vp 0 0\nvp 1 0\ncurv2 1 2\ncurv2 2 1\nparm u 0 1\n",
        );
        assert!(doc.curves2d[0].body.is_empty());
        assert_eq!(doc.curves2d[1].body.parameters_u, vec![0.0, 1.0]);
    }

    #[test]
    fn test_body_statement_probe_no_op_on_empty_document() {
        let doc = parse("parm u 0 1\ntrim 0 1 1\nsp 1\n");
        assert!(doc.curves.is_empty() && doc.curves2d.is_empty());
    }

    #[test]
    fn test_body_statement_fails_after_content() {
        assert!(matches!(
            parse_err("v 0 0 0\nparm u 0 1\n"),
            WavefrontError::Statement { line: 2, .. }
        ));
    }

    #[test]
    fn test_connection() {
        let input = "\
v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
vp 0 0\nvp 1 0\nvp 1 1\n\
cstype bezier\ndeg 1 1\n\
curv2 1 2 3 1\n\
surf 0 1 0 1 1 2 3 4\ntrim 0 4 1\nend\n\
surf 0 1 0 1 4 3 2 1\ntrim 0 4 1\nend\n\
con 1 0 4 1 2 0 4 1\n";
        let doc = parse(input);
        assert_eq!(doc.connections.len(), 1);
        let con = &doc.connections[0];
        assert_eq!((con.surface1, con.surface2), (1, 2));
        assert_eq!(con.curve1.curve2d, 1);
    }

    #[test]
    fn test_connection_requires_matching_trim() {
        let input = "\
v 0 0 0\nv 1 0 0\nv 1 1 0\n\
vp 0 0\nvp 1 0\n\
cstype bezier\ndeg 1 1\n\
curv2 1 2\n\
surf 0 1 0 1 1 2 3\nend\n\
surf 0 1 0 1 3 2 1\ntrim 0 1 1\nend\n\
con 1 0 1 1 2 0 1 1\n";
        assert!(matches!(parse_err(input), WavefrontError::Statement { .. }));
    }

    #[test]
    fn test_connection_surface_bounds() {
        assert!(matches!(
            parse_err("v 0 0 0\ncon 1 0 1 1 2 0 1 1"),
            WavefrontError::Index { .. }
        ));
    }

    #[test]
    fn test_legacy_statements_fail_distinctly() {
        for keyword in ["bsp", "bzp", "cdc", "cdp", "res"] {
            let err = parse_err(&format!("{keyword} 1 2 3"));
            assert!(
                matches!(err, WavefrontError::Unimplemented { line: 1, .. }),
                "{keyword}: {err}"
            );
        }
    }

    #[test]
    fn test_unknown_statements_are_skipped() {
        let doc = parse("newfangled 1 2 3\nv 0 0 0\np 1\n");
        assert_eq!(doc.points.len(), 1);
    }

    #[test]
    fn test_libraries_and_scalar_objects() {
        let doc = parse("mtllib a.mtl b.mtl\nmaplib m.map\nshadow_obj s.obj\ntrace_obj t.obj\n");
        assert_eq!(doc.material_libraries, vec!["a.mtl", "b.mtl"]);
        assert_eq!(doc.map_libraries, vec!["m.map"]);
        assert_eq!(doc.shadow_object.as_deref(), Some("s.obj"));
        assert_eq!(doc.trace_object.as_deref(), Some("t.obj"));
        assert!(matches!(
            parse_err("shadow_obj a b"),
            WavefrontError::Statement { .. }
        ));
    }
}
