//! Element variants of the geometry document.
//!
//! All six element kinds share a render-attribute substructure embedded by
//! value; the free-form kinds (curves and surfaces) additionally carry a
//! free-form attribute block and a body (parameters, trimming loops,
//! sequence curves, special points).

use wavefront_core::{CurveIndex, Triplet};

/// Render attributes snapshotted from the interpreter context onto every
/// element at creation time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementAttributes {
    /// Names of the groups the element belongs to. Empty means the element
    /// was created in the default grouping context.
    pub groups: Vec<String>,
    /// Smoothing group number; 0 means off.
    pub smoothing_group: i64,
    /// Merging group number; 0 means off.
    pub merging_group: i64,
    /// Current object name (`o`), if any.
    pub object_name: Option<String>,
    /// Level of detail (`lod`), 0 when unset.
    pub level_of_detail: i64,
    /// Current texture map name (`usemap`), if any.
    pub map_name: Option<String>,
    /// Current material name (`usemtl`), if any.
    pub material_name: Option<String>,
    /// Bevel interpolation flag (`bevel`).
    pub bevel_interpolation: bool,
    /// Color interpolation flag (`c_interp`).
    pub color_interpolation: bool,
    /// Dissolve interpolation flag (`d_interp`).
    pub dissolve_interpolation: bool,
}

/// Basis type of a free-form curve or surface (`cstype`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeFormType {
    /// Basis-matrix form.
    BasisMatrix,
    /// Bezier form.
    Bezier,
    /// B-spline form.
    BSpline,
    /// Cardinal form.
    Cardinal,
    /// Taylor form.
    Taylor,
}

impl FreeFormType {
    /// The `cstype` keyword for this basis type.
    pub fn keyword(self) -> &'static str {
        match self {
            FreeFormType::BasisMatrix => "bmatrix",
            FreeFormType::Bezier => "bezier",
            FreeFormType::BSpline => "bspline",
            FreeFormType::Cardinal => "cardinal",
            FreeFormType::Taylor => "taylor",
        }
    }

    /// Parse a `cstype` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "bmatrix" => Some(FreeFormType::BasisMatrix),
            "bezier" => Some(FreeFormType::Bezier),
            "bspline" => Some(FreeFormType::BSpline),
            "cardinal" => Some(FreeFormType::Cardinal),
            "taylor" => Some(FreeFormType::Taylor),
            _ => None,
        }
    }
}

/// Curve or surface approximation technique (`ctech` / `stech`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApproximationTechnique {
    /// Constant parametric subdivision (`cparm`, `cparma`, `cparmb`).
    ConstantParametric {
        /// Resolution in the u direction.
        u: f32,
        /// Resolution in the v direction. Equal to `u` for the single-value
        /// forms.
        v: f32,
    },
    /// Constant spatial subdivision (`cspace`).
    ConstantSpatial {
        /// Maximum segment length.
        length: f32,
    },
    /// Curvature-dependent subdivision (`curv`).
    CurvatureDependent {
        /// Maximum distance between the polygonal approximation and the
        /// actual curve or surface.
        distance: f32,
        /// Maximum angle in degrees between tangents at segment ends.
        angle: f32,
    },
}

/// Free-form attribute block, accumulated as a pending cursor on the
/// interpreter context and captured onto every created curve or surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FreeFormAttributes {
    /// Basis type (`cstype`).
    pub curve_type: Option<FreeFormType>,
    /// Rational flag (`cstype rat ...`).
    pub rational: bool,
    /// Polynomial degree in the u direction (`deg`).
    pub degree_u: Option<usize>,
    /// Polynomial degree in the v direction (`deg`).
    pub degree_v: Option<usize>,
    /// Basis matrix coefficients in the u direction (`bmat u`).
    pub basis_matrix_u: Vec<f32>,
    /// Basis matrix coefficients in the v direction (`bmat v`).
    pub basis_matrix_v: Vec<f32>,
    /// Step size in the u direction (`step`).
    pub step_u: Option<f32>,
    /// Step size in the v direction (`step`).
    pub step_v: Option<f32>,
    /// Curve approximation technique (`ctech`).
    pub curve_technique: Option<ApproximationTechnique>,
    /// Surface approximation technique (`stech`).
    pub surface_technique: Option<ApproximationTechnique>,
}

impl FreeFormAttributes {
    /// Snapshot of the cursor for a curve element: only u-direction fields
    /// and the curve technique apply.
    pub(crate) fn captured_for_curve(&self) -> Self {
        let mut captured = self.clone();
        captured.degree_v = None;
        captured.basis_matrix_v = Vec::new();
        captured.step_v = None;
        captured.surface_technique = None;
        captured
    }

    /// Snapshot of the cursor for a surface element: the surface technique
    /// applies instead of the curve technique.
    pub(crate) fn captured_for_surface(&self) -> Self {
        let mut captured = self.clone();
        captured.curve_technique = None;
        captured
    }
}

/// Body statements attached to a free-form element between its defining
/// statement and `end`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FreeFormBody {
    /// Parameter values in the u direction (`parm u`).
    pub parameters_u: Vec<f32>,
    /// Parameter values in the v direction (`parm v`).
    pub parameters_v: Vec<f32>,
    /// Outer trimming loop curves (`trim`).
    pub outer_trims: Vec<CurveIndex>,
    /// Inner trimming loop (hole) curves (`hole`).
    pub inner_trims: Vec<CurveIndex>,
    /// Sequence curves (`scrv`).
    pub sequence_curves: Vec<CurveIndex>,
    /// Special points, as 1-based parameter-space vertex indices (`sp`).
    pub special_points: Vec<usize>,
}

impl FreeFormBody {
    /// True when no body statement has been attached.
    pub fn is_empty(&self) -> bool {
        self.parameters_u.is_empty()
            && self.parameters_v.is_empty()
            && self.outer_trims.is_empty()
            && self.inner_trims.is_empty()
            && self.sequence_curves.is_empty()
            && self.special_points.is_empty()
    }

    /// True when an outer or inner trimming loop references the 2D curve with
    /// the given 1-based index.
    pub fn trims_with_curve2d(&self, curve2d: usize) -> bool {
        self.outer_trims
            .iter()
            .chain(self.inner_trims.iter())
            .any(|c| c.curve2d == curve2d)
    }
}

/// A point element (`p`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    /// Render attributes at creation time.
    pub attributes: ElementAttributes,
    /// Referenced vertices.
    pub vertices: Vec<Triplet>,
}

/// A polyline element (`l`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    /// Render attributes at creation time.
    pub attributes: ElementAttributes,
    /// Referenced vertices in order.
    pub vertices: Vec<Triplet>,
}

/// A polygonal face element (`f` / `fo`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Face {
    /// Render attributes at creation time.
    pub attributes: ElementAttributes,
    /// Referenced vertices in winding order.
    pub vertices: Vec<Triplet>,
}

/// A free-form curve element (`curv`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Curve {
    /// Render attributes at creation time.
    pub attributes: ElementAttributes,
    /// Free-form attributes captured from the pending cursor.
    pub free_form: FreeFormAttributes,
    /// Body statements attached before `end`.
    pub body: FreeFormBody,
    /// Starting parameter value.
    pub start: f32,
    /// Ending parameter value.
    pub end: f32,
    /// Control vertices, as 1-based geometric vertex indices.
    pub vertices: Vec<usize>,
}

/// A free-form curve in 2D parameter space (`curv2`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Curve2D {
    /// Render attributes at creation time.
    pub attributes: ElementAttributes,
    /// Free-form attributes captured from the pending cursor.
    pub free_form: FreeFormAttributes,
    /// Body statements attached before `end`.
    pub body: FreeFormBody,
    /// Control vertices, as 1-based parameter-space vertex indices.
    pub vertices: Vec<usize>,
}

/// A free-form surface element (`surf`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Surface {
    /// Render attributes at creation time.
    pub attributes: ElementAttributes,
    /// Free-form attributes captured from the pending cursor.
    pub free_form: FreeFormAttributes,
    /// Body statements attached before `end`.
    pub body: FreeFormBody,
    /// Starting parameter value in the u direction.
    pub start_u: f32,
    /// Ending parameter value in the u direction.
    pub end_u: f32,
    /// Starting parameter value in the v direction.
    pub start_v: f32,
    /// Ending parameter value in the v direction.
    pub end_v: f32,
    /// Control vertices.
    pub vertices: Vec<Triplet>,
}
