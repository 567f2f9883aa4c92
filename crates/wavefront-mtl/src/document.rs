//! In-memory model of a Wavefront MTL material document.

use wavefront_core::Vec3;

/// A material color in one of the three MTL color forms.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialColor {
    /// RGB components, also used for the single-value gray form.
    Rgb {
        /// Red component.
        r: f32,
        /// Green component.
        g: f32,
        /// Blue component.
        b: f32,
    },
    /// CIE XYZ components.
    Xyz {
        /// X component.
        x: f32,
        /// Y component.
        y: f32,
        /// Z component.
        z: f32,
    },
    /// Spectral curve file reference with a multiplier.
    Spectral {
        /// Referenced `.rfl` file name, verbatim.
        file: String,
        /// Multiplier applied to the curve values; 1.0 when omitted.
        factor: f32,
    },
}

impl MaterialColor {
    /// An RGB color with equal components, the single-value gray form.
    pub fn gray(value: f32) -> Self {
        MaterialColor::Rgb {
            r: value,
            g: value,
            b: value,
        }
    }
}

/// Scalar channel selected from a texture file (`-imfchan`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapChannel {
    /// Red channel (`r`).
    Red,
    /// Green channel (`g`).
    Green,
    /// Blue channel (`b`).
    Blue,
    /// Matte channel (`m`).
    Matte,
    /// Luminance channel (`l`).
    Luminance,
    /// Z-depth channel (`z`).
    Depth,
}

impl MapChannel {
    /// The one-letter channel code.
    pub fn code(self) -> &'static str {
        match self {
            MapChannel::Red => "r",
            MapChannel::Green => "g",
            MapChannel::Blue => "b",
            MapChannel::Matte => "m",
            MapChannel::Luminance => "l",
            MapChannel::Depth => "z",
        }
    }

    /// Parse a one-letter channel code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "r" => Some(MapChannel::Red),
            "g" => Some(MapChannel::Green),
            "b" => Some(MapChannel::Blue),
            "m" => Some(MapChannel::Matte),
            "l" => Some(MapChannel::Luminance),
            "z" => Some(MapChannel::Depth),
            _ => None,
        }
    }
}

/// A texture map reference with its option flags.
///
/// Field defaults follow the format's documented option defaults, so a map
/// statement with no options yields `MaterialMap::new(file)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialMap {
    /// Referenced texture file name.
    pub file: String,
    /// Horizontal texture blending (`-blenu`).
    pub horizontal_blending: bool,
    /// Vertical texture blending (`-blenv`).
    pub vertical_blending: bool,
    /// Color correction (`-cc`).
    pub color_correction: bool,
    /// Clamp texture coordinates to [0, 1] (`-clamp`).
    pub clamping: bool,
    /// Bump multiplier (`-bm`).
    pub bump_multiplier: f32,
    /// Mip-map sharpness boost (`-boost`), if given.
    pub boost: Option<f32>,
    /// Base of the texture value modifier (`-mm`).
    pub modifier_base: f32,
    /// Gain of the texture value modifier (`-mm`).
    pub modifier_gain: f32,
    /// Texture origin offset (`-o`).
    pub offset: Vec3,
    /// Texture scale (`-s`).
    pub scale: Vec3,
    /// Texture turbulence (`-t`).
    pub turbulence: Vec3,
    /// Texture resolution override (`-texres`), if given.
    pub resolution: Option<i64>,
    /// Scalar channel selection (`-imfchan`), if given.
    pub channel: Option<MapChannel>,
}

impl Default for MaterialMap {
    fn default() -> Self {
        Self {
            file: String::new(),
            horizontal_blending: true,
            vertical_blending: true,
            color_correction: false,
            clamping: false,
            bump_multiplier: 1.0,
            boost: None,
            modifier_base: 0.0,
            modifier_gain: 1.0,
            offset: Vec3::new(0.0, 0.0, 0.0),
            scale: Vec3::new(1.0, 1.0, 1.0),
            turbulence: Vec3::new(0.0, 0.0, 0.0),
            resolution: None,
            channel: None,
        }
    }
}

impl MaterialMap {
    /// A map with default options referencing `file`.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }
}

/// Target slot of a `refl` reflection-map statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionType {
    /// Sphere mapping.
    Sphere,
    /// Top face of a cube map.
    CubeTop,
    /// Bottom face of a cube map.
    CubeBottom,
    /// Front face of a cube map.
    CubeFront,
    /// Back face of a cube map.
    CubeBack,
    /// Left face of a cube map.
    CubeLeft,
    /// Right face of a cube map.
    CubeRight,
}

impl ReflectionType {
    /// The `-type` keyword for this slot.
    pub fn keyword(self) -> &'static str {
        match self {
            ReflectionType::Sphere => "sphere",
            ReflectionType::CubeTop => "cube_top",
            ReflectionType::CubeBottom => "cube_bottom",
            ReflectionType::CubeFront => "cube_front",
            ReflectionType::CubeBack => "cube_back",
            ReflectionType::CubeLeft => "cube_left",
            ReflectionType::CubeRight => "cube_right",
        }
    }

    /// Parse a `-type` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "sphere" => Some(ReflectionType::Sphere),
            "cube_top" => Some(ReflectionType::CubeTop),
            "cube_bottom" => Some(ReflectionType::CubeBottom),
            "cube_front" => Some(ReflectionType::CubeFront),
            "cube_back" => Some(ReflectionType::CubeBack),
            "cube_left" => Some(ReflectionType::CubeLeft),
            "cube_right" => Some(ReflectionType::CubeRight),
            _ => None,
        }
    }

    /// All seven slots, in canonical output order.
    pub(crate) const ALL: [ReflectionType; 7] = [
        ReflectionType::Sphere,
        ReflectionType::CubeTop,
        ReflectionType::CubeBottom,
        ReflectionType::CubeFront,
        ReflectionType::CubeBack,
        ReflectionType::CubeLeft,
        ReflectionType::CubeRight,
    ];
}

/// The seven reflection-map slots of a material.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReflectionMaps {
    /// Sphere map.
    pub sphere: Option<MaterialMap>,
    /// Cube map, top face.
    pub cube_top: Option<MaterialMap>,
    /// Cube map, bottom face.
    pub cube_bottom: Option<MaterialMap>,
    /// Cube map, front face.
    pub cube_front: Option<MaterialMap>,
    /// Cube map, back face.
    pub cube_back: Option<MaterialMap>,
    /// Cube map, left face.
    pub cube_left: Option<MaterialMap>,
    /// Cube map, right face.
    pub cube_right: Option<MaterialMap>,
}

impl ReflectionMaps {
    /// The slot for a reflection type.
    pub fn slot(&self, kind: ReflectionType) -> &Option<MaterialMap> {
        match kind {
            ReflectionType::Sphere => &self.sphere,
            ReflectionType::CubeTop => &self.cube_top,
            ReflectionType::CubeBottom => &self.cube_bottom,
            ReflectionType::CubeFront => &self.cube_front,
            ReflectionType::CubeBack => &self.cube_back,
            ReflectionType::CubeLeft => &self.cube_left,
            ReflectionType::CubeRight => &self.cube_right,
        }
    }

    /// The slot for a reflection type, mutably.
    pub fn slot_mut(&mut self, kind: ReflectionType) -> &mut Option<MaterialMap> {
        match kind {
            ReflectionType::Sphere => &mut self.sphere,
            ReflectionType::CubeTop => &mut self.cube_top,
            ReflectionType::CubeBottom => &mut self.cube_bottom,
            ReflectionType::CubeFront => &mut self.cube_front,
            ReflectionType::CubeBack => &mut self.cube_back,
            ReflectionType::CubeLeft => &mut self.cube_left,
            ReflectionType::CubeRight => &mut self.cube_right,
        }
    }
}

/// A single material definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name from `newmtl`; may contain spaces.
    pub name: String,

    /// Ambient reflectivity (`Ka`).
    pub ambient: Option<MaterialColor>,
    /// Diffuse reflectivity (`Kd`).
    pub diffuse: Option<MaterialColor>,
    /// Specular reflectivity (`Ks`).
    pub specular: Option<MaterialColor>,
    /// Emissive color (`Ke`).
    pub emissive: Option<MaterialColor>,
    /// Transmission filter (`Tf`).
    pub transmission_filter: Option<MaterialColor>,

    /// Illumination model number (`illum`).
    pub illumination_model: i64,
    /// Dissolve factor (`d`); 1.0 is fully opaque.
    pub dissolve: f32,
    /// Dissolve is angle-dependent (`d -halo`).
    pub halo_dissolve: bool,
    /// Specular exponent (`Ns`).
    pub specular_exponent: f32,
    /// Reflection sharpness (`sharpness`).
    pub sharpness: i64,
    /// Optical density / index of refraction (`Ni`).
    pub optical_density: f32,
    /// Texture anti-aliasing (`map_aat`).
    pub anti_aliasing: bool,

    /// Ambient texture (`map_Ka`).
    pub ambient_map: Option<MaterialMap>,
    /// Diffuse texture (`map_Kd`).
    pub diffuse_map: Option<MaterialMap>,
    /// Specular texture (`map_Ks`).
    pub specular_map: Option<MaterialMap>,
    /// Emissive texture (`map_Ke`).
    pub emissive_map: Option<MaterialMap>,
    /// Specular exponent texture (`map_Ns`).
    pub specular_exponent_map: Option<MaterialMap>,
    /// Dissolve texture (`map_d`).
    pub dissolve_map: Option<MaterialMap>,
    /// PBR roughness texture (`map_Pr`).
    pub roughness_map: Option<MaterialMap>,
    /// PBR metallic texture (`map_Pm`).
    pub metallic_map: Option<MaterialMap>,
    /// PBR sheen texture (`map_Ps`).
    pub sheen_map: Option<MaterialMap>,
    /// Normal map (`norm`).
    pub normal_map: Option<MaterialMap>,
    /// Decal texture (`decal`).
    pub decal_map: Option<MaterialMap>,
    /// Displacement texture (`disp`).
    pub displacement_map: Option<MaterialMap>,
    /// Bump texture (`bump`).
    pub bump_map: Option<MaterialMap>,
    /// Reflection maps (`refl`).
    pub reflection: ReflectionMaps,
}

impl Material {
    /// A material with format-default scalar fields and no colors or maps.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: None,
            diffuse: None,
            specular: None,
            emissive: None,
            transmission_filter: None,
            illumination_model: 0,
            dissolve: 1.0,
            halo_dissolve: false,
            specular_exponent: 0.0,
            sharpness: 60,
            optical_density: 1.0,
            anti_aliasing: false,
            ambient_map: None,
            diffuse_map: None,
            specular_map: None,
            emissive_map: None,
            specular_exponent_map: None,
            dissolve_map: None,
            roughness_map: None,
            metallic_map: None,
            sheen_map: None,
            normal_map: None,
            decal_map: None,
            displacement_map: None,
            bump_map: None,
            reflection: ReflectionMaps::default(),
        }
    }
}

/// A complete MTL material document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MtlDocument {
    /// Free-text header captured from the leading comment run, if any.
    pub header: Option<String>,
    /// Materials in declaration order.
    pub materials: Vec<Material>,
}

impl MtlDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a material by name.
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_scalar_defaults() {
        let material = Material::new("a");
        assert_eq!(material.illumination_model, 0);
        assert_eq!(material.dissolve, 1.0);
        assert_eq!(material.sharpness, 60);
        assert_eq!(material.optical_density, 1.0);
        assert!(!material.anti_aliasing);
    }

    #[test]
    fn test_map_option_defaults() {
        let map = MaterialMap::new("a.png");
        assert!(map.horizontal_blending);
        assert!(map.vertical_blending);
        assert!(!map.clamping);
        assert_eq!(map.bump_multiplier, 1.0);
        assert_eq!(map.modifier_base, 0.0);
        assert_eq!(map.modifier_gain, 1.0);
        assert_eq!(map.scale, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_material_lookup() {
        let mut doc = MtlDocument::new();
        doc.materials.push(Material::new("brick"));
        assert!(doc.material("brick").is_some());
        assert!(doc.material("stone").is_none());
    }
}
