//! MTL statement interpreter: builds an [`MtlDocument`] from logical lines.
//!
//! The first token of each line selects a handler through an enumerated
//! statement kind. Unknown keywords are skipped for forward compatibility.
//! Every recognized statement except `newmtl` requires a current material
//! and fails when none has been declared yet.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use wavefront_core::{LineReader, LogicalLine, Vec3, WavefrontError};

use crate::document::{
    MapChannel, Material, MaterialColor, MaterialMap, MtlDocument, ReflectionType,
};

/// Settings controlling how material documents are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MtlReadSettings {
    /// Preserve internal whitespace runs in map file names instead of
    /// collapsing them to single spaces.
    pub preserve_map_whitespace: bool,
}

/// Read an MTL document from a file path, with default settings.
pub fn read_mtl(path: impl AsRef<Path>) -> Result<MtlDocument, WavefrontError> {
    let file = File::open(path)?;
    read_from(BufReader::new(file), MtlReadSettings::default())
}

/// Read an MTL document from a byte buffer, with default settings.
pub fn read_mtl_from_buffer(data: &[u8]) -> Result<MtlDocument, WavefrontError> {
    read_from(data, MtlReadSettings::default())
}

/// Read an MTL document from a byte buffer with explicit settings.
pub fn read_mtl_with_settings(
    data: &[u8],
    settings: MtlReadSettings,
) -> Result<MtlDocument, WavefrontError> {
    read_from(data, settings)
}

fn read_from<R: BufRead>(
    input: R,
    settings: MtlReadSettings,
) -> Result<MtlDocument, WavefrontError> {
    let mut lines = LineReader::with_header_capture(input);
    let mut interpreter = Interpreter {
        doc: MtlDocument::new(),
        settings,
    };
    while let Some(line) = lines.next_line()? {
        interpreter.handle(&line)?;
    }
    interpreter.doc.header = lines.header().map(str::to_string);
    Ok(interpreter.doc)
}

/// Recognized statement kinds of the MTL grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    NewMaterial,
    Ambient,
    Diffuse,
    Specular,
    Emissive,
    TransmissionFilter,
    Illumination,
    Dissolve,
    SpecularExponent,
    Sharpness,
    OpticalDensity,
    AntiAliasing,
    AmbientMap,
    DiffuseMap,
    SpecularMap,
    EmissiveMap,
    SpecularExponentMap,
    DissolveMap,
    RoughnessMap,
    MetallicMap,
    SheenMap,
    NormalMap,
    DecalMap,
    DisplacementMap,
    BumpMap,
    ReflectionMap,
}

impl Keyword {
    fn lookup(keyword: &str) -> Option<Keyword> {
        match keyword {
            "newmtl" => Some(Keyword::NewMaterial),
            "Ka" => Some(Keyword::Ambient),
            "Kd" => Some(Keyword::Diffuse),
            "Ks" => Some(Keyword::Specular),
            "Ke" => Some(Keyword::Emissive),
            "Tf" => Some(Keyword::TransmissionFilter),
            "illum" => Some(Keyword::Illumination),
            "d" => Some(Keyword::Dissolve),
            "Ns" => Some(Keyword::SpecularExponent),
            "sharpness" => Some(Keyword::Sharpness),
            "Ni" => Some(Keyword::OpticalDensity),
            "map_aat" => Some(Keyword::AntiAliasing),
            "map_Ka" => Some(Keyword::AmbientMap),
            "map_Kd" => Some(Keyword::DiffuseMap),
            "map_Ks" => Some(Keyword::SpecularMap),
            "map_Ke" => Some(Keyword::EmissiveMap),
            "map_Ns" => Some(Keyword::SpecularExponentMap),
            "map_d" => Some(Keyword::DissolveMap),
            "map_Pr" => Some(Keyword::RoughnessMap),
            "map_Pm" => Some(Keyword::MetallicMap),
            "map_Ps" => Some(Keyword::SheenMap),
            "norm" => Some(Keyword::NormalMap),
            "decal" => Some(Keyword::DecalMap),
            "disp" => Some(Keyword::DisplacementMap),
            "bump" => Some(Keyword::BumpMap),
            "refl" => Some(Keyword::ReflectionMap),
            _ => None,
        }
    }
}

struct Interpreter {
    doc: MtlDocument,
    settings: MtlReadSettings,
}

impl Interpreter {
    fn handle(&mut self, line: &LogicalLine) -> Result<(), WavefrontError> {
        let no = line.number();
        let Some(keyword) = Keyword::lookup(line.keyword()) else {
            // Unknown statements are skipped, even before any newmtl.
            return Ok(());
        };

        if keyword == Keyword::NewMaterial {
            let tokens = line.tokens();
            if tokens.len() < 2 {
                return Err(WavefrontError::statement(no, "newmtl requires a name"));
            }
            self.doc.materials.push(Material::new(tokens[1..].join(" ")));
            return Ok(());
        }
        if self.doc.materials.is_empty() {
            return Err(WavefrontError::statement(
                no,
                format!("{}: no material declared yet", line.keyword()),
            ));
        }

        let tokens = line.tokens();
        let args = &tokens[1..];
        match keyword {
            Keyword::NewMaterial => {}
            Keyword::Ambient => self.current().ambient = Some(color(no, "Ka", args)?),
            Keyword::Diffuse => self.current().diffuse = Some(color(no, "Kd", args)?),
            Keyword::Specular => self.current().specular = Some(color(no, "Ks", args)?),
            Keyword::Emissive => self.current().emissive = Some(color(no, "Ke", args)?),
            Keyword::TransmissionFilter => {
                self.current().transmission_filter = Some(color(no, "Tf", args)?);
            }
            Keyword::Illumination => {
                self.current().illumination_model = single_int(no, "illum", args)?;
            }
            Keyword::Dissolve => self.dissolve(no, args)?,
            Keyword::SpecularExponent => {
                self.current().specular_exponent = single_float(no, "Ns", args)?;
            }
            Keyword::Sharpness => self.current().sharpness = single_int(no, "sharpness", args)?,
            Keyword::OpticalDensity => {
                self.current().optical_density = single_float(no, "Ni", args)?;
            }
            Keyword::AntiAliasing => {
                self.current().anti_aliasing = single_on_off(no, "map_aat", args)?;
            }
            Keyword::AmbientMap => {
                let map = self.texture_map(line, 1)?;
                self.current().ambient_map = Some(map);
            }
            Keyword::DiffuseMap => {
                let map = self.texture_map(line, 1)?;
                self.current().diffuse_map = Some(map);
            }
            Keyword::SpecularMap => {
                let map = self.texture_map(line, 1)?;
                self.current().specular_map = Some(map);
            }
            Keyword::EmissiveMap => {
                let map = self.texture_map(line, 1)?;
                self.current().emissive_map = Some(map);
            }
            Keyword::SpecularExponentMap => {
                let map = self.texture_map(line, 1)?;
                self.current().specular_exponent_map = Some(map);
            }
            Keyword::DissolveMap => {
                let map = self.texture_map(line, 1)?;
                self.current().dissolve_map = Some(map);
            }
            Keyword::RoughnessMap => {
                let map = self.texture_map(line, 1)?;
                self.current().roughness_map = Some(map);
            }
            Keyword::MetallicMap => {
                let map = self.texture_map(line, 1)?;
                self.current().metallic_map = Some(map);
            }
            Keyword::SheenMap => {
                let map = self.texture_map(line, 1)?;
                self.current().sheen_map = Some(map);
            }
            Keyword::NormalMap => {
                let map = self.texture_map(line, 1)?;
                self.current().normal_map = Some(map);
            }
            Keyword::DecalMap => {
                let map = self.texture_map(line, 1)?;
                self.current().decal_map = Some(map);
            }
            Keyword::DisplacementMap => {
                let map = self.texture_map(line, 1)?;
                self.current().displacement_map = Some(map);
            }
            Keyword::BumpMap => {
                let map = self.texture_map(line, 1)?;
                self.current().bump_map = Some(map);
            }
            Keyword::ReflectionMap => self.reflection(line)?,
        }
        Ok(())
    }

    /// The most recently declared material. Callers guard against an empty
    /// material list first.
    fn current(&mut self) -> &mut Material {
        self.doc.materials.last_mut().unwrap()
    }

    fn dissolve(&mut self, no: usize, args: &[&str]) -> Result<(), WavefrontError> {
        let (halo, value) = match args {
            ["-halo", value] => (true, value),
            [value] => (false, value),
            _ => {
                return Err(WavefrontError::statement(
                    no,
                    "d requires one value, optionally preceded by -halo",
                ));
            }
        };
        let material = self.current();
        material.halo_dissolve = halo;
        material.dissolve = parse_float(no, "d", value)?;
        Ok(())
    }

    /// Parse a reflection-map statement. Unknown `-type` values are accepted
    /// and discarded without setting any slot.
    fn reflection(&mut self, line: &LogicalLine) -> Result<(), WavefrontError> {
        let no = line.number();
        if line.token(1) != Some("-type") {
            return Err(WavefrontError::statement(
                no,
                "refl requires a -type keyword",
            ));
        }
        let Some(kind) = line.token(2) else {
            return Err(WavefrontError::statement(no, "refl requires a type value"));
        };
        let Some(kind) = ReflectionType::from_keyword(kind) else {
            return Ok(());
        };
        let map = self.texture_map(line, 3)?;
        *self.current().reflection.slot_mut(kind) = Some(map);
        Ok(())
    }

    /// Parse a leading run of `-option value...` flags starting at token
    /// `from`, then take the remaining tokens as the file name.
    fn texture_map(
        &self,
        line: &LogicalLine,
        from: usize,
    ) -> Result<MaterialMap, WavefrontError> {
        let no = line.number();
        let tokens = line.tokens();
        let mut map = MaterialMap::default();
        let mut i = from;
        while i < tokens.len() && tokens[i].starts_with('-') {
            let option = tokens[i];
            i += 1;
            match option {
                "-blenu" => map.horizontal_blending = on_off_value(no, option, &tokens, &mut i)?,
                "-blenv" => map.vertical_blending = on_off_value(no, option, &tokens, &mut i)?,
                "-cc" => map.color_correction = on_off_value(no, option, &tokens, &mut i)?,
                "-clamp" => map.clamping = on_off_value(no, option, &tokens, &mut i)?,
                "-bm" => map.bump_multiplier = float_value(no, option, &tokens, &mut i)?,
                "-boost" => map.boost = Some(float_value(no, option, &tokens, &mut i)?),
                "-mm" => {
                    map.modifier_base = float_value(no, option, &tokens, &mut i)?;
                    map.modifier_gain = float_value(no, option, &tokens, &mut i)?;
                }
                "-o" => map.offset = vector_value(no, option, &tokens, &mut i, 0.0)?,
                "-s" => map.scale = vector_value(no, option, &tokens, &mut i, 1.0)?,
                "-t" => map.turbulence = vector_value(no, option, &tokens, &mut i, 0.0)?,
                "-texres" => map.resolution = Some(int_value(no, option, &tokens, &mut i)?),
                "-imfchan" => {
                    let code = take_value(no, option, &tokens, &mut i)?;
                    map.channel = Some(MapChannel::from_code(code).ok_or_else(|| {
                        WavefrontError::statement(
                            no,
                            format!("-imfchan requires one of r|g|b|m|l|z, got '{code}'"),
                        )
                    })?);
                }
                _ => {
                    return Err(WavefrontError::statement(
                        no,
                        format!("unrecognized map option '{option}'"),
                    ));
                }
            }
        }
        let file = if self.settings.preserve_map_whitespace {
            line.rest_verbatim(i).to_string()
        } else {
            tokens[i..].join(" ")
        };
        if file.is_empty() {
            return Err(WavefrontError::statement(
                no,
                format!("{} requires a file name", line.keyword()),
            ));
        }
        map.file = file;
        Ok(map)
    }
}

fn color(no: usize, keyword: &str, args: &[&str]) -> Result<MaterialColor, WavefrontError> {
    match args {
        [value] => Ok(MaterialColor::gray(parse_float(no, keyword, value)?)),
        [r, g, b] if *r != "xyz" && *r != "spectral" => Ok(MaterialColor::Rgb {
            r: parse_float(no, keyword, r)?,
            g: parse_float(no, keyword, g)?,
            b: parse_float(no, keyword, b)?,
        }),
        ["xyz", value] => {
            let value = parse_float(no, keyword, value)?;
            Ok(MaterialColor::Xyz {
                x: value,
                y: value,
                z: value,
            })
        }
        ["xyz", x, y, z] => Ok(MaterialColor::Xyz {
            x: parse_float(no, keyword, x)?,
            y: parse_float(no, keyword, y)?,
            z: parse_float(no, keyword, z)?,
        }),
        ["spectral", file] => Ok(MaterialColor::Spectral {
            file: (*file).to_string(),
            factor: 1.0,
        }),
        ["spectral", file, factor] => Ok(MaterialColor::Spectral {
            file: (*file).to_string(),
            factor: parse_float(no, keyword, factor)?,
        }),
        _ => Err(WavefrontError::statement(
            no,
            format!("{keyword} requires a gray, RGB, xyz, or spectral color"),
        )),
    }
}

fn parse_float(no: usize, keyword: &str, token: &str) -> Result<f32, WavefrontError> {
    token.parse().map_err(|_| {
        WavefrontError::statement(no, format!("{keyword} requires a number, got '{token}'"))
    })
}

fn single_float(no: usize, keyword: &str, args: &[&str]) -> Result<f32, WavefrontError> {
    match args {
        [token] => parse_float(no, keyword, token),
        _ => Err(WavefrontError::statement(
            no,
            format!("{keyword} requires exactly one value"),
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

fn take_value<'a>(
    no: usize,
    option: &str,
    tokens: &[&'a str],
    i: &mut usize,
) -> Result<&'a str, WavefrontError> {
    match tokens.get(*i) {
        Some(token) => {
            *i += 1;
            Ok(token)
        }
        None => Err(WavefrontError::statement(
            no,
            format!("{option} requires a value"),
        )),
    }
}

fn on_off_value(
    no: usize,
    option: &str,
    tokens: &[&str],
    i: &mut usize,
) -> Result<bool, WavefrontError> {
    match take_value(no, option, tokens, i)? {
        "on" => Ok(true),
        "off" => Ok(false),
        token => Err(WavefrontError::statement(
            no,
            format!("{option} requires 'on' or 'off', got '{token}'"),
        )),
    }
}

fn float_value(
    no: usize,
    option: &str,
    tokens: &[&str],
    i: &mut usize,
) -> Result<f32, WavefrontError> {
    let token = take_value(no, option, tokens, i)?;
    token.parse().map_err(|_| {
        WavefrontError::statement(no, format!("{option} requires a number, got '{token}'"))
    })
}

fn int_value(
    no: usize,
    option: &str,
    tokens: &[&str],
    i: &mut usize,
) -> Result<i64, WavefrontError> {
    let token = take_value(no, option, tokens, i)?;
    token.parse().map_err(|_| {
        WavefrontError::statement(no, format!("{option} requires an integer, got '{token}'"))
    })
}

/// One-to-three component option value; omitted components take `default`.
/// Trailing components are consumed only while they parse as numbers, so a
/// file name following a one-component `-s 2` is left alone.
fn vector_value(
    no: usize,
    option: &str,
    tokens: &[&str],
    i: &mut usize,
    default: f32,
) -> Result<Vec3, WavefrontError> {
    let first = float_value(no, option, tokens, i)?;
    let mut out = Vec3::new(first, default, default);
    for slot in [&mut out.y, &mut out.z] {
        match tokens.get(*i).and_then(|t| t.parse::<f32>().ok()) {
            Some(value) => {
                *slot = value;
                *i += 1;
            }
            None => break,
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> MtlDocument {
        read_mtl_from_buffer(input.as_bytes()).unwrap()
    }

    fn parse_err(input: &str) -> WavefrontError {
        read_mtl_from_buffer(input.as_bytes()).unwrap_err()
    }

    #[test]
    fn test_basic_material() {
        let doc = parse(
            "newmtl brick\nKa 0.1 0.1 0.1\nKd 0.5 0.4 0.3\nKs 1 1 1\n\
             illum 2\nd 0.9\nNs 96.0\nsharpness 30\nNi 1.5\nmap_aat on\n",
        );
        assert_eq!(doc.materials.len(), 1);
        let m = &doc.materials[0];
        assert_eq!(m.name, "brick");
        assert_eq!(
            m.diffuse,
            Some(MaterialColor::Rgb {
                r: 0.5,
                g: 0.4,
                b: 0.3
            })
        );
        assert_eq!(m.illumination_model, 2);
        assert_eq!(m.dissolve, 0.9);
        assert!(!m.halo_dissolve);
        assert_eq!(m.specular_exponent, 96.0);
        assert_eq!(m.sharpness, 30);
        assert_eq!(m.optical_density, 1.5);
        assert!(m.anti_aliasing);
    }

    #[test]
    fn test_material_name_with_spaces() {
        let doc = parse("newmtl red brick wall\nKd 1 0 0\n");
        assert_eq!(doc.materials[0].name, "red brick wall");
    }

    #[test]
    fn test_newmtl_requires_name() {
        let err = parse_err("newmtl\n");
        assert!(matches!(err, WavefrontError::Statement { line: 1, .. }));
    }

    #[test]
    fn test_gray_color_form() {
        let doc = parse("newmtl a\nKa 0.25\n");
        assert_eq!(doc.materials[0].ambient, Some(MaterialColor::gray(0.25)));
    }

    #[test]
    fn test_xyz_color_forms() {
        let doc = parse("newmtl a\nKa xyz 0.3\nKd xyz 0.1 0.2 0.3\n");
        let m = &doc.materials[0];
        assert_eq!(
            m.ambient,
            Some(MaterialColor::Xyz {
                x: 0.3,
                y: 0.3,
                z: 0.3
            })
        );
        assert_eq!(
            m.diffuse,
            Some(MaterialColor::Xyz {
                x: 0.1,
                y: 0.2,
                z: 0.3
            })
        );
    }

    #[test]
    fn test_spectral_color_default_factor() {
        let doc = parse("newmtl a\nTf spectral filter.rfl\nKa spectral amb.rfl 0.5\n");
        let m = &doc.materials[0];
        assert_eq!(
            m.transmission_filter,
            Some(MaterialColor::Spectral {
                file: "filter.rfl".to_string(),
                factor: 1.0
            })
        );
        assert_eq!(
            m.ambient,
            Some(MaterialColor::Spectral {
                file: "amb.rfl".to_string(),
                factor: 0.5
            })
        );
    }

    #[test]
    fn test_malformed_color() {
        assert!(matches!(
            parse_err("newmtl a\nKa 1 2\n"),
            WavefrontError::Statement { line: 2, .. }
        ));
        assert!(matches!(
            parse_err("newmtl a\nKa one\n"),
            WavefrontError::Statement { line: 2, .. }
        ));
    }

    #[test]
    fn test_halo_dissolve() {
        let doc = parse("newmtl a\nd -halo 0.6\n");
        assert!(doc.materials[0].halo_dissolve);
        assert_eq!(doc.materials[0].dissolve, 0.6);
    }

    #[test]
    fn test_known_statement_before_newmtl_fails() {
        let err = parse_err("Kd 1 0 0\n");
        match err {
            WavefrontError::Statement { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("no material declared yet"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_statement_before_newmtl_skipped() {
        let doc = parse("curl 3\nnewmtl a\nKd 1 0 0\n");
        assert_eq!(doc.materials.len(), 1);
    }

    #[test]
    fn test_unknown_statement_inside_material_skipped() {
        let doc = parse("newmtl a\nKd 1 0 0\nfancy_new_field 7\n");
        assert!(doc.materials[0].diffuse.is_some());
    }

    #[test]
    fn test_plain_map() {
        let doc = parse("newmtl a\nmap_Kd textures/wall.png\n");
        let map = doc.materials[0].diffuse_map.as_ref().unwrap();
        assert_eq!(map.file, "textures/wall.png");
        assert_eq!(*map, MaterialMap::new("textures/wall.png"));
    }

    #[test]
    fn test_map_options() {
        let doc = parse(
            "newmtl a\nmap_Kd -blenu off -cc on -clamp on -mm 0.2 1.5 -o 1 2 -s 2 \
             -imfchan r wall.png\n",
        );
        let map = doc.materials[0].diffuse_map.as_ref().unwrap();
        assert!(!map.horizontal_blending);
        assert!(map.vertical_blending);
        assert!(map.color_correction);
        assert!(map.clamping);
        assert_eq!(map.modifier_base, 0.2);
        assert_eq!(map.modifier_gain, 1.5);
        assert_eq!(map.offset, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(map.scale, Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(map.channel, Some(MapChannel::Red));
        assert_eq!(map.file, "wall.png");
    }

    #[test]
    fn test_bump_boost_and_texres() {
        let doc = parse("newmtl a\nbump -bm 0.4 -boost 2 -texres 512 b.png\n");
        let map = doc.materials[0].bump_map.as_ref().unwrap();
        assert_eq!(map.bump_multiplier, 0.4);
        assert_eq!(map.boost, Some(2.0));
        assert_eq!(map.resolution, Some(512));
    }

    #[test]
    fn test_unrecognized_map_option_fails() {
        assert!(matches!(
            parse_err("newmtl a\nmap_Kd -frobnicate on wall.png\n"),
            WavefrontError::Statement { line: 2, .. }
        ));
    }

    #[test]
    fn test_map_requires_file_name() {
        assert!(matches!(
            parse_err("newmtl a\nmap_Kd -clamp on\n"),
            WavefrontError::Statement { line: 2, .. }
        ));
    }

    #[test]
    fn test_map_filename_whitespace_collapsed_by_default() {
        let doc = parse("newmtl a\nmap_Ka b   b\n");
        assert_eq!(doc.materials[0].ambient_map.as_ref().unwrap().file, "b b");
    }

    #[test]
    fn test_map_filename_whitespace_preserved_when_configured() {
        let settings = MtlReadSettings {
            preserve_map_whitespace: true,
        };
        let doc = read_mtl_with_settings("newmtl a\nmap_Ka b   b\n".as_bytes(), settings).unwrap();
        assert_eq!(doc.materials[0].ambient_map.as_ref().unwrap().file, "b   b");
    }

    #[test]
    fn test_pbr_maps() {
        let doc = parse("newmtl a\nmap_Pr r.png\nmap_Pm m.png\nmap_Ps s.png\nnorm n.png\n");
        let m = &doc.materials[0];
        assert!(m.roughness_map.is_some());
        assert!(m.metallic_map.is_some());
        assert!(m.sheen_map.is_some());
        assert_eq!(m.normal_map.as_ref().unwrap().file, "n.png");
    }

    #[test]
    fn test_reflection_maps() {
        let doc = parse("newmtl a\nrefl -type sphere env.png\nrefl -type cube_top up.png\n");
        let m = &doc.materials[0];
        assert_eq!(m.reflection.sphere.as_ref().unwrap().file, "env.png");
        assert_eq!(m.reflection.cube_top.as_ref().unwrap().file, "up.png");
        assert!(m.reflection.cube_bottom.is_none());
    }

    #[test]
    fn test_unknown_reflection_type_discarded() {
        let doc = parse("newmtl a\nrefl -type dome env.png\n");
        let m = &doc.materials[0];
        assert_eq!(m.reflection, Default::default());
    }

    #[test]
    fn test_reflection_requires_type() {
        assert!(matches!(
            parse_err("newmtl a\nrefl env.png\n"),
            WavefrontError::Statement { line: 2, .. }
        ));
    }

    #[test]
    fn test_multiple_materials() {
        let doc = parse("newmtl a\nKd 1 0 0\nnewmtl b\nKd 0 1 0\n");
        assert_eq!(doc.materials.len(), 2);
        assert!(doc.material("a").unwrap().diffuse.is_some());
        assert!(doc.material("b").unwrap().diffuse.is_some());
    }

    #[test]
    fn test_header_capture() {
        let doc = parse("# exported scene\n# materials: 1\n#\nnewmtl a\nKd 1 0 0\n");
        assert_eq!(doc.header.as_deref(), Some("exported scene\nmaterials: 1"));
    }

    #[test]
    fn test_no_header_without_leading_comments() {
        let doc = parse("newmtl a\n# not a header\nKd 1 0 0\n");
        assert_eq!(doc.header, None);
    }
}
