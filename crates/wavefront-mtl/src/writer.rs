//! MTL writer: emits one full, fixed-order attribute block per material.
//!
//! Scalar illumination fields are always written, even at their defaults;
//! colors and maps only when present. Map option flags are written only when
//! they differ from the format defaults, so a plain map statement stays a
//! plain map statement.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use wavefront_core::{Vec3, WavefrontError};

use crate::document::{Material, MaterialColor, MaterialMap, MtlDocument, ReflectionType};

/// Write an MTL document to a file path.
pub fn write_mtl(doc: &MtlDocument, path: impl AsRef<Path>) -> Result<(), WavefrontError> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    doc.write_to(&mut out)?;
    out.flush()?;
    Ok(())
}

/// Write an MTL document to an in-memory buffer.
pub fn write_mtl_to_buffer(doc: &MtlDocument) -> Result<Vec<u8>, WavefrontError> {
    let mut out = Vec::new();
    doc.write_to(&mut out)?;
    Ok(out)
}

impl MtlDocument {
    /// Write the canonical statement sequence to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(), WavefrontError> {
        if let Some(header) = &self.header {
            for line in header.lines() {
                writeln!(out, "# {line}")?;
            }
        }
        for material in &self.materials {
            write_material(out, material)?;
        }
        Ok(())
    }
}

/// Fixed 6-decimal representation used for every real-valued field.
fn fixed(value: f32) -> String {
    format!("{value:.6}")
}

fn write_material<W: Write>(out: &mut W, material: &Material) -> Result<(), WavefrontError> {
    writeln!(out, "newmtl {}", material.name)?;

    write_color(out, "Ka", &material.ambient)?;
    write_color(out, "Kd", &material.diffuse)?;
    write_color(out, "Ks", &material.specular)?;
    write_color(out, "Ke", &material.emissive)?;
    write_color(out, "Tf", &material.transmission_filter)?;

    writeln!(out, "illum {}", material.illumination_model)?;
    if material.halo_dissolve {
        writeln!(out, "d -halo {}", fixed(material.dissolve))?;
    } else {
        writeln!(out, "d {}", fixed(material.dissolve))?;
    }
    writeln!(out, "Ns {}", fixed(material.specular_exponent))?;
    writeln!(out, "sharpness {}", material.sharpness)?;
    writeln!(out, "Ni {}", fixed(material.optical_density))?;

    write_map(out, "map_Ka", &material.ambient_map)?;
    write_map(out, "map_Kd", &material.diffuse_map)?;
    write_map(out, "map_Ks", &material.specular_map)?;
    write_map(out, "map_Ke", &material.emissive_map)?;
    write_map(out, "map_Ns", &material.specular_exponent_map)?;
    write_map(out, "map_d", &material.dissolve_map)?;
    write_map(out, "map_Pr", &material.roughness_map)?;
    write_map(out, "map_Pm", &material.metallic_map)?;
    write_map(out, "map_Ps", &material.sheen_map)?;
    write_map(out, "norm", &material.normal_map)?;
    write_map(out, "decal", &material.decal_map)?;
    write_map(out, "disp", &material.displacement_map)?;
    write_map(out, "bump", &material.bump_map)?;
    for kind in ReflectionType::ALL {
        if let Some(map) = material.reflection.slot(kind) {
            write!(out, "refl -type {}", kind.keyword())?;
            write_map_tail(out, map)?;
        }
    }

    writeln!(out, "map_aat {}", on_off(material.anti_aliasing))?;
    Ok(())
}

fn write_color<W: Write>(
    out: &mut W,
    keyword: &str,
    color: &Option<MaterialColor>,
) -> Result<(), WavefrontError> {
    match color {
        None => {}
        Some(MaterialColor::Rgb { r, g, b }) => {
            writeln!(out, "{keyword} {} {} {}", fixed(*r), fixed(*g), fixed(*b))?;
        }
        Some(MaterialColor::Xyz { x, y, z }) => {
            writeln!(
                out,
                "{keyword} xyz {} {} {}",
                fixed(*x),
                fixed(*y),
                fixed(*z)
            )?;
        }
        Some(MaterialColor::Spectral { file, factor }) => {
            writeln!(out, "{keyword} spectral {file} {}", fixed(*factor))?;
        }
    }
    Ok(())
}

fn write_map<W: Write>(
    out: &mut W,
    keyword: &str,
    map: &Option<MaterialMap>,
) -> Result<(), WavefrontError> {
    if let Some(map) = map {
        write!(out, "{keyword}")?;
        write_map_tail(out, map)?;
    }
    Ok(())
}

/// Option flags differing from the format defaults, then the file name.
fn write_map_tail<W: Write>(out: &mut W, map: &MaterialMap) -> Result<(), WavefrontError> {
    if !map.horizontal_blending {
        write!(out, " -blenu off")?;
    }
    if !map.vertical_blending {
        write!(out, " -blenv off")?;
    }
    if map.color_correction {
        write!(out, " -cc on")?;
    }
    if map.clamping {
        write!(out, " -clamp on")?;
    }
    if map.bump_multiplier != 1.0 {
        write!(out, " -bm {}", fixed(map.bump_multiplier))?;
    }
    if let Some(boost) = map.boost {
        write!(out, " -boost {}", fixed(boost))?;
    }
    if map.modifier_base != 0.0 || map.modifier_gain != 1.0 {
        write!(
            out,
            " -mm {} {}",
            fixed(map.modifier_base),
            fixed(map.modifier_gain)
        )?;
    }
    if map.offset != Vec3::new(0.0, 0.0, 0.0) {
        write_vector(out, "-o", map.offset)?;
    }
    if map.scale != Vec3::new(1.0, 1.0, 1.0) {
        write_vector(out, "-s", map.scale)?;
    }
    if map.turbulence != Vec3::new(0.0, 0.0, 0.0) {
        write_vector(out, "-t", map.turbulence)?;
    }
    if let Some(resolution) = map.resolution {
        write!(out, " -texres {resolution}")?;
    }
    if let Some(channel) = map.channel {
        write!(out, " -imfchan {}", channel.code())?;
    }
    writeln!(out, " {}", map.file)?;
    Ok(())
}

fn write_vector<W: Write>(out: &mut W, option: &str, v: Vec3) -> Result<(), WavefrontError> {
    write!(out, " {option} {} {} {}", fixed(v.x), fixed(v.y), fixed(v.z))?;
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_mtl_from_buffer;

    fn roundtrip(input: &str) -> (MtlDocument, String) {
        let doc = read_mtl_from_buffer(input.as_bytes()).unwrap();
        let bytes = write_mtl_to_buffer(&doc).unwrap();
        (doc, String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_empty_document_writes_nothing() {
        let doc = MtlDocument::new();
        assert!(write_mtl_to_buffer(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_scalar_block_always_emitted() {
        let (_, text) = roundtrip("newmtl a\n");
        assert_eq!(
            text,
            "newmtl a\nillum 0\nd 1.000000\nNs 0.000000\nsharpness 60\nNi 1.000000\nmap_aat off\n"
        );
    }

    #[test]
    fn test_color_forms() {
        let (_, text) =
            roundtrip("newmtl a\nKa 0.25\nKd xyz 0.1 0.2 0.3\nTf spectral filter.rfl\n");
        assert!(text.contains("Ka 0.250000 0.250000 0.250000\n"));
        assert!(text.contains("Kd xyz 0.100000 0.200000 0.300000\n"));
        assert!(text.contains("Tf spectral filter.rfl 1.000000\n"));
    }

    #[test]
    fn test_plain_map_stays_plain() {
        let (_, text) = roundtrip("newmtl a\nmap_Kd wall.png\n");
        assert!(text.contains("map_Kd wall.png\n"));
    }

    #[test]
    fn test_map_options_emitted_when_non_default() {
        let (_, text) =
            roundtrip("newmtl a\nmap_Kd -blenu off -clamp on -mm 0.2 1.5 -s 2 wall.png\n");
        assert!(text.contains(
            "map_Kd -blenu off -clamp on -mm 0.200000 1.500000 \
             -s 2.000000 1.000000 1.000000 wall.png\n"
        ));
    }

    #[test]
    fn test_halo_dissolve() {
        let (_, text) = roundtrip("newmtl a\nd -halo 0.6\n");
        assert!(text.contains("d -halo 0.600000\n"));
    }

    #[test]
    fn test_reflection_slots() {
        let (_, text) = roundtrip("newmtl a\nrefl -type cube_left l.png\n");
        assert!(text.contains("refl -type cube_left l.png\n"));
    }

    #[test]
    fn test_header_written_as_leading_comments() {
        let (_, text) = roundtrip("# exported scene\n# two materials\n#\nnewmtl a\n");
        assert!(text.starts_with("# exported scene\n# two materials\nnewmtl a\n"));
    }

    #[test]
    fn test_write_read_roundtrip() {
        let input = "\
# exported\n\
newmtl red brick\nKa 0.1\nKd 0.6 0.2 0.2\nKs xyz 0.3 0.3 0.3\nKe 0 0 0\n\
Tf spectral f.rfl 0.5\nillum 2\nd -halo 0.8\nNs 50\nsharpness 20\nNi 1.33\n\
map_Kd -clamp on -o 1 2 3 -imfchan g diff.png\nbump -bm 0.3 b.png\n\
refl -type sphere env.png\nmap_aat on\n\
newmtl plain\n";
        let (doc, text) = roundtrip(input);
        let reparsed = read_mtl_from_buffer(text.as_bytes()).unwrap();
        assert_eq!(doc, reparsed);
    }
}
