use std::io::BufRead;
use std::io::Write;
use std::path::Path;

use glam::Vec3;
use log::info;

use crate::error::Error;
use crate::error::Result;
use crate::mesh::Material;
use crate::mesh::Mesh;
use crate::mesh::Triangle;

const FORMAT: &str = "obj";

/// Write a mesh as text.
///
/// One `v x y z r g b` line per vertex followed by one `f i j k` line per
/// triangle. Face indices are always 1-based, independent of the mesh's
/// `index_base`.
///
/// # Errors
///   [`Error::Malformed`] when the mesh is not consistent, otherwise when the
///   writer fails.
pub fn write_obj<W: Write>(writer: &mut W, mesh: &Mesh) -> Result<()> {
    super::check_consistent(mesh, FORMAT)?;
    writeln!(
        writer,
        "# {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;
    for (p, c) in mesh.positions.iter().zip(&mesh.colors) {
        writeln!(writer, "v {} {} {} {} {} {}", p.x, p.y, p.z, c.x, c.y, c.z)?;
    }
    for [a, b, c] in mesh.zero_based_triangles() {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}

/// Write a mesh to an `.obj` file.
///
/// # Errors
///   When the file cannot be created or written to.
pub fn save_obj(path: &Path, mesh: &Mesh) -> Result<()> {
    let mut writer = super::create(path)?;
    write_obj(&mut writer, mesh)?;
    writer.flush()?;
    info!("save_obj - wrote {}", path.display());
    Ok(())
}

/// Parse `v` and `f` statements back into a 0-based mesh.
///
/// Comments and other statements are skipped. Vertices without color are
/// white. Face corners of the form `i/t/n` keep only `i`.
///
/// # Errors
///   [`Error::Malformed`] on unparsable numbers, non triangular faces or
///   indices that reference no vertex.
pub fn read_obj<R: BufRead>(reader: R) -> Result<Mesh> {
    let mut mesh = Mesh::empty(0, Material::default());

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let values = parts
                    .map(|s| parse_float(s, number))
                    .collect::<Result<Vec<f32>>>()?;
                let (pos, color) = match values[..] {
                    [x, y, z] => (Vec3::new(x, y, z), Vec3::ONE),
                    [x, y, z, r, g, b] => (Vec3::new(x, y, z), Vec3::new(r, g, b)),
                    _ => {
                        return Err(Error::malformed(
                            FORMAT,
                            format!("line {}: expected 3 or 6 vertex values", number + 1),
                        ));
                    }
                };
                mesh.positions.push(pos);
                mesh.colors.push(color);
            }
            Some("f") => {
                let corners = parts
                    .map(|s| parse_corner(s, number))
                    .collect::<Result<Vec<u32>>>()?;
                let &[a, b, c] = corners.as_slice() else {
                    return Err(Error::malformed(
                        FORMAT,
                        format!("line {}: only triangles are supported", number + 1),
                    ));
                };
                mesh.triangles.push(Triangle([a, b, c]));
            }
            _ => {}
        }
    }

    let count = mesh.positions.len();
    if let Some(bad) = mesh
        .triangles
        .iter()
        .flat_map(|t| t.0)
        .find(|&i| i as usize >= count)
    {
        return Err(Error::malformed(
            FORMAT,
            format!("face index {} exceeds vertex count {count}", bad + 1),
        ));
    }
    Ok(mesh)
}

/// Read a mesh from an `.obj` file.
///
/// # Errors
///   When the file cannot be opened or does not parse.
pub fn load_obj(path: &Path) -> Result<Mesh> {
    let file = std::fs::File::open(path)?;
    read_obj(std::io::BufReader::new(file))
}

fn parse_float(s: &str, number: usize) -> Result<f32> {
    s.parse().map_err(|_| {
        Error::malformed(FORMAT, format!("line {}: bad number {s:?}", number + 1))
    })
}

// 1-based on disk, 0-based in memory.
fn parse_corner(s: &str, number: usize) -> Result<u32> {
    let index = s.split('/').next().unwrap_or_default();
    match index.parse::<u32>() {
        Ok(i) if i > 0 => Ok(i - 1),
        _ => Err(Error::malformed(
            FORMAT,
            format!("line {}: bad face index {s:?}", number + 1),
        )),
    }
}
