use std::io::Write;
use std::path::Path;

use byteorder::LittleEndian;
use byteorder::WriteBytesExt;
use log::info;

use crate::error::Result;
use crate::mesh::Mesh;

/// Write a mesh as binary PLY.
///
/// Vertices carry float `x y z` and uchar `red green blue`, faces are a
/// `uchar int` index list.
///
/// # Errors
///   [`crate::Error::Malformed`] when the mesh is not consistent, otherwise
///   when the writer fails.
pub fn write_ply<W: Write>(writer: &mut W, mesh: &Mesh) -> Result<()> {
    super::check_consistent(mesh, "ply")?;
    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "comment reconstructed by depth_mesh")?;
    writeln!(writer, "element vertex {}", mesh.vertex_count())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "element face {}", mesh.triangle_count())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    let mut buffer: Vec<u8> =
        Vec::with_capacity(mesh.vertex_count() * 15 + mesh.triangle_count() * 13);
    for (pos, color) in mesh.positions.iter().zip(&mesh.colors) {
        for f in pos.to_array() {
            buffer.write_f32::<LittleEndian>(f)?;
        }
        for c in color.to_array() {
            buffer.push(channel(c));
        }
    }
    for t in mesh.zero_based_triangles() {
        buffer.push(3);
        for i in t {
            // PLY "int" is signed, indices beyond i32::MAX cannot be expressed.
            #[allow(clippy::cast_possible_wrap)]
            let i = i as i32;
            buffer.write_i32::<LittleEndian>(i)?;
        }
    }
    writer.write_all(&buffer)?;
    Ok(())
}

/// Write a mesh to a `.ply` file.
///
/// # Errors
///   When the file cannot be created or written to.
pub fn save_ply(path: &Path, mesh: &Mesh) -> Result<()> {
    let mut writer = super::create(path)?;
    write_ply(&mut writer, mesh)?;
    writer.flush()?;
    info!("save_ply - wrote {}", path.display());
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
