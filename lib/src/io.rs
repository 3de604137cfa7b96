use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::Error;
use crate::error::Result;
use crate::mesh::Mesh;

/// Plain text mesh format (`v x y z r g b` / `f i j k`).
pub mod obj;
/// Binary little-endian PLY with per-vertex color.
pub mod ply;
/// Binary mesh container holding meshes and materials.
pub mod rex;

pub use obj::load_obj;
pub use obj::read_obj;
pub use obj::save_obj;
pub use obj::write_obj;
pub use ply::save_ply;
pub use ply::write_ply;
pub use rex::RexFile;
pub use rex::load_rex;
pub use rex::read_rex;
pub use rex::save_rex;
pub use rex::write_rex;
pub use rex::write_rex_file;

/// Opens `path` for buffered writing, creating parent directories as needed.
fn create(path: &Path) -> std::io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}

/// Writers refuse a mesh whose triangles point at missing vertices.
fn check_consistent(mesh: &Mesh, format: &'static str) -> Result<()> {
    if mesh.is_consistent() {
        return Ok(());
    }
    Err(Error::malformed(
        format,
        format!(
            "mesh {} is inconsistent: {} positions, {} colors, indices must lie in {}..{}",
            mesh.id,
            mesh.positions.len(),
            mesh.colors.len(),
            mesh.index_base.offset(),
            u64::from(mesh.index_base.offset()) + mesh.positions.len() as u64
        ),
    ))
}
