//! A little-endian container of typed data blocks.
//!
//! ```text
//! file header        64 bytes
//!   magic            "REX1"
//!   version          u16
//!   crc              u32 (unused, 0)
//!   block count      u16
//!   start of data    u16 (offset of the first data block)
//!   data size        u64 (bytes of all data blocks, headers included)
//!   reserved         42 bytes
//! coordinate system  srid u32, authority (u16 length + bytes), offset 3 x f32
//! data block         type u16, version u16, body size u32, id u64, body
//! ```
//!
//! Mesh blocks (type 3) start with a 128 byte header: lod u16, max lod u16,
//! counts of vertices / normals / texture coords / colors / triangles (u32
//! each), their byte offsets from the start of the body (u32 each), the
//! material id (u64) and a name (u16 length + 74 bytes). Positions and
//! colors are `3 x f32`, triangles are `3 x u32` and 0-based.
//!
//! Material blocks (type 5) hold ambient, diffuse and specular rgb (`3 x f32`)
//! each followed by a texture id (u64), then shininess and alpha (f32).

use std::io::Cursor;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use byteorder::LittleEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use glam::Vec3;
use log::debug;
use log::info;

use crate::error::Error;
use crate::error::Result;
use crate::mesh::Material;
use crate::mesh::Mesh;
use crate::mesh::Triangle;
use crate::params::IndexBase;

const FORMAT: &str = "rex";

const MAGIC: &[u8; 4] = b"REX1";
const VERSION: u16 = 1;
const FILE_HEADER_SIZE: u16 = 64;
const RESERVED_SIZE: usize = 42;
// srid + empty authority + offset
const COORDINATE_BLOCK_SIZE: u16 = 4 + 2 + 12;

const MESH_BLOCK: u16 = 3;
const MATERIAL_BLOCK: u16 = 5;
const BLOCK_VERSION: u16 = 1;

const MESH_HEADER_SIZE: u32 = 128;
const MESH_NAME_SIZE: usize = 74;
const MESH_NAME: &str = "depth_mesh";

const NO_TEXTURE: u64 = u64::MAX;

/// Meshes and materials read from, or written to, a container.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RexFile {
    /// Meshes in file order. Each carries the material it references.
    pub meshes: Vec<Mesh>,
    /// Materials in file order.
    pub materials: Vec<Material>,
}

/// Write a single mesh and its material.
///
/// # Errors
///   When the mesh is not consistent, is too large for 32 bit counts, or the
///   writer fails.
pub fn write_rex<W: Write>(writer: &mut W, mesh: &Mesh) -> Result<()> {
    write_blocks(writer, &[mesh], &[mesh.material])
}

/// Write every mesh and material of `file`.
///
/// # Errors
///   When a mesh is not consistent, is too large for 32 bit counts, or the
///   writer fails.
pub fn write_rex_file<W: Write>(writer: &mut W, file: &RexFile) -> Result<()> {
    let meshes: Vec<&Mesh> = file.meshes.iter().collect();
    write_blocks(writer, &meshes, &file.materials)
}

/// Write a mesh to a `.rex` file.
///
/// # Errors
///   When the file cannot be created or written to.
pub fn save_rex(path: &Path, mesh: &Mesh) -> Result<()> {
    let mut writer = super::create(path)?;
    write_rex(&mut writer, mesh)?;
    writer.flush()?;
    info!("save_rex - wrote {}", path.display());
    Ok(())
}

fn write_blocks<W: Write>(
    writer: &mut W,
    meshes: &[&Mesh],
    materials: &[Material],
) -> Result<()> {
    let mut blocks: Vec<u8> = vec![];
    for mesh in meshes {
        let body = mesh_body(mesh)?;
        write_block_header(&mut blocks, MESH_BLOCK, &body, mesh.id)?;
        blocks.extend_from_slice(&body);
    }
    for material in materials {
        let body = material_body(material)?;
        write_block_header(&mut blocks, MATERIAL_BLOCK, &body, material.id)?;
        blocks.extend_from_slice(&body);
    }

    let block_count = u16::try_from(meshes.len() + materials.len())
        .map_err(|_| Error::malformed(FORMAT, "more than 65535 blocks"))?;

    // Header
    writer.write_all(MAGIC)?;
    writer.write_u16::<LittleEndian>(VERSION)?;
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_u16::<LittleEndian>(block_count)?;
    writer.write_u16::<LittleEndian>(FILE_HEADER_SIZE + COORDINATE_BLOCK_SIZE)?;
    writer.write_u64::<LittleEndian>(blocks.len() as u64)?;
    writer.write_all(&[0; RESERVED_SIZE])?;

    // Coordinate system: local, no authority, no offset.
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_u16::<LittleEndian>(0)?;
    for _ in 0..3 {
        writer.write_f32::<LittleEndian>(0.0)?;
    }

    writer.write_all(&blocks)?;
    Ok(())
}

fn write_block_header(out: &mut Vec<u8>, kind: u16, body: &[u8], id: u64) -> Result<()> {
    out.write_u16::<LittleEndian>(kind)?;
    out.write_u16::<LittleEndian>(BLOCK_VERSION)?;
    out.write_u32::<LittleEndian>(count(body.len())?)?;
    out.write_u64::<LittleEndian>(id)?;
    Ok(())
}

fn mesh_body(mesh: &Mesh) -> Result<Vec<u8>> {
    super::check_consistent(mesh, FORMAT)?;
    let vertex_count = count(mesh.positions.len())?;
    let color_count = count(mesh.colors.len())?;
    let triangle_count = count(mesh.triangles.len())?;

    let vertex_start = MESH_HEADER_SIZE;
    let color_start = vertex_start + vertex_count * 12;
    let triangle_start = color_start + color_count * 12;

    let mut body = Vec::with_capacity((triangle_start + triangle_count * 12) as usize);
    body.write_u16::<LittleEndian>(0)?; // lod
    body.write_u16::<LittleEndian>(0)?; // max lod
    body.write_u32::<LittleEndian>(vertex_count)?;
    body.write_u32::<LittleEndian>(0)?; // normals
    body.write_u32::<LittleEndian>(0)?; // texture coords
    body.write_u32::<LittleEndian>(color_count)?;
    body.write_u32::<LittleEndian>(triangle_count)?;
    body.write_u32::<LittleEndian>(vertex_start)?;
    body.write_u32::<LittleEndian>(color_start)?; // normals, empty
    body.write_u32::<LittleEndian>(color_start)?; // texture coords, empty
    body.write_u32::<LittleEndian>(color_start)?;
    body.write_u32::<LittleEndian>(triangle_start)?;
    body.write_u64::<LittleEndian>(mesh.material.id)?;

    let mut name = [0_u8; MESH_NAME_SIZE];
    name[..MESH_NAME.len()].copy_from_slice(MESH_NAME.as_bytes());
    #[allow(clippy::cast_possible_truncation)]
    let name_len = MESH_NAME.len() as u16;
    body.write_u16::<LittleEndian>(name_len)?;
    body.write_all(&name)?;

    for v in mesh.positions.iter().chain(&mesh.colors) {
        write_vec3(&mut body, *v)?;
    }
    for t in mesh.zero_based_triangles() {
        for i in t {
            body.write_u32::<LittleEndian>(i)?;
        }
    }
    Ok(body)
}

fn material_body(material: &Material) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(68);
    // ambient
    write_vec3(&mut body, Vec3::ZERO)?;
    body.write_u64::<LittleEndian>(NO_TEXTURE)?;
    // diffuse
    write_vec3(&mut body, material.diffuse)?;
    body.write_u64::<LittleEndian>(NO_TEXTURE)?;
    // specular
    write_vec3(&mut body, Vec3::ZERO)?;
    body.write_u64::<LittleEndian>(NO_TEXTURE)?;
    body.write_f32::<LittleEndian>(0.0)?; // shininess
    body.write_f32::<LittleEndian>(1.0)?; // alpha
    Ok(body)
}

fn write_vec3(out: &mut Vec<u8>, v: Vec3) -> std::io::Result<()> {
    for f in v.to_array() {
        out.write_f32::<LittleEndian>(f)?;
    }
    Ok(())
}

/// Read every mesh and material in a container.
///
/// Blocks of unknown type are skipped. A mesh whose material is missing gets
/// a white material with the referenced id.
///
/// # Errors
///   [`Error::Malformed`] when the header or a block is invalid or truncated.
pub fn read_rex<R: Read>(mut reader: R) -> Result<RexFile> {
    let mut magic = [0_u8; 4];
    reader.read_exact(&mut magic).map_err(truncated)?;
    if &magic != MAGIC {
        return Err(Error::malformed(FORMAT, "missing REX1 magic"));
    }
    let version = reader.read_u16::<LittleEndian>().map_err(truncated)?;
    if version != VERSION {
        return Err(Error::malformed(
            FORMAT,
            format!("unsupported version {version}"),
        ));
    }
    let _crc = reader.read_u32::<LittleEndian>().map_err(truncated)?;
    let block_count = reader.read_u16::<LittleEndian>().map_err(truncated)?;
    let data_start = reader.read_u16::<LittleEndian>().map_err(truncated)?;
    let _data_size = reader.read_u64::<LittleEndian>().map_err(truncated)?;
    skip(&mut reader, RESERVED_SIZE as u64)?;

    // The coordinate system block is not used.
    let coordinate_size = data_start
        .checked_sub(FILE_HEADER_SIZE)
        .ok_or_else(|| Error::malformed(FORMAT, "data starts inside the header"))?;
    skip(&mut reader, u64::from(coordinate_size))?;

    let mut meshes = vec![];
    let mut materials = vec![];
    for _ in 0..block_count {
        let kind = reader.read_u16::<LittleEndian>().map_err(truncated)?;
        let _version = reader.read_u16::<LittleEndian>().map_err(truncated)?;
        let size = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        let id = reader.read_u64::<LittleEndian>().map_err(truncated)?;
        // The declared size is not trusted until the bytes have arrived.
        let mut body = vec![];
        reader.by_ref().take(u64::from(size)).read_to_end(&mut body)?;
        if body.len() as u64 != u64::from(size) {
            return Err(Error::malformed(FORMAT, "unexpected end of data"));
        }

        match kind {
            MESH_BLOCK => meshes.push(read_mesh(id, &body)?),
            MATERIAL_BLOCK => materials.push(read_material(id, &body)?),
            other => debug!("read_rex - skipping block type {other} ({size} bytes)"),
        }
    }

    for mesh in &mut meshes {
        if let Some(material) = materials.iter().find(|m| m.id == mesh.material.id) {
            mesh.material = *material;
        }
    }

    Ok(RexFile { meshes, materials })
}

/// Read a container from disk.
///
/// # Errors
///   When the file cannot be opened or does not parse.
pub fn load_rex(path: &Path) -> Result<RexFile> {
    let file = std::fs::File::open(path)?;
    read_rex(std::io::BufReader::new(file))
}

fn read_mesh(id: u64, body: &[u8]) -> Result<Mesh> {
    let mut cursor = Cursor::new(body);
    let _lod = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
    let _max_lod = cursor.read_u16::<LittleEndian>().map_err(truncated)?;
    let mut counts = [0_u32; 5];
    for c in &mut counts {
        *c = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    }
    let mut starts = [0_u32; 5];
    for s in &mut starts {
        *s = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    }
    let material_id = cursor.read_u64::<LittleEndian>().map_err(truncated)?;

    let [vertex_count, _, _, color_count, triangle_count] = counts;
    let [vertex_start, _, _, color_start, triangle_start] = starts;
    if color_count != 0 && color_count != vertex_count {
        return Err(Error::malformed(
            FORMAT,
            format!("mesh {id}: {color_count} colors for {vertex_count} vertices"),
        ));
    }

    check_span(id, "positions", vertex_start, vertex_count, body.len())?;
    if color_count != 0 {
        check_span(id, "colors", color_start, color_count, body.len())?;
    }
    check_span(id, "triangles", triangle_start, triangle_count, body.len())?;

    cursor.set_position(u64::from(vertex_start));
    let positions = read_vec3s(&mut cursor, vertex_count)?;

    cursor.set_position(u64::from(color_start));
    let colors = if color_count == 0 {
        vec![Vec3::ONE; positions.len()]
    } else {
        read_vec3s(&mut cursor, color_count)?
    };

    cursor.set_position(u64::from(triangle_start));
    let mut triangles = Vec::with_capacity(triangle_count as usize);
    for _ in 0..triangle_count {
        let mut t = [0_u32; 3];
        for i in &mut t {
            *i = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
            if *i >= vertex_count {
                return Err(Error::malformed(
                    FORMAT,
                    format!("mesh {id}: triangle index {i} out of range"),
                ));
            }
        }
        triangles.push(Triangle(t));
    }

    Ok(Mesh {
        id,
        positions,
        colors,
        triangles,
        index_base: IndexBase::Zero,
        material: Material {
            id: material_id,
            diffuse: Vec3::ONE,
        },
    })
}

fn read_material(id: u64, body: &[u8]) -> Result<Material> {
    let mut cursor = Cursor::new(body);
    let _ambient = read_vec3(&mut cursor)?;
    let _ambient_texture = cursor.read_u64::<LittleEndian>().map_err(truncated)?;
    let diffuse = read_vec3(&mut cursor)?;
    Ok(Material { id, diffuse })
}

// Positions, colors and triangles are all 12 bytes per element.
fn check_span(id: u64, what: &str, start: u32, count: u32, body_len: usize) -> Result<()> {
    let end = u64::from(start) + u64::from(count) * 12;
    if end > body_len as u64 {
        return Err(Error::malformed(
            FORMAT,
            format!("mesh {id}: {count} {what} at {start} overrun the {body_len} byte block"),
        ));
    }
    Ok(())
}

fn read_vec3s(cursor: &mut Cursor<&[u8]>, n: u32) -> Result<Vec<Vec3>> {
    (0..n).map(|_| read_vec3(cursor)).collect()
}

fn read_vec3(cursor: &mut Cursor<&[u8]>) -> Result<Vec3> {
    let mut v = [0_f32; 3];
    for f in &mut v {
        *f = cursor.read_f32::<LittleEndian>().map_err(truncated)?;
    }
    Ok(Vec3::from_array(v))
}

fn skip<R: Read>(reader: &mut R, n: u64) -> Result<()> {
    let skipped = std::io::copy(&mut reader.take(n), &mut std::io::sink())?;
    if skipped == n {
        Ok(())
    } else {
        Err(Error::malformed(FORMAT, "unexpected end of file"))
    }
}

fn count(len: usize) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| Error::malformed(FORMAT, format!("{len} elements exceed u32")))
}

#[allow(clippy::needless_pass_by_value)]
fn truncated(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::malformed(FORMAT, "unexpected end of data")
    } else {
        Error::Io(e)
    }
}
