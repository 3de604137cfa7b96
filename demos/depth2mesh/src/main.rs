#![deny(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::complexity)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
//! Convert a registered depth + color image pair into a colored mesh.

use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use depth_mesh::io::save_obj;
use depth_mesh::io::save_ply;
use depth_mesh::io::save_rex;
use depth_mesh::{
    ColorFrame, DepthFrame, DepthRange, FramePair, FrameSource, IndexBase, Material,
    ReconstructParams, reconstruct_from,
};
use glam::Vec3;
use image::ColorType;
use log::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Cli {
    #[arg(
        long = "depth",
        short = 'd',
        help = "16 bit grayscale depth image (millimeters), registered to the color image"
    )]
    depth: PathBuf,
    #[arg(long = "color", short = 'c', help = "color image")]
    color: PathBuf,
    #[clap(long="output", help="output mesh file (.rex, .obj or .ply)", short='o', default_value=None)]
    output: Option<PathBuf>,
    #[arg(long = "min", help = "exclusive lower depth bound", default_value_t = 500)]
    min: u16,
    #[arg(long = "max", help = "exclusive upper depth bound", default_value_t = 1000)]
    max: u16,
    #[arg(long = "spacing", help = "world units per pixel", default_value_t = 0.005)]
    spacing: f32,
    #[arg(
        long = "depth-scale",
        help = "world units per depth unit",
        default_value_t = 0.0035
    )]
    depth_scale: f32,
    #[arg(
        long = "index-base",
        value_enum,
        help = "number of the first vertex in memory",
        default_value_t = Base::Zero
    )]
    index_base: Base,
    #[arg(long = "mesh-id", help = "identifier of the mesh", default_value_t = 0)]
    mesh_id: u64,
    #[arg(long = "material-id", help = "identifier of the material", default_value_t = 1)]
    material_id: u64,
    #[arg(
        long = "tint",
        help = "diffuse tint of the material as r,g,b in [0, 1]",
        value_parser = parse_tint,
        default_value = "1,1,1"
    )]
    tint: Vec3,
}

fn parse_tint(s: &str) -> Result<Vec3, String> {
    let channels = s
        .split(',')
        .map(|c| c.trim().parse::<f32>().map_err(|e| format!("{c:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match channels[..] {
        [r, g, b] if [r, g, b].iter().all(|c| (0.0..=1.0).contains(c)) => Ok(Vec3::new(r, g, b)),
        [_, _, _] => Err(format!("channels of {s:?} must lie in [0, 1]")),
        _ => Err(format!("expected r,g,b, got {s:?}")),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Base {
    Zero,
    One,
}

impl From<Base> for IndexBase {
    fn from(base: Base) -> Self {
        match base {
            Base::Zero => Self::Zero,
            Base::One => Self::One,
        }
    }
}

impl Cli {
    fn params(&self) -> ReconstructParams {
        ReconstructParams {
            spacing: self.spacing,
            depth_scale: self.depth_scale,
            depth_range: DepthRange::new(self.min, self.max),
            index_base: self.index_base.into(),
            mesh_id: self.mesh_id,
            material: Material {
                id: self.material_id,
                diffuse: self.tint,
            },
        }
    }
}

/// Loads one frame pair from image files on disk.
#[derive(Debug)]
struct ImageFiles {
    depth: PathBuf,
    color: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error("cannot decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("depth image must be 16 bit grayscale, found {0:?}")]
    DepthFormat(ColorType),
    #[error("cannot build frame: {0}")]
    Frame(#[from] depth_mesh::Error),
}

impl FrameSource for ImageFiles {
    type Error = LoadError;

    fn capture(&mut self) -> Result<FramePair, Self::Error> {
        info!("loading depth {}", self.depth.display());
        let depth = image::open(&self.depth)?;
        // Converting 8 bit or color images would rescale the samples.
        if depth.color() != ColorType::L16 {
            return Err(LoadError::DepthFormat(depth.color()));
        }
        let depth = depth.into_luma16();
        let (width, height) = depth.dimensions();
        let depth = DepthFrame::new(width, height, depth.into_raw())?;

        info!("loading color {}", self.color.display());
        let color = image::open(&self.color)?.into_rgba8();
        let (width, height) = color.dimensions();
        let color = ColorFrame::from_rgba_bytes(width, height, color.as_raw())?;

        Ok(FramePair { depth, color })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    info!("starting up");

    let args = Cli::parse();
    let output = args.output.clone().unwrap_or_else(|| {
        let mut path = args.depth.clone();
        path.set_extension("rex");
        path
    });
    let params = args.params();

    let mut source = ImageFiles {
        depth: args.depth,
        color: args.color,
    };
    let mesh = reconstruct_from(&mut source, &params)?;
    if mesh.is_empty() {
        eprintln!("No pixel within the depth range, the mesh is empty");
    }

    info!("reconstruction complete... saving");
    save(&output, &mesh)?;
    Ok(())
}

fn save(path: &Path, mesh: &depth_mesh::Mesh) -> Result<(), Box<dyn std::error::Error>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("rex") => save_rex(path, mesh)?,
        Some("obj") => save_obj(path, mesh)?,
        Some("ply") => save_ply(path, mesh)?,
        _ => {
            return Err(format!(
                "unsupported output format {}, expected .rex, .obj or .ply",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_library() {
        let cli =
            Cli::try_parse_from(["depth2mesh", "-d", "depth.png", "-c", "color.png"]).unwrap();
        assert_eq!(cli.params(), ReconstructParams::default());
    }

    #[test]
    fn every_parameter_has_a_flag() {
        let cli = Cli::try_parse_from([
            "depth2mesh",
            "-d",
            "depth.png",
            "-c",
            "color.png",
            "--min",
            "300",
            "--max",
            "2000",
            "--spacing",
            "0.25",
            "--depth-scale",
            "0.5",
            "--index-base",
            "one",
            "--mesh-id",
            "7",
            "--material-id",
            "3",
            "--tint",
            "0.5,0.25,1",
        ])
        .unwrap();

        let params = cli.params();
        assert_eq!(params.depth_range, DepthRange::new(300, 2000));
        assert_eq!(params.spacing, 0.25);
        assert_eq!(params.depth_scale, 0.5);
        assert_eq!(params.index_base, IndexBase::One);
        assert_eq!(params.mesh_id, 7);
        assert_eq!(
            params.material,
            Material {
                id: 3,
                diffuse: Vec3::new(0.5, 0.25, 1.0),
            }
        );
    }

    #[test]
    fn tint_needs_three_channels_in_range() {
        for tint in ["1,1", "1,1,1,1", "1,x,1", "1,2,1"] {
            let result =
                Cli::try_parse_from(["depth2mesh", "-d", "d.png", "-c", "c.png", "--tint", tint]);
            assert!(result.is_err(), "{tint} was accepted");
        }
    }

    #[test]
    fn eight_bit_depth_is_rejected() {
        let dir = std::env::temp_dir().join(format!("depth2mesh_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let depth = dir.join("depth8.png");
        let color = dir.join("color.png");
        image::GrayImage::from_pixel(2, 2, image::Luma([200])).save(&depth).unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]))
            .save(&color)
            .unwrap();

        let mut source = ImageFiles { depth, color };
        let result = source.capture();
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(result, Err(LoadError::DepthFormat(ColorType::L8))));
    }

    #[test]
    fn sixteen_bit_depth_is_read_verbatim() {
        let dir = std::env::temp_dir().join(format!("depth2mesh16_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let depth = dir.join("depth16.png");
        let color = dir.join("color.png");
        image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_pixel(2, 2, image::Luma([700]))
            .save(&depth)
            .unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]))
            .save(&color)
            .unwrap();

        let mut source = ImageFiles { depth, color };
        let pair = source.capture();
        std::fs::remove_dir_all(&dir).unwrap();

        let pair = pair.unwrap();
        assert_eq!(pair.depth.samples(), &[700; 4]);
        assert_eq!(pair.color.get(1, 1), Some([1, 2, 3, 255]));
    }
}
