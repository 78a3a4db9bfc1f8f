//! neuroview command-line entry point
//!
//! Loads a structural scan and its co-registered segmentation mask,
//! extracts a surface per detected label, frames the default axial
//! view, and reports what a viewer front end would bind to. Surfaces
//! can optionally be exported as OBJ files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use neuroview_core::ViewerConfig;
use neuroview_io::{has_volume_extension, read_volume, MeshWriter, ObjWriter};
use neuroview_pipeline::{LabelEntry, LabelState, MultiLabelManager};
use neuroview_view::{Camera, Scene, ViewPreset, ViewportController};

/// Reads NIfTI volumes and extracts renderable 3D surfaces.
#[derive(Parser, Debug)]
#[command(name = "neuroview", version, about)]
struct Args {
    /// Structural scan (.nii or .nii.gz)
    #[arg(short = 'i', long = "image")]
    image: PathBuf,

    /// Co-registered segmentation mask (.nii or .nii.gz)
    #[arg(short = 'm', long = "mask")]
    mask: PathBuf,

    /// Iso threshold for the structural surface
    #[arg(short = 't', long, default_value_t = 20.0)]
    threshold: f32,

    /// Write diagnostics to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export extracted surfaces as OBJ files into this directory
    #[arg(long)]
    export: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);
    if let Some(path) = log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create log file {:?}", path))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn describe(entry: &LabelEntry, name: &str) {
    match entry.state() {
        LabelState::Absent => {
            println!("  {}: absent (control disabled)", name);
        }
        state => {
            if let Some(renderable) = &entry.renderable {
                println!(
                    "  {}: {} triangles, color {:?}, opacity {}, {:?}",
                    name,
                    renderable.mesh.triangle_count(),
                    renderable.material.color,
                    renderable.material.opacity,
                    state,
                );
            }
        }
    }
}

fn export_surfaces(dir: &Path, brain: &MultiLabelManager, tumor: &MultiLabelManager) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {:?}", dir))?;

    if let Some(renderable) = brain.entry(0).and_then(|e| e.renderable.as_ref()) {
        let path = dir.join("brain.obj");
        ObjWriter::write_mesh(&renderable.mesh.to_surface_mesh(), &path)?;
        println!("exported {:?}", path);
    }
    for (i, entry) in tumor.entries().iter().enumerate() {
        if let Some(renderable) = &entry.renderable {
            let path = dir.join(format!("label_{}.obj", i + 1));
            ObjWriter::write_mesh(&renderable.mesh.to_surface_mesh(), &path)?;
            println!("exported {:?}", path);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Reject wrong file types before touching either file
    for path in [&args.image, &args.mask] {
        if !has_volume_extension(path) {
            bail!("{:?} does not end with .nii or .nii.gz", path);
        }
    }

    init_logging(args.log_file.as_deref())?;
    let config = ViewerConfig::default();

    let image = Arc::new(
        read_volume(&args.image)
            .with_context(|| format!("failed to load scan {:?}", args.image))?,
    );
    let mask = Arc::new(
        read_volume(&args.mask)
            .with_context(|| format!("failed to load mask {:?}", args.mask))?,
    );

    let brain = MultiLabelManager::structural(image.clone(), &config, args.threshold)
        .context("failed to build the structural surface")?;
    let tumor = MultiLabelManager::from_segmentation(mask.clone(), &config)
        .context("failed to build the segmentation surfaces")?;

    // Register all present surfaces and frame the default axial view
    let mut scene = Scene::new();
    for entry in brain.entries().iter().chain(tumor.entries()) {
        if let Some(renderable) = &entry.renderable {
            scene.add_drawable(&renderable.mesh, renderable.material);
        }
    }
    let mut camera = Camera::default();
    if let Some(bounds) = scene.bounds() {
        let controller = ViewportController::new(config.preset_zoom);
        controller.apply(&mut camera, ViewPreset::Axial, bounds);
    }

    println!(
        "scan {:?}: dims {:?}, scalar range {:?}",
        args.image,
        image.dims(),
        image.scalar_range()
    );
    println!(
        "mask {:?}: dims {:?}, scalar range {:?}",
        args.mask,
        mask.dims(),
        mask.scalar_range()
    );
    println!(
        "labels detected: {} ({} present)",
        tumor.len(),
        tumor.present_count()
    );

    if let Some(entry) = brain.entry(0) {
        describe(entry, "brain");
    }
    for (i, entry) in tumor.entries().iter().enumerate() {
        describe(entry, &format!("label {}", i + 1));
    }
    println!(
        "axial view: camera at {:?}, distance {:.2}",
        camera.position,
        camera.distance()
    );

    if let Some(dir) = &args.export {
        export_surfaces(dir, &brain, &tumor)?;
    }

    Ok(())
}
