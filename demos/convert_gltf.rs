//! Converts a glTF file and prints what came out.
//!
//! Run with `cargo run --example convert_gltf -- model.glb`, optionally with
//! `--upload` to push the buffers to a headless wgpu device.

use std::path::PathBuf;

use clap::Parser;
use gltf_geometry::sink::{upload_mesh, WgpuBufferSink};

#[derive(Parser)]
#[command(about = "Convert glTF mesh data into GPU-ready buffers")]
struct Args {
    /// Path to a .glb or .gltf file
    path: PathBuf,

    /// Upload the converted buffers to a headless wgpu device
    #[arg(long)]
    upload: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let bytes = std::fs::read(&args.path)?;
    let document = gltf_geometry::import::document_from_slice(&bytes)?;
    let meshes = gltf_geometry::convert_document(&document)?;

    println!("{}: {} meshes", args.path.display(), meshes.len());
    for mesh in &meshes {
        println!("mesh {:?}", mesh.name.as_deref().unwrap_or("<unnamed>"));
        if let Some(bounds) = &mesh.bounds {
            println!("  bounds {} .. {}", bounds.min, bounds.max);
        }
        for primitive in &mesh.primitives {
            let indices = primitive
                .indices
                .as_ref()
                .map(|i| format!("{} ({:?})", i.count, i.format))
                .unwrap_or_else(|| "none".to_string());
            println!(
                "  primitive {:?}: {} vertices, stride {}, indices {}, {} bone assignments",
                primitive.topology,
                primitive.vertex_count,
                primitive.layout.stride,
                indices,
                primitive.assignments.len(),
            );
            for element in &primitive.layout.elements {
                println!(
                    "    {:?} x{} ({:?}) at offset {}",
                    element.semantic, element.components, element.element, element.offset
                );
            }
        }
    }

    if args.upload {
        let instance = wgpu::Instance::default();
        let adapter = pollster::block_on(
            instance.request_adapter(&wgpu::RequestAdapterOptions::default()),
        )
        .ok_or("no suitable GPU adapter found")?;
        let (device, _queue) = pollster::block_on(
            adapter.request_device(&wgpu::DeviceDescriptor::default(), None),
        )?;

        let mut sink = WgpuBufferSink::new(device);
        for mesh in &meshes {
            let uploaded = upload_mesh(&mut sink, mesh)?;
            println!(
                "uploaded {:?}: {} primitives",
                mesh.name.as_deref().unwrap_or("<unnamed>"),
                uploaded.len()
            );
        }
        println!("created {} GPU buffers", sink.buffer_count());
    }

    Ok(())
}
