//! Terrafield CLI - procedural terrain generator.
//!
//! Builds a height field from fractal noise or an external height source,
//! shapes it with the transform chain, erodes it with particle-based
//! hydraulic simulation, and exports the result.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use terrafield::erosion::{erode, ErosionConfig};
use terrafield::export::{
    export_height_png, export_height_raw, export_normal_map_png, PngExportOptions, RawFormat,
};
use terrafield::grid::HeightField;
use terrafield::noise::NoiseField;
use terrafield::source::load_height_source;
use terrafield::transform::{apply_transform, Floor, Offset, Scale, TransformPipeline};

/// Procedural terrain height field generator.
#[derive(Parser)]
#[command(name = "terrafield")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a terrain height field.
    Generate {
        /// Plane subdivisions per axis (the field gets resolution+1 vertices per side).
        #[arg(short, long, default_value = "512")]
        resolution: u32,

        /// World-space span of the plane.
        #[arg(long, default_value = "1.0")]
        extent: f32,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// JSON height source to sample instead of fractal noise.
        #[arg(long)]
        source: Option<PathBuf>,

        /// Number of noise octaves (noise mode only).
        #[arg(long, default_value = "5")]
        octaves: u8,

        /// Height scale factor applied after the base layer.
        #[arg(long, default_value = "0.25")]
        scale: f32,

        /// Height offset applied after scaling.
        #[arg(long, default_value = "-0.10")]
        offset: f32,

        /// Minimum height clamp applied last.
        #[arg(long, default_value = "0.0")]
        floor: f32,

        /// Skip the scale/offset/floor shaping chain.
        #[arg(long)]
        skip_shaping: bool,

        /// Skip hydraulic erosion.
        #[arg(long)]
        skip_erosion: bool,

        /// Number of erosion droplets.
        #[arg(long, default_value = "1000")]
        particles: u32,

        /// Velocity damping per erosion step (0-1).
        #[arg(long, default_value = "1.0")]
        friction: f32,

        /// Fractional droplet volume loss per step.
        #[arg(long, default_value = "0.001")]
        evaporation_rate: f32,

        /// Sediment exchange rate per step.
        #[arg(long, default_value = "0.001")]
        deposition_rate: f32,

        /// Step budget per droplet (1 = legacy single-step behavior).
        #[arg(long, default_value = "500")]
        max_steps: u32,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Export format.
        #[arg(short, long, default_value = "png")]
        format: ExportFormat,

        /// Also export an RGB normal map.
        #[arg(long)]
        normal_map: bool,
    },

    /// Display memory/file-size figures for a field configuration.
    Info {
        /// Plane subdivisions per axis.
        #[arg(short, long, default_value = "512")]
        resolution: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// 16-bit PNG (universal compatibility).
    Png,
    /// 16-bit RAW little-endian (Unity).
    Raw,
    /// 32-bit float RAW (high precision).
    RawFloat,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            resolution,
            extent,
            seed,
            source,
            octaves,
            scale,
            offset,
            floor,
            skip_shaping,
            skip_erosion,
            particles,
            friction,
            evaporation_rate,
            deposition_rate,
            max_steps,
            output,
            name,
            format,
            normal_map,
        } => {
            if resolution < 1 || resolution > 8192 {
                eprintln!("Error: Resolution must be between 1 and 8192");
                std::process::exit(1);
            }
            if octaves < 1 || octaves > 16 {
                eprintln!("Error: Octaves must be between 1 and 16");
                std::process::exit(1);
            }
            if extent <= 0.0 {
                eprintln!("Error: Extent must be positive");
                std::process::exit(1);
            }
            if friction < 0.0 || friction > 1.0 {
                eprintln!("Error: Friction must be between 0.0 and 1.0");
                std::process::exit(1);
            }

            let seed = seed.unwrap_or_else(|| {
                use std::time::{SystemTime, UNIX_EPOCH};
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap()
                    .as_nanos() as u64
            });

            println!("Terrafield - Procedural Terrain Generator");
            println!("=========================================");
            println!(
                "Resolution: {}x{} vertices",
                resolution + 1,
                resolution + 1
            );
            println!("Seed: {}", seed);
            println!("Output: {}", output.display());

            let start = Instant::now();
            let mut field = HeightField::from_resolution(resolution, extent);

            // Base layer: external source or fractal noise.
            let loaded_source = match &source {
                Some(path) => {
                    println!("\nLoading height source: {}", path.display());
                    let sampler =
                        pollster::block_on(load_height_source(path)).unwrap_or_else(|e| {
                            eprintln!("Error loading height source: {}", e);
                            std::process::exit(1);
                        });
                    let dims = sampler.dims();
                    println!("Loaded {} x {} source grid", dims.x, dims.y);
                    apply_transform(&mut field, &sampler);
                    Some(sampler)
                }
                None => {
                    println!("\nSynthesizing fractal noise: {} octaves", octaves);
                    let noise = NoiseField::new(octaves, seed as i32);
                    apply_transform(&mut field, &noise);
                    None
                }
            };

            // Shaping chain, then one normal derivation for the final surface.
            let mut pipeline = TransformPipeline::new();
            if !skip_shaping {
                pipeline.add(Scale(scale)).add(Offset(offset)).add(Floor(floor));
                println!(
                    "Shaping: scale({}) -> offset({}) -> floor({})",
                    scale, offset, floor
                );
            }
            pipeline.run(&mut field);

            if let Some(sampler) = &loaded_source {
                let oob = sampler.out_of_bounds_samples();
                if oob > 0 {
                    println!("Height source: {} samples fell outside the grid", oob);
                }
            }

            println!("Field built in {:.2?}", start.elapsed());

            if !skip_erosion {
                let erosion_config = ErosionConfig {
                    particles,
                    friction,
                    evaporation_rate,
                    deposition_rate,
                    max_steps,
                    seed,
                    ..Default::default()
                };
                println!("\nRunning hydraulic erosion: {} droplets", particles);
                let erosion_start = Instant::now();
                let stats = erode(&mut field, &erosion_config);
                println!(
                    "Erosion completed in {:.2?}: eroded {:.6}, deposited {:.6}",
                    erosion_start.elapsed(),
                    stats.total_eroded,
                    stats.total_deposited
                );
                println!(
                    "  Droplets: {} evaporated, {} left the grid, {} ran out of steps",
                    stats.particles_evaporated,
                    stats.particles_left_grid,
                    stats.particles_out_of_steps
                );
            } else {
                println!("\nHydraulic erosion: SKIPPED");
            }

            let (min_h, max_h) = field.height_range();
            println!("\nHeight range: [{:.4}, {:.4}]", min_h, max_h);

            println!("Exporting...");
            let export_start = Instant::now();
            std::fs::create_dir_all(&output).unwrap_or_else(|e| {
                eprintln!("Error creating output directory: {}", e);
                std::process::exit(1);
            });

            // Degenerate (constant-height) fields still export with a usable range.
            let (min_h, max_h) = if min_h < max_h {
                (min_h, max_h)
            } else {
                (min_h, min_h + 1e-6)
            };

            match format {
                ExportFormat::Png => {
                    let options = PngExportOptions {
                        min_height: min_h,
                        max_height: max_h,
                        ..Default::default()
                    };
                    let path = output.join(format!("{}.png", name));
                    export_height_png(&field, &path, &options).unwrap_or_else(|e| {
                        eprintln!("Error exporting PNG: {}", e);
                        std::process::exit(1);
                    });
                    println!("  Exported heightmap: {}", path.display());
                }
                ExportFormat::Raw => {
                    let path = output.join(format!("{}.raw", name));
                    export_height_raw(&field, &path, RawFormat::R16LittleEndian, min_h, max_h)
                        .unwrap_or_else(|e| {
                            eprintln!("Error exporting RAW: {}", e);
                            std::process::exit(1);
                        });
                    println!("  Exported heightmap (R16): {}", path.display());
                }
                ExportFormat::RawFloat => {
                    let path = output.join(format!("{}.raw", name));
                    export_height_raw(&field, &path, RawFormat::R32Float, min_h, max_h)
                        .unwrap_or_else(|e| {
                            eprintln!("Error exporting RAW: {}", e);
                            std::process::exit(1);
                        });
                    println!("  Exported heightmap (R32 float): {}", path.display());
                }
            }

            if normal_map {
                let path = output.join(format!("{}_normal.png", name));
                export_normal_map_png(&field, &path).unwrap_or_else(|e| {
                    eprintln!("Error exporting normal map: {}", e);
                    std::process::exit(1);
                });
                println!("  Exported normal map: {}", path.display());
            }

            println!("Export completed in {:.2?}", export_start.elapsed());
            println!("\nTotal time: {:.2?}", start.elapsed());
            println!("Done!");
        }
        Commands::Info { resolution } => {
            run_info(resolution);
        }
    }
}

fn run_info(resolution: u32) {
    let side = (resolution as u64) + 1;
    let vertices = side * side;

    let bytes_heights = vertices * 4; // f32
    let bytes_normals = vertices * 12; // Vec3
    let bytes_vertex_buffer = vertices * 12; // interleaved (x, y, z) f32
    let bytes_png = vertices * 2; // 16-bit
    let bytes_raw_r16 = vertices * 2;
    let bytes_raw_r32 = vertices * 4;

    println!("Terrafield - Field Configuration Info");
    println!("=====================================");
    println!();
    println!("Resolution: {} segments -> {}x{} vertices", resolution, side, side);
    println!("Total vertices: {}", vertices);
    println!();
    println!("Memory usage (in-memory):");
    println!(
        "  Heights:       {:>12} bytes ({:.2} MB)",
        bytes_heights,
        bytes_heights as f64 / 1024.0 / 1024.0
    );
    println!(
        "  Normals:       {:>12} bytes ({:.2} MB)",
        bytes_normals,
        bytes_normals as f64 / 1024.0 / 1024.0
    );
    println!(
        "  Vertex buffer: {:>12} bytes ({:.2} MB)",
        bytes_vertex_buffer,
        bytes_vertex_buffer as f64 / 1024.0 / 1024.0
    );
    println!();
    println!("Export file sizes (approx. before compression):");
    println!(
        "  PNG (16-bit): {:>12} bytes ({:.2} MB)",
        bytes_png,
        bytes_png as f64 / 1024.0 / 1024.0
    );
    println!(
        "  RAW (R16):    {:>12} bytes ({:.2} MB)",
        bytes_raw_r16,
        bytes_raw_r16 as f64 / 1024.0 / 1024.0
    );
    println!(
        "  RAW (R32):    {:>12} bytes ({:.2} MB)",
        bytes_raw_r32,
        bytes_raw_r32 as f64 / 1024.0 / 1024.0
    );
}
