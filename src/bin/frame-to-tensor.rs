use anyhow::{Context, Result};
use digitcam::output::{save_gray_png, save_stage_images, save_tensor_f32le};
use digitcam::visualize::{reconstruction_image, to_ascii};
use digitcam::{DigitReader, ResampleKernel};
use std::env;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!("Camera frame to digit tensor");
    eprintln!();
    eprintln!("Usage: {} <input> [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tensor <PATH>      Write the 28x28 tensor as little-endian f32");
    eprintln!("  --stages <DIR>       Save crop/intensity/resized/reconstruction PNGs");
    eprintln!("  --ascii              Print the tensor as ASCII art");
    eprintln!("  --invert             Use the negative intensity image");
    eprintln!("  --kernel <NAME>      Resampling kernel: catmullrom, lanczos3, triangle, nearest");
    eprintln!("  --log                Show detailed processing information");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} frame.jpg --ascii", program);
    eprintln!("  {} frame.png --tensor frame.bin --stages out/", program);
    eprintln!("  {} frame.png --invert --kernel lanczos3 --log", program);
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "digitcam=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return Err(anyhow::anyhow!("Missing required arguments"));
    }
    if args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        return Ok(());
    }

    let input_path = &args[1];

    // Parse optional arguments
    let mut tensor_path: Option<String> = None;
    let mut stages_dir: Option<String> = None;
    let mut ascii = false;
    let mut invert = false;
    let mut kernel = ResampleKernel::CatmullRom;
    let mut log_enabled = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--tensor" => {
                if i + 1 >= args.len() {
                    return Err(anyhow::anyhow!("--tensor requires a path"));
                }
                tensor_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--stages" => {
                if i + 1 >= args.len() {
                    return Err(anyhow::anyhow!("--stages requires a directory"));
                }
                stages_dir = Some(args[i + 1].clone());
                i += 2;
            }
            "--kernel" => {
                if i + 1 >= args.len() {
                    return Err(anyhow::anyhow!("--kernel requires a value"));
                }
                kernel = ResampleKernel::from_name(&args[i + 1])
                    .with_context(|| format!("Unknown kernel: {}", args[i + 1]))?;
                i += 2;
            }
            "--ascii" => {
                ascii = true;
                i += 1;
            }
            "--invert" => {
                invert = true;
                i += 1;
            }
            "--log" => {
                log_enabled = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                return Ok(());
            }
            _ => {
                return Err(anyhow::anyhow!("Unknown option: {}", args[i]));
            }
        }
    }

    init_logging(log_enabled);

    if log_enabled {
        println!("Preparing frame...");
        println!("  Input:  {}", input_path);
        println!("  Kernel: {:?}", kernel);
        println!("  Invert: {}", if invert { "enabled" } else { "disabled" });
    }

    let mut reader = DigitReader::new().with_kernel(kernel).without_ascii_debug();
    if invert {
        reader = reader.with_inversion();
    }
    if stages_dir.is_none() {
        reader = reader.without_stage_images();
    }

    let prepared = reader
        .prepare_file(input_path)
        .context("Frame preprocessing failed")?;

    if ascii {
        println!("{}", to_ascii(&prepared.tensor));
    }

    if let Some(path) = &tensor_path {
        save_tensor_f32le(&prepared.tensor, path)?;
        if log_enabled {
            println!("  Tensor: {}", path);
        }
    }

    if let Some(dir) = &stages_dir {
        let mut written = save_stage_images(&prepared.stages, dir)?;
        match reconstruction_image(&prepared.tensor) {
            Ok(vis) => {
                save_gray_png(&vis, Path::new(dir).join("reconstruction.png"))?;
                written += 1;
            }
            Err(e) => eprintln!("Warning: {}", e),
        }
        if log_enabled {
            println!("  Stages: {} image(s) in {}", written, dir);
        }
    }

    if log_enabled {
        println!("Done.");
    }

    Ok(())
}
