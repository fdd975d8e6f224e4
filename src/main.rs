use clap::{Parser, Subcommand};
use responsive_images::substitution::{css_custom_properties, sizes_attribute, srcset};
use responsive_images::{config, output, process};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "responsive-images")]
#[command(about = "Generate size-class image variants for a static site")]
#[command(long_about = "\
Generate size-class image variants for a static site

Every image below the source directory is resized once per size class and
encoded in the target format. Sub-directories are mirrored:

  Resources/img/background.jpg
    → Output/img-optimized/background-extra-small.webp   (longer edge 600px)
    → Output/img-optimized/background-small.webp         (900px)
    → Output/img-optimized/background-normal.webp        (1200px)
    → Output/img-optimized/background-large.webp         (1800px)

Stylesheets switch between variants through custom properties, see 'css'.

Set RUST_LOG=debug for per-file diagnostics.
Run 'responsive-images gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site root; source_dir is resolved against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Output directory; target_dir is created below it
    #[arg(long, default_value = "Output", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the rewrite records for every source image without resizing
    Plan {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resize all source images and write manifest.json
    Build,
    /// Print custom-property CSS for one source image
    Css {
        /// Site-relative source path, e.g. Resources/img/background.jpg
        image: String,
        /// Prefix for every variant URL, e.g. "../"
        #[arg(long, default_value = "")]
        url_prefix: String,
        /// Also print srcset and sizes attribute values
        #[arg(long)]
        srcset: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Plan { json } => {
            let build_config = config::load_config(&cli.config)?;
            let planned = process::plan(&cli.root, &build_config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&planned)?);
            } else {
                output::print_plan(&planned);
            }
        }
        Command::Build => {
            let build_config = config::load_config(&cli.config)?;
            init_thread_pool(&build_config.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(&cli.root, &cli.output, &build_config, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let manifest = result?;

            std::fs::create_dir_all(&cli.output)?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(cli.output.join("manifest.json"), json)?;
            output::print_build_summary(&manifest, &cli.output);
        }
        Command::Css {
            image,
            url_prefix,
            srcset: with_srcset,
        } => {
            let build_config = config::load_config(&cli.config)?;
            let wanted = image.trim_start_matches("./");
            let planned = process::plan(&cli.root, &build_config)?
                .into_iter()
                .find(|p| p.source_path == wanted)
                .ok_or_else(|| {
                    format!("{wanted} is not an image below {}", build_config.source_dir)
                })?;

            println!("{}", css_custom_properties(&planned.rewrites, &url_prefix));
            if with_srcset {
                println!();
                println!("srcset=\"{}\"", srcset(&planned.rewrites, &url_prefix));
                println!("sizes=\"{}\"", sizes_attribute(&planned.rewrites));
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
