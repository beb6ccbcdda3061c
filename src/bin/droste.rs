use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "droste", version)]
struct Cli {
    /// Log per-render details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the droste effect to an image file.
    Render(RenderArgs),
    /// Print the default effect parameters as JSON.
    Params,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image; the format follows the extension.
    #[arg(long)]
    out: PathBuf,

    /// Effect parameters JSON. Missing keys use the defaults.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Working bit depth.
    #[arg(long, value_enum, default_value_t = DepthChoice::U8)]
    depth: DepthChoice,

    /// Render the alpha channel only.
    #[arg(long)]
    alpha_only: bool,

    /// Worker threads (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    /// Rows per parallel band.
    #[arg(long, default_value_t = 32)]
    band_rows: u32,

    /// Render scale applied to both axes.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Pixel aspect ratio.
    #[arg(long, default_value_t = 1.0)]
    par: f64,

    /// Put the canonical origin at the image centre instead of the bottom-left corner.
    #[arg(long)]
    centered: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DepthChoice {
    U8,
    U16,
    F32,
}

impl From<DepthChoice> for droste::PixelDepth {
    fn from(d: DepthChoice) -> Self {
        match d {
            DepthChoice::U8 => Self::U8,
            DepthChoice::U16 => Self::U16,
            DepthChoice::F32 => Self::F32,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Params => cmd_params(),
    }
}

fn read_params(path: Option<&Path>) -> anyhow::Result<droste::EffectParameters> {
    let Some(path) = path else {
        return Ok(droste::EffectParameters::default());
    };
    droste::EffectParameters::from_path(path)
        .with_context(|| format!("load parameters '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let params = read_params(args.params.as_deref())?;
    params.validate()?;

    let components = if args.alpha_only {
        droste::PixelComponents::Alpha
    } else {
        droste::PixelComponents::Rgba
    };
    let format = droste::PixelFormat::new(args.depth.into(), components);

    let mut src = droste::OwnedImage::open(&args.in_path, format)
        .with_context(|| format!("read input '{}'", args.in_path.display()))?;
    if args.centered {
        src = src.centered();
    }
    let mut dst = droste::OwnedImage::new_transparent(format, src.bounds())?;

    let request = droste::RenderRequest::new(src.bounds())
        .with_render_scale(droste::Vec2::new(args.scale, args.scale))
        .with_pixel_aspect_ratio(args.par);
    let threading = droste::RenderThreading {
        threads: args.threads,
        band_rows: args.band_rows,
    };

    let status = droste::render_tiled(
        &params,
        &request,
        &src.as_buffer()?,
        &mut dst.as_buffer_mut()?,
        &threading,
        &droste::NeverAbort,
    )?;
    tracing::debug!(?status, "render finished");

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    dst.save(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_params() -> anyhow::Result<()> {
    println!("{}", droste::EffectParameters::default().to_json_pretty()?);
    Ok(())
}
