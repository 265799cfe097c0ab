use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use lintrans::{Matrix2, SvgRenderer, TransformationSession, Vec2, VisualizerConfig};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lintrans")]
#[command(about = "Draw a 2x2 matrix as a before/after grid picture", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Matrix entries in row-major order, e.g. "2,0,0,1"
    #[arg(short, long, allow_hyphen_values = true)]
    matrix: String,

    /// View half-size (defaults to the configured size)
    #[arg(short, long)]
    size: Option<f64>,

    /// Vector to push through the matrix, e.g. "1,2". Repeatable.
    #[arg(short, long = "vector", value_name = "X,Y", allow_hyphen_values = true)]
    vectors: Vec<String>,

    /// TOML file with visual settings
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to write the SVG; stdout when omitted
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over the default filter.
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    let config = match &cli.config {
        Some(path) => VisualizerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => VisualizerConfig::default(),
    };

    let matrix: Matrix2<f64> = Matrix2::parse(&cli.matrix)
        .with_context(|| format!("failed to read matrix '{}'", cli.matrix))?;
    let vectors = cli
        .vectors
        .iter()
        .map(|v| Vec2::parse(v).with_context(|| format!("failed to read vector '{v}'")))
        .collect::<Result<Vec<Vec2<f64>>>>()?;

    let renderer = SvgRenderer::with_layout(config.panel_pixels, config.panel_gap);
    let size = cli.size.unwrap_or(config.default_size);
    let mut session = TransformationSession::with_config(renderer, config);

    session.fit(matrix, size).context("failed to fit matrix")?;
    if let Some(basis) = session.basis_images() {
        log::info!("i -> {}, j -> {}", basis.i.label(), basis.j.label());
    }
    if !vectors.is_empty() {
        for image in session.transform(vectors)? {
            log::info!("image {}", image.label());
        }
    }

    match &cli.output {
        Some(path) => session
            .renderer()
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            session.renderer().write_to(&mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}
