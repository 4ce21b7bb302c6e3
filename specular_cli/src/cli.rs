use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use specular::Float;

#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "specular")]
#[command(about = "Mirror-bounce layouts and pen-plotter SVG export")]
pub struct Cli {
    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a mirror layout and write it as a scene JSON file
    Generate(GenerateArgs),
    /// Trace a scene JSON file and write the plot as SVG
    Plot(PlotArgs),
}

#[derive(Debug, Clone, ValueEnum)]
pub enum LayoutKind {
    /// One centered 45° mirror
    Solo,
    /// Fixed grid of preset angles
    Fixed,
    /// Grid with angles drawn from the 20° steps
    Random,
    /// Hamiltonian walk over a 7×7 grid
    Walk,
    /// Random 3×3 visit order with free jumps
    Permutation,
    /// Unrestricted walk with crossing checks
    Noncross,
    /// 3D facet lattice (writes a lattice JSON, not a 2D scene)
    Lattice,
}

#[derive(ClapArgs)]
pub struct GenerateArgs {
    #[arg(short, long, value_enum, default_value = "random")]
    pub layout: LayoutKind,

    /// RNG seed; omit for a fresh one
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Canvas width in scene units
    #[arg(long, default_value = "800")]
    pub width: Float,

    /// Canvas height in scene units
    #[arg(long, default_value = "600")]
    pub height: Float,

    /// Cells per grid side (walk layouts)
    #[arg(short = 'n', long, default_value = "7")]
    pub grid_size: usize,

    #[arg(short, long, default_value = "scene.json")]
    pub out: String,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum PageKind {
    /// 2 px/mm screen preview
    Preview,
    /// 96 DPI export
    Export,
}

#[derive(ClapArgs)]
pub struct PlotArgs {
    /// Scene JSON produced by `generate`
    #[arg(short, long, default_value = "scene.json")]
    pub scene: String,

    #[arg(short, long, default_value = "plot.svg")]
    pub out: String,

    #[arg(long, value_enum, default_value = "export")]
    pub page: PageKind,

    /// Fill color laid under the beam polyline
    #[arg(long)]
    pub fill: Option<String>,

    /// Bounce cap for the tracer
    #[arg(long, default_value = "50")]
    pub max_bounces: usize,
}
