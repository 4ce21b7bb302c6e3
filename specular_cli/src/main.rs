use std::{error::Error, fs};

use clap::Parser;
use log::{info, warn};
use specular::{trace, Bounds, TraceSettings, Vector};
use rand::{rngs::StdRng, SeedableRng};
use specular_layouts::{
    FixedGrid, GridWalk, Lattice, NonCrossingWalk, PermutationWalk, RandomGrid, Scene, Solo,
    WalkGrid,
};
use specular_svg::{render, write_file, Page, Style};

mod cli;
mod logger;

use cli::{Cli, Command, GenerateArgs, LayoutKind, PageKind, PlotArgs};
use logger::init_logger;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logger(cli.log_level.clone().into());

    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Plot(args) => plot(&args),
    }
}

fn generate(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let bounds = Bounds::from_size(args.width, args.height);

    if let LayoutKind::Lattice = args.layout {
        let scene = Lattice::default().generate(&mut rng);
        fs::write(&args.out, serde_json::to_string_pretty(&scene)?)?;
        info!(
            "wrote lattice with {} facets to {}",
            scene.facets.len(),
            args.out
        );
        return Ok(());
    }

    let scene = match args.layout {
        LayoutKind::Solo => Scene::solo(bounds, &Solo::default()),
        LayoutKind::Fixed => Scene::grid(bounds, FixedGrid::default().build(&bounds)),
        LayoutKind::Random => {
            Scene::grid(bounds, RandomGrid::default().generate(&bounds, &mut rng))
        }
        LayoutKind::Walk => {
            let grid = WalkGrid::in_canvas(args.grid_size, &bounds);
            let layout = GridWalk::new(grid)
                .generate(&mut rng)
                .unwrap_or_else(|incomplete| {
                    warn!("{incomplete}; plotting the partial walk");
                    incomplete.partial
                });
            Scene::from_walk(bounds, &grid, &layout)
        }
        LayoutKind::Permutation => {
            let walk = PermutationWalk::in_canvas(&bounds);
            let layout = walk.generate(&mut rng);
            Scene::from_walk(bounds, &walk.grid, &layout)
        }
        LayoutKind::Noncross => {
            let grid = WalkGrid::in_canvas(args.grid_size, &bounds);
            let layout = NonCrossingWalk::new(grid).generate(&mut rng);
            Scene::from_walk(bounds, &grid, &layout)
        }
        LayoutKind::Lattice => unreachable!("handled above"),
    };

    fs::write(&args.out, serde_json::to_string_pretty(&scene)?)?;
    info!(
        "wrote scene with {} mirrors to {}",
        scene.mirrors.len(),
        args.out
    );
    Ok(())
}

fn plot(args: &PlotArgs) -> Result<(), Box<dyn Error>> {
    let scene: Scene = serde_json::from_str(&fs::read_to_string(&args.scene)?)?;

    let beams: Vec<Vec<Vector<2>>> = match &scene.beam {
        Some(beam) => vec![beam.clone()],
        None => {
            let settings = TraceSettings {
                max_bounces: args.max_bounces,
                ..TraceSettings::default()
            };
            scene
                .rays
                .iter()
                .map(|&ray| {
                    let result = trace(&scene.mirrors, &scene.bounds, ray, settings);
                    info!(
                        "traced {} segments, {:?}",
                        result.points.len() - 1,
                        result.termination
                    );
                    result.points
                })
                .collect()
        }
    };

    let page = match args.page {
        PageKind::Preview => Page::a3_preview(),
        PageKind::Export => Page::a3_export(),
    };
    let style = Style {
        fill: args.fill.clone(),
        ..Style::default()
    };

    write_file(&args.out, &render(&page, &style, &scene, &beams))?;
    info!("wrote {}", args.out);
    Ok(())
}
