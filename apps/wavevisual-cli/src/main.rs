use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wavevisual_common::EntityId;
use wavevisual_ecs::ComponentStore;
use wavevisual_kernel::{Descriptor, Simulation};
use wavevisual_render::{DebugTextRenderer, RenderEngine, Renderer, Scene};
use wavevisual_visual::{
    FileLookup, MAX_SHADER_WAVES, RESOURCE_PATH_ENV, ShaderWaves, WaveVisual, WaveVisualConfig,
};
use wavevisual_wavefield::{Wavefield, WavefieldSource};

#[derive(Parser)]
#[command(name = "wavevisual-cli", about = "CLI tool for wave visual descriptors")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and resource lookup info
    Info,
    /// Parse a descriptor and print the derived shader wave series
    Check {
        /// YAML descriptor with `wavefield` and `shader` blocks
        descriptor: PathBuf,
    },
    /// Run a simulation thread and a render thread against a descriptor
    Run {
        descriptor: PathBuf,
        /// Number of simulation steps (and render frames)
        #[arg(short, long, default_value = "100")]
        steps: u64,
        /// Render frame on which the scene becomes available
        #[arg(long, default_value = "3")]
        scene_delay: u64,
        /// Simulation step size in milliseconds
        #[arg(long, default_value = "10")]
        dt_ms: u64,
        /// Attach materials by reference instead of copying them
        #[arg(long)]
        shared_materials: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("wavevisual-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("shader waves: {MAX_SHADER_WAVES}");
            let lookup = FileLookup::from_env();
            if lookup.search_paths().is_empty() {
                println!("{RESOURCE_PATH_ENV}: (unset)");
            }
            for dir in lookup.search_paths() {
                println!("{RESOURCE_PATH_ENV}: {}", dir.display());
            }
        }
        Commands::Check { descriptor } => check(&descriptor)?,
        Commands::Run {
            descriptor,
            steps,
            scene_delay,
            dt_ms,
            shared_materials,
        } => run(
            &descriptor,
            steps,
            scene_delay,
            Duration::from_millis(dt_ms),
            shared_materials,
        )?,
    }

    Ok(())
}

fn read_descriptor(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn check(path: &Path) -> anyhow::Result<()> {
    let config = WaveVisualConfig::from_yaml(&read_descriptor(path)?)?;
    let wavefield = Wavefield::new(config.wavefield.wave)?;
    let waves = ShaderWaves::from_source(&wavefield)?;

    println!(
        "wavefield: {} components, mean wavelength {:.3} m",
        wavefield.number(),
        wavefield.wavelength()
    );
    println!("Nwaves     = {}", waves.count);
    println!("amplitude  = {:?}", waves.amplitude);
    println!("wavenumber = {:?}", waves.wavenumber);
    println!("omega      = {:?}", waves.omega);
    for (i, dir) in waves.directions.iter().enumerate() {
        println!("dir{i}       = {dir:?}");
    }
    println!("steepness  = {:?}", waves.steepness);
    println!("tau        = {}", waves.tau);
    match &config.shader {
        Some(uris) => println!("shader     = {} | {}", uris.vertex, uris.fragment),
        None => println!("shader     = (incomplete: needs `vertex` and `fragment`)"),
    }
    Ok(())
}

/// Entities for a single ocean model: model -> link -> visual.
fn ocean_entities(ecm: &mut ComponentStore, source: &Path) -> [EntityId; 3] {
    let model = ecm.spawn();
    ecm.mark_model(model);
    ecm.set_name(model, "ocean");
    ecm.set_source_file_path(model, source);
    let link = ecm.spawn();
    ecm.set_parent(link, model);
    ecm.set_name(link, "ocean_link");
    let visual = ecm.spawn();
    ecm.set_parent(visual, link);
    ecm.set_name(visual, "ocean_visual");
    [model, link, visual]
}

fn run(
    path: &Path,
    steps: u64,
    scene_delay: u64,
    dt: Duration,
    shared_materials: bool,
) -> anyhow::Result<()> {
    let text = read_descriptor(path)?;
    let descriptor: Descriptor = if text.trim().is_empty() {
        Descriptor::Null
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
    };
    let source = path
        .canonicalize()
        .with_context(|| format!("resolving {}", path.display()))?;

    let mut ecm = ComponentStore::new();
    let [model, link, visual] = ocean_entities(&mut ecm, &source);

    let engine = RenderEngine::new();
    let mut sim = Simulation::new(ecm, dt);
    let system = WaveVisual::new(engine.clone(), FileLookup::from_env());
    sim.add_system(visual, &descriptor, Box::new(system));
    if sim.events().subscriber_count() == 0 {
        anyhow::bail!("wave visual did not configure; see the log above");
    }

    let scene = Arc::new(if shared_materials {
        Scene::with_shared_materials("main")
    } else {
        Scene::new("main")
    });
    let model_node = scene.add_node(&scene.root(), "ocean", Some(model));
    let link_node = scene.add_node(&model_node, "ocean_link", Some(link));
    scene.add_node(&link_node, "ocean_visual", Some(visual));

    let render = {
        let events = sim.events().clone();
        let engine = engine.clone();
        let scene = Arc::clone(&scene);
        thread::spawn(move || {
            for frame in 0..steps {
                if frame == scene_delay {
                    tracing::info!(frame, "scene available");
                    engine.add_scene(Arc::clone(&scene));
                }
                events.emit_scene_update();
                thread::yield_now();
            }
        })
    };

    for _ in 0..steps {
        sim.step();
    }
    let info = sim.info();
    render
        .join()
        .map_err(|_| anyhow::anyhow!("render thread panicked"))?;

    println!(
        "Simulated {} steps, sim time {:.3} s",
        info.iterations,
        info.sim_time.as_secs_f64()
    );
    print!("{}", DebugTextRenderer::new().render(&scene));
    Ok(())
}
