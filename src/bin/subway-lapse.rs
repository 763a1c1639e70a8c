use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use subway_lapse::{Config, LengthUnit, TimelapseSession};

const DEFAULT_CONFIG: &str = "config.json";

#[derive(Parser, Debug)]
#[command(name = "subway-lapse", version)]
struct Cli {
    /// Config JSON. Defaults to `config.json` in the working directory, then next to the binary.
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the time-lapse (default).
    Render,
    /// Print network length and station count per save.
    Stats,
    /// Print the line colors of the newest save.
    Colors,
    /// Print which legend rows each save reveals.
    Reveals,
}

/// Config values settable from the command line.
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Folder holding the save files.
    #[arg(long, global = true)]
    save_folder: Option<PathBuf>,

    #[arg(long, global = true)]
    output_folder: Option<PathBuf>,

    /// Output file stem.
    #[arg(long, global = true)]
    output_name: Option<String>,

    /// Frames per second, e.g. `0.5` for one frame every two seconds.
    #[arg(long, global = true)]
    fps: Option<f64>,

    /// Side of the square frames in pixels.
    #[arg(long, global = true)]
    target_res: Option<u32>,

    #[arg(long, global = true)]
    threads: Option<usize>,

    #[arg(long, global = true)]
    no_legend: bool,

    #[arg(long, global = true)]
    no_gif: bool,

    /// Also write `<output_name>_LAST.png`.
    #[arg(long, global = true)]
    last_png: bool,

    /// `km` or `mi`.
    #[arg(long, global = true)]
    unit: Option<LengthUnit>,
}

impl Overrides {
    fn apply(self, cfg: &mut Config) {
        if let Some(v) = self.save_folder {
            cfg.save_folder = v;
        }
        if let Some(v) = self.output_folder {
            cfg.output_folder = v;
        }
        if let Some(v) = self.output_name {
            cfg.output_name = v;
        }
        if let Some(v) = self.fps {
            cfg.fps = v;
        }
        if let Some(v) = self.target_res {
            cfg.target_res = v;
        }
        if let Some(v) = self.threads {
            cfg.threads = v;
        }
        if self.no_legend {
            cfg.add_legend = false;
        }
        if self.no_gif {
            cfg.export_gif = false;
        }
        if self.last_png {
            cfg.export_last_png = true;
        }
        if let Some(v) = self.unit {
            cfg.unit = v;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut cfg = load_config(cli.config.as_deref())?;
    cli.overrides.apply(&mut cfg);
    let session = TimelapseSession::new(cfg)?;

    match cli.cmd.unwrap_or(Command::Render) {
        Command::Render => cmd_render(&session),
        Command::Stats => cmd_stats(&session),
        Command::Colors => cmd_colors(&session),
        Command::Reveals => cmd_reveals(&session),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::WARN,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// An explicit `--config` must exist. Without one, `config.json` is looked up in the working
/// directory and then next to the executable, and plain defaults are used if neither exists.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return Ok(Config::from_json_file(path)?);
    }

    let mut candidates = vec![PathBuf::from(DEFAULT_CONFIG)];
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(DEFAULT_CONFIG));
    }

    for path in &candidates {
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            return Config::from_json_file(path)
                .with_context(|| format!("load config '{}'", path.display()));
        }
    }
    tracing::debug!("no config file found; using defaults");
    Ok(Config::default())
}

fn cmd_render(session: &TimelapseSession) -> anyhow::Result<()> {
    let report = session.run()?;
    for path in &report.outputs {
        eprintln!("wrote {}", path.display());
    }
    eprintln!(
        "{} frames from {} saves ({} skipped, {} without a frame), {} legend rows",
        report.frames_encoded,
        report.saves_found,
        report.files_skipped,
        report.frames_omitted,
        report.legend.len()
    );
    Ok(())
}

fn cmd_stats(session: &TimelapseSession) -> anyhow::Result<()> {
    for r in session.stats()? {
        println!(
            "{}: {}, {} stations",
            r.file,
            r.summary.length_label(),
            r.summary.station_count
        );
    }
    Ok(())
}

fn cmd_colors(session: &TimelapseSession) -> anyhow::Result<()> {
    let (entry, lines) = session.newest_lines()?;
    eprintln!("{}", entry.file_name());
    for d in lines {
        println!("Line {}: {}", d.local_index, d.color);
    }
    Ok(())
}

fn cmd_reveals(session: &TimelapseSession) -> anyhow::Result<()> {
    for reveal in session.reveals()? {
        println!("{}", reveal.file);
        for row in reveal.rows {
            println!("  {} ({})", row.name, row.color);
        }
    }
    Ok(())
}
