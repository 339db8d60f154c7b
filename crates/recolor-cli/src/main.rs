use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lottie_palette::theme::ThemeLibrary;
use lottie_palette::{
    CanvasSettings, ColorFilter, DocumentFormat, EditorError, EditorSession, FileStore,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding saved themes
    #[arg(
        long,
        global = true,
        env = "LOTTIE_RECOLOR_STORE",
        default_value = ".lottie-recolor"
    )]
    store_dir: PathBuf,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the color groups (or individual sites) of an animation
    Scan {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
        /// List every color site instead of groups
        #[arg(long)]
        sites: bool,
    },
    /// Check sticker constraints (512x512, 60 fps, at most 3 s)
    Check { input: PathBuf },
    /// Replace colors and write the result
    Recolor {
        input: PathBuf,
        output: PathBuf,
        /// Recolor a whole group, e.g. `--set '#ff0000=#00ff00'`
        #[arg(long = "set", value_name = "FROM=TO", value_parser = parse_pair)]
        groups: Vec<(String, String)>,
        /// Recolor a single site by its `scan --sites` index
        #[arg(long = "site", value_name = "INDEX=HEX", value_parser = parse_pair)]
        sites: Vec<(String, String)>,
    },
    /// Edit the stops of a gradient group
    Gradient(GradientArgs),
    /// Manage saved themes
    #[command(subcommand)]
    Theme(ThemeCommand),
    /// List layers
    Layers { input: PathBuf },
    /// Rename, show or hide one layer
    Layer {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long, conflicts_with = "show")]
        hide: bool,
        #[arg(long)]
        show: bool,
    },
    /// Change canvas size and frame rate
    Settings {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        fps: Option<f64>,
    },
    /// Convert between JSON and TGS
    Export { input: PathBuf, output: PathBuf },
}

#[derive(Args, Debug)]
struct GradientArgs {
    input: PathBuf,
    output: PathBuf,
    /// Any color of the gradient group to edit
    #[arg(long)]
    group: String,
    /// Stops to remove, by index
    #[arg(long)]
    remove: Vec<usize>,
    /// Number of stops to insert
    #[arg(long, default_value_t = 0)]
    add: usize,
    #[arg(long = "move", value_name = "INDEX=POSITION", value_parser = parse_pair)]
    moves: Vec<(String, String)>,
    #[arg(long = "stop", value_name = "INDEX=HEX", value_parser = parse_pair)]
    colors: Vec<(String, String)>,
    /// Mirror all stop positions
    #[arg(long)]
    reverse: bool,
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    /// Save the current group colors of an animation
    Save {
        input: PathBuf,
        #[arg(long)]
        name: String,
    },
    /// Apply a saved theme by position
    Apply {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        id: u64,
    },
    List,
    Delete {
        #[arg(long)]
        id: u64,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum FilterArg {
    All,
    Fill,
    Stroke,
    Gradient,
}

impl From<FilterArg> for ColorFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => ColorFilter::All,
            FilterArg::Fill => ColorFilter::Fill,
            FilterArg::Stroke => ColorFilter::Stroke,
            FilterArg::Gradient => ColorFilter::Gradient,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(cli.log_level).into())
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match cli.log_format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scan {
            input,
            filter,
            sites,
        } => scan(&input, filter.into(), sites),
        Command::Check { input } => check(&input),
        Command::Recolor {
            input,
            output,
            groups,
            sites,
        } => {
            if groups.is_empty() && sites.is_empty() {
                bail!("nothing to do: pass --set FROM=TO or --site INDEX=HEX");
            }
            let mut session = open_session(&input)?;
            for (from, to) in &groups {
                let written = session.recolor_group(from, to)?;
                info!(%from, %to, written, "recolored group");
            }
            for (index, hex) in &sites {
                let index = index.parse().with_context(|| format!("bad site index {index:?}"))?;
                if !session.recolor_site(index, hex)? {
                    info!(index, "site no longer matches its slot; skipped");
                }
            }
            write_output(&session, &output)
        }
        Command::Gradient(args) => gradient(args),
        Command::Theme(command) => theme(command, &cli.store_dir),
        Command::Layers { input } => {
            let session = open_session(&input)?;
            for (index, layer) in session.layers()?.iter().enumerate() {
                println!(
                    "{index:>3}  {:<8} {:<7} {}",
                    layer.type_name(),
                    if layer.is_visible() { "visible" } else { "hidden" },
                    session.layer_name(index).unwrap_or_default(),
                );
            }
            Ok(())
        }
        Command::Layer {
            input,
            output,
            index,
            rename,
            hide,
            show,
        } => {
            let mut session = open_session(&input)?;
            if let Some(name) = rename {
                session.rename_layer(index, &name)?;
            }
            if hide || show {
                session.set_layer_visible(index, show)?;
            }
            write_output(&session, &output)
        }
        Command::Settings {
            input,
            output,
            width,
            height,
            fps,
        } => {
            let mut session = open_session(&input)?;
            let header = session.header()?;
            let settings = CanvasSettings {
                width: width.unwrap_or(header.w as u32),
                height: height.unwrap_or(header.h as u32),
                frame_rate: fps.unwrap_or(header.fr),
            };
            if !session.apply_settings(settings)? {
                info!("settings unchanged");
            }
            write_output(&session, &output)
        }
        Command::Export { input, output } => write_output(&open_session(&input)?, &output),
    }
}

fn scan(input: &Path, filter: ColorFilter, sites: bool) -> Result<()> {
    let session = open_session(input)?;
    let header = session.header()?;
    println!(
        "{}  {}x{}  {} fps  {:.2} s",
        header.nm.as_deref().unwrap_or("(untitled)"),
        header.w,
        header.h,
        header.fr,
        header.duration_seconds()
    );

    let palette = session.palette();
    if sites {
        for (index, site) in palette.sites().iter().enumerate() {
            if filter.matches(site.shape_kind) {
                println!(
                    "{index:>4}  {}  {:<16} {}",
                    site.hex,
                    site.shape_kind.label(),
                    site.location
                );
            }
        }
        return Ok(());
    }

    for group in palette.filtered_groups(filter) {
        let mut kinds: Vec<&str> = Vec::new();
        for site in &group.instances {
            let label = site.shape_kind.label();
            if !kinds.contains(&label) {
                kinds.push(label);
            }
        }
        println!("{}  x{:<4} {}", group.hex, group.usage_count(), kinds.join(", "));
    }
    Ok(())
}

fn check(input: &Path) -> Result<()> {
    let report = open_session(input)?.check_compatibility()?;
    for check in report.checks() {
        println!("{check}");
    }
    if !report.passed() {
        bail!("animation does not meet sticker requirements");
    }
    println!("All checks passed");
    Ok(())
}

fn gradient(args: GradientArgs) -> Result<()> {
    let mut session = open_session(&args.input)?;
    let editor = session.open_gradient(&args.group)?;

    let mut removals = args.remove.clone();
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for index in removals {
        editor.remove_stop(index)?;
    }
    for _ in 0..args.add {
        editor.add_stop();
    }
    for (index, position) in &args.moves {
        let index = index.parse().with_context(|| format!("bad stop index {index:?}"))?;
        let position = position
            .parse()
            .with_context(|| format!("bad stop position {position:?}"))?;
        editor.move_stop(index, position)?;
    }
    for (index, hex) in &args.colors {
        let index = index.parse().with_context(|| format!("bad stop index {index:?}"))?;
        editor.set_stop_color(index, hex)?;
    }
    if args.reverse {
        editor.reverse();
    }

    for (index, stop) in editor.stops().iter().enumerate() {
        println!("{index:>3}  {:.3}  {}", stop.position, stop.hex());
    }
    session.commit_gradient()?;
    write_output(&session, &args.output)
}

fn theme(command: ThemeCommand, store_dir: &Path) -> Result<()> {
    let mut library = ThemeLibrary::open(FileStore::new(store_dir))
        .with_context(|| format!("failed to open theme store {}", store_dir.display()))?;

    match command {
        ThemeCommand::Save { input, name } => {
            let session = open_session(&input)?;
            let theme = library.add(&name, session.capture_theme())?;
            println!("{}  {}  ({} colors)", theme.id, theme.name, theme.colors.len());
        }
        ThemeCommand::Apply { input, output, id } => {
            let theme = library.get(id).cloned().ok_or(EditorError::ThemeNotFound(id))?;
            let mut session = open_session(&input)?;
            let written = session.apply_theme(&theme)?;
            info!(theme = %theme.name, written, "applied theme");
            write_output(&session, &output)?;
        }
        ThemeCommand::List => {
            if library.themes().is_empty() {
                println!("No saved themes in {}", library.store().dir().display());
            }
            for theme in library.themes() {
                let colors: Vec<&str> = theme.colors.iter().map(|c| c.hex.as_str()).collect();
                println!("{}  {:<20} {}  {}", theme.id, theme.name, theme.created_at, colors.join(" "));
            }
        }
        ThemeCommand::Delete { id } => {
            let theme = library.delete(id)?;
            println!("Deleted {}", theme.name);
        }
    }
    Ok(())
}

fn open_session(path: &Path) -> Result<EditorSession> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let session = EditorSession::open(&bytes, DocumentFormat::from_path(path), Default::default())
        .with_context(|| format!("failed to load {}", path.display()))?;
    info!(
        path = %path.display(),
        groups = session.palette().group_count(),
        sites = session.palette().sites().len(),
        "loaded animation"
    );
    Ok(session)
}

/// Writes JSON, or the compressed sticker format when the path ends in `.tgs`.
fn write_output(session: &EditorSession, path: &Path) -> Result<()> {
    let bytes = match DocumentFormat::from_path(path) {
        DocumentFormat::Tgs => session.export_tgs()?,
        DocumentFormat::Json => session.export_json()?.into_bytes(),
    };
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote animation");
    Ok(())
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (left, right) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))?;
    Ok((left.trim().to_string(), right.trim().to_string()))
}
