use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wowex_extract::{ArchiveSource, ExtractConfig, Extractor, Locale, LooseStorage};
use wowex_formats::{MapRow, TableSchema, decode_rows, decode_table};
use wowex_vmap::{LoadResult, MapRelations, VMapManager};

#[derive(Parser)]
#[command(
    name = "wowex",
    about = "Extract files, tables and collision geometry from game data",
    version,
    author
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the content hash of archive paths
    Hash {
        /// Archive paths
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Extract files from a storage directory
    Extract {
        /// Storage directory
        #[arg(short, long, env = "WOWEX_STORAGE")]
        storage: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, env = "WOWEX_OUTPUT")]
        output: Option<PathBuf>,

        /// Client locale (enUS, deDE, ...)
        #[arg(short, long, env = "WOWEX_LOCALE")]
        locale: Option<Locale>,

        /// Worker threads
        #[arg(short, long, env = "WOWEX_THREADS")]
        threads: Option<usize>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// File with one archive path per line
        #[arg(long)]
        listfile: Option<PathBuf>,

        /// Archive paths to extract
        paths: Vec<String>,
    },

    /// Decode a client table to JSON
    Table {
        /// Table file, or archive path when --storage is given
        input: String,

        /// JSON schema describing the record layout
        #[arg(long)]
        schema: PathBuf,

        /// Read the table from this storage directory
        #[arg(short, long, env = "WOWEX_STORAGE")]
        storage: Option<PathBuf>,

        /// Client locale used with --storage
        #[arg(short, long, env = "WOWEX_LOCALE", default_value = "enUS")]
        locale: Locale,
    },

    /// Load a map tile of collision geometry and report what was loaded
    Vmap {
        /// Directory holding .vmtree, .vmtile and .vmo files
        #[arg(long)]
        base: PathBuf,

        /// Map id
        #[arg(long)]
        map: u32,

        /// Tile column
        #[arg(short)]
        x: u32,

        /// Tile row
        #[arg(short)]
        y: u32,

        /// Map table used to load child maps alongside
        #[arg(long)]
        map_table: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Hash { paths } => handle_hash(&paths),
        Commands::Extract {
            storage,
            output,
            locale,
            threads,
            config,
            listfile,
            paths,
        } => {
            let mut cfg = match config {
                Some(path) => ExtractConfig::from_file(&path)
                    .with_context(|| format!("reading config {}", path.display()))?,
                None => ExtractConfig::default(),
            };
            if let Some(storage) = storage {
                cfg = cfg.with_storage_path(storage);
            }
            if let Some(output) = output {
                cfg = cfg.with_output_path(output);
            }
            if let Some(locale) = locale {
                cfg = cfg.with_locale(locale);
            }
            if let Some(threads) = threads {
                cfg = cfg.with_threads(threads);
            }
            handle_extract(&cfg, listfile.as_deref(), paths)
        }
        Commands::Table {
            input,
            schema,
            storage,
            locale,
        } => handle_table(&input, &schema, storage.as_deref(), locale),
        Commands::Vmap {
            base,
            map,
            x,
            y,
            map_table,
        } => handle_vmap(&base, map, x, y, map_table.as_deref()),
    }
}

fn handle_hash(paths: &[String]) -> Result<()> {
    for path in paths {
        println!(
            "{:016x}  {}",
            wowex_hash::hash_path(path),
            wowex_hash::normalize_path(path)
        );
    }
    Ok(())
}

fn handle_extract(config: &ExtractConfig, listfile: Option<&Path>, mut paths: Vec<String>) -> Result<()> {
    if let Some(listfile) = listfile {
        let list = std::fs::read_to_string(listfile)
            .with_context(|| format!("reading listfile {}", listfile.display()))?;
        paths.extend(
            list.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(String::from),
        );
    }
    if paths.is_empty() {
        bail!("nothing to extract: pass paths or --listfile");
    }

    let storage = LooseStorage::open(&config.storage_path)
        .with_context(|| format!("opening storage {}", config.storage_path.display()))?;
    info!(
        "Extracting {} paths for {} to {}",
        paths.len(),
        config.locale,
        config.output_path.display()
    );

    let report = Extractor::from_config(storage, config).run(paths);
    println!("{}", serde_json::to_string_pretty(&report)?);
    if report.failed > 0 {
        warn!("{} files could not be written", report.failed);
    }
    Ok(())
}

fn handle_table(input: &str, schema: &Path, storage: Option<&Path>, locale: Locale) -> Result<()> {
    let schema: TableSchema = serde_json::from_str(
        &std::fs::read_to_string(schema)
            .with_context(|| format!("reading schema {}", schema.display()))?,
    )
    .context("parsing schema")?;

    let payload = match storage {
        Some(dir) => LooseStorage::open(dir)?
            .read_file(input, locale.flags())
            .with_context(|| format!("{input} not found for {locale}"))?,
        None => std::fs::read(input).with_context(|| format!("reading {input}"))?,
    };

    let table = decode_table(&payload, &schema).with_context(|| format!("decoding {input}"))?;
    info!("Decoded {} records of {}", table.len(), schema.name);
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

fn handle_vmap(base: &Path, map: u32, x: u32, y: u32, map_table: Option<&Path>) -> Result<()> {
    let relations = match map_table {
        Some(path) => {
            let payload =
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            let rows = decode_rows::<MapRow>(&payload).context("decoding map table")?;
            MapRelations::from_map_rows(rows.values())
        }
        None => MapRelations::default(),
    };

    let manager = VMapManager::new(relations);
    let result = manager.load_map(base, map, x, y);
    println!("map {map} tile {x},{y}: {result}");
    if result != LoadResult::Ignored {
        println!("  loaded tiles: {}", manager.loaded_tile_count(map));
        println!("  models on tile: {}", manager.tile_model_count(map, x, y));
        println!("  cached models: {}", manager.cached_model_count());
        for &child in manager.relations().children(map) {
            println!(
                "  child map {child}: {}",
                if manager.is_tile_loaded(child, x, y) {
                    "loaded"
                } else {
                    "not loaded"
                }
            );
        }
    }
    manager.unload_map(map, x, y);
    Ok(())
}
