use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "folio", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack a JSON array of blocks and print the placements as JSON.
    Pack(PackArgs),
    /// Validate a bridge config JSON and print it with defaults filled in.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Input blocks JSON (`[{"width":..,"height":..,"id":..}, ...]`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Container width.
    #[arg(long)]
    width: f64,

    /// Container height.
    #[arg(long)]
    height: f64,

    /// Let the layout grow past `--height`.
    #[arg(long, default_value_t = false)]
    auto_height: bool,

    /// Candidate priority keys, comma separated (position, y, x, parentPosition).
    #[arg(long, value_delimiter = ',')]
    order: Vec<String>,

    /// Number of recent placements used as candidate sources.
    #[arg(long, conflicts_with = "exhaustive")]
    cache_window: Option<usize>,

    /// Use every placement as a candidate source.
    #[arg(long, default_value_t = false)]
    exhaustive: bool,

    /// Allow duplicate block ids.
    #[arg(long, default_value_t = false)]
    lenient_ids: bool,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Bridge config JSON. Omit to print the defaults.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Pack(args) => cmd_pack(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn read_blocks_json(path: &Path) -> anyhow::Result<Vec<folio::Block>> {
    let f = File::open(path).with_context(|| format!("open blocks '{}'", path.display()))?;
    let r = BufReader::new(f);
    let blocks: Vec<folio::Block> =
        serde_json::from_reader(r).with_context(|| "parse blocks JSON")?;
    Ok(blocks)
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let blocks = read_blocks_json(&args.in_path)?;

    let defaults = folio::PackerOptions::default();
    let opts = folio::PackerOptions {
        auto_resize: args.auto_height.then_some(folio::AutoResize::Height),
        order: args.order,
        cache_window: if args.exhaustive {
            None
        } else {
            args.cache_window.or(defaults.cache_window)
        },
        id_policy: if args.lenient_ids {
            folio::IdPolicy::Lenient
        } else {
            folio::IdPolicy::Strict
        },
    };

    let mut packer = folio::Packer::new(args.width, args.height, opts)?;
    let positions = packer.set_blocks(&blocks)?;
    let placed = positions.len();

    let out = serde_json::to_string_pretty(positions).with_context(|| "serialize positions")?;
    println!("{out}");
    eprintln!("placed {placed} of {} blocks", blocks.len());
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = match args.in_path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            folio::BridgeConfig::from_json(&json)?
        }
        None => folio::BridgeConfig::default(),
    };
    let out = serde_json::to_string_pretty(&cfg).with_context(|| "serialize config")?;
    println!("{out}");
    Ok(())
}
