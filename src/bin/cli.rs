use clap::Parser;
use hexmapgen::{HexMapConfig, HexMapGenerator};
use std::path::PathBuf;

/// Генератор гексагональных карт
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (без него — параметры по умолчанию)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Переопределить сид из конфигурации
    #[arg(short, long)]
    seed: Option<u64>,

    /// Переопределить ширину карты (в гексах)
    #[arg(long)]
    width: Option<u32>,

    /// Переопределить высоту карты (в гексах)
    #[arg(long)]
    height: Option<u32>,

    /// Путь для сохранения превью (по умолчанию: ./hexmap.png)
    #[arg(short, long, default_value = "hexmap.png")]
    png: PathBuf,

    /// Путь для сохранения карты тайлов в JSON
    #[arg(short, long)]
    json: Option<PathBuf>,

    /// Радиус гекса на превью, в пикселях
    #[arg(long, default_value_t = 12.0)]
    hex_size: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            HexMapConfig::from_toml_file(path)?
        }
        None => HexMapConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }

    let mut generator = HexMapGenerator::new(config)?;
    let map = generator.generate();

    for (biome, count) in map.biome_histogram() {
        log::info!("  {:<10} {count}", biome.as_str());
    }

    log::info!("writing preview to {}", cli.png.display());
    map.save_as_png(&cli.png, cli.hex_size)?;

    if let Some(path) = &cli.json {
        log::info!("writing tile map to {}", path.display());
        map.save_as_json(path)?;
    }

    log::info!("done");
    Ok(())
}
