//! Сборка карты: `HexMapGenerator`
//!
//! Конвейер выполняется в фиксированном порядке, данные текут только вперёд:
//!
//! 1. Поля высоты и влажности (поток `Fields`)
//! 2. Биомы и косметика (поток `Cosmetics`)
//! 3. Реки (поток `Rivers`)
//! 4. Площадки, дороги, здания (поток `Settlements`)
//! 5. Сборка [`HexTileMap`]
//!
//! Результат — чистая функция от `(seed, width, height, settings)`.
//!
//! ## Пример
//! ```
//! use hexmapgen::{HexMapConfig, HexMapGenerator};
//!
//! let mut generator = HexMapGenerator::new(HexMapConfig::new(7, 16, 16)).unwrap();
//! let first = generator.generate().clone();
//! generator.reseed(8);
//! let second = generator.generate();
//! assert_eq!(first.len(), second.len());
//! ```

use std::time::Instant;

use crate::biome::assign_biomes;
use crate::climate::generate_moisture;
use crate::config::HexMapConfig;
use crate::error::ConfigError;
use crate::heightmap::generate_elevation;
use crate::rivers::generate_rivers;
use crate::rng::{Stage, StageStreams};
use crate::settlement::plan_settlements;
use crate::tilemap::HexTileMap;

/// Состояние генератора
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// Параметры заданы, актуальной карты нет
    Configured,
    /// Последний результат `generate()` соответствует текущим параметрам
    Generated,
}

/// Генератор гексагональной карты с кешем последнего результата
///
/// Экземпляр не синхронизирован: для параллельной генерации используйте
/// отдельные экземпляры.
#[derive(Debug, Clone)]
pub struct HexMapGenerator {
    config: HexMapConfig,
    last: Option<HexTileMap>,
    stale: bool,
}

impl HexMapGenerator {
    /// Проверяет конфигурацию до какой-либо работы
    pub fn new(config: HexMapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            last: None,
            stale: true,
        })
    }

    pub fn config(&self) -> &HexMapConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn state(&self) -> GeneratorState {
        if self.last.is_some() && !self.stale {
            GeneratorState::Generated
        } else {
            GeneratorState::Configured
        }
    }

    /// Последняя сгенерированная карта; после `reseed()` она устаревшая,
    /// см. [`HexMapGenerator::state`]
    pub fn last_map(&self) -> Option<&HexTileMap> {
        self.last.as_ref()
    }

    /// Меняет сид. Карта не перегенерируется: это сделает следующий `generate()`.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.stale = true;
    }

    /// Прогоняет конвейер целиком и заменяет кеш
    pub fn generate(&mut self) -> &HexTileMap {
        let map = build_tile_map(&self.config);
        self.stale = false;
        self.last.insert(map)
    }
}

/// Генерация без экземпляра генератора
pub fn generate_tile_map(config: &HexMapConfig) -> Result<HexTileMap, ConfigError> {
    config.validate()?;
    Ok(build_tile_map(config))
}

fn build_tile_map(config: &HexMapConfig) -> HexTileMap {
    let started = Instant::now();
    let settings = &config.settings;
    let bounds = config.bounds();
    let streams = StageStreams::new(config.seed);

    log::info!(
        "Generating {}×{} hex map ({} tiles), seed {}",
        config.width,
        config.height,
        bounds.tile_count(),
        config.seed
    );

    // === 1. Поля ===
    let mut fields_rng = streams.stream(Stage::Fields);
    let elevation = generate_elevation(bounds, &mut fields_rng, settings);
    let mut moisture = generate_moisture(&elevation, &mut fields_rng, settings);

    // === 2. Биомы ===
    let mut biomes = assign_biomes(
        &elevation,
        &moisture,
        &mut streams.stream(Stage::Cosmetics),
        settings,
    );

    // === 3. Реки ===
    let (rivers, river_report) = generate_rivers(
        &elevation,
        &mut moisture,
        &mut biomes,
        &mut streams.stream(Stage::Rivers),
        settings,
    );

    // === 4. Поселения ===
    let settlements = plan_settlements(
        &elevation,
        &rivers,
        &biomes,
        &mut streams.stream(Stage::Settlements),
        settings,
    );

    // === 5. Сборка ===
    let map = HexTileMap::assemble(&elevation, &moisture, &biomes, &rivers, &settlements);

    log::info!(
        "Generated {} tiles in {:.1}ms: {} rivers ({} tiles), {} sites, {} buildings, {} path tiles",
        map.len(),
        started.elapsed().as_secs_f64() * 1000.0,
        river_report.carved,
        rivers.tile_count(),
        settlements.sites.len(),
        settlements.buildings.len(),
        settlements.roads.tile_count()
    );
    map
}
