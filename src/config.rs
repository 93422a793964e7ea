// src/config.rs
//! Конфигурация генерации гексагональной карты
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Сид и размеры карты (`HexMapConfig`)
//! - Параметры шумовых полей, порогов биомов, рек и поселений (`GenerationSettings`)
//!
//! Все структуры поддерживают сериализацию в TOML/JSON; любое поле, кроме сида,
//! можно опустить — будет подставлено значение по умолчанию.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::grid::HexBounds;

/// Максимальная ширина и высота карты в гексах
pub const MAX_DIMENSION: u32 = 1024;

/// Основные параметры генерации карты
///
/// Значения по умолчанию: `seed = 0`, карта 32×32 гекса, настройки из
/// [`GenerationSettings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexMapConfig {
    /// Сид генератора случайных чисел (детерминированная генерация)
    pub seed: u64,

    /// Ширина карты в гексах (по умолчанию 32)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота карты в гексах (по умолчанию 32)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Тонкая настройка этапов генерации
    #[serde(default)]
    pub settings: GenerationSettings,
}

fn default_width() -> u32 {
    32
}
fn default_height() -> u32 {
    32
}

impl Default for HexMapConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 32,
            height: 32,
            settings: GenerationSettings::default(),
        }
    }
}

impl HexMapConfig {
    #[must_use]
    pub fn new(seed: u64, width: u32, height: u32) -> Self {
        Self {
            seed,
            width,
            height,
            settings: GenerationSettings::default(),
        }
    }

    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// seed = 42
    /// width = 24
    /// height = 16
    ///
    /// [settings]
    /// max_rivers = 3
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn bounds(&self) -> HexBounds {
        HexBounds::new(self.width, self.height)
    }

    /// Проверка размеров и настроек; вызывается до начала генерации
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 {
                return Err(ConfigError::InvalidDimension { name, value });
            }
            if value > MAX_DIMENSION {
                return Err(ConfigError::DimensionTooLarge {
                    name,
                    value,
                    max: MAX_DIMENSION,
                });
            }
        }
        self.settings.validate()
    }
}

/// Параметры этапов генерации
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    // --- Поля ---
    /// Частота шума в единицах мировых координат (размер гекса = 1)
    pub noise_frequency: f32,
    /// Октавы FBm для высоты
    pub elevation_octaves: i32,
    /// Октавы FBm для влажности
    pub moisture_octaves: i32,
    /// Степень нелинейности высоты:
    /// - `<1.0` → больше возвышенностей,
    /// - `=1.0` → линейно,
    /// - `>1.0` → больше низин.
    pub elevation_power: f32,

    // --- Биомы ---
    /// Влажность, начиная с которой суша считается лугом
    pub grassland_moisture: f32,
    /// Высота, начиная с которой сухая земля считается бесплодной (badlands)
    pub badlands_elevation: f32,

    // --- Реки ---
    /// Квантиль высоты, выше которого гекс может стать истоком
    pub river_source_percentile: f32,
    /// Одна река на столько гексов площади
    pub tiles_per_river: usize,
    pub max_rivers: usize,
    /// Река завершается, опустившись ниже этой высоты
    pub river_sink_elevation: f32,
    /// Минимальное расстояние между истоками
    pub river_source_spacing: u32,
    pub river_moisture_boost: f32,
    /// Прибавка влажности соседям реки
    pub river_bank_moisture_boost: f32,
    /// Лимит шагов трассировки; 0 — `width + height`
    pub max_river_steps: usize,

    // --- Поселения ---
    /// Одно поселение на столько гексов площади
    pub tiles_per_site: usize,
    pub max_sites: usize,
    /// Минимальное расстояние площадки до края карты
    pub site_edge_margin: u32,
    pub min_site_spacing: u32,
    pub max_site_elevation: f32,
    /// Доля застроенных площадок, включая ратушу в центре
    pub building_ratio: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            noise_frequency: 0.08,
            elevation_octaves: 4,
            moisture_octaves: 3,
            elevation_power: 1.0,

            grassland_moisture: 0.45,
            badlands_elevation: 0.45,

            river_source_percentile: 0.85,
            tiles_per_river: 120,
            max_rivers: 6,
            river_sink_elevation: 0.2,
            river_source_spacing: 4,
            river_moisture_boost: 0.35,
            river_bank_moisture_boost: 0.15,
            max_river_steps: 0,

            tiles_per_site: 40,
            max_sites: 12,
            site_edge_margin: 2,
            min_site_spacing: 3,
            max_site_elevation: 0.85,
            building_ratio: 0.6,
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = [
            ("grassland_moisture", self.grassland_moisture),
            ("badlands_elevation", self.badlands_elevation),
            ("river_source_percentile", self.river_source_percentile),
            ("river_sink_elevation", self.river_sink_elevation),
            ("river_moisture_boost", self.river_moisture_boost),
            ("river_bank_moisture_boost", self.river_bank_moisture_boost),
            ("max_site_elevation", self.max_site_elevation),
            ("building_ratio", self.building_ratio),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidSetting {
                    name,
                    reason: format!("{value} is outside [0, 1]"),
                });
            }
        }

        let positive = [
            ("noise_frequency", self.noise_frequency),
            ("elevation_power", self.elevation_power),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidSetting {
                    name,
                    reason: format!("{value} must be a positive finite number"),
                });
            }
        }

        for (name, value) in [
            ("elevation_octaves", self.elevation_octaves),
            ("moisture_octaves", self.moisture_octaves),
        ] {
            if !(1..=8).contains(&value) {
                return Err(ConfigError::InvalidSetting {
                    name,
                    reason: format!("{value} is outside 1..=8"),
                });
            }
        }

        for (name, value) in [
            ("tiles_per_river", self.tiles_per_river),
            ("tiles_per_site", self.tiles_per_site),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidSetting {
                    name,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }
}
