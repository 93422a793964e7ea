use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::GenerationSettings;
use crate::grid::HexBounds;
use crate::heightmap::HexField;
use crate::hex::HexCoord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Desert,
    Grassland,
    Badlands,
    Riverside,
}

impl Biome {
    pub const ALL: [Biome; 4] = [
        Biome::Desert,
        Biome::Grassland,
        Biome::Badlands,
        Biome::Riverside,
    ];

    /// Косметические варианты тайла для биома
    pub fn palette(self) -> &'static [&'static str] {
        match self {
            Biome::Desert => &["desert_sand", "desert_dunes", "desert_cracked"],
            Biome::Grassland => &[
                "grass_plain",
                "grass_meadow",
                "grass_grove",
                "grass_hill",
            ],
            Biome::Badlands => &["badlands_mesa", "badlands_canyon", "badlands_scree"],
            Biome::Riverside => &["riverside_bank", "riverside_reeds", "riverside_ford"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Biome::Desert => "desert",
            Biome::Grassland => "grassland",
            Biome::Badlands => "badlands",
            Biome::Riverside => "riverside",
        }
    }

    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Biome::Desert => [222, 196, 132],
            Biome::Grassland => [120, 178, 90],
            Biome::Badlands => [168, 98, 64],
            Biome::Riverside => [92, 160, 150],
        }
    }
}

/// Классификация по высоте и влажности
///
/// Разбиение единичного квадрата:
/// - влажность от `grassland_moisture` → `Grassland`;
/// - сухо и высоко (от `badlands_elevation`) → `Badlands`;
/// - сухо и низко → `Desert`.
///
/// `Riverside` отсюда не получается никогда: этот биом ставит только
/// прокладка рек, на самих руслах.
pub fn classify(elevation: f32, moisture: f32, settings: &GenerationSettings) -> Biome {
    if moisture >= settings.grassland_moisture {
        Biome::Grassland
    } else if elevation >= settings.badlands_elevation {
        Biome::Badlands
    } else {
        Biome::Desert
    }
}

/// Внешний вид гекса: вариант тайла и поворот (0..=5)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cosmetic {
    pub base_tile: &'static str,
    pub rotation: u8,
}

/// Две выборки из потока: индекс варианта в палитре, затем поворот
pub fn pick_cosmetic(biome: Biome, rng: &mut ChaCha8Rng) -> Cosmetic {
    let palette = biome.palette();
    let base_tile = palette[rng.gen_range(0..palette.len())];
    let rotation = rng.gen_range(0..6u8);
    Cosmetic {
        base_tile,
        rotation,
    }
}

/// Биомы и косметика всех гексов в каноническом порядке
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeMap {
    pub bounds: HexBounds,
    pub data: Vec<Biome>,
    pub cosmetics: Vec<Cosmetic>,
}

impl BiomeMap {
    pub fn get(&self, coord: HexCoord) -> Option<Biome> {
        self.bounds.index_of(coord).map(|i| self.data[i])
    }

    /// Меняет биом гекса; если биом действительно сменился, внешний вид
    /// выбирается заново из палитры нового биома.
    pub fn reclassify(&mut self, coord: HexCoord, biome: Biome, rng: &mut ChaCha8Rng) {
        let Some(i) = self.bounds.index_of(coord) else {
            return;
        };
        if self.data[i] != biome {
            self.data[i] = biome;
            self.cosmetics[i] = pick_cosmetic(biome, rng);
        }
    }

    /// Сколько гексов каждого биома, в порядке [`Biome::ALL`]
    pub fn histogram(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for b in &self.data {
            counts[*b as usize] += 1;
        }
        counts
    }
}

/// Назначает биомы на основе высоты и влажности
pub fn assign_biomes(
    elevation: &HexField,
    moisture: &HexField,
    rng: &mut ChaCha8Rng,
    settings: &GenerationSettings,
) -> BiomeMap {
    let data: Vec<Biome> = elevation
        .data
        .iter()
        .zip(&moisture.data)
        .map(|(&h, &m)| classify(h, m, settings))
        .collect();

    // Выборки строго последовательны, в каноническом порядке гексов
    let cosmetics = data.iter().map(|&b| pick_cosmetic(b, rng)).collect();

    let map = BiomeMap {
        bounds: elevation.bounds,
        data,
        cosmetics,
    };
    log::debug!("biomes assigned: {:?}", map.histogram());
    map
}
