//! Итоговая карта тайлов
//!
//! Карта — единственный источник правды для потребителей (сцена, квесты,
//! строительство): отображение канонического ключа `"q,r"` в [`HexTileData`].
//! После генерации карта неизменяема; публичного API для правки нет.
//!
//! JSON-представление использует camelCase-имена полей:
//! ```json
//! { "3,-1": { "biome": "grassland", "baseTile": "grass_plain", "rotation": 4,
//!             "elevation": 0.42, "moisture": 0.61, "riverTile": false,
//!             "pathTile": true, "buildingSite": true, "building": "farm" } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::biome::{Biome, BiomeMap};
use crate::error::Result;
use crate::grid::HexBounds;
use crate::heightmap::HexField;
use crate::hex::{HexCoord, hex_key, parse_hex_key};
use crate::rivers::RiverMap;
use crate::settlement::SettlementPlan;

/// Данные одного гекса
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexTileData {
    pub biome: Biome,
    pub base_tile: String,
    /// Поворот тайла, 0..=5 (шесть ориентаций гекса)
    pub rotation: u8,
    pub elevation: f32,
    pub moisture: f32,
    #[serde(default)]
    pub river_tile: bool,
    #[serde(default)]
    pub path_tile: bool,
    #[serde(default)]
    pub building_site: bool,
    /// Есть только у площадок (`building_site == true`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
}

/// Карта тайлов, сгенерированная над областью `bounds`
#[derive(Debug, Clone, PartialEq)]
pub struct HexTileMap {
    pub(crate) bounds: HexBounds,
    pub(crate) tiles: BTreeMap<String, HexTileData>,
}

impl HexTileMap {
    /// Собирает карту из слоёв конвейера
    pub(crate) fn assemble(
        elevation: &HexField,
        moisture: &HexField,
        biomes: &BiomeMap,
        rivers: &RiverMap,
        settlements: &SettlementPlan,
    ) -> Self {
        let bounds = elevation.bounds;
        let tiles = bounds
            .coords()
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let cosmetic = biomes.cosmetics[i];
                let building_site = settlements.is_site(c);
                let tile = HexTileData {
                    biome: biomes.data[i],
                    base_tile: cosmetic.base_tile.to_string(),
                    rotation: cosmetic.rotation,
                    elevation: elevation.data[i].clamp(0.0, 1.0),
                    moisture: moisture.data[i].clamp(0.0, 1.0),
                    river_tile: rivers.data[i],
                    path_tile: settlements.roads.data[i],
                    building_site,
                    building: settlements
                        .building(c)
                        .filter(|_| building_site)
                        .map(str::to_string),
                };
                (hex_key(c), tile)
            })
            .collect();

        Self { bounds, tiles }
    }

    pub fn bounds(&self) -> HexBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, coord: HexCoord) -> Option<&HexTileData> {
        self.tiles.get(&hex_key(coord))
    }

    pub fn get_key(&self, key: &str) -> Option<&HexTileData> {
        self.tiles.get(key)
    }

    pub fn contains(&self, coord: HexCoord) -> bool {
        self.tiles.contains_key(&hex_key(coord))
    }

    /// Пары «ключ → тайл» в порядке ключей
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HexTileData)> {
        self.tiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Тайлы в каноническом порядке координат (`r`, затем `q`)
    pub fn iter_coords(&self) -> impl Iterator<Item = (HexCoord, &HexTileData)> + '_ {
        self.bounds
            .coords()
            .into_iter()
            .filter_map(|c| self.get(c).map(|t| (c, t)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tiles.keys().map(String::as_str)
    }

    pub fn tiles(&self) -> &BTreeMap<String, HexTileData> {
        &self.tiles
    }

    pub fn into_tiles(self) -> BTreeMap<String, HexTileData> {
        self.tiles
    }

    pub fn count_rivers(&self) -> usize {
        self.tiles.values().filter(|t| t.river_tile).count()
    }

    pub fn count_paths(&self) -> usize {
        self.tiles.values().filter(|t| t.path_tile).count()
    }

    pub fn count_sites(&self) -> usize {
        self.tiles.values().filter(|t| t.building_site).count()
    }

    pub fn count_buildings(&self) -> usize {
        self.tiles.values().filter(|t| t.building.is_some()).count()
    }

    /// Сколько тайлов каждого биома; биомы без тайлов не попадают в результат
    pub fn biome_histogram(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for t in self.tiles.values() {
            *counts.entry(t.biome).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.tiles)?)
    }

    pub fn save_as_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Читает карту, сохранённую [`HexTileMap::save_as_json`]
    ///
    /// Ключи проверяются разбором; область восстанавливается по крайним гексам.
    /// Пустые строки в JSON не попадают, поэтому у карты шириной 1 и чётной
    /// высоты последняя (нечётная, пустая) строка теряется: `bounds()` станет
    /// на единицу ниже, а набор гексов останется тем же.
    pub fn from_json(json: &str) -> Result<Self> {
        let tiles: BTreeMap<String, HexTileData> = serde_json::from_str(json)?;
        let mut width = 0;
        let mut height = 0;
        for key in tiles.keys() {
            let c = parse_hex_key(key)?;
            height = height.max(c.r + 1);
            width = width.max(c.q - HexBounds::row_start(c.r) + 1);
        }
        Ok(Self {
            bounds: HexBounds::new(width.max(0) as u32, height.max(0) as u32),
            tiles,
        })
    }
}
