// src/settlement/buildings.rs
use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::biome::{Biome, BiomeMap};
use crate::config::GenerationSettings;
use crate::hex::HexCoord;

/// Здание в центре города ставится всегда
pub const TOWN_HALL: &str = "town_hall";

/// Каталог зданий, уместных для биома
pub fn building_catalogue(biome: Biome) -> &'static [&'static str] {
    match biome {
        Biome::Desert => &["adobe_house", "well", "caravanserai"],
        Biome::Grassland => &["house", "farm", "windmill", "tavern", "market"],
        Biome::Badlands => &["mine", "watchtower", "smithy"],
        Biome::Riverside => &["watermill", "fishery", "dock"],
    }
}

/// Расставляет здания на часть площадок
///
/// Всего застраивается `floor(n · building_ratio)` из `n` площадок, но не
/// меньше одной (ратуша) и, при `n ≥ 2`, не больше `n - 1`: хотя бы одна
/// площадка всегда остаётся пустой. Центр города получает [`TOWN_HALL`] и
/// входит в этот счёт. Остальные здания достаются первым площадкам после
/// перемешивания потоком `Settlements` (из канонического порядка); тип
/// здания выбирается из каталога биома.
pub fn place_buildings(
    sites: &[HexCoord],
    town_center: Option<HexCoord>,
    biomes: &BiomeMap,
    rng: &mut ChaCha8Rng,
    settings: &GenerationSettings,
) -> BTreeMap<HexCoord, &'static str> {
    let mut buildings = BTreeMap::new();
    if let Some(town) = town_center {
        buildings.insert(town, TOWN_HALL);
    }

    let mut others: Vec<HexCoord> = sites
        .iter()
        .copied()
        .filter(|&s| Some(s) != town_center)
        .collect();
    others.sort_unstable();
    others.shuffle(rng);

    let count = built_count(sites.len(), settings.building_ratio)
        .saturating_sub(buildings.len());
    for &site in others.iter().take(count) {
        let biome = biomes.get(site).unwrap_or(Biome::Grassland);
        let catalogue = building_catalogue(biome);
        buildings.insert(site, catalogue[rng.gen_range(0..catalogue.len())]);
    }

    log::debug!(
        "buildings: {} of {} sites built up",
        buildings.len(),
        sites.len()
    );
    buildings
}

/// Сколько площадок из `n` получат здание, с учётом ратуши
fn built_count(n: usize, ratio: f32) -> usize {
    if n < 2 {
        return n;
    }
    ((n as f32 * ratio).floor() as usize).clamp(1, n - 1)
}
