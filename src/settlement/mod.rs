pub mod buildings;
pub mod roads;
pub mod sites;

use std::collections::BTreeMap;

use rand_chacha::ChaCha8Rng;

use crate::biome::BiomeMap;
use crate::config::GenerationSettings;
use crate::heightmap::HexField;
use crate::hex::HexCoord;
use crate::rivers::RiverMap;

pub use buildings::{TOWN_HALL, building_catalogue, place_buildings};
pub use roads::{RoadNetwork, connect_sites};
pub use sites::select_sites;

/// План поселений: площадки, дороги и здания
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementPlan {
    /// Площадки в каноническом порядке
    pub sites: Vec<HexCoord>,
    pub roads: RoadNetwork,
    /// Только застроенные площадки
    pub buildings: BTreeMap<HexCoord, &'static str>,
}

impl SettlementPlan {
    pub fn is_site(&self, coord: HexCoord) -> bool {
        self.sites.binary_search(&coord).is_ok()
    }

    pub fn building(&self, coord: HexCoord) -> Option<&'static str> {
        self.buildings.get(&coord).copied()
    }
}

/// Планирует поселения: площадки → дороги → здания
///
/// Выборки из потока `Settlements` идут строго в этом порядке: сначала
/// перемешивание кандидатов-площадок, затем перемешивание и выбор зданий.
/// Прокладка дорог случайных чисел не потребляет.
pub fn plan_settlements(
    elevation: &HexField,
    rivers: &RiverMap,
    biomes: &BiomeMap,
    rng: &mut ChaCha8Rng,
    settings: &GenerationSettings,
) -> SettlementPlan {
    let sites = select_sites(elevation, rivers, rng, settings);
    let roads = connect_sites(elevation.bounds, &sites);
    let buildings = place_buildings(&sites, roads.town_center, biomes, rng, settings);

    SettlementPlan {
        sites,
        roads,
        buildings,
    }
}
