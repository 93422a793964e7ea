// src/settlement/sites.rs
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::config::GenerationSettings;
use crate::heightmap::HexField;
use crate::hex::{HexCoord, hex_distance};
use crate::rivers::RiverMap;

/// Сколько площадок нужно карте такой площади
pub fn target_site_count(tile_count: usize, settings: &GenerationSettings) -> usize {
    (tile_count / settings.tiles_per_site)
        .max(1)
        .min(settings.max_sites)
}

/// Выбирает площадки под застройку
///
/// Кандидаты — гексы не на реке, не ближе `site_edge_margin` к краю и не
/// выше `max_site_elevation`. Кандидаты собираются в каноническом порядке,
/// перемешиваются потоком `Settlements` и принимаются жадно, пока площадки
/// отстоят друг от друга минимум на `min_site_spacing`.
///
/// Результат отсортирован в каноническом порядке. Пустой список — допустимый
/// исход (например, карта целиком у края).
pub fn select_sites(
    elevation: &HexField,
    rivers: &RiverMap,
    rng: &mut ChaCha8Rng,
    settings: &GenerationSettings,
) -> Vec<HexCoord> {
    let bounds = elevation.bounds;
    let target = target_site_count(bounds.tile_count(), settings);

    let mut candidates: Vec<HexCoord> = bounds
        .coords()
        .into_iter()
        .zip(&elevation.data)
        .filter(|&(c, &h)| {
            h <= settings.max_site_elevation
                && !rivers.is_river(c)
                && bounds.edge_distance(c) >= settings.site_edge_margin
        })
        .map(|(c, _)| c)
        .collect();
    candidates.shuffle(rng);

    let mut sites: Vec<HexCoord> = Vec::with_capacity(target);
    for c in candidates {
        if sites.len() >= target {
            break;
        }
        if sites
            .iter()
            .all(|&s| hex_distance(s, c) >= settings.min_site_spacing)
        {
            sites.push(c);
        }
    }

    sites.sort_unstable();
    sites
}
