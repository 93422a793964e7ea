use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::biome::{Biome, BiomeMap, classify};
use crate::config::GenerationSettings;
use crate::grid::HexBounds;
use crate::heightmap::HexField;
use crate::hex::{HexCoord, hex_distance, hex_neighbors};

/// Речная сеть: флаг реки на каждый гекс плюс сами русла от истока к устью
#[derive(Debug, Clone, PartialEq)]
pub struct RiverMap {
    pub bounds: HexBounds,
    pub data: Vec<bool>,
    pub rivers: Vec<Vec<HexCoord>>,
}

impl RiverMap {
    pub fn new(bounds: HexBounds) -> Self {
        Self {
            bounds,
            data: vec![false; bounds.tile_count()],
            rivers: Vec::new(),
        }
    }

    pub fn is_river(&self, coord: HexCoord) -> bool {
        self.bounds.index_of(coord).is_some_and(|i| self.data[i])
    }

    pub fn tile_count(&self) -> usize {
        self.data.iter().filter(|&&r| r).count()
    }
}

/// Чем закончилась трассировка русла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiverMouth {
    /// Достигнут край карты
    Edge,
    /// Высота опустилась ниже порога стока
    Sink,
    /// Русло влилось в уже проложенную реку
    Merge,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiverReport {
    pub candidates: usize,
    pub traced: usize,
    pub carved: usize,
    pub discarded: usize,
    pub merged: usize,
}

/// Прокладывает реки методом наискорейшего спуска
///
/// 1. Истоки: гексы не на краю с высотой не ниже квантиля
///    `river_source_percentile`; перемешиваются потоком `Rivers` и принимаются
///    жадно с учётом `river_source_spacing`
/// 2. Русло: каждый шаг — в самого низкого непосещённого соседа; если русло
///    упёрлось в тупик или исчерпало лимит шагов, оно отбрасывается целиком
/// 3. Русло помечается рекой, влажность растёт, биом становится `Riverside`;
///    берега получают меньшую прибавку влажности и переклассифицируются
///
/// Ноль рек — допустимый результат (например, на почти плоской карте).
pub fn generate_rivers(
    elevation: &HexField,
    moisture: &mut HexField,
    biomes: &mut BiomeMap,
    rng: &mut ChaCha8Rng,
    settings: &GenerationSettings,
) -> (RiverMap, RiverReport) {
    let bounds = elevation.bounds;
    let mut river_map = RiverMap::new(bounds);
    let mut report = RiverReport::default();

    let target = (bounds.tile_count() / settings.tiles_per_river)
        .max(1)
        .min(settings.max_rivers);
    let max_steps = if settings.max_river_steps == 0 {
        (bounds.width + bounds.height) as usize
    } else {
        settings.max_river_steps
    };

    // Кандидаты в каноническом порядке, затем перемешивание из потока
    let threshold = elevation.quantile(settings.river_source_percentile);
    let mut candidates: Vec<HexCoord> = bounds
        .coords()
        .into_iter()
        .zip(&elevation.data)
        .filter(|&(c, &h)| h >= threshold && !bounds.is_edge(c))
        .map(|(c, _)| c)
        .collect();
    candidates.shuffle(rng);
    report.candidates = candidates.len();

    let mut sources: Vec<HexCoord> = Vec::new();
    let mut banked = vec![false; bounds.tile_count()];

    for source in candidates {
        if river_map.rivers.len() >= target {
            break;
        }
        if river_map.is_river(source)
            || sources
                .iter()
                .any(|&s| hex_distance(s, source) < settings.river_source_spacing)
        {
            continue;
        }

        report.traced += 1;
        let Some((path, mouth)) = trace_river(source, elevation, &river_map, settings, max_steps)
        else {
            report.discarded += 1;
            continue;
        };
        if mouth == RiverMouth::Merge {
            report.merged += 1;
        }

        carve(&path, &mut river_map, moisture, biomes, rng, settings);
        wet_banks(&path, elevation, &river_map, moisture, biomes, &mut banked, rng, settings);

        sources.push(source);
        river_map.rivers.push(path);
        report.carved += 1;
    }

    log::debug!(
        "rivers: {} carved, {} discarded, {} merged, {} tiles",
        report.carved,
        report.discarded,
        report.merged,
        river_map.tile_count()
    );
    (river_map, report)
}

/// Трассирует одно русло от истока
///
/// Кандидаты на следующий шаг — соседи внутри карты, ещё не лежащие на
/// русле и не касающиеся его (кроме текущего гекса): так русло остаётся
/// простой линией без петель. Из них выбирается самый низкий; при равенстве
/// побеждает первый в порядке [`HexCoord::DIRECTIONS`].
pub fn trace_river(
    source: HexCoord,
    elevation: &HexField,
    existing: &RiverMap,
    settings: &GenerationSettings,
    max_steps: usize,
) -> Option<(Vec<HexCoord>, RiverMouth)> {
    let bounds = elevation.bounds;
    let mut path = vec![source];
    let mut on_path: HashSet<HexCoord> = HashSet::from([source]);
    let mut current = source;

    for step in 0..=max_steps {
        if bounds.is_edge(current) {
            return Some((path, RiverMouth::Edge));
        }
        if elevation.get(current)? < settings.river_sink_elevation {
            return Some((path, RiverMouth::Sink));
        }
        if step == max_steps {
            break;
        }

        let mut next: Option<(HexCoord, f32)> = None;
        for n in bounds.neighbors_in_bounds(current) {
            if on_path.contains(&n) || touches_path(n, current, &on_path) {
                continue;
            }
            let Some(h) = elevation.get(n) else {
                continue;
            };
            if next.is_none_or(|(_, best)| h < best) {
                next = Some((n, h));
            }
        }

        // Тупик: русло не удалось довести до стока
        let (n, _) = next?;
        path.push(n);
        on_path.insert(n);
        if existing.is_river(n) {
            return Some((path, RiverMouth::Merge));
        }
        current = n;
    }

    None
}

fn touches_path(candidate: HexCoord, current: HexCoord, on_path: &HashSet<HexCoord>) -> bool {
    hex_neighbors(candidate)
        .iter()
        .any(|n| *n != current && on_path.contains(n))
}

fn carve(
    path: &[HexCoord],
    river_map: &mut RiverMap,
    moisture: &mut HexField,
    biomes: &mut BiomeMap,
    rng: &mut ChaCha8Rng,
    settings: &GenerationSettings,
) {
    for &c in path {
        let Some(i) = river_map.bounds.index_of(c) else {
            continue;
        };
        // Точка слияния уже помечена
        if river_map.data[i] {
            continue;
        }
        river_map.data[i] = true;
        moisture.add_clamped(c, settings.river_moisture_boost);
        biomes.reclassify(c, Biome::Riverside, rng);
    }
}

#[allow(clippy::too_many_arguments)]
fn wet_banks(
    path: &[HexCoord],
    elevation: &HexField,
    river_map: &RiverMap,
    moisture: &mut HexField,
    biomes: &mut BiomeMap,
    banked: &mut [bool],
    rng: &mut ChaCha8Rng,
    settings: &GenerationSettings,
) {
    let bounds = river_map.bounds;
    for &c in path {
        for n in bounds.neighbors_in_bounds(c) {
            let Some(i) = bounds.index_of(n) else {
                continue;
            };
            if river_map.data[i] || banked[i] {
                continue;
            }
            banked[i] = true;
            moisture.add_clamped(n, settings.river_bank_moisture_boost);
            let biome = classify(elevation.data[i], moisture.data[i], settings);
            biomes.reclassify(n, biome, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::assign_biomes;
    use crate::climate::generate_moisture;
    use crate::heightmap::generate_elevation;
    use crate::rng::{Stage, StageStreams};

    /// Наклонная плоскость: высота падает к правому краю
    fn slope(bounds: HexBounds) -> HexField {
        let mut field = HexField::new(bounds);
        for c in bounds.coords() {
            let x = (c.q + c.r / 2) as f32 / bounds.width as f32;
            field.set(c, 1.0 - x);
        }
        field
    }

    fn run(seed: u64, bounds: HexBounds) -> (HexField, HexField, BiomeMap, RiverMap, RiverReport) {
        let settings = GenerationSettings::default();
        let streams = StageStreams::new(seed);
        let mut fields = streams.stream(Stage::Fields);
        let elevation = generate_elevation(bounds, &mut fields, &settings);
        let mut moisture = generate_moisture(&elevation, &mut fields, &settings);
        let mut biomes = assign_biomes(
            &elevation,
            &moisture,
            &mut streams.stream(Stage::Cosmetics),
            &settings,
        );
        let (rivers, report) = generate_rivers(
            &elevation,
            &mut moisture,
            &mut biomes,
            &mut streams.stream(Stage::Rivers),
            &settings,
        );
        (elevation, moisture, biomes, rivers, report)
    }

    #[test]
    fn trace_follows_slope_to_edge() {
        let bounds = HexBounds::new(12, 7);
        let elevation = slope(bounds);
        let settings = GenerationSettings {
            river_sink_elevation: 0.0,
            ..GenerationSettings::default()
        };
        let source = HexCoord::new(1, 3);
        let (path, mouth) =
            trace_river(source, &elevation, &RiverMap::new(bounds), &settings, 50).unwrap();
        assert_eq!(mouth, RiverMouth::Edge);
        assert_eq!(path[0], source);
        assert!(bounds.is_edge(*path.last().unwrap()));
        for pair in path.windows(2) {
            assert_eq!(hex_distance(pair[0], pair[1]), 1);
        }
    }

    /// Равнина 0.9 с истоком 0.95 в центре; указанные соседи истока опущены до 0.3
    fn basin(bounds: HexBounds, source: HexCoord, low: &[HexCoord]) -> HexField {
        let mut field = HexField::new(bounds);
        for c in bounds.coords() {
            field.set(c, 0.9);
        }
        field.set(source, 0.95);
        for &c in low {
            field.set(c, 0.3);
        }
        field
    }

    #[test]
    fn equal_neighbours_resolve_by_direction_order() {
        let bounds = HexBounds::new(7, 7);
        let source = HexCoord::new(1, 3);
        let [e, ne, _, _, _, se] = hex_neighbors(source);
        let settings = GenerationSettings {
            river_sink_elevation: 0.5,
            ..GenerationSettings::default()
        };

        // NE раньше SE
        let elevation = basin(bounds, source, &[se, ne]);
        let (path, mouth) =
            trace_river(source, &elevation, &RiverMap::new(bounds), &settings, 10).unwrap();
        assert_eq!(mouth, RiverMouth::Sink);
        assert_eq!(path, vec![source, ne]);

        // E раньше всех
        let elevation = basin(bounds, source, &[se, ne, e]);
        let (path, _) =
            trace_river(source, &elevation, &RiverMap::new(bounds), &settings, 10).unwrap();
        assert_eq!(path, vec![source, e]);
    }

    #[test]
    fn trace_stops_at_sink() {
        let bounds = HexBounds::new(12, 7);
        let elevation = slope(bounds);
        let settings = GenerationSettings {
            river_sink_elevation: 0.6,
            ..GenerationSettings::default()
        };
        let (path, mouth) = trace_river(
            HexCoord::new(1, 3),
            &elevation,
            &RiverMap::new(bounds),
            &settings,
            50,
        )
        .unwrap();
        assert_eq!(mouth, RiverMouth::Sink);
        assert!(elevation.get(*path.last().unwrap()).unwrap() < 0.6);
    }

    #[test]
    fn exhausted_budget_discards_path() {
        let bounds = HexBounds::new(12, 7);
        let elevation = slope(bounds);
        let settings = GenerationSettings {
            river_sink_elevation: 0.0,
            ..GenerationSettings::default()
        };
        assert!(
            trace_river(
                HexCoord::new(1, 3),
                &elevation,
                &RiverMap::new(bounds),
                &settings,
                2
            )
            .is_none()
        );
    }

    #[test]
    fn trace_merges_into_existing_river() {
        let bounds = HexBounds::new(12, 7);
        let elevation = slope(bounds);
        let settings = GenerationSettings {
            river_sink_elevation: 0.0,
            ..GenerationSettings::default()
        };
        let mut existing = RiverMap::new(bounds);
        // Вертикальная «река» поперёк склона
        for r in 1..6 {
            let c = HexCoord::new(6 - r / 2, r);
            let i = bounds.index_of(c).unwrap();
            existing.data[i] = true;
        }
        let (path, mouth) =
            trace_river(HexCoord::new(1, 3), &elevation, &existing, &settings, 50).unwrap();
        assert_eq!(mouth, RiverMouth::Merge);
        assert!(existing.is_river(*path.last().unwrap()));
    }

    #[test]
    fn zero_rivers_is_a_valid_outcome() {
        let bounds = HexBounds::new(10, 10);
        let elevation = slope(bounds);
        let settings = GenerationSettings {
            max_rivers: 0,
            ..GenerationSettings::default()
        };
        let mut moisture = elevation.clone();
        let mut rng = StageStreams::new(1).stream(Stage::Rivers);
        let mut biomes = assign_biomes(&elevation, &moisture, &mut rng, &settings);
        let before = moisture.clone();
        let (rivers, report) =
            generate_rivers(&elevation, &mut moisture, &mut biomes, &mut rng, &settings);
        assert!(rivers.rivers.is_empty());
        assert_eq!(rivers.tile_count(), 0);
        assert_eq!(report.carved, 0);
        assert_eq!(moisture, before);
    }

    #[test]
    fn flat_map_stays_in_range() {
        let bounds = HexBounds::new(10, 10);
        let mut elevation = HexField::new(bounds);
        elevation.normalize();
        let settings = GenerationSettings::default();
        let mut moisture = elevation.clone();
        let mut rng = StageStreams::new(1).stream(Stage::Rivers);
        let mut biomes = assign_biomes(&elevation, &moisture, &mut rng, &settings);
        let (rivers, report) =
            generate_rivers(&elevation, &mut moisture, &mut biomes, &mut rng, &settings);
        assert_eq!(rivers.rivers.len(), report.carved);
        assert!(report.carved <= 1);
        assert!(moisture.data.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn generated_rivers_are_simple_paths() {
        for seed in [1, 2, 3, 4, 5] {
            let (_, moisture, biomes, rivers, report) = run(seed, HexBounds::new(24, 24));
            assert_eq!(report.carved, rivers.rivers.len());
            for path in &rivers.rivers {
                let unique: HashSet<_> = path.iter().collect();
                assert_eq!(unique.len(), path.len(), "river revisits a hex");
                for (i, c) in path.iter().enumerate() {
                    assert!(rivers.is_river(*c));
                    assert_eq!(biomes.get(*c), Some(Biome::Riverside));
                    // Соседи по руслу — только предыдущий и следующий гекс
                    let touching = path
                        .iter()
                        .enumerate()
                        .filter(|&(j, o)| j != i && hex_distance(*c, *o) == 1)
                        .count();
                    assert!(touching <= 2);
                }
            }
            assert!(moisture.data.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn riverside_only_on_river_tiles() {
        for seed in 0..10 {
            let (_, _, biomes, rivers, _) = run(seed, HexBounds::new(32, 32));
            for c in biomes.bounds.coords() {
                if biomes.get(c) == Some(Biome::Riverside) {
                    assert!(rivers.is_river(c), "seed {seed}: dry riverside at {c}");
                }
            }
        }
    }

    #[test]
    fn rivers_appear_on_most_seeds() {
        let with_rivers = (0..10)
            .filter(|&seed| run(seed, HexBounds::new(20, 20)).3.tile_count() > 0)
            .count();
        assert!(with_rivers >= 8, "only {with_rivers} of 10 maps have rivers");
    }
}
