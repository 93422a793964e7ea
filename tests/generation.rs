use std::collections::HashSet;

use hexmapgen::{
    Biome, ConfigError, HexCoord, HexMapConfig, HexMapGenerator, hex_distance, hex_key,
    hex_neighbors, hex_round, hex_to_world, parse_hex_key, world_to_hex,
};

fn generate(seed: u64, width: u32, height: u32) -> hexmapgen::HexTileMap {
    HexMapGenerator::new(HexMapConfig::new(seed, width, height))
        .unwrap()
        .generate()
        .clone()
}

#[test]
fn coordinate_properties() {
    assert_eq!(hex_key(HexCoord::new(5, -3)), "5,-3");
    assert_eq!(parse_hex_key("5,-3").unwrap(), HexCoord::new(5, -3));

    let o = HexCoord::new(0, 0);
    assert_eq!(hex_distance(o, o), 0);
    assert_eq!(hex_distance(o, HexCoord::new(1, 0)), 1);
    assert_eq!(hex_distance(o, HexCoord::new(3, 0)), 3);
    assert_eq!(hex_distance(HexCoord::new(-2, 2), HexCoord::new(2, -2)), 4);

    let neighbors = hex_neighbors(o);
    assert_eq!(neighbors.len(), 6);
    assert!(neighbors.iter().all(|&n| hex_distance(o, n) == 1));

    for q in -8..=8 {
        for r in -8..=8 {
            let c = HexCoord::new(q, r);
            assert_eq!(hex_round(c.into()), c);
            let p = hex_to_world(c, 1.5);
            assert_eq!(world_to_hex(p.x, p.z, 1.5), c);
        }
    }
}

#[test]
fn determinism() {
    let a = generate(1234, 16, 16);
    let b = generate(1234, 16, 16);
    assert_eq!(a, b);
    for (key, tile) in a.iter().step_by(7) {
        let other = b.get_key(key).unwrap();
        assert_eq!(tile.biome, other.biome);
        assert_eq!(tile.base_tile, other.base_tile);
    }
}

#[test]
fn seed_sensitivity() {
    for (s1, s2) in [(1, 2), (10, 11), (100, 200), (7, 70_000)] {
        let a = generate(s1, 16, 16);
        let b = generate(s2, 16, 16);
        let differing = a
            .iter()
            .filter(|(key, tile)| b.get_key(key).is_some_and(|o| o.biome != tile.biome))
            .count();
        assert!(differing > 0, "seeds {s1} and {s2} gave identical biomes");
    }
}

#[test]
fn bounds_for_sixteen_by_sixteen() {
    for seed in [0, 1, 2] {
        let map = generate(seed, 16, 16);
        assert!(map.len() > 200 && map.len() < 300, "{} tiles", map.len());
        for (key, tile) in map.iter() {
            let c = parse_hex_key(key).unwrap();
            assert!(map.bounds().contains(c));
            assert!((0.0..=1.0).contains(&tile.elevation));
            assert!((0.0..=1.0).contains(&tile.moisture));
            assert!(tile.elevation.is_finite() && tile.moisture.is_finite());
            assert!(tile.rotation <= 5);
            assert!(Biome::ALL.contains(&tile.biome));
            assert!(tile.biome.palette().contains(&tile.base_tile.as_str()));
        }
    }
}

#[test]
fn feature_presence() {
    let seeds = 0..10u64;
    let mut with_rivers = 0;
    let mut with_paths = 0;
    let mut with_sites = 0;
    let mut with_two_biomes = 0;

    for seed in seeds {
        let map = generate(seed, 16, 16);
        with_rivers += usize::from(map.count_rivers() > 0);
        with_paths += usize::from(map.count_paths() > 0);
        with_sites += usize::from(map.count_sites() > 0);
        with_two_biomes += usize::from(map.biome_histogram().len() >= 2);

        for (_, tile) in map.iter() {
            if tile.building.is_some() {
                assert!(tile.building_site);
            }
        }
        assert!(map.count_buildings() <= map.count_sites());
    }

    assert!(with_rivers >= 8, "rivers on {with_rivers}/10 maps");
    assert!(with_paths >= 8, "paths on {with_paths}/10 maps");
    assert!(with_sites >= 9, "sites on {with_sites}/10 maps");
    assert!(with_two_biomes >= 9, "two biomes on {with_two_biomes}/10 maps");
}

#[test]
fn river_tiles_are_wet_riverside() {
    let settings = hexmapgen::GenerationSettings::default();
    for seed in 0..5 {
        let map = generate(seed, 24, 24);
        for (_, tile) in map.iter_coords().filter(|(_, t)| t.river_tile) {
            assert_eq!(tile.biome, Biome::Riverside);
            assert!(tile.moisture >= settings.river_moisture_boost - f32::EPSILON);
        }
    }
}

#[test]
fn riverside_tiles_touch_water() {
    for seed in 0..10 {
        let map = generate(seed, 32, 32);
        for (c, tile) in map.iter_coords().filter(|(_, t)| t.biome == Biome::Riverside) {
            let wet = tile.river_tile
                || hex_neighbors(c)
                    .iter()
                    .any(|n| map.get(*n).is_some_and(|t| t.river_tile));
            assert!(wet, "seed {seed}: riverside at {c} with no river nearby");
        }
    }
}

#[test]
fn small_maps_keep_empty_sites() {
    for seed in 0..30 {
        let map = generate(seed, 10, 10);
        if map.count_sites() >= 2 {
            assert!(
                map.count_buildings() < map.count_sites(),
                "seed {seed}: every site has a building"
            );
        }
    }
}

#[test]
fn path_network_is_connected() {
    for seed in 0..5 {
        let map = generate(seed, 20, 20);
        let paths: HashSet<HexCoord> = map
            .iter_coords()
            .filter(|(_, t)| t.path_tile)
            .map(|(c, _)| c)
            .collect();
        let Some(&start) = paths.iter().min() else {
            continue;
        };

        let mut seen = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(c) = stack.pop() {
            for n in hex_neighbors(c) {
                if paths.contains(&n) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        assert_eq!(seen.len(), paths.len(), "seed {seed}: road network is split");

        // Все площадки, кроме одиночной, лежат на дорогах
        if map.count_sites() > 1 {
            for (c, t) in map.iter_coords() {
                if t.building_site {
                    assert!(paths.contains(&c));
                }
            }
        }
    }
}

#[test]
fn reseed_does_not_regenerate() {
    let mut generator = HexMapGenerator::new(HexMapConfig::new(5, 16, 16)).unwrap();
    let first = generator.generate().clone();
    generator.reseed(6);
    assert_eq!(generator.last_map(), Some(&first));
    let second = generator.generate().clone();
    assert_ne!(first, second);
}

#[test]
fn configuration_errors() {
    assert!(matches!(
        HexMapGenerator::new(HexMapConfig::new(0, 0, 0)),
        Err(ConfigError::InvalidDimension { .. })
    ));
    assert!(HexMapGenerator::new(HexMapConfig::default()).is_ok());
}
