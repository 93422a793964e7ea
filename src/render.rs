// src/render.rs
//! Превью карты в PNG
//!
//! Каждый гекс рисуется многоугольником цвета биома (темнее в низинах),
//! поверх — реки, дороги и здания. Используется для отладки генератора из CLI;
//! сцена игры рисует карту сама, через [`hex_to_world`](crate::hex::hex_to_world).

use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_polygon_mut};
use imageproc::point::Point;

use crate::error::Result;
use crate::hex::{HexCoord, WorldPoint, hex_corners, hex_to_world};
use crate::tilemap::{HexTileData, HexTileMap};

/// Минимальный размер гекса в пикселях: меньше — вершины многоугольника слипаются
pub const MIN_HEX_SIZE: f64 = 4.0;

const MARGIN: f64 = 4.0;
const BACKGROUND: Rgb<u8> = Rgb([24, 24, 32]);
const RIVER: Rgb<u8> = Rgb([40, 90, 200]);
const PATH: Rgb<u8> = Rgb([110, 80, 50]);
const SITE: Rgb<u8> = Rgb([240, 240, 240]);
const BUILDING: Rgb<u8> = Rgb([200, 40, 40]);

/// Рисует карту; `hex_size` — радиус гекса в пикселях
pub fn render_tile_map(map: &HexTileMap, hex_size: f64) -> RgbImage {
    let size = hex_size.max(MIN_HEX_SIZE);

    // Габариты карты на плоскости мира
    let (mut min_x, mut min_z) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_z) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (coord, _) in map.iter_coords() {
        for p in hex_corners(coord, size) {
            min_x = min_x.min(p.x);
            min_z = min_z.min(p.z);
            max_x = max_x.max(p.x);
            max_z = max_z.max(p.z);
        }
    }
    if map.is_empty() {
        return RgbImage::from_pixel(1, 1, BACKGROUND);
    }

    let width = (max_x - min_x + 2.0 * MARGIN).ceil() as u32;
    let height = (max_z - min_z + 2.0 * MARGIN).ceil() as u32;
    let mut img = RgbImage::from_pixel(width.max(1), height.max(1), BACKGROUND);

    let to_pixel = |p: WorldPoint| {
        (
            (p.x - min_x + MARGIN).round() as i32,
            (p.z - min_z + MARGIN).round() as i32,
        )
    };

    for (coord, tile) in map.iter_coords() {
        let polygon: Vec<Point<i32>> = hex_corners(coord, size)
            .into_iter()
            .map(|p| {
                let (x, y) = to_pixel(p);
                Point::new(x, y)
            })
            .collect();
        draw_polygon_mut(&mut img, &polygon, tile_color(tile));
    }

    for (coord, tile) in map.iter_coords() {
        draw_overlay(&mut img, coord, tile, size, to_pixel);
    }

    img
}

fn tile_color(tile: &HexTileData) -> Rgb<u8> {
    let [r, g, b] = tile.biome.to_rgb();
    let shade = 0.7 + 0.3 * tile.elevation.clamp(0.0, 1.0);
    Rgb([
        (f32::from(r) * shade) as u8,
        (f32::from(g) * shade) as u8,
        (f32::from(b) * shade) as u8,
    ])
}

fn draw_overlay(
    img: &mut RgbImage,
    coord: HexCoord,
    tile: &HexTileData,
    size: f64,
    to_pixel: impl Fn(WorldPoint) -> (i32, i32),
) {
    let center = to_pixel(hex_to_world(coord, size));
    let radius = |k: f64| ((size * k).round() as i32).max(1);

    if tile.river_tile {
        draw_filled_circle_mut(img, center, radius(0.45), RIVER);
    }
    if tile.path_tile {
        draw_filled_circle_mut(img, center, radius(0.2), PATH);
    }
    if tile.building.is_some() {
        draw_filled_circle_mut(img, center, radius(0.3), BUILDING);
    } else if tile.building_site {
        draw_hollow_circle_mut(img, center, radius(0.3), SITE);
    }
}

impl HexTileMap {
    pub fn render(&self, hex_size: f64) -> RgbImage {
        render_tile_map(self, hex_size)
    }

    pub fn save_as_png(&self, path: impl AsRef<Path>, hex_size: f64) -> Result<()> {
        self.render(hex_size).save(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HexMapConfig;
    use crate::generator::generate_tile_map;

    #[test]
    fn image_covers_the_map() {
        let map = generate_tile_map(&HexMapConfig::new(5, 8, 6)).unwrap();
        let img = render_tile_map(&map, 10.0);
        // 8 гексов шириной √3·10 ≈ 17.3 px плюс поля
        assert!(img.width() >= 8 * 17);
        assert!(img.height() >= 60);

        // Центр гекса (0,0) закрашен, а не оставлен фоном
        let c = hex_to_world(HexCoord::ORIGIN, 10.0);
        let corners = hex_corners(HexCoord::ORIGIN, 10.0);
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_z = corners.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
        let px = (c.x - min_x + MARGIN).round() as u32;
        let pz = (c.z - min_z + MARGIN).round() as u32;
        assert_ne!(*img.get_pixel(px, pz), BACKGROUND);
    }

    #[test]
    fn tiny_hex_size_is_clamped() {
        let map = generate_tile_map(&HexMapConfig::new(5, 4, 4)).unwrap();
        let img = render_tile_map(&map, 0.1);
        assert!(img.width() > 4);
    }
}
