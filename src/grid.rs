//! Прямоугольная область карты в аксиальных координатах
//!
//! Соглашение о смещении — «odd-r» для pointy-top гексов:
//! - строки `r = 0..height`;
//! - строка `r` начинается с `q = -floor(r / 2)`, поэтому визуально ряды
//!   лежат друг под другом, а не уходят по диагонали;
//! - чётные строки содержат `width` гексов, нечётные сдвинуты на полгекса
//!   вправо и содержат `width - 1` гекс, чтобы боковые края оставались ровными.
//!
//! Итого тайлов: `width · height − floor(height / 2)`; для 16×16 это 248.

use serde::{Deserialize, Serialize};

use crate::hex::{HexCoord, hex_neighbors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexBounds {
    pub width: u32,
    pub height: u32,
}

impl HexBounds {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Количество гексов в области
    #[must_use]
    pub fn tile_count(&self) -> usize {
        (self.width as usize) * (self.height as usize) - (self.height as usize) / 2
    }

    /// Первый `q` строки `r`
    #[must_use]
    pub fn row_start(r: i32) -> i32 {
        -r.div_euclid(2)
    }

    /// Длина строки `r`
    #[must_use]
    pub fn row_len(&self, r: i32) -> i32 {
        self.width as i32 - (r & 1)
    }

    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        if coord.r < 0 || coord.r >= self.height as i32 {
            return false;
        }
        let start = Self::row_start(coord.r);
        coord.q >= start && coord.q < start + self.row_len(coord.r)
    }

    /// Плотный индекс гекса в каноническом построчном порядке
    #[must_use]
    pub fn index_of(&self, coord: HexCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let r = coord.r as usize;
        let row_offset = r * self.width as usize - r / 2;
        Some(row_offset + (coord.q - Self::row_start(coord.r)) as usize)
    }

    /// Все гексы области в каноническом порядке (`r`, затем `q`)
    #[must_use]
    pub fn coords(&self) -> Vec<HexCoord> {
        let mut out = Vec::with_capacity(self.tile_count());
        for r in 0..self.height as i32 {
            let start = Self::row_start(r);
            for q in start..start + self.row_len(r) {
                out.push(HexCoord::new(q, r));
            }
        }
        out
    }

    /// Число шагов до ближайшего края области (0 — гекс на краю)
    #[must_use]
    pub fn edge_distance(&self, coord: HexCoord) -> u32 {
        let start = Self::row_start(coord.r);
        let left = coord.q - start;
        let right = start + self.row_len(coord.r) - 1 - coord.q;
        let top = coord.r;
        let bottom = self.height as i32 - 1 - coord.r;
        left.min(right).min(top).min(bottom).max(0) as u32
    }

    #[must_use]
    pub fn is_edge(&self, coord: HexCoord) -> bool {
        self.edge_distance(coord) == 0
    }

    /// Соседи внутри области, в порядке [`HexCoord::DIRECTIONS`]
    pub fn neighbors_in_bounds(&self, coord: HexCoord) -> impl Iterator<Item = HexCoord> + '_ {
        hex_neighbors(coord)
            .into_iter()
            .filter(move |n| self.contains(*n))
    }

    /// Гекс, ближайший к геометрическому центру области
    #[must_use]
    pub fn center(&self) -> HexCoord {
        let mut r = (self.height as i32 - 1) / 2;
        // При ширине 1 нечётные строки пусты
        if self.row_len(r) == 0 {
            r -= 1;
        }
        let q = Self::row_start(r) + (self.row_len(r) - 1) / 2;
        HexCoord::new(q, r)
    }
}
