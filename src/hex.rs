//! Аксиальные координаты гексагональной сетки
//!
//! Гекс адресуется парой `(q, r)`; третья кубическая ось неявная: `s = -q - r`.
//! Раскладка на плоскости — «pointy-top» (вершина гекса смотрит вдоль оси Z):
//!
//! ```text
//! x = size · √3 · (q + r / 2)
//! z = size · 3/2 · r
//! ```
//!
//! Строковый ключ гекса — `"q,r"` без выравнивания знака. Он используется как
//! ключ итоговой карты тайлов и разбирается обратно через [`parse_hex_key`].
//!
//! ## Пример
//! ```
//! use hexmapgen::hex::{HexCoord, hex_key, parse_hex_key, hex_distance};
//!
//! let c = HexCoord::new(5, -3);
//! assert_eq!(hex_key(c), "5,-3");
//! assert_eq!(parse_hex_key("5,-3").unwrap(), c);
//! assert_eq!(hex_distance(HexCoord::new(-2, 2), HexCoord::new(2, -2)), 4);
//! ```

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseHexKeyError;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Гекс в аксиальных координатах
///
/// Порядок сравнения — сначала `r`, затем `q`: это канонический построчный
/// порядок обхода карты, от которого зависит детерминированность генерации.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct HexCoord {
    // Порядок полей задаёт derive(Ord): r, затем q
    pub r: i32,
    pub q: i32,
}

impl HexCoord {
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    /// Шесть направлений в фиксированном порядке: E, NE, NW, W, SW, SE.
    pub const DIRECTIONS: [Self; 6] = [
        Self { q: 1, r: 0 },  // E
        Self { q: 1, r: -1 }, // NE
        Self { q: 0, r: -1 }, // NW
        Self { q: -1, r: 0 }, // W
        Self { q: -1, r: 1 }, // SW
        Self { q: 0, r: 1 },  // SE
    ];

    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Неявная третья кубическая координата.
    #[must_use]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    #[must_use]
    pub fn distance(self, other: Self) -> u32 {
        hex_distance(self, other)
    }

    #[must_use]
    pub fn neighbors(self) -> [Self; 6] {
        hex_neighbors(self)
    }
}

impl Add for HexCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.q + other.q, self.r + other.r)
    }
}

impl Sub for HexCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.q - other.q, self.r - other.r)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

impl FromStr for HexCoord {
    type Err = ParseHexKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let mut parts = key.split(',');
        let (Some(q_part), Some(r_part)) = (parts.next(), parts.next()) else {
            return Err(ParseHexKeyError::MissingComma(key.to_string()));
        };
        if parts.next().is_some() {
            return Err(ParseHexKeyError::TooManyParts(key.to_string()));
        }

        let component = |part: &str| {
            part.parse::<i32>()
                .map_err(|_| ParseHexKeyError::InvalidComponent {
                    key: key.to_string(),
                    component: part.to_string(),
                })
        };

        Ok(Self::new(component(q_part)?, component(r_part)?))
    }
}

impl Serialize for HexCoord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexCoord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

/// Дробный гекс — промежуточный результат обратного преобразования из мира
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionalHex {
    pub q: f64,
    pub r: f64,
}

impl FractionalHex {
    #[must_use]
    pub const fn new(q: f64, r: f64) -> Self {
        Self { q, r }
    }
}

impl From<HexCoord> for FractionalHex {
    fn from(c: HexCoord) -> Self {
        Self::new(f64::from(c.q), f64::from(c.r))
    }
}

/// Точка на непрерывной плоскости мира (ось Y отдана высоте сцены)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub z: f64,
}

/// Канонический ключ `"q,r"`
#[must_use]
pub fn hex_key(coord: HexCoord) -> String {
    coord.to_string()
}

/// Разбор ключа `"q,r"`; точная обратная операция к [`hex_key`]
pub fn parse_hex_key(key: &str) -> Result<HexCoord, ParseHexKeyError> {
    key.parse()
}

/// Гексагональное расстояние: `(|dq| + |dr| + |dq + dr|) / 2`
#[must_use]
pub fn hex_distance(a: HexCoord, b: HexCoord) -> u32 {
    let dq = i64::from(a.q) - i64::from(b.q);
    let dr = i64::from(a.r) - i64::from(b.r);
    ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
}

/// Шесть соседей в порядке [`HexCoord::DIRECTIONS`]
#[must_use]
pub fn hex_neighbors(coord: HexCoord) -> [HexCoord; 6] {
    HexCoord::DIRECTIONS.map(|d| coord + d)
}

/// Центр гекса на плоскости мира (pointy-top)
#[must_use]
pub fn hex_to_world(coord: HexCoord, hex_size: f64) -> WorldPoint {
    let q = f64::from(coord.q);
    let r = f64::from(coord.r);
    WorldPoint {
        x: hex_size * SQRT_3 * (q + r / 2.0),
        z: hex_size * 1.5 * r,
    }
}

/// Ближайший гекс к точке мира
#[must_use]
pub fn world_to_hex(x: f64, z: f64, hex_size: f64) -> HexCoord {
    let q = (SQRT_3 / 3.0 * x - z / 3.0) / hex_size;
    let r = (2.0 / 3.0 * z) / hex_size;
    hex_round(FractionalHex::new(q, r))
}

/// Кубическое округление
///
/// Каждая из трёх кубических компонент округляется отдельно, затем компонента
/// с наибольшей ошибкой восстанавливается из двух других, чтобы `x + y + z == 0`.
/// Приведение `f64 → i32` насыщающее, NaN превращается в 0.
#[must_use]
pub fn hex_round(frac: FractionalHex) -> HexCoord {
    let s = -frac.q - frac.r;

    let mut q = frac.q.round();
    let mut r = frac.r.round();
    let rs = s.round();

    let dq = (q - frac.q).abs();
    let dr = (r - frac.r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        q = -r - rs;
    } else if dr > ds {
        r = -q - rs;
    }

    HexCoord::new(q as i32, r as i32)
}

/// Шесть вершин гекса на плоскости мира, по часовой стрелке начиная с 30°
#[must_use]
pub fn hex_corners(coord: HexCoord, hex_size: f64) -> [WorldPoint; 6] {
    let center = hex_to_world(coord, hex_size);
    std::array::from_fn(|i| {
        let angle = (60.0 * i as f64 - 30.0).to_radians();
        WorldPoint {
            x: center.x + hex_size * angle.cos(),
            z: center.z + hex_size * angle.sin(),
        }
    })
}
