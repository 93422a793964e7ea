pub mod biome;
pub mod climate;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod heightmap;
pub mod hex;
pub mod render;
pub mod rivers;
pub mod rng;
pub mod settlement;
pub mod tilemap;

pub use biome::Biome;
pub use config::{GenerationSettings, HexMapConfig};
pub use error::{ConfigError, Error, ParseHexKeyError};
pub use generator::{GeneratorState, HexMapGenerator, generate_tile_map};
pub use grid::HexBounds;
pub use hex::{
    FractionalHex, HexCoord, WorldPoint, hex_distance, hex_key, hex_neighbors, hex_round,
    hex_to_world, parse_hex_key, world_to_hex,
};
pub use tilemap::{HexTileData, HexTileMap};
