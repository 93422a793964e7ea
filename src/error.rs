//! Ошибки генератора
//!
//! - [`ConfigError`] — некорректная конфигурация, обнаруживается до начала генерации
//! - [`ParseHexKeyError`] — некорректный строковый ключ гекса (`"q,r"`)
//! - [`Error`] — общая ошибка для внешних поверхностей (файлы, CLI, экспорт)
//!
//! «Скучная» карта (нет рек, нет поселений, один биом) ошибкой не является.

use thiserror::Error;

/// Ошибка конфигурации карты
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be greater than zero, got {value}")]
    InvalidDimension { name: &'static str, value: u32 },

    #[error("{name} = {value} exceeds the maximum of {max}")]
    DimensionTooLarge {
        name: &'static str,
        value: u32,
        max: u32,
    },

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Ошибка разбора ключа гекса
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseHexKeyError {
    #[error("hex key `{0}` has no comma")]
    MissingComma(String),

    #[error("hex key `{0}` has more than two components")]
    TooManyParts(String),

    #[error("hex key `{key}` has a non-integer component `{component}`")]
    InvalidComponent { key: String, component: String },
}

/// Общая ошибка крейта
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("hex key error: {0}")]
    ParseHexKey(#[from] ParseHexKeyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
