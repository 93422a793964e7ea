use rand_chacha::ChaCha8Rng;

use crate::config::GenerationSettings;
use crate::heightmap::{FieldNoise, HexField, sample_noise};

/// Доля высоты в поле влажности: низины чуть влажнее возвышенностей
const ELEVATION_DRYING: f32 = 0.15;

/// Генерирует поле влажности
///
/// Шум берётся со своим сидом из того же потока `Fields`, сразу после
/// параметров высоты. К шуму подмешивается «иссушение» возвышенностей, затем
/// поле заново нормализуется в [0, 1].
pub fn generate_moisture(
    elevation: &HexField,
    rng: &mut ChaCha8Rng,
    settings: &GenerationSettings,
) -> HexField {
    let params = FieldNoise::draw(rng, settings.moisture_octaves, settings.noise_frequency);
    let mut field = sample_noise(elevation.bounds, &params);

    for (m, &h) in field.data.iter_mut().zip(&elevation.data) {
        let n = (*m + 1.0) * 0.5;
        *m = n * (1.0 - ELEVATION_DRYING) + (1.0 - h) * ELEVATION_DRYING;
    }
    field.normalize();

    log::debug!(
        "moisture field: {} tiles, seed {}",
        field.data.len(),
        params.seed
    );
    field
}
