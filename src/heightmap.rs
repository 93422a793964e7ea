use crate::config::GenerationSettings;
use crate::grid::HexBounds;
use crate::hex::{HexCoord, hex_to_world};
use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Скалярное поле над областью карты: по одному значению на гекс, от 0.0 до 1.0
///
/// Значения хранятся плотно, в каноническом порядке [`HexBounds::coords`].
#[derive(Debug, Clone, PartialEq)]
pub struct HexField {
    pub bounds: HexBounds,
    pub data: Vec<f32>,
}

impl HexField {
    pub fn new(bounds: HexBounds) -> Self {
        Self {
            bounds,
            data: vec![0.0; bounds.tile_count()],
        }
    }

    pub fn get(&self, coord: HexCoord) -> Option<f32> {
        self.bounds.index_of(coord).map(|i| self.data[i])
    }

    /// Записывает значение с ограничением в [0, 1]; гексы вне области игнорируются
    pub fn set(&mut self, coord: HexCoord, value: f32) {
        if let Some(i) = self.bounds.index_of(coord) {
            self.data[i] = value.clamp(0.0, 1.0);
        }
    }

    pub fn add_clamped(&mut self, coord: HexCoord, delta: f32) {
        if let Some(v) = self.get(coord) {
            self.set(coord, v + delta);
        }
    }

    /// Min-max нормализация в [0, 1]
    ///
    /// Плоское поле (все значения равны) становится равномерным 0.5.
    pub fn normalize(&mut self) {
        let min_v = self.data.iter().fold(f32::INFINITY, |a, &b| a.min(b));
        let max_v = self.data.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));

        if max_v - min_v > f32::EPSILON {
            for v in &mut self.data {
                *v = ((*v - min_v) / (max_v - min_v)).clamp(0.0, 1.0);
            }
        } else {
            log::warn!("flat field over {} tiles, using 0.5", self.data.len());
            self.data.fill(0.5);
        }
    }

    /// Значение квантиля `p` (0.0 — минимум, 1.0 — максимум)
    pub fn quantile(&self, p: f32) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mut sorted = self.data.clone();
        sorted.sort_by(f32::total_cmp);
        let idx = ((sorted.len() - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
        sorted[idx]
    }
}

/// Параметры одного шумового слоя, вытянутые из потока `Fields`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldNoise {
    pub seed: i32,
    pub offset_x: f32,
    pub offset_z: f32,
    pub octaves: i32,
    pub frequency: f32,
}

impl FieldNoise {
    /// Три выборки из потока: сид шума, затем смещение по x и по z
    pub fn draw(rng: &mut ChaCha8Rng, octaves: i32, frequency: f32) -> Self {
        Self {
            seed: rng.gen_range(i32::MIN..=i32::MAX),
            offset_x: rng.gen_range(-10_000.0..10_000.0),
            offset_z: rng.gen_range(-10_000.0..10_000.0),
            octaves,
            frequency,
        }
    }

    fn build(&self) -> FastNoiseLite {
        let mut noise = FastNoiseLite::new();
        noise.set_seed(Some(self.seed));
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_fractal_type(Some(FractalType::FBm));
        noise.set_fractal_octaves(Some(self.octaves));
        noise.set_frequency(Some(self.frequency));
        noise
    }
}

/// Сэмплирует когерентный шум в центре каждого гекса (размер гекса = 1)
///
/// Результат — сырые значения шума примерно в [-1, 1], без нормализации.
pub fn sample_noise(bounds: HexBounds, params: &FieldNoise) -> HexField {
    let noise = params.build();
    let coords = bounds.coords();

    let sample = |c: &HexCoord| {
        let p = hex_to_world(*c, 1.0);
        noise.get_noise_2d(p.x as f32 + params.offset_x, p.z as f32 + params.offset_z)
    };

    #[cfg(feature = "parallel")]
    let data: Vec<f32> = coords.par_iter().map(sample).collect();
    #[cfg(not(feature = "parallel"))]
    let data: Vec<f32> = coords.iter().map(sample).collect();

    HexField { bounds, data }
}

/// Генерирует поле высот
///
/// 1. Параметры шума берутся из потока `Fields` (3 выборки)
/// 2. FBm-шум OpenSimplex2 в центрах гексов
/// 3. Нормализация в [0, 1] и возведение в степень `elevation_power`
pub fn generate_elevation(
    bounds: HexBounds,
    rng: &mut ChaCha8Rng,
    settings: &GenerationSettings,
) -> HexField {
    let params = FieldNoise::draw(rng, settings.elevation_octaves, settings.noise_frequency);
    let mut field = sample_noise(bounds, &params);
    field.normalize();

    if (settings.elevation_power - 1.0).abs() > f32::EPSILON {
        for h in &mut field.data {
            *h = h.powf(settings.elevation_power).clamp(0.0, 1.0);
        }
    }

    log::debug!(
        "elevation field: {} tiles, seed {}, {} octaves",
        field.data.len(),
        params.seed,
        params.octaves
    );
    field
}
