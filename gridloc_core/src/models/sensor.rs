// gridloc_core/src/models/sensor.rs

use rand::Rng;

use crate::types::{Color, Observation};

/// Default probability that a reading reports the true floor color.
pub const DEFAULT_ACCURACY: f64 = 0.88;

/// The floor-color sensor: reads the right color most of the time, otherwise one
/// of the other three colors with equal probability.
///
/// The model never owns a random source. Callers that simulate readings pass in
/// their own generator so runs can be reproduced from a seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorModel {
    accuracy: f64,
}

impl Default for SensorModel {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ACCURACY,
        }
    }
}

impl SensorModel {
    /// A sensor that is right with probability `accuracy`. Values outside
    /// `[0, 1]` are clamped; NaN falls back to [`DEFAULT_ACCURACY`].
    pub fn new(accuracy: f64) -> Self {
        if accuracy.is_nan() {
            return Self::default();
        }
        Self {
            accuracy: accuracy.clamp(0.0, 1.0),
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Probability of each individual wrong color.
    pub fn error_rate(&self) -> f64 {
        (1.0 - self.accuracy) / (Color::ALL.len() - 1) as f64
    }

    /// `P(observed | true_color)`.
    pub fn likelihood(&self, observed: Observation, true_color: Color) -> f64 {
        if observed == true_color {
            self.accuracy
        } else {
            self.error_rate()
        }
    }

    /// Draws a noisy reading for a robot standing on `true_color`.
    pub fn sense<R: Rng + ?Sized>(&self, true_color: Color, rng: &mut R) -> Observation {
        if rng.gen_bool(self.accuracy) {
            return true_color;
        }

        let wrong: Vec<Color> = Color::ALL
            .into_iter()
            .filter(|&color| color != true_color)
            .collect();
        wrong[rng.gen_range(0..wrong.len())]
    }
}
