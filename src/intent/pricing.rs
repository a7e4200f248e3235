//! Fixed per-model price table and token accounting.

use super::ResolveError;

/// Rough heuristic: one token per four characters of text. Non-empty text
/// always counts for at least one token.
pub fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    if chars == 0 { 0 } else { (chars / 4).max(1) }
}

/// Cost per 1000 input and output tokens for one model.
#[derive(Clone, Copy, Debug)]
pub struct ModelRates {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

/// Per-model rates for the supported model set.
#[derive(Clone, Debug)]
pub struct PriceTable {
    rates: Vec<(&'static str, ModelRates)>,
}

impl PriceTable {
    pub fn builtin() -> Self {
        Self {
            rates: vec![
                (
                    "deepseek-ocr",
                    ModelRates {
                        input_per_1k: 0.0005,
                        output_per_1k: 0.0015,
                    },
                ),
                (
                    "llava",
                    ModelRates {
                        input_per_1k: 0.001,
                        output_per_1k: 0.002,
                    },
                ),
                (
                    "moondream",
                    ModelRates {
                        input_per_1k: 0.0002,
                        output_per_1k: 0.0008,
                    },
                ),
            ],
        }
    }

    pub fn models(&self) -> Vec<&'static str> {
        self.rates.iter().map(|(model, _)| *model).collect()
    }

    pub fn rates_for(&self, model: &str) -> Result<ModelRates, ResolveError> {
        self.rates
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, rates)| *rates)
            .ok_or_else(|| ResolveError::UnknownModel(model.to_string()))
    }

    /// Estimated cost for one interaction, rounded to four decimal places.
    pub fn estimate_cost(
        &self,
        model: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> Result<f64, ResolveError> {
        let rates = self.rates_for(model)?;
        let raw = f64::from(input_tokens) * rates.input_per_1k / 1000.0
            + f64::from(output_tokens) * rates.output_per_1k / 1000.0;
        Ok((raw * 10_000.0).round() / 10_000.0)
    }
}
