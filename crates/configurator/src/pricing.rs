use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use pipe_types::{FinishColor, PipeConfiguration, StandardFinish};

use crate::error::SettingsError;

/// Price multiplier for each catalogue finish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinishMultipliers {
    pub gray: f64,
    pub white: f64,
    pub blue: f64,
    pub orange: f64,
    pub green: f64,
    pub red: f64,
    pub black: f64,
    pub yellow: f64,
}

impl FinishMultipliers {
    pub const STANDARD: Self = Self {
        gray: 1.0,
        white: 1.1,
        blue: 1.25,
        orange: 1.15,
        green: 1.25,
        red: 1.30,
        black: 1.10,
        yellow: 1.20,
    };

    pub fn get(&self, finish: StandardFinish) -> f64 {
        match finish {
            StandardFinish::Gray => self.gray,
            StandardFinish::White => self.white,
            StandardFinish::Blue => self.blue,
            StandardFinish::Orange => self.orange,
            StandardFinish::Green => self.green,
            StandardFinish::Red => self.red,
            StandardFinish::Black => self.black,
            StandardFinish::Yellow => self.yellow,
        }
    }
}

impl Default for FinishMultipliers {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Material and pricing constants.
///
/// Fields missing from a JSON document keep their standard values, so a
/// rules file only needs to list what it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRules {
    /// PVC density in g/cm³.
    pub density_g_per_cm3: f64,
    /// Price of raw material per kilogram, in Dh.
    pub price_per_kg: f64,
    /// Applied to any color that is not an exact catalogue hex value.
    pub custom_multiplier: f64,
    pub finishes: FinishMultipliers,
}

impl PricingRules {
    pub const STANDARD: Self = Self {
        density_g_per_cm3: 1.4,
        price_per_kg: 3.50,
        custom_multiplier: 1.5,
        finishes: FinishMultipliers::STANDARD,
    };

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let f = &self.finishes;
        let values = [
            ("density_g_per_cm3", self.density_g_per_cm3),
            ("price_per_kg", self.price_per_kg),
            ("custom_multiplier", self.custom_multiplier),
            ("finishes.gray", f.gray),
            ("finishes.white", f.white),
            ("finishes.blue", f.blue),
            ("finishes.orange", f.orange),
            ("finishes.green", f.green),
            ("finishes.red", f.red),
            ("finishes.black", f.black),
            ("finishes.yellow", f.yellow),
        ];
        for (name, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::NotPositive { name, value });
            }
        }
        Ok(())
    }

    /// Multiplier for a color: catalogue value on an exact match, custom otherwise.
    pub fn multiplier(&self, color: &FinishColor) -> f64 {
        match color.standard_finish() {
            Some(finish) => self.finishes.get(finish),
            None => self.custom_multiplier,
        }
    }

    /// Full price derivation for a configuration.
    pub fn quote(&self, config: &PipeConfiguration) -> PriceBreakdown {
        let multiplier = self.multiplier(&config.color);
        if !config.has_open_bore() {
            return PriceBreakdown::degenerate(multiplier);
        }

        let outer_radius = config.outer_radius();
        let inner_radius = config.inner_radius();
        let volume_mm3 = PI * config.length * (outer_radius.powi(2) - inner_radius.powi(2));
        let volume_cm3 = volume_mm3 / 1000.0;
        let mass_kg = volume_cm3 * self.density_g_per_cm3 / 1000.0;
        let base_price = mass_kg * self.price_per_kg;

        PriceBreakdown {
            volume_mm3,
            volume_cm3,
            mass_kg,
            base_price,
            multiplier,
            total: round_cents(base_price * multiplier),
        }
    }

    #[instrument(skip(self, config), fields(color = %config.color))]
    pub fn price(&self, config: &PipeConfiguration) -> f64 {
        let quote = self.quote(config);
        debug!(
            mass_kg = quote.mass_kg,
            multiplier = quote.multiplier,
            total = quote.total,
            "priced configuration"
        );
        quote.total
    }
}

impl Default for PricingRules {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Intermediate values of a price calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub volume_mm3: f64,
    pub volume_cm3: f64,
    pub mass_kg: f64,
    pub base_price: f64,
    pub multiplier: f64,
    /// Final price in Dh, rounded to cents.
    pub total: f64,
}

impl PriceBreakdown {
    fn degenerate(multiplier: f64) -> Self {
        Self {
            volume_mm3: 0.0,
            volume_cm3: 0.0,
            mass_kg: 0.0,
            base_price: 0.0,
            multiplier,
            total: 0.0,
        }
    }
}

/// Round to two decimals, halves toward positive infinity.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Price of a configuration under the standard rules.
pub fn price(config: &PipeConfiguration) -> f64 {
    PricingRules::STANDARD.price(config)
}

/// Color multiplier under the standard rules.
pub fn multiplier(color: &FinishColor) -> f64 {
    PricingRules::STANDARD.multiplier(color)
}
