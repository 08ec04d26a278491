//! Leak-rate unit conversion to grams of methane per second.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Methane density at 15 °C and 1 atm, in grams per liter (= kg/m^3).
pub const METHANE_DENSITY_G_PER_L: f64 = 0.678;

const LITERS_PER_CUBIC_METER: f64 = 1000.0;
const LITERS_PER_CUBIC_FOOT: f64 = 28.316_846_592;
const GRAMS_PER_POUND: f64 = 453.592_37;

/// Converts a magnitude in `metric` per `increment` into grams per second.
pub trait UnitConverter {
    fn convert(&self, value: f64, metric: &str, increment: &str) -> Result<f64>;
}

/// Default converter for methane mass and volume rates.
#[derive(Debug, Clone, Copy)]
pub struct GasConverter {
    /// Density used for volumetric metrics, in g/L.
    pub density_g_per_l: f64,
}

impl Default for GasConverter {
    fn default() -> Self {
        Self {
            density_g_per_l: METHANE_DENSITY_G_PER_L,
        }
    }
}

impl GasConverter {
    fn grams_per(&self, metric: &str) -> Result<f64> {
        let grams = match metric.to_ascii_lowercase().as_str() {
            "gram" | "g" => 1.0,
            "kilogram" | "kg" => 1000.0,
            "pound" | "lb" => GRAMS_PER_POUND,
            "tonne" | "t" => 1.0e6,
            "liter" | "l" => self.density_g_per_l,
            "cubic_meter" | "m3" => LITERS_PER_CUBIC_METER * self.density_g_per_l,
            "cubic_feet" | "cubic_foot" | "scf" => LITERS_PER_CUBIC_FOOT * self.density_g_per_l,
            _ => {
                return Err(Error::UnknownUnit {
                    kind: "metric",
                    name: metric.to_string(),
                })
            }
        };
        Ok(grams)
    }

    fn seconds_per(increment: &str) -> Result<f64> {
        let seconds = match increment.to_ascii_lowercase().as_str() {
            "second" | "s" => 1.0,
            "minute" | "min" => 60.0,
            "hour" | "h" => 3600.0,
            "day" | "d" => 86_400.0,
            _ => {
                return Err(Error::UnknownUnit {
                    kind: "increment",
                    name: increment.to_string(),
                })
            }
        };
        Ok(seconds)
    }
}

impl UnitConverter for GasConverter {
    fn convert(&self, value: f64, metric: &str, increment: &str) -> Result<f64> {
        Ok(value * self.grams_per(metric)? / Self::seconds_per(increment)?)
    }
}

/// Source units of raw draws, as configured per subtype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConversion {
    pub metric: String,
    pub increment: String,
}

impl UnitConversion {
    pub fn new(metric: impl Into<String>, increment: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            increment: increment.into(),
        }
    }

    /// Whether raw draws get converted.
    ///
    /// Conversion runs only when the metric is not "gram" and the increment
    /// is not "second". A gram/hour pair is therefore left untouched.
    pub fn needs_conversion(&self) -> bool {
        !self.metric.eq_ignore_ascii_case("gram") && !self.increment.eq_ignore_ascii_case("second")
    }
}

impl From<(String, String)> for UnitConversion {
    fn from((metric, increment): (String, String)) -> Self {
        Self { metric, increment }
    }
}
