//! Built-in settings. The tool takes no flags and reads no environment, so
//! everything tunable lives here.

pub const MODEL_NAME: &str = "Model Name";
pub const MPG_COMBINED: &str = "MPG Combined";
pub const TANK_CAPACITY: &str = "Tank Capacity (gal)";
pub const QUARTER_MILE_TIME: &str = "1/4 mile time (sec)";
pub const QUARTER_MILE_SPEED: &str = "1/4 mile speed (mph)";
pub const CO2_EMISSIONS: &str = "CO2 Emissions gkm";

/// Columns the comparisons read directly.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    MODEL_NAME,
    MPG_COMBINED,
    TANK_CAPACITY,
    QUARTER_MILE_TIME,
    QUARTER_MILE_SPEED,
    CO2_EMISSIONS,
];

/// Reporting periods, all expressed as a number of commuting days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Day, Period::Week, Period::Month, Period::Year];

    pub fn days(self) -> f64 {
        match self {
            Period::Day => 1.0,
            Period::Week => 7.0,
            Period::Month => 30.0,
            Period::Year => 365.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Day => "Daily",
            Period::Week => "Weekly",
            Period::Month => "Monthly",
            Period::Year => "Annually",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogueConfig {
    pub catalogue_path: String,
    /// Dollars per US gallon.
    pub price_per_gallon: f64,
    pub km_per_mile: f64,
    pub grams_per_short_ton: f64,
    /// CO2 grams per km of an average passenger vehicle.
    pub average_emissions_gkm: f64,
    /// Short tons of carbon one acre of new forest takes up per year.
    pub forest_sequestration_tons: f64,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            catalogue_path: "326.csv".to_string(),
            price_per_gallon: 2.73,
            km_per_mile: 1.60934,
            grams_per_short_ton: 907185.0,
            average_emissions_gkm: 251.0,
            forest_sequestration_tons: 2.5,
        }
    }
}
