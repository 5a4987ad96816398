//! The four comparisons, as pure functions over a loaded table and an
//! already validated selection. Each returns a report whose `Display` impl is
//! the text shown to the user.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, warn};

use crate::config::{CatalogueConfig, Period, MPG_COMBINED, TANK_CAPACITY};
use crate::error::{CatalogueError, Result};
use crate::selection::Selection;
use crate::table::{CarRecord, Table, TableOperation, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct CommuteReport {
    pub model: String,
    pub distance_km: f64,
    pub tank_range_km: f64,
    pub days_per_refill: f64,
    pub annual_cost: f64,
}

impl CommuteReport {
    pub fn distance_over(&self, period: Period) -> f64 {
        self.distance_km * period.days()
    }
}

impl fmt::Display for CommuteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nYou commute in the {}:", self.model)?;
        writeln!(f, " {} km every day", self.distance_over(Period::Day))?;
        writeln!(f, " {} km every week", self.distance_over(Period::Week))?;
        writeln!(f, " {} km every month", self.distance_over(Period::Month))?;
        writeln!(f, " {} km every year", self.distance_over(Period::Year))?;
        writeln!(
            f,
            "\nYou will have to refill your tank every {:.2} km, which is every {:.2} days.",
            self.tank_range_km, self.days_per_refill
        )?;
        writeln!(
            f,
            "This means you will spend approximately ${:.2} a year on gas for commuting purposes.",
            self.annual_cost
        )
    }
}

fn required(record: &CarRecord<'_>, column: &str, value: Option<f64>) -> Result<f64> {
    value.ok_or_else(|| {
        warn!(row = record.row(), column, "vehicle has no usable value");
        CatalogueError::MissingValue {
            column: column.to_string(),
            row: record.row(),
        }
    })
}

pub fn commute_cost(
    table: &Table,
    vehicle: usize,
    distance_km: f64,
    config: &CatalogueConfig,
) -> Result<CommuteReport> {
    if vehicle >= table.row_count() {
        return Err(CatalogueError::invalid_input(
            vehicle.to_string(),
            "a vehicle index from the list",
        ));
    }
    if distance_km == 0.0 {
        return Err(CatalogueError::DivisionByZero);
    }
    let record = table.record(vehicle);
    let mpg = required(&record, MPG_COMBINED, record.mpg_combined())?;
    let tank = required(&record, TANK_CAPACITY, record.tank_capacity())?;

    let tank_range_km = mpg * tank * config.km_per_mile;
    let days_per_refill = tank_range_km / distance_km;
    if days_per_refill == 0.0 {
        return Err(CatalogueError::DivisionByZero);
    }
    let annual_cost =
        config.price_per_gallon * tank * (Period::Year.days() / days_per_refill);
    Ok(CommuteReport {
        model: record.model_name(),
        distance_km,
        tank_range_km,
        days_per_refill,
        annual_cost,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonEntry {
    pub model: String,
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonReport {
    pub entries: Vec<ComparisonEntry>,
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.entries {
            writeln!(f, "{}\n--- {}: {} ---\n", e.model, e.column, e.value)?;
        }
        Ok(())
    }
}

/// One entry per (column, row) pair, columns outermost.
pub fn compare(table: &Table, selection: &Selection) -> Result<ComparisonReport> {
    if selection.rows.is_empty() {
        return Err(CatalogueError::EmptySelection { what: "vehicles" });
    }
    if selection.columns.is_empty() {
        return Err(CatalogueError::EmptySelection { what: "columns" });
    }
    let mut entries = Vec::with_capacity(selection.rows.len() * selection.columns.len());
    for column in &selection.columns {
        for &row in &selection.rows {
            let record = table.record(row);
            entries.push(ComparisonEntry {
                model: record.model_name(),
                column: column.clone(),
                value: record.field(column)?.clone(),
            });
        }
    }
    Ok(ComparisonReport { entries })
}

/// CO2 grams over each [`Period`] for a fixed daily output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodTotals {
    pub daily_grams: f64,
}

impl PeriodTotals {
    pub fn grams(&self, period: Period) -> f64 {
        self.daily_grams * period.days()
    }

    pub fn short_tons(&self, period: Period, config: &CatalogueConfig) -> f64 {
        self.grams(period) / config.grams_per_short_ton
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehiclePollution {
    pub model: String,
    /// `None` when the catalogue has no emissions figure for the vehicle.
    pub totals: Option<PeriodTotals>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollutionReport {
    pub vehicles: Vec<VehiclePollution>,
    pub average: PeriodTotals,
    config: CatalogueConfig,
}

impl fmt::Display for PollutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cfg = &self.config;
        for v in &self.vehicles {
            let Some(t) = v.totals else {
                writeln!(f, "\n{} does not have emissions data.", v.model)?;
                continue;
            };
            writeln!(f, "\nPollution facts for {} in grams of CO2:", v.model)?;
            writeln!(f, "Daily: {}", t.grams(Period::Day))?;
            writeln!(f, "Weekly: {}", t.grams(Period::Week))?;
            writeln!(
                f,
                "Monthly: {} or {:.2} tons",
                t.grams(Period::Month),
                t.short_tons(Period::Month, cfg)
            )?;
            writeln!(
                f,
                "Annually: {} or {:.2} tons",
                t.grams(Period::Year),
                t.short_tons(Period::Year, cfg)
            )?;
        }
        writeln!(f, "\nAverage pollution facts in grams of CO2 for comparison:")?;
        for period in Period::ALL {
            writeln!(f, "{}: {}", period.label(), self.average.grams(period))?;
        }
        writeln!(
            f,
            "\nOn average, one acre of new forest can sequester about {} tons of carbon annually.",
            cfg.forest_sequestration_tons
        )
    }
}

pub fn pollution(
    table: &Table,
    selection: &Selection,
    distance_km: f64,
    config: &CatalogueConfig,
) -> Result<PollutionReport> {
    if selection.rows.is_empty() {
        return Err(CatalogueError::EmptySelection { what: "vehicles" });
    }
    let vehicles = selection
        .rows
        .iter()
        .map(|&row| {
            let record = table.record(row);
            let model = record.model_name();
            let totals = match record.co2_emissions() {
                Some(gkm) => Some(PeriodTotals {
                    daily_grams: distance_km * gkm,
                }),
                None => {
                    warn!(row, model = %model, "no emissions data, skipping");
                    None
                }
            };
            VehiclePollution { model, totals }
        })
        .collect();
    Ok(PollutionReport {
        vehicles,
        average: PeriodTotals {
            daily_grams: distance_km * config.average_emissions_gkm,
        },
        config: config.clone(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RaceEntry {
    pub rank: usize,
    pub row: usize,
    pub model: String,
    pub time_sec: Option<f64>,
    pub speed_mph: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RaceReport {
    pub entries: Vec<RaceEntry>,
}

fn fmt_optional(v: Option<f64>) -> String {
    v.map_or_else(|| Value::Missing.to_string(), |n| n.to_string())
}

impl fmt::Display for RaceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n --- RESULTS ARE IN ---\n")?;
        for e in &self.entries {
            writeln!(
                f,
                "{}: {} | 1/4 Mile Time: {} | 1/4 Mile Top Speed: {}",
                e.rank,
                e.model,
                fmt_optional(e.time_sec),
                fmt_optional(e.speed_mph)
            )?;
        }
        Ok(())
    }
}

/// Ascending by quarter-mile time. Ties keep selection order and untimed
/// vehicles finish last.
pub fn race(table: &Table, selection: &Selection) -> Result<RaceReport> {
    if selection.rows.is_empty() {
        return Err(CatalogueError::EmptySelection { what: "vehicles" });
    }
    let mut field: Vec<_> = selection.rows.iter().map(|&r| table.record(r)).collect();
    field.sort_by(|a, b| match (a.quarter_mile_time(), b.quarter_mile_time()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    let entries: Vec<RaceEntry> = field
        .iter()
        .enumerate()
        .map(|(i, car)| RaceEntry {
            rank: i + 1,
            row: car.row(),
            model: car.model_name(),
            time_sec: car.quarter_mile_time(),
            speed_mph: car.quarter_mile_speed(),
        })
        .collect();
    debug!(finishers = entries.len(), "race ranked");
    Ok(RaceReport { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CO2_EMISSIONS, MODEL_NAME, QUARTER_MILE_TIME};
    use crate::table::sample_table;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_commute_cost() {
        let t = sample_table();
        let cfg = CatalogueConfig::default();
        let r = commute_cost(&t, 0, 10.0, &cfg).unwrap();
        assert!(close(r.tank_range_km, 579.3624, 1e-6), "Tank range is wrong!");
        assert!(close(r.days_per_refill, 57.93624, 1e-6));
        // 2.73 * 12 * 365 / 57.93624
        assert!(close(r.annual_cost, 206.389, 1e-3), "cost was {}", r.annual_cost);
        assert_eq!(r.distance_over(Period::Year), 3650.0);
        let text = r.to_string();
        assert!(text.contains("every 579.36 km, which is every 57.94 days"));
        assert!(text.contains("$206.39"));
    }

    #[test]
    fn test_commute_cost_zero_distance() {
        let t = sample_table();
        let err = commute_cost(&t, 0, 0.0, &CatalogueConfig::default()).unwrap_err();
        assert!(matches!(err, CatalogueError::DivisionByZero), "Zero distance accepted!");
    }

    #[test]
    fn test_commute_cost_empty_tank() {
        let mut t = sample_table();
        t.data.get_mut(TANK_CAPACITY).unwrap()[0] = Value::Number(0.0);
        let err = commute_cost(&t, 0, 10.0, &CatalogueConfig::default()).unwrap_err();
        assert!(matches!(err, CatalogueError::DivisionByZero));
        t.data.get_mut(TANK_CAPACITY).unwrap()[0] = Value::Missing;
        let err = commute_cost(&t, 0, 10.0, &CatalogueConfig::default()).unwrap_err();
        assert!(matches!(err, CatalogueError::MissingValue { row: 0, .. }));
    }

    #[test]
    fn test_commute_cost_bad_vehicle() {
        let t = sample_table();
        let err = commute_cost(&t, 3, 10.0, &CatalogueConfig::default()).unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidInput { token, .. } if token == "3"));
    }

    #[test]
    fn test_compare_order() {
        let t = sample_table();
        let sel = Selection {
            rows: vec![1, 0],
            columns: vec![QUARTER_MILE_TIME.to_string(), CO2_EMISSIONS.to_string()],
        };
        let report = compare(&t, &sel).unwrap();
        let pairs: Vec<(&str, &str)> = report
            .entries
            .iter()
            .map(|e| (e.column.as_str(), e.model.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (QUARTER_MILE_TIME, "Mustang"),
                (QUARTER_MILE_TIME, "Civic"),
                (CO2_EMISSIONS, "Mustang"),
                (CO2_EMISSIONS, "Civic"),
            ],
            "Entries not in columns-outer order!"
        );
        assert_eq!(report.entries[0].value, Value::Number(12.8));
    }

    #[test]
    fn test_compare_missing_value() {
        let t = sample_table();
        let sel = Selection {
            rows: vec![2],
            columns: vec![CO2_EMISSIONS.to_string(), MODEL_NAME.to_string()],
        };
        let report = compare(&t, &sel).unwrap();
        assert!(report.entries[0].value.is_missing());
        assert!(report.to_string().contains("--- CO2 Emissions gkm: N/A ---"));
    }

    #[test]
    fn test_compare_requires_selection() {
        let t = sample_table();
        let no_cols = Selection::with_rows(vec![0]);
        assert!(matches!(
            compare(&t, &no_cols),
            Err(CatalogueError::EmptySelection { what: "columns" })
        ));
        assert!(compare(&t, &Selection::new()).is_err());
    }

    #[test]
    fn test_pollution_totals() {
        let t = sample_table();
        let cfg = CatalogueConfig::default();
        let report = pollution(&t, &Selection::with_rows(vec![0]), 20.0, &cfg).unwrap();
        let totals = report.vehicles[0].totals.unwrap();
        assert_eq!(totals.grams(Period::Day), 3000.0);
        assert_eq!(totals.grams(Period::Week), 21000.0);
        assert_eq!(totals.grams(Period::Month), 90000.0);
        assert_eq!(totals.grams(Period::Year), 1095000.0);
        assert!(close(totals.short_tons(Period::Month, &cfg), 0.0992, 1e-4));
        assert!(close(totals.short_tons(Period::Year, &cfg), 1.2070, 1e-4));
        assert_eq!(report.average.grams(Period::Day), 5020.0);
        let text = report.to_string();
        assert!(text.contains("Monthly: 90000 or 0.10 tons"), "{text}");
        assert!(text.contains("Annually: 1095000 or 1.21 tons"));
        assert!(text.contains("about 2.5 tons of carbon"));
    }

    #[test]
    fn test_pollution_no_data() {
        let t = sample_table();
        let cfg = CatalogueConfig::default();
        let report = pollution(&t, &Selection::with_rows(vec![2, 1]), 10.0, &cfg).unwrap();
        assert_eq!(report.vehicles[0].totals, None, "Leaf has no emissions!");
        assert!(report.vehicles[1].totals.is_some());
        let text = report.to_string();
        assert!(text.contains("Leaf does not have emissions data."));
        assert!(!text.contains("Pollution facts for Leaf"));
        assert!(text.contains("Pollution facts for Mustang"));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    // Same level ceiling as the subscriber installed in main.
    fn warnings_from(run: impl FnOnce()) -> String {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, run);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_missing_data_is_logged_at_warn() {
        let mut t = sample_table();
        t.data.get_mut(MPG_COMBINED).unwrap()[1] = Value::Missing;
        let cfg = CatalogueConfig::default();
        let logs = warnings_from(|| {
            pollution(&t, &Selection::with_rows(vec![2]), 10.0, &cfg).unwrap();
            assert!(commute_cost(&t, 1, 10.0, &cfg).is_err());
        });
        assert!(logs.contains("no emissions data"), "Missing emissions not logged: {logs}");
        assert!(logs.contains("no usable value"), "Missing MPG not logged: {logs}");
        assert!(logs.contains("WARN"));
    }

    #[test]
    fn test_commute_cost_missing_mpg() {
        let mut t = sample_table();
        t.data.get_mut(MPG_COMBINED).unwrap()[0] = Value::Text("unknown".into());
        let err = commute_cost(&t, 0, 10.0, &CatalogueConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CatalogueError::MissingValue { ref column, row: 0 } if column == MPG_COMBINED
        ));
    }

    #[test]
    fn test_race_order() {
        let t = sample_table();
        let report = race(&t, &Selection::with_rows(vec![0, 1, 2])).unwrap();
        let times: Vec<f64> = report.entries.iter().filter_map(|e| e.time_sec).collect();
        assert_eq!(times, vec![12.8, 13.5, 14.2], "Race not sorted ascending!");
        let ranks: Vec<usize> = report.entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(report
            .to_string()
            .contains("1: Mustang | 1/4 Mile Time: 12.8 | 1/4 Mile Top Speed: 114"));
    }

    #[test]
    fn test_race_ties_and_untimed() {
        let mut t = sample_table();
        {
            let times = t.data.get_mut(QUARTER_MILE_TIME).unwrap();
            times[0] = Value::Number(13.0);
            times[1] = Value::Missing;
            times[2] = Value::Number(13.0);
        }
        let report = race(&t, &Selection::with_rows(vec![2, 1, 0])).unwrap();
        let rows: Vec<usize> = report.entries.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![2, 0, 1], "Ties must keep selection order!");
    }
}
