//! Console tables and file export of computed fields.
use crate::Analytical::batch::RadialProfile;
use crate::Analytical::field::ConcentrationField;
use crate::errors::{HenryError, Phase};
use log::info;
use prettytable::{Cell, Row, Table, row};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializable snapshot of a [`ConcentrationField`]; failed entries become `null`.
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub model: String,
    pub phase: Phase,
    pub unit: String,
    pub radii: Vec<f64>,
    pub times: Vec<f64>,
    pub values: Vec<Vec<Option<f64>>>,
    pub errors: Vec<Vec<Option<f64>>>,
    pub failures: Vec<String>,
    pub unconverged: usize,
    pub degenerate_samples: usize,
}

fn finite_or_none(x: f64) -> Option<f64> {
    if x.is_finite() { Some(x) } else { None }
}

impl FieldReport {
    pub fn from_field(field: &ConcentrationField) -> Self {
        let to_rows = |m: &nalgebra::DMatrix<f64>| -> Vec<Vec<Option<f64>>> {
            m.row_iter()
                .map(|row| row.iter().map(|&x| finite_or_none(x)).collect())
                .collect()
        };
        Self {
            model: field.model_name.clone(),
            phase: field.phase,
            unit: field.unit.clone(),
            radii: field.radii.clone(),
            times: field.times.clone(),
            values: to_rows(&field.values),
            errors: to_rows(&field.errors),
            failures: field
                .failures
                .iter()
                .map(|(i, j, e)| format!("t = {}, r = {}: {}", field.times[*i], field.radii[*j], e))
                .collect(),
            unconverged: field.unconverged,
            degenerate_samples: field.degenerate_samples,
        }
    }
}

/// Prints the field as a (time × radius) table.
pub fn pretty_print_field(field: &ConcentrationField) {
    println!(
        "\n__________{} concentration, {} [{}]__________",
        field.phase, field.model_name, field.unit
    );
    let mut table = Table::new();
    let mut header = vec![Cell::new("t \\ r")];
    header.extend(field.radii.iter().map(|r| Cell::new(&format!("{:.4}", r))));
    table.add_row(Row::new(header));
    for (i, t) in field.times.iter().enumerate() {
        let mut cells = vec![Cell::new(&format!("{:.4}", t))];
        cells.extend((0..field.radii.len()).map(|j| {
            let v = field.value(i, j);
            if v.is_finite() {
                Cell::new(&format!("{:.6e}", v))
            } else {
                Cell::new("failed")
            }
        }));
        table.add_row(Row::new(cells));
    }
    table.printstd();
    if !field.is_complete() || field.unconverged > 0 {
        println!(
            "{} failed, {} unconverged, max error estimate {:.2e}",
            field.failures.len(),
            field.unconverged,
            field.max_error()
        );
    }
}

/// Prints a radial profile, one line per point.
pub fn pretty_print_profile(profile: &RadialProfile) {
    println!("\n__________radial profile at t = {}__________", profile.t);
    let mut table = Table::new();
    table.add_row(row!["r", "phase", "c"]);
    for ((r, phase), c) in profile
        .radii
        .iter()
        .zip(profile.phases.iter())
        .zip(profile.values.iter())
    {
        table.add_row(row![format!("{:.4}", r), phase, format!("{:.6e}", c)]);
    }
    table.printstd();
}

pub fn field_to_json(field: &ConcentrationField) -> Result<String, HenryError> {
    Ok(serde_json::to_string_pretty(&FieldReport::from_field(field))?)
}

pub fn write_json<P: AsRef<Path>>(field: &ConcentrationField, path: P) -> Result<(), HenryError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, &FieldReport::from_field(field))?;
    writer.flush()?;
    info!("field written to '{}'", path.as_ref().display());
    Ok(())
}

/// Long format: one `t,r,phase,value,abs_error` line per grid entry, failed entries empty.
pub fn write_csv<P: AsRef<Path>>(field: &ConcentrationField, path: P) -> Result<(), HenryError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writeln!(writer, "# {}", field.model_name)?;
    writeln!(writer, "t,r,phase,value ({}),abs_error", field.unit)?;
    let fmt = |x: f64| {
        if x.is_finite() {
            format!("{:e}", x)
        } else {
            String::new()
        }
    };
    for (i, t) in field.times.iter().enumerate() {
        for (j, r) in field.radii.iter().enumerate() {
            writeln!(
                writer,
                "{},{},{},{},{}",
                t,
                r,
                field.phase,
                fmt(field.value(i, j)),
                fmt(field.error(i, j))
            )?;
        }
    }
    writer.flush()?;
    info!("field written to '{}'", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Analytical::batch::{evaluate_field, radial_profile};
    use crate::Analytical::models::PlanarParameters;
    use crate::Analytical::planar_1d::PlanarModel1D;
    use tempfile::NamedTempFile;

    fn field() -> ConcentrationField {
        let m =
            PlanarModel1D::new(PlanarParameters::new(1.0, 4.0, 2.0, 0.0, 1.0).unwrap()).unwrap();
        // -1 is outside the gas domain
        evaluate_field(&m, Phase::Gas, &[0.5, -1.0], &[0.1, 0.2])
    }

    #[test]
    fn test_report_marks_failures() {
        let report = FieldReport::from_field(&field());
        assert_eq!(report.values.len(), 2);
        assert!(report.values[0][0].is_some());
        assert!(report.values[1][1].is_none());
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.phase, Phase::Gas);
    }

    #[test]
    fn test_json_export() {
        let f = field();
        let json = field_to_json(&f).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["phase"], "Gas");
        assert!(parsed["values"][0][1].is_null());
        assert_eq!(parsed["radii"][0], 0.5);

        let file = NamedTempFile::new().unwrap();
        write_json(&f, file.path()).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, json);
    }

    #[test]
    fn test_csv_export() {
        let f = field();
        let file = NamedTempFile::new().unwrap();
        write_csv(&f, file.path()).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + 4);
        assert!(lines[1].starts_with("t,r,phase"));
        assert!(lines[2].starts_with("0.1,0.5,gas,"));
        assert!(lines[3].ends_with("gas,,"));
    }

    #[test]
    fn test_printing_does_not_panic() {
        let f = field();
        pretty_print_field(&f);
        let m =
            PlanarModel1D::new(PlanarParameters::new(1.0, 4.0, 2.0, 0.0, 1.0).unwrap()).unwrap();
        pretty_print_profile(&radial_profile(&m, 0.1, &[0.5], &[-0.5]));
    }
}
