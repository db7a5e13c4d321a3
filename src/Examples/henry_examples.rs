use crate::Analytical::laplace_3d::LaplaceModel3D;
use crate::Analytical::models::{PlanarParameters, ProblemParameters};
use crate::Analytical::planar_1d::PlanarModel1D;
use crate::Analytical::series_2d::SeriesModel2D;
use crate::Utils::report::{pretty_print_field, pretty_print_profile};
use crate::Utils::task_loader::{TaskConfig, linspace};
use crate::errors::{HenryError, Phase};
use log::{info, warn};
use prettytable::{Table, row};

pub fn henry_examples(task: usize) -> Result<(), HenryError> {
    match task {
        0 => {
            // planar interface, k1 = 1, k2 = 4, He = 2, x0 = 0, t = 0.1
            let model = PlanarModel1D::new(PlanarParameters::new(1.0, 4.0, 2.0, 0.0, 1.0)?)?;
            let xs = linspace(-5.0, 5.0, 21);
            let (t1, t2) = model.profile(&xs, 0.1)?;
            let mut table = Table::new();
            table.add_row(row!["x", "T1 (x > x0)", "T2 (x <= x0)"]);
            for ((x, a), b) in xs.iter().zip(t1.iter()).zip(t2.iter()) {
                table.add_row(row![
                    format!("{:.2}", x),
                    format!("{:.6}", a),
                    format!("{:.6}", b)
                ]);
            }
            table.printstd();
        }
        1 => {
            // circular bubble R0 = 2: eigenfunction series on both sides of the interface
            let r0 = 2.0;
            let model = SeriesModel2D::new(ProblemParameters::new(1.0, 4.0, r0, 2.0, 1.0)?)?;
            let inside = linspace(1e-6, r0, 9);
            let outside = linspace(r0, 4.0 * r0, 9);
            let times = [0.01, 0.25, 0.5, 0.75, 1.0];
            let cg = model.compute_cg(&inside, &times);
            let cl = model.compute_cl(&outside, &times);
            pretty_print_field(&cg);
            pretty_print_field(&cl);
            for (i, t) in times.iter().enumerate() {
                let ratio = cl.value(i, 0) / cg.value(i, inside.len() - 1);
                info!("t = {}: c_l/c_g at the interface = {:.6}", t, ratio);
            }
        }
        2 => {
            // spherical bubble R0 = 1, α = 1, x_max = 1000
            let model = LaplaceModel3D::new(ProblemParameters::new(1.0, 4.0, 1.0, 1.0, 1.0)?)?;
            let times = linspace(0.01, 5.0, 12);
            // r/d0 = 0.25 and r/d0 = 0.75
            let cg = model.cg_series(0.5, &times);
            let cl = model.cl_series(1.5, &times);
            pretty_print_field(&cg);
            pretty_print_field(&cl);

            let inside = linspace(1e-3, 1.0, 6);
            let outside = linspace(1.0, 5.0, 9);
            let profile = model.radial_profile(1.2, &inside, &outside);
            pretty_print_profile(&profile);

            let check = model.check_truncation(Phase::Gas, 0.5, 1.2)?;
            if !check.is_converged(1e-6) {
                warn!(
                    "x_max = {} is too small at t = 1.2: relative change {:e}",
                    model.x_max(),
                    check.relative_change
                );
            }
        }
        3 => {
            // the same bubble driven by a task document
            let json = r#"{
                "name": "bubble at t = 1.2",
                "model": "Laplace3D",
                "parameters": { "dg": 1.0, "dl": 4.0, "r0": 1.0, "henry": 1.0, "c0": 1.0 },
                "gas_radii": { "start": 0.25, "end": 1.0, "n": 4 },
                "liquid_radii": { "start": 1.0, "end": 3.0, "n": 5 },
                "times": [0.5, 1.2],
                "policy": "Strict"
            }"#;
            let task: TaskConfig = json.parse()?;
            let output = task.run()?;
            for field in [output.gas, output.liquid].iter().flatten() {
                pretty_print_field(field);
            }
        }
        _ => {
            println!("no example with number {}", task);
        }
    }
    Ok(())
}
