//! JSON task files: model kind, parameters, grids and quadrature knobs in one document.
//!
//! ```json
//! {
//!   "name": "bubble",
//!   "model": "Laplace3D",
//!   "parameters": { "dg": 1.0, "dl": 4.0, "r0": 1.0, "henry": 1.0, "c0": 1.0 },
//!   "gas_radii": [0.25, 0.5, 0.75],
//!   "liquid_radii": { "start": 1.0, "end": 3.0, "n": 5 },
//!   "times": [0.5, 1.2],
//!   "x_max": 1000.0
//! }
//! ```
//! `quadrature`, `policy` and `x_max` are optional; the planar model reads `planar`
//! instead of `parameters`.
use crate::Analytical::field::ConcentrationField;
use crate::Analytical::laplace_3d::LaplaceModel3D;
use crate::Analytical::models::{
    EvaluationPolicy, HenryModel, ModelKind, PlanarParameters, ProblemParameters,
};
use crate::Analytical::planar_1d::PlanarModel1D;
use crate::Analytical::series_2d::SeriesModel2D;
use crate::Analytical::batch::evaluate_field;
use crate::Numerical::quadrature::QuadratureSettings;
use crate::errors::{HenryError, Phase};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// `n` equally spaced points from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Grid axis given either as explicit points or as a linspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridSpec {
    Points(Vec<f64>),
    Linspace { start: f64, end: f64, n: usize },
}

impl GridSpec {
    pub fn points(&self) -> Vec<f64> {
        match self {
            GridSpec::Points(points) => points.clone(),
            GridSpec::Linspace { start, end, n } => linspace(*start, *end, *n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub model: ModelKind,
    #[serde(default)]
    pub parameters: Option<ProblemParameters>,
    #[serde(default)]
    pub planar: Option<PlanarParameters>,
    #[serde(default)]
    pub gas_radii: Option<GridSpec>,
    #[serde(default)]
    pub liquid_radii: Option<GridSpec>,
    pub times: GridSpec,
    #[serde(default)]
    pub quadrature: Option<QuadratureSettings>,
    #[serde(default)]
    pub policy: EvaluationPolicy,
    #[serde(default)]
    pub x_max: Option<f64>,
}

/// Fields computed for one task
#[derive(Debug)]
pub struct TaskOutput {
    pub gas: Option<ConcentrationField>,
    pub liquid: Option<ConcentrationField>,
}

impl FromStr for TaskConfig {
    type Err = HenryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: TaskConfig = serde_json::from_str(s).map_err(|e| {
            error!(
                "error parsing task at line {}, column {}: {}",
                e.line(),
                e.column(),
                e
            );
            HenryError::Serde(e)
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl TaskConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HenryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            error!("failed to open task file '{}': {}", path.display(), e);
            HenryError::Io(e)
        })?;
        let config: TaskConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        info!("task loaded from '{}'", path.display());
        Ok(config)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), HenryError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!("task written to '{}'", path.as_ref().display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), HenryError> {
        match self.model {
            ModelKind::Planar1D => match &self.planar {
                Some(p) => p.validate()?,
                None => {
                    return Err(HenryError::Config(
                        "model Planar1D needs a \"planar\" parameter block".to_string(),
                    ));
                }
            },
            ModelKind::Series2D | ModelKind::Laplace3D => match &self.parameters {
                Some(p) => p.validate()?,
                None => {
                    return Err(HenryError::Config(format!(
                        "model {:?} needs a \"parameters\" block",
                        self.model
                    )));
                }
            },
        }
        if self.gas_radii.is_none() && self.liquid_radii.is_none() {
            return Err(HenryError::Config(
                "at least one of gas_radii, liquid_radii is required".to_string(),
            ));
        }
        if self.times.points().is_empty() {
            return Err(HenryError::Config("time grid is empty".to_string()));
        }
        if let Some(settings) = &self.quadrature {
            settings.validate()?;
        }
        if let Some(x_max) = self.x_max {
            if self.model != ModelKind::Laplace3D {
                return Err(HenryError::Config(
                    "x_max applies to the Laplace3D model only".to_string(),
                ));
            }
            crate::errors::ensure_positive("x_max", x_max)?;
        }
        Ok(())
    }

    pub fn build_model(&self) -> Result<HenryModel, HenryError> {
        let missing = || HenryError::Config(format!("no parameters for {:?}", self.model));
        let model: HenryModel = match self.model {
            ModelKind::Planar1D => {
                PlanarModel1D::new(self.planar.ok_or_else(missing)?)?.into()
            }
            ModelKind::Series2D => {
                let mut model = SeriesModel2D::new(self.parameters.ok_or_else(missing)?)?
                    .with_policy(self.policy);
                if let Some(settings) = &self.quadrature {
                    model = model.with_quadrature(settings.clone());
                }
                model.into()
            }
            ModelKind::Laplace3D => {
                let mut model = LaplaceModel3D::new(self.parameters.ok_or_else(missing)?)?
                    .with_policy(self.policy);
                if let Some(settings) = &self.quadrature {
                    model = model.with_quadrature(settings.clone());
                }
                if let Some(x_max) = self.x_max {
                    model = model.with_x_max(x_max)?;
                }
                model.into()
            }
        };
        Ok(model)
    }

    /// Builds the model and evaluates every requested grid.
    pub fn run(&self) -> Result<TaskOutput, HenryError> {
        let model = self.build_model()?;
        let times = self.times.points();
        info!(
            "running task {} with {:?}, {} times",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.model,
            times.len()
        );
        let gas = self
            .gas_radii
            .as_ref()
            .map(|grid| evaluate_field(&model, Phase::Gas, &grid.points(), &times));
        let liquid = self
            .liquid_radii
            .as_ref()
            .map(|grid| evaluate_field(&model, Phase::Liquid, &grid.points(), &times));
        Ok(TaskOutput { gas, liquid })
    }
}
