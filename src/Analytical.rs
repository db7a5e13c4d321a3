//! # Analytical reference solutions for two-phase diffusion with Henry's-law partitioning
//!
//! A dissolved species leaves a gas region (bubble) of radius `R0` into a surrounding liquid.
//! At the interface the concentrations jump by Henry's constant, `c_l = He·c_g`, and the flux is
//! continuous. Three geometries are covered, all behind the [`models::ConcentrationModel`] trait:
//!
//! - [`planar_1d`]: two half-spaces, closed form with error functions;
//! - [`series_2d`]: circular interface, continuous eigenfunction expansion in Bessel functions
//!   evaluated by adaptive quadrature over a truncated frequency axis;
//! - [`laplace_3d`]: spherical bubble, Laplace-domain solution inverted numerically by folding
//!   the Bromwich contour onto the branch cut.
//!
//! Grids of (time, radius) points are evaluated by [`batch`] (in parallel with the `parallel`
//! feature) into a [`field::ConcentrationField`]; a failing point never aborts the grid.
//!
//! # Examples
//! ```rust, ignore
//! use HenryDiffusion::Analytical::models::{ConcentrationModel, ProblemParameters};
//! use HenryDiffusion::Analytical::laplace_3d::LaplaceModel3D;
//! let params = ProblemParameters::new(1.0, 4.0, 1.0, 1.0, 1.0)?;
//! let model = LaplaceModel3D::new(params)?;
//! let cg = model.gas_concentration(0.5, 1.2)?;
//! println!("{} (error estimate {:e})", cg.value, cg.abs_error);
//! ```
pub mod batch;
pub mod field;
pub mod laplace_3d;
mod laplace_3d_tests;
pub mod models;
pub mod planar_1d;
pub mod series_2d;
mod series_2d_tests;
