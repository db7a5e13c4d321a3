/// Runs of the three reference solutions with the parameter sets they are usually shown with:
/// 0 - planar erf solution, 1 - 2D eigenfunction series, 2 - 3D Laplace inversion,
/// 3 - a JSON task document
pub mod henry_examples;
