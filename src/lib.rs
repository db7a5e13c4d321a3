#[allow(non_snake_case)]
pub mod Analytical;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Numerical;
#[allow(non_snake_case)]
pub mod Utils;
pub mod errors;
