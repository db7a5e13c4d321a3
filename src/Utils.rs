/// printing and export of computed fields: prettytable, JSON, CSV
pub mod report;
/// JSON task documents bundling model, parameters and grids
pub mod task_loader;
