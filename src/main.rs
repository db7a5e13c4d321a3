use HenryDiffusion::Examples::henry_examples::henry_examples;
use log::{LevelFilter, error};
use simplelog::{Config, SimpleLogger};

pub fn main() {
    let _ = SimpleLogger::init(LevelFilter::Info, Config::default());
    // 0 - planar, 1 - 2D series, 2 - 3D Laplace inversion, 3 - task document
    let task: usize = 2;
    if let Err(e) = henry_examples(task) {
        error!("example {} failed: {}", task, e);
    }
}
