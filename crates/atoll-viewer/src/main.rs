//! Interactive viewer hosting a circle layer on a mercator map.
//!
//! The map itself is drawn on the CPU ([`softgl`] implements the layer-facing
//! GL contract, [`raster`] paints the backdrop) and the finished framebuffer
//! is blitted to the window through wgpu ([`gpu`]).

mod app;
mod gpu;
mod host;
mod map;
mod raster;
mod softgl;

use anyhow::Result;
use atoll_layer::logging::{LoggingConfig, init_logging};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  atoll viewer");
    println!("  drag pan · wheel zoom · +/- radius · [/] segments · c fill · x drop context · esc quit");
    println!();

    app::run()
}
