use anyhow::Result;

#[derive(Debug, Clone, Copy)]
pub struct Global {
    pub json: bool,
}

pub trait Runnable {
    fn run(self, g: &Global) -> Result<()>;
}

pub mod calibrate;
mod common;
pub mod commits;
pub mod coupling;
pub mod hotspots;
pub mod legacy;

pub use calibrate::Calibrate;
pub use commits::Commits;
pub use coupling::Coupling;
pub use hotspots::Hotspots;
pub use legacy::Legacy;
