// src/drivers/mod.rs
pub mod acquisition;
pub mod buffer;
pub mod error;
pub mod lsm303;
pub mod params;
pub mod plot;
pub mod queue;
pub mod raster;
pub mod source;

pub use acquisition::{Acquisition, SamplerReport};
pub use buffer::WindowBuffer;
pub use error::ScopeError;
pub use params::{AcquisitionSettings, ControlCommand, Mode, Range, Rate};
pub use plot::{GraticuleRenderer, PlotGeometry};
pub use queue::{ControlSender, SampleQueue};
pub use raster::{rasterize, save_png};
pub use source::{open_sensor, select_source};
