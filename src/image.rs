//! Image generation, transformation, and captioning clients.

pub mod imagine;
pub mod options;
pub mod prodia;
pub mod rembg;

pub use imagine::{ImagineClient, ImagineRequest};
pub use options::{ControlMode, Model, ProdiaModel, Ratio, Sampler, Style};
pub use prodia::ProdiaClient;
pub use rembg::RembgClient;
