// #![deny(missing_docs)]

pub mod error;
pub use error::SeamError;

pub mod pixelbuffer;
pub use pixelbuffer::{PixelBuffer, Size};

pub mod energy;
pub use energy::{compute_energy, energy_to_image, DualGradient, EnergyFilter, FilterKind, Sobel};

pub mod seamfinder;
pub use seamfinder::{calc_dynamics, extract_seam, low_energy_path, Seam, SeamPoint};

pub mod seamcarver;
pub use seamcarver::{
    expand_image, expand_to_fit, remove_row, remove_rows, shrink_image, shrink_to_fit,
};
