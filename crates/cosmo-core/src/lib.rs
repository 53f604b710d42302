//! Power spectrum to correlation function transforms.
//!
//! Data flow: spectrum (optionally distorted and projected onto multipoles)
//! → spherical Bessel transform per even multipole → correlation function
//! xi(r, mu) → Alcock–Paczynski rescaled multipole extraction.

pub mod correlation;
pub mod distortion;
pub mod extract;
pub mod kernel;
pub mod multipole;
pub mod sizing;
pub mod spectrum;
pub mod transform;

pub use correlation::{build_correlation_function, AnisotropicCorrelation, CorrelationFunction};
pub use distortion::{
    distortion_multipole_function, make_distortion_model, DistortionModel, DistortionMultipole,
};
pub use extract::{extract_multipole, ExtractedMultipole};
pub use kernel::kernel_weights;
pub use multipole::project_multipole;
pub use sizing::{size_transform, TransformSizing};
pub use spectrum::{make_spectrum, Spectrum, TabulatedSpectrum};
pub use transform::{
    spherical_bessel_transform, CorrelationMultipole, TransformPlan, TransformSpec,
};
