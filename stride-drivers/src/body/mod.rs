//! Force-integrated bodies

pub mod damped;
pub mod planar;

pub use damped::DampedBody;
pub use planar::PlanarAgent;
