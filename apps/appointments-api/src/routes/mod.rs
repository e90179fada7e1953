mod appointments;
mod health;
mod specialties;

pub use appointments::*;
pub use health::*;
pub use specialties::*;
