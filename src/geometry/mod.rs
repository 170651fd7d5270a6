pub mod kernel;
pub mod pline;
pub mod profile;
pub mod skeleton;

pub use profile::Profile;
pub use skeleton::{Segment, Skeleton};
