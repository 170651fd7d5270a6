pub mod generate;
pub mod massing;
pub mod setback;
pub mod stack;

pub use generate::{generate, GenerateMassing, GenerationInput, GenerationOutput};
pub use massing::{ApplyStrategy, MassingResult, MassingStrategy};
pub use setback::SetbackProfile;
pub use stack::StackMasses;
