//! Combat systems

pub mod damage;
pub mod weapon;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod damage_tests;
#[cfg(test)]
mod weapon_tests;

pub use damage::*;
pub use weapon::*;
