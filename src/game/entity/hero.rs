use std::fmt;

use super::card::Effectful;

/// A hero sits beside each player for the whole match. Charging it once per turn builds
/// towards its charge effect, which runs through the same effect contract as card play
/// effects (`Effectful::on_play`).
pub struct HeroDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub required_charges: u32,
    pub effect: &'static dyn Effectful,
}

impl fmt::Debug for HeroDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeroDefinition")
            .field("name", &self.name)
            .field("required_charges", &self.required_charges)
            .finish()
    }
}
