//! Learning strategies (spec.md §4.E): policies choosing which queries to
//! submit to the lower-set learner. A small closed set, so callers typically
//! compose them as an explicit `Vec<Box<dyn Strategy>>` chain rather than via
//! runtime registration.

mod gainanov_sat;
mod level;
mod random_lower;

pub use gainanov_sat::{GainanovSat, Sense};
pub use level::LevelLearn;
pub use random_lower::RandomLower;

use crate::LowerSetLearner;
use boolsep_oracle::Oracle;

/// Common entry point so a driver can run a named chain without hardcoding
/// the concrete strategy type at each call site.
pub trait Strategy {
    fn run(&mut self, learner: &mut LowerSetLearner, oracle: &mut dyn Oracle);
}

/// Maps strategy names to constructors, populated explicitly by the caller
/// (spec.md §9: replace the source's decorator-based registration with an
/// explicit registry passed at construction, not a module-level side effect).
pub struct StrategyRegistry {
    entries: hashbrown::HashMap<&'static str, Box<dyn Fn() -> Box<dyn Strategy>>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        StrategyRegistry { entries: hashbrown::HashMap::new() }
    }

    pub fn register(&mut self, name: &'static str, make: impl Fn() -> Box<dyn Strategy> + 'static) {
        self.entries.insert(name, Box::new(make));
    }

    pub fn build(&self, name: &str) -> Option<Box<dyn Strategy>> {
        self.entries.get(name).map(|make| make())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
