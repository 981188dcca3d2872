use getset::{CopyGetters, Getters};
use rust_decimal::Decimal;

/// A single emission factor and the keywords it can be found by.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct EmissionFactorRecord {
    #[getset(get = "pub")]
    category: String,
    #[getset(get = "pub")]
    aliases: Vec<String>,
    /// kg CO2 per unit
    #[getset(get_copy = "pub")]
    factor: Decimal,
}

impl EmissionFactorRecord {
    pub fn new(category: impl Into<String>, factor: Decimal) -> EmissionFactorRecord {
        EmissionFactorRecord {
            category: category.into(),
            aliases: Vec::new(),
            factor,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> EmissionFactorRecord
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }
}
