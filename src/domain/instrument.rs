//! Instrument metadata and the caller-owned instrument registry.

use std::collections::BTreeMap;

/// Two-level classification used for capital allocation, e.g. ("Metals", "Precious").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Classification {
    pub sector: String,
    pub group: String,
}

impl Classification {
    pub fn new(sector: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            sector: sector.into(),
            group: group.into(),
        }
    }
}

/// Which of the two front contracts carries the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContractOffset {
    #[default]
    Near,
    Further,
}

impl ContractOffset {
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(ContractOffset::Near),
            1 => Some(ContractOffset::Further),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    pub symbol: String,
    pub classification: Classification,
    pub contract_offset: ContractOffset,
    pub multiplier: f64,
}

/// Active instruments keyed by symbol. Iteration order is by symbol.
#[derive(Debug, Clone, Default)]
pub struct InstrumentRegistry {
    instruments: BTreeMap<String, Instrument>,
}

impl InstrumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, instrument: Instrument) {
        self.instruments
            .insert(instrument.symbol.clone(), instrument);
    }

    pub fn remove(&mut self, symbol: &str) -> Option<Instrument> {
        self.instruments.remove(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.instruments.contains_key(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.values()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.instruments.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl FromIterator<Instrument> for InstrumentRegistry {
    fn from_iter<T: IntoIterator<Item = Instrument>>(iter: T) -> Self {
        let mut registry = InstrumentRegistry::new();
        iter.into_iter().for_each(|i| registry.add(i));
        registry
    }
}
