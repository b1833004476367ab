//! Configured dimension rank table used for tie-breaking.

use std::collections::HashMap;

/// Default rank order, highest priority first.
pub const DEFAULT_DIMENSION_ORDER: &[&str] = &[
    "Physical Health",
    "Mental Health",
    "Social Relationships",
    "Character & Virtue",
    "Meaning & Purpose",
    "Spirituality",
    "Material Stability",
    "Happiness & Life Satisfaction",
];

/// Rank given to dimensions absent from the table; sorts them last on ties.
pub const UNRANKED: u32 = 100;

/// Static rank table: lower rank means higher priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionRanks {
    order: Vec<String>,
    ranks: HashMap<String, u32>,
    unranked: u32,
}

impl DimensionRanks {
    /// Builds a table from names in priority order.
    ///
    /// Repeated names keep their first position.
    pub fn from_order<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut ranks = HashMap::new();
        for name in order {
            let name = name.into();
            if ranks.contains_key(&name) {
                continue;
            }
            ranks.insert(name.clone(), names.len() as u32);
            names.push(name);
        }
        Self {
            order: names,
            ranks,
            unranked: UNRANKED,
        }
    }

    /// Overrides the sentinel rank for unlisted dimensions.
    pub fn with_unranked(mut self, rank: u32) -> Self {
        self.unranked = rank;
        self
    }

    pub fn rank_of(&self, dimension: &str) -> u32 {
        self.ranks.get(dimension).copied().unwrap_or(self.unranked)
    }

    pub fn contains(&self, dimension: &str) -> bool {
        self.ranks.contains_key(dimension)
    }

    /// Ranked names in priority order.
    pub fn names(&self) -> &[String] {
        &self.order
    }
}

impl Default for DimensionRanks {
    fn default() -> Self {
        Self::from_order(DEFAULT_DIMENSION_ORDER.iter().copied())
    }
}
