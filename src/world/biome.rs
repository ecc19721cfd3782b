//! Biome identifiers, noise bands, and the power ranking used at borders.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// String identifier of a biome (e.g. "forest"), as keyed in the biome table.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomeId(String);

impl BiomeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BiomeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BiomeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One slice of the normalized noise range.
///
/// A value `v` falls in the first band (in list order) with `v < upper`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeBand {
    pub upper: f64,
    pub biome: BiomeId,
}

impl BiomeBand {
    pub fn new(upper: f64, biome: &str) -> Self {
        Self { upper, biome: BiomeId::from(biome) }
    }
}

/// Reference six-way partition, ascending noise value:
/// desert < plains < forest < mountains < tundra < cave.
pub fn default_bands() -> Vec<BiomeBand> {
    vec![
        BiomeBand::new(0.36, "desert"),
        BiomeBand::new(0.46, "plains"),
        BiomeBand::new(0.55, "forest"),
        BiomeBand::new(0.63, "mountains"),
        BiomeBand::new(0.71, "tundra"),
        BiomeBand::new(1.0, "cave"),
    ]
}

/// Pick the band for a normalized noise value. The last band catches
/// everything above its predecessors (and NaN).
pub fn band_for(bands: &[BiomeBand], value: f64) -> Option<&BiomeId> {
    bands
        .iter()
        .find(|band| value < band.upper)
        .or_else(|| bands.last())
        .map(|band| &band.biome)
}

/// Static ranking of biomes. Stronger biomes win contested borders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomePowerTable(BTreeMap<BiomeId, u32>);

impl BiomePowerTable {
    pub fn new(entries: impl IntoIterator<Item = (BiomeId, u32)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Power of a biome; unknown biomes rank 0.
    pub fn power(&self, biome: &BiomeId) -> u32 {
        self.0.get(biome).copied().unwrap_or(0)
    }

    pub fn set(&mut self, biome: BiomeId, power: u32) {
        self.0.insert(biome, power);
    }
}

impl Default for BiomePowerTable {
    fn default() -> Self {
        Self::new([
            (BiomeId::from("mountains"), 6),
            (BiomeId::from("tundra"), 5),
            (BiomeId::from("forest"), 4),
            (BiomeId::from("desert"), 3),
            (BiomeId::from("cave"), 2),
            (BiomeId::from("plains"), 1),
        ])
    }
}

/// Visual variant of a biome tile. The renderer maps these to sprite sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomeVariant {
    Plain,
    Sparse,
    Dense,
    Weathered,
}

impl BiomeVariant {
    pub const ALL: [BiomeVariant; 4] = [
        BiomeVariant::Plain,
        BiomeVariant::Sparse,
        BiomeVariant::Dense,
        BiomeVariant::Weathered,
    ];

    pub fn from_index(index: u32) -> Self {
        Self::ALL[index as usize % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_order() {
        let bands = default_bands();
        let expected = ["desert", "plains", "forest", "mountains", "tundra", "cave"];
        let ids: Vec<&str> = bands.iter().map(|b| b.biome.as_str()).collect();
        assert_eq!(ids, expected);
        assert!(bands.windows(2).all(|w| w[0].upper < w[1].upper));
    }

    #[test]
    fn test_band_for() {
        let bands = default_bands();
        assert_eq!(band_for(&bands, 0.0).unwrap().as_str(), "desert");
        assert_eq!(band_for(&bands, 0.36).unwrap().as_str(), "plains");
        assert_eq!(band_for(&bands, 0.5).unwrap().as_str(), "forest");
        assert_eq!(band_for(&bands, 0.99).unwrap().as_str(), "cave");
        assert_eq!(band_for(&bands, f64::NAN).unwrap().as_str(), "cave");
        assert!(band_for(&[], 0.5).is_none());
    }

    #[test]
    fn test_power_table() {
        let table = BiomePowerTable::default();
        assert!(table.power(&"mountains".into()) > table.power(&"plains".into()));
        assert_eq!(table.power(&"swamp".into()), 0);
    }

    #[test]
    fn test_biome_id_serde_transparent() {
        let id = BiomeId::from("forest");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"forest\"");
        let table: BiomePowerTable = serde_json::from_str(r#"{"forest": 9}"#).unwrap();
        assert_eq!(table.power(&id), 9);
    }

    #[test]
    fn test_variant_from_index_wraps() {
        assert_eq!(BiomeVariant::from_index(0), BiomeVariant::Plain);
        assert_eq!(BiomeVariant::from_index(5), BiomeVariant::Sparse);
    }
}
