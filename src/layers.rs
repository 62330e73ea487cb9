//! Layer aggregation
//!
//! Groups parsed samples by instrument so the kit builder works on an
//! explicit instrument -> ordered layers mapping instead of scanning a flat
//! list for instrument boundaries.

use std::collections::BTreeMap;

use crate::sample::SampleRecord;

/// Number of layers found per instrument id
pub type InstrumentLayerCount = BTreeMap<u32, usize>;

/// Samples grouped by instrument id, each group ordered by layer id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentLayers {
    groups: BTreeMap<u32, Vec<SampleRecord>>,
}

impl InstrumentLayers {
    /// Group records by instrument.
    ///
    /// Records are sorted by instrument id, then layer id. The sort is
    /// stable, so records sharing an (instrument, layer) pair keep their
    /// input order.
    pub fn aggregate(records: &[SampleRecord]) -> Self {
        let mut sorted = records.to_vec();
        sorted.sort_by_key(|record| (record.instrument_id, record.layer_id));

        let mut groups: BTreeMap<u32, Vec<SampleRecord>> = BTreeMap::new();
        for record in sorted {
            groups.entry(record.instrument_id).or_default().push(record);
        }

        Self { groups }
    }

    /// Layer count per instrument
    pub fn layer_counts(&self) -> InstrumentLayerCount {
        self.groups
            .iter()
            .map(|(id, layers)| (*id, layers.len()))
            .collect()
    }

    /// Number of layers for one instrument, 0 if absent
    pub fn layer_count(&self, instrument_id: u32) -> usize {
        self.groups.get(&instrument_id).map_or(0, Vec::len)
    }

    /// Highest instrument id seen, 0 when empty
    pub fn max_instrument_id(&self) -> u32 {
        self.groups.keys().next_back().copied().unwrap_or(0)
    }

    /// Number of distinct instruments that have samples
    pub fn instrument_count(&self) -> usize {
        self.groups.len()
    }

    /// Layers of one instrument ordered by layer id
    pub fn layers(&self, instrument_id: u32) -> Option<&[SampleRecord]> {
        self.groups.get(&instrument_id).map(Vec::as_slice)
    }

    /// All records in (instrument, layer) order
    pub fn records(&self) -> impl Iterator<Item = &SampleRecord> {
        self.groups.values().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<SampleRecord> {
        names
            .iter()
            .map(|name| SampleRecord::parse(name).unwrap())
            .collect()
    }

    #[test]
    fn test_counts_layers_per_instrument() {
        let layers = InstrumentLayers::aggregate(&records(&[
            "1-1 Kick.wav",
            "1-2 Kick.wav",
            "2-1 Snare.wav",
        ]));

        let counts = layers.layer_counts();
        assert_eq!(counts.get(&1), Some(&2));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.len(), 2);
        assert_eq!(layers.max_instrument_id(), 2);
    }

    #[test]
    fn test_layers_ordered_by_layer_id() {
        let layers = InstrumentLayers::aggregate(&records(&[
            "1-3 Kick.wav",
            "2-1 Snare.wav",
            "1-1 Kick.wav",
            "1-2 Kick.wav",
        ]));

        let kick: Vec<u32> = layers
            .layers(1)
            .unwrap()
            .iter()
            .map(|r| r.layer_id)
            .collect();
        assert_eq!(kick, vec![1, 2, 3]);

        let order: Vec<&str> = layers.records().map(|r| r.filename.as_str()).collect();
        assert_eq!(
            order,
            vec!["1-1 Kick.wav", "1-2 Kick.wav", "1-3 Kick.wav", "2-1 Snare.wav"]
        );
    }

    #[test]
    fn test_gaps_in_instrument_ids() {
        let layers = InstrumentLayers::aggregate(&records(&["1-1 Kick.wav", "5-1 Ride.wav"]));
        assert_eq!(layers.max_instrument_id(), 5);
        assert_eq!(layers.instrument_count(), 2);
        assert_eq!(layers.layer_count(3), 0);
        assert!(layers.layers(3).is_none());
    }

    #[test]
    fn test_empty_input() {
        let layers = InstrumentLayers::aggregate(&[]);
        assert!(layers.is_empty());
        assert_eq!(layers.max_instrument_id(), 0);
        assert!(layers.layer_counts().is_empty());
    }
}
