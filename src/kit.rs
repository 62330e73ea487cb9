//! Kit description document
//!
//! Builds the `drumkit.xml` document Hydrogen reads when importing a kit:
//! kit metadata followed by one `<instrument>` per kit position, each with
//! its velocity layers.
//!
//! Every position from 1 to the highest instrument id is present. Positions
//! without samples get an empty placeholder named after the id.

use std::path::PathBuf;

use log::info;
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::{KitError, Result};
use crate::layers::InstrumentLayers;

/// Kit name used when none is entered
pub const DEFAULT_KIT_NAME: &str = "drumkit";

/// Root element of the description document
const ROOT_ELEMENT: &str = "drumkit_info";

/// Kit metadata supplied by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KitMetadata {
    pub name: String,
    pub author: String,
    pub info: String,
    pub license: String,
}

impl Default for KitMetadata {
    fn default() -> Self {
        Self {
            name: DEFAULT_KIT_NAME.to_string(),
            author: "default author".to_string(),
            info: "default info".to_string(),
            license: "default license".to_string(),
        }
    }
}

impl KitMetadata {
    /// Replace an empty name with the default kit name
    pub fn with_default_name(mut self) -> Self {
        if self.name.trim().is_empty() {
            self.name = DEFAULT_KIT_NAME.to_string();
        }
        self
    }

    /// Check that the name can be used as an archive folder and file name
    pub fn validate(&self) -> Result<()> {
        let name = self.name.as_str();
        if name.is_empty() || name == "." || name.contains(['/', '\\']) || name.contains("..") {
            return Err(KitError::InvalidKitName {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

/// Overview of a kit before it is packaged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitSummary {
    pub metadata: KitMetadata,
    pub path: PathBuf,
    pub instruments: usize,
    pub wav_files: usize,
    pub flac_files: usize,
}

impl KitSummary {
    pub fn log(&self) {
        info!("Kit info :");
        info!("Drumset name      : {}", self.metadata.name);
        info!("Author name       : {}", self.metadata.author);
        info!("Info              : {}", self.metadata.info);
        info!("License           : {}", self.metadata.license);
        info!("Drumkit Path      : {}", self.path.display());
        info!("Instruments found : {}", self.instruments);
        info!(".wav files found  : {}", self.wav_files);
        info!(".flac files found : {}", self.flac_files);
    }
}

/// Root of `drumkit.xml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitDescription {
    pub name: String,
    pub author: String,
    pub info: String,
    pub license: String,
    #[serde(rename = "instrumentList")]
    pub instrument_list: InstrumentList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentList {
    #[serde(rename = "instrument", default)]
    pub instruments: Vec<Instrument>,
}

/// One kit position. Performance parameters are fixed defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: u32,
    pub name: String,
    #[serde(rename = "isMuted")]
    pub is_muted: bool,
    #[serde(rename = "isLocked")]
    pub is_locked: bool,
    #[serde(rename = "pan_L")]
    pub pan_l: f64,
    #[serde(rename = "pan_R")]
    pub pan_r: f64,
    #[serde(rename = "randomPitchFactor")]
    pub random_pitch_factor: f64,
    pub gain: f64,
    #[serde(rename = "filterActive")]
    pub filter_active: bool,
    #[serde(rename = "filterCutoff")]
    pub filter_cutoff: f64,
    #[serde(rename = "filterResonance")]
    pub filter_resonance: f64,
    #[serde(rename = "Attack")]
    pub attack: f64,
    #[serde(rename = "Decay")]
    pub decay: f64,
    #[serde(rename = "Sustain")]
    pub sustain: f64,
    #[serde(rename = "Release")]
    pub release: f64,
    #[serde(rename = "muteGroup")]
    pub mute_group: i32,
    #[serde(rename = "layer", default)]
    pub layers: Vec<Layer>,
}

impl Instrument {
    /// Instrument with default performance parameters and no layers
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_muted: false,
            is_locked: false,
            pan_l: 1.0,
            pan_r: 1.0,
            random_pitch_factor: 0.0,
            gain: 1.0,
            filter_active: false,
            filter_cutoff: 1.0,
            filter_resonance: 0.0,
            attack: 0.0,
            decay: 0.0,
            sustain: 1.0,
            release: 1000.0,
            mute_group: -1,
            layers: Vec::new(),
        }
    }

    /// Placeholder for a kit position without samples
    pub fn placeholder(id: u32) -> Self {
        Self::new(id, id.to_string())
    }

    pub fn is_placeholder(&self) -> bool {
        self.layers.is_empty()
    }
}

/// One velocity layer of an instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub filename: String,
    pub min: f64,
    pub max: f64,
    pub gain: f64,
    pub pitch: f64,
}

impl Layer {
    pub fn new(filename: impl Into<String>, (min, max): (f64, f64)) -> Self {
        Self {
            filename: filename.into(),
            min,
            max,
            gain: 1.0,
            pitch: 0.0,
        }
    }
}

/// Round to two decimals, ties to even (`0.125` -> `0.12`)
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Velocity range of the `position`-th (1-based) of `count` layers.
///
/// The ranges of all layers split `[0, 1]` into equal contiguous parts,
/// rounded to two decimals with ties going to the even digit, so eight
/// layers produce `0.12` and `0.62` boundaries as Hydrogen kits expect.
pub fn velocity_range(position: usize, count: usize) -> (f64, f64) {
    let count = count.max(1) as f64;
    let position = position as f64;
    (round2((position - 1.0) / count), round2(position / count))
}

impl KitDescription {
    /// Build the description for a grouped set of samples.
    ///
    /// Instruments run from 1 to the highest id seen; each takes its name
    /// from its lowest layer, falling back to the id when that is empty.
    pub fn build(metadata: &KitMetadata, layers: &InstrumentLayers) -> Self {
        let counts = layers.layer_counts();
        let mut instruments = Vec::new();

        for id in 1..=layers.max_instrument_id() {
            let Some(records) = layers.layers(id) else {
                info!("add placeholder instrument {}", id);
                instruments.push(Instrument::placeholder(id));
                continue;
            };

            let display_name = records
                .first()
                .map(|record| record.display_name.as_str())
                .filter(|name| !name.is_empty())
                .map_or_else(|| id.to_string(), str::to_string);
            info!("add instrument {} : {}", id, display_name);

            let count = counts.get(&id).copied().unwrap_or(records.len());
            let mut instrument = Instrument::new(id, display_name);
            for (index, record) in records.iter().enumerate() {
                let range = velocity_range(index + 1, count);
                info!(
                    "    add layer {} ({}) velocity range : {} - {}",
                    index + 1,
                    record.filename,
                    range.0,
                    range.1
                );
                instrument.layers.push(Layer::new(record.filename.clone(), range));
            }
            instruments.push(instrument);
        }

        Self {
            name: metadata.name.clone(),
            author: metadata.author.clone(),
            info: metadata.info.clone(),
            license: metadata.license.clone(),
            instrument_list: InstrumentList { instruments },
        }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instrument_list.instruments
    }

    /// Every sample filename referenced by the document, in order
    pub fn sample_files(&self) -> impl Iterator<Item = &str> {
        self.instruments()
            .iter()
            .flat_map(|instrument| instrument.layers.iter())
            .map(|layer| layer.filename.as_str())
    }

    /// Serialize to indented XML
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::new();
        let mut serializer =
            Serializer::with_root(&mut xml, Some(ROOT_ELEMENT)).map_err(serialization_error)?;
        serializer.indent(' ', 4);
        self.serialize(serializer).map_err(serialization_error)?;
        xml.push('\n');
        Ok(xml)
    }

    /// Parse a previously written description
    pub fn from_xml(xml: &str) -> Result<Self> {
        quick_xml::de::from_str(xml).map_err(serialization_error)
    }
}

fn serialization_error(e: impl std::fmt::Display) -> KitError {
    KitError::Serialization {
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleRecord;
    use approx::assert_relative_eq;

    fn layers(names: &[&str]) -> InstrumentLayers {
        let records: Vec<SampleRecord> = names
            .iter()
            .map(|name| SampleRecord::parse(name).unwrap())
            .collect();
        InstrumentLayers::aggregate(&records)
    }

    fn metadata() -> KitMetadata {
        KitMetadata {
            name: "Test Kit".to_string(),
            author: "Tester".to_string(),
            info: "unit test".to_string(),
            license: "CC0".to_string(),
        }
    }

    #[test]
    fn test_velocity_ranges_partition_unit_interval() {
        for count in 1..=10 {
            let ranges: Vec<(f64, f64)> = (1..=count).map(|i| velocity_range(i, count)).collect();
            assert_relative_eq!(ranges[0].0, 0.0);
            assert_relative_eq!(ranges[count - 1].1, 1.0);
            for pair in ranges.windows(2) {
                assert_relative_eq!(pair[0].1, pair[1].0);
                assert!(pair[0].0 < pair[1].0);
            }
        }
    }

    #[test]
    fn test_velocity_range_rounding() {
        assert_eq!(velocity_range(1, 3), (0.0, 0.33));
        assert_eq!(velocity_range(2, 3), (0.33, 0.67));
        assert_eq!(velocity_range(3, 3), (0.67, 1.0));
    }

    #[test]
    fn test_velocity_range_ties_round_to_even() {
        assert_eq!(velocity_range(1, 8), (0.0, 0.12));
        assert_eq!(velocity_range(2, 8), (0.12, 0.25));
        assert_eq!(velocity_range(3, 8), (0.25, 0.38));
        assert_eq!(velocity_range(5, 8), (0.5, 0.62));
        assert_eq!(velocity_range(6, 8), (0.62, 0.75));
        assert_eq!(velocity_range(8, 8), (0.88, 1.0));
    }

    #[test]
    fn test_build_two_instruments() {
        let doc = KitDescription::build(
            &metadata(),
            &layers(&["1-1 Kick.wav", "1-2 Kick.wav", "2-1 Snare.wav"]),
        );

        assert_eq!(doc.instruments().len(), 2);
        let kick = &doc.instruments()[0];
        assert_eq!(kick.id, 1);
        assert_eq!(kick.name, "Kick");
        assert_eq!(kick.layers.len(), 2);
        assert_eq!((kick.layers[0].min, kick.layers[0].max), (0.0, 0.5));
        assert_eq!((kick.layers[1].min, kick.layers[1].max), (0.5, 1.0));

        let snare = &doc.instruments()[1];
        assert_eq!(snare.name, "Snare");
        assert_eq!((snare.layers[0].min, snare.layers[0].max), (0.0, 1.0));
        assert!(doc.instruments().iter().all(|i| !i.is_placeholder()));
    }

    #[test]
    fn test_build_inserts_placeholders() {
        let doc = KitDescription::build(&metadata(), &layers(&["1-1 Kick.wav", "3-1 Snare.wav"]));

        let ids: Vec<u32> = doc.instruments().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let placeholder = &doc.instruments()[1];
        assert_eq!(placeholder.name, "2");
        assert!(placeholder.is_placeholder());
    }

    #[test]
    fn test_build_name_falls_back_to_id() {
        let doc = KitDescription::build(&metadata(), &layers(&["1-1.wav"]));
        assert_eq!(doc.instruments()[0].name, "1");
        assert_eq!(doc.instruments()[0].layers.len(), 1);
    }

    #[test]
    fn test_build_layers_follow_layer_order() {
        let doc = KitDescription::build(
            &metadata(),
            &layers(&["1-2 Loud.wav", "1-0 Soft.wav", "1-1 Mid.wav"]),
        );
        let files: Vec<&str> = doc.sample_files().collect();
        assert_eq!(files, vec!["1-0 Soft.wav", "1-1 Mid.wav", "1-2 Loud.wav"]);
        assert_eq!(doc.instruments()[0].name, "Soft");
    }

    #[test]
    fn test_xml_output_shape() {
        let doc = KitDescription::build(&metadata(), &layers(&["1-1 Kick.wav", "3-1 Snare.wav"]));
        let xml = doc.to_xml().unwrap();

        assert!(xml.starts_with("<drumkit_info>"));
        assert!(xml.contains("<name>Test Kit</name>"));
        assert!(xml.contains("<instrumentList>"));
        assert!(xml.contains("<filename>1-1 Kick.wav</filename>"));
        assert!(xml.contains("<muteGroup>-1</muteGroup>"));
        assert_eq!(xml.matches("<instrument>").count(), 3);
        assert_eq!(xml.matches("<layer>").count(), 2);
    }

    #[test]
    fn test_xml_escapes_text() {
        let mut meta = metadata();
        meta.info = "kick & snare <live>".to_string();
        let doc = KitDescription::build(&meta, &layers(&["1-1 Kick.wav"]));
        let xml = doc.to_xml().unwrap();
        assert!(xml.contains("kick &amp; snare &lt;live&gt;"));
    }

    #[test]
    fn test_xml_parses_back() {
        let doc = KitDescription::build(
            &metadata(),
            &layers(&["1-1 Kick.wav", "1-2 Kick.wav", "4-1 Crash.flac"]),
        );
        let parsed = KitDescription::from_xml(&doc.to_xml().unwrap()).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_metadata_defaults_and_validation() {
        let meta = KitMetadata {
            name: "  ".to_string(),
            ..KitMetadata::default()
        }
        .with_default_name();
        assert_eq!(meta.name, DEFAULT_KIT_NAME);
        assert!(meta.validate().is_ok());

        for bad in ["../up", "a/b", "a\\b", "."] {
            let meta = KitMetadata {
                name: bad.to_string(),
                ..KitMetadata::default()
            };
            assert_eq!(meta.validate().unwrap_err().error_code(), "INVALID_KIT_NAME");
        }
    }
}
