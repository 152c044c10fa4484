//! Data model for candidate regions and the annotated genes inside them.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One annotated gene/protein match within an [`Operon`].
///
/// `interval` endpoints are not guaranteed to be ordered; a start greater
/// than its end encodes a reverse-strand hit. Coordinates are base pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub interval: (u64, u64),
    pub locus_tag: String,
    pub rank: u32,
    pub sequence: String,
    pub e_value: f64,
    pub description: String,
    pub translation: String,
}

impl Feature {
    pub fn new(
        name: &str,
        interval: (u64, u64),
        locus_tag: &str,
        rank: u32,
        sequence: &str,
        e_value: f64,
        description: &str,
        translation: &str,
    ) -> Self {
        Feature {
            name: name.to_owned(),
            interval,
            locus_tag: locus_tag.to_owned(),
            rank,
            sequence: sequence.to_owned(),
            e_value,
            description: description.to_owned(),
            translation: translation.to_owned(),
        }
    }

    #[inline(always)]
    pub fn is_reverse(&self) -> bool {
        self.interval.0 > self.interval.1
    }
}

/// A candidate genomic region with the features found inside it.
///
/// `features` keeps the discovery order of the upstream pipeline, which is
/// not necessarily coordinate order. Feature intervals may straddle the
/// region boundaries; they are not clamped here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Operon {
    pub contig: String,
    pub start: u64,
    pub end: u64,
    pub features: Vec<Feature>,
}

impl Operon {
    pub fn new(contig: &str, start: u64, end: u64, features: Vec<Feature>) -> Self {
        Operon {
            contig: contig.to_owned(),
            start,
            end,
            features,
        }
    }

    pub fn features_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Feature> {
        self.features.iter().filter(move |feature| feature.name == name)
    }

    pub fn contains_gene(&self, name: &str) -> bool {
        self.features.iter().any(|feature| feature.name == name)
    }
}

/// Deserialize a JSON array of operons, as handed over by the search
/// pipeline. No file access happens here.
pub fn operons_from_json_str(json: &str) -> Result<Vec<Operon>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cas9() -> Feature {
        Feature::new(
            "cas9",
            (300, 120),
            "lcl|300|120|1|-1",
            0,
            "ATGACCA",
            2e-30,
            "type II CRISPR-associated protein",
            "MTT",
        )
    }

    #[test]
    fn test_reverse_strand_from_interval() {
        assert!(cas9().is_reverse());
        let mut forward = cas9();
        forward.interval = (120, 300);
        assert!(!forward.is_reverse());
    }

    #[test]
    fn test_feature_lookup() {
        let operon = Operon::new("NZ_CP01", 0, 5000, vec![cas9()]);
        assert!(operon.contains_gene("cas9"));
        assert!(!operon.contains_gene("cas3"));
        assert_eq!(operon.features_named("cas9").count(), 1);
        assert_eq!(operon.features_named("cas3").count(), 0);
    }

    #[test]
    fn test_operons_from_json_str() {
        let operon = Operon::new("NZ_CP01", 0, 5000, vec![cas9()]);
        let json = serde_json::to_string(&vec![operon.clone()]).unwrap();
        let parsed = operons_from_json_str(&json).unwrap();
        assert_eq!(parsed, vec![operon]);
    }

    #[test]
    fn test_operons_from_json_str_rejects_garbage() {
        assert!(operons_from_json_str("not json").is_err());
    }
}
