//! Candidate models and the static accuracy roster
//!
//! Candidates form a closed set. Upstream classifier names are mapped onto them
//! through a fixed lookup table; names outside the table are not candidates.

use msel_common::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One prediction source competing to be the active guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Candidate {
    Model1,
    Model2,
    Model3,
    Model4,
}

impl Candidate {
    /// Every candidate, in default configuration order
    pub const ALL: [Candidate; 4] = [
        Candidate::Model1,
        Candidate::Model2,
        Candidate::Model3,
        Candidate::Model4,
    ];

    /// Display name, also used as key in normalized records and config
    pub fn name(&self) -> &'static str {
        match self {
            Candidate::Model1 => "Model 1",
            Candidate::Model2 => "Model 2",
            Candidate::Model3 => "Model 3",
            Candidate::Model4 => "Model 4",
        }
    }

    /// Map an upstream classifier name onto a candidate
    ///
    /// Returns `None` for names outside the table; callers drop those.
    pub fn from_source_name(raw: &str) -> Option<Candidate> {
        match raw {
            "LogisticRegression" => Some(Candidate::Model1),
            "HoeffdingTree" => Some(Candidate::Model2),
            "NaiveBayes" => Some(Candidate::Model3),
            "BaggingClassifier" => Some(Candidate::Model4),
            _ => None,
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Candidate {
    type Err = Error;

    /// Accepts "Model 2", "model_2", "MODEL2" and similar spellings
    fn from_str(s: &str) -> Result<Self> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match compact.as_str() {
            "model1" => Ok(Candidate::Model1),
            "model2" => Ok(Candidate::Model2),
            "model3" => Ok(Candidate::Model3),
            "model4" => Ok(Candidate::Model4),
            _ => Err(Error::InvalidInput(format!("Unknown model: {}", s))),
        }
    }
}

/// Candidates with their static accuracy, in configuration order
///
/// Configuration order is the tie-break whenever two candidates share the
/// same accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    entries: Vec<(Candidate, f64)>,
}

impl Roster {
    /// Build a roster; accuracies are clamped into [0, 1]
    pub fn new(entries: Vec<(Candidate, f64)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::Config("Roster must contain at least one model".to_string()));
        }

        let mut seen = Vec::with_capacity(entries.len());
        let mut clamped = Vec::with_capacity(entries.len());
        for (candidate, accuracy) in entries {
            if seen.contains(&candidate) {
                return Err(Error::Config(format!("Model listed twice: {}", candidate)));
            }
            if !accuracy.is_finite() {
                return Err(Error::Config(format!(
                    "Accuracy for {} is not a number: {}",
                    candidate, accuracy
                )));
            }
            seen.push(candidate);
            clamped.push((candidate, accuracy.clamp(0.0, 1.0)));
        }

        Ok(Self { entries: clamped })
    }

    /// Same candidates and order, with some accuracies replaced
    pub fn with_accuracy_overrides(&self, overrides: &BTreeMap<Candidate, f64>) -> Result<Self> {
        let entries = self
            .entries
            .iter()
            .map(|(c, acc)| (*c, overrides.get(c).copied().unwrap_or(*acc)))
            .collect();
        Self::new(entries)
    }

    /// Candidates in configuration order
    pub fn candidates(&self) -> impl Iterator<Item = Candidate> + '_ {
        self.entries.iter().map(|(c, _)| *c)
    }

    pub fn contains(&self, candidate: Candidate) -> bool {
        self.entries.iter().any(|(c, _)| *c == candidate)
    }

    /// Static accuracy, `None` if the candidate is not on the roster
    pub fn accuracy(&self, candidate: Candidate) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| *c == candidate)
            .map(|(_, acc)| *acc)
    }

    /// Candidates by descending accuracy, equal accuracies in configuration order
    pub fn ranked(&self) -> Vec<Candidate> {
        let mut indexed: Vec<(usize, Candidate, f64)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (c, acc))| (i, *c, *acc))
            .collect();

        indexed.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
        indexed.into_iter().map(|(_, c, _)| c).collect()
    }

    /// Highest-accuracy candidate
    pub fn best(&self) -> Candidate {
        self.ranked()[0]
    }

    /// Second-highest-accuracy candidate (the best one for a single-model roster)
    pub fn second_ranked(&self) -> Candidate {
        let ranked = self.ranked();
        ranked.get(1).copied().unwrap_or(ranked[0])
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            entries: vec![
                (Candidate::Model1, 0.4928),
                (Candidate::Model2, 0.4932),
                (Candidate::Model3, 0.4926),
                (Candidate::Model4, 0.4974),
            ],
        }
    }
}
