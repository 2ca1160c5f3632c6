//! Agent configuration
//!
//! Read once at startup from a small key/value document:
//!
//! ```json
//! { "auto_switching": true, "manual_model": "Model 2", "accuracy": { "Model 4": 0.5 } }
//! ```
//!
//! JSON by default; TOML when the file name ends in `.toml`. A missing or
//! broken document never stops the agent: defaults are used and the problem
//! is recorded.

use crate::candidate::{Candidate, Roster};
use msel_common::{AgentEvent, EventLog, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Configuration document as written on disk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub auto_switching: Option<bool>,
    #[serde(default)]
    pub manual_model: Option<String>,
    /// Static accuracy overrides keyed by model name
    #[serde(default)]
    pub accuracy: BTreeMap<String, f64>,
}

impl ConfigDocument {
    /// Parse `content`, choosing the format from `path`'s extension
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Ok(toml::from_str(content)?)
        } else {
            Ok(serde_json::from_str(content)?)
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(path, &content)
    }
}

/// Resolved startup configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub auto_switching: bool,
    /// Initially active model; stays active forever in manual mode
    pub manual_model: Candidate,
    pub roster: Roster,
}

impl AgentConfig {
    /// Built-in defaults for `roster`: auto-switching on, second-ranked model active
    pub fn defaults(roster: Roster) -> Self {
        Self {
            auto_switching: true,
            manual_model: roster.second_ranked(),
            roster,
        }
    }

    /// Resolve a document against `base`
    ///
    /// Returns the configuration and a list of options that could not be
    /// used (each replaced by its default).
    pub fn from_document(document: &ConfigDocument, base: &Roster) -> (Self, Vec<String>) {
        let mut problems = Vec::new();

        let mut overrides = BTreeMap::new();
        for (name, accuracy) in &document.accuracy {
            match name.parse::<Candidate>() {
                Ok(candidate) => {
                    overrides.insert(candidate, *accuracy);
                }
                Err(_) => debug!("Ignoring accuracy for unknown model '{}'", name),
            }
        }

        let roster = match base.with_accuracy_overrides(&overrides) {
            Ok(roster) => roster,
            Err(e) => {
                problems.push(e.to_string());
                base.clone()
            }
        };

        let mut config = Self::defaults(roster);

        if let Some(auto) = document.auto_switching {
            config.auto_switching = auto;
        }

        if let Some(name) = &document.manual_model {
            match name.parse::<Candidate>() {
                Ok(candidate) if config.roster.contains(candidate) => {
                    config.manual_model = candidate;
                }
                Ok(candidate) => {
                    problems.push(format!("Model not on roster: {}", candidate));
                }
                Err(e) => problems.push(e.to_string()),
            }
        }

        (config, problems)
    }

    /// Load from `path`, falling back to defaults, and record the outcome
    pub fn load_or_default(path: &Path, base: &Roster, log: &EventLog) -> Self {
        let (config, problems) = match ConfigDocument::read(path) {
            Ok(document) => Self::from_document(&document, base),
            Err(e) => (
                Self::defaults(base.clone()),
                vec![format!("{}: {}", path.display(), e)],
            ),
        };

        let event = if problems.is_empty() {
            AgentEvent::ConfigLoaded {
                auto_switching: config.auto_switching,
                manual_model: config.manual_model.to_string(),
            }
        } else {
            AgentEvent::ConfigDefaulted {
                reason: problems.join("; "),
                auto_switching: config.auto_switching,
                manual_model: config.manual_model.to_string(),
            }
        };
        log.record(&event);

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn json(content: &str) -> ConfigDocument {
        ConfigDocument::parse(&PathBuf::from("config.json"), content).unwrap()
    }

    #[test]
    fn test_defaults_use_second_ranked_model() {
        let config = AgentConfig::defaults(Roster::default());
        assert!(config.auto_switching);
        assert_eq!(config.manual_model, Candidate::Model2);
    }

    #[test]
    fn test_document_options_applied() {
        let doc = json(r#"{"auto_switching": false, "manual_model": "Model 3"}"#);
        let (config, problems) = AgentConfig::from_document(&doc, &Roster::default());

        assert!(problems.is_empty());
        assert!(!config.auto_switching);
        assert_eq!(config.manual_model, Candidate::Model3);
    }

    #[test]
    fn test_empty_document_means_defaults() {
        let (config, problems) = AgentConfig::from_document(&json("{}"), &Roster::default());
        assert!(problems.is_empty());
        assert_eq!(config, AgentConfig::defaults(Roster::default()));
    }

    #[test]
    fn test_unknown_manual_model_falls_back() {
        let doc = json(r#"{"auto_switching": false, "manual_model": "Model 9"}"#);
        let (config, problems) = AgentConfig::from_document(&doc, &Roster::default());

        assert_eq!(problems.len(), 1);
        assert!(!config.auto_switching);
        assert_eq!(config.manual_model, Candidate::Model2);
    }

    #[test]
    fn test_manual_model_must_be_on_roster() {
        let roster = Roster::new(vec![(Candidate::Model1, 0.5), (Candidate::Model4, 0.6)]).unwrap();
        let doc = json(r#"{"manual_model": "Model 2"}"#);
        let (config, problems) = AgentConfig::from_document(&doc, &roster);

        assert_eq!(problems.len(), 1);
        assert_eq!(config.manual_model, Candidate::Model1);
    }

    #[test]
    fn test_accuracy_overrides_change_ranking() {
        let doc = json(r#"{"accuracy": {"Model 3": 0.61, "Model 8": 0.99}}"#);
        let (config, problems) = AgentConfig::from_document(&doc, &Roster::default());

        assert!(problems.is_empty());
        assert_eq!(config.roster.best(), Candidate::Model3);
        assert_eq!(config.manual_model, Candidate::Model4);
    }

    #[test]
    fn test_toml_document() {
        let doc = ConfigDocument::parse(
            &PathBuf::from("agent.toml"),
            "auto_switching = false\nmanual_model = \"Model 1\"\n\n[accuracy]\n\"Model 1\" = 0.55\n",
        )
        .unwrap();
        let (config, _) = AgentConfig::from_document(&doc, &Roster::default());

        assert!(!config.auto_switching);
        assert_eq!(config.manual_model, Candidate::Model1);
        assert_eq!(config.roster.accuracy(Candidate::Model1), Some(0.55));
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let result = ConfigDocument::parse(&PathBuf::from("config.json"), "{auto_switching: ");
        assert!(result.is_err());

        let wrong_type = ConfigDocument::parse(
            &PathBuf::from("config.json"),
            r#"{"auto_switching": "yes"}"#,
        );
        assert!(wrong_type.is_err());
    }
}
