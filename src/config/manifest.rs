//! The installer's manifest of scripts and the data files shipped with them.
use serde::Deserialize;

/// Manifest embedded at build time.
const EMBEDDED_MANIFEST: &str = include_str!("../../data/install.toml");

/// Data files embedded at build time, by name.
const DATA_FILES: &[(&str, &str)] = &[
    ("japg-words.txt", include_str!("../../data/japg-words.txt")),
    ("jcp.conf", include_str!("../../data/jcp.conf")),
    ("jmount.conf", include_str!("../../data/jmount.conf")),
];

/// The set of scripts installed by `jinstall`, in install order.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    /// Scripts to install.
    #[serde(rename = "script")]
    pub scripts: Vec<ScriptEntry>,
}

/// One installable script.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Binary name in the source and destination directories.
    pub name: String,
    /// Word list shipped alongside the script, installed into the dictionary
    /// directory.
    #[serde(default)]
    pub wordlist: Option<String>,
    /// Configuration template installed into the config directory once.
    #[serde(default)]
    pub config_template: Option<String>,
}

impl Manifest {
    /// Parse the embedded manifest.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the embedded manifest is malformed.
    pub fn embedded() -> Result<Self, toml::de::Error> {
        Self::from_toml(EMBEDDED_MANIFEST)
    }

    /// Parse a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if `content` is malformed.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Script names in install order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.scripts.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Contents of an embedded data file.
#[must_use]
pub fn data_file(name: &str) -> Option<&'static str> {
    DATA_FILES
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, content)| *content)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn embedded_manifest_parses() {
        let manifest = Manifest::embedded().unwrap();
        assert!(manifest.names().contains(&"jcp"));
        assert!(!manifest.names().contains(&"jinstall"), "installer does not install itself");
    }

    #[test]
    fn every_referenced_data_file_is_embedded() {
        let manifest = Manifest::embedded().unwrap();
        for entry in &manifest.scripts {
            for file in entry.wordlist.iter().chain(entry.config_template.iter()) {
                assert!(data_file(file).is_some(), "{file} is not embedded");
            }
        }
    }

    #[test]
    fn optional_fields_default_to_none() {
        let manifest = Manifest::from_toml("[[script]]\nname = \"jau\"\n").unwrap();
        assert_eq!(manifest.scripts[0].wordlist, None);
        assert_eq!(manifest.scripts[0].config_template, None);
    }

    #[test]
    fn unknown_data_file_is_none() {
        assert!(data_file("nope.txt").is_none());
    }
}
