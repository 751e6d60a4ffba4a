//! Generated hardware-description text.

use std::fmt;

use kiln_common::ContentHash;
use serde::{Deserialize, Serialize};

/// Hardware description languages an artifact can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HdlLanguage {
    /// VHDL-2008.
    Vhdl,
    /// Verilog-2005.
    Verilog,
}

impl HdlLanguage {
    /// Returns the language name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vhdl => "VHDL",
            Self::Verilog => "Verilog",
        }
    }

    /// Returns the conventional source file extension.
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Vhdl => "vhd",
            Self::Verilog => "v",
        }
    }
}

impl fmt::Display for HdlLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source text of a generated design together with its language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareDescription {
    source: String,
    language: HdlLanguage,
}

impl HardwareDescription {
    /// Wraps generated source text.
    pub fn new(source: impl Into<String>, language: HdlLanguage) -> Self {
        Self {
            source: source.into(),
            language,
        }
    }

    /// The source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The language of the source text.
    pub fn language(&self) -> HdlLanguage {
        self.language
    }

    /// Fingerprint of the source text.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of_text(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tags() {
        assert_eq!(HdlLanguage::Vhdl.to_string(), "VHDL");
        assert_eq!(HdlLanguage::Verilog.file_extension(), "v");
        let json = serde_json::to_string(&HdlLanguage::Vhdl).unwrap();
        assert_eq!(serde_json::from_str::<HdlLanguage>(&json).unwrap(), HdlLanguage::Vhdl);
    }

    #[test]
    fn hash_follows_source() {
        let a = HardwareDescription::new("entity a is end;", HdlLanguage::Vhdl);
        let b = HardwareDescription::new("entity a is end;", HdlLanguage::Vhdl);
        let c = HardwareDescription::new("entity b is end;", HdlLanguage::Vhdl);
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }
}
