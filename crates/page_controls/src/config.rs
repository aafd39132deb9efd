use html::{SelectorError, SelectorList};
use serde::Deserialize;

/// Error type for loading a [`ControlsConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse controls config: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("invalid selector in `{field}`: {source}")]
    InvalidSelector {
        field: &'static str,
        #[source]
        source: SelectorError,
    },
}

/// Selectors that wire controls to their targets. Every field has a default,
/// so an empty TOML document yields the stock page setup.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ControlsConfig {
    #[serde(default)]
    pub symbols: SymbolConfig,
    #[serde(default)]
    pub clear: ClearConfig,
    #[serde(default)]
    pub copy: CopyConfig,
    /// Page-wide fallback marker, consulted last by every resolution.
    #[serde(default = "default_fallback_target")]
    pub fallback_target: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SymbolConfig {
    #[serde(default = "default_symbol_control")]
    pub control: String,
    #[serde(default = "default_symbol_group")]
    pub group: String,
    #[serde(default = "default_symbol_group_targets")]
    pub group_targets: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClearConfig {
    #[serde(default = "default_clear_control")]
    pub control: String,
    #[serde(default = "default_clear_group")]
    pub group: String,
    #[serde(default = "default_clear_group_targets")]
    pub group_targets: String,
    /// Hide a group's clear controls while its target is empty.
    #[serde(default)]
    pub toggle_visibility: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CopyConfig {
    #[serde(default = "default_copy_control")]
    pub control: String,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        ControlsConfig {
            symbols: SymbolConfig::default(),
            clear: ClearConfig::default(),
            copy: CopyConfig::default(),
            fallback_target: default_fallback_target(),
        }
    }
}

impl Default for SymbolConfig {
    fn default() -> Self {
        SymbolConfig {
            control: default_symbol_control(),
            group: default_symbol_group(),
            group_targets: default_symbol_group_targets(),
        }
    }
}

impl Default for ClearConfig {
    fn default() -> Self {
        ClearConfig {
            control: default_clear_control(),
            group: default_clear_group(),
            group_targets: default_clear_group_targets(),
            toggle_visibility: false,
        }
    }
}

impl Default for CopyConfig {
    fn default() -> Self {
        CopyConfig {
            control: default_copy_control(),
        }
    }
}

fn default_fallback_target() -> String {
    "[data-default-target]".to_string()
}

fn default_symbol_control() -> String {
    ".symbol-button, [data-symbol]".to_string()
}

fn default_symbol_group() -> String {
    ".symbol-container".to_string()
}

fn default_symbol_group_targets() -> String {
    r#"input[type="text"], textarea, [contenteditable="true"]"#.to_string()
}

fn default_clear_control() -> String {
    ".clear-button".to_string()
}

fn default_clear_group() -> String {
    ".input-group".to_string()
}

fn default_clear_group_targets() -> String {
    r#"input.form-control, textarea.form-control, [contenteditable="true"]"#.to_string()
}

fn default_copy_control() -> String {
    ".copy-to-clipboard".to_string()
}

impl ControlsConfig {
    /// Parse TOML text and check that every selector compiles.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ControlsConfig = toml::from_str(text)?;
        config.compile()?;
        Ok(config)
    }

    /// Compile every selector once, for the listeners to share.
    pub fn compile(&self) -> Result<Selectors, ConfigError> {
        fn parse(field: &'static str, src: &str) -> Result<SelectorList, ConfigError> {
            SelectorList::parse(src).map_err(|source| ConfigError::InvalidSelector { field, source })
        }

        Ok(Selectors {
            symbol_control: parse("symbols.control", &self.symbols.control)?,
            symbol_group: parse("symbols.group", &self.symbols.group)?,
            symbol_targets: parse("symbols.group_targets", &self.symbols.group_targets)?,
            clear_control: parse("clear.control", &self.clear.control)?,
            clear_group: parse("clear.group", &self.clear.group)?,
            clear_targets: parse("clear.group_targets", &self.clear.group_targets)?,
            copy_control: parse("copy.control", &self.copy.control)?,
            fallback: parse("fallback_target", &self.fallback_target)?,
        })
    }
}

/// Compiled form of [`ControlsConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub symbol_control: SelectorList,
    pub symbol_group: SelectorList,
    pub symbol_targets: SelectorList,
    pub clear_control: SelectorList,
    pub clear_group: SelectorList,
    pub clear_targets: SelectorList,
    pub copy_control: SelectorList,
    pub fallback: SelectorList,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ControlsConfig::from_toml_str("").unwrap();
        assert_eq!(config, ControlsConfig::default());
        assert_eq!(config.clear.group, ".input-group");
        assert!(!config.clear.toggle_visibility);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ControlsConfig::from_toml_str(
            r##"
            fallback_target = "#main-editor"

            [clear]
            control = ".btn-limpiar"
            toggle_visibility = true
            "##,
        )
        .unwrap();

        assert_eq!(config.fallback_target, "#main-editor");
        assert_eq!(config.clear.control, ".btn-limpiar");
        assert!(config.clear.toggle_visibility);
        assert_eq!(config.clear.group, ".input-group");
        assert_eq!(config.symbols, SymbolConfig::default());
    }

    #[test]
    fn malformed_selector_names_the_field() {
        let err = ControlsConfig::from_toml_str("[copy]\ncontrol = \"[data-x\"\n").unwrap_err();
        match err {
            ConfigError::InvalidSelector { field, .. } => assert_eq!(field, "copy.control"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ControlsConfig::from_toml_str("[symbols\n").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError(_)));
    }

    #[test]
    fn default_selectors_compile() {
        assert!(ControlsConfig::default().compile().is_ok());
    }
}
