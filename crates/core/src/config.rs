//! Serializable configuration for callers that cannot pass closures
//! (JSON settings files, bindings).

use serde::{Deserialize, Serialize};

use crate::casing::{AttributeCasing, Casing, normalize_attribute, normalize_tag};
use crate::label::slot_label;
use crate::{DirectiveError, Options};

/// What to do with container directive labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// Drop the label.
    #[default]
    Discard,
    /// Append the label as `<Fragment slot="label">`.
    Slot,
}

/// Lowering configuration in plain data form.
///
/// ```
/// use directive_mdx_core::TransformConfig;
///
/// let config = TransformConfig::from_json(r#"{"tagCasing": "pascal", "label": "slot"}"#).unwrap();
/// assert!(config.skip_transformed);
/// let options = config.into_options();
/// assert!(options.skip_transformed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformConfig {
    /// Leave directives already lowered for HTML output alone.
    #[serde(default = "default_skip_transformed")]
    pub skip_transformed: bool,
    /// Casing for element names; names are kept as authored when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_casing: Option<Casing>,
    /// Casing for attribute names; names are kept as authored when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_casing: Option<Casing>,
    /// Rename `class` to `className`.
    #[serde(default)]
    pub class_name: bool,
    /// Label handling for container directives.
    #[serde(default)]
    pub label: LabelMode,
    /// Directive names that are never lowered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

fn default_skip_transformed() -> bool {
    true
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            skip_transformed: default_skip_transformed(),
            tag_casing: None,
            attribute_casing: None,
            class_name: false,
            label: LabelMode::default(),
            exclude: Vec::new(),
        }
    }
}

impl TransformConfig {
    /// Parse configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, DirectiveError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build pass options from this configuration.
    pub fn into_options(self) -> Options {
        let mut options = Options::new().with_skip_transformed(self.skip_transformed);

        if let Some(casing) = self.tag_casing {
            options = options.with_tag_transform(normalize_tag(casing));
        }

        if self.attribute_casing.is_some() || self.class_name {
            options = options.with_attribute_transform(normalize_attribute(
                self.attribute_casing.unwrap_or(Casing::None),
                AttributeCasing {
                    class_name: self.class_name,
                },
            ));
        }

        if self.label == LabelMode::Slot {
            options = options.with_label_handler(slot_label);
        }

        if !self.exclude.is_empty() {
            let exclude = self.exclude;
            options =
                options.with_filter(move |_, directive| !exclude.iter().any(|n| *n == directive.name));
        }

        options
    }
}
