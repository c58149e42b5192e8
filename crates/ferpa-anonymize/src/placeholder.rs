//! Placeholder rendering and the placeholder grammar.

use std::sync::LazyLock;

use ferpa_core::models::entity::EntityType;
use regex::Regex;

use crate::error::AnonymizeError;

pub const DEFAULT_PLACEHOLDER_FORMAT: &str = "[{entity_type}_{index}]";

static PLACEHOLDER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[A-Z_]+_\d+\]$").expect("placeholder grammar is valid"));

/// True when `text` is exactly one well-formed placeholder token such as
/// `[STUDENT_NAME_1]`. Anything else found in anonymized text is leakage.
pub fn is_placeholder(text: &str) -> bool {
    PLACEHOLDER_TOKEN.is_match(text)
}

/// Template for placeholder tokens, parameterized by entity type and the
/// per-type index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderFormat {
    template: String,
}

impl PlaceholderFormat {
    /// Validate a template. It must contain both `{entity_type}` and
    /// `{index}` and render to tokens the verifier recognizes.
    pub fn new(template: impl Into<String>) -> Result<Self, AnonymizeError> {
        let template = template.into();
        if !template.contains("{entity_type}") || !template.contains("{index}") {
            return Err(AnonymizeError::InvalidPlaceholderFormat(format!(
                "'{template}' must contain {{entity_type}} and {{index}}"
            )));
        }

        let format = Self { template };
        for entity in EntityType::ALL {
            let sample = format.render(entity, 12);
            if !is_placeholder(&sample) {
                return Err(AnonymizeError::InvalidPlaceholderFormat(format!(
                    "'{}' renders '{sample}', which is not a bracketed [TYPE_N] token",
                    format.template
                )));
            }
        }
        Ok(format)
    }

    pub fn render(&self, entity_type: EntityType, index: u32) -> String {
        self.template
            .replace("{entity_type}", entity_type.as_str())
            .replace("{index}", &index.to_string())
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for PlaceholderFormat {
    fn default() -> Self {
        Self {
            template: DEFAULT_PLACEHOLDER_FORMAT.to_string(),
        }
    }
}
