//! Model value object representing the backend model every agent talks to

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Claude models known to the council (Value Object)
///
/// All agents of one deliberation share a single model; diversity comes
/// from independent sampling, not from mixing providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    ClaudeOpus41,
    ClaudeOpus4,
    ClaudeSonnet45,
    ClaudeSonnet4,
    ClaudeHaiku45,
    /// Any other identifier, passed to the backend verbatim
    Custom(String),
}

impl Model {
    /// Get the API identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::ClaudeOpus41 => "claude-opus-4-1-20250805",
            Model::ClaudeOpus4 => "claude-opus-4-20250514",
            Model::ClaudeSonnet45 => "claude-sonnet-4-5-20250929",
            Model::ClaudeSonnet4 => "claude-sonnet-4-20250514",
            Model::ClaudeHaiku45 => "claude-haiku-4-5-20251001",
            Model::Custom(s) => s,
        }
    }

    /// Short alias accepted on the command line
    pub fn alias(&self) -> Option<&'static str> {
        match self {
            Model::ClaudeOpus41 => Some("opus-4.1"),
            Model::ClaudeOpus4 => Some("opus-4"),
            Model::ClaudeSonnet45 => Some("sonnet-4.5"),
            Model::ClaudeSonnet4 => Some("sonnet-4"),
            Model::ClaudeHaiku45 => Some("haiku-4.5"),
            Model::Custom(_) => None,
        }
    }

    /// Models with a built-in identifier
    pub fn known_models() -> Vec<Model> {
        vec![
            Model::ClaudeOpus41,
            Model::ClaudeOpus4,
            Model::ClaudeSonnet45,
            Model::ClaudeSonnet4,
            Model::ClaudeHaiku45,
        ]
    }
}

impl Default for Model {
    /// Returns the default model (Claude Sonnet 4)
    fn default() -> Self {
        Model::ClaudeSonnet4
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Ok(Model::known_models()
            .into_iter()
            .find(|m| m.as_str() == s || m.alias() == Some(s))
            .unwrap_or_else(|| Model::Custom(s.to_string())))
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
