//! Council configuration from TOML (`[council]` section)
//!
//! ```toml
//! [council]
//! agents = 3
//! rounds = 1
//! model = "claude-sonnet-4-20250514"
//! ```

use council_domain::{ConfigIssue, ConfigIssueCode, DeliberationConfig, Model};
use serde::{Deserialize, Serialize};

/// Councils larger than this are accepted but likely to hit rate limits
const LARGE_COUNCIL: u32 = 10;

/// Raw council configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Number of agents
    pub agents: u32,
    /// Number of discussion rounds
    pub rounds: u32,
    /// Model shared by every agent
    pub model: String,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            agents: DeliberationConfig::MIN_AGENTS,
            rounds: DeliberationConfig::MIN_ROUNDS,
            model: Model::default().to_string(),
        }
    }
}

impl FileCouncilConfig {
    /// Parse the model name, reporting an empty one
    pub fn parse_model(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        if self.model.trim().is_empty() {
            return (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::EmptyModel,
                    "council.model: model name cannot be empty",
                )],
            );
        }
        let Ok(model) = self.model.parse::<Model>();
        (Some(model), Vec::new())
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_model().1;

        if self.agents < DeliberationConfig::MIN_AGENTS {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::TooFewAgents,
                format!(
                    "council.agents: minimum {} agents required (got {})",
                    DeliberationConfig::MIN_AGENTS,
                    self.agents
                ),
            ));
        } else if self.agents > LARGE_COUNCIL {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::LargeCouncil,
                format!(
                    "council.agents: {} agents send {} concurrent requests per phase",
                    self.agents, self.agents
                ),
            ));
        }

        if self.rounds < DeliberationConfig::MIN_ROUNDS {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoRounds,
                "council.rounds: minimum 1 discussion round required (got 0)",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate_clean() {
        let config = FileCouncilConfig::default();
        assert_eq!(config.agents, 3);
        assert_eq!(config.rounds, 1);
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_too_few_agents_and_rounds() {
        let config = FileCouncilConfig {
            agents: 2,
            rounds: 0,
            ..Default::default()
        };
        let codes: Vec<ConfigIssueCode> = config.validate().iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![ConfigIssueCode::TooFewAgents, ConfigIssueCode::NoRounds]);
    }

    #[test]
    fn test_large_council_warns() {
        let config = FileCouncilConfig {
            agents: 12,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_empty_model_is_error() {
        let config = FileCouncilConfig {
            model: "  ".to_string(),
            ..Default::default()
        };
        let (model, issues) = config.parse_model();
        assert!(model.is_none());
        assert_eq!(issues[0].code, ConfigIssueCode::EmptyModel);
    }

    #[test]
    fn test_alias_and_custom_models_parse() {
        let config = FileCouncilConfig {
            model: "claude-3-7-sonnet-latest".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.parse_model().0,
            Some(Model::Custom("claude-3-7-sonnet-latest".to_string()))
        );
    }
}
