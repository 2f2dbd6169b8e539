//! Agent identity value object

use serde::{Deserialize, Serialize};

/// Ordinal identity of one participant, `1..=agent_count`.
///
/// Serialized as a bare integer so persisted sessions read naturally
/// (`"rankings": [2, 3]`, `"scores": {"1": 4}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(u32);

impl AgentId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this id names one of `agent_count` participants.
    pub fn is_within(self, agent_count: u32) -> bool {
        (1..=agent_count).contains(&self.0)
    }

    /// All ids of a council of `agent_count`, ascending.
    pub fn all(agent_count: u32) -> impl Iterator<Item = AgentId> {
        (1..=agent_count).map(AgentId)
    }
}

impl From<u32> for AgentId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_one_based() {
        let ids: Vec<u32> = AgentId::all(3).map(AgentId::get).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_is_within() {
        assert!(AgentId::new(1).is_within(3));
        assert!(AgentId::new(3).is_within(3));
        assert!(!AgentId::new(0).is_within(3));
        assert!(!AgentId::new(4).is_within(3));
    }

    #[test]
    fn test_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&AgentId::new(7)).unwrap(), "7");
        let id: AgentId = serde_json::from_str("2").unwrap();
        assert_eq!(id, AgentId::new(2));
    }
}
