use crate::error::HuddleError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Roles on the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    /// Sets direction; also synthesizes the round-one discussion
    TeamLeader,
    ProductManager,
    Architect,
    DataAnalyst,
    /// Proposes the implementation; also writes the detailed plan in round two
    Engineer,
}

impl RoleId {
    pub fn name(&self) -> &'static str {
        match self {
            RoleId::TeamLeader => "Team Leader",
            RoleId::ProductManager => "Product Manager",
            RoleId::Architect => "Architect",
            RoleId::DataAnalyst => "Data Analyst",
            RoleId::Engineer => "Engineer",
        }
    }

    pub fn all() -> [RoleId; 5] {
        [
            RoleId::TeamLeader,
            RoleId::ProductManager,
            RoleId::Architect,
            RoleId::DataAnalyst,
            RoleId::Engineer,
        ]
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Static description of one role. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleProfile {
    pub id: RoleId,
    pub name: String,
    pub title: String,
    pub instructions: String,
    pub capabilities: Vec<String>,
    /// Round-one position, lowest first. Unique within a registry.
    pub priority: u32,
}

impl RoleProfile {
    pub fn new(id: RoleId, priority: u32, instructions: impl Into<String>) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            title: String::new(),
            instructions: instructions.into(),
            capabilities: Vec::new(),
            priority,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_capabilities(mut self, capabilities: &[&str]) -> Self {
        self.capabilities = capabilities.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// Serializable roster entry for clients that display the team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterEntry {
    pub name: String,
    pub title: String,
    pub capabilities: Vec<String>,
    pub priority: u32,
}

impl From<&RoleProfile> for RosterEntry {
    fn from(profile: &RoleProfile) -> Self {
        Self {
            name: profile.name.clone(),
            title: profile.title.clone(),
            capabilities: profile.capabilities.clone(),
            priority: profile.priority,
        }
    }
}

/// Read-only, priority-ordered set of roles.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: Vec<RoleProfile>,
}

impl RoleRegistry {
    /// Build a registry, sorting by priority.
    ///
    /// Fails on an empty roster, duplicate ids or names, and priority ties.
    pub fn new(mut roles: Vec<RoleProfile>) -> Result<Self, HuddleError> {
        if roles.is_empty() {
            return Err(HuddleError::Config("role registry is empty".to_string()));
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        let mut priorities = HashSet::new();
        for role in &roles {
            if !ids.insert(role.id) {
                return Err(HuddleError::Config(format!("duplicate role id: {}", role.id)));
            }
            if !names.insert(role.name.as_str()) {
                return Err(HuddleError::Config(format!(
                    "duplicate role name: {}",
                    role.name
                )));
            }
            if !priorities.insert(role.priority) {
                return Err(HuddleError::Config(format!(
                    "priority {} is used by more than one role",
                    role.priority
                )));
            }
        }

        roles.sort_by_key(|r| r.priority);
        Ok(Self { roles })
    }

    /// The five-role default team.
    pub fn standard() -> Self {
        Self {
            roles: standard_roles(),
        }
    }

    /// Roles in ascending priority.
    pub fn list_roles(&self) -> &[RoleProfile] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn get(&self, id: RoleId) -> Option<&RoleProfile> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&RoleProfile> {
        self.roles.iter().find(|r| r.name == name)
    }

    /// The role that synthesizes round one.
    pub fn synthesis_role(&self) -> Result<&RoleProfile, HuddleError> {
        self.require(RoleId::TeamLeader)
    }

    /// The role that writes the detailed implementation plan.
    pub fn detail_role(&self) -> Result<&RoleProfile, HuddleError> {
        self.require(RoleId::Engineer)
    }

    pub fn roster(&self) -> Vec<RosterEntry> {
        self.roles.iter().map(RosterEntry::from).collect()
    }

    fn require(&self, id: RoleId) -> Result<&RoleProfile, HuddleError> {
        self.get(id)
            .ok_or_else(|| HuddleError::Config(format!("registry has no {} role", id)))
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_roles() -> Vec<RoleProfile> {
    vec![
        RoleProfile::new(RoleId::TeamLeader, 1, TEAM_LEADER_INSTRUCTIONS)
            .with_title("Strategic Oversight & Coordination")
            .with_capabilities(&[
                "Team coordination",
                "Decision making",
                "Strategic planning",
                "Quality control",
            ]),
        RoleProfile::new(RoleId::ProductManager, 2, PRODUCT_MANAGER_INSTRUCTIONS)
            .with_title("Requirements & User Experience")
            .with_capabilities(&[
                "User stories",
                "Requirements analysis",
                "Feature prioritization",
                "Success metrics",
            ]),
        RoleProfile::new(RoleId::Architect, 3, ARCHITECT_INSTRUCTIONS)
            .with_title("System Design & Technology")
            .with_capabilities(&[
                "System architecture",
                "Technology selection",
                "Scalability design",
                "Integration patterns",
            ]),
        RoleProfile::new(RoleId::DataAnalyst, 4, DATA_ANALYST_INSTRUCTIONS)
            .with_title("Data Modeling & Insights")
            .with_capabilities(&[
                "Data modeling",
                "Schema design",
                "Analytics",
                "Data governance",
            ]),
        RoleProfile::new(RoleId::Engineer, 5, ENGINEER_INSTRUCTIONS)
            .with_title("Implementation & Development")
            .with_capabilities(&[
                "Full-stack development",
                "Code architecture",
                "Tooling",
                "Best practices",
            ]),
    ]
}

// ── Role Instructions ───────────────────────────────────────

const TEAM_LEADER_INSTRUCTIONS: &str = r#"You are the Team Leader of a small product team.
Set clear objectives for the request, coordinate the other members,
make high-level decisions, and call out risks with mitigations."#;

const PRODUCT_MANAGER_INSTRUCTIONS: &str = r#"You are the Product Manager of a small product team.
Turn the request into user requirements, user stories and acceptance criteria,
prioritize features by value, and define how success is measured."#;

const ARCHITECT_INSTRUCTIONS: &str = r#"You are the Architect of a small product team.
Propose the system architecture, choose technologies, describe how components
interact and how data flows, and address performance, security and scale."#;

const DATA_ANALYST_INSTRUCTIONS: &str = r#"You are the Data Analyst of a small product team.
Design the data model and schemas, identify data sources and integration points,
and define analytics, reporting and data quality needs."#;

const ENGINEER_INSTRUCTIONS: &str = r#"You are the Engineer of a small product team.
Propose how to implement the agreed design: concrete libraries and tools,
code structure, technical challenges and how to solve them."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_is_priority_ordered() {
        let registry = RoleRegistry::standard();
        let priorities: Vec<u32> = registry.list_roles().iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4, 5]);
        assert_eq!(registry.list_roles()[0].id, RoleId::TeamLeader);
        assert_eq!(registry.list_roles()[4].id, RoleId::Engineer);
    }

    #[test]
    fn standard_registry_passes_validation() {
        let rebuilt = RoleRegistry::new(standard_roles()).unwrap();
        assert_eq!(rebuilt.len(), 5);
    }

    #[test]
    fn new_sorts_by_priority() {
        let registry = RoleRegistry::new(vec![
            RoleProfile::new(RoleId::Engineer, 20, "e"),
            RoleProfile::new(RoleId::Architect, 10, "a"),
        ])
        .unwrap();
        assert_eq!(registry.list_roles()[0].id, RoleId::Architect);
    }

    #[test]
    fn priority_ties_are_rejected() {
        let err = RoleRegistry::new(vec![
            RoleProfile::new(RoleId::Engineer, 1, "e"),
            RoleProfile::new(RoleId::Architect, 1, "a"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("priority 1"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = RoleRegistry::new(vec![
            RoleProfile::new(RoleId::Engineer, 1, "e"),
            RoleProfile::new(RoleId::Engineer, 2, "e2"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert!(RoleRegistry::new(Vec::new()).is_err());
    }

    #[test]
    fn lookup_by_name_and_round_two_roles() {
        let registry = RoleRegistry::standard();
        assert_eq!(registry.by_name("Architect").unwrap().id, RoleId::Architect);
        assert!(registry.by_name("Intern").is_none());
        assert_eq!(registry.synthesis_role().unwrap().id, RoleId::TeamLeader);
        assert_eq!(registry.detail_role().unwrap().id, RoleId::Engineer);
    }

    #[test]
    fn missing_detail_role_is_a_config_error() {
        let registry =
            RoleRegistry::new(vec![RoleProfile::new(RoleId::TeamLeader, 1, "lead")]).unwrap();
        assert!(matches!(
            registry.detail_role(),
            Err(HuddleError::Config(_))
        ));
    }

    #[test]
    fn roster_carries_display_metadata() {
        let roster = RoleRegistry::standard().roster();
        assert_eq!(roster.len(), 5);
        assert_eq!(roster[0].name, "Team Leader");
        assert_eq!(roster[0].title, "Strategic Oversight & Coordination");
        assert_eq!(roster[0].capabilities.len(), 4);
    }
}
