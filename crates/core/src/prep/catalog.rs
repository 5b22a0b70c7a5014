//! Fixed catalog of release prep items.

use super::types::{AutomatedCheck, PrepItem, PrepItemDefinition, Resolver};

/// Ordered, id-unique list of prep item definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepCatalog {
    definitions: Vec<PrepItemDefinition>,
}

impl PrepCatalog {
    /// Build a catalog, dropping later duplicates of an id.
    pub fn new(definitions: Vec<PrepItemDefinition>) -> Self {
        let mut unique: Vec<PrepItemDefinition> = Vec::with_capacity(definitions.len());
        for def in definitions {
            if unique.iter().any(|d| d.id == def.id) {
                tracing::warn!(item_id = %def.id, "Duplicate prep catalog id ignored");
                continue;
            }
            unique.push(def);
        }
        Self {
            definitions: unique,
        }
    }

    /// The default release checklist.
    pub fn builtin() -> Self {
        Self::new(vec![
            manual(
                "release-notes",
                "Release notes drafted",
                "Customer-facing release notes reviewed by product.",
            ),
            manual(
                "qa-signoff",
                "QA sign-off",
                "Regression suite executed and signed off by QA.",
            ),
            PrepItemDefinition {
                id: "blocking-tickets".to_string(),
                label: "Blocking tickets resolved".to_string(),
                description: "Release blocker tickets are done or closed.".to_string(),
                resolver: Resolver::Automated {
                    automated_check: AutomatedCheck::jira_ticket(
                        "labels = release-blocker ORDER BY updated DESC",
                    ),
                },
                deadline: None,
            },
            PrepItemDefinition {
                id: "status-page".to_string(),
                label: "Status page operational".to_string(),
                description: "No ongoing incidents on the public status page.".to_string(),
                resolver: Resolver::Automated {
                    automated_check: AutomatedCheck::api_check("/api/v2/status.json", "none"),
                },
                deadline: None,
            },
            manual(
                "rollback-plan",
                "Rollback plan documented",
                "Rollback steps written down and rehearsed on staging.",
            ),
            manual(
                "stakeholder-signoff",
                "Stakeholder sign-off",
                "Engineering and product owners approved the release.",
            ),
        ])
    }

    pub fn definitions(&self) -> &[PrepItemDefinition] {
        &self.definitions
    }

    pub fn get(&self, id: &str) -> Option<&PrepItemDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Items in their catalog default state.
    pub fn default_items(&self) -> Vec<PrepItem> {
        self.definitions
            .iter()
            .map(PrepItem::from_definition)
            .collect()
    }
}

impl Default for PrepCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn manual(id: &str, label: &str, description: &str) -> PrepItemDefinition {
    PrepItemDefinition {
        id: id.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        resolver: Resolver::Manual,
        deadline: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prep::{CheckKind, ResolverType};

    #[test]
    fn test_builtin_catalog_has_both_resolver_types() {
        let catalog = PrepCatalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert!(catalog
            .definitions()
            .iter()
            .any(|d| d.resolver.resolver_type() == ResolverType::Manual));

        let kinds: Vec<CheckKind> = catalog
            .definitions()
            .iter()
            .filter_map(|d| d.resolver.automated_check().map(|c| c.kind))
            .collect();
        assert_eq!(kinds, vec![CheckKind::JiraTicket, CheckKind::ApiCheck]);
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let catalog = PrepCatalog::new(vec![
            manual("a", "First", ""),
            manual("b", "Second", ""),
            manual("a", "Shadow", ""),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a").unwrap().label, "First");
    }

    #[test]
    fn test_default_items_start_incomplete() {
        let items = PrepCatalog::builtin().default_items();
        assert!(items.iter().all(|i| !i.completed && !i.at_risk && !i.manual_at_risk));
    }
}
