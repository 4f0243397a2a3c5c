use std::collections::HashMap;

use teamrank_merge::{CanonicalTable, UserId};

/// One distinct team, keyed by its lower-cased name.
#[derive(Debug, Clone)]
pub struct TeamEntry {
    pub key: String,
    /// Spelling of the first employee seen in this team.
    pub display_name: String,
    pub members: Vec<UserId>,
}

/// Distinct team names in table order (first appearance), with members.
#[derive(Debug, Clone, Default)]
pub struct TeamIndex {
    teams: Vec<TeamEntry>,
    keys: Vec<String>,
    by_key: HashMap<String, usize>,
}

impl TeamIndex {
    pub fn build(table: &CanonicalTable) -> Self {
        let mut index = Self::default();
        for employee in table.iter() {
            let Some(key) = employee.team_key() else {
                continue;
            };
            let slot = match index.by_key.get(&key) {
                Some(&slot) => slot,
                None => {
                    let display_name = employee
                        .team_name
                        .as_deref()
                        .map(str::trim)
                        .unwrap_or_default()
                        .to_string();
                    index.teams.push(TeamEntry {
                        key: key.clone(),
                        display_name,
                        members: Vec::new(),
                    });
                    index.keys.push(key.clone());
                    index.by_key.insert(key, index.teams.len() - 1);
                    index.teams.len() - 1
                }
            };
            index.teams[slot].members.push(employee.user_id.clone());
        }
        log::debug!("team index: {} teams", index.teams.len());
        index
    }

    pub fn get(&self, key: &str) -> Option<&TeamEntry> {
        self.by_key.get(key).map(|&slot| &self.teams[slot])
    }

    /// Lower-cased team names, candidate order for fuzzy matching.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
