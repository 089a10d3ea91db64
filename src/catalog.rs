//! The built-in activity catalog, compiled into the binary.

use std::collections::HashSet;

use serde::Deserialize;

use crate::model::ActivityConfig;

const BUILTIN: &str = include_str!("activities.toml");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate activity id: {0}")]
    DuplicateId(String),

    #[error("activity {activity} lists mission {mission} twice")]
    DuplicateMission { activity: String, mission: String },
}

pub type Result<T> = core::result::Result<T, CatalogError>;

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    activity: Vec<ActivityConfig>,
}

/// Activities in declaration order.
#[derive(Debug, Clone)]
pub struct Catalog {
    activities: Vec<ActivityConfig>,
}

impl Catalog {
    /// The catalog shipped with the trainer.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text)?;

        let mut ids = HashSet::new();
        for activity in &file.activity {
            if !ids.insert(activity.id.as_str()) {
                return Err(CatalogError::DuplicateId(activity.id.clone()));
            }
            let mut missions = HashSet::new();
            for mission in &activity.missions {
                if !missions.insert(mission.id.as_str()) {
                    return Err(CatalogError::DuplicateMission {
                        activity: activity.id.clone(),
                        mission: mission.id.clone(),
                    });
                }
            }
        }
        Ok(Self {
            activities: file.activity,
        })
    }

    pub fn get(&self, id: &str) -> Option<&ActivityConfig> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn list(&self) -> &[ActivityConfig] {
        &self.activities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::gate::ActivityGate;
    use crate::model::MissionCheck;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        let ids: Vec<&str> = catalog.list().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["act-1", "act-2", "act-3", "act-4"]);
    }

    #[test]
    fn first_activity_is_local_only() {
        let catalog = Catalog::builtin().unwrap();
        let act1 = catalog.get("act-1").unwrap();
        let gate = ActivityGate::new(Some(act1));
        assert!(gate.is_allowed("git commit"));
        assert!(!gate.is_allowed("git push"));
        assert!(!gate.is_allowed("github create"));
        assert_eq!(
            act1.missions[0].check,
            MissionCheck::FirstCommit {
                file: "index.html".into(),
                phrase: "primer commit".into(),
            }
        );
        assert_eq!(act1.seed_files[0].path, "README.md");
    }

    #[test]
    fn third_activity_seeds_html() {
        let catalog = Catalog::builtin().unwrap();
        let act3 = catalog.get("act-3").unwrap();
        let index = act3
            .seed_files
            .iter()
            .find(|f| f.path == "index.html")
            .unwrap();
        assert!(index.content.starts_with("<!DOCTYPE html>"));
        assert!(index.content.contains("<h1>Practicing Git</h1>"));
        assert_eq!(act3.missions.len(), 9);
        assert!(ActivityGate::new(Some(act3)).is_allowed("github pr"));
    }

    #[test]
    fn last_activity_allows_everything() {
        let catalog = Catalog::builtin().unwrap();
        let act4 = catalog.get("act-4").unwrap();
        assert_eq!(act4.allowed_commands, None);
        assert!(act4
            .missions
            .iter()
            .any(|m| matches!(m.check, MissionCheck::PagesPublished { .. })));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = r#"
            [[activity]]
            id = "a"
            title = "A"

            [[activity]]
            id = "a"
            title = "again"
        "#;
        assert!(matches!(
            Catalog::from_toml(text).unwrap_err(),
            CatalogError::DuplicateId(id) if id == "a"
        ));
    }

    #[test]
    fn unknown_ids_are_absent() {
        assert!(Catalog::builtin().unwrap().get("act-99").is_none());
    }
}
