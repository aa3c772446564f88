//! Career catalog
//!
//! Each career is a theme: a display name, an avatar glyph and the pool of
//! obstacle texts that fall during its sessions. The built-in catalog ships
//! as JSON and is parsed once at startup.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

const BUILTIN_CATALOG: &str = include_str!("../assets/careers.json");

/// A selectable theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    pub id: String,
    pub name: String,
    /// Glyph drawn as the player avatar
    pub avatar: String,
    /// Obstacle vocabulary (order preserved, repeats allowed when drawing)
    #[serde(default)]
    pub obstacles: Vec<String>,
}

/// Ordered, read-only list of careers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    careers: Vec<Career>,
}

impl Catalog {
    /// Parse the catalog bundled with the crate
    pub fn builtin() -> Result<Self, GameError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        for career in catalog.careers.iter().filter(|c| c.obstacles.is_empty()) {
            log::warn!("Career '{}' has no obstacle texts", career.id);
        }
        Ok(catalog)
    }

    pub fn new(careers: Vec<Career>) -> Self {
        Self { careers }
    }

    pub fn careers(&self) -> &[Career] {
        &self.careers
    }

    pub fn find(&self, id: &str) -> Option<&Career> {
        self.careers.iter().find(|c| c.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.careers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.careers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 3);

        let ids: Vec<&str> = catalog.careers().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["intern", "web-developer", "corporate"]);
    }

    #[test]
    fn test_builtin_careers_are_playable() {
        let catalog = Catalog::builtin().unwrap();
        let mut seen = HashSet::new();
        for career in catalog.careers() {
            assert!(seen.insert(career.id.clone()), "duplicate id {}", career.id);
            assert!(!career.avatar.is_empty());
            assert!(!career.obstacles.is_empty(), "{} has no obstacles", career.id);
            assert!(career.obstacles.iter().all(|t| !t.trim().is_empty()));
        }
    }

    #[test]
    fn test_find() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.find("corporate").unwrap().name, "Corporate Employee");
        assert!(catalog.find("astronaut").is_none());
    }

    #[test]
    fn test_from_json_missing_obstacles_defaults_empty() {
        let json = r#"{"careers":[{"id":"x","name":"X","avatar":"?"}]}"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert!(catalog.find("x").unwrap().obstacles.is_empty());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Catalog::from_json("{\"careers\": 7}"),
            Err(GameError::Catalog(_))
        ));
    }
}
