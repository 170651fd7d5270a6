//! Floor levels and level groups.

pub mod assigner;

pub use assigner::LevelAssigner;

/// A floor level.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub id: String,
    pub name: String,
    pub elevation: f64,
    /// Floor-to-floor height, when known.
    pub height: Option<f64>,
    /// Position within the owning [`LevelGroup`].
    pub index: usize,
}

impl Level {
    /// Creates a level with no floor-to-floor height.
    #[must_use]
    pub fn new(id: impl Into<String>, elevation: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            elevation,
            height: None,
            index: 0,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }
}

/// Reference to a level by identifier and elevation.
///
/// The identifier is matched first; the elevation is the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelReference {
    pub id: Option<String>,
    pub elevation: f64,
}

impl LevelReference {
    #[must_use]
    pub fn new(id: Option<String>, elevation: f64) -> Self {
        Self { id, elevation }
    }

    /// A reference that only carries an elevation.
    #[must_use]
    pub fn at_elevation(elevation: f64) -> Self {
        Self {
            id: None,
            elevation,
        }
    }
}

impl From<&Level> for LevelReference {
    fn from(level: &Level) -> Self {
        Self {
            id: Some(level.id.clone()),
            elevation: level.elevation,
        }
    }
}

/// Levels of one site, ordered by elevation.
///
/// The ordering and indices are fixed at construction; consumers only read.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGroup {
    pub id: String,
    /// Identifier of the site the group belongs to.
    pub site: Option<String>,
    levels: Vec<Level>,
}

impl LevelGroup {
    /// Creates a group, sorting `levels` by elevation and re-indexing them.
    #[must_use]
    pub fn new(id: impl Into<String>, mut levels: Vec<Level>) -> Self {
        levels.sort_by(|a, b| a.elevation.total_cmp(&b.elevation));
        for (index, level) in levels.iter_mut().enumerate() {
            level.index = index;
        }
        Self {
            id: id.into(),
            site: None,
            levels,
        }
    }

    /// `count` levels spaced `floor_height` apart from elevation zero, each
    /// with that floor-to-floor height.
    #[must_use]
    pub fn uniform(id: impl Into<String>, count: usize, floor_height: f64) -> Self {
        let mut elevation = 0.0;
        let mut levels = Vec::with_capacity(count);
        for i in 0..count {
            levels.push(
                Level::new(format!("L{}", i + 1), elevation)
                    .with_name(format!("Level {}", i + 1))
                    .with_height(floor_height),
            );
            elevation += floor_height;
        }
        Self::new(id, levels)
    }

    #[must_use]
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Level> {
        self.levels.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Level> {
        self.levels.last()
    }

    /// Elevation of the topmost level.
    #[must_use]
    pub fn max_height(&self) -> Option<f64> {
        self.levels.last().map(|l| l.elevation)
    }

    /// Position of `level` in this group, matched by identifier.
    #[must_use]
    pub fn position(&self, level: &Level) -> Option<usize> {
        self.levels.iter().position(|l| l.id == level.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_sorted_and_indexed() {
        let group = LevelGroup::new(
            "g",
            vec![
                Level::new("b", 7.0),
                Level::new("a", 0.0),
                Level::new("c", 3.5),
            ],
        );
        let ids: Vec<_> = group.levels().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "b"]);
        assert_eq!(group.levels()[2].index, 2);
        assert_eq!(group.max_height(), Some(7.0));
    }

    #[test]
    fn uniform_group() {
        let group = LevelGroup::uniform("g", 5, 3.5);
        assert_eq!(group.len(), 5);
        assert!((group.max_height().unwrap_or_default() - 14.0).abs() < 1e-12);
        assert!(group.levels().iter().all(|l| l.height == Some(3.5)));
    }

    #[test]
    fn empty_group_has_no_height() {
        let group = LevelGroup::new("g", Vec::new());
        assert!(group.is_empty());
        assert_eq!(group.max_height(), None);
    }
}
