use super::{Level, LevelGroup};
use crate::diagnostics::Diagnostics;
use crate::math::MATCH_TOLERANCE;

/// Read-only lookups and slices over a [`LevelGroup`].
#[derive(Debug, Clone, Copy)]
pub struct LevelAssigner<'a> {
    group: &'a LevelGroup,
}

impl<'a> LevelAssigner<'a> {
    #[must_use]
    pub fn new(group: &'a LevelGroup) -> Self {
        Self { group }
    }

    /// The level with identifier `id`, else the level nearest `elevation`.
    ///
    /// Returns `None` only for an empty group.
    #[must_use]
    pub fn find_best_match(&self, id: Option<&str>, elevation: f64) -> Option<&'a Level> {
        let levels = self.group.levels();
        if let Some(found) = id.and_then(|id| levels.iter().find(|l| l.id == id)) {
            return Some(found);
        }
        levels.iter().min_by(|a, b| {
            (a.elevation - elevation)
                .abs()
                .total_cmp(&(b.elevation - elevation).abs())
        })
    }

    /// Levels from `bottom` through `top`, inclusive.
    ///
    /// A `top` at or below `bottom` is corrected to the level right above
    /// `bottom` (or, at the top of the group, the last two levels) and a
    /// warning is recorded. A group with fewer than two levels cannot form a
    /// range: the warning is recorded and every level is returned.
    #[must_use]
    pub fn levels_between(
        &self,
        bottom: &Level,
        top: &Level,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Level> {
        let levels = self.group.levels();
        if levels.len() < 2 {
            diagnostics.warn(format!(
                "level group `{}` has fewer than two levels; add more levels",
                self.group.id
            ));
            return levels.to_vec();
        }
        let last = levels.len() - 1;
        let mut bottom_index = self.group.position(bottom).unwrap_or(bottom.index).min(last);
        let mut top_index = self.group.position(top).unwrap_or(top.index).min(last);

        if top.elevation <= bottom.elevation {
            diagnostics.warn(format!(
                "top level `{}` is at or below bottom level `{}`; correcting the range",
                top.name, bottom.name
            ));
            top_index = bottom_index + 1;
            if top_index > last {
                top_index = last;
                bottom_index = last - 1;
            }
        }
        if bottom_index > top_index {
            return Vec::new();
        }
        levels[bottom_index..=top_index].to_vec()
    }

    /// Levels with an elevation below `height` (plus tolerance), starting at
    /// the position of `from` (or the first level when `from` is `None`).
    #[must_use]
    pub fn levels_up_to_height(&self, height: f64, from: Option<&Level>) -> Vec<Level> {
        let skip = from.and_then(|l| self.group.position(l)).unwrap_or(0);
        self.group
            .levels()
            .iter()
            .filter(|l| l.elevation < height + MATCH_TOLERANCE)
            .skip(skip)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn group() -> LevelGroup {
        LevelGroup::uniform("g", 5, 3.5)
    }

    #[test]
    fn best_match_prefers_id() {
        let group = group();
        let assigner = LevelAssigner::new(&group);
        assert_eq!(assigner.find_best_match(Some("L2"), 14.0).unwrap().id, "L2");
        assert_eq!(assigner.find_best_match(Some("missing"), 6.0).unwrap().id, "L3");
        assert_eq!(assigner.find_best_match(None, -5.0).unwrap().id, "L1");
    }

    #[test]
    fn best_match_in_empty_group() {
        let group = LevelGroup::new("g", Vec::new());
        assert!(LevelAssigner::new(&group).find_best_match(None, 0.0).is_none());
    }

    #[test]
    fn between_is_inclusive() {
        let group = group();
        let assigner = LevelAssigner::new(&group);
        let mut diagnostics = Diagnostics::new();
        let levels = group.levels();
        let slice = assigner.levels_between(&levels[1], &levels[3], &mut diagnostics);
        let ids: Vec<_> = slice.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["L2", "L3", "L4"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn inverted_range_is_corrected() {
        let group = group();
        let assigner = LevelAssigner::new(&group);
        let levels = group.levels();

        let mut diagnostics = Diagnostics::new();
        let slice = assigner.levels_between(&levels[3], &levels[1], &mut diagnostics);
        let ids: Vec<_> = slice.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["L4", "L5"]);
        assert_eq!(diagnostics.warnings().len(), 1);

        let mut diagnostics = Diagnostics::new();
        let slice = assigner.levels_between(&levels[4], &levels[4], &mut diagnostics);
        let ids: Vec<_> = slice.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["L4", "L5"]);
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn single_level_group_warns() {
        let group = LevelGroup::uniform("g", 1, 3.5);
        let assigner = LevelAssigner::new(&group);
        let mut diagnostics = Diagnostics::new();
        let level = &group.levels()[0];
        let slice = assigner.levels_between(level, level, &mut diagnostics);
        assert_eq!(slice.len(), 1);
        assert!(!diagnostics.is_empty());
    }

    #[test]
    fn up_to_height_partitions_bands() {
        let group = group();
        let assigner = LevelAssigner::new(&group);
        let lower = assigner.levels_up_to_height(7.0, None);
        assert_eq!(lower.len(), 3);
        // The next band starts on the last level of the previous one.
        let upper = assigner.levels_up_to_height(14.0, lower.last());
        let ids: Vec<_> = upper.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["L3", "L4", "L5"]);
    }

    #[test]
    fn up_to_height_includes_level_within_tolerance() {
        let group = group();
        let assigner = LevelAssigner::new(&group);
        assert_eq!(assigner.levels_up_to_height(6.995, None).len(), 3);
        assert_eq!(assigner.levels_up_to_height(6.98, None).len(), 2);
    }
}
