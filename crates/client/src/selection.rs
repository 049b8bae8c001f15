//! Dependent (cascading) selections.
//!
//! Category → subcategory → brand and state → LGA → area pickers share one
//! rule: a level's options depend on every level above it, so changing a
//! parent clears everything below it. The option data lives in an
//! [`OptionTree`]; a [`Cascade`] only remembers what was chosen.

use thiserror::Error;

use crate::models::{Category, LocationTree};

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Value submitted to the API.
    pub id: String,
    /// Text shown to the user.
    pub label: String,
}

impl Choice {
    fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Hierarchical option data.
pub trait OptionTree {
    /// Options for the level below `path`, where `path` holds the chosen ids
    /// of every level above. An unknown path yields no options.
    fn options(&self, path: &[String]) -> Vec<Choice>;
}

impl OptionTree for [Category] {
    fn options(&self, path: &[String]) -> Vec<Choice> {
        match path {
            [] => self
                .iter()
                .map(|c| Choice::new(c.id.as_str(), c.name.as_str()))
                .collect(),
            [category] => self
                .iter()
                .find(|c| c.id.as_str() == category.as_str())
                .map(|c| {
                    c.subcategories
                        .iter()
                        .map(|s| Choice::new(s.id.as_str(), s.name.as_str()))
                        .collect()
                })
                .unwrap_or_default(),
            [category, subcategory] => self
                .iter()
                .find(|c| c.id.as_str() == category.as_str())
                .and_then(|c| {
                    c.subcategories
                        .iter()
                        .find(|s| s.id.as_str() == subcategory.as_str())
                })
                .map(|s| {
                    s.brands
                        .iter()
                        .map(|b| Choice::new(b.id.as_str(), b.name.as_str()))
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

impl OptionTree for LocationTree {
    fn options(&self, path: &[String]) -> Vec<Choice> {
        match path {
            [] => named(self.states.iter().map(|s| s.name.as_str())),
            [state] => self
                .state(state)
                .map(|s| named(s.lgas.iter().map(|l| l.name.as_str())))
                .unwrap_or_default(),
            [state, lga] => self
                .lga(state, lga)
                .map(|l| named(l.areas.iter().map(String::as_str)))
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

fn named<'a>(names: impl Iterator<Item = &'a str>) -> Vec<Choice> {
    names.map(|name| Choice::new(name, name)).collect()
}

/// Errors raised by [`Cascade::select`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Level index beyond the cascade depth.
    #[error("level {level} does not exist")]
    NoSuchLevel {
        /// Requested level.
        level: usize,
    },
    /// A level above has no selection yet.
    #[error("choose the level above first")]
    ParentMissing {
        /// Requested level.
        level: usize,
    },
    /// The value is not among the level's current options.
    #[error("'{value}' is not an option here")]
    UnknownOption {
        /// Requested level.
        level: usize,
        /// Rejected value.
        value: String,
    },
}

/// The chosen ids of a `DEPTH`-level dependent selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade<const DEPTH: usize> {
    selected: [Option<String>; DEPTH],
}

impl<const DEPTH: usize> Default for Cascade<DEPTH> {
    fn default() -> Self {
        Self {
            selected: std::array::from_fn(|_| None),
        }
    }
}

impl<const DEPTH: usize> Cascade<DEPTH> {
    /// Nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chosen id at `level`.
    #[must_use]
    pub fn selected(&self, level: usize) -> Option<&str> {
        self.selected.get(level)?.as_deref()
    }

    /// Chosen ids from the top down to the first empty level.
    #[must_use]
    pub fn path(&self) -> Vec<String> {
        self.selected.iter().map_while(Clone::clone).collect()
    }

    /// Whether every level has a selection.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.selected.iter().all(Option::is_some)
    }

    /// Options currently available at `level`; empty until the parent is chosen.
    #[must_use]
    pub fn options<T: OptionTree + ?Sized>(&self, tree: &T, level: usize) -> Vec<Choice> {
        let path = self.path();
        if level >= DEPTH || path.len() < level {
            return Vec::new();
        }
        tree.options(path.get(..level).unwrap_or_default())
    }

    /// Choose `id` at `level`. A different value clears every deeper level;
    /// re-choosing the current value keeps them.
    ///
    /// # Errors
    ///
    /// Fails if the level does not exist, a parent is unset, or `id` is not
    /// among the level's options. The selection is unchanged on error.
    pub fn select<T: OptionTree + ?Sized>(
        &mut self,
        tree: &T,
        level: usize,
        id: &str,
    ) -> Result<(), SelectionError> {
        if level >= DEPTH {
            return Err(SelectionError::NoSuchLevel { level });
        }
        let path = self.path();
        let Some(parents) = path.get(..level) else {
            return Err(SelectionError::ParentMissing { level });
        };
        if !tree.options(parents).iter().any(|choice| choice.id == id) {
            return Err(SelectionError::UnknownOption {
                level,
                value: id.to_owned(),
            });
        }

        if self.selected(level) != Some(id) {
            self.clear(level);
            if let Some(slot) = self.selected.get_mut(level) {
                *slot = Some(id.to_owned());
            }
        }
        Ok(())
    }

    /// Clear `level` and every level below it.
    pub fn clear(&mut self, level: usize) {
        for slot in self.selected.iter_mut().skip(level) {
            *slot = None;
        }
    }

    /// Drop selections that are no longer offered, e.g. after the option
    /// data was reloaded. Returns whether anything was cleared.
    pub fn prune<T: OptionTree + ?Sized>(&mut self, tree: &T) -> bool {
        let path = self.path();
        for (level, id) in path.iter().enumerate() {
            let parents = path.get(..level).unwrap_or_default();
            if !tree.options(parents).iter().any(|choice| &choice.id == id) {
                self.clear(level);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{Brand, Lga, StateRegion, SubCategory};
    use kasuwa_core::{BrandId, CategoryId, SubCategoryId};

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: CategoryId::new("electronics"),
                name: "Electronics".to_string(),
                subcategories: vec![SubCategory {
                    id: SubCategoryId::new("phones"),
                    name: "Phones".to_string(),
                    brands: vec![Brand {
                        id: BrandId::new("tecno"),
                        name: "Tecno".to_string(),
                    }],
                }],
            },
            Category {
                id: CategoryId::new("fashion"),
                name: "Fashion".to_string(),
                subcategories: vec![SubCategory {
                    id: SubCategoryId::new("fabrics"),
                    name: "Fabrics".to_string(),
                    brands: Vec::new(),
                }],
            },
        ]
    }

    fn locations() -> LocationTree {
        LocationTree {
            states: vec![StateRegion {
                name: "Lagos".to_string(),
                lgas: vec![Lga {
                    name: "Ikeja".to_string(),
                    areas: vec!["Alausa".to_string(), "Opebi".to_string()],
                }],
            }],
        }
    }

    #[test]
    fn test_changing_parent_clears_children() {
        let tree = categories();
        let mut cascade = Cascade::<3>::new();
        cascade.select(tree.as_slice(), 0, "electronics").unwrap();
        cascade.select(tree.as_slice(), 1, "phones").unwrap();
        cascade.select(tree.as_slice(), 2, "tecno").unwrap();
        assert!(cascade.is_complete());

        cascade.select(tree.as_slice(), 0, "electronics").unwrap();
        assert_eq!(cascade.selected(2), Some("tecno"), "same value keeps children");

        cascade.select(tree.as_slice(), 0, "fashion").unwrap();
        assert_eq!(cascade.selected(1), None);
        assert_eq!(cascade.selected(2), None);
    }

    #[test]
    fn test_child_must_belong_to_parent() {
        let tree = categories();
        let mut cascade = Cascade::<3>::new();
        cascade.select(tree.as_slice(), 0, "fashion").unwrap();
        assert_eq!(
            cascade.select(tree.as_slice(), 1, "phones"),
            Err(SelectionError::UnknownOption {
                level: 1,
                value: "phones".to_string()
            })
        );
        assert_eq!(cascade.selected(1), None);
    }

    #[test]
    fn test_parent_required() {
        let tree = locations();
        let mut cascade = Cascade::<3>::new();
        assert_eq!(
            cascade.select(&tree, 1, "Ikeja"),
            Err(SelectionError::ParentMissing { level: 1 })
        );
        assert_eq!(
            cascade.select(&tree, 3, "x"),
            Err(SelectionError::NoSuchLevel { level: 3 })
        );
        assert!(cascade.options(&tree, 1).is_empty());
    }

    #[test]
    fn test_options_follow_selection() {
        let tree = locations();
        let mut cascade = Cascade::<3>::new();
        cascade.select(&tree, 0, "Lagos").unwrap();
        cascade.select(&tree, 1, "Ikeja").unwrap();
        let areas: Vec<String> = cascade
            .options(&tree, 2)
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(areas, vec!["Alausa".to_string(), "Opebi".to_string()]);
    }

    #[test]
    fn test_prune_after_reload() {
        let mut tree = locations();
        let mut cascade = Cascade::<3>::new();
        cascade.select(&tree, 0, "Lagos").unwrap();
        cascade.select(&tree, 1, "Ikeja").unwrap();
        cascade.select(&tree, 2, "Opebi").unwrap();

        assert!(!cascade.prune(&tree));

        tree.states[0].lgas[0].areas.retain(|a| a != "Opebi");
        assert!(cascade.prune(&tree));
        assert_eq!(cascade.path(), vec!["Lagos".to_string(), "Ikeja".to_string()]);
    }
}
