//! State categories and per-category slot maps

use serde::{Deserialize, Serialize};
use std::fmt;

/// A kind of session state captured by the timeline
///
/// Declaration order is the restore order. Some restores depend on others
/// having run first: unit affiliation (roster) must be in place before unit
/// placement and cursor restores look units up, so `Cursor` is last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Unit stats, items and affiliation
    Roster,
    /// Unit map positions and visibility
    UnitPlacement,
    /// Terrain data per map cell
    MapTiles,
    /// Rendered tile graphics per map cell
    TileGraphics,
    /// Switch table
    Switches,
    /// Variable table
    Variables,
    /// Shared item stock
    Inventory,
    /// Per-shop stock
    Shops,
    /// Party gold
    Gold,
    /// Turn number and active phase
    TurnState,
    /// Session RNG seed
    RngSeed,
    /// Map cursor position
    Cursor,
}

/// How a category's captured value is diffed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Compared and recorded as one whole value
    Scalar,
    /// An array diffed per element by position
    Indexed,
}

impl Category {
    /// Number of categories
    pub const COUNT: usize = 12;

    /// Every category, in restore order
    pub const ALL: [Category; Category::COUNT] = [
        Category::Roster,
        Category::UnitPlacement,
        Category::MapTiles,
        Category::TileGraphics,
        Category::Switches,
        Category::Variables,
        Category::Inventory,
        Category::Shops,
        Category::Gold,
        Category::TurnState,
        Category::RngSeed,
        Category::Cursor,
    ];

    /// Slot index of this category
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable key used in persisted history
    pub fn key(self) -> &'static str {
        match self {
            Category::Roster => "roster",
            Category::UnitPlacement => "unit_placement",
            Category::MapTiles => "map_tiles",
            Category::TileGraphics => "tile_graphics",
            Category::Switches => "switches",
            Category::Variables => "variables",
            Category::Inventory => "inventory",
            Category::Shops => "shops",
            Category::Gold => "gold",
            Category::TurnState => "turn_state",
            Category::RngSeed => "rng_seed",
            Category::Cursor => "cursor",
        }
    }

    /// Look a category up by its persisted key
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.key() == key)
    }

    pub fn shape(self) -> Shape {
        match self {
            Category::Roster
            | Category::UnitPlacement
            | Category::MapTiles
            | Category::TileGraphics
            | Category::Switches
            | Category::Variables
            | Category::Inventory
            | Category::Shops => Shape::Indexed,
            Category::Gold | Category::TurnState | Category::RngSeed | Category::Cursor => {
                Shape::Scalar
            }
        }
    }

    /// Whether a preview restore may touch this category
    ///
    /// Only positional and visual state qualifies; nothing a preview
    /// restores may feed back into game rules.
    pub fn preview_safe(self) -> bool {
        match self {
            Category::UnitPlacement | Category::TileGraphics | Category::Cursor => true,
            Category::Roster
            | Category::MapTiles
            | Category::Switches
            | Category::Variables
            | Category::Inventory
            | Category::Shops
            | Category::Gold
            | Category::TurnState
            | Category::RngSeed => false,
        }
    }

    /// Whether records remember the values their changes overwrote
    pub fn keeps_prior_values(self) -> bool {
        matches!(self, Category::MapTiles | Category::TileGraphics)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One optional slot per [`Category`], iterated in restore order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMap<T> {
    slots: [Option<T>; Category::COUNT],
}

impl<T> CategoryMap<T> {
    /// Create a map with every slot empty
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub fn get(&self, category: Category) -> Option<&T> {
        self.slots[category.index()].as_ref()
    }

    pub fn get_mut(&mut self, category: Category) -> Option<&mut T> {
        self.slots[category.index()].as_mut()
    }

    /// Fill a slot, returning its previous content
    pub fn insert(&mut self, category: Category, value: T) -> Option<T> {
        self.slots[category.index()].replace(value)
    }

    pub fn remove(&mut self, category: Category) -> Option<T> {
        self.slots[category.index()].take()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.slots[category.index()].is_some()
    }

    /// Number of filled slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Filled slots in restore order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL
            .into_iter()
            .zip(self.slots.iter())
            .filter_map(|(c, slot)| slot.as_ref().map(|v| (c, v)))
    }

    /// Categories with a filled slot, in restore order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.iter().map(|(c, _)| c)
    }
}

impl<T> Default for CategoryMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for CategoryMap<T> {
    type Item = (Category, T);
    type IntoIter = std::vec::IntoIter<(Category, T)>;

    fn into_iter(self) -> Self::IntoIter {
        Category::ALL
            .into_iter()
            .zip(self.slots)
            .filter_map(|(c, slot)| slot.map(|v| (c, v)))
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl<T> FromIterator<(Category, T)> for CategoryMap<T> {
    fn from_iter<I: IntoIterator<Item = (Category, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (category, value) in iter {
            map.insert(category, value);
        }
        map
    }
}
