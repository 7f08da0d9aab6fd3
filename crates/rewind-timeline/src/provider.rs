//! Capture providers: the seam between the timeline and live session state
//!
//! The timeline never knows what a unit or a switch is. Each category is
//! backed by a provider that reads the authoritative state into a [`Value`]
//! and writes a [`Value`] back. The session state type `S` is passed into
//! every call, so providers hold no references into it.
//!
//! # Example
//!
//! ```
//! use rewind_core::Value;
//! use rewind_timeline::{Category, ProviderRegistry};
//!
//! struct Session {
//!     gold: i64,
//! }
//!
//! let mut registry = ProviderRegistry::new();
//! registry.register_fn(
//!     Category::Gold,
//!     |s: &Session| Value::from(s.gold),
//!     |s: &mut Session, v: &Value| s.gold = v.as_i64().unwrap_or(0),
//! );
//!
//! let mut session = Session { gold: 30 };
//! let captured = registry.capture(Category::Gold, &session).unwrap();
//! session.gold = 0;
//! registry.restore(Category::Gold, &mut session, &captured);
//! assert_eq!(session.gold, 30);
//! ```

use crate::category::{Category, CategoryMap};
use rewind_core::Value;
use std::fmt;

/// Capture and restore for one category of session state
///
/// `restore` must be a total overwrite: restoring the same value twice
/// leaves the same state as restoring it once. A value whose shape does not
/// match what the provider itself captured is a precondition violation.
pub trait CaptureProvider<S> {
    /// Read the live state of this category
    fn capture(&self, state: &S) -> Value;

    /// Overwrite the live state of this category
    fn restore(&self, state: &mut S, value: &Value);
}

/// A provider built from a pair of closures
pub struct FnProvider<C, R> {
    capture: C,
    restore: R,
}

impl<C, R> FnProvider<C, R> {
    pub fn new(capture: C, restore: R) -> Self {
        Self { capture, restore }
    }
}

impl<S, C, R> CaptureProvider<S> for FnProvider<C, R>
where
    C: Fn(&S) -> Value,
    R: Fn(&mut S, &Value),
{
    fn capture(&self, state: &S) -> Value {
        (self.capture)(state)
    }

    fn restore(&self, state: &mut S, value: &Value) {
        (self.restore)(state, value)
    }
}

/// The set of providers registered for a session, one per category
pub struct ProviderRegistry<S> {
    providers: CategoryMap<Box<dyn CaptureProvider<S>>>,
}

impl<S> ProviderRegistry<S> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            providers: CategoryMap::new(),
        }
    }

    /// Register the provider for a category, replacing any earlier one
    pub fn register(&mut self, category: Category, provider: impl CaptureProvider<S> + 'static) {
        self.providers.insert(category, Box::new(provider));
    }

    /// Register a provider from capture/restore closures
    pub fn register_fn<C, R>(&mut self, category: Category, capture: C, restore: R)
    where
        C: Fn(&S) -> Value + 'static,
        R: Fn(&mut S, &Value) + 'static,
    {
        self.register(category, FnProvider::new(capture, restore));
    }

    pub fn is_registered(&self, category: Category) -> bool {
        self.providers.contains(category)
    }

    /// Registered categories, in restore order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.providers.categories()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Capture one category, if a provider is registered for it
    pub fn capture(&self, category: Category, state: &S) -> Option<Value> {
        self.providers.get(category).map(|p| p.capture(state))
    }

    /// Capture every registered category
    pub fn capture_all(&self, state: &S) -> CategoryMap<Value> {
        self.providers
            .iter()
            .map(|(category, p)| (category, p.capture(state)))
            .collect()
    }

    /// Restore one category; returns false if nothing is registered for it
    pub fn restore(&self, category: Category, state: &mut S, value: &Value) -> bool {
        match self.providers.get(category) {
            Some(p) => {
                p.restore(state, value);
                true
            }
            None => false,
        }
    }
}

impl<S> Default for ProviderRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for ProviderRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("categories", &self.categories().collect::<Vec<_>>())
            .finish()
    }
}
