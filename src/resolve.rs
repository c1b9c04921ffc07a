//! Lazy precedence lists.
//!
//! Most presentation properties are looked up in several places (run,
//! paragraph, shape, layout, master, theme) and the first place that defines
//! the property wins. [`Resolver`] keeps that order explicit: sources are
//! evaluated lazily in insertion order and evaluation stops at the first hit.

/// Ordered list of named lookup sources for one property.
pub struct Resolver<'a, T> {
    sources: Vec<(&'static str, Box<dyn FnOnce() -> Option<T> + 'a>)>,
}

impl<'a, T> Default for Resolver<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> Resolver<'a, T> {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a source; sources are consulted in the order they are added.
    pub fn source(mut self, name: &'static str, lookup: impl FnOnce() -> Option<T> + 'a) -> Self {
        self.sources.push((name, Box::new(lookup)));
        self
    }

    /// First value produced by any source.
    pub fn resolve(self) -> Option<T> {
        self.resolve_named().map(|(_, value)| value)
    }

    /// First value produced by any source, with the name of the source.
    pub fn resolve_named(self) -> Option<(&'static str, T)> {
        for (name, lookup) in self.sources {
            if let Some(value) = lookup() {
                log::trace!("resolved from {}", name);
                return Some((name, value));
            }
        }
        None
    }

    /// First value, or `fallback` when no source defines one.
    pub fn resolve_or(self, fallback: T) -> T {
        self.resolve().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_first_source_wins() {
        let value = Resolver::new()
            .source("run", || None)
            .source("paragraph", || Some(12))
            .source("master", || Some(18))
            .resolve_named();
        assert_eq!(value, Some(("paragraph", 12)));
    }

    #[test]
    fn test_lazy_short_circuit() {
        let calls = Cell::new(0);
        let value = Resolver::new()
            .source("a", || {
                calls.set(calls.get() + 1);
                Some("x")
            })
            .source("b", || {
                calls.set(calls.get() + 1);
                Some("y")
            })
            .resolve();
        assert_eq!(value, Some("x"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_fallback() {
        let value: u32 = Resolver::new().source("none", || None).resolve_or(7);
        assert_eq!(value, 7);
    }
}
