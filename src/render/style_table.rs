//! Style deduplication.
//!
//! Identical computed CSS blocks are interned once and referenced by a
//! generated class name, so the stylesheet grows with the number of distinct
//! styles rather than the number of styled elements.

use std::collections::HashMap;

/// Prefix of generated class names.
pub const CLASS_PREFIX: &str = "_css_";

/// One interned style block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    pub css_text: String,
    pub class_name: String,
}

/// Map from CSS text to its generated class, in insertion order.
#[derive(Debug, Default)]
pub struct StyleTable {
    index: HashMap<String, usize>,
    entries: Vec<StyleEntry>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Class name for `css_text`, interning it on first use.
    pub fn intern(&mut self, css_text: &str) -> &str {
        let position = match self.index.get(css_text) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.entries.push(StyleEntry {
                    css_text: css_text.to_string(),
                    class_name: format!("{}{}", CLASS_PREFIX, position),
                });
                self.index.insert(css_text.to_string(), position);
                position
            }
        };
        &self.entries[position].class_name
    }

    /// `class="..."` attribute for `css_text`, or nothing when it is empty.
    pub fn class_attr(&mut self, css_text: &str) -> String {
        if css_text.is_empty() {
            return String::new();
        }
        format!(" class=\"{}\"", self.intern(css_text))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StyleEntry] {
        &self.entries
    }

    /// Aggregate stylesheet, one rule per entry in insertion order.
    pub fn stylesheet(&self) -> String {
        let mut css = String::new();
        for entry in &self.entries {
            css.push('.');
            css.push_str(&entry.class_name);
            css.push('{');
            css.push_str(&entry.css_text);
            css.push_str("}\n");
        }
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_idempotent() {
        let mut table = StyleTable::new();
        let first = table.intern("color:#FF0000;").to_string();
        let again = table.intern("color:#FF0000;").to_string();
        assert_eq!(first, again);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_distinct_styles_get_distinct_classes() {
        let mut table = StyleTable::new();
        let a = table.intern("color:#FF0000;").to_string();
        let b = table.intern("color:#00FF00;").to_string();
        assert_ne!(a, b);
        assert_eq!(a, "_css_0");
        assert_eq!(b, "_css_1");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_stylesheet_order() {
        let mut table = StyleTable::new();
        table.intern("font-weight:bold;");
        table.intern("font-style:italic;");
        table.intern("font-weight:bold;");
        assert_eq!(
            table.stylesheet(),
            "._css_0{font-weight:bold;}\n._css_1{font-style:italic;}\n"
        );
        assert_eq!(table.class_attr(""), "");
        assert_eq!(table.class_attr("font-style:italic;"), " class=\"_css_1\"");
    }
}
