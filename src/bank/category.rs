use std::fmt;

/// Topic grouping for questions, identified by its normalized name.
///
/// Normalization drops all whitespace, so `" Linear Algebra "` and
/// `"LinearAlgebra"` name the same category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category {
    name: String,
}

impl Category {
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name
            .as_ref()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        Self { name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_does_not_affect_identity() {
        assert_eq!(Category::new("  Linear  Algebra\t"), Category::new("LinearAlgebra"));
        assert_eq!(Category::new(" Linear Algebra ").name(), "LinearAlgebra");
    }

    #[test]
    fn blank_name_is_empty() {
        assert!(Category::new("   ").is_empty());
    }
}
