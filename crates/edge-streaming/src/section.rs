//! Independently rendered page parts.

use std::time::Duration;

/// A section is a named part of the page rendered after the shell.
#[derive(Debug, Clone)]
pub struct Section {
    /// Section name (used for logging and identification).
    pub name: String,
    /// Fallback HTML if the section fails or times out.
    pub fallback: Option<String>,
    /// Time allowed for the section to render.
    pub timeout: Option<Duration>,
}

impl Section {
    /// Create a new section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fallback: None,
            timeout: None,
        }
    }

    /// Create a section using the builder.
    pub fn builder(name: impl Into<String>) -> SectionBuilder {
        SectionBuilder::new(name)
    }
}

/// Builder for ergonomic section definition.
pub struct SectionBuilder {
    section: Section,
}

impl SectionBuilder {
    /// Create a new section builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            section: Section::new(name),
        }
    }

    /// Set fallback HTML.
    pub fn with_fallback(mut self, html: impl Into<String>) -> Self {
        self.section.fallback = Some(html.into());
        self
    }

    /// Set timeout for this section.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.section.timeout = Some(timeout);
        self
    }

    /// Build the section.
    pub fn build(self) -> Section {
        self.section
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let section = Section::builder("reviews")
            .with_fallback("<p>Reviews unavailable</p>")
            .with_timeout(Duration::from_millis(300))
            .build();

        assert_eq!(section.name, "reviews");
        assert_eq!(section.fallback.as_deref(), Some("<p>Reviews unavailable</p>"));
        assert_eq!(section.timeout, Some(Duration::from_millis(300)));
    }

    #[test]
    fn test_new_has_no_fallback() {
        let section = Section::new("hero");
        assert!(section.fallback.is_none());
        assert!(section.timeout.is_none());
    }
}
