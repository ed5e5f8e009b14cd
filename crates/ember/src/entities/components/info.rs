use crate::entities::Component;

/// Human readable name of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoComponent {
    pub tag: String,
}

impl Component for InfoComponent {}

impl InfoComponent {
    pub fn new(tag: impl ToString) -> Self {
        Self {
            tag: tag.to_string(),
        }
    }
}

impl Default for InfoComponent {
    fn default() -> Self {
        Self::new("UnnamedEntity")
    }
}
