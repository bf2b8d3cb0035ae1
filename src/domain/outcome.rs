//! Result of an operation that may end benignly without applying anything.

/// Either the change was applied, or it was declined with an
/// informational message (duplicate name, self-demotion, ...).
///
/// Declined is not an error: nothing was wrong with the request
/// beyond it having no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Declined(String),
}

impl<T> Outcome<T> {
    pub fn declined(message: impl Into<String>) -> Self {
        Outcome::Declined(message.into())
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Declined(_) => None,
        }
    }
}
