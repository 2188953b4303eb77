use serde::{Deserialize, Serialize};

/// Display name + email of a commit's author.
///
/// The canonical *contributor key* is the lowercased email; an empty email
/// yields an empty key, which is treated as its own identity (distinct from
/// every named contributor, but equal to every other anonymous one).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// The canonical key used to group commits by contributor.
    pub fn contributor_key(&self) -> String {
        self.email.to_lowercase()
    }
}
