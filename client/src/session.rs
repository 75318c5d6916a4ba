//! Explicit session value

use serde::{Deserialize, Serialize};

/// Who is signed in, and how to prove it to the backend
///
/// Sessions opened against the local store carry no token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    pub fn remote(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: Some(token.into()),
        }
    }

    pub fn local(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: None,
        }
    }

    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
