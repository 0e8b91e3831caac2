//! Event visibility and action permissions.
//!
//! `EventScope` is the set of events a caller may see. Storage turns it
//! into a `WHERE` clause and `EventScope::includes` evaluates the same
//! rule against a single event; the two must agree.

use crate::domain::{Event, UserRole};
use crate::error::{EventError, EventResult};

/// The identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// No credentials were presented.
    Anonymous,
    /// A caller holding a valid token.
    User { id: String, role: UserRole },
}

impl Caller {
    /// Build an authenticated caller.
    pub fn user(id: impl Into<String>, role: UserRole) -> Self {
        Caller::User {
            id: id.into(),
            role,
        }
    }

    /// The caller's user ID, if authenticated.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Caller::Anonymous => None,
            Caller::User { id, .. } => Some(id.as_str()),
        }
    }

    pub fn is_superuser(&self) -> bool {
        matches!(self, Caller::User { role, .. } if role.is_superuser())
    }

    /// The caller's user ID, or `401` for anonymous callers.
    pub fn require_user(&self) -> EventResult<&str> {
        self.user_id()
            .ok_or_else(|| EventError::Unauthorized("Authentication required".to_string()))
    }

    /// Events this caller may see.
    pub fn scope(&self) -> EventScope {
        match self {
            Caller::Anonymous => EventScope::VerifiedOnly,
            Caller::User { role, .. } if role.is_superuser() => EventScope::All,
            Caller::User { id, .. } => EventScope::OwnedOrVerified(id.clone()),
        }
    }

    /// Whether this caller may see `event`. Storage applies the same rule
    /// as a query predicate.
    #[allow(dead_code)]
    pub fn can_view(&self, event: &Event) -> bool {
        self.scope().includes(event)
    }

    /// Reject a change to the verification flag unless the caller is a superuser.
    pub fn check_verification_change(
        &self,
        current: bool,
        requested: Option<bool>,
    ) -> EventResult<()> {
        match requested {
            Some(value) if value != current && !self.is_superuser() => {
                Err(EventError::Forbidden(
                    "Only superusers can change event verification".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// The set of events visible to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventScope {
    /// Verified events only.
    VerifiedOnly,
    /// Every event.
    All,
    /// Events created by the given user plus all verified events.
    OwnedOrVerified(String),
}

impl EventScope {
    pub fn includes(&self, event: &Event) -> bool {
        match self {
            EventScope::VerifiedOnly => event.is_verified,
            EventScope::All => true,
            EventScope::OwnedOrVerified(user_id) => {
                event.is_verified || event.created_by == *user_id
            }
        }
    }
}

/// Operations exposed on the event resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::List => write!(f, "list"),
            EventAction::Retrieve => write!(f, "retrieve"),
            EventAction::Create => write!(f, "create"),
            EventAction::Update => write!(f, "update"),
            EventAction::PartialUpdate => write!(f, "partial_update"),
            EventAction::Destroy => write!(f, "destroy"),
        }
    }
}

impl EventAction {
    /// Reads are open to anyone; everything else needs a user.
    pub fn requires_authentication(&self) -> bool {
        !matches!(self, EventAction::List | EventAction::Retrieve)
    }

    /// Check whether `caller` may perform this action at all.
    pub fn authorize(&self, caller: &Caller) -> EventResult<()> {
        if self.requires_authentication() {
            caller.require_user().map_err(|e| {
                tracing::debug!(action = %self, "Anonymous caller rejected");
                e
            })?;
        }
        Ok(())
    }
}
