//! Authorization enforcer: route gate and ownership gate.
//!
//! Both gates are explicit, testable functions rather than framework
//! interception. A mutating request must pass the route gate (resolved
//! principal with the right scope) and then the ownership gate before any
//! mutation is attempted.

use std::collections::HashSet;

use crate::error::AppError;
use crate::models::{Principal, Scope};

/// Operations the events API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    QueryEvents,
    GetEvent,
    CreateEvent,
    UpdateEvent,
}

/// Static route rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRule {
    Public,
    Authenticated { scope: Scope },
}

pub fn route_rule(operation: Operation) -> RouteRule {
    match operation {
        // Reads are public
        Operation::QueryEvents | Operation::GetEvent => RouteRule::Public,
        Operation::CreateEvent | Operation::UpdateEvent => RouteRule::Authenticated {
            scope: Scope::Write,
        },
    }
}

/// Authentication state resolved from a presented access token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
    pub scopes: HashSet<Scope>,
}

/// Route gate: evaluate the rule table against the resolved authentication
/// state. Missing or invalid credentials fail `Unauthenticated`; a valid
/// token without the required scope fails `Forbidden`.
pub fn authorize(operation: Operation, ctx: Option<&AuthContext>) -> Result<(), AppError> {
    match route_rule(operation) {
        RouteRule::Public => Ok(()),
        RouteRule::Authenticated { scope } => {
            let ctx = ctx.ok_or_else(|| {
                AppError::Unauthenticated(anyhow::anyhow!(
                    "A valid access token is required for this operation"
                ))
            })?;
            if !ctx.scopes.contains(&scope) {
                return Err(AppError::Forbidden(anyhow::anyhow!(
                    "Token lacks the {} scope",
                    scope
                )));
            }
            Ok(())
        }
    }
}

/// Ownership gate: an unowned resource is mutable by any authenticated
/// caller; once an owner is recorded, only that identity may mutate.
/// Compared by account identity, never by object identity.
pub fn check_owner(owner: Option<&str>, principal: &Principal) -> Result<(), AppError> {
    match owner {
        None => Ok(()),
        Some(owner) if owner == principal.email => Ok(()),
        Some(_) => Err(AppError::Forbidden(anyhow::anyhow!(
            "Only the event's manager may modify it"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn ctx(email: &str, scopes: HashSet<Scope>) -> AuthContext {
        AuthContext {
            principal: Principal {
                email: email.to_string(),
                roles: HashSet::from([Role::User]),
            },
            scopes,
        }
    }

    #[test]
    fn test_reads_are_public() {
        assert!(authorize(Operation::QueryEvents, None).is_ok());
        assert!(authorize(Operation::GetEvent, None).is_ok());
    }

    #[test]
    fn test_mutations_require_authentication() {
        let err = authorize(Operation::CreateEvent, None).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));

        let err = authorize(Operation::UpdateEvent, None).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[test]
    fn test_mutations_require_write_scope() {
        let read_only = ctx("b@x.com", HashSet::from([Scope::Read]));
        let err = authorize(Operation::CreateEvent, Some(&read_only)).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let writer = ctx("b@x.com", HashSet::from([Scope::Write]));
        assert!(authorize(Operation::CreateEvent, Some(&writer)).is_ok());
    }

    #[test]
    fn test_unowned_resource_is_mutable_by_anyone_authenticated() {
        let b = ctx("b@x.com", HashSet::from([Scope::Write]));
        assert!(check_owner(None, &b.principal).is_ok());
    }

    #[test]
    fn test_owner_passes_others_are_forbidden() {
        let owner = ctx("o@x.com", HashSet::from([Scope::Write]));
        let other = ctx("c@x.com", HashSet::from([Scope::Write]));

        assert!(check_owner(Some("o@x.com"), &owner.principal).is_ok());

        // Denied with Forbidden, distinct from Unauthenticated
        let err = check_owner(Some("o@x.com"), &other.principal).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
