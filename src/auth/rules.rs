//! Rule evaluation.
//!
//! Method names arrive as `/<package>.<Service>/<Method>`. The package prefix
//! is stripped and both segments are compared lower-case against each rule;
//! a rule grants the call when one of its services and one of its apis match.

use std::borrow::Cow;

use super::{AuthError, Claims, Rule};

/// Prefix stripped from the lower-cased service segment.
pub const SERVICE_PREFIX: &str = "openstorage.api.openstorage";

const WILDCARD: &str = "*";

/// Rules of a built-in role, if `role` names one.
pub fn builtin_role(role: &str) -> Option<Vec<Rule>> {
    match role {
        "admin" => Some(vec![Rule::allow_all()]),
        _ => None,
    }
}

/// Splits a full method path into lower-cased `(service, api)`.
///
/// Returns `None` when the path has no `/<service>/<api>` shape.
pub fn parse_method(full_method: &str) -> Option<(String, String)> {
    let trimmed = full_method.strip_prefix('/').unwrap_or(full_method);
    let (service, api) = trimmed.split_once('/')?;
    if service.is_empty() || api.is_empty() || api.contains('/') {
        return None;
    }
    let service = service.to_lowercase();
    let service = service
        .strip_prefix(SERVICE_PREFIX)
        .map(str::to_string)
        .unwrap_or(service);
    Some((service, api.to_lowercase()))
}

fn matches(patterns: &[String], value: &str) -> bool {
    patterns
        .iter()
        .any(|p| p == WILDCARD || p.eq_ignore_ascii_case(value))
}

/// True when at least one rule grants `api` on `service`.
pub fn is_authorized(rules: &[Rule], service: &str, api: &str) -> bool {
    rules
        .iter()
        .any(|rule| matches(&rule.services, service) && matches(&rule.apis, api))
}

/// [`is_authorized`] over a full method path.
pub fn authorize_method(rules: &[Rule], full_method: &str) -> bool {
    match parse_method(full_method) {
        Some((service, api)) => is_authorized(rules, &service, &api),
        None => false,
    }
}

/// Effective rules for a caller: explicit rules win, then the role table.
pub fn resolve_rules(claims: &Claims) -> Result<Cow<'_, [Rule]>, AuthError> {
    if !claims.rules.is_empty() {
        return Ok(Cow::Borrowed(&claims.rules));
    }
    if claims.role.is_empty() {
        return Err(AuthError::NoRolesOrRules);
    }
    builtin_role(&claims.role)
        .map(Cow::Owned)
        .ok_or_else(|| AuthError::UnknownRole(claims.role.clone()))
}
