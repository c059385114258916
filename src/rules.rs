//! Exemption and format rules for docstring compliance.

use crate::entity::{DocumentableEntity, EntityKind};
use crate::issue::{Issue, IssueCategory};

/// Decide whether an entity is required to carry a docstring.
///
/// Modules are always required. Classes, functions, and methods are exempt
/// when private (single leading underscore). Dunder methods are part of an
/// object's protocol surface and are always required, overriding the
/// private rule.
pub fn requires_docstring(entity: &DocumentableEntity) -> bool {
    match entity.kind {
        EntityKind::Module => true,
        _ => entity.is_dunder() || !entity.is_private(),
    }
}

/// Apply the format rules to one entity, in fixed order.
///
/// `missing` and `empty` are terminal: nothing else is checked once either
/// fires. The two format rules can co-occur on the same docstring.
pub fn validate(entity: &DocumentableEntity) -> Vec<Issue> {
    let docstring = match &entity.docstring {
        Some(d) => d,
        None => {
            return vec![entity_issue(
                entity,
                IssueCategory::Missing,
                format!("{} is missing a docstring", entity.describe()),
            )];
        }
    };

    let trimmed = docstring.trim();
    if trimmed.is_empty() {
        return vec![entity_issue(
            entity,
            IssueCategory::Empty,
            format!("{} has an empty docstring", entity.describe()),
        )];
    }

    let mut issues = Vec::new();

    // First alphabetic character must be uppercase; leading digits and
    // punctuation are skipped. A docstring with no alphabetic character
    // is exempt from this rule.
    if let Some(first) = trimmed.chars().find(|c| c.is_alphabetic()) {
        if !first.is_uppercase() {
            issues.push(entity_issue(
                entity,
                IssueCategory::FormatCapitalization,
                format!(
                    "docstring for {} should start with a capital letter (found '{}')",
                    entity.describe(),
                    first
                ),
            ));
        }
    }

    // Single-line docstrings must end with a period. Multi-line docstrings
    // are exempt.
    if !trimmed.contains('\n') && !trimmed.ends_with('.') {
        issues.push(entity_issue(
            entity,
            IssueCategory::FormatPunctuation,
            format!(
                "single-line docstring for {} should end with a period",
                entity.describe()
            ),
        ));
    }

    issues
}

fn entity_issue(entity: &DocumentableEntity, category: IssueCategory, message: String) -> Issue {
    Issue {
        category,
        message,
        line: entity.start_line,
        entity_kind: Some(entity.kind),
        qualified_name: Some(entity.qualified_name.clone()),
    }
}
