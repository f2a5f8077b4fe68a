//! Synonym groups for skills and job-type aliases.

use std::collections::BTreeSet;

/// Canonical concept → surface forms. Values are lowercase.
pub const SYNONYM_GROUPS: &[(&str, &[&str])] = &[
    ("python", &["python", "py", "django", "flask", "pandas", "numpy"]),
    (
        "javascript",
        &["javascript", "js", "node", "react", "vue", "angular", "typescript"],
    ),
    ("java", &["java", "spring", "hibernate", "jsp"]),
    (
        "developer",
        &["developer", "programmer", "coder", "engineer", "software engineer", "dev"],
    ),
    ("designer", &["designer", "ui", "ux", "graphic designer", "web designer"]),
    ("writer", &["writer", "content writer", "copywriter", "blogger", "author"]),
    ("manager", &["manager", "supervisor", "lead", "director"]),
    (
        "analyst",
        &["analyst", "data analyst", "business analyst", "financial analyst"],
    ),
    ("assistant", &["assistant", "admin", "administrative", "secretary"]),
    (
        "customer",
        &["customer service", "support", "help desk", "client service"],
    ),
    (
        "remote",
        &["remote", "work from home", "wfh", "telecommute", "distributed"],
    ),
    ("full-time", &["full-time", "fulltime", "ft", "permanent"]),
    ("part-time", &["part-time", "parttime", "pt", "casual"]),
];

/// Returns `token` plus every surface form of every group it belongs to.
///
/// A token belongs to a group when it equals the group key or one of its values.
/// Matches across several groups are unioned. The set is ordered so iteration is
/// deterministic.
pub fn expand(token: &str) -> BTreeSet<String> {
    expand_in(SYNONYM_GROUPS, token)
}

fn expand_in(groups: &[(&str, &[&str])], token: &str) -> BTreeSet<String> {
    let token = token.to_lowercase();
    let mut related = BTreeSet::new();

    for (key, values) in groups {
        if *key == token || values.contains(&token.as_str()) {
            related.extend(values.iter().map(|v| v.to_string()));
        }
    }

    related.insert(token);
    related
}
