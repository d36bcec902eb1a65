//! Static query advice.
//!
//! A fixed table of text rules applied to the lowercased statement. Every
//! matching rule contributes its message; nothing here touches a database.

/// Returned when no rule matches.
pub const NO_SUGGESTIONS: &str = "No optimizations detected.";

/// A single advisory rule.
struct Rule {
    applies: fn(&str) -> bool,
    message: &'static str,
}

static RULES: &[Rule] = &[
    Rule {
        applies: unscoped_wildcard,
        message: "Avoid 'SELECT *' without a WHERE clause.",
    },
    Rule {
        applies: has_where,
        message: "Ensure indexed columns are used in WHERE.",
    },
];

fn unscoped_wildcard(q: &str) -> bool {
    q.contains("select *") && !has_where(q)
}

fn has_where(q: &str) -> bool {
    q.contains("where")
}

/// Advice for `sql`, one message per line.
pub fn suggest_optimization(sql: &str) -> String {
    let lowered = sql.to_lowercase();
    let suggestions: Vec<&str> = RULES
        .iter()
        .filter(|rule| (rule.applies)(&lowered))
        .map(|rule| rule.message)
        .collect();

    if suggestions.is_empty() {
        NO_SUGGESTIONS.to_string()
    } else {
        suggestions.join("\n")
    }
}
