use std::sync::LazyLock;

use regex::Regex;

/// Table used when no rule recognises the prompt.
pub const DEFAULT_TABLE: &str = "users";

struct Rule {
    name: &'static str,
    pattern: Regex,
    /// Rejects a capture of the bare word `all`, which belongs to the bulk rule.
    reject_all: bool,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, reject_all: bool) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("resolver patterns are valid"),
            reject_all,
        }
    }

    fn apply<'a>(&self, prompt: &'a str) -> Option<&'a str> {
        let ident = self.pattern.captures(prompt)?.get(1)?.as_str();
        if self.reject_all && ident.eq_ignore_ascii_case("all") {
            return None;
        }
        Some(ident)
    }
}

// Most specific first. Each rule only looks at its own first match.
// `\w` is Unicode-aware, so non-ASCII table names resolve whole.
static RULES: LazyLock<[Rule; 5]> = LazyLock::new(|| {
    [
        Rule::new("explicit", r"(?i)(?:from|table)\s+(\w+)", false),
        Rule::new("bulk", r"(?i)(?:get|fetch|select|show)\s+all\s+(\w+)", false),
        Rule::new("verb", r"(?i)(?:get|fetch|select|show)\s+(\w+)", true),
        Rule::new(
            "pagination",
            r"(?i)(\w+)\s+(?:with|and)\s+(?:pagination|limit)",
            true,
        ),
        Rule::new("loose-all", r"(?i)\ball\s+(\w+)", false),
    ]
});

/// Returns the table named by `prompt`, falling back to [`DEFAULT_TABLE`].
pub fn resolve(prompt: &str) -> String {
    resolve_with_rule(prompt).0
}

/// Like [`resolve`], also naming the rule that fired (`"default"` for the fallback).
pub fn resolve_with_rule(prompt: &str) -> (String, &'static str) {
    RULES
        .iter()
        .find_map(|rule| rule.apply(prompt).map(|ident| (ident.to_string(), rule.name)))
        .unwrap_or_else(|| (DEFAULT_TABLE.to_string(), "default"))
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_TABLE, resolve, resolve_with_rule};

    const TABLES: &[&str] = &["orders", "customer_accounts", "Invoices", "t1"];

    #[test]
    fn explicit_reference_wins_over_every_other_rule() {
        for &table in TABLES {
            for prompt in [
                format!("get all widgets from {table} with pagination"),
                format!("show all widgets and limit from {table}"),
                format!("fetch widgets using table {table}"),
                format!("all widgets FROM {table}"),
            ] {
                assert_eq!(resolve_with_rule(&prompt), (table.to_string(), "explicit"));
            }
        }
    }

    #[test]
    fn bulk_phrasing_beats_single_verb() {
        for &table in TABLES {
            let prompt = format!("Get all {table} with pagination");
            assert_eq!(resolve_with_rule(&prompt), (table.to_string(), "bulk"));
        }
    }

    #[test]
    fn verb_rule_takes_the_next_word() {
        for &table in TABLES {
            let prompt = format!("please fetch {table} ordered by date");
            assert_eq!(resolve_with_rule(&prompt), (table.to_string(), "verb"));
        }
    }

    #[test]
    fn verb_rule_never_returns_all() {
        // "show all" with nothing after it must fall through to later rules.
        assert_eq!(
            resolve_with_rule("products with pagination, show all"),
            ("products".to_string(), "pagination")
        );
        assert_eq!(resolve("show all"), DEFAULT_TABLE);
    }

    #[test]
    fn pagination_rule_takes_preceding_word() {
        assert_eq!(
            resolve_with_rule("list payments and limit"),
            ("payments".to_string(), "pagination")
        );
    }

    #[test]
    fn pagination_rule_skips_all() {
        // Rule 4 captures "all" and declines, so only the loose rule is left.
        assert_eq!(
            resolve_with_rule("list all with pagination"),
            ("with".to_string(), "loose-all")
        );
        let (table, rule) = resolve_with_rule("all and limit");
        assert_ne!(table, "all");
        assert_eq!((table.as_str(), rule), ("and", "loose-all"));
    }

    #[test]
    fn loose_all_is_last_resort() {
        assert_eq!(
            resolve_with_rule("I need all shipments"),
            ("shipments".to_string(), "loose-all")
        );
        // `\ball` must not fire inside another word.
        assert_eq!(resolve("install packages"), DEFAULT_TABLE);
    }

    #[test]
    fn unrecognised_prompts_fall_back() {
        for prompt in ["", "hello there", "paginate please", "list everything"] {
            assert_eq!(resolve_with_rule(prompt), (DEFAULT_TABLE.to_string(), "default"));
        }
    }

    #[test]
    fn identifiers_may_contain_non_ascii_letters() {
        assert_eq!(
            resolve_with_rule("get all café_orders"),
            ("café_orders".to_string(), "bulk")
        );
        assert_eq!(resolve("select from größe"), "größe");
    }

    #[test]
    fn capture_keeps_original_case() {
        assert_eq!(resolve("GET ALL Orders"), "Orders");
    }
}
