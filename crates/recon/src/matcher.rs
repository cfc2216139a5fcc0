//! Inventor name acceptance rules.
//!
//! Two tiers: an exact comparison after case and whitespace normalization,
//! then (optionally) a token-prefix rule that tolerates omitted or
//! abbreviated middle names. The prefix rule is intentionally narrow: it
//! never accepts a different surname or an unrelated given name.

/// How a candidate name relates to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Exact,
    Fuzzy,
    None,
}

impl NameMatch {
    pub fn is_accepted(self) -> bool {
        !matches!(self, NameMatch::None)
    }
}

/// Lowercase and collapse runs of whitespace to a single space.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|t| t.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased tokens with trailing `.` / `,` stripped (`"M."` → `"m"`).
pub fn name_tokens(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(|t| t.trim_end_matches(['.', ',']).to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn exact_match(target: &str, candidate: &str) -> bool {
    let t = normalize_name(target);
    !t.is_empty() && t == normalize_name(candidate)
}

/// Token-prefix acceptance.
///
/// - first tokens must be prefix-compatible (`j` ~ `john`, not `john` ~ `jonathan`)
/// - last tokens must be equal
/// - every middle token of the shorter name must be prefix-compatible with
///   some middle token of the longer name, in any position; the longer name
///   may carry extra middle tokens
pub fn fuzzy_match(target: &str, candidate: &str) -> bool {
    let t = name_tokens(target);
    let c = name_tokens(candidate);

    let (Some(t_first), Some(c_first)) = (t.first(), c.first()) else {
        return false;
    };
    if !prefix_compatible(t_first, c_first) {
        return false;
    }
    if t.last() != c.last() {
        return false;
    }

    let (shorter, longer) = if t.len() <= c.len() { (&t, &c) } else { (&c, &t) };
    let pool = middle(longer);
    middle(shorter)
        .iter()
        .all(|tok| pool.iter().any(|cand| prefix_compatible(tok, cand)))
}

/// Exact first, then fuzzy when enabled.
pub fn match_name(target: &str, candidate: &str, fuzzy: bool) -> NameMatch {
    if exact_match(target, candidate) {
        NameMatch::Exact
    } else if fuzzy && fuzzy_match(target, candidate) {
        NameMatch::Fuzzy
    } else {
        NameMatch::None
    }
}

/// Case-insensitive substring test of `target` against each assignee.
pub fn assignee_matches(target: &str, assignees: &[String]) -> bool {
    let needle = normalize_name(target);
    if needle.is_empty() {
        return true;
    }
    assignees
        .iter()
        .any(|a| normalize_name(a).contains(&needle))
}

fn prefix_compatible(a: &str, b: &str) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

fn middle(tokens: &[String]) -> &[String] {
    if tokens.len() > 2 {
        &tokens[1..tokens.len() - 1]
    } else {
        &[]
    }
}
