//! Source lints for click actions.
//!
//! - Every action id declared in `src/clicker/actions.rs` must be registered
//!   as a click target by `render.rs` and dispatched by `mod.rs`. An id that
//!   is only rendered does nothing when tapped; an id that is only dispatched
//!   can never be tapped.
//! - `[X]`-style key hints in `render.rs` must be pushed with
//!   `push_clickable()`, otherwise the hint looks tappable but is not.

use std::fs;
use std::path::Path;

fn read_source(rel: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(rel);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}

/// Names of `pub const NAME: u16` declarations.
fn action_names(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("pub const ")?;
            let (name, ty) = rest.split_once(':')?;
            ty.trim_start().starts_with("u16").then(|| name.trim().to_string())
        })
        .collect()
}

/// Whether `name` appears in `source` as a whole identifier outside comments.
fn mentions(source: &str, name: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    source
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .any(|line| {
            line.match_indices(name).any(|(i, _)| {
                let before = line[..i].chars().next_back();
                let after = line[i + name.len()..].chars().next();
                !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
            })
        })
}

#[test]
fn action_ids_are_declared() {
    let names = action_names(&read_source("src/clicker/actions.rs"));
    assert!(names.contains(&"CLICK_BUTTON".to_string()));
    assert!(names.contains(&"CELL_BASE".to_string()));
}

#[test]
fn every_action_is_registered_and_dispatched() {
    let actions = read_source("src/clicker/actions.rs");
    let render = read_source("src/clicker/render.rs");
    let dispatch = read_source("src/clicker/mod.rs");

    let mut problems = Vec::new();
    for name in action_names(&actions) {
        if !mentions(&render, &name) {
            problems.push(format!("{} is never registered in render.rs", name));
        }
        if !mentions(&dispatch, &name) {
            problems.push(format!("{} is never dispatched in mod.rs", name));
        }
    }
    assert!(problems.is_empty(), "{}", problems.join("\n"));
}

/// `[I]`, `[u]`, `[1]` and similar key hints.
fn contains_bracket_key(s: &str) -> bool {
    s.as_bytes()
        .windows(3)
        .any(|w| w[0] == b'[' && w[2] == b']' && w[1].is_ascii_alphanumeric())
}

#[test]
fn no_bracket_keys_in_non_clickable_push() {
    let render = read_source("src/clicker/render.rs");
    let violations: Vec<String> = render
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && contains_bracket_key(line)
                && line.contains(".push(")
                && !line.contains("push_clickable(")
        })
        .map(|(i, line)| format!("  render.rs:{}: {}", i + 1, line.trim()))
        .collect();

    assert!(
        violations.is_empty(),
        "bracket-key text in non-clickable push(); use push_clickable():\n{}",
        violations.join("\n")
    );
}

#[test]
fn bracket_key_detection() {
    assert!(contains_bracket_key("\"[u] Upgrade click\""));
    assert!(contains_bracket_key("[A] all"));
    assert!(!contains_bracket_key("[ ] to cycle"));
    assert!(!contains_bracket_key("no keys here"));
}

#[test]
fn mention_respects_identifier_boundaries() {
    assert!(mentions("UPGRADE_CLICK => self.upgrade_click(),", "UPGRADE_CLICK"));
    assert!(!mentions("UPGRADE_CLICKS", "UPGRADE_CLICK"));
    assert!(!mentions("// CLICK_BUTTON", "CLICK_BUTTON"));
}
