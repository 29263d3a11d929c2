//! Text substitution rules.
//!
//! A rule is a pure function of the file text. Applying a rule to its own
//! output changes nothing.

use regex::Regex;

#[derive(Debug, Clone)]
pub enum PatchRule {
    /// Replaces every occurrence of `old`, unless `new` is already present.
    Literal { old: String, new: String },

    /// Rewrites every line matching `pattern` with `replacement`
    /// (regex replacement syntax, e.g. `${indent}`). Line endings are kept.
    Line { pattern: Regex, replacement: String },

    /// Matches two consecutive lines, joined with `\n`, against `pattern`
    /// and replaces them with a single line. Stops after the first match.
    LinePair { pattern: Regex, replacement: String },
}

/// Splits a line into its body and its terminator (`\r\n`, `\n` or none).
fn split_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

impl PatchRule {
    pub fn literal(old: impl Into<String>, new: impl Into<String>) -> Self {
        PatchRule::Literal {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Returns the patched text and whether anything changed.
    pub fn apply(&self, text: &str) -> (String, bool) {
        match self {
            PatchRule::Literal { old, new } => {
                if text.contains(old.as_str()) && !text.contains(new.as_str()) {
                    (text.replace(old.as_str(), new), true)
                } else {
                    (text.to_string(), false)
                }
            }
            PatchRule::Line {
                pattern,
                replacement,
            } => {
                let mut out = String::with_capacity(text.len());
                let mut applied = false;
                for line in text.split_inclusive('\n') {
                    let (body, ending) = split_ending(line);
                    if pattern.is_match(body) {
                        let patched = pattern.replace(body, replacement.as_str());
                        applied |= patched != body;
                        out.push_str(&patched);
                        out.push_str(ending);
                    } else {
                        out.push_str(line);
                    }
                }
                (out, applied)
            }
            PatchRule::LinePair {
                pattern,
                replacement,
            } => {
                let lines: Vec<&str> = text.split_inclusive('\n').collect();
                for i in 0..lines.len().saturating_sub(1) {
                    let (first, _) = split_ending(lines[i]);
                    let (second, ending) = split_ending(lines[i + 1]);
                    let joined = format!("{first}\n{second}");
                    if !pattern.is_match(&joined) {
                        continue;
                    }
                    let merged = pattern.replace(&joined, replacement.as_str());
                    let mut out = String::with_capacity(text.len());
                    lines[..i].iter().for_each(|l| out.push_str(l));
                    out.push_str(&merged);
                    out.push_str(ending);
                    lines[i + 2..].iter().for_each(|l| out.push_str(l));
                    return (out, true);
                }
                (text.to_string(), false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_rule_is_idempotent() {
        let rule = PatchRule::literal("parents[1]", "parents[2]");
        let (once, applied) = rule.apply("a = parents[1]\nb = parents[1]\n");
        assert!(applied);
        assert_eq!(once, "a = parents[2]\nb = parents[2]\n");

        let (twice, applied) = rule.apply(&once);
        assert!(!applied);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_literal_rule_skips_when_new_already_present() {
        let rule = PatchRule::literal("old()", "new()");
        let (out, applied) = rule.apply("new()\nold()\n");
        assert!(!applied);
        assert_eq!(out, "new()\nold()\n");
    }

    #[test]
    fn test_line_rule_keeps_crlf_and_other_lines() {
        let rule = PatchRule::Line {
            pattern: Regex::new(r"^(?P<indent>\s*)x = 1$").unwrap(),
            replacement: "${indent}x = 2".to_string(),
        };
        let (out, applied) = rule.apply("a\r\n    x = 1\r\nb");
        assert!(applied);
        assert_eq!(out, "a\r\n    x = 2\r\nb");
    }

    #[test]
    fn test_line_pair_rule_stops_at_first_match() {
        let rule = PatchRule::LinePair {
            pattern: Regex::new(r"^(?P<i>\s*)A\n\s*B$").unwrap(),
            replacement: "${i}AB".to_string(),
        };
        let (out, applied) = rule.apply("A\nB\nc\n  A\n  B\n");
        assert!(applied);
        assert_eq!(out, "AB\nc\n  A\n  B\n");
        // The second pair is left for the next run.
        let (again, applied) = rule.apply(&out);
        assert!(applied);
        assert_eq!(again, "AB\nc\n  AB\n");
    }

    #[test]
    fn test_line_pair_on_last_line_without_newline() {
        let rule = PatchRule::LinePair {
            pattern: Regex::new(r"^A\nB$").unwrap(),
            replacement: "AB".to_string(),
        };
        assert_eq!(rule.apply("x\nA\nB"), ("x\nAB".to_string(), true));
        assert_eq!(rule.apply("A"), ("A".to_string(), false));
    }
}
