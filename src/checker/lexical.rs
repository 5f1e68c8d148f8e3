use super::{Document, IssueCode, IssueSink, KEYWORDS, column_at};
use regex::Regex;
use std::sync::LazyLock;

static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([a-zA-Z_][a-zA-Z0-9_]*)").unwrap());
static IF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bif\s*\(").unwrap());
static LOOP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(for|while)\s*\(").unwrap());
static NULL_CHECK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"==\s*null").unwrap());
static SINGLE_EQUALS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^=!<>](=)[^=]").unwrap());

/// Replaces the contents of string literals with spaces, keeping the quotes and
/// every byte offset intact, and blanks out a trailing `//` comment.
pub(super) fn mask_literals(line: &str) -> String {
    let mut masked = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut chars = line.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        match quote {
            Some(open) => {
                if escaped {
                    escaped = false;
                    masked.extend(std::iter::repeat_n(' ', c.len_utf8()));
                } else if c == '\\' {
                    escaped = true;
                    masked.push(' ');
                } else if c == open {
                    quote = None;
                    masked.push(c);
                } else {
                    masked.extend(std::iter::repeat_n(' ', c.len_utf8()));
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                    masked.push(c);
                } else if c == '/' && chars.peek().is_some_and(|(_, next)| *next == '/') {
                    masked.extend(std::iter::repeat_n(' ', line.len() - masked.len()));
                    break;
                } else {
                    masked.push(c);
                }
            }
        }
    }
    masked
}

/// Scans `()[]{}` across the whole text with one stack, so an opener on one
/// line may be closed on a later one.
pub(super) fn check_brackets(doc: &Document, sink: &mut IssueSink) {
    let mut stack: Vec<(char, usize, usize)> = Vec::new();

    for (index, line) in doc.lines.iter().enumerate() {
        let line_num = index + 1;
        let masked = mask_literals(line);

        for (byte_index, c) in masked.char_indices() {
            match c {
                '(' | '[' | '{' => stack.push((c, line_num, column_at(line, byte_index))),
                ')' | ']' | '}' => {
                    let column = column_at(line, byte_index);
                    match stack.pop() {
                        None => sink.error(
                            line_num,
                            column,
                            IssueCode::UnmatchedClosing,
                            format!("Unmatched closing bracket '{}'", c),
                            "Check for a matching opening bracket",
                        ),
                        Some((open, open_line, _)) if !brackets_match(open, c) => sink.error(
                            line_num,
                            column,
                            IssueCode::MismatchedBrackets,
                            format!("Mismatched brackets: '{}' and '{}'", open, c),
                            format!(
                                "'{}' on line {} does not match '{}' on line {}",
                                open, open_line, c, line_num
                            ),
                        ),
                        Some(_) => {}
                    }
                }
                _ => {}
            }
        }
    }

    for (open, line, column) in stack {
        sink.error(
            line,
            column,
            IssueCode::UnclosedBracket,
            format!("Unclosed bracket '{}'", open),
            "Add the matching closing bracket",
        );
    }
}

fn brackets_match(open: char, close: char) -> bool {
    matches!((open, close), ('(', ')') | ('[', ']') | ('{', '}'))
}

/// Strings may not span lines: a quote still open at the end of a line is an error.
pub(super) fn check_quotes(doc: &Document, sink: &mut IssueSink) {
    for (index, line) in doc.lines.iter().enumerate() {
        let mut quote: Option<char> = None;
        let mut escaped = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if escaped {
                escaped = false;
                continue;
            }
            if c == '\\' {
                escaped = true;
                continue;
            }
            match quote {
                Some(open) if c == open => quote = None,
                Some(_) => {}
                None if c == '"' || c == '\'' => quote = Some(c),
                None if c == '/' && chars.peek() == Some(&'/') => break,
                None => {}
            }
        }

        if let Some(open) = quote {
            sink.error(
                index + 1,
                line.chars().count(),
                IssueCode::UnclosedString,
                format!("Unclosed string literal ({})", open),
                "Close the string on the same line",
            );
        }
    }
}

pub(super) fn check_variable_naming(doc: &Document, sink: &mut IssueSink) {
    for (index, line) in doc.lines.iter().enumerate() {
        for caps in VARIABLE_RE.captures_iter(line) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let column = column_at(line, whole.start());
            let name = name.as_str();

            if name.starts_with(|c: char| c.is_ascii_uppercase()) {
                sink.warning(
                    index + 1,
                    column,
                    IssueCode::VariableUppercase,
                    format!("Variable '${}' starts with an uppercase letter", name),
                    "Start variable names with a lowercase letter, e.g. $fact or $person",
                );
            }

            if KEYWORDS.contains(&name) {
                sink.warning(
                    index + 1,
                    column,
                    IssueCode::VariableKeyword,
                    format!("Variable '${}' is a DRL keyword", name),
                    "Avoid using keywords as variable names",
                );
            }
        }
    }
}

pub(super) fn check_indentation(doc: &Document, sink: &mut IssueSink) {
    for (index, line) in doc.lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let indent_len = line.len() - line.trim_start_matches([' ', '\t']).len();
        let indent = &line[..indent_len];
        let spaces = indent.chars().filter(|c| *c == ' ').count();

        if spaces > 0 && spaces % 4 != 0 {
            sink.warning(
                index + 1,
                1,
                IssueCode::Indentation,
                format!("Indentation is not a multiple of 4 ({} spaces)", spaces),
                "Indent with 4 spaces per level",
            );
        }

        if let Some(tab_at) = indent.find('\t') {
            sink.warning(
                index + 1,
                tab_at + 1,
                IssueCode::TabCharacter,
                "Tab character used for indentation",
                "Indent with spaces instead of tabs",
            );
        }
    }
}

/// Marks, for every line, whether it sits inside a `then` section.
///
/// This is a line heuristic, not a block parse: a line is in a then-section
/// when the last of the lines up to and including it that is exactly (or
/// starts with) `when`, `then` or `end` was a `then` line.
fn then_sections(lines: &[&str]) -> Vec<bool> {
    let mut in_then = false;
    lines
        .iter()
        .map(|line| {
            let line = line.trim().to_lowercase();
            let starts = |keyword: &str| line == keyword || line.starts_with(&format!("{} ", keyword));
            if starts("when") || starts("end") {
                in_then = false;
            } else if starts("then") {
                in_then = true;
            }
            in_then
        })
        .collect()
}

pub(super) fn check_common_mistakes(doc: &Document, sink: &mut IssueSink) {
    let then_flags = then_sections(&doc.lines);

    for (index, line) in doc.lines.iter().enumerate() {
        if line.trim_start().starts_with("//") {
            continue;
        }
        let line_num = index + 1;
        let code = mask_literals(line);

        if let Some(m) = IF_RE.find(&code) {
            sink.warning(
                line_num,
                column_at(line, m.start()),
                IssueCode::IfStatement,
                "if statements are discouraged in DRL",
                "DRL expresses conditions in the when clause; consider restructuring the rule",
            );
        }

        if let Some(m) = LOOP_RE.find(&code) {
            sink.warning(
                line_num,
                column_at(line, m.start()),
                IssueCode::LoopStatement,
                "Loop statements are discouraged in DRL",
                "Consider DRL features such as collect or accumulate",
            );
        }

        if let Some(m) = NULL_CHECK_RE.find(&code) {
            sink.warning(
                line_num,
                column_at(line, m.start()),
                IssueCode::NullCheck,
                "Null check with == null",
                "== null is allowed in DRL, but make sure the object is expected to exist",
            );
        }

        if code.contains("==") || then_flags[index] {
            continue;
        }
        if let Some(equals) = SINGLE_EQUALS_RE.captures(&code).and_then(|caps| caps.get(1)) {
            sink.error(
                line_num,
                column_at(line, equals.start()),
                IssueCode::SingleEquals,
                "Single = used for comparison",
                "Use == for comparisons in rule conditions",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_literals_keeps_offsets() {
        let line = r#"    $p: Person(name == "a=(b") // x = 1"#;
        let masked = mask_literals(line);
        assert_eq!(masked.len(), line.len());
        assert!(!masked.contains("a=(b"));
        assert!(!masked.contains("x = 1"));
        assert!(masked.contains("Person(name =="));
    }

    #[test]
    fn test_then_sections_follow_keyword_lines() {
        let lines = ["rule \"r\"", "when", "  $a: A()", "then", "  x = 1;", "end", "y = 2"];
        assert_eq!(
            then_sections(&lines),
            vec![false, false, false, true, true, false, false]
        );
    }
}
