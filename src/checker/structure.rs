use super::lexical::mask_literals;
use super::{Document, IssueCode, IssueSink, column_at};
use regex::Regex;
use std::sync::LazyLock;

static RULE_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\brule\s+").unwrap());
static PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*package\s+([^;\s]+)\s*;?").unwrap());
static PACKAGE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z0-9_]*(\.[a-z][a-zA-Z0-9_]*)*$").unwrap());
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*import\s+(.+)$").unwrap());
static IMPORT_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z0-9_]*(\.[a-zA-Z0-9_*]+)*$").unwrap());
static GLOBAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*global\s+(.+)$").unwrap());
static RULE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\brule\s+["']([^"']+)["']"#).unwrap());
static WHEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bwhen\b").unwrap());
static THEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bthen\b").unwrap());
static END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bend\s*(\n|$)").unwrap());
static BLOCK_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(when|then|end)\b").unwrap());

pub(super) fn check_basic_structure(doc: &Document, sink: &mut IssueSink) {
    if doc.text.trim().is_empty() {
        sink.error(
            1,
            1,
            IssueCode::EmptyCode,
            "DRL code is empty",
            "Add at least one rule definition",
        );
        return;
    }

    if !RULE_KEYWORD_RE.is_match(doc.text) {
        sink.error(
            1,
            1,
            IssueCode::NoRule,
            "No rule definition found",
            "Define at least one rule: rule \"Rule name\"",
        );
    }
}

pub(super) fn check_package_declaration(doc: &Document, sink: &mut IssueSink) {
    let Some(caps) = PACKAGE_RE.captures(doc.text) else {
        sink.warning(
            1,
            1,
            IssueCode::MissingPackage,
            "Missing package declaration",
            "Start the file with a package declaration, e.g. package com.rules;",
        );
        return;
    };
    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
        return;
    };

    let line = doc.line_of_offset(name.start());
    if !PACKAGE_NAME_RE.is_match(name.as_str()) {
        sink.error(
            line,
            doc.column_of_offset(name.start()),
            IssueCode::InvalidPackage,
            format!("Package name '{}' is not valid", name.as_str()),
            "Package names start with a lowercase letter, may contain letters, digits and underscores, and use dots to separate levels",
        );
    }

    if !whole.as_str().ends_with(';') {
        sink.error(
            line,
            doc.column_of_offset(name.end()),
            IssueCode::MissingSemicolon,
            "Package declaration is missing a semicolon",
            format!("End the declaration with a semicolon: package {};", name.as_str()),
        );
    }
}

pub(super) fn check_imports(doc: &Document, sink: &mut IssueSink) {
    for (index, line) in doc.lines.iter().enumerate() {
        let Some(content) = IMPORT_RE.captures(line).and_then(|caps| caps.get(1)) else {
            continue;
        };
        let line_num = index + 1;
        let import = content.as_str().trim();

        if !import.ends_with(';') {
            sink.error(
                line_num,
                line.chars().count(),
                IssueCode::ImportMissingSemicolon,
                "Import statement is missing a semicolon",
                "End the import statement with a semicolon",
            );
        }

        let path = import.trim_end_matches(';').trim_end();
        if !IMPORT_PATH_RE.is_match(path) {
            sink.warning(
                line_num,
                column_at(line, content.start()),
                IssueCode::SuspiciousImport,
                format!("Import path '{}' does not look standard", path),
                "Use a dotted path such as com.example.MyClass or com.example.*",
            );
        }
    }
}

pub(super) fn check_globals(doc: &Document, sink: &mut IssueSink) {
    for (index, line) in doc.lines.iter().enumerate() {
        let Some(content) = GLOBAL_RE.captures(line).and_then(|caps| caps.get(1)) else {
            continue;
        };
        let line_num = index + 1;
        let global = content.as_str().trim();

        if !global.ends_with(';') {
            sink.error(
                line_num,
                line.chars().count(),
                IssueCode::GlobalMissingSemicolon,
                "Global declaration is missing a semicolon",
                "End the global declaration with a semicolon",
            );
        }

        if global.trim_end_matches(';').split_whitespace().count() < 2 {
            sink.error(
                line_num,
                column_at(line, content.start()),
                IssueCode::InvalidGlobal,
                "Global declaration is malformed",
                "Globals are declared as: global Type name;",
            );
        }
    }
}

/// Checks every `rule "name"` block for its `when`, `then` and `end` keywords.
///
/// Each rule is checked against the text between its header and the next rule
/// header. The aggregate keyword-count error only fires when no individual rule
/// already explained the imbalance.
pub(super) fn check_rule_structure(doc: &Document, sink: &mut IssueSink) {
    let headers: Vec<(usize, String)> = RULE_HEADER_RE
        .captures_iter(doc.text)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            Some((start, caps.get(1)?.as_str().to_string()))
        })
        .collect();

    // Keywords inside string literals or comments do not count.
    let code = masked_text(doc.text);

    let mut missing_keyword = false;
    for (i, (start, name)) in headers.iter().enumerate() {
        let segment_end = headers.get(i + 1).map_or(code.len(), |(next, _)| *next);
        let segment = &code[*start..segment_end];
        let line = doc.line_of_offset(*start);
        let column = doc.column_of_offset(*start);

        let when_at = WHEN_RE.find(segment).map(|m| m.start());
        let then_at = THEN_RE.find(segment).map(|m| m.start());
        let has_end = END_RE.is_match(segment);

        if when_at.is_none() {
            missing_keyword = true;
            sink.error(
                line,
                column,
                IssueCode::MissingWhen,
                format!("Rule \"{}\" has no when clause", name),
                "Add a when clause that declares the rule's conditions",
            );
        }
        if then_at.is_none() {
            missing_keyword = true;
            sink.error(
                line,
                column,
                IssueCode::MissingThen,
                format!("Rule \"{}\" has no then clause", name),
                "Add a then clause that declares the rule's actions",
            );
        }
        if !has_end {
            missing_keyword = true;
            sink.error(
                line,
                column,
                IssueCode::MissingEnd,
                format!("Rule \"{}\" is missing the end keyword", name),
                "Close the rule with the end keyword",
            );
        }

        if let (Some(when_at), Some(then_at)) = (when_at, then_at) {
            if then_at < when_at {
                sink.error(
                    line,
                    column,
                    IssueCode::WrongOrder,
                    format!("Rule \"{}\" has its then clause before its when clause", name),
                    "The correct order is: when ... then ... end",
                );
            }
        }
    }

    let (mut whens, mut thens, mut ends) = (0, 0, 0);
    for keyword in BLOCK_KEYWORD_RE.find_iter(&code) {
        match keyword.as_str() {
            "when" => whens += 1,
            "then" => thens += 1,
            _ => ends += 1,
        }
    }

    if !missing_keyword && (whens != thens || whens != ends) {
        sink.error(
            1,
            1,
            IssueCode::MismatchedKeywords,
            format!(
                "Mismatched when/then/end keyword counts (when: {}, then: {}, end: {})",
                whens, thens, ends
            ),
            "Every rule needs exactly one when, one then and one end keyword",
        );
    }
}

/// The whole text with every line passed through [`mask_literals`]. Line
/// breaks are kept, so byte offsets line up with the original text.
fn masked_text(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| match line.strip_suffix('\n') {
            Some(body) => format!("{}\n", mask_literals(body)),
            None => mask_literals(line),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_text_keeps_offsets_and_line_breaks() {
        let text = "rule \"r\"\r\nthen\n    x = \"end\"; // then\nend";
        let masked = masked_text(text);
        assert_eq!(masked.len(), text.len());
        assert_eq!(masked.matches('\n').count(), 3);
        assert_eq!(BLOCK_KEYWORD_RE.find_iter(&masked).count(), 2);
    }
}
