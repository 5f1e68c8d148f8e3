//! Static structure and style checks for DRL text.
//!
//! The checker is lexical: it never builds a parse tree. Every pass always
//! runs and appends to one report, so a single call returns every issue found
//! in the text.
use serde::Serialize;
use std::fmt;

mod lexical;
mod structure;

/// DRL keywords that should not be used as `$variable` names.
pub const KEYWORDS: &[&str] = &[
    "package",
    "import",
    "global",
    "rule",
    "when",
    "then",
    "end",
    "salience",
    "agenda-group",
    "activation-group",
    "no-loop",
    "lock-on-active",
    "duration",
    "timer",
    "calendars",
    "auto-focus",
    "dialect",
    "extends",
    "enabled",
    "attributes",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Machine-readable identifier of a reported issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    EmptyCode,
    NoRule,
    MissingPackage,
    InvalidPackage,
    MissingSemicolon,
    ImportMissingSemicolon,
    SuspiciousImport,
    GlobalMissingSemicolon,
    InvalidGlobal,
    MissingWhen,
    MissingThen,
    MissingEnd,
    WrongOrder,
    MismatchedKeywords,
    UnmatchedClosing,
    MismatchedBrackets,
    UnclosedBracket,
    UnclosedString,
    VariableUppercase,
    VariableKeyword,
    Indentation,
    TabCharacter,
    IfStatement,
    LoopStatement,
    NullCheck,
    SingleEquals,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::EmptyCode => "EMPTY_CODE",
            IssueCode::NoRule => "NO_RULE",
            IssueCode::MissingPackage => "MISSING_PACKAGE",
            IssueCode::InvalidPackage => "INVALID_PACKAGE",
            IssueCode::MissingSemicolon => "MISSING_SEMICOLON",
            IssueCode::ImportMissingSemicolon => "IMPORT_MISSING_SEMICOLON",
            IssueCode::SuspiciousImport => "SUSPICIOUS_IMPORT",
            IssueCode::GlobalMissingSemicolon => "GLOBAL_MISSING_SEMICOLON",
            IssueCode::InvalidGlobal => "INVALID_GLOBAL",
            IssueCode::MissingWhen => "MISSING_WHEN",
            IssueCode::MissingThen => "MISSING_THEN",
            IssueCode::MissingEnd => "MISSING_END",
            IssueCode::WrongOrder => "WRONG_ORDER",
            IssueCode::MismatchedKeywords => "MISMATCHED_KEYWORDS",
            IssueCode::UnmatchedClosing => "UNMATCHED_CLOSING",
            IssueCode::MismatchedBrackets => "MISMATCHED_BRACKETS",
            IssueCode::UnclosedBracket => "UNCLOSED_BRACKET",
            IssueCode::UnclosedString => "UNCLOSED_STRING",
            IssueCode::VariableUppercase => "VARIABLE_UPPERCASE",
            IssueCode::VariableKeyword => "VARIABLE_KEYWORD",
            IssueCode::Indentation => "INDENTATION",
            IssueCode::TabCharacter => "TAB_CHARACTER",
            IssueCode::IfStatement => "IF_STATEMENT",
            IssueCode::LoopStatement => "LOOP_STATEMENT",
            IssueCode::NullCheck => "NULL_CHECK",
            IssueCode::SingleEquals => "SINGLE_EQUALS",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding, positioned by 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxIssue {
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.line, self.column, severity, self.code, self.message
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// The full report of one check run. `valid` is `true` when there are no errors;
/// warnings never affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<SyntaxIssue>,
    pub warnings: Vec<SyntaxIssue>,
}

impl CheckResult {
    pub fn has_code(&self, code: IssueCode) -> bool {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .any(|issue| issue.code == code)
    }
}

/// The text under check, split into lines once for every pass.
pub(crate) struct Document<'t> {
    pub(crate) text: &'t str,
    pub(crate) lines: Vec<&'t str>,
}

impl<'t> Document<'t> {
    fn new(text: &'t str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        Self { text, lines }
    }

    /// 1-based line number of a byte offset into the whole text.
    pub(crate) fn line_of_offset(&self, offset: usize) -> usize {
        self.text[..offset].matches('\n').count() + 1
    }

    /// 1-based column of a byte offset into the whole text.
    pub(crate) fn column_of_offset(&self, offset: usize) -> usize {
        let line_start = self.text[..offset].rfind('\n').map_or(0, |i| i + 1);
        self.text[line_start..offset].chars().count() + 1
    }
}

/// 1-based column of a byte index within a single line.
pub(crate) fn column_at(line: &str, byte_index: usize) -> usize {
    line[..byte_index].chars().count() + 1
}

/// Collects issues for one run, keeping errors and warnings apart.
#[derive(Default)]
pub(crate) struct IssueSink {
    errors: Vec<SyntaxIssue>,
    warnings: Vec<SyntaxIssue>,
}

impl IssueSink {
    pub(crate) fn error(
        &mut self,
        line: usize,
        column: usize,
        code: IssueCode,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.errors
            .push(Self::issue(line, column, Severity::Error, code, message, suggestion));
    }

    pub(crate) fn warning(
        &mut self,
        line: usize,
        column: usize,
        code: IssueCode,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.warnings
            .push(Self::issue(line, column, Severity::Warning, code, message, suggestion));
    }

    fn issue(
        line: usize,
        column: usize,
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> SyntaxIssue {
        let suggestion = suggestion.into();
        SyntaxIssue {
            line,
            column,
            severity,
            code,
            message: message.into(),
            suggestion: (!suggestion.is_empty()).then_some(suggestion),
        }
    }

    fn into_result(self) -> CheckResult {
        CheckResult {
            valid: self.errors.is_empty(),
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

/// Stateless DRL checker. A single instance can be shared freely; every call
/// to [`SyntaxChecker::check`] starts from scratch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxChecker;

impl SyntaxChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, text: &str) -> CheckResult {
        let doc = Document::new(text);
        let mut sink = IssueSink::default();

        structure::check_basic_structure(&doc, &mut sink);
        structure::check_package_declaration(&doc, &mut sink);
        structure::check_imports(&doc, &mut sink);
        structure::check_globals(&doc, &mut sink);
        structure::check_rule_structure(&doc, &mut sink);
        lexical::check_brackets(&doc, &mut sink);
        lexical::check_quotes(&doc, &mut sink);
        lexical::check_variable_naming(&doc, &mut sink);
        lexical::check_indentation(&doc, &mut sink);
        lexical::check_common_mistakes(&doc, &mut sink);

        sink.into_result()
    }
}

/// Checks DRL text and returns every error and warning found.
pub fn check_syntax(text: &str) -> CheckResult {
    SyntaxChecker::new().check(text)
}
