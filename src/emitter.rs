use crate::compiler::RuleUnit;
use crate::value::escape_string;
use itertools::Itertools;

/// A compiled rule package: header declarations plus rule units in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulePackage {
    pub name: String,
    pub package_name: String,
    imports: Vec<String>,
    globals: Vec<String>,
    pub rules: Vec<RuleUnit>,
}

impl RulePackage {
    pub fn new(name: &str, package_name: &str) -> Self {
        Self {
            name: name.to_string(),
            package_name: package_name.to_string(),
            ..Self::default()
        }
    }

    /// Adds an import unless it is already present; first-add order is kept.
    pub fn add_import(&mut self, import: &str) {
        if !self.imports.iter().any(|i| i == import) {
            self.imports.push(import.to_string());
        }
    }

    /// Adds a global declaration unless it is already present.
    pub fn add_global(&mut self, global: &str) {
        if !self.globals.iter().any(|g| g == global) {
            self.globals.push(global.to_string());
        }
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    pub fn globals(&self) -> &[String] {
        &self.globals
    }

    pub fn to_drl(&self) -> String {
        emit(&self.package_name, &self.imports, &self.globals, &self.rules)
    }
}

/// Serializes a package header and rule units into DRL text.
///
/// Imports and globals are deduplicated in first-occurrence order, so the
/// output is a pure function of the inputs.
pub fn emit<I, G>(package_name: &str, imports: I, globals: G, units: &[RuleUnit]) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    G: IntoIterator,
    G::Item: AsRef<str>,
{
    let imports: Vec<String> = imports
        .into_iter()
        .map(|i| i.as_ref().to_string())
        .unique()
        .collect();
    let globals: Vec<String> = globals
        .into_iter()
        .map(|g| g.as_ref().to_string())
        .unique()
        .collect();

    let mut drl = format!("package {};\n\n", package_name);

    if !imports.is_empty() {
        drl.push_str("// Imports\n");
        for import in &imports {
            drl.push_str(&format!("import {};\n", import));
        }
        drl.push('\n');
    }

    if !globals.is_empty() {
        drl.push_str("// Globals\n");
        for global in &globals {
            drl.push_str(&format!("global {};\n", global));
        }
        drl.push('\n');
    }

    drl.push_str("// Rules\n");
    for unit in units {
        drl.push_str(&format_rule(unit));
        drl.push('\n');
    }
    drl
}

/// Formats one rule block.
pub fn format_rule(unit: &RuleUnit) -> String {
    let mut rule = format!("rule \"{}\"\n", escape_string(&unit.name));

    if let Some(salience) = unit.salience {
        rule.push_str(&format!("    salience {}\n", salience));
    }
    if let Some(agenda_group) = &unit.agenda_group {
        rule.push_str(&format!("    agenda-group \"{}\"\n", escape_string(agenda_group)));
    }
    if let Some(activation_group) = &unit.activation_group {
        rule.push_str(&format!(
            "    activation-group \"{}\"\n",
            escape_string(activation_group)
        ));
    }
    if unit.no_loop {
        rule.push_str("    no-loop true\n");
    }

    rule.push_str("    when\n");
    for clause in &unit.when_clauses {
        rule.push_str(&format!("        {}\n", clause));
    }

    rule.push_str("    then\n");
    for statement in &unit.then_statements {
        rule.push_str(&format!("        {}\n", statement));
    }

    rule.push_str("end\n");
    rule
}
