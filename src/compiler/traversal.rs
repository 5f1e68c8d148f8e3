use super::RuleUnit;
use super::statements::{
    ANY_FACT_CLAUSE, action_statements, format_action, format_condition, validate_action,
    validate_condition, validate_decision,
};
use crate::error::CompileError;
use crate::flow::{
    ActionConfig, ConditionConfig, Connection, DecisionConfig, GroupConfig, NodeConfig, NodeKind,
    RuleNode,
};
use ahash::{AHashMap, AHashSet};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Grouping metadata inherited by every rule compiled below a group node.
///
/// Carried by value through the walk: a group's subtree sees the overlaid
/// context and its siblings keep seeing the context that was active before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct GroupingContext {
    agenda_group: Option<String>,
    activation_group: Option<String>,
    salience: Option<i32>,
}

impl GroupingContext {
    /// Returns a new context where the group's non-empty fields override this one.
    fn overlay(&self, group: &GroupConfig) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        Self {
            agenda_group: non_empty(&group.agenda_group).or_else(|| self.agenda_group.clone()),
            activation_group: non_empty(&group.activation_group)
                .or_else(|| self.activation_group.clone()),
            salience: group.salience.or(self.salience),
        }
    }

    fn stamp(&self, unit: &mut RuleUnit) {
        if self.agenda_group.is_some() {
            unit.agenda_group = self.agenda_group.clone();
        }
        if self.activation_group.is_some() {
            unit.activation_group = self.activation_group.clone();
        }
        if self.salience.is_some() {
            unit.salience = self.salience;
        }
    }
}

/// Depth-first walker that turns the nodes reachable from an entry node into
/// rule units.
///
/// Cycle detection uses the current path only, so a node reachable along two
/// different branches is compiled once per branch while a node reachable from
/// itself is rejected.
pub(super) struct RuleWalker<'a> {
    outgoing: AHashMap<&'a str, Vec<&'a RuleNode>>,
    no_loop: bool,
    units: Vec<RuleUnit>,
    name_counts: AHashMap<String, usize>,
    used_names: AHashSet<String>,
}

impl<'a> RuleWalker<'a> {
    pub(super) fn new(nodes: &'a [RuleNode], connections: &'a [Connection], no_loop: bool) -> Self {
        let by_id: AHashMap<&str, &RuleNode> =
            nodes.iter().map(|node| (node.id.as_str(), node)).collect();

        let mut outgoing: AHashMap<&'a str, Vec<&'a RuleNode>> = AHashMap::new();
        for connection in connections {
            match by_id.get(connection.target.as_str()) {
                Some(target) => outgoing
                    .entry(connection.source.as_str())
                    .or_default()
                    .push(*target),
                None => warn!(
                    connection = %connection.id,
                    target = %connection.target,
                    "Skipping connection to unknown node"
                ),
            }
        }

        Self {
            outgoing,
            no_loop,
            units: Vec::new(),
            name_counts: AHashMap::new(),
            used_names: AHashSet::new(),
        }
    }

    pub(super) fn walk_from(&mut self, entry: &'a RuleNode) -> Result<(), CompileError> {
        let mut path = Vec::new();
        self.visit(entry, None, &GroupingContext::default(), &mut path)
    }

    pub(super) fn finish(self) -> Vec<RuleUnit> {
        self.units
    }

    fn visit(
        &mut self,
        node: &'a RuleNode,
        parent: Option<NodeKind>,
        context: &GroupingContext,
        path: &mut Vec<&'a str>,
    ) -> Result<(), CompileError> {
        if path.contains(&node.id.as_str()) {
            let mut cycle: Vec<String> = path.iter().map(|id| id.to_string()).collect();
            cycle.push(node.id.clone());
            return Err(CompileError::CycleDetected { path: cycle });
        }
        path.push(node.id.as_str());
        debug!(node_id = %node.id, kind = %node.kind(), depth = path.len(), "Compiling node");

        let child_context = match &node.config {
            NodeConfig::Condition(condition) => {
                self.compile_condition(node, condition, context)?;
                Cow::Borrowed(context)
            }
            NodeConfig::Action(action) => {
                // Actions directly under a condition were folded into its then-block.
                if parent != Some(NodeKind::Condition) {
                    self.compile_action(node, action, context)?;
                }
                Cow::Borrowed(context)
            }
            NodeConfig::Decision(decision) => {
                self.compile_decision(node, decision, context)?;
                Cow::Borrowed(context)
            }
            NodeConfig::Group(group) => Cow::Owned(context.overlay(group)),
            NodeConfig::Start | NodeConfig::End => Cow::Borrowed(context),
        };

        for target in self.targets_of(&node.id) {
            self.visit(target, Some(node.kind()), &child_context, path)?;
        }

        path.pop();
        Ok(())
    }

    fn targets_of(&self, node_id: &str) -> Vec<&'a RuleNode> {
        self.outgoing.get(node_id).cloned().unwrap_or_default()
    }

    fn compile_condition(
        &mut self,
        node: &RuleNode,
        condition: &ConditionConfig,
        context: &GroupingContext,
    ) -> Result<(), CompileError> {
        validate_condition(&node.id, condition)?;

        let mut then_statements = Vec::new();
        for target in self.targets_of(&node.id) {
            if let NodeConfig::Action(action) = &target.config {
                validate_action(&target.id, action)?;
                then_statements.extend(action_statements([action]));
            }
        }

        let name = self.unique_name(format!("Rule_{}", node.id));
        self.push_unit(name, vec![format_condition(condition)], then_statements, context);
        Ok(())
    }

    fn compile_action(
        &mut self,
        node: &RuleNode,
        action: &ActionConfig,
        context: &GroupingContext,
    ) -> Result<(), CompileError> {
        validate_action(&node.id, action)?;
        let statement = format_action(action);
        let then_statements = if statement.is_empty() {
            Vec::new()
        } else {
            vec![statement]
        };

        let name = self.unique_name(format!("Action_{}", node.id));
        self.push_unit(name, vec![ANY_FACT_CLAUSE.to_string()], then_statements, context);
        Ok(())
    }

    fn compile_decision(
        &mut self,
        node: &RuleNode,
        decision: &DecisionConfig,
        context: &GroupingContext,
    ) -> Result<(), CompileError> {
        validate_decision(&node.id, decision)?;
        let expression = decision.expression.trim();

        let name = self.unique_name(format!("Decision_{}", node.id));
        let else_name = format!("{}_Else", name);
        self.push_unit(
            name,
            vec![format!("eval({})", expression)],
            action_statements(&decision.then_actions),
            context,
        );

        if let Some(else_actions) = decision.else_actions.as_ref().filter(|a| !a.is_empty()) {
            let else_name = self.unique_name(else_name);
            self.push_unit(
                else_name,
                vec![format!("eval(!({}))", expression)],
                action_statements(else_actions),
                context,
            );
        }
        Ok(())
    }

    fn push_unit(
        &mut self,
        name: String,
        when_clauses: Vec<String>,
        then_statements: Vec<String>,
        context: &GroupingContext,
    ) {
        let mut unit = RuleUnit {
            name,
            salience: None,
            agenda_group: None,
            activation_group: None,
            no_loop: self.no_loop,
            when_clauses,
            then_statements,
        };
        context.stamp(&mut unit);
        self.units.push(unit);
    }

    /// Suffixes repeated rule names (`_2`, `_3`, ...) so a node compiled on
    /// several paths still yields distinct rules. A suffix already taken by
    /// another rule is skipped.
    fn unique_name(&mut self, base: String) -> String {
        let count = self.name_counts.entry(base.clone()).or_insert(0);
        let mut candidate = base.clone();
        loop {
            *count += 1;
            if *count > 1 {
                candidate = format!("{}_{}", base, count);
            }
            if !self.used_names.contains(&candidate) {
                break;
            }
        }
        self.used_names.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_keeps_outer_fields_when_inner_is_empty() {
        let outer = GroupingContext::default().overlay(&GroupConfig {
            name: "outer".to_string(),
            agenda_group: Some("billing".to_string()),
            salience: Some(10),
            ..GroupConfig::default()
        });
        let inner = outer.overlay(&GroupConfig {
            name: "inner".to_string(),
            agenda_group: Some("".to_string()),
            activation_group: Some("once".to_string()),
            ..GroupConfig::default()
        });

        assert_eq!(inner.agenda_group.as_deref(), Some("billing"));
        assert_eq!(inner.activation_group.as_deref(), Some("once"));
        assert_eq!(inner.salience, Some(10));
        assert_eq!(outer.activation_group, None);
    }

    #[test]
    fn test_unique_name_skips_taken_suffixes() {
        let mut walker = RuleWalker::new(&[], &[], false);
        assert_eq!(walker.unique_name("Rule_c".to_string()), "Rule_c");
        assert_eq!(walker.unique_name("Rule_c_2".to_string()), "Rule_c_2");
        assert_eq!(walker.unique_name("Rule_c".to_string()), "Rule_c_3");
        assert_eq!(walker.unique_name("Rule_c_2".to_string()), "Rule_c_2_2");
    }
}
