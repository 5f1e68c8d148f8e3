use crate::error::CompileError;
use crate::flow::{ActionConfig, ActionKind, ConditionConfig, DecisionConfig};
use crate::value::{format_argument_list, format_literal, is_blank};

/// When-clause used by rules that fire for any fact.
pub(super) const ANY_FACT_CLAUSE: &str = "$fact: Object()";

/// Formats one action as a DRL then-statement.
///
/// Returns an empty string for a `call` action that is missing its method or
/// parameter list; callers drop empty statements from then-blocks.
pub fn format_action(action: &ActionConfig) -> String {
    match action.kind {
        ActionKind::Set => format!(
            "$fact.{} = {};",
            action.target,
            format_literal(action.value.as_ref().unwrap_or(&serde_json::Value::Null))
        ),
        ActionKind::Call => match (&action.method, &action.params) {
            (Some(method), Some(params)) if !method.trim().is_empty() => {
                format!("$fact.{}({});", method, format_argument_list(params))
            }
            _ => String::new(),
        },
        ActionKind::Insert => match &action.params {
            Some(params) if !params.is_empty() => {
                format!("insert(new {}({}));", action.target, format_argument_list(params))
            }
            _ => format!("insert(new {}());", action.target),
        },
        ActionKind::Retract => "retract($fact);".to_string(),
        ActionKind::Modify => format!(
            "modify($fact) {{ {} = {} }};",
            action.target,
            format_literal(action.value.as_ref().unwrap_or(&serde_json::Value::Null))
        ),
    }
}

/// Builds the single when-clause of a condition node.
pub fn format_condition(condition: &ConditionConfig) -> String {
    let value = format_literal(&condition.value);
    let value = if condition.operator.is_membership() && condition.value.is_array() {
        format!("({})", value)
    } else {
        value
    };
    format!(
        "$fact: {} {} {}",
        condition.field.trim(),
        condition.operator.as_drl(),
        value
    )
}

pub(super) fn validate_condition(
    node_id: &str,
    condition: &ConditionConfig,
) -> Result<(), CompileError> {
    if condition.field.trim().is_empty() {
        return Err(CompileError::invalid_config(
            node_id,
            "condition requires a non-empty 'field'",
        ));
    }
    if is_blank(&condition.value) {
        return Err(CompileError::invalid_config(
            node_id,
            format!(
                "condition on '{}' requires a non-empty 'value'",
                condition.field.trim()
            ),
        ));
    }
    Ok(())
}

pub(super) fn validate_action(node_id: &str, action: &ActionConfig) -> Result<(), CompileError> {
    if action.target.trim().is_empty() {
        return Err(CompileError::invalid_config(
            node_id,
            "action requires a non-empty 'target'",
        ));
    }
    match action.kind {
        ActionKind::Call
            if action
                .method
                .as_deref()
                .is_none_or(|method| method.trim().is_empty()) =>
        {
            Err(CompileError::invalid_config(
                node_id,
                format!("call action on '{}' requires a 'method'", action.target),
            ))
        }
        ActionKind::Set if action.value.as_ref().is_none_or(|v| v.is_null()) => {
            Err(CompileError::invalid_config(
                node_id,
                format!("set action on '{}' requires a 'value'", action.target),
            ))
        }
        _ => Ok(()),
    }
}

pub(super) fn validate_decision(node_id: &str, decision: &DecisionConfig) -> Result<(), CompileError> {
    if decision.expression.trim().is_empty() {
        return Err(CompileError::invalid_config(
            node_id,
            "decision requires a non-empty 'expression'",
        ));
    }
    if decision.then_actions.is_empty() {
        return Err(CompileError::invalid_config(
            node_id,
            "decision requires at least one entry in 'thenActions'",
        ));
    }
    decision
        .then_actions
        .iter()
        .chain(decision.else_actions.iter().flatten())
        .try_for_each(|action| validate_action(node_id, action))
}

/// Formats a list of actions, dropping statements that render empty.
pub(super) fn action_statements<'a>(
    actions: impl IntoIterator<Item = &'a ActionConfig>,
) -> Vec<String> {
    actions
        .into_iter()
        .map(format_action)
        .filter(|statement| !statement.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::ConditionOperator;
    use serde_json::json;

    #[test]
    fn test_membership_condition_is_parenthesized() {
        let condition = ConditionConfig {
            field: "status".to_string(),
            operator: ConditionOperator::NotIn,
            value: json!(["closed", "void"]),
            logical_operator: None,
        };
        assert_eq!(
            format_condition(&condition),
            "$fact: status not in (\"closed\", \"void\")"
        );
    }

    #[test]
    fn test_call_without_params_renders_empty() {
        let action = ActionConfig::new(ActionKind::Call, "order").with_method("approve");
        assert_eq!(format_action(&action), "");
        assert!(action_statements([&action]).is_empty());
    }

    #[test]
    fn test_validate_action_requirements() {
        let set = ActionConfig::new(ActionKind::Set, "flag");
        assert!(validate_action("n1", &set).is_err());

        let call = ActionConfig::new(ActionKind::Call, "order");
        assert!(validate_action("n1", &call).is_err());

        let retract = ActionConfig::new(ActionKind::Retract, "order");
        assert!(validate_action("n1", &retract).is_ok());

        let blank = ActionConfig::new(ActionKind::Retract, "  ");
        assert!(validate_action("n1", &blank).is_err());
    }
}
