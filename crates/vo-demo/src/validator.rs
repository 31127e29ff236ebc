//! Action Validator: structural and semantic checks on `action_events`
//! beyond what the timeline JSON Schema already enforces.

use std::collections::HashSet;

use vo_models::ActionEvent;

use crate::error::{DemoError, DemoResult};

/// Actions the Demo Runner knows how to execute.
const SUPPORTED_ACTIONS: &[&str] = &["goto", "click", "fill", "press", "wait", "screenshot"];

const MIN_TIMEOUT_MS: i64 = 100;
const MAX_TIMEOUT_MS: i64 = 60_000;
const MAX_RETRIES: i64 = 5;

/// Validate a full action timeline: every action is one the runner
/// supports, every `target` is present where the action needs one,
/// `timeout_ms`/`retries` are within bounds, and ids are unique.
pub fn validate_actions(actions: &[ActionEvent]) -> DemoResult<()> {
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for action in actions {
        if !seen_ids.insert(action.id.as_str()) {
            return Err(DemoError::InvalidAction {
                action_id: action.id.clone(),
                message: "duplicate action id".to_string(),
            });
        }

        if !SUPPORTED_ACTIONS.contains(&action.action.as_str()) {
            return Err(DemoError::InvalidAction {
                action_id: action.id.clone(),
                message: format!("unsupported action {:?}", action.action),
            });
        }

        if matches!(action.action.as_str(), "click" | "fill" | "press") && action.target.is_none() {
            return Err(DemoError::InvalidAction {
                action_id: action.id.clone(),
                message: format!("{} requires a target", action.action),
            });
        }

        if action.action == "goto" {
            let target = action.target.as_deref().unwrap_or("");
            if target.is_empty() {
                return Err(DemoError::InvalidAction {
                    action_id: action.id.clone(),
                    message: "goto requires a non-empty target URL".to_string(),
                });
            }
        }

        if let Some(timeout_ms) = action.timeout_ms {
            if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&timeout_ms) {
                return Err(DemoError::InvalidAction {
                    action_id: action.id.clone(),
                    message: format!(
                        "timeout_ms {timeout_ms} out of bounds [{MIN_TIMEOUT_MS}, {MAX_TIMEOUT_MS}]"
                    ),
                });
            }
        }

        if let Some(retries) = action.retries {
            if !(0..=MAX_RETRIES).contains(&retries) {
                return Err(DemoError::InvalidAction {
                    action_id: action.id.clone(),
                    message: format!("retries {retries} out of bounds [0, {MAX_RETRIES}]"),
                });
            }
        }

        if action.at_ms < 0 {
            return Err(DemoError::InvalidAction {
                action_id: action.id.clone(),
                message: "at_ms must be non-negative".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(id: &str, action_name: &str, at_ms: i64, target: Option<&str>) -> ActionEvent {
        ActionEvent {
            id: id.to_string(),
            at_ms,
            action: action_name.to_string(),
            target: target.map(|s| s.to_string()),
            args: Default::default(),
            timeout_ms: None,
            retries: None,
            source_index: 0,
        }
    }

    #[test]
    fn accepts_well_formed_actions() {
        let actions = vec![
            action("a1", "goto", 0, Some("https://example.com")),
            action("a2", "click", 1000, Some("#login")),
        ];
        assert!(validate_actions(&actions).is_ok());
    }

    #[test]
    fn rejects_unsupported_action() {
        let actions = vec![action("a1", "hover", 0, Some("#x"))];
        let err = validate_actions(&actions).unwrap_err();
        assert!(matches!(err, DemoError::InvalidAction { .. }));
    }

    #[test]
    fn rejects_click_without_target() {
        let actions = vec![action("a1", "click", 0, None)];
        assert!(validate_actions(&actions).is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let actions = vec![action("a1", "wait", 0, None), action("a1", "wait", 100, None)];
        assert!(validate_actions(&actions).is_err());
    }
}
