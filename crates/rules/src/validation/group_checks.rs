//! Group validation: names, intervals and record names.

use std::collections::HashSet;

use crate::schema::{PolicyDocument, PolicyGroup};

use super::ValidationResult;

pub(super) fn validate_group_names(doc: &PolicyDocument, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for (gi, group) in doc.groups.iter().enumerate() {
        if group.name.trim().is_empty() {
            result.error(format!("groups[{gi}].name"), "Group name must not be empty");
        } else if !seen.insert(group.name.as_str()) {
            result.error(
                format!("groups[{gi}].name"),
                format!("Duplicate group name '{}'", group.name),
            );
        }
    }
}

pub(super) fn validate_group(group: &PolicyGroup, path: &str, result: &mut ValidationResult) {
    if let Err(raw) = group.interval() {
        result.error(
            format!("{path}.interval"),
            format!("Invalid duration format '{raw}', expected e.g. '10ms', '1s', '2m30s'"),
        );
    }

    if group.rules.is_empty() {
        result.warn(format!("{path}.rules"), "Group has no rules");
        return;
    }

    let mut records = HashSet::new();
    for (ri, rule) in group.rules.iter().enumerate() {
        let rule_path = format!("{path}.rules[{ri}].record");
        if rule.record.trim().is_empty() {
            result.warn(rule_path, "Empty record name; reports will be hard to tell apart");
        } else if !records.insert(rule.record.as_str()) {
            result.warn(
                rule_path,
                format!("Duplicate record name '{}' in group '{}'", rule.record, group.name),
            );
        }
    }
}
