// Validation of additional HttpClient parameter sets
// Runs once while instrumentation is built and rejects duplicate names and
// collisions with reserved labels or parameters, case-insensitively
//
// Numan Thabit 2025 Nov

use crate::errors::ConfigError;
use crate::labels::{BUILT_IN, RESERVED_PARAMETER_NAMES};
use crate::mapping::ParameterMapping;
use std::collections::HashSet;

/// Validate the additional parameters configured for one metric.
///
/// Checks run in order and the first failing rule is reported with every
/// name that violates it:
/// 1. parameter names are unique
/// 2. label names are unique
/// 3. no label name is a built-in label (`method`, `host`)
/// 4. no parameter name is reserved (`action`, `controller`)
pub fn validate_additional_parameters(parameters: &[ParameterMapping]) -> Result<(), ConfigError> {
    let names = duplicates(parameters.iter().map(ParameterMapping::parameter_name));
    if !names.is_empty() {
        return Err(ConfigError::DuplicateParameterName { names });
    }

    let names = duplicates(parameters.iter().map(ParameterMapping::label_name));
    if !names.is_empty() {
        return Err(ConfigError::DuplicateLabelName { names });
    }

    let names = collisions(parameters.iter().map(ParameterMapping::label_name), &BUILT_IN);
    if !names.is_empty() {
        return Err(ConfigError::ReservedLabelName {
            names,
            reserved: BUILT_IN.to_vec(),
        });
    }

    let names = collisions(
        parameters.iter().map(ParameterMapping::parameter_name),
        &RESERVED_PARAMETER_NAMES,
    );
    if !names.is_empty() {
        return Err(ConfigError::ReservedParameterName {
            names,
            reserved: RESERVED_PARAMETER_NAMES.to_vec(),
        });
    }

    Ok(())
}

/// Names seen more than once, each reported once in first-repeat order.
fn duplicates<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let key = name.to_lowercase();
        if !seen.insert(key.clone()) && reported.insert(key) {
            out.push(name.to_string());
        }
    }
    out
}

/// Reserved names that appear among `names`.
fn collisions<'a>(names: impl Iterator<Item = &'a str>, reserved: &[&'static str]) -> Vec<String> {
    let used: HashSet<String> = names.map(str::to_lowercase).collect();
    reserved
        .iter()
        .filter(|r| used.contains(&r.to_lowercase()))
        .map(|r| r.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(parameter: &str, label: &str) -> ParameterMapping {
        ParameterMapping::with_label(parameter, label, |_, _| None).unwrap()
    }

    #[test]
    fn empty_and_distinct_sets_are_valid() {
        assert!(validate_additional_parameters(&[]).is_ok());
        assert!(
            validate_additional_parameters(&[param("version", "version"), param("tenant", "org")])
                .is_ok()
        );
    }

    #[test]
    fn duplicate_parameter_names_ignore_case() {
        let err = validate_additional_parameters(&[param("Version", "v1"), param("version", "v2")])
            .unwrap_err();
        match err {
            ConfigError::DuplicateParameterName { names } => assert_eq!(names, vec!["version"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_parameter_names_fold_non_ascii_case() {
        let err = validate_additional_parameters(&[param("Ärger", "a"), param("ärger", "b")])
            .unwrap_err();
        match err {
            ConfigError::DuplicateParameterName { names } => assert_eq!(names, vec!["ärger"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_label_names_ignore_case() {
        let err = validate_additional_parameters(&[param("a", "Tenant"), param("b", "tenant")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateLabelName { .. }));
    }

    #[test]
    fn built_in_label_names_are_reserved() {
        let err = validate_additional_parameters(&[param("verb", "METHOD"), param("target", "Host")])
            .unwrap_err();
        match &err {
            ConfigError::ReservedLabelName { names, .. } => {
                assert_eq!(names, &vec!["method", "host"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("Reserved label names are: method, host"));
    }

    #[test]
    fn method_parameter_can_use_another_label() {
        assert!(validate_additional_parameters(&[param("method", "rpc_method")]).is_ok());
    }

    #[test]
    fn reserved_parameter_names_are_rejected() {
        let err = validate_additional_parameters(&[param("Controller", "ctrl"), param("action", "act")])
            .unwrap_err();
        match &err {
            ConfigError::ReservedParameterName { names, reserved } => {
                assert_eq!(names, &vec!["action", "controller"]);
                assert_eq!(reserved, &vec!["action", "controller"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("action, controller"));
    }

    #[test]
    fn earlier_rules_win() {
        // Both duplicate parameter names and a reserved label: rule 1 is reported.
        let err = validate_additional_parameters(&[param("x", "host"), param("X", "y")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateParameterName { .. }));
    }
}
