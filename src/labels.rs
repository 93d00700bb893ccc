// Built-in label names and label name syntax rules
// This file defines the labels every HttpClient metric carries by default,
// the parameter names reserved for route integration, and label validation
//
// Numan Thabit 2025 Nov

use crate::errors::ConfigError;

/// HTTP request method, e.g. `GET`.
pub const METHOD: &str = "method";
/// Host component of the request URI.
pub const HOST: &str = "host";

/// Labels attached to every default HttpClient metric, in declaration order.
pub const BUILT_IN: [&str; 2] = [METHOD, HOST];

/// Parameter names owned by the route integration layer; additional
/// parameters may not reuse them.
pub const RESERVED_PARAMETER_NAMES: [&str; 2] = ["action", "controller"];

/// Checks a label name against the Prometheus data model:
/// `[a-zA-Z_][a-zA-Z0-9_]*`, with the `__` prefix reserved for internal use.
pub fn validate_label_name(name: &str) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidLabelName {
        name: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid("label name is empty")),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Err(invalid("label name must start with a letter or underscore")),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid(
            "label name may only contain letters, digits and underscores",
        ));
    }
    if name.starts_with("__") {
        return Err(invalid("label names starting with \"__\" are reserved"));
    }
    Ok(())
}

/// Label names of a default metric: the built-ins followed by `additional`.
pub fn default_label_names<'a>(additional: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut names: Vec<&'a str> = BUILT_IN.to_vec();
    names.extend(additional);
    names
}
