// Per-request label value resolution
// Produces the label values of one request in the order the metric declared
// its label names
//
// Numan Thabit 2025 Nov

use crate::errors::ResolveError;
use crate::index::LabelIndex;
use crate::labels::{HOST, METHOD};
use crate::mapping::{ParameterMapping, RequestView};
use std::borrow::Cow;

/// Resolve the value of every label in `label_names` for `request`.
///
/// `method` and `host` come straight from the request. Any other label goes
/// through the index to its parameter mapping, whose extractor is invoked;
/// an absent value becomes `""`.
pub fn resolve_label_values<'r>(
    label_names: &[String],
    index: &LabelIndex,
    parameters: &[ParameterMapping],
    request: &RequestView<'r>,
) -> Result<Vec<Cow<'r, str>>, ResolveError> {
    let mut values = Vec::with_capacity(label_names.len());

    for label in label_names {
        let value = match label.as_str() {
            METHOD => Cow::Borrowed(request.method()),
            HOST => Cow::Borrowed(request.host()),
            other => {
                let parameter = index
                    .parameter_for(other)
                    .ok_or_else(|| ResolveError::UnknownLabel {
                        label: other.to_string(),
                    })?;
                let mapping = single_mapping(parameters, other, parameter)?;
                Cow::Owned(mapping.extract(request).unwrap_or_default())
            }
        };
        values.push(value);
    }

    Ok(values)
}

fn single_mapping<'p>(
    parameters: &'p [ParameterMapping],
    label: &str,
    parameter: &str,
) -> Result<&'p ParameterMapping, ResolveError> {
    let mut matches = parameters
        .iter()
        .filter(|p| p.parameter_name() == parameter);

    let first = matches.next().ok_or_else(|| ResolveError::MissingMapping {
        label: label.to_string(),
        parameter: parameter.to_string(),
    })?;

    let extra = matches.count();
    if extra > 0 {
        return Err(ResolveError::AmbiguousMapping {
            parameter: parameter.to_string(),
            count: extra + 1,
        });
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn header_param(parameter: &str, label: &str) -> ParameterMapping {
        ParameterMapping::with_label(parameter, label, |req, name| {
            req.headers
                .get(format!("x-{name}"))
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        })
        .unwrap()
    }

    #[test]
    fn built_ins_come_from_the_request() {
        let req = Request::get("https://example.com/items").body(()).unwrap();
        let values = resolve_label_values(
            &names(&["method", "host"]),
            &LabelIndex::build(&[]),
            &[],
            &RequestView::from(&req),
        )
        .unwrap();
        assert_eq!(values, vec!["GET", "example.com"]);
    }

    #[test]
    fn method_case_is_preserved() {
        let req = Request::builder()
            .method(http::Method::from_bytes(b"purge").unwrap())
            .uri("http://cache.local/")
            .body(())
            .unwrap();
        let values = resolve_label_values(
            &names(&["method"]),
            &LabelIndex::build(&[]),
            &[],
            &RequestView::from(&req),
        )
        .unwrap();
        assert_eq!(values, vec!["purge"]);
    }

    #[test]
    fn absent_values_become_empty_strings() {
        let params = [header_param("version", "version"), header_param("tenant", "tenant")];
        let index = LabelIndex::build(&params);
        let req = Request::post("https://api.example.com/")
            .header("x-tenant", "acme")
            .body(())
            .unwrap();

        let values = resolve_label_values(
            &names(&["method", "host", "version", "tenant"]),
            &index,
            &params,
            &RequestView::from(&req),
        )
        .unwrap();
        assert_eq!(values, vec!["POST", "api.example.com", "", "acme"]);
    }

    #[test]
    fn output_follows_declared_order() {
        // Declared in a different order than the parameters were configured.
        let params = [header_param("a", "a"), header_param("b", "b")];
        let index = LabelIndex::build(&params);
        let req = Request::get("http://h/")
            .header("x-a", "1")
            .header("x-b", "2")
            .body(())
            .unwrap();

        let values = resolve_label_values(
            &names(&["b", "host", "a", "method"]),
            &index,
            &params,
            &RequestView::from(&req),
        )
        .unwrap();
        assert_eq!(values, vec!["2", "h", "1", "GET"]);
    }

    #[test]
    fn parameter_name_differs_from_label() {
        let params = [header_param("api-version", "version")];
        let req = Request::get("http://h/")
            .header("x-api-version", "2024-01")
            .body(())
            .unwrap();
        let values = resolve_label_values(
            &names(&["version"]),
            &LabelIndex::build(&params),
            &params,
            &RequestView::from(&req),
        )
        .unwrap();
        assert_eq!(values, vec!["2024-01"]);
    }

    #[test]
    fn unknown_label_is_a_fault() {
        let req = Request::get("http://h/").body(()).unwrap();
        let err = resolve_label_values(
            &names(&["status"]),
            &LabelIndex::build(&[]),
            &[],
            &RequestView::from(&req),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownLabel { label } if label == "status"));
    }

    #[test]
    fn missing_or_repeated_mapping_is_a_fault() {
        let req = Request::get("http://h/").body(()).unwrap();
        let view = RequestView::from(&req);
        let params = [header_param("version", "version")];
        let index = LabelIndex::build(&params);

        let err = resolve_label_values(&names(&["version"]), &index, &[], &view).unwrap_err();
        assert!(matches!(err, ResolveError::MissingMapping { .. }));

        let doubled = [header_param("version", "version"), header_param("version", "v2")];
        let err = resolve_label_values(&names(&["version"]), &index, &doubled, &view).unwrap_err();
        assert!(matches!(err, ResolveError::AmbiguousMapping { count: 2, .. }));
    }
}
