use std::collections::HashMap;
use serde::Deserialize;

use crate::handlers::{map_handler, Handler, PathRedirector};

/// One entry of a redirect document. A missing or null field reads as `""`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PathRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The redirect document is not a sequence of `path`/`url` records.
#[derive(Debug, thiserror::Error)]
#[error("invalid redirect document: {0}")]
pub struct ParseError(#[from] serde_yaml::Error);

/// Decodes the first document of `document`; later documents are ignored.
/// Null entries become empty records.
pub fn parse_yaml(document: &[u8]) -> Result<Vec<PathRecord>, ParseError> {
    let Some(first) = serde_yaml::Deserializer::from_slice(document).next() else {
        return Ok(Vec::new());
    };
    let entries = Option::<Vec<Option<PathRecord>>>::deserialize(first)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Later records overwrite earlier ones with the same path.
pub fn build_mapping(records: Vec<PathRecord>) -> HashMap<String, String> {
    let mut paths = HashMap::with_capacity(records.len());
    for record in records {
        paths.insert(record.path, record.url);
    }
    paths
}

/// Parses a YAML redirect document of the form
///
/// ```yaml
/// - path: /some-path
///   url: https://www.some-url.com/demo
/// ```
///
/// and builds a [`PathRedirector`] over it. On a malformed document the
/// fallback is dropped without being called.
pub fn yaml_handler<F: Handler>(document: &[u8], fallback: F) -> Result<PathRedirector<F>, ParseError> {
    let records = parse_yaml(document)?;
    Ok(map_handler(build_mapping(records), fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{handler_fn, ResponseWriter};
    use actix_web::{
        http::{header, StatusCode},
        test::TestRequest,
        HttpRequest,
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn counting_fallback(calls: Arc<AtomicUsize>) -> impl Handler {
        handler_fn(move |_: &HttpRequest, _: &mut ResponseWriter| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn location(handler: &impl Handler, uri: &str) -> Option<String> {
        let req = TestRequest::with_uri(uri).to_http_request();
        let mut w = ResponseWriter::new();
        handler.serve(&req, &mut w);
        w.headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn go_document_redirects_and_falls_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = yaml_handler(
            b"- path: /go\n  url: https://go.dev\n",
            counting_fallback(calls.clone()),
        )
        .unwrap();

        let req = TestRequest::with_uri("/go").to_http_request();
        let mut w = ResponseWriter::new();
        handler.serve(&req, &mut w);
        assert_eq!(w.status(), Some(StatusCode::SEE_OTHER));
        assert_eq!(w.headers().get(header::LOCATION).unwrap(), "https://go.dev");

        assert_eq!(location(&handler, "/other"), None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn matches_direct_mapping() {
        let document = b"
- path: /urlshort
  url: https://github.com/example/urlshort
- path: /final
  url: https://example.com/final
";
        let from_yaml = yaml_handler(document, handler_fn(|_: &HttpRequest, _: &mut ResponseWriter| {})).unwrap();
        let direct = map_handler(
            HashMap::from([
                ("/urlshort".to_string(), "https://github.com/example/urlshort".to_string()),
                ("/final".to_string(), "https://example.com/final".to_string()),
            ]),
            handler_fn(|_: &HttpRequest, _: &mut ResponseWriter| {}),
        );

        assert_eq!(from_yaml.paths(), direct.paths());
        for uri in ["/urlshort", "/final", "/nope"] {
            assert_eq!(location(&from_yaml, uri), location(&direct, uri));
        }
    }

    #[test]
    fn duplicate_paths_last_record_wins() {
        let document = b"
- path: /x
  url: https://one.example.com
- path: /x
  url: https://two.example.com
";
        let handler = yaml_handler(document, handler_fn(|_: &HttpRequest, _: &mut ResponseWriter| {})).unwrap();
        assert_eq!(location(&handler, "/x").as_deref(), Some("https://two.example.com"));
    }

    #[test]
    fn unknown_fields_are_ignored_and_missing_fields_are_empty() {
        let records = parse_yaml(b"- path: /a\n  url: https://a.example.com\n  note: hi\n- path: /b\n").unwrap();
        assert_eq!(
            records,
            vec![
                PathRecord { path: "/a".into(), url: "https://a.example.com".into() },
                PathRecord { path: "/b".into(), url: String::new() },
            ]
        );
    }

    #[test]
    fn empty_document_is_an_empty_mapping() {
        assert!(parse_yaml(b"").unwrap().is_empty());
        assert!(parse_yaml(b"  \n").unwrap().is_empty());
        assert!(parse_yaml(b"# nothing here\n").unwrap().is_empty());
        assert!(parse_yaml(b"[]").unwrap().is_empty());
    }

    #[test]
    fn null_urls_fall_through() {
        for document in [
            &b"- path: /b\n  url: ~\n"[..],
            &b"- path: /b\n  url: null\n"[..],
            &b"- path: /b\n  url:\n"[..],
        ] {
            let calls = Arc::new(AtomicUsize::new(0));
            let handler = yaml_handler(document, counting_fallback(calls.clone())).unwrap();
            assert_eq!(handler.paths().get("/b").map(String::as_str), Some(""));
            assert_eq!(location(&handler, "/b"), None);
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn null_path_is_the_empty_key() {
        let records = parse_yaml(b"- path: null\n  url: https://a.example.com\n").unwrap();
        assert_eq!(records[0].path, "");
    }

    #[test]
    fn null_entries_become_empty_records() {
        let records = parse_yaml(b"- ~\n- path: /a\n  url: https://a.example.com\n").unwrap();
        assert_eq!(
            records,
            vec![
                PathRecord::default(),
                PathRecord { path: "/a".into(), url: "https://a.example.com".into() },
            ]
        );
    }

    #[test]
    fn only_the_first_document_is_read() {
        let document = b"- path: /a\n  url: https://a.example.com\n---\n- path: /b\n  url: https://b.example.com\n";
        let handler = yaml_handler(document, handler_fn(|_: &HttpRequest, _: &mut ResponseWriter| {})).unwrap();
        assert_eq!(location(&handler, "/a").as_deref(), Some("https://a.example.com"));
        assert_eq!(location(&handler, "/b"), None);
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        let documents: [&[u8]; 4] = [
            b"just a string",
            b"path: /a\nurl: https://a.example.com\n",
            b"- path: /a\n  url: [https://a.example.com]\n",
            b"- path: /a\n  url: \"unterminated\n",
        ];
        for document in documents {
            let calls = Arc::new(AtomicUsize::new(0));
            let result = yaml_handler(document, counting_fallback(calls.clone()));
            assert!(result.is_err(), "{:?} should not parse", String::from_utf8_lossy(document));
            assert_eq!(calls.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn parse_error_carries_the_yaml_diagnostic() {
        let err = parse_yaml(b"just a string").unwrap_err();
        assert!(err.to_string().starts_with("invalid redirect document: "));
    }
}
