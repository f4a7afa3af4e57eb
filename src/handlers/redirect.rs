use std::{collections::HashMap, sync::LazyLock};
use actix_web::{
    http::{
        header::{self, HeaderValue},
        Method, StatusCode,
    },
    HttpRequest,
};
use percent_encoding::{utf8_percent_encode, CONTROLS};
use url::{ParseError, Position, Url};

use super::{Handler, ResponseWriter};

// Stand-in origin for resolving relative targets; only the path part of a
// resolved URL is ever written out.
static LOCAL_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://localhost/").expect("local base url is valid"));

/// Redirects mapped paths and then hands the request to its fallback.
///
/// The fallback runs on every request, including ones that were redirected.
/// A redirect commits the response, so a fallback that writes after it can
/// only append to the body.
#[derive(Debug)]
pub struct PathRedirector<F> {
    paths: HashMap<String, String>,
    fallback: F,
}

/// Builds a [`PathRedirector`] over `paths`, keyed by escaped request path.
pub fn map_handler<F: Handler>(paths: HashMap<String, String>, fallback: F) -> PathRedirector<F> {
    PathRedirector { paths, fallback }
}

impl<F> PathRedirector<F> {
    /// Mapped URL for `path`. An empty URL counts as no mapping.
    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.paths
            .get(path)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    pub fn paths(&self) -> &HashMap<String, String> {
        &self.paths
    }
}

impl<F: Handler> Handler for PathRedirector<F> {
    fn serve(&self, req: &HttpRequest, w: &mut ResponseWriter) {
        let path = req.uri().path();
        if let Some(url) = self.lookup(path) {
            log::debug!("redirecting {} to {}", path, url);
            redirect(req, w, url, StatusCode::SEE_OTHER);
        }
        self.fallback.serve(req, w);
    }
}

/// Writes a redirect to `url` with the given status.
///
/// Targets without a scheme or host are taken relative to the request path.
pub fn redirect(req: &HttpRequest, w: &mut ResponseWriter, url: &str, status: StatusCode) {
    let raw_path = req.uri().path();
    let request_path = urlencoding::decode(raw_path).unwrap_or_else(|_| raw_path.into());
    let target = resolve_location(&request_path, url);

    let location = utf8_percent_encode(&target, CONTROLS).to_string();
    match HeaderValue::from_str(&location) {
        Ok(value) => w.insert_header(header::LOCATION, value),
        Err(err) => log::warn!("cannot use {:?} as a Location header: {}", location, err),
    }

    let method = req.method();
    if method == Method::GET || method == Method::HEAD {
        w.insert_header(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
    }
    w.write_status(status);

    if method == Method::GET {
        let reason = status.canonical_reason().unwrap_or("Redirect");
        let body = format!("<a href=\"{}\">{}</a>.\n", html_escape(&target), reason);
        w.write(body.as_bytes());
    }
}

/// Absolute targets (and ones `Url` cannot parse at all) pass through as
/// written. Relative ones are joined onto the decoded request path.
fn resolve_location(request_path: &str, url: &str) -> String {
    match Url::parse(url) {
        Err(ParseError::RelativeUrlWithoutBase) => {}
        _ => return url.to_string(),
    }

    let mut base = LOCAL_BASE.clone();
    base.set_path(request_path);
    let joined = match base.join(url) {
        Ok(joined) => joined,
        Err(err) => {
            log::debug!("cannot resolve {:?} against {:?}: {}", url, request_path, err);
            return url.to_string();
        }
    };

    if url.starts_with("//") {
        // scheme-relative: keep the authority, drop the stand-in scheme
        joined[Position::AfterScheme..].trim_start_matches(':').to_string()
    } else {
        joined[Position::BeforePath..].to_string()
    }
}

fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
