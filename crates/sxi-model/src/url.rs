//! URL normalization and validation
//!
//! Every URL stored in an [`InstanceList`](crate::InstanceList) is in the
//! canonical form produced by [`normalize`]:
//! - scheme and host lower-cased, host in IDNA ASCII form
//! - no query, no fragment, no bare `/` path
//! - `https` for regular hosts, `http` for `.onion` / `.i2p` hosts
//!
//! The scheme rule lives in [`scheme_allowed`] and nowhere else.

use ::url::Url;

/// Top-level labels of networks that are reached over plain `http`
const HTTP_ONLY_TLDS: [&str; 2] = ["onion", "i2p"];

/// Why a URL cannot be stored as-is
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlProblem {
    /// Not parsable as an absolute URL with a host
    #[error("not a valid URL")]
    Unparsable,

    /// Scheme does not match the host kind
    #[error("the protocol is neither https nor http with an .onion/.i2p TLD")]
    SchemeMismatch,

    /// A query string is present
    #[error("no query in the URL")]
    HasQuery,

    /// A fragment is present
    #[error("no fragment in the URL")]
    HasFragment,

    /// URL differs from its canonical form
    #[error("URL must be normalized to {0}")]
    NotNormalized(String),
}

/// Whether the host belongs to a network without ordinary TLS (onion, i2p)
///
/// Neither label can end an IP address, so no address check is needed.
#[inline]
#[must_use]
pub fn host_uses_http(host: &str) -> bool {
    host.rsplit('.')
        .next()
        .is_some_and(|tld| HTTP_ONLY_TLDS.iter().any(|t| tld.eq_ignore_ascii_case(t)))
}

/// Scheme rule: `https` on regular hosts, `http` on onion/i2p hosts
#[inline]
#[must_use]
pub fn scheme_allowed(scheme: &str, host: &str) -> bool {
    let http_host = host_uses_http(host);
    (scheme == "https" && !http_host) || (scheme == "http" && http_host)
}

/// Canonicalize a candidate URL
///
/// Accepts bare hosts (`searx.me`), scheme-relative URLs (`//searx.me`) and
/// absolute URLs. Returns `None` when the result would break the scheme rule.
///
/// # Examples
///
/// ```
/// use sxi_model::url::normalize;
///
/// assert_eq!(normalize("searx.me").as_deref(), Some("https://searx.me"));
/// assert_eq!(normalize("searx.onion").as_deref(), Some("http://searx.onion"));
/// assert_eq!(normalize("http://searx.me"), None);
/// ```
#[must_use]
pub fn normalize(url: &str) -> Option<String> {
    let parsed = parse_candidate(url.trim())?;
    let host = parsed.host_str()?;
    if !scheme_allowed(parsed.scheme(), host) {
        return None;
    }
    Some(canonical_form(&parsed, host))
}

/// Check that a URL is already canonical and obeys the scheme rule
///
/// # Errors
/// Returns the first [`UrlProblem`] found.
pub fn validate(url: &str) -> Result<(), UrlProblem> {
    let normalized = normalize(url);
    if normalized.as_deref() == Some(url) {
        return Ok(());
    }

    let Ok(parsed) = Url::parse(url) else {
        return Err(normalized.map_or(UrlProblem::Unparsable, UrlProblem::NotNormalized));
    };
    let Some(host) = parsed.host_str() else {
        return Err(UrlProblem::Unparsable);
    };
    if !scheme_allowed(&parsed.scheme().to_ascii_lowercase(), &host.to_ascii_lowercase()) {
        return Err(UrlProblem::SchemeMismatch);
    }
    if parsed.query().is_some() {
        return Err(UrlProblem::HasQuery);
    }
    if parsed.fragment().is_some() {
        return Err(UrlProblem::HasFragment);
    }
    Err(normalized.map_or(UrlProblem::Unparsable, UrlProblem::NotNormalized))
}

/// Parse input, completing a missing scheme from the host kind
fn parse_candidate(input: &str) -> Option<Url> {
    if input.is_empty() {
        return None;
    }

    if has_scheme(input) {
        return Url::parse(input).ok();
    }

    // No scheme: either `//host/path` or a bare `host/path`
    let authority = input.strip_prefix("//").unwrap_or(input);
    let mut parsed = Url::parse(&format!("https://{authority}")).ok()?;
    if host_uses_http(parsed.host_str()?) {
        parsed.set_scheme("http").ok()?;
    }
    Some(parsed)
}

/// `scheme://` prefix per RFC 3986 (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`)
fn has_scheme(input: &str) -> bool {
    let Some((scheme, rest)) = input.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_alpha
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && rest.starts_with("//")
}

fn canonical_form(parsed: &Url, host: &str) -> String {
    let mut out = String::with_capacity(parsed.as_str().len());
    out.push_str(parsed.scheme());
    out.push_str("://");

    if !parsed.username().is_empty() {
        out.push_str(parsed.username());
        if let Some(password) = parsed.password() {
            out.push(':');
            out.push_str(password);
        }
        out.push('@');
    }

    out.push_str(host);
    if let Some(port) = parsed.port() {
        out.push(':');
        out.push_str(&port.to_string());
    }

    let path = parsed.path();
    if path != "/" {
        out.push_str(path);
    }

    uppercase_percent_escapes(&out)
}

/// RFC 3986 §6.2.2.1: hex digits of percent escapes are upper case
fn uppercase_percent_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        out.push('%');
        let after = &rest[pos + 1..];
        match after.get(..2) {
            Some(hex) if hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                out.push_str(&hex.to_ascii_uppercase());
                rest = &after[2..];
            }
            _ => rest = after,
        }
    }
    out.push_str(rest);
    out
}
