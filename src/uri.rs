//! Request URI construction for the user service.

use url::Url;

use crate::error::UriError;

/// Path prefix used by the read-only lookup client.
pub const USERS_PATH: &str = "/users";

/// Path prefix used by the management client.
pub const SERVICE_USERS_PATH: &str = "/users-roles-internal/service/users";

const DELIMITER: char = '/';

/// Build `{scheme}://{host}{path_prefix}[/{segment}]`.
///
/// The host may include a port. The segment is joined verbatim; any encoding
/// is whatever `Url` applies when setting the path. A segment that would not
/// stay a single path component under the prefix is rejected.
pub fn build_uri(
    scheme: &str,
    host: &str,
    path_prefix: &str,
    segment: Option<&str>,
) -> Result<Url, UriError> {
    if scheme.trim().is_empty() {
        return Err(UriError::EmptyScheme);
    }
    if host.trim().is_empty() {
        return Err(UriError::EmptyHost);
    }

    let base = format!("{scheme}://{host}");
    let mut uri = Url::parse(&base).map_err(|source| UriError::Invalid {
        uri: base.clone(),
        source,
    })?;

    let path = match segment {
        Some(segment) if !is_single_segment(segment) => {
            return Err(UriError::InvalidSegment(segment.to_string()));
        }
        Some(segment) => format!("{path_prefix}{DELIMITER}{segment}"),
        None => path_prefix.to_string(),
    };
    uri.set_path(&path);

    Ok(uri)
}

// `Url` treats `\` as a delimiter for http(s) and `%2e` as a dot.
fn is_single_segment(segment: &str) -> bool {
    if segment.trim().is_empty() || segment.contains([DELIMITER, '\\']) {
        return false;
    }
    let dots = segment.to_ascii_lowercase().replace("%2e", ".");
    dots != "." && dots != ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_uri_with_segment() {
        let uri = build_uri("http", "example.org", "/users", Some("alice")).unwrap();
        assert_eq!(uri.as_str(), "http://example.org/users/alice");
    }

    #[test]
    fn test_build_uri_without_segment() {
        let uri = build_uri("http", "example.org", "/users", None).unwrap();
        assert_eq!(uri.as_str(), "http://example.org/users");
    }

    #[test]
    fn test_build_uri_service_path() {
        let uri = build_uri("https", "api.example.org", SERVICE_USERS_PATH, Some("alice")).unwrap();
        assert_eq!(
            uri.as_str(),
            "https://api.example.org/users-roles-internal/service/users/alice"
        );
    }

    #[test]
    fn test_build_uri_with_port() {
        let uri = build_uri("http", "127.0.0.1:8080", USERS_PATH, Some("bob")).unwrap();
        assert_eq!(uri.as_str(), "http://127.0.0.1:8080/users/bob");
    }

    #[test]
    fn test_build_uri_is_deterministic() {
        let a = build_uri("http", "example.org", USERS_PATH, Some("alice")).unwrap();
        let b = build_uri("http", "example.org", USERS_PATH, Some("alice")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_uri_rejects_empty_scheme_or_host() {
        assert!(matches!(
            build_uri("", "example.org", USERS_PATH, None),
            Err(UriError::EmptyScheme)
        ));
        assert!(matches!(
            build_uri("http", "", USERS_PATH, None),
            Err(UriError::EmptyHost)
        ));
    }

    #[test]
    fn test_build_uri_rejects_unparsable_host() {
        let result = build_uri("http", "exa mple.org", USERS_PATH, None);
        assert!(matches!(result, Err(UriError::Invalid { .. })));
    }

    #[test]
    fn test_build_uri_rejects_segments_outside_prefix() {
        for segment in [
            "",
            " ",
            ".",
            "..",
            "a/b",
            "../../../admin",
            "/admin",
            "..\\admin",
            "%2e%2E",
            ".%2e",
        ] {
            let result = build_uri("http", "example.org", SERVICE_USERS_PATH, Some(segment));
            assert!(
                matches!(&result, Err(UriError::InvalidSegment(s)) if s == segment),
                "{segment:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_build_uri_keeps_dots_inside_segment() {
        let uri = build_uri("http", "example.org", USERS_PATH, Some("a.b..c")).unwrap();
        assert_eq!(uri.as_str(), "http://example.org/users/a.b..c");
    }
}
