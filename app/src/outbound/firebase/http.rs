//! Helpers shared by the Firebase adapters.

use reqwest::Url;

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Join `path` onto an origin, keeping any path prefix the origin carries.
///
/// Firebase paths contain `:` (`accounts:signUp`, `documents:runQuery`),
/// which `Url::join` would read as a scheme, so the join is textual.
pub(super) fn endpoint_url(origin: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = origin.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/{}", path.trim_start_matches('/')))
}

/// Collapse whitespace and truncate a response body for log-friendly errors.
pub(super) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://identitytoolkit.googleapis.com", "v1/accounts:signUp")]
    #[case("https://identitytoolkit.googleapis.com/", "/v1/accounts:signUp")]
    fn joins_colon_paths(#[case] origin: &str, #[case] path: &str) {
        let origin = Url::parse(origin).expect("origin");
        let url = endpoint_url(&origin, path).expect("joined");
        assert_eq!(
            url.as_str(),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp"
        );
    }

    #[test]
    fn keeps_emulator_path_prefixes() {
        let origin = Url::parse("http://localhost:9099/identitytoolkit.googleapis.com")
            .expect("origin");
        let url = endpoint_url(&origin, "v1/accounts:signInWithPassword").expect("joined");
        assert_eq!(
            url.as_str(),
            "http://localhost:9099/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword"
        );
    }

    #[test]
    fn previews_are_compacted_and_truncated() {
        let long = format!("{{\n  \"error\": \"{}\"\n}}", "x".repeat(400));
        let preview = body_preview(long.as_bytes());
        assert!(preview.starts_with("{ \"error\": \"xxx"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHAR_LIMIT + 3);
    }
}
