//! Object keys in URLs.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but RFC 3986 unreserved characters is escaped inside a segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode each `/`-separated segment of `key` for use as a URL path.
pub fn url_path(key: &str) -> String {
    key.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_keys_are_unchanged() {
        assert_eq!(url_path("photo.jpg"), "photo.jpg");
        assert_eq!(url_path("holiday/2024/c.jpg"), "holiday/2024/c.jpg");
    }

    #[test]
    fn test_segments_are_escaped_but_separators_kept() {
        assert_eq!(url_path("holiday/beach 1.png"), "holiday/beach%201.png");
        assert_eq!(url_path("smile~[1].jpg"), "smile~%5B1%5D.jpg");
        assert_eq!(url_path("50%#off?.png"), "50%25%23off%3F.png");
        assert_eq!(url_path("café.jpg"), "caf%C3%A9.jpg");
    }
}
