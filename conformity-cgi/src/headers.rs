// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use conformity_http::ServerParams;

/// Meta-variables that carry a header without the `HTTP_` prefix.
const CONTENT_VARIABLES: [&str; 3] = ["CONTENT_MD5", "CONTENT_LENGTH", "CONTENT_TYPE"];

/// Collect the request headers from the server parameters.
///
/// `HTTP_X_FOO_BAR` becomes `x-foo-bar`, and the `CONTENT_*` variables are
/// mapped the same way. `HTTP_COOKIE` is skipped, since the cookies are
/// supplied separately, and so are empty values. The headers keep the order
/// of the server parameters.
///
/// # References
/// * [RFC 3875 Section 4.1.18](https://www.rfc-editor.org/rfc/rfc3875.html#section-4.1.18)
pub fn marshal_headers(server: &ServerParams) -> Vec<(String, String)> {
    server.iter()
        .filter(|(_, value)| !value.is_empty())
        .filter_map(|(key, value)| {
            let name = match key.strip_prefix("HTTP_") {
                Some("COOKIE") => return None,
                Some(name) => name,
                None if CONTENT_VARIABLES.contains(&key) => key,
                None => return None,
            };

            Some((header_name(name), value.to_string()))
        })
        .collect()
}

fn header_name(variable: &str) -> String {
    variable.replace('_', "-").to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_marshal_headers() {
        let server = ServerParams::from([
            ("HTTP_COOKIE", "COOKIE"),
            ("HTTP_AUTHORIZATION", "token"),
            ("HTTP_CONTENT_TYPE", "application/json"),
            ("HTTP_ACCEPT", "application/json"),
            ("HTTP_X_FOO_BAR", "FOOBAR"),
            ("CONTENT_MD5", "CONTENT-MD5"),
            ("CONTENT_LENGTH", "UNSPECIFIED"),
        ]);

        let expected = [
            ("authorization", "token"),
            ("content-type", "application/json"),
            ("accept", "application/json"),
            ("x-foo-bar", "FOOBAR"),
            ("content-md5", "CONTENT-MD5"),
            ("content-length", "UNSPECIFIED"),
        ];

        let headers = marshal_headers(&server);
        assert_eq!(headers.len(), expected.len());
        for ((name, value), (expected_name, expected_value)) in headers.iter().zip(expected) {
            assert_eq!(name, expected_name);
            assert_eq!(value, expected_value);
        }
    }

    #[rstest]
    #[case("REQUEST_METHOD", "GET")]
    #[case("SERVER_NAME", "example.com")]
    #[case("HTTP_ACCEPT", "")]
    #[case("CONTENT_TYPE", "")]
    #[case("HTTP_COOKIE", "a=b")]
    fn test_ignored_variables(#[case] key: &str, #[case] value: &str) {
        let server = ServerParams::from([(key, value)]);
        assert!(marshal_headers(&server).is_empty());
    }
}
