// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use conformity_http::{
    Error,
    HeaderBag,
    ServerParams,
    Uri,
};

/// The host and port of the request, resolved together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostAndPort {
    pub host: String,
    pub port: Option<u16>,
}

/// Truncate the path at the first `?`.
#[must_use]
pub fn strip_query_string(path: &str) -> &str {
    match path.split_once('?') {
        Some((path, _)) => path,
        None => path,
    }
}

/// Resolve the request URI, which contains the path and possibly the query
/// and fragment. The first source present wins:
///
/// 1. `UNENCODED_URL`, when IIS rewrote the URL (`IIS_WasUrlRewritten`),
/// 2. `HTTP_X_ORIGINAL_URL`, then `HTTP_X_REWRITE_URL`,
/// 3. `REQUEST_URI`, without `scheme://authority` and without the query,
/// 4. `ORIG_PATH_INFO`, without the query,
/// 5. `/`.
pub fn marshal_request_uri(server: &ServerParams) -> String {
    if server.is_truthy("IIS_WasUrlRewritten") {
        if let Some(unencoded) = server.get("UNENCODED_URL").filter(|url| !url.is_empty()) {
            log::debug!("Using UNENCODED_URL as the request URI");
            return unencoded.to_string();
        }
    }

    for key in ["HTTP_X_ORIGINAL_URL", "HTTP_X_REWRITE_URL"] {
        if let Some(url) = server.get(key) {
            log::debug!("Using {key} as the request URI");
            return url.to_string();
        }
    }

    if let Some(request_uri) = server.get("REQUEST_URI") {
        let path = strip_query_string(strip_scheme_and_authority(request_uri));
        return match path {
            "" => "/".to_string(),
            path => path.to_string(),
        };
    }

    if let Some(path_info) = server.get("ORIG_PATH_INFO") {
        return strip_query_string(path_info).to_string();
    }

    "/".to_string()
}

/// Remove a leading `scheme://authority`, i.e. everything up to the first
/// `/`, `?` or `#` after the `://`.
fn strip_scheme_and_authority(uri: &str) -> &str {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri;
    };

    if scheme.is_empty() || scheme.contains(['/', '?', '#']) {
        return uri;
    }

    match rest.find(['/', '?', '#']) {
        Some(index) => &rest[index..],
        None => "",
    }
}

/// Resolve the host and port, from the `Host` header or, lacking that, from
/// `SERVER_NAME` and `SERVER_PORT`.
///
/// Some servers put an IPv6 address in brackets in `SERVER_NAME`, and glue
/// the port to the address inside the brackets. When `SERVER_ADDR` is known,
/// the host is rebuilt from it and the glued port is recovered.
///
/// A port that isn't a number in `1..=65535` is an error, and leaves the
/// accumulator as it was.
pub fn marshal_host_and_port_from_headers(accumulator: &mut HostAndPort, server: &ServerParams, headers: &HeaderBag) -> Result<(), Error> {
    if let Some(host) = headers.first("host") {
        let (host, port) = split_host_header(host)?;
        accumulator.host = host.to_string();
        accumulator.port = port;
        return Ok(());
    }

    let Some(server_name) = server.get("SERVER_NAME") else {
        return Ok(());
    };

    let mut port = match server.get("SERVER_PORT").filter(|port| !port.is_empty()) {
        Some(port) => Some(parse_port(port)?),
        None => accumulator.port,
    };
    let mut host = server_name.to_string();

    let server_addr = server.get("SERVER_ADDR").filter(|addr| !addr.is_empty());
    if let (Some(server_addr), Some(inner)) = (server_addr, bracketed_ipv6(server_name)) {
        host = format!("[{server_addr}]");
        if let Some(embedded) = embedded_port(inner, server_addr) {
            port = Some(embedded);
        }
    }

    accumulator.host = host;
    accumulator.port = port;
    Ok(())
}

/// The port glued to the address in `addr:port`. Hex digits compare
/// case-insensitively.
fn embedded_port(inner: &str, server_addr: &str) -> Option<u16> {
    let prefix = inner.get(..server_addr.len())?;
    if !prefix.eq_ignore_ascii_case(server_addr) {
        return None;
    }

    let digits = inner.get(server_addr.len()..)?.strip_prefix(':')?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|port| *port != 0)
}

/// Build the URI of the request from the server parameters and the headers.
pub fn marshal_uri_from_server(server: &ServerParams, headers: &HeaderBag) -> Result<Uri, Error> {
    let mut uri = Uri::new().with_scheme(&marshal_scheme(server, headers))?;

    let mut accumulator = HostAndPort::default();
    marshal_host_and_port_from_headers(&mut accumulator, server, headers)?;
    uri = uri.with_host(&accumulator.host)?
        .with_port(accumulator.port.map(u32::from))?;

    let request_uri = marshal_request_uri(server);
    let (request_uri, fragment) = match request_uri.split_once('#') {
        Some((request_uri, fragment)) => (request_uri, Some(fragment)),
        None => (request_uri.as_str(), None),
    };
    uri = uri.with_path(strip_query_string(request_uri))?;

    let query = match server.get("QUERY_STRING") {
        Some(query) => Some(query),
        None => server.get("REQUEST_URI")
            .and_then(|request_uri| request_uri.split_once('?'))
            .map(|(_, query)| query.split_once('#').map_or(query, |(query, _)| query)),
    };
    if let Some(query) = query {
        uri = uri.with_query(query)?;
    }

    if let Some(fragment) = fragment {
        uri = uri.with_fragment(fragment);
    }

    Ok(uri)
}

fn marshal_scheme(server: &ServerParams, headers: &HeaderBag) -> String {
    if let Some(https) = server.get("HTTPS") {
        if !https.is_empty() && !https.eq_ignore_ascii_case("off") {
            return "https".to_string();
        }
    }

    match headers.first("x-forwarded-proto") {
        Some(scheme) if conformity_http::syntax::is_valid_scheme(scheme) => scheme.to_string(),
        Some(scheme) => {
            log::debug!("Ignoring invalid X-Forwarded-Proto: {scheme:?}");
            "http".to_string()
        }
        None => "http".to_string(),
    }
}

/// Split `host[:port]`, where the host may be a bracketed IPv6 literal. An
/// empty port, as in `example.com:`, means no port.
///
/// ```text
/// Host = uri-host [ ":" port ]
/// ```
fn split_host_header(value: &str) -> Result<(&str, Option<u16>), Error> {
    let (host, port) = match value.strip_prefix('[').and_then(|_| value.find(']')) {
        Some(end) => {
            let (host, rest) = value.split_at(end + 1);
            match rest.strip_prefix(':') {
                Some(port) => (host, port),
                None if rest.is_empty() => (host, ""),
                None => return Err(Error::MalformedUri(value.to_string())),
            }
        }
        None => value.rsplit_once(':').unwrap_or((value, "")),
    };

    match port {
        "" => Ok((host, None)),
        port => Ok((host, Some(parse_port(port)?))),
    }
}

/// Returns the text inside the brackets of `[hex:digits:and:colons]`.
fn bracketed_ipv6(name: &str) -> Option<&str> {
    let inner = name.strip_prefix('[')?.strip_suffix(']')?;
    if !inner.is_empty() && inner.bytes().all(|byte| byte == b':' || byte.is_ascii_hexdigit()) {
        Some(inner)
    } else {
        None
    }
}

/// ```text
/// port = *DIGIT
/// ```
fn parse_port(value: &str) -> Result<u16, Error> {
    if value.is_empty() || value.len() > 5 || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(Error::MalformedUri(value.to_string()));
    }

    let port: u32 = value.parse().map_err(|_| Error::MalformedUri(value.to_string()))?;
    match u16::try_from(port) {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(Error::InvalidPort(port)),
    }
}
