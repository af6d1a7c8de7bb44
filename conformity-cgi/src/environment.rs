// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use conformity_http::ServerParams;

/// The server parameter carrying the `Authorization` header.
pub const AUTHORIZATION_KEY: &str = "HTTP_AUTHORIZATION";

/// Retrieves the raw request headers straight from the hosting environment.
///
/// Some hosts (e.g. Apache running an embedded interpreter) withhold the
/// `Authorization` header from the server parameters, but expose it through
/// a separate API. Closures returning the header pairs implement this trait.
pub trait RequestHeaderSource {
    fn request_headers(&self) -> Vec<(String, String)>;
}

impl<F> RequestHeaderSource for F
    where F: Fn() -> Vec<(String, String)> {
    fn request_headers(&self) -> Vec<(String, String)> {
        self()
    }
}

/// The header source of environments without such an integration.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoRequestHeaders;

impl RequestHeaderSource for NoRequestHeaders {
    fn request_headers(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// Inject the `Authorization` header from the header source when the server
/// parameters lack it. Any other parameter stays as it was.
pub fn normalize_server<S>(server: &ServerParams, source: &S) -> ServerParams
    where S: RequestHeaderSource + ?Sized {
    if server.contains(AUTHORIZATION_KEY) {
        return server.clone();
    }

    let authorization = source.request_headers()
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("authorization"));

    match authorization {
        Some((_, value)) => {
            log::debug!("Injecting the Authorization header from the request header source");
            server.clone().with(AUTHORIZATION_KEY, value)
        }
        None => server.clone(),
    }
}
