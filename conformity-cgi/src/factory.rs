// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use conformity_http::{
    Error,
    HeaderBag,
    HttpMessage,
    HttpRequest,
    HttpVersion,
    Method,
    Params,
    ParsedBody,
    Request,
    ServerParams,
    ServerRequest,
    Stream,
};

use crate::{
    environment::{
        normalize_server,
        NoRequestHeaders,
        RequestHeaderSource,
    },
    files::{
        normalize_files,
        RawFiles,
    },
    headers::marshal_headers,
    uri::marshal_uri_from_server,
};

/// The raw inputs delivered by the hosting environment.
#[derive(Clone, Debug, Default)]
pub struct Globals {
    pub server: ServerParams,
    pub query: Params,
    pub body: ParsedBody,
    pub cookies: Params,
    pub files: RawFiles,

    /// The unparsed request body.
    pub input: Stream,
}

/// Fallbacks for values the server parameters may lack.
#[derive(Clone, Debug)]
pub struct FactoryConfig {
    /// Used when `SERVER_PROTOCOL` is absent.
    pub default_protocol_version: HttpVersion,

    /// Used when `REQUEST_METHOD` is absent.
    pub default_method: Method,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            default_protocol_version: HttpVersion::Http11,
            default_method: Method::Get,
        }
    }
}

/// Builds a [`ServerRequest`] from the [`Globals`] of the environment.
#[derive(Clone, Debug, Default)]
pub struct ServerRequestFactory<S = NoRequestHeaders> {
    header_source: S,
    config: FactoryConfig,
}

impl ServerRequestFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> ServerRequestFactory<S>
        where S: RequestHeaderSource {
    /// Use another strategy for reaching the raw request headers.
    pub fn with_header_source<T: RequestHeaderSource>(self, header_source: T) -> ServerRequestFactory<T> {
        ServerRequestFactory {
            header_source,
            config: self.config,
        }
    }

    #[must_use]
    pub fn with_config(self, config: FactoryConfig) -> Self {
        Self { config, ..self }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Marshal the headers, URI, method and protocol version from the server
    /// parameters, and attach the query, body, cookies and normalized files.
    pub fn from_globals(&self, globals: Globals) -> Result<ServerRequest, Error> {
        let server = normalize_server(&globals.server, &self.header_source);

        if cfg!(feature = "debugging") {
            for (key, value) in server.iter() {
                log::trace!("Server parameter {key}={value:?}");
            }
        }

        let files = normalize_files(&globals.files)?;
        let headers = HeaderBag::try_from_pairs(marshal_headers(&server))?;
        let uri = marshal_uri_from_server(&server, &headers)?;

        let method = match server.get("REQUEST_METHOD") {
            Some(method) => Method::parse(method)?,
            None => self.config.default_method.clone(),
        };

        let request = Request::new(method, uri, headers)?.with_body(globals.input);
        let request = match server.get("SERVER_PROTOCOL") {
            Some(version) => request.with_protocol_version(version)?,
            None => request.with_version(self.config.default_protocol_version),
        };

        log::debug!("Marshaled {} {} HTTP/{} from the server parameters",
            request.method(), request.request_target(), request.protocol_version().as_str());

        Ok(ServerRequest::new(request, server)
            .with_query_params(globals.query)
            .with_parsed_body(globals.body)
            .with_cookie_params(globals.cookies)
            .with_uploaded_files(files))
    }
}
