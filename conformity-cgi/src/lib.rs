// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Marshaling of a [`conformity_http::ServerRequest`] from the parameters a
//! CGI-style hosting environment hands to the application.
//!
//! # References
//! * [RFC 3875](https://www.rfc-editor.org/rfc/rfc3875.html)

pub mod environment;
pub mod factory;
pub mod files;
pub mod headers;
pub mod uri;

pub use environment::{
    normalize_server,
    NoRequestHeaders,
    RequestHeaderSource,
};
pub use factory::{
    FactoryConfig,
    Globals,
    ServerRequestFactory,
};
pub use files::{
    normalize_files,
    RawFileValue,
    RawFiles,
};
pub use headers::marshal_headers;
pub use uri::{
    marshal_host_and_port_from_headers,
    marshal_request_uri,
    marshal_uri_from_server,
    strip_query_string,
    HostAndPort,
};
