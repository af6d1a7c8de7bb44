// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Drives the [`ServerRequestFactory`] end to end, from raw server
//! parameters to a populated [`ServerRequest`].

use std::{
    fs,
    sync::Arc,
};

use rstest::rstest;

use conformity_cgi::{
    FactoryConfig,
    Globals,
    RawFileValue,
    RawFiles,
    ServerRequestFactory,
};
use conformity_http::{
    Error,
    HttpMessage,
    HttpRequest,
    HttpVersion,
    Method,
    Node,
    Params,
    ParsedBody,
    ServerParams,
    ServerRequest,
    Stream,
    UploadErrorCode,
};

fn globals(server: &[(&str, &str)]) -> Globals {
    Globals {
        server: server.iter().copied().collect(),
        ..Globals::default()
    }
}

fn uploaded_file_description(tmp_name: RawFileValue) -> RawFiles {
    RawFiles::new()
        .with_leaf("tmp_name", tmp_name)
        .with_leaf("size", RawFileValue::Integer(0))
        .with_leaf("error", RawFileValue::Integer(0))
        .with_leaf("name", "foo.bar".into())
        .with_leaf("type", "text/plain".into())
}

#[test]
fn creates_server_request_from_globals() {
    let base = Params::new().with_leaf("bar", "baz".to_string());
    let cookies = base.clone().with_leaf("cookies", "1".to_string());
    let query = base.clone().with_leaf("query", "1".to_string());
    let body = base.clone().with_leaf("body", "1".to_string());
    let files = RawFiles::new()
        .with_branch("files", uploaded_file_description(Stream::from("hello").into()));

    let request = ServerRequestFactory::new()
        .from_globals(Globals {
            server: ServerParams::from([
                ("SERVER_PROTOCOL", "1.1"),
                ("HTTP_HOST", "example.com"),
                ("HTTP_ACCEPT", "application/json"),
                ("REQUEST_METHOD", "POST"),
                ("REQUEST_URI", "/foo/bar"),
                ("QUERY_STRING", "bar=baz"),
            ]),
            query: query.clone(),
            body: ParsedBody::Fields(body.clone()),
            cookies: cookies.clone(),
            files,
            input: Stream::from("bar=baz&body=1"),
        })
        .unwrap();

    assert_eq!(request.cookie_params(), &cookies);
    assert_eq!(request.query_params(), &query);
    assert_eq!(request.parsed_body().fields(), Some(&body));
    assert!(request.attributes().is_empty());

    assert_eq!(request.method(), &Method::Post);
    assert_eq!(request.protocol_version(), HttpVersion::Http11);
    assert_eq!(request.uri().to_string(), "http://example.com/foo/bar?bar=baz");
    assert_eq!(request.request_target(), "/foo/bar?bar=baz");
    assert_eq!(request.header_line("accept"), "application/json");
    assert_eq!(request.header_line("Host"), "example.com");
    assert_eq!(request.body().contents().unwrap(), b"bar=baz&body=1");
    assert_eq!(request.server_params().get("REQUEST_METHOD"), Some("POST"));

    let Some(Node::Leaf(file)) = request.uploaded_files().get("files") else {
        panic!("no uploaded file: {:?}", request.uploaded_files());
    };
    assert_eq!(file.size(), Some(0));
    assert_eq!(file.error(), UploadErrorCode::Ok);
    assert_eq!(file.client_filename(), Some("foo.bar"));
    assert_eq!(file.client_media_type(), Some("text/plain"));
    assert_eq!(file.stream().unwrap().contents().unwrap(), b"hello");
}

#[test]
fn falls_back_to_configured_defaults() {
    let request = ServerRequestFactory::new()
        .with_config(FactoryConfig {
            default_protocol_version: HttpVersion::Http10,
            default_method: Method::Head,
        })
        .from_globals(Globals::default())
        .unwrap();

    assert_eq!(request.method(), &Method::Head);
    assert_eq!(request.protocol_version(), HttpVersion::Http10);
    assert_eq!(request.uri().host(), "");
    assert_eq!(request.uri().path(), "/");
    assert_eq!(request.request_target(), "/");
    assert!(request.headers().is_empty());
    assert!(request.parsed_body().is_none());
    assert!(request.uploaded_files().is_empty());
}

#[test]
fn default_config_uses_get_over_http_1_1() {
    let request = ServerRequestFactory::new()
        .from_globals(Globals::default())
        .unwrap();

    assert_eq!(request.method(), &Method::Get);
    assert_eq!(request.protocol_version(), HttpVersion::Http11);
}

#[rstest]
#[case("HTTP/1.0", HttpVersion::Http10)]
#[case("HTTP/1.1", HttpVersion::Http11)]
#[case("HTTP/2", HttpVersion::Http2)]
#[case("2.0", HttpVersion::Http2)]
fn reads_server_protocol(#[case] protocol: &str, #[case] expected: HttpVersion) {
    let request = ServerRequestFactory::new()
        .from_globals(globals(&[("SERVER_PROTOCOL", protocol)]))
        .unwrap();
    assert_eq!(request.protocol_version(), expected);
}

#[rstest]
#[case(&[("SERVER_PROTOCOL", "HTTP/4")])]
#[case(&[("REQUEST_METHOD", "GE T")])]
#[case(&[("REQUEST_METHOD", "")])]
#[case(&[("HTTP_HOST", "exa mple.com")])]
#[case(&[("HTTP_HOST", "example.com:99999")])]
#[case(&[("SERVER_NAME", "example.com"), ("SERVER_PORT", "http")])]
fn rejects_invalid_server_parameters(#[case] server: &[(&str, &str)]) {
    assert!(ServerRequestFactory::new().from_globals(globals(server)).is_err());
}

#[test]
fn injects_authorization_from_header_source() {
    let factory = ServerRequestFactory::new()
        .with_header_source(|| vec![("authorization".to_string(), "Bearer abc".to_string())]);

    let request = factory.from_globals(globals(&[("HTTP_HOST", "example.com")])).unwrap();
    assert_eq!(request.header_line("Authorization"), "Bearer abc");
    assert_eq!(request.server_params().get("HTTP_AUTHORIZATION"), Some("Bearer abc"));
}

#[test]
fn resolves_ipv6_server_name() {
    let request = ServerRequestFactory::new()
        .from_globals(globals(&[
            ("SERVER_ADDR", "FE80::0202:B3FF:FE1E:8329"),
            ("SERVER_NAME", "[FE80::0202:B3FF:FE1E:8329:8080]"),
            ("REQUEST_URI", "/status"),
        ]))
        .unwrap();

    assert_eq!(request.uri().host(), "[fe80::0202:b3ff:fe1e:8329]");
    assert_eq!(request.uri().port(), Some(8080));
    assert_eq!(request.header_line("Host"), "[fe80::0202:b3ff:fe1e:8329]:8080");
}

#[test]
fn uses_forwarded_proto_and_rewritten_url() {
    let request = ServerRequestFactory::new()
        .from_globals(globals(&[
            ("HTTP_HOST", "example.com"),
            ("HTTP_X_FORWARDED_PROTO", "https"),
            ("HTTP_X_ORIGINAL_URL", "/original"),
            ("REQUEST_URI", "/rewritten?a=1"),
        ]))
        .unwrap();

    assert_eq!(request.uri().to_string(), "https://example.com/original?a=1");
}

#[test]
fn moves_uploaded_file_from_nested_description() {
    let directory = tempfile::tempdir().unwrap();
    let upload = directory.path().join("upload.tmp");
    fs::write(&upload, b"contents").unwrap();

    let files = RawFiles::new().with_branch("fooFiles", RawFiles::new()
        .with_branch("tmp_name", RawFiles::new().with_leaf("file", upload.display().to_string().into()))
        .with_branch("size", RawFiles::new().with_leaf("file", RawFileValue::Integer(8)))
        .with_branch("error", RawFiles::new().with_leaf("file", RawFileValue::Integer(0)))
        .with_branch("name", RawFiles::new().with_leaf("file", "foo.bar".into()))
        .with_branch("type", RawFiles::new().with_leaf("file", "text/plain".into())));

    let request = ServerRequestFactory::new()
        .from_globals(Globals { files, ..Globals::default() })
        .unwrap();

    let Some(Node::Branch(foo_files)) = request.uploaded_files().get("fooFiles") else {
        panic!("fooFiles is not a branch");
    };
    assert_eq!(foo_files.len(), 1);

    let file = Arc::clone(foo_files.leaf("file").unwrap());
    let target = directory.path().join("moved.bar");
    file.move_to(&target).unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"contents");
    assert!(!upload.exists());

    let copy: ServerRequest = request.clone();
    let shared = copy.uploaded_files().get_path(&["fooFiles", "file"]);
    assert!(matches!(shared, Some(Node::Leaf(file)) if file.is_moved()));
    assert!(matches!(file.move_to(&target), Err(Error::UploadAlreadyMoved)));
}

#[test]
fn rejects_invalid_upload_error_status() {
    let files = RawFiles::new().with_branch("doc", RawFiles::new()
        .with_leaf("tmp_name", "/tmp/doc".into())
        .with_leaf("error", RawFileValue::Integer(42)));

    let result = ServerRequestFactory::new().from_globals(Globals { files, ..Globals::default() });
    assert!(matches!(result, Err(Error::InvalidUpload(..))));
}
