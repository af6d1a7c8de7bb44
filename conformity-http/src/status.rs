// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::Error;

/// The registered status codes that carry a standard reason phrase.
///
/// RFC 9110: https://httpwg.org/specs/rfc9110.html#status.codes
/// IANA: https://www.iana.org/assignments/http-status-codes/http-status-codes.xhtml
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum StatusCode {
    Continue = 100,
    SwitchingProtocols = 101,
    EarlyHints = 103,

    Ok = 200,
    Created = 201,
    Accepted = 202,
    NonAuthoritativeInformation = 203,
    NoContent = 204,
    ResetContent = 205,
    PartialContent = 206,

    MultipleChoices = 300,
    MovedPermanently = 301,
    Found = 302,
    SeeOther = 303,
    NotModified = 304,
    TemporaryRedirect = 307,
    PermanentRedirect = 308,

    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    NotAcceptable = 406,
    RequestTimeout = 408,
    Conflict = 409,
    Gone = 410,
    LengthRequired = 411,
    PreconditionFailed = 412,
    ContentTooLarge = 413,
    URITooLong = 414,
    UnsupportedMediaType = 415,
    RangeNotSatisfiable = 416,
    ExpectationFailed = 417,
    UnprocessableContent = 422,
    TooManyRequests = 429,
    RequestHeaderFieldsTooLarge = 431,

    InternalServerError = 500,
    NotImplemented = 501,
    BadGateway = 502,
    ServiceUnavailable = 503,
    GatewayTimeout = 504,
    HTTPVersionNotSupported = 505,
}

impl StatusCode {
    /// Validate a numeric status code. Only the range `100..=599` is valid.
    pub fn validate(code: u16) -> Result<u16, Error> {
        if (100..=599).contains(&code) {
            Ok(code)
        } else {
            Err(Error::InvalidStatusCode(code))
        }
    }

    /// Returns the registered status code, if the code is known.
    #[must_use]
    pub fn from_u16(code: u16) -> Option<StatusCode> {
        STATUS_CODES.iter().copied().find(|status| *status as u16 == code)
    }

    #[must_use]
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Continue => "Continue",
            StatusCode::SwitchingProtocols => "Switching Protocols",
            StatusCode::EarlyHints => "Early Hints",

            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::Accepted => "Accepted",
            StatusCode::NonAuthoritativeInformation => "Non-Authoritative Information",
            StatusCode::NoContent => "No Content",
            StatusCode::ResetContent => "Reset Content",
            StatusCode::PartialContent => "Partial Content",

            StatusCode::MultipleChoices => "Multiple Choices",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::Found => "Found",
            StatusCode::SeeOther => "See Other",
            StatusCode::NotModified => "Not Modified",
            StatusCode::TemporaryRedirect => "Temporary Redirect",
            StatusCode::PermanentRedirect => "Permanent Redirect",

            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::NotAcceptable => "Not Acceptable",
            StatusCode::RequestTimeout => "Request Timeout",
            StatusCode::Conflict => "Conflict",
            StatusCode::Gone => "Gone",
            StatusCode::LengthRequired => "Length Required",
            StatusCode::PreconditionFailed => "Precondition Failed",
            StatusCode::ContentTooLarge => "Content Too Large",
            StatusCode::URITooLong => "URI Too Long",
            StatusCode::UnsupportedMediaType => "Unsupported Media Type",
            StatusCode::RangeNotSatisfiable => "Range Not Satisfiable",
            StatusCode::ExpectationFailed => "Expectation Failed",
            StatusCode::UnprocessableContent => "Unprocessable Content",
            StatusCode::TooManyRequests => "Too Many Requests",
            StatusCode::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",

            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
            StatusCode::BadGateway => "Bad Gateway",
            StatusCode::ServiceUnavailable => "Service Unavailable",
            StatusCode::GatewayTimeout => "Gateway Timeout",
            StatusCode::HTTPVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

const STATUS_CODES: &[StatusCode] = &[
    StatusCode::Continue, StatusCode::SwitchingProtocols, StatusCode::EarlyHints,
    StatusCode::Ok, StatusCode::Created, StatusCode::Accepted,
    StatusCode::NonAuthoritativeInformation, StatusCode::NoContent,
    StatusCode::ResetContent, StatusCode::PartialContent,
    StatusCode::MultipleChoices, StatusCode::MovedPermanently, StatusCode::Found,
    StatusCode::SeeOther, StatusCode::NotModified, StatusCode::TemporaryRedirect,
    StatusCode::PermanentRedirect,
    StatusCode::BadRequest, StatusCode::Unauthorized, StatusCode::Forbidden,
    StatusCode::NotFound, StatusCode::MethodNotAllowed, StatusCode::NotAcceptable,
    StatusCode::RequestTimeout, StatusCode::Conflict, StatusCode::Gone,
    StatusCode::LengthRequired, StatusCode::PreconditionFailed,
    StatusCode::ContentTooLarge, StatusCode::URITooLong,
    StatusCode::UnsupportedMediaType, StatusCode::RangeNotSatisfiable,
    StatusCode::ExpectationFailed, StatusCode::UnprocessableContent,
    StatusCode::TooManyRequests, StatusCode::RequestHeaderFieldsTooLarge,
    StatusCode::InternalServerError, StatusCode::NotImplemented,
    StatusCode::BadGateway, StatusCode::ServiceUnavailable,
    StatusCode::GatewayTimeout, StatusCode::HTTPVersionNotSupported,
];
