// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::{
    Cookie,
    Error,
    HeaderBag,
    HttpMessage,
    HttpVersion,
    Message,
    StatusCode,
    Stream,
};

/// A server response: a [`Message`] with a status code and reason phrase.
#[derive(Clone, Debug)]
pub struct Response {
    message: Message,
    status: u16,
    reason_phrase: Option<String>,
}

impl Response {
    pub fn new(status: u16, headers: HeaderBag, body: Stream) -> Result<Self, Error> {
        Ok(Self {
            message: Message::new(HttpVersion::default(), headers, body),
            status: StatusCode::validate(status)?,
            reason_phrase: None,
        })
    }

    pub fn with_status_code(status: StatusCode) -> Self {
        Self {
            message: Message::default(),
            status: status as u16,
            reason_phrase: None,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// The explicit reason phrase, or the standard phrase of the status code,
    /// or the empty string for unregistered codes.
    pub fn reason_phrase(&self) -> &str {
        match &self.reason_phrase {
            Some(phrase) => phrase,
            None => StatusCode::from_u16(self.status)
                .map(|status| status.reason_phrase())
                .unwrap_or(""),
        }
    }

    /// Set the status code, with an optional custom reason phrase.
    pub fn with_status(&self, status: u16, reason_phrase: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            status: StatusCode::validate(status)?,
            reason_phrase: reason_phrase.filter(|phrase| !phrase.is_empty()).map(str::to_string),
            ..self.clone()
        })
    }

    /// Append a `Set-Cookie` header for the cookie.
    pub fn with_cookie(&self, cookie: &Cookie) -> Result<Self, Error> {
        self.with_added_header("Set-Cookie", &cookie.to_string())
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::with_status_code(StatusCode::Ok)
    }
}

impl HttpMessage for Response {
    fn message(&self) -> &Message {
        &self.message
    }

    fn with_message(&self, message: Message) -> Self {
        Self { message, ..self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_response() {
        let response = Response::default();
        assert_eq!(response.status(), 200);
        assert_eq!(response.reason_phrase(), "OK");
        assert_eq!(response.protocol_version(), HttpVersion::Http11);
    }

    #[test]
    fn test_with_status() {
        let response = Response::default();
        let not_found = response.with_status(404, None).unwrap();
        assert_eq!(not_found.status(), 404);
        assert_eq!(not_found.reason_phrase(), "Not Found");

        let custom = response.with_status(299, Some("Custom")).unwrap();
        assert_eq!(custom.reason_phrase(), "Custom");
        assert_eq!(response.with_status(299, None).unwrap().reason_phrase(), "");

        assert!(matches!(response.with_status(600, None), Err(Error::InvalidStatusCode(600))));
        assert_eq!(response.status(), 200);
    }

    #[test]
    fn test_new_validates_status() {
        assert!(Response::new(99, HeaderBag::new(), Stream::memory()).is_err());

        let body = Stream::from("<html>Uh oh not found</html>");
        let headers = HeaderBag::try_from_pairs([("Content-Type", "text/html")]).unwrap();
        let response = Response::new(404, headers, body.clone()).unwrap();
        assert_eq!(response.header_line("content-type"), "text/html");
        assert!(response.body().ptr_eq(&body));
    }

    #[test]
    fn test_with_cookie_appends_set_cookie() {
        let first = Cookie::new("a").unwrap().with_value("1");
        let second = Cookie::new("b").unwrap().with_value("2").with_http_only(false);
        let response = Response::default()
            .with_cookie(&first).unwrap()
            .with_cookie(&second).unwrap();

        assert_eq!(response.header("Set-Cookie"), &["a=1; path=/; httponly".to_string(), "b=2; path=/".to_string()]);
    }
}
