// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{
    any::Any,
    sync::Arc,
};

use hashbrown::HashMap;

use crate::{
    HttpMessage,
    HttpRequest,
    Message,
    Request,
    ServerParams,
    Tree,
    UploadedFile,
};

/// Query, cookie or form parameters, possibly nested (`field[a][b]=c`).
pub type Params = Tree<String>;

/// The normalized uploaded-file tree; every leaf is an uploaded file.
pub type UploadedFiles = Tree<Arc<UploadedFile>>;

/// A request-scoped value attached by application code.
pub type Attribute = Arc<dyn Any + Send + Sync>;

/// The deserialized request body.
#[derive(Clone, Debug, Default)]
pub enum ParsedBody {
    #[default]
    None,

    /// Form fields, e.g. from `application/x-www-form-urlencoded`.
    Fields(Params),

    /// Any other deserialized representation.
    Object(Arc<dyn Any + Send + Sync>),
}

impl ParsedBody {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn fields(&self) -> Option<&Params> {
        match self {
            Self::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn object<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(object) => object.downcast_ref(),
            _ => None,
        }
    }
}

/// A request as seen by the server: the client request together with the
/// server parameters, query and cookie parameters, the parsed body, the
/// uploaded files and application attributes.
///
/// A `ServerRequest` is immutable. Clones share the uploaded files, so a file
/// moved through one clone is moved for all of them.
#[derive(Clone, Debug, Default)]
pub struct ServerRequest {
    request: Request,
    server_params: ServerParams,
    query_params: Params,
    parsed_body: ParsedBody,
    cookie_params: Params,
    uploaded_files: UploadedFiles,
    attributes: HashMap<String, Attribute>,
}

impl ServerRequest {
    pub fn new(request: Request, server_params: ServerParams) -> Self {
        Self {
            request,
            server_params,
            ..Default::default()
        }
    }

    pub fn server_params(&self) -> &ServerParams {
        &self.server_params
    }

    pub fn query_params(&self) -> &Params {
        &self.query_params
    }

    pub fn parsed_body(&self) -> &ParsedBody {
        &self.parsed_body
    }

    pub fn cookie_params(&self) -> &Params {
        &self.cookie_params
    }

    pub fn uploaded_files(&self) -> &UploadedFiles {
        &self.uploaded_files
    }

    pub fn attributes(&self) -> &HashMap<String, Attribute> {
        &self.attributes
    }

    /// Returns the attribute, if it is present and of type `T`.
    pub fn attribute<T: Any>(&self, name: &str) -> Option<&T> {
        self.attributes.get(name)?.downcast_ref()
    }

    #[must_use]
    pub fn with_query_params(&self, query_params: Params) -> Self {
        Self { query_params, ..self.clone() }
    }

    #[must_use]
    pub fn with_parsed_body(&self, parsed_body: ParsedBody) -> Self {
        Self { parsed_body, ..self.clone() }
    }

    #[must_use]
    pub fn with_cookie_params(&self, cookie_params: Params) -> Self {
        Self { cookie_params, ..self.clone() }
    }

    #[must_use]
    pub fn with_uploaded_files(&self, uploaded_files: UploadedFiles) -> Self {
        Self { uploaded_files, ..self.clone() }
    }

    #[must_use]
    pub fn with_attribute<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) -> Self {
        let mut request = self.clone();
        request.attributes.insert(name.into(), Arc::new(value));
        request
    }

    #[must_use]
    pub fn without_attribute(&self, name: &str) -> Self {
        let mut request = self.clone();
        request.attributes.remove(name);
        request
    }
}

impl HttpMessage for ServerRequest {
    fn message(&self) -> &Message {
        self.request.message()
    }

    fn with_message(&self, message: Message) -> Self {
        Self { request: self.request.with_message(message), ..self.clone() }
    }
}

impl HttpRequest for ServerRequest {
    fn request(&self) -> &Request {
        &self.request
    }

    fn with_request(&self, request: Request) -> Self {
        Self { request, ..self.clone() }
    }
}
