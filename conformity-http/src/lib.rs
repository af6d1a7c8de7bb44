// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! This crate contains the immutable HTTP message model: header bags,
//! messages, URIs, requests, responses, server requests, uploaded files and
//! cookies.
//!
//! Every value is immutable once constructed. The `with_*` transitions return
//! a new value, so instances can be shared across threads without locking.

pub mod abnf;
pub mod cookie;
pub mod error;
pub mod header_bag;
pub mod message;
pub mod method;
pub mod request;
pub mod response;
pub mod server_params;
pub mod server_request;
pub mod status;
pub mod stream;
pub mod syntax;
pub mod tree;
pub mod uploaded_file;
pub mod uri;
pub mod version;

pub use cookie::*;
pub use error::*;
pub use header_bag::*;
pub use message::*;
pub use method::*;
pub use request::*;
pub use response::*;
pub use server_params::*;
pub use server_request::*;
pub use status::*;
pub use stream::*;
pub use tree::*;
pub use uploaded_file::*;
pub use uri::*;
pub use version::*;
