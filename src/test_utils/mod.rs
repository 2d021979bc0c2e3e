//! Assertion helpers shared by the handler and page tests.
#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use form::*;
pub(crate) use html::*;
pub(crate) use http::*;
