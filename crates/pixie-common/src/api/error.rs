// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PixieError {
    /// Malformed ingestion record. Loaders skip these, count them, and
    /// continue; they are never fatal on their own.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A graph mutation that violates bipartiteness (equal kinds or a
    /// self-loop). This is a programming error and fails loudly.
    #[error("invalid graph mutation: {message}")]
    InvalidGraph { message: String },

    /// Query with no ratings, or none strictly positive.
    #[error("empty query: {message}")]
    EmptyQuery { message: String },

    #[error("argument '{arg}' is invalid: {message}")]
    InvalidArgument { arg: String, message: String },

    /// Upstream failure, wrapped exactly once with a short operation tag.
    #[error("{op}: {source}")]
    External {
        op: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PixieError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn invalid_graph(message: impl Into<String>) -> Self {
        Self::InvalidGraph {
            message: message.into(),
        }
    }

    pub fn empty_query(message: impl Into<String>) -> Self {
        Self::EmptyQuery {
            message: message.into(),
        }
    }

    pub fn invalid_argument(arg: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg: arg.into(),
            message: message.into(),
        }
    }

    /// Wraps an upstream error with an operation tag, e.g.
    /// `PixieError::external("hydrate post records", err)`.
    pub fn external(op: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::External {
            op: op.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PixieError>;
