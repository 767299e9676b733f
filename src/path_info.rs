//! # Path Info
//!
//! Splits the part of a command URI after `://` into an action name, ordered
//! positional arguments and optional named options:
//!
//! ```text
//! Say/hello%20world/2?verbose&lang=en
//! └─┬┘ └─────┬─────┘ └┘ └──────┬────┘
//! action   arg 0   arg 1    options
//! ```
//!
//! Arguments are percent-decoded. Empty segments are kept, so `Say/` has one
//! empty argument and `Say//x` has two. An option without `=` is a flag and
//! reads as `"true"`.

use crate::literal::{FromLiteral, LiteralError};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::string::FromUtf8Error;

/// Positional arguments; commands rarely carry more than a handful.
pub type ArgumentVec = SmallVec<[String; 8]>;

#[derive(Debug, thiserror::Error)]
pub enum PathInfoError {
    #[error("argument {index} is not valid percent-encoded UTF-8")]
    InvalidEncoding {
        index: usize,
        #[source]
        source: FromUtf8Error,
    },
}

/// Parsed action segment of a command URI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathInfo {
    action_name: String,
    arguments: ArgumentVec,
    options: IndexMap<String, String>,
}

impl PathInfo {
    pub fn parse(remainder: &str) -> Result<Self, PathInfoError> {
        let (path, query) = match remainder.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (remainder, None),
        };

        let mut segments = path.split('/');
        let action_name = segments.next().unwrap_or_default().trim().to_string();

        let mut arguments = ArgumentVec::new();
        for (index, segment) in segments.enumerate() {
            let decoded = urlencoding::decode(segment)
                .map_err(|source| PathInfoError::InvalidEncoding { index, source })?;
            arguments.push(decoded.into_owned());
        }

        let mut options = IndexMap::new();
        for piece in query.into_iter().flat_map(|q| q.split('&')) {
            if piece.is_empty() {
                continue;
            }
            let is_flag = !piece.contains('=');
            for (name, value) in url::form_urlencoded::parse(piece.as_bytes()) {
                let value = if is_flag {
                    "true".to_string()
                } else {
                    value.into_owned()
                };
                options.insert(name.into_owned(), value);
            }
        }

        Ok(Self {
            action_name,
            arguments,
            options,
        })
    }

    #[must_use]
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    #[must_use]
    pub fn first_argument(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    /// Positional argument `index` converted to `T`, or `None` when absent.
    pub fn argument<T: FromLiteral>(&self, index: usize) -> Option<Result<T, LiteralError>> {
        self.arguments.get(index).map(|literal| T::from_literal(literal))
    }

    #[must_use]
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn options(&self) -> &IndexMap<String, String> {
        &self.options
    }
}
