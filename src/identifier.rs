//! Opaque handles to single images in the media index.

use crate::error::{GalleryError, Result};
use std::fmt;
use std::str::FromStr;

/// Platform-scoped handle to one image, e.g.
/// `content://media/external/images/media/42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentifier(String);

impl ResourceIdentifier {
    /// Parses an identifier from its plain string form.
    ///
    /// The string must start with a URI scheme (`letter *(letter / digit / "+" / "-" / ".") ":"`)
    /// followed by a non-empty remainder.
    pub fn parse(raw: &str) -> Result<Self> {
        let Some((scheme, rest)) = raw.split_once(':') else {
            return Err(GalleryError::RouteParameterInvalid(format!(
                "missing scheme in {:?}",
                raw
            )));
        };

        let mut chars = scheme.chars();
        let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

        if !scheme_ok || rest.is_empty() {
            return Err(GalleryError::RouteParameterInvalid(format!(
                "not a resource address: {:?}",
                raw
            )));
        }

        Ok(Self(raw.to_string()))
    }

    /// Builds `base + "/" + id`, the address of one record in a collection.
    pub fn with_appended_id(base: &str, id: u64) -> Self {
        Self(format!("{}/{}", base.trim_end_matches('/'), id))
    }

    /// Percent-encodes the identifier so it can travel as a single path segment.
    pub fn encode(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }

    /// Reverses [`ResourceIdentifier::encode`].
    pub fn decode(encoded: &str) -> Result<Self> {
        let decoded = urlencoding::decode(encoded)
            .map_err(|e| GalleryError::RouteParameterInvalid(e.to_string()))?;
        Self::parse(&decoded)
    }

    /// Numeric record id from the last path segment, if any.
    pub fn record_id(&self) -> Option<u64> {
        self.0.rsplit('/').next()?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceIdentifier {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
