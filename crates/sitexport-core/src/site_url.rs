//! Origin and target base URLs.
//!
//! Both are normalized on input by trimming surrounding whitespace and any
//! trailing slashes. The origin is otherwise kept exactly as typed, because it
//! is matched literally against file contents; it is parsed only to recover the
//! host (and a non-default port) for locating the fetched tree.

use std::fmt;

use url::Url;

use crate::error::ExportError;

/// Base URL of the locally served site being mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginUrl {
    raw: String,
    host: String,
    port: Option<u16>,
}

impl OriginUrl {
    pub fn parse(input: &str) -> Result<Self, ExportError> {
        let raw = normalize(input);
        let invalid = |reason: &str| ExportError::InvalidUrl {
            url: input.to_string(),
            reason: reason.to_string(),
        };
        if raw.is_empty() {
            return Err(invalid("empty URL"));
        }

        let parsed = Url::parse(&raw).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("URL has no host"))?
            .to_string();

        Ok(OriginUrl {
            raw,
            host,
            // `Url::port` is None when the port is the scheme default.
            port: parsed.port(),
        })
    }

    /// The literal match pattern, without trailing slash.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercased host name as the fetch tool sees it.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, if it differs from the scheme default.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// URL handed to the fetch tool: the origin with a single trailing slash.
    pub fn start_url(&self) -> String {
        format!("{}/", self.raw)
    }
}

impl fmt::Display for OriginUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Base URL (optionally with a path prefix) of the deployment target.
///
/// Treated as an opaque replacement string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl(String);

impl TargetUrl {
    pub fn parse(input: &str) -> Result<Self, ExportError> {
        let raw = normalize(input);
        if raw.is_empty() {
            return Err(ExportError::InvalidUrl {
                url: input.to_string(),
                reason: "empty URL".to_string(),
            });
        }
        Ok(TargetUrl(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when rewriting would reintroduce the origin (e.g. a target that is
    /// a sub-path of the origin); a second rewrite would then not be a no-op.
    pub fn contains_origin(&self, origin: &OriginUrl) -> bool {
        self.0.contains(origin.as_str())
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize(input: &str) -> String {
    input.trim().trim_end_matches('/').to_string()
}
