//! Symbolic remote paths, optionally scoped under a site, theme or component.

use crate::error::{Result, SyncError};
use docsync_core::ResourceKind;
use std::fmt;

/// A parsed symbolic path such as `site:mySite/images` or `docs/2024`.
///
/// Segments never contain empty strings and a scoped path always carries a
/// non-empty resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    /// Relative to the caller's home folder
    Unscoped { segments: Vec<String> },
    /// Relative to the root folder of a named resource
    Scoped {
        kind: ResourceKind,
        name: String,
        segments: Vec<String>,
    },
}

impl PathSpec {
    /// Parse a symbolic path.
    ///
    /// `/` and the empty string are the home folder itself. A scope prefix is
    /// only recognized at the very start of the path (after leading slashes).
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim_matches('/');

        let scoped = ResourceKind::ALL.into_iter().find_map(|kind| {
            trimmed
                .strip_prefix(kind.prefix())
                .map(|rest| (kind, rest))
        });

        match scoped {
            Some((kind, rest)) => {
                let (name, remainder) = rest.split_once('/').unwrap_or((rest, ""));
                if name.is_empty() {
                    return Err(SyncError::MissingResourceName(kind));
                }
                Ok(PathSpec::Scoped {
                    kind,
                    name: name.to_string(),
                    segments: split_segments(remainder),
                })
            }
            None => Ok(PathSpec::Unscoped {
                segments: split_segments(trimmed),
            }),
        }
    }

    pub fn segments(&self) -> &[String] {
        match self {
            PathSpec::Unscoped { segments } | PathSpec::Scoped { segments, .. } => segments,
        }
    }

    /// Scope kind and resource name, for scoped paths
    pub fn resource(&self) -> Option<(ResourceKind, &str)> {
        match self {
            PathSpec::Unscoped { .. } => None,
            PathSpec::Scoped { kind, name, .. } => Some((*kind, name.as_str())),
        }
    }

    /// Resource name, for scoped paths
    pub fn resource_name(&self) -> Option<&str> {
        self.resource().map(|(_, name)| name)
    }

    /// The path addresses its root (home folder or resource root) itself
    pub fn is_root(&self) -> bool {
        self.segments().is_empty()
    }

    /// Same scope, different segments
    pub fn with_segments(&self, segments: Vec<String>) -> Self {
        match self {
            PathSpec::Unscoped { .. } => PathSpec::Unscoped { segments },
            PathSpec::Scoped { kind, name, .. } => PathSpec::Scoped {
                kind: *kind,
                name: name.clone(),
                segments,
            },
        }
    }

    /// Append segments; empty ones are dropped.
    pub fn join<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut segments = self.segments().to_vec();
        segments.extend(
            extra
                .into_iter()
                .map(Into::into)
                .filter(|segment: &String| !segment.is_empty()),
        );
        self.with_segments(segments)
    }

    /// Split a file path into its folder path and the file name.
    pub fn split_file(&self) -> Result<(PathSpec, String)> {
        let (file_name, folders) = self
            .segments()
            .split_last()
            .ok_or(SyncError::NoFileSpecified)?;
        Ok((self.with_segments(folders.to_vec()), file_name.clone()))
    }

    /// Breadcrumb shown to users, e.g. `Sites > mySite > images`
    pub fn describe(&self) -> String {
        let mut parts: Vec<&str> = match self {
            PathSpec::Unscoped { .. } => vec!["Documents"],
            PathSpec::Scoped { kind, name, .. } => vec![kind.label(), name.as_str()],
        };
        parts.extend(self.segments().iter().map(String::as_str));
        parts.join(" > ")
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSpec::Unscoped { segments } if segments.is_empty() => f.write_str("/"),
            PathSpec::Unscoped { segments } => f.write_str(&segments.join("/")),
            PathSpec::Scoped {
                kind,
                name,
                segments,
            } => {
                write!(f, "{}{}", kind.prefix(), name)?;
                for segment in segments {
                    write!(f, "/{}", segment)?;
                }
                Ok(())
            }
        }
    }
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
