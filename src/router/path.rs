//! Path templates and parameter extraction.

use std::collections::HashMap;
use std::fmt;

use crate::RouterError;

/// Normalize a location or template for matching.
///
/// The empty path is the root, and exactly one trailing `/` is dropped
/// unless the path is the root itself.
///
/// ```rust
/// use oxide_flare::router::normalize;
///
/// assert_eq!(normalize(""), "/");
/// assert_eq!(normalize("/"), "/");
/// assert_eq!(normalize("/a/"), "/a");
/// assert_eq!(normalize("/a//"), "/a/");
/// ```
pub fn normalize(path: &str) -> &str {
    if path.is_empty() {
        return "/";
    }
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed route template such as `/users/:id`.
///
/// Segments starting with `:` are parameters and match any single location
/// segment; every other segment must match exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn parse(template: &str) -> Result<Self, RouterError> {
        let segments = normalize(template)
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some("") => Err(RouterError::InvalidTemplate {
                    template: template.to_owned(),
                    reason: "parameter segment has no name",
                }),
                Some(name) => Ok(Segment::Param(name.to_owned())),
                None => Ok(Segment::Literal(segment.to_owned())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: template.to_owned(),
            segments,
        })
    }

    /// The template as written in the route table.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the parameter segments, left to right.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Whether `location` has the same segment count and every literal
    /// segment matches.
    pub fn matches(&self, location: &str) -> bool {
        let parts: Vec<&str> = normalize(location).split('/').collect();
        parts.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(&parts)
                .all(|(segment, part)| match segment {
                    Segment::Param(_) => true,
                    Segment::Literal(literal) => literal == part,
                })
    }

    /// Bind each parameter segment to the corresponding location segment.
    ///
    /// Bindings are made left to right; a repeated parameter name keeps the
    /// last value. Calling this for a location that [`matches`](Self::matches)
    /// rejects is an invariant violation reported as
    /// [`RouterError::SegmentMismatch`].
    pub fn extract(&self, location: &str) -> Result<Params, RouterError> {
        let mismatch = || RouterError::SegmentMismatch {
            template: self.raw.clone(),
            location: location.to_owned(),
        };

        let parts: Vec<&str> = normalize(location).split('/').collect();
        if parts.len() != self.segments.len() {
            return Err(mismatch());
        }

        let mut params = Params::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Param(name) => params.insert(name.clone(), part.to_owned()),
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return Err(mismatch()),
            }
        }
        Ok(params)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parameter bindings extracted from a location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: String, value: String) {
        self.0.insert(name, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
