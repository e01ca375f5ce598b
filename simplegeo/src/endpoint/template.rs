//! URL path templates with `{name}` placeholders.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::EndpointError;

/// Characters escaped when a value is substituted into a path.
///
/// `,` `:` `@` and `.` stay literal so that coordinate pairs, IPv6
/// addresses, versioned handles and id lists keep their shape.
const PATH_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'~')
    .remove(b'.')
    .remove(b',')
    .remove(b':')
    .remove(b'@');

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed endpoint template such as `records/{layer}/{id}.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        let malformed = |reason: &str| EndpointError::MalformedTemplate {
            template: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut rest = raw;
        while let Some(open) = rest.find(['{', '}']) {
            if rest.as_bytes()[open] == b'}' {
                return Err(malformed("unmatched '}'"));
            }
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| malformed("unclosed '{'"))?;
            let name = &after[..close];
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(malformed("placeholder names must be non-empty identifiers"));
            }
            segments.push(Segment::Placeholder(name.to_string()));
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitutes every placeholder from `args`.
    ///
    /// Arguments that name no placeholder are ignored. `endpoint` is only
    /// used to label errors.
    ///
    /// A value that is empty, `.` or `..` is rejected: URL parsing would
    /// collapse it as a dot-segment and move the request onto another
    /// endpoint.
    pub fn render(&self, endpoint: &str, args: &[(&str, &str)]) -> Result<String, EndpointError> {
        let mut path = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Placeholder(name) => {
                    let value = args
                        .iter()
                        .find(|(key, _)| *key == name.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| EndpointError::MissingArgument {
                            endpoint: endpoint.to_string(),
                            placeholder: name.clone(),
                        })?;
                    if matches!(value, "" | "." | "..") {
                        return Err(EndpointError::InvalidArgument {
                            endpoint: endpoint.to_string(),
                            placeholder: name.clone(),
                            value: value.to_string(),
                        });
                    }
                    path.extend(utf8_percent_encode(value, PATH_VALUE));
                }
            }
        }
        Ok(path)
    }
}
