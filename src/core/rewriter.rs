/// Maps internal-convention names to public output names.
///
/// Only the rightmost segment of a qualified reference is rewritten; the
/// qualifying prefix is left untouched. Names without the marker pass
/// through unchanged, so a root may inherit directly from an already-public
/// interface.
pub struct NameRewriter {
    prefix: String,
}

impl NameRewriter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Strips the internal marker from a (possibly qualified) name.
    /// Idempotent: a rewritten name never carries the marker.
    pub fn rewrite(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            return name.to_string();
        }

        match name.rsplit_once('.') {
            Some((qualifier, last)) => format!("{}.{}", qualifier, self.strip(last)),
            None => self.strip(name).to_string(),
        }
    }

    fn strip<'a>(&self, mut segment: &'a str) -> &'a str {
        while segment.starts_with(self.prefix.as_str()) {
            segment = &segment[self.prefix.len()..];
        }
        segment
    }
}
