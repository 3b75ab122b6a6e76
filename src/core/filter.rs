use crate::config::{DiscoveryConfig, GenerationMode};
use super::model::{Attribute, Declaration};

/// Selects the declarations that participate in flattening.
///
/// The discovery criteria are a fixed external contract: two marker
/// attributes, one of which must carry a specific argument, plus either the
/// internal naming convention (full mode) or a non-empty base list
/// (fragment mode).
pub struct CandidateFilter {
    discovery: DiscoveryConfig,
    mode: GenerationMode,
}

impl CandidateFilter {
    pub fn new(discovery: &DiscoveryConfig, mode: GenerationMode) -> Self {
        Self {
            discovery: discovery.clone(),
            mode,
        }
    }

    /// Returns true iff the declaration is a flattening root.
    pub fn is_candidate(&self, decl: &Declaration) -> bool {
        if !decl
            .attributes
            .iter()
            .any(|a| attribute_matches(a, &self.discovery.marker_attribute))
        {
            return false;
        }

        let model = decl
            .attributes
            .iter()
            .find(|a| attribute_matches(a, &self.discovery.model_attribute));

        // A model attribute missing its argument, or carrying the wrong
        // value, is a hard exclusion.
        match model {
            Some(attr) => match attr.arguments.first() {
                Some(value) if argument_value(value) == self.discovery.model_argument => {}
                _ => return false,
            },
            None => return false,
        }

        match self.mode {
            GenerationMode::Full => self.matches_convention(&decl.name),
            GenerationMode::Fragment => !decl.base_names.is_empty(),
        }
    }

    /// Internal naming convention: the configured prefix followed by an
    /// `I`-prefixed interface name.
    pub fn matches_convention(&self, name: &str) -> bool {
        let prefix = &self.discovery.internal_prefix;
        if prefix.is_empty() || !name.starts_with(prefix.as_str()) {
            return false;
        }

        let mut rest = name;
        while rest.starts_with(prefix.as_str()) {
            rest = &rest[prefix.len()..];
        }

        let mut chars = rest.chars();
        matches!(
            (chars.next(), chars.next()),
            (Some('I'), Some(second)) if second.is_uppercase()
        )
    }
}

/// C# attributes may be written with or without the `Attribute` suffix.
fn attribute_matches(attr: &Attribute, expected: &str) -> bool {
    let simple = attr.name.rsplit('.').next().unwrap_or(&attr.name);
    simple == expected || simple.strip_suffix("Attribute") == Some(expected)
}

/// Normalizes an attribute argument for comparison: strips surrounding
/// quotes and any qualifying enum prefix (`ObjectModel.None` -> `None`).
fn argument_value(raw: &str) -> &str {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.rsplit('.').next().unwrap_or(unquoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use super::super::model::Member;

    fn filter(mode: GenerationMode) -> CandidateFilter {
        CandidateFilter::new(&Config::default().discovery, mode)
    }

    fn candidate(name: &str) -> Declaration {
        let mut decl = Declaration::new(name, "N");
        decl.attributes = vec![
            Attribute {
                name: "BindingInterface".to_string(),
                arguments: vec![],
            },
            Attribute {
                name: "InheritanceModel".to_string(),
                arguments: vec!["ObjectModel.None".to_string()],
            },
        ];
        decl
    }

    #[test]
    fn test_accepts_well_formed_candidate() {
        assert!(filter(GenerationMode::Full).is_candidate(&candidate("_IWidget")));
    }

    #[test]
    fn test_rejects_missing_marker() {
        let mut decl = candidate("_IWidget");
        decl.attributes.remove(0);
        assert!(!filter(GenerationMode::Full).is_candidate(&decl));
    }

    #[test]
    fn test_malformed_model_attribute_is_hard_exclusion() {
        let mut missing_arg = candidate("_IWidget");
        missing_arg.attributes[1].arguments.clear();
        assert!(!filter(GenerationMode::Full).is_candidate(&missing_arg));

        let mut wrong_value = candidate("_IWidget");
        wrong_value.attributes[1].arguments = vec!["ObjectModel.Inherited".to_string()];
        assert!(!filter(GenerationMode::Full).is_candidate(&wrong_value));
    }

    #[test]
    fn test_quoted_and_qualified_arguments_match() {
        let mut quoted = candidate("_IWidget");
        quoted.attributes[1].arguments = vec!["\"None\"".to_string()];
        assert!(filter(GenerationMode::Full).is_candidate(&quoted));
    }

    #[test]
    fn test_attribute_suffix_form_matches() {
        let mut decl = candidate("_IWidget");
        decl.attributes[0].name = "BindingInterfaceAttribute".to_string();
        assert!(filter(GenerationMode::Full).is_candidate(&decl));
    }

    #[test]
    fn test_naming_convention() {
        let f = filter(GenerationMode::Full);
        assert!(f.matches_convention("_IWidget"));
        assert!(f.matches_convention("__IWidget"));
        assert!(!f.matches_convention("IWidget"));
        assert!(!f.matches_convention("_Widget"));
        assert!(!f.matches_convention("_I"));
    }

    #[test]
    fn test_fragment_mode_requires_base_list() {
        let f = filter(GenerationMode::Fragment);

        // Public name is fine in fragment mode as long as there is a base
        let mut with_base = candidate("IWidget");
        with_base.base_names = vec!["IBase".to_string()];
        with_base.own_members.push(Member::new("void M();"));
        assert!(f.is_candidate(&with_base));

        let without_base = candidate("IWidget");
        assert!(!f.is_candidate(&without_base));
    }
}
