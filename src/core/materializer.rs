use super::model::{AncestorGroup, MaterializedMember, Member, Provenance};

/// Copies member declarations into a root's output.
///
/// Every ancestor-derived member is hide-qualified: flattening re-declares
/// the same member text at multiple sites, and without the qualifier the
/// target language reports that as an ambiguity. The root's own members are
/// genuinely new and stay unqualified. Declaration order within each group
/// is preserved.
pub fn materialize_group(group: &AncestorGroup, provenance: &Provenance) -> Vec<MaterializedMember> {
    group
        .members
        .iter()
        .map(|member| MaterializedMember {
            member: member.clone(),
            hide: true,
            provenance: Some(provenance.clone()),
        })
        .collect()
}

pub fn materialize_own(members: &[Member]) -> Vec<MaterializedMember> {
    members
        .iter()
        .map(|member| MaterializedMember {
            member: member.clone(),
            hide: false,
            provenance: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestor_members_hide_qualified_in_order() {
        let group = AncestorGroup {
            ancestor_name: "_IB".to_string(),
            members: vec![Member::new("void First();"), Member::new("void Second();")],
            imports: vec![],
            nested: vec![],
        };
        let provenance = Provenance {
            ancestor: "IB".to_string(),
            depth: 1,
        };

        let members = materialize_group(&group, &provenance);

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].member.signature, "void First();");
        assert_eq!(members[1].member.signature, "void Second();");
        assert!(members.iter().all(|m| m.hide));
        assert!(members
            .iter()
            .all(|m| m.provenance.as_ref().unwrap().ancestor == "IB"));
    }

    #[test]
    fn test_own_members_unqualified_without_provenance() {
        let members = materialize_own(&[Member::new("void C();")]);

        assert_eq!(members.len(), 1);
        assert!(!members[0].hide);
        assert!(members[0].provenance.is_none());
    }

    #[test]
    fn test_docs_carried_verbatim() {
        let mut member = Member::new("void C();");
        member.docs = Some("/// Frees the handle.".to_string());
        let group = AncestorGroup {
            ancestor_name: "_IB".to_string(),
            members: vec![member],
            imports: vec![],
            nested: vec![],
        };
        let provenance = Provenance {
            ancestor: "IB".to_string(),
            depth: 1,
        };

        let members = materialize_group(&group, &provenance);
        assert_eq!(members[0].member.docs.as_deref(), Some("/// Frees the handle."));
    }
}
