use super::materializer::{materialize_group, materialize_own};
use super::model::{AncestorGroup, ContentEvent, Member, Provenance};
use super::rewriter::NameRewriter;

/// Converts ancestor provenance into structured group markers.
///
/// Each ancestor's contributed members are wrapped in a start/end marker
/// pair carrying the ancestor's public name, nested in the same order as the
/// group recursion, so generated output can be collapsed by ancestor in an
/// editor. A group with zero members still produces an empty marker pair.
/// How markers render (folding regions, comments, nothing) is an emission
/// concern; the flattener only records structure.
pub fn annotate(
    groups: &[AncestorGroup],
    own_members: &[Member],
    rewriter: &NameRewriter,
) -> Vec<ContentEvent> {
    let mut events = Vec::new();
    annotate_groups(groups, 1, rewriter, &mut events);

    events.extend(materialize_own(own_members).into_iter().map(ContentEvent::Member));

    events
}

fn annotate_groups(
    groups: &[AncestorGroup],
    depth: usize,
    rewriter: &NameRewriter,
    events: &mut Vec<ContentEvent>,
) {
    for group in groups {
        let provenance = Provenance {
            ancestor: rewriter.rewrite(&group.ancestor_name),
            depth,
        };

        events.push(ContentEvent::GroupStart(provenance.clone()));
        annotate_groups(&group.nested, depth + 1, rewriter, events);

        events.extend(
            materialize_group(group, &provenance)
                .into_iter()
                .map(ContentEvent::Member),
        );

        events.push(ContentEvent::GroupEnd(provenance));
    }
}
