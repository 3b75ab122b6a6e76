use std::collections::HashSet;

use super::model::{AncestorGroup, Declaration};

/// Collects the import directives touched anywhere in a root's chain.
///
/// Deduplication is by exact directive text after trimming; two directives
/// with different internal formatting are deliberately treated as distinct
/// (no semantic resolution). Order is first-seen: the root's own imports,
/// then each ancestor's, depth-first along the chain.
pub fn aggregate_imports(root: &Declaration, groups: &[AncestorGroup]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    collect(&root.imports, &mut seen, &mut ordered);
    collect_groups(groups, &mut seen, &mut ordered);

    ordered
}

fn collect_groups(groups: &[AncestorGroup], seen: &mut HashSet<String>, ordered: &mut Vec<String>) {
    for group in groups {
        collect(&group.imports, seen, ordered);
        collect_groups(&group.nested, seen, ordered);
    }
}

fn collect(imports: &[String], seen: &mut HashSet<String>, ordered: &mut Vec<String>) {
    for import in imports {
        let normalized = import.trim().to_string();
        if normalized.is_empty() {
            continue;
        }
        if seen.insert(normalized.clone()) {
            ordered.push(normalized);
        }
    }
}
