use tracing::debug;

use crate::error::{InterflatError, Result};
use super::model::{AncestorGroup, AncestorResolver, Declaration, Resolution};

/// Enumerates a root declaration's ancestor chain as nested
/// [`AncestorGroup`]s.
///
/// The walk recurses into each ancestor's own chain before collecting that
/// ancestor's members, so the most distant ancestor's members order first in
/// the flattened output. Ancestors without navigable syntax contribute zero
/// members; that also hides anything further up their chain, an accepted
/// limitation.
pub struct AncestorWalker<'a> {
    resolver: &'a dyn AncestorResolver,
    max_depth: usize,
}

impl<'a> AncestorWalker<'a> {
    pub fn new(resolver: &'a dyn AncestorResolver, max_depth: usize) -> Self {
        Self { resolver, max_depth }
    }

    /// Builds the ancestor groups for one root. The root's own members are
    /// not part of the result.
    pub fn walk(&self, root: &Declaration) -> Result<Vec<AncestorGroup>> {
        let mut visited = vec![root.name.clone()];
        self.groups_for(root, 1, &mut visited)
    }

    fn groups_for(
        &self,
        decl: &Declaration,
        depth: usize,
        visited: &mut Vec<String>,
    ) -> Result<Vec<AncestorGroup>> {
        let base_name = match decl.base_names.len() {
            0 => return Ok(vec![]),
            1 => &decl.base_names[0],
            count => {
                return Err(InterflatError::MultipleBases {
                    declaration: decl.name.clone(),
                    count,
                })
            }
        };

        if depth > self.max_depth {
            return Err(InterflatError::CyclicInheritance {
                declaration: decl.name.clone(),
                depth,
            });
        }

        let ancestor = match self.resolver.resolve(base_name) {
            Resolution::Declared(ancestor) => ancestor,
            Resolution::External | Resolution::Unknown => {
                debug!(
                    "Ancestor '{}' of '{}' has no navigable syntax; skipping its members",
                    base_name, decl.name
                );
                return Ok(vec![]);
            }
        };

        if visited.iter().any(|seen| seen == &ancestor.name) {
            return Err(InterflatError::CyclicInheritance {
                declaration: ancestor.name.clone(),
                depth,
            });
        }
        visited.push(ancestor.name.clone());

        let nested = self.groups_for(ancestor, depth + 1, visited)?;

        Ok(vec![AncestorGroup {
            ancestor_name: ancestor.name.clone(),
            members: ancestor.own_members.clone(),
            imports: ancestor.imports.clone(),
            nested,
        }])
    }
}
