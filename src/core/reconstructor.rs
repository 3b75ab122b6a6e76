use crate::config::GenerationMode;
use crate::error::{InterflatError, Result};
use super::imports::aggregate_imports;
use super::model::{
    AncestorResolver, Declaration, FlattenedInterface, GeneratedUnit, Resolution,
};
use super::provenance::annotate;
use super::rewriter::NameRewriter;
use super::walker::AncestorWalker;

/// Re-wraps a flattened interface in the structural context the root
/// declaration lived in: containing-scope nesting (as mergeable partials,
/// outermost wrapping innermost), then the namespace together with the
/// aggregated imports.
pub struct StructuralReconstructor {
    mode: GenerationMode,
    max_chain_depth: usize,
}

impl StructuralReconstructor {
    pub fn new(mode: GenerationMode, max_chain_depth: usize) -> Self {
        Self {
            mode,
            max_chain_depth,
        }
    }

    /// Flattens one root against the snapshot and rebuilds its emission
    /// unit. Pure per root; nothing is shared with other roots.
    pub fn flatten(
        &self,
        root: &Declaration,
        resolver: &dyn AncestorResolver,
        rewriter: &NameRewriter,
    ) -> Result<GeneratedUnit> {
        // The root's own defining symbol must resolve in the snapshot
        if !matches!(resolver.resolve(&root.name), Resolution::Declared(_)) {
            return Err(InterflatError::UnresolvableRoot {
                declaration: root.name.clone(),
            });
        }

        let walker = AncestorWalker::new(resolver, self.max_chain_depth);
        let groups = walker.walk(root)?;

        // Fragment mode leaves the root's own members to the user's
        // fragment; only ancestor-derived members are generated.
        let own_members: &[_] = match self.mode {
            GenerationMode::Full => &root.own_members,
            GenerationMode::Fragment => &[],
        };
        let content = annotate(&groups, own_members, rewriter);

        let public_name = rewriter.rewrite(&root.name);
        let base_names = match self.mode {
            GenerationMode::Full => root
                .base_names
                .iter()
                .map(|base| rewriter.rewrite(base))
                .collect(),
            // The user's fragment already declares the base list
            GenerationMode::Fragment => vec![],
        };

        let interface = FlattenedInterface {
            public_name: public_name.clone(),
            base_names,
            content,
            documentation: root.documentation.clone(),
            is_partial: self.mode == GenerationMode::Fragment,
        };

        // Scopes are stored outermost-last; emission wraps outermost first
        let mut scopes = root.containing_scopes.clone();
        scopes.reverse();

        Ok(GeneratedUnit {
            key: public_name,
            root_name: root.name.clone(),
            namespace: root.namespace.clone(),
            imports: aggregate_imports(root, &groups),
            scopes,
            interface,
        })
    }
}
