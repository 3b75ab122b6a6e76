use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// One member signature plus its attached documentation trivia.
///
/// Members are opaque, order-preserving units: the flattener copies and
/// annotates them but never inspects their semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member text as authored (attributes included), without leading trivia
    pub signature: String,

    /// Leading doc trivia, verbatim (e.g. `///` lines)
    pub docs: Option<String>,
}

impl Member {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            docs: None,
        }
    }
}

/// An attribute as authored: name plus raw argument texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub arguments: Vec<String>,
}

/// Kind of an enclosing type scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    Class,
    Struct,
    Record,
}

impl ScopeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            ScopeKind::Class => "class",
            ScopeKind::Struct => "struct",
            ScopeKind::Record => "record",
        }
    }
}

/// One enclosing type scope of a nested declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub kind: ScopeKind,
    pub name: String,
}

/// One interface definition as authored. Read-only input to the flattener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    /// Name as authored, following the internal convention for roots
    pub name: String,

    /// Attributes attached to the declaration
    pub attributes: Vec<Attribute>,

    /// Declared base list; the flattening model supports a single entry
    pub base_names: Vec<String>,

    /// Own members, insertion order significant and preserved
    pub own_members: Vec<Member>,

    /// Enclosing type scopes, outermost last
    pub containing_scopes: Vec<Scope>,

    /// Namespace the declaration lives in
    pub namespace: String,

    /// Import directives visible at the declaration site
    pub imports: Vec<String>,

    /// Leading doc trivia attached verbatim
    pub documentation: Option<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: vec![],
            base_names: vec![],
            own_members: vec![],
            containing_scopes: vec![],
            namespace: namespace.into(),
            imports: vec![],
            documentation: None,
        }
    }
}

/// Outcome of resolving an ancestor reference against the snapshot.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    /// Source-available declaration; its members are materializable
    Declared(&'a Declaration),

    /// Known symbol without navigable syntax; contributes zero members
    External,

    /// Not known to the snapshot at all; contributes zero members
    Unknown,
}

/// Maps an ancestor-reference name to its declaration, if navigable.
pub trait AncestorResolver {
    fn resolve(&self, name: &str) -> Resolution<'_>;
}

/// Immutable snapshot of all declarations for one generation pass.
///
/// Rebuilt from scratch every pass; no intermediate state survives across
/// passes.
#[derive(Debug, Default, Serialize)]
pub struct DeclarationSet {
    declarations: Vec<Declaration>,

    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl DeclarationSet {
    pub fn new(declarations: Vec<Declaration>) -> Self {
        let mut by_name = HashMap::new();
        for (idx, decl) in declarations.iter().enumerate() {
            // First definition wins; duplicates are a source-level problem
            by_name.entry(decl.name.clone()).or_insert(idx);
        }
        Self {
            declarations,
            by_name,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.by_name.get(name).map(|&idx| &self.declarations[idx])
    }
}

impl AncestorResolver for DeclarationSet {
    fn resolve(&self, name: &str) -> Resolution<'_> {
        // Base references may be qualified; the snapshot is keyed by the
        // simple declaration name.
        let simple = name.rsplit('.').next().unwrap_or(name);
        match self.get(name).or_else(|| self.get(simple)) {
            Some(decl) => Resolution::Declared(decl),
            None => Resolution::Unknown,
        }
    }
}

/// Members contributed by one ancestor, with that ancestor's own ancestors
/// nested inside. Built fresh per root and never shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AncestorGroup {
    /// Ancestor name as authored
    pub ancestor_name: String,

    /// The ancestor's own members, in declaration order
    pub members: Vec<Member>,

    /// Imports visible at the ancestor's declaration site
    pub imports: Vec<String>,

    /// Groups for the ancestor's own ancestors
    pub nested: Vec<AncestorGroup>,
}

/// Which ancestor a copied member came from, and how far up the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Public (rewritten) name of the contributing ancestor
    pub ancestor: String,

    /// Chain distance from the root: direct ancestor is 1
    pub depth: usize,
}

/// A member copied into the flattened output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedMember {
    pub member: Member,

    /// Rendered as the hide qualifier; true for every ancestor-derived member
    pub hide: bool,

    /// None for the root's own members
    pub provenance: Option<Provenance>,
}

/// Ordered content of a flattened interface, with structured group markers.
///
/// Markers carry provenance so the emission layer can render them as folding
/// regions, comments, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentEvent {
    GroupStart(Provenance),
    Member(MaterializedMember),
    GroupEnd(Provenance),
}

/// The synthesized self-contained interface for one root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlattenedInterface {
    /// Rewritten public name
    pub public_name: String,

    /// Rewritten base references for the re-synthesized base list
    pub base_names: Vec<String>,

    /// Ancestor groups outermost-first, then the root's own members
    pub content: Vec<ContentEvent>,

    /// Root's doc trivia, carried verbatim
    pub documentation: Option<String>,

    /// Declared as a mergeable partial (fragment mode)
    pub is_partial: bool,
}

impl FlattenedInterface {
    /// Members in output order, markers skipped.
    pub fn members(&self) -> impl Iterator<Item = &MaterializedMember> {
        self.content.iter().filter_map(|event| match event {
            ContentEvent::Member(m) => Some(m),
            _ => None,
        })
    }
}

/// One emission unit: the flattened interface re-wrapped in its structural
/// context, keyed by the root's public name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedUnit {
    /// Unique output key for the pass (the public name)
    pub key: String,

    /// Internal name of the root this unit was flattened from
    pub root_name: String,

    pub namespace: String,

    /// Deduplicated imports, first-seen order
    pub imports: Vec<String>,

    /// Scope wrappers, outermost first
    pub scopes: Vec<Scope>,

    pub interface: FlattenedInterface,
}
