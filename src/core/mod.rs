mod engine;
mod model;

// Flattening pipeline, leaves first
mod filter;
mod rewriter;
mod walker;
mod materializer;
mod imports;
mod provenance;
mod reconstructor;

// External boundaries
mod frontend;
mod emitter;

pub use model::{
    AncestorGroup, AncestorResolver, Attribute, ContentEvent, Declaration, DeclarationSet,
    FlattenedInterface, GeneratedUnit, MaterializedMember, Member, Provenance, Resolution, Scope,
    ScopeKind,
};
pub use filter::CandidateFilter;
pub use rewriter::NameRewriter;
pub use walker::AncestorWalker;
pub use materializer::{materialize_group, materialize_own};
pub use imports::aggregate_imports;
pub use provenance::annotate;
pub use reconstructor::StructuralReconstructor;
pub use frontend::CSharpFrontend;
pub use emitter::{content_hash, Emitter};

// Export the main engine
pub use engine::{CancelFlag, Engine, PassOutcome};
