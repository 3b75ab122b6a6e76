use interflat::config::Config;
use interflat::core::{CSharpFrontend, Engine};

fn engine() -> Engine {
    let mut config = Config::default();
    config.output.include_metadata = false;
    Engine::with_config(config).unwrap()
}

fn flatten_source(source: &str) -> Vec<(String, String)> {
    let mut frontend = CSharpFrontend::new().unwrap();
    let declarations = frontend.extract_from_source(source).unwrap();
    let snapshot = interflat::core::DeclarationSet::new(declarations);
    engine().flatten_snapshot(&snapshot).unwrap().units
}

const CHAIN: &str = r#"namespace N
{
    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IA
    {
        void A();
    }

    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IB : _IA
    {
        void B();
    }

    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IC : _IB
    {
        void C();
    }
}
"#;

#[test]
fn test_three_level_chain_scenario() {
    let units = flatten_source(CHAIN);
    assert_eq!(units.len(), 3);

    let (name, content) = units
        .iter()
        .find(|(name, _)| name == "IC.g.cs")
        .expect("IC output missing");
    assert_eq!(name, "IC.g.cs");

    let expected = "\
// <auto-generated>
//     Flattened from _IC by interflat; do not edit.
// </auto-generated>

namespace N
{
    public interface IC : IB
    {
        #region IB
        #region IA
        new void A();
        #endregion // IA
        new void B();
        #endregion // IB
        void C();
    }
}
";
    assert_eq!(content, expected);
}

#[test]
fn test_member_order_is_ancestor_first() {
    let units = flatten_source(CHAIN);
    let content = &units.iter().find(|(n, _)| n == "IC.g.cs").unwrap().1;

    let a = content.find("new void A();").unwrap();
    let b = content.find("new void B();").unwrap();
    let c = content.find("void C();").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn test_marker_pair_count_matches_chain_depth() {
    let units = flatten_source(CHAIN);
    let content = &units.iter().find(|(n, _)| n == "IC.g.cs").unwrap().1;

    assert_eq!(content.matches("#region").count() - content.matches("#endregion").count(), 0);
    assert_eq!(content.matches("#endregion").count(), 2);

    // Depth-1 root: one pair
    let content_b = &units.iter().find(|(n, _)| n == "IB.g.cs").unwrap().1;
    assert_eq!(content_b.matches("#endregion").count(), 1);

    // Depth-0 root: no markers at all
    let content_a = &units.iter().find(|(n, _)| n == "IA.g.cs").unwrap().1;
    assert_eq!(content_a.matches("#region").count(), 0);
}

#[test]
fn test_import_dedup_root_first() {
    let source = r#"using System;

namespace N
{
    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IBase
    {
        void B();
    }
}
"#;
    let derived = r#"using System.Text;
using System;

namespace N
{
    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IDerived : _IBase
    {
        void D();
    }
}
"#;
    let mut frontend = CSharpFrontend::new().unwrap();
    let mut declarations = frontend.extract_from_source(source).unwrap();
    declarations.extend(frontend.extract_from_source(derived).unwrap());
    let snapshot = interflat::core::DeclarationSet::new(declarations);

    let units = engine().flatten_snapshot(&snapshot).unwrap().units;
    let content = &units.iter().find(|(n, _)| n == "IDerived.g.cs").unwrap().1;

    // Root's imports first, duplicates appear once
    let text_pos = content.find("using System.Text;").unwrap();
    let system_pos = content.find("using System;").unwrap();
    assert!(text_pos < system_pos);
    assert_eq!(content.matches("using System;").count(), 1);
}

#[test]
fn test_isolation_with_unresolvable_ancestor() {
    let source = r#"namespace N
{
    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IBroken : Some.External.IThing
    {
        void Broken();
    }

    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IBase
    {
        void B();
    }

    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IWhole : _IBase
    {
        void W();
    }
}
"#;
    let units = flatten_source(source);

    // An unresolvable ancestor is not an error; it contributes no members
    let broken = &units.iter().find(|(n, _)| n == "IBroken.g.cs").unwrap().1;
    assert!(broken.contains("void Broken();"));
    assert!(!broken.contains("#region"));

    let whole = &units.iter().find(|(n, _)| n == "IWhole.g.cs").unwrap().1;
    assert!(whole.contains("new void B();"));
    assert!(whole.contains("void W();"));
}

#[test]
fn test_nested_declaration_reconstructs_scopes() {
    let source = r#"namespace N
{
    public partial class Host
    {
        [BindingInterface]
        [InheritanceModel(ObjectModel.None)]
        interface _IInner
        {
            void M();
        }
    }
}
"#;
    let units = flatten_source(source);
    let content = &units.iter().find(|(n, _)| n == "IInner.g.cs").unwrap().1;

    let scope = content.find("partial class Host").unwrap();
    let iface = content.find("public interface IInner").unwrap();
    assert!(scope < iface);
}

#[test]
fn test_doc_trivia_carried_through() {
    let source = r#"namespace N
{
    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IBase
    {
        /// <summary>Inherited doc.</summary>
        void B();
    }

    /// <summary>The flattened surface.</summary>
    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IDerived : _IBase
    {
        void D();
    }
}
"#;
    let units = flatten_source(source);
    let content = &units.iter().find(|(n, _)| n == "IDerived.g.cs").unwrap().1;

    assert!(content.contains("/// <summary>The flattened surface.</summary>"));
    assert!(content.contains("/// <summary>Inherited doc.</summary>"));
    assert!(content.contains("new void B();"));
}

#[test]
fn test_global_namespace_interface_renders_without_wrapper() {
    let source = r#"[BindingInterface]
[InheritanceModel(ObjectModel.None)]
interface _IGlobal
{
    void G();
}
"#;
    let units = flatten_source(source);
    let content = &units.iter().find(|(n, _)| n == "IGlobal.g.cs").unwrap().1;

    assert!(!content.contains("namespace"));
    assert!(content.contains("public interface IGlobal\n{\n    void G();\n}\n"));
}

#[test]
fn test_collision_across_files() {
    let first = r#"namespace N
{
    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface _IFoo
    {
        void A();
    }
}
"#;
    let second = r#"namespace M
{
    [BindingInterface]
    [InheritanceModel(ObjectModel.None)]
    interface __IFoo
    {
        void B();
    }
}
"#;
    let mut frontend = CSharpFrontend::new().unwrap();
    let mut declarations = frontend.extract_from_source(first).unwrap();
    declarations.extend(frontend.extract_from_source(second).unwrap());
    let snapshot = interflat::core::DeclarationSet::new(declarations);

    let err = engine().flatten_snapshot(&snapshot).unwrap_err();
    assert!(matches!(
        err,
        interflat::error::InterflatError::NameCollision { .. }
    ));
}
