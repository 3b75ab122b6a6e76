use std::path::Path;

use ignore::WalkBuilder;
use regex::Regex;
use tracing::{debug, warn};
use tree_sitter::{Node, Parser};

use crate::error::{InterflatError, Result};
use super::model::{Attribute, Declaration, DeclarationSet, Member, Scope, ScopeKind};

/// C# front end built on Tree-sitter.
///
/// Walks source files and extracts interface declarations into the
/// immutable snapshot the flattener consumes: name, attributes with
/// arguments, base list, members as opaque signature text with leading doc
/// trivia, containing type scopes, namespace, and visible using directives.
pub struct CSharpFrontend {
    parser: Parser,
    argument_list_re: Regex,
}

impl CSharpFrontend {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let csharp_language = tree_sitter_c_sharp::language();
        parser
            .set_language(&csharp_language)
            .map_err(|e| InterflatError::Frontend(format!("Failed to set C# language: {}", e)))?;

        let argument_list_re = Regex::new(r"(?s)^\((.*)\)$")
            .map_err(|e| InterflatError::Frontend(e.to_string()))?;

        Ok(Self {
            parser,
            argument_list_re,
        })
    }

    /// Builds a fresh snapshot from every `.cs` file under the given
    /// directories. Nothing is cached across passes.
    pub fn snapshot<P: AsRef<Path>>(&mut self, dirs: &[P]) -> Result<DeclarationSet> {
        let mut declarations = Vec::new();

        for dir in dirs {
            let walker = WalkBuilder::new(dir)
                .hidden(false)
                .git_ignore(true)
                .build();

            for entry in walker {
                let entry = entry.map_err(|e| InterflatError::FileSystem(e.to_string()))?;
                let path = entry.path();
                if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("cs") {
                    continue;
                }

                let source = std::fs::read_to_string(path)?;
                match self.extract_from_source(&source) {
                    Ok(mut found) => {
                        debug!("{}: {} interface declaration(s)", path.display(), found.len());
                        declarations.append(&mut found);
                    }
                    Err(e) => warn!("Skipping {}: {}", path.display(), e),
                }
            }
        }

        Ok(DeclarationSet::new(declarations))
    }

    /// Extracts every interface declaration from one source text.
    pub fn extract_from_source(&mut self, source: &str) -> Result<Vec<Declaration>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| InterflatError::Frontend("Failed to parse C# source".to_string()))?;

        let mut declarations = Vec::new();
        self.collect(
            tree.root_node(),
            source,
            "",
            &mut Vec::new(),
            &mut Vec::new(),
            &mut declarations,
        );
        Ok(declarations)
    }

    fn collect(
        &self,
        node: Node,
        source: &str,
        namespace: &str,
        scopes: &mut Vec<Scope>,
        usings: &mut Vec<String>,
        declarations: &mut Vec<Declaration>,
    ) {
        let mut cursor = node.walk();

        // A file-scoped namespace applies to every following sibling
        let mut current_namespace = namespace.to_string();

        for child in node.children(&mut cursor) {
            match child.kind() {
                "using_directive" => {
                    usings.push(node_text(child, source).trim().to_string());
                }
                "namespace_declaration" => {
                    let name = child
                        .child_by_field_name("name")
                        .map(|n| node_text(n, source))
                        .unwrap_or_default();
                    let joined = join_namespace(&current_namespace, &name);
                    // Usings declared inside the namespace are visible too
                    let mark = usings.len();
                    self.collect(child, source, &joined, scopes, usings, declarations);
                    usings.truncate(mark);
                }
                "file_scoped_namespace_declaration" => {
                    let name = child
                        .child_by_field_name("name")
                        .map(|n| node_text(n, source))
                        .unwrap_or_default();
                    current_namespace = join_namespace(&current_namespace, &name);
                }
                "class_declaration" | "struct_declaration" | "record_declaration" => {
                    let kind = match child.kind() {
                        "class_declaration" => ScopeKind::Class,
                        "struct_declaration" => ScopeKind::Struct,
                        _ => ScopeKind::Record,
                    };
                    if let Some(name_node) = child.child_by_field_name("name") {
                        scopes.push(Scope {
                            kind,
                            name: node_text(name_node, source),
                        });
                        if let Some(body) = child.child_by_field_name("body") {
                            self.collect(
                                body,
                                source,
                                &current_namespace,
                                scopes,
                                usings,
                                declarations,
                            );
                        }
                        scopes.pop();
                    }
                }
                "interface_declaration" => {
                    if let Some(decl) =
                        self.parse_interface(child, source, &current_namespace, scopes, usings)
                    {
                        declarations.push(decl);
                    }
                }
                "declaration_list" => {
                    self.collect(
                        child,
                        source,
                        &current_namespace,
                        scopes,
                        usings,
                        declarations,
                    );
                }
                _ => {}
            }
        }
    }

    fn parse_interface(
        &self,
        node: Node,
        source: &str,
        namespace: &str,
        scopes: &[Scope],
        usings: &[String],
    ) -> Option<Declaration> {
        let name = node_text(node.child_by_field_name("name")?, source);

        let mut decl = Declaration::new(name, namespace);
        decl.imports = usings.to_vec();
        decl.attributes = self.parse_attributes(node, source);
        decl.base_names = self.parse_base_list(node, source);
        decl.documentation = docs_before_node(node, source);

        // Containing scopes are stored outermost last
        decl.containing_scopes = scopes.iter().rev().cloned().collect();

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.children(&mut cursor) {
                if !member.is_named() || member.kind() == "comment" {
                    continue;
                }
                decl.own_members.push(Member {
                    signature: node_text(member, source).trim().to_string(),
                    docs: docs_before_node(member, source),
                });
            }
        }

        Some(decl)
    }

    fn parse_attributes(&self, node: Node, source: &str) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        let mut cursor = node.walk();

        for child in node.children(&mut cursor) {
            if child.kind() != "attribute_list" {
                continue;
            }
            let mut list_cursor = child.walk();
            for attr in child.children(&mut list_cursor) {
                if attr.kind() != "attribute" {
                    continue;
                }
                let Some(name_node) = attr.child_by_field_name("name") else {
                    continue;
                };
                let arguments = attr
                    .children(&mut attr.walk())
                    .find(|n| n.kind() == "attribute_argument_list")
                    .map(|args| self.split_arguments(&node_text(args, source)))
                    .unwrap_or_default();

                attributes.push(Attribute {
                    name: node_text(name_node, source),
                    arguments,
                });
            }
        }

        attributes
    }

    fn parse_base_list(&self, node: Node, source: &str) -> Vec<String> {
        let mut bases = Vec::new();
        let mut search_cursor = node.walk();
        let Some(base_list) = node.child_by_field_name("bases").or_else(|| {
            node.children(&mut search_cursor)
                .find(|n| n.kind() == "base_list")
        }) else {
            return bases;
        };

        let mut cursor = base_list.walk();
        for base in base_list.children(&mut cursor) {
            if base.is_named() && base.kind() != "comment" {
                bases.push(node_text(base, source));
            }
        }
        bases
    }

    /// Splits a raw `(...)` argument list on top-level commas.
    fn split_arguments(&self, raw: &str) -> Vec<String> {
        let interior = self
            .argument_list_re
            .captures(raw.trim())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or(raw);

        let mut arguments = Vec::new();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut current = String::new();

        for ch in interior.chars() {
            match ch {
                '"' => {
                    in_string = !in_string;
                    current.push(ch);
                }
                '(' | '[' | '{' if !in_string => {
                    depth += 1;
                    current.push(ch);
                }
                ')' | ']' | '}' if !in_string => {
                    depth = depth.saturating_sub(1);
                    current.push(ch);
                }
                ',' if depth == 0 && !in_string => {
                    arguments.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            }
        }
        if !current.trim().is_empty() {
            arguments.push(current.trim().to_string());
        }

        arguments
    }
}

fn node_text(node: Node, source: &str) -> String {
    source[node.byte_range()].to_string()
}

fn join_namespace(outer: &str, inner: &str) -> String {
    if outer.is_empty() {
        inner.to_string()
    } else {
        format!("{}.{}", outer, inner)
    }
}

/// Collects contiguous `///` doc lines immediately above a node, verbatim.
/// Attribute lines between the docs and the declaration are skipped over.
fn docs_before_node(node: Node, source: &str) -> Option<String> {
    let start_row = node.start_position().row;
    let lines: Vec<&str> = source.lines().collect();
    let mut doc_lines = Vec::new();

    for i in (0..start_row).rev() {
        if i >= lines.len() {
            continue;
        }

        let line = lines[i].trim();

        if line.starts_with("///") {
            doc_lines.insert(0, line.to_string());
        } else if line.starts_with('[') || line.is_empty() {
            // Attributes and blank lines may sit between docs and the node
            if !doc_lines.is_empty() {
                break;
            }
            continue;
        } else {
            break;
        }
    }

    if doc_lines.is_empty() {
        None
    } else {
        Some(doc_lines.join("\n"))
    }
}
