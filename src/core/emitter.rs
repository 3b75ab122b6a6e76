use std::path::Path;

use sha2::{Digest, Sha256};

use crate::config::OutputConfig;
use crate::error::Result;
use super::model::{ContentEvent, GeneratedUnit, MaterializedMember};

const INDENT: &str = "    ";

/// Renders a generated unit to C# text and writes it out, skipping files
/// whose content is unchanged.
pub struct Emitter {
    output: OutputConfig,
}

impl Emitter {
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            output: output.clone(),
        }
    }

    /// Output file name for a unit, keyed by the root's public name.
    pub fn file_name(&self, unit: &GeneratedUnit) -> String {
        format!("{}{}", unit.key, self.output.file_suffix)
    }

    /// Renders the full text of one generated unit.
    pub fn render(&self, unit: &GeneratedUnit) -> String {
        let mut out = String::new();

        out.push_str("// <auto-generated>\n");
        out.push_str(&format!(
            "//     Flattened from {} by interflat; do not edit.\n",
            unit.root_name
        ));
        if self.output.include_metadata {
            // Deterministic on purpose: timestamps here would make every
            // staleness check fail
            out.push_str(&format!("//     interflat v{}\n", env!("CARGO_PKG_VERSION")));
        }
        out.push_str("// </auto-generated>\n");

        if !unit.imports.is_empty() {
            out.push('\n');
            for import in &unit.imports {
                out.push_str(import);
                out.push('\n');
            }
        }

        out.push('\n');

        // Declarations in the global namespace get no wrapper at all
        let mut level = 0;
        if !unit.namespace.is_empty() {
            out.push_str(&format!("namespace {}\n{{\n", unit.namespace));
            level = 1;
        }
        for scope in &unit.scopes {
            push_line(
                &mut out,
                level,
                &format!("partial {} {}", scope.kind.keyword(), scope.name),
            );
            push_line(&mut out, level, "{");
            level += 1;
        }

        self.render_interface(&mut out, unit, level);

        while level > 0 {
            level -= 1;
            push_line(&mut out, level, "}");
        }

        out
    }

    fn render_interface(&self, out: &mut String, unit: &GeneratedUnit, level: usize) {
        let interface = &unit.interface;

        if let Some(docs) = &interface.documentation {
            for line in docs.lines() {
                push_line(out, level, line.trim());
            }
        }

        let mut header = if interface.is_partial {
            format!("partial interface {}", interface.public_name)
        } else {
            format!("public interface {}", interface.public_name)
        };
        if !interface.base_names.is_empty() {
            header.push_str(" : ");
            header.push_str(&interface.base_names.join(", "));
        }
        push_line(out, level, &header);
        push_line(out, level, "{");

        let body = level + 1;
        for event in &interface.content {
            match event {
                ContentEvent::GroupStart(p) if self.output.emit_regions => {
                    push_line(out, body, &format!("#region {}", p.ancestor));
                }
                ContentEvent::GroupEnd(p) if self.output.emit_regions => {
                    push_line(out, body, &format!("#endregion // {}", p.ancestor));
                }
                ContentEvent::Member(member) => render_member(out, body, member),
                _ => {}
            }
        }

        push_line(out, level, "}");
    }

    /// Writes the rendered content unless an identical file already exists.
    /// Returns true if the file was written.
    pub fn write_if_changed(&self, path: &Path, content: &str, force: bool) -> Result<bool> {
        if !force && path.exists() {
            let existing = std::fs::read_to_string(path)?;
            if content_hash(&existing) == content_hash(content) {
                return Ok(false);
            }
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(true)
    }
}

/// SHA256 of generated content, used for change detection.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn push_line(out: &mut String, level: usize, line: &str) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

fn render_member(out: &mut String, level: usize, member: &MaterializedMember) {
    if let Some(docs) = &member.member.docs {
        for line in docs.lines() {
            push_line(out, level, line.trim());
        }
    }

    // The hide qualifier goes on the signature line, after any attributes
    let mut qualified = false;
    for line in member.member.signature.lines() {
        let trimmed = line.trim();
        if member.hide && !qualified && !trimmed.starts_with('[') {
            push_line(out, level, &format!("new {}", trimmed));
            qualified = true;
        } else {
            push_line(out, level, trimmed);
        }
    }
}
