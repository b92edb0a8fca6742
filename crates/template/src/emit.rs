//! TypeScript rendering for generated modules.
//! 產生 TypeScript 模組文字。

use sandpad_codec::{quote_single, template_literal};

use crate::compiler::CompiledTemplate;
use crate::descriptor::{Descriptor, DescriptorNode};

/// `export const Name = \`...\`;`
pub fn render_module(export_name: &str, raw: &str) -> String {
    format!("export const {export_name} = {};\n", template_literal(raw))
}

/// Renders the aggregate accessor module exposing `{ files, entry, visibleFiles }`.
/// 產生匯整所有模組並輸出 `{ files, entry, visibleFiles }` 的模組。
pub fn render_aggregate(template: &CompiledTemplate, template_const: &str) -> String {
    let mut out = String::new();
    out.push_str("import type { FileSystemTree } from '@webcontainer/api';\n");
    for export in &template.exports {
        out.push_str(&format!(
            "import {{ {} }} from {};\n",
            export.export_name,
            quote_single(&export.import_path)
        ));
    }
    out.push('\n');
    out.push_str("export type Template = {\n");
    out.push_str("  files: FileSystemTree;\n");
    out.push_str("  entry: string;\n");
    out.push_str("  visibleFiles: string[];\n");
    out.push_str("};\n\n");

    out.push_str(&format!("export const {template_const}: Template = {{\n"));
    out.push_str("  files: {\n");
    render_tree(&template.descriptor, 4, &mut out);
    out.push_str("  },\n\n");
    out.push_str(&format!("  entry: {},\n\n", quote_single(&template.entry)));
    out.push_str("  visibleFiles: [\n");
    for file in &template.visible_files {
        out.push_str(&format!("    {},\n", quote_single(file)));
    }
    out.push_str("  ],\n");
    out.push_str("};\n");
    out
}

fn render_tree(descriptor: &Descriptor, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent);
    for (name, node) in descriptor.iter() {
        let key = quote_single(name);
        match node {
            DescriptorNode::Directory(children) => {
                out.push_str(&format!("{pad}{key}: {{\n"));
                out.push_str(&format!("{pad}  directory: {{\n"));
                render_tree(children, indent + 4, out);
                out.push_str(&format!("{pad}  }},\n"));
                out.push_str(&format!("{pad}}},\n"));
            }
            DescriptorNode::File(file) => {
                out.push_str(&format!("{pad}{key}: {{\n"));
                out.push_str(&format!("{pad}  file: {{\n"));
                out.push_str(&format!("{pad}    contents: {},\n", file.contents));
                out.push_str(&format!("{pad}  }},\n"));
                out.push_str(&format!("{pad}}},\n"));
            }
        }
    }
}
