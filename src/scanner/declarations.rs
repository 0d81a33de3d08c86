// C# Type Declaration Extraction
//
// Turns one parsed file into owned `Declaration` records. Namespaces compose,
// nested types are qualified by their enclosing chain, and method bodies are
// reduced to the call expressions they contain.

use super::helpers;
use crate::language::is_type_declaration;
use crate::model::{Declaration, DeclarationKind, FieldSyntax, MethodBody, TypeSyntax};
use std::collections::{BTreeMap, BTreeSet};
use tree_sitter::{Node, Tree};

/// Extract every top-level type declaration (nested ones hang off their parents)
pub fn extract_declarations(tree: &Tree, source: &str) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    walk_scope(tree.root_node(), &[], source, &mut declarations);
    declarations
}

/// Walk a compilation unit, namespace body, or preprocessor block
fn walk_scope(node: Node, namespace: &[String], source: &str, out: &mut Vec<Declaration>) {
    // A file-scoped namespace applies to every sibling after it
    let mut scope: Vec<String> = namespace.to_vec();

    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    for child in children {
        match child.kind() {
            "namespace_declaration" => {
                let mut inner = scope.clone();
                inner.extend(helpers::namespace_segments(&child, source));
                if let Some(body) = helpers::declaration_body(&child) {
                    walk_scope(body, &inner, source, out);
                }
            }
            "file_scoped_namespace_declaration" => {
                scope = namespace.to_vec();
                scope.extend(helpers::namespace_segments(&child, source));
                walk_scope(child, &scope, source, out);
            }
            kind if is_type_declaration(kind) => {
                if let Some(declaration) = build_declaration(child, &scope, source) {
                    out.push(declaration);
                }
            }
            kind if is_transparent_container(kind) => {
                walk_scope(child, &scope, source, out);
            }
            _ => {}
        }
    }
}

/// Nodes that can wrap declarations without opening a scope
fn is_transparent_container(kind: &str) -> bool {
    kind == "ERROR" || kind == "declaration_list" || kind.starts_with("preproc")
}

/// Build a declaration and everything nested inside it
fn build_declaration(node: Node, prefix: &[String], source: &str) -> Option<Declaration> {
    let kind = DeclarationKind::from_node_kind(node.kind())?;
    let short_name = helpers::declaration_name(&node, source)?;

    let mut qualified: Vec<String> = prefix.to_vec();
    qualified.push(short_name.clone());

    let base_type_names: BTreeSet<String> =
        helpers::extract_base_list(&node, source).into_iter().collect();

    let mut members = Members::default();
    if let Some(body) = helpers::declaration_body(&node) {
        collect_members(body, &qualified, source, &mut members);
    }

    Some(Declaration {
        fully_qualified_name: qualified.join("."),
        short_name,
        kind,
        base_type_names,
        fields: members.fields,
        nested: members.nested,
        methods: members.methods,
    })
}

#[derive(Default)]
struct Members {
    fields: Vec<FieldSyntax>,
    nested: Vec<Declaration>,
    methods: BTreeMap<String, MethodBody>,
}

fn collect_members(body: Node, qualified: &[String], source: &str, members: &mut Members) {
    let mut cursor = body.walk();
    let children: Vec<Node> = body.named_children(&mut cursor).collect();
    for child in children {
        match child.kind() {
            "field_declaration" => {
                if let Some(field) = build_field(child, source) {
                    members.fields.push(field);
                }
            }
            "method_declaration" => {
                if let Some(name) = helpers::method_name(&child, source) {
                    members
                        .methods
                        .entry(name)
                        .or_insert_with(|| build_method_body(child, source));
                }
            }
            kind if is_type_declaration(kind) => {
                if let Some(nested) = build_declaration(child, qualified, source) {
                    members.nested.push(nested);
                }
            }
            kind if is_transparent_container(kind) => {
                collect_members(child, qualified, source, members);
            }
            _ => {}
        }
    }
}

fn build_field(node: Node, source: &str) -> Option<FieldSyntax> {
    let var_declaration = helpers::variable_declaration(&node)?;
    let (type_text, type_syntax) = match helpers::declared_type(&var_declaration) {
        Some(type_node) => (
            helpers::node_text(&type_node, source),
            helpers::type_syntax(&type_node, source),
        ),
        None => (String::new(), TypeSyntax::Plain(String::new())),
    };

    Some(FieldSyntax {
        modifiers: helpers::extract_modifiers(&node, source).join(" "),
        type_text,
        type_syntax,
        variables: helpers::variable_names(&var_declaration, source),
        start_byte: node.start_byte(),
    })
}

/// Collect every call expression in a method, lambdas and local functions included
fn build_method_body(node: Node, source: &str) -> MethodBody {
    let mut body = MethodBody::default();
    collect_invocations(node, source, &mut body);
    body
}

fn collect_invocations(node: Node, source: &str, body: &mut MethodBody) {
    if node.kind() == "invocation_expression" {
        if let Some(invocation) = helpers::invocation_target(&node, source) {
            body.invocations.push(invocation);
        }
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_invocations(child, source, body);
    }
}
