// C# Helper Methods
//
// Utility functions for reading declaration metadata out of C# syntax nodes

use crate::model::{Invocation, TypeSyntax};
use tree_sitter::Node;

/// Get text from a tree-sitter node
pub fn node_text(node: &Node, source: &str) -> String {
    let start_byte = node.start_byte();
    let end_byte = node.end_byte();

    let content_bytes = source.as_bytes();
    if start_byte < content_bytes.len() && end_byte <= content_bytes.len() {
        String::from_utf8_lossy(&content_bytes[start_byte..end_byte]).to_string()
    } else {
        String::new()
    }
}

/// First direct child with the given kind
pub fn child_of_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Identifier naming a declaration (`name` field, falling back to the first identifier)
pub fn declaration_name(node: &Node, source: &str) -> Option<String> {
    let name_node = node
        .child_by_field_name("name")
        .or_else(|| child_of_kind(node, "identifier"))?;
    let name = node_text(&name_node, source);
    (!name.is_empty()).then_some(name)
}

/// Body of a type or namespace declaration
pub fn declaration_body<'a>(node: &Node<'a>) -> Option<Node<'a>> {
    node.child_by_field_name("body")
        .filter(|body| body.kind() == "declaration_list")
        .or_else(|| child_of_kind(node, "declaration_list"))
}

/// Extract modifier keywords (attributes excluded)
pub fn extract_modifiers(node: &Node, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == "modifier")
        .map(|c| node_text(&c, source))
        .collect()
}

/// Extract base list (inheritance/implementation classes and interfaces)
pub fn extract_base_list(node: &Node, source: &str) -> Vec<String> {
    let Some(base_list) = child_of_kind(node, "base_list") else {
        return Vec::new();
    };

    let mut cursor = base_list.walk();
    base_list
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "argument_list" && !c.kind().contains("comment"))
        .map(|c| node_text(&c, source))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Namespace name split into its dotted segments
pub fn namespace_segments(node: &Node, source: &str) -> Vec<String> {
    let name_node = node.child_by_field_name("name").or_else(|| {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|c| matches!(c.kind(), "qualified_name" | "identifier"));
        found
    });

    name_node
        .map(|n| node_text(&n, source))
        .unwrap_or_default()
        .split('.')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// The `variable_declaration` of a field statement
pub fn variable_declaration<'a>(field: &Node<'a>) -> Option<Node<'a>> {
    child_of_kind(field, "variable_declaration")
}

/// Type node of a `variable_declaration`
pub fn declared_type<'a>(var_declaration: &Node<'a>) -> Option<Node<'a>> {
    var_declaration.child_by_field_name("type").or_else(|| {
        let mut cursor = var_declaration.walk();
        let found = var_declaration
            .named_children(&mut cursor)
            .find(|c| c.kind() != "variable_declarator" && !c.kind().contains("comment"));
        found
    })
}

/// Variable names declared by a `variable_declaration`
pub fn variable_names(var_declaration: &Node, source: &str) -> Vec<String> {
    let mut cursor = var_declaration.walk();
    var_declaration
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "variable_declarator")
        .filter_map(|declarator| {
            declarator
                .child_by_field_name("name")
                .or_else(|| child_of_kind(&declarator, "identifier"))
                .map(|n| node_text(&n, source))
        })
        .collect()
}

/// Split a `generic_name` into its identifier and raw argument texts
pub fn generic_parts(node: &Node, source: &str) -> Option<(String, Vec<String>)> {
    if node.kind() != "generic_name" {
        return None;
    }
    let name = node
        .child_by_field_name("name")
        .or_else(|| child_of_kind(node, "identifier"))
        .map(|n| node_text(&n, source))?;
    let arguments = child_of_kind(node, "type_argument_list")
        .map(|list| {
            let mut cursor = list.walk();
            list.named_children(&mut cursor)
                .filter(|c| !c.kind().contains("comment"))
                .map(|c| node_text(&c, source))
                .collect()
        })
        .unwrap_or_default();
    Some((name, arguments))
}

/// Classify a declared type node
pub fn type_syntax(type_node: &Node, source: &str) -> TypeSyntax {
    match generic_parts(type_node, source) {
        Some((name, arguments)) => TypeSyntax::Generic { name, arguments },
        None => TypeSyntax::Plain(node_text(type_node, source)),
    }
}

/// Method name: the `name` field, or the identifier right before the parameter list
pub fn method_name(node: &Node, source: &str) -> Option<String> {
    if let Some(name_node) = node.child_by_field_name("name") {
        return Some(node_text(&name_node, source));
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    let param_list_index = children.iter().position(|c| c.kind() == "parameter_list")?;
    children[..param_list_index]
        .iter()
        .rev()
        .find(|c| c.kind() == "identifier")
        .map(|n| node_text(n, source))
}

/// Describe the target of an `invocation_expression`
///
/// Handles `Receiver.Member<T>()`, `Member<T>()` and `Member()`. Other call
/// shapes (delegates, conditional access) yield `None`.
pub fn invocation_target(invocation: &Node, source: &str) -> Option<Invocation> {
    let function = invocation.child_by_field_name("function").or_else(|| {
        let mut cursor = invocation.walk();
        let found = invocation.named_children(&mut cursor).next();
        found
    })?;

    let member = match function.kind() {
        "member_access_expression" => function.child_by_field_name("name").or_else(|| {
            let mut cursor = function.walk();
            let found = function
                .named_children(&mut cursor)
                .filter(|c| matches!(c.kind(), "identifier" | "generic_name"))
                .last();
            found
        })?,
        "generic_name" | "identifier" => function,
        _ => return None,
    };

    match member.kind() {
        "generic_name" => {
            let (member_name, type_arguments) = generic_parts(&member, source)?;
            Some(Invocation {
                member_name,
                type_arguments,
            })
        }
        "identifier" => Some(Invocation {
            member_name: node_text(&member, source),
            type_arguments: Vec::new(),
        }),
        _ => None,
    }
}
