// Data structures for declarations, extracted entities, and their raw syntax
//
// Everything here is owned: the scanner drops the tree-sitter tree before a
// `Declaration` leaves the file it came from.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Kind of type declaration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Class,
    Struct,
    Interface,
    Record,
}

impl DeclarationKind {
    /// Map a tree-sitter node kind to a declaration kind
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "class_declaration" => Some(DeclarationKind::Class),
            "struct_declaration" => Some(DeclarationKind::Struct),
            "interface_declaration" => Some(DeclarationKind::Interface),
            "record_declaration" | "record_struct_declaration" => Some(DeclarationKind::Record),
            _ => None,
        }
    }
}

/// A type declaration found in the corpus
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Declaration {
    /// Namespace and enclosing type chain plus the identifier (`Game.Simulation.MoveSystem`)
    pub fully_qualified_name: String,
    /// Bare identifier as written in code
    pub short_name: String,
    pub kind: DeclarationKind,
    /// Raw text of every entry in the base list
    pub base_type_names: BTreeSet<String>,
    /// Field statements declared directly in this type, in document order
    pub fields: Vec<FieldSyntax>,
    /// Types declared directly inside this type, in document order
    pub nested: Vec<Declaration>,
    /// Methods declared directly in this type; first overload wins
    pub methods: BTreeMap<String, MethodBody>,
}

impl Declaration {
    /// Pre-order walk over this declaration and everything nested inside it
    pub fn walk(&self) -> DeclarationWalk<'_> {
        DeclarationWalk { stack: vec![self] }
    }

    /// First nested declaration (any depth, pre-order) with the given short name
    pub fn find_nested(&self, short_name: &str) -> Option<&Declaration> {
        self.walk()
            .skip(1)
            .find(|decl| decl.short_name == short_name)
    }

    /// First method with the given name in this declaration or any nested one
    pub fn find_method(&self, name: &str) -> Option<&MethodBody> {
        self.walk().find_map(|decl| decl.methods.get(name))
    }

    /// Field statements of this declaration and its nested types, in document order
    pub fn all_fields(&self) -> Vec<&FieldSyntax> {
        let mut fields: Vec<&FieldSyntax> = self.walk().flat_map(|d| d.fields.iter()).collect();
        fields.sort_by_key(|f| f.start_byte);
        fields
    }
}

/// Iterator returned by [`Declaration::walk`]
pub struct DeclarationWalk<'a> {
    stack: Vec<&'a Declaration>,
}

impl<'a> Iterator for DeclarationWalk<'a> {
    type Item = &'a Declaration;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(current.nested.iter().rev());
        Some(current)
    }
}

/// One field statement (`public float x, y;`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSyntax {
    /// Modifier keywords joined by a single space (`public static readonly`)
    pub modifiers: String,
    /// Declared type exactly as written
    pub type_text: String,
    pub type_syntax: TypeSyntax,
    /// Variable names declared by this statement
    pub variables: Vec<String>,
    /// Byte offset of the statement in its file
    pub start_byte: usize,
}

/// Shape of a field's declared type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TypeSyntax {
    /// `Name<Arg1, Arg2>`; arguments hold each argument's raw text
    Generic { name: String, arguments: Vec<String> },
    Plain(String),
}

impl TypeSyntax {
    /// First type argument if this is a generic named `name`
    pub fn generic_argument_of(&self, name: &str) -> Option<&str> {
        match self {
            TypeSyntax::Generic {
                name: generic_name,
                arguments,
            } if generic_name == name => arguments.first().map(String::as_str),
            _ => None,
        }
    }
}

/// Call expressions found inside a method body
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MethodBody {
    pub invocations: Vec<Invocation>,
}

/// A single call expression (`World.GetOrCreateSystemManaged<RenderSystem>()`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invocation {
    /// Name of the invoked member, without receiver or type arguments
    pub member_name: String,
    /// Raw text of each explicit type argument
    pub type_arguments: Vec<String>,
}

/// A field of a component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentProperty {
    pub visibility: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Comma-joined when one statement declares several variables
    pub name: String,
}

impl From<&FieldSyntax> for ComponentProperty {
    fn from(field: &FieldSyntax) -> Self {
        ComponentProperty {
            visibility: field.modifiers.clone(),
            type_name: field.type_text.clone(),
            name: field.variables.join(", "),
        }
    }
}

/// A declaration implementing the component data marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoundComponent {
    pub name: String,
    pub properties: Vec<ComponentProperty>,
}

/// A declaration implementing the system marker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoundSystem {
    pub name: String,
    #[serde(rename = "componentTypes")]
    pub component_types: Vec<String>,
    pub uses_system: Vec<String>,
}
