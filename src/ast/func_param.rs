//! Function parameter forms (spec §3.3 `FuncParam`, §4.3 destructuring).

use crate::position::Position;

use super::{AstNode, Expr, Ident, Node};

/// One binding inside an object-destructure param or statement:
/// `{a}` (alias absent), `{k: a2}`, `{k3 = 0}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DestructureBinding {
    pub key: Ident,
    pub alias: Option<Ident>,
    pub default: Option<Expr>,
}

/// One element inside an array-destructure param or statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDestructureElement {
    pub name: Ident,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDestructureParam {
    pub lbrace: Position,
    pub bindings: Vec<DestructureBinding>,
    pub rbrace: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDestructureParam {
    pub lbrack: Position,
    pub elements: Vec<ArrayDestructureElement>,
    pub rbrack: Position,
}

/// Closed enumeration of function parameter forms.
#[derive(Debug, Clone, PartialEq)]
pub enum FuncParam {
    Ident(Ident),
    ObjectDestructureParam(ObjectDestructureParam),
    ArrayDestructureParam(ArrayDestructureParam),
}

impl AstNode for FuncParam {
    fn pos(&self) -> Position {
        match self {
            FuncParam::Ident(n) => n.pos(),
            FuncParam::ObjectDestructureParam(n) => n.lbrace.clone(),
            FuncParam::ArrayDestructureParam(n) => n.lbrack.clone(),
        }
    }

    fn end(&self) -> Position {
        match self {
            FuncParam::Ident(n) => n.end(),
            FuncParam::ObjectDestructureParam(n) => n.rbrace.advance(1),
            FuncParam::ArrayDestructureParam(n) => n.rbrack.advance(1),
        }
    }

    fn string(&self) -> String {
        match self {
            FuncParam::Ident(n) => n.name.clone(),
            FuncParam::ObjectDestructureParam(n) => format!(
                "{{{}}}",
                n.bindings
                    .iter()
                    .map(binding_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            FuncParam::ArrayDestructureParam(n) => format!(
                "[{}]",
                n.elements
                    .iter()
                    .map(element_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl FuncParam {
    /// Descends defaults and element identifiers (spec §4.4 nil-safety note).
    pub fn children(&self) -> Vec<Node> {
        match self {
            FuncParam::Ident(_) => vec![],
            FuncParam::ObjectDestructureParam(n) => n
                .bindings
                .iter()
                .filter_map(|b| b.default.clone())
                .map(Node::Expr)
                .collect(),
            FuncParam::ArrayDestructureParam(n) => n
                .elements
                .iter()
                .filter_map(|e| e.default.clone())
                .map(Node::Expr)
                .collect(),
        }
    }
}

fn binding_string(b: &DestructureBinding) -> String {
    let base = match &b.alias {
        Some(alias) => format!("{}: {}", b.key.name, alias.name),
        None => b.key.name.clone(),
    };
    match &b.default {
        Some(default) => format!("{} = {}", base, default.string()),
        None => base,
    }
}

fn element_string(e: &ArrayDestructureElement) -> String {
    match &e.default {
        Some(default) => format!("{} = {}", e.name.name, default.string()),
        None => e.name.name.clone(),
    }
}
