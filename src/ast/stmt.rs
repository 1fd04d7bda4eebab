//! Statement nodes: everything that performs an effect (spec §3.3/§4.3).

use crate::position::Position;

use super::expr::{func_children, try_children};
use super::{ArrayDestructureElement, AstNode, DestructureBinding, Expr, Func, Ident, Node, Try};

#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub let_pos: Position,
    pub name: Ident,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiVar {
    pub let_pos: Position,
    pub names: Vec<Ident>,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDestructure {
    pub let_pos: Position,
    pub lbrace: Position,
    pub bindings: Vec<DestructureBinding>,
    pub rbrace: Position,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDestructure {
    pub let_pos: Position,
    pub lbrack: Position,
    pub elements: Vec<ArrayDestructureElement>,
    pub rbrack: Position,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Const {
    pub const_pos: Position,
    pub name: Ident,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub return_pos: Position,
    pub value: Option<Expr>,
}

/// Exactly one of `name`/`index` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub name: Option<Ident>,
    pub index: Option<super::Index>,
    pub op_pos: Position,
    pub op: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetAttr {
    pub x: Box<Expr>,
    pub period: Position,
    pub attr: Ident,
    pub op_pos: Position,
    pub op: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Postfix {
    pub x: Box<Expr>,
    pub op_pos: Position,
    pub op: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub lbrace: Position,
    pub stmts: Vec<Node>,
    pub rbrace: Position,
}

impl Block {
    pub fn ends_with_return(&self) -> bool {
        matches!(self.stmts.last(), Some(Node::Stmt(Stmt::Return(_))))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Throw {
    pub throw_pos: Position,
    pub value: Option<Expr>,
}

/// Parser error-recovery sentinel: no children, a fixed `string()`.
#[derive(Debug, Clone, PartialEq)]
pub struct BadStmt {
    pub from: Position,
    pub to: Position,
}

/// Closed enumeration of nodes that perform an effect (spec §3.3).
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Var(Var),
    MultiVar(MultiVar),
    ObjectDestructure(Box<ObjectDestructure>),
    ArrayDestructure(Box<ArrayDestructure>),
    Const(Const),
    Return(Return),
    Assign(Box<Assign>),
    SetAttr(Box<SetAttr>),
    Postfix(Box<Postfix>),
    Block(Box<Block>),
    Throw(Throw),
    Func(Box<Func>),
    Try(Box<Try>),
    BadStmt(BadStmt),
}

fn expr_string(e: &Option<Expr>) -> String {
    e.as_ref().map(|x| x.string()).unwrap_or_default()
}

impl AstNode for Block {
    fn pos(&self) -> Position {
        self.lbrace.clone()
    }

    fn end(&self) -> Position {
        self.rbrace.advance(1)
    }

    fn string(&self) -> String {
        format!("{{ {} }}", self.stmts.iter().map(|s| s.string()).collect::<Vec<_>>().join("; "))
    }
}

impl AstNode for Stmt {
    fn pos(&self) -> Position {
        match self {
            Stmt::Var(n) => n.let_pos.clone(),
            Stmt::MultiVar(n) => n.let_pos.clone(),
            Stmt::ObjectDestructure(n) => n.let_pos.clone(),
            Stmt::ArrayDestructure(n) => n.let_pos.clone(),
            Stmt::Const(n) => n.const_pos.clone(),
            Stmt::Return(n) => n.return_pos.clone(),
            Stmt::Assign(n) => n
                .name
                .as_ref()
                .map(|i| i.pos())
                .or_else(|| n.index.as_ref().map(|i| i.x.pos()))
                .unwrap_or_else(|| n.op_pos.clone()),
            Stmt::SetAttr(n) => n.x.pos(),
            Stmt::Postfix(n) => n.x.pos(),
            Stmt::Block(n) => n.pos(),
            Stmt::Throw(n) => n.throw_pos.clone(),
            Stmt::Func(n) => n.pos(),
            Stmt::Try(n) => n.pos(),
            Stmt::BadStmt(n) => n.from.clone(),
        }
    }

    fn end(&self) -> Position {
        match self {
            Stmt::Var(n) => n.value.as_ref().map(|v| v.end()).unwrap_or_else(|| n.name.end()),
            Stmt::MultiVar(n) => n
                .value
                .as_ref()
                .map(|v| v.end())
                .unwrap_or_else(|| n.names.last().map(|i| i.end()).unwrap_or_else(|| n.let_pos.clone())),
            Stmt::ObjectDestructure(n) => n.value.as_ref().map(|v| v.end()).unwrap_or_else(|| n.rbrace.advance(1)),
            Stmt::ArrayDestructure(n) => n.value.as_ref().map(|v| v.end()).unwrap_or_else(|| n.rbrack.advance(1)),
            Stmt::Const(n) => n.value.as_ref().map(|v| v.end()).unwrap_or_else(|| n.name.end()),
            Stmt::Return(n) => n.value.as_ref().map(|v| v.end()).unwrap_or_else(|| n.return_pos.advance(6)),
            Stmt::Assign(n) => n.value.end(),
            Stmt::SetAttr(n) => n.value.end(),
            Stmt::Postfix(n) => n.op_pos.advance(2),
            Stmt::Block(n) => n.end(),
            Stmt::Throw(n) => n.value.as_ref().map(|v| v.end()).unwrap_or_else(|| n.throw_pos.advance(5)),
            Stmt::Func(n) => n.end(),
            Stmt::Try(n) => n.end(),
            Stmt::BadStmt(n) => n.to.clone(),
        }
    }

    fn string(&self) -> String {
        match self {
            Stmt::Var(n) => match &n.value {
                Some(v) => format!("let {} = {}", n.name.name, v.string()),
                None => format!("let {} = ", n.name.name),
            },
            Stmt::MultiVar(n) => format!(
                "let {} = {}",
                n.names.iter().map(|i| i.name.clone()).collect::<Vec<_>>().join(", "),
                expr_string(&n.value)
            ),
            Stmt::ObjectDestructure(n) => format!(
                "let {{{}}} = {}",
                n.bindings.iter().map(|b| b.key.name.clone()).collect::<Vec<_>>().join(", "),
                expr_string(&n.value)
            ),
            Stmt::ArrayDestructure(n) => format!(
                "let [{}] = {}",
                n.elements.iter().map(|e| e.name.name.clone()).collect::<Vec<_>>().join(", "),
                expr_string(&n.value)
            ),
            Stmt::Const(n) => format!("const {} = {}", n.name.name, expr_string(&n.value)),
            Stmt::Return(n) => match &n.value {
                Some(v) => format!("return {}", v.string()),
                None => "return".to_string(),
            },
            Stmt::Assign(n) => {
                let target = n
                    .name
                    .as_ref()
                    .map(|i| i.name.clone())
                    .or_else(|| n.index.as_ref().map(|i| i.string()))
                    .unwrap_or_default();
                format!("{} {} {}", target, n.op, n.value.string())
            }
            Stmt::SetAttr(n) => format!("{}.{} {} {}", n.x.string(), n.attr.name, n.op, n.value.string()),
            Stmt::Postfix(n) => format!("({}{})", n.x.string(), n.op),
            Stmt::Block(n) => n.string(),
            Stmt::Throw(n) => match &n.value {
                Some(v) => format!("throw {}", v.string()),
                None => "throw".to_string(),
            },
            Stmt::Func(n) => n.string(),
            Stmt::Try(n) => n.string(),
            Stmt::BadStmt(_) => "<bad statement>".to_string(),
        }
    }
}

impl Stmt {
    /// Every non-null child that is itself a [`Node`], in declaration order
    /// (spec §4.4, "child enumeration closure").
    pub fn children(&self) -> Vec<Node> {
        match self {
            Stmt::Var(n) => n.value.iter().cloned().map(Node::Expr).collect(),
            Stmt::MultiVar(n) => n.value.iter().cloned().map(Node::Expr).collect(),
            Stmt::ObjectDestructure(n) => {
                let mut out: Vec<Node> = n.bindings.iter().filter_map(|b| b.default.clone()).map(Node::Expr).collect();
                out.extend(n.value.iter().cloned().map(Node::Expr));
                out
            }
            Stmt::ArrayDestructure(n) => {
                let mut out: Vec<Node> = n.elements.iter().filter_map(|e| e.default.clone()).map(Node::Expr).collect();
                out.extend(n.value.iter().cloned().map(Node::Expr));
                out
            }
            Stmt::Const(n) => n.value.iter().cloned().map(Node::Expr).collect(),
            Stmt::Return(n) => n.value.iter().cloned().map(Node::Expr).collect(),
            Stmt::Assign(n) => {
                let mut out = Vec::new();
                if let Some(index) = &n.index {
                    out.push(Node::Expr(Expr::Index(Box::new(index.clone()))));
                }
                out.push(Node::Expr(n.value.clone()));
                out
            }
            Stmt::SetAttr(n) => vec![Node::Expr((*n.x).clone()), Node::Expr(n.value.clone())],
            Stmt::Postfix(n) => vec![Node::Expr((*n.x).clone())],
            Stmt::Block(n) => n.stmts.clone(),
            Stmt::Throw(n) => n.value.iter().cloned().map(Node::Expr).collect(),
            Stmt::Func(n) => func_children(n),
            Stmt::Try(n) => try_children(n),
            Stmt::BadStmt(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IntLit, Expr as E};

    fn pos(byte: usize) -> Position {
        Position::new("t.ry", byte, 0, 0, byte)
    }

    #[test]
    fn var_end_falls_back_to_name_end_when_value_absent() {
        let stmt = Stmt::Var(Var {
            let_pos: pos(0),
            name: Ident { name_pos: pos(4), name: "x".to_string() },
            value: None,
        });
        assert_eq!(stmt.end(), pos(5));
    }

    #[test]
    fn var_string_prints_value_when_present() {
        let stmt = Stmt::Var(Var {
            let_pos: pos(0),
            name: Ident { name_pos: pos(4), name: "x".to_string() },
            value: Some(E::Int(IntLit { pos: pos(8), literal: "1".to_string(), value: 1 })),
        });
        assert_eq!(stmt.string(), "let x = 1");
    }

    #[test]
    fn return_with_no_value_ends_at_return_pos_plus_six() {
        let stmt = Stmt::Return(Return { return_pos: pos(10), value: None });
        assert_eq!(stmt.end(), pos(16));
        assert_eq!(stmt.string(), "return");
    }

    #[test]
    fn block_ends_with_return_detects_trailing_return() {
        let block = Block {
            lbrace: pos(0),
            stmts: vec![Node::Stmt(Stmt::Return(Return { return_pos: pos(1), value: None }))],
            rbrace: pos(8),
        };
        assert!(block.ends_with_return());
    }

    #[test]
    fn bad_stmt_has_no_children() {
        let bad = Stmt::BadStmt(BadStmt { from: pos(0), to: pos(1) });
        assert!(bad.children().is_empty());
        assert_eq!(bad.string(), "<bad statement>");
    }
}
