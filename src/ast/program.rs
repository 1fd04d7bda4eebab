//! The root node produced by parsing a whole file (spec §3.3 `Program`).

use crate::position::Position;

use super::{AstNode, Node};

/// An ordered sequence of top-level statements. An empty `Program` (the
/// result of parsing an empty or all-comment file) has no position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub stmts: Vec<Node>,
}

impl Program {
    pub fn new(stmts: Vec<Node>) -> Self {
        Self { stmts }
    }

    pub fn first(&self) -> Option<&Node> {
        self.stmts.first()
    }
}

impl AstNode for Program {
    fn pos(&self) -> Position {
        self.stmts.first().map(|n| n.pos()).unwrap_or_else(Position::no_pos)
    }

    fn end(&self) -> Position {
        self.stmts.last().map(|n| n.end()).unwrap_or_else(Position::no_pos)
    }

    fn string(&self) -> String {
        self.stmts.iter().map(|n| n.string()).collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Ident, Stmt, Return};

    #[test]
    fn empty_program_has_no_pos() {
        let program = Program::default();
        assert!(!program.pos().is_valid());
        assert!(!program.end().is_valid());
        assert!(program.first().is_none());
    }

    #[test]
    fn program_pos_and_end_span_first_and_last_stmt() {
        let ident = Ident {
            name_pos: Position::new("m.ry", 0, 0, 0, 0),
            name: "x".to_string(),
        };
        let ret = Stmt::Return(Return {
            return_pos: Position::new("m.ry", 10, 0, 1, 0),
            value: None,
        });
        let program = Program::new(vec![Node::Expr(Expr::Ident(ident)), Node::Stmt(ret)]);
        assert_eq!(program.pos(), Position::new("m.ry", 0, 0, 0, 0));
        assert_eq!(program.end(), Position::new("m.ry", 16, 0, 1, 6));
    }
}
