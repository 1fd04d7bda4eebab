//! Validator framework: `ValidationError`/`ValidationErrors`, and the
//! canonical `SyntaxValidator` + `SyntaxConfig` (spec §4.5).

use std::error::Error;
use std::fmt;

use log::warn;

use crate::ast::{AstNode, Expr, Node, Program, Stmt};
use crate::position::Position;
use crate::visitor::preorder;

/// An AST-to-diagnostics pass that never mutates the tree it inspects.
pub trait Validator {
    fn validate(&self, program: &Program) -> Vec<ValidationError>;
}

/// One validation failure, referencing the offending node.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationError {
    pub message: String,
    #[serde(skip)]
    pub node: Option<Node>,
    pub position: Position,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, node: Node) -> Self {
        let position = node.pos();
        Self {
            message: message.into(),
            node: Some(node),
            position,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

impl Error for ValidationError {}

/// An aggregate of zero or more [`ValidationError`]s. `error()` renders a
/// one-line message for a single error or a bulleted list otherwise; the
/// first error is exposed for unwrap-style matching.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    pub fn error(&self) -> Option<String> {
        match self.errors.as_slice() {
            [] => None,
            [only] => Some(only.to_string()),
            many => Some(
                many.iter()
                    .map(|e| format!("- {e}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error() {
            Some(s) => write!(f, "{s}"),
            None => write!(f, "no validation errors"),
        }
    }
}

/// Disallow flags driving [`SyntaxValidator`]. Passed by value into the
/// validator's constructor, never read from a global (spec.md §9 design
/// note on per-evaluation configuration).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyntaxConfig {
    pub disallow_variable_declarations: bool,
    pub disallow_destructuring: bool,
    pub disallow_assignment: bool,
    pub disallow_return: bool,
    pub disallow_function_definitions: bool,
    pub disallow_function_calls: bool,
    pub disallow_try_catch: bool,
    pub disallow_if: bool,
    pub disallow_switch: bool,
    pub disallow_spread: bool,
    pub disallow_pipe: bool,
    pub disallow_templates: bool,
}

/// The canonical [`Validator`]: a stateless, config-driven pre-order
/// traversal that emits one [`ValidationError`] per disallowed node kind it
/// encounters. Never modifies the tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxValidator {
    config: SyntaxConfig,
}

impl SyntaxValidator {
    pub fn new(config: SyntaxConfig) -> Self {
        Self { config }
    }

    fn disallowed_reason(&self, node: &Node) -> Option<&'static str> {
        match node {
            Node::Stmt(Stmt::Var(_) | Stmt::MultiVar(_) | Stmt::Const(_)) if self.config.disallow_variable_declarations => {
                Some("variable declarations are not allowed")
            }
            Node::Stmt(Stmt::ObjectDestructure(_) | Stmt::ArrayDestructure(_)) if self.config.disallow_destructuring => {
                Some("destructuring is not allowed")
            }
            Node::Stmt(Stmt::Assign(_) | Stmt::SetAttr(_)) if self.config.disallow_assignment => {
                Some("assignment is not allowed")
            }
            Node::Stmt(Stmt::Return(_)) if self.config.disallow_return => Some("return is not allowed"),
            Node::Stmt(Stmt::Func(_)) | Node::Expr(Expr::Func(_)) if self.config.disallow_function_definitions => {
                Some("function definitions are not allowed")
            }
            Node::Expr(Expr::Call(_) | Expr::ObjectCall(_)) if self.config.disallow_function_calls => {
                Some("function calls are not allowed")
            }
            Node::Stmt(Stmt::Try(_)) | Node::Expr(Expr::Try(_)) if self.config.disallow_try_catch => {
                Some("try/catch is not allowed")
            }
            Node::Expr(Expr::If(_)) if self.config.disallow_if => Some("if is not allowed"),
            Node::Expr(Expr::Switch(_)) if self.config.disallow_switch => Some("switch is not allowed"),
            Node::Expr(Expr::Spread(_)) if self.config.disallow_spread => Some("spread is not allowed"),
            Node::Expr(Expr::Pipe(_)) if self.config.disallow_pipe => Some("pipe is not allowed"),
            Node::Expr(Expr::Str(s)) if self.config.disallow_templates && s.template.is_some() => {
                Some("template strings are not allowed")
            }
            _ => None,
        }
    }
}

impl Validator for SyntaxValidator {
    fn validate(&self, program: &Program) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for node in preorder(program) {
            if let Some(reason) = self.disallowed_reason(&node) {
                warn!("syntax validator rejected node at {}: {reason}", node.pos());
                errors.push(ValidationError::new(reason, node));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IntLit, Node, Return};
    use crate::position::Position;

    fn pos(byte: usize) -> Position {
        Position::new("t.ry", byte, 0, 0, byte)
    }

    fn program_with(stmt: Node) -> Program {
        Program::new(vec![stmt])
    }

    #[test]
    fn disallowed_return_is_reported_once() {
        let validator = SyntaxValidator::new(SyntaxConfig {
            disallow_return: true,
            ..Default::default()
        });
        let program = program_with(Node::Stmt(Stmt::Return(Return { return_pos: pos(0), value: None })));
        let errors = validator.validate(&program);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "return is not allowed");
    }

    #[test]
    fn allowed_config_reports_nothing() {
        let validator = SyntaxValidator::default();
        let program = program_with(Node::Stmt(Stmt::Return(Return { return_pos: pos(0), value: None })));
        assert!(validator.validate(&program).is_empty());
    }

    #[test]
    fn pipe_disallowed_descends_into_operands_separately() {
        let validator = SyntaxValidator::new(SyntaxConfig {
            disallow_pipe: true,
            ..Default::default()
        });
        let pipe = Expr::Pipe(crate::ast::Pipe {
            exprs: vec![
                Expr::Int(IntLit { pos: pos(0), literal: "1".into(), value: 1 }),
                Expr::Int(IntLit { pos: pos(4), literal: "2".into(), value: 2 }),
            ],
        });
        let program = program_with(Node::Expr(pipe));
        let errors = validator.validate(&program);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "pipe is not allowed");
    }

    #[test]
    fn validation_errors_error_renders_bulleted_list_for_many() {
        let errs = ValidationErrors::new(vec![
            ValidationError::new("a", Node::Stmt(Stmt::Return(Return { return_pos: pos(0), value: None }))),
            ValidationError::new("b", Node::Stmt(Stmt::Return(Return { return_pos: pos(1), value: None }))),
        ]);
        let rendered = errs.error().unwrap();
        assert!(rendered.contains("- "));
        assert!(rendered.lines().count() == 2);
    }

    #[test]
    fn validation_errors_error_is_one_line_for_single() {
        let errs = ValidationErrors::new(vec![ValidationError::new(
            "a",
            Node::Stmt(Stmt::Return(Return { return_pos: pos(0), value: None })),
        )]);
        assert!(!errs.error().unwrap().starts_with("- "));
    }
}
