//! Lexer, token/position model, AST, and AST transform/validation
//! infrastructure for a TypeScript-flavored embeddable scripting language.
//!
//! The parser itself is out of scope: it is an external collaborator that
//! consumes [`lexer::Lexer`] tokens and produces an [`ast::Program`] plus
//! parse errors wrapped as [`ast::BadExpr`]/[`ast::BadStmt`] sentinels.

pub mod ast;
pub mod diagnostic;
pub mod lexer;
pub mod position;
pub mod token;
pub mod transform;
pub mod validate;
pub mod visitor;
