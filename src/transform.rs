//! Transformer framework: typed hooks that rewrite the AST before it
//! reaches the downstream compiler (spec §4.5).

use std::error::Error;
use std::fmt;

use crate::ast::Program;

/// An AST-to-AST rewrite producing a new root, or an error that aborts the
/// pipeline. The framework makes no defensive copy of the input `Program`:
/// a transformer is free to mutate it in place and return it, or to build a
/// fresh tree — callers must not rely on the prior tree after this runs
/// (spec §3.5).
pub trait Transformer {
    fn transform(&mut self, program: Program) -> (Program, Option<TransformError>);
}

/// A `Transformer` that returns its input unchanged. Used to exercise the
/// "re-applying an identity transformer is a no-op on `preorder` sequence
/// equality" testable property (spec §8).
pub struct IdentityTransformer;

impl Transformer for IdentityTransformer {
    fn transform(&mut self, program: Program) -> (Program, Option<TransformError>) {
        (program, None)
    }
}

/// Runs a sequence of transformers left to right, stopping and surfacing
/// the first error encountered.
pub struct Pipeline<T> {
    stages: Vec<T>,
}

impl<T: Transformer> Pipeline<T> {
    pub fn new(stages: Vec<T>) -> Self {
        Self { stages }
    }
}

impl<T: Transformer> Transformer for Pipeline<T> {
    fn transform(&mut self, mut program: Program) -> (Program, Option<TransformError>) {
        for stage in &mut self.stages {
            let (next, err) = stage.transform(program);
            program = next;
            if err.is_some() {
                return (program, err);
            }
        }
        (program, None)
    }
}

/// A transformer-stage failure. Fatal to the build but never panics (spec
/// §7, error taxonomy item 4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformError {
    pub message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for TransformError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Program;

    #[test]
    fn identity_transformer_returns_input_unchanged() {
        let program = Program::default();
        let (out, err) = IdentityTransformer.transform(program.clone());
        assert!(err.is_none());
        assert_eq!(out, program);
    }

    #[test]
    fn pipeline_stops_at_first_error() {
        struct Failing;
        impl Transformer for Failing {
            fn transform(&mut self, program: Program) -> (Program, Option<TransformError>) {
                (program, Some(TransformError::new("boom")))
            }
        }
        struct NeverRuns;
        impl Transformer for NeverRuns {
            fn transform(&mut self, _program: Program) -> (Program, Option<TransformError>) {
                panic!("should not run after a prior stage errors");
            }
        }

        enum Stage {
            Fail(Failing),
            Never(NeverRuns),
        }
        impl Transformer for Stage {
            fn transform(&mut self, program: Program) -> (Program, Option<TransformError>) {
                match self {
                    Stage::Fail(f) => f.transform(program),
                    Stage::Never(n) => n.transform(program),
                }
            }
        }

        let mut pipeline = Pipeline::new(vec![Stage::Fail(Failing), Stage::Never(NeverRuns)]);
        let (_, err) = pipeline.transform(Program::default());
        assert_eq!(err, Some(TransformError::new("boom")));
    }
}
