//! Expression nodes: everything that computes a value (spec §3.3/§4.3).

use crate::position::Position;

use super::{AstNode, Block, FuncParam, Node, Pattern};

/// A simple name reference. Also used, unwrapped, as the simple form of
/// `FuncParam` and as the key/alias/attr slot of several compound nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name_pos: Position,
    pub name: String,
}

impl AstNode for Ident {
    fn pos(&self) -> Position {
        self.name_pos.clone()
    }

    fn end(&self) -> Position {
        self.name_pos.advance(self.name.len())
    }

    fn string(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntLit {
    pub pos: Position,
    pub literal: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLit {
    pub pos: Position,
    pub literal: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolLit {
    pub pos: Position,
    pub literal: String,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NilLit {
    pub pos: Position,
}

/// A string literal. `literal` is the raw, quote-delimited source text;
/// `value` is the escape-decoded payload. `exprs` holds the interpolation
/// children for strings produced from a template literal (empty otherwise);
/// `template` points back at the raw template form, when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct Str {
    pub pos: Position,
    pub literal: String,
    pub value: String,
    pub template: Option<Box<Expr>>,
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub lbrack: Position,
    pub items: Vec<Expr>,
    pub rbrack: Position,
}

/// One entry of a map literal. `key` is `None` for a `...spread` item.
#[derive(Debug, Clone, PartialEq)]
pub struct MapItem {
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapLit {
    pub lbrace: Position,
    pub items: Vec<MapItem>,
    pub rbrace: Position,
}

impl MapLit {
    pub fn has_spread(&self) -> bool {
        self.items.iter().any(|item| item.key.is_none())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    pub op_pos: Position,
    pub op: String,
    pub x: Box<Expr>,
}

/// `x op y`. `x`/`y` are optional so error recovery can still report a
/// position: an infix missing its left operand falls back to `op_pos`.
#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    pub x: Option<Box<Expr>>,
    pub op_pos: Position,
    pub op: String,
    pub y: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ternary {
    pub cond: Box<Expr>,
    pub q_pos: Position,
    pub if_true: Box<Expr>,
    pub colon: Position,
    pub if_false: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub if_pos: Position,
    pub lparen: Position,
    pub cond: Box<Expr>,
    pub rparen: Position,
    pub consequence: Option<Block>,
    pub alternative: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub fun: Box<Expr>,
    pub lparen: Position,
    pub args: Vec<Expr>,
    pub rparen: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetAttr {
    pub x: Box<Expr>,
    pub period: Position,
    pub attr: Ident,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectCall {
    pub x: Box<Expr>,
    pub period: Position,
    pub call: Call,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub x: Box<Expr>,
    pub lbrack: Position,
    pub index: Box<Expr>,
    pub rbrack: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub x: Box<Expr>,
    pub lbrack: Position,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub rbrack: Position,
}

/// `a |> b |> c`. An empty `exprs` (never produced by a well-formed parse,
/// but reachable via a hand-built tree) has `pos()==end()==NoPos`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub exprs: Vec<Expr>,
}

/// `...x` — a rest parameter when `x` is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    pub ellipsis: Position,
    pub x: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct In {
    pub x: Box<Expr>,
    pub in_pos: Position,
    pub y: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotIn {
    pub x: Box<Expr>,
    pub not_in_pos: Position,
    pub y: Box<Expr>,
}

/// One arm of a `switch`.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub case_pos: Position,
    pub exprs: Vec<Expr>,
    pub colon: Position,
    pub body: Option<Block>,
    pub default: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Switch {
    pub switch_pos: Position,
    pub lparen: Position,
    pub value: Box<Expr>,
    pub rparen: Position,
    pub lbrace: Position,
    pub cases: Vec<Case>,
    pub rbrace: Position,
}

/// One arm of a `match`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub arrow: Position,
    pub result: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub match_pos: Position,
    pub subject: Box<Expr>,
    pub lbrace: Position,
    pub arms: Vec<MatchArm>,
    pub default: Option<Box<MatchArm>>,
    pub rbrace: Position,
}

/// `try { } catch (e) { } finally { }`. Dual-role: also appears as
/// [`super::Stmt::Try`]. Every section but `body` is optional so both
/// `try/catch` and `try/finally` alone are representable.
#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    pub try_pos: Position,
    pub body: Option<Block>,
    pub catch_pos: Option<Position>,
    pub catch_ident: Option<Ident>,
    pub catch_block: Option<Block>,
    pub finally_pos: Option<Position>,
    pub finally_block: Option<Block>,
}

impl AstNode for Try {
    fn pos(&self) -> Position {
        self.try_pos.clone()
    }

    fn end(&self) -> Position {
        if let Some(finally_block) = &self.finally_block {
            finally_block.end()
        } else if let Some(catch_block) = &self.catch_block {
            catch_block.end()
        } else if let Some(body) = &self.body {
            body.end()
        } else {
            self.try_pos.advance(3)
        }
    }

    fn string(&self) -> String {
        let mut out = format!("try {}", block_string(&self.body));
        if let Some(ident) = &self.catch_ident {
            out.push_str(&format!(" catch ({}) {}", ident.name, block_string(&self.catch_block)));
        } else if self.catch_block.is_some() {
            out.push_str(&format!(" catch {}", block_string(&self.catch_block)));
        }
        if self.finally_block.is_some() {
            out.push_str(&format!(" finally {}", block_string(&self.finally_block)));
        }
        out
    }
}

/// A function literal or definition. Dual-role: also appears as
/// [`super::Stmt::Func`] when it has a `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    pub func_pos: Position,
    pub name: Option<Ident>,
    pub lparen: Position,
    pub params: Vec<FuncParam>,
    pub defaults: Vec<(String, Expr)>,
    pub rest_param: Option<Ident>,
    pub rparen: Position,
    pub body: Option<Block>,
}

impl AstNode for Func {
    fn pos(&self) -> Position {
        self.func_pos.clone()
    }

    fn end(&self) -> Position {
        match &self.body {
            Some(body) => body.end(),
            None => self.rparen.advance(1),
        }
    }

    fn string(&self) -> String {
        let params: Vec<String> = self.params.iter().map(|p| p.string()).collect();
        let header = match &self.name {
            Some(name) => format!("function {}({})", name.name, params.join(", ")),
            None => format!("function({})", params.join(", ")),
        };
        format!("{} {}", header, block_string(&self.body))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    pub name: Ident,
    pub default: Box<Expr>,
}

/// A parser error-recovery sentinel: no children, a fixed `string()`.
#[derive(Debug, Clone, PartialEq)]
pub struct BadExpr {
    pub from: Position,
    pub to: Position,
}

/// Closed enumeration of nodes that compute a value (spec §3.3).
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Int(IntLit),
    Float(FloatLit),
    Bool(BoolLit),
    Nil(NilLit),
    Str(Str),
    List(List),
    Map(MapLit),
    Func(Box<Func>),
    Prefix(Box<Prefix>),
    Infix(Box<Infix>),
    Ternary(Box<Ternary>),
    If(Box<IfExpr>),
    Match(Box<Match>),
    Switch(Box<Switch>),
    Try(Box<Try>),
    Call(Box<Call>),
    ObjectCall(Box<ObjectCall>),
    GetAttr(Box<GetAttr>),
    Index(Box<Index>),
    Slice(Box<Slice>),
    In(Box<In>),
    NotIn(Box<NotIn>),
    Pipe(Pipe),
    Spread(Box<Spread>),
    DefaultValue(Box<DefaultValue>),
    BadExpr(BadExpr),
}

fn block_string(block: &Option<Block>) -> String {
    match block {
        Some(b) => b.string(),
        None => "{  }".to_string(),
    }
}

fn expr_string(e: &Option<Box<Expr>>) -> String {
    e.as_ref().map(|x| x.string()).unwrap_or_default()
}

impl AstNode for Expr {
    fn pos(&self) -> Position {
        match self {
            Expr::Ident(n) => n.pos(),
            Expr::Int(n) => n.pos.clone(),
            Expr::Float(n) => n.pos.clone(),
            Expr::Bool(n) => n.pos.clone(),
            Expr::Nil(n) => n.pos.clone(),
            Expr::Str(n) => n.pos.clone(),
            Expr::List(n) => n.lbrack.clone(),
            Expr::Map(n) => n.lbrace.clone(),
            Expr::Func(n) => n.pos(),
            Expr::Prefix(n) => n.op_pos.clone(),
            Expr::Infix(n) => n.x.as_ref().map(|x| x.pos()).unwrap_or_else(|| n.op_pos.clone()),
            Expr::Ternary(n) => n.cond.pos(),
            Expr::If(n) => n.if_pos.clone(),
            Expr::Match(n) => n.match_pos.clone(),
            Expr::Switch(n) => n.switch_pos.clone(),
            Expr::Try(n) => n.pos(),
            Expr::Call(n) => n.fun.pos(),
            Expr::ObjectCall(n) => n.x.pos(),
            Expr::GetAttr(n) => n.x.pos(),
            Expr::Index(n) => n.x.pos(),
            Expr::Slice(n) => n.x.pos(),
            Expr::In(n) => n.x.pos(),
            Expr::NotIn(n) => n.x.pos(),
            Expr::Pipe(n) => n.exprs.first().map(|e| e.pos()).unwrap_or_default(),
            Expr::Spread(n) => n.ellipsis.clone(),
            Expr::DefaultValue(n) => n.name.pos(),
            Expr::BadExpr(n) => n.from.clone(),
        }
    }

    fn end(&self) -> Position {
        match self {
            Expr::Ident(n) => n.end(),
            Expr::Int(n) => n.pos.advance(n.literal.len()),
            Expr::Float(n) => n.pos.advance(n.literal.len()),
            Expr::Bool(n) => n.pos.advance(n.literal.len()),
            Expr::Nil(n) => n.pos.advance(3),
            Expr::Str(n) => n.pos.advance(n.literal.len()),
            Expr::List(n) => n.rbrack.advance(1),
            Expr::Map(n) => n.rbrace.advance(1),
            Expr::Func(n) => n.end(),
            Expr::Prefix(n) => n.x.end(),
            Expr::Infix(n) => n
                .y
                .as_ref()
                .map(|y| y.end())
                .unwrap_or_else(|| n.op_pos.advance(n.op.len())),
            Expr::Ternary(n) => n.if_false.end(),
            Expr::If(n) => n
                .alternative
                .as_ref()
                .map(|b| b.end())
                .or_else(|| n.consequence.as_ref().map(|b| b.end()))
                .unwrap_or_else(|| n.rparen.advance(1)),
            Expr::Match(n) => n.rbrace.advance(1),
            Expr::Switch(n) => n.rbrace.advance(1),
            Expr::Try(n) => n.end(),
            Expr::Call(n) => n.rparen.advance(1),
            Expr::ObjectCall(n) => n.call.end(),
            Expr::GetAttr(n) => n.attr.end(),
            Expr::Index(n) => n.rbrack.advance(1),
            Expr::Slice(n) => n.rbrack.advance(1),
            Expr::In(n) => n.y.end(),
            Expr::NotIn(n) => n.y.end(),
            Expr::Pipe(n) => n.exprs.last().map(|e| e.end()).unwrap_or_default(),
            Expr::Spread(n) => n.x.as_ref().map(|x| x.end()).unwrap_or_else(|| n.ellipsis.advance(3)),
            Expr::DefaultValue(n) => n.default.end(),
            Expr::BadExpr(n) => n.to.clone(),
        }
    }

    fn string(&self) -> String {
        match self {
            Expr::Ident(n) => n.name.clone(),
            Expr::Int(n) => n.literal.clone(),
            Expr::Float(n) => n.literal.clone(),
            Expr::Bool(n) => n.literal.clone(),
            Expr::Nil(_) => "nil".to_string(),
            Expr::Str(n) => format!("{:?}", n.value),
            Expr::List(n) => format!("[{}]", n.items.iter().map(|e| e.string()).collect::<Vec<_>>().join(", ")),
            Expr::Map(n) => format!(
                "{{{}}}",
                n.items
                    .iter()
                    .map(|item| match &item.key {
                        Some(k) => format!("{}: {}", k.string(), item.value.string()),
                        None => format!("...{}", item.value.string()),
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Expr::Func(n) => n.string(),
            Expr::Prefix(n) => format!("({}{})", n.op, n.x.string()),
            Expr::Infix(n) => format!("({} {} {})", expr_string(&n.x), n.op, expr_string(&n.y)),
            Expr::Ternary(n) => format!("({} ? {} : {})", n.cond.string(), n.if_true.string(), n.if_false.string()),
            Expr::If(n) => {
                let mut out = format!("if ({}) {}", n.cond.string(), block_string(&n.consequence));
                if let Some(alt) = &n.alternative {
                    out.push_str(&format!(" else {}", alt.string()));
                }
                out
            }
            Expr::Match(n) => format!("match ({}) {{ {} arms }}", n.subject.string(), n.arms.len()),
            Expr::Switch(n) => format!("switch ({}) {{ {} cases }}", n.value.string(), n.cases.len()),
            Expr::Try(n) => n.string(),
            Expr::Call(n) => format!(
                "{}({})",
                n.fun.string(),
                n.args.iter().map(|a| a.string()).collect::<Vec<_>>().join(", ")
            ),
            Expr::ObjectCall(n) => format!("{}{}{}", n.x.string(), if n.optional { "?." } else { "." }, n.call.string()),
            Expr::GetAttr(n) => format!("{}{}{}", n.x.string(), if n.optional { "?." } else { "." }, n.attr.name),
            Expr::Index(n) => format!("{}[{}]", n.x.string(), n.index.string()),
            Expr::Slice(n) => format!(
                "{}[{}:{}]",
                n.x.string(),
                n.low.as_ref().map(|e| e.string()).unwrap_or_default(),
                n.high.as_ref().map(|e| e.string()).unwrap_or_default()
            ),
            Expr::In(n) => format!("{} in {}", n.x.string(), n.y.string()),
            Expr::NotIn(n) => format!("{} not in {}", n.x.string(), n.y.string()),
            Expr::Pipe(n) => format!("({})", n.exprs.iter().map(|e| e.string()).collect::<Vec<_>>().join(" |> ")),
            Expr::Spread(n) => format!("...{}", expr_string(&n.x)),
            Expr::DefaultValue(n) => format!("{} = {}", n.name.name, n.default.string()),
            Expr::BadExpr(_) => "<bad expression>".to_string(),
        }
    }
}

impl Expr {
    /// Every non-null child that is itself a [`Node`], in declaration order
    /// (spec §4.4, "child enumeration closure").
    pub fn children(&self) -> Vec<Node> {
        match self {
            Expr::Ident(_) | Expr::Int(_) | Expr::Float(_) | Expr::Bool(_) | Expr::Nil(_) => vec![],
            Expr::Str(n) => n.exprs.iter().cloned().map(Node::Expr).collect(),
            Expr::List(n) => n.items.iter().cloned().map(Node::Expr).collect(),
            Expr::Map(n) => n
                .items
                .iter()
                .flat_map(|item| {
                    let mut out = Vec::new();
                    if let Some(k) = &item.key {
                        out.push(Node::Expr(k.clone()));
                    }
                    out.push(Node::Expr(item.value.clone()));
                    out
                })
                .collect(),
            Expr::Func(n) => func_children(n),
            Expr::Prefix(n) => vec![Node::Expr((*n.x).clone())],
            Expr::Infix(n) => {
                let mut out = Vec::new();
                if let Some(x) = &n.x {
                    out.push(Node::Expr((**x).clone()));
                }
                if let Some(y) = &n.y {
                    out.push(Node::Expr((**y).clone()));
                }
                out
            }
            Expr::Ternary(n) => vec![
                Node::Expr((*n.cond).clone()),
                Node::Expr((*n.if_true).clone()),
                Node::Expr((*n.if_false).clone()),
            ],
            Expr::If(n) => {
                let mut out = vec![Node::Expr((*n.cond).clone())];
                if let Some(c) = &n.consequence {
                    out.push(Node::Stmt(super::Stmt::Block(Box::new(c.clone()))));
                }
                if let Some(a) = &n.alternative {
                    out.push(Node::Stmt(super::Stmt::Block(Box::new(a.clone()))));
                }
                out
            }
            Expr::Match(n) => {
                let mut out = vec![Node::Expr((*n.subject).clone())];
                for arm in &n.arms {
                    out.extend(match_arm_children(arm));
                }
                if let Some(d) = &n.default {
                    out.extend(match_arm_children(d));
                }
                out
            }
            Expr::Switch(n) => {
                let mut out = vec![Node::Expr((*n.value).clone())];
                for case in &n.cases {
                    out.extend(case.exprs.iter().cloned().map(Node::Expr));
                    if let Some(body) = &case.body {
                        out.push(Node::Stmt(super::Stmt::Block(Box::new(body.clone()))));
                    }
                }
                out
            }
            Expr::Try(n) => try_children(n),
            Expr::Call(n) => {
                let mut out = vec![Node::Expr((*n.fun).clone())];
                out.extend(n.args.iter().cloned().map(Node::Expr));
                out
            }
            Expr::ObjectCall(n) => {
                let mut out = vec![Node::Expr((*n.x).clone())];
                out.extend(Expr::Call(Box::new(n.call.clone())).children());
                out
            }
            Expr::GetAttr(n) => vec![Node::Expr((*n.x).clone())],
            Expr::Index(n) => vec![Node::Expr((*n.x).clone()), Node::Expr((*n.index).clone())],
            Expr::Slice(n) => {
                let mut out = vec![Node::Expr((*n.x).clone())];
                if let Some(low) = &n.low {
                    out.push(Node::Expr((**low).clone()));
                }
                if let Some(high) = &n.high {
                    out.push(Node::Expr((**high).clone()));
                }
                out
            }
            Expr::In(n) => vec![Node::Expr((*n.x).clone()), Node::Expr((*n.y).clone())],
            Expr::NotIn(n) => vec![Node::Expr((*n.x).clone()), Node::Expr((*n.y).clone())],
            Expr::Pipe(n) => n.exprs.iter().cloned().map(Node::Expr).collect(),
            Expr::Spread(n) => n.x.iter().map(|x| Node::Expr((**x).clone())).collect(),
            Expr::DefaultValue(n) => vec![Node::Expr((*n.default).clone())],
            Expr::BadExpr(_) => vec![],
        }
    }
}

pub(super) fn func_children(f: &Func) -> Vec<Node> {
    let mut out = Vec::new();
    for param in &f.params {
        out.extend(param.children());
    }
    for (_, default) in &f.defaults {
        out.push(Node::Expr(default.clone()));
    }
    if let Some(body) = &f.body {
        out.push(Node::Stmt(super::Stmt::Block(Box::new(body.clone()))));
    }
    out
}

pub(super) fn try_children(t: &Try) -> Vec<Node> {
    let mut out = Vec::new();
    if let Some(body) = &t.body {
        out.push(Node::Stmt(super::Stmt::Block(Box::new(body.clone()))));
    }
    if let Some(catch_block) = &t.catch_block {
        out.push(Node::Stmt(super::Stmt::Block(Box::new(catch_block.clone()))));
    }
    if let Some(finally_block) = &t.finally_block {
        out.push(Node::Stmt(super::Stmt::Block(Box::new(finally_block.clone()))));
    }
    out
}

fn match_arm_children(arm: &MatchArm) -> Vec<Node> {
    let mut out = arm.pattern.children();
    if let Some(guard) = &arm.guard {
        out.push(Node::Expr(guard.clone()));
    }
    out.push(Node::Expr(arm.result.clone()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(byte: usize) -> Position {
        Position::new("t.ry", byte, 0, 0, byte)
    }

    #[test]
    fn infix_without_left_operand_falls_back_to_operator_position() {
        let infix = Infix {
            x: None,
            op_pos: pos(5),
            op: "+".to_string(),
            y: Some(Box::new(Expr::Int(IntLit { pos: pos(7), literal: "2".into(), value: 2 }))),
        };
        let expr = Expr::Infix(Box::new(infix));
        assert_eq!(expr.pos(), pos(5));
    }

    #[test]
    fn infix_formats_with_parens_and_spaces() {
        let expr = Expr::Infix(Box::new(Infix {
            x: Some(Box::new(Expr::Int(IntLit { pos: pos(0), literal: "1".into(), value: 1 }))),
            op_pos: pos(2),
            op: "+".to_string(),
            y: Some(Box::new(Expr::Int(IntLit { pos: pos(4), literal: "2".into(), value: 2 }))),
        }));
        assert_eq!(expr.string(), "(1 + 2)");
    }

    #[test]
    fn pipe_with_empty_exprs_is_nopos() {
        let expr = Expr::Pipe(Pipe { exprs: vec![] });
        assert_eq!(expr.pos(), Position::no_pos());
        assert_eq!(expr.end(), Position::no_pos());
    }

    #[test]
    fn func_with_absent_body_ends_at_rparen_plus_one() {
        let func = Func {
            func_pos: pos(0),
            name: None,
            lparen: pos(8),
            params: vec![],
            defaults: vec![],
            rest_param: None,
            rparen: pos(9),
            body: None,
        };
        assert_eq!(func.end(), pos(10));
    }

    #[test]
    fn bad_expr_has_no_children() {
        let bad = Expr::BadExpr(BadExpr { from: pos(0), to: pos(1) });
        assert!(bad.children().is_empty());
        assert_eq!(bad.string(), "<bad expression>");
    }
}
