//! Expression tree built from the pest parse

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use super::EvalError;

#[derive(Parser)]
#[grammar = "expr/grammar.pest"]
struct ExprParser;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// A parsed `${...}` expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    /// `meta.<field>`
    Meta(String),
    /// `Date.now()`, milliseconds since the epoch
    Now,
    /// `new Date(...)`
    NewDate(Option<Box<Expr>>),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// `<target>.<method>(<arg>?)`
    Call {
        target: Box<Expr>,
        method: String,
        arg: Option<String>,
    },
}

impl Expr {
    /// Parse expression source into a tree
    pub fn parse(source: &str) -> Result<Self, EvalError> {
        let mut pairs = ExprParser::parse(Rule::expression, source)
            .map_err(|e| EvalError::Syntax(e.variant.message().into_owned()))?;
        let root = pairs.next().ok_or_else(|| EvalError::syntax("empty expression"))?;
        build(root)
    }
}

fn first_inner(pair: Pair<'_, Rule>) -> Result<Pair<'_, Rule>, EvalError> {
    pair.into_inner()
        .next()
        .ok_or_else(|| EvalError::syntax("incomplete expression"))
}

fn string_value(pair: Pair<'_, Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|inner| inner.as_str().to_string())
        .unwrap_or_default()
}

fn build(pair: Pair<'_, Rule>) -> Result<Expr, EvalError> {
    match pair.as_rule() {
        Rule::expression => build(first_inner(pair)?),
        Rule::sum | Rule::product => {
            let mut inner = pair.into_inner();
            let first = inner
                .next()
                .ok_or_else(|| EvalError::syntax("missing operand"))?;
            let mut lhs = build(first)?;
            while let Some(op) = inner.next() {
                let op = match op.as_str() {
                    "+" => BinOp::Add,
                    "-" => BinOp::Sub,
                    "*" => BinOp::Mul,
                    _ => BinOp::Div,
                };
                let rhs = inner
                    .next()
                    .ok_or_else(|| EvalError::syntax("missing operand"))?;
                lhs = Expr::Binary(op, Box::new(lhs), Box::new(build(rhs)?));
            }
            Ok(lhs)
        }
        Rule::unary => {
            let mut negations = 0;
            let mut operand = None;
            for child in pair.into_inner() {
                match child.as_rule() {
                    Rule::neg => negations += 1,
                    _ => operand = Some(build(child)?),
                }
            }
            let mut expr = operand.ok_or_else(|| EvalError::syntax("missing operand"))?;
            for _ in 0..negations {
                expr = Expr::Neg(Box::new(expr));
            }
            Ok(expr)
        }
        Rule::postfix => {
            let mut inner = pair.into_inner();
            let primary = inner
                .next()
                .ok_or_else(|| EvalError::syntax("missing operand"))?;
            let mut expr = build(primary)?;
            for call in inner {
                let mut parts = call.into_inner();
                let method = parts
                    .next()
                    .map(|p| p.as_str().to_string())
                    .ok_or_else(|| EvalError::syntax("missing method name"))?;
                let arg = parts.next().map(string_value);
                expr = Expr::Call {
                    target: Box::new(expr),
                    method,
                    arg,
                };
            }
            Ok(expr)
        }
        Rule::new_date => {
            let arg = pair.into_inner().next().map(build).transpose()?;
            Ok(Expr::NewDate(arg.map(Box::new)))
        }
        Rule::date_now => Ok(Expr::Now),
        Rule::meta_path => Ok(Expr::Meta(first_inner(pair)?.as_str().to_string())),
        Rule::number => pair
            .as_str()
            .parse()
            .map(Expr::Number)
            .map_err(|_| EvalError::syntax("invalid number")),
        Rule::string => Ok(Expr::Str(string_value(pair))),
        other => Err(EvalError::Syntax(format!("unexpected {:?}", other))),
    }
}
