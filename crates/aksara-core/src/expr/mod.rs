//! Safe evaluation of `${...}` placeholders
//!
//! Expressions are parsed with a small pest grammar and interpreted by a
//! whitelist-only tree walker. Supported forms:
//!
//! - `meta.<field>` looks up the directive meta map
//! - number and string literals, `+ - * /`, parentheses
//! - `new Date()`, `new Date(<ms>)`, `new Date('<yyyy-mm-dd>')`, `Date.now()`
//! - `.toLocaleDateString(<locale>?)`, `.toDateString()`, `.toISOString()`,
//!   `.getFullYear()`, `.getMonth()`, `.getDate()` on dates
//! - `.toUpperCase()`, `.toLowerCase()`, `.trim()` on strings
//!
//! Anything else fails to evaluate and the placeholder is left as written.

mod ast;
pub mod locale;

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, SecondsFormat, TimeZone, Utc};
use thiserror::Error;
use tracing::warn;

pub use ast::{BinOp, Expr};

use crate::diagnostics::{codes, Diagnostic};

/// Why an expression could not be evaluated
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("unknown method `{0}`")]
    UnknownMethod(String),

    #[error("a date must be formatted before it can be inserted")]
    BareDate,

    #[error("invalid date")]
    InvalidDate,

    #[error("cannot apply `{op}` to {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
}

impl EvalError {
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::Syntax(msg.into())
    }
}

/// A runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Date(DateTime<FixedOffset>),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "string",
            Value::Date(_) => "date",
        }
    }

    /// The text inserted into the document
    pub fn render(&self) -> Result<String, EvalError> {
        match self {
            Value::Number(n) => Ok(format_number(*n)),
            Value::Text(s) => Ok(s.clone()),
            Value::Date(_) => Err(EvalError::BareDate),
        }
    }
}

/// Print a number the way a browser would
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Inputs available to an expression
#[derive(Debug, Clone)]
pub struct EvalContext<'a> {
    /// Directive meta map
    pub meta: &'a BTreeMap<String, String>,
    /// Wall-clock time for `new Date()` and `Date.now()`
    pub now: DateTime<FixedOffset>,
    /// Locale used when `toLocaleDateString()` has no argument
    pub locale: &'a str,
}

impl<'a> EvalContext<'a> {
    pub fn new(meta: &'a BTreeMap<String, String>, now: DateTime<FixedOffset>, locale: &'a str) -> Self {
        Self { meta, now, locale }
    }
}

/// Evaluator bound to one context
pub struct ExpressionEvaluator<'a> {
    ctx: EvalContext<'a>,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(ctx: EvalContext<'a>) -> Self {
        Self { ctx }
    }

    /// Replace every `${...}` span in `text`
    ///
    /// Spans that fail to evaluate stay as written and record W002. Missing
    /// meta fields insert `[meta.<field> not found]` and record W003.
    pub fn substitute(&self, text: &str, diagnostics: &mut Vec<Diagnostic>) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let body = &rest[start + 2..];

            let Some(end) = find_close(body) else {
                let line = body.lines().next().unwrap_or_default();
                warn!(expression = line, "unterminated placeholder");
                diagnostics.push(
                    Diagnostic::warning(format!("unterminated placeholder `${{{line}`"))
                        .with_code(codes::EXPRESSION)
                        .with_target(line),
                );
                out.push_str("${");
                rest = body;
                continue;
            };

            let source = &body[..end];
            let mut local = Vec::new();
            match self.evaluate(source, &mut local) {
                Ok(value) => {
                    out.push_str(&value);
                    diagnostics.append(&mut local);
                }
                Err(err) => {
                    warn!(expression = source, error = %err, "leaving expression unevaluated");
                    diagnostics.push(
                        Diagnostic::warning(format!("cannot evaluate `${{{source}}}`: {err}"))
                            .with_code(codes::EXPRESSION)
                            .with_target(source),
                    );
                    out.push_str(&rest[start..start + 2 + end + 1]);
                }
            }
            rest = &body[end + 1..];
        }

        out.push_str(rest);
        out
    }

    /// Evaluate one expression source to its inserted text
    pub fn evaluate(&self, source: &str, diagnostics: &mut Vec<Diagnostic>) -> Result<String, EvalError> {
        let expr = Expr::parse(source)?;
        self.eval(&expr, diagnostics)?.render()
    }

    fn eval(&self, expr: &Expr, diagnostics: &mut Vec<Diagnostic>) -> Result<Value, EvalError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Text(s.clone())),
            Expr::Meta(field) => Ok(Value::Text(self.lookup_meta(field, diagnostics))),
            Expr::Now => Ok(Value::Number(self.ctx.now.timestamp_millis() as f64)),
            Expr::NewDate(None) => Ok(Value::Date(self.ctx.now)),
            Expr::NewDate(Some(arg)) => {
                let value = self.eval(arg, diagnostics)?;
                self.to_date(value).map(Value::Date)
            }
            Expr::Neg(inner) => match self.eval(inner, diagnostics)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(EvalError::TypeMismatch {
                    op: "-",
                    lhs: "nothing",
                    rhs: other.type_name(),
                }),
            },
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs, diagnostics)?;
                let rhs = self.eval(rhs, diagnostics)?;
                binary(*op, lhs, rhs)
            }
            Expr::Call { target, method, arg } => {
                let target = self.eval(target, diagnostics)?;
                self.call(target, method, arg.as_deref())
            }
        }
    }

    fn lookup_meta(&self, field: &str, diagnostics: &mut Vec<Diagnostic>) -> String {
        match self.ctx.meta.get(field) {
            Some(value) => value.clone(),
            None => {
                warn!(field, "metadata field not found");
                diagnostics.push(
                    Diagnostic::warning(format!("metadata field `{field}` not found"))
                        .with_code(codes::META_NOT_FOUND)
                        .with_target(field)
                        .with_help(format!("add `{field}: <value>` under `meta:`")),
                );
                format!("[meta.{field} not found]")
            }
        }
    }

    fn to_date(&self, value: Value) -> Result<DateTime<FixedOffset>, EvalError> {
        let offset = *self.ctx.now.offset();
        match value {
            Value::Date(d) => Ok(d),
            Value::Number(ms) if ms.is_finite() => DateTime::<Utc>::from_timestamp_millis(ms as i64)
                .map(|d| d.with_timezone(&offset))
                .ok_or(EvalError::InvalidDate),
            Value::Number(_) => Err(EvalError::InvalidDate),
            Value::Text(s) => {
                if let Ok(d) = DateTime::parse_from_rfc3339(s.trim()) {
                    return Ok(d.with_timezone(&offset));
                }
                let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map_err(|_| EvalError::InvalidDate)?;
                let midnight = date.and_hms_opt(0, 0, 0).ok_or(EvalError::InvalidDate)?;
                offset
                    .from_local_datetime(&midnight)
                    .single()
                    .ok_or(EvalError::InvalidDate)
            }
        }
    }

    fn call(&self, target: Value, method: &str, arg: Option<&str>) -> Result<Value, EvalError> {
        match (target, method) {
            (Value::Date(d), "toLocaleDateString") => {
                let locale = arg.unwrap_or(self.ctx.locale);
                Ok(Value::Text(locale::format_date(&d, locale)))
            }
            (Value::Date(d), "toDateString") => Ok(Value::Text(d.format("%a %b %d %Y").to_string())),
            (Value::Date(d), "toISOString") => Ok(Value::Text(
                d.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            (Value::Date(d), "getFullYear") => Ok(Value::Number(d.year() as f64)),
            (Value::Date(d), "getMonth") => Ok(Value::Number(d.month0() as f64)),
            (Value::Date(d), "getDate") => Ok(Value::Number(d.day() as f64)),
            (Value::Text(s), "toUpperCase") => Ok(Value::Text(s.to_uppercase())),
            (Value::Text(s), "toLowerCase") => Ok(Value::Text(s.to_lowercase())),
            (Value::Text(s), "trim") => Ok(Value::Text(s.trim().to_string())),
            (Value::Number(n), "toString") => Ok(Value::Text(format_number(n))),
            (_, other) => Err(EvalError::UnknownMethod(other.to_string())),
        }
    }
}

fn binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    let symbol = match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
    };

    match (op, lhs, rhs) {
        (BinOp::Add, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (BinOp::Sub, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (BinOp::Mul, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (BinOp::Div, Value::Number(_), Value::Number(b)) if b == 0.0 => Err(EvalError::DivisionByZero),
        (BinOp::Div, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
        (BinOp::Add, lhs @ Value::Text(_), rhs) | (BinOp::Add, lhs, rhs @ Value::Text(_)) => {
            Ok(Value::Text(format!("{}{}", lhs.render()?, rhs.render()?)))
        }
        (_, lhs, rhs) => Err(EvalError::TypeMismatch {
            op: symbol,
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }),
    }
}

/// Byte offset of the `}` closing a placeholder body, skipping quoted text
///
/// Placeholders never span lines.
fn find_close(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        if c == '\n' {
            return None;
        }
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '}' => return Some(i),
            None => {}
        }
    }
    None
}
