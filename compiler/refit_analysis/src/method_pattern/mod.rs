//! Method signature patterns.
//!
//! A pattern names a declaring type, a method, and an argument list:
//!
//! ```text
//! java.util.Objects requireNonNull(..)
//! java.lang.String charAt(int)
//! * toString()
//! ```
//!
//! - `*` as the declaring type or method name matches anything.
//! - `(..)` matches any argument list; `()` only the empty one.
//! - Otherwise arguments are comma-separated types, each possibly `*`.
//!
//! Declaring types match exactly. Overriding methods declared on subtypes
//! are not matched unless listed explicitly.

use std::fmt;

use refit_ir::{MethodSig, Name, Node, NodeKind, Type};

use crate::PatternError;

#[derive(Clone, Debug, PartialEq, Eq)]
enum ArgPattern {
    Any,
    Exact(Vec<Option<Type>>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodPattern {
    source: String,
    declaring_type: Option<Name>,
    method: Option<Name>,
    args: ArgPattern,
}

impl MethodPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let text = pattern.trim();
        let open = text
            .find('(')
            .ok_or_else(|| PatternError::MissingArguments(pattern.to_string()))?;
        let inner = text[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| PatternError::MissingArguments(pattern.to_string()))?;

        let mut head = text[..open].split_whitespace();
        let (Some(ty), Some(method), None) = (head.next(), head.next(), head.next()) else {
            return Err(PatternError::MissingParts(pattern.to_string()));
        };

        Ok(MethodPattern {
            source: text.to_string(),
            declaring_type: wildcard(ty),
            method: wildcard(method),
            args: parse_args(pattern, inner)?,
        })
    }

    /// Whether a resolved signature matches.
    pub fn matches(&self, sig: &MethodSig) -> bool {
        self.declaring_type
            .as_ref()
            .is_none_or(|ty| *ty == sig.declaring_type)
            && self.matches_name(&sig.name)
            && self.matches_arity_and_types(&sig.param_types)
    }

    /// Whether a call node matches.
    ///
    /// Resolved calls are matched on their signature. Unresolved calls fall
    /// back to the method name, the argument count, and a receiver spelled
    /// as the simple name of the declaring type (`Objects.requireNonNull`).
    pub fn matches_call(&self, call: &Node) -> bool {
        let NodeKind::MethodCall {
            receiver,
            name,
            args,
            method,
        } = call.kind()
        else {
            return false;
        };
        if let Some(sig) = method {
            return self.matches(sig);
        }
        let receiver_ok = match (&self.declaring_type, receiver) {
            (None, _) => true,
            (Some(ty), Some(receiver)) => receiver
                .as_ident()
                .is_some_and(|r| r.as_str() == ty.simple() || *r == *ty),
            (Some(_), None) => false,
        };
        let arity_ok = match &self.args {
            ArgPattern::Any => true,
            ArgPattern::Exact(types) => types.len() == args.len(),
        };
        receiver_ok && self.matches_name(name) && arity_ok
    }

    fn matches_name(&self, name: &Name) -> bool {
        self.method.as_ref().is_none_or(|m| m == name)
    }

    fn matches_arity_and_types(&self, params: &[Type]) -> bool {
        match &self.args {
            ArgPattern::Any => true,
            ArgPattern::Exact(expected) => {
                expected.len() == params.len()
                    && expected
                        .iter()
                        .zip(params)
                        .all(|(want, have)| want.as_ref().is_none_or(|w| w == have))
            }
        }
    }
}

impl fmt::Display for MethodPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn wildcard(text: &str) -> Option<Name> {
    (text != "*").then(|| Name::new(text))
}

fn parse_args(pattern: &str, inner: &str) -> Result<ArgPattern, PatternError> {
    let inner = inner.trim();
    if inner == ".." {
        return Ok(ArgPattern::Any);
    }
    if inner.is_empty() {
        return Ok(ArgPattern::Exact(Vec::new()));
    }
    let mut types = Vec::new();
    for part in inner.split(',') {
        let part = part.trim();
        match part {
            "" => {
                return Err(PatternError::BadArguments {
                    pattern: pattern.to_string(),
                    reason: "empty argument type",
                })
            }
            ".." => {
                return Err(PatternError::BadArguments {
                    pattern: pattern.to_string(),
                    reason: "`..` must be the only argument",
                })
            }
            "*" => types.push(None),
            _ => types.push(Some(Type::parse(part))),
        }
    }
    Ok(ArgPattern::Exact(types))
}
