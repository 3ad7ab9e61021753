//! Registry of well-known built-in calls.
//!
//! Built-in calls are recognized by the literal shape of their callee (`JSON.parse`, `arr.push`, `parseInt`) and
//! by argument count, then rewritten by each backend to a native equivalent or to a runtime helper. The set is
//! closed: a new built-in needs a new [`BuiltinCall`] variant, which every backend's exhaustive `match` must
//! then handle.
//!
//! ## Notes
//! - Static entries (`receiver: Some(..)`) match only when the callee receiver is that exact identifier.
//! - Method entries (`receiver: None`) match any receiver expression.
//! - Static entries take precedence, so `Math.abs(x)` never matches a hypothetical `abs` method entry.
//!
//! ## Examples
//! ```rust
//! use polyglot_core::lang::builtins::{classify, BuiltinCall, CallShape};
//!
//! let shape = CallShape::Member { receiver: Some("JSON"), member: "parse" };
//! assert_eq!(classify(shape, 1), Some(BuiltinCall::JsonParse));
//! assert_eq!(classify(shape, 2), None);
//! ```

/// Stable identifier for every recognized built-in call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCall {
    // Static, fixed receiver
    DateNow,
    JsonParse,
    JsonStringify,
    ArrayIsArray,
    ObjectKeys,
    ObjectValues,
    PromiseAll,
    MathRound,
    MathFloor,
    MathCeil,
    MathAbs,
    MathMin,
    MathMax,
    MathPow,
    NumberIsInteger,

    // Free functions
    ParseInt,
    ParseFloat,

    // Receiver methods without arguments
    ToString,
    ToUpperCase,
    ToLowerCase,
    Shift,
    Pop,
    Reverse,
    Trim,

    // Receiver methods with arguments
    Push,
    Includes,
    IndexOf,
    Join,
    Split,
    ToFixed,
    Concat,
    Search,
    EndsWith,
    StartsWith,
    PadEnd,
    PadStart,
    Slice,
    Replace,
    ReplaceAll,
}

/// Accepted argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub const fn accepts(self, argc: usize) -> bool {
        match self {
            Arity::Exact(n) => argc == n,
            Arity::Range(lo, hi) => argc >= lo && argc <= hi,
            Arity::AtLeast(n) => argc >= n,
        }
    }
}

/// Metadata for a built-in call.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinCallInfo {
    pub id: BuiltinCall,
    /// Fixed receiver identifier, or `None` for methods on any receiver (and for free functions, see `free`).
    pub receiver: Option<&'static str>,
    pub member: &'static str,
    /// Called without a receiver (`parseInt(x)`).
    pub free: bool,
    pub arity: Arity,
    pub description: &'static str,
}

const fn stat(
    id: BuiltinCall,
    receiver: &'static str,
    member: &'static str,
    arity: Arity,
    description: &'static str,
) -> BuiltinCallInfo {
    BuiltinCallInfo {
        id,
        receiver: Some(receiver),
        member,
        free: false,
        arity,
        description,
    }
}

const fn method(id: BuiltinCall, member: &'static str, arity: Arity, description: &'static str) -> BuiltinCallInfo {
    BuiltinCallInfo {
        id,
        receiver: None,
        member,
        free: false,
        arity,
        description,
    }
}

const fn free(id: BuiltinCall, member: &'static str, arity: Arity, description: &'static str) -> BuiltinCallInfo {
    BuiltinCallInfo {
        id,
        receiver: None,
        member,
        free: true,
        arity,
        description,
    }
}

/// Registry of all recognized built-in calls.
pub const BUILTIN_CALLS: &[BuiltinCallInfo] = &[
    stat(BuiltinCall::DateNow, "Date", "now", Arity::Exact(0), "Milliseconds since the epoch."),
    stat(BuiltinCall::JsonParse, "JSON", "parse", Arity::Exact(1), "Parse JSON text."),
    stat(BuiltinCall::JsonStringify, "JSON", "stringify", Arity::Exact(1), "Serialize a value to JSON."),
    stat(BuiltinCall::ArrayIsArray, "Array", "isArray", Arity::Exact(1), "Check for a list value."),
    stat(BuiltinCall::ObjectKeys, "Object", "keys", Arity::Exact(1), "Keys of a dictionary."),
    stat(BuiltinCall::ObjectValues, "Object", "values", Arity::Exact(1), "Values of a dictionary."),
    stat(BuiltinCall::PromiseAll, "Promise", "all", Arity::Exact(1), "Await a list of futures."),
    stat(BuiltinCall::MathRound, "Math", "round", Arity::Exact(1), "Round to nearest integer."),
    stat(BuiltinCall::MathFloor, "Math", "floor", Arity::Exact(1), "Round down."),
    stat(BuiltinCall::MathCeil, "Math", "ceil", Arity::Exact(1), "Round up."),
    stat(BuiltinCall::MathAbs, "Math", "abs", Arity::Exact(1), "Absolute value."),
    stat(BuiltinCall::MathMin, "Math", "min", Arity::Exact(2), "Smaller of two numbers."),
    stat(BuiltinCall::MathMax, "Math", "max", Arity::Exact(2), "Larger of two numbers."),
    stat(BuiltinCall::MathPow, "Math", "pow", Arity::Exact(2), "Exponentiation."),
    stat(BuiltinCall::NumberIsInteger, "Number", "isInteger", Arity::Exact(1), "Check for an integral number."),
    free(BuiltinCall::ParseInt, "parseInt", Arity::Exact(1), "Parse an integer from text."),
    free(BuiltinCall::ParseFloat, "parseFloat", Arity::Exact(1), "Parse a float from text."),
    method(BuiltinCall::ToString, "toString", Arity::Exact(0), "String conversion."),
    method(BuiltinCall::ToUpperCase, "toUpperCase", Arity::Exact(0), "Upper-case a string."),
    method(BuiltinCall::ToLowerCase, "toLowerCase", Arity::Exact(0), "Lower-case a string."),
    method(BuiltinCall::Shift, "shift", Arity::Exact(0), "Remove and return the first element."),
    method(BuiltinCall::Pop, "pop", Arity::Exact(0), "Remove and return the last element."),
    method(BuiltinCall::Reverse, "reverse", Arity::Exact(0), "Reverse a list in place."),
    method(BuiltinCall::Trim, "trim", Arity::Exact(0), "Strip surrounding whitespace."),
    method(BuiltinCall::Push, "push", Arity::AtLeast(1), "Append to a list."),
    method(BuiltinCall::Includes, "includes", Arity::AtLeast(1), "Membership in a list or string."),
    method(BuiltinCall::IndexOf, "indexOf", Arity::AtLeast(1), "Position of an element or substring."),
    method(BuiltinCall::Join, "join", Arity::AtLeast(1), "Join list elements with a separator."),
    method(BuiltinCall::Split, "split", Arity::AtLeast(1), "Split a string by a separator."),
    method(BuiltinCall::ToFixed, "toFixed", Arity::AtLeast(1), "Format a number with fixed decimals."),
    method(BuiltinCall::Concat, "concat", Arity::AtLeast(1), "Concatenate lists."),
    method(BuiltinCall::Search, "search", Arity::AtLeast(1), "Position of a pattern in a string."),
    method(BuiltinCall::EndsWith, "endsWith", Arity::AtLeast(1), "Suffix test."),
    method(BuiltinCall::StartsWith, "startsWith", Arity::AtLeast(1), "Prefix test."),
    method(BuiltinCall::PadEnd, "padEnd", Arity::AtLeast(1), "Right-pad a string."),
    method(BuiltinCall::PadStart, "padStart", Arity::AtLeast(1), "Left-pad a string."),
    method(BuiltinCall::Slice, "slice", Arity::Range(1, 2), "Sub-list or substring."),
    method(BuiltinCall::Replace, "replace", Arity::Range(1, 2), "Replace the first occurrence."),
    method(BuiltinCall::ReplaceAll, "replaceAll", Arity::Range(1, 2), "Replace every occurrence."),
];

/// Global namespaces whose members are expected to be built-ins.
///
/// A call on one of these receivers that matches no registry entry is reported as unrecognized.
pub const WELL_KNOWN_NAMESPACES: &[&str] = &["JSON", "Math", "Object", "Array", "Promise", "Date", "Number", "String"];

/// Literal shape of a call's callee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape<'a> {
    /// `name(...)`
    Free(&'a str),
    /// `receiver.member(...)`; `receiver` is `Some` only when it is a plain identifier.
    Member { receiver: Option<&'a str>, member: &'a str },
}

/// Return the registry entry for an id.
pub fn info_for(id: BuiltinCall) -> Option<&'static BuiltinCallInfo> {
    BUILTIN_CALLS.iter().find(|info| info.id == id)
}

/// Classify a call by callee shape and argument count.
pub fn classify(shape: CallShape<'_>, argc: usize) -> Option<BuiltinCall> {
    match shape {
        CallShape::Free(name) => BUILTIN_CALLS
            .iter()
            .find(|info| info.free && info.member == name && info.arity.accepts(argc))
            .map(|info| info.id),
        CallShape::Member { receiver, member } => {
            if let Some(receiver) = receiver {
                let fixed = BUILTIN_CALLS.iter().find(|info| {
                    info.receiver == Some(receiver) && info.member == member && info.arity.accepts(argc)
                });
                if let Some(info) = fixed {
                    return Some(info.id);
                }
                if is_well_known_namespace(receiver) {
                    return None;
                }
            }
            BUILTIN_CALLS
                .iter()
                .find(|info| info.receiver.is_none() && !info.free && info.member == member && info.arity.accepts(argc))
                .map(|info| info.id)
        }
    }
}

/// Check whether `name` is one of the global built-in namespaces.
pub fn is_well_known_namespace(name: &str) -> bool {
    WELL_KNOWN_NAMESPACES.contains(&name)
}
