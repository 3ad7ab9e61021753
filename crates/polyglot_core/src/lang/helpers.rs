//! The runtime-helper namespace.
//!
//! Generated code for statically-typed targets cannot apply `==`, `+` or `[]` to values of unknown runtime type,
//! so it calls into a small, fixed set of target-side helper functions instead. Each backend ships its own
//! implementation of these helpers; this module only names them.
//!
//! ## Examples
//! ```rust
//! use polyglot_core::lang::helpers::{HelperNaming, RuntimeHelper};
//!
//! let java = HelperNaming { prefix: "Helpers.", case: polyglot_core::lang::helpers::HelperCase::Camel };
//! assert_eq!(java.render(RuntimeHelper::IsEqual), "Helpers.isEqual");
//! ```

use crate::casing::{capitalize, un_camel_case};

/// Stable identifier for every runtime helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeHelper {
    // Coercion
    IsTrue,

    // Comparison
    IsEqual,
    IsGreaterThan,
    IsGreaterThanOrEqual,
    IsLessThan,
    IsLessThanOrEqual,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    OpNeg,

    // Containers
    InOp,
    GetValue,
    AddElementToObject,
    GetArrayLength,
    GetIndexOf,

    // Calls and parameters
    GetArg,
    CallDynamically,

    // String and array helpers without a native equivalent everywhere
    Slice,
    Replace,
    ReplaceAll,
    PadStart,
    PadEnd,
    Concat,
    ToFixed,
    Search,
    PromiseAll,
    ParseJson,
    Stringify,
    IsInteger,
}

/// All runtime helpers, in declaration order.
pub const RUNTIME_HELPERS: &[RuntimeHelper] = &[
    RuntimeHelper::IsTrue,
    RuntimeHelper::IsEqual,
    RuntimeHelper::IsGreaterThan,
    RuntimeHelper::IsGreaterThanOrEqual,
    RuntimeHelper::IsLessThan,
    RuntimeHelper::IsLessThanOrEqual,
    RuntimeHelper::Add,
    RuntimeHelper::Subtract,
    RuntimeHelper::Multiply,
    RuntimeHelper::Divide,
    RuntimeHelper::Mod,
    RuntimeHelper::OpNeg,
    RuntimeHelper::InOp,
    RuntimeHelper::GetValue,
    RuntimeHelper::AddElementToObject,
    RuntimeHelper::GetArrayLength,
    RuntimeHelper::GetIndexOf,
    RuntimeHelper::GetArg,
    RuntimeHelper::CallDynamically,
    RuntimeHelper::Slice,
    RuntimeHelper::Replace,
    RuntimeHelper::ReplaceAll,
    RuntimeHelper::PadStart,
    RuntimeHelper::PadEnd,
    RuntimeHelper::Concat,
    RuntimeHelper::ToFixed,
    RuntimeHelper::Search,
    RuntimeHelper::PromiseAll,
    RuntimeHelper::ParseJson,
    RuntimeHelper::Stringify,
    RuntimeHelper::IsInteger,
];

impl RuntimeHelper {
    /// Canonical (camelCase) helper name.
    pub const fn name(self) -> &'static str {
        match self {
            RuntimeHelper::IsTrue => "isTrue",
            RuntimeHelper::IsEqual => "isEqual",
            RuntimeHelper::IsGreaterThan => "isGreaterThan",
            RuntimeHelper::IsGreaterThanOrEqual => "isGreaterThanOrEqual",
            RuntimeHelper::IsLessThan => "isLessThan",
            RuntimeHelper::IsLessThanOrEqual => "isLessThanOrEqual",
            RuntimeHelper::Add => "add",
            RuntimeHelper::Subtract => "subtract",
            RuntimeHelper::Multiply => "multiply",
            RuntimeHelper::Divide => "divide",
            RuntimeHelper::Mod => "mod",
            RuntimeHelper::OpNeg => "opNeg",
            RuntimeHelper::InOp => "inOp",
            RuntimeHelper::GetValue => "getValue",
            RuntimeHelper::AddElementToObject => "addElementToObject",
            RuntimeHelper::GetArrayLength => "getArrayLength",
            RuntimeHelper::GetIndexOf => "getIndexOf",
            RuntimeHelper::GetArg => "getArg",
            RuntimeHelper::CallDynamically => "callDynamically",
            RuntimeHelper::Slice => "slice",
            RuntimeHelper::Replace => "replace",
            RuntimeHelper::ReplaceAll => "replaceAll",
            RuntimeHelper::PadStart => "padStart",
            RuntimeHelper::PadEnd => "padEnd",
            RuntimeHelper::Concat => "concat",
            RuntimeHelper::ToFixed => "toFixed",
            RuntimeHelper::Search => "search",
            RuntimeHelper::PromiseAll => "promiseAll",
            RuntimeHelper::ParseJson => "parseJson",
            RuntimeHelper::Stringify => "stringify",
            RuntimeHelper::IsInteger => "isInteger",
        }
    }
}

/// Casing convention a backend uses for helper names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperCase {
    /// `isEqual`
    Camel,
    /// `IsEqual` (exported Go functions)
    Pascal,
    /// `is_equal`
    Snake,
}

/// How a backend spells calls into the helper namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelperNaming {
    /// Qualifier prepended to every helper, e.g. `"Helpers."`. Empty for free functions.
    pub prefix: &'static str,
    pub case: HelperCase,
}

impl HelperNaming {
    /// Render the fully-qualified helper name.
    pub fn render(&self, helper: RuntimeHelper) -> String {
        let name = match self.case {
            HelperCase::Camel => helper.name().to_string(),
            HelperCase::Pascal => capitalize(helper.name()),
            HelperCase::Snake => un_camel_case(helper.name()),
        };
        format!("{}{}", self.prefix, name)
    }

    /// Render the opening of a helper call, e.g. `"Helpers.isEqual("`.
    pub fn open(&self, helper: RuntimeHelper) -> String {
        format!("{}(", self.render(helper))
    }
}
