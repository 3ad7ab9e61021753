//! Operator vocabulary of the source language.
//!
//! Each operator id knows its source spelling, its category, and (for binary operators) the runtime helper that
//! backends without value-polymorphic operators lower it to.
//!
//! ## Notes
//! - Lookup via [`BinaryOp::from_str`] is **case-sensitive** and exact.
//! - Serialized ASTs use the source spelling (`"+"`, `"!=="`), so the serde names match [`BinaryOp::as_str`].
//!
//! ## Examples
//! ```rust
//! use polyglot_core::lang::operators::{BinaryOp, OperatorCategory};
//!
//! assert_eq!(BinaryOp::from_str("!=="), Some(BinaryOp::StrictNotEquals));
//! assert_eq!(BinaryOp::StrictNotEquals.category(), OperatorCategory::Equality);
//! ```

use serde::{Deserialize, Serialize};

use super::helpers::RuntimeHelper;

/// Broad grouping used by lowering decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    Assignment,
    Arithmetic,
    Relational,
    Equality,
    Logical,
    Membership,
}

/// Stable identifier for every binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Assignment
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    PlusAssign,
    #[serde(rename = "-=")]
    MinusAssign,

    // Arithmetic
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Modulo,

    // Equality
    #[serde(rename = "==")]
    EqualsEquals,
    #[serde(rename = "===")]
    StrictEquals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "!==")]
    StrictNotEquals,

    // Relational
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanEquals,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanEquals,

    // Logical
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,

    // Membership / type tests
    #[serde(rename = "in")]
    In,
    #[serde(rename = "instanceof")]
    InstanceOf,
}

/// All binary operators, in declaration order.
pub const BINARY_OPERATORS: &[BinaryOp] = &[
    BinaryOp::Assign,
    BinaryOp::PlusAssign,
    BinaryOp::MinusAssign,
    BinaryOp::Plus,
    BinaryOp::Minus,
    BinaryOp::Multiply,
    BinaryOp::Divide,
    BinaryOp::Modulo,
    BinaryOp::EqualsEquals,
    BinaryOp::StrictEquals,
    BinaryOp::NotEquals,
    BinaryOp::StrictNotEquals,
    BinaryOp::LessThan,
    BinaryOp::LessThanEquals,
    BinaryOp::GreaterThan,
    BinaryOp::GreaterThanEquals,
    BinaryOp::And,
    BinaryOp::Or,
    BinaryOp::In,
    BinaryOp::InstanceOf,
];

impl BinaryOp {
    /// Return the source spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::PlusAssign => "+=",
            BinaryOp::MinusAssign => "-=",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::EqualsEquals => "==",
            BinaryOp::StrictEquals => "===",
            BinaryOp::NotEquals => "!=",
            BinaryOp::StrictNotEquals => "!==",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanEquals => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanEquals => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        }
    }

    /// Resolve a source spelling to an operator id.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(spelling: &str) -> Option<Self> {
        BINARY_OPERATORS.iter().copied().find(|op| op.as_str() == spelling)
    }

    pub const fn category(self) -> OperatorCategory {
        match self {
            BinaryOp::Assign | BinaryOp::PlusAssign | BinaryOp::MinusAssign => OperatorCategory::Assignment,
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => {
                OperatorCategory::Arithmetic
            }
            BinaryOp::EqualsEquals | BinaryOp::StrictEquals | BinaryOp::NotEquals | BinaryOp::StrictNotEquals => {
                OperatorCategory::Equality
            }
            BinaryOp::LessThan | BinaryOp::LessThanEquals | BinaryOp::GreaterThan | BinaryOp::GreaterThanEquals => {
                OperatorCategory::Relational
            }
            BinaryOp::And | BinaryOp::Or => OperatorCategory::Logical,
            BinaryOp::In | BinaryOp::InstanceOf => OperatorCategory::Membership,
        }
    }

    /// Check whether the operator writes to its left operand.
    pub const fn is_assignment(self) -> bool {
        matches!(self.category(), OperatorCategory::Assignment)
    }

    /// Check whether the operator is an equality test (strict or loose).
    pub const fn is_equality(self) -> bool {
        matches!(self.category(), OperatorCategory::Equality)
    }

    /// Check whether the operator is a negated equality test (`!=` or `!==`).
    pub const fn is_negated_equality(self) -> bool {
        matches!(self, BinaryOp::NotEquals | BinaryOp::StrictNotEquals)
    }

    /// For compound assignments, return the arithmetic operator they apply (`+=` → `+`).
    pub const fn compound_base(self) -> Option<BinaryOp> {
        match self {
            BinaryOp::PlusAssign => Some(BinaryOp::Plus),
            BinaryOp::MinusAssign => Some(BinaryOp::Minus),
            _ => None,
        }
    }

    /// Return the runtime helper used when the backend cannot apply this operator to dynamic values.
    ///
    /// ## Notes
    /// - Loose and strict equality share `isEqual`; the negated forms share it too and are printed with a leading
    ///   negation, so `a != b` and `a !== b` always lower to the same call shape.
    /// - Logical operators, plain assignment and `instanceof` have no helper.
    pub const fn helper(self) -> Option<RuntimeHelper> {
        match self {
            BinaryOp::Plus | BinaryOp::PlusAssign => Some(RuntimeHelper::Add),
            BinaryOp::Minus | BinaryOp::MinusAssign => Some(RuntimeHelper::Subtract),
            BinaryOp::Multiply => Some(RuntimeHelper::Multiply),
            BinaryOp::Divide => Some(RuntimeHelper::Divide),
            BinaryOp::Modulo => Some(RuntimeHelper::Mod),
            BinaryOp::EqualsEquals | BinaryOp::StrictEquals | BinaryOp::NotEquals | BinaryOp::StrictNotEquals => {
                Some(RuntimeHelper::IsEqual)
            }
            BinaryOp::LessThan => Some(RuntimeHelper::IsLessThan),
            BinaryOp::LessThanEquals => Some(RuntimeHelper::IsLessThanOrEqual),
            BinaryOp::GreaterThan => Some(RuntimeHelper::IsGreaterThan),
            BinaryOp::GreaterThanEquals => Some(RuntimeHelper::IsGreaterThanOrEqual),
            BinaryOp::In => Some(RuntimeHelper::InOp),
            BinaryOp::Assign | BinaryOp::And | BinaryOp::Or | BinaryOp::InstanceOf => None,
        }
    }
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefixOp {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "-")]
    Negate,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

impl PrefixOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Negate => "-",
            PrefixOp::Plus => "+",
            PrefixOp::Increment => "++",
            PrefixOp::Decrement => "--",
        }
    }

    /// Check whether the operator writes to its operand.
    pub const fn is_update(self) -> bool {
        matches!(self, PrefixOp::Increment | PrefixOp::Decrement)
    }
}

/// Postfix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostfixOp {
    #[serde(rename = "++")]
    Increment,
    #[serde(rename = "--")]
    Decrement,
}

impl PostfixOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings_round_trip() {
        for &op in BINARY_OPERATORS {
            assert_eq!(BinaryOp::from_str(op.as_str()), Some(op));
        }
        assert_eq!(BinaryOp::from_str("**"), None);
    }

    #[test]
    fn negated_equalities_share_helper() {
        assert_eq!(BinaryOp::NotEquals.helper(), BinaryOp::StrictNotEquals.helper());
        assert!(BinaryOp::NotEquals.is_negated_equality());
        assert!(BinaryOp::StrictNotEquals.is_negated_equality());
        assert!(!BinaryOp::StrictEquals.is_negated_equality());
    }

    #[test]
    fn compound_assignments_expose_their_base() {
        assert_eq!(BinaryOp::PlusAssign.compound_base(), Some(BinaryOp::Plus));
        assert_eq!(BinaryOp::MinusAssign.compound_base(), Some(BinaryOp::Minus));
        assert_eq!(BinaryOp::Assign.compound_base(), None);
        assert!(BinaryOp::PlusAssign.is_assignment());
    }
}
