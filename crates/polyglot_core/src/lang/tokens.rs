//! Configuration token vocabulary.
//!
//! A backend's Configuration Table is a flat mapping from these logical token names to literal strings. The
//! defaults below spell the source language itself, so an unconfigured table prints source-like text. Backends
//! override the subset they need, and users may override any token by its configuration key.
//!
//! ## Notes
//! - Keys are the SCREAMING_CASE names accepted in user options (`"BLOCK_OPENING_TOKEN"`).
//! - Some tokens are templates with `{placeholder}` slots (`CATCH_CLAUSE`, `OPTIONAL_ARG_ACCESSOR`, ...). The
//!   placeholders each template understands are listed on the variant.
//! - Empty strings are meaningful: an empty wrapper means "no helper, print natively".
//!
//! ## Examples
//! ```rust
//! use polyglot_core::lang::tokens::Token;
//!
//! assert_eq!(Token::from_key("BLOCK_OPENING_TOKEN"), Some(Token::BlockOpen));
//! assert_eq!(Token::BlockOpen.default_text(), "{");
//! ```

use super::operators::BinaryOp;

macro_rules! define_tokens {
    ($( $(#[$doc:meta])* $variant:ident => $key:literal, $default:literal; )*) => {
        /// Logical token names understood by every backend.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Token {
            $( $(#[$doc])* $variant, )*
        }

        /// All tokens, in declaration order.
        pub const TOKENS: &[Token] = &[ $( Token::$variant, )* ];

        impl Token {
            /// Configuration key used in user option overrides.
            pub const fn key(self) -> &'static str {
                match self {
                    $( Token::$variant => $key, )*
                }
            }

            /// Source-like default spelling.
            pub const fn default_text(self) -> &'static str {
                match self {
                    $( Token::$variant => $default, )*
                }
            }
        }
    };
}

define_tokens! {
    // ---- Layout ----
    BlockOpen => "BLOCK_OPENING_TOKEN", "{";
    /// Empty for indentation-scoped targets; the block then ends with its last statement.
    BlockClose => "BLOCK_CLOSING_TOKEN", "}";
    SpaceBeforeBlockOpen => "SPACE_BEFORE_BLOCK_OPENING", " ";
    /// Statement printed in an otherwise empty block (`pass`).
    EmptyBlockBody => "EMPTY_BLOCK_BODY", "";
    Indent => "DEFAULT_IDENTATION", "    ";
    LineTerminator => "LINE_TERMINATOR", ";";
    LineComment => "LINE_COMMENT", "//";
    ConditionOpen => "CONDITION_OPENING", "(";
    ConditionClose => "CONDITION_CLOSE", ")";

    // ---- Control flow ----
    If => "IF_TOKEN", "if";
    Else => "ELSE_TOKEN", "else";
    ElseIf => "ELSEIF_TOKEN", "else if";
    While => "WHILE_TOKEN", "while";
    /// Replacement for `while (true)`; empty keeps the condition.
    InfiniteLoop => "INFINITE_LOOP_TOKEN", "";
    For => "FOR_TOKEN", "for";
    ForInitKeyword => "FOR_INIT_KEYWORD", "let ";
    ForInitAssign => "FOR_INIT_ASSIGN", " = ";
    Break => "BREAK_TOKEN", "break";
    Continue => "CONTINUE_TOKEN", "continue";
    Return => "RETURN_TOKEN", "return";
    ThrowOpen => "THROW_TOKEN", "throw ";
    ThrowClose => "THROW_CLOSE", "";
    Try => "TRY_TOKEN", "try";
    /// Placeholders: `{name}`.
    CatchClause => "CATCH_CLAUSE", "catch ({name})";
    Finally => "FINALLY_TOKEN", "finally";

    // ---- Expressions ----
    New => "NEW_TOKEN", "new ";
    /// Appended to the class name of a `new` expression (`::new`).
    NewCallSuffix => "NEW_CALL_SUFFIX", "";
    This => "THIS_TOKEN", "this";
    Super => "SUPER_TOKEN", "super";
    SuperAccess => "SUPER_ACCESS_TOKEN", ".";
    SuperCallOpen => "SUPER_CALL_OPEN", "super(";
    PropertyAccess => "PROPERTY_ACCESS_TOKEN", ".";
    /// Prefix for variable references (`$`).
    VariablePrefix => "VARIABLE_PREFIX", "";
    Null => "NULL_TOKEN", "null";
    Undefined => "UNDEFINED_TOKEN", "undefined";
    True => "TRUE_KEYWORD", "true";
    False => "FALSE_KEYWORD", "false";
    Not => "NOT_TOKEN", "!";
    And => "AND_TOKEN", "&&";
    Or => "OR_TOKEN", "||";
    Assign => "EQUALS_TOKEN", "=";
    PlusAssign => "PLUS_EQUALS_TOKEN", "+=";
    MinusAssign => "MINUS_EQUALS_TOKEN", "-=";
    Plus => "PLUS_TOKEN", "+";
    Minus => "MINUS_TOKEN", "-";
    Multiply => "ASTERISK_TOKEN", "*";
    Divide => "SLASH_TOKEN", "/";
    Modulo => "PERCENT_TOKEN", "%";
    EqualsEquals => "EQUALS_EQUALS_TOKEN", "==";
    StrictEquals => "EQUALS_EQUALS_EQUALS_TOKEN", "===";
    NotEquals => "NOT_EQUALS_TOKEN", "!=";
    StrictNotEquals => "DIFFERENT_TOKEN", "!==";
    LessThan => "LESS_THAN_TOKEN", "<";
    LessThanEquals => "LESS_THAN_EQUALS_TOKEN", "<=";
    GreaterThan => "GREATER_THAN_TOKEN", ">";
    GreaterThanEquals => "GREATER_THAN_EQUALS_TOKEN", ">=";
    In => "IN_TOKEN", "in";
    Increment => "PLUS_PLUS_TOKEN", "++";
    Decrement => "MINUS_MINUS_TOKEN", "--";
    /// String concatenation operator when it differs from `+`.
    StringConcat => "STRING_CONCAT_TOKEN", "";
    InstanceOfOpen => "INSTANCEOF_OPEN", "";
    InstanceOf => "INSTANCEOF_TOKEN", " instanceof ";
    InstanceOfClose => "INSTANCEOF_CLOSE", "";
    /// Placeholders: `{cond}`, `{then}`, `{else}`.
    ConditionalTemplate => "CONDITIONAL_TEMPLATE", "{cond} ? {then} : {else}";
    /// Placeholders: `{type}`, `{expr}`. Empty passes the expression through.
    CastTemplate => "CAST_TEMPLATE", "";
    /// Placeholders: `{object}`, `{key}`. Empty means `delete` is unsupported.
    DeleteTemplate => "DELETE_TEMPLATE", "";
    /// Placeholders: `{expr}`. Empty means a standalone `typeof` is unsupported.
    TypeOfTemplate => "TYPEOF_TEMPLATE", "";
    SpreadOpen => "SPREAD_OPEN", "";
    SpreadClose => "SPREAD_CLOSE", "";
    AwaitOpen => "AWAIT_TOKEN", "await ";
    AwaitClose => "AWAIT_CLOSE", "";
    LambdaOpen => "LAMBDA_OPEN", "(";
    LambdaClose => "LAMBDA_CLOSE", ")";
    LambdaArrow => "LAMBDA_ARROW", " => ";

    // ---- Declarations ----
    VarKeyword => "VAR_TOKEN", "let";
    ConstKeyword => "CONST_TOKEN", "const";
    /// Declaration keyword used when the initializer is a `new` expression (`var`).
    InferredVarKeyword => "NEW_INFERRED_VAR_TOKEN", "";
    /// Modifiers printed before free functions (`public static`).
    FunctionModifier => "FUNCTION_MODIFIER", "";
    FunctionKeyword => "FUNCTION_TOKEN", "function";
    MethodKeyword => "METHOD_TOKEN", "";
    MethodAccess => "METHOD_DEFAULT_ACCESS", "public";
    PropertyAccessModifier => "PROPERTY_DEFAULT_ACCESS", "public";
    Private => "PRIVATE_KEYWORD", "private";
    Protected => "PROTECTED_KEYWORD", "protected";
    Static => "STATIC_TOKEN", "static";
    Async => "ASYNC_TOKEN", "async";
    Class => "CLASS_TOKEN", "class";
    ExtendsOpen => "EXTENDS_TOKEN", " extends ";
    ExtendsClose => "EXTENDS_CLOSE", "";
    /// Placeholders: `{class}`.
    ConstructorName => "CONSTRUCTOR_TOKEN", "constructor";
    /// Receiver parameter printed first in instance methods (`self`, `&self`).
    SelfParam => "SELF_PARAM", "";
    ParamTypeSeparator => "PARAM_TYPE_SEPARATOR", ": ";
    ReturnTypeSeparator => "RETURN_TYPE_SEPARATOR", ": ";

    // ---- Async lowering ----
    AsyncBodyOpen => "ASYNC_BODY_OPEN", "";
    AsyncBodyEpilogue => "ASYNC_BODY_EPILOGUE", "";
    AsyncBodyClose => "ASYNC_BODY_CLOSE", "";
    /// Placeholders: `{alias}`, `{name}`.
    CaptureAlias => "CAPTURE_ALIAS_DECLARATION", "const {alias} = {name};";
    /// Placeholders: `{name}`, `{alias}`.
    ParamRebind => "PARAM_REBIND", "let {name} = {alias};";

    // ---- Default parameters ----
    OptionalArgsParam => "OPTIONAL_ARGS_PARAM", "...optionalArgs";
    /// Placeholders: `{name}`, `{index}`, `{default}`.
    OptionalArgAccessor => "OPTIONAL_ARG_ACCESSOR", "let {name} = getArg(optionalArgs, {index}, {default});";
    DefaultValueSeparator => "DEFAULT_VALUE_SEPARATOR", " = ";
    /// Placeholders: `{name}`, `{default}`. Empty keeps non-constant defaults inline.
    NonConstantDefaultPrologue => "NON_CONSTANT_DEFAULT_PROLOGUE", "";

    // ---- Types ----
    /// Empty omits the annotation entirely.
    DefaultType => "DEFAULT_TYPE", "any";
    DefaultParameterType => "DEFAULT_PARAMETER_TYPE", "any";
    DefaultReturnType => "DEFAULT_RETURN_TYPE", "any";
    VoidKeyword => "VOID_KEYWORD", "void";
    StringKeyword => "STRING_KEYWORD", "string";
    BooleanKeyword => "BOOLEAN_KEYWORD", "boolean";
    IntegerKeyword => "INT_KEYWORD", "number";
    LongKeyword => "LONG_KEYWORD", "number";
    FloatKeyword => "NUMBER_KEYWORD", "number";
    ArrayKeyword => "ARRAY_KEYWORD", "any[]";
    ObjectKeyword => "OBJECT_KEYWORD", "object";
    PromiseOpen => "PROMISE_TYPE_OPEN", "Promise<";
    PromiseClose => "PROMISE_TYPE_CLOSE", ">";
    PromiseVoid => "PROMISE_VOID_TYPE", "Promise<void>";
    LongLiteralSuffix => "LONG_LITERAL_SUFFIX", "";

    // ---- Literals ----
    StringQuote => "STRING_QUOTE_TOKEN", "\"";
    ObjectOpen => "OBJECT_OPENING", "{";
    ObjectClose => "OBJECT_CLOSING", "}";
    PropertyAssignmentOpen => "PROPERTY_ASSIGNMENT_OPEN", "";
    PropertyAssignment => "PROPERTY_ASSIGNMENT_TOKEN", ": ";
    PropertyAssignmentClose => "PROPERTY_ASSIGNMENT_CLOSE", "";
    PropertySeparator => "PROPERTY_SEPARATOR", ",";
    ArrayOpen => "ARRAY_OPENING_TOKEN", "[";
    ArrayClose => "ARRAY_CLOSING_TOKEN", "]";

    // ---- Helper wrappers ----
    FalsyWrapperOpen => "FALSY_WRAPPER_OPEN", "";
    FalsyWrapperClose => "FALSY_WRAPPER_CLOSE", "";
    ElementGetOpen => "ELEMENT_ACCESS_WRAPPER_OPEN", "";
    ElementGetClose => "ELEMENT_ACCESS_WRAPPER_CLOSE", "";
    ElementSetOpen => "ELEMENT_SET_WRAPPER_OPEN", "";
    ElementSetClose => "ELEMENT_SET_WRAPPER_CLOSE", "";
    ElementAssignCastOpen => "ELEMENT_ASSIGN_CAST_OPEN", "";
    ElementAssignCastClose => "ELEMENT_ASSIGN_CAST_CLOSE", "";
    ArrayLengthOpen => "ARRAY_LENGTH_WRAPPER_OPEN", "";
    ArrayLengthClose => "ARRAY_LENGTH_WRAPPER_CLOSE", "";
    StringLengthOpen => "STRING_LENGTH_WRAPPER_OPEN", "";
    StringLengthClose => "STRING_LENGTH_WRAPPER_CLOSE", "";
    EqualsWrapperOpen => "EQUALS_EQUALS_WRAPPER_OPEN", "";
    EqualsWrapperClose => "EQUALS_EQUALS_WRAPPER_CLOSE", "";
    DifferentWrapperOpen => "DIFFERENT_WRAPPER_OPEN", "";
    DifferentWrapperClose => "DIFFERENT_WRAPPER_CLOSE", "";
    GreaterThanWrapperOpen => "GREATER_THAN_WRAPPER_OPEN", "";
    GreaterThanWrapperClose => "GREATER_THAN_WRAPPER_CLOSE", "";
    GreaterThanEqualsWrapperOpen => "GREATER_THAN_EQUALS_WRAPPER_OPEN", "";
    GreaterThanEqualsWrapperClose => "GREATER_THAN_EQUALS_WRAPPER_CLOSE", "";
    LessThanWrapperOpen => "LESS_THAN_WRAPPER_OPEN", "";
    LessThanWrapperClose => "LESS_THAN_WRAPPER_CLOSE", "";
    LessThanEqualsWrapperOpen => "LESS_THAN_EQUALS_WRAPPER_OPEN", "";
    LessThanEqualsWrapperClose => "LESS_THAN_EQUALS_WRAPPER_CLOSE", "";
    PlusWrapperOpen => "PLUS_WRAPPER_OPEN", "";
    PlusWrapperClose => "PLUS_WRAPPER_CLOSE", "";
    MinusWrapperOpen => "MINUS_WRAPPER_OPEN", "";
    MinusWrapperClose => "MINUS_WRAPPER_CLOSE", "";
    MultiplyWrapperOpen => "MULTIPLY_WRAPPER_OPEN", "";
    MultiplyWrapperClose => "MULTIPLY_WRAPPER_CLOSE", "";
    DivideWrapperOpen => "DIVIDE_WRAPPER_OPEN", "";
    DivideWrapperClose => "DIVIDE_WRAPPER_CLOSE", "";
    ModWrapperOpen => "MOD_WRAPPER_OPEN", "";
    ModWrapperClose => "MOD_WRAPPER_CLOSE", "";
    NegWrapperOpen => "UNARY_MINUS_WRAPPER_OPEN", "";
    NegWrapperClose => "UNARY_MINUS_WRAPPER_CLOSE", "";
    InWrapperOpen => "IN_OP_WRAPPER_OPEN", "";
    InWrapperClose => "IN_OP_WRAPPER_CLOSE", "";
    DynamicCallOpen => "DYNAMIC_CALL_OPEN", "";
    ArgsArrayOpen => "ARGS_ARRAY_OPEN", "";
    ArgsArrayClose => "ARGS_ARRAY_CLOSE", "";
}

impl Token {
    /// Resolve a configuration key to its token.
    pub fn from_key(key: &str) -> Option<Token> {
        TOKENS.iter().copied().find(|t| t.key() == key)
    }

    /// Spelling token of a binary operator.
    pub const fn for_binary(op: BinaryOp) -> Token {
        match op {
            BinaryOp::Assign => Token::Assign,
            BinaryOp::PlusAssign => Token::PlusAssign,
            BinaryOp::MinusAssign => Token::MinusAssign,
            BinaryOp::Plus => Token::Plus,
            BinaryOp::Minus => Token::Minus,
            BinaryOp::Multiply => Token::Multiply,
            BinaryOp::Divide => Token::Divide,
            BinaryOp::Modulo => Token::Modulo,
            BinaryOp::EqualsEquals => Token::EqualsEquals,
            BinaryOp::StrictEquals => Token::StrictEquals,
            BinaryOp::NotEquals => Token::NotEquals,
            BinaryOp::StrictNotEquals => Token::StrictNotEquals,
            BinaryOp::LessThan => Token::LessThan,
            BinaryOp::LessThanEquals => Token::LessThanEquals,
            BinaryOp::GreaterThan => Token::GreaterThan,
            BinaryOp::GreaterThanEquals => Token::GreaterThanEquals,
            BinaryOp::And => Token::And,
            BinaryOp::Or => Token::Or,
            BinaryOp::In => Token::In,
            BinaryOp::InstanceOf => Token::InstanceOf,
        }
    }

    /// Operator wrapper table: the open/close helper-call tokens for a binary operator.
    ///
    /// ## Notes
    /// - `!=` and `!==` share the "different" wrapper; `==` and `===` share the "equals" wrapper.
    /// - Compound assignments use the wrapper of their arithmetic base.
    pub const fn wrapper_for(op: BinaryOp) -> Option<(Token, Token)> {
        match op {
            BinaryOp::EqualsEquals | BinaryOp::StrictEquals => {
                Some((Token::EqualsWrapperOpen, Token::EqualsWrapperClose))
            }
            BinaryOp::NotEquals | BinaryOp::StrictNotEquals => {
                Some((Token::DifferentWrapperOpen, Token::DifferentWrapperClose))
            }
            BinaryOp::GreaterThan => Some((Token::GreaterThanWrapperOpen, Token::GreaterThanWrapperClose)),
            BinaryOp::GreaterThanEquals => Some((
                Token::GreaterThanEqualsWrapperOpen,
                Token::GreaterThanEqualsWrapperClose,
            )),
            BinaryOp::LessThan => Some((Token::LessThanWrapperOpen, Token::LessThanWrapperClose)),
            BinaryOp::LessThanEquals => Some((Token::LessThanEqualsWrapperOpen, Token::LessThanEqualsWrapperClose)),
            BinaryOp::Plus | BinaryOp::PlusAssign => Some((Token::PlusWrapperOpen, Token::PlusWrapperClose)),
            BinaryOp::Minus | BinaryOp::MinusAssign => Some((Token::MinusWrapperOpen, Token::MinusWrapperClose)),
            BinaryOp::Multiply => Some((Token::MultiplyWrapperOpen, Token::MultiplyWrapperClose)),
            BinaryOp::Divide => Some((Token::DivideWrapperOpen, Token::DivideWrapperClose)),
            BinaryOp::Modulo => Some((Token::ModWrapperOpen, Token::ModWrapperClose)),
            BinaryOp::In => Some((Token::InWrapperOpen, Token::InWrapperClose)),
            BinaryOp::Assign | BinaryOp::And | BinaryOp::Or | BinaryOp::InstanceOf => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_resolve_back_to_their_token() {
        for &token in TOKENS {
            assert_eq!(Token::from_key(token.key()), Some(token), "key {}", token.key());
        }
        assert_eq!(Token::from_key("NOT_A_TOKEN"), None);
    }

    #[test]
    fn both_inequalities_share_one_wrapper() {
        assert_eq!(
            Token::wrapper_for(BinaryOp::NotEquals),
            Token::wrapper_for(BinaryOp::StrictNotEquals)
        );
        assert_eq!(Token::wrapper_for(BinaryOp::Assign), None);
    }
}
