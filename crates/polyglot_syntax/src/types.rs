//! Type and symbol queries answered by the external type checker.
//!
//! The engine treats the checker as a synchronous, side-effect-free collaborator. It never mutates types; it only
//! asks questions about nodes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ast::{NodeId, TypeAnnotation};

/// Coarse category of a checked type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    Number,
    String,
    Boolean,
    Array,
    Object,
    Class,
    Promise,
    Void,
    Any,
    Unknown,
}

/// Checked type of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Display name as the checker prints it (`string`, `MyClass`, `Promise<number>`).
    pub name: String,
    pub category: TypeCategory,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>, category: TypeCategory) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Variable,
    Parameter,
    Property,
    Method,
    Function,
    Class,
    Import,
}

/// Symbol an identifier or member name resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default)]
    pub declaration: Option<NodeId>,
}

/// Signature resolved for a call site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    /// Declaration node of the callee; `None` when the checker resolved the call without finding one.
    #[serde(default)]
    pub declaration: Option<NodeId>,
    #[serde(default)]
    pub parameters: Vec<Option<TypeAnnotation>>,
    #[serde(default)]
    pub return_type: Option<TypeAnnotation>,
}

/// Query interface of the external type checker.
pub trait TypeQuery {
    /// Type of the expression at `node`.
    fn type_at(&self, node: NodeId) -> Option<TypeInfo>;

    /// Symbol the name at `node` resolves to.
    fn symbol_at(&self, node: NodeId) -> Option<SymbolInfo>;

    /// Signature selected for the call expression `call`.
    fn resolved_signature(&self, call: NodeId) -> Option<SignatureInfo>;

    /// Declared type of a symbol.
    fn declared_type_of_symbol(&self, symbol: &SymbolInfo) -> Option<TypeInfo>;

    fn is_string(&self, node: NodeId) -> bool {
        self.type_at(node).is_some_and(|t| t.category == TypeCategory::String)
    }

    fn is_numeric(&self, node: NodeId) -> bool {
        self.type_at(node).is_some_and(|t| t.category == TypeCategory::Number)
    }

    fn is_boolean(&self, node: NodeId) -> bool {
        self.type_at(node).is_some_and(|t| t.category == TypeCategory::Boolean)
    }
}

/// Collaborator that knows nothing; every query misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypeInfo;

impl TypeQuery for NoTypeInfo {
    fn type_at(&self, _node: NodeId) -> Option<TypeInfo> {
        None
    }

    fn symbol_at(&self, _node: NodeId) -> Option<SymbolInfo> {
        None
    }

    fn resolved_signature(&self, _call: NodeId) -> Option<SignatureInfo> {
        None
    }

    fn declared_type_of_symbol(&self, _symbol: &SymbolInfo) -> Option<TypeInfo> {
        None
    }
}

/// Precomputed answers, typically exported by the checker alongside a serialized tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTable {
    #[serde(default)]
    types: BTreeMap<NodeId, TypeInfo>,
    #[serde(default)]
    symbols: BTreeMap<NodeId, SymbolInfo>,
    #[serde(default)]
    signatures: BTreeMap<NodeId, SignatureInfo>,
    /// Declared types keyed by symbol name.
    #[serde(default)]
    symbol_types: BTreeMap<String, TypeInfo>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, node: NodeId, info: TypeInfo) -> Self {
        self.types.insert(node, info);
        self
    }

    pub fn with_symbol(mut self, node: NodeId, info: SymbolInfo) -> Self {
        self.symbols.insert(node, info);
        self
    }

    pub fn with_signature(mut self, call: NodeId, info: SignatureInfo) -> Self {
        self.signatures.insert(call, info);
        self
    }

    pub fn with_symbol_type(mut self, symbol: impl Into<String>, info: TypeInfo) -> Self {
        self.symbol_types.insert(symbol.into(), info);
        self
    }
}

impl TypeQuery for TypeTable {
    fn type_at(&self, node: NodeId) -> Option<TypeInfo> {
        self.types.get(&node).cloned()
    }

    fn symbol_at(&self, node: NodeId) -> Option<SymbolInfo> {
        self.symbols.get(&node).cloned()
    }

    fn resolved_signature(&self, call: NodeId) -> Option<SignatureInfo> {
        self.signatures.get(&call).cloned()
    }

    fn declared_type_of_symbol(&self, symbol: &SymbolInfo) -> Option<TypeInfo> {
        self.symbol_types.get(&symbol.name).cloned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn predicates_follow_categories() {
        let table = TypeTable::new()
            .with_type(NodeId(1), TypeInfo::new("string", TypeCategory::String))
            .with_type(NodeId(2), TypeInfo::new("number", TypeCategory::Number));
        assert!(table.is_string(NodeId(1)));
        assert!(table.is_numeric(NodeId(2)));
        assert!(!table.is_boolean(NodeId(2)));
        assert!(!NoTypeInfo.is_string(NodeId(1)));
    }

    #[test]
    fn table_loads_from_json() {
        let json = r#"{
            "types": { "3": { "name": "string", "category": "string" } },
            "symbol_types": { "Foo": { "name": "Foo", "category": "class" } }
        }"#;
        let table: TypeTable = serde_json::from_str(json).unwrap();
        assert!(table.is_string(NodeId(3)));
        let foo = SymbolInfo {
            name: "Foo".into(),
            kind: SymbolKind::Class,
            declaration: None,
        };
        assert_eq!(
            table.declared_type_of_symbol(&foo).map(|t| t.category),
            Some(TypeCategory::Class)
        );
    }
}
