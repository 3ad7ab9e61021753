//! Method-override type backfill.
//!
//! A subclass method that overrides a superclass method often omits annotations the parent spells out. Statically
//! typed targets need the overriding signature to match, so the missing parameter and return types are borrowed
//! from the nearest in-file ancestor that declares a method of the same name.

use polyglot_syntax::ast::TypeAnnotation;
use polyglot_syntax::{NodeId, NodeKind};

use crate::emit::errors::EmitResult;
use crate::emit::{Printer, WarningKind};

/// Parameter and return annotations of the overridden method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideDescriptor {
    pub params: Vec<Option<TypeAnnotation>>,
    pub return_type: Option<TypeAnnotation>,
}

impl Printer<'_> {
    /// Descriptor for the method `name` of the current class, when it overrides an ancestor's method and has
    /// annotations to backfill.
    ///
    /// ## Notes
    /// - An arity mismatch records `MalformedOverride` and returns `None`, so the signature is printed as declared.
    pub fn override_descriptor(
        &mut self,
        id: NodeId,
        name: &str,
        params: &[NodeId],
        return_type: Option<&TypeAnnotation>,
    ) -> EmitResult<Option<OverrideDescriptor>> {
        let mut declared = Vec::with_capacity(params.len());
        for &param in params {
            match self.kind(param)? {
                NodeKind::Parameter { ty, .. } => declared.push(ty),
                _ => return Err(self.unsupported(param, Some("expected a parameter".into()))),
            }
        }
        if return_type.is_some() && declared.iter().all(Option::is_some) {
            return Ok(None);
        }
        let Some(class) = self.ctx.current_class().map(str::to_string) else {
            return Ok(None);
        };
        let Some((parent, parent_params, parent_return)) = self.find_overridden(&class, name)? else {
            return Ok(None);
        };
        if parent_params.len() != params.len() {
            self.warn(
                WarningKind::MalformedOverride,
                id,
                format!(
                    "`{class}.{name}` takes {} parameter(s) but overrides `{parent}.{name}` with {}",
                    params.len(),
                    parent_params.len()
                ),
            );
            return Ok(None);
        }
        Ok(Some(OverrideDescriptor {
            params: parent_params,
            return_type: parent_return,
        }))
    }

    /// Nearest ancestor of `class` declaring a method `name`, with its parameter and return annotations.
    #[allow(clippy::type_complexity)]
    fn find_overridden(
        &self,
        class: &str,
        name: &str,
    ) -> EmitResult<Option<(String, Vec<Option<TypeAnnotation>>, Option<TypeAnnotation>)>> {
        let mut seen = vec![class.to_string()];
        let mut current = self.class_parent(class);
        while let Some(parent) = current {
            // cyclic `extends` chains are malformed input; stop rather than loop
            if seen.contains(&parent) {
                return Ok(None);
            }
            let Some(decl) = self.class_decl(&parent) else {
                return Ok(None);
            };
            if let NodeKind::ClassDeclaration { members, .. } = self.kind(decl)? {
                for member in members {
                    if let NodeKind::MethodDeclaration {
                        name: member_name,
                        params,
                        return_type,
                        ..
                    } = self.kind(member)?
                        && member_name == name
                    {
                        let mut types = Vec::with_capacity(params.len());
                        for param in params {
                            if let NodeKind::Parameter { ty, .. } = self.kind(param)? {
                                types.push(ty);
                            }
                        }
                        return Ok(Some((parent, types, return_type)));
                    }
                }
            }
            current = self.class_parent(&parent);
            seen.push(parent);
        }
        Ok(None)
    }
}
