// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration walker.
//!
//! [`DeclarationCollector`] makes one pre-order pass over a [`SyntaxTree`]
//! and appends a record to the matching [`FileDeclarations`] collection for
//! every declaration it meets.
//!
//! # Recursion
//!
//! Containers (types and extensions) and `#if` blocks are recorded and
//! then entered. Every other declaration is a leaf: its children are
//! skipped, so declarations inside function bodies, accessor bodies and
//! signatures are never reported.
//!
//! # Spans
//!
//! Each record's span is the span of its declaration node. Records that
//! share a node (the bindings of one `var`, the elements of one `case`)
//! share its span.
//!
//! # Usage
//!
//! ```
//! use declkit_syntax::parse_source;
//! use declkit_swift::walker::DeclarationCollector;
//!
//! let tree = parse_source("struct User {\n  let id: Int\n}").unwrap();
//! let decls = DeclarationCollector::collect(&tree);
//! assert_eq!(decls.variables[0].header.owner.as_ref().unwrap().name, "User");
//! ```

use declkit_core::text::SourceLocation;
use declkit_syntax::{walk as walk_tree, NodeRef, SyntaxKind, SyntaxTree, VisitResult, Visitor};
use tracing::debug;

use crate::model::{
    AssociatedTypeDeclaration, ConditionalBlock, DeclarationHeader, DeinitializerDeclaration,
    EnumCaseDeclaration, FileDeclarations, FunctionDeclaration, ImportDeclaration,
    InitializerDeclaration, OperatorDeclaration, ParameterDescriptor, ParameterFields,
    PrecedenceGroupDeclaration, StandardParameter, SubscriptDeclaration, TypeDeclaration,
    TypealiasDeclaration, VariableDeclaration,
};
use crate::node;
use crate::owner::resolve_owner;
use crate::signature::{decompose, effects, output_side};

/// Fixity modifiers of an operator declaration.
const FIXITIES: &[&str] = &["prefix", "infix", "postfix"];

/// Accessors that observe a stored property rather than compute it.
const OBSERVERS: &[&str] = &["willSet", "didSet"];

/// Collect every declaration of `tree`.
pub fn walk(tree: &SyntaxTree) -> FileDeclarations {
    DeclarationCollector::collect(tree)
}

/// Visitor that accumulates declaration records.
#[derive(Debug, Default)]
pub struct DeclarationCollector {
    declarations: FileDeclarations,
}

impl DeclarationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `tree` and return what was collected.
    pub fn collect(tree: &SyntaxTree) -> FileDeclarations {
        let mut collector = DeclarationCollector::new();
        walk_tree(tree, &mut collector);
        let declarations = collector.into_declarations();
        debug!(
            total = declarations.len(),
            types = declarations.types.len(),
            functions = declarations.functions.len(),
            variables = declarations.variables.len(),
            enum_cases = declarations.enum_cases.len(),
            "collected declarations"
        );
        declarations
    }

    pub fn into_declarations(self) -> FileDeclarations {
        self.declarations
    }

    // ------------------------------------------------------------------
    // Records
    // ------------------------------------------------------------------

    fn record_type(&mut self, decl: NodeRef<'_>) {
        self.declarations.types.push(TypeDeclaration {
            header: header(decl, node::name(decl)),
            generic_parameters: node::generic_parameters(decl),
            inherited_types: node::inherited_types(decl),
            where_clause: node::where_clause(decl),
        });
    }

    fn record_function(&mut self, decl: NodeRef<'_>) {
        let signature = Signature::read(decl);
        self.declarations.functions.push(FunctionDeclaration {
            header: header(decl, node::name(decl)),
            generic_parameters: node::generic_parameters(decl),
            parameters: signature.parameters,
            return_type: signature.return_type,
            returns: signature.returns,
            is_void_return: signature.is_void_return,
            is_async: signature.is_async,
            is_throwing: signature.is_throwing,
            where_clause: node::where_clause(decl),
            has_body: decl.child(SyntaxKind::CodeBlock).is_some(),
        });
    }

    fn record_initializer(&mut self, decl: NodeRef<'_>) {
        let signature = Signature::read(decl);
        self.declarations.initializers.push(InitializerDeclaration {
            header: header(decl, node::keyword(decl)),
            is_failable: decl.has_token("?") || decl.has_token("!"),
            generic_parameters: node::generic_parameters(decl),
            parameters: signature.parameters,
            is_async: signature.is_async,
            is_throwing: signature.is_throwing,
            where_clause: node::where_clause(decl),
            has_body: decl.child(SyntaxKind::CodeBlock).is_some(),
        });
    }

    fn record_deinitializer(&mut self, decl: NodeRef<'_>) {
        self.declarations
            .deinitializers
            .push(DeinitializerDeclaration {
                header: header(decl, node::keyword(decl)),
                has_body: decl.child(SyntaxKind::CodeBlock).is_some(),
            });
    }

    fn record_subscript(&mut self, decl: NodeRef<'_>) {
        let signature = Signature::read(decl);
        self.declarations.subscripts.push(SubscriptDeclaration {
            header: header(decl, node::keyword(decl)),
            generic_parameters: node::generic_parameters(decl),
            parameters: signature.parameters,
            return_type: signature.return_type,
            returns: signature.returns,
            accessors: decl
                .child(SyntaxKind::AccessorBlock)
                .map(node::accessors)
                .unwrap_or_default(),
        });
    }

    /// One record per pattern binding.
    fn record_variables(&mut self, decl: NodeRef<'_>) {
        for binding in decl
            .child_nodes()
            .filter(|n| n.kind() == SyntaxKind::PatternBinding)
        {
            let name = binding
                .child(SyntaxKind::Pattern)
                .map(|p| p.text().to_string())
                .unwrap_or_default();
            let block = binding.child(SyntaxKind::AccessorBlock);
            let accessors = block.map(node::accessors).unwrap_or_default();
            let observed_only =
                !accessors.is_empty() && accessors.iter().all(|a| OBSERVERS.contains(&a.as_str()));
            self.declarations.variables.push(VariableDeclaration {
                header: header(decl, name),
                type_annotation: binding
                    .child(SyntaxKind::TypeAnnotation)
                    .and_then(|annotation| annotation.child_type())
                    .map(decompose),
                initializer: initializer_text(binding),
                is_computed: block.is_some() && !observed_only,
                accessors,
            });
        }
    }

    fn record_typealias(&mut self, decl: NodeRef<'_>) {
        let aliased = decl
            .child(SyntaxKind::TypeInitializer)
            .and_then(|init| init.child_type())
            .map(decompose)
            .unwrap_or_else(|| {
                ParameterDescriptor::Standard(StandardParameter {
                    fields: ParameterFields::new(""),
                    parameters: Vec::new(),
                })
            });
        self.declarations.typealiases.push(TypealiasDeclaration {
            header: header(decl, node::name(decl)),
            generic_parameters: node::generic_parameters(decl),
            aliased,
        });
    }

    fn record_associated_type(&mut self, decl: NodeRef<'_>) {
        self.declarations
            .associated_types
            .push(AssociatedTypeDeclaration {
                header: header(decl, node::name(decl)),
                inherited_types: node::inherited_types(decl),
                default_type: decl
                    .child(SyntaxKind::TypeInitializer)
                    .and_then(|init| init.child_type())
                    .map(|ty| ty.text().to_string()),
            });
    }

    /// One record per case element.
    fn record_enum_cases(&mut self, decl: NodeRef<'_>) {
        for element in decl
            .child_nodes()
            .filter(|n| n.kind() == SyntaxKind::EnumCaseElement)
        {
            let associated_values = element
                .child(SyntaxKind::EnumCaseParameterClause)
                .map(|clause| {
                    clause
                        .child_nodes()
                        .filter_map(|param| param.child_type())
                        .map(decompose)
                        .collect()
                })
                .unwrap_or_default();
            self.declarations.enum_cases.push(EnumCaseDeclaration {
                header: header(decl, node::name(element)),
                associated_values,
                raw_value: initializer_text(element),
            });
        }
    }

    fn record_import(&mut self, decl: NodeRef<'_>) {
        let path = decl
            .child(SyntaxKind::ImportPath)
            .map(|p| p.text().to_string())
            .unwrap_or_default();
        // Tokens of the path belong to `ImportPath`, so a second direct
        // token can only be the import kind.
        let import_kind = decl.child_tokens().nth(1).map(|t| t.text().to_string());
        self.declarations.imports.push(ImportDeclaration {
            header: header(decl, path.clone()),
            import_kind,
            path,
        });
    }

    fn record_operator(&mut self, decl: NodeRef<'_>) {
        let header = header(decl, node::name(decl));
        let fixity = header
            .modifiers
            .iter()
            .find(|m| FIXITIES.contains(&m.name.as_str()))
            .map(|m| m.name.clone());
        let precedence_group = decl
            .child(SyntaxKind::OperatorPrecedence)
            .and_then(|p| p.child_tokens().find(|t| t.is_word()))
            .map(|t| t.text().to_string());
        self.declarations.operators.push(OperatorDeclaration {
            header,
            fixity,
            precedence_group,
        });
    }

    fn record_precedence_group(&mut self, decl: NodeRef<'_>) {
        self.declarations
            .precedence_groups
            .push(PrecedenceGroupDeclaration {
                header: header(decl, node::name(decl)),
                body: decl
                    .child(SyntaxKind::OpaqueBlock)
                    .map(|b| b.text().to_string())
                    .unwrap_or_default(),
            });
    }

    fn record_conditional_block(&mut self, decl: NodeRef<'_>) {
        let clauses: Vec<String> = decl
            .child_nodes()
            .filter(|n| n.kind() == SyntaxKind::IfConfigClause)
            .map(|clause| {
                let directive = node::keyword(clause);
                match clause.child(SyntaxKind::IfConfigCondition) {
                    Some(condition) => format!("{} {}", directive, condition.text()),
                    None => directive,
                }
            })
            .collect();
        let name = decl
            .child(SyntaxKind::IfConfigClause)
            .and_then(|clause| clause.child(SyntaxKind::IfConfigCondition))
            .map(|condition| condition.text().to_string())
            .unwrap_or_default();
        let mut header = header(decl, name);
        header.keyword = "#if".to_string();
        self.declarations
            .conditional_blocks
            .push(ConditionalBlock { header, clauses });
    }
}

impl<'t> Visitor<'t> for DeclarationCollector {
    fn visit(&mut self, node: NodeRef<'t>) -> VisitResult {
        match node.kind() {
            SyntaxKind::SourceFile | SyntaxKind::MemberBlock | SyntaxKind::IfConfigClause => {
                VisitResult::Continue
            }
            kind if kind.is_container_decl() => {
                self.record_type(node);
                VisitResult::Continue
            }
            SyntaxKind::IfConfigDecl => {
                self.record_conditional_block(node);
                VisitResult::Continue
            }
            SyntaxKind::FunctionDecl => {
                self.record_function(node);
                VisitResult::SkipChildren
            }
            SyntaxKind::InitializerDecl => {
                self.record_initializer(node);
                VisitResult::SkipChildren
            }
            SyntaxKind::DeinitializerDecl => {
                self.record_deinitializer(node);
                VisitResult::SkipChildren
            }
            SyntaxKind::SubscriptDecl => {
                self.record_subscript(node);
                VisitResult::SkipChildren
            }
            SyntaxKind::VariableDecl => {
                self.record_variables(node);
                VisitResult::SkipChildren
            }
            SyntaxKind::TypealiasDecl => {
                self.record_typealias(node);
                VisitResult::SkipChildren
            }
            SyntaxKind::AssociatedTypeDecl => {
                self.record_associated_type(node);
                VisitResult::SkipChildren
            }
            SyntaxKind::EnumCaseDecl => {
                self.record_enum_cases(node);
                VisitResult::SkipChildren
            }
            SyntaxKind::ImportDecl => {
                self.record_import(node);
                VisitResult::SkipChildren
            }
            SyntaxKind::OperatorDecl => {
                self.record_operator(node);
                VisitResult::SkipChildren
            }
            SyntaxKind::PrecedenceGroupDecl => {
                self.record_precedence_group(node);
                VisitResult::SkipChildren
            }
            _ => VisitResult::SkipChildren,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn header(decl: NodeRef<'_>, name: String) -> DeclarationHeader {
    DeclarationHeader {
        attributes: node::attributes(decl),
        modifiers: node::modifiers(decl),
        keyword: node::keyword(decl),
        name,
        owner: resolve_owner(decl),
        span: decl.span(),
        start_location: SourceLocation::empty(),
        end_location: SourceLocation::empty(),
    }
}

/// Expression text of a direct `= expr` child.
fn initializer_text(node: NodeRef<'_>) -> Option<String> {
    node.child(SyntaxKind::InitializerClause)
        .and_then(|init| init.child(SyntaxKind::Expr))
        .map(|expr| expr.text().to_string())
}

/// Parameters, return and effects of a function-like declaration.
struct Signature {
    parameters: Vec<ParameterDescriptor>,
    return_type: Option<String>,
    returns: Vec<ParameterDescriptor>,
    is_void_return: bool,
    is_async: bool,
    is_throwing: bool,
}

impl Signature {
    fn read(decl: NodeRef<'_>) -> Self {
        let signature = decl.child(SyntaxKind::FunctionSignature);
        let parameters = signature
            .and_then(|s| s.child(SyntaxKind::ParameterClause))
            .map(|clause| {
                clause
                    .child_nodes()
                    .filter_map(|param| param.child_type())
                    .map(decompose)
                    .collect()
            })
            .unwrap_or_default();
        let return_node = signature
            .and_then(|s| s.child(SyntaxKind::ReturnClause))
            .and_then(|clause| clause.child_type());
        let output = output_side(return_node);
        let (is_async, is_throwing) =
            effects(signature.and_then(|s| s.child(SyntaxKind::EffectSpecifiers)));
        Signature {
            parameters,
            return_type: return_node.map(|ty| ty.text().to_string()),
            returns: output.outputs,
            is_void_return: output.is_void,
            is_async,
            is_throwing,
        }
    }
}
