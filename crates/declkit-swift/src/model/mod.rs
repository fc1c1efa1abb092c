// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Data model: parameter descriptors and declaration records.

pub mod declaration;
pub mod parameter;

pub use declaration::{
    AssociatedTypeDeclaration, Attribute, ConditionalBlock, Declaration, DeclarationHeader,
    DeclarationKind, DeinitializerDeclaration, EnumCaseDeclaration, FileDeclarations,
    FunctionDeclaration, GenericParameter, ImportDeclaration, InitializerDeclaration, Modifier,
    OperatorDeclaration, Owner, PrecedenceGroupDeclaration, SubscriptDeclaration,
    TypeDeclaration, TypealiasDeclaration, VariableDeclaration,
};
pub use parameter::{
    preferred_name, ClosureParameter, ParameterDescriptor, ParameterFields, StandardParameter,
    TupleParameter,
};
