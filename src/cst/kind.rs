use std::fmt;

/// Node kinds of the concrete syntax tree, one per grammar production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,

    // Module header, exports and imports
    ModuleHeader,
    ModuleName,
    ExportList,
    ImportDecl,
    ImportList,
    ImportAlias,
    /// `foo`
    ItemValue,
    /// `(<>)`
    ItemOperator,
    /// `Maybe(..)`, `Either(Left, Right)`, `List`
    ItemType,
    /// `type (~>)`
    ItemTypeOperator,
    /// `class Functor`
    ItemClass,
    /// `kind Row` (legacy)
    ItemKind,
    /// `module Data.Maybe`
    ItemModule,
    /// `(..)` or `(A, B)` after a type item
    DataMembers,

    // Declarations
    ValueDecl,
    Signature,
    /// `Tuple a b = expr` inside `let`/`where`
    PatternBinding,
    DataDecl,
    DataCtor,
    TypeSynonym,
    NewtypeDecl,
    RoleDecl,
    /// `data Maybe :: Type -> Type`
    KindSignature,
    ClassDecl,
    ClassBody,
    FunDeps,
    FunDep,
    InstanceChain,
    InstanceDecl,
    InstanceBody,
    DeriveDecl,
    ForeignImport,
    ForeignData,
    FixityDecl,
    /// Constraints of a class/instance head: a single constraint or a parenthesised list
    Constraints,
    Constraint,
    UnguardedRhs,
    GuardedRhs,
    /// `| cond, binder <- expr = body`
    Guard,
    PatternGuard,
    WhereClause,

    // Expressions
    ExprLiteral,
    ExprVar,
    ExprConstructor,
    /// `(+)`
    ExprOpName,
    ExprHole,
    /// `_` standing for a section argument
    ExprSection,
    ExprParens,
    ExprArray,
    ExprRecord,
    RecordField,
    ExprRecordAccess,
    ExprRecordUpdate,
    RecordUpdateField,
    ExprApp,
    /// `@Type` visible type argument
    TypeArg,
    ExprBinary,
    /// An infix operator, symbolic or in backticks
    Operator,
    ExprNegate,
    ExprTyped,
    ExprLambda,
    ExprIf,
    ExprCase,
    CaseBranch,
    ExprLet,
    LetBindings,
    ExprDo,
    ExprAdo,
    DoBind,
    DoLet,
    DoDiscard,

    // Binders
    BinderWildcard,
    BinderVar,
    BinderNamed,
    BinderLiteral,
    BinderConstructor,
    BinderRecord,
    BinderArray,
    BinderParens,
    BinderBinary,
    BinderTyped,

    // Types
    TypeForall,
    TypeVarBinding,
    TypeConstrained,
    TypeArrow,
    TypeBinary,
    TypeApp,
    TypeVar,
    TypeConstructor,
    TypeWildcard,
    TypeHole,
    TypeString,
    TypeInt,
    TypeOpName,
    TypeParens,
    TypeRecord,
    TypeRow,
    RowField,
    RowTail,
    TypeKinded,

    /// A region the parser could not make sense of; carries an `ErrorNode`.
    Error,
}

impl NodeKind {
    pub fn is_decl(self) -> bool {
        matches!(
            self,
            NodeKind::ImportDecl
                | NodeKind::ValueDecl
                | NodeKind::Signature
                | NodeKind::PatternBinding
                | NodeKind::DataDecl
                | NodeKind::TypeSynonym
                | NodeKind::NewtypeDecl
                | NodeKind::RoleDecl
                | NodeKind::KindSignature
                | NodeKind::ClassDecl
                | NodeKind::InstanceChain
                | NodeKind::InstanceDecl
                | NodeKind::DeriveDecl
                | NodeKind::ForeignImport
                | NodeKind::ForeignData
                | NodeKind::FixityDecl
        )
    }

    pub fn is_expr(self) -> bool {
        matches!(
            self,
            NodeKind::ExprLiteral
                | NodeKind::ExprVar
                | NodeKind::ExprConstructor
                | NodeKind::ExprOpName
                | NodeKind::ExprHole
                | NodeKind::ExprSection
                | NodeKind::ExprParens
                | NodeKind::ExprArray
                | NodeKind::ExprRecord
                | NodeKind::ExprRecordAccess
                | NodeKind::ExprRecordUpdate
                | NodeKind::ExprApp
                | NodeKind::ExprBinary
                | NodeKind::ExprNegate
                | NodeKind::ExprTyped
                | NodeKind::ExprLambda
                | NodeKind::ExprIf
                | NodeKind::ExprCase
                | NodeKind::ExprLet
                | NodeKind::ExprDo
                | NodeKind::ExprAdo
        )
    }

    pub fn is_binder(self) -> bool {
        matches!(
            self,
            NodeKind::BinderWildcard
                | NodeKind::BinderVar
                | NodeKind::BinderNamed
                | NodeKind::BinderLiteral
                | NodeKind::BinderConstructor
                | NodeKind::BinderRecord
                | NodeKind::BinderArray
                | NodeKind::BinderParens
                | NodeKind::BinderBinary
                | NodeKind::BinderTyped
        )
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            NodeKind::TypeForall
                | NodeKind::TypeConstrained
                | NodeKind::TypeArrow
                | NodeKind::TypeBinary
                | NodeKind::TypeApp
                | NodeKind::TypeVar
                | NodeKind::TypeConstructor
                | NodeKind::TypeWildcard
                | NodeKind::TypeHole
                | NodeKind::TypeString
                | NodeKind::TypeInt
                | NodeKind::TypeOpName
                | NodeKind::TypeParens
                | NodeKind::TypeRecord
                | NodeKind::TypeRow
                | NodeKind::TypeKinded
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
