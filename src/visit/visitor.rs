use crate::{
    ir::{
        ArithmeticOp, ComparatorOp, Expr, FunctionKind, Literal, LogicalOp, OrderKey, Predicate,
        QueryMetadata, SetOp, Source,
    },
    visit::LowerError,
};

/// The lowering protocol: one method per AST variant, double dispatched
/// through the node's `accept`. `R` is the backend's native representation,
/// `C` whatever context the backend threads through a walk (builders,
/// parameter collectors, the block's source map).
///
/// Every method defaults to `Unsupported`, so a backend only implements the
/// variants its engine can express and anything else fails loudly, naming
/// the variant, instead of being silently approximated.
pub trait Visitor<R, C> {
    fn visit_constant(&mut self, value: &Literal, ctx: &mut C) -> Result<R, LowerError> {
        let _ = (value, ctx);
        LowerError::unsupported("Constant")
    }

    fn visit_column(&mut self, source: &str, name: &str, ctx: &mut C) -> Result<R, LowerError> {
        let _ = (source, name, ctx);
        LowerError::unsupported("ColumnReference")
    }

    fn visit_tuple(&mut self, items: &[Expr], ctx: &mut C) -> Result<R, LowerError> {
        let _ = (items, ctx);
        LowerError::unsupported("Tuple")
    }

    fn visit_arithmetic(
        &mut self,
        left: &Expr,
        op: ArithmeticOp,
        right: &Expr,
        ctx: &mut C,
    ) -> Result<R, LowerError> {
        let _ = (left, op, right, ctx);
        LowerError::unsupported("Arithmetic")
    }

    fn visit_function(
        &mut self,
        name: &str,
        args: &[Expr],
        distinct: bool,
        options: &[Literal],
        kind: FunctionKind,
        ctx: &mut C,
    ) -> Result<R, LowerError> {
        let _ = (name, args, distinct, options, kind, ctx);
        LowerError::unsupported("FunctionCall")
    }

    fn visit_case(
        &mut self,
        cases: &[(Predicate, Expr)],
        otherwise: Option<&Expr>,
        ctx: &mut C,
    ) -> Result<R, LowerError> {
        let _ = (cases, otherwise, ctx);
        LowerError::unsupported("CaseWhen")
    }

    fn visit_subquery(&mut self, metadata: &QueryMetadata, ctx: &mut C) -> Result<R, LowerError> {
        let _ = (metadata, ctx);
        LowerError::unsupported("Subquery")
    }

    fn visit_window(
        &mut self,
        name: &str,
        args: &[Expr],
        partition_by: &[Expr],
        order_by: &[OrderKey],
        ctx: &mut C,
    ) -> Result<R, LowerError> {
        let _ = (name, args, partition_by, order_by, ctx);
        LowerError::unsupported("WindowFunction")
    }

    fn visit_entity(&mut self, identifier: &str, alias: &str, ctx: &mut C) -> Result<R, LowerError> {
        let _ = (identifier, alias, ctx);
        LowerError::unsupported("EntityReference")
    }

    fn visit_cte(
        &mut self,
        name: &str,
        metadata: &QueryMetadata,
        alias: &str,
        ctx: &mut C,
    ) -> Result<R, LowerError> {
        let _ = (name, metadata, alias, ctx);
        LowerError::unsupported("CommonTableExpression")
    }

    fn visit_set_operation(
        &mut self,
        op: SetOp,
        sources: &[Source],
        alias: &str,
        ctx: &mut C,
    ) -> Result<R, LowerError> {
        let _ = (op, sources, alias, ctx);
        LowerError::unsupported("SetOperation")
    }

    fn visit_comparison(
        &mut self,
        left: &Expr,
        op: ComparatorOp,
        right: Option<&Expr>,
        ctx: &mut C,
    ) -> Result<R, LowerError> {
        let _ = (left, op, right, ctx);
        LowerError::unsupported("Comparison")
    }

    fn visit_logical(
        &mut self,
        op: LogicalOp,
        children: &[Predicate],
        ctx: &mut C,
    ) -> Result<R, LowerError> {
        let _ = (op, children, ctx);
        LowerError::unsupported("Logical")
    }
}
