use crate::ir::{ArithmeticOp, Expr, JoinType, Predicate, QueryMetadata};

/// A result-shape type describes itself by populating a `ProjectionDecl`:
/// one call per member, in member order, plus the class-level joins and
/// group-by/order-by references. This hand-driven declaration is the
/// population path for the descriptor model; the scanner never needs to
/// look inside the type itself.
pub trait ProjectionShape: 'static {
    fn declare(d: &mut ProjectionDecl);
}

#[derive(Clone, PartialEq)]
pub(crate) enum SelectKindDecl {
    Column { name: Option<String> },
    Aggregate { function: String, target: String, distinct: bool },
    Arithmetic { left: Expr, op: ArithmeticOp, right: Expr },
    Subquery { metadata: QueryMetadata },
    Raw { expr: Expr },
}

#[derive(Clone, PartialEq)]
pub struct SelectDecl {
    pub(crate) member: String,
    pub(crate) alias: Option<String>,
    pub(crate) source: Option<String>,
    pub(crate) kind: SelectKindDecl,
}

impl SelectDecl {
    fn new(member: &str, kind: SelectKindDecl) -> SelectDecl {
        SelectDecl { member: member.to_string(), alias: None, source: None, kind }
    }

    pub fn alias(&mut self, alias: &str) -> &mut Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// Read this member from the join source bound to `source` instead of
    /// the projection's own source.
    pub fn from(&mut self, source: &str) -> &mut Self {
        self.source = Some(source.to_string());
        self
    }

    /// Override the underlying column name; by default the member name is
    /// the column name.
    pub fn named(&mut self, column: &str) -> &mut Self {
        if let SelectKindDecl::Column { name } = &mut self.kind {
            *name = Some(column.to_string());
        }
        self
    }
}

#[derive(Clone, PartialEq)]
pub struct JoinDecl {
    pub(crate) entity: String,
    pub(crate) alias: String,
    pub(crate) join_type: JoinType,
    pub(crate) on: Predicate,
}

#[derive(Clone, PartialEq)]
pub struct RefDecl {
    pub(crate) ident: String,
    pub(crate) source: Option<String>,
}

impl RefDecl {
    pub(crate) fn new(ident: &str, source: Option<&str>) -> RefDecl {
        RefDecl { ident: ident.to_string(), source: source.map(str::to_string) }
    }
}

#[derive(Clone, PartialEq)]
pub(crate) struct OrderDecl {
    pub(crate) target: RefDecl,
    pub(crate) ascending: bool,
}

#[derive(Default)]
pub struct ProjectionDecl {
    pub(crate) entity: Option<String>,
    pub(crate) alias: Option<String>,
    pub(crate) distinct: bool,
    pub(crate) selects: Vec<SelectDecl>,
    pub(crate) joins: Vec<JoinDecl>,
    pub(crate) group_by: Vec<RefDecl>,
    pub(crate) order_by: Vec<OrderDecl>,
}

impl ProjectionDecl {
    pub fn new() -> ProjectionDecl {
        ProjectionDecl::default()
    }

    pub fn entity(&mut self, identifier: &str) -> &mut Self {
        self.entity = Some(identifier.to_string());
        self
    }

    pub fn entity_aliased(&mut self, identifier: &str, alias: &str) -> &mut Self {
        self.entity = Some(identifier.to_string());
        self.alias = Some(alias.to_string());
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    fn push_select(&mut self, decl: SelectDecl) -> &mut SelectDecl {
        self.selects.push(decl);
        self.selects.last_mut().expect("select list cannot be empty after push")
    }

    pub fn column(&mut self, member: &str) -> &mut SelectDecl {
        self.push_select(SelectDecl::new(member, SelectKindDecl::Column { name: None }))
    }

    pub fn aggregate(&mut self, member: &str, function: &str, target: &str) -> &mut SelectDecl {
        self.push_select(SelectDecl::new(
            member,
            SelectKindDecl::Aggregate {
                function: function.to_string(),
                target: target.to_string(),
                distinct: false,
            },
        ))
    }

    pub fn aggregate_distinct(&mut self, member: &str, function: &str, target: &str) -> &mut SelectDecl {
        self.push_select(SelectDecl::new(
            member,
            SelectKindDecl::Aggregate {
                function: function.to_string(),
                target: target.to_string(),
                distinct: true,
            },
        ))
    }

    pub fn arithmetic(&mut self, member: &str, left: Expr, op: ArithmeticOp, right: Expr) -> &mut SelectDecl {
        self.push_select(SelectDecl::new(member, SelectKindDecl::Arithmetic { left, op, right }))
    }

    pub fn subquery(&mut self, member: &str, metadata: QueryMetadata) -> &mut SelectDecl {
        self.push_select(SelectDecl::new(member, SelectKindDecl::Subquery { metadata }))
    }

    pub fn raw(&mut self, member: &str, expr: Expr) -> &mut SelectDecl {
        self.push_select(SelectDecl::new(member, SelectKindDecl::Raw { expr }))
    }

    pub fn join(&mut self, join_type: JoinType, entity: &str, alias: &str, on: Predicate) -> &mut Self {
        self.joins.push(JoinDecl {
            entity: entity.to_string(),
            alias: alias.to_string(),
            join_type,
            on,
        });
        self
    }

    pub fn inner_join(&mut self, entity: &str, alias: &str, on: Predicate) -> &mut Self {
        self.join(JoinType::Inner, entity, alias, on)
    }

    pub fn left_join(&mut self, entity: &str, alias: &str, on: Predicate) -> &mut Self {
        self.join(JoinType::Left, entity, alias, on)
    }

    pub fn group_by(&mut self, ident: &str) -> &mut Self {
        self.group_by.push(RefDecl::new(ident, None));
        self
    }

    pub fn group_by_from(&mut self, ident: &str, source: &str) -> &mut Self {
        self.group_by.push(RefDecl::new(ident, Some(source)));
        self
    }

    pub fn order_by(&mut self, ident: &str) -> &mut Self {
        self.order_by.push(OrderDecl { target: RefDecl::new(ident, None), ascending: true });
        self
    }

    pub fn order_by_desc(&mut self, ident: &str) -> &mut Self {
        self.order_by.push(OrderDecl { target: RefDecl::new(ident, None), ascending: false });
        self
    }

    pub fn order_by_from(&mut self, ident: &str, source: &str, ascending: bool) -> &mut Self {
        self.order_by.push(OrderDecl { target: RefDecl::new(ident, Some(source)), ascending });
        self
    }
}
