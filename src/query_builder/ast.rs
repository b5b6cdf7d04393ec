use crate::types::{RowValues, SortOrder};

/// A table and the alias it is always rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub alias: &'static str,
}

impl Table {
    #[must_use]
    pub const fn new(name: &'static str, alias: &'static str) -> Self {
        Self { name, alias }
    }

    #[must_use]
    pub const fn column(self, name: &'static str) -> Column {
        Column { table: self, name }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub table: Table,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equals,
    GreaterThanOrEqualTo,
    LessThanOrEqualTo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Sum,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Column(Column),
    Value(RowValues),
    /// Conjunction; empty means `TRUE`.
    And(Vec<Expression>),
    BinaryOperator {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    Aggregate {
        function: AggregateFunction,
        argument: Box<Expression>,
    },
}

impl From<Column> for Expression {
    fn from(column: Column) -> Self {
        Expression::Column(column)
    }
}

impl Expression {
    #[must_use]
    pub fn true_expr() -> Expression {
        Expression::And(vec![])
    }

    #[must_use]
    pub fn is_true(&self) -> bool {
        matches!(self, Expression::And(items) if items.is_empty())
    }

    fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Expression {
        Expression::BinaryOperator {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// `self AND other`, flattening nested conjunctions and dropping `TRUE`.
    #[must_use]
    pub fn and(self, other: Expression) -> Expression {
        let mut items = match self {
            Expression::And(items) => items,
            single => vec![single],
        };
        match other {
            Expression::And(more) => items.extend(more),
            single => items.push(single),
        }
        Expression::And(items)
    }

    /// Conjunction of optional predicates; all `None` gives `TRUE`.
    #[must_use]
    pub fn all(predicates: impl IntoIterator<Item = Option<Expression>>) -> Expression {
        predicates
            .into_iter()
            .flatten()
            .fold(Expression::true_expr(), Expression::and)
    }
}

impl Column {
    fn compare(self, operator: BinaryOperator, value: impl Into<RowValues>) -> Expression {
        Expression::binary(
            Expression::Column(self),
            operator,
            Expression::Value(value.into()),
        )
    }

    #[must_use]
    pub fn eq(self, value: impl Into<RowValues>) -> Expression {
        self.compare(BinaryOperator::Equals, value)
    }

    #[must_use]
    pub fn ge(self, value: impl Into<RowValues>) -> Expression {
        self.compare(BinaryOperator::GreaterThanOrEqualTo, value)
    }

    #[must_use]
    pub fn le(self, value: impl Into<RowValues>) -> Expression {
        self.compare(BinaryOperator::LessThanOrEqualTo, value)
    }

    /// Join condition `self = other`.
    #[must_use]
    pub fn eq_column(self, other: Column) -> Expression {
        Expression::binary(
            Expression::Column(self),
            BinaryOperator::Equals,
            Expression::Column(other),
        )
    }

    #[must_use]
    pub fn count(self) -> Expression {
        Expression::Aggregate {
            function: AggregateFunction::Count,
            argument: Box::new(Expression::Column(self)),
        }
    }

    #[must_use]
    pub fn sum(self) -> Expression {
        Expression::Aggregate {
            function: AggregateFunction::Sum,
            argument: Box::new(Expression::Column(self)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expression: Expression,
    pub alias: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    LeftOuter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: Table,
    pub on: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByElement {
    pub target: Expression,
    pub direction: SortOrder,
}

/// `SELECT ... FROM ... [JOIN ...] [WHERE ...] [GROUP BY ...] [ORDER BY ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub select_list: Vec<SelectItem>,
    pub from: Table,
    pub joins: Vec<Join>,
    pub where_: Expression,
    pub group_by: Vec<Column>,
    pub order_by: Vec<OrderByElement>,
}

impl Select {
    /// Start a select over `table`; with no columns added it renders `SELECT *`.
    #[must_use]
    pub fn from_table(table: Table) -> Self {
        Self {
            select_list: Vec::new(),
            from: table,
            joins: Vec::new(),
            where_: Expression::true_expr(),
            group_by: Vec::new(),
            order_by: Vec::new(),
        }
    }

    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.select_list.push(SelectItem {
            expression: Expression::Column(column),
            alias: None,
        });
        self
    }

    #[must_use]
    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        for column in columns {
            self = self.column(column);
        }
        self
    }

    #[must_use]
    pub fn column_as(mut self, expression: impl Into<Expression>, alias: &'static str) -> Self {
        self.select_list.push(SelectItem {
            expression: expression.into(),
            alias: Some(alias),
        });
        self
    }

    #[must_use]
    pub fn inner_join(mut self, table: Table, on: Expression) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Inner,
            table,
            on,
        });
        self
    }

    #[must_use]
    pub fn left_join(mut self, table: Table, on: Expression) -> Self {
        self.joins.push(Join {
            kind: JoinKind::LeftOuter,
            table,
            on,
        });
        self
    }

    /// Add a predicate; repeated calls are AND-ed.
    #[must_use]
    pub fn filter(mut self, predicate: Expression) -> Self {
        self.where_ = std::mem::replace(&mut self.where_, Expression::true_expr()).and(predicate);
        self
    }

    #[must_use]
    pub fn group_by(mut self, column: Column) -> Self {
        self.group_by.push(column);
        self
    }

    #[must_use]
    pub fn order_by(mut self, target: impl Into<Expression>, direction: SortOrder) -> Self {
        self.order_by.push(OrderByElement {
            target: target.into(),
            direction,
        });
        self
    }
}

/// `INSERT INTO ... (...) VALUES (...) [RETURNING ...]`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: Table,
    pub values: Vec<(Column, RowValues)>,
    pub returning: Vec<Column>,
}

impl Insert {
    #[must_use]
    pub fn into_table(table: Table) -> Self {
        Self {
            table,
            values: Vec::new(),
            returning: Vec::new(),
        }
    }

    #[must_use]
    pub fn value(mut self, column: Column, value: impl Into<RowValues>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    #[must_use]
    pub fn returning(mut self, column: Column) -> Self {
        self.returning.push(column);
        self
    }
}

/// `DELETE FROM ... WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: Table,
    pub where_: Expression,
}

impl Delete {
    #[must_use]
    pub fn from_table(table: Table) -> Self {
        Self {
            table,
            where_: Expression::true_expr(),
        }
    }

    #[must_use]
    pub fn filter(mut self, predicate: Expression) -> Self {
        self.where_ = std::mem::replace(&mut self.where_, Expression::true_expr()).and(predicate);
        self
    }
}
