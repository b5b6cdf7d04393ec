//! Render the statement AST to a [`Sql`] string.

use super::ast::*;
use super::sql::Sql;

impl Table {
    fn to_sql(self, sql: &mut Sql) {
        sql.append_identifier(self.name);
        sql.append_syntax(" AS ");
        sql.append_identifier(self.alias);
    }
}

impl Column {
    fn to_sql(self, sql: &mut Sql) {
        sql.append_identifier(self.table.alias);
        sql.append_syntax(".");
        sql.append_identifier(self.name);
    }
}

impl BinaryOperator {
    fn to_sql(self, sql: &mut Sql) {
        sql.append_syntax(match self {
            BinaryOperator::Equals => " = ",
            BinaryOperator::GreaterThanOrEqualTo => " >= ",
            BinaryOperator::LessThanOrEqualTo => " <= ",
        });
    }
}

impl Expression {
    pub(super) fn to_sql(&self, sql: &mut Sql) {
        match self {
            Expression::Column(column) => column.to_sql(sql),
            Expression::Value(value) => sql.append_param(value.clone()),
            Expression::And(items) => match items.as_slice() {
                [] => sql.append_syntax("TRUE"),
                [single] => single.to_sql(sql),
                many => {
                    sql.append_syntax("(");
                    for (index, item) in many.iter().enumerate() {
                        if index > 0 {
                            sql.append_syntax(" AND ");
                        }
                        item.to_sql(sql);
                    }
                    sql.append_syntax(")");
                }
            },
            Expression::BinaryOperator {
                left,
                operator,
                right,
            } => {
                sql.append_syntax("(");
                left.to_sql(sql);
                operator.to_sql(sql);
                right.to_sql(sql);
                sql.append_syntax(")");
            }
            Expression::Aggregate { function, argument } => {
                sql.append_syntax(match function {
                    AggregateFunction::Count => "COUNT(",
                    AggregateFunction::Sum => "SUM(",
                });
                argument.to_sql(sql);
                sql.append_syntax(")");
            }
        }
    }
}

fn where_to_sql(predicate: &Expression, sql: &mut Sql) {
    if !predicate.is_true() {
        sql.append_syntax(" WHERE ");
        predicate.to_sql(sql);
    }
}

impl Select {
    #[must_use]
    pub fn to_sql(&self) -> Sql {
        let mut sql = Sql::new();
        sql.append_syntax("SELECT ");

        if self.select_list.is_empty() {
            sql.append_syntax("*");
        }
        for (index, item) in self.select_list.iter().enumerate() {
            if index > 0 {
                sql.append_syntax(", ");
            }
            item.expression.to_sql(&mut sql);
            if let Some(alias) = item.alias {
                sql.append_syntax(" AS ");
                sql.append_identifier(alias);
            }
        }

        sql.append_syntax(" FROM ");
        self.from.to_sql(&mut sql);

        for join in &self.joins {
            sql.append_syntax(match join.kind {
                JoinKind::Inner => " INNER JOIN ",
                JoinKind::LeftOuter => " LEFT OUTER JOIN ",
            });
            join.table.to_sql(&mut sql);
            sql.append_syntax(" ON ");
            join.on.to_sql(&mut sql);
        }

        where_to_sql(&self.where_, &mut sql);

        if !self.group_by.is_empty() {
            sql.append_syntax(" GROUP BY ");
            for (index, column) in self.group_by.iter().enumerate() {
                if index > 0 {
                    sql.append_syntax(", ");
                }
                column.to_sql(&mut sql);
            }
        }

        if !self.order_by.is_empty() {
            sql.append_syntax(" ORDER BY ");
            for (index, element) in self.order_by.iter().enumerate() {
                if index > 0 {
                    sql.append_syntax(", ");
                }
                element.target.to_sql(&mut sql);
                sql.append_syntax(" ");
                sql.append_syntax(element.direction.as_sql());
            }
        }

        sql
    }
}

impl Insert {
    #[must_use]
    pub fn to_sql(&self) -> Sql {
        let mut sql = Sql::new();
        sql.append_syntax("INSERT INTO ");
        self.table.to_sql(&mut sql);

        sql.append_syntax(" (");
        for (index, (column, _)) in self.values.iter().enumerate() {
            if index > 0 {
                sql.append_syntax(", ");
            }
            // target columns cannot be qualified
            sql.append_identifier(column.name);
        }
        sql.append_syntax(") VALUES (");
        for (index, (_, value)) in self.values.iter().enumerate() {
            if index > 0 {
                sql.append_syntax(", ");
            }
            sql.append_param(value.clone());
        }
        sql.append_syntax(")");

        if !self.returning.is_empty() {
            sql.append_syntax(" RETURNING ");
            for (index, column) in self.returning.iter().enumerate() {
                if index > 0 {
                    sql.append_syntax(", ");
                }
                column.to_sql(&mut sql);
            }
        }

        sql
    }
}

impl Delete {
    #[must_use]
    pub fn to_sql(&self) -> Sql {
        let mut sql = Sql::new();
        sql.append_syntax("DELETE FROM ");
        self.table.to_sql(&mut sql);
        where_to_sql(&self.where_, &mut sql);
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::super::schema::{city, metro_line, metro_system};
    use super::*;
    use crate::types::{RowValues, SortOrder};

    #[test]
    fn select_star_without_columns() {
        let sql = Select::from_table(city::TABLE).to_sql();
        assert_eq!(sql.sql, r#"SELECT * FROM "city" AS "c""#);
        assert!(sql.params.is_empty());
    }

    #[test]
    fn three_table_join_renders_aliases() {
        let sql = Select::from_table(metro_line::TABLE)
            .column_as(metro_line::NAME, "line_name")
            .column_as(city::NAME, "city_name")
            .inner_join(
                metro_system::TABLE,
                metro_system::ID.eq_column(metro_line::SYSTEM_ID),
            )
            .inner_join(city::TABLE, city::ID.eq_column(metro_system::CITY_ID))
            .order_by(city::NAME, SortOrder::Asc)
            .to_sql();
        assert_eq!(
            sql.sql,
            concat!(
                r#"SELECT "l"."name" AS "line_name", "c"."name" AS "city_name" "#,
                r#"FROM "metro_line" AS "l" "#,
                r#"INNER JOIN "metro_system" AS "s" ON ("s"."id" = "l"."system_id") "#,
                r#"INNER JOIN "city" AS "c" ON ("c"."id" = "s"."city_id") "#,
                r#"ORDER BY "c"."name" ASC"#
            )
        );
    }

    #[test]
    fn group_by_with_aggregates() {
        let sql = Select::from_table(metro_system::TABLE)
            .column_as(metro_system::NAME, "system_name")
            .column_as(metro_line::ID.count(), "line_count")
            .column_as(metro_line::STATION_COUNT.sum(), "total_stations")
            .inner_join(
                metro_line::TABLE,
                metro_line::SYSTEM_ID.eq_column(metro_system::ID),
            )
            .group_by(metro_system::ID)
            .group_by(metro_system::NAME)
            .to_sql();
        assert!(sql.sql.contains(r#"COUNT("l"."id") AS "line_count""#));
        assert!(sql.sql.contains(r#"SUM("l"."station_count") AS "total_stations""#));
        assert!(sql.sql.ends_with(r#"GROUP BY "s"."id", "s"."name""#));
    }

    #[test]
    fn absent_bounds_render_no_where_clause() {
        let predicate = Expression::all([None, None]);
        let sql = Select::from_table(metro_line::TABLE)
            .filter(predicate)
            .order_by(metro_line::STATION_COUNT, SortOrder::Desc)
            .to_sql();
        assert_eq!(
            sql.sql,
            r#"SELECT * FROM "metro_line" AS "l" ORDER BY "l"."station_count" DESC"#
        );
    }

    #[test]
    fn both_bounds_render_inclusive_conjunction() {
        let predicate = Expression::all([
            Some(metro_line::STATION_COUNT.ge(10)),
            Some(metro_line::STATION_COUNT.le(25)),
        ]);
        let sql = Select::from_table(metro_line::TABLE).filter(predicate).to_sql();
        assert!(sql.sql.ends_with(
            r#"WHERE (("l"."station_count" >= $1) AND ("l"."station_count" <= $2))"#
        ));
        assert_eq!(sql.params, vec![RowValues::Int(10), RowValues::Int(25)]);
    }

    #[test]
    fn insert_returning_id() {
        let sql = Insert::into_table(city::TABLE)
            .value(city::NAME, "Invalid")
            .value(city::POPULATION, 0)
            .value(city::LINK, None::<String>)
            .returning(city::ID)
            .to_sql();
        assert_eq!(
            sql.sql,
            r#"INSERT INTO "city" AS "c" ("name", "population", "link") VALUES ($1, $2, $3) RETURNING "c"."id""#
        );
        assert_eq!(sql.params[2], RowValues::Null);
    }

    #[test]
    fn delete_by_id() {
        let sql = Delete::from_table(city::TABLE).filter(city::ID.eq(5_i64)).to_sql();
        assert_eq!(sql.sql, r#"DELETE FROM "city" AS "c" WHERE ("c"."id" = $1)"#);
        assert_eq!(sql.params, vec![RowValues::Int(5)]);
    }
}
