use crate::types::RowValues;

/// A rendered statement: SQL text plus positional parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sql {
    pub sql: String,
    pub params: Vec<RowValues>,
}

impl Sql {
    #[must_use]
    pub fn new() -> Sql {
        Sql::default()
    }

    pub fn append_syntax(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    pub fn append_identifier(&mut self, identifier: &str) {
        self.sql.push('"');
        self.sql.push_str(&identifier.replace('"', "\"\""));
        self.sql.push('"');
    }

    pub fn append_param(&mut self, param: RowValues) {
        self.params.push(param);
        self.sql.push('$');
        self.sql.push_str(&self.params.len().to_string());
    }
}
