//! Positional-parameter SQL builder.
//!
//! Optional filters are appended as `AND` clauses whose `?` marker is
//! rewritten to the next `$n` placeholder, so the placeholder numbering
//! always matches the bound parameter list. Caller-supplied values only
//! ever travel as bound parameters.

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text (also used for dates cast with `::date`).
    Text(String),
    /// 64-bit integer.
    Int(i64),
    /// Double precision (cast with `::numeric` where compared to amounts).
    Float(f64),
}

/// SQL text plus its ordered parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlQuery {
    text: String,
    params: Vec<SqlParam>,
}

impl SqlQuery {
    /// Start from fixed SQL text.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            text: base.into(),
            params: Vec::new(),
        }
    }

    /// Bind a parameter and return its placeholder (`$1`, `$2`, ...).
    pub fn bind(&mut self, value: SqlParam) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    /// Append `AND <clause>`, replacing each `?` in `clause` with the
    /// placeholder bound to `value`.
    pub fn and_where(&mut self, clause: &str, value: SqlParam) -> &mut Self {
        let placeholder = self.bind(value);
        self.text.push_str(" AND ");
        self.text.push_str(&clause.replace('?', &placeholder));
        self
    }

    /// Append `AND <clause>` only when `value` is present.
    pub fn and_where_some(&mut self, clause: &str, value: Option<SqlParam>) -> &mut Self {
        if let Some(value) = value {
            self.and_where(clause, value);
        }
        self
    }

    /// Append fixed SQL text.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.text.push(' ');
        self.text.push_str(sql.trim());
        self
    }

    /// Append `LIMIT $n`.
    pub fn limit(&mut self, rows: i64) -> &mut Self {
        let placeholder = self.bind(SqlParam::Int(rows));
        self.text.push_str(" LIMIT ");
        self.text.push_str(&placeholder);
        self
    }

    /// The SQL text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bound parameters in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Finish a builder chain.
    #[must_use]
    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
