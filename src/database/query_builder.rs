use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow};

pub const POSTS_TABLE: &str = "posts";
pub const VOTES_TABLE: &str = "votes";

/// SQL text plus the positional parameters bound to `$1..$n`, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Builds the posts-with-vote-count select used by list and detail reads.
///
/// Every caller-supplied value ends up in `params`; the SQL text only ever
/// contains fixed identifiers and placeholders.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    id: Option<i32>,
    search: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Substring filter on the title. An empty string matches everything, so
    /// no condition is emitted for it.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.is_empty() { None } else { Some(search) };
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut params: Vec<Value> = Vec::new();
        let mut conditions: Vec<String> = Vec::new();

        if let Some(id) = self.id {
            params.push(Value::from(id));
            conditions.push(format!("{}.id = ${}", POSTS_TABLE, params.len()));
        }
        if let Some(search) = &self.search {
            params.push(Value::String(format!("%{}%", escape_like(search))));
            conditions.push(format!("{}.title LIKE ${} ESCAPE '\\'", POSTS_TABLE, params.len()));
        }

        let mut query = format!(
            "SELECT {p}.*, COUNT({v}.post_id) AS votes FROM {p} LEFT OUTER JOIN {v} ON {v}.post_id = {p}.id",
            p = POSTS_TABLE,
            v = VOTES_TABLE,
        );
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(&format!(" GROUP BY {p}.id ORDER BY {p}.id", p = POSTS_TABLE));

        if let Some(limit) = self.limit {
            params.push(Value::from(limit));
            query.push_str(&format!(" LIMIT ${}", params.len()));
        }
        if let Some(offset) = self.offset {
            params.push(Value::from(offset));
            query.push_str(&format!(" OFFSET ${}", params.len()));
        }

        SqlResult { query, params }
    }

    pub fn build_query_as<'q, O>(sql_result: &'q SqlResult) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
    {
        let mut q = sqlx::query_as::<_, O>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q
    }
}

/// Escapes LIKE metacharacters so the pattern matches `search` literally.
pub fn escape_like(search: &str) -> String {
    let mut out = String::with_capacity(search.len());
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}
