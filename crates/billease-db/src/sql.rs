//! # SQL-Subset Interpreter
//!
//! Runs the small set of literal statement shapes BillEase uses against
//! the [`Store`]. It matches text with regexes; it is not a SQL parser.
//!
//! ## Recognized Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Statement Dispatch                                  │
//! │                                                                         │
//! │  "SELECT * FROM t [WHERE f = ?] [ORDER BY f [ASC|DESC]]"               │
//! │       └─► rows (all) / first row or null (get)                         │
//! │                                                                         │
//! │  "INSERT INTO t (a, b, created_at) VALUES (?, ?, CURRENT_TIMESTAMP)"   │
//! │       └─► { lastInsertRowid }          (table created if missing)      │
//! │                                                                         │
//! │  "UPDATE t SET a = ?, b = 'x' WHERE id = ?"                            │
//! │       └─► { changes: 1 }               (first match, id = last param)  │
//! │                                                                         │
//! │  "DELETE FROM t WHERE f = ?"                                            │
//! │       └─► { changes: 1 | 0 }                                            │
//! │                                                                         │
//! │  anything else                                                          │
//! │       └─► [] / null / { lastInsertRowid: 0 }                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Known Quirks (kept on purpose)
//! - `ORDER BY` compares field text, so `9, 10, 2` sorts DESC as `9, 2, 10`.
//!   Letters compare without regard to case (see [`crate::row::collate`]).
//! - `UPDATE` reports `changes: 1` even when no row matched.
//! - A missing table reads as empty; nothing here returns a parse error.
//!
//! The only failure is a poisoned store lock.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::row::{compare_keys, loose_eq, now_timestamp, row_id, Row};
use crate::store::{Store, Tables};

static FROM_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)FROM (\w+)"));
static INTO_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)INTO (\w+)"));
static UPDATE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)UPDATE (\w+)"));
static WHERE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)WHERE (\w+) = \?"));
static ORDER_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)ORDER BY (\w+)(?:\s+(ASC|DESC))?"));
static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\(([^)]+)\)"));
static SET_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)SET (.+?) WHERE"));
static CREATE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)CREATE TABLE IF NOT EXISTS (\w+)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid statement pattern {pattern}: {e}"))
}

// =============================================================================
// Query Mode and Output
// =============================================================================

/// How the caller wants the result shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Every matching row.
    All,
    /// The first matching row, or null.
    Get,
    /// Write statements; the result is a change summary.
    Run,
}

/// Result of one statement.
///
/// Serializes to exactly what the frontend expects: an array, a row or
/// `null`, `{"lastInsertRowid": n}` or `{"changes": n}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Rows(Vec<Row>),
    Row(Option<Row>),
    Inserted {
        #[serde(rename = "lastInsertRowid")]
        last_insert_rowid: i64,
    },
    Changed {
        changes: u64,
    },
}

impl QueryOutput {
    /// Rows of a `Rows`/`Row` result; empty for write summaries.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            QueryOutput::Rows(rows) => rows,
            QueryOutput::Row(row) => row.into_iter().collect(),
            _ => Vec::new(),
        }
    }

    pub fn into_first(self) -> Option<Row> {
        self.into_rows().into_iter().next()
    }

    pub fn last_insert_rowid(&self) -> i64 {
        match self {
            QueryOutput::Inserted { last_insert_rowid } => *last_insert_rowid,
            _ => 0,
        }
    }

    pub fn changes(&self) -> u64 {
        match self {
            QueryOutput::Changed { changes } => *changes,
            _ => 0,
        }
    }
}

fn empty_result(mode: QueryMode) -> QueryOutput {
    match mode {
        QueryMode::All => QueryOutput::Rows(Vec::new()),
        QueryMode::Get => QueryOutput::Row(None),
        QueryMode::Run => QueryOutput::Inserted { last_insert_rowid: 0 },
    }
}

// =============================================================================
// Interpreter
// =============================================================================

/// Statement runner bound to one store.
///
/// ## Usage
/// ```rust
/// use std::sync::Arc;
/// use billease_db::sql::Interpreter;
/// use billease_db::Store;
/// use serde_json::json;
///
/// let db = Interpreter::new(Arc::new(Store::new()));
/// db.exec("CREATE TABLE IF NOT EXISTS notes (id INTEGER, body TEXT)").unwrap();
/// db.prepare("INSERT INTO notes (body) VALUES (?)").run(&[json!("hi")]).unwrap();
///
/// let row = db.prepare("SELECT * FROM notes WHERE id = ?").get(&[json!(1)]).unwrap();
/// assert_eq!(row.unwrap()["body"], "hi");
/// ```
#[derive(Debug, Clone)]
pub struct Interpreter {
    store: Arc<Store>,
}

impl Interpreter {
    pub fn new(store: Arc<Store>) -> Self {
        Interpreter { store }
    }

    /// Runs DDL. Only `CREATE TABLE IF NOT EXISTS <name>` does anything;
    /// other text is ignored. Returns whether a table was created.
    pub fn exec(&self, sql: &str) -> DbResult<bool> {
        match CREATE_RE.captures(sql) {
            Some(caps) => self.store.create_table(&caps[1], sql.trim()),
            None => Ok(false),
        }
    }

    /// Wraps a statement for repeated execution.
    pub fn prepare(&self, sql: &str) -> Statement<'_> {
        Statement {
            interpreter: self,
            sql: sql.to_string(),
        }
    }

    /// Runs one statement with positional bind parameters.
    pub fn query(&self, sql: &str, params: &[Value], mode: QueryMode) -> DbResult<QueryOutput> {
        let sql = sql.trim();
        let verb = sql
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        debug!(verb = %verb, params = params.len(), "Interpreting statement");

        match verb.as_str() {
            "SELECT" => self.store.read(|t| Ok(select(t, sql, params, mode))),
            "INSERT" => self.store.write(|t| Ok(insert(t, sql, params))),
            "UPDATE" => self.store.write(|t| Ok(update(t, sql, params))),
            "DELETE" => self.store.write(|t| Ok(delete(t, sql, params))),
            _ => Ok(empty_result(mode)),
        }
    }
}

/// A prepared statement: the text plus the interpreter to run it on.
#[derive(Debug, Clone)]
pub struct Statement<'a> {
    interpreter: &'a Interpreter,
    sql: String,
}

impl Statement<'_> {
    pub fn all(&self, params: &[Value]) -> DbResult<Vec<Row>> {
        Ok(self
            .interpreter
            .query(&self.sql, params, QueryMode::All)?
            .into_rows())
    }

    pub fn get(&self, params: &[Value]) -> DbResult<Option<Row>> {
        Ok(self
            .interpreter
            .query(&self.sql, params, QueryMode::Get)?
            .into_first())
    }

    pub fn run(&self, params: &[Value]) -> DbResult<QueryOutput> {
        self.interpreter.query(&self.sql, params, QueryMode::Run)
    }
}

// =============================================================================
// Statement Handlers
// =============================================================================

fn where_field(sql: &str, params: &[Value]) -> Option<String> {
    if !sql.contains("WHERE") || params.is_empty() {
        return None;
    }
    WHERE_RE.captures(sql).map(|caps| caps[1].to_string())
}

fn select(tables: &Tables, sql: &str, params: &[Value], mode: QueryMode) -> QueryOutput {
    let Some(caps) = FROM_RE.captures(sql) else {
        return empty_result(mode);
    };
    let rows = tables.rows_or_empty(&caps[1]);

    let mut selected: Vec<Row> = match where_field(sql, params) {
        Some(field) => rows
            .iter()
            .filter(|r| loose_eq(r.get(&field), &params[0]))
            .cloned()
            .collect(),
        None => rows.to_vec(),
    };

    if sql.contains("ORDER BY") {
        if let Some(order) = ORDER_RE.captures(sql) {
            let field = order[1].to_string();
            let desc = order
                .get(2)
                .is_some_and(|d| d.as_str().eq_ignore_ascii_case("DESC"));
            selected.sort_by(|a, b| {
                let ord = compare_keys(a.get(&field), b.get(&field));
                if desc {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
    }

    match mode {
        QueryMode::All => QueryOutput::Rows(selected),
        QueryMode::Get | QueryMode::Run => QueryOutput::Row(selected.into_iter().next()),
    }
}

/// Parses one literal from a VALUES list or SET clause.
fn literal(text: &str) -> Value {
    let text = text.trim();
    if text.contains("CURRENT_TIMESTAMP") {
        return Value::String(now_timestamp());
    }
    if text.eq_ignore_ascii_case("NULL") {
        return Value::Null;
    }
    if let Ok(i) = text.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = text.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    Value::String(text.replace(['\'', '"'], ""))
}

fn insert(tables: &mut Tables, sql: &str, params: &[Value]) -> QueryOutput {
    let Some(caps) = INTO_RE.captures(sql) else {
        return QueryOutput::Inserted { last_insert_rowid: 0 };
    };
    let name = caps[1].to_string();
    let rows = tables.rows_mut_or_create(&name);

    let groups: Vec<&str> = GROUP_RE
        .captures_iter(sql)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .take(2)
        .collect();
    let [columns, placeholders] = groups[..] else {
        return QueryOutput::Inserted { last_insert_rowid: 0 };
    };

    let placeholders: Vec<&str> = placeholders.split(',').map(str::trim).collect();
    let mut params = params.iter();

    let Some(id) = rows.iter().map(row_id).max().unwrap_or(0).checked_add(1) else {
        warn!(table = %name, "Row ids exhausted; insert skipped");
        return QueryOutput::Inserted { last_insert_rowid: 0 };
    };
    let mut row = Row::new();
    row.insert("id".to_string(), Value::from(id));
    for (i, column) in columns.split(',').map(str::trim).enumerate() {
        let value = match placeholders.get(i) {
            Some(&"?") => params.next().cloned().unwrap_or(Value::Null),
            Some(text) => literal(text),
            None => Value::Null,
        };
        if column != "id" {
            row.insert(column.to_string(), value);
        }
    }

    rows.push(row);
    debug!(table = %name, id, "Row inserted via statement");
    QueryOutput::Inserted { last_insert_rowid: id }
}

fn update(tables: &mut Tables, sql: &str, params: &[Value]) -> QueryOutput {
    let Some(caps) = UPDATE_RE.captures(sql) else {
        return QueryOutput::Changed { changes: 0 };
    };
    let name = caps[1].to_string();

    let (Some(field), Some(rows)) = (where_field(sql, params), tables.rows_mut(&name)) else {
        return QueryOutput::Changed { changes: 1 };
    };

    let last = &params[params.len() - 1];
    let target = rows
        .iter_mut()
        .find(|r| loose_eq(r.get("id"), last) || loose_eq(r.get(&field), &params[0]));
    let (Some(row), Some(set)) = (target, SET_RE.captures(sql)) else {
        return QueryOutput::Changed { changes: 1 };
    };

    let mut next_param = params.iter();
    for assignment in set[1].split(',') {
        let parts: Vec<&str> = assignment.split('=').map(str::trim).collect();
        let [column, value] = parts[..] else {
            continue;
        };
        let value = if value == "?" {
            next_param.next().cloned().unwrap_or(Value::Null)
        } else {
            literal(value)
        };
        if column != "id" {
            row.insert(column.to_string(), value);
        }
    }
    debug!(table = %name, id = row_id(row), "Row updated via statement");
    QueryOutput::Changed { changes: 1 }
}

fn delete(tables: &mut Tables, sql: &str, params: &[Value]) -> QueryOutput {
    let Some(caps) = FROM_RE.captures(sql) else {
        return QueryOutput::Changed { changes: 0 };
    };
    let name = caps[1].to_string();
    let (Some(field), Some(rows)) = (where_field(sql, params), tables.rows_mut(&name)) else {
        return QueryOutput::Changed { changes: 0 };
    };

    match rows.iter().position(|r| loose_eq(r.get(&field), &params[0])) {
        Some(index) => {
            rows.remove(index);
            QueryOutput::Changed { changes: 1 }
        }
        None => QueryOutput::Changed { changes: 0 },
    }
}
