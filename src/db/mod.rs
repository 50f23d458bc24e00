mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::models::*;

/// Column order shared by every experiment SELECT, INSERT and UPDATE.
const EXPERIMENT_COLUMNS: &str = "id, title, description, status, category, start_date, end_date, \
     budget, researcher, team, objectives, methodology, expected_outcomes, results, attachments, \
     tags, priority, notes, custom_fields, created_at, updated_at";

/// Handle to the experiment store.
///
/// Cloning is cheap; all clones share one connection, and every operation
/// holds the connection for its whole duration, so single operations are
/// atomic with respect to each other.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        tracing::info!("Opened database at {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "experiment-api")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("experiments.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the store named by a connection string.
    ///
    /// Accepts `:memory:`, `sqlite::memory:`, `sqlite://<path>` or a bare
    /// file path. `None` or an empty string selects the platform data directory.
    pub fn connect(url: Option<&str>) -> Result<Self> {
        match url.map(str::trim) {
            None | Some("") => Self::open_default(),
            Some(":memory:") | Some("sqlite::memory:") => Self::open_memory(),
            Some(url) => Self::open(url.strip_prefix("sqlite://").unwrap_or(url)),
        }
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn()?;
        schema::run_migrations(&conn)
    }

    /// Close the underlying connection.
    ///
    /// If other clones of this handle are still alive the connection stays
    /// open until the last one is dropped.
    pub fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex
                    .into_inner()
                    .map_err(|_| anyhow::anyhow!("database lock poisoned"))?;
                conn.close().map_err(|(_, e)| e)?;
                tracing::info!("Database connection closed");
            }
            Err(_) => {
                tracing::debug!("Database handle still shared; connection closes with the last clone");
            }
        }
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }

    // ============================================================
    // Experiment operations
    // ============================================================

    pub fn create_experiment(&self, input: CreateExperimentInput) -> Result<Experiment> {
        let now = Utc::now();
        let experiment = Experiment {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status,
            category: input.category,
            start_date: input.start_date,
            end_date: input.end_date,
            budget: input.budget,
            researcher: input.researcher,
            team: input.team,
            objectives: input.objectives,
            methodology: input.methodology,
            expected_outcomes: input.expected_outcomes,
            results: input.results,
            attachments: input.attachments,
            tags: input.tags,
            priority: input.priority,
            notes: input.notes,
            custom_fields: input.custom_fields,
            created_at: now,
            updated_at: now,
        };

        let values = row_values(&experiment)?;
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO experiments ({EXPERIMENT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)"
            ),
            params_from_iter(values),
        )?;

        tracing::debug!("Created experiment {}", experiment.id);
        Ok(experiment)
    }

    pub fn get_experiment(&self, id: Uuid) -> Result<Option<Experiment>> {
        let conn = self.conn()?;
        let experiment = conn
            .query_row(
                &format!("SELECT {EXPERIMENT_COLUMNS} FROM experiments WHERE id = ?"),
                [id.to_string()],
                experiment_from_row,
            )
            .optional()?;
        Ok(experiment)
    }

    /// Return one page of experiments matching the query, plus the total
    /// number of matches. Both are read under the same lock.
    pub fn list_experiments(&self, query: &ExperimentQuery) -> Result<Page<Experiment>> {
        let (where_clause, mut params) = filter_clause(&query.filter);
        let conn = self.conn()?;

        let total = count_matching(&conn, &where_clause, &params)?;

        params.push(SqlValue::Integer(i64::from(query.page.limit)));
        // Offsets past i64::MAX cannot match any row; saturate to an empty page.
        params.push(SqlValue::Integer(
            i64::try_from(query.page.offset()).unwrap_or(i64::MAX),
        ));
        let mut stmt = conn.prepare(&format!(
            "SELECT {EXPERIMENT_COLUMNS} FROM experiments{where_clause}{} LIMIT ? OFFSET ?",
            order_clause(&query.sort)
        ))?;
        let items = stmt
            .query_map(params_from_iter(params), experiment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page { items, total })
    }

    pub fn count_experiments(&self, filter: &ExperimentFilter) -> Result<u64> {
        let (where_clause, params) = filter_clause(filter);
        let conn = self.conn()?;
        count_matching(&conn, &where_clause, &params)
    }

    /// Persist every mutable field of an existing experiment and refresh
    /// `updated_at`. Returns `None` if the experiment no longer exists.
    pub fn save_experiment(&self, mut experiment: Experiment) -> Result<Option<Experiment>> {
        experiment.updated_at = Utc::now();
        let values = row_values(&experiment)?;

        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE experiments SET
                title = ?2, description = ?3, status = ?4, category = ?5, start_date = ?6,
                end_date = ?7, budget = ?8, researcher = ?9, team = ?10, objectives = ?11,
                methodology = ?12, expected_outcomes = ?13, results = ?14, attachments = ?15,
                tags = ?16, priority = ?17, notes = ?18, custom_fields = ?19,
                created_at = ?20, updated_at = ?21
             WHERE id = ?1",
            params_from_iter(values),
        )?;

        if rows == 0 {
            return Ok(None);
        }
        tracing::debug!("Updated experiment {}", experiment.id);
        Ok(Some(experiment))
    }

    pub fn delete_experiment(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM experiments WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    /// Remove every experiment. Returns the number removed.
    pub fn delete_all_experiments(&self) -> Result<usize> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM experiments", [])?;
        Ok(rows)
    }

    // ============================================================
    // Statistics
    // ============================================================

    pub fn experiment_stats(&self) -> Result<ExperimentStats> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT status, COUNT(*), AVG(budget)
             FROM experiments GROUP BY status ORDER BY status",
        )?;
        let by_status = stmt
            .query_map([], |row| {
                Ok(StatusStats {
                    status: choice_column(row, 0)?,
                    count: count_column(row, 1)?,
                    avg_budget: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT category, COUNT(*)
             FROM experiments GROUP BY category ORDER BY category",
        )?;
        let by_category = stmt
            .query_map([], |row| {
                Ok(CategoryStats {
                    category: choice_column(row, 0)?,
                    count: count_column(row, 1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let total = count_matching(&conn, "", &[])?;

        Ok(ExperimentStats {
            by_status,
            by_category,
            total,
        })
    }
}

// ============================================================
// Query construction
// ============================================================

fn filter_clause(filter: &ExperimentFilter) -> (String, Vec<SqlValue>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    if let Some(status) = &filter.status {
        conditions.push("status = ?");
        params.push(SqlValue::Text(status.clone()));
    }
    if let Some(category) = &filter.category {
        conditions.push("category = ?");
        params.push(SqlValue::Text(category.clone()));
    }
    if let Some(researcher) = &filter.researcher {
        // instr() keeps the term literal; LIKE would treat % and _ as wildcards.
        conditions.push("instr(lower(researcher), lower(?)) > 0");
        params.push(SqlValue::Text(researcher.clone()));
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

fn order_clause(sort: &[SortKey]) -> String {
    let mut terms: Vec<String> = sort
        .iter()
        .map(|key| {
            let direction = if key.descending { "DESC" } else { "ASC" };
            format!("{} {}", sort_column(key.field), direction)
        })
        .collect();

    // Rows with equal keys keep insertion order in the primary direction.
    let tie_break = match sort.first() {
        Some(key) if !key.descending => "rowid ASC",
        _ => "rowid DESC",
    };
    terms.push(tie_break.to_string());

    format!(" ORDER BY {}", terms.join(", "))
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Title => "title",
        SortField::Status => "status",
        SortField::Category => "category",
        SortField::StartDate => "start_date",
        SortField::EndDate => "end_date",
        SortField::Budget => "budget",
        SortField::Researcher => "researcher",
        SortField::Priority => "priority",
    }
}

fn count_matching(conn: &Connection, where_clause: &str, params: &[SqlValue]) -> Result<u64> {
    let total = conn.query_row(
        &format!("SELECT COUNT(*) FROM experiments{where_clause}"),
        params_from_iter(params),
        |row| count_column(row, 0),
    )?;
    Ok(total)
}

// ============================================================
// Row conversion
// ============================================================

#[derive(Debug, thiserror::Error)]
#[error("unknown stored value '{0}'")]
struct UnknownValue(String);

fn row_values(experiment: &Experiment) -> Result<Vec<SqlValue>> {
    Ok(vec![
        SqlValue::Text(experiment.id.to_string()),
        SqlValue::Text(experiment.title.clone()),
        SqlValue::Text(experiment.description.clone()),
        SqlValue::Text(experiment.status.as_str().to_string()),
        SqlValue::Text(experiment.category.as_str().to_string()),
        SqlValue::Text(timestamp(&experiment.start_date)),
        optional_text(experiment.end_date.as_ref().map(timestamp)),
        SqlValue::Real(experiment.budget),
        SqlValue::Text(experiment.researcher.clone()),
        SqlValue::Text(to_json(&experiment.team)?),
        SqlValue::Text(to_json(&experiment.objectives)?),
        optional_text(experiment.methodology.clone()),
        optional_text(experiment.expected_outcomes.clone()),
        optional_text(experiment.results.as_ref().map(to_json).transpose()?),
        SqlValue::Text(to_json(&experiment.attachments)?),
        SqlValue::Text(to_json(&experiment.tags)?),
        SqlValue::Text(experiment.priority.as_str().to_string()),
        optional_text(experiment.notes.clone()),
        optional_text(experiment.custom_fields.as_ref().map(to_json).transpose()?),
        SqlValue::Text(timestamp(&experiment.created_at)),
        SqlValue::Text(timestamp(&experiment.updated_at)),
    ])
}

fn experiment_from_row(row: &Row<'_>) -> rusqlite::Result<Experiment> {
    Ok(Experiment {
        id: uuid_column(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: choice_column(row, 3)?,
        category: choice_column(row, 4)?,
        start_date: timestamp_column(row, 5)?,
        end_date: optional_timestamp_column(row, 6)?,
        budget: row.get(7)?,
        researcher: row.get(8)?,
        team: json_column(row, 9)?,
        objectives: json_column(row, 10)?,
        methodology: row.get(11)?,
        expected_outcomes: row.get(12)?,
        results: optional_json_column(row, 13)?,
        attachments: json_column(row, 14)?,
        tags: json_column(row, 15)?,
        priority: choice_column(row, 16)?,
        notes: row.get(17)?,
        custom_fields: optional_json_column(row, 18)?,
        created_at: timestamp_column(row, 19)?,
        updated_at: timestamp_column(row, 20)?,
    })
}

/// Fixed-width UTC timestamps. Validation keeps years within 0000..=9999, so
/// values are lossless and ordered the same as text and as time.
fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn optional_text(value: Option<String>) -> SqlValue {
    value.map_or(SqlValue::Null, SqlValue::Text)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("Failed to encode column value")
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn choice_column<T: Choice>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    T::from_str(&raw).ok_or_else(|| conversion_error(idx, UnknownValue(raw)))
}

fn count_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let count: i64 = row.get(idx)?;
    Ok(u64::try_from(count).unwrap_or(0))
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(idx, &raw)
}

fn optional_timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| parse_timestamp(idx, &raw)).transpose()
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn optional_json_column<T: DeserializeOwned>(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e)))
        .transpose()
}
