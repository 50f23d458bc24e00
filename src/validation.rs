//! Request payload validation.
//!
//! Validation never fails with an error: it returns either a typed input from
//! [`crate::models`] or every [`FieldViolation`] found in the payload. Unknown
//! fields are dropped silently.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{validate_email, validate_length, validate_range};

use crate::models::*;

pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const LONG_TEXT_MAX_LEN: usize = 2000;
pub const NOTES_MAX_LEN: usize = 1000;

/// A single problem with a request, addressed by dotted field path
/// (`title`, `team.1.email`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a create payload, applying defaults for omitted optional fields.
pub fn validate_create(raw: &Value) -> Result<CreateExperimentInput, Vec<FieldViolation>> {
    let mut fields = Fields::new(object(raw)?);

    let title = fields.text("title", Presence::Required, Text::trimmed(TITLE_MAX_LEN));
    let description = fields.text(
        "description",
        Presence::Required,
        Text::max(DESCRIPTION_MAX_LEN),
    );
    let status = fields.choice::<ExperimentStatus>("status", Presence::Optional);
    let category = fields.choice::<Category>("category", Presence::Required);
    let start_date = fields.date("startDate", Presence::Required);
    let end_date = fields.nullable_date("endDate").flatten();
    fields.check_date_order(start_date, end_date);
    let budget = fields.budget();
    let researcher = fields.text("researcher", Presence::Required, Text::any());
    let team = fields.team();
    let objectives = fields.string_list("objectives");
    let methodology = fields.text("methodology", Presence::Optional, Text::max(LONG_TEXT_MAX_LEN));
    let expected_outcomes = fields.text(
        "expectedOutcomes",
        Presence::Optional,
        Text::max(LONG_TEXT_MAX_LEN),
    );
    let results = fields.results();
    let attachments = fields.attachments();
    let tags = fields.string_list("tags").map(dedup);
    let priority = fields.choice::<Priority>("priority", Presence::Optional);
    let notes = fields.text("notes", Presence::Optional, Text::max(NOTES_MAX_LEN));
    let custom_fields = fields.any("customFields");

    match (title, description, category, start_date, researcher) {
        (Some(title), Some(description), Some(category), Some(start_date), Some(researcher))
            if fields.violations.is_empty() =>
        {
            Ok(CreateExperimentInput {
                title,
                description,
                status: status.unwrap_or_default(),
                category,
                start_date,
                end_date,
                budget: budget.unwrap_or(0.0),
                researcher,
                team: team.unwrap_or_default(),
                objectives: objectives.unwrap_or_default(),
                methodology,
                expected_outcomes,
                results,
                attachments: attachments.unwrap_or_default(),
                tags: tags.unwrap_or_default(),
                priority: priority.unwrap_or_default(),
                notes,
                custom_fields: custom_fields.filter(|v| !v.is_null()),
            })
        }
        _ => Err(fields.violations),
    }
}

/// Validate a partial update. At least one known field must be present.
pub fn validate_update(raw: &Value) -> Result<UpdateExperimentInput, Vec<FieldViolation>> {
    let mut fields = Fields::new(object(raw)?);

    let start_date = fields.date("startDate", Presence::Optional);
    let end_date = fields.nullable_date("endDate");
    fields.check_date_order(start_date, end_date.flatten());

    let input = UpdateExperimentInput {
        title: fields.text("title", Presence::Optional, Text::trimmed(TITLE_MAX_LEN)),
        description: fields.text(
            "description",
            Presence::Optional,
            Text::max(DESCRIPTION_MAX_LEN),
        ),
        status: fields.choice("status", Presence::Optional),
        category: fields.choice("category", Presence::Optional),
        start_date,
        end_date,
        budget: fields.budget(),
        researcher: fields.text("researcher", Presence::Optional, Text::any()),
        team: fields.team(),
        objectives: fields.string_list("objectives"),
        methodology: fields.text("methodology", Presence::Optional, Text::max(LONG_TEXT_MAX_LEN)),
        expected_outcomes: fields.text(
            "expectedOutcomes",
            Presence::Optional,
            Text::max(LONG_TEXT_MAX_LEN),
        ),
        results: fields.results(),
        attachments: fields.attachments(),
        tags: fields.string_list("tags").map(dedup),
        priority: fields.choice("priority", Presence::Optional),
        notes: fields.text("notes", Presence::Optional, Text::max(NOTES_MAX_LEN)),
        custom_fields: fields.any("customFields"),
    };

    if !fields.violations.is_empty() {
        return Err(fields.violations);
    }
    if input.is_empty() {
        return Err(vec![FieldViolation::new("body", "No fields to update")]);
    }
    Ok(input)
}

impl UpdateExperimentInput {
    /// Merge this update into a stored experiment.
    ///
    /// The date order is checked against the merged record, so an update that
    /// only moves `endDate` is compared with the stored `startDate`. The
    /// experiment is left untouched on failure.
    pub fn apply_to(self, experiment: &mut Experiment) -> Result<(), Vec<FieldViolation>> {
        let start_date = self.start_date.unwrap_or(experiment.start_date);
        let end_date = match self.end_date {
            Some(end_date) => end_date,
            None => experiment.end_date,
        };
        if let Some(end_date) = end_date {
            if end_date < start_date {
                let violation = if self.end_date.is_some() {
                    end_before_start()
                } else {
                    FieldViolation::new(
                        "startDate",
                        "\"startDate\" must be less than or equal to \"endDate\"",
                    )
                };
                return Err(vec![violation]);
            }
        }

        experiment.start_date = start_date;
        experiment.end_date = end_date;
        if let Some(title) = self.title {
            experiment.title = title;
        }
        if let Some(description) = self.description {
            experiment.description = description;
        }
        if let Some(status) = self.status {
            experiment.status = status;
        }
        if let Some(category) = self.category {
            experiment.category = category;
        }
        if let Some(budget) = self.budget {
            experiment.budget = budget;
        }
        if let Some(researcher) = self.researcher {
            experiment.researcher = researcher;
        }
        if let Some(team) = self.team {
            experiment.team = team;
        }
        if let Some(objectives) = self.objectives {
            experiment.objectives = objectives;
        }
        if let Some(methodology) = self.methodology {
            experiment.methodology = Some(methodology);
        }
        if let Some(expected_outcomes) = self.expected_outcomes {
            experiment.expected_outcomes = Some(expected_outcomes);
        }
        if let Some(results) = self.results {
            experiment.results = Some(results);
        }
        if let Some(attachments) = self.attachments {
            experiment.attachments = attachments;
        }
        if let Some(tags) = self.tags {
            experiment.tags = tags;
        }
        if let Some(priority) = self.priority {
            experiment.priority = priority;
        }
        if let Some(notes) = self.notes {
            experiment.notes = Some(notes);
        }
        if let Some(custom_fields) = self.custom_fields {
            // An explicit null clears the stored value.
            experiment.custom_fields = Some(custom_fields).filter(|v| !v.is_null());
        }
        Ok(())
    }
}

/// Parse list query parameters into a filter, sort order and page.
///
/// Empty parameters are treated as absent. `status` and `category` are not
/// checked against the known values; an unknown value simply matches nothing.
pub fn validate_list_query(
    query: &ListExperimentsQuery,
) -> Result<ExperimentQuery, Vec<FieldViolation>> {
    let mut violations = Vec::new();

    let page = positive_param("page", query.page.as_deref(), 1, &mut violations);
    let limit = positive_param("limit", query.limit.as_deref(), DEFAULT_LIMIT, &mut violations);
    let sort = match SortKey::parse_list(query.sort_by.as_deref().unwrap_or_default()) {
        Ok(keys) => keys,
        Err(key) => {
            violations.push(FieldViolation::new(
                "sortBy",
                format!("\"{key}\" is not a sortable field"),
            ));
            Vec::new()
        }
    };

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(ExperimentQuery {
        filter: ExperimentFilter {
            status: non_empty(&query.status),
            category: non_empty(&query.category),
            researcher: non_empty(&query.researcher),
        },
        sort,
        page: PageRequest { page, limit },
    })
}

fn positive_param(
    name: &str,
    raw: Option<&str>,
    default: u32,
    violations: &mut Vec<FieldViolation>,
) -> u32 {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return default,
    };
    match raw.parse::<u32>() {
        Ok(0) => {
            violations.push(FieldViolation::new(
                name,
                format!("\"{name}\" must be greater than or equal to 1"),
            ));
            default
        }
        Ok(value) => value,
        Err(_) => {
            violations.push(FieldViolation::new(
                name,
                format!("\"{name}\" must be a positive integer"),
            ));
            default
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn object(raw: &Value) -> Result<&Map<String, Value>, Vec<FieldViolation>> {
    raw.as_object()
        .ok_or_else(|| vec![FieldViolation::new("body", "\"body\" must be of type object")])
}

fn end_before_start() -> FieldViolation {
    FieldViolation::new(
        "endDate",
        "\"endDate\" must be greater than or equal to \"startDate\"",
    )
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

/// Rules for a string field.
#[derive(Clone, Copy)]
struct Text {
    max_len: Option<usize>,
    trim: bool,
}

impl Text {
    fn any() -> Self {
        Self {
            max_len: None,
            trim: false,
        }
    }

    fn max(max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            trim: false,
        }
    }

    fn trimmed(max_len: usize) -> Self {
        Self {
            max_len: Some(max_len),
            trim: true,
        }
    }
}

/// Reads typed values out of a JSON object, recording a violation for each
/// field that does not fit its rules.
struct Fields<'a> {
    obj: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> Fields<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        Self {
            obj,
            violations: Vec::new(),
        }
    }

    fn get(&mut self, key: &str, presence: Presence) -> Option<&'a Value> {
        let obj: &'a Map<String, Value> = self.obj;
        let value = obj.get(key);
        if value.is_none() && presence == Presence::Required {
            self.violations
                .push(FieldViolation::new(key, format!("\"{key}\" is required")));
        }
        value
    }

    fn record<T>(&mut self, result: Result<T, FieldViolation>) -> Option<T> {
        result.map_err(|v| self.violations.push(v)).ok()
    }

    fn text(&mut self, key: &str, presence: Presence, rules: Text) -> Option<String> {
        let value = self.get(key, presence)?;
        self.record(text_value(key, value, rules))
    }

    fn choice<T: Choice>(&mut self, key: &str, presence: Presence) -> Option<T> {
        let value = self.get(key, presence)?;
        let parsed = value.as_str().and_then(T::from_str).ok_or_else(|| {
            let allowed: Vec<&str> = T::ALL.iter().map(|v| v.as_str()).collect();
            FieldViolation::new(
                key,
                format!("\"{key}\" must be one of [{}]", allowed.join(", ")),
            )
        });
        self.record(parsed)
    }

    fn date(&mut self, key: &str, presence: Presence) -> Option<DateTime<Utc>> {
        let value = self.get(key, presence)?;
        self.record(date_value(key, value))
    }

    /// `None` when absent, `Some(None)` for an explicit null.
    fn nullable_date(&mut self, key: &str) -> Option<Option<DateTime<Utc>>> {
        match self.get(key, Presence::Optional)? {
            Value::Null => Some(None),
            value => self.record(date_value(key, value)).map(Some),
        }
    }

    fn check_date_order(&mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) {
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                self.violations.push(end_before_start());
            }
        }
    }

    fn budget(&mut self) -> Option<f64> {
        let value = self.get("budget", Presence::Optional)?;
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite());

        let checked = match number {
            None => Err(FieldViolation::new("budget", "\"budget\" must be a number")),
            Some(n) if !validate_range(n, Some(0.0), None) => Err(FieldViolation::new(
                "budget",
                "\"budget\" must be greater than or equal to 0",
            )),
            Some(n) => Ok(n),
        };
        self.record(checked)
    }

    fn array(&mut self, key: &str) -> Option<&'a Vec<Value>> {
        let value = self.get(key, Presence::Optional)?;
        let items = value
            .as_array()
            .ok_or_else(|| FieldViolation::new(key, format!("\"{key}\" must be an array")));
        self.record(items)
    }

    fn string_list(&mut self, key: &str) -> Option<Vec<String>> {
        let items = self.array(key)?;
        let before = self.violations.len();
        let values: Vec<String> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let parsed = text_value(&format!("{key}.{i}"), item, Text::any());
                self.record(parsed)
            })
            .collect();
        (self.violations.len() == before).then_some(values)
    }

    fn team(&mut self) -> Option<Vec<TeamMember>> {
        let items = self.array("team")?;
        let before = self.violations.len();
        let mut team = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("team.{i}");
            let Some(member) = self.record(object_value(&path, item)) else {
                continue;
            };
            let mut member_fields = NestedFields::new(self, &path, member);
            let name = member_fields.text("name");
            let role = member_fields.text("role");
            let email = member_fields.text("email");
            if let Some(email) = email.as_deref() {
                if !is_email(email) {
                    self.violations.push(FieldViolation::new(
                        format!("{path}.email"),
                        format!("\"{path}.email\" must be a valid email"),
                    ));
                }
            }
            team.push(TeamMember { name, role, email });
        }
        (self.violations.len() == before).then_some(team)
    }

    fn attachments(&mut self) -> Option<Vec<Attachment>> {
        let items = self.array("attachments")?;
        let before = self.violations.len();
        let now = Utc::now();
        let mut attachments = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("attachments.{i}");
            let Some(attachment) = self.record(object_value(&path, item)) else {
                continue;
            };
            let mut nested = NestedFields::new(self, &path, attachment);
            let filename = nested.text("filename");
            let url = nested.text("url");
            let uploaded_at = nested.date("uploadedAt").unwrap_or(now);
            attachments.push(Attachment {
                filename,
                url,
                uploaded_at,
            });
        }
        (self.violations.len() == before).then_some(attachments)
    }

    fn results(&mut self) -> Option<ExperimentResults> {
        let value = self.get("results", Presence::Optional)?;
        let results = self.record(object_value("results", value))?;
        let before = self.violations.len();
        let mut nested = NestedFields::new(self, "results", results);
        let status = nested.text("status");
        let findings = nested.text("findings");
        let metrics = results.get("metrics").filter(|v| !v.is_null()).cloned();
        (self.violations.len() == before).then_some(ExperimentResults {
            status,
            findings,
            metrics,
        })
    }

    fn any(&mut self, key: &str) -> Option<Value> {
        self.get(key, Presence::Optional).cloned()
    }
}

/// Optional fields of an object nested inside the payload.
struct NestedFields<'f, 'a> {
    parent: &'f mut Fields<'a>,
    path: String,
    obj: &'a Map<String, Value>,
}

impl<'f, 'a> NestedFields<'f, 'a> {
    fn new(parent: &'f mut Fields<'a>, path: &str, obj: &'a Map<String, Value>) -> Self {
        Self {
            parent,
            path: path.to_string(),
            obj,
        }
    }

    fn text(&mut self, key: &str) -> Option<String> {
        let value = self.obj.get(key)?;
        let parsed = text_value(&format!("{}.{key}", self.path), value, Text::any());
        self.parent.record(parsed)
    }

    fn date(&mut self, key: &str) -> Option<DateTime<Utc>> {
        let value = self.obj.get(key)?;
        let parsed = date_value(&format!("{}.{key}", self.path), value);
        self.parent.record(parsed)
    }
}

fn object_value<'a>(path: &str, value: &'a Value) -> Result<&'a Map<String, Value>, FieldViolation> {
    value
        .as_object()
        .ok_or_else(|| FieldViolation::new(path, format!("\"{path}\" must be of type object")))
}

fn text_value(path: &str, value: &Value, rules: Text) -> Result<String, FieldViolation> {
    let Some(raw) = value.as_str() else {
        return Err(FieldViolation::new(path, format!("\"{path}\" must be a string")));
    };
    let text = if rules.trim { raw.trim() } else { raw };
    if text.is_empty() {
        return Err(FieldViolation::new(
            path,
            format!("\"{path}\" is not allowed to be empty"),
        ));
    }
    if let Some(max) = rules.max_len {
        if !validate_length(text, None, Some(max as u64), None) {
            return Err(FieldViolation::new(
                path,
                format!("\"{path}\" length must be less than or equal to {max} characters long"),
            ));
        }
    }
    Ok(text.to_string())
}

fn date_value(path: &str, value: &Value) -> Result<DateTime<Utc>, FieldViolation> {
    let parsed = match value {
        Value::String(s) => parse_date(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    parsed
        .filter(|dt| (0..=9999).contains(&dt.year()))
        .ok_or_else(|| FieldViolation::new(path, format!("\"{path}\" must be a valid date")))
}

/// Accepts RFC 3339, `YYYY-MM-DD` and naive `YYYY-MM-DDTHH:MM:SS[.f]` (as UTC).
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.and_utc())
}

/// An HTML5 email address whose domain has at least two labels.
fn is_email(s: &str) -> bool {
    validate_email(s) && s.rsplit_once('@').is_some_and(|(_, domain)| domain.contains('.'))
}
