//! Filter and pagination SQL builder.
//!
//! # Invariants
//! - Filters combine with AND; an absent criterion adds no clause, so it
//!   matches every row (never "match NULL").
//! - Ordering always ends with `<table>.id ASC` so equal sort keys page
//!   deterministically.
//! - Only allow-listed sort fields reach SQL, through `SortColumn`.

use super::RepoResult;
use crate::model::note::NoteFilter;
use crate::model::page::{NoteSortField, Page, PageSpec, Sort, SortDirection, TaskSortField};
use crate::model::task::TaskFilter;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

/// Maps an allow-listed sort field to its SQL ordering expression.
pub(crate) trait SortColumn: Copy {
    fn order_expr(self) -> &'static str;
}

impl SortColumn for NoteSortField {
    fn order_expr(self) -> &'static str {
        match self {
            Self::Title => "notes.title",
            Self::CreatedAt => "notes.created_at",
            Self::UpdatedAt => "notes.updated_at",
        }
    }
}

impl SortColumn for TaskSortField {
    fn order_expr(self) -> &'static str {
        match self {
            Self::DueDate => "tasks.due_date",
            Self::CreatedAt => "tasks.created_at",
            Self::UpdatedAt => "tasks.updated_at",
            Self::Priority => {
                "CASE tasks.priority WHEN 'LOW' THEN 0 WHEN 'MEDIUM' THEN 1 ELSE 2 END"
            }
            Self::Status => {
                "CASE tasks.status WHEN 'TODO' THEN 0 WHEN 'IN_PROGRESS' THEN 1 ELSE 2 END"
            }
        }
    }
}

/// Conjunctive WHERE fragment plus its positional bind values.
#[derive(Debug, Default)]
pub(crate) struct FilterSql {
    clause: String,
    binds: Vec<Value>,
}

impl FilterSql {
    pub(crate) fn unfiltered() -> Self {
        Self::default()
    }

    fn and(&mut self, predicate: &str, value: Value) {
        self.clause.push_str(" AND ");
        self.clause.push_str(predicate);
        self.binds.push(value);
    }
}

pub(crate) fn note_filter_sql(filter: &NoteFilter) -> FilterSql {
    let mut sql = FilterSql::unfiltered();
    if let Some(category_name) = filter.category_name() {
        sql.and(
            "EXISTS (
                SELECT 1
                FROM categories c
                WHERE c.id = notes.category_id
                  AND c.name = ?
            )",
            Value::Text(category_name.to_string()),
        );
    }
    if let Some(tag_name) = filter.tag_name() {
        sql.and(
            "EXISTS (
                SELECT 1
                FROM note_tags nt
                INNER JOIN tags t ON t.id = nt.tag_id
                WHERE nt.note_id = notes.id
                  AND t.name = ?
            )",
            Value::Text(tag_name.to_string()),
        );
    }
    sql
}

pub(crate) fn task_filter_sql(filter: &TaskFilter) -> FilterSql {
    let mut sql = FilterSql::unfiltered();
    if let Some(status) = filter.status {
        sql.and(
            "tasks.status = ?",
            Value::Text(super::task_repo::status_to_db(status).to_string()),
        );
    }
    if let Some(category_id) = filter.category_id {
        sql.and("tasks.category_id = ?", Value::Integer(category_id));
    }
    if let Some(tag_name) = filter.tag_name() {
        sql.and(
            "EXISTS (
                SELECT 1
                FROM task_tags tt
                INNER JOIN tags t ON t.id = tt.tag_id
                WHERE tt.task_id = tasks.id
                  AND t.name = ?
            )",
            Value::Text(tag_name.to_string()),
        );
    }
    if let Some(note_id) = filter.note_id {
        sql.and("tasks.note_id = ?", Value::Integer(note_id));
    }
    sql
}

pub(crate) fn order_by_sql<F: SortColumn>(sort: Sort<F>, table: &str) -> String {
    let direction = match sort.direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    format!(
        " ORDER BY {} {direction}, {table}.id ASC",
        sort.field.order_expr()
    )
}

/// Runs a count query and one ordered, limited select for the same filter.
///
/// `select_sql` must select from `table` (joins allowed) without a WHERE
/// clause; the filter clause is appended to both statements.
pub(crate) fn fetch_page<F, T>(
    conn: &Connection,
    table: &str,
    select_sql: &str,
    filter: FilterSql,
    page: &PageSpec<F>,
    mut parse_row: impl FnMut(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Page<T>>
where
    F: SortColumn,
{
    let count_sql = format!("SELECT COUNT(*) FROM {table} WHERE 1 = 1{}", filter.clause);
    let total: i64 = conn.query_row(&count_sql, params_from_iter(filter.binds.iter()), |row| {
        row.get(0)
    })?;

    let mut sql = format!("{select_sql} WHERE 1 = 1{}", filter.clause);
    sql.push_str(&order_by_sql(page.sort, table));
    sql.push_str(" LIMIT ? OFFSET ?");

    let mut binds = filter.binds;
    binds.push(Value::Integer(i64::from(page.size)));
    binds.push(Value::Integer(
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    ));

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(binds))?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_row(row)?);
    }

    Ok(Page::new(
        items,
        page.page,
        page.size,
        u64::try_from(total).unwrap_or(0),
    ))
}

#[cfg(test)]
mod tests {
    use super::{note_filter_sql, order_by_sql, task_filter_sql};
    use crate::model::note::NoteFilter;
    use crate::model::page::{NoteSortField, Sort, TaskSortField};
    use crate::model::task::{TaskFilter, TaskStatus};

    #[test]
    fn empty_filters_add_no_clause() {
        assert!(note_filter_sql(&NoteFilter::default()).clause.is_empty());
        assert!(task_filter_sql(&TaskFilter::default()).binds.is_empty());

        let blank = NoteFilter {
            category_name: Some("  ".to_string()),
            tag_name: Some(String::new()),
        };
        assert!(note_filter_sql(&blank).clause.is_empty());
    }

    #[test]
    fn each_present_criterion_adds_one_bound_predicate() {
        let filter = TaskFilter::new(
            Some(TaskStatus::Done),
            Some(3),
            Some("Work".to_string()),
            Some(9),
        );
        let sql = task_filter_sql(&filter);
        assert_eq!(sql.binds.len(), 4);
        assert!(sql.clause.starts_with(" AND tasks.status = ?"));
        assert!(sql.clause.ends_with(" AND tasks.note_id = ?"));
    }

    #[test]
    fn order_always_breaks_ties_by_id() {
        let order = order_by_sql(Sort::desc(NoteSortField::UpdatedAt), "notes");
        assert_eq!(order, " ORDER BY notes.updated_at DESC, notes.id ASC");

        let order = order_by_sql(Sort::asc(TaskSortField::Priority), "tasks");
        assert!(order.ends_with("END ASC, tasks.id ASC"));
    }
}
