// ============================================================================
// SBT Infrastructure - PostgreSQL Record Store
// File: crates/sbt-infrastructure/src/database/postgres/record_store_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{error, info};

use sbt_core::domain::{Record, TableSpec};
use sbt_core::error::DomainError;
use sbt_core::repositories::{PutCondition, RecordStore, ScanPage};
use sbt_core::update::UpdateExpression;

/// Records stored as JSONB documents, one `(id, item)` table per kind.
///
/// Table names come from the static [`TableSpec`] descriptors; attribute
/// names and values are always bound as parameters.
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_error(context: &'static str, table: &TableSpec) -> impl FnOnce(sqlx::Error) -> DomainError {
    let table_name = table.name;
    move |e| {
        error!("Database error {} in {}: {}", context, table_name, e);
        DomainError::StorageError(e.to_string())
    }
}

/// `UPDATE .. SET item = jsonb_set(jsonb_set(item, ..), ..)` with `$1` bound
/// to the key and each clause bound as a `(name, value)` parameter pair.
pub(crate) fn render_update(table: &TableSpec, expression: &UpdateExpression) -> String {
    let target = (0..expression.len()).fold("item".to_string(), |inner, i| {
        let name_param = 2 + i * 2;
        format!(
            "jsonb_set({}, ARRAY[${}::text], ${}::jsonb, true)",
            inner,
            name_param,
            name_param + 1
        )
    });
    format!("UPDATE {} SET item = {} WHERE id = $1 RETURNING item", table.name, target)
}

pub(crate) fn render_get(table: &TableSpec) -> String {
    format!("SELECT item FROM {} WHERE id = $1", table.name)
}

/// `KeyNotExists` inserts nothing on conflict, so zero affected rows means the
/// key was taken.
pub(crate) fn render_put(table: &TableSpec, condition: PutCondition) -> String {
    let conflict = match condition {
        PutCondition::Overwrite => "DO UPDATE SET item = EXCLUDED.item",
        PutCondition::KeyNotExists => "DO NOTHING",
    };
    format!(
        "INSERT INTO {} (id, item) VALUES ($1, $2) ON CONFLICT (id) {}",
        table.name, conflict
    )
}

/// Keyset page: `$1` is the exclusive start key (or NULL), `$2` the row limit.
pub(crate) fn render_scan(table: &TableSpec) -> String {
    format!(
        "SELECT id, item FROM {} WHERE ($1::text IS NULL OR id > $1) ORDER BY id LIMIT $2",
        table.name
    )
}

/// Rows were fetched with `limit + 1`; an extra row means another page exists
/// and the last kept id becomes the token.
pub(crate) fn split_page(mut rows: Vec<(String, Record)>, limit: usize) -> ScanPage {
    let next_token = if rows.len() > limit {
        rows.truncate(limit);
        rows.last().map(|(id, _)| id.clone())
    } else {
        None
    };
    ScanPage::new(rows.into_iter().map(|(_, record)| record).collect(), next_token)
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn get(&self, table: &TableSpec, key: &str) -> Result<Option<Record>, DomainError> {
        let sql = render_get(table);
        let item: Option<Json<Record>> = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("fetching record", table))?;

        Ok(item.map(|Json(record)| record))
    }

    async fn put(&self, table: &TableSpec, record: Record, condition: PutCondition) -> Result<(), DomainError> {
        let key = record
            .key(table)
            .ok_or_else(|| DomainError::validation(format!("Record is missing {}", table.key_field)))?
            .to_string();

        let sql = render_put(table, condition);
        let result = sqlx::query(&sql)
            .bind(&key)
            .bind(Json(&record))
            .execute(&self.pool)
            .await
            .map_err(storage_error("writing record", table))?;

        if result.rows_affected() == 0 {
            info!("Record {} already exists in {}", key, table.name);
            return Err(DomainError::RecordAlreadyExists { table: table.name, key });
        }
        Ok(())
    }

    async fn update(
        &self,
        table: &TableSpec,
        key: &str,
        expression: &UpdateExpression,
    ) -> Result<Record, DomainError> {
        let sql = render_update(table, expression);

        let mut query = sqlx::query_scalar::<_, Json<Record>>(&sql).bind(key);
        for clause in expression.clauses() {
            query = query
                .bind(clause.name().as_str())
                .bind(Json(clause.value().clone()));
        }

        let item = query
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("updating record", table))?;

        item.map(|Json(record)| record)
            .ok_or_else(|| DomainError::not_found(table.name, key))
    }

    async fn scan(
        &self,
        table: &TableSpec,
        limit: usize,
        start_key: Option<String>,
    ) -> Result<ScanPage, DomainError> {
        let sql = render_scan(table);
        let rows: Vec<(String, Json<Record>)> = sqlx::query_as(&sql)
            .bind(start_key)
            .bind(limit as i64 + 1)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("scanning", table))?;

        let rows = rows.into_iter().map(|(id, Json(record))| (id, record)).collect();
        Ok(split_page(rows, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbt_core::domain::{BILLING_RECORDS, TENANTS};
    use sbt_core::update::AttributeName;

    fn rows(ids: &[&str]) -> Vec<(String, Record)> {
        ids.iter()
            .map(|id| (id.to_string(), Record::keyed(&TENANTS, *id, Default::default())))
            .collect()
    }

    #[test]
    fn test_render_get_and_scan_target_table() {
        assert_eq!(render_get(&TENANTS), "SELECT item FROM tenant_details WHERE id = $1");
        assert_eq!(
            render_scan(&BILLING_RECORDS),
            "SELECT id, item FROM billing_records WHERE ($1::text IS NULL OR id > $1) ORDER BY id LIMIT $2"
        );
    }

    #[test]
    fn test_render_put_conflict_clause_follows_condition() {
        assert_eq!(
            render_put(&TENANTS, PutCondition::KeyNotExists),
            "INSERT INTO tenant_details (id, item) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING"
        );
        assert!(render_put(&TENANTS, PutCondition::Overwrite).ends_with("DO UPDATE SET item = EXCLUDED.item"));
    }

    #[test]
    fn test_split_page_sets_token_only_when_rows_remain() {
        let page = split_page(rows(&["a", "b", "c"]), 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_token.as_deref(), Some("b"));

        let last = split_page(rows(&["c"]), 2);
        assert_eq!(last.items.len(), 1);
        assert!(last.next_token.is_none());

        let exact = split_page(rows(&["a", "b"]), 2);
        assert!(exact.next_token.is_none());
    }

    #[test]
    fn test_render_update_binds_every_clause() {
        let expression = UpdateExpression::builder()
            .set(AttributeName::parse("name").unwrap(), "Acme Corp")
            .set(AttributeName::parse("sbtaws_active").unwrap(), false)
            .build()
            .unwrap();

        assert_eq!(
            render_update(&TENANTS, &expression),
            "UPDATE tenant_details SET item = jsonb_set(jsonb_set(item, ARRAY[$2::text], $3::jsonb, true), \
             ARRAY[$4::text], $5::jsonb, true) WHERE id = $1 RETURNING item"
        );
    }
}
