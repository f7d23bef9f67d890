/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

//! Schema bootstrap
//! Creates the resources table and any of its missing indexes; existing objects are left untouched
//!
//! MySQL commits every DDL statement on its own, so nothing is wrapped in a
//! transaction. Each object is checked and created separately, which lets a
//! start that failed halfway be completed by the next one.

use log::{error, info};
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, DatabaseBackend, EntityName, Schema, Statement};

use crate::entities::resource_db_model;
use crate::StorageError;

fn migration_failed(e: impl ToString) -> StorageError {
    StorageError::SchemaMigrationFailed(e.to_string())
}

/// `CREATE TABLE IF NOT EXISTS` for the resources table
pub fn create_table_statement(backend: DatabaseBackend) -> Statement {
    let schema = Schema::new(backend);
    let mut table = schema.create_table_from_entity(resource_db_model::Entity);
    table.if_not_exists();
    backend.build(&table)
}

/// `CREATE INDEX` for every secondary index, keyed by index name
pub fn create_index_statements(backend: DatabaseBackend) -> Vec<(&'static str, Statement)> {
    resource_db_model::indexes()
        .into_iter()
        .map(|(name, columns, unique)| {
            let mut index = Index::create();
            index.name(name).table(resource_db_model::Entity);
            for column in columns {
                index.col(column);
            }
            if unique {
                index.unique();
            }
            (name, backend.build(&index))
        })
        .collect()
}

async fn count<C: ConnectionTrait>(db: &C, statement: Statement) -> Result<i64, StorageError> {
    let row = db.query_one(statement).await.map_err(migration_failed)?;
    match row {
        Some(row) => row.try_get("", "count").map_err(migration_failed),
        None => Ok(0),
    }
}

/// Whether `table` exists in the current database (MySQL) or schema (PostgreSQL)
pub async fn table_exists<C: ConnectionTrait>(db: &C, table: &str) -> Result<bool, StorageError> {
    let backend = db.get_database_backend();
    let sql = match backend {
        DatabaseBackend::MySql => {
            "SELECT COUNT(*) AS count FROM information_schema.tables WHERE table_schema = DATABASE() AND table_name = ?"
        }
        DatabaseBackend::Postgres => {
            "SELECT COUNT(*) AS count FROM information_schema.tables WHERE table_schema = CURRENT_SCHEMA() AND table_name = $1"
        }
        _ => return Err(migration_failed(format!("Unsupported database: {:?}", backend))),
    };
    let statement = Statement::from_sql_and_values(backend, sql, [table.into()]);
    Ok(count(db, statement).await? > 0)
}

/// Whether index `index` exists on `table`
pub async fn index_exists<C: ConnectionTrait>(db: &C, table: &str, index: &str) -> Result<bool, StorageError> {
    let backend = db.get_database_backend();
    let sql = match backend {
        DatabaseBackend::MySql => {
            "SELECT COUNT(*) AS count FROM information_schema.statistics WHERE table_schema = DATABASE() AND table_name = ? AND index_name = ?"
        }
        DatabaseBackend::Postgres => {
            "SELECT COUNT(*) AS count FROM pg_indexes WHERE schemaname = CURRENT_SCHEMA() AND tablename = $1 AND indexname = $2"
        }
        _ => return Err(migration_failed(format!("Unsupported database: {:?}", backend))),
    };
    let statement = Statement::from_sql_and_values(backend, sql, [table.into(), index.into()]);
    Ok(count(db, statement).await? > 0)
}

async fn execute_ddl<C: ConnectionTrait>(db: &C, object: &str, statement: Statement) -> Result<(), StorageError> {
    if let Err(e) = db.execute(statement).await {
        error!("Failed to create {}: {}", object, e);
        return Err(migration_failed(e));
    }
    info!("{} created", object);
    Ok(())
}

/// Make sure the resources table and all of its indexes exist, creating whatever is missing.
///
/// Idempotent: against a complete schema only the existence checks run.
/// Existing tables and indexes are never altered.
///
/// # Errors
///
/// * `StorageError::SchemaMigrationFailed` - If a check or any DDL statement fails.
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), StorageError> {
    let backend = db.get_database_backend();
    let table = resource_db_model::Entity.table_name();

    let created = if table_exists(db, table).await? {
        info!("Table {} already exists", table);
        false
    } else {
        info!("Table {} not found, creating it", table);
        execute_ddl(db, &format!("Table {}", table), create_table_statement(backend)).await?;
        true
    };

    for (name, statement) in create_index_statements(backend) {
        // a freshly created table has no secondary indexes yet
        if !created && index_exists(db, table, name).await? {
            continue;
        }
        execute_ddl(db, &format!("Index {}", name), statement).await?;
    }
    info!("Schema of table {} is ready", table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_ddl() {
        let create = create_table_statement(DatabaseBackend::MySql).to_string();
        assert!(create.starts_with("CREATE TABLE IF NOT EXISTS `resources`"));
        for column in [
            "`id`", "`group`", "`version`", "`resource`", "`kind`", "`cluster`", "`namespace`", "`name`",
            "`owner_uid`", "`uid`", "`resource_version`", "`object`", "`created_at`", "`synced_at`", "`deleted_at`",
        ] {
            assert!(create.contains(column), "missing column {}", column);
        }
        assert!(create.contains("varchar(253)"));
        assert!(create.contains("AUTO_INCREMENT"));

        let indexes = create_index_statements(DatabaseBackend::MySql);
        assert_eq!(indexes.len(), 5);
        assert_eq!(indexes[0].0, "uni_group_version_resource_cluster_namespace_name");
        assert!(indexes[0].1.to_string().starts_with("CREATE UNIQUE INDEX `uni_group_version_resource_cluster_namespace_name`"));
    }

    #[test]
    fn test_postgres_ddl() {
        let create = create_table_statement(DatabaseBackend::Postgres).to_string();
        assert!(create.starts_with(r#"CREATE TABLE IF NOT EXISTS "resources""#));
        assert!(create.contains("jsonb"));

        let indexes = create_index_statements(DatabaseBackend::Postgres);
        assert_eq!(indexes[4].0, "idx_resources_owner_uid");
        assert!(indexes[4].1.to_string().contains(r#""idx_resources_owner_uid""#));
    }
}
