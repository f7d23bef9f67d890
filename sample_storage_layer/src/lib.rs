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

//! Sample storage layer
//! Builds a pooled MySQL or PostgreSQL connection with the resources table in place

pub mod config;
pub mod error;
pub mod dialect;
pub mod rdb_many_types {
    pub mod postgresql;
    pub mod mysql;
}
pub mod entities {
    pub mod resource_db_model;
}
pub mod pool;
pub mod schema;
pub mod connection;
pub mod register;

pub use config::{Config, PoolConfig, PoolSettings, StorageType};
pub use connection::{new_storage_factory, FactoryState, StorageFactory};
pub use dialect::{resolve, DialectConnector};
pub use error::StorageError;
pub use pool::apply_pool_config;
pub use register::{register_storage_layer, STORAGE_NAME};
pub use schema::ensure_schema;
