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

// Storage factory trait definitions

use std::any::Any;

use futures::future::BoxFuture;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Handle produced by a storage layer, consumed by the storage interface layer
pub trait StorageFactory: Send + Sync {
    /// Name the producing storage layer is registered under
    fn storage_name(&self) -> &str;

    /// Access to the concrete handle
    fn as_any(&self) -> &dyn Any;
}

/// Constructor registered by a storage layer, taking the configuration path
pub type NewStorageFactoryFn = fn(String) -> BoxFuture<'static, Result<Box<dyn StorageFactory>, BoxError>>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("storage {0} has been registered")]
    AlreadyRegistered(String),

    #[error("storage {0} is not registered")]
    NotFound(String),

    #[error("failed to create storage {name}: {source}")]
    Factory {
        name: String,
        #[source]
        source: BoxError,
    },
}
