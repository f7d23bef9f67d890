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

//! Registration with the host platform storage registry

use futures::future::BoxFuture;
use log::info;
use storage_registry::{register_storage_factory_fn, BoxError, RegistryError};

use crate::connection::new_storage_factory;

/// Name the storage layer is registered under
pub const STORAGE_NAME: &str = "sample-storage-layer";

/// Register [`new_storage_factory`] under [`STORAGE_NAME`]
///
/// # Errors
///
/// * `RegistryError::AlreadyRegistered` - If the name was registered before.
pub fn register_storage_layer() -> Result<(), RegistryError> {
    register_storage_factory_fn(STORAGE_NAME, new_registered_storage_factory)?;
    info!("Successful register storage: {}", STORAGE_NAME);
    Ok(())
}

fn new_registered_storage_factory(
    config_path: String,
) -> BoxFuture<'static, Result<Box<dyn storage_registry::StorageFactory>, BoxError>> {
    Box::pin(async move {
        let factory = new_storage_factory(&config_path).await?;
        Ok(Box::new(factory) as Box<dyn storage_registry::StorageFactory>)
    })
}
