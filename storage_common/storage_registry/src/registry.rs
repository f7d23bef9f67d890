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

/// Storage factory registry implementation

use std::collections::HashMap;
use std::sync::OnceLock;

use log::{error, info};
use parking_lot::RwLock;

use crate::traits::{NewStorageFactoryFn, RegistryError, StorageFactory};

/// Name to constructor table
pub struct StorageRegistry {
    factories: RwLock<HashMap<String, NewStorageFactoryFn>>,
}

impl Default for StorageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageRegistry {
    pub fn new() -> Self {
        Self { factories: RwLock::new(HashMap::new()) }
    }

    /// Process wide registry
    pub fn get_instance() -> &'static Self {
        static INSTANCE: OnceLock<StorageRegistry> = OnceLock::new();
        INSTANCE.get_or_init(StorageRegistry::new)
    }

    /// Register `factory` under `name`; a name can only be registered once
    pub fn register(&self, name: &str, factory: NewStorageFactoryFn) -> Result<(), RegistryError> {
        let mut factories = self.factories.write();
        if factories.contains_key(name) {
            error!("storage {} has been registered", name);
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }
        factories.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<NewStorageFactoryFn> {
        self.factories.read().get(name).copied()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Build a storage factory with the constructor registered under `name`
    pub async fn new_storage_factory(
        &self,
        name: &str,
        config_path: &str,
    ) -> Result<Box<dyn StorageFactory>, RegistryError> {
        let factory = self.get(name).ok_or_else(|| RegistryError::NotFound(name.to_string()))?;
        info!("Creating storage factory {} with config {}", name, config_path);
        factory(config_path.to_string())
            .await
            .map_err(|source| RegistryError::Factory { name: name.to_string(), source })
    }
}

/// Register `factory` under `name` in the process wide registry
pub fn register_storage_factory_fn(name: &str, factory: NewStorageFactoryFn) -> Result<(), RegistryError> {
    StorageRegistry::get_instance().register(name, factory)
}

/// Build a storage factory with the constructor registered under `name` in the process wide registry
pub async fn new_storage_factory(name: &str, config_path: &str) -> Result<Box<dyn StorageFactory>, RegistryError> {
    StorageRegistry::get_instance().new_storage_factory(name, config_path).await
}

/// Names registered in the process wide registry, sorted
pub fn registered_storage_names() -> Vec<String> {
    StorageRegistry::get_instance().names()
}
