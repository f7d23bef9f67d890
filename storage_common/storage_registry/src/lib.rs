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

//! Storage layer registry
//! Storage layers announce a constructor under a fixed name; the host platform
//! looks the constructor up by name and hands it a configuration path.

pub mod registry;
pub mod traits;

pub use registry::{
    new_storage_factory, register_storage_factory_fn, registered_storage_names, StorageRegistry,
};
pub use traits::{BoxError, NewStorageFactoryFn, RegistryError, StorageFactory};
