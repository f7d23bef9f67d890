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

//! Indexed cluster resource
//! The column layout is read by the storage interface query layer

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "String(StringLen::N(63))")]
    pub group: String,
    #[sea_orm(column_type = "String(StringLen::N(15))")]
    pub version: String,
    #[sea_orm(column_type = "String(StringLen::N(63))")]
    pub resource: String,
    #[sea_orm(column_type = "String(StringLen::N(63))")]
    pub kind: String,
    #[sea_orm(column_type = "String(StringLen::N(253))")]
    pub cluster: String,
    #[sea_orm(column_type = "String(StringLen::N(253))")]
    pub namespace: String,
    #[sea_orm(column_type = "String(StringLen::N(253))")]
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(36))", default_value = "")]
    pub owner_uid: String,
    #[sea_orm(column_type = "String(StringLen::N(36))")]
    pub uid: String,
    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub resource_version: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub object: Json,
    pub created_at: DateTimeUtc,
    pub synced_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

// Reserved enumeration for establishing table relationship
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Secondary indexes as `(name, columns, unique)`
pub fn indexes() -> Vec<(&'static str, Vec<Column>, bool)> {
    vec![
        (
            "uni_group_version_resource_cluster_namespace_name",
            vec![Column::Group, Column::Version, Column::Resource, Column::Cluster, Column::Namespace, Column::Name],
            true,
        ),
        (
            "idx_group_version_resource_namespace_name",
            vec![Column::Group, Column::Version, Column::Resource, Column::Namespace, Column::Name],
            false,
        ),
        (
            "idx_group_version_resource_name",
            vec![Column::Group, Column::Version, Column::Resource, Column::Name],
            false,
        ),
        ("idx_resources_cluster", vec![Column::Cluster], false),
        ("idx_resources_owner_uid", vec![Column::OwnerUid], false),
    ]
}
