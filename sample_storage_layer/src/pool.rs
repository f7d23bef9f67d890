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

//! Connection pool configuration
//!
//! sqlx pools are sized when they are created, so the limits are applied to the
//! connect options right before the pool is opened.
//!
//! | config           | pool option       |
//! |------------------|-------------------|
//! | `max_open_conns` | `max_connections` |
//! | `max_idle_conns` | `min_connections` |
//! | `max_lifetime`   | `max_lifetime`    |
//!
//! Zero leaves the backend default in place. An idle count above the open count
//! is not rejected; it is clamped to the open count like the drivers do.

use std::time::Duration;

use log::{info, warn};
use sea_orm::ConnectOptions;

use crate::config::{PoolConfig, PoolSettings};
use crate::StorageError;

/// Validate `pool` and apply it to `options`, returning the limits now in effect
///
/// # Errors
///
/// * `StorageError::InvalidPoolConfig` - If a limit is negative or the lifetime is malformed.
pub fn apply_pool_config(options: &mut ConnectOptions, pool: &PoolConfig) -> Result<PoolSettings, StorageError> {
    let settings = pool.resolve()?;

    if settings.max_open_conns > 0 {
        options.max_connections(settings.max_open_conns);
    }
    if settings.max_idle_conns > 0 {
        let mut idle = settings.max_idle_conns;
        if settings.max_open_conns > 0 && idle > settings.max_open_conns {
            warn!(
                "max_idle_conns {} is greater than max_open_conns {}, clamped to {}",
                idle, settings.max_open_conns, settings.max_open_conns
            );
            idle = settings.max_open_conns;
        }
        options.min_connections(idle);
    }
    if !settings.conn_max_lifetime.is_zero() {
        options.max_lifetime(settings.conn_max_lifetime);
    }

    let applied = pool_settings(options);
    info!(
        "Connection pool configured: max_idle_conns={}, max_open_conns={}, max_lifetime={:?}",
        applied.max_idle_conns, applied.max_open_conns, applied.conn_max_lifetime
    );
    Ok(applied)
}

/// Limits carried by `options`; zero where the backend default applies
pub fn pool_settings(options: &ConnectOptions) -> PoolSettings {
    PoolSettings {
        max_idle_conns: options.get_min_connections().unwrap_or(0),
        max_open_conns: options.get_max_connections().unwrap_or(0),
        conn_max_lifetime: options.get_max_lifetime().unwrap_or(Duration::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DurationValue;

    fn options() -> ConnectOptions {
        ConnectOptions::new("mysql://root@localhost:3306/clusterpedia")
    }

    #[test]
    fn test_apply_reports_exact_limits() {
        let pool = PoolConfig {
            max_idle_conns: 5,
            max_open_conns: 10,
            max_lifetime: Some(DurationValue::Text("1h".to_string())),
        };
        let mut opt = options();
        let applied = apply_pool_config(&mut opt, &pool).unwrap();

        let expected = PoolSettings {
            max_idle_conns: 5,
            max_open_conns: 10,
            conn_max_lifetime: Duration::from_secs(3600),
        };
        assert_eq!(applied, expected);
        assert_eq!(opt.get_min_connections(), Some(5));
        assert_eq!(opt.get_max_connections(), Some(10));
        assert_eq!(opt.get_max_lifetime(), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_zero_keeps_backend_defaults() {
        let mut opt = options();
        let before = pool_settings(&opt);
        let applied = apply_pool_config(&mut opt, &PoolConfig::default()).unwrap();
        assert_eq!(applied, before);
    }

    #[test]
    fn test_idle_greater_than_open_is_clamped() {
        let pool = PoolConfig { max_idle_conns: 50, max_open_conns: 10, max_lifetime: None };
        let mut opt = options();
        let applied = apply_pool_config(&mut opt, &pool).unwrap();
        assert_eq!(applied.max_idle_conns, 10);
        assert_eq!(applied.max_open_conns, 10);
    }

    #[test]
    fn test_idle_without_open_limit_is_kept() {
        let pool = PoolConfig { max_idle_conns: 3, max_open_conns: 0, max_lifetime: None };
        let mut opt = options();
        assert_eq!(apply_pool_config(&mut opt, &pool).unwrap().max_idle_conns, 3);
    }

    #[test]
    fn test_negative_values_rejected() {
        let pool = PoolConfig { max_idle_conns: -1, max_open_conns: 10, max_lifetime: None };
        assert!(matches!(apply_pool_config(&mut options(), &pool), Err(StorageError::InvalidPoolConfig(_))));
        let pool = PoolConfig { max_idle_conns: 0, max_open_conns: 0, max_lifetime: Some(DurationValue::Seconds(-1)) };
        assert!(matches!(apply_pool_config(&mut options(), &pool), Err(StorageError::InvalidPoolConfig(_))));
    }
}
