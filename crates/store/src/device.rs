// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`DeviceConfig`] singleton: created on first open, never deleted.

use crate::error::Result;
use bindsync_core::{DeviceConfig, DeviceId};
use rusqlite::{params, Connection, OptionalExtension};

pub fn get_or_create_device_config(conn: &Connection) -> Result<DeviceConfig> {
    let existing: Option<String> = conn
        .query_row("SELECT device_id FROM device_config LIMIT 1", [], |r| r.get(0))
        .optional()?;

    if let Some(device_id) = existing {
        return Ok(DeviceConfig { device_id: DeviceId::from_string(device_id) });
    }

    let device_id = DeviceId::new();
    conn.execute(
        "INSERT INTO device_config(device_id) VALUES (?1)",
        params![device_id.as_str()],
    )?;
    Ok(DeviceConfig { device_id })
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
