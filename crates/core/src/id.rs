// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`DeviceId`]: the stable, opaque identifier generated once per
//! installation (spec §3 — "created on first `DeviceConfig` creation and
//! never changed").

/// `dev-` plus 19 random characters, always exactly this many bytes.
const DEVICE_ID_LEN: usize = 23;

/// Stable, opaque identifier for this installation.
///
/// Backed by an inline byte buffer rather than a `String` so that
/// `DeviceId` is `Copy` and carries no heap allocation — it's cloned into
/// every remote-client cache key and log line this process emits.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    buf: [u8; DEVICE_ID_LEN],
}

impl DeviceId {
    pub const PREFIX: &'static str = "dev-";

    /// Generates a new random device ID.
    pub fn new() -> Self {
        Self::from_string(format!("{}{}", Self::PREFIX, nanoid::nanoid!(19)))
    }

    /// Builds a `DeviceId` from a previously-generated string, e.g. one
    /// read back from `device_config`.
    pub fn from_string(id: impl AsRef<str>) -> Self {
        let s = id.as_ref();
        debug_assert!(
            s.len() <= DEVICE_ID_LEN,
            "device id exceeds {} bytes ({} bytes): {:?}",
            DEVICE_ID_LEN,
            s.len(),
            s,
        );
        let len = s.len().min(DEVICE_ID_LEN);
        let mut buf = [0u8; DEVICE_ID_LEN];
        buf[..len].copy_from_slice(&s.as_bytes()[..len]);
        Self { buf }
    }

    pub fn as_str(&self) -> &str {
        // Invariant: only ever constructed from &str, so always valid UTF-8.
        // A shorter-than-DEVICE_ID_LEN id (accepted by from_string for
        // leniency) leaves trailing zero bytes, which are not valid UTF-8
        // continuation bytes, so trim them before decoding.
        let end = self.buf.iter().position(|&b| b == 0).unwrap_or(DEVICE_ID_LEN);
        match std::str::from_utf8(&self.buf[..end]) {
            Ok(s) => s,
            Err(_) => unreachable!("DeviceId constructed from non-UTF-8"),
        }
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::hash::Hash for DeviceId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl std::fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for DeviceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for DeviceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if s.len() > DEVICE_ID_LEN {
            return Err(serde::de::Error::custom(format!(
                "device id exceeds {} bytes: {:?}",
                DEVICE_ID_LEN, s
            )));
        }
        Ok(DeviceId::from_string(s))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
