// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn credentials() -> Credentials {
    Credentials::Token("tok-1".to_string())
}

#[test]
fn get_info_returns_fixture_entry_for_base_folder_plus_path() {
    let mut infos = HashMap::new();
    infos.insert(
        "root-0/".to_string(),
        RemoteInfo { uid: "root-0".to_string(), name: "Project".to_string(), folderish: true, parent_uid: None },
    );
    let factory =
        FakeRemoteClientFactory::new(FakeRemoteFixture { infos, ..Default::default() });
    let client = factory.create("https://srv/", "alice", "dev-1", &credentials(), Some("root-0"), "default").unwrap();

    let info = client.get_info("/", false).unwrap();
    assert_eq!(info.uid, "root-0");
    assert!(info.folderish);
}

#[test]
fn get_info_missing_path_is_no_such_remote_root() {
    let factory = FakeRemoteClientFactory::new(FakeRemoteFixture::default());
    let client = factory.create("https://srv/", "alice", "dev-1", &credentials(), None, "default").unwrap();

    let err = client.get_info("/missing", false).unwrap_err();
    assert!(matches!(err, RemoteError::Core(CoreError::NoSuchRemoteRoot(_))));
}

#[test]
fn register_as_root_reflects_server_support() {
    let factory = FakeRemoteClientFactory::new(FakeRemoteFixture {
        supports_server_side_roots: true,
        ..Default::default()
    });
    let client = factory.create("https://srv/", "alice", "dev-1", &credentials(), None, "default").unwrap();

    assert!(client.register_as_root("root-0").unwrap());
    assert_eq!(factory.registered_roots(), vec!["root-0".to_string()]);
}

#[test]
fn register_as_root_returns_false_when_unsupported() {
    let factory = FakeRemoteClientFactory::new(FakeRemoteFixture::default());
    let client = factory.create("https://srv/", "alice", "dev-1", &credentials(), None, "default").unwrap();

    assert!(!client.register_as_root("root-0").unwrap());
}

#[test]
fn revoke_token_is_observable() {
    let factory = FakeRemoteClientFactory::new(FakeRemoteFixture::default());
    let client = factory.create_concrete("https://srv/", None, "default");
    assert!(!client.was_token_revoked());
    client.revoke_token().unwrap();
    assert!(client.was_token_revoked());
}

#[test]
fn inject_fault_surfaces_on_next_call_only() {
    let factory = FakeRemoteClientFactory::new(FakeRemoteFixture::default());
    let client = factory.create("https://srv/", "alice", "dev-1", &credentials(), None, "default").unwrap();

    client.inject_fault(Some(RemoteError::Core(CoreError::Unauthorized("expired".to_string()))));
    assert!(client.is_addon_installed().is_err());
    assert!(client.is_addon_installed().is_ok());
}

#[test]
fn inject_fault_supports_a_transport_level_io_fault() {
    let factory = FakeRemoteClientFactory::new(FakeRemoteFixture::default());
    let client = factory.create("https://srv/", "alice", "dev-1", &credentials(), None, "default").unwrap();

    client.inject_fault(Some(RemoteError::Io("connection reset".to_string())));
    let err = client.is_addon_installed().unwrap_err();
    assert!(matches!(err, RemoteError::Io(_)));
    assert!(err.is_retryable());
}
