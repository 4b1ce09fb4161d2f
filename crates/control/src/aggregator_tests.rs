// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bindsync_core::SideState;
use bindsync_remote::fake::{FakeRemoteClientFactory, FakeRemoteFixture};
use std::collections::HashMap;
use tempfile::TempDir;

fn fixture() -> FakeRemoteFixture {
    let mut infos = HashMap::new();
    infos.insert(
        "root-0/".to_string(),
        bindsync_remote::RemoteInfo { uid: "root-0".to_string(), name: "Project".to_string(), folderish: true, parent_uid: None },
    );
    let mut writable = HashMap::new();
    writable.insert("root-0".to_string(), true);
    FakeRemoteFixture { infos, writable, issues_token: Some("tok".to_string()), ..Default::default() }
}

fn set_up() -> (TempDir, Controller<FakeRemoteClientFactory>, std::path::PathBuf, std::path::PathBuf) {
    let tmp = TempDir::new().unwrap();
    let controller = Controller::open(tmp.path(), FakeRemoteClientFactory::new(fixture())).unwrap();
    let server_folder = tmp.path().join("server-a");
    controller.bind_server(&server_folder, "https://srv/", "alice", "hunter2").unwrap();
    let root = controller.bind_root(&server_folder, "root-0", "default").unwrap();
    (tmp, controller, server_folder, root.local_root)
}

#[test]
fn children_states_at_server_folder_lists_one_entry_per_root() {
    let (_tmp, controller, server_folder, _root) = set_up();
    let rows = controller.children_states(&server_folder).unwrap();
    assert_eq!(rows, vec![("Project".to_string(), "synchronized".to_string())]);
}

#[test]
fn children_states_flags_root_with_unsynced_descendant() {
    let (_tmp, controller, server_folder, root_local) = set_up();
    let session = controller.store().session().unwrap();
    bindsync_store::upsert_state(
        session.connection(),
        &bindsync_core::LastKnownState {
            local_folder: server_folder.clone(),
            local_root: root_local.clone(),
            path: Some("/doc.txt".to_string()),
            parent_path: Some("/".to_string()),
            local_name: Some("doc.txt".to_string()),
            remote_ref: Some("doc-1".to_string()),
            remote_parent_ref: Some("root-0".to_string()),
            remote_name: Some("doc.txt".to_string()),
            remote_path: Some("/doc.txt".to_string()),
            folderish: false,
            local_state: SideState::Modified,
            remote_state: SideState::Synchronized,
            last_sync_error_date: None,
        },
    )
    .unwrap();

    let rows = controller.children_states(&server_folder).unwrap();
    assert_eq!(rows, vec![("Project".to_string(), "children_modified".to_string())]);
}

#[test]
fn children_states_at_a_root_lists_direct_children_only() {
    let (_tmp, controller, server_folder, root_local) = set_up();
    let session = controller.store().session().unwrap();
    let conn = session.connection();
    bindsync_store::upsert_state(
        conn,
        &bindsync_core::LastKnownState {
            local_folder: server_folder.clone(),
            local_root: root_local.clone(),
            path: Some("/a.txt".to_string()),
            parent_path: Some("/".to_string()),
            local_name: Some("a.txt".to_string()),
            remote_ref: Some("doc-a".to_string()),
            remote_parent_ref: Some("root-0".to_string()),
            remote_name: Some("a.txt".to_string()),
            remote_path: Some("/a.txt".to_string()),
            folderish: false,
            local_state: SideState::Synchronized,
            remote_state: SideState::Synchronized,
            last_sync_error_date: None,
        },
    )
    .unwrap();
    bindsync_store::upsert_state(
        conn,
        &bindsync_core::LastKnownState {
            local_folder: server_folder.clone(),
            local_root: root_local.clone(),
            path: Some("/sub".to_string()),
            parent_path: Some("/".to_string()),
            local_name: Some("sub".to_string()),
            remote_ref: Some("folder-1".to_string()),
            remote_parent_ref: Some("root-0".to_string()),
            remote_name: Some("sub".to_string()),
            remote_path: Some("/sub".to_string()),
            folderish: true,
            local_state: SideState::Synchronized,
            remote_state: SideState::Synchronized,
            last_sync_error_date: None,
        },
    )
    .unwrap();
    bindsync_store::upsert_state(
        conn,
        &bindsync_core::LastKnownState {
            local_folder: server_folder.clone(),
            local_root: root_local.clone(),
            path: Some("/sub/nested.txt".to_string()),
            parent_path: Some("/sub".to_string()),
            local_name: Some("nested.txt".to_string()),
            remote_ref: Some("doc-nested".to_string()),
            remote_parent_ref: Some("folder-1".to_string()),
            remote_name: Some("nested.txt".to_string()),
            remote_path: Some("/sub/nested.txt".to_string()),
            folderish: false,
            local_state: SideState::Modified,
            remote_state: SideState::Synchronized,
            last_sync_error_date: None,
        },
    )
    .unwrap();
    drop(session);

    let rows = controller.children_states(&root_local).unwrap();
    assert_eq!(
        rows,
        vec![
            ("a.txt".to_string(), "synchronized".to_string()),
            ("sub".to_string(), "children_modified".to_string()),
        ]
    );
}

#[test]
fn children_states_is_empty_for_an_untracked_path() {
    let (tmp, controller, _server_folder, _root) = set_up();
    let rows = controller.children_states(&tmp.path().join("nowhere")).unwrap();
    assert!(rows.is_empty());
}
