// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end seed scenarios for the synchronization control core.
//!
//! The CLI-facing scenarios drive the `bindsync` binary as a subprocess
//! (`assert_cmd`); the ones root alignment and error-cooldown timing need
//! a `Clock` to control drive the `bindsync-control` library directly.

use assert_cmd::Command;
use bindsync_control::Controller;
use bindsync_core::{Clock, FakeClock, LastKnownState, SideState};
use bindsync_remote::fake::{FakeRemoteClientFactory, FakeRemoteFixture};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tempfile::TempDir;

fn bindsync() -> Command {
    Command::cargo_bin("bindsync").expect("bindsync binary builds")
}

fn fixture(roots: &[(&str, &str)]) -> FakeRemoteFixture {
    let mut infos = HashMap::new();
    let mut writable = HashMap::new();
    for (uid, name) in roots {
        infos.insert(
            format!("{uid}/"),
            bindsync_remote::RemoteInfo { uid: uid.to_string(), name: name.to_string(), folderish: true, parent_uid: None },
        );
        writable.insert(uid.to_string(), true);
    }
    FakeRemoteFixture { infos, writable, issues_token: Some("tok-1".to_string()), ..Default::default() }
}

fn controller_with(tmp: &TempDir, fixture: FakeRemoteFixture) -> Controller<FakeRemoteClientFactory, FakeClock> {
    Controller::open_with_clock(tmp.path(), FakeRemoteClientFactory::new(fixture), FakeClock::new()).unwrap()
}

/// A second handle onto the same on-disk store a `Controller` in `tmp` is
/// using, for tests that need to seed rows the public Controller API has
/// no reason to expose (e.g. arbitrary `LastKnownState`s for ordering
/// tests). SQLite tolerates multiple pooled connections to one file.
fn store_at(tmp: &TempDir) -> bindsync_store::Store {
    bindsync_store::Store::open(tmp.path(), false).unwrap()
}

#[test]
fn scenario_1_basic_bind_issues_and_persists_a_token() {
    let tmp = TempDir::new().unwrap();
    let local_folder = tmp.path().join("Nuxeo Drive");

    let assert = bindsync()
        .args(["--config-folder", tmp.path().to_str().unwrap(), "--output", "json", "server", "bind"])
        .args([local_folder.to_str().unwrap(), "http://srv/nuxeo", "alice", "--password", "p"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["server_url"], "http://srv/nuxeo/");
    assert_eq!(json["remote_user"], "alice");
}

#[test]
fn scenario_2_idempotent_rebind_then_rejects_a_different_account() {
    let tmp = TempDir::new().unwrap();
    let local_folder = tmp.path().join("Nuxeo Drive");
    let bind = || {
        bindsync()
            .args(["--config-folder", tmp.path().to_str().unwrap(), "server", "bind"])
            .args([local_folder.to_str().unwrap(), "http://srv/nuxeo", "alice", "--password", "p"])
            .assert()
    };
    bind().success();
    bind().success();

    bindsync()
        .args(["--config-folder", tmp.path().to_str().unwrap(), "server", "bind"])
        .args([local_folder.to_str().unwrap(), "http://other/nuxeo", "alice", "--password", "p"])
        .assert()
        .failure();
}

#[test]
fn scenario_3_root_alignment_adds_and_removes() {
    let tmp = TempDir::new().unwrap();
    let controller = controller_with(&tmp, fixture(&[("A", "Alpha"), ("B", "Bravo"), ("C", "Charlie")]));
    let server_folder = tmp.path().join("server-a");
    let server_binding = controller.bind_server(&server_folder, "https://srv/", "alice", "p").unwrap();
    let a = controller.bind_root(&server_folder, "A", "default").unwrap();
    let b = controller.bind_root(&server_folder, "B", "default").unwrap();

    let remotes = [
        bindsync_remote::RemoteInfo { uid: "B".to_string(), name: "Bravo".to_string(), folderish: true, parent_uid: None },
        bindsync_remote::RemoteInfo { uid: "C".to_string(), name: "Charlie".to_string(), folderish: true, parent_uid: None },
    ];
    controller.align_roots(&server_binding, "default", &[a.clone(), b.clone()], &remotes).unwrap();

    let store = store_at(&tmp);
    let session = store.session().unwrap();
    let conn = session.connection();
    assert!(bindsync_store::find_root_binding(conn, &a.local_root).unwrap().is_none());
    assert!(bindsync_store::find_root_binding(conn, &b.local_root).unwrap().is_some());
    assert!(bindsync_store::find_root_binding(conn, &server_folder.join("Charlie")).unwrap().is_some());
    assert!(bindsync_store::find_by_path(conn, &a.local_root, "/").unwrap().is_none());
}

#[test]
fn scenario_4_pending_ordering_sorts_ancestors_before_descendants() {
    let tmp = TempDir::new().unwrap();
    let controller = controller_with(&tmp, fixture(&[("root-0", "Project")]));
    let server_folder = tmp.path().join("server-a");
    controller.bind_server(&server_folder, "https://srv/", "alice", "p").unwrap();
    let root = controller.bind_root(&server_folder, "root-0", "default").unwrap();

    let store = store_at(&tmp);
    let session = store.session().unwrap();
    for (i, path) in ["/a/b", "/a", "/a/b/c"].iter().enumerate() {
        bindsync_store::upsert_state(
            session.connection(),
            &LastKnownState {
                local_folder: server_folder.clone(),
                local_root: root.local_root.clone(),
                path: Some(path.to_string()),
                parent_path: None,
                local_name: Some(format!("n{i}")),
                remote_ref: None,
                remote_parent_ref: None,
                remote_name: None,
                remote_path: None,
                folderish: true,
                local_state: SideState::Modified,
                remote_state: SideState::Unknown,
                last_sync_error_date: None,
            },
        )
        .unwrap();
    }
    drop(session);

    let pending = controller.list_pending(10, None, 0).unwrap();
    let paths: Vec<_> = pending.iter().map(|s| s.path.clone().unwrap()).collect();
    assert_eq!(paths, vec!["/a", "/a/b", "/a/b/c"]);
}

#[test]
fn scenario_5_error_cooldown_excludes_then_includes_a_recent_failure() {
    let tmp = TempDir::new().unwrap();
    let clock = FakeClock::new();
    let now = clock.now();
    let controller = Controller::open_with_clock(
        tmp.path(),
        FakeRemoteClientFactory::new(fixture(&[("root-0", "Project")])),
        clock,
    )
    .unwrap();
    let server_folder = tmp.path().join("server-a");
    controller.bind_server(&server_folder, "https://srv/", "alice", "p").unwrap();
    let root = controller.bind_root(&server_folder, "root-0", "default").unwrap();

    let store = store_at(&tmp);
    let session = store.session().unwrap();
    bindsync_store::upsert_state(
        session.connection(),
        &LastKnownState {
            local_folder: server_folder.clone(),
            local_root: root.local_root.clone(),
            path: Some("/p".to_string()),
            parent_path: Some("/".to_string()),
            local_name: Some("p".to_string()),
            remote_ref: None,
            remote_parent_ref: None,
            remote_name: None,
            remote_path: None,
            folderish: false,
            local_state: SideState::Modified,
            remote_state: SideState::Unknown,
            last_sync_error_date: Some(now - Duration::seconds(5)),
        },
    )
    .unwrap();
    drop(session);

    assert!(controller.list_pending(10, None, 10).unwrap().is_empty());
    assert_eq!(controller.list_pending(10, None, 1).unwrap().len(), 1);
}

#[test]
fn scenario_6_children_aggregation_flips_once_the_descendant_settles() {
    let tmp = TempDir::new().unwrap();
    let controller = controller_with(&tmp, fixture(&[("root-0", "Project")]));
    let server_folder = tmp.path().join("server-a");
    controller.bind_server(&server_folder, "https://srv/", "alice", "p").unwrap();
    let root = controller.bind_root(&server_folder, "root-0", "default").unwrap();

    let mut state = LastKnownState {
        local_folder: server_folder.clone(),
        local_root: root.local_root.clone(),
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
    };
    let store = store_at(&tmp);
    {
        let session = store.session().unwrap();
        bindsync_store::upsert_state(session.connection(), &state).unwrap();
    }
    let rows = controller.children_states(&server_folder).unwrap();
    assert_eq!(rows, vec![("Project".to_string(), "children_modified".to_string())]);

    state.local_state = SideState::Synchronized;
    {
        let session = store.session().unwrap();
        bindsync_store::upsert_state(session.connection(), &state).unwrap();
    }
    let rows = controller.children_states(&server_folder).unwrap();
    assert_eq!(rows, vec![("Project".to_string(), "synchronized".to_string())]);
}
