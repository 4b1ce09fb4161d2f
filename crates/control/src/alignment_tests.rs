// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bindsync_remote::fake::{FakeRemoteClientFactory, FakeRemoteFixture};
use std::collections::HashMap;
use tempfile::TempDir;

fn info(uid: &str, name: &str) -> RemoteInfo {
    RemoteInfo { uid: uid.to_string(), name: name.to_string(), folderish: true, parent_uid: None }
}

fn fixture(roots: &[(&str, &str)]) -> FakeRemoteFixture {
    let mut infos = HashMap::new();
    let mut writable = HashMap::new();
    for (uid, name) in roots {
        infos.insert(format!("{uid}/"), info(uid, name));
        writable.insert(uid.to_string(), true);
    }
    FakeRemoteFixture { infos, writable, issues_token: Some("tok".to_string()), ..Default::default() }
}

#[test]
fn align_roots_adds_a_root_only_advertised_remotely() {
    let tmp = TempDir::new().unwrap();
    let controller = Controller::open(
        tmp.path(),
        FakeRemoteClientFactory::new(fixture(&[("root-0", "Project")])),
    )
    .unwrap();
    let server_folder = tmp.path().join("server-a");
    let server_binding = controller.bind_server(&server_folder, "https://srv/", "alice", "hunter2").unwrap();

    controller.align_roots(&server_binding, "default", &[], &[info("root-0", "Project")]).unwrap();

    let root = bindsync_store::find_root_binding(
        controller.store().session().unwrap().connection(),
        &server_folder.join("Project"),
    )
    .unwrap();
    assert!(root.is_some());
}

#[test]
fn align_roots_removes_a_root_no_longer_advertised() {
    let tmp = TempDir::new().unwrap();
    let controller = Controller::open(
        tmp.path(),
        FakeRemoteClientFactory::new(fixture(&[("root-0", "Project")])),
    )
    .unwrap();
    let server_folder = tmp.path().join("server-a");
    let server_binding = controller.bind_server(&server_folder, "https://srv/", "alice", "hunter2").unwrap();
    let bound = controller.bind_root(&server_folder, "root-0", "default").unwrap();

    controller.align_roots(&server_binding, "default", &[bound.clone()], &[]).unwrap();

    let root =
        bindsync_store::find_root_binding(controller.store().session().unwrap().connection(), &bound.local_root)
            .unwrap();
    assert!(root.is_none());
}

#[test]
fn align_roots_leaves_the_intersection_untouched() {
    let tmp = TempDir::new().unwrap();
    let controller = Controller::open(
        tmp.path(),
        FakeRemoteClientFactory::new(fixture(&[("root-0", "Project")])),
    )
    .unwrap();
    let server_folder = tmp.path().join("server-a");
    let server_binding = controller.bind_server(&server_folder, "https://srv/", "alice", "hunter2").unwrap();
    let bound = controller.bind_root(&server_folder, "root-0", "default").unwrap();

    controller.align_roots(&server_binding, "default", &[bound.clone()], &[info("root-0", "Project")]).unwrap();

    let root =
        bindsync_store::find_root_binding(controller.store().session().unwrap().connection(), &bound.local_root)
            .unwrap()
            .unwrap();
    assert_eq!(root, bound);
}

#[test]
fn align_roots_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let controller = Controller::open(
        tmp.path(),
        FakeRemoteClientFactory::new(fixture(&[("root-0", "Project")])),
    )
    .unwrap();
    let server_folder = tmp.path().join("server-a");
    let server_binding = controller.bind_server(&server_folder, "https://srv/", "alice", "hunter2").unwrap();

    let remotes = [info("root-0", "Project")];
    controller.align_roots(&server_binding, "default", &[], &remotes).unwrap();
    let locals = bindsync_store::list_root_bindings_for_server(
        controller.store().session().unwrap().connection(),
        &server_folder,
    )
    .unwrap();
    controller.align_roots(&server_binding, "default", &locals, &remotes).unwrap();

    let locals_again = bindsync_store::list_root_bindings_for_server(
        controller.store().session().unwrap().connection(),
        &server_folder,
    )
    .unwrap();
    assert_eq!(locals, locals_again);
}
