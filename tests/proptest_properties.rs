//! Property-based tests using proptest
//!
//! These tests cover label rendering, parent path parsing, project ID
//! validation, the pagination accumulator and org path resolution using
//! randomized inputs.

use gcpadmin::admin::pagination::collect_pages;
use gcpadmin::admin::{display_labels, CloudAdmin, NodeKind, ParentRef};
use gcpadmin::gcp::auth::{validate_project_id, StaticToken};
use gcpadmin::gcp::client::ApiEndpoints;
use gcpadmin::AdminError;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Generate a label map with GCP-style keys and values
fn arb_labels() -> impl Strategy<Value = HashMap<String, String>> {
    prop::collection::hash_map("[a-z][a-z0-9_-]{0,15}", "[a-z0-9_-]{0,15}", 0..20)
}

/// Generate page sizes; every page but the last carries a token
fn arb_page_sizes() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..8, 1..12)
}

/// Build the page responses for a list of page sizes
fn build_pages(sizes: &[usize]) -> Vec<Value> {
    let mut counter = 0usize;
    sizes
        .iter()
        .enumerate()
        .map(|(page, &size)| {
            let items: Vec<Value> = (0..size)
                .map(|_| {
                    counter += 1;
                    json!({"projectId": format!("project-{:04}", counter)})
                })
                .collect();
            let mut response = if size == 0 && page % 2 == 0 {
                // Empty pages sometimes omit the key entirely
                json!({})
            } else {
                json!({ "projects": items })
            };
            if page + 1 < sizes.len() {
                response["nextPageToken"] = json!(format!("token-{}", page + 1));
            }
            response
        })
        .collect()
}

/// Generate hierarchy display names
fn arb_display_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 &-]{0,24}"
}

/// Serve a folder chain under an organization and resolve it from the leaf
///
/// `folders` is ordered leaf first; folder ids are `base + index`.
async fn resolve_chain(org_name: &str, folders: &[String], base: u64) -> String {
    let server = MockServer::start().await;
    let org_id = "900";

    for (i, name) in folders.iter().enumerate() {
        let parent = if i + 1 < folders.len() {
            format!("folders/{}", base + i as u64 + 1)
        } else {
            format!("organizations/{}", org_id)
        };
        Mock::given(method("GET"))
            .and(path(format!("/v2alpha1/folders/{}", base + i as u64)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "displayName": name,
                "parent": parent
            })))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("/v1/organizations/{}", org_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "displayName": org_name
        })))
        .mount(&server)
        .await;

    let admin = CloudAdmin::with_token_source(
        Arc::new(StaticToken("test-token".to_string())),
        &ApiEndpoints::uniform(&server.uri()),
    )
    .await
    .unwrap();

    let start = if folders.is_empty() {
        ParentRef::organization(org_id)
    } else {
        ParentRef::folder(base.to_string())
    };
    admin.resolve_org_path(&start).await.unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Names come out root first, one per level, joined by " > "
    #[test]
    fn org_path_lists_every_level_root_first(
        org_name in arb_display_name(),
        folders in prop::collection::vec(arb_display_name(), 0..5),
        base in 1u64..1_000_000_000,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let resolved = runtime.block_on(resolve_chain(&org_name, &folders, base));

        let mut expected = vec![org_name.clone()];
        expected.extend(folders.iter().rev().cloned());
        prop_assert_eq!(resolved, expected.join(" > "));
    }
}

proptest! {
    /// Rendered labels are sorted by key regardless of insertion order
    #[test]
    fn labels_are_sorted_by_key(labels in arb_labels()) {
        let rendered = display_labels(&labels);
        if labels.is_empty() {
            prop_assert_eq!(rendered, "");
        } else {
            let keys: Vec<&str> = rendered
                .split(',')
                .map(|pair| pair.split_once('=').map(|(k, _)| k).unwrap_or(pair))
                .collect();
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            prop_assert_eq!(&keys, &sorted);
            prop_assert_eq!(keys.len(), labels.len());
        }
    }

    /// Every pair appears as key=value
    #[test]
    fn labels_contain_every_pair(labels in arb_labels()) {
        let rendered = display_labels(&labels);
        let pairs: Vec<&str> = rendered.split(',').collect();
        for (key, value) in &labels {
            let expected = format!("{}={}", key, value);
            prop_assert!(pairs.contains(&expected.as_str()));
        }
    }

    /// Resource names parse back into the same reference
    #[test]
    fn parent_paths_parse(id in "[0-9]{1,15}", is_folder in any::<bool>()) {
        let parent = if is_folder {
            ParentRef::folder(id.clone())
        } else {
            ParentRef::organization(id.clone())
        };
        let parsed = ParentRef::from_path(&parent.resource_name()).unwrap();
        prop_assert_eq!(parsed.kind, if is_folder { NodeKind::Folder } else { NodeKind::Organization });
        prop_assert_eq!(parsed.id, id);
    }

    /// Only folders and organizations are accepted as parents
    #[test]
    fn other_parent_types_rejected(kind in "[a-z]{1,12}", id in "[0-9]{1,10}") {
        prop_assume!(kind != "folder" && kind != "organization");
        let path = format!("{}s/{}", kind, id);
        prop_assert!(ParentRef::from_path(&path).is_err());
    }

    /// Valid-looking project IDs are accepted
    #[test]
    fn valid_project_ids_accepted(project in "[a-z][a-z0-9-]{4,28}[a-z0-9]") {
        prop_assert!(validate_project_id(&project));
    }

    /// Uppercase letters are never accepted
    #[test]
    fn uppercase_project_ids_rejected(project in "[a-z][a-z0-9]{2,10}[A-Z][a-z0-9]{2,10}") {
        prop_assert!(!validate_project_id(&project));
    }

    /// Accumulated length is the sum of page sizes, in page order
    #[test]
    fn pagination_accumulates_every_page(sizes in arb_page_sizes()) {
        let pages = build_pages(&sizes);
        let mut calls = 0usize;

        let items = tokio_test::block_on(collect_pages("projects", |token| {
            let index = calls;
            calls += 1;
            let expected = if index == 0 { None } else { Some(format!("token-{}", index)) };
            let page = pages[index].clone();
            async move {
                assert_eq!(token, expected);
                Ok::<_, AdminError>(page)
            }
        }))
        .unwrap();

        prop_assert_eq!(calls, sizes.len());
        prop_assert_eq!(items.len(), sizes.iter().sum::<usize>());

        let ids: Vec<&str> = items.iter().map(|p| p["projectId"].as_str().unwrap()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ids, sorted);
    }
}
