mod common;

use assert_matches::assert_matches;
use common::TestApp;
use mrp_addons::{
    errors::ServiceError,
    services::tags::{CreateTag, SearchOperator, TagService, TagView, UpdateTag},
};

struct TagTree {
    production: TagView,
    assembly: TagView,
    electronics: TagView,
}

async fn create(tags: &TagService, name: &str, parent_id: Option<i32>) -> TagView {
    tags.create_tag(CreateTag {
        name: name.to_string(),
        parent_id,
        color: None,
    })
    .await
    .expect("create tag")
}

async fn seed_tree(app: &TestApp) -> TagTree {
    let tags = &app.state.services.tags;
    let production = create(tags, "Production", None).await;
    let assembly = create(tags, "Assembly", Some(production.id)).await;
    let electronics = create(tags, "Electronics", Some(assembly.id)).await;
    TagTree {
        production,
        assembly,
        electronics,
    }
}

#[tokio::test]
async fn display_names_follow_the_hierarchy() {
    let app = TestApp::new().await;
    let tree = seed_tree(&app).await;

    assert_eq!(tree.production.display_name, "Production");
    assert_eq!(tree.assembly.display_name, "Production / Assembly");
    assert_eq!(
        tree.electronics.display_name,
        "Production / Assembly / Electronics"
    );

    let tags = &app.state.services.tags;
    assert_eq!(
        tags.display_name(tree.electronics.id).await.unwrap(),
        "Production / Assembly / Electronics"
    );
}

#[tokio::test]
async fn search_matches_on_display_name() {
    let app = TestApp::new().await;
    let tree = seed_tree(&app).await;
    let tags = &app.state.services.tags;

    let exact = tags
        .search_tags(SearchOperator::Eq, "Production / Assembly")
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].id, tree.assembly.id);

    let partial = tags
        .search_tags(SearchOperator::Ilike, "electronics")
        .await
        .unwrap();
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].id, tree.electronics.id);

    let missing = tags
        .search_tags(SearchOperator::Eq, "Non-existent")
        .await
        .unwrap();
    assert!(missing.is_empty());

    // A bare segment is not the full display name
    let bare = tags.search_tags(SearchOperator::Eq, "Assembly").await.unwrap();
    assert!(bare.is_empty());

    let others = tags
        .search_tags(SearchOperator::NotEq, "Production")
        .await
        .unwrap();
    let ids: Vec<i32> = others.iter().map(|tag| tag.id).collect();
    assert_eq!(ids, vec![tree.assembly.id, tree.electronics.id]);
}

#[tokio::test]
async fn exact_search_finds_names_containing_the_separator() {
    let app = TestApp::new().await;
    let tags = &app.state.services.tags;
    let line = create(tags, "A", None).await;
    let station = create(tags, "B", Some(line.id)).await;
    let flat = create(tags, "A / B", None).await;
    assert_eq!(flat.display_name, "A / B");

    let found = tags.search_tags(SearchOperator::Eq, "A / B").await.unwrap();
    let ids: Vec<i32> = found.iter().map(|tag| tag.id).collect();
    assert_eq!(ids, vec![station.id, flat.id]);

    let nested = create(tags, "Kit / Box", Some(flat.id)).await;
    let found = tags
        .search_tags(SearchOperator::Eq, "A / B / Kit / Box")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, nested.id);
}

#[tokio::test]
async fn recursive_parent_is_rejected_without_changes() {
    let app = TestApp::new().await;
    let tree = seed_tree(&app).await;
    let tags = &app.state.services.tags;

    let result = tags
        .update_tag(
            tree.production.id,
            UpdateTag {
                name: Some("Renamed".to_string()),
                parent_id: Some(Some(tree.electronics.id)),
                color: None,
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));

    let production = tags.get_tag(tree.production.id).await.unwrap();
    assert_eq!(production.name, "Production");
    assert_eq!(production.parent_id, None);
    assert_eq!(
        tags.display_name(tree.electronics.id).await.unwrap(),
        "Production / Assembly / Electronics"
    );
}

#[tokio::test]
async fn tag_cannot_be_its_own_parent() {
    let app = TestApp::new().await;
    let tree = seed_tree(&app).await;

    let result = app
        .state
        .services
        .tags
        .update_tag(
            tree.assembly.id,
            UpdateTag {
                parent_id: Some(Some(tree.assembly.id)),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn standalone_tag_has_plain_name() {
    let app = TestApp::new().await;
    let tag = create(&app.state.services.tags, "Standalone", None).await;

    assert_eq!(tag.display_name, "Standalone");
    assert_eq!(tag.parent_id, None);
}

#[tokio::test]
async fn reparenting_renames_the_subtree() {
    let app = TestApp::new().await;
    let tree = seed_tree(&app).await;
    let tags = &app.state.services.tags;
    let new_parent = create(tags, "NewParent", None).await;

    let assembly = tags
        .update_tag(
            tree.assembly.id,
            UpdateTag {
                parent_id: Some(Some(new_parent.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(assembly.display_name, "NewParent / Assembly");
    assert_eq!(
        tags.display_name(tree.electronics.id).await.unwrap(),
        "NewParent / Assembly / Electronics"
    );
}

#[tokio::test]
async fn deleting_a_parent_keeps_children() {
    let app = TestApp::new().await;
    let tree = seed_tree(&app).await;
    let tags = &app.state.services.tags;

    tags.delete_tag(tree.production.id).await.unwrap();

    let assembly = tags.get_tag(tree.assembly.id).await.unwrap();
    assert_eq!(assembly.parent_id, None);
    assert_eq!(assembly.display_name, "Assembly");
    assert_eq!(
        tags.display_name(tree.electronics.id).await.unwrap(),
        "Assembly / Electronics"
    );
    assert_matches!(
        tags.get_tag(tree.production.id).await,
        Err(ServiceError::NotFound(_))
    );
}

#[tokio::test]
async fn detaching_a_tag_makes_it_a_root() {
    let app = TestApp::new().await;
    let tree = seed_tree(&app).await;
    let tags = &app.state.services.tags;

    let electronics = tags
        .update_tag(
            tree.electronics.id,
            UpdateTag {
                parent_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(electronics.display_name, "Electronics");
    let children = tags.child_tags(tree.assembly.id).await.unwrap();
    assert!(children.is_empty());
}

#[tokio::test]
async fn unknown_parent_and_empty_name_are_rejected() {
    let app = TestApp::new().await;
    let tags = &app.state.services.tags;

    let result = tags
        .create_tag(CreateTag {
            name: "Orphan".to_string(),
            parent_id: Some(999),
            color: None,
        })
        .await;
    assert_matches!(result, Err(ServiceError::NotFound(_)));

    let result = tags
        .create_tag(CreateTag {
            name: "   ".to_string(),
            parent_id: None,
            color: None,
        })
        .await;
    assert_matches!(result, Err(ServiceError::InvalidInput(_)));
}
