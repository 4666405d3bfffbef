//! Category, subcategory and tag administration.

use serde_json::json;

use crate::common::{TestApp, routes};

mod categories {
    use super::*;

    #[tokio::test]
    async fn admin_can_create_and_fetch_a_category() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;

        let id = app.create_category(&admin, "Painting").await;

        let res = app.get_with_token(&routes::category(id), &admin).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Painting");
        assert_eq!(res.body["description"], "Painting works");
    }

    #[tokio::test]
    async fn creating_the_same_category_name_twice_conflicts() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        app.create_category(&admin, "Painting").await;

        let res = app
            .post_with_token(
                routes::CATEGORIES,
                &json!({"name": "Painting", "description": "duplicate"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");

        // No duplicate row was persisted.
        let list = app.get_with_token(routes::CATEGORIES, &admin).await;
        let names: Vec<_> = list.body.as_array().unwrap().iter()
            .filter(|c| c["name"] == "Painting")
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn non_admin_cannot_administer_categories() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let (user, _) = app.create_authenticated_user("alice@example.com", "alice").await;
        let id = app.create_category(&admin, "Painting").await;

        let create = app
            .post_with_token(
                routes::CATEGORIES,
                &json!({"name": "Sculpture", "description": "3D works"}),
                &user,
            )
            .await;
        assert_eq!(create.status, 403);
        assert_eq!(create.body["code"], "PERMISSION_DENIED");

        let update = app
            .put_with_token(
                &routes::category(id),
                &json!({"name": "Painting", "description": "edited"}),
                &user,
            )
            .await;
        assert_eq!(update.status, 403);

        let delete = app.delete_with_token(&routes::category(id), &user).await;
        assert_eq!(delete.status, 403);
    }

    #[tokio::test]
    async fn missing_category_is_reported_before_authorization() {
        let app = TestApp::spawn().await;
        let (user, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        // Reads are open to any authenticated user, so 404 (not 403) proves
        // existence is checked first.
        let res = app.get_with_token(&routes::category(999), &user).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn admin_can_update_a_category() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let id = app.create_category(&admin, "Painting").await;

        let res = app
            .put_with_token(
                &routes::category(id),
                &json!({"name": "Oil painting", "description": "updated"}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Oil painting");
    }

    #[tokio::test]
    async fn category_with_subcategories_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let id = app.create_category(&admin, "Painting").await;

        let sub = app
            .post_with_token(
                routes::SUBCATEGORIES,
                &json!({"category_id": id, "name": "Watercolor"}),
                &admin,
            )
            .await;
        assert_eq!(sub.status, 201, "{}", sub.text);

        let res = app.delete_with_token(&routes::category(id), &admin).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");

        // Removing the subcategory unblocks the delete.
        let sub_id = sub.body["subcategory_id"].as_i64().unwrap() as i32;
        let res = app
            .delete_with_token(&routes::subcategory(id, sub_id), &admin)
            .await;
        assert_eq!(res.status, 204);

        let res = app.delete_with_token(&routes::category(id), &admin).await;
        assert_eq!(res.status, 204);

        let res = app.get_with_token(&routes::category(id), &admin).await;
        assert_eq!(res.status, 404);
    }
}

mod subcategories {
    use super::*;

    #[tokio::test]
    async fn subcategory_ids_are_assigned_per_category() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let painting = app.create_category(&admin, "Painting").await;
        let sculpture = app.create_category(&admin, "Sculpture").await;

        let first = app
            .post_with_token(
                routes::SUBCATEGORIES,
                &json!({"category_id": painting, "name": "Watercolor"}),
                &admin,
            )
            .await;
        assert_eq!(first.body["subcategory_id"], 1);

        let second = app
            .post_with_token(
                routes::SUBCATEGORIES,
                &json!({"category_id": painting, "name": "Oil"}),
                &admin,
            )
            .await;
        assert_eq!(second.body["subcategory_id"], 2);

        // A different category starts its own sequence.
        let other = app
            .post_with_token(
                routes::SUBCATEGORIES,
                &json!({"category_id": sculpture, "name": "Marble"}),
                &admin,
            )
            .await;
        assert_eq!(other.body["subcategory_id"], 1);
    }

    #[tokio::test]
    async fn duplicate_name_within_a_category_conflicts() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let painting = app.create_category(&admin, "Painting").await;

        let body = json!({"category_id": painting, "name": "Watercolor"});
        let first = app.post_with_token(routes::SUBCATEGORIES, &body, &admin).await;
        assert_eq!(first.status, 201);

        let res = app.post_with_token(routes::SUBCATEGORIES, &body, &admin).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn creating_under_a_missing_category_is_not_found() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;

        let res = app
            .post_with_token(
                routes::SUBCATEGORIES,
                &json!({"category_id": 999, "name": "Watercolor"}),
                &admin,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn listing_by_category_returns_only_that_categorys_subcategories() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let painting = app.create_category(&admin, "Painting").await;
        let sculpture = app.create_category(&admin, "Sculpture").await;

        for name in ["Watercolor", "Oil"] {
            let res = app
                .post_with_token(
                    routes::SUBCATEGORIES,
                    &json!({"category_id": painting, "name": name}),
                    &admin,
                )
                .await;
            assert_eq!(res.status, 201);
        }
        let res = app
            .post_with_token(
                routes::SUBCATEGORIES,
                &json!({"category_id": sculpture, "name": "Marble"}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 201);

        let list = app
            .get_with_token(&routes::subcategories_of(painting), &admin)
            .await;
        assert_eq!(list.status, 200);
        assert_eq!(list.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_replaces_the_detail_fields() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let painting = app.create_category(&admin, "Painting").await;

        let created = app
            .post_with_token(
                routes::SUBCATEGORIES,
                &json!({"category_id": painting, "name": "Watercolor", "history": "old"}),
                &admin,
            )
            .await;
        let sub_id = created.body["subcategory_id"].as_i64().unwrap() as i32;

        let res = app
            .put_with_token(
                &routes::subcategory(painting, sub_id),
                &json!({"name": "Aquarelle", "history": "new"}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Aquarelle");
        assert_eq!(res.body["history"], "new");
        // Fields omitted from the PUT are cleared.
        assert!(res.body["tutorials"].is_null());
    }
}

mod tags {
    use super::*;

    #[tokio::test]
    async fn admin_can_create_and_list_tags() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let (user, _) = app.create_authenticated_user("alice@example.com", "alice").await;
        let painting = app.create_category(&admin, "Painting").await;

        let res = app
            .post_with_token(
                routes::TAGS,
                &json!({"name": "portrait", "category_id": painting}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        // Any authenticated user can list.
        let list = app.get_with_token(routes::TAGS, &user).await;
        assert_eq!(list.status, 200);
        assert_eq!(list.body[0]["name"], "portrait");
    }

    #[tokio::test]
    async fn tag_creation_requires_admin_and_a_real_category() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let (user, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let forbidden = app
            .post_with_token(routes::TAGS, &json!({"name": "x", "category_id": 1}), &user)
            .await;
        assert_eq!(forbidden.status, 403);

        let missing = app
            .post_with_token(routes::TAGS, &json!({"name": "x", "category_id": 999}), &admin)
            .await;
        assert_eq!(missing.status, 404);
        assert_eq!(missing.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn tag_used_by_a_post_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let (user, _) = app.create_authenticated_user("alice@example.com", "alice").await;
        let painting = app.create_category(&admin, "Painting").await;

        let tag = app
            .post_with_token(
                routes::TAGS,
                &json!({"name": "portrait", "category_id": painting}),
                &admin,
            )
            .await;
        let tag_id = tag.body["id"].as_i64().unwrap() as i32;

        app.create_post(&user, Some("a portrait"), Some(tag_id)).await;

        let res = app.delete_with_token(&routes::tag(tag_id), &admin).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn unused_tag_can_be_deleted() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let painting = app.create_category(&admin, "Painting").await;

        let tag = app
            .post_with_token(
                routes::TAGS,
                &json!({"name": "portrait", "category_id": painting}),
                &admin,
            )
            .await;
        let tag_id = tag.body["id"].as_i64().unwrap() as i32;

        let res = app.delete_with_token(&routes::tag(tag_id), &admin).await;
        assert_eq!(res.status, 204);

        let list = app.get_with_token(routes::TAGS, &admin).await;
        assert_eq!(list.body.as_array().unwrap().len(), 0);
    }
}
