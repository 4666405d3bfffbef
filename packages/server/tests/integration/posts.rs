use serde_json::json;

use crate::common::{TestApp, routes};

mod creation {
    use super::*;

    #[tokio::test]
    async fn regular_user_can_publish_a_post() {
        let app = TestApp::spawn().await;
        let (token, id) = app.create_authenticated_user("alice@example.com", "alice").await;

        let res = app.try_create_post(&token, Some("first piece"), None).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        let media_url = res.body["media_url"].as_str().unwrap();
        assert!(media_url.contains("/media/"), "{media_url}");

        let detail = app
            .get_with_token(&routes::post(res.body["id"].as_i64().unwrap() as i32), &token)
            .await;
        assert_eq!(detail.body["description"], "first piece");
        assert_eq!(detail.body["user_id"], id);
        assert_eq!(detail.body["like_count"], 0);
    }

    #[tokio::test]
    async fn admins_cannot_publish() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;

        let res = app.try_create_post(&admin, Some("admin art"), None).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn post_without_an_image_is_rejected() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let form = reqwest::multipart::Form::new().text("description", "no file");
        let res = app
            .client
            .post(app.url(routes::POSTS))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn post_with_an_unknown_tag_is_an_invalid_reference() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let res = app.try_create_post(&token, None, Some(999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "INVALID_REFERENCE");
    }

    #[tokio::test]
    async fn post_carries_its_tag_taxonomy_in_feeds() {
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

        app.create_post(&user, None, Some(tag_id)).await;

        let list = app.get_with_token(routes::POSTS, &user).await;
        let item = &list.body["data"][0];
        assert_eq!(item["tag_id"], tag_id);
        assert_eq!(item["tag_name"], "portrait");
        assert_eq!(item["category_id"], painting);
    }
}

mod feeds {
    use super::*;

    #[tokio::test]
    async fn feed_is_newest_first_with_viewer_flags() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice@example.com", "alice").await;
        let (bob, _) = app.create_authenticated_user("bob@example.com", "bob").await;

        let first = app.create_post(&alice, Some("one"), None).await;
        let second = app.create_post(&alice, Some("two"), None).await;

        app.post_empty_with_token(&routes::post_like(first), &bob).await;

        let list = app.get_with_token(routes::POSTS, &bob).await;
        assert_eq!(list.status, 200);

        let data = list.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["id"], second);
        assert_eq!(data[1]["id"], first);
        assert_eq!(data[1]["liked"], true);
        assert_eq!(data[0]["liked"], false);
        assert_eq!(list.body["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn an_empty_feed_is_an_empty_page_not_an_error() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let list = app.get_with_token(routes::POSTS, &token).await;

        assert_eq!(list.status, 200);
        assert_eq!(list.body["data"].as_array().unwrap().len(), 0);
        assert_eq!(list.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn mine_returns_only_the_callers_posts() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice@example.com", "alice").await;
        let (bob, _) = app.create_authenticated_user("bob@example.com", "bob").await;

        app.create_post(&alice, Some("by alice"), None).await;
        app.create_post(&bob, Some("by bob"), None).await;

        let list = app.get_with_token(routes::POSTS_MINE, &alice).await;
        let data = list.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
    }

    #[tokio::test]
    async fn saved_returns_the_posts_the_caller_bookmarked() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice@example.com", "alice").await;
        let (bob, _) = app.create_authenticated_user("bob@example.com", "bob").await;

        let first = app.create_post(&alice, None, None).await;
        let _second = app.create_post(&alice, None, None).await;

        app.post_empty_with_token(&routes::post_save(first), &bob).await;

        let list = app.get_with_token(routes::POSTS_SAVED, &bob).await;
        let data = list.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], first);
        assert_eq!(data[0]["saved"], true);
    }

    #[tokio::test]
    async fn pagination_slices_the_feed() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        for i in 0..5 {
            app.create_post(&token, Some(&format!("post {i}")), None).await;
        }

        let page = app
            .get_with_token(&format!("{}?page=2&per_page=2", routes::POSTS), &token)
            .await;
        assert_eq!(page.body["data"].as_array().unwrap().len(), 2);
        assert_eq!(page.body["pagination"]["total"], 5);
        assert_eq!(page.body["pagination"]["total_pages"], 3);
    }
}

mod search {
    use super::*;

    #[tokio::test]
    async fn search_matches_category_description_and_username() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let (alice, _) = app.create_authenticated_user("alice@example.com", "alice").await;
        let (bob, _) = app.create_authenticated_user("bob@example.com", "bob").await;

        let painting = app.create_category(&admin, "Painting").await;
        let tag = app
            .post_with_token(
                routes::TAGS,
                &json!({"name": "portrait", "category_id": painting}),
                &admin,
            )
            .await;
        let tag_id = tag.body["id"].as_i64().unwrap() as i32;

        let tagged = app.create_post(&alice, None, Some(tag_id)).await;
        let described = app.create_post(&bob, Some("a quiet landscape"), None).await;
        let by_alice = app.create_post(&alice, Some("untitled"), None).await;

        // Category name match (case-insensitive substring).
        let res = app.get_with_token(&routes::posts_search("paint"), &bob).await;
        let ids: Vec<i64> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![tagged as i64]);

        // Description match.
        let res = app.get_with_token(&routes::posts_search("landscape"), &bob).await;
        assert_eq!(res.body["data"][0]["id"], described);

        // Username match finds everything Alice posted.
        let res = app.get_with_token(&routes::posts_search("alice"), &bob).await;
        let ids: Vec<i64> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert!(ids.contains(&(tagged as i64)));
        assert!(ids.contains(&(by_alice as i64)));
        assert!(!ids.contains(&(described as i64)));
    }

    #[tokio::test]
    async fn search_without_a_term_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let res = app.get_with_token(&routes::posts_search(""), &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn like_wildcards_in_the_term_are_literal() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice@example.com", "alice").await;
        app.create_post(&token, Some("100% effort"), None).await;
        app.create_post(&token, Some("anything else"), None).await;

        let res = app.get_with_token(&routes::posts_search("100%25"), &token).await;
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);

        // A bare '%' must not match everything.
        let res = app.get_with_token(&routes::posts_search("%25zzz%25"), &token).await;
        assert_eq!(res.body["data"].as_array().unwrap().len(), 0);
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn owner_deletes_admin_deletes_stranger_cannot() {
        let app = TestApp::spawn().await;
        let (admin, _) = app.create_admin("boss@example.com", "boss").await;
        let (alice, _) = app.create_authenticated_user("alice@example.com", "alice").await;
        let (bob, _) = app.create_authenticated_user("bob@example.com", "bob").await;

        let post = app.create_post(&alice, None, None).await;

        // Another regular user is forbidden.
        let res = app.delete_with_token(&routes::post(post), &bob).await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        // An admin may delete it.
        let res = app.delete_with_token(&routes::post(post), &admin).await;
        assert_eq!(res.status, 204);

        // And it no longer resolves.
        let res = app.get_with_token(&routes::post(post), &alice).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn owner_can_delete_their_own_post() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let post = app.create_post(&alice, None, None).await;
        let res = app.delete_with_token(&routes::post(post), &alice).await;
        assert_eq!(res.status, 204);
    }

    #[tokio::test]
    async fn deleting_a_post_removes_its_engagement_and_comments() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice@example.com", "alice").await;
        let (bob, bob_id) = app.create_authenticated_user("bob@example.com", "bob").await;

        let post = app.create_post(&alice, None, None).await;
        app.post_empty_with_token(&routes::post_like(post), &bob).await;
        app.post_empty_with_token(&routes::post_save(post), &bob).await;
        let comment = app
            .post_with_token(&routes::post_comments(post), &json!({"content": "nice"}), &bob)
            .await;
        assert_eq!(comment.status, 201);

        let res = app.delete_with_token(&routes::post(post), &alice).await;
        assert_eq!(res.status, 204);

        use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
        use server::entity::{comment as comment_entity, post_like, post_save};

        let likes = post_like::Entity::find()
            .filter(post_like::Column::UserId.eq(bob_id))
            .count(&app.db)
            .await
            .unwrap();
        let saves = post_save::Entity::find()
            .filter(post_save::Column::UserId.eq(bob_id))
            .count(&app.db)
            .await
            .unwrap();
        let comments = comment_entity::Entity::find()
            .filter(comment_entity::Column::PostId.eq(post))
            .count(&app.db)
            .await
            .unwrap();

        assert_eq!((likes, saves, comments), (0, 0, 0));
    }

    #[tokio::test]
    async fn deleting_a_missing_post_is_not_found() {
        let app = TestApp::spawn().await;
        let (alice, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let res = app.delete_with_token(&routes::post(999), &alice).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
