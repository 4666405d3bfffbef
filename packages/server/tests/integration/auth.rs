use serde_json::json;

use crate::common::{TestApp, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_account_can_register_with_valid_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "alice@example.com", "password": "securepass", "username": "alice"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "alice");
    }

    #[tokio::test]
    async fn cannot_register_the_same_email_twice() {
        let app = TestApp::spawn().await;
        let body = json!({"email": "alice@example.com", "password": "securepass", "username": "alice"});

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_a_malformed_email() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "not-an-email", "password": "securepass", "username": "alice"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_a_short_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "alice@example.com", "password": "short", "username": "alice"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_a_blank_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "alice@example.com", "password": "securepass", "username": "   "}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_account_can_login_and_receives_token() {
        let app = TestApp::spawn().await;
        let body = json!({"email": "alice@example.com", "password": "securepass", "username": "alice"});

        let reg = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "alice@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["role"], "user");
        assert!(res.body["id"].is_number());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice@example.com", "alice")
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "alice@example.com", "password": "wrong-password"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_email_is_rejected_with_the_same_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "ghost@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn admin_membership_yields_the_admin_role() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_admin("boss@example.com", "boss").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["role"], "admin");
    }
}

mod identity {
    use super::*;

    #[tokio::test]
    async fn me_round_trips_the_token_identity() {
        let app = TestApp::spawn().await;
        let (token, id) = app.create_authenticated_user("alice@example.com", "alice").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["role"], "user");
    }

    #[tokio::test]
    async fn role_is_frozen_into_the_token_at_issuance() {
        let app = TestApp::spawn().await;
        let (token, id) = app.create_authenticated_user("alice@example.com", "alice").await;

        // Promotion after login must not affect the already-issued token.
        app.grant_admin(id).await;

        let res = app.get_with_token(routes::ME, &token).await;
        assert_eq!(res.body["role"], "user");

        // A fresh login picks the new role up.
        let (new_token, _) = app.login("alice@example.com").await;
        let res = app.get_with_token(routes::ME, &new_token).await;
        assert_eq!(res.body["role"], "admin");
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn profile_returns_username_and_no_avatar_initially() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let res = app.get_with_token(routes::USER, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice");
        assert!(res.body["avatar_url"].is_null());
    }

    #[tokio::test]
    async fn username_can_be_changed() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let res = app
            .put_with_token(routes::USERNAME, &json!({"username": "alice_draws"}), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice_draws");

        let res = app.get_with_token(routes::USER, &token).await;
        assert_eq!(res.body["username"], "alice_draws");
    }

    #[tokio::test]
    async fn blank_username_update_is_rejected() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let res = app
            .put_with_token(routes::USERNAME, &json!({"username": ""}), &token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn avatar_upload_persists_a_served_media_url() {
        let app = TestApp::spawn().await;
        let (token, _) = app.create_authenticated_user("alice@example.com", "alice").await;

        let part = reqwest::multipart::Part::bytes(crate::common::TINY_PNG.to_vec())
            .file_name("me.png")
            .mime_str("image/png")
            .unwrap();
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = app
            .client
            .put(app.url(routes::AVATAR))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body: serde_json::Value = res.json().await.unwrap();

        let avatar_url = body["avatar_url"].as_str().unwrap();
        let stored = avatar_url.rsplit('/').next().unwrap();

        // The stored file is served back with an image content type.
        let served = app
            .client
            .get(app.url(&format!("/media/{stored}")))
            .send()
            .await
            .unwrap();
        assert_eq!(served.status().as_u16(), 200);
        assert_eq!(
            served.headers()["content-type"].to_str().unwrap(),
            "image/png"
        );
    }
}
