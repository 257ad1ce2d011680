use super::profiles::is_valid_token;
use super::Store;
use chrono::NaiveDate;
use creatorflow_core::{IdeaDraft, SessionState, TodoDraft};

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    Store::in_memory().await.unwrap()
}

#[test]
fn token_format_validation() {
    assert!(is_valid_token("CF-ABCDEF"));
    assert!(is_valid_token("CF-7A3F01"));
    assert!(is_valid_token("CF-1"));

    assert!(!is_valid_token("CF"), "prefix without dash or suffix");
    assert!(!is_valid_token("CF-"), "empty suffix");
    assert!(!is_valid_token("cf-abcdef"), "lowercase");
    assert!(!is_valid_token("CF-ABC DEF"), "whitespace");
    assert!(!is_valid_token("XX-ABCDEF"), "wrong prefix");
    assert!(!is_valid_token(""), "empty");
}

#[tokio::test]
async fn unknown_chat_resolves_to_none() {
    let store = test_store().await;
    let profile = store.find_by_chat(555).await.unwrap();
    assert!(profile.is_none());
}

#[tokio::test]
async fn issued_token_binds_chat_once() {
    let store = test_store().await;
    let user_id = store.create_user("Lena").await.unwrap();
    let token = store.issue_linking_token(&user_id).await.unwrap();
    assert!(is_valid_token(&token), "issued token must pass validation");

    let bound = store.bind_chat(&token, 555).await.unwrap();
    let profile = bound.expect("valid token should bind");
    assert_eq!(profile.user_id, user_id);
    assert_eq!(profile.display_name, "Lena");
    assert_eq!(profile.telegram_chat_id, Some(555));

    let resolved = store.find_by_chat(555).await.unwrap();
    assert_eq!(resolved.unwrap().user_id, user_id);

    // Consumed: the same token can never bind a second chat.
    let again = store.bind_chat(&token, 777).await.unwrap();
    assert!(again.is_none(), "consumed token must be rejected");
    assert!(store.find_by_chat(777).await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_token_short_circuits_without_lookup() {
    let store = test_store().await;

    // Break the schema so any profile query would error. The format check
    // must reject the token before a query is ever made.
    sqlx::raw_sql("DROP TABLE profiles")
        .execute(store.pool())
        .await
        .unwrap();

    let result = store.bind_chat("CF", 555).await;
    assert!(
        matches!(result, Ok(None)),
        "malformed token must be rejected before any lookup"
    );

    let result = store.bind_chat("CF-ABCDEF", 555).await;
    assert!(
        result.is_err(),
        "well-formed token reaches the database and surfaces the failure"
    );
}

#[tokio::test]
async fn unresolvable_token_mutates_nothing() {
    let store = test_store().await;
    let user_id = store.create_user("Lena").await.unwrap();
    let token = store.issue_linking_token(&user_id).await.unwrap();

    let bound = store.bind_chat("CF-XXXXXX", 555).await.unwrap();
    assert!(bound.is_none());
    assert!(store.find_by_chat(555).await.unwrap().is_none());

    // The outstanding token is untouched and still works.
    let bound = store.bind_chat(&token, 555).await.unwrap();
    assert!(bound.is_some());
}

#[tokio::test]
async fn rebinding_a_chat_releases_the_previous_profile() {
    let store = test_store().await;
    let first = store.create_user("First").await.unwrap();
    let second = store.create_user("Second").await.unwrap();

    let token = store.issue_linking_token(&first).await.unwrap();
    store.bind_chat(&token, 555).await.unwrap().unwrap();

    let token = store.issue_linking_token(&second).await.unwrap();
    let bound = store.bind_chat(&token, 555).await.unwrap().unwrap();
    assert_eq!(bound.user_id, second);

    let resolved = store.find_by_chat(555).await.unwrap().unwrap();
    assert_eq!(resolved.user_id, second, "chat must now belong to Second");
}

#[tokio::test]
async fn binding_drops_any_stale_session() {
    let store = test_store().await;
    let user_id = store.create_user("Lena").await.unwrap();
    store
        .session_set(&user_id, &SessionState::IdeaTitle)
        .await
        .unwrap();

    let token = store.issue_linking_token(&user_id).await.unwrap();
    store.bind_chat(&token, 555).await.unwrap().unwrap();

    let session = store.session_get(&user_id).await.unwrap();
    assert!(session.is_idle(), "binding must reset the session");
}

#[tokio::test]
async fn reissuing_invalidates_the_previous_token() {
    let store = test_store().await;
    let user_id = store.create_user("Lena").await.unwrap();
    let old = store.issue_linking_token(&user_id).await.unwrap();
    let new = store.issue_linking_token(&user_id).await.unwrap();

    assert!(store.bind_chat(&old, 555).await.unwrap().is_none());
    assert!(store.bind_chat(&new, 555).await.unwrap().is_some());
}

#[tokio::test]
async fn issuing_for_unknown_user_fails() {
    let store = test_store().await;
    let result = store.issue_linking_token("no-such-user").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn session_roundtrip_and_idle_clears() {
    let store = test_store().await;
    let user_id = store.create_user("Lena").await.unwrap();

    assert!(store.session_get(&user_id).await.unwrap().is_idle());

    let state = SessionState::IdeaReference {
        title: "Unboxing".to_string(),
    };
    store.session_set(&user_id, &state).await.unwrap();
    assert_eq!(store.session_get(&user_id).await.unwrap(), state);

    store
        .session_set(&user_id, &SessionState::Idle)
        .await
        .unwrap();
    assert!(store.session_get(&user_id).await.unwrap().is_idle());

    let (blob,): (Option<String>,) =
        sqlx::query_as("SELECT bot_session FROM profiles WHERE user_id = ?")
            .bind(&user_id)
            .fetch_one(store.pool())
            .await
            .unwrap();
    assert!(blob.is_none(), "idle must be stored as NULL, not a blob");
}

#[tokio::test]
async fn unknown_user_and_corrupt_blob_read_as_idle() {
    let store = test_store().await;
    assert!(store.session_get("no-such-user").await.unwrap().is_idle());

    let user_id = store.create_user("Lena").await.unwrap();
    sqlx::query("UPDATE profiles SET bot_session = 'not json' WHERE user_id = ?")
        .bind(&user_id)
        .execute(store.pool())
        .await
        .unwrap();
    assert!(store.session_get(&user_id).await.unwrap().is_idle());
}

#[tokio::test]
async fn committed_idea_gets_defaults_and_owner() {
    let store = test_store().await;
    let user_id = store.create_user("Lena").await.unwrap();

    let draft = IdeaDraft {
        title: "Review new phone".to_string(),
        reference_link: String::new(),
        description: "Great unboxing angle".to_string(),
    };
    let id = store.create_idea(&user_id, &draft).await.unwrap();
    assert!(!id.is_empty());

    let ideas = store.ideas_for_user(&user_id).await.unwrap();
    assert_eq!(ideas.len(), 1);
    assert_eq!(ideas[0].title, "Review new phone");
    assert_eq!(ideas[0].reference_link, "");
    assert_eq!(ideas[0].description, "Great unboxing angle");
    assert_eq!(ideas[0].status, "idea", "new ideas start at the idea stage");
}

#[tokio::test]
async fn committed_todo_stores_date_or_null() {
    let store = test_store().await;
    let user_id = store.create_user("Lena").await.unwrap();

    store
        .create_todo(
            &user_id,
            &TodoDraft {
                task_name: "Edit episode 4".to_string(),
                due_date: NaiveDate::from_ymd_opt(2025, 1, 20),
            },
        )
        .await
        .unwrap();
    store
        .create_todo(
            &user_id,
            &TodoDraft {
                task_name: "Plan shoot".to_string(),
                due_date: None,
            },
        )
        .await
        .unwrap();

    let todos = store.todos_for_user(&user_id).await.unwrap();
    assert_eq!(todos.len(), 2);

    let dated = todos.iter().find(|t| t.task_name == "Edit episode 4").unwrap();
    assert_eq!(dated.due_date.as_deref(), Some("2025-01-20"));
    assert!(!dated.is_completed);

    let undated = todos.iter().find(|t| t.task_name == "Plan shoot").unwrap();
    assert!(undated.due_date.is_none());
}
