use profiledir_api::{ApiConfig, ApiRequest, Method, ProfileApi};
use serde_json::{json, Value};

fn api() -> ProfileApi {
    ProfileApi::in_memory().unwrap()
}

fn create(api: &mut ProfileApi, body: Value) -> Value {
    let response = api.handle(&ApiRequest::post("/profile", body.to_string()));
    assert_eq!(response.status, 201, "{}", response.body);
    response.body
}

#[test]
fn health_reports_ok() {
    let response = api().handle(&ApiRequest::get("/health"));
    assert_eq!(response.status, 200);
    assert_eq!(response.body, json!({ "status": "OK" }));
}

#[test]
fn created_profile_is_listed_without_identifiers_and_searchable_with_them() {
    let mut api = api();
    let created = create(
        &mut api,
        json!({ "name": "Ada", "email": "ada@x.com", "skills": ["rust", "go"] }),
    );
    assert_eq!(created["message"], "Profile Created");
    let id = created["profile"]["id"].as_str().unwrap().to_string();

    let listed = api.handle(&ApiRequest::get("/profile"));
    assert_eq!(listed.status, 200);
    let entry = &listed.body["profiles"][0];
    assert_eq!(entry["name"], "Ada");
    assert_eq!(entry["email"], "ada@x.com");
    assert_eq!(entry["skills"], json!(["rust", "go"]));
    assert!(entry.get("id").is_none());
    assert!(entry.get("createdAt").is_none());

    let searched = api.handle(&ApiRequest::get("/search").with_query("q", "ada"));
    assert_eq!(searched.status, 200);
    let results = searched.body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], id.as_str());
    assert_eq!(results[0]["skills"], json!(["rust", "go"]));
    assert!(results[0]["createdAt"].is_i64());
    assert!(results[0]["updatedAt"].is_i64());
}

#[test]
fn duplicate_email_returns_conflict_without_details() {
    let mut api = api();
    create(&mut api, json!({ "name": "Ada", "email": "ada@x.com" }));

    let response = api.handle(&ApiRequest::post(
        "/api/profile",
        json!({ "name": "Other", "email": "ada@x.com" }).to_string(),
    ));
    assert_eq!(response.status, 409);
    assert_eq!(response.body, json!({ "message": "Profile already exist" }));

    let listed = api.handle(&ApiRequest::get("/profile"));
    assert_eq!(listed.body["profiles"].as_array().unwrap().len(), 1);
}

#[test]
fn missing_name_or_bad_json_is_a_client_error() {
    let mut api = api();
    let missing = api.handle(&ApiRequest::post(
        "/profile",
        json!({ "email": "x@x.com" }).to_string(),
    ));
    assert_eq!(missing.status, 400);
    assert_eq!(missing.body["message"], "name is required");

    let malformed = api.handle(&ApiRequest::post("/profile", "{not json"));
    assert_eq!(malformed.status, 400);

    let empty = api.handle(&ApiRequest::new(Method::Post, "/profile"));
    assert_eq!(empty.status, 400);
}

#[test]
fn update_replaces_matching_profile_and_ignores_unknown_email() {
    let mut api = api();
    create(
        &mut api,
        json!({ "name": "Ada", "email": "ada@x.com", "skills": ["rust"] }),
    );

    let updated = api.handle(&ApiRequest::put(
        "/profile",
        json!({ "name": "Ada King", "email": "ada@x.com", "skills": ["math"] }).to_string(),
    ));
    assert_eq!(updated.status, 201);
    assert_eq!(updated.body["message"], "Profile updated");
    assert_eq!(updated.body["matched"], true);

    let unmatched = api.handle(&ApiRequest::put(
        "/profile",
        json!({ "name": "Ghost", "email": "missing@example.com" }).to_string(),
    ));
    assert_eq!(unmatched.status, 201);
    assert_eq!(unmatched.body["matched"], false);

    let listed = api.handle(&ApiRequest::get("/profile"));
    let profiles = listed.body["profiles"].as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["name"], "Ada King");
    assert_eq!(profiles[0]["skills"], json!(["math"]));
}

#[test]
fn list_is_newest_first() {
    let mut api = api();
    create(&mut api, json!({ "name": "First", "email": "1@x.com" }));
    create(&mut api, json!({ "name": "Second", "email": "2@x.com" }));

    let listed = api.handle(&ApiRequest::get("/profile"));
    let names: Vec<&str> = listed.body["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|profile| profile["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[test]
fn empty_search_returns_every_profile() {
    let mut api = api();
    create(&mut api, json!({ "name": "Ada", "email": "ada@x.com" }));
    create(&mut api, json!({ "name": "Bo", "email": "bo@x.com" }));

    for target in ["/search", "/search?q="] {
        let response = api.handle(&ApiRequest::get(target));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["results"].as_array().unwrap().len(), 2);
    }
}

#[test]
fn whitespace_search_is_a_real_query() {
    let mut api = api();
    create(&mut api, json!({ "name": "Ada King", "email": "ada@x.com" }));
    create(&mut api, json!({ "name": "Bo", "email": "bo@x.com" }));

    let response = api.handle(&ApiRequest::get("/search?q=+"));
    assert_eq!(response.status, 200);
    let results = response.body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Ada King");
}

#[test]
fn padded_email_is_normalized_on_create_and_update() {
    let mut api = api();
    create(&mut api, json!({ "name": "Ada", "email": "ada@x.com" }));

    let body = json!({ "name": "Ada King", "email": " ada@x.com " }).to_string();
    for _ in 0..2 {
        let updated = api.handle(&ApiRequest::put("/profile", body.clone()));
        assert_eq!(updated.status, 201);
        assert_eq!(updated.body["matched"], true);
    }

    let duplicate = api.handle(&ApiRequest::post(
        "/profile",
        json!({ "name": "Copy", "email": "ada@x.com" }).to_string(),
    ));
    assert_eq!(duplicate.status, 409);

    let created = create(&mut api, json!({ "name": "Pad", "email": "  pad@x.com" }));
    assert_eq!(created["profile"]["email"], "pad@x.com");
    let updated = api.handle(&ApiRequest::put(
        "/profile",
        json!({ "name": "Pad", "email": "  pad@x.com" }).to_string(),
    ));
    assert_eq!(updated.body["matched"], true);

    let listed = api.handle(&ApiRequest::get("/profile"));
    let emails: Vec<&str> = listed.body["profiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|profile| profile["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["pad@x.com", "ada@x.com"]);
}

#[test]
fn projects_and_top_skills_follow_the_contract() {
    let mut api = api();
    create(
        &mut api,
        json!({
            "name": "Ada",
            "email": "ada@x.com",
            "skills": ["go", "rust"],
            "projects": [
                { "title": "dashboard", "skills": ["react"] },
                { "title": "legacy", "skills": ["React"] }
            ]
        }),
    );
    create(
        &mut api,
        json!({ "name": "Bo", "email": "bo@x.com", "skills": ["rust"] }),
    );

    let react = api.handle(&ApiRequest::get("/projects?skill=react"));
    assert_eq!(react.status, 200);
    assert_eq!(
        react.body,
        json!({ "projects": [{ "title": "dashboard", "skills": ["react"] }] })
    );

    let all = api.handle(&ApiRequest::get("/api/projects"));
    assert_eq!(all.body["projects"].as_array().unwrap().len(), 2);

    let top = api.handle(&ApiRequest::get("/skills/top"));
    assert_eq!(top.status, 200);
    assert_eq!(top.body, json!({ "topSkills": ["rust", "go"] }));

    let limited = api.handle(&ApiRequest::get("/skills/top?limit=1"));
    assert_eq!(limited.body, json!({ "topSkills": ["rust"] }));

    let invalid = api.handle(&ApiRequest::get("/skills/top?limit=many"));
    assert_eq!(invalid.status, 400);
}

#[test]
fn duplicate_project_title_across_profiles_is_a_conflict() {
    let mut api = api();
    create(
        &mut api,
        json!({ "name": "Ada", "email": "ada@x.com", "projects": [{ "title": "engine" }] }),
    );
    let response = api.handle(&ApiRequest::post(
        "/profile",
        json!({ "name": "Bo", "email": "bo@x.com", "projects": [{ "title": "engine" }] })
            .to_string(),
    ));
    assert_eq!(response.status, 409);
}

#[test]
fn unknown_routes_and_methods_are_rejected() {
    let mut api = api();
    assert_eq!(api.handle(&ApiRequest::get("/nope")).status, 404);
    assert_eq!(
        api.handle(&ApiRequest::new(Method::Delete, "/profile")).status,
        405
    );
    assert_eq!(
        api.handle(&ApiRequest::new(Method::Post, "/health")).status,
        405
    );
}

#[test]
fn file_backed_directory_persists_between_opens() {
    let dir = tempfile::tempdir().unwrap();
    let config = ApiConfig {
        db_path: dir.path().join("profiles.sqlite3"),
        ..ApiConfig::default()
    };

    {
        let mut api = ProfileApi::open(&config).unwrap();
        create(&mut api, json!({ "name": "Ada", "email": "ada@x.com" }));
    }

    let mut reopened = ProfileApi::open(&config).unwrap();
    let listed = reopened.handle(&ApiRequest::get("/profile"));
    assert_eq!(listed.body["profiles"][0]["email"], "ada@x.com");
}
