mod common;

use axum::http::{Method, StatusCode};
use common::{facility_body, setup_app};
use sea_orm::ConnectionTrait;
use serde_json::json;

#[tokio::test]
async fn test_create_then_retrieve_read_shape() {
    let t = setup_app().await;

    let (status, created) = t
        .send(
            Method::POST,
            "/facilities/",
            Some(json!({
                "facility_name": "テスト",
                "address": "東京都台東区浅草2-3-1",
                "capacity": 4
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["facility_name"], "テスト");
    assert_eq!(created["amenities"], json!([]));
    assert!(created.get("images").is_none(), "write shape has no images");

    let id = created["id"].as_i64().unwrap();
    let (status, detail) = t.get(&format!("/facilities/{}/", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["facility_name"], "テスト");
    assert_eq!(detail["capacity"], 4);
    assert_eq!(detail["amenities"], json!([]));
    assert_eq!(detail["images"], json!([]));
    assert_eq!(detail["num_parking"], 0);
    assert_eq!(detail["management_entity"], "IH");
    assert_eq!(detail["prop_key"], "");
    assert_eq!(detail["map_url"], "");
}

#[tokio::test]
async fn test_create_requires_name_and_address() {
    let t = setup_app().await;

    let (status, body) = t
        .send(Method::POST, "/facilities/", Some(json!({ "capacity": 2 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["facility_name"][0], "This field is required.");
    assert_eq!(body["address"][0], "This field is required.");

    let (status, body) = t
        .send(
            Method::POST,
            "/facilities/",
            Some(json!({ "facility_name": "海辺の宿" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("address").is_some());
    assert!(body.get("facility_name").is_none());

    let (_, list) = t.get("/facilities/").await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_capacity_and_parking_boundaries() {
    let t = setup_app().await;

    for (capacity, expected) in [
        (0, StatusCode::BAD_REQUEST),
        (1, StatusCode::CREATED),
        (20, StatusCode::CREATED),
        (21, StatusCode::BAD_REQUEST),
    ] {
        let mut body = facility_body("capacity");
        body["capacity"] = json!(capacity);
        let (status, res) = t.send(Method::POST, "/facilities/", Some(body)).await;
        assert_eq!(status, expected, "capacity {}: {}", capacity, res);
        if expected == StatusCode::BAD_REQUEST {
            assert!(res.get("capacity").is_some());
        }
    }

    for (parking, expected) in [
        (-1, StatusCode::BAD_REQUEST),
        (0, StatusCode::CREATED),
        (10, StatusCode::CREATED),
        (11, StatusCode::BAD_REQUEST),
    ] {
        let mut body = facility_body("parking");
        body["num_parking"] = json!(parking);
        let (status, res) = t.send(Method::POST, "/facilities/", Some(body)).await;
        assert_eq!(status, expected, "num_parking {}: {}", parking, res);
        if expected == StatusCode::BAD_REQUEST {
            assert!(res.get("num_parking").is_some());
        }
    }

    let (_, list) = t.get("/facilities/").await;
    assert_eq!(list.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_patch_out_of_range_keeps_value() {
    let t = setup_app().await;
    let mut body = facility_body("湯の宿");
    body["capacity"] = json!(6);
    let id = t.create_facility(body).await;
    let uri = format!("/facilities/{}/", id);

    let (status, res) = t
        .send(Method::PATCH, &uri, Some(json!({ "capacity": 99 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["capacity"][0], "Ensure this value is less than or equal to 20.");

    let (_, detail) = t.get(&uri).await;
    assert_eq!(detail["capacity"], 6);

    let (status, res) = t
        .send(Method::PATCH, &uri, Some(json!({ "capacity": 8 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["capacity"], 8);
    assert_eq!(res["facility_name"], "湯の宿");
}

#[tokio::test]
async fn test_put_requires_fields_and_keeps_omitted_values() {
    let t = setup_app().await;
    let mut body = facility_body("山荘");
    body["room_key"] = json!("R-101");
    let id = t.create_facility(body).await;
    let uri = format!("/facilities/{}/", id);

    let (status, res) = t
        .send(Method::PUT, &uri, Some(json!({ "capacity": 3 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(res.get("facility_name").is_some());
    assert!(res.get("address").is_some());

    let (status, res) = t
        .send(
            Method::PUT,
            &uri,
            Some(json!({
                "facility_name": "山荘 別館",
                "address": "長野県松本市安曇4468",
                "management_entity": "CONTRACT"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", res);
    assert_eq!(res["facility_name"], "山荘 別館");
    assert_eq!(res["management_entity"], "CM");
    assert_eq!(res["room_key"], "R-101");
}

#[tokio::test]
async fn test_field_rule_messages() {
    let t = setup_app().await;

    let mut body = facility_body("x");
    body["facility_name"] = json!("名".repeat(201));
    body["map_url"] = json!("not a url");
    body["management_entity"] = json!("OWNER");
    let (status, res) = t.send(Method::POST, "/facilities/", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res["facility_name"][0],
        "Ensure this field has no more than 200 characters."
    );
    assert_eq!(res["map_url"][0], "Enter a valid URL.");
    assert_eq!(res["management_entity"][0], "\"OWNER\" is not a valid choice.");

    let (status, res) = t
        .send(
            Method::POST,
            "/facilities/",
            Some(json!({ "facility_name": "a", "address": "b", "capacity": "many" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(res["detail"].is_string());
}

#[tokio::test]
async fn test_explicit_null_is_rejected() {
    let t = setup_app().await;
    let mut body = facility_body("白樺荘");
    body["capacity"] = json!(5);
    let id = t.create_facility(body).await;
    let uri = format!("/facilities/{}/", id);

    let (status, res) = t
        .send(
            Method::PATCH,
            &uri,
            Some(json!({ "facility_name": null, "capacity": null })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["facility_name"], json!(["This field may not be null."]));
    assert_eq!(res["capacity"], json!(["This field may not be null."]));

    let (_, detail) = t.get(&uri).await;
    assert_eq!(detail["facility_name"], "白樺荘");
    assert_eq!(detail["capacity"], 5);

    let (status, res) = t
        .send(
            Method::POST,
            "/facilities/",
            Some(json!({ "facility_name": null, "address": "札幌市中央区北1条西2丁目" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["facility_name"], json!(["This field may not be null."]));

    let (_, list) = t.get("/facilities/").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_amenities_expand_in_read_shape() {
    let t = setup_app().await;
    let wifi = t.create_amenity("Wi-Fi").await;
    let onsen = t.create_amenity("温泉").await;
    let _unused = t.create_amenity("サウナ").await;

    let mut body = facility_body("旅館");
    body["amenities"] = json!([wifi, onsen]);
    let (status, created) = t.send(Method::POST, "/facilities/", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["amenities"], json!([wifi, onsen]));

    let (_, detail) = t.get(&format!("/facilities/{}/", created["id"])).await;
    assert_eq!(
        detail["amenities"],
        json!([{ "id": wifi, "name": "Wi-Fi" }, { "id": onsen, "name": "温泉" }])
    );

    let (_, list) = t.get("/facilities/").await;
    assert_eq!(list[0]["amenities"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_amenity_is_rejected() {
    let t = setup_app().await;
    let wifi = t.create_amenity("Wi-Fi").await;

    let mut body = facility_body("民宿");
    body["amenities"] = json!([wifi, 999]);
    let (status, res) = t.send(Method::POST, "/facilities/", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res["amenities"][0],
        "Invalid pk \"999\" - object does not exist."
    );

    let (_, list) = t.get("/facilities/").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_replaces_or_keeps_amenity_set() {
    let t = setup_app().await;
    let a = t.create_amenity("駐車場").await;
    let b = t.create_amenity("朝食").await;
    let mut body = facility_body("ペンション");
    body["amenities"] = json!([a]);
    let id = t.create_facility(body).await;
    let uri = format!("/facilities/{}/", id);

    let (_, res) = t
        .send(Method::PATCH, &uri, Some(json!({ "short_description": "静かな宿" })))
        .await;
    assert_eq!(res["amenities"], json!([a]));

    let (_, res) = t
        .send(Method::PATCH, &uri, Some(json!({ "amenities": [b] })))
        .await;
    assert_eq!(res["amenities"], json!([b]));

    let (_, res) = t
        .send(Method::PATCH, &uri, Some(json!({ "amenities": [] })))
        .await;
    assert_eq!(res["amenities"], json!([]));
}

#[tokio::test]
async fn test_set_and_add_amenities() {
    let t = setup_app().await;
    let a = t.create_amenity("Wi-Fi").await as i32;
    let b = t.create_amenity("温泉").await as i32;
    let c = t.create_amenity("サウナ").await as i32;
    let id = t.create_facility(facility_body("ホテル")).await as i32;
    let facilities = &t.state.facilities;

    facilities.set_amenities(id, &[a, b]).await.unwrap();
    facilities.add_amenities(id, &[b, c, c]).await.unwrap();

    let (_, detail) = t.get(&format!("/facilities/{}/", id)).await;
    let ids: Vec<i64> = detail["amenities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![a as i64, b as i64, c as i64]);

    facilities.set_amenities(id, &[c]).await.unwrap();
    let (_, detail) = t.get(&format!("/facilities/{}/", id)).await;
    assert_eq!(detail["amenities"], json!([{ "id": c, "name": "サウナ" }]));

    assert!(facilities.add_amenities(id, &[12345]).await.is_err());
    assert!(facilities.set_amenities(9999, &[a]).await.is_err());
}

#[tokio::test]
async fn test_delete_cascades_images_and_keeps_amenities() {
    let t = setup_app().await;
    let wifi = t.create_amenity("Wi-Fi").await;
    let mut body = facility_body("コテージ");
    body["amenities"] = json!([wifi]);
    let id = t.create_facility(body).await;

    for caption in ["外観", "客室", "浴室"] {
        t.upload_image(id, caption).await;
    }
    assert_eq!(t.storage.keys().len(), 3);

    let (status, body) = t.delete(&format!("/facilities/{}/", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (status, _) = t.get(&format!("/facilities/{}/", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, images) = t.get("/images/").await;
    assert!(images.as_array().unwrap().is_empty());
    assert!(t.storage.keys().is_empty());

    let (status, amenity) = t.get(&format!("/amenities/{}/", wifi)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amenity["name"], "Wi-Fi");
}

#[tokio::test]
async fn test_delete_failure_reports_detail_and_rolls_back() {
    let t = setup_app().await;
    let id = t.create_facility(facility_body("倉庫")).await;
    t.upload_image(id, "正面").await;

    t.state
        .db
        .execute_unprepared(
            "CREATE TRIGGER block_facility_delete BEFORE DELETE ON facilities \
             BEGIN SELECT RAISE(ABORT, 'facility deletion blocked'); END;",
        )
        .await
        .unwrap();

    let (status, body) = t.delete(&format!("/facilities/{}/", id)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error during deletion:"), "{}", detail);
    assert!(detail.contains("facility deletion blocked"), "{}", detail);

    let (status, detail) = t.get(&format!("/facilities/{}/", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["images"].as_array().unwrap().len(), 1);
    assert_eq!(t.storage.keys().len(), 1);
}

#[tokio::test]
async fn test_missing_facility_is_404() {
    let t = setup_app().await;

    for uri in ["/facilities/42/", "/facilities/abc/"] {
        let (status, body) = t.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "No record matches the given query.");
    }

    let (status, _) = t.delete("/facilities/42/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t
        .send(Method::PATCH, "/facilities/42/", Some(json!({ "capacity": 2 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_and_health() {
    let t = setup_app().await;

    let (status, content_type, body) = t.get_raw("/index/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    assert_eq!(body, b"hello, world.");

    let (status, health) = t.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["database"], "connected");
    assert_eq!(health["storage"], "connected");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
}
