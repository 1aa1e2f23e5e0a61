use anyhow::Result;
use httpmock::prelude::*;
use icon_deck::{router, AppState, ServiceSettings};
use std::io::{Cursor, Read};

const UNREACHABLE: &str = "http://127.0.0.1:1";

/// 在隨機埠啟動服務並回傳 base URL
async fn spawn_app(settings: ServiceSettings) -> Result<String> {
    let state = AppState::from_settings(&settings)?;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.ok();
    });

    Ok(format!("http://{}", address))
}

fn settings_with(search_endpoint: &str, placeholder_endpoint: &str) -> ServiceSettings {
    ServiceSettings {
        search_endpoint: search_endpoint.to_string(),
        placeholder_endpoint: placeholder_endpoint.to_string(),
        ..ServiceSettings::default()
    }
}

fn png_bytes() -> Vec<u8> {
    let image = image::RgbaImage::new(16, 16);
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, image::ImageFormat::Png)
        .unwrap();
    cursor.into_inner()
}

fn slide_xml(pptx: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(pptx)).unwrap();
    let mut slide = archive.by_name("ppt/slides/slide1.xml").unwrap();
    let mut content = String::new();
    slide.read_to_string(&mut content).unwrap();
    content
}

#[tokio::test]
async fn test_root_returns_message() -> Result<()> {
    let base = spawn_app(settings_with(UNREACHABLE, UNREACHABLE)).await?;

    let response = reqwest::get(format!("{}/", base)).await?;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body, serde_json::json!({"message": "Icon to PowerPoint API"}));
    Ok(())
}

#[tokio::test]
async fn test_search_icons_mixes_matches_and_placeholders() -> Result<()> {
    let server = MockServer::start();

    let home_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("query", "home")
            .query_param("limit", "1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"icons": ["mdi:home"]}));
    });

    let arrow_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("query", "arrow");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"icons": []}));
    });

    let base = spawn_app(settings_with(&server.base_url(), "https://via.placeholder.com")).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/search-icons", base))
        .json(&serde_json::json!({"icon_names": ["home", "arrow"]}))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    home_mock.assert();
    arrow_mock.assert();

    let body: serde_json::Value = response.json().await?;
    assert_eq!(
        body,
        serde_json::json!({
            "icons": [
                {"name": "home", "url": server.url("/mdi:home.svg?height=128")},
                {"name": "arrow", "url": "https://via.placeholder.com/128/4A90E2/FFFFFF?text=AR"}
            ]
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_search_icons_empty_list() -> Result<()> {
    let base = spawn_app(settings_with(UNREACHABLE, UNREACHABLE)).await?;

    let body: serde_json::Value = reqwest::Client::new()
        .post(format!("{}/search-icons", base))
        .json(&serde_json::json!({"icon_names": []}))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body, serde_json::json!({"icons": []}));
    Ok(())
}

#[tokio::test]
async fn test_search_icons_is_stable_across_calls() -> Result<()> {
    let base = spawn_app(settings_with(UNREACHABLE, "https://via.placeholder.com")).await?;
    let client = reqwest::Client::new();
    let request = serde_json::json!({"icon_names": ["b", "a", "b", "c"]});

    let mut runs = Vec::new();
    for _ in 0..2 {
        let body: serde_json::Value = client
            .post(format!("{}/search-icons", base))
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        let icons = body["icons"].as_array().unwrap().clone();
        for icon in &icons {
            let url = url::Url::parse(icon["url"].as_str().unwrap())?;
            assert!(matches!(url.scheme(), "http" | "https"));
        }
        let names: Vec<String> = icons
            .iter()
            .map(|icon| icon["name"].as_str().unwrap().to_string())
            .collect();
        runs.push(names);
    }

    assert_eq!(runs[0], vec!["b", "a", "b", "c"]);
    assert_eq!(runs[0], runs[1]);
    Ok(())
}

#[tokio::test]
async fn test_malformed_request_is_rejected() -> Result<()> {
    let base = spawn_app(settings_with(UNREACHABLE, UNREACHABLE)).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/search-icons", base))
        .json(&serde_json::json!({"names": ["home"]}))
        .send()
        .await?;

    assert!(response.status().is_client_error());
    Ok(())
}

#[tokio::test]
async fn test_generate_powerpoint_returns_pptx_attachment() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(503);
    });

    let placeholder_mock = server.mock(|when, then| {
        when.method(GET).path("/128/4A90E2/FFFFFF");
        then.status(200)
            .header("Content-Type", "image/png")
            .body(png_bytes());
    });

    let base = spawn_app(settings_with(&server.base_url(), &server.base_url())).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/generate-powerpoint", base))
        .json(&serde_json::json!({"icon_names": ["home", "settings"]}))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    );
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"icons.pptx\""
    );

    let bytes = response.bytes().await?;
    placeholder_mock.assert_hits(2);

    let xml = slide_xml(&bytes);
    assert_eq!(xml.matches("<p:pic>").count(), 2);
    assert!(xml.contains("<a:t>home</a:t>"));
    assert!(xml.contains("<a:t>settings</a:t>"));
    Ok(())
}

#[tokio::test]
async fn test_generate_powerpoint_empty_list_has_only_title() -> Result<()> {
    let base = spawn_app(settings_with(UNREACHABLE, UNREACHABLE)).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/generate-powerpoint", base))
        .json(&serde_json::json!({"icon_names": []}))
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let xml = slide_xml(&response.bytes().await?);

    assert_eq!(xml.matches("<p:sp>").count(), 1);
    assert_eq!(xml.matches("<p:pic>").count(), 0);
    assert!(xml.contains("<a:t>Your Icons</a:t>"));
    Ok(())
}

#[tokio::test]
async fn test_cors_allows_any_origin_with_credentials() -> Result<()> {
    let base = spawn_app(settings_with(UNREACHABLE, UNREACHABLE)).await?;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/search-icons", base))
        .header("Origin", "https://frontend.example")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await?;

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"],
        "https://frontend.example"
    );
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(headers["access-control-allow-methods"], "POST");
    Ok(())
}
