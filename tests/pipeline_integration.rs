//! Integration tests for the fetch pipeline using wiremock.
//!
//! Each test points the client at a mock server standing in for the
//! geocoding, parks directory and forecast services.

use std::time::Duration;

use chrono::NaiveDate;
use parkcast::config::ApiConfig;
use parkcast::driver::{self, LocationPrompt};
use parkcast::{Coordinates, ParksApiClient, ResponseCache, ScoreWindow, cache_key};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 4, 18).unwrap()
}

fn window() -> ScoreWindow {
    ScoreWindow::new(today(), 4)
}

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        geocoding_url: format!("{}/geocode/json", server.uri()),
        geocoding_key: "geo_key_123".to_string(),
        parks_url: format!("{}/api/v1/parks", server.uri()),
        parks_key: "parks_key_123".to_string(),
        forecast_url: format!("{}/data/2.5/forecast", server.uri()),
        weather_key: "weather_key_123".to_string(),
        ..ApiConfig::default()
    }
}

fn client(server: &MockServer) -> ParksApiClient {
    ParksApiClient::new(api_config(server)).unwrap()
}

/// Helper to create a forecast body with two samples per day at the given cloudiness
fn forecast(cloudiness: f64, condition: &str) -> Value {
    let list: Vec<Value> = (18..=23)
        .flat_map(|day| {
            ["06:00:00", "15:00:00"].map(|time| {
                json!({
                    "dt_txt": format!("2022-04-{day} {time}"),
                    "main": {"temp": 52.3, "humidity": 64},
                    "weather": [{"main": condition, "description": "test"}],
                    "clouds": {"all": cloudiness}
                })
            })
        })
        .collect();
    json!({"cod": "200", "cnt": list.len(), "list": list})
}

/// Helper to create a parks directory entry
fn park(name: &str, code: &str, latitude: &str, longitude: &str) -> Value {
    json!({
        "fullName": name,
        "parkCode": code,
        "description": format!("{name} description"),
        "latitude": latitude,
        "longitude": longitude,
        "activities": [{"id": "a1", "name": "Hiking"}, {"id": "a2", "name": "Kayaking"}],
        "topics": [{"id": "t1", "name": "Lakes"}],
        "states": "MI",
        "directionsUrl": format!("https://www.nps.gov/{code}/planyourvisit/directions.htm"),
        "designation": "National Lakeshore"
    })
}

fn geocode_ok(address: &str, country: &str, state: &str) -> Value {
    json!({
        "status": "OK",
        "results": [{
            "formatted_address": address,
            "geometry": {"location": {"lat": 42.2808256, "lng": -83.7430378}},
            "address_components": [
                {"types": ["locality", "political"], "short_name": "Ann Arbor"},
                {"types": ["administrative_area_level_1", "political"], "short_name": state},
                {"types": ["country", "political"], "short_name": country}
            ]
        }]
    })
}

async fn mount_forecast(server: &MockServer, lat: &str, cloudiness: f64) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", lat))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast(cloudiness, "Clouds")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_forecast_maps_every_sample() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "44.5"))
        .and(query_param("lon", "-85.25"))
        .and(query_param("appid", "weather_key_123"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast(40.0, "Rain")))
        .expect(1)
        .mount(&server)
        .await;

    let coords = Coordinates::new(44.5, -85.25);
    let points = client(&server).fetch_forecast(coords).await.unwrap();

    assert_eq!(points.len(), 12);
    let first = &points[0];
    assert_eq!(first.coords, coords);
    assert_eq!(first.date, today());
    assert_eq!(first.hour, 6);
    assert_eq!(first.temp, 52.3);
    assert_eq!(first.humidity, 64.0);
    assert_eq!(first.condition, "Rain");
    assert_eq!(first.cloudiness, 40.0);
    assert_eq!(points[11].date, NaiveDate::from_ymd_opt(2022, 4, 23).unwrap());
    assert_eq!(points[11].hour, 15);
}

#[tokio::test]
async fn test_fetch_forecast_malformed_body_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": [{"dt_txt": "garbage"}]})))
        .mount(&server)
        .await;

    let result = client(&server).fetch_forecast(Coordinates::new(1.0, 2.0)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_fetch_location_zero_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&server)
        .await;

    let location = client(&server).fetch_location("qwertyuiop").await.unwrap();
    assert!(location.is_none());
}

#[tokio::test]
async fn test_fetch_location_escapes_address() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "Ann Arbor, MI +1"))
        .and(query_param("key", "geo_key_123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(geocode_ok("Ann Arbor, MI, USA", "US", "MI")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let location = client(&server)
        .fetch_location("Ann Arbor, MI +1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(location.name, "Ann Arbor, MI, USA");
    assert_eq!(location.country.as_deref(), Some("US"));
    assert_eq!(location.state.as_deref(), Some("MI"));
}

#[tokio::test]
async fn test_parks_response_is_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parks"))
        .and(query_param("stateCode", "MI"))
        .and(query_param("api_key", "parks_key_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": "1",
            "data": [park("Isle Royale National Park", "isro", "48.0", "-88.9")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_forecast(&server, "48", 25.0).await;

    let client = client(&server);
    let mut cache = ResponseCache::empty("unused.json");

    let first = client
        .fetch_parks_by_state(Some("MI"), &mut cache, window())
        .await
        .unwrap();
    let key = cache_key(&api_config(&server).parks_url, &["MI"]);
    assert!(cache.get(&key).is_some());

    let second = client
        .fetch_parks_by_state(Some("MI"), &mut cache, window())
        .await
        .unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert_eq!(first[0].cloudiness, 25.0);
    assert_eq!(first[0].info.states, vec!["MI"]);
}

#[tokio::test]
async fn test_parks_without_coordinates_are_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                park("North Country National Scenic Trail", "noco", "", ""),
                park("Keweenaw National Historical Park", "kewe", "47.2", "-88.4")
            ]
        })))
        .mount(&server)
        .await;
    mount_forecast(&server, "47.2", 50.0).await;

    let mut cache = ResponseCache::empty("unused.json");
    let parks = client(&server)
        .fetch_parks_by_state(Some("MI"), &mut cache, window())
        .await
        .unwrap();

    assert_eq!(parks.len(), 1);
    assert_eq!(parks[0].info.park_code, "kewe");
}

#[tokio::test]
async fn test_forecast_failure_aborts_recommendation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                park("Good Park", "good", "44.1", "-85.1"),
                park("Broken Park", "brkn", "45.1", "-86.1")
            ]
        })))
        .mount(&server)
        .await;
    mount_forecast(&server, "44.1", 10.0).await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "45.1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut cache = ResponseCache::empty("unused.json");
    let result = client(&server)
        .fetch_parks_by_state(Some("MI"), &mut cache, window())
        .await;

    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("Broken Park"));
}

#[tokio::test]
async fn test_concurrent_forecasts_keep_directory_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                park("Slow Park", "slow", "44.1", "-85.1"),
                park("Fast Park", "fast", "45.1", "-86.1"),
                park("Other Park", "othr", "46.1", "-87.1")
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "44.1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast(30.0, "Clouds"))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    mount_forecast(&server, "45.1", 30.0).await;
    mount_forecast(&server, "46.1", 30.0).await;

    let mut config = api_config(&server);
    config.max_concurrent_forecasts = 3;
    let client = ParksApiClient::new(config).unwrap();

    let mut cache = ResponseCache::empty("unused.json");
    let parks = client
        .fetch_parks_by_state(Some("MI"), &mut cache, window())
        .await
        .unwrap();

    let codes: Vec<&str> = parks.iter().map(|p| p.info.park_code.as_str()).collect();
    assert_eq!(codes, vec!["slow", "fast", "othr"]);

    // Equal scores keep directory order through ranking too
    let recommendation = parkcast::recommend::recommend(parks, window()).unwrap();
    assert_eq!(recommendation.park.info.park_code, "slow");
}

#[tokio::test]
async fn test_ann_arbor_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "Ann Arbor, MI"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(geocode_ok("Ann Arbor, MI, USA", "US", "MI")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/parks"))
        .and(query_param("stateCode", "MI"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                park("Sleeping Bear Dunes National Lakeshore", "slbe", "44.88", "-86.04"),
                park("Pictured Rocks National Lakeshore", "piro", "46.56", "-86.32")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_forecast(&server, "44.88", 20.0).await;
    mount_forecast(&server, "46.56", 60.0).await;

    let client = client(&server);
    let mut output = Vec::new();
    let location = LocationPrompt::new(std::io::Cursor::new("Ann Arbor, MI\n"), &mut output, None)
        .run(&client)
        .await
        .unwrap();
    assert_eq!(location.state.as_deref(), Some("MI"));

    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("cache.json");
    let recommendation =
        driver::find_recommendation(&client, &location, &cache_path, window(), None)
            .await
            .unwrap()
            .unwrap();

    assert_eq!(recommendation.park.info.name, "Sleeping Bear Dunes National Lakeshore");
    assert_eq!(recommendation.percent_clear, 80);

    let text = recommendation.to_string();
    assert!(text.contains("I recommend you go visit Sleeping Bear Dunes National Lakeshore!"));
    assert!(text.contains("It will be 80% clear skies over the next four days."));
    assert!(text.contains("This National Lakeshore offers the following activities: Hiking, Kayaking"));

    // The parks response was persisted under its request key
    let saved = ResponseCache::load(&cache_path).unwrap();
    let key = cache_key(&api_config(&server).parks_url, &["MI"]);
    assert!(saved.get(&key).is_some());

    // A second run is served from the saved cache
    let again = driver::find_recommendation(&client, &location, &cache_path, window(), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.park.info.park_code, "slbe");
}

#[tokio::test]
async fn test_activity_filter_changes_pick() {
    let server = MockServer::start().await;

    let mut wet = park("Wet Park", "wetp", "44.1", "-85.1");
    wet["activities"] = json!([{"id": "a9", "name": "Fishing"}]);
    Mock::given(method("GET"))
        .and(path("/api/v1/parks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [park("Clear Park", "clrp", "45.1", "-86.1"), wet]
        })))
        .mount(&server)
        .await;
    mount_forecast(&server, "45.1", 5.0).await;
    mount_forecast(&server, "44.1", 70.0).await;

    let client = client(&server);
    let location = parkcast::Location::with_region(
        "Lansing, MI, USA".to_string(),
        Coordinates::new(42.7, -84.5),
        Some("US".to_string()),
        Some("MI".to_string()),
    );
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("cache.json");

    let recommendation =
        driver::find_recommendation(&client, &location, &cache_path, window(), Some("fish"))
            .await
            .unwrap()
            .unwrap();
    assert_eq!(recommendation.park.info.park_code, "wetp");
    assert_eq!(recommendation.percent_clear, 30);

    let none = driver::find_recommendation(&client, &location, &cache_path, window(), Some("skiing"))
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn test_country_only_geocode_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "formatted_address": "United States",
                "geometry": {"location": {"lat": 38.7945952, "lng": -106.5348379}},
                "address_components": [
                    {"types": ["country", "political"], "short_name": "US"}
                ]
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/parks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let location = client.fetch_location("USA").await.unwrap().unwrap();
    assert_eq!(location.country.as_deref(), Some("US"));
    assert!(location.state.is_none());

    let err = driver::resolve_address(&client, "USA").await.unwrap_err();
    assert!(err.to_string().contains("US state"));

    let mut output = Vec::new();
    let result = LocationPrompt::new(std::io::Cursor::new("USA\n"), &mut output, None)
        .run(&client)
        .await;
    assert!(result.is_err());
    assert!(String::from_utf8(output).unwrap().contains(driver::RETRY_MESSAGE));
}

#[tokio::test]
async fn test_parks_without_state_use_blank_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parks"))
        .and(query_param("api_key", "parks_key_123"))
        .and(query_param_is_missing("stateCode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [park("Isle Royale National Park", "isro", "48.0", "-88.9")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_forecast(&server, "48", 25.0).await;

    let mut cache = ResponseCache::empty("unused.json");
    let parks = client(&server)
        .fetch_parks_by_state(None, &mut cache, window())
        .await
        .unwrap();

    assert_eq!(parks.len(), 1);
    let key = format!("{}/api/v1/parks_", server.uri());
    assert_eq!(key, cache_key(&api_config(&server).parks_url, &[""]));
    assert!(cache.get(&key).is_some());
}

#[tokio::test]
async fn test_saved_cache_file_skips_parks_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/parks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;
    mount_forecast(&server, "46.56", 60.0).await;

    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("cache.json");
    let mut seeded = ResponseCache::empty(&cache_path);
    seeded.insert(
        cache_key(&api_config(&server).parks_url, &["MI"]),
        json!({"data": [park("Pictured Rocks National Lakeshore", "piro", "46.56", "-86.32")]}),
    );
    seeded.save().unwrap();

    let location = parkcast::Location::with_region(
        "Marquette, MI, USA".to_string(),
        Coordinates::new(46.54, -87.39),
        Some("US".to_string()),
        Some("MI".to_string()),
    );
    let recommendation =
        driver::find_recommendation(&client(&server), &location, &cache_path, window(), None)
            .await
            .unwrap()
            .unwrap();

    assert_eq!(recommendation.park.info.park_code, "piro");
    assert_eq!(recommendation.percent_clear, 40);
    assert_eq!(ResponseCache::load(&cache_path).unwrap().len(), 1);
}
