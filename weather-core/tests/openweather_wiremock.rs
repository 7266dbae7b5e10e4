//! OpenWeather provider and query client against a mock HTTP server.

use std::sync::Arc;

use weather_core::{
    ClientOptions, ConditionsView, ForecastMode, LastCityStore, MemoryLastCityStore,
    OpenWeatherProvider, QueryError, QueryStatus, TemperatureDisplay, WeatherProvider,
    WeatherQueryClient, error::{NETWORK_MESSAGE, NOT_FOUND_MESSAGE, PROVIDER_MESSAGE},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn galle_current() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 80.217, "lat": 6.0367 },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
        "base": "stations",
        "main": {
            "temp": 27.5,
            "feels_like": 30.9,
            "temp_min": 27.5,
            "temp_max": 27.5,
            "pressure": 1009,
            "humidity": 80
        },
        "visibility": 10000,
        "wind": { "speed": 3.2, "deg": 250 },
        "clouds": { "all": 75 },
        "dt": 1723474800,
        "sys": { "country": "LK", "sunrise": 1723423051, "sunset": 1723467539 },
        "timezone": 19800,
        "id": 1246294,
        "name": "Galle",
        "cod": 200
    })
}

fn forecast_payload(entries: usize) -> serde_json::Value {
    let list: Vec<_> = (0..entries)
        .map(|i| {
            serde_json::json!({
                "dt": 1723474800 + 10800 * i as i64,
                "main": { "temp": 25.0 + i as f64 / 10.0, "feels_like": 27.0, "pressure": 1010, "humidity": 85 },
                "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
                "wind": { "speed": 4.1, "deg": 240 },
                "dt_txt": "2024-08-12 15:00:00"
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "message": 0,
        "cnt": entries,
        "list": list,
        "city": { "id": 1246294, "name": "Galle", "country": "LK" }
    })
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" }))
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::builder("TEST_KEY")
        .base_url(server.uri())
        .timeout_secs(Some(5))
        .build()
        .expect("Failed to create provider")
}

fn client_for(
    provider: OpenWeatherProvider,
    options: ClientOptions,
) -> (WeatherQueryClient, Arc<MemoryLastCityStore>) {
    let store = Arc::new(MemoryLastCityStore::default());
    let client = WeatherQueryClient::new(Arc::new(provider), store.clone(), options);
    (client, store)
}

async fn mount(server: &MockServer, endpoint: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Base URL on a port nothing listens on.
fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

// ============================================================================
// Provider
// ============================================================================

#[tokio::test]
async fn current_request_sends_city_key_and_metric_units() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Galle"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(galle_current()))
        .expect(1)
        .mount(&server)
        .await;

    let current = provider_for(&server).current_conditions("Galle").await;
    let current = current.expect("conditions");

    assert_eq!(current.city_name, "Galle");
    assert_eq!(current.country_code, "LK");
    assert_eq!(current.condition.label, "Clouds");
    assert_eq!(current.condition.icon, "04d");
    assert!((current.temperature_c - 27.5).abs() < f64::EPSILON);
    assert!((current.feels_like_c - 30.9).abs() < f64::EPSILON);
    assert_eq!(current.humidity_pct, 80);
    assert_eq!(current.pressure_hpa, 1009);
    assert!((current.wind_speed_mps - 3.2).abs() < f64::EPSILON);
}

#[tokio::test]
async fn forecast_preserves_provider_order() {
    let server = MockServer::start().await;
    mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_payload(40))).await;

    let entries = provider_for(&server).forecast("Galle").await.expect("forecast");

    assert_eq!(entries.len(), 40);
    assert_eq!(entries[0].timestamp, 1723474800);
    assert!(entries.windows(2).all(|w| w[1].timestamp - w[0].timestamp == 10800));
    assert_eq!(entries[0].condition.description, "light rain");
}

#[tokio::test]
async fn city_not_found_is_classified() {
    let server = MockServer::start().await;
    mount(&server, "/weather", not_found()).await;

    let result = provider_for(&server).current_conditions("Nowhereistan").await;

    assert!(matches!(result, Err(QueryError::NotFound)), "Expected NotFound, got: {result:?}");
}

#[tokio::test]
async fn invalid_key_is_a_provider_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/weather",
        ResponseTemplate::new(401).set_body_json(serde_json::json!({ "cod": 401, "message": "Invalid API key." })),
    )
    .await;

    let result = provider_for(&server).current_conditions("Galle").await;

    assert!(
        matches!(result, Err(QueryError::Provider { status: Some(401), .. })),
        "Expected Provider(401), got: {result:?}"
    );
}

#[tokio::test]
async fn malformed_success_body_is_a_provider_error() {
    let server = MockServer::start().await;
    mount(&server, "/weather", ResponseTemplate::new(200).set_body_string("not valid json")).await;

    let result = provider_for(&server).current_conditions("Galle").await;

    assert!(
        matches!(result, Err(QueryError::Provider { status: Some(200), .. })),
        "Expected Provider, got: {result:?}"
    );
}

#[tokio::test]
async fn no_listener_is_network_unreachable() {
    let provider = OpenWeatherProvider::builder("TEST_KEY")
        .base_url(unreachable_base_url())
        .build()
        .expect("provider");

    let result = provider.current_conditions("Galle").await;

    assert!(
        matches!(result, Err(QueryError::NetworkUnreachable(_))),
        "Expected NetworkUnreachable, got: {result:?}"
    );
}

// ============================================================================
// Query client end to end
// ============================================================================

#[tokio::test]
async fn galle_scenario_renders_expected_strings() {
    let server = MockServer::start().await;
    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(galle_current())).await;

    let options = ClientOptions { forecast: ForecastMode::Disabled, ..ClientOptions::default() };
    let (client, store) = client_for(provider_for(&server), options);

    let state = client.submit_query("Galle").await;
    assert_eq!(state.status, QueryStatus::Success);

    let current = state.current.as_ref().expect("conditions present");
    let raw = ConditionsView::new(current, TemperatureDisplay::Raw);
    let whole = ConditionsView::new(current, TemperatureDisplay::Whole);

    assert_eq!(raw.temperature, "27.5°C");
    assert_eq!(whole.temperature, "27°C");
    assert_eq!(raw.humidity, "80%");
    assert_eq!(raw.wind, "3.2 m/s");
    assert_eq!(raw.location, "Galle, LK");
    assert_eq!(store.load().unwrap().as_deref(), Some("Galle"));
}

#[tokio::test]
async fn nowhereistan_scenario_shows_not_found() {
    let server = MockServer::start().await;
    mount(&server, "/weather", not_found()).await;
    mount(&server, "/forecast", not_found()).await;

    let (client, store) = client_for(provider_for(&server), ClientOptions::default());

    let state = client.submit_query("Nowhereistan").await;

    assert_eq!(state.status, QueryStatus::Error);
    assert_eq!(state.error_message.as_deref(), Some(NOT_FOUND_MESSAGE));
    assert!(state.current.is_none());
    assert!(state.forecast.is_none());
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn server_error_shows_generic_message() {
    let server = MockServer::start().await;
    mount(&server, "/weather", ResponseTemplate::new(500).set_body_string("Internal Server Error")).await;

    let options = ClientOptions { forecast: ForecastMode::Disabled, ..ClientOptions::default() };
    let (client, _) = client_for(provider_for(&server), options);

    let state = client.submit_query("Galle").await;

    assert_eq!(state.error_message.as_deref(), Some(PROVIDER_MESSAGE));
}

#[tokio::test]
async fn offline_query_shows_network_message_without_stale_data() {
    let server = MockServer::start().await;
    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(galle_current())).await;

    let options = ClientOptions { forecast: ForecastMode::Disabled, ..ClientOptions::default() };
    let store = Arc::new(MemoryLastCityStore::default());
    let online = WeatherQueryClient::new(Arc::new(provider_for(&server)), store.clone(), options.clone());
    assert_eq!(online.submit_query("Galle").await.status, QueryStatus::Success);

    let offline_provider = OpenWeatherProvider::builder("TEST_KEY")
        .base_url(unreachable_base_url())
        .build()
        .expect("provider");
    let offline = WeatherQueryClient::new(Arc::new(offline_provider), store.clone(), options);

    let state = offline.submit_query("Galle").await;

    assert_eq!(state.status, QueryStatus::Error);
    assert_eq!(state.error_message.as_deref(), Some(NETWORK_MESSAGE));
    assert!(state.current.is_none());
}

#[tokio::test]
async fn empty_city_sends_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(galle_current()))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = client_for(provider_for(&server), ClientOptions::default());

    let state = client.submit_query("").await;

    assert_eq!(state.status, QueryStatus::Idle);
}

#[tokio::test]
async fn truncated_forecast_exposes_first_fifteen() {
    let server = MockServer::start().await;
    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(galle_current())).await;
    mount(&server, "/forecast", ResponseTemplate::new(200).set_body_json(forecast_payload(40))).await;

    let options = ClientOptions {
        forecast: ForecastMode::AfterConditions,
        truncate_forecast: true,
        ..ClientOptions::default()
    };
    let (client, _) = client_for(provider_for(&server), options);

    let state = client.submit_query("Galle").await;
    let forecast = state.forecast.as_ref().expect("forecast present");

    assert_eq!(forecast.len(), 15);
    assert_eq!(forecast[0].timestamp, 1723474800);
    assert_eq!(forecast[14].timestamp, 1723474800 + 14 * 10800);
}

#[tokio::test]
async fn forecast_uses_submitted_city() {
    let server = MockServer::start().await;
    mount(&server, "/weather", ResponseTemplate::new(200).set_body_json(galle_current())).await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Colombo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_payload(3)))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = client_for(provider_for(&server), ClientOptions::default());

    let state = client.submit_query("Colombo").await;

    assert_eq!(state.forecast.as_ref().map(Vec::len), Some(3));
}
