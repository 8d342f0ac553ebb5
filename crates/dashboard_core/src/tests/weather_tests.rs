use std::collections::HashMap;

use super::*;
use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_weather_server(status: StatusCode) -> anyhow::Result<String> {
    let app = Router::new().route(
        "/weather",
        get(move |Query(query): Query<HashMap<String, String>>| async move {
            if query.get("appid").map(String::as_str) != Some("test-key")
                || query.get("q").map(String::as_str) != Some(WEATHER_CITY)
            {
                return (StatusCode::UNAUTHORIZED, Json(json!({})));
            }
            let body: Value = json!({
                "main": { "temp": 12.5 },
                "weather": [{ "description": "ciel dégagé" }]
            });
            (status, Json(body))
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/weather"))
}

#[tokio::test]
async fn renders_rounded_temperature_and_description() {
    let url = spawn_weather_server(StatusCode::OK).await.expect("spawn server");
    let client = WeatherClient::new(url, "test-key");

    let widget = client.widget().await;
    assert_eq!(widget.label(), "13°C ciel dégagé");
}

#[tokio::test]
async fn server_errors_make_the_widget_unavailable() {
    let url = spawn_weather_server(StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .expect("spawn server");
    let client = WeatherClient::new(url, "test-key");

    assert_eq!(client.widget().await, WeatherWidget::Unavailable);
}

#[tokio::test]
async fn placeholder_key_disables_the_widget() {
    let client = WeatherClient::new("http://127.0.0.1:9/unreachable", "VOTRE_CLE_OPENWEATHER");
    assert!(!client.is_configured());
    assert_eq!(client.widget().await, WeatherWidget::Unconfigured);
    assert_eq!(client.widget().await.label(), "Configurer OPEN_WEATHER_KEY");
}

#[test]
fn label_omits_a_missing_description() {
    let widget = WeatherWidget::Current {
        temperature_c: 11.6,
        description: String::new(),
    };
    assert_eq!(widget.label(), "12°C");
}
