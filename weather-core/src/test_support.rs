use crate::model::WeatherReport;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

pub const LONDON_BODY: &str = r#"{"name":"London","main":{"temp":15.0,"humidity":80},"weather":[{"description":"Clear","icon":"01d"}]}"#;

pub fn london() -> WeatherReport {
    WeatherReport {
        city_name: "London".into(),
        temperature: 15.0,
        humidity_percent: 80,
        description: "Clear".into(),
        icon_id: "01d".into(),
    }
}

pub fn report_for(city: &str) -> WeatherReport {
    WeatherReport {
        city_name: city.into(),
        ..london()
    }
}

/// Serves exactly one HTTP response and hands back the raw request head.
pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}/data/2.5/weather"), handle)
}
