#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use timetable::{Timetable, http_api, load_timetable_from_json};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr: SocketAddr = std::env::var("TIMETABLE_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let timetable = match std::env::var("TIMETABLE_CONFIG") {
        Ok(path) => load_timetable_from_json(&path)?,
        Err(_) => Timetable::new(),
    };

    println!("timetable HTTP API listening on http://{addr}");
    http_api::serve(addr, timetable).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
