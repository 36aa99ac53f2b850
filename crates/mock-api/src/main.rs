use tokio::net::TcpListener;
use waypost_mock_api::MockApi;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let addr = std::env::var("WAYPOST_MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:8787".to_string());
    let key = std::env::var("WAYPOST_MOCK_KEY").unwrap_or_else(|_| "dev.local.key".to_string());
    let listener = TcpListener::bind(&addr).await?;
    println!("waypost mock api listening on {addr}");
    MockApi::new(key).serve(listener).await
}
