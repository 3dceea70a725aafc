#[tokio::main]
async fn main() -> std::io::Result<()> {
    payments_server::run_with_config().await
}
