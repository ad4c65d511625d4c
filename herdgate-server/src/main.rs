#[tokio::main]
async fn main() -> anyhow::Result<()> {
    herdgate_server::start_server().await
}
