#[tokio::main]
async fn main() -> anyhow::Result<()> {
    roster::startup::run().await
}
