#[tokio::main]
async fn main() -> anyhow::Result<()> {
    factlens_cli::cli::app::run().await
}
