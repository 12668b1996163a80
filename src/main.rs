#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stock_screener_lib::run().await
}
