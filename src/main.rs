#[tokio::main]
async fn main() {
    crypto_recommend::cli::run().await;
}
