#[tokio::main]
async fn main() -> anyhow::Result<()> {
    speech_kids_backend::run().await
}
