use journald_native::app;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    app::main().await
}
