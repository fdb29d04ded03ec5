use stock_services::{server, ServiceKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run(ServiceKind::Products).await
}
