use market::Vector;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    market_server::run(Vector::Skills).await
}
