#[tokio::main]
async fn main() {
    if let Err(err) = urlsync::rpc::run_stdio().await {
        eprintln!("urlsync: {}", err);
        std::process::exit(1);
    }
}
