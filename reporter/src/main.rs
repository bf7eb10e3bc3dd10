use metric_reporter::core::CoreApp;

#[tokio::main]
async fn main() {
    if let Err(e) = CoreApp::run().await {
        eprintln!("\nError: {:#}\n", e);
        std::process::exit(1);
    }
    // A blocked stdin read would otherwise keep the runtime from dropping
    std::process::exit(0);
}
