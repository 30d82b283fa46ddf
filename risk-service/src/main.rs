use clap::Parser;
use risk_flow::{ClientConfig, ResponsePolicy};
use risk_service::create_app;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "risk-service", version, about = "HTTP front end for heart risk intake sessions")]
struct Args {
    /// Port to listen on (falls back to $PORT, then 3000)
    #[arg(long)]
    port: Option<u16>,
    /// Prediction endpoint (overrides $RISK_PREDICTION_URL)
    #[arg(long)]
    endpoint: Option<String>,
    /// Response policy: lenient or strict (overrides $RISK_RESPONSE_POLICY)
    #[arg(long)]
    response_policy: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(endpoint) = args.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(policy) = args.response_policy {
        config = config.with_response_policy(policy.parse::<ResponsePolicy>()?);
    }

    let port = args.port.unwrap_or_else(|| {
        std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000)
    });

    let app = create_app(&config);
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    let addr = listener.local_addr()?;

    info!("Heart Risk Intake Service starting on {}", addr);
    info!("Prediction endpoint: {} ({:?})", config.endpoint, config.response_policy);
    info!("Health check endpoint: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
