use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, Request},
    response::Response,
    routing::any,
};
use clap::Parser;
use color_eyre::{Result, eyre::Context};
use portico::{
    Gateway, GatewayHttpHandler, StubForwarder,
    config::{GatewayConfigValidator, loader::load_config},
    tracing_setup,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Validate configuration file
    Validate {
        /// Configuration file to validate
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Initialize a new configuration file
    Init {
        /// Output path for the new config file
        #[clap(short, long, default_value = "config.toml")]
        config: String,
    },
    /// Start the gateway server (default)
    Serve {
        /// Configuration file to use
        #[clap(short, long, default_value = "config.toml")]
        config: String,

        /// Override the configured listen port
        #[clap(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let (config_path, port_override) = match args.command {
        Some(Commands::Validate { config }) => {
            return validate_config_command(&config).await;
        }
        Some(Commands::Init { config }) => {
            return init_config_command(&config).await;
        }
        Some(Commands::Serve { config, port }) => (config, port),
        None => (args.config, None),
    };

    tracing_setup::init_tracing()?;

    tracing::info!("Loading configuration from {config_path}");

    let mut config = load_config(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {config_path}"))?;

    GatewayConfigValidator::validate(&config).context("Configuration validation failed")?;

    if let Some(port) = port_override {
        tracing::info!(port, "Overriding configured port from command line");
        config.port = port;
    }

    let config = Arc::new(config);
    let forwarder = Arc::new(StubForwarder::new(&config));
    let gateway =
        Arc::new(Gateway::new(config.clone(), forwarder).context("Failed to build gateway")?);

    let handler = Arc::new(GatewayHttpHandler::new(gateway));

    let make_request_route = |handler: Arc<GatewayHttpHandler>| {
        any(
            move |ConnectInfo(client_addr): ConnectInfo<SocketAddr>, req: Request| {
                let handler = handler.clone();
                async move {
                    match handler.handle_request(req, Some(client_addr)).await {
                        Ok(response) => Ok::<Response<Body>, std::convert::Infallible>(response),
                        Err(e) => {
                            tracing::error!("Request handling error: {:?}", e);
                            let error_response = Response::builder()
                                .status(500)
                                .body(Body::from("Internal Server Error"))
                                .unwrap_or_else(|_| {
                                    Response::new(Body::from("Internal Server Error"))
                                });
                            Ok(error_response)
                        }
                    }
                }
            },
        )
    };

    let app = Router::new()
        .route("/{*path}", make_request_route(handler.clone()))
        .route("/", make_request_route(handler.clone()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!(
        "Portico gateway listening on {} ({} upstreams, {} routes)",
        addr,
        config.upstreams.len(),
        config.routes.len()
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Portico gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install ctrl-c handler: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Validate configuration file and exit
async fn validate_config_command(config_path: &str) -> Result<()> {
    println!("🔍 Validating configuration file: {config_path}");

    if !Path::new(config_path).exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' not found");
        std::process::exit(1);
    }

    let config = match load_config(config_path).await {
        Ok(config) => {
            println!("✅ Configuration parsing: OK");
            config
        }
        Err(e) => {
            eprintln!("❌ Configuration parsing failed:");
            eprintln!("   {e}");
            std::process::exit(1);
        }
    };

    match GatewayConfigValidator::validate(&config) {
        Ok(()) => {
            println!("✅ Configuration validation: OK");
            println!();
            println!("📋 Configuration Summary:");
            println!("   • Port: {}", config.port);
            println!(
                "   • Rate limit: {} requests per {} ms",
                config.rate_limit.max, config.rate_limit.window_ms
            );
            println!("   • Upstreams: {}", config.upstreams.len());
            println!("   • Routes: {}", config.routes.len());
            println!();
            println!("🎉 Configuration is valid and ready to use!");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed:");
            eprintln!("{e}");
            println!();
            println!("💡 Common fixes:");
            println!("   • Ensure upstream URLs start with http:// or https://");
            println!("   • Route prefixes must start with '/'");
            println!("   • rate_limit.window_ms and rate_limit.max must be positive");
            std::process::exit(1);
        }
    }
}

/// Initialize a new configuration file
async fn init_config_command(config_path: &str) -> Result<()> {
    let path = Path::new(config_path);
    if path.exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' already exists");
        std::process::exit(1);
    }

    let default_config = r#"# Portico Gateway Configuration

# The port to listen on
port = 8080

# Per-client fixed-window rate limiting
[rate_limit]
window_ms = 60000
max = 100

# Named upstream destinations
[upstreams]
users = "http://localhost:3001"
orders = "http://localhost:3002"

# Routes are matched in order: the first registered prefix wins
[[routes]]
prefix = "/api/users"
upstream = "users"

[[routes]]
prefix = "/api/orders"
upstream = "orders"
"#;

    tokio::fs::write(path, default_config)
        .await
        .context("Failed to write config file")?;
    println!("✅ Created default configuration at: {config_path}");
    println!("   Run 'portico serve --config {config_path}' to start the server");
    Ok(())
}
