use url_likes::infra::config::{AppConfig, StoreConfig};
use url_likes::storage::CounterStore;
use url_likes::PostgresCounterStore;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars (or a .env file):\n\
           DATABASE_URL\n\
         Optional:\n\
           BIND_ADDR, DB_MAX_CONNECTIONS, SAME_DOMAIN_PROTECTION, PLATFORM_HOST_SUFFIX, BASE64_URLS\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if something is off)
    let config = AppConfig::from_env()?;

    println!("> Preflight:");
    println!("  BIND_ADDR={}", config.bind_addr);
    println!(
        "  SAME_DOMAIN_PROTECTION={}",
        config.validation.same_domain_protection
    );
    println!(
        "  PLATFORM_HOST_SUFFIX={}",
        config.validation.platform_host_suffix.as_deref().unwrap_or("<none>")
    );
    println!("  BASE64_URLS={}", config.validation.base64_urls);

    let (database_url, max_connections) = match &config.store {
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => (database_url.as_str(), *max_connections),
        StoreConfig::InMemory => {
            println!("  Store: in-memory (nothing to check).");
            println!("> Preflight OK.");
            return Ok(());
        }
    };

    // Connectivity + schema
    let store = PostgresCounterStore::connect(database_url, max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to DATABASE_URL: {}", e))?;
    store.ping().await?;
    println!("  Database reachable, url_likes table present.");

    let rows = store.count_rows().await?;
    println!("  Stored URLs: {}", rows);

    println!("> Preflight OK.");
    Ok(())
}
