use inventory_api::infra::{Config, CorsOrigins, StoreBackend};
use inventory_api::storage::pool::create_pool;
use inventory_api::{PgProductStore, ProductStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--create-schema]\n\
         \n\
         Requires env vars (or a .env file):\n\
           DATABASE_URL, or DB_HOST, DB_USER, DB_PASSWORD, DB_NAME [DB_PORT]\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let create_schema = args.iter().any(|a| a == "--create-schema");

    // Force-read config (nice error messages if missing)
    let config = Config::from_env()?;

    println!("> Preflight:");
    println!("  BIND_ADDR={}", config.bind_addr);
    match &config.cors_origins {
        CorsOrigins::Any => println!("  CORS origins: any"),
        CorsOrigins::List(list) => println!("  CORS origins: {:?}", list),
    }
    println!("  SEED_SAMPLE_PRODUCTS={}", config.seed_sample_products);

    let db_config = match &config.store {
        StoreBackend::Postgres(db) => db,
        StoreBackend::Memory => {
            println!("  STORE=memory, nothing to check.");
            println!("> Preflight OK.");
            return Ok(());
        }
    };

    let pool = create_pool(db_config)
        .await
        .map_err(|e| anyhow::anyhow!("Database unreachable: {}", e))?;
    let store = PgProductStore::new(pool);
    store.ping().await?;
    println!("  Database connection ok.");

    if store.table_exists().await? {
        println!("  Table `product` exists.");
    } else if create_schema {
        println!("  Table `product` missing -> creating...");
        store.ensure_schema().await?;
        println!("  Table `product` created.");
    } else {
        return Err(anyhow::anyhow!(
            "Table `product` does not exist. Re-run with --create-schema"
        ));
    }

    println!("> Preflight OK.");
    Ok(())
}
