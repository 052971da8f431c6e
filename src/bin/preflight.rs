use animal_shelter::app::seed::seed_reference_data;
use animal_shelter::domain::model::{Animal, AnimalType, CollectionRecord, Vet};
use animal_shelter::infra::{telemetry, Config};
use animal_shelter::{DocumentStore, PostgresDocumentStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--seed]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL\n\
         Options:\n\
           --seed   insert default animal types and vets into empty collections\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let seed = args.iter().any(|a| a == "--seed");

    let config = Config::from_env()?;
    println!("> Preflight:");
    println!("  bind address: {}", config.bind_addr);
    println!("  max connections: {}", config.max_connections);

    let store = PostgresDocumentStore::connect(&config.database_url, config.max_connections).await?;
    store.ping().await?;
    println!("  Store reachable.");

    store.ensure_schema().await?;
    println!("  Schema present.");

    if seed {
        let report = seed_reference_data(&store).await?;
        println!(
            "  Seeded {} animal types and {} vets.",
            report.animal_types_inserted, report.vets_inserted
        );
    }

    for collection in [Animal::COLLECTION, AnimalType::COLLECTION, Vet::COLLECTION] {
        let n = store.count(collection).await?;
        println!("  {}: {} documents", collection, n);
    }

    if store.count(AnimalType::COLLECTION).await? == 0 {
        eprintln!("  Warning: no animal types; animals cannot be created. Re-run with --seed");
    }
    if store.count(Vet::COLLECTION).await? == 0 {
        eprintln!("  Warning: no vets; checkups cannot be added. Re-run with --seed");
    }

    store.close().await;
    println!("> Preflight OK.");
    Ok(())
}
