use millet_ai_services::domain::rotation::mask_key;
use millet_ai_services::infra::config;
use millet_ai_services::{CallOutcome, CatalogStore, GeminiClient, GenerateRequest, LanguageModel};

const PROBE_PROMPT: &str = "Explain 'Millet' in 5 words.";

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--probe-keys]\n\
         \n\
         Reads env vars:\n\
           GEMINI_API_KEYS (or GEMINI_API_KEY), GEMINI_MODEL, GEMINI_BASE_URL,\n\
           DATABASE_URL, SERVICE_API_KEY\n\
         \n\
         --probe-keys  send one short prompt with every configured key\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let probe_keys = args.iter().any(|a| a == "--probe-keys");

    let keys = config::gemini_api_keys();
    let database_url = config::database_url();
    let client = GeminiClient::from_env()?;

    println!("> Preflight:");
    println!("  GEMINI_MODEL={}", client.model());
    println!("  GEMINI_BASE_URL={}", client.base_url());
    println!("  DATABASE_URL={}", database_url);
    println!("  API keys configured: {}", keys.len());
    for (i, key) in keys.iter().enumerate() {
        println!("    [{}] {}", i, mask_key(key));
    }
    if keys.is_empty() {
        eprintln!("  Warning: no Gemini API keys; AI endpoints will only return fallback answers.");
    }

    // Catalog reachable (creates the schema if missing)
    let catalog = CatalogStore::connect(&database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Catalog database unreachable at {}: {}", database_url, e))?;
    sqlx::query("SELECT 1").execute(catalog.pool()).await?;
    println!("  Catalog database reachable (ok).");

    if probe_keys {
        if keys.is_empty() {
            return Err(anyhow::anyhow!("--probe-keys given but no API keys are configured"));
        }

        let request = GenerateRequest::text(PROBE_PROMPT);
        let mut working = 0;
        for (i, key) in keys.iter().enumerate() {
            match client.generate(key, &request).await {
                CallOutcome::Success(g) => {
                    working += 1;
                    println!("    [{}] {} ok: {}", i, mask_key(key), g.text.trim());
                }
                CallOutcome::RateLimited => println!("    [{}] {} rate limited", i, mask_key(key)),
                CallOutcome::Transient(e) => println!("    [{}] {} failed: {}", i, mask_key(key), e),
                CallOutcome::ParseFault(e) => {
                    println!("    [{}] {} unreadable reply: {}", i, mask_key(key), e)
                }
            }
        }

        if working == 0 {
            return Err(anyhow::anyhow!("None of the {} configured keys produced a reply", keys.len()));
        }
        println!("  {}/{} keys working.", working, keys.len());
    }

    println!("> Preflight OK.");
    Ok(())
}
