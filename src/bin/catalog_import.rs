// src/bin/catalog_import.rs
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI terminal colours ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_CATALOG_FILE: &str = "data/catalog.sample.json";

// --- Data structures ---

/// Import file: one array of create bodies per collection
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    experiences: Vec<Value>,
    #[serde(default)]
    accommodations: Vec<Value>,
    #[serde(default)]
    packages: Vec<Value>,
    #[serde(default)]
    vehicles: Vec<Value>,
    #[serde(default)]
    restaurants: Vec<Value>,
}

impl CatalogFile {
    fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Collections in import order, with their display icon
    fn collections(&self) -> [(&'static str, &'static str, &[Value]); 5] {
        [
            ("experiences", "🤿", self.experiences.as_slice()),
            ("accommodations", "🏡", self.accommodations.as_slice()),
            ("packages", "🎒", self.packages.as_slice()),
            ("vehicles", "🛻", self.vehicles.as_slice()),
            ("restaurants", "🍽️", self.restaurants.as_slice()),
        ]
    }

    fn total_entries(&self) -> usize {
        self.collections().iter().map(|(_, _, e)| e.len()).sum()
    }
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug)]
struct ImportResult {
    collection: &'static str,
    icon: &'static str,
    created: usize,
    failed: usize,
    errors: Vec<String>,
    duration_secs: f64,
}

impl ImportResult {
    fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Display label of an entry: title for experiences and packages, name otherwise
fn entry_label(entry: &Value) -> String {
    entry
        .get("title")
        .or_else(|| entry.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string()
}

// --- Import manager ---

struct CatalogImporter {
    base_url: String,
    client: Client,
    results: Vec<ImportResult>,
}

impl CatalogImporter {
    fn new(base_url: String) -> Result<Self> {
        // The session cookie from /login is replayed on every POST
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            results: Vec::new(),
        })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&LoginPayload { email, password })
            .send()
            .await
            .context("sending login request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("HTTP {} - {}", status, body);
        }

        let user: Value = response.json().await.context("parsing login response")?;
        if user.get("role").and_then(Value::as_str) != Some("admin") {
            bail!("{} is not an administrator", email);
        }
        Ok(())
    }

    async fn create_entry(&self, collection: &str, entry: &Value) -> Result<i64> {
        let response = self
            .client
            .post(format!("{}/api/{}", self.base_url, collection))
            .json(entry)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            bail!("HTTP {} - {}", status, body);
        }

        let created: Value = response.json().await?;
        Ok(created.get("id").and_then(Value::as_i64).unwrap_or_default())
    }

    async fn import_collection(
        &self,
        collection: &'static str,
        icon: &'static str,
        entries: &[Value],
    ) -> ImportResult {
        let started = Instant::now();
        let mut result = ImportResult {
            collection,
            icon,
            created: 0,
            failed: 0,
            errors: Vec::new(),
            duration_secs: 0.0,
        };

        for entry in entries {
            let label = entry_label(entry);
            match self.create_entry(collection, entry).await {
                Ok(id) => {
                    println!("  {}✅ {} (id {}){}", GREEN, label, id, RESET);
                    result.created += 1;
                }
                Err(e) => {
                    println!("  {}❌ {}: {}{}", RED, label, e, RESET);
                    result.failed += 1;
                    result.errors.push(format!("{}: {}", label, e));
                }
            }
        }

        result.duration_secs = started.elapsed().as_secs_f64();
        result
    }

    async fn run(&mut self, catalog: &CatalogFile, email: &str, password: &str) -> Result<()> {
        println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
        if !self.check_service_health().await {
            println!("{}Please ensure tuca-noronha is running (cargo run){}", YELLOW, RESET);
            bail!("service unavailable at {}", self.base_url);
        }
        println!("{}✅ Service available{}", GREEN, RESET);

        println!("{}🔑 Signing in as {}...{}", CYAN, email, RESET);
        self.login(email, password).await.context("sign-in failed")?;

        self.print_header(catalog.total_entries());

        for (collection, icon, entries) in catalog.collections() {
            if entries.is_empty() {
                continue;
            }
            println!("\n{}{} {} ({} entries){}", BOLD, icon, collection, entries.len(), RESET);
            let result = self.import_collection(collection, icon, entries).await;
            self.results.push(result);
        }

        self.print_summary();
        Ok(())
    }

    fn print_header(&self, total_count: usize) {
        println!("{}╔══════════════════════════════════════════════════════════════╗{}", CYAN, RESET);
        println!("{}║   🏝️  Catalog Import - Tuca Noronha                          ║{}", CYAN, RESET);
        println!("{}╚══════════════════════════════════════════════════════════════╝{}", CYAN, RESET);
        println!("\n{}📊 Total entries to import: {}{}", BOLD, total_count, RESET);
    }

    fn print_summary(&self) {
        println!("\n\n{}📋 Import Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────────────────────────");
        println!(
            "{:<24} {:<8} {:>8} {:>8} {:>10}",
            "Collection", "Status", "Created", "Failed", "Duration"
        );
        println!("──────────────────────────────────────────────────────────────");

        let mut total_created = 0;
        let mut total_failed = 0;

        for res in &self.results {
            let status_icon = if res.success() { "✅" } else { "❌" };
            println!(
                "{:<24} {:<8} {:>8} {:>8} {:>9.1}s",
                format!("{} {}", res.icon, res.collection),
                status_icon,
                res.created,
                res.failed,
                res.duration_secs
            );
            total_created += res.created;
            total_failed += res.failed;
        }

        println!("──────────────────────────────────────────────────────────────");
        println!("{}📊 Totals:{}", BOLD, RESET);
        println!("  • Items created: {}{}{}", GREEN, total_created, RESET);
        println!("  • Items failed: {}{}{}", if total_failed > 0 { RED } else { GREEN }, total_failed, RESET);

        for res in self.results.iter().filter(|r| !r.success()) {
            for err in &res.errors {
                println!("  {}↳ {} {}{}", YELLOW, res.collection, err, RESET);
            }
        }
    }
}

async fn run() -> Result<()> {
    dotenv().ok();

    let base_url = env::var("TUCA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let email = env::var("ADMIN_EMAIL").context("ADMIN_EMAIL must be set")?;
    let password = env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    let file = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CATALOG_FILE.to_string());

    let catalog = CatalogFile::load(Path::new(&file))?;
    let mut importer = CatalogImporter::new(base_url)?;
    importer.run(&catalog, &email, &password).await
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        println!("{}❌ {:#}{}", RED, e, RESET);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sample_file_parses() {
        let catalog: CatalogFile =
            serde_json::from_str(include_str!("../../data/catalog.sample.json")).unwrap();
        assert_eq!(catalog.experiences.len(), 2);
        assert_eq!(catalog.total_entries(), 6);

        let order: Vec<&str> = catalog.collections().iter().map(|(c, _, _)| *c).collect();
        assert_eq!(
            order,
            ["experiences", "accommodations", "packages", "vehicles", "restaurants"]
        );
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let catalog: CatalogFile = serde_json::from_str(r#"{"vehicles": [{"name": "Buggy"}]}"#).unwrap();
        assert_eq!(catalog.total_entries(), 1);
        assert!(catalog.restaurants.is_empty());
    }

    #[test]
    fn test_entry_label() {
        assert_eq!(entry_label(&json!({"title": "Mergulho"})), "Mergulho");
        assert_eq!(entry_label(&json!({"name": "Pousada"})), "Pousada");
        assert_eq!(entry_label(&json!({"price": 10})), "<unnamed>");
    }
}
