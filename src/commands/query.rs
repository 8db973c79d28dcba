use crate::error::Error;
use crate::models::CryptoStatistics;
use crate::services::{CryptoService, DirectoryScanner, ScanReport, SeriesStore};
use crate::utils::{get_crypto_data_dir, get_timezone};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Scan `dir` (or the configured directory) into a fresh store
async fn load(dir: Option<PathBuf>) -> Result<(CryptoService, ScanReport), Error> {
    let dir = dir.unwrap_or_else(get_crypto_data_dir);
    let timezone = get_timezone()?;

    let store = SeriesStore::shared();
    let scanner = DirectoryScanner::new(store.clone(), timezone);
    let report = scanner.scan(&dir).await?;

    Ok((CryptoService::new(store), report))
}

pub async fn scan(dir: Option<PathBuf>) {
    match show_scan(dir).await {
        Ok(()) => {}
        Err(e) => exit_with(e),
    }
}

async fn show_scan(dir: Option<PathBuf>) -> Result<(), Error> {
    let (service, report) = load(dir).await?;
    let store = service.store();

    println!("📁 Scan completed");
    println!("   📈 Symbols loaded: {}", report.loaded.len());
    println!("   📊 Records:        {}", report.records);
    for symbol in store.symbols().await {
        let count = store.get(&symbol).await.map(|s| s.len()).unwrap_or(0);
        println!("   🔹 {:<8} {:>8} records", symbol, count);
    }

    Ok(())
}

pub async fn stats(symbol: Option<String>, dir: Option<PathBuf>) {
    match show_stats(symbol, dir).await {
        Ok(()) => {}
        Err(e) => exit_with(e),
    }
}

async fn show_stats(symbol: Option<String>, dir: Option<PathBuf>) -> Result<(), Error> {
    let (service, _) = load(dir).await?;

    match symbol {
        Some(symbol) => {
            let stats = service.statistics_for(&symbol).await?;
            println!("📊 {}", stats.symbol);
            println!("   Oldest price:     {:.4}", stats.oldest_price);
            println!("   Newest price:     {:.4}", stats.newest_price);
            println!("   Min price:        {:.4}", stats.min_price);
            println!("   Max price:        {:.4}", stats.max_price);
            println!("   Normalized range: {:.6}", stats.normalized_range);
        }
        None => {
            let all = service.all_statistics().await?;
            if all.is_empty() {
                println!("⚠️  No crypto data found.");
                return Ok(());
            }
            println!("📈 Cryptos by normalized range\n");
            for (rank, stats) in all.iter().enumerate() {
                println!("{}", format_ranking_row(rank + 1, stats));
            }
        }
    }

    Ok(())
}

pub async fn best(date: NaiveDate, dir: Option<PathBuf>) {
    match show_best(date, dir).await {
        Ok(()) => {}
        Err(e) => exit_with(e),
    }
}

async fn show_best(date: NaiveDate, dir: Option<PathBuf>) -> Result<(), Error> {
    let (service, _) = load(dir).await?;
    let symbol = service.highest_normalized_for(date).await?;
    println!("🏆 Highest normalized range on {}: {}", date, symbol);
    Ok(())
}

fn format_ranking_row(rank: usize, stats: &CryptoStatistics) -> String {
    format!(
        "{:>3}. {:<8} range {:>10.6}  min {:>12.4}  max {:>12.4}",
        rank, stats.symbol, stats.normalized_range, stats.min_price, stats.max_price
    )
}

fn exit_with(e: Error) -> ! {
    eprintln!("❌ Error: {}", e);
    std::process::exit(1);
}
