//! Load benchmark against a running server.
//!
//! The server must run with `COOKIE_SECURE=false` and a bootstrap admin
//! (`ADMIN_EMAIL`/`ADMIN_PASSWORD`); the same two variables are read here.

use chrono::{Datelike, Duration as ChronoDuration, Utc, Weekday};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use serde_json::{json, Value};
use std::env;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

const DURATION_SECS: u64 = 20;

struct Target {
    name: &'static str,
    method: &'static str,
    url: String,
    body: Option<Value>,
}

#[tokio::main]
async fn main() {
    let base_url = env::var("BENCH_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let admin_email = env::var("ADMIN_EMAIL").expect("ADMIN_EMAIL must match the server's bootstrap admin");
    let admin_password = env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must match the server's bootstrap admin");

    println!("{}", "Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let client = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .cookie_store(true)
        .build()
        .expect("Failed to build HTTP client");

    if client.get(format!("{}/health", base_url)).send().await.is_err() {
        eprintln!("{}", format!("Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return;
    }

    println!("\n{}", "Setting up benchmark data...".yellow());
    let court_id = setup_court(&client, &base_url, &admin_email, &admin_password).await;
    let (user_email, user_password) = setup_player(&client, &base_url).await;
    let date = next_weekday(Weekday::Mon);

    println!("{}", "Data created successfully.".green());
    println!("   Court ID: {}", court_id);
    println!("   Player:   {}", user_email);

    let targets = vec![
        Target {
            name: "Health Check (Public)",
            method: "GET",
            url: format!("{}/health", base_url),
            body: None,
        },
        Target {
            name: "Court Availability (Authenticated Read)",
            method: "GET",
            url: format!("{}/api/v1/courts/{}/availability?date={}&duration=2", base_url, court_id, date),
            body: None,
        },
        Target {
            name: "Login Flow (Crypto Intensive)",
            method: "POST",
            url: format!("{}/api/v1/auth/login", base_url),
            body: Some(json!({ "email": user_email, "password": user_password })),
        },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&client, &target, rps).await;
        }
    }
}

async fn login(client: &Client, base_url: &str, email: &str, password: &str) -> String {
    let res = client.post(format!("{}/api/v1/auth/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Login request failed");

    if !res.status().is_success() {
        panic!("Login failed for {}. Status: {}", email, res.status());
    }

    let body: Value = res.json().await.expect("Failed to parse login response");
    body["csrf_token"].as_str().expect("No csrf_token").to_string()
}

async fn post_json(client: &Client, url: String, csrf: &str, payload: Value) -> Value {
    let res = client.post(&url)
        .header("X-CSRF-Token", csrf)
        .json(&payload)
        .send()
        .await
        .expect("Setup request failed");

    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().await.unwrap_or_default();
        panic!("Setup call to {} failed. Status: {}. Body: {}", url, status, txt);
    }
    res.json().await.expect("Failed to parse setup response")
}

async fn setup_court(client: &Client, base_url: &str, admin_email: &str, admin_password: &str) -> String {
    let csrf = login(client, base_url, admin_email, admin_password).await;

    let sport_type = post_json(client, format!("{}/api/v1/admin/sport-types", base_url), &csrf, json!({
        "name": format!("Bench Padel {}", Uuid::new_v4()),
        "description": "Load testing",
        "max_people": 4
    })).await;

    let court = post_json(client, format!("{}/api/v1/admin/courts", base_url), &csrf, json!({
        "name": "Bench Court",
        "sport_type_id": sport_type["id"],
        "price_per_hour": 20.0,
        "max_people": 4
    })).await;

    court["id"].as_str().expect("No court id").to_string()
}

async fn setup_player(client: &Client, base_url: &str) -> (String, String) {
    let email = format!("bench-{}@bench.local", Uuid::new_v4());
    let password = "bench-password".to_string();

    let res = client.post(format!("{}/api/v1/auth/register", base_url))
        .json(&json!({ "email": email, "password": password, "name": "Bench Player" }))
        .send()
        .await
        .expect("Failed to send register request");

    if !res.status().is_success() {
        panic!("Failed to register player: status {}", res.status());
    }

    login(client, base_url, &email, &password).await;
    (email, password)
}

fn next_weekday(day: Weekday) -> chrono::NaiveDate {
    let mut date = Utc::now().date_naive() + ChronoDuration::days(7);
    while date.weekday() != day {
        date += ChronoDuration::days(1);
    }
    date
}

async fn run_stage(client: &Client, target: &Target, rps: u32) {
    let Some(rate) = NonZeroU32::new(rps) else {
        return;
    };
    let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rate)));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    while start_time.elapsed() <= duration {
        if limiter.check().is_err() {
            tokio::task::yield_now().await;
            continue;
        }

        let client = client.clone();
        let url = target.url.clone();
        let body = target.body.clone();
        let method = target.method;
        let tx = tx.clone();

        tokio::spawn(async move {
            let req_start = Instant::now();
            let res = match (method, body) {
                ("POST", Some(b)) => client.post(&url).json(&b).send().await,
                ("POST", None) => client.post(&url).send().await,
                _ => client.get(&url).send().await,
            };
            let success = res.map(|r| r.status().is_success()).unwrap_or(false);
            let _ = tx.send((req_start.elapsed(), success)).await;
        });
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3).expect("valid histogram precision");
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        let _ = histogram.record(latency.as_micros() as u64);
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    let rate_col = format!("{:<14.1}%", success_rate);
    let rate_col = if success_rate >= 99.0 { rate_col.green() } else { rate_col.red() };

    println!("{:<10} | {:<15.2} | {:<15.2} | {}", rps, mean_ms, p99_ms, rate_col);

    tokio::time::sleep(Duration::from_millis(500)).await;
}
