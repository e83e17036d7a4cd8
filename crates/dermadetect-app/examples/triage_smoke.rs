//! Smoke test for the CHW triage flow against a running API.
//!
//! Logs in, runs one triage with the requested number of photos, and walks
//! the high-risk wizard when the classifier asks for it.
//!
//! Usage:
//!   DERMADETECT_API_URL=http://localhost:5000/api \
//!   DERMADETECT_EMAIL=chw@example.org \
//!   DERMADETECT_PASSWORD=... \
//!   DERMADETECT_PATIENT_ID=... \
//!   DERMADETECT_PHOTOS=3 \
//!   cargo run -p dermadetect-app --example triage_smoke

use dermadetect_app::config::{self, AppConfig};
use dermadetect_app::context::AppContext;
use dermadetect_app::storage::MemoryStore;
use dermadetect_app::telemetry;
use dermadetect_core::models::enrichment::UrgencyLevel;
use dermadetect_core::models::user::Role;
use dermadetect_triage::flow::Effect;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let mut config = config::load_or_default().unwrap_or_else(|_| AppConfig::default());
    if let Ok(url) = std::env::var("DERMADETECT_API_URL") {
        config.api_base_url = url;
    }
    config.simulated_delay_ms = 0;
    telemetry::init_tracing(config.log_format)?;

    let email = std::env::var("DERMADETECT_EMAIL")
        .map_err(|_| eyre::eyre!("set DERMADETECT_EMAIL env var"))?;
    let password = std::env::var("DERMADETECT_PASSWORD")
        .map_err(|_| eyre::eyre!("set DERMADETECT_PASSWORD env var"))?;
    let patient_id = std::env::var("DERMADETECT_PATIENT_ID")
        .map_err(|_| eyre::eyre!("set DERMADETECT_PATIENT_ID env var"))?;
    let photos: usize = std::env::var("DERMADETECT_PHOTOS")
        .unwrap_or_else(|_| "3".to_string())
        .parse()?;

    println!("API:        {}", config.api_base_url);
    println!("Classifier: {:?}", config.classifier);
    println!("Patient:    {patient_id}");
    println!();

    let mut ctx = AppContext::new(config, MemoryStore::new());
    let session = ctx.login(&email, &password, Role::Chw).await?;
    println!("Logged in as {} ({:?})", session.user.name, session.user.role);

    let mut flow = ctx.begin_triage(&patient_id)?;
    flow.on_camera_permission(true)?;
    for i in 0..photos {
        let progress = flow.capture(format!("file:///smoke/photo-{i}.jpg"))?;
        println!("  {}", progress.message());
    }

    let level = flow.classify().await?;
    println!();
    println!("Result: {} ({})", level.title(), level.subtitle());
    for line in level.recommendations() {
        println!("  - {line}");
    }

    let effect = match flow.proceed().await? {
        Effect::Present { .. } => {
            flow.acknowledge_alert()?;
            let mut form = flow
                .session()
                .enrichment()
                .cloned()
                .unwrap_or_default();
            form.toggle_symptom("Itchy");
            form.toggle_characteristic("Raised");
            form.urgency_level = UrgencyLevel::Severe;
            form.notes = "Smoke test submission".to_string();
            flow.submit_enrichment(form)?;
            flow.confirm().await?
        }
        other => other,
    };

    println!();
    println!("Final state: {}", flow.state());
    println!("Trail:       {:?}", flow.trail());
    if let Effect::Notify { notice, .. } = effect {
        println!("{}: {}", notice.title, notice.message);
    }

    ctx.logout()?;
    Ok(())
}
