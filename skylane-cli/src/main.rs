use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use skylane_core::{
    app_config::Config, CoreError, CreateOfferRequest, CreateOfferRequestQueryParameters,
    OfferRequest, OfferRequestsEndpoint, PlaceRef, Validate, ValidationReport, WireCodec,
};
use skylane_shared::WireEnum;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "skylane", about = "Check offer request payloads against the wire contract")]
struct Cli {
    /// Directory holding default.toml and friends
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode and validate a creation payload, then print the request to send
    CheckCreate {
        file: PathBuf,
        /// Create without offers and list them separately afterwards
        #[arg(long)]
        no_offers: bool,
    },
    /// Decode and summarise an offer request returned by the API
    Inspect { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skylane_core=info,skylane=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load_from(&cli.config_dir)
        .with_context(|| format!("Failed to load config from {}", cli.config_dir.display()))?;
    let codec = WireCodec::new(config.codec.clone());
    let base_url = config.api.base_url()?;

    match cli.command {
        Command::CheckCreate { file, no_offers } => {
            let payload = decode_create(&codec, &read(&file)?)?;
            report("payload", payload.validate())?;

            let params = CreateOfferRequestQueryParameters::new(!no_offers);
            let request = OfferRequestsEndpoint::new(&codec).create(&payload, &params)?;
            println!("{} {}", request.method, request.url_for(&base_url)?);
            println!("{}", request.body.unwrap_or_default());

            if no_offers {
                println!(
                    "offers are not returned; list them with offer_request_id=<id>&limit={}",
                    config.api.default_page_limit
                );
            }
        }
        Command::Inspect { file } => {
            let offer_request = codec.decode_offer_request(&read(&file)?)?;
            summarise(&offer_request);
            report("offer request", offer_request.validate())?;
        }
    }

    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Current shape first, then the deprecated form with passenger ids
fn decode_create(codec: &WireCodec, body: &str) -> anyhow::Result<CreateOfferRequest> {
    match codec.decode_create_request(body) {
        Ok(payload) => Ok(payload),
        Err(current @ CoreError::Deserialize { .. }) => match codec.decode_legacy_create_request(body) {
            Ok(legacy) => Ok(legacy.into_current()),
            Err(legacy) => bail!(
                "Payload matches neither the current nor the legacy shape\n  current: {current}\n  legacy: {legacy}"
            ),
        },
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_create_falls_back_to_legacy_ids() {
        let body = r#"
            {
                "cabin_class": "economy",
                "passengers": [{ "type": "adult", "id": "pas_1" }],
                "slices": [{ "departure_date": "2020-04-24", "origin": "LHR", "destination": "JFK" }]
            }
        "#;
        let payload = decode_create(&WireCodec::default(), body).unwrap();
        assert_eq!(payload.passengers.len(), 1);
    }

    #[test]
    fn test_decode_create_reports_current_shape_error() {
        let body = r#"
            {
                "cabin_class": "economy",
                "passengers": [{ "type": "adult" }],
                "slices": [{
                    "departure_date": "2020-04-24",
                    "origin": "LHR",
                    "destination": "JFK",
                    "origin_type": "airport"
                }]
            }
        "#;
        let message = decode_create(&WireCodec::default(), body).unwrap_err().to_string();

        assert!(message.contains("current: "), "{message}");
        assert!(message.contains("unknown field `origin_type`"), "{message}");
        assert!(message.contains("legacy: "), "{message}");
    }
}

fn report(what: &str, report: ValidationReport) -> anyhow::Result<()> {
    if report.is_clean() {
        tracing::info!("{} passed validation", what);
        return Ok(());
    }
    for issue in report.issues() {
        tracing::warn!("{}: {}", what, issue);
    }
    bail!("{} has {} validation issue(s)", what, report.issues().len())
}

fn summarise(offer_request: &OfferRequest) {
    println!(
        "{} ({}), created {}",
        offer_request.id,
        if offer_request.live_mode { "live" } else { "test" },
        offer_request.created_at
    );
    if let Some(cabin) = &offer_request.cabin_class {
        println!("cabin: {}", cabin.wire_value());
    }
    for slice in &offer_request.slices {
        println!(
            "  {} {} -> {}",
            slice.departure_date,
            describe(&slice.origin),
            describe(&slice.destination)
        );
    }
    println!("  {} passenger(s)", offer_request.passengers.len());
    match &offer_request.offers {
        Some(offers) => println!("  {} offer(s) included", offers.len()),
        None => println!("  offers not included; list them by offer_request_id"),
    }
}

fn describe(place: &PlaceRef) -> String {
    match place {
        PlaceRef::Structured(p) => match &p.name {
            Some(name) => format!("{} ({})", p.iata_code, name),
            None => p.iata_code.clone(),
        },
        PlaceRef::Raw(code) => code.clone(),
    }
}
