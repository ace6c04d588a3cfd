mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use yatra_assistant::{RequestState, TripAssistant};
use yatra_core::{Action, DateRange, QuickInfoCategory, RequestResult, TripDraft};
use yatra_gateway::{GatewayConfig, RequestGateway};
use yatra_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "yatra")]
#[command(about = "Yatra travel planner CLI")]
struct Cli {
    #[arg(long, env = "YATRA_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long)]
    timeout_seconds: Option<u64>,

    /// Print the payload exactly as the server sent it.
    #[arg(long, conflicts_with = "json")]
    raw: bool,

    /// Print display blocks as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct TripArgs {
    #[arg(long, default_value = "")]
    days: String,
    #[arg(long, default_value = "medium")]
    budget: String,
    #[arg(long, default_value = "")]
    interests: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    Health,
    Plan {
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(long, default_value = "train")]
        mode: String,
        #[command(flatten)]
        trip: TripArgs,
    },
    Itinerary {
        destination: String,
        #[arg(long, default_value = "")]
        days: String,
    },
    Stay {
        destination: String,
    },
    Transport {
        destination: String,
    },
    Attractions {
        destination: String,
    },
    Markets {
        destination: String,
    },
    Food {
        destination: String,
    },
    ThingsToDo {
        destination: String,
    },
    Guide {
        destination: String,
        #[command(flatten)]
        trip: TripArgs,
    },
    QuickInfo {
        category: String,
        destination: String,
        #[command(flatten)]
        trip: TripArgs,
    },
    QuickInfoAll {
        destination: String,
        #[command(flatten)]
        trip: TripArgs,
    },
    Popular,
    Weather {
        destination: String,
    },
    Budget {
        destination: String,
        #[arg(long, default_value = "")]
        days: String,
        #[arg(long, default_value = "")]
        travelers: String,
    },
}

enum Output {
    Blocks,
    Raw,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("yatra_cli");
    let cli = Cli::parse();

    let mut config = GatewayConfig::from_env();
    if let Some(base_url) = cli.base_url.clone() {
        config = config.with_base_url(base_url);
    }
    if let Some(seconds) = cli.timeout_seconds {
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    let gateway = Arc::new(RequestGateway::new(&config).context("invalid gateway configuration")?);

    let output = if cli.raw {
        Output::Raw
    } else if cli.json {
        Output::Json
    } else {
        Output::Blocks
    };

    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            watcher.cancel();
        }
    });

    if let Command::QuickInfoAll { destination, trip } = &cli.command {
        let draft = apply_trip(TripDraft::default().with_destination(destination), trip);
        return run_quick_info_all(&gateway, &draft, &output, &cancel).await;
    }

    let (draft, action) = build_request(&cli.command)?;

    if let Output::Raw = output {
        let operation = draft.operation(action)?;
        return match gateway.invoke_with_cancel(&operation, &cancel).await {
            RequestResult::Success(text) => {
                println!("{text}");
                Ok(())
            }
            RequestResult::Failure(message) => bail!("{message}"),
        };
    }

    let assistant = TripAssistant::new(gateway, AppMetrics::shared());
    assistant.update_draft(|_| draft);

    match assistant.dispatch(action, &cancel).await? {
        RequestState::Success { action, blocks } => {
            if let Output::Json = output {
                println!("{}", serde_json::to_string_pretty(&blocks)?);
            } else {
                println!("{}", render::card(&action.title(), &blocks));
            }
            Ok(())
        }
        RequestState::Failure { message, .. } => {
            bail!("{message}\nRun the same command again to retry.")
        }
        RequestState::Idle | RequestState::Loading { .. } => {
            bail!("request finished without a result")
        }
    }
}

fn build_request(command: &Command) -> Result<(TripDraft, Action)> {
    let base = TripDraft::default();

    let request = match command {
        Command::Health => (base, Action::HealthCheck),
        Command::Popular => (base, Action::PopularDestinations),
        Command::Plan {
            origin,
            destination,
            from,
            to,
            mode,
            trip,
        } => {
            let dates = match (from, to) {
                (Some(from), Some(to)) => Some(DateRange::new(*from, *to)?),
                (Some(day), None) | (None, Some(day)) => Some(DateRange::new(*day, *day)?),
                (None, None) => None,
            };
            let draft = base
                .with_origin(origin)
                .with_destination(destination)
                .with_dates(dates)
                .with_preferred_mode(mode);
            (apply_trip(draft, trip), Action::CompleteTripPlan)
        }
        Command::Itinerary { destination, days } => (
            base.with_destination(destination).with_days(days),
            Action::Itinerary,
        ),
        Command::Stay { destination } => (base.with_destination(destination), Action::Stay),
        Command::Transport { destination } => (
            base.with_destination(destination),
            Action::LocalTransport,
        ),
        Command::Attractions { destination } => {
            (base.with_destination(destination), Action::Attractions)
        }
        Command::Markets { destination } => (base.with_destination(destination), Action::Markets),
        Command::Food { destination } => (base.with_destination(destination), Action::Food),
        Command::ThingsToDo { destination } => {
            (base.with_destination(destination), Action::ThingsToDo)
        }
        Command::Guide { destination, trip } => (
            apply_trip(base.with_destination(destination), trip),
            Action::TravelGuide,
        ),
        Command::QuickInfo {
            category,
            destination,
            trip,
        } => {
            let category = QuickInfoCategory::parse(category).with_context(|| {
                format!("unknown quick-info category {category:?}")
            })?;
            (
                apply_trip(base.with_destination(destination), trip),
                Action::QuickInfo(category),
            )
        }
        Command::Weather { destination } => (base.with_destination(destination), Action::Weather),
        Command::Budget {
            destination,
            days,
            travelers,
        } => (
            base.with_destination(destination)
                .with_days(days)
                .with_travelers(travelers),
            Action::BudgetEstimate,
        ),
        Command::QuickInfoAll { .. } => bail!("quick-info-all is handled as a batch"),
    };

    Ok(request)
}

fn apply_trip(draft: TripDraft, trip: &TripArgs) -> TripDraft {
    draft
        .with_days(&trip.days)
        .with_budget(&trip.budget)
        .with_interests(&trip.interests)
}

async fn run_quick_info_all(
    gateway: &RequestGateway,
    draft: &TripDraft,
    output: &Output,
    cancel: &CancellationToken,
) -> Result<()> {
    // Validates the draft the same way a single quick-info dispatch would.
    draft.operation(Action::QuickInfo(QuickInfoCategory::Food))?;

    let results = gateway
        .quick_info_all(
            draft.destination.trim(),
            Some(draft.trip_days()?),
            Some(draft.budget_tier()),
            cancel,
        )
        .await;

    let mut failures = 0usize;
    let mut json = serde_json::Map::new();

    for (category, result) in &results {
        let title = Action::QuickInfo(*category).title();
        match result {
            RequestResult::Success(text) => match output {
                Output::Raw => println!("## {title}\n{text}\n"),
                Output::Json => {
                    json.insert(
                        category.to_string(),
                        serde_json::to_value(yatra_core::format_response(text))?,
                    );
                }
                Output::Blocks => {
                    println!(
                        "{}\n",
                        render::card(&title, &yatra_core::format_response(text))
                    )
                }
            },
            RequestResult::Failure(message) => {
                failures += 1;
                eprintln!("{message}");
                if let Output::Json = output {
                    json.insert(
                        category.to_string(),
                        serde_json::json!({ "error": message }),
                    );
                }
            }
        }
    }

    if let Output::Json = output {
        println!("{}", serde_json::to_string_pretty(&json)?);
    }

    if failures == results.len() {
        bail!("every quick-info request failed");
    }
    Ok(())
}
