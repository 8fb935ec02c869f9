use clap::Parser;
use std::time::Duration;
use trip_planner::config::cli::{Command, CoordinateArgs, PlanArgs};
use trip_planner::core::fallback;
use trip_planner::utils::error::ErrorSeverity;
use trip_planner::utils::{logger, validation::Validate};
use trip_planner::{
    parse_itinerary, Attraction, CancellationToken, CliConfig, IconHint, Itinerary,
    ItineraryLine, PlannerError, Preferences, ReqwestTransport, TomlConfig, TripPlanner,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 載入 TOML 配置（若有指定），命令列參數優先
    let toml_config = match &config.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(mut toml_config) => {
                config.apply_overrides(&mut toml_config);
                Some(toml_config)
            }
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    // 初始化日誌
    let verbose = config.verbose || toml_config.as_ref().is_some_and(|c| c.verbose());
    if config.json_logs || toml_config.as_ref().is_some_and(|c| c.json_logs()) {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting trip-planner");
    if verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    let validation = match &toml_config {
        Some(toml_config) => toml_config.validate(),
        None => config.validate(),
    };
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("⏹️ Interrupted, cancelling");
                cancel.cancel();
            }
        });
    }

    let result = run(&config, toml_config.as_ref(), &cancel).await;

    if let Err(e) = result {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ trip-planner failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 130,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(
    config: &CliConfig,
    toml_config: Option<&TomlConfig>,
    cancel: &CancellationToken,
) -> trip_planner::Result<()> {
    let planner = || -> trip_planner::Result<TripPlanner<ReqwestTransport>> {
        match toml_config {
            Some(toml_config) => TripPlanner::from_config(toml_config),
            None => TripPlanner::from_config(config),
        }
    };

    match &config.command {
        Command::Plan(args) => {
            let base = toml_config
                .map(TomlConfig::preferences)
                .unwrap_or_default();
            plan(args, args.preferences(base), planner, cancel).await
        }
        Command::Parse { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => std::io::read_to_string(std::io::stdin())?,
            };
            print_lines(&parse_itinerary(&text));
            Ok(())
        }
        Command::Nearby(CoordinateArgs { lat, lng }) => {
            let attractions = planner()?.nearby_attractions(*lat, *lng, cancel).await?;
            tracing::info!("📍 {} attractions found", attractions.len());
            for attraction in &attractions {
                println!(
                    "⭐ {:<4} {} ({})",
                    attraction.rating, attraction.name, attraction.description
                );
            }
            Ok(())
        }
        Command::Weather(CoordinateArgs { lat, lng }) => {
            let forecast = planner()?.weather(*lat, *lng, cancel).await?;
            println!("{}, {}", forecast.location, forecast.country);
            for day in &forecast.forecast {
                println!(
                    "{}  {:>3.0}°C / {:>3.0}°C  {}",
                    day.date, day.max_temp, day.min_temp, day.day_condition
                );
            }
            Ok(())
        }
    }
}

async fn plan<F>(
    args: &PlanArgs,
    preferences: Preferences,
    planner: F,
    cancel: &CancellationToken,
) -> trip_planner::Result<()>
where
    F: FnOnce() -> trip_planner::Result<TripPlanner<ReqwestTransport>>,
{
    let raw = std::fs::read_to_string(&args.attractions)?;
    let attractions: Vec<Attraction> = serde_json::from_str(&raw)?;
    tracing::info!(
        "📁 Loaded {} attractions from {}",
        attractions.len(),
        args.attractions.display()
    );

    let itinerary = if args.offline {
        tracing::info!("🔌 Offline mode, building itinerary locally");
        let text = fallback::build_itinerary(&attractions, &preferences)?;
        Itinerary {
            lines: parse_itinerary(&text),
            text,
        }
    } else {
        let deadline = args
            .deadline_ms
            .map(|ms| cancel.cancel_after(Duration::from_millis(ms)));
        let result = planner()?
            .generate_itinerary(&attractions, &preferences, cancel)
            .await;
        if let Some(deadline) = deadline {
            deadline.abort();
        }
        result?
    };

    if itinerary.lines.is_empty() {
        return Err(PlannerError::UnexpectedPayload {
            message: "the itinerary is empty".to_string(),
        });
    }

    println!("🗓️ Your Personalized Itinerary\n");
    print_lines(&itinerary.lines);
    Ok(())
}

fn print_lines(lines: &[ItineraryLine]) {
    for line in lines {
        match line {
            ItineraryLine::TimeBlock {
                time,
                location,
                duration,
            } => {
                println!("🕘 {}", time);
                match duration {
                    Some(duration) => println!("    {} {}", location, duration),
                    None => println!("    {}", location),
                }
            }
            ItineraryLine::DetailTip { icon_hint, text } => {
                let icon = match icon_hint {
                    IconHint::Weather => "☀️",
                    IconHint::Travel => "🧭",
                    IconHint::Info => "ℹ️",
                };
                println!("      {} {}", icon, text);
            }
            ItineraryLine::PlainText { text } => println!("{}", text),
        }
    }
}
