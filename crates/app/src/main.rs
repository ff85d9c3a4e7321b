use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use exam_core::Clock;
use exam_core::model::{
    Bilingual, OptionKey, Question, QuestionId, Test, TestId, TestStatus, UserId,
};
use services::{
    AppServices, PracticeService, ResultService, TestAttemptService, TestCatalogService,
};
use storage::repository::{Storage, TestRepository};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    user_id: UserId,
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn attempts(&self) -> Arc<TestAttemptService> {
        self.services.attempts()
    }

    fn catalog(&self) -> Arc<TestCatalogService> {
        self.services.catalog()
    }

    fn practice(&self) -> Arc<PracticeService> {
        self.services.practice()
    }

    fn results(&self) -> Arc<ResultService> {
        self.services.results()
    }
}

struct Args {
    db_url: String,
    user_id: UserId,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url>] [--user <uuid>]");
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --db sqlite:exam.sqlite3");
    eprintln!("  --user a fresh random identity");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  EXAM_DB_URL, EXAM_USER_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("EXAM_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://exam.sqlite3".into(), normalize_sqlite_url);
        let mut user_id = std::env::var("EXAM_USER_ID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user" => {
                    let value = require_value(args, "--user")?;
                    user_id = Some(
                        value
                            .parse::<UserId>()
                            .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?,
                    );
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            // A stable identity would come from an auth layer; a random one
            // per launch still exercises the whole flow.
            user_id: user_id.unwrap_or_else(UserId::random),
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if matches!(cmd, Command::Ui | Command::Seed) && !argv.is_empty() && !argv[0].starts_with("--")
    {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;
    let clock = Clock::default_clock();

    match cmd {
        Command::Ui => {
            ensure_sample_test(storage.tests.as_ref(), clock, false).await?;
            let services = AppServices::from_storage(clock, &storage);
            tracing::info!(user = %parsed.user_id, db = %parsed.db_url, "starting ui");

            let app = DesktopApp {
                user_id: parsed.user_id,
                services,
            };
            let app: Arc<dyn UiApp> = Arc::new(app);
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Exam Prep")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            let seeded = ensure_sample_test(storage.tests.as_ref(), clock, true).await?;
            eprintln!(
                "seed: {} (db={})",
                if seeded { "sample test written" } else { "sample test already present" },
                parsed.db_url
            );
            Ok(())
        }
    }
}

/// Writes the bundled sample test when the catalog is empty (or always, for
/// the `seed` subcommand), so a fresh database is immediately usable.
async fn ensure_sample_test(
    tests: &dyn TestRepository,
    clock: Clock,
    force: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    if !force && !tests.list_published(1).await?.is_empty() {
        return Ok(false);
    }
    if !force && tests.get_test(TestId::new(1)).await?.is_some() {
        return Ok(false);
    }

    let test = sample_test(clock)?;
    tests.upsert_test(&test).await?;
    Ok(true)
}

fn sample_test(clock: Clock) -> Result<Test, Box<dyn std::error::Error>> {
    let now = clock.now();
    let questions = vec![
        Question::new(
            QuestionId::new(1),
            Bilingual::new("What is the SI unit of force?", "बल की SI इकाई क्या है?")?,
            [
                Bilingual::new("Watt", "वाट")?,
                Bilingual::new("Newton", "न्यूटन")?,
                Bilingual::new("Joule", "जूल")?,
                Bilingual::new("Pascal", "पास्कल")?,
            ],
            OptionKey::B,
            Some(Bilingual::new(
                "Force is measured in newtons (kg·m/s²).",
                "बल न्यूटन (kg·m/s²) में मापा जाता है।",
            )?),
            Some("Physics".to_string()),
        )?,
        Question::new(
            QuestionId::new(2),
            Bilingual::new(
                "Which article of the Constitution abolishes untouchability?",
                "संविधान का कौन सा अनुच्छेद अस्पृश्यता का अंत करता है?",
            )?,
            [
                Bilingual::english_only("Article 14")?,
                Bilingual::english_only("Article 17")?,
                Bilingual::english_only("Article 19")?,
                Bilingual::english_only("Article 21")?,
            ],
            OptionKey::B,
            None,
            Some("Polity".to_string()),
        )?,
        Question::new(
            QuestionId::new(3),
            Bilingual::new("25% of 360 is:", "360 का 25% है:")?,
            [
                Bilingual::english_only("80")?,
                Bilingual::english_only("85")?,
                Bilingual::english_only("90")?,
                Bilingual::english_only("95")?,
            ],
            OptionKey::C,
            Some(Bilingual::english_only("360 / 4 = 90.")?),
            Some("Maths".to_string()),
        )?,
        Question::new(
            QuestionId::new(4),
            Bilingual::new(
                "Which river is known as the 'Sorrow of Bengal'?",
                "किस नदी को 'बंगाल का शोक' कहा जाता है?",
            )?,
            [
                Bilingual::new("Ganga", "गंगा")?,
                Bilingual::new("Damodar", "दामोदर")?,
                Bilingual::new("Hooghly", "हुगली")?,
                Bilingual::new("Teesta", "तीस्ता")?,
            ],
            OptionKey::B,
            None,
            Some("Geography".to_string()),
        )?,
        Question::new(
            QuestionId::new(5),
            Bilingual::new("Synonym of 'abundant':", "'abundant' का पर्यायवाची:")?,
            [
                Bilingual::english_only("Scarce")?,
                Bilingual::english_only("Plentiful")?,
                Bilingual::english_only("Meagre")?,
                Bilingual::english_only("Rare")?,
            ],
            OptionKey::B,
            None,
            Some("English".to_string()),
        )?,
    ];

    Ok(Test::new(
        TestId::new(1),
        Bilingual::new("General Studies Mock 1", "सामान्य अध्ययन मॉक 1")?,
        questions,
        15,
        2.0,
        0.5,
        TestStatus::Published,
        Some(now),
        Some(now + Duration::days(365)),
        now,
    )?)
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
