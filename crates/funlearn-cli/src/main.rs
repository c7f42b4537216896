use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};

use funlearn_core::generation::{self, MockGenerationService};
use funlearn_core::{
    AppConfig, Book, BookId, BookStore, ExitCode, Feature, FunlearnError, GenerationConfig,
    JsonFileStorage, NewBook, format_file_size, score_answers,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "funlearn",
    about = "Turn books into summaries, quizzes, games and audio",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting FUNLEARN_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List books in the library.
    List {
        /// Only books whose title or author contains this text.
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a book. It becomes the current book.
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        author: String,
        /// Pre-formatted size, e.g. "2.3 MB".
        #[arg(long, conflicts_with = "bytes")]
        size: Option<String>,
        /// Raw size in bytes, formatted for you.
        #[arg(long)]
        bytes: Option<u64>,
    },

    /// Show a book (the current book when no ID is given).
    Show { id: Option<String> },

    /// Make a book the current one, or clear the selection.
    Select {
        #[arg(required_unless_present = "none")]
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        none: bool,
    },

    /// Generate a learning artifact: summary, quiz, games or audio.
    Generate {
        feature: String,
        id: String,
        /// Skip the simulated generation delay.
        #[arg(long)]
        now: bool,
    },

    /// Set or unset a progress flag directly.
    Progress {
        id: String,
        feature: String,
        #[arg(long)]
        unset: bool,
    },

    /// Answer a book's quiz and record the score.
    Quiz {
        id: String,
        /// Zero-based option index per question, comma separated.
        #[arg(long, value_delimiter = ',')]
        answers: Vec<usize>,
    },

    /// Record a quiz score (0-100) without answering questions.
    Record { id: String, score: u8 },

    /// Remove a book.
    Remove {
        id: String,
        #[arg(long)]
        confirm: bool,
    },

    /// Remove every book.
    Clear {
        #[arg(long)]
        confirm: bool,
    },

    /// Show learning statistics and achievements.
    Stats,

    /// Show effective configuration.
    Config,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let start = Instant::now();
    let cli = Cli::parse();

    let json_output = cli.json || std::env::var("FUNLEARN_JSON").as_deref() == Ok("1");

    let mut config = AppConfig::load()?;
    if let Ok(data_path) = std::env::var("FUNLEARN_DATA_PATH") {
        config.set_data_path(data_path.into());
    }

    let mut store = BookStore::open(JsonFileStorage::from_config(&config));
    let out = Output {
        json: json_output,
        start,
    };

    match cli.command {
        Commands::List { search } => {
            let books: Vec<&Book> = match &search {
                Some(q) => store.search(q),
                None => store.books().iter().collect(),
            };
            let current = store.current().map(|b| b.id.clone());

            if json_output {
                out.ok(serde_json::json!({ "items": books, "total": books.len() }))?;
            } else if books.is_empty() {
                match search {
                    Some(q) => println!("No books matching: {q}"),
                    None => println!("No books in library. Use `funlearn add` to add books."),
                }
            } else {
                for book in &books {
                    let marker = if current.as_ref() == Some(&book.id) { "*" } else { " " };
                    println!(
                        "{marker} {id}  {title:<35}  {author:<20}  {pct:>3.0}%",
                        id = book.id.short(),
                        title = book.title,
                        author = book.author,
                        pct = book.progress.percentage(),
                    );
                }
            }
        }

        Commands::Add { title, author, size, bytes } => {
            let file_size = match (size, bytes) {
                (Some(s), _) => s,
                (None, Some(b)) => format_file_size(b),
                (None, None) => format_file_size(0),
            };
            let book = out.check(store.add(NewBook::new(title, author, file_size)));

            if json_output {
                out.ok(serde_json::to_value(&book)?)?;
            } else {
                println!("Added: {} ({})", book.title, book.id);
            }
        }

        Commands::Show { id } => {
            let book = match id {
                Some(id) => resolve(&store, &id).and_then(|id| {
                    store
                        .get(&id)
                        .ok_or_else(|| FunlearnError::BookNotFound(id.to_string()))
                }),
                None => store
                    .current()
                    .ok_or_else(|| FunlearnError::BookNotFound("(no current book)".into())),
            };
            let book = out.check(book);

            if json_output {
                out.ok(serde_json::to_value(book)?)?;
            } else {
                print_book(book);
            }
        }

        Commands::Select { id, none } => {
            let target = match id {
                Some(id) if !none => Some(out.check(resolve(&store, &id))),
                _ => None,
            };
            let selected = out.check(store.set_current(target.as_ref()));

            if json_output {
                out.ok(serde_json::json!({ "current": selected }))?;
            } else {
                match selected {
                    Some(book) => println!("Current book: {}", book.title),
                    None => println!("No current book."),
                }
            }
        }

        Commands::Generate { feature, id, now } => {
            let feature = out.check(feature.parse::<Feature>());
            let id = out.check(resolve(&store, &id));
            let delays = if now {
                GenerationConfig::instant()
            } else {
                config.generation.clone()
            };
            let service = MockGenerationService::new(delays);

            if !json_output {
                eprintln!("Generating {feature}...");
            }
            let book = out.check(generation::generate(&mut store, &service, &id, feature).await);

            if json_output {
                out.ok(serde_json::to_value(&book)?)?;
            } else {
                match feature {
                    Feature::Summary => println!("{}", book.summary.unwrap_or_default()),
                    Feature::Quiz => {
                        let count = book.quizzes.as_ref().map_or(0, Vec::len);
                        println!("Quiz ready: {count} questions.");
                    }
                    Feature::Audio => println!("Audio: {}", book.audio_url.unwrap_or_default()),
                    Feature::Games => println!("Games ready."),
                }
            }
        }

        Commands::Progress { id, feature, unset } => {
            let feature = out.check(feature.parse::<Feature>());
            let id = out.check(resolve(&store, &id));
            let book = out.check(store.update_progress(&id, feature, !unset));

            if json_output {
                out.ok(serde_json::json!({ "progress": book.progress }))?;
            } else {
                println!("{}: {feature} = {}", book.title, book.progress.get(feature));
            }
        }

        Commands::Quiz { id, answers } => {
            let id = out.check(resolve(&store, &id));
            let quizzes = out.check(
                store
                    .get(&id)
                    .and_then(|b| b.quizzes.clone())
                    .ok_or_else(|| {
                        FunlearnError::ValidationError(
                            "no quiz yet; run `funlearn generate quiz <ID>` first".into(),
                        )
                    }),
            );
            let score = out.check(score_answers(&quizzes, &answers));
            let book = out.check(store.add_quiz_result(&id, score));

            if json_output {
                out.ok(serde_json::json!({ "score": score, "attempts": book.quiz_results.len() }))?;
            } else {
                for (i, quiz) in quizzes.iter().enumerate() {
                    let mark = if answers.get(i) == Some(&quiz.correct_answer) { "✓" } else { "✗" };
                    println!("{mark} {}", quiz.question);
                    println!("    {}", quiz.explanation);
                }
                println!("Score: {score}% (attempt {})", book.quiz_results.len());
            }
        }

        Commands::Record { id, score } => {
            let id = out.check(resolve(&store, &id));
            let book = out.check(store.add_quiz_result(&id, score));

            if json_output {
                out.ok(serde_json::json!({ "attempts": book.quiz_results.len() }))?;
            } else {
                println!("Recorded {score}% for {}.", book.title);
            }
        }

        Commands::Remove { id, confirm } => {
            require_confirm(confirm);
            let id = out.check(resolve(&store, &id));
            let removed = out.check(store.remove(&id));

            if json_output {
                out.ok(serde_json::json!({ "deleted": removed.id }))?;
            } else {
                println!("Removed: {}", removed.title);
            }
        }

        Commands::Clear { confirm } => {
            require_confirm(confirm);
            let count = store.books().len();
            out.check(store.clear());

            if json_output {
                out.ok(serde_json::json!({ "deleted": count }))?;
            } else {
                println!("Library cleared ({count} books removed).");
            }
        }

        Commands::Stats => {
            let stats = store.stats();

            if json_output {
                out.ok(serde_json::to_value(&stats)?)?;
            } else {
                println!("Learning statistics:");
                println!("  Books:           {}", stats.total_books);
                println!("  Completed:       {}", stats.completed_books);
                println!("  Quiz attempts:   {}", stats.total_quiz_attempts);
                println!("  Average score:   {:.0}%", stats.average_score);
                println!(
                    "  Features done:   summary {} · quiz {} · games {} · audio {}",
                    stats.with_summary, stats.with_quiz, stats.with_games, stats.with_audio
                );
                println!("Achievements:");
                for a in &stats.achievements {
                    let mark = if a.earned { "★" } else { "☆" };
                    println!("  {mark} {:<14} {}", a.name, a.description);
                }
            }
        }

        Commands::Config => {
            let snapshot = config.snapshot_path();
            if json_output {
                out.ok(serde_json::json!({
                    "config_path": AppConfig::config_path(),
                    "snapshot_path": snapshot,
                    "storage": { "data_path": config.storage.data_path, "key": config.storage.key },
                    "generation": {
                        "summary_delay_ms": config.generation.summary_delay_ms,
                        "quiz_delay_ms": config.generation.quiz_delay_ms,
                        "games_delay_ms": config.generation.games_delay_ms,
                        "audio_delay_ms": config.generation.audio_delay_ms,
                    },
                }))?;
            } else {
                println!("config_path = {}", AppConfig::config_path().display());
                println!("snapshot_path = {}", snapshot.display());
                println!("storage.key = {}", config.storage.key);
                println!("generation.summary_delay_ms = {}", config.generation.summary_delay_ms);
                println!("generation.quiz_delay_ms = {}", config.generation.quiz_delay_ms);
                println!("generation.games_delay_ms = {}", config.generation.games_delay_ms);
                println!("generation.audio_delay_ms = {}", config.generation.audio_delay_ms);
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

struct Output {
    json: bool,
    start: Instant,
}

impl Output {
    fn ok(&self, data: serde_json::Value) -> Result<()> {
        let dur = self.start.elapsed().as_millis();
        print_json(&serde_json::json!({"status":"ok","data":data,"meta":{"duration_ms":dur}}))
    }

    /// Unwrap a core result or report the error and exit with its code.
    fn check<T>(&self, res: funlearn_core::Result<T>) -> T {
        match res {
            Ok(v) => v,
            Err(e) => {
                let code = ExitCode::from(&e) as i32;
                if self.json {
                    let kind = match &e {
                        FunlearnError::BookNotFound(_) => "not_found",
                        FunlearnError::ValidationError(_) | FunlearnError::InvalidFeature(_) => {
                            "invalid_args"
                        }
                        _ => "error",
                    };
                    let dur = self.start.elapsed().as_millis();
                    let body = serde_json::json!({"status":"error","error":kind,"message":e.to_string(),"meta":{"duration_ms":dur}});
                    println!("{body}");
                } else {
                    eprintln!("{e}");
                }
                std::process::exit(code);
            }
        }
    }
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn require_confirm(confirm: bool) {
    if !confirm {
        eprintln!("Add --confirm to delete without prompt.");
        std::process::exit(ExitCode::ConfirmRequired as i32);
    }
}

/// Accept a full id or a unique prefix of one (as printed by `list`).
fn resolve(store: &BookStore<JsonFileStorage>, input: &str) -> funlearn_core::Result<BookId> {
    let exact = BookId::from(input);
    if store.get(&exact).is_some() {
        return Ok(exact);
    }

    let mut matches = store
        .books()
        .iter()
        .filter(|b| !input.is_empty() && b.id.as_str().starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(book), None) => Ok(book.id.clone()),
        (Some(_), Some(_)) => Err(FunlearnError::ValidationError(format!(
            "ambiguous id prefix: {input}"
        ))),
        _ => Err(FunlearnError::BookNotFound(input.to_string())),
    }
}

fn print_book(book: &Book) {
    println!("{} — {}", book.title, book.author);
    println!("  id:        {}", book.id);
    println!("  uploaded:  {}", book.upload_date.format("%Y-%m-%d %H:%M"));
    println!("  size:      {}", book.file_size);
    println!("  progress:  {:.0}%", book.progress.percentage());
    for feature in Feature::ALL {
        let mark = if book.progress.get(feature) { "✓" } else { "·" };
        println!("    {mark} {feature}");
    }
    if let Some(summary) = &book.summary {
        println!("  summary:   {summary}");
    }
    if let Some(url) = &book.audio_url {
        println!("  audio:     {url}");
    }
    if !book.quiz_results.is_empty() {
        let scores: Vec<String> = book.quiz_results.iter().map(|r| format!("{}%", r.score)).collect();
        println!("  attempts:  {}", scores.join(", "));
    }
}
