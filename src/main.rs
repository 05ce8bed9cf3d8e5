// This is the entry point of the comment widget engine.
//
// **Architecture Overview:**
// - `core/` = Business logic (gate, filter, ledger, thread model)
// - `infra/` = Implementations of core traits (Supabase store, JSON ledger)
// - `main.rs` = Composition root + a minimal text front end
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Show the thread, or walk through an interactive post
//
// All visual concerns live here; core modules expose data and results only.

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with a pair of mod.rs files that look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::comments::{derive_page_key, initials, CommentThread};
use crate::core::moderation::ProfanityFilter;
use crate::core::ratelimit::RateLedgerStore;
use crate::core::submission::{
    CommentInput, CommentSession, CommentStore, GateConfig, SubmissionError, SubmissionOutcome,
    SubmissionService,
};
use crate::infra::comments::{InMemoryCommentStore, SupabaseCommentStore};
use crate::infra::ratelimit::{InMemoryLedgerStore, JsonLedgerStore};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // The hosting page supplies the key explicitly, or we derive it from the
    // page path the same way the widget would.
    let page_key = match std::env::var("COMMENTS_PAGE_KEY") {
        Ok(key) => key,
        Err(_) => match std::env::var("COMMENTS_PAGE_PATH") {
            Ok(path) => derive_page_key(&path),
            Err(_) => bail!("Set COMMENTS_PAGE_KEY or COMMENTS_PAGE_PATH to pick a thread"),
        },
    };

    // Lexical moderation is an explicit configuration choice, not a probe.
    let filter = match std::env::var("COMMENTS_MODERATION").as_deref() {
        Ok("off") => None,
        _ => Some(ProfanityFilter::new()),
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let session = CommentSession::new(page_key.clone());

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.
    // Without Supabase credentials the engine runs against in-memory stores,
    // so the front end can be exercised before a project is configured.

    let supabase = match (
        std::env::var("SUPABASE_URL"),
        std::env::var("SUPABASE_ANON_KEY"),
    ) {
        (Ok(url), Ok(key)) => Some((url, key)),
        _ => None,
    };

    match supabase {
        Some((url, key)) => {
            // Keep the rate ledger in a dedicated folder so the repo root
            // stays tidy.
            let data_dir =
                std::env::var("COMMENTS_DATA_DIR").unwrap_or_else(|_| "data".to_string());
            std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;
            let ledger_path = format!("{}/comment_timestamps.json", data_dir);

            let store = SupabaseCommentStore::new(&url, &key)
                .map_err(|e| anyhow::anyhow!("Failed to create Supabase client: {e}"))?;
            let ledger = JsonLedgerStore::new(&ledger_path);

            let service = SubmissionService::new(store, ledger, filter, GateConfig::default());
            tracing::info!(page_key = %page_key, "Comment engine ready");
            run_widget(service, session, args).await
        }
        None => {
            println!(
                "No SUPABASE_URL / SUPABASE_ANON_KEY set - comments will not persist.\n"
            );
            let service = SubmissionService::new(
                InMemoryCommentStore::new(),
                InMemoryLedgerStore::new(),
                filter,
                GateConfig::default(),
            );
            tracing::info!(page_key = %page_key, "Comment engine ready (in-memory)");
            run_widget(service, session, args).await
        }
    }
}

/// The text front end, independent of which store pair got wired in.
async fn run_widget<S: CommentStore, L: RateLedgerStore>(
    service: SubmissionService<S, L>,
    mut session: CommentSession,
    args: Vec<String>,
) -> Result<()> {
    if let Err(err) = service.load_thread(&mut session).await {
        // A load failure is a visible error state, distinct from an empty
        // thread - but a post can still be attempted for top-level comments.
        println!("{err}");
        if args.first().map(String::as_str) != Some("post") {
            std::process::exit(1);
        }
    } else if let Some(thread) = &session.thread {
        print_thread(thread);
    }

    match args.first().map(String::as_str) {
        Some("post") => {
            let parent_id = args.get(1).cloned();
            run_post(&service, &mut session, parent_id).await;
        }
        Some(other) => bail!("Unknown command {other:?} (expected: post [parent-id])"),
        None => {}
    }

    Ok(())
}

fn print_thread(thread: &CommentThread) {
    println!("Discussion");
    println!("----------");

    if thread.is_empty() {
        println!("No comments yet. Be the first to share your thoughts.");
        return;
    }

    let now = Utc::now();
    for entry in &thread.top_level {
        let c = &entry.comment;
        println!(
            "[{}] {} · {} · #{}",
            initials(&c.author_name),
            c.author_name,
            c.relative_age(now),
            c.id
        );
        for paragraph in c.paragraphs() {
            println!("    {}", paragraph.replace('\n', "\n    "));
        }
        for reply in &entry.replies {
            println!(
                "    ↳ [{}] {} · {}",
                initials(&reply.author_name),
                reply.author_name,
                reply.relative_age(now)
            );
            for paragraph in reply.paragraphs() {
                println!("        {}", paragraph.replace('\n', "\n        "));
            }
        }
        println!();
    }
}

/// Interactive post: prompts play the role of the form, so the dwell timer
/// starts when the prompts appear and runs while the visitor types.
async fn run_post<S: CommentStore, L: RateLedgerStore>(
    service: &SubmissionService<S, L>,
    session: &mut CommentSession,
    parent_id: Option<String>,
) {
    let form_opened_at = Utc::now();

    if let Some(parent) = &parent_id {
        println!("Replying to comment #{parent}");
    }
    let author_name = prompt("Name (required): ");
    let author_email = prompt("Email (optional, never shown): ");
    println!("Comment (finish with an empty line):");
    let body = read_body();

    let input = CommentInput {
        author_name,
        author_email,
        body,
        parent_id,
        // No hidden field on a terminal; an empty honeypot is what a human
        // submission looks like.
        honeypot: String::new(),
        form_opened_at,
    };

    match service.submit(session, input).await {
        Ok(SubmissionOutcome::Posted) | Ok(SubmissionOutcome::Trapped) => {
            println!("Comment posted successfully! It will appear once approved.");
            if let Some(thread) = &session.thread {
                print_thread(thread);
            }
        }
        Err(err @ SubmissionError::Store(_)) => {
            tracing::error!("Store write failed: {err:?}");
            println!("{err}");
        }
        Err(err) => println!("{err}"),
    }
}

fn prompt(label: &str) -> String {
    print!("{label}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    line.trim_end_matches(['\r', '\n']).to_string()
}

fn read_body() -> String {
    let mut lines = Vec::new();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            break;
        }
        lines.push(line);
    }
    lines.join("\n")
}
