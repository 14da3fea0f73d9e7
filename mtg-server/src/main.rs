use std::collections::HashSet;
use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Context;
use clap::Parser;
use log::{error, info};

use mtg_core::io::{read_corpus, tokenize};
use mtg_core::{finish_sentence_with, MtgError, Selection};
use serde::{Deserialize, Serialize};

/// Order used when a request does not give `n`.
const DEFAULT_ORDER: usize = 3;

/// Sentence completion HTTP server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to a whitespace-tokenized corpus file.
	#[arg(long)]
	corpus: PathBuf,

	/// Address to bind.
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind.
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Number of worker threads (defaults to the number of CPUs).
	#[arg(long)]
	workers: Option<usize>,
}

/// Struct representing query parameters for the `/v1/finish` endpoint
#[derive(Deserialize)]
struct FinishParams {
	sentence: Option<String>, // whitespace separated tokens
	n: Option<usize>,
	randomize: Option<bool>,
	seed: Option<u64> // only used when randomize is true
}

#[derive(Serialize, Deserialize, Debug)]
struct FinishResponse {
	sentence: Vec<String>,
	text: String
}

#[derive(Serialize, Deserialize, Debug)]
struct CorpusInfo {
	tokens: usize,
	vocabulary: usize
}

/// Corpus shared read-only by every worker.
struct SharedData {
	corpus: Vec<String>,
	vocabulary: usize
}

impl SharedData {
	fn new(corpus: Vec<String>) -> Self {
		let vocabulary = corpus.iter().map(String::as_str).collect::<HashSet<_>>().len();
		Self { corpus, vocabulary }
	}
}

impl FinishParams {
	/// Determines the selection strategy from `randomize` and `seed`.
	fn selection(&self) -> Selection {
		if self.randomize.unwrap_or(false) {
			Selection::Stochastic { seed: self.seed }
		} else {
			Selection::Deterministic
		}
	}
}

/// HTTP GET endpoint `/v1/finish`
///
/// Completes the given sentence against the loaded corpus.
/// Returns the completed tokens and their space-joined text as JSON.
#[get("/v1/finish")]
async fn get_finished(data: web::Data<SharedData>, query: web::Query<FinishParams>) -> impl Responder {
	let n = query.n.unwrap_or(DEFAULT_ORDER);
	let sentence = tokenize(query.sentence.as_deref().unwrap_or(""));

	match finish_sentence_with(&sentence, n, &data.corpus, &query.selection()) {
		Ok(sentence) => HttpResponse::Ok().json(FinishResponse { text: sentence.join(" "), sentence }),
		Err(e) => error_response(&e),
	}
}

/// Maps a library error to an HTTP response.
///
/// Validation errors are the caller's fault (400), everything else is ours (500).
fn error_response(e: &MtgError) -> HttpResponse {
	match e {
		MtgError::InvalidOrder(_) => HttpResponse::BadRequest().body(e.to_string()),
		MtgError::Io(_) => {
			error!("Completion failed: {e}");
			HttpResponse::InternalServerError().body("Completion failed")
		}
	}
}

/// HTTP GET endpoint `/v1/corpus`
///
/// Returns the size of the loaded corpus.
#[get("/v1/corpus")]
async fn get_corpus(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().json(CorpusInfo { tokens: data.corpus.len(), vocabulary: data.vocabulary })
}

/// Main entry point for the server.
///
/// Loads the corpus once and shares it read-only between workers.
/// Each request builds its own model, so requests never share count caches.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let corpus = read_corpus(&args.corpus)
		.with_context(|| format!("failed to read corpus {}", args.corpus.display()))?;
	let shared_data = web::Data::new(SharedData::new(corpus));
	info!(
		"Loaded {} ({} tokens, {} distinct)",
		args.corpus.display(),
		shared_data.corpus.len(),
		shared_data.vocabulary
	);

	let workers = args.workers.unwrap_or_else(num_cpus::get);
	info!("Listening on {}:{} with {} workers", args.host, args.port, workers);

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_finished)
			.service(get_corpus)
	})
		.workers(workers)
		.bind((args.host.as_str(), args.port))?
		.run()
		.await?;

	Ok(())
}
