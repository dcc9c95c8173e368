use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use parley::heuristics::{detect_speaker, RoleLinePattern};
use parley::{
    build_chunks, execute_stage4, read_transcript_file, segment, CommitmentTracker,
    EmbeddingClassifier, EmbeddingClient, EmbeddingConfig, FactStore, HumanReport, JsonlSink,
    LexicalClassifier, MemorySink, NoiseSentinel, Pipeline, PipelineConfig, PrototypeSet,
    PunctuationSplitter, Report, ReportMetadata, SegmenterConfig, SemanticClassifier,
    TranscriptInput,
};

#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about = "Meeting transcript classification and routing pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify and route every sentence of a transcript
    Process {
        #[command(flatten)]
        source: InputSource,

        /// Speaker whose commitments are tracked
        #[arg(long, default_value = "User")]
        user: String,

        /// Minimum classifier confidence for routing
        #[arg(long, default_value = "0.45")]
        threshold: f64,

        /// Override the source id recorded with dispatched commitments
        #[arg(long)]
        source_id: Option<String>,

        /// Semantic classifier backend
        #[arg(long, value_enum, default_value_t = ClassifierKind::Embedding)]
        classifier: ClassifierKind,

        /// Embedding model name (overrides PARLEY_EMBEDDING_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Output file for the JSON report (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the human-readable report
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Write tracked commitments as JSON lines
        #[arg(long)]
        commitments: Option<PathBuf>,

        /// Write archived facts as JSON lines
        #[arg(long)]
        facts: Option<PathBuf>,

        /// Maximum classifier calls in flight
        #[arg(long, default_value = "8")]
        concurrency: usize,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show how a transcript is segmented, without classifying it
    Segment {
        #[command(flatten)]
        source: InputSource,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputSource {
    /// Input transcript file (plain text)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Transcript text passed directly
    #[arg(short, long)]
    text: Option<String>,
}

impl InputSource {
    fn load(&self) -> Result<TranscriptInput> {
        match (&self.input, &self.text) {
            (Some(path), _) => {
                info!("Loading transcript from {:?}", path);
                read_transcript_file(path)
            }
            (None, Some(text)) => Ok(TranscriptInput::from_text(text.clone())),
            (None, None) => anyhow::bail!("either --input or --text is required"),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassifierKind {
    /// Prototype similarity over an embeddings endpoint
    Embedding,
    /// Offline word-overlap similarity
    Lexical,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            source,
            user,
            threshold,
            source_id,
            classifier,
            model,
            output,
            human_readable,
            commitments,
            facts,
            concurrency,
            verbose,
        } => {
            setup_logging(verbose);
            let mut input = source.load()?;
            if let Some(source_id) = source_id {
                input = input.with_source_id(source_id);
            }
            let config = PipelineConfig {
                primary_user: user,
                confidence_threshold: threshold,
                max_concurrency: concurrency,
                ..Default::default()
            };
            process_transcript(
                input,
                config,
                classifier,
                model,
                output,
                human_readable,
                commitments,
                facts,
            )
            .await
        }
        Commands::Segment { source, verbose } => {
            setup_logging(verbose);
            segment_transcript(source.load()?)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn build_classifier(
    kind: ClassifierKind,
    model: Option<String>,
) -> Result<Arc<dyn SemanticClassifier>> {
    match kind {
        ClassifierKind::Embedding => {
            let mut config = EmbeddingConfig::from_env();
            if let Some(model) = model {
                config = config.with_model(model);
            }
            info!("Using embeddings endpoint {} ({})", config.base_url, config.model);
            let client = EmbeddingClient::new(config)?;
            let classifier = EmbeddingClassifier::new(client, &PrototypeSet::default())
                .await
                .context("Failed to prepare embedding classifier")?;
            Ok(Arc::new(classifier))
        }
        ClassifierKind::Lexical => {
            info!("Using lexical classifier");
            Ok(Arc::new(LexicalClassifier::default()))
        }
    }
}

async fn process_transcript(
    input: TranscriptInput,
    config: PipelineConfig,
    kind: ClassifierKind,
    model: Option<String>,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    commitments: Option<PathBuf>,
    facts: Option<PathBuf>,
) -> Result<()> {
    let classifier = build_classifier(kind, model).await?;
    let pipeline = Pipeline::new(classifier, config);

    let result = pipeline
        .run(&input.text, &input.source_id)
        .await
        .context("Pipeline failed")?;

    // Dispatch routed items; without a file the items are only logged
    let mut commitment_file = commitments.as_deref().map(JsonlSink::create).transpose()?;
    let mut fact_file = facts.as_deref().map(JsonlSink::create).transpose()?;
    let mut commitment_memory = MemorySink::default();
    let mut fact_memory = MemorySink::default();
    let tracker: &mut dyn CommitmentTracker = match commitment_file.as_mut() {
        Some(sink) => sink,
        None => &mut commitment_memory,
    };
    let store: &mut dyn FactStore = match fact_file.as_mut() {
        Some(sink) => sink,
        None => &mut fact_memory,
    };
    let dispatched = execute_stage4(&result, tracker, store)?;

    if let (Some(sink), Some(path)) = (commitment_file.as_mut(), &commitments) {
        sink.flush()?;
        info!("Commitments written to {:?}", path);
    }
    if let (Some(sink), Some(path)) = (fact_file.as_mut(), &facts) {
        sink.flush()?;
        info!("Facts written to {:?}", path);
    }

    let config = pipeline.config();
    let metadata = ReportMetadata::new(
        &config.primary_user,
        config.confidence_threshold,
        pipeline.classifier_name(),
    );
    let report = Report::new(&result, metadata);
    match &output {
        Some(path) => {
            report.write_json(path)?;
            info!("Output written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            report.write_json_to(stdout.lock())?;
            println!();
        }
    }

    if let Some(path) = &human_readable {
        HumanReport::new(&result).write_file(path)?;
        info!("Human-readable output written to {:?}", path);
    }

    let counts = &result.route_counts;
    info!(
        "Complete: {} chunks ({} commitments, {} facts, {} discarded, {} flagged); dispatched {} + {}",
        result.total_chunks,
        counts.commitment_engine,
        counts.rag_engine,
        counts.discarded,
        counts.flagged,
        dispatched.commitments_sent,
        dispatched.facts_sent
    );

    Ok(())
}

fn segment_transcript(input: TranscriptInput) -> Result<()> {
    info!("Segmenting transcript '{}'", input.source_id);
    let roles = RoleLinePattern::new(&SegmenterConfig::default().speaker_roles)
        .context("Invalid speaker role pattern")?;
    let sentinel = NoiseSentinel::default();

    let sentences = segment(&input.text, &PunctuationSplitter, &roles)?;
    let chunks = build_chunks(&sentences);

    println!("Segmentation");
    println!("============");
    println!("Source: {}", input.source_id);
    println!("Sentences: {}", chunks.len());
    println!();

    let mut noise = 0;
    for chunk in &chunks {
        let (speaker, clean_text) = detect_speaker(&chunk.original);
        let is_noise = sentinel.is_noise(&clean_text);
        if is_noise {
            noise += 1;
        }
        println!(
            "{:>4} [{}] {}{}",
            chunk.index + 1,
            speaker.as_deref().unwrap_or("No Speaker"),
            clean_text,
            if is_noise { "  (noise)" } else { "" }
        );
    }

    println!();
    println!("Noise sentinel hits: {}", noise);

    Ok(())
}
