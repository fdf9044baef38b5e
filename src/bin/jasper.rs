use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use jasper::brain::Brain;
use jasper::conversation::Conversation;
use jasper::logging;
use jasper::mic::TextMic;
use jasper::opts::Opts;
use jasper::phrases::standard_phrases;
use jasper::plugins;
use jasper::vocabulary::{CmuDictionary, DummyVocabulary, LanguageModelVocabulary, Vocabulary};

fn main() -> Result<()> {
    let params = Params::parse();
    logging::init_with_default(logging::default_level(params.debug));

    let opts = match &params.config_path {
        Some(path) => Opts::from_path(path)?,
        None => Opts::default(),
    };

    let mut brain = Brain::for_language(&opts)?;
    for plugin in plugins::builtin(&opts) {
        brain.add_plugin(plugin);
    }

    if params.compile_vocabulary {
        return compile_vocabularies(&params, &opts, &brain);
    }

    let stdout = io::stdout();
    match &params.batch_path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open batch file '{}'", path.display()))?;
            let mic = TextMic::batch(BufReader::new(file), stdout.lock(), &opts.keyword);
            Conversation::new(mic, brain, &opts).run()?;
        }
        None => {
            let mic = TextMic::new(io::stdin().lock(), stdout.lock(), &opts.keyword);
            Conversation::new(mic, brain, &opts).run()?;
        }
    }

    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "jasper")]
#[command(about = "A voice-assistant client (text mode)")]
struct Params {
    /// JSON configuration profile.
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<PathBuf>,

    /// Replay utterances from a file (one per line) instead of reading stdin.
    #[arg(short = 'b', long = "batch")]
    pub batch_path: Option<PathBuf>,

    /// Log at debug level unless `JASPER_LOG` says otherwise.
    #[arg(short = 'd', long = "debug", default_value_t = false)]
    pub debug: bool,

    /// Compile the keyword and command vocabularies, print their revisions, and exit.
    #[arg(long = "compile-vocabulary", default_value_t = false)]
    pub compile_vocabulary: bool,

    /// CMU pronouncing dictionary used to build language models when compiling.
    #[arg(long = "dictionary", requires = "compile_vocabulary")]
    pub dictionary_path: Option<PathBuf>,

    /// Recompile even when the stored revision matches.
    #[arg(
        short = 'f',
        long = "force",
        default_value_t = false,
        requires = "compile_vocabulary"
    )]
    pub force: bool,
}

fn compile_vocabularies(params: &Params, opts: &Opts, brain: &Brain) -> Result<()> {
    let mut keyword_phrases =
        standard_phrases(&opts.language, opts.standard_phrases_path.as_deref())?;
    keyword_phrases.push(opts.keyword.to_uppercase());
    let command_phrases = brain.all_phrases();

    let root = opts.vocabulary_dir.as_path();
    match &params.dictionary_path {
        Some(path) => {
            let dictionary = CmuDictionary::from_path(path)?;
            info!(words = dictionary.len(), "loaded dictionary");
            let keyword = LanguageModelVocabulary::new(root, "keyword", &dictionary);
            let default = LanguageModelVocabulary::new(root, "default", &dictionary);
            compile_one(&keyword, &keyword_phrases, params.force)?;
            compile_one(&default, &command_phrases, params.force)?;
        }
        None => {
            let keyword = DummyVocabulary::new(root, "keyword");
            let default = DummyVocabulary::new(root, "default");
            compile_one(&keyword, &keyword_phrases, params.force)?;
            compile_one(&default, &command_phrases, params.force)?;
        }
    }
    Ok(())
}

fn compile_one(vocabulary: &dyn Vocabulary, phrases: &[String], force: bool) -> Result<()> {
    let revision = vocabulary.compile(phrases, force)?;
    println!(
        "{}\t{}\t{}",
        vocabulary.name(),
        revision,
        vocabulary.path().display()
    );
    Ok(())
}
