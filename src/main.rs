use anyhow::{bail, Context};
use codemap::highlight::SyntaxHighlighter;
use codemap::logging::{self, Logger};
use codemap::{error, MinimapConfig, TuiApplication};
use log::LevelFilter;
use std::path::PathBuf;

const USAGE: &str = "usage: codemap [--config PATH] [--lang python|json|plain] [--debug-log PATH] FILE";

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    config: Option<PathBuf>,
    lang: Option<String>,
    debug_log: Option<PathBuf>,
    file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;
    let Some(file) = options.file else {
        bail!("{}", USAGE);
    };

    if let Some(path) = options.debug_log {
        logging::init(
            Logger::new(LevelFilter::Debug)
                .without_stderr()
                .with_file_output(path),
        );
    }

    let config = match options.config {
        Some(path) => MinimapConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MinimapConfig::load_or(MinimapConfig::for_terminal()),
    };

    let highlighter = match options.lang.as_deref() {
        Some(lang) => SyntaxHighlighter::for_language(lang)?,
        None => SyntaxHighlighter::for_path(&file)?,
    };

    let mut app = TuiApplication::open(&file, highlighter, config)
        .with_context(|| format!("failed to open {}", file.display()))?;
    app.run()?;
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => options.config = Some(expand(next_value(&mut iter, arg)?)?),
            "--lang" => options.lang = Some(next_value(&mut iter, arg)?.to_string()),
            "--debug-log" => options.debug_log = Some(expand(next_value(&mut iter, arg)?)?),
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
            path => {
                if options.file.is_some() {
                    bail!("only one FILE may be given\n{}", USAGE);
                }
                options.file = Some(expand(path)?);
            }
        }
    }
    Ok(options)
}

fn next_value<'a>(iter: &mut std::slice::Iter<'a, String>, flag: &str) -> anyhow::Result<&'a str> {
    match iter.next() {
        Some(value) if !value.starts_with('-') => Ok(value.as_str()),
        _ => bail!("{} requires a value", flag),
    }
}

/// `~` と環境変数を展開する
fn expand(path: &str) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| format!("cannot expand {}", path))?;
    Ok(PathBuf::from(expanded.into_owned()))
}
