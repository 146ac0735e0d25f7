use std::io::Write;

use {
    anyhow::Context,
    lexopt::{Arg, Parser, ValueExt},
    pcre2_wrap::RegexBuilder,
};

const USAGE: &str = "\
Matches a pattern against a subject, or rewrites the subject, using the
pcre2-wrap library.

USAGE:
    pcre2wrap [options] <pattern> <subject>

OPTIONS:
    -m, --modifiers <mods>   Compile modifiers, e.g. 'im' or 'uS'
    -s, --submods <mods>     Match or substitution modifiers, e.g. 'g'
    -r, --replace <repl>     Substitute matches with <repl> and print the
                             result instead of listing matches
        --strict             Reject unrecognized modifier characters
    -h, --help               Print this help

Set RUST_LOG=warn (or debug, trace) to see library diagnostics.
";

fn main() -> anyhow::Result<()> {
    let rustlog = std::env::var("RUST_LOG").unwrap_or_else(|_| String::new());
    let level = match &*rustlog {
        "" | "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        unk => anyhow::bail!("unrecognized log level '{}'", unk),
    };
    logger::Logger::init()?;
    log::set_max_level(level);

    if let Err(err) = run(&mut Parser::from_env()) {
        writeln!(&mut std::io::stderr(), "{:#}", err).unwrap();
        std::process::exit(1);
    }
    Ok(())
}

fn run(p: &mut Parser) -> anyhow::Result<()> {
    let mut modifiers = String::new();
    let mut submods = String::new();
    let mut replacement: Option<String> = None;
    let mut strict = false;
    let mut positional: Vec<String> = Vec::new();

    while let Some(arg) = p.next()? {
        match arg {
            Arg::Short('h') | Arg::Long("help") => anyhow::bail!("{}", USAGE.trim()),
            Arg::Short('m') | Arg::Long("modifiers") => {
                modifiers = p.value()?.string()?;
            }
            Arg::Short('s') | Arg::Long("submods") => {
                submods = p.value()?.string()?;
            }
            Arg::Short('r') | Arg::Long("replace") => {
                replacement = Some(p.value()?.string()?);
            }
            Arg::Long("strict") => strict = true,
            Arg::Value(v) => positional.push(v.string()?),
            arg => return Err(arg.unexpected().into()),
        }
    }
    let (pattern, subject) = match positional.len() {
        2 => (positional.remove(0), positional.remove(0)),
        _ => anyhow::bail!("expected exactly <pattern> and <subject>\n\n{}", USAGE.trim()),
    };

    let re = RegexBuilder::new(&pattern)
        .modifiers(&modifiers)
        .strict(strict)
        .build()
        .with_context(|| format!("failed to compile pattern '{}'", pattern))?;

    let mut stdout = std::io::stdout().lock();
    if let Some(replacement) = replacement {
        let result = re
            .replace(&subject, &replacement, &submods)
            .context("substitution failed")?;
        writeln!(stdout, "{}", result)?;
        return Ok(());
    }

    let matches = re.captures(&subject, &submods).context("match failed")?;
    writeln!(stdout, "{} match(es)", matches.len())?;
    for (i, caps) in matches.iter().enumerate() {
        for (number, value) in caps.iter() {
            writeln!(stdout, "{}.{}: {}", i, number, value)?;
        }
        for (name, value) in caps.iter_named() {
            match caps.group_number(name) {
                Some(number) => {
                    writeln!(stdout, "{}.{} ({}): {}", i, name, number, value)?
                }
                None => writeln!(stdout, "{}.{}: {}", i, name, value)?,
            }
        }
    }
    Ok(())
}

mod logger {
    // The simplest possible logger that logs to stderr. No filtering here;
    // the `log` crate's global max level does that.
    use log::{self, Log};

    #[derive(Debug)]
    pub(crate) struct Logger(());

    const LOGGER: &Logger = &Logger(());

    impl Logger {
        pub(crate) fn init() -> Result<(), log::SetLoggerError> {
            log::set_logger(LOGGER)
        }
    }

    impl Log for Logger {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            eprintln!("{}|{}: {}", record.level(), record.target(), record.args());
        }

        fn flush(&self) {
            // eprintln! flushes on every call.
        }
    }
}
