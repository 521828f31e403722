// crates/fragkit-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fragkit_core::{
    config::Config,
    content::ContentKind,
    envelope::{frame_signed, frame_unsigned},
    pipeline::{decode_fragment, SecurityContext, Trust},
    transport,
};
use fragkit_parse::{Dialect, Table};
use fragkit_trust::EcdsaVerifier;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "fragkit",
    about = "Fragment toolkit",
    long_about = "Fragment toolkit.\n\nDecode, trust-verify, parse and author self-contained URL fragments (type-tagged, optionally signed, deflate-compressed payloads).",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode a fragment, verify its signature against a trust store,
    /// and write the content body.
    Decode {
        /// Input path ("-" for stdin). Base64 fragment text unless --raw.
        #[arg(long, default_value = "-")]
        input: PathBuf,

        /// Treat the input as raw envelope bytes instead of base64 text.
        #[arg(long, default_value_t = false)]
        raw: bool,

        /// Trust-store configuration (JSON). Defaults to an empty store
        /// that rejects everything unless --allow-unsigned is given.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Accept unsigned (lowercase-tag) fragments regardless of config.
        #[arg(long, default_value_t = false)]
        allow_unsigned: bool,

        /// Mark the execution context insecure (verification fails closed).
        #[arg(long, default_value_t = false)]
        insecure: bool,

        /// Output path for the content body (stdout if omitted).
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Parse delimited text into a table.
    Parse {
        /// Input path ("-" for stdin).
        #[arg(long, default_value = "-")]
        input: PathBuf,

        /// Tab-separated input (default is comma-separated).
        #[arg(long, default_value_t = false)]
        tsv: bool,

        /// Treat the first row as column titles.
        #[arg(long, default_value_t = false)]
        header: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = FormatOpt::Json)]
        format: FormatOpt,
    },

    /// Author a fragment: wrap a body with a type tag, optionally attach
    /// a pre-computed detached signature, compress and base64-encode.
    Encode {
        /// Content kind for the tag byte.
        #[arg(long, value_enum)]
        kind: KindOpt,

        /// Body path ("-" for stdin).
        #[arg(long, default_value = "-")]
        input: PathBuf,

        /// Detached signature over (signed tag byte + body); selects the
        /// uppercase tag variant.
        #[arg(long)]
        signature_file: Option<PathBuf>,
    },

    /// List the trusted keys in a configuration file.
    Keys {
        /// Trust-store configuration (JSON).
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum FormatOpt {
    /// JSON object with "header" and "rows".
    Json,
    /// Delimiter-joined plain text.
    Plain,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum KindOpt {
    Plain,
    Html,
    Svg,
    Markdown,
    Bbcode,
    Csv,
    Tsv,
    Dir,
    Url,
    Xml,
}

impl From<KindOpt> for ContentKind {
    fn from(k: KindOpt) -> Self {
        match k {
            KindOpt::Plain => Self::Plain,
            KindOpt::Html => Self::Html,
            KindOpt::Svg => Self::Svg,
            KindOpt::Markdown => Self::Markdown,
            KindOpt::Bbcode => Self::Bbcode,
            KindOpt::Csv => Self::Csv,
            KindOpt::Tsv => Self::Tsv,
            KindOpt::Dir => Self::Dir,
            KindOpt::Url => Self::Url,
            KindOpt::Xml => Self::Xml,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Decode {
            input,
            raw,
            config,
            allow_unsigned,
            insecure,
            out,
        } => decode(&input, raw, config.as_deref(), allow_unsigned, insecure, out.as_deref()),

        Cmd::Parse {
            input,
            tsv,
            header,
            format,
        } => parse_table(&input, tsv, header, format),

        Cmd::Encode {
            kind,
            input,
            signature_file,
        } => encode(kind.into(), &input, signature_file.as_deref()),

        Cmd::Keys { config } => list_keys(&config),
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Read a whole input, with "-" meaning stdin.
fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("read stdin")?;
        Ok(buf)
    } else {
        fs::read(path).with_context(|| format!("read {}", path.display()))
    }
}

fn write_output(out: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match out {
        Some(path) => {
            let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
            let mut w = BufWriter::new(f);
            w.write_all(bytes)?;
            w.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            w.write_all(bytes)?;
            w.flush()?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>, allow_unsigned: bool) -> Result<Config> {
    let mut config = match path {
        Some(p) => Config::from_path(p).with_context(|| format!("loading {}", p.display()))?,
        None => Config::default(),
    };
    if allow_unsigned {
        config = Config {
            allow_unsigned: true,
            ..config
        };
    }
    Ok(config)
}

fn decode(
    input: &Path,
    raw: bool,
    config_path: Option<&Path>,
    allow_unsigned: bool,
    insecure: bool,
    out: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path, allow_unsigned)?;
    let ctx = if insecure {
        SecurityContext::Insecure
    } else {
        SecurityContext::Secure
    };

    let bytes = read_input(input)?;
    let envelope_bytes = if raw {
        bytes
    } else {
        let text = String::from_utf8(bytes).context("fragment input is not UTF-8 text")?;
        transport::decode(&text).context("decoding fragment transport")?
    };

    let frag = decode_fragment(&envelope_bytes, &config, ctx, &EcdsaVerifier)
        .context("fragment rejected")?;

    match &frag.trust {
        Trust::Signed { key_name } => {
            info!(kind = %frag.kind, mime = frag.kind.mime(), key = %key_name, "verified fragment");
        }
        Trust::Unsigned => {
            info!(kind = %frag.kind, mime = frag.kind.mime(), "unsigned fragment accepted");
        }
    }

    write_output(out, &frag.body)
}

fn parse_table(input: &Path, tsv: bool, header: bool, format: FormatOpt) -> Result<()> {
    let bytes = read_input(input)?;
    let text = String::from_utf8(bytes).context("delimited input is not UTF-8 text")?;

    let mut dialect = if tsv { Dialect::tsv() } else { Dialect::csv() };
    if header {
        dialect = dialect.with_header();
    }
    let table = Table::parse(&text, dialect);
    info!(rows = table.len(), header = table.header.is_some(), "parsed table");

    match format {
        FormatOpt::Json => {
            let value = serde_json::json!({
                "header": table.header,
                "rows": table.rows,
            });
            println!("{}", serde_json::to_string_pretty(&value).context("serialize table")?);
        }
        FormatOpt::Plain => {
            println!("{}", table.render(dialect.delimiter));
        }
    }
    Ok(())
}

fn encode(kind: ContentKind, input: &Path, signature_file: Option<&Path>) -> Result<()> {
    let body = read_input(input)?;

    let raw = match signature_file {
        Some(sig_path) => {
            let sig = fs::read(sig_path)
                .with_context(|| format!("read signature {}", sig_path.display()))?;
            frame_signed(kind, &body, &sig)
                .ok_or_else(|| anyhow!("signature exceeds the 16-bit length field"))?
        }
        None => frame_unsigned(kind, &body),
    };

    let fragment = transport::encode(&raw).context("encoding fragment transport")?;
    println!("{fragment}");
    Ok(())
}

fn list_keys(config_path: &Path) -> Result<()> {
    let config = Config::from_path(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if config.keys.is_empty() {
        bail!("no trusted keys in {}", config_path.display());
    }

    println!(
        "allowUnsigned: {}  ({} key{})",
        config.allow_unsigned,
        config.keys.len(),
        if config.keys.len() == 1 { "" } else { "s" }
    );
    for key in &config.keys {
        println!("{}\t{}\t{}", key.name, key.key.crv, key.hash);
    }
    Ok(())
}
