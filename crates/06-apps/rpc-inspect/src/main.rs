//! Command-line utility for building and dissecting shared-memory RPC messages.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use shm_rpc::{AcceptStatus, CodecConfig, Param, ParamKind, Procedure, RpcCodec};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Text rendering helpers used by the CLI commands.
mod render {
    use anyhow::{Context, Result};
    use shm_rpc::{
        decode_procedure, decode_status, decode_values, decode_versions, message_kind,
        transaction_id, AcceptStatus, MessageKind, Param, ParamKind,
    };
    use std::fmt::Write;

    /// Format bytes as big-endian words, four per line.
    pub fn words(bytes: &[u8]) -> String {
        let mut out = String::new();
        for (line, chunk) in bytes.chunks(16).enumerate() {
            write!(out, "{:04X}:", line * 16).expect("write offset");
            for word in chunk.chunks(4) {
                out.push(' ');
                for byte in word {
                    write!(out, "{byte:02X}").expect("write byte");
                }
            }
            out.push('\n');
        }
        out
    }

    /// Format one decoded value.
    pub fn param(value: &Param<'_>) -> String {
        match value {
            Param::Sint(value) => format!("sint {value}"),
            Param::Uint(value) => format!("uint {value} (0x{value:08X})"),
            Param::String(text) => format!("string {text:?}"),
            Param::Blob(bytes) => {
                let mut out = format!("blob {} byte(s)", bytes.len());
                if !bytes.is_empty() {
                    out.push(' ');
                    for byte in bytes.iter() {
                        write!(out, "{byte:02x}").expect("write blob");
                    }
                }
                out
            }
        }
    }

    /// Describe a message: header fields, then the body decoded as `schema`.
    ///
    /// An empty schema skips body decoding.
    pub fn message(msg: &[u8], schema: &[ParamKind]) -> Result<String> {
        let mut out = String::new();
        let kind = message_kind(msg).context("reading message type")?;
        let xid = transaction_id(msg).context("reading xid")?;

        let body_kind = match kind {
            MessageKind::Call => {
                let procedure = decode_procedure(msg).context("reading call header")?;
                writeln!(out, "call xid=0x{xid:08X}").expect("write kind");
                writeln!(
                    out,
                    "program={} version={} procedure={}",
                    procedure.program, procedure.version, procedure.procedure
                )
                .expect("write procedure");
                Some(MessageKind::Call)
            }
            MessageKind::Reply => {
                let status = decode_status(msg).context("reading reply header")?;
                writeln!(out, "reply xid=0x{xid:08X}").expect("write kind");
                writeln!(out, "status={status:?}").expect("write status");
                match status {
                    AcceptStatus::Success => Some(MessageKind::Reply),
                    AcceptStatus::ProgMismatch => {
                        let range = decode_versions(msg).context("reading version range")?;
                        writeln!(out, "supported versions {}..={}", range.min, range.max)
                            .expect("write range");
                        None
                    }
                    _ => None,
                }
            }
        };

        if let Some(body_kind) = body_kind.filter(|_| !schema.is_empty()) {
            let values = decode_values(msg, body_kind, schema).context("decoding body")?;
            for (index, value) in values.iter().enumerate() {
                writeln!(out, "[{index}] {}", param(value)).expect("write param");
            }
        }
        Ok(out)
    }
}

/// Build or dissect ONC-RPC messages as carried over the shared-memory channel.
#[derive(Parser, Debug)]
#[command(author, version, about = "Build and decode shm RPC messages", long_about = None)]
struct Cli {
    /// Largest message the codec may produce (decimal or hex).
    #[arg(long, global = true, value_parser = parse_usize, value_name = "BYTES")]
    max_message_len: Option<usize>,

    /// Log codec decisions to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a call and print it as hex words.
    Call {
        /// Program number (decimal or hex, e.g. 0x20000001).
        #[arg(long, value_parser = parse_u32)]
        program: u32,
        /// Program version.
        #[arg(long = "version", value_parser = parse_u32)]
        prog_version: u32,
        /// Procedure number.
        #[arg(long, value_parser = parse_u32)]
        procedure: u32,
        /// Transaction id (defaults to 0).
        #[arg(long, value_parser = parse_u32, default_value_t = 0)]
        xid: u32,
        /// Write the raw message here instead of printing hex.
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Arguments as KIND:VALUE (sint:-3, uint:0x10, string:abc, blob:deadbeef).
        #[arg(value_parser = parse_param, value_name = "PARAM")]
        params: Vec<ParamArg>,
    },
    /// Encode a reply and print it as hex words.
    Reply {
        /// Accept status carried by the reply.
        #[arg(long, value_enum)]
        status: StatusArg,
        /// Transaction id of the call being answered.
        #[arg(long, value_parser = parse_u32, default_value_t = 0)]
        xid: u32,
        /// Write the raw message here instead of printing hex.
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Results as KIND:VALUE; prog-mismatch takes uint:LOW uint:HIGH.
        #[arg(value_parser = parse_param, value_name = "PARAM")]
        params: Vec<ParamArg>,
    },
    /// Decode a captured message.
    Decode {
        /// Message file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Input is hex text rather than raw bytes.
        #[arg(long)]
        hex: bool,
        /// Comma-separated body layout, e.g. uint,string,blob.
        #[arg(long, value_enum, value_delimiter = ',')]
        schema: Vec<KindArg>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    Success,
    ProgUnavail,
    ProgMismatch,
    ProcUnavail,
    GarbageArgs,
    SystemErr,
}

impl From<StatusArg> for AcceptStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Success => AcceptStatus::Success,
            StatusArg::ProgUnavail => AcceptStatus::ProgUnavail,
            StatusArg::ProgMismatch => AcceptStatus::ProgMismatch,
            StatusArg::ProcUnavail => AcceptStatus::ProcUnavail,
            StatusArg::GarbageArgs => AcceptStatus::GarbageArgs,
            StatusArg::SystemErr => AcceptStatus::SystemErr,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Sint,
    Uint,
    String,
    Blob,
}

impl From<KindArg> for ParamKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Sint => ParamKind::Sint,
            KindArg::Uint => ParamKind::Uint,
            KindArg::String => ParamKind::String,
            KindArg::Blob => ParamKind::Blob,
        }
    }
}

/// Owned parameter parsed from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
enum ParamArg {
    Sint(i32),
    Uint(u32),
    String(String),
    Blob(Vec<u8>),
}

impl ParamArg {
    fn as_param(&self) -> Param<'_> {
        match self {
            ParamArg::Sint(value) => Param::Sint(*value),
            ParamArg::Uint(value) => Param::Uint(*value),
            ParamArg::String(text) => Param::String(text),
            ParamArg::Blob(bytes) => Param::Blob(bytes),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli
        .max_message_len
        .map_or_else(CodecConfig::default, CodecConfig::with_max_message_len);
    let codec = RpcCodec::new(config).context("invalid codec configuration")?;

    match cli.command {
        Command::Call {
            program,
            prog_version,
            procedure,
            xid,
            out,
            params,
        } => {
            let params: Vec<Param<'_>> = params.iter().map(ParamArg::as_param).collect();
            let msg = codec
                .build_request(xid, Procedure::new(program, prog_version, procedure), &params)
                .context("encoding call")?;
            emit(msg.as_bytes(), out.as_deref())?;
        }
        Command::Reply {
            status,
            xid,
            out,
            params,
        } => {
            let params: Vec<Param<'_>> = params.iter().map(ParamArg::as_param).collect();
            let msg = codec
                .build_response(xid, status.into(), &params)
                .context("encoding reply")?;
            emit(msg.as_bytes(), out.as_deref())?;
        }
        Command::Decode { input, hex, schema } => {
            let bytes = load_message(&input, hex)?;
            let schema: Vec<ParamKind> = schema.into_iter().map(ParamKind::from).collect();
            print!("{}", render::message(&bytes, &schema)?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

fn emit(bytes: &[u8], out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("failed to write {path:?}"))?;
            debug!(bytes = bytes.len(), ?path, "wrote message");
        }
        None => print!("{}", render::words(bytes)),
    }
    Ok(())
}

fn load_message(input: &Path, hex: bool) -> Result<Vec<u8>> {
    let raw = if input == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        fs::read(input).with_context(|| format!("failed to read {input:?}"))?
    };
    if !hex {
        return Ok(raw);
    }
    let text = std::str::from_utf8(&raw).context("hex input is not text")?;
    match parse_hex(text) {
        Ok(bytes) => Ok(bytes),
        Err(err) => bail!("{err}"),
    }
}

fn parse_param(input: &str) -> Result<ParamArg, String> {
    let (kind, value) = input
        .split_once(':')
        .ok_or_else(|| format!("expected KIND:VALUE, got '{input}'"))?;
    match kind {
        "sint" => value
            .parse::<i32>()
            .map(ParamArg::Sint)
            .map_err(|_| format!("invalid sint '{value}'")),
        "uint" => parse_u32(value).map(ParamArg::Uint),
        "string" => Ok(ParamArg::String(value.to_owned())),
        "blob" => parse_hex(value).map(ParamArg::Blob),
        other => Err(format!(
            "unknown parameter kind '{other}' (expected sint, uint, string or blob)"
        )),
    }
}

fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let digits: String = input.split_whitespace().collect();
    let digits = digits.strip_prefix("0x").unwrap_or(&digits);
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in '{input}'"));
    }
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .filter(|pair| pair.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("invalid hex byte in '{input}'"))
        })
        .collect()
}

fn parse_u32(input: &str) -> Result<u32, String> {
    if let Some(stripped) = input.strip_prefix("0x") {
        u32::from_str_radix(stripped, 16).map_err(|_| format!("invalid hex value '{input}'"))
    } else {
        input
            .parse::<u32>()
            .map_err(|_| format!("invalid number '{input}'"))
    }
}

fn parse_usize(input: &str) -> Result<usize, String> {
    if let Some(stripped) = input.strip_prefix("0x") {
        usize::from_str_radix(stripped, 16).map_err(|_| format!("invalid hex value '{input}'"))
    } else {
        input
            .parse::<usize>()
            .map_err(|_| format!("invalid number '{input}'"))
    }
}
