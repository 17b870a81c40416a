mod cli;

use std::io::{BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use cli::config::{CliArgs, Config, Format};
use cli::telemetry::init_telemetry;
use uniqid::{AddressSource, HEX_LEN, UdpProbe, UniqId, server_id_from_ip};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;

    match config {
        Config::Generate {
            server_id,
            count,
            format,
        } => generate(server_id, count, format),
        Config::ServerId { ids } => print_server_ids(&ids),
        Config::ExternalIp => print_external_ip(),
    }
}

fn generate(server_id: Option<u16>, count: u64, format: Format) -> anyhow::Result<()> {
    if let Some(id) = server_id {
        uniqid::try_set_server_id(id)?;
    }
    // Resolve the server id up front so failures surface as errors rather
    // than a panic inside the loop.
    let first = uniqid::try_get().context("failed to initialize the generator")?;
    tracing::info!(
        server_id = uniqid::server_id(),
        count,
        ?format,
        "generating ids"
    );

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut line = Vec::with_capacity(HEX_LEN + 1);
    write_id(&mut out, &mut line, first, format)?;
    for _ in 1..count {
        write_id(&mut out, &mut line, uniqid::get(), format)?;
    }
    out.flush()?;
    Ok(())
}

fn write_id(
    out: &mut impl Write,
    line: &mut Vec<u8>,
    raw: u64,
    format: Format,
) -> std::io::Result<()> {
    line.clear();
    match format {
        Format::Hex => uniqid::append_hex(raw, line),
        Format::Raw => write!(line, "{raw}")?,
        Format::Fields => {
            let id = UniqId::from_raw(raw);
            write!(line, "{}:{}", id.server_id(), id.sequence())?;
        }
    }
    line.push(b'\n');
    out.write_all(line)
}

fn print_server_ids(ids: &[String]) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for id in ids {
        let server_id = uniqid::decode_server_id(id.as_bytes())
            .with_context(|| format!("invalid id `{id}`"))?;
        writeln!(out, "{id}\t{server_id}")?;
    }
    Ok(())
}

fn print_external_ip() -> anyhow::Result<()> {
    let ip = UdpProbe::default().resolve()?;
    let server_id = server_id_from_ip(ip);
    tracing::debug!(%ip, server_id, "resolved external address");
    println!("{ip}\t{server_id}");
    Ok(())
}
