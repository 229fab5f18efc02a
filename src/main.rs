#[allow(clippy::unused_self)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
#[allow(clippy::cast_sign_loss)]
mod thumb;

use std::env;
use std::num::ParseIntError;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// Address the first word is disassembled at (start of the GBA cartridge ROM).
const BASE_ADDRESS: u32 = 0x0800_0000;

fn parse_word(arg: &str) -> Result<u16, ParseIntError> {
    let digits = arg
        .strip_prefix("0x")
        .or_else(|| arg.strip_prefix("0X"))
        .unwrap_or(arg);
    u16::from_str_radix(digits, 16)
}

fn main() -> ExitCode {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .init();

    let words = env::args().skip(1).collect::<Vec<String>>();
    if words.is_empty() {
        println!("usage: bitmatch <thumb halfword in hex>...");
        return ExitCode::from(1);
    }

    let table = thumb::build_catalog();
    tracing::info!("compiled {} Thumb encodings", table.len());
    for matcher in &table {
        tracing::debug!("{matcher}");
    }

    let mut disassembler = thumb::Disassembler::new(BASE_ADDRESS);
    for arg in &words {
        match parse_word(arg) {
            Ok(word) => {
                let text = thumb::disassemble(&table, &mut disassembler, word)
                    .unwrap_or_else(|| "<unknown>".to_string());
                println!("{:08X}: {word:04X}  {text}", disassembler.pc());
            }
            Err(e) => tracing::warn!("skipping `{arg}`: {e}"),
        }
        disassembler.advance();
    }

    ExitCode::SUCCESS
}
