//! Validate Command
//!
//! Checks a taxpayer document (CPF or CNPJ, detected by digit count) and
//! prints the formatted number with a verdict.

use console::style;

use crate::document::{self, DocumentKind, cnpj, cpf};
use crate::types::Result;

pub fn run(input: &str) -> Result<()> {
    match document::detect_kind(input) {
        Some(DocumentKind::Cpf) => {
            let digits = cpf::normalize(input);
            print_verdict("CPF", &cpf::format(&digits), cpf::validate_checksum(&digits));
        }
        Some(DocumentKind::Cnpj) => {
            let digits = cnpj::normalize(input);
            print_verdict(
                "CNPJ",
                &cnpj::format(&digits),
                cnpj::validate_checksum(&digits),
            );
        }
        None => {
            let digits = cpf::normalize(input);
            println!(
                "{} {} digits after normalization (expected 11 for CPF or 14 for CNPJ)",
                style("unrecognized:").yellow().bold(),
                digits.len()
            );
        }
    }
    Ok(())
}

fn print_verdict(kind: &str, formatted: &str, valid: bool) {
    let verdict = if valid {
        style("valid").green().bold()
    } else {
        style("invalid").red().bold()
    };
    println!("{}  {}  {}", kind, formatted, verdict);
}
