//! Scan command: a counter-side loop that registers one barcode per line.
//!
//! On a terminal the operator types (or a scanner "types") each barcode;
//! piped input is read line by line. `q` or end of input stops the loop;
//! blank lines are skipped.

use std::io::{self, BufRead};

use dialoguer::Input;

use redeemly_core::{CoreError, NoticeKind, Operator, Registration, Session};

use crate::cli::ScanArgs;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::{register, util};

const QUIT: &str = "q";

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Quit,
    Blank,
    Barcode(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    match line.trim() {
        QUIT => Line::Quit,
        "" => Line::Blank,
        barcode => Line::Barcode(barcode),
    }
}

#[derive(Debug, Default)]
struct Tally {
    accepted: usize,
    refused: usize,
    skipped: usize,
}

pub fn handle(args: &ScanArgs, ctx: &Context) -> Result<(), CliError> {
    let session = ctx.open_session()?;
    let mut tally = Tally::default();

    if !ctx.quiet {
        eprintln!(
            "Scanning into {} ('{QUIT}' to stop)",
            session.active_path().display()
        );
    }

    if ctx.interactive {
        loop {
            let line: String = match Input::new()
                .with_prompt("Barcode")
                .allow_empty(true)
                .interact_text()
            {
                Ok(line) => line,
                Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(util::prompt_err(e)),
            };
            match classify(&line) {
                Line::Quit => break,
                Line::Blank => {}
                Line::Barcode(barcode) => {
                    scan_one(&session, ctx, barcode, args.limit, &mut tally)?;
                }
            }
        }
    } else {
        for line in io::stdin().lock().lines() {
            let line = line?;
            match classify(&line) {
                Line::Quit => break,
                Line::Blank => {}
                Line::Barcode(barcode) => {
                    scan_one(&session, ctx, barcode, args.limit, &mut tally)?;
                }
            }
        }
    }

    if !ctx.quiet {
        eprintln!(
            "{} accepted, {} refused, {} skipped",
            tally.accepted, tally.refused, tally.skipped
        );
    }
    Ok(())
}

/// Register one barcode. Per-barcode problems are reported and the loop
/// continues; storage failures end it.
fn scan_one(
    session: &Session,
    ctx: &Context,
    barcode: &str,
    preset: Option<u32>,
    tally: &mut Tally,
) -> Result<(), CliError> {
    let mut operator = ctx.operator();

    if let Err(err) = util::require_limit(ctx, session, barcode, preset) {
        eprintln!("{:?}", miette::Report::new(err));
        tally.skipped += 1;
        return Ok(());
    }

    let registration = match session.register(barcode, preset, &mut operator) {
        Ok(registration) => registration,
        Err(CoreError::Validation { message }) => {
            operator.notify(NoticeKind::Warning, "Invalid barcode", &message);
            tally.skipped += 1;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    match registration {
        Registration::Accepted(_) => tally.accepted += 1,
        Registration::LimitExceeded { .. } => tally.refused += 1,
        Registration::Cancelled { .. } => tally.skipped += 1,
    }

    let out = register::render_registration(ctx.output, &registration, ctx.color);
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped_not_a_stop() {
        assert_eq!(classify(""), Line::Blank);
        assert_eq!(classify("   \t"), Line::Blank);
        assert_eq!(classify(" q "), Line::Quit);
        assert_eq!(classify(" 880123\r"), Line::Barcode("880123"));
    }
}
