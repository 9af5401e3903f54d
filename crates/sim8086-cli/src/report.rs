//! Text and JSON renderings of a finished run.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use sim8086::{Listing, RunConfig};

use crate::verify::{Verdict, Verification};

pub fn header(input: &Path) -> String {
    format!("; disassembled by sim8086: {}\n", input.display())
}

/// Header, listing and, after `--check`, the verdict line. A check that could
/// not run is reported in place of the verdict.
pub fn text_report(
    input: &Path,
    listing: &Listing,
    cfg: &RunConfig,
    check: Option<&Result<Verification>>,
) -> String {
    let mut buf = header(input);
    buf.push_str(&listing.render(cfg));
    match check {
        Some(Ok(v)) => buf.push_str(match v.verdict {
            Verdict::Same => "=== Ok\n",
            Verdict::Differs => "=== Error, not the same\n",
        }),
        Some(Err(e)) => buf.push_str(&format!("=== Check failed: {e:#}\n")),
        None => {}
    }
    buf
}

#[derive(Serialize)]
struct Report<'a> {
    input: String,
    listing: &'a Listing,
    verification: Option<&'a Verification>,
    check_error: Option<String>,
}

pub fn json_report(
    input: &Path,
    listing: &Listing,
    check: Option<&Result<Verification>>,
) -> Result<String> {
    let report = Report {
        input: input.display().to_string(),
        listing,
        verification: check.and_then(|c| c.as_ref().ok()),
        check_error: check.and_then(|c| c.as_ref().err()).map(|e| format!("{e:#}")),
    };
    Ok(serde_json::to_string_pretty(&report)? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn listing() -> Listing {
        sim8086::run(&[0x89, 0xD9], &RunConfig::default()).unwrap()
    }

    #[test]
    fn text_report_with_verdict() {
        let check = Ok(Verification {
            asm_path: PathBuf::from("a.sim8086.asm"),
            bin_path: PathBuf::from("a.sim8086"),
            verdict: Verdict::Same,
        });
        assert_eq!(
            text_report(Path::new("a"), &listing(), &RunConfig::default(), Some(&check)),
            "; disassembled by sim8086: a\nbits 16\nmov cx, bx\n=== Ok\n"
        );
    }

    #[test]
    fn failed_check_still_carries_the_listing() {
        let check = Err(anyhow::anyhow!("could not run nasm"));
        assert_eq!(
            text_report(Path::new("a"), &listing(), &RunConfig::default(), Some(&check)),
            "; disassembled by sim8086: a\nbits 16\nmov cx, bx\n=== Check failed: could not run nasm\n"
        );

        let json = json_report(Path::new("a"), &listing(), Some(&check)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["check_error"], "could not run nasm");
        assert_eq!(v["listing"]["steps"][0]["text"], "mov cx, bx");
        assert!(v["verification"].is_null());
    }
}
