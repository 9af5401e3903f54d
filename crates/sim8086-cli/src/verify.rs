//! Round-trip check: assemble the emitted listing with `nasm` and compare the
//! result with the original bytes.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Same,
    Differs,
}

#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub asm_path: PathBuf,
    pub bin_path: PathBuf,
    pub verdict: Verdict,
}

/// Writes `asm_text` to `<out_dir>/<input name>.sim8086.asm`, assembles it to
/// `<out_dir>/<input name>.sim8086` and compares that with `program`, the
/// bytes the listing was decoded from.
pub fn verify(
    input: &Path,
    program: &[u8],
    asm_text: &str,
    out_dir: &Path,
) -> Result<Verification> {
    let name = input
        .file_name()
        .with_context(|| format!("{} has no file name", input.display()))?
        .to_string_lossy();
    let asm_path = out_dir.join(format!("{name}.sim8086.asm"));
    let bin_path = out_dir.join(format!("{name}.sim8086"));

    std::fs::write(&asm_path, asm_text)
        .with_context(|| format!("could not write {}", asm_path.display()))?;
    assemble(&asm_path, &bin_path)?;

    let verdict = compare(program, &bin_path)?;
    tracing::debug!(?verdict, asm = %asm_path.display(), "verification finished");
    Ok(Verification {
        asm_path,
        bin_path,
        verdict,
    })
}

pub fn assemble(asm: &Path, out: &Path) -> Result<()> {
    let output = Command::new("nasm")
        .arg(asm)
        .arg("-o")
        .arg(out)
        .output()
        .context("could not run nasm")?;
    if !output.status.success() {
        bail!(
            "nasm failed on {}: {}",
            asm.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

pub fn compare(program: &[u8], assembled: &Path) -> Result<Verdict> {
    let bytes = std::fs::read(assembled)
        .with_context(|| format!("could not read {}", assembled.display()))?;
    Ok(if bytes == program {
        Verdict::Same
    } else {
        Verdict::Differs
    })
}
